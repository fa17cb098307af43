pub mod alphabet;
pub mod cigar;
pub mod error;
pub mod scoring;

// Re-export types for convenience of `use affine_types::*;`.
pub use alphabet::*;
pub use cigar::*;
pub use error::*;
pub use scoring::*;

/// A borrowed sequence of ASCII symbols.
pub type Seq<'a> = &'a [u8];
/// An owned sequence of ASCII symbols.
pub type Sequence = Vec<u8>;

/// Alignment scores. Higher is better.
pub type Score = i64;

/// Score of unreachable DP states.
///
/// Small enough that no reachable state ever scores lower, and far enough from
/// `Score::MIN` that adding a handful of gap or substitution scores cannot wrap.
pub const NEG_INF: Score = Score::MIN / 4;

/// The result of a single alignment call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Alignment {
    pub score: Score,
    pub cigar: Cigar,
}

impl Alignment {
    /// Two-row view of the alignment of `a` and `b`. See [`render`].
    pub fn render(&self, a: Seq, b: Seq) -> (String, String) {
        render(a, b, &self.cigar)
    }
}

/// Anything that aligns a pair of sequences.
///
/// Implementors may keep buffers between calls, hence `&mut self`.
pub trait Aligner: std::fmt::Debug {
    fn align(&mut self, a: Seq, b: Seq) -> Result<Alignment, AlignError>;
}
