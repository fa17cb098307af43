use crate::{Seq, GAP_CHAR};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::slice;

/// The three DP layers of an affine alignment, relative to the first sequence `a`.
///
/// The declaration order is the tie-break order when several layers score equally.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AlignState {
    /// Consumes one symbol of both `a` and `b`.
    Match,
    /// Consumes one symbol of `b` only: a gap in `a`.
    Ins,
    /// Consumes one symbol of `a` only: a gap in `b`.
    Del,
}

impl AlignState {
    pub const ALL: [AlignState; 3] = [AlignState::Match, AlignState::Ins, AlignState::Del];

    /// Symbols consumed from `(a, b)` by one step in this state.
    #[inline]
    pub fn delta(&self) -> (usize, usize) {
        match self {
            AlignState::Match => (1, 1),
            AlignState::Ins => (0, 1),
            AlignState::Del => (1, 0),
        }
    }

    pub fn to_char(&self) -> char {
        match self {
            AlignState::Match => 'M',
            AlignState::Ins => 'I',
            AlignState::Del => 'D',
        }
    }
}

/// A run of `cnt` identical operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CigarElem {
    pub op: AlignState,
    pub cnt: usize,
}

/// Run-length encoded alignment path, in left-to-right order once finished.
#[derive(Clone, Default, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cigar {
    pub ops: Vec<CigarElem>,
}

impl Display for Cigar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for elem in &self.ops {
            write!(f, "{}{}", elem.cnt, elem.op.to_char())?;
        }
        Ok(())
    }
}

impl Cigar {
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Add a single operation, extending the last run when it has the same op.
    pub fn push(&mut self, op: AlignState) {
        self.push_elem(CigarElem { op, cnt: 1 });
    }

    /// Add `cnt` operations at once. A no-op for `cnt == 0`.
    pub fn push_run(&mut self, op: AlignState, cnt: usize) {
        self.push_elem(CigarElem { op, cnt });
    }

    pub fn push_elem(&mut self, elem: CigarElem) {
        if elem.cnt == 0 {
            return;
        }
        if let Some(s) = self.ops.last_mut() {
            if s.op == elem.op {
                s.cnt += elem.cnt;
                return;
            }
        }
        self.ops.push(elem);
    }

    /// Reverse the cigar string.
    pub fn reverse(&mut self) {
        self.ops.reverse()
    }

    /// Append another cigar to this one, merging the runs at the seam.
    pub fn append(&mut self, other: &mut Self) {
        let mut rest = other.ops.drain(..);
        if let Some(first) = rest.next() {
            self.push_elem(first);
        }
        self.ops.extend(rest);
    }

    /// Multiply every run length by `factor`, e.g. to turn chunk counts back into bases.
    pub fn scale(&mut self, factor: usize) {
        for elem in &mut self.ops {
            elem.cnt *= factor;
        }
    }

    /// Number of symbols of `a` consumed: matches plus deletions.
    pub fn len_a(&self) -> usize {
        self.ops
            .iter()
            .map(|e| e.op.delta().0 * e.cnt)
            .sum()
    }

    /// Number of symbols of `b` consumed: matches plus insertions.
    pub fn len_b(&self) -> usize {
        self.ops
            .iter()
            .map(|e| e.op.delta().1 * e.cnt)
            .sum()
    }
}

impl<'a> IntoIterator for &'a Cigar {
    type Item = &'a CigarElem;

    type IntoIter = slice::Iter<'a, CigarElem>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.iter()
    }
}

/// Render the alignment of `a` and `b` as two rows of equal length, with `-`
/// where a sequence is not advanced.
///
/// Panics when the cigar does not consume exactly `a` and `b`.
pub fn render(a: Seq, b: Seq, cigar: &Cigar) -> (String, String) {
    assert_eq!(cigar.len_a(), a.len(), "cigar {cigar} does not cover a");
    assert_eq!(cigar.len_b(), b.len(), "cigar {cigar} does not cover b");
    let width = cigar.ops.iter().map(|e| e.cnt).sum();
    let mut row_a = String::with_capacity(width);
    let mut row_b = String::with_capacity(width);
    let (mut i, mut j) = (0, 0);
    for &CigarElem { op, cnt } in cigar {
        for _ in 0..cnt {
            let (di, dj) = op.delta();
            row_a.push(if di == 1 { char::from(a[i]) } else { char::from(GAP_CHAR) });
            row_b.push(if dj == 1 { char::from(b[j]) } else { char::from(GAP_CHAR) });
            i += di;
            j += dj;
        }
    }
    (row_a, row_b)
}

/// The cigar as a plain string of one char per operation, e.g. `MMIIDM`.
pub fn expand(cigar: &Cigar) -> String {
    let mut s = String::new();
    for e in cigar {
        for _ in 0..e.cnt {
            s.push(e.op.to_char());
        }
    }
    s
}
