//! Substitution sources for the DP. One DP step consumes one symbol, one chunk
//! of symbols, or one column of a multiple alignment, depending on the scorer.

use affine_types::{AlignError, GapCost, Score, ScoringModel, GAP};

/// What a DP engine needs to know about its inputs.
pub trait Scorer {
    /// Number of DP steps along `a`.
    fn len_a(&self) -> usize;
    /// Number of DP steps along `b`.
    fn len_b(&self) -> usize;
    /// Score of aligning step `i` of `a` with step `j` of `b`, both 0-based.
    fn sub(&self, i: usize, j: usize) -> Score;
    /// Gap costs of a single DP step.
    fn gaps(&self) -> GapCost;
}

/// Two encoded sequences, one symbol per step.
pub struct PairScorer<'a> {
    pub a: &'a [u8],
    pub b: &'a [u8],
    pub model: &'a ScoringModel,
}

impl Scorer for PairScorer<'_> {
    #[inline]
    fn len_a(&self) -> usize {
        self.a.len()
    }
    #[inline]
    fn len_b(&self) -> usize {
        self.b.len()
    }
    #[inline]
    fn sub(&self, i: usize, j: usize) -> Score {
        self.model.sub(self.a[i], self.b[j])
    }
    #[inline]
    fn gaps(&self) -> GapCost {
        self.model.gaps()
    }
}

/// Two encoded sequences cut into non-overlapping chunks of `chunk_size` symbols.
///
/// A chunk pair scores the sum of its position-wise substitutions, and a one-chunk
/// gap step extends the gap by `chunk_size` symbols.
pub struct ChunkScorer<'a> {
    a: &'a [u8],
    b: &'a [u8],
    model: &'a ScoringModel,
    chunk_size: usize,
}

impl<'a> ChunkScorer<'a> {
    pub fn new(
        a: &'a [u8],
        b: &'a [u8],
        model: &'a ScoringModel,
        chunk_size: usize,
    ) -> Result<Self, AlignError> {
        if chunk_size == 0 {
            return Err(AlignError::ZeroChunkSize);
        }
        for len in [a.len(), b.len()] {
            if len % chunk_size != 0 {
                return Err(AlignError::LengthNotDivisible { len, chunk_size });
            }
        }
        Ok(Self {
            a,
            b,
            model,
            chunk_size,
        })
    }
}

impl Scorer for ChunkScorer<'_> {
    #[inline]
    fn len_a(&self) -> usize {
        self.a.len() / self.chunk_size
    }
    #[inline]
    fn len_b(&self) -> usize {
        self.b.len() / self.chunk_size
    }
    #[inline]
    fn sub(&self, i: usize, j: usize) -> Score {
        let k = self.chunk_size;
        self.a[i * k..(i + 1) * k]
            .iter()
            .zip(&self.b[j * k..(j + 1) * k])
            .map(|(&x, &y)| self.model.sub(x, y))
            .sum()
    }
    #[inline]
    fn gaps(&self) -> GapCost {
        let g = self.model.gaps();
        GapCost::new(g.open, g.extend * self.chunk_size as Score)
    }
}

/// Two groups of already aligned, encoded rows. One step is one alignment column.
///
/// A column pair scores the mean of the pairwise substitutions over all row pairs
/// where neither symbol is a gap, truncated towards zero, or 0 when there is no such pair.
pub struct ProfileScorer<'a> {
    a: &'a [Vec<u8>],
    b: &'a [Vec<u8>],
    model: &'a ScoringModel,
    width_a: usize,
    width_b: usize,
}

impl<'a> ProfileScorer<'a> {
    pub fn new(
        a: &'a [Vec<u8>],
        b: &'a [Vec<u8>],
        model: &'a ScoringModel,
    ) -> Result<Self, AlignError> {
        Ok(Self {
            width_a: group_width(a)?,
            width_b: group_width(b)?,
            a,
            b,
            model,
        })
    }
}

/// The common length of the rows of a group.
fn group_width(rows: &[Vec<u8>]) -> Result<usize, AlignError> {
    let width = rows.first().map_or(0, |r| r.len());
    match rows.iter().find(|r| r.len() != width) {
        Some(r) => Err(AlignError::UnequalLength {
            len_a: width,
            len_b: r.len(),
        }),
        None => Ok(width),
    }
}

impl Scorer for ProfileScorer<'_> {
    #[inline]
    fn len_a(&self) -> usize {
        self.width_a
    }
    #[inline]
    fn len_b(&self) -> usize {
        self.width_b
    }
    fn sub(&self, i: usize, j: usize) -> Score {
        let mut total = 0;
        let mut pairs = 0;
        for x in self.a.iter().map(|r| r[i]).filter(|&x| x != GAP) {
            for y in self.b.iter().map(|r| r[j]).filter(|&y| y != GAP) {
                total += self.model.sub(x, y);
                pairs += 1;
            }
        }
        if pairs == 0 {
            0
        } else {
            total / pairs
        }
    }
    #[inline]
    fn gaps(&self) -> GapCost {
        self.model.gaps()
    }
}
