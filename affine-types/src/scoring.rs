//! This module contains the substitution matrix, the affine `GapCost`, and the
//! named `ScoringPreset`s combining both.

use crate::{encode_aligned, AlignError, AlignState, Score, Seq, ALPHABET_SIZE, GAP};
use serde::{Deserialize, Serialize};

/// Substitution scores indexed by symbol rank (see [`crate::alphabet`]).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringMatrix {
    scores: [[Score; ALPHABET_SIZE]; ALPHABET_SIZE],
}

impl ScoringMatrix {
    pub const fn new(scores: [[Score; ALPHABET_SIZE]; ALPHABET_SIZE]) -> Self {
        Self { scores }
    }

    /// `matched` on the diagonal and `mismatch` everywhere else, including any pair with `N`.
    pub fn match_mismatch(matched: Score, mismatch: Score) -> Self {
        let mut scores = [[mismatch; ALPHABET_SIZE]; ALPHABET_SIZE];
        for (r, row) in scores.iter_mut().enumerate().take(ALPHABET_SIZE - 1) {
            row[r] = matched;
        }
        Self { scores }
    }

    /// Score of aligning ranks `a` and `b`. Panics on out-of-range ranks.
    #[inline]
    pub fn get(&self, a: u8, b: u8) -> Score {
        self.scores[a as usize][b as usize]
    }

    pub fn is_symmetric(&self) -> bool {
        (0..ALPHABET_SIZE).all(|a| (0..a).all(|b| self.scores[a][b] == self.scores[b][a]))
    }
}

/// Affine gap penalties. Both are usually negative.
///
/// A gap of length `l` scores `open + l * extend`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GapCost {
    /// Charged once when entering a gap.
    pub open: Score,
    /// Charged for every gap symbol, including the first.
    pub extend: Score,
}

impl GapCost {
    pub const fn new(open: Score, extend: Score) -> Self {
        Self { open, extend }
    }

    /// Score of a fresh gap run of length `len`.
    #[inline]
    pub fn run(&self, len: usize) -> Score {
        self.open + len as Score * self.extend
    }

    /// Score of the first step of a gap: `open + extend`.
    #[inline]
    pub fn first(&self) -> Score {
        self.open + self.extend
    }
}

/// A substitution matrix together with its gap costs.
///
/// This is a small `Copy` value, so aligners and worker threads each hold
/// their own copy and never share mutable scoring state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringModel {
    matrix: ScoringMatrix,
    gaps: GapCost,
}

const HOXD70: ScoringMatrix = ScoringMatrix::new([
    [91, -114, -31, -123, -44],
    [-114, 100, -125, -31, -43],
    [-31, -125, 100, -114, -43],
    [-123, -31, -114, 91, -44],
    [-44, -43, -43, -44, -43],
]);

const HUMAN_CHIMP: ScoringMatrix = ScoringMatrix::new([
    [90, -330, -236, -356, -208],
    [-330, 100, -318, -236, -196],
    [-236, -318, 100, -330, -196],
    [-356, -236, -330, 90, -208],
    [-208, -196, -196, -208, -202],
]);

impl Default for ScoringModel {
    fn default() -> Self {
        ScoringPreset::Default.model()
    }
}

impl ScoringModel {
    pub const fn new(matrix: ScoringMatrix, gaps: GapCost) -> Self {
        Self { matrix, gaps }
    }

    /// Unit-style scores: `matched` / `mismatch` substitutions and the given gaps.
    pub fn match_mismatch(matched: Score, mismatch: Score, open: Score, extend: Score) -> Self {
        Self::new(
            ScoringMatrix::match_mismatch(matched, mismatch),
            GapCost::new(open, extend),
        )
    }

    #[inline]
    pub fn matrix(&self) -> &ScoringMatrix {
        &self.matrix
    }

    #[inline]
    pub fn gaps(&self) -> GapCost {
        self.gaps
    }

    /// Substitution score of two ranks.
    #[inline]
    pub fn sub(&self, a: u8, b: u8) -> Score {
        self.matrix.get(a, b)
    }

    /// Score a finished alignment given as two rendered rows with `-` for gaps.
    ///
    /// Every maximal run of insertions or deletions is charged `open + len * extend`.
    /// Columns with a gap in both rows are ignored.
    pub fn score_alignment(&self, row_a: Seq, row_b: Seq) -> Result<Score, AlignError> {
        if row_a.len() != row_b.len() {
            return Err(AlignError::UnequalLength {
                len_a: row_a.len(),
                len_b: row_b.len(),
            });
        }
        let row_a = encode_aligned(row_a)?;
        let row_b = encode_aligned(row_b)?;
        let mut score = 0;
        let mut last = AlignState::Match;
        for (&x, &y) in row_a.iter().zip(&row_b) {
            let state = match (x == GAP, y == GAP) {
                (true, true) => continue,
                (false, false) => {
                    score += self.sub(x, y);
                    AlignState::Match
                }
                (true, false) => AlignState::Ins,
                (false, true) => AlignState::Del,
            };
            if state != AlignState::Match {
                score += self.gaps.extend;
                if state != last {
                    score += self.gaps.open;
                }
            }
            last = state;
        }
        Ok(score)
    }
}

/// Named scoring schemes. They only differ in their values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum ScoringPreset {
    /// HOXD70-style nucleotide scores, gap open -400, extend -30.
    #[default]
    Default,
    /// Scores tuned for closely related primate genomes, gap open -600, extend -150.
    HumanChimp,
}

impl ScoringPreset {
    pub fn model(&self) -> ScoringModel {
        match self {
            ScoringPreset::Default => ScoringModel::new(HOXD70, GapCost::new(-400, -30)),
            ScoringPreset::HumanChimp => ScoringModel::new(HUMAN_CHIMP, GapCost::new(-600, -150)),
        }
    }
}
