//! `EditGraph` is the affine recurrence shared by all engines: how the three
//! layers of a cell follow from its parents, including the DP borders.
//!
//! The transitions are
//! M(i,j) = max(M, I, D)(i-1, j-1) + sub(a[i-1], b[j-1])
//! I(i,j) = max(M + open + extend, I + extend, D + open + extend)(i, j-1)
//! D(i,j) = max(M + open + extend, I + open + extend, D + extend)(i-1, j)
//!
//! With free end gaps, deletions along the first and last column cost nothing,
//! so a short `b` can be placed anywhere inside `a`.

use crate::front::{Cell, Front, TraceCell};
use crate::scorer::Scorer;
use crate::Mode;
use affine_types::{AlignState, GapCost, Score, NEG_INF};

/// Maximum of the three layers with its layer tag.
///
/// Ties go to `Match`, then `Ins`, then `Del`. Changing this order changes which of
/// several optimal paths is reported.
#[inline]
pub fn triple_max(m: Score, ins: Score, del: Score) -> (Score, AlignState) {
    if m >= ins && m >= del {
        (m, AlignState::Match)
    } else if ins >= del {
        (ins, AlignState::Ins)
    } else {
        (del, AlignState::Del)
    }
}

/// Traceback pointers of the cells in row 0: the path can only run along the border.
#[inline]
pub fn top_trace() -> TraceCell {
    TraceCell::uniform(AlignState::Ins)
}

/// Traceback pointers of the cells in column 0.
#[inline]
pub fn left_trace() -> TraceCell {
    TraceCell::uniform(AlignState::Del)
}

/// The DP graph over the `(len_a + 1) x (len_b + 1)` grid of a scorer.
pub struct EditGraph<'s, S: Scorer> {
    scorer: &'s S,
    gaps: GapCost,
    free_end_gaps: bool,
}

impl<'s, S: Scorer> EditGraph<'s, S> {
    pub fn new(scorer: &'s S, mode: Mode) -> Self {
        Self {
            scorer,
            gaps: scorer.gaps(),
            free_end_gaps: mode == Mode::FreeEndGaps,
        }
    }

    #[inline]
    pub fn len_a(&self) -> usize {
        self.scorer.len_a()
    }

    #[inline]
    pub fn len_b(&self) -> usize {
        self.scorer.len_b()
    }

    /// Cell `(0, 0)`.
    #[inline]
    pub fn origin(&self) -> Cell {
        Cell {
            m: 0,
            ins: self.gaps.open,
            del: if self.free_end_gaps { 0 } else { self.gaps.open },
        }
    }

    /// Cell `(0, j)` for `j > 0`, given cell `(0, j - 1)`. Only insertions are reachable.
    #[inline]
    pub fn top(&self, left: Cell) -> Cell {
        Cell {
            m: NEG_INF,
            ins: left.ins + self.gaps.extend,
            del: NEG_INF,
        }
    }

    /// Cell `(i, 0)` for `i > 0`, given cell `(i - 1, 0)`. Only deletions are reachable.
    #[inline]
    pub fn left(&self, up: Cell) -> Cell {
        let extend = if self.free_end_gaps { 0 } else { self.gaps.extend };
        Cell {
            m: NEG_INF,
            ins: NEG_INF,
            del: up.del + extend,
        }
    }

    /// Interior cell `(i, j)`, with `i, j > 0`, from its three parents.
    #[inline]
    pub fn relax(&self, i: usize, j: usize, diag: Cell, left: Cell, up: Cell) -> (Cell, TraceCell) {
        let GapCost { open, extend } = self.gaps;
        let (m, m_parent) = diag.best();
        let m = m + self.scorer.sub(i - 1, j - 1);

        let (ins, ins_parent) = triple_max(left.m + open + extend, left.ins + extend, left.del + open + extend);

        // Trailing deletions in the last column are free as well.
        let (del_first, del_extend) = if self.free_end_gaps && j == self.len_b() {
            (0, 0)
        } else {
            (open + extend, extend)
        };
        let (del, del_parent) = triple_max(up.m + del_first, up.ins + del_first, up.del + del_extend);

        (
            Cell { m, ins, del },
            TraceCell::new(m_parent, ins_parent, del_parent),
        )
    }

    /// Fill global row 0 over the full width.
    pub fn first_row(&self, row: &mut Front) {
        row.reset(self.len_b() + 1);
        let mut cell = self.origin();
        row.set(0, cell);
        for j in 1..=self.len_b() {
            cell = self.top(cell);
            row.set(j, cell);
        }
    }

    /// Compute global row `i > 0` from row `i - 1`, both stored starting at column `j0`.
    ///
    /// `next[0]`, the cell `(i, j0)`, must already be set. `trace` receives the pointers
    /// of every computed cell by its index in the front.
    #[inline]
    pub fn next_row(
        &self,
        i: usize,
        j0: usize,
        prev: &Front,
        next: &mut Front,
        mut trace: impl FnMut(usize, TraceCell),
    ) {
        debug_assert!(i > 0);
        debug_assert_eq!(prev.len(), next.len());
        let mut left = next.get(0);
        let mut diag = prev.get(0);
        for idx in 1..next.len() {
            let up = prev.get(idx);
            let (cell, t) = self.relax(i, j0 + idx, diag, left, up);
            next.set(idx, cell);
            trace(idx, t);
            left = cell;
            diag = up;
        }
    }
}
