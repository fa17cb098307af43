//! DP state storage: per-cell scores of the three layers, rows/columns of them
//! (`Front`), and packed traceback pointers.

use affine_types::{AlignState, Score, NEG_INF};
use std::fmt::Debug;

/// Scores of the three layers at one DP position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub m: Score,
    pub ins: Score,
    pub del: Score,
}

impl Cell {
    /// The best layer of this cell, breaking ties as `Match`, then `Ins`, then `Del`.
    #[inline]
    pub fn best(&self) -> (Score, AlignState) {
        crate::edit_graph::triple_max(self.m, self.ins, self.del)
    }
}

/// A contiguous row or column of DP cells, one vector per layer.
///
/// Index 0 is the first stored position; callers keep track of the offset.
#[derive(Clone, Default)]
pub struct Front {
    /// The main layer.
    m: Vec<Score>,
    /// The insertion layer.
    ins: Vec<Score>,
    /// The deletion layer.
    del: Vec<Score>,
}

impl Debug for Front {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Front")
            .field("m", &self.m)
            .field("ins", &self.ins)
            .field("del", &self.del)
            .finish()
    }
}

impl Front {
    /// Resize to `len` unreachable cells, reusing the allocations.
    pub fn reset(&mut self, len: usize) {
        for l in [&mut self.m, &mut self.ins, &mut self.del] {
            l.clear();
            l.resize(len, NEG_INF);
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.m.len()
    }

    #[inline]
    pub fn get(&self, idx: usize) -> Cell {
        Cell {
            m: self.m[idx],
            ins: self.ins[idx],
            del: self.del[idx],
        }
    }

    #[inline]
    pub fn set(&mut self, idx: usize, cell: Cell) {
        self.m[idx] = cell.m;
        self.ins[idx] = cell.ins;
        self.del[idx] = cell.del;
    }

    /// Overwrite this front with `src[start..start + self.len()]`.
    pub fn copy_window(&mut self, src: &Front, start: usize) {
        let end = start + self.len();
        self.m.copy_from_slice(&src.m[start..end]);
        self.ins.copy_from_slice(&src.ins[start..end]);
        self.del.copy_from_slice(&src.del[start..end]);
    }

    /// Overwrite this front with a full copy of `src`, reusing the allocations.
    pub fn clone_from_front(&mut self, src: &Front) {
        self.m.clone_from(&src.m);
        self.ins.clone_from(&src.ins);
        self.del.clone_from(&src.del);
    }

    /// Total number of stored scores, over all layers.
    pub fn num_scores(&self) -> usize {
        3 * self.len()
    }
}

/// Traceback pointers of one cell: for each layer, the layer of its parent.
///
/// Packed as three 2-bit codes: bits 0-1 for `Match`, 2-3 for `Ins`, 4-5 for `Del`.
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct TraceCell(u8);

impl Debug for TraceCell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TraceCell({:06b})", self.0)
    }
}

impl TraceCell {
    #[inline]
    pub fn new(m: AlignState, ins: AlignState, del: AlignState) -> Self {
        Self(Self::code(m) | Self::code(ins) << 2 | Self::code(del) << 4)
    }

    /// All three layers point to `state`. Used on the DP borders.
    #[inline]
    pub fn uniform(state: AlignState) -> Self {
        Self::new(state, state, state)
    }

    #[inline]
    fn code(state: AlignState) -> u8 {
        match state {
            AlignState::Match => 0,
            AlignState::Ins => 1,
            AlignState::Del => 2,
        }
    }

    #[inline]
    fn shift(state: AlignState) -> u8 {
        2 * Self::code(state)
    }

    /// The layer the path came from when it is in `state` at this cell.
    ///
    /// Panics on a corrupt code: continuing would silently produce a wrong path.
    #[inline]
    pub fn parent(&self, state: AlignState) -> AlignState {
        match (self.0 >> Self::shift(state)) & 0b11 {
            0 => AlignState::Match,
            1 => AlignState::Ins,
            2 => AlignState::Del,
            code => panic!("unexpected traceback code {code} for {state:?} in {self:?}"),
        }
    }

    #[cfg(test)]
    pub(crate) fn from_raw(raw: u8) -> Self {
        Self(raw)
    }
}

/// A dense `rows x cols` matrix of traceback pointers, reusable between calls.
#[derive(Clone, Default, Debug)]
pub struct TraceMatrix {
    cells: Vec<TraceCell>,
    cols: usize,
}

impl TraceMatrix {
    /// Resize to `rows x cols`, reusing the allocation.
    pub fn reset(&mut self, rows: usize, cols: usize) {
        self.cells.clear();
        self.cells.resize(rows * cols, TraceCell::default());
        self.cols = cols;
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> TraceCell {
        self.cells[i * self.cols + j]
    }

    #[inline]
    pub fn set(&mut self, i: usize, j: usize, cell: TraceCell) {
        self.cells[i * self.cols + j] = cell;
    }
}
