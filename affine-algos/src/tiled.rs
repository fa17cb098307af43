//! Tiled (checkerboard) engine: linear memory for scores, traceback replayed tile by tile.
//!
//! Pass 1 runs the recurrence over two rolling rows and snapshots every row `i` with
//! `i % rows == 0` and every column `j` with `j % cols == 0`. Pass 2 starts in the tile
//! holding `(n, m)`, recomputes the pointers of that tile from the snapshot row above it
//! and the snapshot column left of it, and walks back until the path leaves the tile
//! through its top row or left column. The exit cell and state are the entry of the
//! next tile. Row 0 and column 0 belong to no tile and are completed at the end.
//!
//! The pointers of a tile only depend on its boundary, so the path is exactly the one
//! [`crate::full::FullDp`] finds.

use crate::edit_graph::EditGraph;
use crate::front::{Front, TraceMatrix};
use crate::scorer::Scorer;
use crate::Mode;
use affine_types::{AlignState, Alignment, Cigar};
use log::{debug, trace};
use serde::{Deserialize, Serialize};

/// Size of the tiles the DP matrix is cut into, in DP steps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileSize {
    pub rows: usize,
    pub cols: usize,
}

impl Default for TileSize {
    fn default() -> Self {
        Self::square(10000)
    }
}

impl TileSize {
    pub fn new(rows: usize, cols: usize) -> Self {
        assert!(rows > 0 && cols > 0, "tile size must be positive, got {rows}x{cols}");
        Self { rows, cols }
    }

    pub fn square(size: usize) -> Self {
        Self::new(size, size)
    }
}

#[derive(Debug)]
pub struct TiledDp {
    tile_size: TileSize,
    /// Rolling rows of pass 1.
    prev: Front,
    next: Front,
    /// `rows[r]` is DP row `r * tile_size.rows`, over all columns.
    rows: Vec<Front>,
    /// `cols[c]` is DP column `c * tile_size.cols`, over all rows.
    cols: Vec<Front>,
    /// Pointers of the tile being replayed, in tile-local coordinates.
    tile: TraceMatrix,
    tile_prev: Front,
    tile_next: Front,
}

impl Default for TiledDp {
    fn default() -> Self {
        Self::new(TileSize::default())
    }
}

/// Resize to `count` fronts of `len` unreachable cells, reusing existing allocations.
fn reset_fronts(fronts: &mut Vec<Front>, count: usize, len: usize) {
    fronts.resize_with(count, Front::default);
    for f in fronts.iter_mut() {
        f.reset(len);
    }
}

impl TiledDp {
    pub fn new(tile_size: TileSize) -> Self {
        Self {
            tile_size,
            prev: Front::default(),
            next: Front::default(),
            rows: vec![],
            cols: vec![],
            tile: TraceMatrix::default(),
            tile_prev: Front::default(),
            tile_next: Front::default(),
        }
    }

    pub fn tile_size(&self) -> TileSize {
        self.tile_size
    }

    /// Number of scores held by the boundary snapshots of the last call.
    pub fn snapshot_scores(&self) -> usize {
        self.rows.iter().chain(&self.cols).map(Front::num_scores).sum()
    }

    pub fn run<S: Scorer>(&mut self, scorer: &S, mode: Mode) -> Alignment {
        let g = EditGraph::new(scorer, mode);
        let (n, m) = (g.len_a(), g.len_b());
        let TileSize { rows: tr, cols: tc } = self.tile_size;
        debug!(
            "tiled dp {n}x{m} {mode:?} with {tr}x{tc} tiles: {} row and {} column snapshots",
            n / tr + 1,
            m / tc + 1
        );

        self.fill_snapshots(&g);
        let (score, state) = self.prev.get(m).best();
        let cigar = self.replay(&g, state);
        Alignment { score, cigar }
    }

    /// Pass 1: all scores, keeping only the tile boundaries.
    fn fill_snapshots<S: Scorer>(&mut self, g: &EditGraph<S>) {
        let (n, m) = (g.len_a(), g.len_b());
        let TileSize { rows: tr, cols: tc } = self.tile_size;
        reset_fronts(&mut self.rows, n / tr + 1, m + 1);
        reset_fronts(&mut self.cols, m / tc + 1, n + 1);

        g.first_row(&mut self.prev);
        self.next.reset(m + 1);
        self.snapshot(0);
        for i in 1..=n {
            self.next.set(0, g.left(self.prev.get(0)));
            g.next_row(i, 0, &self.prev, &mut self.next, |_, _| {});
            std::mem::swap(&mut self.prev, &mut self.next);
            self.snapshot(i);
        }
    }

    /// Store the boundary cells of row `i`, currently in `self.prev`.
    fn snapshot(&mut self, i: usize) {
        let TileSize { rows: tr, cols: tc } = self.tile_size;
        if i % tr == 0 {
            self.rows[i / tr].clone_from_front(&self.prev);
        }
        for (c, col) in self.cols.iter_mut().enumerate() {
            col.set(i, self.prev.get(c * tc));
        }
    }

    /// Pass 2: walk back from `(n, m)` in `state`, one tile at a time.
    fn replay<S: Scorer>(&mut self, g: &EditGraph<S>, mut state: AlignState) -> Cigar {
        let TileSize { rows: tr, cols: tc } = self.tile_size;
        let mut cigar = Cigar::default();
        let (mut gi, mut gj) = (g.len_a(), g.len_b());

        while gi > 0 && gj > 0 {
            let (ti, tj) = ((gi - 1) / tr, (gj - 1) / tc);
            let (i0, j0) = (ti * tr, tj * tc);
            self.fill_tile(g, ti, tj, gi, gj);

            let (mut li, mut lj) = (gi - i0, gj - j0);
            while li > 0 && lj > 0 {
                cigar.push(state);
                let parent = self.tile.get(li, lj).parent(state);
                let (di, dj) = state.delta();
                li -= di;
                lj -= dj;
                state = parent;
            }
            trace!(
                "tile ({ti}, {tj}): entered at ({gi}, {gj}), left at ({}, {}) in {state:?}",
                i0 + li,
                j0 + lj
            );
            gi = i0 + li;
            gj = j0 + lj;
        }

        // Along column 0 only deletions and along row 0 only insertions are reachable.
        if gi > 0 {
            cigar.push_run(AlignState::Del, gi);
        } else if gj > 0 {
            cigar.push_run(AlignState::Ins, gj);
        }
        cigar.reverse();
        cigar
    }

    /// Recompute the pointers of tile `(ti, tj)` up to cell `(i1, j1)` from its snapshots.
    ///
    /// Cells right of or below the entry point cannot be on the path, so they are skipped.
    fn fill_tile<S: Scorer>(&mut self, g: &EditGraph<S>, ti: usize, tj: usize, i1: usize, j1: usize) {
        let TileSize { rows: tr, cols: tc } = self.tile_size;
        let (i0, j0) = (ti * tr, tj * tc);
        let width = j1 - j0 + 1;

        let Self {
            rows,
            cols,
            tile,
            tile_prev,
            tile_next,
            ..
        } = self;
        tile.reset(i1 - i0 + 1, width);
        tile_prev.reset(width);
        tile_prev.copy_window(&rows[ti], j0);
        tile_next.reset(width);
        for li in 1..=i1 - i0 {
            let i = i0 + li;
            tile_next.set(0, cols[tj].get(i));
            g.next_row(i, j0, tile_prev, tile_next, |lj, t| tile.set(li, lj, t));
            std::mem::swap(tile_prev, tile_next);
        }
    }

    /// Drop all buffers, keeping the tile size.
    pub fn reset(&mut self) {
        *self = Self::new(self.tile_size);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::full::FullDp;
    use crate::scorer::PairScorer;
    use affine_types::{encode, ScoringModel};

    fn both(a: &[u8], b: &[u8], tile: TileSize, mode: Mode) -> (Alignment, Alignment) {
        let model = ScoringModel::default();
        let (a, b) = (encode(a).unwrap(), encode(b).unwrap());
        let scorer = PairScorer {
            a: &a,
            b: &b,
            model: &model,
        };
        (
            FullDp::default().run(&scorer, mode),
            TiledDp::new(tile).run(&scorer, mode),
        )
    }

    #[test]
    fn matches_full_on_small_tiles() {
        let pairs: [(&[u8], &[u8]); 6] = [
            (b"ACGT", b"ACGT"),
            (b"ACGT", b"CGT"),
            (b"AGT", b"ACGT"),
            (b"CGCGCGCGCG", b"CGCGCGTTTTCGCG"),
            (b"TTGGGTCAATCAGCCAGTTTTTA", b"TTTGAGTGGGTCATCACCGATTTTAT"),
            (b"A", b"GGGGGGGGGGGG"),
        ];
        for (a, b) in pairs {
            for (r, c) in [(1, 1), (1, 3), (2, 2), (3, 1), (4, 5), (100, 100)] {
                for mode in [Mode::Global, Mode::FreeEndGaps] {
                    let (full, tiled) = both(a, b, TileSize::new(r, c), mode);
                    assert_eq!(full, tiled, "{r}x{c} {mode:?}");
                }
            }
        }
    }

    #[test]
    fn empty_sides_use_edge_completion() {
        let pairs: [(&[u8], &[u8]); 3] = [(b"", b"ACG"), (b"ACG", b""), (b"", b"")];
        for (a, b) in pairs {
            let (full, tiled) = both(a, b, TileSize::square(2), Mode::Global);
            assert_eq!(full, tiled);
        }
    }

    #[test]
    fn snapshots_are_sparse() {
        let model = ScoringModel::default();
        let a = encode(&[b'A'; 100]).unwrap();
        let scorer = PairScorer {
            a: &a,
            b: &a,
            model: &model,
        };
        let mut dp = TiledDp::new(TileSize::square(10));
        dp.run(&scorer, Mode::Global);
        assert_eq!(dp.snapshot_scores(), 3 * (11 * 101 + 11 * 101));
        assert!(dp.snapshot_scores() < 3 * 101 * 101);
    }

    #[test]
    #[should_panic(expected = "tile size must be positive")]
    fn zero_tile_size() {
        TileSize::new(0, 4);
    }
}
