//! Reference engine: two rolling score rows and the complete traceback matrix.
//!
//! Memory is `O(n * m)` for the trace. Used for small inputs and as the baseline
//! the tiled engine is checked against.

use crate::edit_graph::{left_trace, top_trace, EditGraph};
use crate::front::{Front, TraceMatrix};
use crate::scorer::Scorer;
use crate::Mode;
use affine_types::{AlignState, Alignment, Cigar};
use log::debug;

/// Buffers of the full-trace engine, recycled between calls.
#[derive(Default, Debug)]
pub struct FullDp {
    prev: Front,
    next: Front,
    trace: TraceMatrix,
}

impl FullDp {
    pub fn run<S: Scorer>(&mut self, scorer: &S, mode: Mode) -> Alignment {
        let g = EditGraph::new(scorer, mode);
        let (n, m) = (g.len_a(), g.len_b());
        debug!("full dp {n}x{m} {mode:?}");

        self.trace.reset(n + 1, m + 1);
        g.first_row(&mut self.prev);
        for j in 1..=m {
            self.trace.set(0, j, top_trace());
        }

        self.next.reset(m + 1);
        for i in 1..=n {
            self.next.set(0, g.left(self.prev.get(0)));
            self.trace.set(i, 0, left_trace());
            let trace = &mut self.trace;
            g.next_row(i, 0, &self.prev, &mut self.next, |j, t| trace.set(i, j, t));
            std::mem::swap(&mut self.prev, &mut self.next);
        }

        let (score, state) = self.prev.get(m).best();
        Alignment {
            score,
            cigar: self.traceback(n, m, state),
        }
    }

    /// Walk the pointers from `(i, j)` in `state` back to the origin.
    fn traceback(&self, mut i: usize, mut j: usize, mut state: AlignState) -> Cigar {
        let mut cigar = Cigar::default();
        while i > 0 || j > 0 {
            cigar.push(state);
            let parent = self.trace.get(i, j).parent(state);
            let (di, dj) = state.delta();
            i -= di;
            j -= dj;
            state = parent;
        }
        cigar.reverse();
        cigar
    }

    /// Drop all buffers.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::scorer::PairScorer;
    use affine_types::{encode, ScoringModel};

    fn align(a: &[u8], b: &[u8], mode: Mode) -> Alignment {
        let model = ScoringModel::default();
        let (a, b) = (encode(a).unwrap(), encode(b).unwrap());
        FullDp::default().run(
            &PairScorer {
                a: &a,
                b: &b,
                model: &model,
            },
            mode,
        )
    }

    #[test]
    fn empty_inputs() {
        let aln = align(b"", b"", Mode::Global);
        assert_eq!(aln.score, 0);
        assert!(aln.cigar.is_empty());

        let aln = align(b"ACG", b"", Mode::Global);
        assert_eq!(aln.score, -400 - 3 * 30);
        assert_eq!(aln.cigar.to_string(), "3D");

        let aln = align(b"", b"AC", Mode::Global);
        assert_eq!(aln.score, -400 - 2 * 30);
        assert_eq!(aln.cigar.to_string(), "2I");
    }

    #[test]
    fn leading_deletion() {
        let aln = align(b"ACGT", b"CGT", Mode::Global);
        assert_eq!(aln.cigar.to_string(), "1D3M");
        assert_eq!(aln.score, -430 + 100 + 100 + 91);
    }

    #[test]
    fn free_end_gaps_embed_query() {
        let aln = align(b"TTTTACGTTTTT", b"ACG", Mode::FreeEndGaps);
        assert_eq!(aln.score, 91 + 100 + 100);
        assert_eq!(aln.cigar.to_string(), "4D3M5D");
    }
}
