//! Aligning groups of already aligned sequences, and a simple progressive
//! multiple alignment on top of it.

use crate::scorer::{ProfileScorer, Scorer};
use crate::{run, Engine, Mode};
use affine_types::*;
use log::debug;

impl Engine {
    /// Globally align two groups of aligned rows, one DP step per column.
    ///
    /// Rows are ASCII with `-` for gaps. All rows of a group must have equal length.
    pub fn align_profiles(
        &mut self,
        a: &[Sequence],
        b: &[Sequence],
    ) -> Result<Alignment, AlignError> {
        let encode_group = |rows: &[Sequence]| {
            rows.iter()
                .map(|r| encode_aligned(r))
                .collect::<Result<Vec<_>, _>>()
        };
        let (a, b) = (encode_group(a)?, encode_group(b)?);
        let scorer = ProfileScorer::new(&a, &b, &self.model)?;
        debug!(
            "align profiles of {} and {} rows, widths {} and {}",
            a.len(),
            b.len(),
            scorer.len_a(),
            scorer.len_b()
        );
        Ok(run(
            &mut self.full,
            &mut self.tiled,
            self.params.backend,
            &scorer,
            Mode::Global,
        ))
    }

    /// Align `seqs` into one group, adding them one at a time in the given order.
    ///
    /// Returns one row per input sequence, all of the same width.
    pub fn align_progressive(&mut self, seqs: &[Sequence]) -> Result<Vec<Sequence>, AlignError> {
        for seq in seqs {
            encode(seq)?;
        }
        let Some((first, rest)) = seqs.split_first() else {
            return Ok(vec![]);
        };
        let mut group = vec![first.clone()];
        for seq in rest {
            let single = std::slice::from_ref(seq);
            let aln = self.align_profiles(&group, single)?;
            group = merge_groups(&group, single, &aln.cigar);
        }
        Ok(group)
    }
}

/// Apply an alignment of two groups: rows of `a` get a gap column for every
/// insertion, rows of `b` one for every deletion. Returns the rows of `a` followed by those of `b`.
///
/// Panics when `cigar` does not cover the widths of both groups.
pub fn merge_groups(a: &[Sequence], b: &[Sequence], cigar: &Cigar) -> Vec<Sequence> {
    let width = |rows: &[Sequence]| rows.first().map_or(0, |r| r.len());
    assert_eq!(cigar.len_a(), width(a), "cigar {cigar} does not cover group a");
    assert_eq!(cigar.len_b(), width(b), "cigar {cigar} does not cover group b");

    let expand_row = |row: &Sequence, takes: fn((usize, usize)) -> usize| {
        let mut out = Vec::with_capacity(row.len());
        let mut col = row.iter();
        for e in cigar {
            for _ in 0..e.cnt {
                match takes(e.op.delta()) {
                    1 => out.extend(col.next()),
                    _ => out.push(GAP_CHAR),
                }
            }
        }
        out
    };
    let rows_a = a.iter().map(|r| expand_row(r, |(di, _)| di));
    let rows_b = b.iter().map(|r| expand_row(r, |(_, dj)| dj));
    rows_a.chain(rows_b).collect()
}
