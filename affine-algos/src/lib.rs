//! Affine-gap pairwise alignment by dynamic programming.
//!
//! [`Engine`] is the entry point. It owns the scoring model and all DP buffers and
//! reuses them between calls. Two backends compute identical alignments:
//! - [`full::FullDp`] keeps the complete traceback matrix,
//! - [`tiled::TiledDp`] keeps only tile boundaries and replays the traceback tile by tile.

mod edit_graph;
mod front;

pub mod cli;
pub mod full;
pub mod pool;
pub mod profile;
pub mod scorer;
pub mod tiled;

#[cfg(test)]
mod tests;

pub use pool::{align_batch, AlignerPool, Finished, Job};
pub use profile::merge_groups;
pub use tiled::TileSize;

use affine_types::*;
use clap::ValueEnum;
use full::FullDp;
use log::debug;
use scorer::{ChunkScorer, PairScorer, Scorer};
use serde::{Deserialize, Serialize};
use tiled::TiledDp;

/// How the ends of the alignment are scored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum Mode {
    /// Every gap is charged, also at the ends.
    #[default]
    Global,
    /// Leading and trailing deletions from the first sequence are free, so the
    /// second sequence can be placed anywhere inside the first.
    FreeEndGaps,
}

/// Which DP engine computes the alignment. Both return the same alignment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum Backend {
    /// Full traceback matrix: `O(nm)` memory.
    #[default]
    Full,
    /// Tile boundaries only: `O((n + m) * max(n, m) / tile)` memory plus one tile.
    Tiled,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignParams {
    pub mode: Mode,
    pub backend: Backend,
    /// Only used by [`Backend::Tiled`].
    pub tile_size: TileSize,
    /// Number of symbols per DP step. Both sequence lengths must be multiples of it.
    pub chunk_size: usize,
    pub preset: ScoringPreset,
}

impl Default for AlignParams {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            backend: Backend::default(),
            tile_size: TileSize::default(),
            chunk_size: 1,
            preset: ScoringPreset::default(),
        }
    }
}

impl AlignParams {
    /// An engine with these params and the scoring model of `self.preset`.
    pub fn make_engine(&self) -> Engine {
        Engine::new(self.preset.model(), *self)
    }
}

/// An aligner with reusable buffers.
///
/// Buffers grow to the largest input seen and are only released by [`Engine::reset`].
/// An engine is meant to be owned by a single thread; give each worker its own.
pub struct Engine {
    model: ScoringModel,
    params: AlignParams,
    /// Encoded copies of the current inputs.
    a: Vec<u8>,
    b: Vec<u8>,
    full: FullDp,
    tiled: TiledDp,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("model", &self.model)
            .field("params", &self.params)
            .finish()
    }
}

/// Run `scorer` through the requested backend.
fn run<S: Scorer>(
    full: &mut FullDp,
    tiled: &mut TiledDp,
    backend: Backend,
    scorer: &S,
    mode: Mode,
) -> Alignment {
    match backend {
        Backend::Full => full.run(scorer, mode),
        Backend::Tiled => tiled.run(scorer, mode),
    }
}

impl Engine {
    pub fn new(model: ScoringModel, params: AlignParams) -> Self {
        Self {
            model,
            params,
            a: vec![],
            b: vec![],
            full: FullDp::default(),
            tiled: TiledDp::new(params.tile_size),
        }
    }

    pub fn model(&self) -> &ScoringModel {
        &self.model
    }

    pub fn params(&self) -> &AlignParams {
        &self.params
    }

    /// Global alignment with the full-trace engine.
    pub fn align_global(&mut self, a: Seq, b: Seq) -> Result<Alignment, AlignError> {
        self.align_with(a, b, Mode::Global, Backend::Full, 1)
    }

    /// Place `query` inside `target` without charging for the unaligned ends of `target`.
    pub fn align_local_free_end_gaps(
        &mut self,
        target: Seq,
        query: Seq,
    ) -> Result<Alignment, AlignError> {
        self.align_with(target, query, Mode::FreeEndGaps, Backend::Full, 1)
    }

    /// Global alignment with the tiled engine, using the configured tile size.
    pub fn align_global_tiled(&mut self, a: Seq, b: Seq) -> Result<Alignment, AlignError> {
        self.align_with(a, b, Mode::Global, Backend::Tiled, 1)
    }

    /// Global alignment over chunks of `chunk_size` symbols. Run lengths of the
    /// returned cigar are in symbols, so each is a multiple of `chunk_size`.
    pub fn align_chunked(
        &mut self,
        a: Seq,
        b: Seq,
        chunk_size: usize,
    ) -> Result<Alignment, AlignError> {
        self.align_with(a, b, Mode::Global, self.params.backend, chunk_size)
    }

    fn align_with(
        &mut self,
        a: Seq,
        b: Seq,
        mode: Mode,
        backend: Backend,
        chunk_size: usize,
    ) -> Result<Alignment, AlignError> {
        encode_into(a, &mut self.a)?;
        encode_into(b, &mut self.b)?;
        debug!(
            "align {}x{} {mode:?} {backend:?} chunk size {chunk_size}",
            a.len(),
            b.len()
        );
        if chunk_size == 1 {
            let scorer = PairScorer {
                a: &self.a,
                b: &self.b,
                model: &self.model,
            };
            return Ok(run(&mut self.full, &mut self.tiled, backend, &scorer, mode));
        }
        let scorer = ChunkScorer::new(&self.a, &self.b, &self.model, chunk_size)?;
        let mut aln = run(&mut self.full, &mut self.tiled, backend, &scorer, mode);
        aln.cigar.scale(chunk_size);
        Ok(aln)
    }

    /// Release all buffers.
    pub fn reset(&mut self) {
        self.a = vec![];
        self.b = vec![];
        self.full.reset();
        self.tiled.reset();
    }
}

impl Aligner for Engine {
    /// Align according to the engine's [`AlignParams`].
    fn align(&mut self, a: Seq, b: Seq) -> Result<Alignment, AlignError> {
        let AlignParams {
            mode,
            backend,
            chunk_size,
            ..
        } = self.params;
        self.align_with(a, b, mode, backend, chunk_size)
    }
}

pub fn align_global(a: Seq, b: Seq, model: &ScoringModel) -> Result<Alignment, AlignError> {
    Engine::new(*model, AlignParams::default()).align_global(a, b)
}

pub fn align_local_free_end_gaps(
    target: Seq,
    query: Seq,
    model: &ScoringModel,
) -> Result<Alignment, AlignError> {
    Engine::new(*model, AlignParams::default()).align_local_free_end_gaps(target, query)
}

pub fn align_global_tiled(
    a: Seq,
    b: Seq,
    model: &ScoringModel,
    tile_size: TileSize,
) -> Result<Alignment, AlignError> {
    let params = AlignParams {
        backend: Backend::Tiled,
        tile_size,
        ..AlignParams::default()
    };
    Engine::new(*model, params).align_global_tiled(a, b)
}

pub fn align_chunked(
    a: Seq,
    b: Seq,
    model: &ScoringModel,
    chunk_size: usize,
) -> Result<Alignment, AlignError> {
    Engine::new(*model, AlignParams::default()).align_chunked(a, b, chunk_size)
}
