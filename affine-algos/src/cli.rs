use crate::{AlignParams, Backend, Mode, TileSize};
use affine_types::ScoringPreset;
use clap::Parser;
use serde::{Deserialize, Serialize};

/// Alignment options, to be flattened into the arguments of a binary.
#[derive(Parser, Clone, Debug, Serialize, Deserialize)]
#[clap(next_help_heading = "Alignment")]
pub struct AlignArgs {
    /// Charge every gap, or make the ends of the first sequence free.
    #[clap(long, default_value_t, value_enum, display_order = 10)]
    pub mode: Mode,

    /// Keep the full traceback matrix, or only tile boundaries.
    #[clap(long, default_value_t, value_enum, display_order = 10)]
    pub backend: Backend,

    /// Tile height of the tiled backend.
    #[clap(long, default_value_t = 10000, hide_short_help = true)]
    pub tile_rows: usize,

    /// Tile width of the tiled backend.
    #[clap(long, default_value_t = 10000, hide_short_help = true)]
    pub tile_cols: usize,

    /// Symbols per DP step. Sequence lengths must be multiples of it.
    #[clap(long, default_value_t = 1)]
    pub chunk_size: usize,

    /// Substitution matrix and gap costs.
    #[clap(long, default_value_t, value_enum)]
    pub preset: ScoringPreset,
}

impl AlignArgs {
    /// Panics when a tile dimension is 0.
    pub fn params(&self) -> AlignParams {
        AlignParams {
            mode: self.mode,
            backend: self.backend,
            tile_size: TileSize::new(self.tile_rows, self.tile_cols),
            chunk_size: self.chunk_size,
            preset: self.preset,
        }
    }
}
