use thiserror::Error;

/// Errors reported by the alignment entry points.
///
/// DP is deterministic, so none of these are worth retrying.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AlignError {
    #[error("sequence length {len} is not a multiple of chunk size {chunk_size}")]
    LengthNotDivisible { len: usize, chunk_size: usize },
    #[error("chunk size must be positive")]
    ZeroChunkSize,
    #[error("aligned rows differ in length: {len_a} vs {len_b}")]
    UnequalLength { len_a: usize, len_b: usize },
    #[error("symbol {:?} at position {position} is not in the scoring alphabet", as_char(.symbol))]
    OutOfRangeSymbol { symbol: u8, position: usize },
    #[error("the aligner pool has been shut down")]
    PoolClosed,
}

fn as_char(symbol: &u8) -> char {
    char::from(*symbol)
}
