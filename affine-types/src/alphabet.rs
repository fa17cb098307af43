//! Mapping between ASCII nucleotides and the dense ranks used to index scoring matrices.

use crate::{AlignError, Seq};

/// Number of scored symbols: `A C G T N`.
pub const ALPHABET_SIZE: usize = 5;

/// Rank of the gap marker. Never used to index a scoring matrix.
pub const GAP: u8 = u8::MAX;

/// The gap character used in rendered alignments.
pub const GAP_CHAR: u8 = b'-';

const SYMBOLS: [u8; ALPHABET_SIZE] = *b"ACGTN";

const INVALID: u8 = u8::MAX - 1;

/// ASCII -> rank lookup table. Lowercase maps to the same rank as uppercase.
static RANKS: [u8; 256] = {
    let mut table = [INVALID; 256];
    let mut r = 0;
    while r < ALPHABET_SIZE {
        table[SYMBOLS[r] as usize] = r as u8;
        table[SYMBOLS[r].to_ascii_lowercase() as usize] = r as u8;
        r += 1;
    }
    table[GAP_CHAR as usize] = GAP;
    table
};

/// The rank of `symbol`, or `None` for bytes outside the alphabet (including the gap).
#[inline]
pub fn rank(symbol: u8) -> Option<u8> {
    match RANKS[symbol as usize] {
        INVALID | GAP => None,
        r => Some(r),
    }
}

/// The uppercase symbol with the given rank.
#[inline]
pub fn symbol(rank: u8) -> u8 {
    if rank == GAP {
        GAP_CHAR
    } else {
        SYMBOLS[rank as usize]
    }
}

/// Encode `seq` into ranks, reusing the allocation of `out`.
///
/// Gaps are rejected: they cannot be looked up in a scoring matrix.
pub fn encode_into(seq: Seq, out: &mut Vec<u8>) -> Result<(), AlignError> {
    out.clear();
    out.reserve(seq.len());
    for (position, &c) in seq.iter().enumerate() {
        out.push(rank(c).ok_or(AlignError::OutOfRangeSymbol {
            symbol: c,
            position,
        })?);
    }
    Ok(())
}

pub fn encode(seq: Seq) -> Result<Vec<u8>, AlignError> {
    let mut out = vec![];
    encode_into(seq, &mut out)?;
    Ok(out)
}

/// Encode a row of a multiple alignment. Gaps are kept as [`GAP`].
pub fn encode_aligned(row: Seq) -> Result<Vec<u8>, AlignError> {
    row.iter()
        .enumerate()
        .map(|(position, &c)| match RANKS[c as usize] {
            INVALID => Err(AlignError::OutOfRangeSymbol {
                symbol: c,
                position,
            }),
            r => Ok(r),
        })
        .collect()
}
