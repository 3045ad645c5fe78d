//! Windowed Shannon entropy and byte alphabet analysis.
//!
//! The window score is normalised by `log(min(block_size, symbols))`, so a
//! window that uses every symbol it could possibly hold scores 1.0 and a run of
//! a single byte scores 0.0.

use crate::error::{Error, Result};

/// Window size used by the entropy color mode.
pub const ENTROPY_BLOCK_SIZE: usize = 32;

/// Count byte occurrences.
#[inline]
fn count_bytes(data: &[u8], out: &mut [u32; 256]) {
    out.fill(0);
    for &byte in data {
        out[byte as usize] += 1;
    }
}

/// Calculate Shannon entropy of a whole slice in bits per byte (0 to 8).
pub fn calculate_entropy(data: &[u8]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }

    let mut counts = [0u32; 256];
    count_bytes(data, &mut counts);

    let total = data.len() as f64;
    counts
        .iter()
        .filter(|&&c| c > 0)
        .map(|&c| {
            let p = c as f64 / total;
            -p * p.log2()
        })
        .sum()
}

/// Entropy of the `block_size` window around `offset`.
///
/// The window starts `block_size / 2` bytes before `offset`, clamped to the
/// start of the buffer; near the end it starts at `len - block_size / 2` and is
/// cut short by the buffer end. Frequencies are always taken over `block_size`
/// and logarithms use base `min(block_size, symbols)`.
///
/// # Errors
/// [`Error::BufferTooSmallForWindow`] if `data` is shorter than `block_size`,
/// [`Error::InvalidWindow`] if `block_size` is zero.
pub fn window_entropy(data: &[u8], block_size: usize, offset: usize, symbols: usize) -> Result<f64> {
    if block_size == 0 {
        return Err(Error::InvalidWindow);
    }
    if data.len() < block_size {
        return Err(Error::BufferTooSmallForWindow {
            len: data.len(),
            block_size,
        });
    }

    let half = block_size / 2;
    let start = if offset < half {
        0
    } else if offset > data.len() - half {
        data.len() - half
    } else {
        offset - half
    };
    let end = (start + block_size).min(data.len());

    let base = block_size.min(symbols);
    if base < 2 {
        // A one-symbol alphabet carries no information
        return Ok(0.0);
    }

    let mut counts = [0u32; 256];
    count_bytes(&data[start..end], &mut counts);

    let ln_base = (base as f64).ln();
    let total = block_size as f64;
    let sum: f64 = counts
        .iter()
        .filter(|&&c| c > 0)
        .map(|&c| {
            let p = c as f64 / total;
            p * (p.ln() / ln_base)
        })
        .sum();

    Ok(-sum)
}

/// Dense ranking of the distinct byte values present in a buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolMap {
    ranks: [Option<u8>; 256],
    len: usize,
}

impl SymbolMap {
    /// Rank every distinct byte of `data` in ascending byte order.
    pub fn from_data(data: &[u8]) -> Self {
        let mut counts = [0u32; 256];
        count_bytes(data, &mut counts);

        let mut ranks = [None; 256];
        let mut len = 0usize;
        for (byte, _) in counts.iter().enumerate().filter(|&(_, &c)| c > 0) {
            // len < 256 here, one rank per distinct byte
            ranks[byte] = Some(len as u8);
            len += 1;
        }

        Self { ranks, len }
    }

    /// Number of distinct byte values.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Dense rank of `byte`, if it occurs in the buffer.
    #[inline]
    pub fn rank(&self, byte: u8) -> Option<u8> {
        self.ranks[byte as usize]
    }

    #[inline]
    pub fn contains(&self, byte: u8) -> bool {
        self.ranks[byte as usize].is_some()
    }
}
