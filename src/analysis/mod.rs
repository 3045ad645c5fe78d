//! Byte statistics used to classify buffer regions.
//!
//! This module provides:
//! - Whole-buffer Shannon entropy
//! - Windowed, alphabet-normalised entropy at a buffer offset
//! - The symbol map bounding the entropy alphabet

pub mod entropy;

pub use entropy::{calculate_entropy, window_entropy, SymbolMap, ENTROPY_BLOCK_SIZE};
