//! Hilbert curve indexing.
//!
//! This module provides:
//! - Gray-code and bit-field primitives the curve is built from
//! - The N-dimensional curve itself, index to coordinates and back

pub mod bits;
pub mod curve;

pub use curve::{HilbertCurve, Points, MAX_INDEX_BITS};
