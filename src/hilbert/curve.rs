//! N-dimensional Hilbert curve mapping between a linear index and grid coordinates.
//!
//! A curve of dimension `D` and order `K` covers `2^(D*K)` indices and a grid of
//! `2^K` cells per axis. Each index digit (a group of `D` bits, most significant
//! first) is Gray-coded and rotated into the current sub-cube frame; the frame is
//! tracked by a small `entry`/`direction` state machine local to each lookup.
//!
//! The mapping is a bijection, and consecutive indices land on grid cells that
//! differ by exactly one along a single axis.

use std::iter::FusedIterator;

use log::debug;

use super::bits::{
    bit_range, gray_code, inverse_gray_code, inverse_transform, rotate_left, set_bit,
    trailing_set_bits, transform,
};
use crate::error::{Error, Result};

/// Largest supported `dimension * order`; indices are stored in a `u64`.
pub const MAX_INDEX_BITS: u32 = 63;

/// Entry point of the sub-cube visited by digit `w`.
#[inline]
fn entry_point(w: u64) -> u64 {
    if w == 0 {
        0
    } else {
        gray_code(2 * ((w - 1) / 2))
    }
}

/// Axis along which the sub-cube visited by digit `w` is traversed.
#[inline]
fn intra_direction(w: u64, dimension: u32) -> u32 {
    if w == 0 {
        0
    } else if w % 2 == 0 {
        trailing_set_bits(w - 1, dimension) % dimension
    } else {
        trailing_set_bits(w, dimension) % dimension
    }
}

/// Hilbert curve of a fixed dimension and order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HilbertCurve {
    dimension: u32,
    order: u32,
}

impl HilbertCurve {
    /// Create a curve with `dimension` axes of `2^order` cells each.
    pub fn new(dimension: u32, order: u32) -> Result<Self> {
        let bits = dimension.checked_mul(order);
        match bits {
            Some(bits) if dimension > 0 && order > 0 && bits <= MAX_INDEX_BITS => {
                debug!("hilbert curve: dimension={dimension} order={order} len={}", 1u64 << bits);
                Ok(Self { dimension, order })
            }
            _ => Err(Error::InvalidCurveSize {
                dimension,
                size: bits
                    .and_then(|b| 1u64.checked_shl(b))
                    .unwrap_or(u64::MAX),
            }),
        }
    }

    /// Create the curve covering exactly `size` indices.
    ///
    /// `size` must be `2^(dimension * order)` for some positive order.
    pub fn from_size(dimension: u32, size: u64) -> Result<Self> {
        let invalid = Error::InvalidCurveSize { dimension, size };
        if dimension == 0 || !size.is_power_of_two() {
            return Err(invalid);
        }

        let bits = size.trailing_zeros();
        if bits == 0 || bits % dimension != 0 {
            return Err(invalid);
        }

        Self::new(dimension, bits / dimension).map_err(|_| invalid)
    }

    /// Number of axes.
    #[inline]
    pub fn dimension(&self) -> u32 {
        self.dimension
    }

    /// Bits per axis.
    #[inline]
    pub fn order(&self) -> u32 {
        self.order
    }

    /// Total number of indices, `2^(dimension * order)`.
    #[inline]
    pub fn len(&self) -> u64 {
        1u64 << (self.dimension * self.order)
    }

    /// Always false: a valid curve has at least two cells.
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Cells per axis, `2^order`.
    #[inline]
    pub fn side(&self) -> u64 {
        1u64 << self.order
    }

    /// Extent of every axis.
    pub fn dimensions(&self) -> Vec<u64> {
        vec![self.side(); self.dimension as usize]
    }

    /// Coordinates of the cell at `index`.
    pub fn point(&self, index: u64) -> Result<Vec<u64>> {
        let mut coords = vec![0u64; self.dimension as usize];
        self.point_into(index, &mut coords)?;
        Ok(coords)
    }

    /// Write the coordinates of the cell at `index` into `out`.
    ///
    /// `out` must hold exactly `dimension` values.
    pub fn point_into(&self, index: u64, out: &mut [u64]) -> Result<()> {
        debug_assert_eq!(out.len(), self.dimension as usize);
        if index >= self.len() {
            return Err(Error::IndexOutOfRange {
                index,
                len: self.len(),
            });
        }

        let dim = self.dimension;
        let order = self.order;
        let index_bits = dim * order;

        out.fill(0);
        let mut entry = 0u64;
        let mut direction = 0u32;

        for step in 0..order {
            let w = bit_range(index, index_bits, step * dim, step * dim + dim);
            let l = inverse_transform(entry, direction, dim, gray_code(w));

            for (axis, coord) in (0u32..).zip(out.iter_mut()) {
                let bit = bit_range(l, dim, axis, axis + 1);
                *coord = set_bit(*coord, order, step, bit == 1);
            }

            entry ^= rotate_left(entry_point(w), direction + 1, dim);
            direction = (direction + intra_direction(w, dim) + 1) % dim;
        }

        Ok(())
    }

    /// Index of the cell at `coords`; the inverse of [`HilbertCurve::point`].
    pub fn index(&self, coords: &[u64]) -> Result<u64> {
        let side = self.side();
        if coords.len() != self.dimension as usize || coords.iter().any(|&c| c >= side) {
            return Err(Error::PointOutOfRange {
                point: coords.to_vec(),
                side,
                dimension: self.dimension,
            });
        }

        let dim = self.dimension;
        let order = self.order;

        let mut index = 0u64;
        let mut entry = 0u64;
        let mut direction = 0u32;

        for step in 0..order {
            let mut l = 0u64;
            for (shift, &coord) in coords.iter().rev().enumerate() {
                l |= bit_range(coord, order, step, step + 1) << shift;
            }

            let w = inverse_gray_code(transform(entry, direction, dim, l));

            entry ^= rotate_left(entry_point(w), direction + 1, dim);
            direction = (direction + intra_direction(w, dim) + 1) % dim;
            index = (index << dim) | w;
        }

        Ok(index)
    }

    /// Iterate over every `(index, coordinates)` pair in ascending index order.
    pub fn points(&self) -> Points {
        Points {
            curve: *self,
            next: 0,
            end: self.len(),
        }
    }
}

impl IntoIterator for &HilbertCurve {
    type Item = (u64, Vec<u64>);
    type IntoIter = Points;

    fn into_iter(self) -> Points {
        self.points()
    }
}

/// Lazy walk along a [`HilbertCurve`], produced by [`HilbertCurve::points`].
#[derive(Debug, Clone)]
pub struct Points {
    curve: HilbertCurve,
    next: u64,
    end: u64,
}

impl Iterator for Points {
    type Item = (u64, Vec<u64>);

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.end {
            return None;
        }
        let index = self.next;
        self.next += 1;
        // index < len by construction
        self.curve.point(index).ok().map(|p| (index, p))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::try_from(self.end - self.next).unwrap_or(usize::MAX);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Points {}

impl FusedIterator for Points {}
