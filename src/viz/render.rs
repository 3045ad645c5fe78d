//! Canvas rendering along the Hilbert curve.
//!
//! The renderer walks a 2-D curve over a `size x size` tile and paints each
//! cell with the color of the byte at a proportional buffer offset. Two
//! layouts are supported:
//! - **Unrolled**: four tiles stacked vertically, the buffer spread over
//!   `4 * size^2` cells
//! - **Square**: a single tile, the buffer spread over `size^2` cells
//!
//! Optimizations:
//! - Exact integer offset scaling (no float rounding at tile boundaries)
//! - Parallel color sampling in bounded chunks, painted in index order

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use image::{ImageFormat, Rgb, RgbImage};
use log::debug;
use rayon::prelude::*;

use super::source::ColorSource;
use crate::error::{self, Error, Result};
use crate::hilbert::HilbertCurve;

/// Curve indices sampled per parallel batch.
const SAMPLE_CHUNK: u64 = 16 * 1024;

/// Largest canvas allocated, in pixels (12 GiB of RGB).
pub const MAX_CANVAS_PIXELS: u64 = 1 << 32;

/// Canvas layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Layout {
    /// Four stacked tiles, `size x 4*size` pixels.
    #[default]
    Unrolled,
    /// One tile, `size x size` pixels.
    Square,
}

impl Layout {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Unrolled => "unrolled",
            Self::Square => "square",
        }
    }

    pub fn all() -> &'static [Self] {
        &[Self::Unrolled, Self::Square]
    }

    /// Number of full curve traversals stacked on the canvas.
    #[inline]
    pub fn passes(self) -> u32 {
        match self {
            Self::Unrolled => 4,
            Self::Square => 1,
        }
    }

    /// Canvas `(width, height)` for a tile edge of `size`.
    ///
    /// Fails with [`Error::InvalidConfig`] above [`MAX_CANVAS_PIXELS`].
    pub fn canvas_size(self, size: u32) -> Result<(u32, u32)> {
        let too_large = || {
            error::config(format!(
                "{} canvas of tile size {size} exceeds {MAX_CANVAS_PIXELS} pixels",
                self.name()
            ))
        };
        let height = size.checked_mul(self.passes()).ok_or_else(too_large)?;
        if u64::from(size) * u64::from(height) > MAX_CANVAS_PIXELS {
            return Err(too_large());
        }
        Ok((size, height))
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Layout {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|layout| layout.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| error::config(format!("unknown layout '{s}' (expected unrolled or square)")))
    }
}

/// How curve cells are sampled from the color source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Sampling {
    /// Walk the curve lazily on the calling thread.
    Sequential,
    /// Sample chunks of indices on the rayon pool.
    #[default]
    Parallel,
}

impl Sampling {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Sequential => "sequential",
            Self::Parallel => "parallel",
        }
    }

    pub fn all() -> &'static [Self] {
        &[Self::Sequential, Self::Parallel]
    }
}

impl fmt::Display for Sampling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Sampling {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|sampling| sampling.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                error::config(format!("unknown sampling '{s}' (expected sequential or parallel)"))
            })
    }
}

/// Buffer offset for curve position `position` out of `total`: `floor(position * len / total)`.
#[inline]
fn sample_offset(position: u64, len: usize, total: u64) -> usize {
    // position < total, so the quotient is < len
    ((u128::from(position) * len as u128) / u128::from(total)) as usize
}

fn paint_sequential(
    canvas: &mut RgbImage,
    curve: &HilbertCurve,
    source: &ColorSource<'_>,
    base: u64,
    total: u64,
    y_shift: u32,
) -> Result<()> {
    for (index, point) in curve.points() {
        let color = source.color_at(sample_offset(base + index, source.len(), total))?;
        canvas.put_pixel(point[0] as u32, point[1] as u32 + y_shift, color);
    }
    Ok(())
}

fn paint_parallel(
    canvas: &mut RgbImage,
    curve: &HilbertCurve,
    source: &ColorSource<'_>,
    base: u64,
    total: u64,
    y_shift: u32,
) -> Result<()> {
    let len = curve.len();
    for chunk_start in (0..len).step_by(SAMPLE_CHUNK as usize) {
        let chunk_end = (chunk_start + SAMPLE_CHUNK).min(len);

        let samples = (chunk_start..chunk_end)
            .into_par_iter()
            .map(|index| -> Result<([u64; 2], Rgb<u8>)> {
                let mut point = [0u64; 2];
                curve.point_into(index, &mut point)?;
                let color = source.color_at(sample_offset(base + index, source.len(), total))?;
                Ok((point, color))
            })
            .collect::<Result<Vec<_>>>()?;

        for ([x, y], color) in samples {
            canvas.put_pixel(x as u32, y as u32 + y_shift, color);
        }
    }
    Ok(())
}

/// Paint `source` onto a new canvas with tile edge `size`.
///
/// # Errors
/// - [`Error::EmptyBuffer`] if the source has no bytes
/// - [`Error::InvalidCurveSize`] if `size` is not a power of two of at least 2
/// - [`Error::InvalidConfig`] if the canvas would exceed [`MAX_CANVAS_PIXELS`]
/// - any error from [`ColorSource::color_at`]
pub fn render(
    source: &ColorSource<'_>,
    size: u32,
    layout: Layout,
    sampling: Sampling,
) -> Result<RgbImage> {
    if source.is_empty() {
        return Err(Error::EmptyBuffer);
    }

    let curve = HilbertCurve::from_size(2, u64::from(size) * u64::from(size))?;
    let (width, height) = layout.canvas_size(size)?;
    let passes = u64::from(layout.passes());
    let total = curve.len() * passes;

    debug!(
        "render: layout={layout} mode={} canvas={width}x{height} bytes={} cells={total} sampling={sampling}",
        source.mode(),
        source.len()
    );

    let mut canvas = RgbImage::new(width, height);
    for pass in 0..layout.passes() {
        let base = u64::from(pass) * curve.len();
        let y_shift = pass * size;
        match sampling {
            Sampling::Sequential => {
                paint_sequential(&mut canvas, &curve, source, base, total, y_shift)?;
            }
            Sampling::Parallel => {
                paint_parallel(&mut canvas, &curve, source, base, total, y_shift)?;
            }
        }
    }

    Ok(canvas)
}

/// Encode `canvas` as PNG at `path`.
pub fn save_png(canvas: &RgbImage, path: &Path) -> Result<()> {
    canvas.save_with_format(path, ImageFormat::Png)?;
    debug!("wrote {}x{} PNG to {}", canvas.width(), canvas.height(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viz::source::{ColorMode, Highlight};

    fn pseudo_random(len: usize) -> Vec<u8> {
        // xorshift, deterministic across runs
        let mut state = 0x2545_F491_4F6C_DD1Du64;
        (0..len)
            .map(|_| {
                state ^= state << 13;
                state ^= state >> 7;
                state ^= state << 17;
                (state >> 24) as u8
            })
            .collect()
    }

    #[test]
    fn test_sample_offset_is_exact_floor() {
        assert_eq!(sample_offset(0, 1000, 64), 0);
        assert_eq!(sample_offset(63, 1000, 64), 984);
        assert_eq!(sample_offset(32, 1000, 64), 500);
        // Fewer bytes than cells repeats bytes
        assert_eq!(sample_offset(3, 1, 64), 0);
        assert_eq!(sample_offset(63, 1, 64), 0);
        // Huge buffers do not overflow
        assert_eq!(sample_offset(u64::MAX - 1, usize::MAX, u64::MAX), usize::MAX - 1);
    }

    #[test]
    fn test_square_maps_index_to_curve_cell() {
        // One byte per cell: each cell shows exactly the byte at its curve index
        let size = 16u32;
        let data = pseudo_random(256);
        let source = ColorSource::new(&data, ColorMode::Gradient, None).unwrap();
        let canvas = render(&source, size, Layout::Square, Sampling::Sequential).unwrap();
        assert_eq!(canvas.dimensions(), (16, 16));

        let curve = HilbertCurve::from_size(2, 256).unwrap();
        for (index, point) in curve.points() {
            let byte = data[index as usize];
            assert_eq!(
                *canvas.get_pixel(point[0] as u32, point[1] as u32),
                Rgb([byte, byte, byte])
            );
        }
    }

    #[test]
    fn test_unrolled_stacks_four_passes() {
        let size = 8u32;
        let data = pseudo_random(4 * 64);
        let source = ColorSource::new(&data, ColorMode::Gradient, None).unwrap();
        let canvas = render(&source, size, Layout::Unrolled, Sampling::Sequential).unwrap();
        assert_eq!(canvas.dimensions(), (8, 32));

        let curve = HilbertCurve::from_size(2, 64).unwrap();
        for quad in 0..4u64 {
            for (index, point) in curve.points() {
                let byte = data[(index + quad * 64) as usize];
                let y = point[1] as u32 + quad as u32 * size;
                assert_eq!(*canvas.get_pixel(point[0] as u32, y), Rgb([byte, byte, byte]));
            }
        }
    }

    #[test]
    fn test_every_pixel_is_painted() {
        // A constant non-black byte makes unpainted (black) pixels visible
        let data = vec![0x80u8; 1000];
        let source = ColorSource::new(&data, ColorMode::Gradient, None).unwrap();
        for layout in [Layout::Square, Layout::Unrolled] {
            for sampling in [Sampling::Sequential, Sampling::Parallel] {
                let canvas = render(&source, 32, layout, sampling).unwrap();
                assert!(canvas.pixels().all(|p| *p == Rgb([0x80, 0x80, 0x80])));
            }
        }
    }

    #[test]
    fn test_small_buffer_still_fills_canvas() {
        let data = [0xFFu8];
        let source = ColorSource::new(&data, ColorMode::Class, None).unwrap();
        let canvas = render(&source, 4, Layout::Square, Sampling::Parallel).unwrap();
        assert!(canvas.pixels().all(|p| *p == Rgb([255, 255, 255])));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let data = pseudo_random(100_000);
        let highlight = Highlight::new(5_000, 9_000, Rgb([255, 0, 255]));
        for &mode in ColorMode::all() {
            let source = ColorSource::new(&data, mode, Some(highlight)).unwrap();
            for layout in [Layout::Square, Layout::Unrolled] {
                let sequential = render(&source, 128, layout, Sampling::Sequential).unwrap();
                let parallel = render(&source, 128, layout, Sampling::Parallel).unwrap();
                assert_eq!(sequential, parallel, "{mode} {layout}");
            }
        }
    }

    #[test]
    fn test_render_is_deterministic() {
        let data = pseudo_random(50_000);
        let source = ColorSource::new(&data, ColorMode::Entropy, None).unwrap();
        let first = render(&source, 64, Layout::Unrolled, Sampling::Parallel).unwrap();
        let second = render(&source, 64, Layout::Unrolled, Sampling::Parallel).unwrap();
        assert_eq!(first.as_raw(), second.as_raw());
    }

    #[test]
    fn test_render_errors() {
        let data = [1u8; 64];
        let source = ColorSource::new(&data, ColorMode::Class, None).unwrap();
        assert!(matches!(
            render(&source, 100, Layout::Square, Sampling::Sequential),
            Err(Error::InvalidCurveSize { .. })
        ));
        assert!(matches!(
            render(&source, 1, Layout::Square, Sampling::Sequential),
            Err(Error::InvalidCurveSize { .. })
        ));
        assert!(matches!(
            render(&source, 0, Layout::Unrolled, Sampling::Sequential),
            Err(Error::InvalidCurveSize { .. })
        ));

        // Valid curve sizes whose canvas is too large to allocate
        for layout in [Layout::Square, Layout::Unrolled] {
            assert!(matches!(
                render(&source, 1 << 31, layout, Sampling::Sequential),
                Err(Error::InvalidConfig(_))
            ));
        }
        assert!(matches!(
            render(&source, 1 << 17, Layout::Square, Sampling::Parallel),
            Err(Error::InvalidConfig(_))
        ));

        let empty: [u8; 0] = [];
        let source = ColorSource::new(&empty, ColorMode::Class, None).unwrap();
        assert!(matches!(
            render(&source, 16, Layout::Square, Sampling::Sequential),
            Err(Error::EmptyBuffer)
        ));
    }

    #[test]
    fn test_save_png() {
        let data = pseudo_random(4096);
        let source = ColorSource::new(&data, ColorMode::Hilbert, None).unwrap();
        let canvas = render(&source, 32, Layout::Unrolled, Sampling::Parallel).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        save_png(&canvas, &path).unwrap();

        let decoded = image::open(&path).unwrap().to_rgb8();
        assert_eq!(decoded, canvas);

        let missing = dir.path().join("no/such/dir/out.png");
        assert!(matches!(save_png(&canvas, &missing), Err(Error::ImageWriteFailure(_))));
    }

    #[test]
    fn test_parse_layout() {
        assert_eq!("unrolled".parse::<Layout>().unwrap(), Layout::Unrolled);
        assert_eq!("SQUARE".parse::<Layout>().unwrap(), Layout::Square);
        assert!("circle".parse::<Layout>().is_err());
        assert_eq!(Layout::default(), Layout::Unrolled);
        assert_eq!(Layout::Unrolled.canvas_size(256).unwrap(), (256, 1024));
        assert_eq!(Layout::Square.canvas_size(256).unwrap(), (256, 256));
        assert!(Layout::Unrolled.canvas_size(u32::MAX).is_err());
    }

    #[test]
    fn test_canvas_size_limit() {
        // 2^16 x 2^16 is exactly the cap, four stacked tiles are not
        assert_eq!(Layout::Square.canvas_size(1 << 16).unwrap(), (1 << 16, 1 << 16));
        assert!(matches!(
            Layout::Unrolled.canvas_size(1 << 16),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            Layout::Square.canvas_size(1 << 31),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_parse_sampling() {
        assert_eq!("sequential".parse::<Sampling>().unwrap(), Sampling::Sequential);
        assert_eq!("Parallel".parse::<Sampling>().unwrap(), Sampling::Parallel);
        assert!("threaded".parse::<Sampling>().is_err());
        assert_eq!(Sampling::default().to_string(), "parallel");
    }
}
