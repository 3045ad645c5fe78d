//! Buffer visualization on Hilbert curve canvases.
//!
//! This module contains:
//! - Color sources mapping bytes to pixels (class, gradient, entropy)
//! - The canvas renderer and PNG output
//! - One-call entry points tying both to a [`VisualizeConfig`]

mod render;
mod source;

use std::path::Path;

use image::RgbImage;
use log::{info, log_enabled, Level};

pub use render::{render, save_png, Layout, Sampling, MAX_CANVAS_PIXELS};
pub use source::{
    class_color, entropy_color, gradient_color, ColorMode, ColorSource, Highlight, ASCII_BLUE,
    BLACK, HIGH_RED, LOW_GREEN, WHITE,
};

use crate::analysis::calculate_entropy;
use crate::config::VisualizeConfig;
use crate::error::Result;

/// Render `data` to a canvas without writing it anywhere.
pub fn visualize_to_image(data: &[u8], config: &VisualizeConfig) -> Result<RgbImage> {
    let source = ColorSource::new(data, config.color_mode, config.highlight)?;
    render(&source, config.image_size, config.layout, config.sampling)
}

/// Render `data` and write the PNG to `output`.
///
/// Nothing is written unless the whole canvas rendered successfully.
pub fn visualize(data: &[u8], output: &Path, config: &VisualizeConfig) -> Result<()> {
    let canvas = visualize_to_image(data, config)?;
    save_png(&canvas, output)?;
    log_summary(data, output, &canvas, config);
    Ok(())
}

/// Log a one-line render summary; returns whether it was emitted.
///
/// The whole-buffer entropy pass only runs when `info` is enabled.
fn log_summary(data: &[u8], output: &Path, canvas: &RgbImage, config: &VisualizeConfig) -> bool {
    if !log_enabled!(Level::Info) {
        return false;
    }
    info!(
        "{}: {}x{} {} {} ({} bytes, {:.3} bits/byte)",
        output.display(),
        canvas.width(),
        canvas.height(),
        config.layout,
        config.color_mode,
        data.len(),
        calculate_entropy(data)
    );
    true
}
