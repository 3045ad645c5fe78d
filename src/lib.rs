//! Binvis - binary visualizer on Hilbert curves.
//!
//! This library paints an arbitrary byte buffer onto a raster image. Pixel
//! positions are visited in Hilbert curve order, so bytes that are close in the
//! buffer stay close on the canvas, and each pixel is colored by:
//! - Byte class (null, control, printable ASCII, high, 0xFF)
//! - Byte value as a grey gradient
//! - Local Shannon entropy over a 32-byte window
//!
//! ```no_run
//! use std::path::Path;
//! use binvis::{visualize, ColorMode, VisualizeConfig};
//!
//! let data = std::fs::read("/bin/ls")?;
//! let config = VisualizeConfig::default().with_color_mode(ColorMode::Entropy);
//! visualize(&data, Path::new("ls.png"), &config)?;
//! # Ok::<(), binvis::Error>(())
//! ```

pub mod analysis;
pub mod config;
pub mod error;
pub mod hilbert;
pub mod viz;

pub use config::{VisualizeConfig, DEFAULT_IMAGE_SIZE};
pub use error::{Error, Result};
pub use hilbert::HilbertCurve;
pub use viz::{
    render, save_png, visualize, visualize_to_image, ColorMode, ColorSource, Highlight, Layout,
    Sampling,
};
