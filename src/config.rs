//! Visualization settings.

use crate::viz::{ColorMode, Highlight, Layout, Sampling};

/// Default tile edge in pixels.
pub const DEFAULT_IMAGE_SIZE: u32 = 256;

/// Everything a single visualization request needs besides the buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VisualizeConfig {
    pub color_mode: ColorMode,
    /// Tile edge; must be a power of two.
    pub image_size: u32,
    pub layout: Layout,
    pub highlight: Option<Highlight>,
    pub sampling: Sampling,
}

impl Default for VisualizeConfig {
    fn default() -> Self {
        Self {
            color_mode: ColorMode::default(),
            image_size: DEFAULT_IMAGE_SIZE,
            layout: Layout::default(),
            highlight: None,
            sampling: Sampling::default(),
        }
    }
}

impl VisualizeConfig {
    pub fn with_color_mode(mut self, color_mode: ColorMode) -> Self {
        self.color_mode = color_mode;
        self
    }

    pub fn with_image_size(mut self, image_size: u32) -> Self {
        self.image_size = image_size;
        self
    }

    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_highlight(mut self, highlight: Option<Highlight>) -> Self {
        self.highlight = highlight;
        self
    }

    pub fn with_sampling(mut self, sampling: Sampling) -> Self {
        self.sampling = sampling;
        self
    }
}
