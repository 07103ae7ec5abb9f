// ABOUTME: Raw rendered thumbnails and the renderer interface that produces them
// ABOUTME: The renderer is external; this module only fixes the shape of its input and output

use crate::constants::codec::CHANNELS;
use typed_builder::TypedBuilder;

/// One rendered preview: RGBA8 pixels, row-major, top row first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThumbnailData {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl ThumbnailData {
    /// Transparent thumbnail of the given size
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * CHANNELS],
        }
    }

    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Degenerate thumbnails are skipped by the embedders, never encoded
    pub fn is_valid(&self) -> bool {
        self.width != 0
            && self.height != 0
            && self.pixels.len() == self.width as usize * self.height as usize * CHANNELS
    }
}

/// Request passed to the renderer. The flags belong to the renderer; the
/// embedders always ask for everything.
#[derive(Debug, Clone, PartialEq, TypedBuilder)]
pub struct ThumbnailsParams {
    pub sizes: Vec<(u32, u32)>,

    #[builder(default = true)]
    pub printable_only: bool,

    #[builder(default = true)]
    pub parts_only: bool,

    #[builder(default = true)]
    pub show_bed: bool,

    #[builder(default = true)]
    pub transparent_background: bool,
}

impl ThumbnailsParams {
    pub fn all_extras(sizes: &[(u32, u32)]) -> Self {
        Self::builder().sizes(sizes.to_vec()).build()
    }
}

pub type ThumbnailsList = Vec<ThumbnailData>;

pub trait ThumbnailRenderer {
    /// Render one thumbnail per requested size, in any order the renderer likes
    fn render(&self, params: &ThumbnailsParams) -> ThumbnailsList;
}

impl<F> ThumbnailRenderer for F
where
    F: Fn(&ThumbnailsParams) -> ThumbnailsList,
{
    fn render(&self, params: &ThumbnailsParams) -> ThumbnailsList {
        self(params)
    }
}
