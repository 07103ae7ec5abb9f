// ABOUTME: Thumbnail renderer backed by a source image file
// ABOUTME: Scales the image to each requested size while preserving aspect ratio on a transparent canvas

use anyhow::{Context, Result};
use gcode_thumbnails::{ThumbnailData, ThumbnailRenderer, ThumbnailsList, ThumbnailsParams};
use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgba, RgbaImage};
use std::path::Path;

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);
const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

#[derive(Debug, Clone)]
pub struct ScalingConfig {
    pub preserve_aspect_ratio: bool,
    pub quality: FilterType,
}

impl Default for ScalingConfig {
    fn default() -> Self {
        Self {
            preserve_aspect_ratio: true,
            quality: FilterType::Lanczos3, // High quality scaling
        }
    }
}

pub struct ImageRenderer {
    source: DynamicImage,
    config: ScalingConfig,
}

impl ImageRenderer {
    pub fn new(source: DynamicImage) -> Self {
        Self {
            source,
            config: ScalingConfig::default(),
        }
    }

    pub fn with_config(source: DynamicImage, config: ScalingConfig) -> Self {
        Self { source, config }
    }

    pub fn open<P: AsRef<Path>>(path: P, config: ScalingConfig) -> Result<Self> {
        let source = image::open(&path)
            .with_context(|| format!("Failed to load image: {}", path.as_ref().display()))?;
        log::debug!(
            "Loaded source image {} ({}x{})",
            path.as_ref().display(),
            source.width(),
            source.height()
        );
        Ok(Self::with_config(source, config))
    }

    /// Scale the source to exactly `width` x `height` on a transparent canvas
    pub fn render_size(&self, width: u32, height: u32) -> ThumbnailData {
        self.render_on(width, height, TRANSPARENT)
    }

    fn render_on(&self, width: u32, height: u32, background: Rgba<u8>) -> ThumbnailData {
        if width == 0 || height == 0 || self.source.width() == 0 || self.source.height() == 0 {
            return ThumbnailData::from_rgba(width, height, Vec::new());
        }

        let canvas = if self.config.preserve_aspect_ratio {
            let scaled = self
                .source
                .resize(width, height, self.config.quality)
                .to_rgba8();
            let mut canvas = RgbaImage::from_pixel(width, height, background);
            let x = (width - scaled.width()) / 2;
            let y = (height - scaled.height()) / 2;
            imageops::overlay(&mut canvas, &scaled, x as i64, y as i64);
            canvas
        } else {
            self.source
                .resize_exact(width, height, self.config.quality)
                .to_rgba8()
        };

        ThumbnailData::from_rgba(width, height, canvas.into_raw())
    }
}

impl ThumbnailRenderer for ImageRenderer {
    fn render(&self, params: &ThumbnailsParams) -> ThumbnailsList {
        let background = if params.transparent_background {
            TRANSPARENT
        } else {
            WHITE
        };
        params
            .sizes
            .iter()
            .map(|&(width, height)| self.render_on(width, height, background))
            .collect()
    }
}
