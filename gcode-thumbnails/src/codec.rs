// ABOUTME: Codec dispatcher turning raw RGBA thumbnails into PNG, JPG, or QOI buffers
// ABOUTME: Encoder failures yield an empty buffer so one bad preview never aborts an export

use crate::buffer::CompressedBuffer;
use crate::constants::codec::{CHANNELS, DEFAULT_JPEG_QUALITY};
use crate::data::ThumbnailData;
use crate::format::ThumbnailFormat;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{self, PngEncoder};
use image::codecs::qoi::QoiEncoder;
use image::{ExtendedColorType, ImageEncoder, ImageResult};
use std::io::Cursor;
use typed_builder::TypedBuilder;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PngCompression {
    Fast,
    #[default]
    Default,
    Best,
}

impl PngCompression {
    fn compression_type(self) -> png::CompressionType {
        match self {
            PngCompression::Fast => png::CompressionType::Fast,
            PngCompression::Default => png::CompressionType::Default,
            PngCompression::Best => png::CompressionType::Best,
        }
    }
}

#[derive(Debug, Clone, PartialEq, TypedBuilder)]
pub struct CodecConfig {
    #[builder(default = DEFAULT_JPEG_QUALITY)]
    pub jpeg_quality: u8,

    #[builder(default)]
    pub png_compression: PngCompression,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ThumbnailCodec {
    config: CodecConfig,
}

impl ThumbnailCodec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: CodecConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Encode a thumbnail. Invalid input or an encoder error gives an empty buffer.
    pub fn compress(&self, data: &ThumbnailData, format: ThumbnailFormat) -> CompressedBuffer {
        if !data.is_valid() {
            log::debug!(
                "Refusing to encode degenerate {}x{} thumbnail",
                data.width,
                data.height
            );
            return CompressedBuffer::empty(format);
        }

        let mut out = Vec::new();
        let result = match format {
            ThumbnailFormat::Png => self.encode_png(data, &mut out),
            ThumbnailFormat::Jpg => self.encode_jpg(data, &mut out),
            ThumbnailFormat::Qoi => encode_qoi(data, &mut out),
        };

        match result {
            Ok(()) => {
                log::debug!(
                    "Encoded {}x{} thumbnail as {} ({} bytes)",
                    data.width,
                    data.height,
                    format,
                    out.len()
                );
                CompressedBuffer::new(format, out)
            }
            Err(e) => {
                log::warn!(
                    "Failed to encode {}x{} thumbnail as {}: {}",
                    data.width,
                    data.height,
                    format,
                    e
                );
                CompressedBuffer::empty(format)
            }
        }
    }

    fn encode_png(&self, data: &ThumbnailData, out: &mut Vec<u8>) -> ImageResult<()> {
        let encoder = PngEncoder::new_with_quality(
            Cursor::new(out),
            self.config.png_compression.compression_type(),
            png::FilterType::Adaptive,
        );
        encoder.write_image(
            &data.pixels,
            data.width,
            data.height,
            ExtendedColorType::Rgba8,
        )
    }

    fn encode_jpg(&self, data: &ThumbnailData, out: &mut Vec<u8>) -> ImageResult<()> {
        // JPEG carries no alpha channel
        let rgb: Vec<u8> = data
            .pixels
            .chunks_exact(CHANNELS)
            .flat_map(|px| [px[0], px[1], px[2]])
            .collect();

        let encoder = JpegEncoder::new_with_quality(Cursor::new(out), self.config.jpeg_quality);
        encoder.write_image(&rgb, data.width, data.height, ExtendedColorType::Rgb8)
    }
}

fn encode_qoi(data: &ThumbnailData, out: &mut Vec<u8>) -> ImageResult<()> {
    QoiEncoder::new(Cursor::new(out)).write_image(
        &data.pixels,
        data.width,
        data.height,
        ExtendedColorType::Rgba8,
    )
}

/// Encode with default codec settings
pub fn compress_thumbnail(data: &ThumbnailData, format: ThumbnailFormat) -> CompressedBuffer {
    ThumbnailCodec::new().compress(data, format)
}
