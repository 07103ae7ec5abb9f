// ABOUTME: Shared render-compress loop behind the ASCII and binary embedders
// ABOUTME: Owns skip accounting and cooperative cancellation between thumbnails

use crate::buffer::CompressedBuffer;
use crate::codec::{CodecConfig, ThumbnailCodec};
use crate::data::{ThumbnailData, ThumbnailRenderer, ThumbnailsParams};
use crate::error::Result;
use crate::format::ThumbnailFormat;
use crate::report::EmbedReport;

/// Runs the renderer once, encodes each valid thumbnail, and hands the
/// result to a framing strategy.
#[derive(Debug, Clone, Default)]
pub struct ThumbnailExporter {
    codec: ThumbnailCodec,
}

impl ThumbnailExporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: CodecConfig) -> Self {
        Self {
            codec: ThumbnailCodec::with_config(config),
        }
    }

    pub fn codec(&self) -> &ThumbnailCodec {
        &self.codec
    }

    /// `emit` returns whether the thumbnail made it into the output.
    /// The cancel check runs after every thumbnail, valid or not.
    pub(crate) fn run<C, E>(
        &self,
        renderer: Option<&dyn ThumbnailRenderer>,
        sizes: &[(u32, u32)],
        format: ThumbnailFormat,
        mut is_cancelled: C,
        mut emit: E,
    ) -> Result<EmbedReport>
    where
        C: FnMut() -> bool,
        E: FnMut(&ThumbnailData, CompressedBuffer) -> Result<bool>,
    {
        let mut report = EmbedReport::default();

        let Some(renderer) = renderer else {
            log::debug!("No thumbnail renderer set, nothing to embed");
            return Ok(report);
        };
        if sizes.is_empty() {
            return Ok(report);
        }

        let thumbnails = renderer.render(&ThumbnailsParams::all_extras(sizes));
        let total = thumbnails.len();

        for (index, data) in thumbnails.iter().enumerate() {
            if !data.is_valid() {
                log::debug!(
                    "Skipping invalid {}x{} thumbnail",
                    data.width,
                    data.height
                );
                report.skipped_invalid += 1;
            } else {
                let compressed = self.codec.compress(data, format);
                if compressed.is_empty() {
                    log::warn!(
                        "{} encoder produced no data for {}x{} thumbnail, skipping",
                        format,
                        data.width,
                        data.height
                    );
                    report.skipped_empty += 1;
                } else if emit(data, compressed)? {
                    report.emitted += 1;
                } else {
                    report.skipped_invalid += 1;
                }
            }

            if is_cancelled() {
                if index + 1 < total {
                    log::info!(
                        "Thumbnail export cancelled after {} of {} thumbnails",
                        index + 1,
                        total
                    );
                    report.cancelled = true;
                }
                break;
            }
        }

        Ok(report)
    }
}
