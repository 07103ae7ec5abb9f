// ABOUTME: Embeds compressed preview thumbnails into G-code toolpath files
// ABOUTME: Provides codec dispatch plus ASCII comment and binary block framing

pub mod ascii;
pub mod binary;
pub mod buffer;
pub mod codec;
pub mod constants;
pub mod data;
pub mod error;
pub mod exporter;
pub mod format;
pub mod report;
pub mod sizes;

pub use ascii::{encode_ascii_thumbnail, export_thumbnails_to_file, write_ascii_thumbnail};
pub use binary::{ThumbnailBlock, generate_binary_thumbnails};
pub use buffer::CompressedBuffer;
pub use codec::{CodecConfig, PngCompression, ThumbnailCodec, compress_thumbnail};
pub use data::{ThumbnailData, ThumbnailRenderer, ThumbnailsList, ThumbnailsParams};
pub use error::{Result, ThumbnailError};
pub use exporter::ThumbnailExporter;
pub use format::ThumbnailFormat;
pub use report::EmbedReport;
pub use sizes::{ThumbnailEntry, parse_sizes, parse_thumbnail_list};

/// Output of one embedding run, selected by the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmbeddedThumbnails {
    Ascii(String),
    Binary(Vec<ThumbnailBlock>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmbedTarget {
    #[default]
    Ascii,
    Binary,
}

impl ThumbnailExporter {
    /// Run either strategy and collect its output in memory
    pub fn embed<C>(
        &self,
        target: EmbedTarget,
        renderer: Option<&dyn ThumbnailRenderer>,
        sizes: &[(u32, u32)],
        format: ThumbnailFormat,
        is_cancelled: C,
    ) -> Result<(EmbeddedThumbnails, EmbedReport)>
    where
        C: FnMut() -> bool,
    {
        match target {
            EmbedTarget::Ascii => {
                let mut text = String::new();
                let report = self.export_ascii(
                    renderer,
                    sizes,
                    format,
                    |s: &str| {
                        text.push_str(s);
                        Ok(())
                    },
                    is_cancelled,
                )?;
                Ok((EmbeddedThumbnails::Ascii(text), report))
            }
            EmbedTarget::Binary => {
                let mut blocks = Vec::new();
                let report =
                    self.export_binary(renderer, &mut blocks, sizes, format, is_cancelled)?;
                Ok((EmbeddedThumbnails::Binary(blocks), report))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn renderer(params: &ThumbnailsParams) -> ThumbnailsList {
        params
            .sizes
            .iter()
            .map(|&(w, h)| ThumbnailData::new(w, h))
            .collect()
    }

    #[test]
    fn test_embed_ascii_target() {
        let (out, report) = ThumbnailExporter::new()
            .embed(
                EmbedTarget::Ascii,
                Some(&renderer),
                &[(8, 8)],
                ThumbnailFormat::Png,
                || false,
            )
            .unwrap();
        assert_eq!(report.emitted, 1);
        match out {
            EmbeddedThumbnails::Ascii(text) => assert!(text.contains("; png begin 8x8 ")),
            other => panic!("Expected ASCII output, got {:?}", other),
        }
    }

    #[test]
    fn test_embed_binary_target() {
        let (out, report) = ThumbnailExporter::new()
            .embed(
                EmbedTarget::Binary,
                Some(&renderer),
                &[(8, 8), (4, 2)],
                ThumbnailFormat::Qoi,
                || false,
            )
            .unwrap();
        assert_eq!(report.emitted, 2);
        match out {
            EmbeddedThumbnails::Binary(blocks) => {
                assert_eq!(blocks.len(), 2);
                assert_eq!((blocks[1].width, blocks[1].height), (4, 2));
            }
            other => panic!("Expected binary output, got {:?}", other),
        }
    }
}
