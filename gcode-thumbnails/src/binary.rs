// ABOUTME: Binary thumbnail blocks for compact binary G-code containers
// ABOUTME: Each block carries 16-bit geometry, a stable format code, and the raw payload

use crate::constants::block::{HEADER_LEN, MAX_DIMENSION};
use crate::data::ThumbnailRenderer;
use crate::error::{Result, ThumbnailError};
use crate::exporter::ThumbnailExporter;
use crate::format::ThumbnailFormat;
use crate::report::EmbedReport;
use std::io::{self, Write};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThumbnailBlock {
    pub width: u16,
    pub height: u16,
    pub format: u16,
    pub data: Vec<u8>,
}

impl ThumbnailBlock {
    pub fn new(width: u32, height: u32, format: ThumbnailFormat, data: Vec<u8>) -> Result<Self> {
        let (Ok(w), Ok(h)) = (u16::try_from(width), u16::try_from(height)) else {
            return Err(ThumbnailError::DimensionOverflow { width, height });
        };
        Ok(Self {
            width: w,
            height: h,
            format: format.block_code(),
            data,
        })
    }

    pub fn thumbnail_format(&self) -> Option<ThumbnailFormat> {
        ThumbnailFormat::from_block_code(self.format)
    }

    /// Little-endian width, height, format, u32 payload length, then payload
    pub fn write_to<W: Write>(&self, mut writer: W) -> io::Result<()> {
        let len = u32::try_from(self.data.len()).map_err(|_| {
            io::Error::new(io::ErrorKind::InvalidInput, "thumbnail payload exceeds 4 GiB")
        })?;
        writer.write_all(&self.width.to_le_bytes())?;
        writer.write_all(&self.height.to_le_bytes())?;
        writer.write_all(&self.format.to_le_bytes())?;
        writer.write_all(&len.to_le_bytes())?;
        writer.write_all(&self.data)
    }

    /// Read back `(width, height, format, payload length)` from a serialized header
    pub fn parse_params(header: &[u8]) -> Option<(u16, u16, u16, u32)> {
        if header.len() < HEADER_LEN {
            return None;
        }
        let u16_at = |i: usize| u16::from_le_bytes([header[i], header[i + 1]]);
        let len = u32::from_le_bytes([header[6], header[7], header[8], header[9]]);
        Some((u16_at(0), u16_at(2), u16_at(4), len))
    }

    /// Split a buffer of concatenated serialized blocks
    pub fn read_all(mut bytes: &[u8]) -> Option<Vec<ThumbnailBlock>> {
        let mut blocks = Vec::new();
        while !bytes.is_empty() {
            let (width, height, format, len) = Self::parse_params(bytes)?;
            let end = HEADER_LEN.checked_add(len as usize)?;
            let data = bytes.get(HEADER_LEN..end)?.to_vec();
            blocks.push(ThumbnailBlock {
                width,
                height,
                format,
                data,
            });
            bytes = &bytes[end..];
        }
        Some(blocks)
    }
}

impl ThumbnailExporter {
    /// Replace `out_blocks` with one block per successfully encoded thumbnail.
    /// Cancellation stops the loop but never removes blocks already appended.
    pub fn export_binary<C>(
        &self,
        renderer: Option<&dyn ThumbnailRenderer>,
        out_blocks: &mut Vec<ThumbnailBlock>,
        sizes: &[(u32, u32)],
        format: ThumbnailFormat,
        is_cancelled: C,
    ) -> Result<EmbedReport>
    where
        C: FnMut() -> bool,
    {
        out_blocks.clear();

        if let Some(&(width, height)) = sizes
            .iter()
            .find(|&&(w, h)| w > MAX_DIMENSION || h > MAX_DIMENSION)
        {
            return Err(ThumbnailError::DimensionOverflow { width, height });
        }

        self.run(renderer, sizes, format, is_cancelled, |data, compressed| {
            match ThumbnailBlock::new(data.width, data.height, format, compressed.into_data()) {
                Ok(block) => {
                    out_blocks.push(block);
                    Ok(true)
                }
                Err(e) => {
                    log::warn!("Skipping thumbnail: {}", e);
                    Ok(false)
                }
            }
        })
    }
}

/// [`ThumbnailExporter::export_binary`] with default codec settings
pub fn generate_binary_thumbnails<C>(
    renderer: Option<&dyn ThumbnailRenderer>,
    out_blocks: &mut Vec<ThumbnailBlock>,
    sizes: &[(u32, u32)],
    format: ThumbnailFormat,
    is_cancelled: C,
) -> Result<EmbedReport>
where
    C: FnMut() -> bool,
{
    ThumbnailExporter::new().export_binary(renderer, out_blocks, sizes, format, is_cancelled)
}
