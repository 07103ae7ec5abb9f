// ABOUTME: ASCII thumbnail embedding as base64 G-code comment blocks
// ABOUTME: Handles begin/end markers and fixed-width chunking that previewers parse on

use crate::buffer::CompressedBuffer;
use crate::constants::ascii::{LINE_PREFIX, LINE_WIDTH};
use crate::data::ThumbnailRenderer;
use crate::error::Result;
use crate::exporter::ThumbnailExporter;
use crate::format::ThumbnailFormat;
use crate::report::EmbedReport;
use base64::{Engine, engine::general_purpose::STANDARD};
use std::convert::Infallible;
use std::io;

/// Write one framed thumbnail:
///
/// ```text
///
/// ;
/// ; png begin 16x16 <base64 length>
/// ; <up to 78 base64 characters>
/// ; png end
/// ;
/// ```
pub fn write_ascii_thumbnail<W>(
    buffer: &CompressedBuffer,
    width: u32,
    height: u32,
    output: &mut W,
) -> io::Result<()>
where
    W: FnMut(&str) -> io::Result<()>,
{
    frame_thumbnail(buffer, width, height, output)
}

/// Framed thumbnail as a single string
pub fn encode_ascii_thumbnail(buffer: &CompressedBuffer, width: u32, height: u32) -> String {
    let mut out = String::new();
    let mut push = |s: &str| -> Result<(), Infallible> {
        out.push_str(s);
        Ok(())
    };
    match frame_thumbnail(buffer, width, height, &mut push) {
        Ok(()) => out,
        Err(never) => match never {},
    }
}

fn frame_thumbnail<W, E>(
    buffer: &CompressedBuffer,
    width: u32,
    height: u32,
    output: &mut W,
) -> std::result::Result<(), E>
where
    W: FnMut(&str) -> std::result::Result<(), E>,
{
    let encoded = STANDARD.encode(buffer.data());
    let tag = buffer.tag();

    output(&format!(
        "\n;\n{}{} begin {}x{} {}\n",
        LINE_PREFIX,
        tag,
        width,
        height,
        encoded.len()
    ))?;

    // base64 is ASCII, so splitting at any byte offset is a char boundary
    let mut rest = encoded.as_str();
    while !rest.is_empty() {
        let (line, tail) = rest.split_at(rest.len().min(LINE_WIDTH));
        output(&format!("{}{}\n", LINE_PREFIX, line))?;
        rest = tail;
    }

    output(&format!("{}{} end\n;\n", LINE_PREFIX, tag))
}

impl ThumbnailExporter {
    /// Render, encode, and write every valid thumbnail to `output` as base64
    /// comment blocks, polling `is_cancelled` after each one.
    pub fn export_ascii<W, C>(
        &self,
        renderer: Option<&dyn ThumbnailRenderer>,
        sizes: &[(u32, u32)],
        format: ThumbnailFormat,
        mut output: W,
        is_cancelled: C,
    ) -> Result<EmbedReport>
    where
        W: FnMut(&str) -> io::Result<()>,
        C: FnMut() -> bool,
    {
        self.run(renderer, sizes, format, is_cancelled, |data, compressed| {
            write_ascii_thumbnail(&compressed, data.width, data.height, &mut output)?;
            Ok(true)
        })
    }
}

/// [`ThumbnailExporter::export_ascii`] with default codec settings
pub fn export_thumbnails_to_file<W, C>(
    renderer: Option<&dyn ThumbnailRenderer>,
    sizes: &[(u32, u32)],
    format: ThumbnailFormat,
    output: W,
    is_cancelled: C,
) -> Result<EmbedReport>
where
    W: FnMut(&str) -> io::Result<()>,
    C: FnMut() -> bool,
{
    ThumbnailExporter::new().export_ascii(renderer, sizes, format, output, is_cancelled)
}
