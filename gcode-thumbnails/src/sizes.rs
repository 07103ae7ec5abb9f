// ABOUTME: Parsing of thumbnail size lists like "16x16, 220x124" or "16x16/PNG, 300x300/QOI"
// ABOUTME: Rejects zero, non-numeric, and out-of-range dimensions before anything is rendered

use crate::constants::block::MAX_DIMENSION;
use crate::error::{Result, ThumbnailError};
use crate::format::ThumbnailFormat;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThumbnailEntry {
    pub width: u32,
    pub height: u32,
    pub format: Option<ThumbnailFormat>,
}

pub fn parse_size(s: &str) -> Result<(u32, u32)> {
    let invalid = || ThumbnailError::InvalidSize(s.trim().to_string());

    let (w, h) = s
        .trim()
        .split_once(['x', 'X'])
        .ok_or_else(invalid)?;
    let width: u32 = w.trim().parse().map_err(|_| invalid())?;
    let height: u32 = h.trim().parse().map_err(|_| invalid())?;

    if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(invalid());
    }
    Ok((width, height))
}

/// Comma separated `WIDTHxHEIGHT` entries, each optionally suffixed with `/FORMAT`
pub fn parse_thumbnail_list(s: &str) -> Result<Vec<ThumbnailEntry>> {
    s.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| -> Result<ThumbnailEntry> {
            let (size, format) = match entry.split_once('/') {
                Some((size, format)) => (size, Some(format.parse::<ThumbnailFormat>()?)),
                None => (entry, None),
            };
            let (width, height) = parse_size(size)?;
            Ok(ThumbnailEntry {
                width,
                height,
                format,
            })
        })
        .collect()
}

pub fn parse_sizes(s: &str) -> Result<Vec<(u32, u32)>> {
    Ok(parse_thumbnail_list(s)?
        .into_iter()
        .map(|entry| (entry.width, entry.height))
        .collect())
}

/// Split entries into runs of the same format, keeping request order.
/// Entries without a format use `default_format`.
pub fn batch_by_format(
    entries: &[ThumbnailEntry],
    default_format: ThumbnailFormat,
) -> Vec<(ThumbnailFormat, Vec<(u32, u32)>)> {
    let mut batches: Vec<(ThumbnailFormat, Vec<(u32, u32)>)> = Vec::new();
    for entry in entries {
        let format = entry.format.unwrap_or(default_format);
        match batches.last_mut() {
            Some((last, sizes)) if *last == format => sizes.push((entry.width, entry.height)),
            _ => batches.push((format, vec![(entry.width, entry.height)])),
        }
    }
    batches
}
