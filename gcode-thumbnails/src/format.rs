// ABOUTME: Closed set of thumbnail codecs with their framing tags and block codes
// ABOUTME: Parsing from config strings is the only place an unknown format can appear

use crate::constants::block;
use crate::error::ThumbnailError;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ThumbnailFormat {
    #[default]
    Png,
    Jpg,
    Qoi,
}

impl ThumbnailFormat {
    pub const ALL: [ThumbnailFormat; 3] =
        [ThumbnailFormat::Png, ThumbnailFormat::Jpg, ThumbnailFormat::Qoi];

    /// Tag written into the ASCII begin/end markers
    pub fn tag(self) -> &'static str {
        match self {
            ThumbnailFormat::Png => "png",
            ThumbnailFormat::Jpg => "jpg",
            ThumbnailFormat::Qoi => "qoi",
        }
    }

    /// Format code stored in a binary thumbnail block
    pub fn block_code(self) -> u16 {
        match self {
            ThumbnailFormat::Png => block::FORMAT_PNG,
            ThumbnailFormat::Jpg => block::FORMAT_JPG,
            ThumbnailFormat::Qoi => block::FORMAT_QOI,
        }
    }

    pub fn from_block_code(code: u16) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.block_code() == code)
    }
}

impl fmt::Display for ThumbnailFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ThumbnailFormat::Png => "PNG",
            ThumbnailFormat::Jpg => "JPG",
            ThumbnailFormat::Qoi => "QOI",
        };
        f.write_str(name)
    }
}

impl FromStr for ThumbnailFormat {
    type Err = ThumbnailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(ThumbnailFormat::Png),
            "jpg" | "jpeg" => Ok(ThumbnailFormat::Jpg),
            "qoi" => Ok(ThumbnailFormat::Qoi),
            _ => Err(ThumbnailError::UnsupportedFormat(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags() {
        assert_eq!(ThumbnailFormat::Png.tag(), "png");
        assert_eq!(ThumbnailFormat::Jpg.tag(), "jpg");
        assert_eq!(ThumbnailFormat::Qoi.tag(), "qoi");
    }

    #[test]
    fn test_block_codes() {
        assert_eq!(ThumbnailFormat::Png.block_code(), 0);
        assert_eq!(ThumbnailFormat::Jpg.block_code(), 1);
        assert_eq!(ThumbnailFormat::Qoi.block_code(), 2);

        for format in ThumbnailFormat::ALL {
            assert_eq!(
                ThumbnailFormat::from_block_code(format.block_code()),
                Some(format)
            );
        }
        assert_eq!(ThumbnailFormat::from_block_code(3), None);
    }

    #[test]
    fn test_parse() {
        assert_eq!("PNG".parse::<ThumbnailFormat>().unwrap(), ThumbnailFormat::Png);
        assert_eq!("jpeg".parse::<ThumbnailFormat>().unwrap(), ThumbnailFormat::Jpg);
        assert_eq!(" qoi ".parse::<ThumbnailFormat>().unwrap(), ThumbnailFormat::Qoi);

        match "webp".parse::<ThumbnailFormat>() {
            Err(ThumbnailError::UnsupportedFormat(name)) => assert_eq!(name, "webp"),
            other => panic!("Expected UnsupportedFormat, got {:?}", other),
        }
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for format in ThumbnailFormat::ALL {
            assert_eq!(format.to_string().parse::<ThumbnailFormat>().unwrap(), format);
        }
        assert_eq!(ThumbnailFormat::Jpg.to_string(), "JPG");
    }
}
