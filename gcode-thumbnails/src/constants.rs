// ABOUTME: Centralized constants for thumbnail framing and encoding
// ABOUTME: Contains the ASCII line width, binary format codes, and codec defaults

/// ASCII comment framing
pub mod ascii {
    /// Base64 characters per comment line; previewers parse on this width
    pub const LINE_WIDTH: usize = 78;

    /// Prefix written before every content and marker line
    pub const LINE_PREFIX: &str = "; ";
}

/// Binary thumbnail block format codes
pub mod block {
    pub const FORMAT_PNG: u16 = 0;
    pub const FORMAT_JPG: u16 = 1;
    pub const FORMAT_QOI: u16 = 2;

    /// Largest width or height a block can store
    pub const MAX_DIMENSION: u32 = u16::MAX as u32;

    /// Serialized header: width, height, format, payload length
    pub const HEADER_LEN: usize = 2 + 2 + 2 + 4;
}

/// Encoder defaults
pub mod codec {
    pub const DEFAULT_JPEG_QUALITY: u8 = 85;

    /// Bytes per pixel of a rendered thumbnail (RGBA8)
    pub const CHANNELS: usize = 4;
}
