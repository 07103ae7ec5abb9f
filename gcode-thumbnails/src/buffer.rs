// ABOUTME: Compressed thumbnail buffer tagged with the codec that produced it
// ABOUTME: Lives for one embedder iteration and is consumed by exactly one framing strategy

use crate::format::ThumbnailFormat;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedBuffer {
    format: ThumbnailFormat,
    data: Vec<u8>,
}

impl CompressedBuffer {
    pub fn new(format: ThumbnailFormat, data: Vec<u8>) -> Self {
        Self { format, data }
    }

    /// Encoder produced nothing; embedders skip these
    pub fn empty(format: ThumbnailFormat) -> Self {
        Self {
            format,
            data: Vec::new(),
        }
    }

    pub fn format(&self) -> ThumbnailFormat {
        self.format
    }

    pub fn tag(&self) -> &'static str {
        self.format.tag()
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}
