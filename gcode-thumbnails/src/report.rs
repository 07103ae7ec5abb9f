// ABOUTME: Per-run summary of what the embedders emitted and what they skipped
// ABOUTME: Skips are counted rather than raised so partial exports stay usable

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmbedReport {
    /// Thumbnails written to the sink or appended as blocks
    pub emitted: usize,
    /// Thumbnails the renderer marked invalid
    pub skipped_invalid: usize,
    /// Thumbnails whose encoder returned no bytes
    pub skipped_empty: usize,
    /// The cancel check fired before the list was exhausted
    pub cancelled: bool,
}

impl EmbedReport {
    pub fn skipped(&self) -> usize {
        self.skipped_invalid + self.skipped_empty
    }

    pub fn is_complete(&self) -> bool {
        !self.cancelled && self.skipped() == 0
    }
}
