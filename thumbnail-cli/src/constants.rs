// ABOUTME: Centralized constants for the gcode-thumbs CLI
// ABOUTME: Contains default sizes, config file names, and progress display timing

/// Defaults applied when neither config nor flags set a value
pub mod defaults {
    /// Sizes most G-code previewers look for
    pub const SIZES: &str = "16x16, 220x124";

    pub const JPEG_QUALITY: u8 = 85;
}

/// Progress display
pub mod ui {
    /// Spinner tick interval for smooth animation
    pub const PROGRESS_BAR_TICK_MS: u64 = 80;
}

/// G-code comment conventions
pub mod gcode {
    /// Comment lines at the top of a file that stay above the thumbnails
    pub const HEADER_PREFIXES: &[&str] = &["; generated by", ";generated by", "; HEADER_BLOCK"];
}
