// ABOUTME: Implementations of the embed, binary, and inspect subcommands
// ABOUTME: Resolves settings, drives the exporter per format batch, and writes results to disk

use crate::cli::RenderArgs;
use crate::config::{Config, Settings};
use crate::constants::ui::PROGRESS_BAR_TICK_MS;
use crate::gcode::{self, EmbeddedThumbnail};
use crate::renderer::{ImageRenderer, ScalingConfig};
use anyhow::{Context, Result};
use gcode_thumbnails::sizes::batch_by_format;
use gcode_thumbnails::{EmbedReport, ThumbnailBlock, ThumbnailExporter};
use indicatif::{ProgressBar, ProgressStyle};
use std::cell::Cell;
use std::io::{BufWriter, IsTerminal, Write};
use std::path::Path;
use std::time::{Duration, Instant};

/// Layer CLI flags over the loaded config and fill in defaults
pub fn resolve_settings(config_path: Option<&Path>, args: &RenderArgs) -> Result<Settings> {
    let config = match config_path {
        Some(path) => Config::load_from_file(path)?,
        None => Config::load()?,
    };

    let flags = Config {
        sizes: args.sizes.clone(),
        format: args.format.clone(),
        preserve_aspect_ratio: args.stretch.then_some(false),
        ..Default::default()
    };

    config.merge(flags).resolve()
}

/// Polled by the exporter after every thumbnail. Remembers whether the
/// deadline fired so later format batches are skipped.
struct CancelCheck {
    deadline: Option<Instant>,
    progress: Option<ProgressBar>,
    fired: Cell<bool>,
}

impl CancelCheck {
    fn new(timeout: Option<u64>, total: usize) -> Self {
        let progress = std::io::stderr().is_terminal().then(|| {
            let pb = ProgressBar::new(total as u64);
            if let Ok(style) = ProgressStyle::default_bar()
                .template("{spinner:.green} {msg} [{bar:25.cyan/blue}] {pos}/{len}")
            {
                pb.set_style(style.progress_chars("=>-"));
            }
            pb.set_message("Encoding thumbnails");
            pb.enable_steady_tick(Duration::from_millis(PROGRESS_BAR_TICK_MS));
            pb
        });

        Self {
            deadline: timeout.map(|secs| Instant::now() + Duration::from_secs(secs)),
            progress,
            fired: Cell::new(false),
        }
    }

    fn is_cancelled(&self) -> bool {
        if let Some(pb) = &self.progress {
            pb.inc(1);
        }
        let expired = self
            .deadline
            .is_some_and(|deadline| Instant::now() >= deadline);
        if expired {
            self.fired.set(true);
        }
        expired
    }

    fn fired(&self) -> bool {
        self.fired.get()
    }

    fn finish(self, report: &EmbedReport) {
        if let Some(pb) = self.progress {
            pb.finish_and_clear();
        }
        if report.cancelled {
            log::warn!(
                "Timed out: embedded {} thumbnail(s) before stopping",
                report.emitted
            );
        }
        if report.skipped() > 0 {
            log::warn!(
                "Skipped {} thumbnail(s) ({} invalid, {} failed to encode)",
                report.skipped(),
                report.skipped_invalid,
                report.skipped_empty
            );
        }
    }
}

fn accumulate(total: &mut EmbedReport, report: EmbedReport) {
    total.emitted += report.emitted;
    total.skipped_invalid += report.skipped_invalid;
    total.skipped_empty += report.skipped_empty;
    total.cancelled |= report.cancelled;
}

fn open_renderer(args: &RenderArgs, settings: &Settings) -> Result<ImageRenderer> {
    ImageRenderer::open(
        &args.image,
        ScalingConfig {
            preserve_aspect_ratio: settings.preserve_aspect_ratio,
            ..Default::default()
        },
    )
}

/// Render and frame every thumbnail as G-code comments
pub fn render_ascii(
    renderer: &ImageRenderer,
    settings: &Settings,
    timeout: Option<u64>,
) -> Result<(String, EmbedReport)> {
    let exporter = ThumbnailExporter::with_config(settings.codec.clone());
    let cancel = CancelCheck::new(timeout, settings.entries.len());
    let mut text = String::new();
    let mut total = EmbedReport::default();

    let batches = batch_by_format(&settings.entries, settings.format);
    let last = batches.len().saturating_sub(1);
    for (index, (format, sizes)) in batches.into_iter().enumerate() {
        let report = exporter.export_ascii(
            Some(renderer),
            &sizes,
            format,
            |s: &str| {
                text.push_str(s);
                Ok(())
            },
            || cancel.is_cancelled(),
        )?;
        accumulate(&mut total, report);
        if cancel.fired() {
            // A deadline hit on a batch's last thumbnail still skips later batches
            total.cancelled |= index < last;
            break;
        }
    }

    cancel.finish(&total);
    Ok((text, total))
}

/// Render every thumbnail into binary blocks in request order
pub fn render_binary(
    renderer: &ImageRenderer,
    settings: &Settings,
    timeout: Option<u64>,
) -> Result<(Vec<ThumbnailBlock>, EmbedReport)> {
    let exporter = ThumbnailExporter::with_config(settings.codec.clone());
    let cancel = CancelCheck::new(timeout, settings.entries.len());
    let mut blocks = Vec::new();
    let mut batch_blocks = Vec::new();
    let mut total = EmbedReport::default();

    let batches = batch_by_format(&settings.entries, settings.format);
    let last = batches.len().saturating_sub(1);
    for (index, (format, sizes)) in batches.into_iter().enumerate() {
        let report = exporter.export_binary(
            Some(renderer),
            &mut batch_blocks,
            &sizes,
            format,
            || cancel.is_cancelled(),
        )?;
        blocks.append(&mut batch_blocks);
        accumulate(&mut total, report);
        if cancel.fired() {
            // A deadline hit on a batch's last thumbnail still skips later batches
            total.cancelled |= index < last;
            break;
        }
    }

    cancel.finish(&total);
    Ok((blocks, total))
}

pub fn run_embed(
    gcode_path: &Path,
    args: &RenderArgs,
    output: Option<&Path>,
    config_path: Option<&Path>,
) -> Result<EmbedReport> {
    let settings = resolve_settings(config_path, args)?;
    let renderer = open_renderer(args, &settings)?;

    let original = std::fs::read_to_string(gcode_path)
        .with_context(|| format!("Failed to read G-code file: {}", gcode_path.display()))?;

    let (thumbnails, report) = render_ascii(&renderer, &settings, args.timeout)?;
    let updated = gcode::insert_thumbnails(&original, &thumbnails);

    let destination = output.unwrap_or(gcode_path);
    std::fs::write(destination, updated)
        .with_context(|| format!("Failed to write G-code file: {}", destination.display()))?;

    log::info!(
        "Embedded {} thumbnail(s) into {}",
        report.emitted,
        destination.display()
    );
    Ok(report)
}

pub fn run_binary(
    args: &RenderArgs,
    output: &Path,
    config_path: Option<&Path>,
) -> Result<EmbedReport> {
    let settings = resolve_settings(config_path, args)?;
    let renderer = open_renderer(args, &settings)?;
    let (blocks, report) = render_binary(&renderer, &settings, args.timeout)?;

    let file = std::fs::File::create(output)
        .with_context(|| format!("Failed to create {}", output.display()))?;
    let mut writer = BufWriter::new(file);
    for block in &blocks {
        block
            .write_to(&mut writer)
            .with_context(|| format!("Failed to write thumbnail block to {}", output.display()))?;
    }
    writer.flush()?;

    log::info!(
        "Wrote {} thumbnail block(s) to {}",
        blocks.len(),
        output.display()
    );
    Ok(report)
}

pub fn run_inspect(gcode_path: &Path) -> Result<Vec<EmbeddedThumbnail>> {
    let content = std::fs::read_to_string(gcode_path)
        .with_context(|| format!("Failed to read G-code file: {}", gcode_path.display()))?;
    Ok(gcode::list_thumbnails(&content))
}

pub fn format_inspection(thumbnails: &[EmbeddedThumbnail]) -> String {
    if thumbnails.is_empty() {
        return "No thumbnails found.".to_string();
    }

    thumbnails
        .iter()
        .map(|t| {
            let status = match (t.is_consistent(), t.decoded_len) {
                (true, Some(bytes)) => format!("{} bytes", bytes),
                (false, _) if t.encoded_len != t.actual_len => format!(
                    "length mismatch: header says {}, found {}",
                    t.encoded_len, t.actual_len
                ),
                _ => "invalid base64".to_string(),
            };
            format!(
                "{:<4} {:>5}x{:<5} {:>3} lines  {}",
                t.tag, t.width, t.height, t.lines, status
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulate_reports() {
        let mut total = EmbedReport::default();
        accumulate(
            &mut total,
            EmbedReport {
                emitted: 2,
                skipped_empty: 1,
                ..Default::default()
            },
        );
        accumulate(
            &mut total,
            EmbedReport {
                emitted: 1,
                cancelled: true,
                ..Default::default()
            },
        );
        assert_eq!(total.emitted, 3);
        assert_eq!(total.skipped_empty, 1);
        assert!(total.cancelled);
    }

    #[test]
    fn test_format_inspection() {
        let ok = EmbeddedThumbnail {
            tag: "png".to_string(),
            width: 16,
            height: 16,
            encoded_len: 8,
            actual_len: 8,
            lines: 1,
            decoded_len: Some(5),
        };
        let bad = EmbeddedThumbnail {
            actual_len: 4,
            ..ok.clone()
        };

        let text = format_inspection(&[ok, bad]);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("5 bytes"));
        assert!(lines[1].contains("length mismatch: header says 8, found 4"));
        assert_eq!(format_inspection(&[]), "No thumbnails found.");
    }

    #[test]
    fn test_cancel_check_without_timeout_never_fires() {
        let cancel = CancelCheck {
            deadline: None,
            progress: None,
            fired: Cell::new(false),
        };
        assert!(!cancel.is_cancelled());
        assert!(!cancel.fired());
    }

    #[test]
    fn test_cancel_check_after_deadline() {
        let cancel = CancelCheck {
            deadline: Some(Instant::now()),
            progress: None,
            fired: Cell::new(false),
        };
        assert!(cancel.is_cancelled());
        assert!(cancel.fired());
    }

    fn solid_renderer() -> ImageRenderer {
        ImageRenderer::new(image::DynamicImage::ImageRgba8(image::RgbaImage::from_pixel(
            40,
            20,
            image::Rgba([30, 120, 200, 255]),
        )))
    }

    fn settings_for(sizes: &str) -> Settings {
        Config {
            sizes: Some(sizes.to_string()),
            ..Default::default()
        }
        .resolve()
        .unwrap()
    }

    #[test]
    fn test_expired_timeout_stops_after_first_batch() {
        let renderer = solid_renderer();
        let settings = settings_for("16x16/QOI, 32x32/PNG, 64x64/JPG");

        let (text, report) = render_ascii(&renderer, &settings, Some(0)).unwrap();
        assert_eq!(report.emitted, 1);
        assert!(report.cancelled);
        assert_eq!(gcode::list_thumbnails(&text).len(), 1);

        let (blocks, report) = render_binary(&renderer, &settings, Some(0)).unwrap();
        assert_eq!(report.emitted, 1);
        assert!(report.cancelled);
        assert_eq!(blocks.len(), 1);
    }

    #[test]
    fn test_expired_timeout_on_last_thumbnail_is_complete() {
        let renderer = solid_renderer();
        let settings = settings_for("16x16/QOI");

        let (_, report) = render_ascii(&renderer, &settings, Some(0)).unwrap();
        assert_eq!(report.emitted, 1);
        assert!(report.is_complete());
    }

    #[test]
    fn test_mixed_formats_keep_request_order() {
        let renderer = solid_renderer();
        let settings = settings_for("16x16/QOI, 32x32, 300x300/QOI");

        let (text, report) = render_ascii(&renderer, &settings, None).unwrap();
        assert_eq!(report.emitted, 3);
        let order: Vec<(String, u32)> = gcode::list_thumbnails(&text)
            .into_iter()
            .map(|t| (t.tag, t.width))
            .collect();
        assert_eq!(
            order,
            vec![
                ("qoi".to_string(), 16),
                ("png".to_string(), 32),
                ("qoi".to_string(), 300),
            ]
        );

        let (blocks, _) = render_binary(&renderer, &settings, None).unwrap();
        let codes: Vec<(u16, u16)> = blocks.iter().map(|b| (b.width, b.format)).collect();
        assert_eq!(codes, vec![(16, 2), (32, 0), (300, 2)]);
    }
}
