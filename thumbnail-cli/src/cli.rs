// ABOUTME: CLI argument definitions for the gcode-thumbs application
// ABOUTME: Defines the command-line interface structure using clap derive macros

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "gcode-thumbs")]
#[command(about = "Embed preview thumbnails into G-code files", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose output for debugging
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Read settings from this file instead of the standard locations
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug, Clone, Default)]
pub struct RenderArgs {
    /// Source image the thumbnails are scaled from
    #[arg(long, short)]
    pub image: PathBuf,

    /// Thumbnail sizes, e.g. "16x16,220x124" or "16x16/PNG,300x300/QOI"
    #[arg(long, short)]
    pub sizes: Option<String>,

    /// Image codec: png, jpg, or qoi
    #[arg(long, short)]
    pub format: Option<String>,

    /// Stretch to each size instead of letterboxing
    #[arg(long)]
    pub stretch: bool,

    /// Stop after the current thumbnail once this many seconds have passed
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Embed base64 thumbnails as comments at the top of a G-code file
    Embed {
        /// G-code file to update
        gcode: PathBuf,

        #[command(flatten)]
        render: RenderArgs,

        /// Write here instead of updating the G-code file in place
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Write binary thumbnail blocks for a binary G-code container
    Binary {
        #[command(flatten)]
        render: RenderArgs,

        /// Destination file for the serialized blocks
        #[arg(long, short)]
        output: PathBuf,
    },
    /// List thumbnails embedded in a G-code file
    Inspect {
        /// G-code file to read
        gcode: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_structure() {
        let cli = Cli::command();
        assert_eq!(cli.get_name(), "gcode-thumbs");
        for name in ["embed", "binary", "inspect"] {
            assert!(cli.find_subcommand(name).is_some(), "{} missing", name);
        }
        cli.debug_assert();
    }

    #[test]
    fn test_parse_embed() {
        let cli = Cli::try_parse_from([
            "gcode-thumbs",
            "embed",
            "part.gcode",
            "--image",
            "part.png",
            "--sizes",
            "16x16,220x124",
            "--format",
            "qoi",
        ])
        .unwrap();

        match cli.command {
            Commands::Embed {
                gcode,
                render,
                output,
            } => {
                assert_eq!(gcode, PathBuf::from("part.gcode"));
                assert_eq!(render.image, PathBuf::from("part.png"));
                assert_eq!(render.sizes.as_deref(), Some("16x16,220x124"));
                assert_eq!(render.format.as_deref(), Some("qoi"));
                assert!(!render.stretch);
                assert!(output.is_none());
            }
            other => panic!("Expected embed command, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_binary_requires_output() {
        assert!(Cli::try_parse_from(["gcode-thumbs", "binary", "--image", "a.png"]).is_err());

        let cli = Cli::try_parse_from([
            "gcode-thumbs",
            "-v",
            "binary",
            "-i",
            "a.png",
            "-o",
            "a.bin",
            "--timeout",
            "5",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Binary { render, output } => {
                assert_eq!(output, PathBuf::from("a.bin"));
                assert_eq!(render.timeout, Some(5));
            }
            other => panic!("Expected binary command, got {:?}", other),
        }
    }

    #[test]
    fn test_timeout_must_be_positive() {
        assert!(
            Cli::try_parse_from([
                "gcode-thumbs",
                "binary",
                "-i",
                "a.png",
                "-o",
                "a.bin",
                "--timeout",
                "0"
            ])
            .is_err()
        );
    }
}
