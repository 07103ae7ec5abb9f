// ABOUTME: Main entry point for the gcode-thumbs application
// ABOUTME: Parses arguments, sets up logging, and dispatches to subcommands

use anyhow::Result;
use clap::Parser;
use gcode_thumbnails::ThumbnailError;
use thumbnail_cli::cli::{Cli, Commands};
use thumbnail_cli::commands;

fn init_logging(verbose: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.format_timestamp(None).init();
}

fn run(cli: Cli) -> Result<()> {
    let config = cli.config.as_deref();

    match cli.command {
        Commands::Embed {
            gcode,
            render,
            output,
        } => {
            commands::run_embed(&gcode, &render, output.as_deref(), config)?;
        }
        Commands::Binary { render, output } => {
            commands::run_binary(&render, &output, config)?;
        }
        Commands::Inspect { gcode } => {
            let thumbnails = commands::run_inspect(&gcode)?;
            println!("{}", commands::format_inspection(&thumbnails));
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(err) = run(cli) {
        eprintln!("Error: {:#}", err);
        if let Some(help) = err
            .chain()
            .find_map(|cause| cause.downcast_ref::<ThumbnailError>())
            .and_then(ThumbnailError::help_text)
        {
            eprintln!();
            eprintln!("{}", help);
        }
        std::process::exit(1);
    }
}
