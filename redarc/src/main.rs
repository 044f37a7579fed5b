//! Main entry point for the redarc CLI

mod cli;
mod commands;
mod utils;

use anyhow::Result;
use clap::Parser;

use crate::cli::{Cli, Commands};

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    // Parse command line arguments
    let cli = Cli::parse();

    // Set verbosity
    if cli.verbose > 0 {
        log::set_max_level(match cli.verbose {
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        });
    } else if cli.quiet {
        log::set_max_level(log::LevelFilter::Error);
    }

    // Execute command
    match cli.command {
        Commands::Create {
            archive,
            redundancy,
            files,
        } => commands::archive::create(&archive, redundancy, &files),

        Commands::Add {
            archive,
            redundancy,
            files,
        } => commands::archive::add(&archive, redundancy, &files),

        Commands::Delete { archive, name } => commands::archive::delete(&archive, &name),

        Commands::Extract { archive, dir, file } => {
            commands::archive::extract(&archive, &dir, file.as_deref())
        }

        Commands::List { archive } => commands::archive::list(&archive),

        Commands::Verify { archive } => commands::archive::verify(&archive),

        Commands::MetaDump { archive, output } => commands::archive::meta_dump(&archive, &output),

        Commands::MetaLoad { archive, input } => commands::archive::meta_load(&archive, &input),

        Commands::Compress { input, output } => commands::codec::compress(&input, &output),

        Commands::Decompress { input, output } => commands::codec::decompress(&input, &output),
    }
}
