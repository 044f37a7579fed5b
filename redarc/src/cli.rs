//! Root CLI structure for redarc

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "redarc")]
#[command(about = "Redundant single-file archiver and Huffman codec", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (can be repeated for more detail)
    #[arg(long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create an archive with N-way redundancy
    #[command(short_flag = 'c')]
    Create {
        /// Path for the new archive
        archive: PathBuf,

        /// Number of copies stored per file (1-10)
        #[arg(short = 'b', long = "redundancy", required = true)]
        redundancy: u32,

        /// Files to pack
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Add files to an existing archive
    #[command(short_flag = 'a')]
    Add {
        /// Path to the archive
        archive: PathBuf,

        /// Number of copies stored per added file (1-10)
        #[arg(short = 'b', long = "redundancy", required = true)]
        redundancy: u32,

        /// Files to add
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Delete one file from an archive by exact name
    #[command(short_flag = 'd')]
    Delete {
        /// Path to the archive
        archive: PathBuf,

        /// Stored name to delete
        name: String,
    },

    /// Extract files to a directory
    #[command(short_flag = 'x')]
    Extract {
        /// Path to the archive
        archive: PathBuf,

        /// Output directory
        dir: PathBuf,

        /// Extract only this stored name
        #[arg(short = 'f', long = "file")]
        file: Option<String>,
    },

    /// List archive contents
    #[command(short_flag = 'l')]
    List {
        /// Path to the archive
        archive: PathBuf,
    },

    /// Verify every stored copy against its CRC
    #[command(short_flag = 'v')]
    Verify {
        /// Path to the archive
        archive: PathBuf,
    },

    /// Dump the metadata block to a sidecar file
    #[command(long_flag = "mx")]
    MetaDump {
        /// Path to the archive
        archive: PathBuf,

        /// Sidecar file to write
        output: PathBuf,
    },

    /// Load a metadata sidecar back into the archive (trusted operation)
    #[command(long_flag = "ma")]
    MetaLoad {
        /// Path to the archive
        archive: PathBuf,

        /// Sidecar file to read
        input: PathBuf,
    },

    /// Huffman-compress a file
    #[command(short_flag = 'p')]
    Compress {
        /// Input file
        input: PathBuf,

        /// Compressed output file
        output: PathBuf,
    },

    /// Decompress a Huffman-compressed file
    #[command(short_flag = 'u')]
    Decompress {
        /// Compressed input file
        input: PathBuf,

        /// Decompressed output file
        output: PathBuf,
    },
}
