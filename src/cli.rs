use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Translate English text to Hindi
    Translate {
        /// Text to translate (reads --input when omitted)
        #[arg(short, long, conflicts_with = "input")]
        text: Option<String>,

        /// Input text file
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file for the translation (prints to stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Join all paragraphs into one instead of keeping blank lines between them
        #[arg(long)]
        flatten: bool,
    },

    /// Translate every .txt file in a directory
    Batch {
        /// Input directory containing text files
        #[arg(short, long)]
        input_dir: PathBuf,

        /// Output directory for translated files
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// Add training pairs from a JSON file of {"english", "hindi"} objects
    Train {
        /// Training data file
        #[arg(short, long)]
        input: PathBuf,

        /// Rebuild the lookup tables from the full corpus afterwards
        #[arg(long)]
        rebuild: bool,
    },

    /// Rebuild word and phrase maps from the stored training corpus
    Rebuild,

    /// Show whether lookup tables are loaded and their sizes
    Health,

    /// Show training corpus status with a small sample
    Status,

    /// Write the default configuration to a file
    InitConfig {
        /// Destination path
        #[arg(short, long, default_value = "shabd.toml")]
        output: PathBuf,
    },
}
