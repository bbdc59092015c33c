use crate::types::{LogLevel, OutputFormat};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "decktext")]
#[command(about = "Round-trip Anki packages through editable card text", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file (default: $DECKTEXT_CONFIG, then the user config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, default_value = "plain", global = true)]
    pub format: OutputFormat,

    #[arg(long, default_value = "warn", global = true)]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Unpack a package into card text, an HTML preview and its media
    Dump {
        apkg: PathBuf,

        /// Directory for cards.txt, index.html and media/ (default: dump_dir from config)
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },

    /// Build a package from card text and verify its keys
    Build {
        text: PathBuf,

        /// Package path (default: <deck>_<date>.apkg in output_dir from config)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Deck name (default: the text file's stem)
        #[arg(long)]
        deck_name: Option<String>,

        /// Media file to embed; repeatable
        #[arg(long = "media")]
        media: Vec<PathBuf>,

        /// Skip the post-build key check
        #[arg(long)]
        no_verify: bool,
    },

    /// Compare the keys of card text with those of a package
    Verify {
        text: PathBuf,

        apkg: PathBuf,

        /// List every key, not only the counts
        #[arg(short, long)]
        verbose: bool,
    },

    /// Stamp explicit keys into card text, reusing keys from a package
    Migrate { text: PathBuf, apkg: PathBuf },

    /// Show what a package holds
    Inspect {
        apkg: PathBuf,

        #[arg(long, default_value = "10")]
        limit: usize,
    },
}
