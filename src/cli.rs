//! Command-line interface for meetscribe
//!
//! Provides argument parsing using clap derive macros.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Batch speaker-attributed transcription for recorded meetings
#[derive(Parser, Debug)]
#[command(
    name = "meetscribe",
    version,
    about = "Batch speaker-attributed transcription for recorded meetings"
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Suppress per-file status output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Prevent automatic model download if a configured model is missing
    #[arg(long, global = true)]
    pub no_download: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Transcribe every recording under a directory
    Run {
        /// Directory containing the recordings
        #[arg(value_name = "DIR")]
        input_dir: PathBuf,

        /// Output base directory (default: <DIR>/transcripts)
        #[arg(long, short = 'o', value_name = "DIR")]
        output: Option<PathBuf>,

        /// Scan the directory tree recursively
        #[arg(long, short = 'r')]
        recursive: bool,

        /// Whisper model override (e.g. large-v3, medium, base)
        #[arg(long, value_name = "MODEL")]
        model: Option<String>,

        /// Language code for transcription (e.g. en, de, es)
        #[arg(long, value_name = "LANG")]
        language: Option<String>,

        /// Speaker count applied when a recording has no metadata sidecar
        #[arg(long, value_name = "N")]
        default_speakers: Option<u32>,
    },

    /// Manage speech and diarization models
    Models {
        /// Action to perform
        #[command(subcommand)]
        action: ModelsAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Model management actions
#[derive(Subcommand, Debug)]
pub enum ModelsAction {
    /// List catalog models and their install state
    List,

    /// Download and install a model
    Install {
        /// Model name (e.g. large-v3, segmentation, embedding)
        name: String,
    },
}
