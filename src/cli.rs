use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "trackextract")]
#[command(author, version, about = "Identify and extract audio, subtitle and video tracks")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Emit progress events as PROGRESS:{json} lines on stdout
    #[arg(long, global = true)]
    pub progress: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Which tracks to extract
#[derive(Args, Debug, Clone)]
pub struct SelectionArgs {
    /// Output directory (defaults to the configured one)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Languages to extract, e.g. eng,jpn or en,ja
    #[arg(short, long, value_delimiter = ',')]
    pub languages: Vec<String>,

    /// Only extract audio tracks
    #[arg(long)]
    pub audio_only: bool,

    /// Only extract subtitle tracks
    #[arg(long)]
    pub subtitle_only: bool,

    /// Only extract video tracks
    #[arg(long)]
    pub video_only: bool,

    /// Also extract video tracks
    #[arg(long)]
    pub include_video: bool,

    /// Crop black bars from extracted video
    #[arg(long)]
    pub remove_letterbox: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a media file and list its tracks
    Analyze {
        #[arg(required = true)]
        file: PathBuf,
    },

    /// Extract tracks of one file by language
    Extract {
        #[arg(required = true)]
        file: PathBuf,

        #[command(flatten)]
        selection: SelectionArgs,
    },

    /// Extract one track by type and id
    Track {
        #[arg(required = true)]
        file: PathBuf,

        /// audio, subtitle or video
        #[arg(short = 't', long = "type")]
        track_type: String,

        /// Track id within its type, starting at 0
        #[arg(long)]
        id: usize,

        /// Output directory (defaults to the configured one)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Crop black bars when extracting video
        #[arg(long)]
        remove_letterbox: bool,
    },

    /// Extract tracks from many files or directories
    Batch {
        /// Files and directories to scan for media
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        #[command(flatten)]
        selection: SelectionArgs,

        /// Write every file's tracks straight into the output directory
        #[arg(long)]
        flat: bool,

        /// Number of files processed at once
        #[arg(short = 'j', long)]
        jobs: Option<usize>,
    },

    /// List supported language codes
    Languages,

    /// Check that ffmpeg and ffprobe are available
    Check,
}
