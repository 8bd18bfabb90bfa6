//! CLI command definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use storyloom::{AspectRatio, ImageQuality, StoryDuration};

/// Storyloom - illustrated storyboards, narratives and videos from a story idea
#[derive(Parser, Debug)]
#[command(name = "storyloom")]
#[command(
    about = "Illustrated storyboards, narratives and videos from a story idea",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a storyboard: scenes, panel images and a narrative
    Generate {
        /// The story idea
        #[arg(long)]
        prompt: String,

        /// Art style applied to every panel
        #[arg(long)]
        theme: String,

        /// Story length: short, medium or long
        #[arg(long, default_value = "short")]
        duration: StoryDuration,

        /// Panel aspect ratio, e.g. 16:9
        #[arg(long, default_value = "16:9")]
        aspect_ratio: AspectRatio,

        /// Image quality: draft, standard or high
        #[arg(long, default_value = "standard")]
        quality: ImageQuality,

        /// Output directory
        #[arg(long, default_value = "storyboard")]
        out: PathBuf,

        /// Also write a ZIP archive of the panel images
        #[arg(long)]
        archive: bool,

        /// Also write an HTML storyboard document
        #[arg(long)]
        document: bool,

        /// Also render a video of the whole story
        #[arg(long)]
        video: bool,
    },

    /// Render a single video from a prompt
    Video {
        /// What the video should show
        #[arg(long)]
        prompt: String,

        /// Video aspect ratio, e.g. 16:9
        #[arg(long, default_value = "16:9")]
        aspect_ratio: AspectRatio,

        /// Optional start frame
        #[arg(long)]
        image: Option<PathBuf>,

        /// Output file
        #[arg(long, default_value = "storyloom.mp4")]
        out: PathBuf,
    },
}
