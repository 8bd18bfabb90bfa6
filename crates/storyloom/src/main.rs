//! Storyloom CLI binary.
//!
//! This binary provides command-line access to Storyloom's functionality:
//! - Generate a storyboard with narrative, panel images and exports
//! - Render a standalone video

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, Commands, GenerateOptions, VideoOptions, run_generate, run_video};

    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    // Initialize tracing; RUST_LOG takes precedence over --verbose
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    // Execute the requested command
    match cli.command {
        Commands::Generate {
            prompt,
            theme,
            duration,
            aspect_ratio,
            quality,
            out,
            archive,
            document,
            video,
        } => {
            run_generate(GenerateOptions {
                prompt,
                theme,
                duration,
                aspect_ratio,
                quality,
                out,
                archive,
                document,
                video,
            })
            .await?;
        }

        Commands::Video {
            prompt,
            aspect_ratio,
            image,
            out,
        } => {
            run_video(VideoOptions {
                prompt,
                aspect_ratio,
                image,
                out,
            })
            .await?;
        }
    }

    Ok(())
}
