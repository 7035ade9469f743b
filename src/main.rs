// Main entry point for TapeFlow
// With no subcommand (or `play`) the cassette-deck TUI starts; `resolve` and
// `download` run a single YouTube lookup from the shell.

mod config;
mod error;
mod logging;
mod player;
mod ui;
mod youtube;

#[cfg(test)]
mod test_support;

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use config::Config;
use logging::LogTarget;
use player::playlist::Track;
use ui::app::MusicPlayerApp;
use ui::theme::JsonPreferenceStore;
use youtube::api::ApiFamily;
use youtube::download::Downloader;
use youtube::extractor::{require_video_id, watch_url};
use youtube::resolver::{HttpMirrorClient, StreamResolver};

#[derive(Parser)]
#[command(name = "tapeflow")]
#[command(about = "Retro cassette-style player for YouTube audio and local files")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the player, optionally preloading files or folders
    Play {
        /// Audio files or directories to add to the playlist
        paths: Vec<PathBuf>,
        /// API family used for YouTube lookups
        #[arg(long, value_enum)]
        api: Option<ApiFamily>,
    },
    /// Print the audio stream for a YouTube URL or video id
    Resolve {
        /// YouTube URL or 11-character video id
        input: String,
        #[arg(long, value_enum)]
        api: Option<ApiFamily>,
    },
    /// Save a YouTube video's audio to disk
    Download {
        /// YouTube URL or 11-character video id
        input: String,
        #[arg(long, value_enum)]
        api: Option<ApiFamily>,
        /// Output directory (defaults to the configured download directory)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let command = cli.command.unwrap_or(Commands::Play {
        paths: Vec::new(),
        api: None,
    });

    match command {
        Commands::Play { paths, api } => {
            logging::init(LogTarget::File)?;
            let config = Config::load()?;

            // Suppress ALSA error messages that pollute TUI
            std::env::set_var("ALSA_PCM_NO_MMAP", "1");

            let preferences = JsonPreferenceStore::open(JsonPreferenceStore::default_path());
            let mut app = MusicPlayerApp::new(
                &config,
                api.unwrap_or(config.default_api),
                Box::new(preferences),
            )?;
            app.preload(&paths);
            app.run().await?;
        }
        Commands::Resolve { input, api } => {
            logging::init(LogTarget::Stderr)?;
            let config = Config::load()?;
            let family = api.unwrap_or(config.default_api);

            let video_id = require_video_id(&input)?;
            let resolver = build_resolver(&config)?;
            let info = resolver.resolve(&input, family).await?;

            println!("{}", info.title);
            println!("{}", info.stream_url);
            println!("source: {}", watch_url(&video_id));
        }
        Commands::Download { input, api, out } => {
            logging::init(LogTarget::Stderr)?;
            let config = Config::load()?;
            let family = api.unwrap_or(config.default_api);

            let resolver = build_resolver(&config)?;
            let info = resolver.resolve(&input, family).await?;

            let dest = out.unwrap_or_else(|| config.download_dir());
            let downloader = Downloader::new(dest, config.request_timeout())
                .context("Failed to build HTTP client")?;
            let track = Track::youtube(info.title, info.stream_url);
            let path = downloader.download(&track, None).await?;

            println!("{}", path.display());
        }
    }

    Ok(())
}

fn build_resolver(config: &Config) -> anyhow::Result<StreamResolver<HttpMirrorClient>> {
    let client =
        HttpMirrorClient::new(config.request_timeout()).context("Failed to build HTTP client")?;
    Ok(StreamResolver::new(client, config.mirrors()))
}
