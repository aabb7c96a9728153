mod catalog;
mod cli;
mod image;
mod library;
mod media;
mod metadata;
mod pipeline;
mod process;
mod shell;
mod signals;
mod slug;
mod spotify;
mod user;
mod video;

use crate::cli::CliArgs;
use crate::image::HttpImageFetcher;
use crate::library::LibraryLayout;
use crate::media::ffmpeg::Ffmpeg;
use crate::media::ytdlp::YtDlp;
use crate::pipeline::Services;
use crate::spotify::{Credentials, SpotifyClient};
use crate::user::TerminalPrompter;
use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn build_services(args: CliArgs) -> anyhow::Result<Services> {
    let http = reqwest::Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to build HTTP client")?;

    let layout = LibraryLayout::from_args(&args);
    let credentials = Credentials {
        client_id: args.client_id,
        client_secret: args.client_secret,
    };

    Ok(Services {
        layout,
        video_host: Box::new(YtDlp::new(args.yt_dlp)),
        transcoder: Box::new(Ffmpeg::new(args.ffmpeg, args.ffprobe, args.ffmpeg_loglevel)),
        catalog_search: Box::new(SpotifyClient::new(http.clone(), credentials)),
        images: Box::new(HttpImageFetcher::new(http)),
        prompter: Box::new(TerminalPrompter),
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // a missing .env is fine, credentials may come from the environment or flags
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    init_logging(args.verbose);

    signals::spawn_ctrlc_listener();

    let services = build_services(args)?;
    shell::run(&services).await?;
    Ok(())
}
