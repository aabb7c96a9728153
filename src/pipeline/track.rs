use crate::catalog::{self, TrackRecord};
use crate::media::{self, Downloaded};
use crate::metadata::{self, TrackMetadata};
use crate::pipeline::{PipelineError, Services, fetch_image_if_absent, status, with_spinner};
use crate::slug;
use crate::video::VideoRequest;
use console::style;
use std::path::PathBuf;
use tempfile::TempDir;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TrackOutcome {
    pub(crate) record: TrackRecord,
    pub(crate) catalog_path: PathBuf,
}

/// Where a single "add track" run currently is.
///
/// `ResolveMetadata` and `ConfirmArtist` alternate until the user accepts the artist.
enum TrackState {
    AcquireMedia,
    NameTrack {
        scratch: TempDir,
        downloaded: Downloaded,
    },
    Transcode {
        scratch: TempDir,
        downloaded: Downloaded,
        track_name: String,
    },
    ResolveMetadata {
        track_name: String,
        search_text: String,
        artist_override: Option<String>,
    },
    ConfirmArtist {
        track_name: String,
        metadata: TrackMetadata,
        artist_override: Option<String>,
    },
    Persist {
        track_name: String,
        metadata: TrackMetadata,
        artist_override: Option<String>,
    },
}

enum Transition {
    Next(TrackState),
    Done(TrackOutcome),
}

pub(crate) async fn run_track_pipeline(services: &Services, raw_url: &str) -> Result<TrackOutcome, PipelineError> {
    services
        .layout
        .ensure_track_dirs()
        .map_err(PipelineError::filesystem("Failed to create library directories"))?;

    let mut state = TrackState::AcquireMedia;
    loop {
        match step(services, raw_url, state).await? {
            Transition::Next(next) => state = next,
            Transition::Done(outcome) => return Ok(outcome),
        }
    }
}

async fn step(services: &Services, raw_url: &str, state: TrackState) -> Result<Transition, PipelineError> {
    let next = match state {
        TrackState::AcquireMedia => {
            status(style("Downloading MP3 from YouTube...").bold());
            let video_url = VideoRequest::from_yt_url(raw_url)
                .map_err(media::MediaError::from)?
                .watch_url();

            let handle = media::acquire_stream(services.video_host.as_ref(), &video_url).await?;
            let scratch = tempfile::Builder::new()
                .prefix("xmp3-")
                .tempdir()
                .map_err(PipelineError::filesystem("Failed to create scratch directory"))?;
            let downloaded = media::download(services.video_host.as_ref(), &handle, scratch.path()).await?;

            TrackState::NameTrack { scratch, downloaded }
        }

        TrackState::NameTrack { scratch, downloaded } => {
            let track_name = services
                .prompter
                .ask_track_name(&downloaded.name)
                .await?
                .unwrap_or_else(|| downloaded.name.clone());

            TrackState::Transcode {
                scratch,
                downloaded,
                track_name,
            }
        }

        TrackState::Transcode {
            scratch,
            downloaded,
            track_name,
        } => {
            let audio_path = services.layout.audio_path(&track_name);
            status("Converting to MP3...");
            // no spinner here, the child tools frame their own output
            services.transcoder.transcode(&downloaded.path, &audio_path).await?;
            status(style("Conversion completed.").green());
            discard_scratch(scratch);
            status(format_args!("{} downloaded successfully.", style(slug::mp3_filename(&track_name)).green()));

            status(style("Downloading track image from Spotify...").bold());
            TrackState::ResolveMetadata {
                search_text: track_name.clone(),
                track_name,
                artist_override: None,
            }
        }

        TrackState::ResolveMetadata {
            track_name,
            search_text,
            artist_override,
        } => {
            tracing::debug!(%search_text, "resolving track metadata");
            let metadata = with_spinner(
                format!("Searching for {search_text}"),
                metadata::resolve_track(services.catalog_search.as_ref(), &search_text),
            )
            .await?;

            let cover_path = services.layout.image_path(&metadata.album_name);
            fetch_image_if_absent(services.images.as_ref(), &metadata.cover_image_url, &cover_path).await?;
            status(style("Track image downloaded successfully.").green());

            TrackState::ConfirmArtist {
                track_name,
                metadata,
                artist_override,
            }
        }

        TrackState::ConfirmArtist {
            track_name,
            metadata,
            artist_override,
        } => match services.prompter.ask_artist_override(&metadata.artist_names).await? {
            None => TrackState::Persist {
                track_name,
                metadata,
                artist_override,
            },
            Some(new_artist) => {
                let previous_cover = services.layout.image_path(&metadata.album_name);
                remove_cover(&previous_cover)?;

                status(style("Downloading track image from Spotify again...").bold());
                TrackState::ResolveMetadata {
                    search_text: format!("{track_name} {new_artist}"),
                    track_name,
                    artist_override: Some(new_artist),
                }
            }
        },

        TrackState::Persist {
            track_name,
            metadata,
            artist_override,
        } => {
            let artist = artist_override.unwrap_or(metadata.artist_names);
            let record = TrackRecord {
                file: slug::mp3_filename(&track_name),
                cover: slug::jpeg_filename(&metadata.album_name),
                title: track_name,
                artist,
                album: metadata.album_name,
            };

            let catalog_path = services.layout.track_catalog_path(&record.artist);
            catalog::append_record(&catalog_path, &record)?;
            status(format_args!("Successfully saved to {}", style(catalog_path.display()).green()));

            return Ok(Transition::Done(TrackOutcome { record, catalog_path }));
        }
    };

    Ok(Transition::Next(next))
}

/// Removes the scratch directory. Failing to do so never fails the run.
fn discard_scratch(scratch: TempDir) {
    let scratch_path = scratch.path().to_path_buf();
    if let Err(err) = scratch.close() {
        tracing::warn!(path = %scratch_path.display(), %err, "failed to remove scratch directory");
        eprintln!(
            "{} failed to remove scratch directory {}: {err}",
            style("Warning:").for_stderr().yellow().bold(),
            scratch_path.display()
        );
    }
}

fn remove_cover(path: &std::path::Path) -> Result<(), PipelineError> {
    match std::fs::remove_file(path) {
        Ok(()) => {
            tracing::debug!(path = %path.display(), "removed previous cover");
            Ok(())
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(PipelineError::filesystem(format!("Failed to remove {}", path.display()))(err)),
    }
}
