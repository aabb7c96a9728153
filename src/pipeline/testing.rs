//! In-memory stand-ins for every pipeline collaborator.

use crate::image::{ImageFetchError, ImageFetcher};
use crate::library::LibraryLayout;
use crate::media::{MediaError, StreamHandle, StreamInfo, Transcoder, VideoHost};
use crate::metadata::{AlbumHit, ArtistHit, CatalogSearch, SearchError, TrackHit};
use crate::pipeline::Services;
use crate::user::{PromptError, Prompter};
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Serves one progressive mp4 and "downloads" it as `<title>.mp4`.
pub(crate) struct FakeVideoHost {
    pub(crate) title: String,
    pub(crate) streams: Vec<StreamInfo>,
    /// Save here instead, and delete the scratch directory out from under the pipeline.
    pub(crate) save_elsewhere: Option<PathBuf>,
}

impl FakeVideoHost {
    pub(crate) fn titled(title: &str) -> Self {
        Self {
            title: title.to_string(),
            streams: vec![
                StreamInfo {
                    format_id: "140".to_string(),
                    container: "m4a".to_string(),
                    has_audio: true,
                    has_video: false,
                },
                StreamInfo {
                    format_id: "18".to_string(),
                    container: "mp4".to_string(),
                    has_audio: true,
                    has_video: true,
                },
            ],
            save_elsewhere: None,
        }
    }
}

#[async_trait::async_trait]
impl VideoHost for FakeVideoHost {
    async fn list_streams(&self, _video_url: &str) -> Result<Vec<StreamInfo>, MediaError> {
        Ok(self.streams.clone())
    }

    async fn save_stream(&self, handle: &StreamHandle, scratch_dir: &Path) -> Result<PathBuf, MediaError> {
        let filename = format!("{}.{}", self.title, handle.stream.container);
        let path = match &self.save_elsewhere {
            Some(dir) => {
                std::fs::remove_dir_all(scratch_dir)?;
                dir.join(filename)
            }
            None => scratch_dir.join(filename),
        };
        std::fs::write(&path, b"mp4 container")?;
        Ok(path)
    }
}

/// Copies the input to the output, or reports a missing audio track.
#[derive(Default)]
pub(crate) struct FakeTranscoder {
    pub(crate) without_audio: bool,
    pub(crate) inputs: Mutex<Vec<PathBuf>>,
}

#[async_trait::async_trait]
impl Transcoder for FakeTranscoder {
    async fn transcode(&self, input: &Path, output: &Path) -> Result<(), MediaError> {
        self.inputs.lock().unwrap().push(input.to_path_buf());
        if self.without_audio {
            return Err(MediaError::NoAudioTrack);
        }
        std::fs::copy(input, output)?;
        Ok(())
    }
}

/// Answers searches from fixed tables and remembers every query.
#[derive(Default)]
pub(crate) struct FakeCatalog {
    tracks: HashMap<String, TrackHit>,
    artists: HashMap<String, ArtistHit>,
    pub(crate) queries: Mutex<Vec<String>>,
}

impl FakeCatalog {
    pub(crate) fn with_track(mut self, query: &str, artists: &[&str], album: &str, image_url: &str) -> Self {
        self.tracks.insert(
            query.to_string(),
            TrackHit {
                artist_names: artists.iter().map(|name| name.to_string()).collect(),
                album: Some(AlbumHit {
                    name: album.to_string(),
                    image_urls: vec![image_url.to_string()],
                }),
            },
        );
        self
    }

    pub(crate) fn with_artist(mut self, query: &str, name: &str, image_url: &str) -> Self {
        self.artists.insert(
            query.to_string(),
            ArtistHit {
                name: name.to_string(),
                image_urls: vec![image_url.to_string()],
            },
        );
        self
    }

    pub(crate) fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl CatalogSearch for FakeCatalog {
    async fn search_tracks(&self, query: &str, _limit: u32) -> Result<Vec<TrackHit>, SearchError> {
        self.queries.lock().unwrap().push(query.to_string());
        Ok(self.tracks.get(query).cloned().into_iter().collect())
    }

    async fn search_artists(&self, query: &str, _limit: u32) -> Result<Vec<ArtistHit>, SearchError> {
        self.queries.lock().unwrap().push(query.to_string());
        Ok(self.artists.get(query).cloned().into_iter().collect())
    }
}

/// Writes the requested URL as the image body.
#[derive(Default, Clone)]
pub(crate) struct RecordingImages {
    fetched: Arc<Mutex<Vec<String>>>,
}

impl RecordingImages {
    pub(crate) fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl ImageFetcher for RecordingImages {
    async fn fetch(&self, url: &str, save_path: &Path) -> Result<(), ImageFetchError> {
        self.fetched.lock().unwrap().push(url.to_string());
        std::fs::write(save_path, url).map_err(|source| ImageFetchError::Io {
            path: save_path.display().to_string(),
            source,
        })
    }
}

/// Replays canned answers; running out of answers means "keep the default".
#[derive(Default)]
pub(crate) struct ScriptedPrompter {
    track_names: Mutex<VecDeque<Option<String>>>,
    artist_overrides: Mutex<VecDeque<Option<String>>>,
    pub(crate) asked_artists: Mutex<Vec<String>>,
}

impl ScriptedPrompter {
    pub(crate) fn track_name(self, answer: Option<&str>) -> Self {
        self.track_names.lock().unwrap().push_back(answer.map(str::to_string));
        self
    }

    pub(crate) fn artist_override(self, answer: Option<&str>) -> Self {
        self.artist_overrides
            .lock()
            .unwrap()
            .push_back(answer.map(str::to_string));
        self
    }
}

#[async_trait::async_trait]
impl Prompter for ScriptedPrompter {
    async fn ask_menu_option(&self) -> Result<String, PromptError> {
        Ok("3".to_string())
    }

    async fn ask_video_url(&self) -> Result<String, PromptError> {
        Ok("https://youtu.be/dQw4w9WgXcQ".to_string())
    }

    async fn ask_artist_name(&self) -> Result<String, PromptError> {
        Ok(String::new())
    }

    async fn ask_track_name(&self, _inferred: &str) -> Result<Option<String>, PromptError> {
        Ok(self.track_names.lock().unwrap().pop_front().flatten())
    }

    async fn ask_artist_override(&self, resolved: &str) -> Result<Option<String>, PromptError> {
        self.asked_artists.lock().unwrap().push(resolved.to_string());
        Ok(self.artist_overrides.lock().unwrap().pop_front().flatten())
    }
}

/// Collects `tracing` output for the current thread while the guard lives.
#[derive(Clone, Default)]
pub(crate) struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub(crate) fn install() -> (Self, tracing::subscriber::DefaultGuard) {
        let logs = Self::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .finish();
        (logs, tracing::subscriber::set_default(subscriber))
    }

    pub(crate) fn output(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Services rooted in `root`, sharing the given fakes through `Arc`s.
pub(crate) struct Harness {
    pub(crate) layout: LibraryLayout,
    pub(crate) catalog: Arc<FakeCatalog>,
    pub(crate) transcoder: Arc<FakeTranscoder>,
    pub(crate) images: RecordingImages,
    pub(crate) prompter: Arc<ScriptedPrompter>,
}

impl Harness {
    pub(crate) fn new(root: &Path, catalog: FakeCatalog, transcoder: FakeTranscoder, prompter: ScriptedPrompter) -> Self {
        Self {
            layout: LibraryLayout::rooted_at(root),
            catalog: Arc::new(catalog),
            transcoder: Arc::new(transcoder),
            images: RecordingImages::default(),
            prompter: Arc::new(prompter),
        }
    }

    pub(crate) fn services(&self, video_host: FakeVideoHost) -> Services {
        Services {
            layout: self.layout.clone(),
            video_host: Box::new(video_host),
            transcoder: Box::new(Shared(self.transcoder.clone())),
            catalog_search: Box::new(Shared(self.catalog.clone())),
            images: Box::new(self.images.clone()),
            prompter: Box::new(Shared(self.prompter.clone())),
        }
    }
}

/// Lets a test keep a handle on a fake after handing it to [`Services`].
pub(crate) struct Shared<T>(pub(crate) Arc<T>);

#[async_trait::async_trait]
impl<T: Transcoder> Transcoder for Shared<T> {
    async fn transcode(&self, input: &Path, output: &Path) -> Result<(), MediaError> {
        self.0.transcode(input, output).await
    }
}

#[async_trait::async_trait]
impl<T: CatalogSearch> CatalogSearch for Shared<T> {
    async fn search_tracks(&self, query: &str, limit: u32) -> Result<Vec<TrackHit>, SearchError> {
        self.0.search_tracks(query, limit).await
    }

    async fn search_artists(&self, query: &str, limit: u32) -> Result<Vec<ArtistHit>, SearchError> {
        self.0.search_artists(query, limit).await
    }
}

#[async_trait::async_trait]
impl<T: Prompter> Prompter for Shared<T> {
    async fn ask_menu_option(&self) -> Result<String, PromptError> {
        self.0.ask_menu_option().await
    }

    async fn ask_video_url(&self) -> Result<String, PromptError> {
        self.0.ask_video_url().await
    }

    async fn ask_artist_name(&self) -> Result<String, PromptError> {
        self.0.ask_artist_name().await
    }

    async fn ask_track_name(&self, inferred: &str) -> Result<Option<String>, PromptError> {
        self.0.ask_track_name(inferred).await
    }

    async fn ask_artist_override(&self, resolved: &str) -> Result<Option<String>, PromptError> {
        self.0.ask_artist_override(resolved).await
    }
}
