pub(crate) mod ffmpeg;
pub(crate) mod ytdlp;

use std::path::{Path, PathBuf};

/// Container every selected stream must come in.
pub(crate) const TARGET_CONTAINER: &str = "mp4";
/// Audio bitrate handed to the transcoder.
pub(crate) const TARGET_BITRATE: &str = "320k";

#[derive(Debug, thiserror::Error)]
pub(crate) enum MediaError {
    #[error(transparent)]
    InvalidVideoUrl(#[from] crate::video::VideoUrlError),
    #[error("No video stream available.")]
    NoPlayableStream,
    #[error("No audio stream found in the video file.")]
    NoAudioTrack,
    #[error("Download finished but no file was found in '{0}'")]
    DownloadMissing(PathBuf),
    #[error("{program} returned a non-zero exit code: {status}")]
    CommandFailed {
        program: String,
        status: std::process::ExitStatus,
    },
    #[error("Failed to run media tool: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse stream listing: {0}")]
    Json(#[from] serde_json::Error),
}

/// One downloadable rendition of a video, as reported by the video host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct StreamInfo {
    pub(crate) format_id: String,
    pub(crate) container: String,
    pub(crate) has_audio: bool,
    pub(crate) has_video: bool,
}

impl StreamInfo {
    /// Audio and video in a single file, no muxing step needed.
    pub(crate) fn is_progressive(&self) -> bool {
        self.has_audio && self.has_video
    }
}

/// The stream picked for download, bound to the video it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct StreamHandle {
    pub(crate) video_url: String,
    pub(crate) stream: StreamInfo,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Downloaded {
    pub(crate) path: PathBuf,
    /// Downloaded filename without its extension.
    pub(crate) name: String,
}

#[async_trait::async_trait]
pub(crate) trait VideoHost: Send + Sync {
    async fn list_streams(&self, video_url: &str) -> Result<Vec<StreamInfo>, MediaError>;

    /// Saves the stream into `scratch_dir` and returns the path of the saved file.
    async fn save_stream(&self, handle: &StreamHandle, scratch_dir: &Path) -> Result<PathBuf, MediaError>;
}

#[async_trait::async_trait]
pub(crate) trait Transcoder: Send + Sync {
    /// Converts `input` to an mp3 at [`TARGET_BITRATE`].
    ///
    /// Must fail with [`MediaError::NoAudioTrack`] when `input` carries no audio.
    async fn transcode(&self, input: &Path, output: &Path) -> Result<(), MediaError>;
}

pub(crate) async fn acquire_stream(host: &dyn VideoHost, video_url: &str) -> Result<StreamHandle, MediaError> {
    println!("Loading...");
    let streams = host.list_streams(video_url).await?;
    tracing::debug!(count = streams.len(), "streams listed");

    let stream = streams
        .into_iter()
        .find(|stream| stream.is_progressive() && stream.container == TARGET_CONTAINER)
        .ok_or(MediaError::NoPlayableStream)?;

    Ok(StreamHandle {
        video_url: video_url.to_string(),
        stream,
    })
}

pub(crate) async fn download(
    host: &dyn VideoHost,
    handle: &StreamHandle,
    scratch_dir: &Path,
) -> Result<Downloaded, MediaError> {
    println!("Downloading {}...", handle.stream.container.to_uppercase());
    let path = host.save_stream(handle, scratch_dir).await?;
    println!("{} downloaded successfully.", handle.stream.container.to_uppercase());

    let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(Downloaded { path, name })
}
