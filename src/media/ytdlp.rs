use crate::cli::PosixCommand;
use crate::media::{MediaError, StreamHandle, StreamInfo, VideoHost};
use crate::process;
use std::path::{Path, PathBuf};
use std::process::Stdio;

const OUTPUT_TEMPLATE: &str = "%(title)s.%(ext)s";

pub(crate) mod response {
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize, Clone, Debug)]
    pub(crate) struct VideoInfo {
        #[serde(default)]
        pub(crate) title: Option<String>,
        #[serde(default)]
        pub(crate) formats: Vec<Format>,
    }

    #[derive(Serialize, Deserialize, Clone, Debug)]
    pub(crate) struct Format {
        pub(crate) format_id: String,
        pub(crate) ext: String,
        #[serde(default)]
        pub(crate) acodec: Option<String>,
        #[serde(default)]
        pub(crate) vcodec: Option<String>,
    }
}

fn has_codec(codec: &Option<String>) -> bool {
    codec.as_deref().is_some_and(|codec| !codec.is_empty() && codec != "none")
}

pub(crate) fn streams_from_info_json(raw: &[u8]) -> Result<Vec<StreamInfo>, serde_json::Error> {
    let info: response::VideoInfo = serde_json::from_slice(raw)?;
    tracing::debug!(title = ?info.title, formats = info.formats.len(), "parsed yt-dlp info json");

    Ok(info
        .formats
        .into_iter()
        .map(|format| StreamInfo {
            has_audio: has_codec(&format.acodec),
            has_video: has_codec(&format.vcodec),
            format_id: format.format_id,
            container: format.ext,
        })
        .collect())
}

/// Regular files left in `path` by a finished download, in name order.
pub(crate) fn downloaded_filenames_in_directory(path: &Path) -> Vec<String> {
    let contents = match std::fs::read_dir(path) {
        Ok(contents) => contents,
        Err(_) => return vec![],
    };

    let mut names: Vec<String> = contents
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_ok_and(|file_type| file_type.is_file()))
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| !name.ends_with(".part") && !name.ends_with(".ytdl"))
        .collect();
    names.sort();
    names
}

/// Video host backed by the `yt-dlp` executable.
pub(crate) struct YtDlp {
    command: PosixCommand,
}

impl YtDlp {
    pub(crate) fn new(command: PosixCommand) -> Self {
        Self { command }
    }

    fn command_with(&self, extra: &[&str]) -> Vec<String> {
        let mut full = Vec::with_capacity(self.command.components.len() + extra.len());
        full.extend(self.command.components.iter().cloned());
        full.extend(extra.iter().map(|arg| arg.to_string()));
        full
    }

    fn program(&self) -> String {
        self.command.components.first().cloned().unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl VideoHost for YtDlp {
    async fn list_streams(&self, video_url: &str) -> Result<Vec<StreamInfo>, MediaError> {
        let cmd = self.command_with(&["--dump-single-json", "--no-playlist", "--", video_url]);

        let output = process::wrap_command_print_context(
            &cmd,
            &std::env::temp_dir(),
            |cmd| {
                cmd.stdout(Stdio::piped());
            },
            process::wait_for_child_output,
        )
        .await?;

        if !output.exit_status.success() {
            return Err(MediaError::CommandFailed {
                program: self.program(),
                status: output.exit_status,
            });
        }

        Ok(streams_from_info_json(&output.data.stdout)?)
    }

    async fn save_stream(&self, handle: &StreamHandle, scratch_dir: &Path) -> Result<PathBuf, MediaError> {
        let cmd = self.command_with(&[
            "--format",
            handle.stream.format_id.as_str(),
            "--no-playlist",
            "--output",
            OUTPUT_TEMPLATE,
            "--",
            handle.video_url.as_str(),
        ]);

        let status =
            process::wrap_command_print_context(&cmd, scratch_dir, |_| {}, process::wait_for_child).await?;

        if !status.exit_status.success() {
            return Err(MediaError::CommandFailed {
                program: self.program(),
                status: status.exit_status,
            });
        }

        downloaded_filenames_in_directory(scratch_dir)
            .into_iter()
            .next()
            .map(|name| scratch_dir.join(name))
            .ok_or_else(|| MediaError::DownloadMissing(scratch_dir.to_path_buf()))
    }
}
