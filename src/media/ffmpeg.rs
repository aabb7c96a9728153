use crate::cli::PosixCommand;
use crate::media::{MediaError, TARGET_BITRATE, Transcoder};
use crate::process;
use std::path::Path;
use std::process::Stdio;

/// `ffprobe` prints one line per audio stream index; no lines means no audio.
pub(crate) fn lists_audio_stream(ffprobe_stdout: &[u8]) -> bool {
    String::from_utf8_lossy(ffprobe_stdout)
        .lines()
        .any(|line| !line.trim().is_empty())
}

pub(crate) struct Ffmpeg {
    ffmpeg: PosixCommand,
    ffprobe: PosixCommand,
    loglevel: String,
}

impl Ffmpeg {
    pub(crate) fn new(ffmpeg: PosixCommand, ffprobe: PosixCommand, loglevel: String) -> Self {
        Self {
            ffmpeg,
            ffprobe,
            loglevel,
        }
    }

    fn probe_command(&self, input: &Path) -> Vec<String> {
        let mut cmd = self.ffprobe.components.clone();
        cmd.extend(
            [
                "-v",
                "error",
                "-select_streams",
                "a",
                "-show_entries",
                "stream=index",
                "-of",
                "csv=p=0",
            ]
            .map(String::from),
        );
        cmd.push(input.display().to_string());
        cmd
    }

    fn transcode_command(&self, input: &Path, output: &Path) -> Vec<String> {
        let mut cmd = self.ffmpeg.components.clone();
        cmd.extend(["-loglevel", self.loglevel.as_str(), "-y", "-i"].map(String::from));
        cmd.push(input.display().to_string());
        cmd.extend(["-vn", "-codec:a", "libmp3lame", "-b:a", TARGET_BITRATE].map(String::from));
        cmd.push(output.display().to_string());
        cmd
    }
}

fn program_of(command: &PosixCommand) -> String {
    command.components.first().cloned().unwrap_or_default()
}

#[async_trait::async_trait]
impl Transcoder for Ffmpeg {
    async fn transcode(&self, input: &Path, output: &Path) -> Result<(), MediaError> {
        // both paths may be relative to where xmp3 was started
        let work_dir = Path::new(".");

        let probe = process::wrap_command_print_context(
            &self.probe_command(input),
            work_dir,
            |cmd| {
                cmd.stdout(Stdio::piped());
            },
            process::wait_for_child_output,
        )
        .await?;

        if !probe.exit_status.success() {
            return Err(MediaError::CommandFailed {
                program: program_of(&self.ffprobe),
                status: probe.exit_status,
            });
        }
        if !lists_audio_stream(&probe.data.stdout) {
            return Err(MediaError::NoAudioTrack);
        }

        let status = process::wrap_command_print_context(
            &self.transcode_command(input, output),
            work_dir,
            |_| {},
            process::wait_for_child,
        )
        .await?;

        if !status.exit_status.success() {
            return Err(MediaError::CommandFailed {
                program: program_of(&self.ffmpeg),
                status: status.exit_status,
            });
        }

        Ok(())
    }
}
