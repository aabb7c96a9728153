use std::fmt;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

#[derive(clap::Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub(crate) struct CliArgs {
    #[arg(long, default_value = "tracks", help = "Directory the converted mp3 files are written to")]
    pub(crate) audio_dir: PathBuf,
    #[arg(long, default_value = "images", help = "Directory album covers and artist images are written to")]
    pub(crate) image_dir: PathBuf,
    #[arg(
        long,
        default_value = "collections",
        help = "Directory holding one track catalog (<artist>.csv) per artist"
    )]
    pub(crate) track_catalog_dir: PathBuf,
    #[arg(
        long,
        default_value = "settings",
        help = "Directory holding the shared artist catalog (collections.csv)"
    )]
    pub(crate) collection_catalog_dir: PathBuf,
    #[arg(long, visible_alias("yt-dlp-command"), value_parser = parse_yt_dlp, default_value = "yt-dlp", help = "yt-dlp command to execute. NOTE: '--' and the video URL will automatically be appended to this.")]
    pub(crate) yt_dlp: PosixCommand,
    #[arg(long, visible_alias("ffmpeg-command"), value_parser = parse_ffmpeg, default_value = "ffmpeg", help = "ffmpeg command used to convert the downloaded video to mp3")]
    pub(crate) ffmpeg: PosixCommand,
    #[arg(long, visible_alias("ffprobe-command"), value_parser = parse_ffprobe, default_value = "ffprobe", help = "ffprobe command used to check the downloaded video for an audio stream")]
    pub(crate) ffprobe: PosixCommand,
    #[arg(long, default_value = "warning", help = "-loglevel to pass to ffmpeg commands")]
    pub(crate) ffmpeg_loglevel: String,
    #[arg(long, env = "CLIENT_ID", hide_env_values = true, help = "Spotify client id")]
    pub(crate) client_id: String,
    #[arg(long, env = "CLIENT_SECRET", hide_env_values = true, help = "Spotify client secret")]
    pub(crate) client_secret: String,
    #[arg(short, long, help = "Print diagnostic logs")]
    pub(crate) verbose: bool,
}

fn parse_yt_dlp(raw: &str) -> Result<PosixCommand, CliError> {
    PosixCommand::from_raw(raw).ok_or_else(|| CliError::YtDlpCommand {
        erroneous_command: raw.to_string(),
    })
}

fn parse_ffmpeg(raw: &str) -> Result<PosixCommand, CliError> {
    PosixCommand::from_raw(raw).ok_or_else(|| CliError::FfmpegCommand {
        erroneous_command: raw.to_string(),
    })
}

fn parse_ffprobe(raw: &str) -> Result<PosixCommand, CliError> {
    PosixCommand::from_raw(raw).ok_or_else(|| CliError::FfprobeCommand {
        erroneous_command: raw.to_string(),
    })
}

#[derive(Debug, Clone, thiserror::Error)]
pub(crate) enum CliError {
    #[error("The provided yt-dlp command is malformed")]
    YtDlpCommand { erroneous_command: String },
    #[error("The provided ffmpeg command is malformed")]
    FfmpegCommand { erroneous_command: String },
    #[error("The provided ffprobe command is malformed")]
    FfprobeCommand { erroneous_command: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PosixCommand {
    pub(crate) components: Vec<String>,
}

impl PosixCommand {
    fn new(args: Vec<String>) -> Self {
        Self { components: args }
    }

    /// Shell-splits `raw`; `None` when quoting is unbalanced or nothing is left.
    pub(crate) fn from_raw(raw: &str) -> Option<Self> {
        shlex::split(raw).filter(|args| !args.is_empty()).map(Self::new)
    }
}

impl Display for PosixCommand {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}
