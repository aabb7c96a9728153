pub(crate) mod artist;
pub(crate) mod track;

#[cfg(test)]
pub(crate) mod testing;

use crate::catalog::CatalogError;
use crate::image::{ImageFetchError, ImageFetcher, is_already_present};
use crate::library::LibraryLayout;
use crate::media::{MediaError, Transcoder, VideoHost};
use crate::metadata::{CatalogSearch, MetadataError};
use crate::user::{PromptError, Prompter};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;

/// Any failure that ends a pipeline run. None of them are recovered from.
#[derive(Debug, thiserror::Error)]
pub(crate) enum PipelineError {
    #[error(transparent)]
    Media(#[from] MediaError),
    #[error(transparent)]
    Metadata(#[from] MetadataError),
    #[error(transparent)]
    ImageFetch(#[from] ImageFetchError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("{context}: {source}")]
    Filesystem {
        context: String,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Prompt(#[from] PromptError),
}

impl PipelineError {
    pub(crate) fn filesystem(context: impl Into<String>) -> impl FnOnce(std::io::Error) -> Self {
        let context = context.into();
        move |source| Self::Filesystem { context, source }
    }
}

/// The collaborators a pipeline talks to, built once at startup.
pub(crate) struct Services {
    pub(crate) layout: LibraryLayout,
    pub(crate) video_host: Box<dyn VideoHost>,
    pub(crate) transcoder: Box<dyn Transcoder>,
    pub(crate) catalog_search: Box<dyn CatalogSearch>,
    pub(crate) images: Box<dyn ImageFetcher>,
    pub(crate) prompter: Box<dyn Prompter>,
}

/// Prints a progress line for the user, and records it unstyled in the log.
pub(crate) fn status(line: impl std::fmt::Display) {
    let line = line.to_string();
    tracing::info!(status = %console::strip_ansi_codes(&line));
    println!("{line}");
}

/// Ticks a spinner until `future` resolves. The future must not write to the terminal.
pub(crate) async fn with_spinner<F: Future>(message: impl Into<String>, future: F) -> F::Output {
    let spinner = ProgressBar::new_spinner();
    if let Ok(spinner_style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        spinner.set_style(spinner_style);
    }
    spinner.set_message(message.into());
    spinner.enable_steady_tick(Duration::from_millis(100));

    let output = future.await;
    spinner.finish_and_clear();
    output
}

/// Fetches `url` into `save_path` unless that file already exists.
///
/// Returns whether a fetch happened.
pub(crate) async fn fetch_image_if_absent(
    images: &dyn ImageFetcher,
    url: &str,
    save_path: &Path,
) -> Result<bool, ImageFetchError> {
    if is_already_present(save_path) {
        let filename = save_path.file_name().unwrap_or(save_path.as_os_str());
        status(format_args!("{} already exists.", style(filename.to_string_lossy()).yellow()));
        tracing::debug!(path = %save_path.display(), "skipping image fetch");
        return Ok(false);
    }

    with_spinner(format!("Fetching {url}"), images.fetch(url, save_path)).await?;
    Ok(true)
}
