use crate::catalog::COLLECTIONS_FILENAME;
use crate::cli::CliArgs;
use crate::slug;
use std::path::{Path, PathBuf};

/// Where every artifact of the local library lives.
#[derive(Debug, Clone)]
pub(crate) struct LibraryLayout {
    pub(crate) audio_dir: PathBuf,
    pub(crate) image_dir: PathBuf,
    pub(crate) track_catalog_dir: PathBuf,
    pub(crate) collection_catalog_dir: PathBuf,
}

impl LibraryLayout {
    pub(crate) fn from_args(args: &CliArgs) -> Self {
        Self {
            audio_dir: args.audio_dir.clone(),
            image_dir: args.image_dir.clone(),
            track_catalog_dir: args.track_catalog_dir.clone(),
            collection_catalog_dir: args.collection_catalog_dir.clone(),
        }
    }

    /// Every directory lives under `root`, named like the defaults.
    #[cfg(test)]
    pub(crate) fn rooted_at(root: &Path) -> Self {
        Self {
            audio_dir: root.join("tracks"),
            image_dir: root.join("images"),
            track_catalog_dir: root.join("collections"),
            collection_catalog_dir: root.join("settings"),
        }
    }

    pub(crate) fn ensure_track_dirs(&self) -> std::io::Result<()> {
        ensure_dirs(&[
            self.audio_dir.as_path(),
            self.image_dir.as_path(),
            self.track_catalog_dir.as_path(),
        ])
    }

    pub(crate) fn ensure_artist_dirs(&self) -> std::io::Result<()> {
        ensure_dirs(&[self.image_dir.as_path(), self.collection_catalog_dir.as_path()])
    }

    pub(crate) fn audio_path(&self, track_name: &str) -> PathBuf {
        self.audio_dir.join(slug::mp3_filename(track_name))
    }

    pub(crate) fn image_path(&self, name: &str) -> PathBuf {
        self.image_dir.join(slug::jpeg_filename(name))
    }

    pub(crate) fn track_catalog_path(&self, artist_name: &str) -> PathBuf {
        self.track_catalog_dir.join(slug::csv_filename(artist_name))
    }

    pub(crate) fn collection_catalog_path(&self) -> PathBuf {
        self.collection_catalog_dir.join(COLLECTIONS_FILENAME)
    }
}

fn ensure_dirs(dirs: &[&Path]) -> std::io::Result<()> {
    for dir in dirs {
        std::fs::create_dir_all(dir)?;
    }
    Ok(())
}
