use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Fixed username every collection row is registered under.
pub(crate) const USERNAME: &str = "xmp3";
pub(crate) const ARTIST_DESCRIPTION: &str = "Artist";
pub(crate) const COLLECTIONS_FILENAME: &str = "collections.csv";

#[derive(Debug, thiserror::Error)]
pub(crate) enum CatalogError {
    #[error("Failed to write catalog '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to encode catalog row for '{path}': {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },
}

/// A row shape with a fixed column order.
pub(crate) trait CatalogRecord {
    const COLUMNS: &'static [&'static str];

    fn fields(&self) -> Vec<&str>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TrackRecord {
    pub(crate) title: String,
    pub(crate) artist: String,
    pub(crate) album: String,
    pub(crate) cover: String,
    pub(crate) file: String,
}

impl CatalogRecord for TrackRecord {
    const COLUMNS: &'static [&'static str] = &["title", "artist", "album", "cover", "file"];

    fn fields(&self) -> Vec<&str> {
        vec![
            self.title.as_str(),
            self.artist.as_str(),
            self.album.as_str(),
            self.cover.as_str(),
            self.file.as_str(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CollectionRecord {
    pub(crate) username: String,
    pub(crate) filename: String,
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) image: String,
}

impl CatalogRecord for CollectionRecord {
    const COLUMNS: &'static [&'static str] = &["username", "filename", "name", "description", "image"];

    fn fields(&self) -> Vec<&str> {
        vec![
            self.username.as_str(),
            self.filename.as_str(),
            self.name.as_str(),
            self.description.as_str(),
            self.image.as_str(),
        ]
    }
}

pub(crate) fn append_record<R: CatalogRecord>(path: &Path, record: &R) -> Result<(), CatalogError> {
    append(path, R::COLUMNS, &record.fields())
}

/// Appends one row, writing `columns` first when the file is new.
///
/// The header check and the row write happen under an exclusive lock on an
/// `O_APPEND` descriptor, so concurrent invocations never interleave rows or
/// duplicate the header. Parent directories must already exist.
pub(crate) fn append(path: &Path, columns: &[&str], row: &[&str]) -> Result<(), CatalogError> {
    let io_err = |source| CatalogError::Io {
        path: path.display().to_string(),
        source,
    };

    let file = File::options().append(true).create(true).open(path).map_err(io_err)?;
    let mut lock = fd_lock::RwLock::new(file);
    let mut guard = lock.write().map_err(io_err)?;

    let is_new = guard.metadata().map_err(io_err)?.len() == 0;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::CRLF)
        .from_writer(Vec::new());

    let csv_err = |source| CatalogError::Csv {
        path: path.display().to_string(),
        source,
    };
    if is_new {
        writer.write_record(columns).map_err(csv_err)?;
    }
    writer.write_record(row).map_err(csv_err)?;

    let buffer = writer
        .into_inner()
        .map_err(|err| io_err(std::io::Error::other(err.to_string())))?;

    // single write so the row lands in one append
    guard.write_all(&buffer).map_err(io_err)?;
    guard.flush().map_err(io_err)?;

    tracing::debug!(path = %path.display(), new_file = is_new, "appended catalog row");
    Ok(())
}
