#[derive(Debug, thiserror::Error)]
pub(crate) enum MetadataError {
    #[error("No album image found for track: {query}")]
    TrackMetadataNotFound { query: String },
    #[error("No image found for artist: {name}")]
    ArtistMetadataNotFound { name: String },
    #[error("Catalog search failed: {0}")]
    Service(#[from] SearchError),
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum SearchError {
    #[error("{0}")]
    Http(#[from] reqwest::Error),
    #[error("catalog service token request was rejected (http code: {0})")]
    TokenRejected(reqwest::StatusCode),
}

/// One track search result, as ranked by the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TrackHit {
    pub(crate) artist_names: Vec<String>,
    pub(crate) album: Option<AlbumHit>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AlbumHit {
    pub(crate) name: String,
    /// Largest first.
    pub(crate) image_urls: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ArtistHit {
    pub(crate) name: String,
    pub(crate) image_urls: Vec<String>,
}

/// Free-text search against the music catalog. Results are in the service's own ranking.
#[async_trait::async_trait]
pub(crate) trait CatalogSearch: Send + Sync {
    async fn search_tracks(&self, query: &str, limit: u32) -> Result<Vec<TrackHit>, SearchError>;
    async fn search_artists(&self, query: &str, limit: u32) -> Result<Vec<ArtistHit>, SearchError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TrackMetadata {
    /// Display names of every credited artist, joined with ", ".
    pub(crate) artist_names: String,
    pub(crate) album_name: String,
    pub(crate) cover_image_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ArtistMetadata {
    pub(crate) image_url: String,
    pub(crate) canonical_name: String,
}

pub(crate) async fn resolve_track(search: &dyn CatalogSearch, query: &str) -> Result<TrackMetadata, MetadataError> {
    let not_found = || MetadataError::TrackMetadataNotFound {
        query: query.to_string(),
    };

    // first result wins, no secondary scoring
    let track = search.search_tracks(query, 1).await?.into_iter().next().ok_or_else(not_found)?;
    let album = track.album.ok_or_else(not_found)?;
    let cover_image_url = album.image_urls.into_iter().next().ok_or_else(not_found)?;

    Ok(TrackMetadata {
        artist_names: track.artist_names.join(", "),
        album_name: album.name,
        cover_image_url,
    })
}

pub(crate) async fn resolve_artist(search: &dyn CatalogSearch, name: &str) -> Result<ArtistMetadata, MetadataError> {
    let not_found = || MetadataError::ArtistMetadataNotFound { name: name.to_string() };

    let artist = search.search_artists(name, 1).await?.into_iter().next().ok_or_else(not_found)?;
    let image_url = artist.image_urls.into_iter().next().ok_or_else(not_found)?;

    Ok(ArtistMetadata {
        image_url,
        canonical_name: artist.name,
    })
}
