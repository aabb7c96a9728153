use crate::metadata::{AlbumHit, ArtistHit, CatalogSearch, SearchError, TrackHit};
use std::time::{Duration, Instant};

const SPOTIFY_ACCOUNTS_URL: &str = "https://accounts.spotify.com";
const SPOTIFY_API_URL: &str = "https://api.spotify.com";

// refresh a little before the service would reject the token
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(60);

pub(crate) mod response {
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize, Clone, Debug)]
    pub(crate) struct Token {
        pub(crate) access_token: String,
        pub(crate) expires_in: u64,
    }

    #[derive(Serialize, Deserialize, Clone, Debug, Default)]
    pub(crate) struct Search {
        #[serde(default)]
        pub(crate) tracks: Option<Page<TrackItem>>,
        #[serde(default)]
        pub(crate) artists: Option<Page<ArtistItem>>,
    }

    #[derive(Serialize, Deserialize, Clone, Debug)]
    pub(crate) struct Page<T> {
        #[serde(default = "Vec::new")]
        pub(crate) items: Vec<T>,
    }

    #[derive(Serialize, Deserialize, Clone, Debug)]
    pub(crate) struct TrackItem {
        pub(crate) name: String,
        #[serde(default)]
        pub(crate) artists: Vec<ArtistRef>,
        #[serde(default)]
        pub(crate) album: Option<AlbumItem>,
    }

    #[derive(Serialize, Deserialize, Clone, Debug)]
    pub(crate) struct ArtistRef {
        pub(crate) name: String,
    }

    #[derive(Serialize, Deserialize, Clone, Debug)]
    pub(crate) struct AlbumItem {
        pub(crate) name: String,
        #[serde(default)]
        pub(crate) images: Vec<Image>,
    }

    #[derive(Serialize, Deserialize, Clone, Debug)]
    pub(crate) struct ArtistItem {
        pub(crate) name: String,
        #[serde(default)]
        pub(crate) images: Vec<Image>,
    }

    #[derive(Serialize, Deserialize, Clone, Debug)]
    pub(crate) struct Image {
        pub(crate) url: String,
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Credentials {
    pub(crate) client_id: String,
    pub(crate) client_secret: String,
}

struct CachedToken {
    access_token: String,
    valid_until: Instant,
}

/// Spotify Web API search, authenticated with the client-credentials grant.
pub(crate) struct SpotifyClient {
    http: reqwest::Client,
    credentials: Credentials,
    accounts_url: String,
    api_url: String,
    token: tokio::sync::Mutex<Option<CachedToken>>,
}

impl SpotifyClient {
    pub(crate) fn new(http: reqwest::Client, credentials: Credentials) -> Self {
        Self::with_base_urls(http, credentials, SPOTIFY_ACCOUNTS_URL, SPOTIFY_API_URL)
    }

    pub(crate) fn with_base_urls(
        http: reqwest::Client,
        credentials: Credentials,
        accounts_url: impl Into<String>,
        api_url: impl Into<String>,
    ) -> Self {
        Self {
            http,
            credentials,
            accounts_url: accounts_url.into(),
            api_url: api_url.into(),
            token: tokio::sync::Mutex::new(None),
        }
    }

    async fn access_token(&self) -> Result<String, SearchError> {
        let mut cached = self.token.lock().await;

        if let Some(token) = cached.as_ref() {
            if Instant::now() < token.valid_until {
                return Ok(token.access_token.clone());
            }
        }

        tracing::debug!("requesting catalog service access token");
        let response = self
            .http
            .post(format!("{}/api/token", self.accounts_url))
            .basic_auth(&self.credentials.client_id, Some(&self.credentials.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SearchError::TokenRejected(response.status()));
        }

        let token: response::Token = response.json().await?;
        let lifetime = Duration::from_secs(token.expires_in).saturating_sub(TOKEN_EXPIRY_MARGIN);
        cached.replace(CachedToken {
            access_token: token.access_token.clone(),
            valid_until: Instant::now() + lifetime,
        });

        Ok(token.access_token)
    }

    async fn search(&self, query: &str, kind: &str, limit: u32) -> Result<response::Search, SearchError> {
        let token = self.access_token().await?;

        let limit = limit.to_string();
        tracing::debug!(query, kind, limit, "catalog search");
        let data: response::Search = self
            .http
            .get(format!("{}/v1/search", self.api_url))
            .bearer_auth(token)
            .query(&[("q", query), ("type", kind), ("limit", limit.as_str())])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(data)
    }
}

fn image_urls(images: Vec<response::Image>) -> Vec<String> {
    images.into_iter().map(|image| image.url).collect()
}

impl From<response::TrackItem> for TrackHit {
    fn from(item: response::TrackItem) -> Self {
        Self {
            artist_names: item.artists.into_iter().map(|artist| artist.name).collect(),
            album: item.album.map(|album| AlbumHit {
                name: album.name,
                image_urls: image_urls(album.images),
            }),
        }
    }
}

impl From<response::ArtistItem> for ArtistHit {
    fn from(item: response::ArtistItem) -> Self {
        Self {
            name: item.name,
            image_urls: image_urls(item.images),
        }
    }
}

#[async_trait::async_trait]
impl CatalogSearch for SpotifyClient {
    async fn search_tracks(&self, query: &str, limit: u32) -> Result<Vec<TrackHit>, SearchError> {
        let data = self.search(query, "track", limit).await?;
        let items = data.tracks.map(|page| page.items).unwrap_or_default();
        Ok(items.into_iter().map(TrackHit::from).collect())
    }

    async fn search_artists(&self, query: &str, limit: u32) -> Result<Vec<ArtistHit>, SearchError> {
        let data = self.search(query, "artist", limit).await?;
        let items = data.artists.map(|page| page.items).unwrap_or_default();
        Ok(items.into_iter().map(ArtistHit::from).collect())
    }
}
