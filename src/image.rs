use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub(crate) enum ImageFetchError {
    #[error("Failed to download image from {url} (http code: {status})")]
    Failed { url: String, status: reqwest::StatusCode },
    #[error("Failed to download image from {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Failed to save image to '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Downloads one image and stores it at `save_path`, overwriting whatever is there.
///
/// Callers decide whether a fetch is needed, see [`is_already_present`].
#[async_trait::async_trait]
pub(crate) trait ImageFetcher: Send + Sync {
    async fn fetch(&self, url: &str, save_path: &Path) -> Result<(), ImageFetchError>;
}

/// An image whose derived filename already exists is never fetched again.
pub(crate) fn is_already_present(save_path: &Path) -> bool {
    save_path.exists()
}

pub(crate) struct HttpImageFetcher {
    client: reqwest::Client,
}

impl HttpImageFetcher {
    pub(crate) fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl ImageFetcher for HttpImageFetcher {
    async fn fetch(&self, url: &str, save_path: &Path) -> Result<(), ImageFetchError> {
        let http_err = |source| ImageFetchError::Http {
            url: url.to_string(),
            source,
        };
        let io_err = |source| ImageFetchError::Io {
            path: save_path.display().to_string(),
            source,
        };

        tracing::debug!(url, "fetching image");
        let response = self.client.get(url).send().await.map_err(http_err)?;

        if response.status() != reqwest::StatusCode::OK {
            return Err(ImageFetchError::Failed {
                url: url.to_string(),
                status: response.status(),
            });
        }

        let bytes = response.bytes().await.map_err(http_err)?;

        if let Some(parent) = save_path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
        }
        tokio::fs::write(save_path, &bytes).await.map_err(io_err)?;

        tracing::debug!(path = %save_path.display(), bytes = bytes.len(), "image saved");
        Ok(())
    }
}
