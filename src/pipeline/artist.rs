use crate::catalog::{self, ARTIST_DESCRIPTION, CollectionRecord, USERNAME};
use crate::metadata;
use crate::pipeline::{PipelineError, Services, fetch_image_if_absent, status, with_spinner};
use crate::slug;
use console::style;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ArtistOutcome {
    pub(crate) record: CollectionRecord,
    pub(crate) catalog_path: PathBuf,
}

/// Registers `artist_name` as a collection, fetching its profile image once.
pub(crate) async fn run_artist_pipeline(services: &Services, artist_name: &str) -> Result<ArtistOutcome, PipelineError> {
    services
        .layout
        .ensure_artist_dirs()
        .map_err(PipelineError::filesystem("Failed to create library directories"))?;

    status(style("Downloading artist image from Spotify...").bold());
    let artist = with_spinner(
        format!("Searching for {artist_name}"),
        metadata::resolve_artist(services.catalog_search.as_ref(), artist_name),
    )
    .await?;

    let image_path = services.layout.image_path(&artist.canonical_name);
    if fetch_image_if_absent(services.images.as_ref(), &artist.image_url, &image_path).await? {
        status(style("Image downloaded successfully.").green());
    }

    let record = CollectionRecord {
        username: USERNAME.to_string(),
        filename: slug::slug(artist_name),
        name: artist_name.to_string(),
        description: ARTIST_DESCRIPTION.to_string(),
        image: slug::jpeg_filename(artist_name),
    };

    let catalog_path = services.layout.collection_catalog_path();
    catalog::append_record(&catalog_path, &record)?;
    status(format_args!("Successfully saved to {}", style(catalog_path.display()).green()));

    Ok(ArtistOutcome { record, catalog_path })
}
