use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct VideoRequest {
    pub(crate) youtube_id: String,
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum VideoUrlError {
    #[error("'{0}' is not a valid URL")]
    Malformed(String),
    #[error("Unsupported video URL: {0}")]
    UnknownUrlKind(Url),
}

impl VideoRequest {
    pub(crate) fn from_yt_url(youtube_url: &str) -> Result<Self, VideoUrlError> {
        let youtube_url: Url = youtube_url
            .trim()
            .parse()
            .map_err(|_| VideoUrlError::Malformed(youtube_url.to_string()))?;
        let host_str = youtube_url.host_str().unwrap_or_default();
        let segments = youtube_url
            .path_segments()
            .map(|segments| segments.filter(|segment| !segment.is_empty()).collect::<Vec<_>>())
            .unwrap_or_default();

        let id = if host_str.ends_with("youtube.com") || host_str.ends_with("youtube-nocookie.com") {
            static SEGMENTS_2: [&str; 6] = ["watch", "v", "embed", "e", "shorts", "live"];

            if segments.len() == 1 && segments[0] == "watch" {
                // ...youtube.com/watch?v=XXXXXXXXXXX&foo=bar
                youtube_url
                    .query_pairs()
                    .find(|(k, _)| k == "v")
                    .map(|(_, v)| v.to_string())
            } else if segments.len() == 2 && SEGMENTS_2.contains(&segments[0]) {
                // ...youtube.com/(watch|v|embed|...)/XXXXXXXXXXX?foo=bar
                Some(segments[1].to_string())
            } else {
                None
            }
        } else if host_str.ends_with("youtu.be") && segments.len() == 1 {
            // ...youtu.be/XXXXXXXXXXX?foo=bar
            Some(segments[0].to_string())
        } else {
            None
        };

        match id.filter(|id| !id.is_empty()) {
            Some(youtube_id) => Ok(Self { youtube_id }),
            None => Err(VideoUrlError::UnknownUrlKind(youtube_url)),
        }
    }

    pub(crate) fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.youtube_id)
    }
}
