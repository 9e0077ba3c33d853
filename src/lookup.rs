use std::time::Duration;

use crate::extractors::{self, VideoInfo};

pub const DEFAULT_DELAY: Duration = Duration::from_millis(1500);
pub const NOT_FOUND_MESSAGE: &str = "Unsupported URL or video not found.";

const API_BASE: &str = "https://api.example-downloader.com/video";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupResult {
    Success(VideoInfo),
    Failure { message: String },
}

impl LookupResult {
    pub fn failure(message: impl Into<String>) -> Self {
        LookupResult::Failure {
            message: message.into(),
        }
    }
}

/// Remote metadata service the flow is written against.
///
/// `Err` means the service itself broke. A video the service does not know
/// is reported as [`LookupResult::Failure`].
pub trait LookupService {
    async fn lookup_video(&self, url: &str) -> Result<LookupResult, anyhow::Error>;
}

/// Endpoint a real client would query for `video_url`.
pub fn api_endpoint(video_url: &str) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("url", video_url)
        .finish();

    format!("{API_BASE}?{query}")
}

/// Stand-in backend: waits a fixed delay, then answers from the canned catalog.
#[derive(Debug, Clone)]
pub struct MockLookup {
    delay: Duration,
}

impl MockLookup {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for MockLookup {
    fn default() -> Self {
        Self::new(DEFAULT_DELAY)
    }
}

impl LookupService for MockLookup {
    async fn lookup_video(&self, url: &str) -> Result<LookupResult, anyhow::Error> {
        log::debug!("Mock fetching from: {}", api_endpoint(url));
        tokio::time::sleep(self.delay).await;

        let result = match extractors::lookup_canned(url) {
            Some(info) => {
                log::debug!(
                    "Matched {} for {}",
                    extractors::find_extractor_for_url(url).unwrap_or("unknown platform"),
                    url
                );
                LookupResult::Success(info)
            }
            None => LookupResult::failure(NOT_FOUND_MESSAGE),
        };

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{api_endpoint, LookupResult, LookupService, MockLookup, NOT_FOUND_MESSAGE};

    #[test]
    fn test_api_endpoint() {
        assert_eq!(
            api_endpoint("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            "https://api.example-downloader.com/video?url=https%3A%2F%2Fwww.youtube.com%2Fwatch%3Fv%3DdQw4w9WgXcQ"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_mock_lookup_waits_delay() {
        let lookup = MockLookup::default();
        let start = tokio::time::Instant::now();

        let result = lookup
            .lookup_video("https://www.youtube.com/watch?v=dQw4w9WgXcQ")
            .await
            .unwrap();

        assert!(start.elapsed() >= Duration::from_millis(1500));
        match result {
            LookupResult::Success(info) => {
                assert!(!info.title.is_empty());
                assert!(!info.thumbnail_url.is_empty());
                assert_eq!(info.formats.len(), 4);
            }
            LookupResult::Failure { message } => panic!("unexpected failure: {message}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_mock_lookup_unknown_platform() {
        let result = MockLookup::default()
            .lookup_video("https://example.com/video")
            .await
            .unwrap();
        assert_eq!(result, LookupResult::failure(NOT_FOUND_MESSAGE));
    }
}
