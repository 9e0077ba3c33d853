use once_cell::sync::Lazy;
use regex::Regex;

use super::utils::{build_formats, query_param, url_with_segments, CatalogFormat};
use super::{Extractor, VideoInfo};

const FALLBACK_VIDEO_ID: &str = "dQw4w9WgXcQ";
const TITLE: &str = "Rick Astley - Never Gonna Give You Up (Official Music Video)";
const TARGET_BASE: &str = "https://download.example-downloader.com/youtube";
const THUMBNAIL_BASE: &str = "https://i.ytimg.com/vi";
const FORMATS: &[CatalogFormat] = &[
    ("1080p", "mp4", "137", "45.2 MB"),
    ("720p", "mp4", "22", "25.8 MB"),
    ("480p", "mp4", "135", "15.3 MB"),
    ("Audio", "mp3", "140", "3.4 MB"),
];

pub struct YouTube;

impl YouTube {
    fn video_id(url: &str) -> String {
        static VIDEO_ID_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]{11}$").unwrap());
        static SHORT_ID_REGEX: Lazy<Regex> =
            Lazy::new(|| Regex::new(r"(?:youtu\.be/|/shorts/|/embed/)([A-Za-z0-9_-]{11})").unwrap());

        query_param(url, "v")
            .filter(|id| VIDEO_ID_REGEX.is_match(id))
            .or_else(|| {
                SHORT_ID_REGEX
                    .captures(url)
                    .and_then(|captures| captures.get(1))
                    .map(|id| id.as_str().to_string())
            })
            .unwrap_or_else(|| FALLBACK_VIDEO_ID.to_string())
    }
}

impl Extractor for YouTube {
    const DISPLAY_NAME: &'static str = "YouTube";
    const MARKERS: &'static [&'static str] = &["youtube.com", "youtu.be"];

    fn video_info(url: &str) -> VideoInfo {
        let video_id = Self::video_id(url);

        VideoInfo {
            title: TITLE.to_string(),
            thumbnail_url: url_with_segments(THUMBNAIL_BASE, &[video_id.as_str(), "maxresdefault.jpg"])
                .map(String::from)
                .unwrap_or_default(),
            formats: build_formats(TARGET_BASE, &video_id, FORMATS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::YouTube;
    use crate::extractors::Extractor;

    #[test]
    fn test_youtube() {
        let url = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";
        assert!(YouTube::supports_url(url));

        let info = YouTube::video_info(url);
        assert_eq!(info.title, "Rick Astley - Never Gonna Give You Up (Official Music Video)");
        assert_eq!(info.thumbnail_url, "https://i.ytimg.com/vi/dQw4w9WgXcQ/maxresdefault.jpg");
        assert_eq!(info.formats.len(), 4);
        assert_eq!(info.formats[0].quality, "1080p");
        assert_eq!(info.formats[0].container, "mp4");
        assert_eq!(
            info.formats[0].target_url,
            "https://download.example-downloader.com/youtube/dQw4w9WgXcQ?format=137"
        );
        assert_eq!(info.formats[3].label(), "Audio (MP3) - 3.4 MB");
    }

    #[test]
    fn test_youtube_short_links() {
        assert!(YouTube::supports_url("https://youtu.be/9bZkp7q19f0"));
        assert_eq!(YouTube::video_id("https://youtu.be/9bZkp7q19f0"), "9bZkp7q19f0");
        assert_eq!(YouTube::video_id("https://www.youtube.com/shorts/9bZkp7q19f0"), "9bZkp7q19f0");
        assert_eq!(YouTube::video_id("https://www.youtube.com/"), "dQw4w9WgXcQ");
    }

    #[test]
    fn test_youtube_rejects_unsafe_video_id() {
        for url in [
            "https://www.youtube.com/watch?v=x%26calc%26",
            "https://www.youtube.com/watch?v=a/../../evil%23",
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ%23frag",
            "https://www.youtube.com/watch?v=dQw4w9WgXc%20",
        ] {
            assert_eq!(YouTube::video_id(url), "dQw4w9WgXcQ", "{url}");

            let info = YouTube::video_info(url);
            assert_eq!(info.thumbnail_url, "https://i.ytimg.com/vi/dQw4w9WgXcQ/maxresdefault.jpg");
            for format in &info.formats {
                let target = url::Url::parse(&format.target_url).unwrap();
                assert_eq!(target.host_str(), Some("download.example-downloader.com"));
                assert_eq!(target.path(), "/youtube/dQw4w9WgXcQ");
                assert_eq!(target.fragment(), None);
                assert!(!format.target_url.contains('&'));
            }
        }
    }
}
