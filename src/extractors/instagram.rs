use once_cell::sync::Lazy;
use regex::Regex;

use super::utils::{build_formats, url_with_segments, CatalogFormat};
use super::{Extractor, VideoInfo};

const FALLBACK_SHORTCODE: &str = "CxYz123AbC";
const TARGET_BASE: &str = "https://download.example-downloader.com/instagram";
const THUMBNAIL_BASE: &str = "https://scontent.cdninstagram.com/v";
const FORMATS: &[CatalogFormat] = &[("1080p", "mp4", "dash-1080", "18.7 MB"), ("720p", "mp4", "dash-720", "9.6 MB")];

pub struct Instagram;

impl Extractor for Instagram {
    const DISPLAY_NAME: &'static str = "Instagram";
    const MARKERS: &'static [&'static str] = &["instagram.com"];

    fn video_info(url: &str) -> VideoInfo {
        static SHORTCODE_REGEX: Lazy<Regex> =
            Lazy::new(|| Regex::new(r"/(?:p|reels?|tv)/([A-Za-z0-9_-]+)").unwrap());

        let shortcode = SHORTCODE_REGEX
            .captures(url)
            .and_then(|captures| captures.get(1))
            .map(|code| code.as_str())
            .unwrap_or(FALLBACK_SHORTCODE);

        VideoInfo {
            title: "Instagram Reel".to_string(),
            thumbnail_url: url_with_segments(THUMBNAIL_BASE, &[&format!("{shortcode}.jpg")])
                .map(String::from)
                .unwrap_or_default(),
            formats: build_formats(TARGET_BASE, shortcode, FORMATS),
        }
    }
}
