use once_cell::sync::Lazy;
use regex::Regex;

use super::utils::{build_formats, url_with_segments, CatalogFormat};
use super::{Extractor, VideoInfo};

const FALLBACK_VIDEO_ID: &str = "7106594312292453675";
const TARGET_BASE: &str = "https://download.example-downloader.com/tiktok";
const THUMBNAIL_BASE: &str = "https://p16-sign.tiktokcdn.com/obj";
const FORMATS: &[CatalogFormat] = &[("HD (No Watermark)", "mp4", "hd", "12.4 MB"), ("Audio", "mp3", "audio", "1.1 MB")];

pub struct TikTok;

impl Extractor for TikTok {
    const DISPLAY_NAME: &'static str = "TikTok";
    const MARKERS: &'static [&'static str] = &["tiktok.com"];

    fn video_info(url: &str) -> VideoInfo {
        static VIDEO_ID_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"/video/(\d+)").unwrap());

        let video_id = VIDEO_ID_REGEX
            .captures(url)
            .and_then(|captures| captures.get(1))
            .map(|id| id.as_str())
            .unwrap_or(FALLBACK_VIDEO_ID);

        VideoInfo {
            title: "Funny Cat Compilation #fyp".to_string(),
            thumbnail_url: url_with_segments(THUMBNAIL_BASE, &[&format!("{video_id}.jpeg")])
                .map(String::from)
                .unwrap_or_default(),
            formats: build_formats(TARGET_BASE, video_id, FORMATS),
        }
    }
}
