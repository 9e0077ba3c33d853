use crate::extractors::instagram::Instagram;
use crate::extractors::tiktok::TikTok;
use crate::extractors::youtube::YouTube;

pub mod instagram;
pub mod tiktok;
pub mod youtube;

macro_rules! find_extractor_for_url {
    ($url:expr, $ext:ty $(, $tail:ty)* $(,)?) => {
        if <$ext>::supports_url($url) {
            Some(<$ext>::DISPLAY_NAME)
        } else {
            find_extractor_for_url!($url, $($tail),*)
        }
    };
    ($url:expr $(,)?) => {
        None
    };
}

macro_rules! lookup_canned {
    ($url:expr, $ext:ty $(, $tail:ty)* $(,)?) => {
        if <$ext>::supports_url($url) {
            Some(<$ext>::video_info($url))
        } else {
            lookup_canned!($url, $($tail),*)
        }
    };
    ($url:expr $(,)?) => {
        None
    };
}

macro_rules! create_functions_for_extractors {
    ($( $ext:ty ),* $(,)?) => {
        const PLATFORMS: &[&str] = &[$(<$ext>::DISPLAY_NAME),*];

        /// Name of the first registered platform whose markers occur in `url`.
        pub fn find_extractor_for_url(url: &str) -> Option<&'static str> {
            find_extractor_for_url!(url, $($ext),*)
        }

        /// Canned metadata from the first matching platform, in registration order.
        pub fn lookup_canned(url: &str) -> Option<VideoInfo> {
            lookup_canned!(url, $($ext),*)
        }

        pub fn supported_platforms() -> &'static [&'static str] {
            PLATFORMS
        }

        const _CHECK_UNIQUE_MARKERS: () = {
            let markers_array = [$(<$ext>::MARKERS),*];

            let mut i = 0;
            while i < markers_array.len() {
                let markers = markers_array[i];
                i += 1;

                let mut j = 0;
                while j < markers.len() {
                    let marker = markers[j].as_bytes();
                    j += 1;

                    let mut count = 0;
                    let mut i2 = 0;
                    while i2 < markers_array.len() {
                        let markers2 = markers_array[i2];
                        i2 += 1;

                        let mut j2 = 0;
                        while j2 < markers2.len() {
                            let marker2 = markers2[j2].as_bytes();
                            j2 += 1;

                            if marker.len() == marker2.len() {
                                let mut equal = true;
                                let mut k = 0;
                                while k < marker.len() {
                                    if marker[k] != marker2[k] {
                                        equal = false;
                                        break;
                                    }
                                    k += 1;
                                }
                                if equal {
                                    count += 1;
                                }
                            }
                        }
                    }

                    if count != 1 {
                        panic!("Non-unique platform marker!");
                    }
                }
            }
        };
    };
    () => {};
}

create_functions_for_extractors! {
    YouTube,
    TikTok,
    Instagram,
}

/// Metadata returned by a successful lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoInfo {
    pub title: String,
    pub thumbnail_url: String,
    pub formats: Vec<FormatOption>,
}

/// One downloadable variant of a video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatOption {
    pub quality: String,
    pub container: String,
    pub target_url: String,
    pub format_id: Option<String>,
    pub size: Option<String>,
}

impl FormatOption {
    pub fn new(quality: impl Into<String>, container: impl Into<String>, target_url: impl Into<String>) -> Self {
        Self {
            quality: quality.into(),
            container: container.into(),
            target_url: target_url.into(),
            format_id: None,
            size: None,
        }
    }

    pub fn format_id(mut self, format_id: impl Into<String>) -> Self {
        self.format_id = Some(format_id.into());
        self
    }

    pub fn size(mut self, size: impl Into<String>) -> Self {
        self.size = Some(size.into());
        self
    }

    /// Display label, e.g. `1080p (MP4) - 45.2 MB`.
    pub fn label(&self) -> String {
        let mut label = format!("{} ({})", self.quality, self.container.to_uppercase());

        if let Some(size) = &self.size {
            label.push_str(" - ");
            label.push_str(size);
        }

        label
    }
}

/// A platform the mock backend knows canned answers for.
pub trait Extractor {
    const DISPLAY_NAME: &'static str;
    /// Literal substrings that identify the platform in a URL.
    const MARKERS: &'static [&'static str];

    fn supports_url(url: &str) -> bool {
        Self::MARKERS.iter().any(|marker| url.contains(marker))
    }

    fn video_info(url: &str) -> VideoInfo;
}

pub mod utils {
    use super::FormatOption;

    /// Static description of a catalog format: quality, container, format id, size.
    pub type CatalogFormat = (&'static str, &'static str, &'static str, &'static str);

    pub fn query_param(url: &str, key: &str) -> Option<String> {
        url::Url::parse(url).ok().and_then(|url| {
            url.query_pairs()
                .find(|(name, _)| name == key)
                .map(|(_, value)| value.into_owned())
                .filter(|value| !value.is_empty())
        })
    }

    /// Appends `segments` to the path of `base`. Each segment is percent-encoded on its own,
    /// so `/`, `?` and `#` inside one can't change the shape of the url.
    pub fn url_with_segments(base: &str, segments: &[&str]) -> Option<url::Url> {
        let mut url = url::Url::parse(base).ok()?;
        url.path_segments_mut().ok()?.pop_if_empty().extend(segments);
        Some(url)
    }

    /// `<base>/<video_id>?format=<format_id>`
    pub fn format_target(base: &str, video_id: &str, format_id: &str) -> Option<String> {
        let mut target = url_with_segments(base, &[video_id])?;
        target.query_pairs_mut().append_pair("format", format_id);
        Some(target.into())
    }

    pub fn build_formats(base: &str, video_id: &str, catalog: &[CatalogFormat]) -> Vec<FormatOption> {
        catalog
            .iter()
            .filter_map(|&(quality, container, format_id, size)| {
                let target = format_target(base, video_id, format_id)?;
                Some(FormatOption::new(quality, container, target).format_id(format_id).size(size))
            })
            .collect()
    }

}

#[cfg(test)]
mod tests {
    use super::{find_extractor_for_url, lookup_canned, supported_platforms, FormatOption};

    #[test]
    fn test_first_match_wins() {
        // Both markers present, YouTube is registered first.
        let url = "https://www.youtube.com/watch?v=dQw4w9WgXcQ&ref=tiktok.com";
        assert_eq!(find_extractor_for_url(url), Some("YouTube"));
        assert_eq!(find_extractor_for_url("https://www.tiktok.com/@a/video/1"), Some("TikTok"));
        assert_eq!(find_extractor_for_url("https://www.instagram.com/reel/abc/"), Some("Instagram"));
    }

    #[test]
    fn test_unknown_platform() {
        assert_eq!(find_extractor_for_url("https://example.com/video"), None);
        assert!(lookup_canned("https://example.com/video").is_none());
    }

    #[test]
    fn test_marker_is_plain_substring() {
        // No URL syntax is required for the marker check itself.
        assert!(lookup_canned("youtube.com").is_some());
    }

    #[test]
    fn test_marker_carriers() {
        for (url, platform) in [
            ("https://youtu.be/9bZkp7q19f0", "YouTube"),
            ("https://example.com/?next=youtube.com", "YouTube"),
            ("https://example.com/share/youtu.be/abc", "YouTube"),
            ("https://vm.tiktok.com/ZM8abc/", "TikTok"),
            ("instagram.com/p/abc", "Instagram"),
        ] {
            assert_eq!(find_extractor_for_url(url), Some(platform), "{url}");

            let info = lookup_canned(url).unwrap();
            assert!(!info.title.is_empty());
            assert!(!info.thumbnail_url.is_empty());
            assert!(!info.formats.is_empty());
        }
    }

    #[test]
    fn test_supported_platforms() {
        assert_eq!(supported_platforms(), &["YouTube", "TikTok", "Instagram"]);
    }

    #[test]
    fn test_label_without_size() {
        let format = FormatOption::new("Audio", "mp3", "#");
        assert_eq!(format.label(), "Audio (MP3)");
    }
}
