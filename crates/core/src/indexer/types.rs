//! Types for the release search system.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex_lite::Regex;
use serde::{Deserialize, Serialize};

/// Media category a release can be filed under.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MediaCategory {
    Ebook,
    Audiobook,
    Comic,
    Magazine,
}

impl MediaCategory {
    /// Wire name used by the download-submission endpoint.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ebook => "ebook",
            Self::Audiobook => "audiobook",
            Self::Comic => "comic",
            Self::Magazine => "magazine",
        }
    }
}

impl std::fmt::Display for MediaCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A normalized release candidate from the indexer aggregator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReleaseResult {
    /// Release title as reported by the indexer.
    pub title: String,
    /// Download URL; also the identity key for in-flight tracking.
    pub download_url: String,
    /// Indexer numeric ID.
    pub indexer_id: i64,
    /// Indexer display name.
    pub indexer_name: String,
    /// Size in bytes.
    #[serde(default)]
    pub size_bytes: u64,
    /// Size in megabytes (as reported, or derived from `size_bytes`).
    #[serde(default)]
    pub size_mb: f64,
    /// Seeder count.
    #[serde(default)]
    pub seeders: u32,
    /// Transfer protocol ("torrent" or "usenet").
    #[serde(default = "default_protocol")]
    pub protocol: String,
    /// When the release was published.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publish_date: Option<DateTime<Utc>>,
    /// Link to the release page on the indexer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info_url: Option<String>,
    /// Indexer categories.
    #[serde(default)]
    pub categories: Vec<String>,
    /// File format (epub, mobi, m4b, ...), when the indexer reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_format: Option<String>,
}

fn default_protocol() -> String {
    "torrent".to_string()
}

static MAGAZINE_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\d{4}[-/]\d{2}|\b(january|february|march|april|may|june|july|august|september|october|november|december)\s+\d{4}\b")
        .expect("magazine date regex")
});

const AUDIOBOOK_FORMATS: &[&str] = &["m4b", "mp3", "aac", "flac", "ogg", "opus"];
const COMIC_FORMATS: &[&str] = &["cbz", "cbr", "cb7", "cbt"];
const MAGAZINE_NAMES: &[&str] = &[
    "wired",
    "vogue",
    "time",
    "forbes",
    "economist",
    "nature",
    "maxim",
    "gq",
    "esquire",
];

impl ReleaseResult {
    /// Infer the media category from the file format, falling back to title
    /// heuristics for PDF magazines. Defaults to ebook.
    pub fn media_category(&self) -> MediaCategory {
        let Some(format) = &self.file_format else {
            return MediaCategory::Ebook;
        };
        let format = format.to_lowercase();

        if AUDIOBOOK_FORMATS.contains(&format.as_str()) {
            return MediaCategory::Audiobook;
        }
        if COMIC_FORMATS.contains(&format.as_str()) {
            return MediaCategory::Comic;
        }
        if format == "pdf" {
            let title = self.title.to_lowercase();
            let has_magazine_name = MAGAZINE_NAMES.iter().any(|name| title.contains(name));
            let has_date = MAGAZINE_DATE.is_match(&title);
            let has_keyword = ["magazine", "monthly", "weekly"]
                .iter()
                .any(|kw| title.contains(kw));
            if has_magazine_name || (has_date && has_keyword) {
                return MediaCategory::Magazine;
            }
        }

        MediaCategory::Ebook
    }

    /// Human-readable size string.
    pub fn format_size(&self) -> String {
        if self.size_mb < 1.0 {
            format!("{} KB", (self.size_mb * 1024.0).round() as u64)
        } else if self.size_mb < 1024.0 {
            format!("{:.1} MB", self.size_mb)
        } else {
            format!("{:.2} GB", self.size_mb / 1024.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn release(title: &str, file_format: Option<&str>) -> ReleaseResult {
        ReleaseResult {
            title: title.to_string(),
            download_url: "https://indexer.example/dl/1".to_string(),
            indexer_id: 1,
            indexer_name: "test-indexer".to_string(),
            size_bytes: 10 * 1024 * 1024,
            size_mb: 10.0,
            seeders: 12,
            protocol: "torrent".to_string(),
            publish_date: None,
            info_url: None,
            categories: vec![],
            file_format: file_format.map(String::from),
        }
    }

    #[test]
    fn test_media_category_defaults_to_ebook() {
        assert_eq!(release("Dune", None).media_category(), MediaCategory::Ebook);
        assert_eq!(
            release("Dune.epub", Some("epub")).media_category(),
            MediaCategory::Ebook
        );
    }

    #[test]
    fn test_media_category_audiobook_formats() {
        for fmt in ["m4b", "MP3", "flac"] {
            assert_eq!(
                release("Dune Unabridged", Some(fmt)).media_category(),
                MediaCategory::Audiobook
            );
        }
    }

    #[test]
    fn test_media_category_comic_formats() {
        assert_eq!(
            release("Sandman Vol 1", Some("cbz")).media_category(),
            MediaCategory::Comic
        );
    }

    #[test]
    fn test_media_category_magazine_by_name() {
        assert_eq!(
            release("Wired USA 2024-03", Some("pdf")).media_category(),
            MediaCategory::Magazine
        );
    }

    #[test]
    fn test_media_category_magazine_by_date_and_keyword() {
        assert_eq!(
            release("Astronomy Monthly january 2024", Some("pdf")).media_category(),
            MediaCategory::Magazine
        );
    }

    #[test]
    fn test_media_category_plain_pdf_is_ebook() {
        assert_eq!(
            release("Dune Frank Herbert", Some("pdf")).media_category(),
            MediaCategory::Ebook
        );
    }

    #[test]
    fn test_format_size() {
        let mut r = release("x", None);
        r.size_mb = 0.5;
        assert_eq!(r.format_size(), "512 KB");
        r.size_mb = 12.34;
        assert_eq!(r.format_size(), "12.3 MB");
        r.size_mb = 2048.0;
        assert_eq!(r.format_size(), "2.00 GB");
    }

    #[test]
    fn test_media_category_serialization() {
        assert_eq!(
            serde_json::to_string(&MediaCategory::Audiobook).unwrap(),
            "\"audiobook\""
        );
        assert_eq!(MediaCategory::Magazine.as_str(), "magazine");
    }
}
