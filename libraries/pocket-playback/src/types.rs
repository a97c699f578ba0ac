//! Core types for playback management

use crate::error::{PlaybackError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Playback rates offered by the rate selector
pub const PLAYBACK_RATE_PRESETS: [f64; 9] = [0.25, 0.5, 0.75, 1.0, 1.25, 1.5, 2.0, 3.0, 4.0];

/// Container/codec families the player can render
///
/// Parsed once at the selection boundary. Anything outside this set is
/// rejected before it can reach the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaFormat {
    #[serde(rename = "video/mp4")]
    Mp4,

    #[serde(rename = "video/webm")]
    Webm,

    #[serde(rename = "audio/mpeg")]
    Mpeg,

    #[serde(rename = "audio/wav")]
    Wav,
}

impl MediaFormat {
    /// All supported formats
    pub const ALL: [MediaFormat; 4] = [Self::Mp4, Self::Webm, Self::Mpeg, Self::Wav];

    /// Parse a MIME type string
    ///
    /// Matching is exact apart from surrounding whitespace and ASCII case.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let mime = mime.trim();
        Self::ALL
            .into_iter()
            .find(|format| format.mime_type().eq_ignore_ascii_case(mime))
    }

    /// Canonical MIME type string
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Mp4 => "video/mp4",
            Self::Webm => "video/webm",
            Self::Mpeg => "audio/mpeg",
            Self::Wav => "audio/wav",
        }
    }

    /// Rendering kind for this format
    pub fn kind(&self) -> MediaKind {
        match self {
            Self::Mp4 | Self::Webm => MediaKind::Video,
            Self::Mpeg | Self::Wav => MediaKind::Audio,
        }
    }
}

impl FromStr for MediaFormat {
    type Err = PlaybackError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_mime(s).ok_or_else(|| PlaybackError::UnsupportedMediaType(s.to_string()))
    }
}

impl fmt::Display for MediaFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime_type())
    }
}

/// How a media item is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// Rendered into a video surface
    Video,

    /// Audio only, shown with its thumbnail
    Audio,
}

/// A playable media item
///
/// Immutable once created. Two items with the same url are the same logical
/// media as far as the queue is concerned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    url: String,
    #[serde(rename = "mimeType")]
    format: MediaFormat,
    thumbnail_url: String,
}

impl MediaItem {
    /// Create an item from an already-parsed format
    pub fn new(url: impl Into<String>, format: MediaFormat, thumbnail_url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            format,
            thumbnail_url: thumbnail_url.into(),
        }
    }

    /// Create an item from a raw MIME type string
    ///
    /// # Errors
    /// `UnsupportedMediaType` when the MIME type is not renderable.
    pub fn from_mime(
        url: impl Into<String>,
        mime_type: &str,
        thumbnail_url: impl Into<String>,
    ) -> Result<Self> {
        let format = mime_type.parse::<MediaFormat>()?;
        Ok(Self::new(url, format, thumbnail_url))
    }

    /// Resource locator
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Parsed format
    pub fn format(&self) -> MediaFormat {
        self.format
    }

    /// MIME type string
    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }

    /// Video or audio
    pub fn kind(&self) -> MediaKind {
        self.format.kind()
    }

    /// Thumbnail locator
    pub fn thumbnail_url(&self) -> &str {
        &self.thumbnail_url
    }

    /// Whether both items refer to the same logical media
    pub fn same_media(&self, other: &MediaItem) -> bool {
        self.url == other.url
    }
}

/// Configuration for the player core
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Volume change per up/down step (default: 0.1)
    pub volume_step: f64,

    /// Skip distance in seconds (default: 10)
    pub seek_step_secs: f64,

    /// Playback rate change per step (default: 0.1)
    pub rate_step: f64,

    /// Position polling interval; `None` relies on resource notices only
    pub poll_interval_ms: Option<u64>,

    /// Start playback as soon as an item becomes active (default: false)
    pub autoplay: bool,

    /// Thumbnail used for uploaded files
    pub default_thumbnail: String,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            volume_step: 0.1,
            seek_step_secs: 10.0,
            rate_step: 0.1,
            poll_interval_ms: Some(200),
            autoplay: false,
            default_thumbnail: "/thumbnails/audioThumbnail.png".to_string(),
        }
    }
}

/// Render seconds as `m:ss`
///
/// Non-finite or negative values (e.g. a duration before metadata loads)
/// render as `0:00`.
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "0:00".to_string();
    }
    let total = seconds.floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}
