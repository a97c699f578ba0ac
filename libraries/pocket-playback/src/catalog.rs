//! Curated sample media

use crate::types::{MediaFormat, MediaItem};

const SAMPLE_THUMBNAIL: &str = "/thumbnails/audioThumbnail.png";

/// Ordered list of sample items the user can pick from
#[derive(Debug, Clone, PartialEq)]
pub struct SampleCatalog {
    entries: Vec<MediaItem>,
}

impl SampleCatalog {
    pub fn new(entries: Vec<MediaItem>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[MediaItem] {
        &self.entries
    }

    /// Index of the entry with this url
    pub fn position_of(&self, url: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.url() == url)
    }

    /// Entry with this url and everything listed after it
    pub fn tail_from(&self, url: &str) -> Option<&[MediaItem]> {
        self.position_of(url).map(|index| &self.entries[index..])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for SampleCatalog {
    fn default() -> Self {
        let sample = |url: &str, format| MediaItem::new(url, format, SAMPLE_THUMBNAIL);
        Self::new(vec![
            sample("/samples/sample1.mp4", MediaFormat::Mp4),
            sample("/samples/sample2.mp4", MediaFormat::Mp4),
            sample("/samples/sample3.mp4", MediaFormat::Mp4),
            sample("/samples/sample4.mp4", MediaFormat::Mp4),
            sample("/samples/sample5.mp3", MediaFormat::Mpeg),
            sample("/samples/sample6.mp3", MediaFormat::Mpeg),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MediaKind;

    #[test]
    fn default_samples() {
        let catalog = SampleCatalog::default();
        assert_eq!(catalog.len(), 6);

        let kinds: Vec<MediaKind> = catalog.entries().iter().map(MediaItem::kind).collect();
        assert_eq!(kinds.iter().filter(|k| **k == MediaKind::Video).count(), 4);
        assert_eq!(kinds.iter().filter(|k| **k == MediaKind::Audio).count(), 2);
    }

    #[test]
    fn tail_starts_at_selected_entry() {
        let catalog = SampleCatalog::default();
        let tail = catalog.tail_from("/samples/sample5.mp3").unwrap();

        let urls: Vec<&str> = tail.iter().map(MediaItem::url).collect();
        assert_eq!(urls, ["/samples/sample5.mp3", "/samples/sample6.mp3"]);
        assert!(catalog.tail_from("/samples/missing.mp4").is_none());
    }
}
