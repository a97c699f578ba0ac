//! Uploaded files
//!
//! Uploads are kept in memory and addressed by generated `blob:` locators,
//! which is what gets queued and mounted.

use crate::error::{PlaybackError, Result};
use std::collections::HashMap;
use tracing::debug;
use uuid::Uuid;

const LOCATOR_PREFIX: &str = "blob:pocket-player/";

/// A file handed over by the file picker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    /// Original file name
    pub name: String,

    /// MIME type reported by the picker
    pub mime_type: String,

    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }
}

/// Locator → upload map for the current session
#[derive(Debug, Default)]
pub struct UploadRegistry {
    objects: HashMap<String, Upload>,
}

impl UploadRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an upload and return its locator
    ///
    /// # Errors
    /// `EmptyUpload` when the file has no content.
    pub fn register(&mut self, upload: Upload) -> Result<String> {
        if upload.bytes.is_empty() {
            return Err(PlaybackError::EmptyUpload(upload.name));
        }
        let locator = format!("{LOCATOR_PREFIX}{}", Uuid::new_v4());
        debug!(%locator, name = %upload.name, size = upload.bytes.len(), "registered upload");
        self.objects.insert(locator.clone(), upload);
        Ok(locator)
    }

    /// Upload behind `locator`
    pub fn resolve(&self, locator: &str) -> Option<&Upload> {
        self.objects.get(locator)
    }

    /// Release an upload; returns whether it existed
    pub fn revoke(&mut self, locator: &str) -> bool {
        self.objects.remove(locator).is_some()
    }

    /// Release every upload
    pub fn clear(&mut self) {
        self.objects.clear();
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Whether `locator` was produced by a registry
    pub fn is_upload_locator(locator: &str) -> bool {
        locator.starts_with(LOCATOR_PREFIX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_and_resolve() {
        let mut registry = UploadRegistry::new();
        let upload = Upload::new("clip.webm", "video/webm", vec![1, 2, 3]);

        let locator = registry.register(upload.clone()).unwrap();
        assert!(UploadRegistry::is_upload_locator(&locator));
        assert_eq!(registry.resolve(&locator), Some(&upload));
    }

    #[test]
    fn locators_are_unique() {
        let mut registry = UploadRegistry::new();
        let a = registry.register(Upload::new("a.wav", "audio/wav", vec![0])).unwrap();
        let b = registry.register(Upload::new("a.wav", "audio/wav", vec![0])).unwrap();
        assert_ne!(a, b);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn empty_upload_is_rejected() {
        let mut registry = UploadRegistry::new();
        let err = registry.register(Upload::new("empty.mp3", "audio/mpeg", Vec::new()));
        assert_eq!(err, Err(PlaybackError::EmptyUpload("empty.mp3".into())));
        assert!(registry.is_empty());
    }

    #[test]
    fn revoke_releases() {
        let mut registry = UploadRegistry::new();
        let locator = registry.register(Upload::new("a.wav", "audio/wav", vec![0])).unwrap();

        assert!(registry.revoke(&locator));
        assert!(!registry.revoke(&locator));
        assert!(registry.resolve(&locator).is_none());
    }
}
