//! Playback history stack
//!
//! Records items that have been played so "go back" can recall them.

use crate::types::MediaItem;
use std::collections::VecDeque;

/// LIFO record of previously active items
///
/// The most recently played item sits at the front. Entries are never
/// dropped implicitly, so anything recorded stays reachable by `pop`.
#[derive(Debug, Clone, Default)]
pub struct History {
    /// Most recent = front
    items: VecDeque<MediaItem>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an item as the most recent entry
    pub fn push(&mut self, item: MediaItem) {
        self.items.push_front(item);
    }

    /// Remove and return the most recent item
    pub fn pop(&mut self) -> Option<MediaItem> {
        self.items.pop_front()
    }

    /// All entries, most recent first
    pub fn get_all(&self) -> Vec<&MediaItem> {
        self.items.iter().collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}
