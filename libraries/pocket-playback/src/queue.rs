//! Playback queue with forward/back history
//!
//! ```text
//! History (most recent first)   Active     Pending (play order)
//!   - Track B                   Track B    - Track C
//!   - Track A                              - Track D
//! ```
//!
//! `advance` moves the front of the pending list into history and hands it
//! out as the active item. `go_back` pops history and puts the item back at
//! the front of the pending list.

use crate::history::History;
use crate::types::MediaItem;
use std::collections::VecDeque;
use tracing::debug;

/// Pending queue plus history stack for one playback session
#[derive(Debug, Clone, Default)]
pub struct QueueManager {
    /// Items waiting to play, front plays next
    pending: VecDeque<MediaItem>,

    /// Previously played items
    history: History,
}

impl QueueManager {
    /// Create an empty queue and history
    pub fn new() -> Self {
        Self::default()
    }

    /// Append to the back of the queue
    pub fn enqueue(&mut self, item: MediaItem) {
        debug!(url = item.url(), "enqueue");
        self.pending.push_back(item);
    }

    /// Insert at the front of the queue so it plays next
    pub fn enqueue_front(&mut self, item: MediaItem) {
        debug!(url = item.url(), "enqueue front");
        self.pending.push_front(item);
    }

    /// Remove the first queued entry with the same url and record `item` as played
    ///
    /// The item is pushed onto history even when it was not queued, so it is
    /// always reachable through a later `go_back`. Use [`discard`](Self::discard)
    /// to drop an entry without touching history.
    ///
    /// Returns whether a queued entry was removed.
    pub fn remove(&mut self, item: &MediaItem) -> bool {
        let removed = self.take_first(item).is_some();
        self.history.push(item.clone());
        debug!(url = item.url(), removed, "remove");
        removed
    }

    /// Remove the first queued entry with the same url, leaving history alone
    pub fn discard(&mut self, item: &MediaItem) -> Option<MediaItem> {
        let removed = self.take_first(item);
        debug!(url = item.url(), removed = removed.is_some(), "discard");
        removed
    }

    /// Pop the next item, record it in history and return it as active
    ///
    /// Returns `None` and changes nothing when the queue is empty.
    pub fn advance(&mut self) -> Option<MediaItem> {
        let item = self.pending.pop_front()?;
        self.history.push(item.clone());
        debug!(url = item.url(), remaining = self.pending.len(), "advance");
        Some(item)
    }

    /// Recall the most recent history entry
    ///
    /// The recalled item goes back to the front of the queue and is returned
    /// as the active item. Returns `None` and changes nothing when history is
    /// empty.
    pub fn go_back(&mut self) -> Option<MediaItem> {
        let item = self.history.pop()?;
        self.enqueue_front(item.clone());
        debug!(url = item.url(), history = self.history.len(), "go back");
        Some(item)
    }

    /// Empty both the queue and the history
    pub fn clear(&mut self) {
        self.pending.clear();
        self.history.clear();
        debug!("queue and history cleared");
    }

    /// Queued items in play order
    pub fn pending(&self) -> Vec<&MediaItem> {
        self.pending.iter().collect()
    }

    /// History, most recent first
    pub fn history(&self) -> Vec<&MediaItem> {
        self.history.get_all()
    }

    /// Item `advance` would return
    pub fn peek_next(&self) -> Option<&MediaItem> {
        self.pending.front()
    }

    /// Number of queued items
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Whether a "next" control has anything to do
    pub fn has_next(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Whether a "previous" control has anything to do
    pub fn has_previous(&self) -> bool {
        !self.history.is_empty()
    }

    fn take_first(&mut self, item: &MediaItem) -> Option<MediaItem> {
        let index = self.pending.iter().position(|queued| queued.same_media(item))?;
        self.pending.remove(index)
    }
}
