//! Media resource abstraction
//!
//! The decode/render engine that actually plays bytes (a browser media
//! element, a native decoder, a simulator) is owned by whatever mounted it.
//! The player only talks to it through this trait and never creates or
//! destroys one itself.

use crate::events::NoticeSink;
use crate::types::MediaItem;
use std::fmt;
use std::rc::Rc;

/// Stateful media engine for one loaded item
///
/// Setters are fire-and-forget requests; the resource reports what actually
/// happened through the [`NoticeSink`] given to [`subscribe`](Self::subscribe).
pub trait MediaResource {
    /// Request playback to start
    fn play(&self);

    /// Request playback to pause
    fn pause(&self);

    /// Set output volume in [0, 1]
    fn set_volume(&self, volume: f64);

    /// Set the mute flag
    fn set_muted(&self, muted: bool);

    /// Set the playback rate (not validated)
    fn set_playback_rate(&self, rate: f64);

    /// Jump to a position in seconds (not clamped by the caller)
    fn set_position(&self, position: f64);

    /// Current position in seconds
    fn position(&self) -> f64;

    /// Total duration in seconds (NaN when unknown)
    fn duration(&self) -> f64;

    /// Start delivering notices to `sink`
    ///
    /// Delivery stops when the returned [`Subscription`] is dropped.
    fn subscribe(&self, sink: NoticeSink) -> Subscription;
}

/// Mounts media items into resources
///
/// Stands in for the UI element that renders the active item. The host owns
/// the resource exclusively and hands out a shared handle.
pub trait MediaHost {
    /// Load `item`, replacing whatever was mounted before
    fn mount(&mut self, item: &MediaItem) -> Rc<dyn MediaResource>;

    /// Release the mounted resource
    fn unmount(&mut self) {}
}

/// Live notice subscription; unsubscribes on drop
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Subscription that runs `cancel` when dropped
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Subscription with nothing to clean up
    pub fn noop() -> Self {
        Self { cancel: None }
    }

    /// Unsubscribe now
    pub fn cancel(mut self) {
        self.run_cancel();
    }

    fn run_cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.run_cancel();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}
