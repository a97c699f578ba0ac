//! Resource notices
//!
//! A media resource reports its own state changes (time advancing, volume
//! changed by the OS, metadata loaded, ...) at its own cadence. Notices travel
//! over a channel to the transport controller, tagged with the subscription
//! generation they were emitted under so that notices from a resource that
//! has since been replaced can be told apart and dropped.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedSender;

/// State change reported by a media resource
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ResourceNotice {
    /// Playback position advanced (periodic while playing, and after seeks)
    PositionChanged {
        /// Current position in seconds
        position: f64,
        /// Total duration in seconds (NaN until metadata is known)
        duration: f64,
    },

    /// Volume or mute flag changed, by us or externally
    VolumeChanged {
        /// Volume in [0, 1]
        volume: f64,
        /// Whether output is muted
        muted: bool,
    },

    /// Metadata finished loading
    MetadataLoaded {
        /// Total duration in seconds
        duration: f64,
    },

    /// The resource actually started playing
    PlaybackStarted,

    /// The resource paused, or refused to start
    PlaybackPaused,

    /// Playback reached the end of the media
    Ended,
}

/// A notice together with the subscription generation that produced it
#[derive(Debug, Clone, Copy)]
pub(crate) struct Envelope {
    pub(crate) generation: u64,
    pub(crate) notice: ResourceNotice,
}

/// Sending half handed to a media resource when it is subscribed
#[derive(Debug, Clone)]
pub struct NoticeSink {
    generation: u64,
    tx: UnboundedSender<Envelope>,
}

impl NoticeSink {
    pub(crate) fn new(generation: u64, tx: UnboundedSender<Envelope>) -> Self {
        Self { generation, tx }
    }

    /// Deliver a notice
    ///
    /// Returns false once the receiving controller is gone.
    pub fn emit(&self, notice: ResourceNotice) -> bool {
        self.tx
            .send(Envelope {
                generation: self.generation,
                notice,
            })
            .is_ok()
    }

    /// Subscription generation this sink belongs to
    pub fn generation(&self) -> u64 {
        self.generation
    }
}
