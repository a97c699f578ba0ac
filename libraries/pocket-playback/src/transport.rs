//! Transport state and its transition functions
//!
//! Every change to [`TransportState`] goes through [`reduce`], a pure
//! function, so the transition rules can be tested without any media
//! resource. Resource notices are mapped onto the same actions by
//! [`reduce_notice`].

use crate::events::ResourceNotice;
use serde::{Deserialize, Serialize};

/// Play/pause/volume/mute/rate/position snapshot for the active item
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportState {
    pub is_playing: bool,

    /// Always within [0, 1]
    pub volume: f64,

    pub is_muted: bool,

    /// Stored as given; validation is left to the resource
    pub playback_rate: f64,

    /// Seconds, never negative
    pub position: f64,

    /// Seconds, 0 until known
    pub duration: f64,
}

impl Default for TransportState {
    fn default() -> Self {
        Self {
            is_playing: false,
            volume: 1.0,
            is_muted: false,
            playback_rate: 1.0,
            position: 0.0,
            duration: 0.0,
        }
    }
}

impl TransportState {
    /// Fraction of the item played, in [0, 1]
    pub fn progress(&self) -> f64 {
        if self.duration > 0.0 {
            (self.position / self.duration).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// A single transition of the transport state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransportAction {
    /// Flip the playing flag
    TogglePlaying,

    /// Set the playing flag
    SetPlaying(bool),

    /// Set volume (clamped to [0, 1])
    SetVolume(f64),

    /// Flip the mute flag
    ToggleMuted,

    /// Set the mute flag
    SetMuted(bool),

    /// Set the playback rate
    SetPlaybackRate(f64),

    /// Set the position in seconds
    SetPosition(f64),

    /// Set the duration in seconds
    SetDuration(f64),

    /// Back to defaults (new item loaded)
    Reset,
}

/// Clamp a requested volume into [0, 1]
///
/// NaN maps to 0 so it can never reach a resource.
pub fn clamp_volume(volume: f64) -> f64 {
    if volume.is_nan() {
        0.0
    } else {
        volume.clamp(0.0, 1.0)
    }
}

/// Coerce a reported time into a non-negative finite number of seconds
fn sanitize_seconds(seconds: f64) -> f64 {
    if seconds.is_finite() {
        seconds.max(0.0)
    } else {
        0.0
    }
}

/// Apply one action
pub fn reduce(state: TransportState, action: TransportAction) -> TransportState {
    match action {
        TransportAction::TogglePlaying => TransportState {
            is_playing: !state.is_playing,
            ..state
        },
        TransportAction::SetPlaying(is_playing) => TransportState { is_playing, ..state },
        TransportAction::SetVolume(volume) => TransportState {
            volume: clamp_volume(volume),
            ..state
        },
        TransportAction::ToggleMuted => TransportState {
            is_muted: !state.is_muted,
            ..state
        },
        TransportAction::SetMuted(is_muted) => TransportState { is_muted, ..state },
        TransportAction::SetPlaybackRate(playback_rate) => TransportState {
            playback_rate,
            ..state
        },
        TransportAction::SetPosition(position) => TransportState {
            position: sanitize_seconds(position),
            ..state
        },
        TransportAction::SetDuration(duration) => TransportState {
            duration: sanitize_seconds(duration),
            ..state
        },
        TransportAction::Reset => TransportState::default(),
    }
}

/// Apply a resource notice
///
/// The resource's report always overwrites local state.
pub fn reduce_notice(state: TransportState, notice: &ResourceNotice) -> TransportState {
    match *notice {
        ResourceNotice::PositionChanged { position, duration } => reduce(
            reduce(state, TransportAction::SetPosition(position)),
            TransportAction::SetDuration(duration),
        ),
        ResourceNotice::VolumeChanged { volume, muted } => reduce(
            reduce(state, TransportAction::SetVolume(volume)),
            TransportAction::SetMuted(muted),
        ),
        ResourceNotice::MetadataLoaded { duration } => {
            reduce(state, TransportAction::SetDuration(duration))
        }
        ResourceNotice::PlaybackStarted => reduce(state, TransportAction::SetPlaying(true)),
        ResourceNotice::PlaybackPaused | ResourceNotice::Ended => {
            reduce(state, TransportAction::SetPlaying(false))
        }
    }
}
