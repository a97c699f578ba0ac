//! Keyboard shortcuts for transport control
//!
//! Key codes follow the DOM `KeyboardEvent.code` names. Only one listener is
//! registered at a time: registering again replaces the previous listener, so
//! re-registering whenever its dependencies change never fires twice.

use crate::controller::TransportCommand;
use crate::types::PlaybackConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Keys bound by default
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    Space,
    KeyM,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    BracketLeft,
    BracketRight,
}

impl KeyCode {
    /// Parse a `KeyboardEvent.code` value
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "Space" => Some(Self::Space),
            "KeyM" => Some(Self::KeyM),
            "ArrowUp" => Some(Self::ArrowUp),
            "ArrowDown" => Some(Self::ArrowDown),
            "ArrowLeft" => Some(Self::ArrowLeft),
            "ArrowRight" => Some(Self::ArrowRight),
            "BracketLeft" => Some(Self::BracketLeft),
            "BracketRight" => Some(Self::BracketRight),
            _ => None,
        }
    }

    /// `KeyboardEvent.code` value for this key
    pub fn as_code(&self) -> &'static str {
        match self {
            Self::Space => "Space",
            Self::KeyM => "KeyM",
            Self::ArrowUp => "ArrowUp",
            Self::ArrowDown => "ArrowDown",
            Self::ArrowLeft => "ArrowLeft",
            Self::ArrowRight => "ArrowRight",
            Self::BracketLeft => "BracketLeft",
            Self::BracketRight => "BracketRight",
        }
    }
}

/// Key → command table
#[derive(Debug, Clone, PartialEq)]
pub struct KeyBindings {
    bindings: HashMap<KeyCode, TransportCommand>,
}

impl KeyBindings {
    /// Default table using the configured step sizes
    pub fn from_config(config: &PlaybackConfig) -> Self {
        let bindings = HashMap::from([
            (KeyCode::Space, TransportCommand::TogglePlayPause),
            (KeyCode::KeyM, TransportCommand::ToggleMute),
            (KeyCode::ArrowUp, TransportCommand::AdjustVolume(config.volume_step)),
            (KeyCode::ArrowDown, TransportCommand::AdjustVolume(-config.volume_step)),
            (KeyCode::ArrowRight, TransportCommand::SeekBy(config.seek_step_secs)),
            (KeyCode::ArrowLeft, TransportCommand::SeekBy(-config.seek_step_secs)),
            (KeyCode::BracketRight, TransportCommand::AdjustPlaybackRate(config.rate_step)),
            (KeyCode::BracketLeft, TransportCommand::AdjustPlaybackRate(-config.rate_step)),
        ]);
        Self { bindings }
    }

    /// Replace or add a binding
    pub fn bind(&mut self, key: KeyCode, command: TransportCommand) {
        self.bindings.insert(key, command);
    }

    /// Command bound to `key`
    pub fn lookup(&self, key: KeyCode) -> Option<TransportCommand> {
        self.bindings.get(&key).copied()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::from_config(&PlaybackConfig::default())
    }
}

/// Handle identifying one registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Single global key listener slot
#[derive(Debug, Default)]
pub struct KeyboardHub {
    active: Option<(ListenerId, KeyBindings)>,
    next_id: u64,
}

impl KeyboardHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `bindings` as the one active listener
    ///
    /// Any previous listener is unsubscribed first.
    pub fn register(&mut self, bindings: KeyBindings) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;

        if let Some((previous, _)) = self.active.replace((id, bindings)) {
            debug!(?previous, ?id, "replaced key listener");
        } else {
            debug!(?id, "registered key listener");
        }
        id
    }

    /// Remove the listener if it is still the active one
    ///
    /// Returns false for stale ids.
    pub fn unregister(&mut self, id: ListenerId) -> bool {
        match &self.active {
            Some((active, _)) if *active == id => {
                self.active = None;
                debug!(?id, "unregistered key listener");
                true
            }
            _ => false,
        }
    }

    /// Command for a `KeyboardEvent.code`, if the active listener binds it
    pub fn dispatch(&self, code: &str) -> Option<TransportCommand> {
        let key = KeyCode::from_code(code)?;
        let (_, bindings) = self.active.as_ref()?;
        bindings.lookup(key)
    }

    /// 0 or 1
    pub fn listener_count(&self) -> usize {
        usize::from(self.active.is_some())
    }
}
