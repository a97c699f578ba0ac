//! Fullscreen and minimize flags
//!
//! Fullscreen is owned by the platform: toggling only asks the shell, and the
//! flag changes when the platform reports it. Minimizing is purely local.

use serde::{Deserialize, Serialize};
use std::rc::Rc;
use tracing::debug;

/// Platform side of fullscreen and minimize
pub trait PresentationShell {
    fn request_fullscreen(&self);

    fn exit_fullscreen(&self);

    fn minimize(&self) {}

    fn restore(&self) {}
}

/// Presentation flags exposed to the UI
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresentationState {
    pub is_fullscreen: bool,
    pub is_minimized: bool,
}

/// Presentation flags plus an optional shell to forward requests to
#[derive(Default)]
pub struct Presentation {
    state: PresentationState,
    shell: Option<Rc<dyn PresentationShell>>,
}

impl Presentation {
    /// Flags only, no platform shell
    pub fn new() -> Self {
        Self::default()
    }

    /// Forward requests to `shell`
    pub fn with_shell(shell: Rc<dyn PresentationShell>) -> Self {
        Self {
            state: PresentationState::default(),
            shell: Some(shell),
        }
    }

    pub fn state(&self) -> PresentationState {
        self.state
    }

    /// Ask the platform to enter or leave fullscreen
    ///
    /// The flag is not touched here; see [`fullscreen_changed`](Self::fullscreen_changed).
    pub fn toggle_fullscreen(&self) {
        let Some(shell) = &self.shell else {
            debug!("no presentation shell, fullscreen request dropped");
            return;
        };
        if self.state.is_fullscreen {
            shell.exit_fullscreen();
        } else {
            shell.request_fullscreen();
        }
    }

    /// Mirror the platform's fullscreen-change notification
    pub fn fullscreen_changed(&mut self, is_fullscreen: bool) {
        self.state.is_fullscreen = is_fullscreen;
    }

    /// Flip the minimized flag and tell the shell
    pub fn toggle_minimize(&mut self) {
        self.state.is_minimized = !self.state.is_minimized;
        if let Some(shell) = &self.shell {
            if self.state.is_minimized {
                shell.minimize();
            } else {
                shell.restore();
            }
        }
    }

    /// Back to windowed and restored
    pub fn reset(&mut self) {
        self.state = PresentationState::default();
    }
}
