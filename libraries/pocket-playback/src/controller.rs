//! Transport controller
//!
//! Bridges user intent and the media resource. Commands are forwarded to the
//! resource and applied to local state optimistically; notices coming back
//! from the resource overwrite local state (last writer wins).

use crate::{
    error::{PlaybackError, Result},
    events::{Envelope, NoticeSink, ResourceNotice},
    resource::{MediaResource, Subscription},
    transport::{clamp_volume, reduce, reduce_notice, TransportAction, TransportState},
};
use std::rc::Rc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, trace};

/// Commands a UI (buttons, keyboard) can issue
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransportCommand {
    /// Play if paused, pause if playing
    TogglePlayPause,

    /// Flip mute
    ToggleMute,

    /// Set absolute volume
    SetVolume(f64),

    /// Change volume relative to the current value
    AdjustVolume(f64),

    /// Set absolute playback rate
    SetPlaybackRate(f64),

    /// Change playback rate relative to the current value
    AdjustPlaybackRate(f64),

    /// Jump to a position in seconds
    Seek(f64),

    /// Skip relative to the current position
    SeekBy(f64),

    /// Jump back to the start
    Restart,
}

/// Transport state owner for the active media resource
pub struct TransportController {
    state: TransportState,

    // Borrowed handle; the mounting host owns the resource
    resource: Option<Rc<dyn MediaResource>>,
    subscription: Option<Subscription>,

    // Bumped on every attach/detach so in-flight notices from a replaced
    // resource can be recognised
    generation: u64,

    notice_tx: UnboundedSender<Envelope>,
    notice_rx: UnboundedReceiver<Envelope>,
}

impl TransportController {
    /// Create a controller with no resource attached
    pub fn new() -> Self {
        let (notice_tx, notice_rx) = mpsc::unbounded_channel();
        Self {
            state: TransportState::default(),
            resource: None,
            subscription: None,
            generation: 0,
            notice_tx,
            notice_rx,
        }
    }

    // ===== Resource lifecycle =====

    /// Take control of a newly mounted resource
    ///
    /// The previous subscription is cancelled before the new one is made and
    /// the transport state goes back to defaults.
    pub fn attach(&mut self, resource: Rc<dyn MediaResource>) {
        self.release();
        self.generation += 1;

        let sink = NoticeSink::new(self.generation, self.notice_tx.clone());
        self.subscription = Some(resource.subscribe(sink));
        self.resource = Some(resource);
        self.dispatch(TransportAction::Reset);

        debug!(generation = self.generation, "resource attached");
    }

    /// Let go of the current resource and reset state
    pub fn detach(&mut self) {
        self.release();
        self.generation += 1;
        self.dispatch(TransportAction::Reset);
        debug!(generation = self.generation, "resource detached");
    }

    fn release(&mut self) {
        // Unsubscribe before the handle goes away
        if let Some(subscription) = self.subscription.take() {
            subscription.cancel();
        }
        self.resource = None;
    }

    /// Whether a resource is attached
    pub fn is_attached(&self) -> bool {
        self.resource.is_some()
    }

    /// Current subscription generation
    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn resource(&self) -> Result<Rc<dyn MediaResource>> {
        self.resource.clone().ok_or(PlaybackError::NoResourceAttached)
    }

    fn dispatch(&mut self, action: TransportAction) {
        self.state = reduce(self.state, action);
        trace!(?action, state = ?self.state, "transport action");
    }

    // ===== State =====

    /// Current transport state
    pub fn state(&self) -> &TransportState {
        &self.state
    }

    // ===== Commands =====

    /// Pause when playing, play when paused
    pub fn toggle_play_pause(&mut self) -> Result<()> {
        if self.state.is_playing {
            self.pause()
        } else {
            self.play()
        }
    }

    /// Request playback; the flag is set before the resource confirms
    pub fn play(&mut self) -> Result<()> {
        let resource = self.resource()?;
        resource.play();
        self.dispatch(TransportAction::SetPlaying(true));
        Ok(())
    }

    /// Request pause
    pub fn pause(&mut self) -> Result<()> {
        let resource = self.resource()?;
        resource.pause();
        self.dispatch(TransportAction::SetPlaying(false));
        Ok(())
    }

    /// Set volume, clamped to [0, 1] before it reaches the resource
    pub fn set_volume(&mut self, volume: f64) -> Result<()> {
        let resource = self.resource()?;
        let volume = clamp_volume(volume);
        resource.set_volume(volume);
        self.dispatch(TransportAction::SetVolume(volume));
        Ok(())
    }

    /// Change volume by `delta` from the current value
    pub fn adjust_volume(&mut self, delta: f64) -> Result<()> {
        self.set_volume(self.state.volume + delta)
    }

    /// Flip mute on both the resource and local state; volume is kept
    pub fn toggle_mute(&mut self) -> Result<()> {
        let resource = self.resource()?;
        let muted = !self.state.is_muted;
        resource.set_muted(muted);
        self.dispatch(TransportAction::SetMuted(muted));
        Ok(())
    }

    /// Set playback rate, passed through unvalidated
    pub fn set_playback_rate(&mut self, rate: f64) -> Result<()> {
        let resource = self.resource()?;
        resource.set_playback_rate(rate);
        self.dispatch(TransportAction::SetPlaybackRate(rate));
        Ok(())
    }

    /// Change playback rate by `delta` from the current value
    pub fn adjust_playback_rate(&mut self, delta: f64) -> Result<()> {
        self.set_playback_rate(self.state.playback_rate + delta)
    }

    /// Seek to `position` seconds
    ///
    /// The resource receives the raw value and decides how to clamp it; its
    /// next position notice corrects local state.
    pub fn seek(&mut self, position: f64) -> Result<()> {
        let resource = self.resource()?;
        if !position.is_finite() {
            debug!(position, "ignoring non-finite seek");
            return Ok(());
        }
        resource.set_position(position);
        self.dispatch(TransportAction::SetPosition(position));
        Ok(())
    }

    /// Skip `delta` seconds from the current position
    pub fn seek_by(&mut self, delta: f64) -> Result<()> {
        self.seek(self.state.position + delta)
    }

    /// Seek back to the start
    pub fn restart(&mut self) -> Result<()> {
        self.seek(0.0)
    }

    /// Run a UI command
    pub fn execute(&mut self, command: TransportCommand) -> Result<()> {
        debug!(?command, "transport command");
        match command {
            TransportCommand::TogglePlayPause => self.toggle_play_pause(),
            TransportCommand::ToggleMute => self.toggle_mute(),
            TransportCommand::SetVolume(volume) => self.set_volume(volume),
            TransportCommand::AdjustVolume(delta) => self.adjust_volume(delta),
            TransportCommand::SetPlaybackRate(rate) => self.set_playback_rate(rate),
            TransportCommand::AdjustPlaybackRate(delta) => self.adjust_playback_rate(delta),
            TransportCommand::Seek(position) => self.seek(position),
            TransportCommand::SeekBy(delta) => self.seek_by(delta),
            TransportCommand::Restart => self.restart(),
        }
    }

    // ===== Notices =====

    /// Apply a notice reported by the attached resource
    pub fn handle_notice(&mut self, notice: &ResourceNotice) {
        self.state = reduce_notice(self.state, notice);
        trace!(?notice, state = ?self.state, "resource notice");
    }

    /// Apply every queued notice without waiting
    ///
    /// Returns how many notices were applied; stale ones are dropped and not
    /// counted.
    pub fn drain_notices(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(envelope) = self.notice_rx.try_recv() {
            if self.accept(&envelope) {
                self.handle_notice(&envelope.notice);
                applied += 1;
            }
        }
        applied
    }

    /// Wait for the next current-generation notice and apply it
    pub async fn next_notice(&mut self) -> ResourceNotice {
        loop {
            // The controller keeps a sender alive, so the channel never closes
            let Some(envelope) = self.notice_rx.recv().await else {
                continue;
            };
            if self.accept(&envelope) {
                self.handle_notice(&envelope.notice);
                return envelope.notice;
            }
        }
    }

    fn accept(&self, envelope: &Envelope) -> bool {
        let current = envelope.generation == self.generation && self.resource.is_some();
        if !current {
            debug!(
                notice_generation = envelope.generation,
                generation = self.generation,
                "dropping stale notice"
            );
        }
        current
    }

    /// Read position and duration straight from the resource
    ///
    /// Fallback for resources whose position notices are unreliable.
    pub fn sample_position(&mut self) -> Result<()> {
        let resource = self.resource()?;
        let notice = ResourceNotice::PositionChanged {
            position: resource.position(),
            duration: resource.duration(),
        };
        self.handle_notice(&notice);
        Ok(())
    }
}

impl Default for TransportController {
    fn default() -> Self {
        Self::new()
    }
}
