//! Headless media resource
//!
//! Behaves like a browser media element without decoding anything: it keeps
//! a clock that is advanced explicitly, and reports changes through the same
//! notices a real element would emit. Used by the CLI driver and by tests.

use crate::events::{NoticeSink, ResourceNotice};
use crate::resource::{MediaHost, MediaResource, Subscription};
use crate::types::MediaItem;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;
use tracing::debug;

type Listeners = Rc<RefCell<Vec<(u64, NoticeSink)>>>;

#[derive(Debug, Clone)]
struct Playhead {
    playing: bool,
    volume: f64,
    muted: bool,
    rate: f64,
    position: f64,
    duration: f64,
}

/// Simulated media element for one item
pub struct SimulatedMedia {
    url: String,
    playhead: RefCell<Playhead>,
    autoplay_blocked: Cell<bool>,
    listeners: Listeners,
    next_listener: Cell<u64>,
}

impl SimulatedMedia {
    /// Media of the given length
    pub fn new(url: impl Into<String>, duration: Duration) -> Self {
        Self {
            url: url.into(),
            playhead: RefCell::new(Playhead {
                playing: false,
                volume: 1.0,
                muted: false,
                rate: 1.0,
                position: 0.0,
                duration: duration.as_secs_f64(),
            }),
            autoplay_blocked: Cell::new(false),
            listeners: Rc::default(),
            next_listener: Cell::new(0),
        }
    }

    /// Refuse `play` requests, like a browser blocking autoplay
    pub fn block_autoplay(&self, blocked: bool) {
        self.autoplay_blocked.set(blocked);
    }

    /// Url this media was mounted for
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Whether the simulated clock is running
    pub fn is_playing(&self) -> bool {
        self.playhead.borrow().playing
    }

    pub fn volume(&self) -> f64 {
        self.playhead.borrow().volume
    }

    pub fn is_muted(&self) -> bool {
        self.playhead.borrow().muted
    }

    pub fn playback_rate(&self) -> f64 {
        self.playhead.borrow().rate
    }

    /// Number of live subscriptions
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Report metadata, as an element does once the header is parsed
    pub fn load_metadata(&self) {
        let duration = self.playhead.borrow().duration;
        self.emit(ResourceNotice::MetadataLoaded { duration });
    }

    /// Change volume from outside the player (OS media keys and the like)
    pub fn external_volume_change(&self, volume: f64, muted: bool) {
        {
            let mut playhead = self.playhead.borrow_mut();
            playhead.volume = volume.clamp(0.0, 1.0);
            playhead.muted = muted;
        }
        self.emit_volume();
    }

    /// Run the clock for `elapsed` wall time
    ///
    /// Emits a position notice, plus `Ended` when the end is reached.
    pub fn advance(&self, elapsed: Duration) {
        let ended = {
            let mut playhead = self.playhead.borrow_mut();
            if !playhead.playing {
                return;
            }
            playhead.position += elapsed.as_secs_f64() * playhead.rate;
            if playhead.position >= playhead.duration {
                playhead.position = playhead.duration;
                playhead.playing = false;
                true
            } else {
                false
            }
        };

        self.emit_position();
        if ended {
            debug!(url = %self.url, "simulated media ended");
            self.emit(ResourceNotice::Ended);
        }
    }

    fn emit(&self, notice: ResourceNotice) {
        for (_, sink) in self.listeners.borrow().iter() {
            sink.emit(notice);
        }
    }

    fn emit_position(&self) {
        let (position, duration) = {
            let playhead = self.playhead.borrow();
            (playhead.position, playhead.duration)
        };
        self.emit(ResourceNotice::PositionChanged { position, duration });
    }

    fn emit_volume(&self) {
        let (volume, muted) = {
            let playhead = self.playhead.borrow();
            (playhead.volume, playhead.muted)
        };
        self.emit(ResourceNotice::VolumeChanged { volume, muted });
    }
}

impl MediaResource for SimulatedMedia {
    fn play(&self) {
        if self.autoplay_blocked.get() {
            debug!(url = %self.url, "play refused");
            self.emit(ResourceNotice::PlaybackPaused);
            return;
        }
        self.playhead.borrow_mut().playing = true;
        self.emit(ResourceNotice::PlaybackStarted);
    }

    fn pause(&self) {
        self.playhead.borrow_mut().playing = false;
        self.emit(ResourceNotice::PlaybackPaused);
    }

    fn set_volume(&self, volume: f64) {
        self.playhead.borrow_mut().volume = volume.clamp(0.0, 1.0);
        self.emit_volume();
    }

    fn set_muted(&self, muted: bool) {
        self.playhead.borrow_mut().muted = muted;
        self.emit_volume();
    }

    fn set_playback_rate(&self, rate: f64) {
        self.playhead.borrow_mut().rate = rate;
    }

    fn set_position(&self, position: f64) {
        {
            let mut playhead = self.playhead.borrow_mut();
            playhead.position = position.clamp(0.0, playhead.duration);
        }
        self.emit_position();
    }

    fn position(&self) -> f64 {
        self.playhead.borrow().position
    }

    fn duration(&self) -> f64 {
        self.playhead.borrow().duration
    }

    fn subscribe(&self, sink: NoticeSink) -> Subscription {
        let id = self.next_listener.get();
        self.next_listener.set(id + 1);
        self.listeners.borrow_mut().push((id, sink));

        let listeners = Rc::downgrade(&self.listeners);
        Subscription::new(move || {
            if let Some(listeners) = listeners.upgrade() {
                listeners.borrow_mut().retain(|(listener, _)| *listener != id);
            }
        })
    }
}

/// Host that mounts a fresh [`SimulatedMedia`] for every item
///
/// Clones share the same mount point, so a driver can keep one clone to run
/// the clock while the session owns another.
#[derive(Clone)]
pub struct SimulatedHost {
    mounted: Rc<RefCell<Option<Rc<SimulatedMedia>>>>,
    durations: Rc<HashMap<String, Duration>>,
    default_duration: Duration,
    mounts: Rc<Cell<usize>>,
}

impl SimulatedHost {
    /// Every item lasts `default_duration`
    pub fn new(default_duration: Duration) -> Self {
        Self {
            mounted: Rc::default(),
            durations: Rc::default(),
            default_duration,
            mounts: Rc::default(),
        }
    }

    /// Per-url lengths, falling back to `default_duration`
    pub fn with_durations(default_duration: Duration, durations: HashMap<String, Duration>) -> Self {
        Self {
            durations: Rc::new(durations),
            ..Self::new(default_duration)
        }
    }

    /// Currently mounted media
    pub fn current(&self) -> Option<Rc<SimulatedMedia>> {
        self.mounted.borrow().clone()
    }

    /// How many items have been mounted so far
    pub fn mount_count(&self) -> usize {
        self.mounts.get()
    }
}

impl MediaHost for SimulatedHost {
    fn mount(&mut self, item: &MediaItem) -> Rc<dyn MediaResource> {
        let duration = self
            .durations
            .get(item.url())
            .copied()
            .unwrap_or(self.default_duration);
        let media = Rc::new(SimulatedMedia::new(item.url(), duration));
        *self.mounted.borrow_mut() = Some(Rc::clone(&media));
        self.mounts.set(self.mounts.get() + 1);
        debug!(url = item.url(), ?duration, "mounted simulated media");
        media
    }

    fn unmount(&mut self) {
        self.mounted.borrow_mut().take();
    }
}
