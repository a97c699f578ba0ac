//! Playback session
//!
//! Composes the queue manager and the transport controller for one player
//! instance. The queue decides which item is active; when that changes the
//! session mounts the item through the [`MediaHost`] and hands the resulting
//! resource to the controller. The two never talk to each other directly.
//!
//! [`Player`] is the context object the UI holds. It has no session until
//! [`Player::open`] is called, and every access before that fails with
//! [`PlaybackError::SessionNotOpen`].

use crate::{
    catalog::SampleCatalog,
    controller::{TransportCommand, TransportController},
    error::{PlaybackError, Result},
    events::ResourceNotice,
    keyboard::{KeyBindings, KeyboardHub, ListenerId},
    poller::PositionPoller,
    presentation::{Presentation, PresentationShell, PresentationState},
    queue::QueueManager,
    resource::MediaHost,
    transport::TransportState,
    types::{MediaItem, PlaybackConfig},
    upload::{Upload, UploadRegistry},
};
use std::future;
use std::rc::Rc;
use tracing::{debug, info, warn};

/// What [`PlayerSession::next_update`] applied
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionUpdate {
    /// A resource notice
    Notice(ResourceNotice),

    /// A polled position sample
    PositionSampled,
}

/// State and operations of one open player
pub struct PlayerSession {
    config: PlaybackConfig,
    queue: QueueManager,
    active: Option<MediaItem>,
    transport: TransportController,
    host: Box<dyn MediaHost>,
    presentation: Presentation,
    keyboard: KeyboardHub,
    key_listener: Option<ListenerId>,
    uploads: UploadRegistry,
    catalog: SampleCatalog,

    // Created lazily inside `next_update` so that no timer is needed until
    // something is actually waiting on it
    poller: Option<PositionPoller>,
}

impl PlayerSession {
    /// Open a session mounting media through `host`
    pub fn new(config: PlaybackConfig, host: Box<dyn MediaHost>) -> Self {
        Self {
            queue: QueueManager::new(),
            active: None,
            transport: TransportController::new(),
            host,
            presentation: Presentation::new(),
            keyboard: KeyboardHub::new(),
            key_listener: None,
            uploads: UploadRegistry::new(),
            catalog: SampleCatalog::default(),
            poller: None,
            config,
        }
    }

    /// Forward fullscreen and minimize requests to `shell`
    pub fn set_presentation_shell(&mut self, shell: Rc<dyn PresentationShell>) {
        self.presentation = Presentation::with_shell(shell);
    }

    // ===== Selection =====

    /// Play a file chosen by the user right away
    ///
    /// # Errors
    /// `UnsupportedMediaType` when the MIME type cannot be rendered; nothing
    /// changes in that case.
    pub fn select_file(&mut self, url: &str, mime_type: &str, thumbnail_url: &str) -> Result<MediaItem> {
        let item = MediaItem::from_mime(url, mime_type, thumbnail_url).inspect_err(|_| {
            warn!(url, mime_type, "rejected unsupported media");
        })?;
        self.play_now(item.clone());
        Ok(item)
    }

    /// Register an uploaded file and play it right away
    ///
    /// Returns the locator the upload is reachable under.
    pub fn upload_file(&mut self, upload: Upload) -> Result<String> {
        let mime_type = upload.mime_type.clone();
        let locator = self.uploads.register(upload)?;

        let thumbnail = self.config.default_thumbnail.clone();
        if let Err(err) = self.select_file(&locator, &mime_type, &thumbnail) {
            self.uploads.revoke(&locator);
            return Err(err);
        }
        Ok(locator)
    }

    /// Start the sample list at `url`
    ///
    /// Everything still queued is removed first (and so recorded in history),
    /// then the chosen sample and the ones listed after it are queued and the
    /// chosen one becomes active.
    pub fn select_sample(&mut self, url: &str) -> Result<MediaItem> {
        let tail = self
            .catalog
            .tail_from(url)
            .ok_or_else(|| PlaybackError::UnknownSample(url.to_string()))?
            .to_vec();

        let pending: Vec<MediaItem> = self.queue.pending().into_iter().cloned().collect();
        for item in &pending {
            self.queue.remove(item);
        }
        for item in tail {
            self.queue.enqueue(item);
        }

        match self.queue.advance() {
            Some(item) => {
                self.activate(item.clone());
                Ok(item)
            }
            None => Err(PlaybackError::UnknownSample(url.to_string())),
        }
    }

    fn play_now(&mut self, item: MediaItem) {
        self.queue.enqueue_front(item);
        if let Some(item) = self.queue.advance() {
            self.activate(item);
        }
    }

    fn activate(&mut self, item: MediaItem) {
        info!(url = item.url(), kind = ?item.kind(), "activating media");
        let resource = self.host.mount(&item);
        self.transport.attach(resource);
        self.active = Some(item);

        // Replaces the previous item's listener
        self.key_listener = Some(self.keyboard.register(KeyBindings::from_config(&self.config)));

        if self.config.autoplay {
            if let Err(err) = self.transport.play() {
                warn!(%err, "autoplay failed");
            }
        }
    }

    // ===== Queue =====

    /// Advance to the next queued item
    ///
    /// Returns `None` (and keeps the current item) when the queue is empty.
    pub fn next(&mut self) -> Option<MediaItem> {
        let item = self.queue.advance()?;
        self.activate(item.clone());
        Some(item)
    }

    /// Go back to the most recent history entry
    pub fn previous(&mut self) -> Option<MediaItem> {
        let item = self.queue.go_back()?;
        self.activate(item.clone());
        Some(item)
    }

    pub fn enqueue(&mut self, item: MediaItem) {
        self.queue.enqueue(item);
    }

    pub fn enqueue_front(&mut self, item: MediaItem) {
        self.queue.enqueue_front(item);
    }

    /// See [`QueueManager::remove`]; the item also lands in history
    pub fn remove(&mut self, item: &MediaItem) -> bool {
        self.queue.remove(item)
    }

    /// See [`QueueManager::discard`]
    pub fn discard(&mut self, item: &MediaItem) -> Option<MediaItem> {
        self.queue.discard(item)
    }

    /// Empty the queue and history; the active item keeps playing
    pub fn clear_queue(&mut self) {
        self.queue.clear();
    }

    pub fn queue(&self) -> &QueueManager {
        &self.queue
    }

    pub fn active_item(&self) -> Option<&MediaItem> {
        self.active.as_ref()
    }

    // ===== Transport =====

    pub fn transport(&self) -> &TransportState {
        self.transport.state()
    }

    /// Run a transport command against the active item
    pub fn execute(&mut self, command: TransportCommand) -> Result<()> {
        self.transport.execute(command)
    }

    pub fn toggle_play_pause(&mut self) -> Result<()> {
        self.transport.toggle_play_pause()
    }

    pub fn set_volume(&mut self, volume: f64) -> Result<()> {
        self.transport.set_volume(volume)
    }

    /// Volume up by the configured step
    pub fn volume_up(&mut self) -> Result<()> {
        self.transport.adjust_volume(self.config.volume_step)
    }

    /// Volume down by the configured step
    pub fn volume_down(&mut self) -> Result<()> {
        self.transport.adjust_volume(-self.config.volume_step)
    }

    pub fn toggle_mute(&mut self) -> Result<()> {
        self.transport.toggle_mute()
    }

    pub fn set_playback_rate(&mut self, rate: f64) -> Result<()> {
        self.transport.set_playback_rate(rate)
    }

    pub fn seek(&mut self, position: f64) -> Result<()> {
        self.transport.seek(position)
    }

    /// Skip forward by the configured step
    pub fn skip_forward(&mut self) -> Result<()> {
        self.transport.seek_by(self.config.seek_step_secs)
    }

    /// Skip back by the configured step
    pub fn skip_back(&mut self) -> Result<()> {
        self.transport.seek_by(-self.config.seek_step_secs)
    }

    pub fn restart(&mut self) -> Result<()> {
        self.transport.restart()
    }

    /// Handle a `KeyboardEvent.code`
    ///
    /// Returns the command that ran, or `None` if the key is not bound.
    pub fn handle_key(&mut self, code: &str) -> Result<Option<TransportCommand>> {
        let Some(command) = self.keyboard.dispatch(code) else {
            return Ok(None);
        };
        self.transport.execute(command)?;
        Ok(Some(command))
    }

    pub fn keyboard(&self) -> &KeyboardHub {
        &self.keyboard
    }

    // ===== Presentation =====

    pub fn presentation(&self) -> PresentationState {
        self.presentation.state()
    }

    pub fn toggle_fullscreen(&self) {
        self.presentation.toggle_fullscreen();
    }

    /// Platform fullscreen-change notification
    pub fn fullscreen_changed(&mut self, is_fullscreen: bool) {
        self.presentation.fullscreen_changed(is_fullscreen);
    }

    pub fn toggle_minimize(&mut self) {
        self.presentation.toggle_minimize();
    }

    // ===== Uploads & samples =====

    pub fn uploads(&self) -> &UploadRegistry {
        &self.uploads
    }

    pub fn catalog(&self) -> &SampleCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    // ===== Notices =====

    /// Apply every resource notice already waiting
    pub fn pump(&mut self) -> usize {
        self.transport.drain_notices()
    }

    /// Wait for the next resource notice or poll tick and apply it
    ///
    /// Polling only runs while a resource is attached and a poll interval is
    /// configured.
    pub async fn next_update(&mut self) -> SessionUpdate {
        if self.poller.is_none() && self.transport.is_attached() {
            self.poller = PositionPoller::from_millis(self.config.poll_interval_ms);
        }

        let Self {
            transport, poller, ..
        } = self;

        let tick = async {
            match poller.as_mut() {
                Some(poller) => poller.tick().await,
                None => future::pending().await,
            }
        };

        tokio::select! {
            notice = transport.next_notice() => SessionUpdate::Notice(notice),
            () = tick => {
                if let Err(err) = transport.sample_position() {
                    debug!(%err, "position sample skipped");
                }
                SessionUpdate::PositionSampled
            }
        }
    }

    // ===== Teardown =====

    /// Tear the session down
    ///
    /// Clears queue and history, unsubscribes from the resource, stops
    /// polling, releases uploads and unmounts the media.
    pub fn close(&mut self) {
        self.queue.clear();
        self.transport.detach();
        self.poller = None;
        if let Some(id) = self.key_listener.take() {
            self.keyboard.unregister(id);
        }
        self.uploads.clear();
        self.presentation.reset();
        self.active = None;
        self.host.unmount();
        info!("playback session closed");
    }
}

/// Context object owning at most one open session
#[derive(Default)]
pub struct Player {
    config: PlaybackConfig,
    session: Option<PlayerSession>,
}

impl Player {
    pub fn new(config: PlaybackConfig) -> Self {
        Self {
            config,
            session: None,
        }
    }

    /// Open a fresh session, closing the current one first
    pub fn open(&mut self, host: Box<dyn MediaHost>) -> &mut PlayerSession {
        self.close();
        info!("playback session opened");
        self.session.insert(PlayerSession::new(self.config.clone(), host))
    }

    /// Close the current session; returns whether one was open
    pub fn close(&mut self) -> bool {
        match self.session.take() {
            Some(mut session) => {
                session.close();
                true
            }
            None => false,
        }
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    /// # Errors
    /// `SessionNotOpen` before [`open`](Self::open).
    pub fn session(&self) -> Result<&PlayerSession> {
        self.session.as_ref().ok_or(PlaybackError::SessionNotOpen)
    }

    /// # Errors
    /// `SessionNotOpen` before [`open`](Self::open).
    pub fn session_mut(&mut self) -> Result<&mut PlayerSession> {
        self.session.as_mut().ok_or(PlaybackError::SessionNotOpen)
    }
}
