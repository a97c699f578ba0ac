//! Pocket Player - Playback Core
//!
//! Platform-agnostic queue and transport management for Pocket Player.
//!
//! This crate provides:
//! - A play queue with back navigation history
//! - Transport state (play/pause, volume, mute, rate, position) kept in sync
//!   with an asynchronous media resource
//! - Keyboard shortcuts, fullscreen/minimize flags and position polling
//! - In-memory uploads and a curated sample list
//!
//! # Architecture
//!
//! `pocket-playback` never touches a real media element. The platform mounts
//! media through [`MediaHost`] and hands back a [`MediaResource`]; the
//! resource reports changes as [`ResourceNotice`]s. Everything runs on one
//! thread, so resources are shared as `Rc` and notices travel over an
//! unbounded channel that the session drains.
//!
//! [`SimulatedHost`] provides a headless resource for tests and the CLI.
//!
//! # Example: Queue
//!
//! ```rust
//! use pocket_playback::{MediaFormat, MediaItem, QueueManager};
//!
//! let mut queue = QueueManager::new();
//! let a = MediaItem::new("/a.mp4", MediaFormat::Mp4, "/thumb.png");
//! let b = MediaItem::new("/b.mp3", MediaFormat::Mpeg, "/thumb.png");
//!
//! queue.enqueue(a.clone());
//! queue.enqueue(b.clone());
//!
//! assert_eq!(queue.advance(), Some(a.clone()));
//! assert_eq!(queue.go_back(), Some(a.clone()));
//! assert_eq!(queue.peek_next(), Some(&a));
//! ```
//!
//! # Example: Session
//!
//! ```rust
//! use pocket_playback::{PlaybackConfig, Player, SimulatedHost};
//! use std::time::Duration;
//!
//! let mut player = Player::new(PlaybackConfig::default());
//! assert!(player.session().is_err());
//!
//! let host = SimulatedHost::new(Duration::from_secs(30));
//! let session = player.open(Box::new(host.clone()));
//!
//! session.select_sample("/samples/sample1.mp4").unwrap();
//! session.toggle_play_pause().unwrap();
//! session.pump();
//!
//! assert!(session.transport().is_playing);
//! assert_eq!(session.queue().len(), 5);
//! ```

mod catalog;
mod controller;
mod error;
mod events;
mod history;
mod keyboard;
mod poller;
mod presentation;
mod queue;
mod resource;
mod session;
mod simulated;
pub mod transport;
pub mod types;
mod upload;

// Public exports
pub use catalog::SampleCatalog;
pub use controller::{TransportCommand, TransportController};
pub use error::{PlaybackError, Result};
pub use events::{NoticeSink, ResourceNotice};
pub use history::History;
pub use keyboard::{KeyBindings, KeyCode, KeyboardHub, ListenerId};
pub use poller::PositionPoller;
pub use presentation::{Presentation, PresentationShell, PresentationState};
pub use queue::QueueManager;
pub use resource::{MediaHost, MediaResource, Subscription};
pub use session::{PlayerSession, Player, SessionUpdate};
pub use simulated::{SimulatedHost, SimulatedMedia};
pub use transport::{TransportAction, TransportState};
pub use types::{format_time, MediaFormat, MediaItem, MediaKind, PlaybackConfig};
pub use upload::{Upload, UploadRegistry};
