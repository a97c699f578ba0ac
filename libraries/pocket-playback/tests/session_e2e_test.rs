//! End-to-end session tests against the simulated media host
//!
//! Drives a full session the way the UI would: select media, press buttons
//! and keys, and let the resource report back.


use pocket_playback::{
    MediaResource, PlaybackConfig, PlaybackError, Player, ResourceNotice, SessionUpdate,
    SimulatedHost, TransportCommand, Upload,
};
use std::time::Duration;
use test_helpers::{simulated_session, urls, video};

fn no_polling() -> PlaybackConfig {
    PlaybackConfig {
        poll_interval_ms: None,
        ..PlaybackConfig::default()
    }
}

// ===== Selection =====

#[test]
fn test_sample_selection_queues_remaining_samples() {
    let (mut session, host) = simulated_session(no_polling());

    let active = session.select_sample("/samples/sample3.mp4").unwrap();
    assert_eq!(active.url(), "/samples/sample3.mp4");
    assert_eq!(host.current().unwrap().url(), "/samples/sample3.mp4");
    assert_eq!(
        urls(session.queue().pending()),
        ["/samples/sample4.mp4", "/samples/sample5.mp3", "/samples/sample6.mp3"]
    );
}

#[test]
fn test_reselecting_sample_moves_pending_into_history() {
    let (mut session, _host) = simulated_session(no_polling());
    session.select_sample("/samples/sample4.mp4").unwrap();
    session.select_sample("/samples/sample6.mp3").unwrap();

    assert!(session.queue().is_empty());
    assert_eq!(
        urls(session.queue().history()),
        [
            "/samples/sample6.mp3",
            "/samples/sample6.mp3",
            "/samples/sample5.mp3",
            "/samples/sample4.mp4",
        ]
    );
}

#[test]
fn test_unknown_sample_is_rejected() {
    let (mut session, host) = simulated_session(no_polling());
    let err = session.select_sample("/samples/nope.mp4").unwrap_err();

    assert_eq!(err, PlaybackError::UnknownSample("/samples/nope.mp4".into()));
    assert_eq!(host.mount_count(), 0);
}

#[test]
fn test_next_and_previous() {
    let (mut session, host) = simulated_session(no_polling());
    session.select_sample("/samples/sample5.mp3").unwrap();

    let next = session.next().unwrap();
    assert_eq!(next.url(), "/samples/sample6.mp3");
    assert_eq!(session.next(), None);
    assert_eq!(session.active_item().unwrap().url(), "/samples/sample6.mp3");

    // The active item sits at the top of history, so previous replays it
    let previous = session.previous().unwrap();
    assert_eq!(previous.url(), "/samples/sample6.mp3");
    assert_eq!(host.mount_count(), 3);
}

#[test]
fn test_upload_plays_immediately() {
    let (mut session, host) = simulated_session(no_polling());
    session.enqueue(video("later"));

    let locator = session
        .upload_file(Upload::new("clip.webm", "video/webm", vec![1, 2, 3]))
        .unwrap();

    assert_eq!(session.active_item().unwrap().url(), locator);
    assert_eq!(
        session.active_item().unwrap().thumbnail_url(),
        "/thumbnails/audioThumbnail.png"
    );
    assert_eq!(host.current().unwrap().url(), locator);
    assert!(session.uploads().resolve(&locator).is_some());
    assert_eq!(urls(session.queue().pending()), ["/media/later.mp4"]);
}

#[test]
fn test_unsupported_upload_is_released() {
    let (mut session, _host) = simulated_session(no_polling());
    let err = session
        .upload_file(Upload::new("notes.txt", "text/plain", b"hello".to_vec()))
        .unwrap_err();

    assert_eq!(err, PlaybackError::UnsupportedMediaType("text/plain".into()));
    assert!(session.uploads().is_empty());
    assert!(session.active_item().is_none());
}

// ===== Transport sync =====

#[test]
fn test_resource_report_overrides_local_volume() {
    let (mut session, host) = simulated_session(no_polling());
    session.select_file("/movie.mp4", "video/mp4", "/t.png").unwrap();

    session.set_volume(0.5).unwrap();
    assert_eq!(session.transport().volume, 0.5);

    host.current().unwrap().external_volume_change(0.2, true);
    session.pump();

    assert_eq!(session.transport().volume, 0.2);
    assert!(session.transport().is_muted);
}

#[test]
fn test_blocked_play_is_corrected_by_resource() {
    let (mut session, host) = simulated_session(no_polling());
    session.select_file("/song.wav", "audio/wav", "/t.png").unwrap();
    host.current().unwrap().block_autoplay(true);

    session.toggle_play_pause().unwrap();
    assert!(session.transport().is_playing);

    session.pump();
    assert!(!session.transport().is_playing);
}

#[test]
fn test_autoplay_starts_new_items() {
    let config = PlaybackConfig {
        autoplay: true,
        ..no_polling()
    };
    let (mut session, host) = simulated_session(config);
    session.select_sample("/samples/sample1.mp4").unwrap();
    session.pump();

    assert!(session.transport().is_playing);
    assert!(host.current().unwrap().is_playing());
}

#[test]
fn test_switching_items_leaves_one_subscription() {
    let (mut session, host) = simulated_session(no_polling());
    session.select_sample("/samples/sample1.mp4").unwrap();
    let first = host.current().unwrap();
    assert_eq!(first.listener_count(), 1);

    session.next().unwrap();
    let second = host.current().unwrap();

    assert_eq!(first.listener_count(), 0);
    assert_eq!(second.listener_count(), 1);

    // The old element can no longer move local state
    first.external_volume_change(0.0, true);
    assert_eq!(session.pump(), 0);
    assert_eq!(session.transport().volume, 1.0);
}

#[test]
fn test_new_item_resets_transport() {
    let (mut session, _host) = simulated_session(no_polling());
    session.select_sample("/samples/sample1.mp4").unwrap();
    session.set_playback_rate(1.5).unwrap();
    session.seek(12.0).unwrap();

    session.next().unwrap();
    assert_eq!(session.transport().playback_rate, 1.0);
    assert_eq!(session.transport().position, 0.0);
}

#[test]
fn test_seek_is_clamped_by_resource() {
    let (mut session, host) = simulated_session(no_polling());
    session.select_file("/movie.mp4", "video/mp4", "/t.png").unwrap();

    session.seek(-5.0).unwrap();
    assert_eq!(session.transport().position, 0.0);

    session.seek(500.0).unwrap();
    assert_eq!(session.transport().position, 500.0);
    session.pump();
    assert_eq!(session.transport().position, 60.0);
    assert_eq!(host.current().unwrap().position(), 60.0);
}

#[test]
fn test_media_end_stops_playback() {
    let (mut session, host) = simulated_session(no_polling());
    session.select_file("/movie.mp4", "video/mp4", "/t.png").unwrap();
    session.toggle_play_pause().unwrap();

    host.current().unwrap().advance(Duration::from_secs(90));
    session.pump();

    assert!(!session.transport().is_playing);
    assert_eq!(session.transport().position, 60.0);
    assert_eq!(session.transport().progress(), 1.0);
}

// ===== Keyboard =====

#[test]
fn test_keys_resolve_against_current_state() {
    let (mut session, _host) = simulated_session(no_polling());
    session.select_file("/movie.mp4", "video/mp4", "/t.png").unwrap();
    session.set_volume(0.5).unwrap();

    let command = session.handle_key("ArrowDown").unwrap();
    assert_eq!(command, Some(TransportCommand::AdjustVolume(-0.1)));
    assert!((session.transport().volume - 0.4).abs() < 1e-9);

    session.handle_key("ArrowRight").unwrap();
    session.handle_key("ArrowRight").unwrap();
    assert_eq!(session.transport().position, 20.0);

    session.handle_key("Space").unwrap();
    assert!(session.transport().is_playing);

    session.handle_key("KeyM").unwrap();
    assert!(session.transport().is_muted);

    assert_eq!(session.handle_key("KeyQ").unwrap(), None);
}

#[test]
fn test_one_key_listener_across_items() {
    let (mut session, _host) = simulated_session(no_polling());
    session.select_sample("/samples/sample1.mp4").unwrap();
    session.next().unwrap();
    session.next().unwrap();

    assert_eq!(session.keyboard().listener_count(), 1);
}

#[test]
fn test_keys_without_media_do_nothing() {
    let (mut session, _host) = simulated_session(no_polling());
    assert_eq!(session.handle_key("Space").unwrap(), None);
}

// ===== Presentation =====

#[test]
fn test_fullscreen_flag_follows_notifications() {
    let (mut session, _host) = simulated_session(no_polling());
    session.toggle_fullscreen();
    assert!(!session.presentation().is_fullscreen);

    session.fullscreen_changed(true);
    assert!(session.presentation().is_fullscreen);

    session.toggle_minimize();
    assert!(session.presentation().is_minimized);
}

// ===== Async updates =====

#[tokio::test]
async fn test_next_update_applies_notices() {
    let (mut session, host) = simulated_session(no_polling());
    session.select_file("/movie.mp4", "video/mp4", "/t.png").unwrap();

    host.current().unwrap().load_metadata();
    let update = session.next_update().await;

    assert_eq!(
        update,
        SessionUpdate::Notice(ResourceNotice::MetadataLoaded { duration: 60.0 })
    );
    assert_eq!(session.transport().duration, 60.0);
}

#[tokio::test(start_paused = true)]
async fn test_polling_samples_position() {
    let (mut session, _host) = simulated_session(PlaybackConfig::default());
    session.select_file("/movie.mp4", "video/mp4", "/t.png").unwrap();
    session.seek(9.0).unwrap();
    session.pump();

    // Nothing queued: only the poller can produce the next update
    let update = session.next_update().await;
    assert_eq!(update, SessionUpdate::PositionSampled);
    assert_eq!(session.transport().position, 9.0);
    assert_eq!(session.transport().duration, 60.0);
}

#[tokio::test(start_paused = true)]
async fn test_no_polling_without_media() {
    let (mut session, _host) = simulated_session(PlaybackConfig::default());

    let waited = tokio::time::timeout(Duration::from_secs(5), session.next_update()).await;
    assert!(waited.is_err());
}

// ===== Lifecycle =====

#[test]
fn test_player_requires_open_session() {
    let mut player = Player::new(no_polling());
    assert_eq!(player.session().err(), Some(PlaybackError::SessionNotOpen));

    let host = SimulatedHost::new(Duration::from_secs(10));
    player.open(Box::new(host.clone()));
    player
        .session_mut()
        .unwrap()
        .select_sample("/samples/sample2.mp4")
        .unwrap();

    let media = host.current().unwrap();
    assert!(player.close());
    assert_eq!(media.listener_count(), 0);
    assert_eq!(player.session_mut().err(), Some(PlaybackError::SessionNotOpen));
}

#[test]
fn test_reopening_starts_clean() {
    let mut player = Player::default();
    player
        .open(Box::new(SimulatedHost::new(Duration::from_secs(10))))
        .select_sample("/samples/sample1.mp4")
        .unwrap();

    let session = player.open(Box::new(SimulatedHost::new(Duration::from_secs(10))));
    assert!(session.active_item().is_none());
    assert!(session.queue().is_empty());
}
