//! Property-based tests for the queue and the transport reducer
//!
//! Uses proptest to check invariants across random inputs.

use pocket_playback::transport::{reduce, TransportAction, TransportState};
use pocket_playback::{MediaFormat, MediaItem, QueueManager};
use proptest::prelude::*;

// ===== Helpers =====

fn arbitrary_item() -> impl Strategy<Value = MediaItem> {
    (
        "[a-z0-9]{1,12}",
        prop::sample::select(MediaFormat::ALL.to_vec()),
    )
        .prop_map(|(name, format)| MediaItem::new(format!("/media/{name}"), format, "/thumb.png"))
}

fn arbitrary_items() -> impl Strategy<Value = Vec<MediaItem>> {
    prop::collection::vec(arbitrary_item(), 1..40)
}

fn snapshot(items: Vec<&MediaItem>) -> Vec<MediaItem> {
    items.into_iter().cloned().collect()
}

fn arbitrary_action() -> impl Strategy<Value = TransportAction> {
    prop_oneof![
        Just(TransportAction::TogglePlaying),
        any::<bool>().prop_map(TransportAction::SetPlaying),
        (-5.0f64..5.0).prop_map(TransportAction::SetVolume),
        Just(TransportAction::ToggleMuted),
        any::<bool>().prop_map(TransportAction::SetMuted),
        (0.1f64..4.0).prop_map(TransportAction::SetPlaybackRate),
        (-100.0f64..1000.0).prop_map(TransportAction::SetPosition),
        (0.0f64..1000.0).prop_map(TransportAction::SetDuration),
        Just(TransportAction::Reset),
    ]
}

// ===== Properties =====

proptest! {
    /// Advancing through the queue yields items in enqueue order
    #[test]
    fn advance_is_fifo(items in arbitrary_items()) {
        let mut queue = QueueManager::new();
        for item in &items {
            queue.enqueue(item.clone());
        }

        let mut played = Vec::new();
        while let Some(item) = queue.advance() {
            played.push(item);
        }

        prop_assert_eq!(played, items.clone());
        prop_assert_eq!(queue.history().len(), items.len());
    }

    /// Going back right after advancing returns the same item and restores the queue
    #[test]
    fn advance_then_back_restores_queue(items in arbitrary_items(), steps in 0usize..40) {
        let mut queue = QueueManager::new();
        for item in &items {
            queue.enqueue(item.clone());
        }
        for _ in 0..steps.min(items.len() - 1) {
            queue.advance();
        }

        let before = snapshot(queue.pending());
        let history_before = snapshot(queue.history());

        let advanced = queue.advance();
        let recalled = queue.go_back();

        prop_assert_eq!(advanced, recalled);
        prop_assert_eq!(snapshot(queue.pending()), before);
        prop_assert_eq!(snapshot(queue.history()), history_before);
    }

    /// A removed item comes straight back from go_back, queued or not
    #[test]
    fn removed_item_is_recalled(
        items in arbitrary_items(),
        steps in 0usize..40,
        target in prop::option::of(any::<prop::sample::Index>()),
        stray in arbitrary_item(),
    ) {
        let mut queue = QueueManager::new();
        for item in &items {
            queue.enqueue(item.clone());
        }
        for _ in 0..steps.min(items.len()) {
            queue.advance();
        }
        let history_before = snapshot(queue.history());

        let removed = target.map_or(stray, |index| index.get(&items).clone());
        queue.remove(&removed);

        prop_assert_eq!(queue.history().len(), history_before.len() + 1);
        prop_assert_eq!(queue.go_back(), Some(removed));
        prop_assert_eq!(snapshot(queue.history()), history_before);
    }

    /// Pending plus history always accounts for every enqueued item when only
    /// advance and go_back are used
    #[test]
    fn navigation_conserves_items(items in arbitrary_items(), moves in prop::collection::vec(any::<bool>(), 0..80)) {
        let mut queue = QueueManager::new();
        for item in &items {
            queue.enqueue(item.clone());
        }

        for forward in moves {
            if forward {
                queue.advance();
            } else {
                queue.go_back();
            }
            prop_assert_eq!(queue.len() + queue.history().len(), items.len());
        }
    }

    /// Volume stays within [0, 1] whatever the reducer is fed
    #[test]
    fn volume_always_in_range(actions in prop::collection::vec(arbitrary_action(), 1..60)) {
        let mut state = TransportState::default();
        for action in actions {
            state = reduce(state, action);
            prop_assert!((0.0..=1.0).contains(&state.volume));
            prop_assert!(state.position >= 0.0);
        }
    }
}
