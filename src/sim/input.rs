//! Input mapping and the queue between the platform and the loop
//!
//! Platform callbacks only ever push `InputEvent`s. The loop drains them at
//! the start of each tick, so the game state has a single writer.

use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};

use super::state::{GameState, Intent};

/// Default number of events buffered between ticks
pub const INPUT_QUEUE_CAPACITY: usize = 32;

/// The two logical events the game understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Button or tap down
    Press,
    /// Button or tap up
    Release,
}

/// Apply one event to the state.
///
/// Press queues a single flap. Release starts a run if one isn't going and
/// returns the player to falling.
pub fn apply_input(state: &mut GameState, event: InputEvent) {
    match event {
        InputEvent::Press => state.intent = Intent::Ascend,
        InputEvent::Release => state.start(),
    }
}

/// Create a bounded input queue
pub fn input_channel(capacity: usize) -> (InputSender, InputReceiver) {
    let (tx, rx) = mpsc::sync_channel(capacity);
    (InputSender { tx }, InputReceiver { rx })
}

/// Producer half, safe to hand to any platform thread
#[derive(Debug, Clone)]
pub struct InputSender {
    tx: SyncSender<InputEvent>,
}

impl InputSender {
    /// Queue an event without blocking. Returns false if it was dropped.
    pub fn send(&self, event: InputEvent) -> bool {
        match self.tx.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(event)) => {
                log::warn!("Input queue full, dropping {:?}", event);
                false
            }
            Err(TrySendError::Disconnected(_)) => false,
        }
    }
}

/// Consumer half, owned by the loop
#[derive(Debug)]
pub struct InputReceiver {
    rx: Receiver<InputEvent>,
}

impl InputReceiver {
    /// Apply every pending event in arrival order and return how many there were.
    ///
    /// A press drained in the same batch as a later release still flaps: a
    /// tap shorter than one tick is not lost.
    pub fn drain_into(&self, state: &mut GameState) -> usize {
        let mut count = 0;
        let mut pressed = false;
        for event in self.rx.try_iter() {
            apply_input(state, event);
            pressed |= event == InputEvent::Press;
            count += 1;
        }
        if pressed && state.intent == Intent::Descend {
            state.intent = Intent::Ascend;
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::layout::FieldLayout;
    use crate::sim::layout::tests::classic_dims;
    use crate::sim::state::GamePhase;

    fn state() -> GameState {
        GameState::new(FieldLayout::for_assets(&classic_dims()), 1)
    }

    #[test]
    fn test_press_sets_ascend() {
        let mut s = state();
        apply_input(&mut s, InputEvent::Press);
        assert_eq!(s.intent, Intent::Ascend);
        assert_eq!(s.phase, GamePhase::Menu);
    }

    #[test]
    fn test_release_starts_run_and_descends() {
        let mut s = state();
        apply_input(&mut s, InputEvent::Release);
        assert_eq!(s.phase, GamePhase::Playing);
        assert_eq!(s.intent, Intent::Descend);

        apply_input(&mut s, InputEvent::Release);
        assert_eq!(s.phase, GamePhase::Playing);
        assert_eq!(s.intent, Intent::Descend);
    }

    #[test]
    fn test_queue_applies_in_order() {
        let (tx, rx) = input_channel(INPUT_QUEUE_CAPACITY);
        let mut s = state();
        assert!(tx.send(InputEvent::Release));
        assert_eq!(rx.drain_into(&mut s), 1);
        assert_eq!(s.intent, Intent::Descend);

        assert!(tx.send(InputEvent::Press));
        assert_eq!(rx.drain_into(&mut s), 1);
        assert_eq!(s.intent, Intent::Ascend);

        assert_eq!(rx.drain_into(&mut s), 0);
    }

    #[test]
    fn test_short_tap_still_flaps() {
        let (tx, rx) = input_channel(INPUT_QUEUE_CAPACITY);
        let mut s = state();
        tx.send(InputEvent::Press);
        tx.send(InputEvent::Release);
        rx.drain_into(&mut s);
        assert!(s.is_active());
        assert_eq!(s.intent, Intent::Ascend);
    }

    #[test]
    fn test_full_queue_drops() {
        let (tx, rx) = input_channel(2);
        assert!(tx.send(InputEvent::Press));
        assert!(tx.send(InputEvent::Release));
        assert!(!tx.send(InputEvent::Press));

        let mut s = state();
        assert_eq!(rx.drain_into(&mut s), 2);
    }

    #[test]
    fn test_sender_crosses_threads() {
        let (tx, rx) = input_channel(INPUT_QUEUE_CAPACITY);
        let handle = std::thread::spawn(move || {
            tx.send(InputEvent::Release);
        });
        handle.join().unwrap();

        let mut s = state();
        assert_eq!(rx.drain_into(&mut s), 1);
        assert!(s.is_active());
    }
}
