//! Press/release pairing for the native frontend
//!
//! A window only sees the release of a button if the pointer is still over
//! it. The latch remembers an outstanding press so the frontend can release
//! it when the pointer leaves or focus is lost, and drops the late release
//! that may still arrive afterwards.

use crate::sim::InputEvent;

#[derive(Debug, Default, Clone)]
pub struct ButtonLatch {
    held: bool,
}

impl ButtonLatch {
    pub fn press(&mut self) -> InputEvent {
        self.held = true;
        InputEvent::Press
    }

    /// `Release` if a press is outstanding
    pub fn release(&mut self) -> Option<InputEvent> {
        std::mem::take(&mut self.held).then_some(InputEvent::Release)
    }

    /// Pointer left the window or the window lost focus
    pub fn cancel(&mut self) -> Option<InputEvent> {
        let event = self.release();
        if event.is_some() {
            log::debug!("Releasing button held across focus loss");
        }
        event
    }

    pub fn is_held(&self) -> bool {
        self.held
    }
}
