//! Platform support shared by the native and web front ends

pub mod button;
pub mod clock;

pub use button::ButtonLatch;
pub use clock::{FixedStep, FpsCounter};
