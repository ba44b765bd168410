//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Fixed obstacle slots, stable indices
//! - No rendering or platform dependencies

pub mod input;
pub mod layout;
pub mod obstacle;
pub mod rect;
pub mod state;
pub mod tick;

pub use input::{INPUT_QUEUE_CAPACITY, InputEvent, InputReceiver, InputSender, apply_input, input_channel};
pub use layout::{AssetDims, FieldLayout, SpriteDims};
pub use obstacle::Obstacle;
pub use rect::Rect;
pub use state::{GamePhase, GameState, Intent};
pub use tick::{TickOutcome, game_over, tick};
