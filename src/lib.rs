//! Flappy - a single-screen tap-to-flap arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, obstacles, scoring, input mapping)
//! - `renderer`: Software compositor plus a WebGPU presenter
//! - `platform`: Fixed-step clock shared by the native and browser frontends
//! - `assets`: Sprite loading and sprite-sheet slicing
//! - `settings`: User preferences (never physics)

pub mod assets;
pub mod game;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use assets::{AssetError, Assets};
pub use game::Game;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation rate
    pub const TICK_HZ: u32 = 60;
    /// Fixed simulation timestep in seconds
    pub const SIM_DT: f32 = 1.0 / TICK_HZ as f32;
    /// Maximum ticks per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Side length of the square play field, in pixels
    pub const FIELD_SIZE: u32 = 512;

    /// Downward acceleration added to velocity each descending tick
    pub const GRAVITY: f32 = 0.25;
    /// Velocity assigned (not added) on a flap
    pub const FLAP_IMPULSE: f32 = -4.5;

    /// Number of obstacle slots, recycled in place
    pub const OBSTACLE_COUNT: usize = 4;
    /// Leftward obstacle speed while playing (pixels/tick)
    pub const OBSTACLE_SPEED: f32 = 3.0;
    /// Vertical opening between the top and bottom region
    pub const OBSTACLE_GAP: f32 = 105.0;
    /// Horizontal spacing between obstacles in the start layout
    pub const OBSTACLE_STAGGER: f32 = 170.0;
    /// Extra lateral gap when an obstacle is recycled past the right edge
    pub const OBSTACLE_RECYCLE_MARGIN: f32 = 65.0;
    /// Top-region offset above the reference line, drawn from [MIN, MAX)
    pub const OBSTACLE_OFFSET_MIN: i32 = 100;
    pub const OBSTACLE_OFFSET_MAX: i32 = 240;

    /// Background parallax scroll (pixels/tick)
    pub const BACKGROUND_SCROLL_SPEED: f32 = 1.0;
    /// Floor scroll (pixels/tick), faster than the background
    pub const FLOOR_SCROLL_SPEED: f32 = 3.0;

    /// Sprite-sheet frames for the player
    pub const PLAYER_FRAMES: usize = 3;
    /// The frame advances once the tick counter exceeds this value
    pub const ANIMATION_INTERVAL: u32 = 5;
}
