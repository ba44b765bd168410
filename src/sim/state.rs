//! Game state and core simulation types
//!
//! The whole game lives in one value: the player region, the obstacle
//! slots, scores and scroll counters. Only `tick` and the input mapper
//! mutate it, always from the loop thread.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::layout::FieldLayout;
use super::obstacle::Obstacle;
use super::rect::Rect;
use crate::consts::*;

/// Per-tick vertical motion directive derived from input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Intent {
    /// One-shot flap, consumed by the tick that applies it
    Ascend,
    /// Fall under gravity
    Descend,
    /// No vertical motion (menu hover)
    #[default]
    Idle,
}

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GamePhase {
    /// Waiting for the first release to start a run
    #[default]
    Menu,
    /// Active run
    Playing,
}

/// Complete game state (deterministic for a given seed and input script)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Field geometry the state was built for
    pub layout: FieldLayout,
    /// Obstacle placement; seeded once, never reseeded
    rng: Pcg32,
    /// Player bounding region
    pub player: Rect,
    /// Vertical velocity (pixels/tick, positive is down)
    pub velocity: f32,
    pub intent: Intent,
    pub phase: GamePhase,
    /// Obstacles cleared in the current run
    pub score: u32,
    /// Best score seen by this process
    pub best_score: u32,
    /// Fixed slots; index identity is stable, order is recycling order
    pub obstacles: [Obstacle; OBSTACLE_COUNT],
    /// Left edge of the first background tile
    pub background_scroll_x: f32,
    /// Left edge of the first floor tile
    pub floor_scroll_x: f32,
    /// Current player sprite-sheet frame
    pub player_frame: usize,
    /// Ticks since the last frame change
    pub(crate) animation_counter: u32,
}

impl GameState {
    /// Create a menu-state game with the given seed
    pub fn new(layout: FieldLayout, seed: u64) -> Self {
        let size = layout.obstacle_size;
        let mut state = Self {
            rng: Pcg32::seed_from_u64(seed),
            player: layout.player_rest,
            velocity: 0.0,
            intent: Intent::Idle,
            phase: GamePhase::Menu,
            score: 0,
            best_score: 0,
            obstacles: std::array::from_fn(|_| Obstacle::new(size.x, size.y)),
            background_scroll_x: layout.background.x(),
            floor_scroll_x: layout.floor.x(),
            player_frame: 0,
            animation_counter: ANIMATION_INTERVAL,
            layout,
        };
        state.reset_obstacles();
        state
    }

    /// True while a run is in progress
    #[inline]
    pub fn is_active(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    /// Menu -> Playing. The player starts falling immediately.
    pub fn start(&mut self) {
        if self.phase == GamePhase::Menu {
            log::info!("Run started (best {})", self.best_score);
            self.phase = GamePhase::Playing;
        }
        self.intent = Intent::Descend;
    }

    /// Score a pass-by and keep `best_score` in step
    pub fn award_point(&mut self) {
        self.score += 1;
        if self.score > self.best_score {
            self.best_score = self.score;
            log::debug!("New best score: {}", self.best_score);
        }
        debug_assert!(self.score <= self.best_score);
    }

    /// Put every obstacle slot back in the staggered start layout
    pub fn reset_obstacles(&mut self) {
        for (i, obstacle) in self.obstacles.iter_mut().enumerate() {
            let x = self.layout.obstacle_start_x(i);
            obstacle.reset_to_new_position(x, &mut self.rng);
        }
    }

    /// Recycle one slot to just past the right edge
    pub fn recycle_obstacle(&mut self, index: usize) {
        let x = self.layout.obstacle_recycle_x();
        self.obstacles[index].reset_to_new_position(x, &mut self.rng);
        log::debug!("Recycled obstacle {} to x={}", index, x);
    }

    /// Recenter the player and return to the menu
    pub fn reset_player(&mut self) {
        self.player = self.layout.player_rest;
        self.velocity = 0.0;
        self.intent = Intent::Idle;
        self.phase = GamePhase::Menu;
    }

    /// True if the player touches the floor line or rises to the top edge
    pub fn player_out_of_bounds(&self) -> bool {
        self.player.bottom() >= self.layout.floor_line() || self.player.y() <= 0.0
    }
}
