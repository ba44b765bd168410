//! Fixed timestep simulation tick
//!
//! One call advances the game by exactly one frame at `TICK_HZ`. Input has
//! already been folded into `state.intent`/`state.phase` by the input mapper.

use super::state::{GameState, Intent};
use crate::consts::*;

/// What happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing ended; the state may have scrolled, scored or moved
    Continued,
    /// The run ended and the state is already back in the menu
    GameOver { final_score: u32 },
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState) -> TickOutcome {
    scroll_backdrop(state);
    advance_animation(state);

    if state.is_active() {
        for i in 0..state.obstacles.len() {
            state.obstacles[i].advance(OBSTACLE_SPEED);

            if state.obstacles[i].is_off_screen() {
                state.recycle_obstacle(i);
            }

            if state.obstacles[i].intersects(&state.player) {
                return game_over(state);
            }

            if state.obstacles[i].has_been_passed_by(&state.player) {
                state.obstacles[i].passed = true;
                state.award_point();
            }
        }
    }

    apply_vertical_physics(state);

    if state.player_out_of_bounds() {
        return game_over(state);
    }

    TickOutcome::Continued
}

/// End the run: bank the best score, then reset everything but `best_score`.
///
/// The reset completes before `tick` returns, so a renderer never sees a
/// half-finished run.
pub fn game_over(state: &mut GameState) -> TickOutcome {
    let final_score = state.score;
    state.best_score = state.best_score.max(final_score);
    state.score = 0;
    state.reset_obstacles();
    state.reset_player();

    log::info!(
        "Game over: score {} (best {})",
        final_score,
        state.best_score
    );
    debug_assert!(state.score <= state.best_score);

    TickOutcome::GameOver { final_score }
}

/// Parallax scroll; each layer wraps after one full tile width
fn scroll_backdrop(state: &mut GameState) {
    state.background_scroll_x = wrap_scroll(
        state.background_scroll_x - BACKGROUND_SCROLL_SPEED,
        state.layout.background.width(),
    );
    state.floor_scroll_x = wrap_scroll(
        state.floor_scroll_x - FLOOR_SCROLL_SPEED,
        state.layout.floor.width(),
    );
}

#[inline]
fn wrap_scroll(x: f32, tile_width: f32) -> f32 {
    if x + tile_width <= 0.0 { x + tile_width } else { x }
}

fn advance_animation(state: &mut GameState) {
    state.animation_counter += 1;
    if state.animation_counter > ANIMATION_INTERVAL {
        state.animation_counter = 0;
        state.player_frame = (state.player_frame + 1) % PLAYER_FRAMES;
    }
}

fn apply_vertical_physics(state: &mut GameState) {
    match state.intent {
        Intent::Descend => {
            state.velocity += GRAVITY;
            state.player.pos.y += state.velocity;
        }
        Intent::Ascend => {
            // Impulse overwrites velocity, then the flap is spent
            state.velocity = FLAP_IMPULSE;
            state.player.pos.y += state.velocity;
            state.intent = if state.is_active() {
                Intent::Descend
            } else {
                Intent::Idle
            };
        }
        Intent::Idle => {}
    }
}
