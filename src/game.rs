//! Platform-independent loop body
//!
//! Both frontends own a `Game` and call `advance` then `render` once per
//! displayed frame. Input arrives through an `InputSender` and is only
//! applied here, between ticks.

use std::time::Duration;

use image::RgbaImage;

use crate::assets::Assets;
use crate::platform::{FixedStep, FpsCounter};
use crate::renderer::SceneRenderer;
use crate::settings::Settings;
use crate::sim::{
    FieldLayout, GameState, INPUT_QUEUE_CAPACITY, InputReceiver, InputSender, TickOutcome,
    input_channel, tick,
};

pub struct Game {
    state: GameState,
    input: InputReceiver,
    sender: InputSender,
    clock: FixedStep,
    scene: SceneRenderer,
    fps: FpsCounter,
    show_fps: bool,
}

impl Game {
    pub fn new(assets: &Assets, settings: &Settings, seed: u64) -> Self {
        let layout = FieldLayout::for_assets(&assets.dims());
        let (sender, input) = input_channel(INPUT_QUEUE_CAPACITY);
        log::info!("Game initialized with seed: {}", seed);

        Self {
            scene: SceneRenderer::new(assets, &layout),
            state: GameState::new(layout, seed),
            input,
            sender,
            clock: FixedStep::at_tick_rate(),
            fps: FpsCounter::default(),
            show_fps: settings.show_fps,
        }
    }

    /// A handle platform callbacks push input through
    pub fn input_sender(&self) -> InputSender {
        self.sender.clone()
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Run one tick, applying whatever input arrived since the last one
    pub fn step(&mut self) -> TickOutcome {
        self.input.drain_into(&mut self.state);
        tick(&mut self.state)
    }

    /// Bank `elapsed` seconds of wall time and run the ticks now due.
    /// Returns the number of ticks run.
    pub fn advance(&mut self, elapsed: f32) -> u32 {
        let due = self.clock.advance(elapsed);
        for _ in 0..due {
            self.step();
        }
        due
    }

    /// Composite the current state; `now_secs` feeds the FPS counter
    pub fn render(&mut self, now_secs: f64) -> &RgbaImage {
        self.fps.record(now_secs);
        let fps = self.show_fps.then(|| self.fps.fps());
        self.scene.render(&self.state, fps)
    }

    pub fn fps(&self) -> u32 {
        self.fps.fps()
    }

    /// How long a frontend may sleep before the next tick is due
    pub fn until_next_tick(&self) -> Duration {
        self.clock.until_next_tick()
    }
}
