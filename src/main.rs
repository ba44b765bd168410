//! Flappy entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;
    use std::sync::Arc;
    use std::time::{Instant, SystemTime, UNIX_EPOCH};

    use anyhow::{Context, Result};
    use winit::application::ApplicationHandler;
    use winit::dpi::LogicalSize;
    use winit::event::{ElementState, KeyEvent, MouseButton, StartCause, TouchPhase, WindowEvent};
    use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
    use winit::keyboard::{Key, NamedKey};
    use winit::window::{Window, WindowId};

    use flappy::consts::{FIELD_SIZE, SIM_DT};
    use flappy::platform::ButtonLatch;
    use flappy::renderer::FramePresenter;
    use flappy::sim::InputSender;
    use flappy::{Assets, Game, Settings};

    struct App {
        settings: Settings,
        game: Game,
        input: InputSender,
        button: ButtonLatch,
        window: Option<Arc<Window>>,
        presenter: Option<FramePresenter>,
        started: Instant,
        last_frame_time: Option<Instant>,
        /// First fatal error hit inside the event loop
        error: Option<anyhow::Error>,
    }

    impl App {
        fn new(settings: Settings, game: Game) -> Self {
            Self {
                input: game.input_sender(),
                button: ButtonLatch::default(),
                settings,
                game,
                window: None,
                presenter: None,
                started: Instant::now(),
                last_frame_time: None,
                error: None,
            }
        }

        fn init_window(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
            let size = self.settings.window_size();
            let window_attrs = Window::default_attributes()
                .with_title("Flappy")
                .with_inner_size(LogicalSize::new(size, size));

            let window = Arc::new(
                event_loop
                    .create_window(window_attrs)
                    .context("failed to create window")?,
            );

            let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
            let surface = instance
                .create_surface(window.clone())
                .context("failed to create surface")?;
            let adapter = pollster::block_on(instance.request_adapter(
                &wgpu::RequestAdapterOptions {
                    power_preference: wgpu::PowerPreference::HighPerformance,
                    compatible_surface: Some(&surface),
                    force_fallback_adapter: false,
                },
            ))
            .context("no suitable GPU adapter found")?;
            log::info!("Using adapter: {:?}", adapter.get_info().name);

            let inner = window.inner_size();
            let presenter = pollster::block_on(FramePresenter::new(
                surface,
                &adapter,
                inner.width,
                inner.height,
                FIELD_SIZE,
                self.settings.vsync,
            ))
            .context("failed to set up GPU presentation")?;

            self.window = Some(window);
            self.presenter = Some(presenter);
            self.last_frame_time = Some(Instant::now());
            log::info!("Window and presenter initialized");
            Ok(())
        }

        fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
            log::error!("{:#}", error);
            if self.error.is_none() {
                self.error = Some(error);
            }
            event_loop.exit();
        }

        fn send(&mut self, state: ElementState) {
            let event = match state {
                ElementState::Pressed => Some(self.button.press()),
                ElementState::Released => self.button.release(),
            };
            if let Some(event) = event {
                self.input.send(event);
            }
        }

        fn release_held_button(&mut self) {
            if let Some(event) = self.button.cancel() {
                self.input.send(event);
            }
        }

        /// When the next tick is due, measured from the last frame
        fn next_tick_at(&self) -> Option<Instant> {
            self.last_frame_time.map(|last| last + self.game.until_next_tick())
        }

        fn redraw(&mut self, event_loop: &ActiveEventLoop) {
            let now = Instant::now();
            let delta_time = match self.last_frame_time {
                Some(last) => now.duration_since(last).as_secs_f32(),
                None => SIM_DT,
            };
            self.last_frame_time = Some(now);

            self.game.advance(delta_time);
            let frame = self
                .game
                .render(now.duration_since(self.started).as_secs_f64());

            if let Some(presenter) = &mut self.presenter {
                if !presenter.present_or_recover(frame) {
                    event_loop.exit();
                }
            }
        }
    }

    impl ApplicationHandler for App {
        fn resumed(&mut self, event_loop: &ActiveEventLoop) {
            if self.window.is_none() {
                if let Err(e) = self.init_window(event_loop) {
                    self.fail(event_loop, e);
                    return;
                }
            }
            if let Some(window) = &self.window {
                window.request_redraw();
            }
        }

        fn new_events(&mut self, _event_loop: &ActiveEventLoop, _cause: StartCause) {
            // Input can wake the loop early; only redraw once a tick is due
            let due = self.next_tick_at().is_some_and(|at| at <= Instant::now());
            if due {
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
        }

        fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
            // Sleep until the next tick instead of redrawing continuously
            match self.next_tick_at() {
                Some(deadline) => event_loop.set_control_flow(ControlFlow::WaitUntil(deadline)),
                None => event_loop.set_control_flow(ControlFlow::Wait),
            }
        }

        fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
            match event {
                WindowEvent::CloseRequested => {
                    log::info!("Close requested, exiting");
                    event_loop.exit();
                }

                WindowEvent::Resized(new_size) => {
                    if let Some(presenter) = &mut self.presenter {
                        presenter.resize(new_size.width, new_size.height);
                    }
                }

                WindowEvent::MouseInput {
                    state,
                    button: MouseButton::Left,
                    ..
                } => self.send(state),

                // The release may happen where this window cannot see it
                WindowEvent::CursorLeft { .. } | WindowEvent::Focused(false) => {
                    self.release_held_button()
                }

                WindowEvent::Touch(touch) => match touch.phase {
                    TouchPhase::Started => self.send(ElementState::Pressed),
                    TouchPhase::Ended | TouchPhase::Cancelled => self.send(ElementState::Released),
                    TouchPhase::Moved => {}
                },

                WindowEvent::KeyboardInput {
                    event:
                        KeyEvent {
                            logical_key,
                            state,
                            repeat,
                            ..
                        },
                    ..
                } => match logical_key {
                    Key::Named(NamedKey::Escape) if state == ElementState::Pressed => {
                        log::info!("Escape pressed, exiting");
                        event_loop.exit();
                    }
                    Key::Named(NamedKey::Space) if !repeat => self.send(state),
                    _ => {}
                },

                WindowEvent::RedrawRequested => self.redraw(event_loop),

                _ => {}
            }
        }
    }

    fn clock_seed() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default()
    }

    pub fn run() -> Result<()> {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
        log::info!("Flappy (native) starting...");

        let settings_path = std::env::args()
            .nth(1)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(Settings::FILE_NAME));
        let settings = Settings::load_from(&settings_path);

        let assets = Assets::load_dir(&settings.asset_dir).with_context(|| {
            format!("failed to load sprites from {}", settings.asset_dir.display())
        })?;

        let seed = settings.seed.unwrap_or_else(clock_seed);
        let game = Game::new(&assets, &settings, seed);

        let event_loop = EventLoop::new().context("failed to create event loop")?;
        let mut app = App::new(settings, game);
        event_loop.run_app(&mut app).context("event loop failed")?;

        match app.error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, PointerEvent, Response};

    use flappy::assets::{AssetError, AssetName};
    use flappy::consts::{FIELD_SIZE, SIM_DT};
    use flappy::platform::ButtonLatch;
    use flappy::renderer::FramePresenter;
    use flappy::sim::InputSender;
    use flappy::{Assets, Game, Settings};

    struct App {
        game: Game,
        presenter: FramePresenter,
        last_time: f64,
        running: bool,
    }

    fn js_err(e: impl std::fmt::Display) -> JsValue {
        JsValue::from_str(&e.to_string())
    }

    /// Fetch all six sprites, then decode them
    async fn fetch_assets(settings: &Settings) -> Result<Assets, JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let mut encoded = HashMap::new();

        for name in AssetName::ALL {
            let url = settings.asset_dir.join(name.file_name());
            let url = url.to_string_lossy();
            let response: Response = JsFuture::from(window.fetch_with_str(&url))
                .await?
                .dyn_into()?;
            if !response.ok() {
                return Err(js_err(format!("{} returned {}", url, response.status())));
            }
            let buffer = JsFuture::from(response.array_buffer()?).await?;
            encoded.insert(name, js_sys::Uint8Array::new(&buffer).to_vec());
        }

        Assets::from_encoded(|name| encoded.remove(&name).ok_or(AssetError::Missing(name)))
            .map_err(js_err)
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).map_err(js_err)?;

        log::info!("Flappy starting...");

        let settings = Settings::load();
        // Rewrite so the stored copy picks up any newly added fields
        settings.save();

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let assets = fetch_assets(&settings).await?;

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let seed = settings.seed.unwrap_or_else(|| js_sys::Date::now() as u64);
        let game = Game::new(&assets, &settings, seed);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(js_err)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(js_err)?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let presenter = FramePresenter::new(
            surface,
            &adapter,
            width,
            height,
            FIELD_SIZE,
            settings.vsync,
        )
        .await
        .map_err(js_err)?;

        setup_input_handlers(&canvas, game.input_sender());

        let app = Rc::new(RefCell::new(App {
            game,
            presenter,
            last_time: 0.0,
            running: true,
        }));
        request_animation_frame(app);

        log::info!("Flappy running!");
        Ok(())
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, input: InputSender) {
        // Pointer events cover mouse, pen and touch
        {
            let input = input.clone();
            let target = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                if event.button() == 0 {
                    event.prevent_default();
                    // Keep receiving pointerup if the pointer leaves the canvas
                    let _ = target.set_pointer_capture(event.pointer_id());
                    input.send(InputEvent::Press);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let input = input.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                if event.button() == 0 {
                    input.send(InputEvent::Release);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("pointerup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let input = input.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_: PointerEvent| {
                input.send(InputEvent::Release);
            });
            let _ = canvas
                .add_event_listener_with_callback("pointercancel", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        for (kind, event) in [("keydown", InputEvent::Press), ("keyup", InputEvent::Release)] {
            let input = input.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |key: KeyboardEvent| {
                if key.code() == "Space" && !key.repeat() {
                    key.prevent_default();
                    input.send(event);
                }
            });
            let _ = document.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        {
            let mut a = app.borrow_mut();
            let a = &mut *a;

            // Calculate delta time
            let dt = if a.last_time > 0.0 {
                ((time - a.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            a.last_time = time;

            a.game.advance(dt);
            let frame = a.game.render(time / 1000.0);
            a.running = a.presenter.present_or_recover(frame);
        }

        if app.borrow().running {
            request_animation_frame(app);
        } else {
            log::error!("Presentation failed, stopping the loop");
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_game::run().await {
        log::error!("Startup failed: {:?}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
