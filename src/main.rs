//! Breakout entry point
//!
//! On the web this runs the game loop; natively it plays headless games with
//! the autopilot.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use breakout::audio::{self, AudioManager, Mix};
    use breakout::consts::*;
    use breakout::persistence::{LocalStorage, MemoryStorage, Storage};
    use breakout::platform::InputLatch;
    use breakout::platform::input::Key;
    use breakout::renderer::{RenderState, Viewport, scene};
    use breakout::sim::{ControlScheme, GamePhase, GameState, tick};
    use breakout::{HighScore, Settings};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        render_state: Option<RenderState>,
        audio: AudioManager,
        storage: Box<dyn Storage>,
        settings: Settings,
        high_score: HighScore,
        latch: InputLatch,
        accumulator: f32,
        last_time: f64,
        last_phase: GamePhase,
        /// Canvas size in CSS pixels, for pointer mapping
        css_size: Vec2,
        /// Frame loop suspended while the tab is hidden
        suspended: bool,
    }

    impl Game {
        fn new(seed: u64) -> Self {
            let storage: Box<dyn Storage> = match LocalStorage::open() {
                Ok(storage) => Box::new(storage),
                Err(e) => {
                    log::warn!("{}; progress will not be saved", e);
                    Box::new(MemoryStorage::new())
                }
            };
            let settings = Settings::load(storage.as_ref());
            let high_score = HighScore::load(storage.as_ref());

            Self {
                state: GameState::new(seed),
                render_state: None,
                audio: AudioManager::new(Mix::from_settings(&settings)),
                storage,
                settings,
                high_score,
                latch: InputLatch::new(),
                accumulator: 0.0,
                last_time: 0.0,
                last_phase: GamePhase::Menu,
                css_size: Vec2::new(FIELD_WIDTH, FIELD_HEIGHT),
                suspended: false,
            }
        }

        /// Map a position in CSS pixels relative to the canvas to the field
        fn to_field(&self, x: f32, y: f32) -> Vec2 {
            let field = Vec2::new(self.state.tuning.field_width, self.state.tuning.field_height);
            Viewport::new(self.css_size.x, self.css_size.y, field).canvas_to_field(Vec2::new(x, y))
        }

        /// Switch control scheme to whatever device the player last used
        fn use_scheme(&mut self, scheme: ControlScheme) {
            if self.settings.control_scheme != scheme {
                log::info!("Control scheme: {}", scheme.as_str());
                self.settings.control_scheme = scheme;
                self.settings.save(self.storage.as_mut());
            }
        }

        fn toggle_mute(&mut self) {
            self.settings.muted = !self.settings.muted;
            self.audio.set_muted(self.settings.muted);
            self.settings.save(self.storage.as_mut());
            log::info!("Muted: {}", self.settings.muted);
        }

        fn poll_gamepad(&mut self) {
            let Some(window) = web_sys::window() else {
                return;
            };
            let Ok(pads) = window.navigator().get_gamepads() else {
                return;
            };
            for pad in pads.iter() {
                let Ok(pad) = pad.dyn_into::<web_sys::Gamepad>() else {
                    continue;
                };
                let axis = pad.axes().get(0).as_f64().unwrap_or(0.0) as f32;
                let pressed = pad
                    .buttons()
                    .get(0)
                    .dyn_into::<web_sys::GamepadButton>()
                    .map(|b| b.pressed())
                    .unwrap_or(false);
                let dead_zone = self.settings.gamepad_dead_zone;
                if axis.abs() >= dead_zone {
                    self.use_scheme(ControlScheme::Incremental);
                }
                self.latch.set_gamepad(axis, pressed, dead_zone);
                return;
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32) {
            let dt = dt.min(0.1);
            self.accumulator += dt;
            self.poll_gamepad();

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = self.latch.sample(self.settings.control_scheme);
                let events = tick(&mut self.state, &input);
                for effect in audio::cues(&events) {
                    self.audio.play(effect);
                }
                if self.high_score.submit(self.state.score, self.storage.as_mut()) {
                    log::debug!("New high score {}", self.high_score.best());
                }
                self.accumulator -= SIM_DT;
                substeps += 1;
            }
            // Drop the backlog rather than fast-forwarding after a stall
            if substeps == MAX_SUBSTEPS {
                self.accumulator = self.accumulator.min(SIM_DT);
            }

            if self.state.phase != self.last_phase {
                log::info!("Phase {:?} -> {:?}", self.last_phase, self.state.phase);
                self.last_phase = self.state.phase;
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            let vertices = scene::build(&self.state);
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&vertices) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        let (w, h) = (render_state.config.width, render_state.config.height);
                        render_state.resize(w, h);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self, document: &Document) {
            let phase = self.state.phase;
            let in_game = phase != GamePhase::Menu;

            set_text(document, "#hud-score .hud-value", &self.state.score.to_string());
            set_text(document, "#hud-high .hud-value", &self.high_score.best().to_string());
            set_text(document, "#hud-lives .hud-value", &self.state.lives.to_string());

            set_visible(document, "hud", in_game);
            set_visible(document, "title", phase == GamePhase::Menu);
            set_visible(document, "game-over", phase == GamePhase::GameOver);
            set_visible(document, "win", phase == GamePhase::Win);
            set_visible(document, "autopilot", self.latch.autopilot());
        }
    }

    fn set_text(document: &Document, selector: &str, text: &str) {
        if let Some(el) = document.query_selector(selector).ok().flatten() {
            if el.text_content().as_deref() != Some(text) {
                el.set_text_content(Some(text));
            }
        }
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.class_list().toggle_with_force("hidden", !visible);
        }
    }

    /// Size the canvas backing store to its CSS size times the pixel ratio
    fn fit_canvas(canvas: &HtmlCanvasElement) -> (u32, u32, Vec2) {
        let dpr = web_sys::window()
            .map(|w| w.device_pixel_ratio())
            .unwrap_or(1.0);
        let client_w = canvas.client_width().max(1);
        let client_h = canvas.client_height().max(1);
        let width = (client_w as f64 * dpr) as u32;
        let height = (client_h as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);
        (width, height, Vec2::new(client_w as f32, client_h as f32))
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Breakout starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        set_visible(&document, "loading", false);

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let (width, height, css_size) = fit_canvas(&canvas);

        // Initialize game
        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed)));
        game.borrow_mut().css_size = css_size;

        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let field = {
            let g = game.borrow();
            Vec2::new(g.state.tuning.field_width, g.state.tuning.field_height)
        };
        match RenderState::new(surface, &adapter, width, height, field).await {
            Ok(render_state) => game.borrow_mut().render_state = Some(render_state),
            Err(e) => log::error!("Failed to create device: {}", e),
        }

        setup_input_handlers(&canvas, game.clone());
        setup_resize(&canvas, game.clone());
        setup_auto_pause(game.clone());

        // Start game loop
        request_animation_frame(game);

        log::info!("Breakout running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");

        // Mouse move - absolute paddle position
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                let p = g.to_field(event.offset_x() as f32, event.offset_y() as f32);
                g.use_scheme(ControlScheme::Absolute);
                g.latch.pointer_moved(p.x);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse leave
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().latch.pointer_left();
            });
            let _ = canvas
                .add_event_listener_with_callback("mouseleave", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Click - start / restart, and unlock audio
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.audio.resume();
                g.latch.click();
            });
            let _ = canvas
                .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch move / start
        for (name, starts) in [("touchmove", false), ("touchstart", true)] {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let mut g = game.borrow_mut();
                if starts {
                    g.audio.resume();
                    g.latch.click();
                }
                if let Some(touch) = event.touches().get(0) {
                    let rect = canvas_clone.get_bounding_client_rect();
                    let x = touch.client_x() as f32 - rect.left() as f32;
                    let y = touch.client_y() as f32 - rect.top() as f32;
                    let p = g.to_field(x, y);
                    g.use_scheme(ControlScheme::Absolute);
                    g.latch.pointer_moved(p.x);
                }
            });
            let _ = canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                let key = event.key();
                if key == "m" || key == "M" {
                    g.toggle_mute();
                    return;
                }
                let Some(key) = Key::from_dom(&key) else {
                    return;
                };
                if matches!(key, Key::Left | Key::Right) {
                    g.use_scheme(ControlScheme::Incremental);
                }
                if key == Key::Start {
                    g.audio.resume();
                }
                if g.latch.key_down(key) {
                    event.prevent_default();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(key) = Key::from_dom(&event.key()) {
                    game.borrow_mut().latch.key_up(key);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let canvas = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let (width, height, css_size) = fit_canvas(&canvas);
            let mut g = game.borrow_mut();
            g.css_size = css_size;
            if let Some(ref mut render_state) = g.render_state {
                render_state.resize(width, height);
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            if g.suspended {
                // Resumed by the visibility handler
                return;
            }

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt);
            g.render();
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                g.update_hud(&document);
            }
        }

        request_animation_frame(game);
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Visibility change (tab switch, minimize): stop and restart the frame loop
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let hidden = document_clone.visibility_state() == web_sys::VisibilityState::Hidden;
                let resume = {
                    let mut g = game.borrow_mut();
                    if hidden && !g.suspended {
                        g.suspended = true;
                        g.latch.release_all();
                        log::info!("Frame loop suspended (tab hidden)");
                        false
                    } else if !hidden && g.suspended {
                        g.suspended = false;
                        g.last_time = 0.0;
                        g.accumulator = 0.0;
                        log::info!("Frame loop resumed");
                        true
                    } else {
                        false
                    }
                };
                if resume {
                    request_animation_frame(game.clone());
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside): drop held keys, optionally mute
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                g.latch.release_all();
                if g.settings.mute_on_blur {
                    g.audio.set_muted(true);
                }
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Window focus: restore the saved mute preference
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                let muted = g.settings.muted;
                g.audio.set_muted(muted);
            });
            let _ = window.add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::{Path, PathBuf};
    use std::time::{SystemTime, UNIX_EPOCH};

    use clap::Parser;

    use breakout::persistence::{FileStorage, MemoryStorage, Storage};
    use breakout::runner::{Outcome, play_autopilot_game};
    use breakout::sim::GameState;
    use breakout::{HighScore, Tuning};

    /// Headless breakout: plays games with the built-in autopilot
    #[derive(Parser, Debug)]
    #[command(name = "breakout", version, about)]
    pub struct Args {
        /// RNG seed (defaults to the current time)
        #[arg(long)]
        pub seed: Option<u64>,

        /// Number of games to play
        #[arg(long, default_value_t = 1)]
        pub games: u32,

        /// Frame budget per game
        #[arg(long, default_value_t = 100_000)]
        pub max_ticks: u64,

        /// Directory holding the saved high score
        #[arg(long, default_value = ".breakout")]
        pub data_dir: PathBuf,

        /// JSON file overriding any subset of the game tuning
        #[arg(long)]
        pub tuning: Option<PathBuf>,
    }

    fn load_tuning(path: &Path) -> Tuning {
        let parsed = std::fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|json| Tuning::from_json(&json).map_err(|e| e.to_string()));
        match parsed {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path.display());
                tuning
            }
            Err(e) => {
                log::warn!("Ignoring tuning file {}: {}", path.display(), e);
                Tuning::default()
            }
        }
    }

    pub fn run() {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
        let args = Args::parse();

        let seed = args.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0)
        });
        let tuning = args
            .tuning
            .as_deref()
            .map(load_tuning)
            .unwrap_or_default();

        let mut storage: Box<dyn Storage> = match FileStorage::open(&args.data_dir) {
            Ok(storage) => {
                log::info!("Saving to {}", storage.dir().display());
                Box::new(storage)
            }
            Err(e) => {
                log::warn!("{}; high score will not be saved", e);
                Box::new(MemoryStorage::new())
            }
        };
        let mut high_score = HighScore::load(storage.as_ref());

        log::info!("Breakout (native) starting with seed {}", seed);
        let mut state = GameState::with_tuning(seed, tuning);

        let (mut won, mut lost, mut timed_out) = (0u32, 0u32, 0u32);
        for _ in 0..args.games {
            let best_before = high_score.best();
            let summary = play_autopilot_game(&mut state, args.max_ticks, |state, events| {
                for event in events {
                    log::debug!("[{}] {:?}", state.time_ticks, event);
                }
                high_score.submit(state.score, storage.as_mut());
            });

            match summary.outcome {
                Outcome::Won => won += 1,
                Outcome::Lost => lost += 1,
                Outcome::TimedOut => timed_out += 1,
            }
            log::info!(
                "Game {}: {:?} with score {} ({} lives left, {} ticks)",
                summary.game,
                summary.outcome,
                summary.score,
                summary.lives_left,
                summary.ticks
            );
            if high_score.best() > best_before {
                log::info!("New high score: {}", high_score.best());
            }
        }

        log::info!(
            "Played {} games: {} won, {} lost, {} timed out. High score {}",
            args.games,
            won,
            lost,
            timed_out,
            high_score.best()
        );
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    native::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
