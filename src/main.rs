//! Invaders entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::HtmlCanvasElement;

    use invaders::audio::AudioManager;
    use invaders::renderer::{Palette, RenderState};
    use invaders::sim::{Arena, Entity, Outcome, Simulation};
    use invaders::{Cue, Game, Keyboard, Presenter, Settings, Tuning};

    /// Draws through WebGPU, announces through the DOM, plays Web Audio cues
    struct WebPresenter {
        render_state: RenderState,
        audio: AudioManager,
    }

    impl Presenter for WebPresenter {
        fn present(&mut self, entities: &[Entity]) {
            match self.render_state.render_entities(entities) {
                Ok(_) => {}
                Err(wgpu::SurfaceError::Lost) => {
                    let (w, h) = self.render_state.size;
                    self.render_state.resize(w, h);
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
        }

        fn announce(&mut self, outcome: Outcome) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            if let Some(el) = document.get_element_by_id("outcome") {
                el.set_text_content(Some(outcome.message()));
                let _ = el.set_attribute("class", "");
            }
        }

        fn play(&mut self, cue: Cue) {
            self.audio.play(cue);
        }
    }

    type WebGame = Game<WebPresenter>;

    /// Tuning overrides from an inline `<script id="tuning" type="application/json">`
    fn load_tuning(document: &web_sys::Document) -> Tuning {
        let Some(json) = document
            .get_element_by_id("tuning")
            .and_then(|el| el.text_content())
        else {
            return Tuning::default();
        };
        match Tuning::from_json(&json) {
            Ok(tuning) => {
                log::info!("Loaded tuning overrides");
                tuning
            }
            Err(e) => {
                log::warn!("Ignoring invalid tuning: {}", e);
                Tuning::default()
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Invaders starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        // The canvas' own size is the arena
        let width = canvas.width();
        let height = canvas.height();
        let arena = if width > 0 && height > 0 {
            Arena::new(width as f32, height as f32)
        } else {
            Arena::default()
        };

        let settings = Settings::load();
        let tuning = load_tuning(&document);

        let keyboard = Keyboard::new();
        setup_keyboard(&keyboard);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
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

        let render_state = RenderState::new(
            surface,
            &adapter,
            width.max(1),
            height.max(1),
            arena,
            Palette::from_settings(&settings),
        )
        .await;
        let audio = AudioManager::new(&settings);

        // Renderer and audio are ready; nothing below waits
        let seed = js_sys::Date::now() as u64;
        let sim = Simulation::new(arena, tuning, seed, keyboard);
        let game = Rc::new(RefCell::new(Game::new(
            sim,
            WebPresenter {
                render_state,
                audio,
            },
        )));

        log::info!("Game initialized with seed: {}", game.borrow().sim().seed());

        if settings.mute_on_blur {
            setup_focus_audio(game.clone());
        }

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        request_animation_frame(game);

        log::info!("Invaders running!");
    }

    /// Map by `key`, falling back to the legacy `keyCode` for older browsers
    fn handle_key_event(keyboard: &Keyboard, event: &web_sys::KeyboardEvent, down: bool) -> bool {
        keyboard.handle_key(&event.key(), down) || keyboard.handle_code(event.key_code(), down)
    }

    fn setup_keyboard(keyboard: &Keyboard) {
        let window = web_sys::window().unwrap();

        // Key down
        {
            let keyboard = keyboard.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                if handle_key_event(&keyboard, &event, true) {
                    // Keep arrows and space from scrolling the page
                    event.prevent_default();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up
        {
            let keyboard = keyboard.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                handle_key_event(&keyboard, &event, false);
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Window blur: keyup never arrives, so drop everything
        {
            let keyboard = keyboard.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                keyboard.clear();
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Silence cues while the page is in the background
    fn setup_focus_audio(game: Rc<RefCell<WebGame>>) {
        let window = web_sys::window().unwrap();

        for (event_name, focused) in [("blur", false), ("focus", true)] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                // The frame loop may hold the borrow; skip rather than panic
                if let Ok(mut game) = game.try_borrow_mut() {
                    game.set_muted(!focused);
                    let audio = &mut game.presenter_mut().audio;
                    if focused {
                        audio.resume();
                    } else {
                        audio.suspend();
                    }
                }
            });
            let _ = window
                .add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<WebGame>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |_time: f64| {
            game_loop(game);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<WebGame>>) {
        let keep_going = game.borrow_mut().frame();
        if keep_going {
            request_animation_frame(game);
        } else {
            log::info!("Session over after {} frames", game.borrow().frames());
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use invaders::consts::MAX_HEADLESS_FRAMES;
    use invaders::game::LogPresenter;
    use invaders::sim::{Arena, Simulation};
    use invaders::{Game, Keyboard};

    env_logger::init();
    log::info!("Invaders (native) starting...");
    log::info!("Native mode runs headless with a scripted pilot - use `trunk serve` to play");

    let tuning = native::load_tuning(std::env::args().nth(1));
    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default();

    let keyboard = Keyboard::new();
    let sim = Simulation::new(Arena::default(), tuning, seed, keyboard.clone());
    let mut game = Game::new(sim, LogPresenter::default());
    let arena = game.sim().arena();
    log::info!(
        "Game initialized with seed {} in a {}x{} arena",
        game.sim().seed(),
        arena.width,
        arena.height
    );

    for frame in 0..MAX_HEADLESS_FRAMES {
        native::autopilot(&keyboard, game.sim(), frame);
        if !game.frame() {
            break;
        }
    }

    match game.sim().outcome() {
        Some(outcome) => println!("{} ({} ticks)", outcome.message(), game.sim().ticks()),
        None => log::warn!("No result after {} frames", game.frames()),
    }
    if log::log_enabled!(log::Level::Debug) {
        match game.sim().snapshot_json() {
            Ok(json) => log::debug!("Final entities: {}", json),
            Err(e) => log::warn!("Could not serialize final state: {}", e),
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use invaders::sim::Simulation;
    use invaders::{Key, Keyboard, Tuning};

    /// Tuning from a JSON file path, falling back to defaults
    pub fn load_tuning(path: Option<String>) -> Tuning {
        let Some(path) = path else {
            return Tuning::default();
        };
        let json = match std::fs::read_to_string(&path) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Cannot read tuning {}: {} - using defaults", path, e);
                return Tuning::default();
            }
        };
        match Tuning::from_json(&json) {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path);
                tuning
            }
            Err(e) => {
                log::warn!("Invalid tuning {}: {} - using defaults", path, e);
                Tuning::default()
            }
        }
    }

    /// Steer under the nearest adversary and tap fire
    pub fn autopilot(keyboard: &Keyboard, sim: &Simulation, frame: u64) {
        let Some(player) = sim.player() else {
            return;
        };
        let px = player.center.x;
        let target = sim
            .adversaries()
            .map(|a| a.center.x)
            .min_by(|a, b| (a - px).abs().total_cmp(&(b - px).abs()));
        let dx = target.map(|x| x - px).unwrap_or(0.0);
        // Within one step counts as lined up
        let deadzone = sim.tuning().player_step;

        keyboard.set(Key::Left, dx < -deadzone);
        keyboard.set(Key::Right, dx > deadzone);
        keyboard.set(Key::Fire, frame % 12 < 6);
    }
}
