//! Aim Trainer entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, KeyboardEvent, MouseEvent, PageTransitionEvent};

    use aim_trainer::audio::AudioManager;
    use aim_trainer::shell::{format_score, format_time};
    use aim_trainer::{Screen, Settings, Shell};

    /// Game instance holding all state
    struct Game {
        shell: Shell,
        last_time: f64,
        /// Id of the target element currently in the DOM
        rendered_target: Option<u64>,
        last_screen: Option<Screen>,
    }

    impl Game {
        fn new(seed: u64) -> Self {
            let settings = Settings::load();
            Self {
                shell: Shell::new(seed, settings, AudioManager::new()),
                last_time: 0.0,
                rendered_target: None,
                last_screen: None,
            }
        }

        /// Advance the session by the time since the last frame
        fn update(&mut self, time: f64) {
            let dt_ms = if self.last_time > 0.0 {
                (time - self.last_time).max(0.0)
            } else {
                0.0
            };
            self.last_time = time;
            self.shell.frame(Duration::from_secs_f64(dt_ms / 1000.0));
        }

        /// Sync the DOM with the current snapshot
        fn render(&mut self, document: &Document) {
            let screen = self.shell.screen();
            let snap = self.shell.snapshot();

            if self.last_screen != Some(screen) {
                set_visible(document, "start-screen", screen == Screen::Start);
                set_visible(document, "hud", screen == Screen::Playing);
                set_visible(
                    document,
                    "game-over",
                    matches!(screen, Screen::GameOver { .. }),
                );
                if let Screen::GameOver { score } = screen {
                    if let Some(el) = document.get_element_by_id("final-score") {
                        el.set_text_content(Some(&score.to_string()));
                    }
                }
                self.last_screen = Some(screen);
            }

            if let Some(el) = document.query_selector("#hud-score").ok().flatten() {
                el.set_text_content(Some(&format_score(snap.score)));
            }
            if let Some(el) = document.query_selector("#hud-time").ok().flatten() {
                el.set_text_content(Some(&format_time(snap.time_left)));
            }

            if let Some(area) = document.get_element_by_id("play-area") {
                let mut class = String::from("play-area");
                if self.shell.is_shaking() {
                    class.push_str(" shaking");
                }
                if !self.shell.settings().system_cursor {
                    class.push_str(" crosshair");
                }
                let _ = area.set_attribute("class", &class);
            }

            self.render_target(document, &snap);
        }

        /// One element per target id, so the fade animation restarts cleanly
        fn render_target(&mut self, document: &Document, snap: &aim_trainer::sim::SessionSnapshot) {
            let Some(layer) = document.get_element_by_id("target-layer") else {
                return;
            };

            let wanted = snap.current_target.map(|t| t.id());
            if wanted != self.rendered_target {
                layer.set_inner_html("");
                if let Some(target) = snap.current_target {
                    if let Some(el) = create_target_element(document, &target) {
                        let _ = layer.append_child(&el);
                    }
                }
                self.rendered_target = wanted;
            }

            if let Some(el) = layer.first_element_child() {
                let class = if snap.target_hit { "target hit" } else { "target" };
                let _ = el.set_attribute("class", class);
            }
        }
    }

    fn create_target_element(document: &Document, target: &aim_trainer::sim::Target) -> Option<Element> {
        let el = document.create_element("div").ok()?;
        el.set_attribute("class", "target").ok()?;
        let pos = target.pos();
        let style = format!(
            "left: {}%; top: {}%; width: {}px; height: {}px;",
            pos.x,
            pos.y,
            target.size(),
            target.size()
        );
        el.set_attribute("style", &style).ok()?;
        el.set_inner_html(r#"<div class="ring outer"><div class="ring middle"><div class="ring bullseye"></div></div></div>"#);
        Some(el)
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Aim Trainer starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed)));
        log::info!("Game initialized with seed: {}", seed);

        setup_input_handlers(&document, game.clone());
        setup_buttons(&document, game.clone());
        setup_teardown(game.clone());

        request_animation_frame(game);

        log::info!("Aim Trainer running!");
    }

    fn setup_input_handlers(document: &Document, game: Rc<RefCell<Game>>) {
        let Some(area) = document.get_element_by_id("play-area") else {
            log::error!("No #play-area element");
            return;
        };

        // Mouse down on the play area: hit test decides target vs background
        {
            let game = game.clone();
            let area_clone = area.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                if g.shell.screen() != Screen::Playing {
                    return;
                }
                event.prevent_default();

                let rect = area_clone.get_bounding_client_rect();
                g.shell.resize(rect.width() as f32, rect.height() as f32);
                let point = Vec2::new(
                    event.client_x() as f32 - rect.left() as f32,
                    event.client_y() as f32 - rect.top() as f32,
                );
                let outcome = g.shell.pointer_down(point);
                log::debug!("Pointer down at {point:?}: {outcome:?}");
            });
            let _ = area
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // No context menu over the play area
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                event.prevent_default();
            });
            let _ = area
                .add_event_listener_with_callback("contextmenu", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard: Enter/Space start from the start and game-over screens,
        // M toggles mute, S toggles screen shake
        {
            let window = web_sys::window().unwrap();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    " " | "Enter" if g.shell.screen() != Screen::Playing => {
                        event.prevent_default();
                        g.shell.start();
                    }
                    "m" | "M" => g.shell.toggle_mute(),
                    "s" | "S" => g.shell.toggle_screen_shake(),
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        for id in ["start-btn", "restart-btn"] {
            let Some(btn) = document.get_element_by_id(id) else {
                continue;
            };
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().shell.start();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// `pagehide` releases audio and stops the loop. A page restored from
    /// the back/forward cache gets `pageshow` with `persisted` set and picks
    /// up where it left off.
    fn setup_teardown(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().shell.teardown();
            });
            let _ = window
                .add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PageTransitionEvent| {
                if !event.persisted() {
                    return;
                }
                {
                    let mut g = game.borrow_mut();
                    if !g.shell.is_torn_down() {
                        return;
                    }
                    g.shell.remount(AudioManager::new());
                    g.last_time = 0.0;
                    g.last_screen = None;
                    g.rendered_target = None;
                }
                request_animation_frame(game.clone());
            });
            let _ = window
                .add_event_listener_with_callback("pageshow", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            if g.shell.is_torn_down() {
                return;
            }
            g.update(time);
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                g.render(&document);
            }
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Aim Trainer (native) starting...");
    log::info!("Native mode has no window - run with `trunk serve` for the web version");

    println!("\nRunning headless demo round...");
    demo_round();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Play one round with a scripted player: reacts to each target after a
/// fixed delay and fumbles every fifth shot.
#[cfg(not(target_arch = "wasm32"))]
fn demo_round() {
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    use aim_trainer::audio::AudioManager;
    use aim_trainer::shell::PointerOutcome;
    use aim_trainer::{Screen, Settings, Shell};
    use glam::Vec2;

    const FRAME: Duration = Duration::from_millis(16);
    const REACTION: Duration = Duration::from_millis(400);

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    let mut shell = Shell::new(seed, Settings::default(), AudioManager::new());
    shell.resize(1280.0, 720.0);
    shell.start();

    let mut waited = Duration::ZERO;
    let mut last_target = None;
    let mut shots = 0u32;
    let mut misses = 0u32;

    while shell.screen() == Screen::Playing {
        shell.frame(FRAME);
        let snap = shell.snapshot();
        let Some(target) = snap.current_target else {
            continue;
        };

        if last_target != Some(target.id()) {
            last_target = Some(target.id());
            waited = Duration::ZERO;
        }
        waited += FRAME;
        if waited < REACTION || snap.target_hit {
            continue;
        }

        shots += 1;
        let mut aim = target.center_px(shell.play_area());
        if shots % 5 == 0 {
            aim += Vec2::new(target.size() as f32 * 2.0, 0.0);
        }
        if shell.pointer_down(aim) == PointerOutcome::Miss {
            misses += 1;
            waited = Duration::ZERO;
        }
    }

    let score = shell.snapshot().score;
    shell.teardown();
    println!("✓ Demo round over: score {score}, {shots} shots, {misses} misses");
}
