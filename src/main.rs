//! Catch Interference entry point
//!
//! Browser builds run the game loop against the DOM and WebGPU. Native builds
//! run a headless demo: an autopilot plays seeded runs and prints the results.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, MouseEvent, TouchEvent};

    use catch_interference::highscores::format_date;
    use catch_interference::persistence::LocalStore;
    use catch_interference::platform::{clock_seed, now_ms};
    use catch_interference::progression::{AVATARS, avatar};
    use catch_interference::renderer::{Scene, SdfRenderState, client_to_surface};
    use catch_interference::sim::GameStatus;
    use catch_interference::{
        Feedback, GameSession, Screen, Shell, ShellAction, Theme, format_play_time,
        format_survival_time,
    };

    /// Game instance holding all state
    struct Game {
        shell: Shell<Feedback, LocalStore>,
        render_state: Option<SdfRenderState>,
        /// Screen and status last reflected in the DOM
        shown: Option<(Screen, GameStatus)>,
    }

    impl Game {
        fn new(seed: u64) -> Self {
            let session = GameSession::new(Feedback::new(), LocalStore::new(), seed);
            Self {
                shell: Shell::new(session),
                render_state: None,
                shown: None,
            }
        }

        fn apply(&mut self, action: ShellAction) {
            // Browsers only allow audio after a user gesture
            self.shell.session().feedback().resume();
            if self.shell.apply(action, now_ms()) {
                self.refresh_screen();
            }
        }

        /// One display frame
        fn frame(&mut self, time: f64) {
            if let Some(outcome) = self.shell.session_mut().update(time, now_ms()) {
                log::info!("Run over after {}", format_survival_time(outcome.score));
            }
            self.render(time);
            self.update_hud();
            let now = (self.shell.screen(), self.shell.session().status());
            if self.shown != Some(now) {
                self.refresh_screen();
            }
        }

        /// Render the current frame
        fn render(&mut self, time: f64) {
            let scene = Scene::from_state(self.shell.session().state(), self.shell.settings().theme);
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&scene, time) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        fn resize(&mut self, width: u32, height: u32) {
            if let Some(ref mut render_state) = self.render_state {
                if render_state.size != (width, height) {
                    render_state.resize(width, height);
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = document() else {
                return;
            };
            let session = self.shell.session();
            set_text(&document, "hud-time", &format_survival_time(session.state().score));
            set_text(&document, "hud-taps", &session.taps().to_string());
            set_text(&document, "hud-level", &session.player().level.to_string());
        }

        /// Show the active screen and overlays, and fill in their contents
        fn refresh_screen(&mut self) {
            let Some(document) = document() else {
                return;
            };
            let screen = self.shell.screen();
            let status = self.shell.session().status();
            self.shown = Some((screen, status));

            for (id, s) in [
                ("menu", Screen::Menu),
                ("game", Screen::Game),
                ("profile", Screen::Profile),
                ("leaderboard", Screen::Leaderboard),
                ("settings", Screen::Settings),
            ] {
                set_hidden(&document, id, screen != s);
            }
            set_hidden(&document, "pause-menu", status != GameStatus::Paused);
            set_hidden(&document, "game-over", status != GameStatus::GameOver);

            match screen {
                Screen::Menu => self.fill_menu(&document),
                Screen::Game if status == GameStatus::GameOver => self.fill_game_over(&document),
                Screen::Profile => self.fill_profile(&document),
                Screen::Leaderboard => self.fill_leaderboard(&document),
                Screen::Settings => self.fill_settings(&document),
                Screen::Game => {}
            }
        }

        fn fill_menu(&self, document: &Document) {
            let player = self.shell.session().player();
            set_text(document, "menu-avatar", avatar(player.avatar).emoji);
            set_text(document, "menu-name", &player.name);
            set_text(document, "menu-level", &player.level.to_string());
            set_text(document, "menu-best", &format_survival_time(player.best_score));
        }

        fn fill_game_over(&self, document: &Document) {
            let Some(outcome) = self.shell.session().last_outcome() else {
                return;
            };
            set_text(document, "final-score", &format_survival_time(outcome.score));
            set_text(document, "final-taps", &outcome.taps.to_string());
            set_text(document, "final-exp", &format!("+{}", outcome.exp_gained));
            set_hidden(document, "final-level-up", !outcome.leveled_up);
            set_hidden(document, "final-best", !outcome.new_best);
            let rank = outcome.rank.map(|r| format!("#{}", r)).unwrap_or_default();
            set_text(document, "final-rank", &rank);
            let unlocked: Vec<&str> = outcome.unlocked.iter().map(|id| id.name()).collect();
            set_text(document, "final-achievements", &unlocked.join(", "));
            set_hidden(document, "final-achievements", unlocked.is_empty());
        }

        fn fill_profile(&self, document: &Document) {
            let player = self.shell.session().player();
            set_text(document, "profile-avatar", avatar(player.avatar).emoji);
            set_text(document, "profile-name", &player.name);
            set_text(document, "profile-level", &player.level.to_string());
            set_text(
                document,
                "profile-exp",
                &format!("{} / {}", player.experience, player.experience_needed()),
            );
            if let Some(bar) = document.get_element_by_id("profile-exp-bar") {
                let width = player.experience_progress() * 100.0;
                let _ = bar.set_attribute("style", &format!("width: {:.0}%", width));
            }
            set_text(document, "profile-games", &player.games_played.to_string());
            set_text(document, "profile-best", &format_survival_time(player.best_score));
            set_text(document, "profile-time", &format_play_time(player.total_play_time));

            for a in AVATARS {
                if let Some(el) = document.get_element_by_id(&format!("avatar-{}", a.id)) {
                    let class = if a.id == player.avatar { "avatar selected" } else { "avatar" };
                    let _ = el.set_attribute("class", class);
                }
            }

            if let Some(list) = document.get_element_by_id("achievement-list") {
                let html: String = player
                    .achievements
                    .iter()
                    .map(|a| {
                        format!(
                            "<li class=\"{}\"><span class=\"icon\">{}</span><b>{}</b> {}</li>",
                            if a.unlocked { "unlocked" } else { "locked" },
                            a.id.icon(),
                            a.id.name(),
                            a.id.description()
                        )
                    })
                    .collect();
                list.set_inner_html(&html);
            }
        }

        fn fill_leaderboard(&mut self, document: &Document) {
            let Some(list) = document.get_element_by_id("leaderboard-list") else {
                return;
            };
            let board = self.shell.session_mut().leaderboard();
            if board.is_empty() {
                list.set_inner_html("<li class=\"empty\">No scores yet</li>");
                return;
            }
            let now = now_ms();
            let html: String = board
                .entries
                .iter()
                .enumerate()
                .map(|(i, e)| {
                    format!(
                        "<li><span class=\"rank\">#{}</span><span class=\"score\">{}</span>\
                         <span class=\"level\">Lv {}</span><span class=\"date\">{}</span></li>",
                        i + 1,
                        format_survival_time(e.score),
                        e.level,
                        format_date(e.date, now)
                    )
                })
                .collect();
            list.set_inner_html(&html);
        }

        fn fill_settings(&self, document: &Document) {
            let settings = self.shell.settings();
            let on_off = |on: bool| if on { "On" } else { "Off" };
            set_text(document, "sound-toggle", on_off(settings.sound));
            set_text(document, "vibration-toggle", on_off(settings.vibration));
            for theme in Theme::ALL {
                let id = format!("theme-{}", theme.as_str().to_lowercase());
                if let Some(el) = document.get_element_by_id(&id) {
                    let class = if theme == settings.theme { "theme selected" } else { "theme" };
                    let _ = el.set_attribute("class", class);
                }
            }
        }

        /// Pointer down at client coordinates over the canvas
        fn pointer(&mut self, canvas: &HtmlCanvasElement, client_x: f64, client_y: f64) {
            let rect = canvas.get_bounding_client_rect();
            let offset = glam::Vec2::new(
                (client_x - rect.left()) as f32,
                (client_y - rect.top()) as f32,
            );
            let size = glam::Vec2::new(rect.width() as f32, rect.height() as f32);
            if let Some(point) = client_to_surface(offset, size) {
                self.apply(ShellAction::TapAt(point));
            }
        }
    }

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            if el.text_content().as_deref() != Some(text) {
                el.set_text_content(Some(text));
            }
        }
    }

    fn set_hidden(document: &Document, id: &str, hidden: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if hidden { "hidden" } else { "" });
        }
    }

    /// Canvas size in device pixels
    fn canvas_pixels(canvas: &HtmlCanvasElement) -> (u32, u32) {
        let dpr = web_sys::window().map(|w| w.device_pixel_ratio()).unwrap_or(1.0);
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        (width.max(1), height.max(1))
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Catch Interference starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let (width, height) = canvas_pixels(&canvas);
        canvas.set_width(width);
        canvas.set_height(height);

        let seed = clock_seed();
        let game = Rc::new(RefCell::new(Game::new(seed)));
        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => {
                let adapter = instance
                    .request_adapter(&wgpu::RequestAdapterOptions {
                        power_preference: wgpu::PowerPreference::LowPower,
                        compatible_surface: Some(&surface),
                        force_fallback_adapter: false,
                    })
                    .await;
                match adapter {
                    Ok(adapter) => {
                        log::info!("Using adapter: {:?}", adapter.get_info().name);
                        match SdfRenderState::new(surface, &adapter, width, height).await {
                            Ok(render_state) => game.borrow_mut().render_state = Some(render_state),
                            Err(e) => log::error!("Failed to create device: {:?}", e),
                        }
                    }
                    Err(e) => log::error!("No graphics adapter: {:?}", e),
                }
            }
            Err(e) => log::error!("Failed to create surface: {:?}", e),
        }

        setup_input_handlers(&canvas, game.clone());
        setup_buttons(game.clone());
        setup_auto_pause(game.clone());

        game.borrow_mut().refresh_screen();
        request_animation_frame(game, canvas);

        log::info!("Catch Interference running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Mouse down - tap the box
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                game.borrow_mut().pointer(
                    &canvas_clone,
                    event.client_x() as f64,
                    event.client_y() as f64,
                );
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start - tap the box without the synthetic mouse event
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.changed_touches().get(0) {
                    game.borrow_mut().pointer(
                        &canvas_clone,
                        touch.client_x() as f64,
                        touch.client_y() as f64,
                    );
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        if let Some(window) = web_sys::window() {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                let screen = g.shell.screen();
                let status = g.shell.session().status();
                let action = match (event.key().as_str(), screen, status) {
                    (" " | "Enter", Screen::Menu, _) => Some(ShellAction::Play),
                    (" " | "Enter", Screen::Game, GameStatus::GameOver) => {
                        Some(ShellAction::Restart)
                    }
                    ("Escape", Screen::Game, GameStatus::Playing) => Some(ShellAction::Pause),
                    ("Escape", Screen::Game, GameStatus::Paused) => Some(ShellAction::Resume),
                    ("Escape", Screen::Profile | Screen::Leaderboard | Screen::Settings, _) => {
                        Some(ShellAction::Back)
                    }
                    _ => None,
                };
                if let Some(action) = action {
                    event.prevent_default();
                    g.apply(action);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>, canvas: HtmlCanvasElement) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, canvas, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, canvas: HtmlCanvasElement, time: f64) {
        {
            let mut g = game.borrow_mut();

            let (width, height) = canvas_pixels(&canvas);
            if canvas.width() != width || canvas.height() != height {
                canvas.set_width(width);
                canvas.set_height(height);
            }
            g.resize(width, height);

            g.frame(time);
        }

        request_animation_frame(game, canvas);
    }

    /// Wire a click on element `id` to a shell action
    fn on_click(document: &Document, game: &Rc<RefCell<Game>>, id: &str, action: ShellAction) {
        if let Some(btn) = document.get_element_by_id(id) {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                game.borrow_mut().apply(action);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        let Some(document) = document() else {
            return;
        };

        // Main menu
        on_click(&document, &game, "play-btn", ShellAction::Play);
        on_click(&document, &game, "profile-btn", ShellAction::OpenProfile);
        on_click(&document, &game, "leaderboard-btn", ShellAction::OpenLeaderboard);
        on_click(&document, &game, "settings-btn", ShellAction::OpenSettings);

        // Game screen and overlays
        on_click(&document, &game, "pause-btn", ShellAction::Pause);
        on_click(&document, &game, "resume-btn", ShellAction::Resume);
        on_click(&document, &game, "restart-btn", ShellAction::Restart);
        on_click(&document, &game, "pause-settings-btn", ShellAction::PauseToSettings);
        on_click(&document, &game, "game-over-restart-btn", ShellAction::Restart);
        on_click(&document, &game, "game-over-menu-btn", ShellAction::Back);

        // Back buttons
        for id in ["profile-back", "leaderboard-back", "settings-back"] {
            on_click(&document, &game, id, ShellAction::Back);
        }

        // Profile
        for a in AVATARS {
            on_click(&document, &game, &format!("avatar-{}", a.id), ShellAction::SelectAvatar(a.id));
        }

        // Settings
        on_click(&document, &game, "sound-toggle", ShellAction::ToggleSound);
        on_click(&document, &game, "vibration-toggle", ShellAction::ToggleVibration);
        for theme in Theme::ALL {
            on_click(
                &document,
                &game,
                &format!("theme-{}", theme.as_str().to_lowercase()),
                ShellAction::SetTheme(theme),
            );
        }
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    if g.shell.auto_pause() {
                        log::info!("Auto-paused (tab hidden)");
                        g.refresh_screen();
                    }
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                if g.shell.auto_pause() {
                    log::info!("Auto-paused (window blur)");
                    g.refresh_screen();
                }
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use clap::Parser;
    use glam::Vec2;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use catch_interference::consts::*;
    use catch_interference::highscores::format_date;
    use catch_interference::sim::{GameStatus, corners, surface_bounds};
    use catch_interference::{
        Cue, GameSession, MemoryStore, Shell, ShellAction, format_play_time, format_survival_time,
    };

    /// Distance from a corner at which the autopilot starts reacting
    const WATCH_RADIUS: f32 = CORNER_DANGER_ZONE * 2.2;

    /// Headless autopilot demo
    #[derive(Parser, Debug)]
    #[command(name = "catch-interference")]
    #[command(about = "Play seeded runs with an autopilot and print the results")]
    pub struct Options {
        /// Generator seed (defaults to the wall clock)
        #[arg(long)]
        pub seed: Option<u64>,
        #[arg(long, default_value_t = 3)]
        pub runs: u32,
        /// Cap on a single run, in simulated seconds
        #[arg(long, default_value_t = 300)]
        pub max_seconds: u32,
        /// Chance per frame that the autopilot reacts to a threat, 0..=1
        #[arg(long, default_value_t = 0.2, value_parser = parse_skill)]
        pub skill: f64,
    }

    fn parse_skill(s: &str) -> Result<f64, String> {
        let skill: f64 = s.parse().map_err(|e| format!("{}", e))?;
        if (0.0..=1.0).contains(&skill) {
            Ok(skill)
        } else {
            Err(format!("{} is not between 0 and 1", skill))
        }
    }

    /// True when the box is near a corner and still heading toward it
    fn threatened(center: Vec2, vel: Vec2) -> bool {
        corners(surface_bounds()).iter().any(|&c| {
            let to_corner = c - center;
            to_corner.length() < WATCH_RADIUS && to_corner.dot(vel) > 0.0
        })
    }

    pub fn run(opts: &Options) {
        let seed = opts.seed.unwrap_or_else(catch_interference::platform::clock_seed);
        println!("Catch Interference headless demo (seed {})", seed);

        let session = GameSession::new(Vec::<Cue>::new(), MemoryStore::new(), seed);
        let mut shell = Shell::new(session);
        let mut pilot = Pcg32::seed_from_u64(seed ^ 0x9e37_79b9_7f4a_7c15);

        // Simulated clock, one 60 Hz frame at a time
        let frame_ms = 1000.0 / 60.0;
        let mut clock = 1_700_000_000_000.0_f64;

        for run in 1..=opts.runs {
            shell.apply(ShellAction::Play, clock);
            shell.session_mut().feedback_mut().clear();
            let started = clock;

            loop {
                clock += frame_ms;
                let session = shell.session_mut();
                if let Some(outcome) = session.update(clock, clock) {
                    let bounces = session
                        .feedback()
                        .iter()
                        .filter(|c| **c == Cue::Bounce)
                        .count();
                    println!(
                        "Run {}: survived {} with {} taps, {} bounces, +{} exp{}{}",
                        run,
                        format_survival_time(outcome.score),
                        outcome.taps,
                        bounces,
                        outcome.exp_gained,
                        if outcome.leveled_up { ", level up" } else { "" },
                        if outcome.new_best { ", new best" } else { "" },
                    );
                    for id in &outcome.unlocked {
                        println!("  Achievement unlocked: {} - {}", id.name(), id.description());
                    }
                    break;
                }

                if clock - started >= f64::from(opts.max_seconds) * 1000.0 {
                    println!("Run {}: still alive after {}s, stopping", run, opts.max_seconds);
                    shell.apply(ShellAction::Pause, clock);
                    shell.apply(ShellAction::Back, clock);
                    break;
                }

                let b = session.state().game_box;
                if threatened(b.center(), b.vel) && pilot.random_bool(opts.skill) {
                    session.tap();
                }
            }

            if shell.session().status() == GameStatus::GameOver {
                shell.apply(ShellAction::Back, clock);
            }
            // Time between runs
            clock += 5.0 * 60_000.0;
        }

        let player = shell.session().player();
        println!();
        println!(
            "{} - level {} ({}/{} exp), {} games, best {}, played {}",
            player.name,
            player.level,
            player.experience,
            player.experience_needed(),
            player.games_played,
            format_survival_time(player.best_score),
            format_play_time(player.total_play_time),
        );

        println!();
        println!("Leaderboard:");
        for (i, entry) in shell.session_mut().leaderboard().entries.iter().enumerate() {
            println!(
                "  {:>2}. {:>6}  level {:<3} {}",
                i + 1,
                format_survival_time(entry.score),
                entry.level,
                format_date(entry.date, clock)
            );
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use clap::Parser;

    let opts = demo::Options::parse();
    env_logger::init();
    log::info!("Catch Interference (native) starting...");
    log::info!("Native mode runs a headless demo - run with `trunk serve` for the web version");

    demo::run(&opts);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
