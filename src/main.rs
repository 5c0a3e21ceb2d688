//! Zombie Tables entry point
//!
//! Handles platform-specific initialization and DOM event wiring.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, KeyboardEvent, MouseEvent};

    use zombie_tables::audio::{AudioManager, SoundEffect};
    use zombie_tables::config::GameConfig;
    use zombie_tables::game::{
        FeedbackEvent, GameObserver, SessionEngine, SessionSummary,
    };
    use zombie_tables::storage::Store;
    use zombie_tables::ui::{Screen, Ui};

    /// Question-timer display refresh rate (ms)
    const TIMER_TICK_MS: i32 = 100;

    /// Presentation observer: renders engine events and plays sound cues
    struct Presenter {
        ui: Rc<Ui>,
        audio: Rc<AudioManager>,
        game_over_delay_ms: i32,
    }

    impl GameObserver for Presenter {
        fn question_changed(&self, topic: u32, multiplier: u32) {
            self.ui.update_question(topic, multiplier);
        }

        fn feedback(&self, event: &FeedbackEvent) {
            self.ui.show_feedback(event);
            if event.correct {
                self.audio.play(SoundEffect::Correct(event.band));
            } else {
                self.audio.play(SoundEffect::Wrong);
            }
        }

        fn lives_changed(&self, remaining: u8) {
            self.ui.update_lives(remaining);
            if remaining > 0 {
                self.audio.play(SoundEffect::ZombieStep);
            } else {
                self.audio.play(SoundEffect::ZombieAttack);
            }
        }

        fn session_ended(&self, summary: &SessionSummary) {
            if summary.won {
                self.audio.play(SoundEffect::Victory);
            }
            // Let the final feedback land before switching screens
            let ui = self.ui.clone();
            let summary = *summary;
            let cb = Closure::once_into_js(move || {
                ui.show_game_over(&summary);
            });
            let _ = web_sys::window()
                .unwrap()
                .set_timeout_with_callback_and_timeout_and_arguments_0(
                    cb.unchecked_ref(),
                    self.game_over_delay_ms,
                );
        }
    }

    /// Application state shared by all event handlers
    struct App {
        engine: SessionEngine,
        ui: Rc<Ui>,
        audio: Rc<AudioManager>,
        /// Pending question-advance timeout, cancelled on restart/menu exit.
        /// The engine's generation check is the backstop if cancellation
        /// loses a race with expiry.
        advance_timeout: Option<i32>,
    }

    impl App {
        fn cancel_pending_advance(&mut self) {
            if let Some(id) = self.advance_timeout.take() {
                if let Some(window) = web_sys::window() {
                    window.clear_timeout_with_handle(id);
                }
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Zombie Tables starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let config = GameConfig::default();
        let ui = Rc::new(Ui::new(document.clone()));
        let audio = Rc::new(AudioManager::new());
        let store = Store::load();

        let seed = js_sys::Date::now() as u64;
        let mut engine = SessionEngine::new(config.clone(), store, seed);
        engine.set_observer(Box::new(Presenter {
            ui: ui.clone(),
            audio: audio.clone(),
            game_over_delay_ms: config.game_over_delay_ms,
        }));
        log::info!("Engine initialized with seed: {}", seed);

        let app = Rc::new(RefCell::new(App {
            engine,
            ui: ui.clone(),
            audio,
            advance_timeout: None,
        }));

        setup_menu_buttons(&document, app.clone());
        setup_table_select(&document, app.clone());
        setup_answer_input(&document, app.clone());
        setup_game_over_buttons(&document, app.clone());
        setup_keyboard(&document, app.clone());
        setup_question_timer(app.clone());

        ui.show_screen(Screen::Menu);
        log::info!("Zombie Tables ready!");
    }

    /// Begin a session on `table`, cancelling anything left from the last one
    fn start_game(app: &Rc<RefCell<App>>, table: u32) {
        let mut a = app.borrow_mut();
        a.cancel_pending_advance();
        a.audio.resume();
        a.audio.play(SoundEffect::Click);

        let max_lives = a.engine.config().max_lives;
        a.ui.show_screen(Screen::Game);
        a.ui.reset_game_screen(table, max_lives);
        a.engine.start(table, js_sys::Date::now());
        a.ui.focus_answer_input();
    }

    /// Submit whatever is in the answer input. Empty input is ignored here;
    /// the engine treats anything else non-numeric as a wrong answer.
    fn submit_answer(app: &Rc<RefCell<App>>) {
        let pending = {
            let mut a = app.borrow_mut();
            let Some(input) = a.ui.answer_input() else {
                return;
            };
            let raw = input.value();
            if raw.trim().is_empty() {
                return;
            }

            let now = js_sys::Date::now();
            let Some(outcome) = a.engine.check_answer(&raw, now) else {
                return;
            };
            if let Some(session) = a.engine.session() {
                a.ui.update_score(session.correct_answers);
            }
            if outcome.session_over {
                None
            } else {
                Some((outcome.generation, a.engine.config().next_question_delay_ms))
            }
        };

        if let Some((generation, delay_ms)) = pending {
            schedule_advance(app, generation, delay_ms);
        }
    }

    /// Schedule the next question after the feedback delay, keyed by the
    /// engine generation so a restart in the meantime makes it a no-op
    fn schedule_advance(app: &Rc<RefCell<App>>, generation: u64, delay_ms: i32) {
        let app2 = app.clone();
        let cb = Closure::once_into_js(move || {
            let mut a = app2.borrow_mut();
            a.advance_timeout = None;
            if a.engine.advance(generation, js_sys::Date::now()) {
                a.ui.update_timer(0.0);
                a.ui.focus_answer_input();
            }
        });
        let id = web_sys::window()
            .unwrap()
            .set_timeout_with_callback_and_timeout_and_arguments_0(cb.unchecked_ref(), delay_ms)
            .ok();
        app.borrow_mut().advance_timeout = id;
    }

    /// Leave the game screen for the menu, cancelling any pending advance
    fn exit_to_menu(app: &Rc<RefCell<App>>) {
        let mut a = app.borrow_mut();
        a.cancel_pending_advance();
        a.ui.show_screen(Screen::Menu);
    }

    fn show_table_select(app: &Rc<RefCell<App>>) {
        let a = app.borrow();
        a.audio.resume();
        a.audio.play(SoundEffect::Click);
        a.ui.render_table_buttons(a.engine.config(), a.engine.store());
        a.ui.show_screen(Screen::TableSelect);
    }

    fn show_stats(app: &Rc<RefCell<App>>) {
        let a = app.borrow();
        a.audio.play(SoundEffect::Click);
        a.ui.render_stats(a.engine.config(), a.engine.store());
        a.ui.show_screen(Screen::Stats);
    }

    fn on_click(document: &Document, id: &str, app: Rc<RefCell<App>>, f: fn(&Rc<RefCell<App>>)) {
        if let Some(btn) = document.get_element_by_id(id) {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                f(&app);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_menu_buttons(document: &Document, app: Rc<RefCell<App>>) {
        on_click(document, "play-btn", app.clone(), show_table_select);
        on_click(document, "stats-btn", app.clone(), show_stats);
        on_click(document, "back-to-menu-btn", app.clone(), exit_to_menu);
        on_click(document, "back-from-stats-btn", app, exit_to_menu);
    }

    /// One delegated listener on the table grid; buttons are re-rendered with
    /// fresh rankings every time the screen opens
    fn setup_table_select(document: &Document, app: Rc<RefCell<App>>) {
        let Some(container) = document.get_element_by_id("table-buttons") else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            let Some(target) = event.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
                return;
            };
            let Ok(Some(btn)) = target.closest("[data-table]") else {
                return;
            };
            let Some(table) = btn
                .get_attribute("data-table")
                .and_then(|v| v.parse::<u32>().ok())
            else {
                return;
            };
            start_game(&app, table);
        });
        let _ = container.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_answer_input(document: &Document, app: Rc<RefCell<App>>) {
        let Some(input) = document.get_element_by_id("answer-input") else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            if event.key() == "Enter" {
                submit_answer(&app);
            }
        });
        let _ = input.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_game_over_buttons(document: &Document, app: Rc<RefCell<App>>) {
        on_click(document, "play-again-btn", app.clone(), |app| {
            let topic = app.borrow().engine.session().map(|s| s.topic);
            if let Some(topic) = topic {
                start_game(app, topic);
            }
        });
        on_click(document, "menu-btn", app, exit_to_menu);
    }

    /// Global keyboard navigation: arrows move focus, Enter activates,
    /// Escape backs out, plus per-screen hotkeys
    fn setup_keyboard(document: &Document, app: Rc<RefCell<App>>) {
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let screen = app.borrow().ui.active_screen();
            let Some(screen) = screen else { return };
            let key = event.key();

            if key == "Escape" {
                match screen {
                    Screen::Menu => {}
                    _ => exit_to_menu(&app),
                }
                return;
            }

            if matches!(key.as_str(), "ArrowUp" | "ArrowDown" | "ArrowLeft" | "ArrowRight") {
                event.prevent_default();
                let forward = matches!(key.as_str(), "ArrowDown" | "ArrowRight");
                app.borrow().ui.move_focus(forward);
                return;
            }

            // Don't interfere with the answer input. The borrow must end
            // before the synthetic click re-enters a handler that borrows.
            if key == "Enter" && screen != Screen::Game {
                let ui = app.borrow().ui.clone();
                ui.activate_focused();
                return;
            }

            match screen {
                Screen::Menu => match key.as_str() {
                    "p" | "P" => show_table_select(&app),
                    "s" | "S" => show_stats(&app),
                    _ => {}
                },
                Screen::TableSelect => {
                    if let Ok(table) = key.parse::<u32>() {
                        if app.borrow().engine.config().tables.contains(&table) {
                            start_game(&app, table);
                        }
                    }
                }
                Screen::GameOver => {
                    if matches!(key.as_str(), "m" | "M") {
                        exit_to_menu(&app);
                    }
                }
                _ => {}
            }
        });
        let _ =
            document.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// One interval drives the elapsed-time display; it idles unless the
    /// game screen is up with a live session
    fn setup_question_timer(app: Rc<RefCell<App>>) {
        let closure = Closure::<dyn FnMut()>::new(move || {
            let a = app.borrow();
            if a.ui.active_screen() != Some(Screen::Game) {
                return;
            }
            if let Some(session) = a.engine.session() {
                if !session.phase.is_terminal() {
                    let elapsed = (js_sys::Date::now() - session.question_started_at_ms) / 1000.0;
                    a.ui.update_timer(elapsed.max(0.0));
                }
            }
        });
        let _ = web_sys::window()
            .unwrap()
            .set_interval_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                TIMER_TICK_MS,
            );
        closure.forget();
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
    log::info!("Zombie Tables (native) starting...");
    log::info!("Native mode has no UI - run with `trunk serve` for the web version");

    println!("\nRunning scripted smoke session...");
    smoke_session();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Drive one full session with perfect answers and check it flushes a win
#[cfg(not(target_arch = "wasm32"))]
fn smoke_session() {
    use zombie_tables::game::SessionPhase;
    use zombie_tables::{GameConfig, SessionEngine, Store};

    let mut engine = SessionEngine::new(GameConfig::default(), Store::in_memory(), 7);
    engine.start(7, 0.0);

    let mut now = 0.0;
    loop {
        let session = engine.session().expect("session active");
        if session.phase.is_terminal() {
            break;
        }
        let answer = session.question.expected_answer.to_string();
        now += 1500.0;
        let outcome = engine.check_answer(&answer, now).expect("answer accepted");
        if outcome.session_over {
            break;
        }
        engine.advance(outcome.generation, now);
    }

    let session = engine.session().expect("session retained");
    assert_eq!(session.phase, SessionPhase::Won, "perfect play should win");
    println!(
        "\u{2713} Smoke session won: {} correct, ranking {}",
        session.correct_answers,
        engine.store().ranking(7)
    );
}
