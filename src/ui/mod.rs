//! DOM screen management and keyboard focus navigation
//!
//! Pure presentation glue: reacts to engine events by updating element text,
//! classes, and visibility. Owns no game state beyond the keyboard focus
//! index. All timing of animations stays out of the engine.

use std::cell::Cell;

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, HtmlInputElement};

use crate::config::GameConfig;
use crate::game::{Bonus, FeedbackEvent, SessionSummary, SpeedBand};
use crate::storage::{Store, format_play_time, medal_for};

/// The game's screens, one `<section class="screen">` each
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Menu,
    TableSelect,
    Game,
    Stats,
    GameOver,
}

impl Screen {
    pub fn element_id(&self) -> &'static str {
        match self {
            Screen::Menu => "menu-screen",
            Screen::TableSelect => "table-select-screen",
            Screen::Game => "game-screen",
            Screen::Stats => "stats-screen",
            Screen::GameOver => "game-over-screen",
        }
    }

    pub const ALL: [Screen; 5] = [
        Screen::Menu,
        Screen::TableSelect,
        Screen::Game,
        Screen::Stats,
        Screen::GameOver,
    ];
}

/// DOM view manager
pub struct Ui {
    document: Document,
    focus_index: Cell<usize>,
}

impl Ui {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            focus_index: Cell::new(0),
        }
    }

    fn set_text(&self, id: &str, text: &str) {
        if let Some(el) = self.document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    /// Show one screen, hide the rest, and move keyboard focus to its first
    /// focusable button
    pub fn show_screen(&self, screen: Screen) {
        for s in Screen::ALL {
            if let Some(el) = self.document.get_element_by_id(s.element_id()) {
                if s == screen {
                    let _ = el.class_list().add_1("active");
                } else {
                    let _ = el.class_list().remove_1("active");
                }
            }
        }
        self.focus_index.set(0);
        self.apply_focus();

        if screen == Screen::Game {
            self.focus_answer_input();
        }
    }

    /// Id of the currently active screen, if any
    pub fn active_screen(&self) -> Option<Screen> {
        let el = self.document.query_selector(".screen.active").ok()??;
        Screen::ALL.into_iter().find(|s| s.element_id() == el.id())
    }

    // === Keyboard focus navigation ===

    fn focusables(&self) -> Vec<Element> {
        let mut out = Vec::new();
        if let Ok(list) = self.document.query_selector_all(".screen.active button") {
            for i in 0..list.length() {
                if let Some(el) = list.item(i).and_then(|n| n.dyn_into::<Element>().ok()) {
                    out.push(el);
                }
            }
        }
        out
    }

    /// Move the focus highlight forward or backward, wrapping around
    pub fn move_focus(&self, forward: bool) {
        let buttons = self.focusables();
        if buttons.is_empty() {
            return;
        }
        let len = buttons.len();
        let current = self.focus_index.get().min(len - 1);
        let next = if forward {
            (current + 1) % len
        } else {
            (current + len - 1) % len
        };
        self.focus_index.set(next);
        self.apply_focus();
    }

    fn apply_focus(&self) {
        let buttons = self.focusables();
        for (i, el) in buttons.iter().enumerate() {
            if i == self.focus_index.get() {
                let _ = el.class_list().add_1("focused");
                el.scroll_into_view_with_bool(false);
            } else {
                let _ = el.class_list().remove_1("focused");
            }
        }
    }

    /// Click the button the focus highlight is on
    pub fn activate_focused(&self) {
        let buttons = self.focusables();
        if let Some(el) = buttons.get(self.focus_index.get()) {
            if let Some(btn) = el.dyn_ref::<HtmlElement>() {
                btn.click();
            }
        }
    }

    // === Table selection ===

    /// Rebuild the table-select grid with current rankings and medals.
    /// Buttons carry `data-table`; a delegated listener in the glue reads it.
    pub fn render_table_buttons(&self, config: &GameConfig, store: &Store) {
        let Some(container) = self.document.get_element_by_id("table-buttons") else {
            return;
        };
        let mut html = String::new();
        for &table in &config.tables {
            let ranking = store.ranking(table);
            let medal = medal_for(ranking, &config.medals)
                .map(|m| format!("<span class=\"medal\">{}</span>", m.emoji()))
                .unwrap_or_default();
            html.push_str(&format!(
                "<button class=\"table-btn\" data-table=\"{table}\">{medal}<div>{table}x</div>\
                 <span class=\"ranking\">Rank: {ranking}</span></button>"
            ));
        }
        container.set_inner_html(&html);
    }

    // === Game screen ===

    /// Reset the game screen for a fresh session
    pub fn reset_game_screen(&self, topic: u32, max_lives: u8) {
        self.set_text("current-table", &topic.to_string());
        self.set_text("current-score", "0");
        self.set_text("question-timer", "0.0s");
        self.clear_feedback();
        self.update_lives(max_lives);
    }

    pub fn update_question(&self, topic: u32, multiplier: u32) {
        self.set_text("question", &format!("{} \u{d7} {} = ?", topic, multiplier));
        if let Some(input) = self.answer_input() {
            input.set_value("");
        }
        self.clear_feedback();
    }

    pub fn update_score(&self, correct_answers: u32) {
        self.set_text("current-score", &correct_answers.to_string());
    }

    pub fn update_timer(&self, elapsed_secs: f64) {
        self.set_text("question-timer", &format!("{:.1}s", elapsed_secs));
    }

    /// Render the zombie's approach: one marker per remaining life
    pub fn update_lives(&self, remaining: u8) {
        let Some(el) = self.document.get_element_by_id("zombie-track") else {
            return;
        };
        let mut track = String::from("\u{1f9df}");
        for _ in 0..remaining {
            track.push_str(" \u{2022} ");
        }
        track.push_str("\u{1f9cd}");
        el.set_text_content(Some(&track));
        if remaining <= 1 {
            let _ = el.class_list().add_1("danger");
        } else {
            let _ = el.class_list().remove_1("danger");
        }
    }

    pub fn show_feedback(&self, event: &FeedbackEvent) {
        let message = if event.correct {
            let speed = match event.band {
                SpeedBand::Fast => "\u{26a1} LIGHTNING FAST!",
                SpeedBand::Medium => "\u{1f680} GREAT SPEED!",
                SpeedBand::Slow => "\u{1f44d} GOOD!",
                SpeedBand::VerySlow => "\u{2713} CORRECT",
            };
            let bonus = match event.bonus {
                Some(Bonus::NewRecord) => " \u{1f3c6} NEW RECORD!",
                Some(Bonus::Consistent) => " \u{1f3af} CONSISTENT!",
                None => "",
            };
            format!("{} (+{}){}", speed, event.delta, bonus)
        } else {
            format!("\u{274c} WRONG! ({})", event.delta)
        };

        if let Some(el) = self.document.get_element_by_id("feedback") {
            el.set_text_content(Some(&message));
            let class = if event.correct {
                "feedback correct"
            } else {
                "feedback wrong"
            };
            let _ = el.set_attribute("class", class);
        }
    }

    fn clear_feedback(&self) {
        if let Some(el) = self.document.get_element_by_id("feedback") {
            el.set_text_content(Some(""));
            let _ = el.set_attribute("class", "feedback");
        }
    }

    pub fn answer_input(&self) -> Option<HtmlInputElement> {
        self.document
            .get_element_by_id("answer-input")?
            .dyn_into::<HtmlInputElement>()
            .ok()
    }

    pub fn focus_answer_input(&self) {
        if let Some(input) = self.answer_input() {
            let _ = input.focus();
        }
    }

    // === Stats ===

    pub fn render_stats(&self, config: &GameConfig, store: &Store) {
        let stats = store.stats();
        self.set_text("total-games", &stats.games_played.to_string());
        self.set_text(
            "most-played",
            &store
                .most_played_topic()
                .map(|t| format!("{}x", t))
                .unwrap_or_else(|| "-".to_string()),
        );
        self.set_text("total-time", &format_play_time(stats.total_seconds));

        if let Some(container) = self.document.get_element_by_id("table-times") {
            let mut html = String::new();
            for &table in &config.tables {
                let seconds = stats.per_topic_seconds.get(&table).copied().unwrap_or(0);
                html.push_str(&format!(
                    "<div class=\"table-time-item\"><div class=\"table-num\">{}x</div>\
                     <div class=\"time-value\">{}</div></div>",
                    table,
                    format_play_time(seconds)
                ));
            }
            container.set_inner_html(&html);
        }
    }

    // === Game over ===

    pub fn show_game_over(&self, summary: &SessionSummary) {
        let message = if summary.won {
            format!(
                "\u{1f389} You survived! Great job on your {}x table!",
                summary.topic
            )
        } else {
            format!(
                "The zombie got you! Better luck next time with {}x!",
                summary.topic
            )
        };
        self.set_text("game-over-message", &message);
        self.set_text("final-correct", &summary.correct_answers.to_string());
        self.set_text("final-ranking", &summary.new_ranking.to_string());
        self.show_screen(Screen::GameOver);
    }
}
