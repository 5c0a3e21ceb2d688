//! Session state and core gameplay types
//!
//! A `Session` is one play-through of a single table, from `start` to a
//! win/loss terminal phase. It is owned by the engine and discarded on the
//! next `start`; nothing in here is persisted across sessions.

use std::collections::BTreeMap;

/// Current phase of a practice session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Awaiting answers
    InProgress,
    /// Reached the win threshold
    Won,
    /// The zombie reached the player
    Lost,
}

impl SessionPhase {
    /// Terminal phases accept no further answers
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionPhase::Won | SessionPhase::Lost)
    }
}

/// One multiplication question. Created fresh each round, discarded on answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Question {
    pub multiplier: u32,
    pub expected_answer: u32,
}

/// Per-question record within the current session, keyed by multiplier
/// (the table is fixed for the session).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuestionHistory {
    /// Times this question has been answered correctly this session
    pub correct_attempts: u32,
    /// Fastest correct answer so far, seconds. Only ever decreases.
    pub best_time_secs: f32,
}

/// One play-through of a single multiplication table
#[derive(Debug, Clone)]
pub struct Session {
    /// The table being practiced (the "7" in 7×6)
    pub topic: u32,
    pub phase: SessionPhase,
    pub correct_answers: u32,
    /// Counts down from the configured maximum; zero means the zombie arrived
    pub lives_remaining: u8,
    /// Cumulative ranking change, flushed to storage at session end
    pub score_delta: i32,
    pub started_at_ms: f64,
    pub question: Question,
    pub question_started_at_ms: f64,
    /// Per-multiplier history driving the adaptive thresholds
    pub history: BTreeMap<u32, QuestionHistory>,
}

impl Session {
    pub fn new(topic: u32, max_lives: u8, first_question: Question, now_ms: f64) -> Self {
        Self {
            topic,
            phase: SessionPhase::InProgress,
            correct_answers: 0,
            lives_remaining: max_lives,
            score_delta: 0,
            started_at_ms: now_ms,
            question: first_question,
            question_started_at_ms: now_ms,
            history: BTreeMap::new(),
        }
    }

    /// Prior correct answers to the current question
    pub fn correct_attempts(&self, multiplier: u32) -> u32 {
        self.history
            .get(&multiplier)
            .map(|h| h.correct_attempts)
            .unwrap_or(0)
    }

    /// Best time for the current question, if it has been answered before
    pub fn best_time(&self, multiplier: u32) -> Option<f32> {
        self.history.get(&multiplier).map(|h| h.best_time_secs)
    }

    /// Record a correct answer: bump the attempt count, lower the best time
    /// if improved. Wrong answers never touch the history.
    pub fn record_correct(&mut self, multiplier: u32, elapsed_secs: f32) {
        self.history
            .entry(multiplier)
            .and_modify(|h| {
                h.correct_attempts += 1;
                if elapsed_secs < h.best_time_secs {
                    h.best_time_secs = elapsed_secs;
                }
            })
            .or_insert(QuestionHistory {
                correct_attempts: 1,
                best_time_secs: elapsed_secs,
            });
    }

    /// Whole seconds elapsed since the session started
    pub fn elapsed_secs(&self, now_ms: f64) -> u64 {
        (((now_ms - self.started_at_ms) / 1000.0).floor()).max(0.0) as u64
    }
}
