//! Engine → presentation event interface
//!
//! The engine reports state transitions through a `GameObserver` the caller
//! injects. Every method defaults to a no-op, so an engine without a
//! presentation layer (tests, the native smoke run) degrades to state-only
//! updates.

use super::scoring::{Bonus, SpeedBand};

/// Payload for the per-answer feedback event
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeedbackEvent {
    pub correct: bool,
    pub band: SpeedBand,
    pub delta: i32,
    pub elapsed_secs: f32,
    pub bonus: Option<Bonus>,
}

/// Terminal session summary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    pub won: bool,
    pub correct_answers: u32,
    pub new_ranking: i32,
    pub topic: u32,
}

/// Listener for engine state transitions. Implementations must not call back
/// into the engine; they render, play sounds, or log.
pub trait GameObserver {
    fn question_changed(&self, _topic: u32, _multiplier: u32) {}
    fn feedback(&self, _event: &FeedbackEvent) {}
    fn lives_changed(&self, _remaining: u8) {}
    fn session_ended(&self, _summary: &SessionSummary) {}
}

/// Default observer when no presentation layer is attached
pub struct NoopObserver;

impl GameObserver for NoopObserver {}
