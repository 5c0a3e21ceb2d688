//! Question/scoring/progression engine
//!
//! All game rules live here. This module must be pure and deterministic:
//! - Timestamps injected by the caller, never read from a clock
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod engine;
pub mod events;
pub mod scoring;
pub mod state;

pub use engine::{AnswerOutcome, SessionEngine};
pub use events::{FeedbackEvent, GameObserver, NoopObserver, SessionSummary};
pub use scoring::{AnswerScore, Bonus, SpeedBand, adjusted_thresholds, score_answer};
pub use state::{Question, QuestionHistory, Session, SessionPhase};
