//! Scoring policy
//!
//! Pure functions from (correctness, elapsed time, per-question history) to a
//! point delta and a feedback tier. Thresholds tighten for questions already
//! answered correctly this session, so fluency across the whole table scores
//! better than memorizing one product.

use crate::config::{GameConfig, SpeedThresholds};

/// Speed band for an answer, under the thresholds that scored it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeedBand {
    Fast,
    Medium,
    Slow,
    /// Catch-all at or above the slow cut point
    VerySlow,
}

/// Presentation-only marker for repeat questions. Never affects the delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bonus {
    /// Beat the prior best time for this question
    NewRecord,
    /// Within 120% of the prior best
    Consistent,
}

/// Scoring result for one answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerScore {
    pub band: SpeedBand,
    pub delta: i32,
    pub bonus: Option<Bonus>,
}

/// Thresholds after repeat tightening: each cut point scales by
/// `1 - min(repeat_tightening * attempts, max_tightening)`.
pub fn adjusted_thresholds(cfg: &GameConfig, correct_attempts: u32) -> SpeedThresholds {
    let reduction = (cfg.repeat_tightening * correct_attempts as f32).min(cfg.max_tightening);
    cfg.thresholds.scaled(1.0 - reduction)
}

/// Classify an elapsed time against a set of thresholds
fn classify(elapsed_secs: f32, t: &SpeedThresholds) -> SpeedBand {
    if elapsed_secs < t.fast {
        SpeedBand::Fast
    } else if elapsed_secs < t.medium {
        SpeedBand::Medium
    } else if elapsed_secs < t.slow {
        SpeedBand::Slow
    } else {
        SpeedBand::VerySlow
    }
}

fn correct_delta(band: SpeedBand, cfg: &GameConfig) -> i32 {
    match band {
        SpeedBand::Fast => cfg.correct_points.fast,
        SpeedBand::Medium => cfg.correct_points.medium,
        SpeedBand::Slow => cfg.correct_points.slow,
        SpeedBand::VerySlow => cfg.correct_points.very_slow,
    }
}

fn wrong_delta(band: SpeedBand, cfg: &GameConfig) -> i32 {
    // Wrong answers have three bands only; very-slow takes the slow penalty
    match band {
        SpeedBand::Fast => cfg.wrong_points.fast,
        SpeedBand::Medium => cfg.wrong_points.medium,
        SpeedBand::Slow | SpeedBand::VerySlow => cfg.wrong_points.slow,
    }
}

fn bonus_for(elapsed_secs: f32, prior_best: Option<f32>) -> Option<Bonus> {
    let best = prior_best?;
    if elapsed_secs < best {
        Some(Bonus::NewRecord)
    } else if elapsed_secs <= best * 1.2 {
        Some(Bonus::Consistent)
    } else {
        None
    }
}

/// Score one answer. `correct_attempts` and `prior_best` describe the
/// question's in-session history *before* this answer. The feedback band uses
/// the same adjusted thresholds as the delta, so the message shown to the
/// player always matches the points awarded.
pub fn score_answer(
    correct: bool,
    elapsed_secs: f32,
    correct_attempts: u32,
    prior_best: Option<f32>,
    cfg: &GameConfig,
) -> AnswerScore {
    let thresholds = adjusted_thresholds(cfg, correct_attempts);
    let band = classify(elapsed_secs, &thresholds);
    if correct {
        AnswerScore {
            band,
            delta: correct_delta(band, cfg),
            bonus: bonus_for(elapsed_secs, prior_best),
        }
    } else {
        AnswerScore {
            band,
            delta: wrong_delta(band, cfg),
            bonus: None,
        }
    }
}
