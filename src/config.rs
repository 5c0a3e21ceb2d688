//! Data-driven game balance
//!
//! Every tunable the engine, scoring policy, or presentation reads lives
//! here. Defaults match the shipped game; tests construct modified copies.

use serde::{Deserialize, Serialize};

/// Speed cut points in seconds. Invariant: `fast < medium < slow`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeedThresholds {
    /// Under this = maximum points
    pub fast: f32,
    pub medium: f32,
    /// At or above this = the very-slow catch-all band
    pub slow: f32,
}

impl SpeedThresholds {
    /// Scale all cut points by `factor` (used for repeat-question tightening)
    pub fn scaled(&self, factor: f32) -> Self {
        Self {
            fast: self.fast * factor,
            medium: self.medium * factor,
            slow: self.slow * factor,
        }
    }
}

/// Points awarded per speed band on a correct answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrectPoints {
    pub fast: i32,
    pub medium: i32,
    pub slow: i32,
    pub very_slow: i32,
}

/// Points deducted per speed band on a wrong answer (all negative).
/// A fast wrong answer is likely a slip and costs least; a slow wrong
/// answer reflects genuine miscalculation and costs most.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrongPoints {
    pub fast: i32,
    pub medium: i32,
    pub slow: i32,
}

/// Ranking cutoffs for the table-select medals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedalThresholds {
    pub bronze: i32,
    pub silver: i32,
    pub gold: i32,
}

/// Complete game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Multiplication tables offered on the selection screen
    pub tables: Vec<u32>,
    /// Wrong answers allowed before the zombie reaches the player
    pub max_lives: u8,
    /// Correct answers needed to survive the session
    pub questions_to_win: u32,
    /// Inclusive multiplier range for generated questions
    pub multiplier_min: u32,
    pub multiplier_max: u32,
    pub thresholds: SpeedThresholds,
    pub correct_points: CorrectPoints,
    pub wrong_points: WrongPoints,
    pub medals: MedalThresholds,
    /// Threshold reduction per prior correct answer to the same question
    pub repeat_tightening: f32,
    /// Cap on the total threshold reduction
    pub max_tightening: f32,
    /// Presentation delay before the next question is shown (ms)
    pub next_question_delay_ms: i32,
    /// Presentation delay before the game-over screen appears (ms)
    pub game_over_delay_ms: i32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tables: (2..=12).collect(),
            max_lives: 3,
            questions_to_win: 15,
            multiplier_min: 1,
            multiplier_max: 12,
            thresholds: SpeedThresholds {
                fast: 3.0,
                medium: 6.0,
                slow: 10.0,
            },
            correct_points: CorrectPoints {
                fast: 10,
                medium: 7,
                slow: 4,
                very_slow: 2,
            },
            wrong_points: WrongPoints {
                fast: -3,
                medium: -5,
                slow: -7,
            },
            medals: MedalThresholds {
                bronze: 100,
                silver: 250,
                gold: 500,
            },
            repeat_tightening: 0.2,
            max_tightening: 0.5,
            next_question_delay_ms: 1500,
            game_over_delay_ms: 1000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_thresholds_ordered() {
        let cfg = GameConfig::default();
        assert!(cfg.thresholds.fast < cfg.thresholds.medium);
        assert!(cfg.thresholds.medium < cfg.thresholds.slow);
    }

    #[test]
    fn test_wrong_points_all_negative_and_ordered() {
        let cfg = GameConfig::default();
        assert!(cfg.wrong_points.fast < 0);
        // Slow wrong answers are penalized hardest
        assert!(cfg.wrong_points.fast > cfg.wrong_points.medium);
        assert!(cfg.wrong_points.medium > cfg.wrong_points.slow);
    }

    #[test]
    fn test_tables_cover_two_through_twelve() {
        let cfg = GameConfig::default();
        assert_eq!(cfg.tables.first(), Some(&2));
        assert_eq!(cfg.tables.last(), Some(&12));
        assert_eq!(cfg.tables.len(), 11);
    }
}
