//! Zombie Tables - a multiplication-table survival drill for the browser
//!
//! Core modules:
//! - `game`: question/scoring/progression engine (deterministic, platform-free)
//! - `storage`: persisted per-table rankings and play statistics (LocalStorage on web)
//! - `config`: data-driven game balance
//! - `audio`: procedural Web Audio sound effects (wasm only)
//! - `ui`: DOM screen management and keyboard navigation (wasm only)

pub mod config;
pub mod game;
pub mod storage;

#[cfg(target_arch = "wasm32")]
pub mod audio;
#[cfg(target_arch = "wasm32")]
pub mod ui;

pub use config::GameConfig;
pub use game::{AnswerOutcome, SessionEngine};
pub use storage::Store;
