//! Persisted rankings and play statistics
//!
//! One JSON record in LocalStorage holds everything durable: per-table
//! rankings and aggregate play stats. Reads and writes are synchronous; every
//! update persists the whole record before returning. Missing or corrupt data
//! falls back to a fresh default record.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::MedalThresholds;

/// Aggregate play statistics. Append-only accumulation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub games_played: u64,
    pub total_seconds: u64,
    #[serde(default)]
    pub per_topic_seconds: BTreeMap<u32, u64>,
    #[serde(default)]
    pub per_topic_games: BTreeMap<u32, u64>,
}

/// The single persisted record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveData {
    /// Cumulative score per table, clamped at zero
    #[serde(default)]
    pub rankings: BTreeMap<u32, i32>,
    #[serde(default)]
    pub stats: Stats,
}

/// Medal tier shown next to a table's ranking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Medal {
    Bronze,
    Silver,
    Gold,
}

impl Medal {
    pub fn emoji(&self) -> &'static str {
        match self {
            Medal::Bronze => "\u{1f949}",
            Medal::Silver => "\u{1f948}",
            Medal::Gold => "\u{1f947}",
        }
    }
}

/// Medal earned by a ranking, if any
pub fn medal_for(ranking: i32, medals: &MedalThresholds) -> Option<Medal> {
    if ranking >= medals.gold {
        Some(Medal::Gold)
    } else if ranking >= medals.silver {
        Some(Medal::Silver)
    } else if ranking >= medals.bronze {
        Some(Medal::Bronze)
    } else {
        None
    }
}

/// Durable store for rankings and stats. Sole writer of persisted state.
#[derive(Debug, Clone)]
pub struct Store {
    data: SaveData,
}

impl Store {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "zombie_tables_data";

    /// A store with no persistence backing (native builds and tests)
    pub fn in_memory() -> Self {
        Self {
            data: SaveData::default(),
        }
    }

    /// Load the record from LocalStorage (WASM only). First use writes the
    /// default record so later reads always see a valid one.
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str::<SaveData>(&json) {
                    Ok(data) => {
                        log::info!("Loaded player record ({} tables ranked)", data.rankings.len());
                        return Self { data };
                    }
                    Err(e) => {
                        log::warn!("Corrupt player record, reinitializing: {}", e);
                    }
                }
            }
        }

        log::info!("No player record found, starting fresh");
        let store = Self::in_memory();
        store.persist();
        store
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::in_memory()
    }

    /// Write the whole record back (WASM only)
    #[cfg(target_arch = "wasm32")]
    fn persist(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(&self.data) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn persist(&self) {
        // No-op for native
    }

    /// Ranking for a table, zero if unseen
    pub fn ranking(&self, topic: u32) -> i32 {
        self.data.rankings.get(&topic).copied().unwrap_or(0)
    }

    /// All per-table rankings, ascending by table
    pub fn rankings(&self) -> &BTreeMap<u32, i32> {
        &self.data.rankings
    }

    /// Apply `max(0, current + delta)`, persist, and return the new value
    pub fn update_ranking(&mut self, topic: u32, delta: i32) -> i32 {
        let entry = self.data.rankings.entry(topic).or_insert(0);
        *entry = entry.saturating_add(delta).max(0);
        let new_ranking = *entry;
        self.persist();
        new_ranking
    }

    /// Accumulate one finished game into the aggregate counters
    pub fn update_stats(&mut self, topic: u32, seconds_played: u64) {
        let stats = &mut self.data.stats;
        stats.games_played += 1;
        stats.total_seconds += seconds_played;
        *stats.per_topic_seconds.entry(topic).or_insert(0) += seconds_played;
        *stats.per_topic_games.entry(topic).or_insert(0) += 1;
        self.persist();
    }

    pub fn stats(&self) -> &Stats {
        &self.data.stats
    }

    /// Table with the most finished games. Ties go to the lowest table id
    /// (the record's iteration order).
    pub fn most_played_topic(&self) -> Option<u32> {
        let mut best: Option<(u32, u64)> = None;
        for (&topic, &games) in &self.data.stats.per_topic_games {
            if games > 0 && best.map(|(_, g)| games > g).unwrap_or(true) {
                best = Some((topic, games));
            }
        }
        best.map(|(topic, _)| topic)
    }
}

/// Format seconds of play time for the stats screen
pub fn format_play_time(seconds: u64) -> String {
    if seconds < 60 {
        format!("{}s", seconds)
    } else if seconds < 3600 {
        format!("{}m {}s", seconds / 60, seconds % 60)
    } else {
        format!("{}h {}m", seconds / 3600, (seconds % 3600) / 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_unseen_topic_ranks_zero() {
        let store = Store::in_memory();
        assert_eq!(store.ranking(7), 0);
    }

    #[test]
    fn test_ranking_never_drops_below_zero() {
        let mut store = Store::in_memory();
        assert_eq!(store.update_ranking(7, -50), 0);
        assert_eq!(store.update_ranking(7, 30), 30);
        assert_eq!(store.update_ranking(7, -100), 0);
    }

    #[test]
    fn test_ranking_accumulates_across_sessions() {
        let mut store = Store::in_memory();
        store.update_ranking(3, 40);
        store.update_ranking(3, 25);
        assert_eq!(store.ranking(3), 65);
        // Other tables unaffected
        assert_eq!(store.ranking(4), 0);
    }

    #[test]
    fn test_stats_accumulate() {
        let mut store = Store::in_memory();
        store.update_stats(7, 90);
        store.update_stats(7, 30);
        store.update_stats(9, 60);
        let stats = store.stats();
        assert_eq!(stats.games_played, 3);
        assert_eq!(stats.total_seconds, 180);
        assert_eq!(stats.per_topic_seconds.get(&7), Some(&120));
        assert_eq!(stats.per_topic_games.get(&7), Some(&2));
        assert_eq!(stats.per_topic_games.get(&9), Some(&1));
    }

    #[test]
    fn test_most_played_topic_tie_goes_to_lowest() {
        let mut store = Store::in_memory();
        assert_eq!(store.most_played_topic(), None);
        store.update_stats(9, 10);
        store.update_stats(4, 10);
        assert_eq!(store.most_played_topic(), Some(4));
        store.update_stats(9, 10);
        assert_eq!(store.most_played_topic(), Some(9));
    }

    #[test]
    fn test_record_round_trips_through_json() {
        let mut store = Store::in_memory();
        store.update_ranking(7, 42);
        store.update_stats(7, 123);
        let json = serde_json::to_string(&store.data).unwrap();
        let back: SaveData = serde_json::from_str(&json).unwrap();
        assert_eq!(back, store.data);
    }

    #[test]
    fn test_corrupt_record_parses_to_default() {
        // Missing fields deserialize as defaults rather than failing
        let data: SaveData = serde_json::from_str("{}").unwrap();
        assert_eq!(data, SaveData::default());
    }

    #[test]
    fn test_medal_cutoffs() {
        let medals = crate::config::GameConfig::default().medals;
        assert_eq!(medal_for(99, &medals), None);
        assert_eq!(medal_for(100, &medals), Some(Medal::Bronze));
        assert_eq!(medal_for(250, &medals), Some(Medal::Silver));
        assert_eq!(medal_for(500, &medals), Some(Medal::Gold));
        assert_eq!(medal_for(9999, &medals), Some(Medal::Gold));
    }

    #[test]
    fn test_format_play_time() {
        assert_eq!(format_play_time(42), "42s");
        assert_eq!(format_play_time(192), "3m 12s");
        assert_eq!(format_play_time(3900), "1h 5m");
    }

    proptest! {
        #[test]
        fn prop_ranking_never_negative(deltas in prop::collection::vec(-200i32..200, 0..20)) {
            let mut store = Store::in_memory();
            for d in deltas {
                prop_assert!(store.update_ranking(5, d) >= 0);
            }
        }

        #[test]
        fn prop_split_deltas_equal_combined_without_clamping(
            base in 0i32..1000,
            d1 in 0i32..500,
            d2 in 0i32..500,
        ) {
            // Associativity of clamped accumulation when no intermediate
            // clamp occurs (all deltas non-negative here)
            let mut split = Store::in_memory();
            split.update_ranking(2, base);
            split.update_ranking(2, d1);
            let split_result = split.update_ranking(2, d2);

            let mut combined = Store::in_memory();
            combined.update_ranking(2, base);
            let combined_result = combined.update_ranking(2, d1 + d2);

            prop_assert_eq!(split_result, combined_result);
        }
    }
}
