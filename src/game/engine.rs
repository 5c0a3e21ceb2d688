//! Session engine
//!
//! Orchestrates one session: question generation, answer checking, win/loss
//! detection, and the flush of the session's score delta into the persistent
//! store. Constructed with injected dependencies; timestamps come from the
//! caller so the engine is fully deterministic under test.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::events::{FeedbackEvent, GameObserver, NoopObserver, SessionSummary};
use super::scoring::{Bonus, SpeedBand, score_answer};
use super::state::{Question, Session, SessionPhase};
use crate::config::GameConfig;
use crate::storage::Store;

/// Result of one `check_answer` call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnswerOutcome {
    pub correct: bool,
    pub band: SpeedBand,
    pub delta: i32,
    pub elapsed_secs: f32,
    pub bonus: Option<Bonus>,
    /// The answer ended the session (win or loss); no next question follows
    pub session_over: bool,
    /// Generation to key a scheduled question-advance on
    pub generation: u64,
}

/// The question/scoring/progression engine for one player
pub struct SessionEngine {
    config: GameConfig,
    store: Store,
    observer: Box<dyn GameObserver>,
    rng: Pcg32,
    session: Option<Session>,
    /// Bumped on every session start and end. A scheduled advance carries the
    /// generation it was created under and is dropped if it no longer
    /// matches, so a stale callback can never overwrite a newer session.
    generation: u64,
}

impl SessionEngine {
    pub fn new(config: GameConfig, store: Store, seed: u64) -> Self {
        Self {
            config,
            store,
            observer: Box::new(NoopObserver),
            rng: Pcg32::seed_from_u64(seed),
            session: None,
            generation: 0,
        }
    }

    /// Attach a presentation observer (defaults to a no-op)
    pub fn set_observer(&mut self, observer: Box<dyn GameObserver>) {
        self.observer = observer;
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Begin a new session on `topic`, discarding any previous session.
    /// Invalidates all outstanding scheduled advances.
    pub fn start(&mut self, topic: u32, now_ms: f64) {
        self.generation += 1;
        let question = self.random_question(topic);
        self.session = Some(Session::new(
            topic,
            self.config.max_lives,
            question,
            now_ms,
        ));
        log::info!("Session started: {}x table", topic);
        self.observer.question_changed(topic, question.multiplier);
    }

    /// Generate the next question for the active session. Keyed by
    /// `generation`: a call scheduled before a session ended or restarted is
    /// silently dropped. Returns whether a question was generated.
    pub fn advance(&mut self, generation: u64, now_ms: f64) -> bool {
        if generation != self.generation {
            log::debug!("Dropped stale question advance (gen {})", generation);
            return false;
        }
        let topic = match &self.session {
            Some(session) if !session.phase.is_terminal() => session.topic,
            _ => return false,
        };
        let question = self.random_question(topic);
        if let Some(session) = &mut self.session {
            session.question = question;
            session.question_started_at_ms = now_ms;
        }
        self.observer.question_changed(topic, question.multiplier);
        true
    }

    /// Check an answer against the current question. Empty or non-numeric
    /// input counts as wrong. Returns `None` when no session is accepting
    /// answers (idle or terminal).
    pub fn check_answer(&mut self, raw: &str, now_ms: f64) -> Option<AnswerOutcome> {
        let session = self.session.as_mut()?;
        if session.phase.is_terminal() {
            return None;
        }

        let question = session.question;
        let elapsed_secs =
            (((now_ms - session.question_started_at_ms) / 1000.0).max(0.0)) as f32;
        let correct = raw
            .trim()
            .parse::<i64>()
            .map(|n| n == i64::from(question.expected_answer))
            .unwrap_or(false);

        let score = score_answer(
            correct,
            elapsed_secs,
            session.correct_attempts(question.multiplier),
            session.best_time(question.multiplier),
            &self.config,
        );
        session.score_delta += score.delta;

        if correct {
            session.correct_answers += 1;
            session.record_correct(question.multiplier, elapsed_secs);
        } else {
            session.lives_remaining = session.lives_remaining.saturating_sub(1);
            let remaining = session.lives_remaining;
            self.observer.lives_changed(remaining);
        }

        let won = correct && session.correct_answers >= self.config.questions_to_win;
        let lost = !correct && session.lives_remaining == 0;

        self.observer.feedback(&FeedbackEvent {
            correct,
            band: score.band,
            delta: score.delta,
            elapsed_secs,
            bonus: score.bonus,
        });

        if won || lost {
            self.end_session(won, now_ms);
        }

        Some(AnswerOutcome {
            correct,
            band: score.band,
            delta: score.delta,
            elapsed_secs,
            bonus: score.bonus,
            session_over: won || lost,
            generation: self.generation,
        })
    }

    /// Close out the active session: flush the score delta and play time to
    /// storage, mark the terminal phase, and emit the summary. The session
    /// stays readable but inert; a new `start` is required to play again.
    fn end_session(&mut self, won: bool, now_ms: f64) {
        let Some(session) = &mut self.session else {
            return;
        };
        session.phase = if won {
            SessionPhase::Won
        } else {
            SessionPhase::Lost
        };
        let topic = session.topic;
        let correct_answers = session.correct_answers;
        let delta = session.score_delta;
        let played_secs = session.elapsed_secs(now_ms);

        let new_ranking = self.store.update_ranking(topic, delta);
        self.store.update_stats(topic, played_secs);
        self.generation += 1;

        log::info!(
            "Session over ({}): {} correct, ranking {:+} -> {}",
            if won { "won" } else { "lost" },
            correct_answers,
            delta,
            new_ranking
        );
        self.observer.session_ended(&SessionSummary {
            won,
            correct_answers,
            new_ranking,
            topic,
        });
    }

    fn random_question(&mut self, topic: u32) -> Question {
        let m = self
            .rng
            .random_range(self.config.multiplier_min..=self.config.multiplier_max);
        Question {
            multiplier: m,
            expected_answer: topic * m,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    enum Seen {
        Question(u32, u32),
        Feedback(bool, i32),
        Lives(u8),
        Ended(SessionSummary),
    }

    struct Recorder {
        seen: Rc<RefCell<Vec<Seen>>>,
    }

    impl GameObserver for Recorder {
        fn question_changed(&self, topic: u32, multiplier: u32) {
            self.seen.borrow_mut().push(Seen::Question(topic, multiplier));
        }
        fn feedback(&self, event: &FeedbackEvent) {
            self.seen
                .borrow_mut()
                .push(Seen::Feedback(event.correct, event.delta));
        }
        fn lives_changed(&self, remaining: u8) {
            self.seen.borrow_mut().push(Seen::Lives(remaining));
        }
        fn session_ended(&self, summary: &SessionSummary) {
            self.seen.borrow_mut().push(Seen::Ended(*summary));
        }
    }

    fn engine() -> (SessionEngine, Rc<RefCell<Vec<Seen>>>) {
        let mut engine = SessionEngine::new(GameConfig::default(), Store::in_memory(), 42);
        let seen = Rc::new(RefCell::new(Vec::new()));
        engine.set_observer(Box::new(Recorder { seen: seen.clone() }));
        (engine, seen)
    }

    fn current_answer(engine: &SessionEngine) -> String {
        engine.session().unwrap().question.expected_answer.to_string()
    }

    #[test]
    fn test_correct_answer_increments_score_not_lives() {
        let (mut engine, _) = engine();
        engine.start(7, 0.0);
        let answer = current_answer(&engine);
        let outcome = engine.check_answer(&answer, 2000.0).unwrap();
        assert!(outcome.correct);
        let session = engine.session().unwrap();
        assert_eq!(session.correct_answers, 1);
        assert_eq!(session.lives_remaining, 3);
    }

    #[test]
    fn test_wrong_answer_decrements_lives_not_score() {
        let (mut engine, _) = engine();
        engine.start(7, 0.0);
        let outcome = engine.check_answer("0", 2000.0).unwrap();
        assert!(!outcome.correct);
        let session = engine.session().unwrap();
        assert_eq!(session.correct_answers, 0);
        assert_eq!(session.lives_remaining, 2);
    }

    #[test]
    fn test_empty_and_garbage_input_are_wrong() {
        let (mut engine, _) = engine();
        engine.start(3, 0.0);
        assert!(!engine.check_answer("", 100.0).unwrap().correct);
        assert!(!engine.check_answer("abc", 200.0).unwrap().correct);
        // Trailing garbage does not count as the number it starts with
        let almost = format!("{}x", engine.session().unwrap().question.expected_answer);
        assert!(!engine.check_answer(&almost, 300.0).unwrap().correct);
        assert_eq!(engine.session().unwrap().lives_remaining, 0);
    }

    #[test]
    fn test_whitespace_tolerated() {
        let (mut engine, _) = engine();
        engine.start(5, 0.0);
        let padded = format!("  {}  ", engine.session().unwrap().question.expected_answer);
        assert!(engine.check_answer(&padded, 500.0).unwrap().correct);
    }

    #[test]
    fn test_loss_after_exhausting_lives() {
        let (mut engine, seen) = engine();
        engine.start(7, 0.0);
        for _ in 0..3 {
            engine.check_answer("-1", 1000.0);
        }
        let session = engine.session().unwrap();
        assert_eq!(session.phase, SessionPhase::Lost);
        let ended: Vec<_> = seen
            .borrow()
            .iter()
            .filter(|s| matches!(s, Seen::Ended(_)))
            .cloned()
            .collect();
        assert_eq!(ended.len(), 1);
        match &ended[0] {
            Seen::Ended(summary) => {
                assert!(!summary.won);
                assert_eq!(summary.topic, 7);
                // Three fast wrong answers: delta -9, clamped ranking stays 0
                assert_eq!(summary.new_ranking, 0);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_win_after_enough_correct_answers() {
        let (mut engine, seen) = engine();
        engine.start(4, 0.0);
        let mut now = 0.0;
        for _ in 0..15 {
            let answer = current_answer(&engine);
            now += 1000.0;
            let outcome = engine.check_answer(&answer, now).unwrap();
            if !outcome.session_over {
                assert!(engine.advance(outcome.generation, now));
            }
        }
        let session = engine.session().unwrap();
        assert_eq!(session.phase, SessionPhase::Won);
        assert_eq!(session.correct_answers, 15);
        let ended_won = seen.borrow().iter().any(|s| match s {
            Seen::Ended(summary) => summary.won && summary.correct_answers == 15,
            _ => false,
        });
        assert!(ended_won);
    }

    #[test]
    fn test_terminal_session_ignores_answers() {
        let (mut engine, seen) = engine();
        engine.start(7, 0.0);
        for _ in 0..3 {
            engine.check_answer("-1", 1000.0);
        }
        let before = seen.borrow().len();
        assert!(engine.check_answer("42", 2000.0).is_none());
        assert_eq!(seen.borrow().len(), before);
        assert_eq!(engine.session().unwrap().phase, SessionPhase::Lost);
    }

    #[test]
    fn test_idle_engine_ignores_answers() {
        let (mut engine, _) = engine();
        assert!(engine.check_answer("42", 0.0).is_none());
    }

    #[test]
    fn test_stale_advance_dropped_after_restart() {
        let (mut engine, _) = engine();
        engine.start(7, 0.0);
        let stale_gen = engine.generation();
        engine.start(8, 1000.0);
        // A callback scheduled under the old session must not fire into the new one
        assert!(!engine.advance(stale_gen, 2000.0));
        assert_eq!(engine.session().unwrap().topic, 8);
        assert!(engine.advance(engine.generation(), 2000.0));
    }

    #[test]
    fn test_stale_advance_dropped_after_session_end() {
        let (mut engine, _) = engine();
        engine.start(7, 0.0);
        let outcome = engine.check_answer("-1", 1000.0).unwrap();
        engine.check_answer("-1", 2000.0);
        engine.check_answer("-1", 3000.0);
        assert!(engine.session().unwrap().phase.is_terminal());
        assert!(!engine.advance(outcome.generation, 4000.0));
    }

    #[test]
    fn test_advance_restarts_question_clock() {
        let (mut engine, _) = engine();
        engine.start(6, 0.0);
        let answer = current_answer(&engine);
        let outcome = engine.check_answer(&answer, 2000.0).unwrap();
        engine.advance(outcome.generation, 10_000.0);
        // Clock starts at advance time, not answer time
        let answer = current_answer(&engine);
        let outcome = engine.check_answer(&answer, 12_000.0).unwrap();
        assert!((outcome.elapsed_secs - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_score_delta_flushed_to_ranking_on_win() {
        let (mut engine, _) = engine();
        engine.start(9, 0.0);
        let mut now = 0.0;
        for _ in 0..15 {
            let answer = current_answer(&engine);
            now += 1000.0; // every answer lands in the fast band
            let outcome = engine.check_answer(&answer, now).unwrap();
            if !outcome.session_over {
                engine.advance(outcome.generation, now);
            }
        }
        // Every answer lands well under even a fully tightened fast cut,
        // so the flushed ranking equals the session delta.
        let session = engine.session().unwrap();
        assert_eq!(engine.store().ranking(9), session.score_delta.max(0));
        assert_eq!(engine.store().stats().games_played, 1);
    }

    #[test]
    fn test_repeat_question_scores_against_tightened_thresholds() {
        let (mut engine, _) = engine();
        let mut cfg = GameConfig::default();
        // Force a single possible question so history accrues immediately
        cfg.multiplier_min = 6;
        cfg.multiplier_max = 6;
        engine.config = cfg;
        engine.start(7, 0.0);

        // First answer at 2.0s: fast, +10
        let o1 = engine.check_answer("42", 2000.0).unwrap();
        assert_eq!(o1.delta, 10);
        engine.advance(o1.generation, 2000.0);

        // Second at 2.5s: fast cut is now 2.4s, medium band, +7; prior best
        // 2.0s means no record and no consistency marker
        let o2 = engine.check_answer("42", 4500.0).unwrap();
        assert_eq!(o2.delta, 7);
        assert_eq!(o2.bonus, None);
        engine.advance(o2.generation, 4500.0);

        // Third at 1.5s: new personal record
        let o3 = engine.check_answer("42", 6000.0).unwrap();
        assert_eq!(o3.bonus, Some(Bonus::NewRecord));
    }

    #[test]
    fn test_question_multipliers_stay_in_range() {
        let (mut engine, _) = engine();
        engine.start(12, 0.0);
        for i in 0..200 {
            let q = engine.session().unwrap().question;
            assert!((1..=12).contains(&q.multiplier));
            assert_eq!(q.expected_answer, 12 * q.multiplier);
            engine.advance(engine.generation(), i as f64 * 100.0);
        }
    }
}
