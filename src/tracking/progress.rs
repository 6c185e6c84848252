//! Progress counters and advancement
//!
//! Per-topic answered/correct counters plus the XP/star/level ladder.
//! Leveling is a pure reducer over answer events; the ledger folds events and
//! persists the result, so the ladder logic stays testable without a store.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::model::{Difficulty, Grade, Subject};
use crate::store::{KeyValueStore, StoreExt};

/// XP needed per star
const XP_PER_STAR: u64 = 100;
/// XP needed per level
const XP_PER_LEVEL: u64 = 250;

/// Lifetime totals for one topic, monotonically increasing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressCounter {
    /// Questions answered
    pub answered: u64,
    /// Questions answered correctly
    pub correct: u64,
}

/// One answered question, as seen by the reducer
#[derive(Debug, Clone)]
pub struct AnswerEvent {
    /// Topic the question belonged to
    pub topic: String,
    /// Whether the answer was correct
    pub correct: bool,
    /// Grade band of the question
    pub grade: Grade,
    /// Difficulty tier of the question
    pub difficulty: Difficulty,
}

/// XP, stars, and level, derived purely from answer events
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advancement {
    pub xp: u64,
    pub stars: u32,
    pub level: u32,
}

impl Advancement {
    /// Fold one answer event into a new state. Pure; never decreases XP.
    pub fn apply(&self, event: &AnswerEvent) -> Advancement {
        let mut gained = 2;
        if event.correct {
            gained += 8;
            gained += match event.difficulty {
                Difficulty::Easy => 0,
                Difficulty::Medium => 2,
                Difficulty::Hard => 4,
            };
        }

        let xp = self.xp + gained;
        Advancement {
            xp,
            stars: (xp / XP_PER_STAR) as u32,
            level: (xp / XP_PER_LEVEL) as u32 + 1,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ProgressState {
    topics: HashMap<String, ProgressCounter>,
    advancement: Advancement,
}

/// Per-subject progress ledger
pub struct ProgressLedger {
    subject: Subject,
    store: Arc<dyn KeyValueStore>,
    state: ProgressState,
}

impl ProgressLedger {
    /// Load the ledger for `subject`, starting empty if nothing is stored
    pub fn new(subject: Subject, store: Arc<dyn KeyValueStore>) -> Self {
        let state = store.get_json(&Self::store_key(subject)).unwrap_or_default();
        Self { subject, store, state }
    }

    fn store_key(subject: Subject) -> String {
        format!("progress.{}", subject.key())
    }

    pub fn subject(&self) -> Subject {
        self.subject
    }

    /// Fold one answered question into the counters and the ladder
    pub fn record_answer(&mut self, event: &AnswerEvent) {
        let counter = self.state.topics.entry(event.topic.clone()).or_default();
        counter.answered += 1;
        if event.correct {
            counter.correct += 1;
        }

        self.state.advancement = self.state.advancement.apply(event);
        self.persist();
    }

    /// Wipe all counters and advancement for this subject.
    ///
    /// The only sanctioned decrement; everything else only grows.
    pub fn reset(&mut self) {
        self.state = ProgressState::default();
        self.persist();
    }

    fn persist(&self) {
        self.store.set_json(&Self::store_key(self.subject), &self.state);
    }

    /// Counter for one topic
    pub fn counter(&self, topic: &str) -> Option<ProgressCounter> {
        self.state.topics.get(topic).copied()
    }

    /// All per-topic counters
    pub fn counters(&self) -> impl Iterator<Item = (&str, ProgressCounter)> {
        self.state.topics.iter().map(|(topic, counter)| (topic.as_str(), *counter))
    }

    /// Questions answered correctly across every topic
    pub fn total_correct(&self) -> u64 {
        self.state.topics.values().map(|counter| counter.correct).sum()
    }

    /// Current ladder state
    pub fn advancement(&self) -> Advancement {
        self.state.advancement
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use proptest::prelude::*;

    fn ledger() -> ProgressLedger {
        ProgressLedger::new(Subject::Arithmetic, Arc::new(MemoryStore::new()))
    }

    fn answer(topic: &str, correct: bool) -> AnswerEvent {
        AnswerEvent {
            topic: topic.to_string(),
            correct,
            grade: Grade::Third,
            difficulty: Difficulty::Medium,
        }
    }

    #[test]
    fn counters_accumulate_per_topic() {
        let mut ledger = ledger();
        ledger.record_answer(&answer("fractions", true));
        ledger.record_answer(&answer("fractions", false));
        ledger.record_answer(&answer("shapes", true));

        assert_eq!(ledger.counter("fractions"), Some(ProgressCounter { answered: 2, correct: 1 }));
        assert_eq!(ledger.counter("shapes"), Some(ProgressCounter { answered: 1, correct: 1 }));
        assert_eq!(ledger.total_correct(), 2);
    }

    #[test]
    fn correct_answers_earn_more_xp() {
        let base = Advancement::default();
        let wrong = base.apply(&answer("fractions", false));
        let right = base.apply(&answer("fractions", true));

        assert_eq!(wrong.xp, 2);
        assert_eq!(right.xp, 12); // 2 base + 8 correct + 2 medium bonus
        assert!(right.xp > wrong.xp);
    }

    #[test]
    fn stars_and_level_follow_xp() {
        let mut state = Advancement::default();
        let event = answer("fractions", true);
        for _ in 0..25 {
            state = state.apply(&event);
        }

        assert_eq!(state.xp, 300);
        assert_eq!(state.stars, 3);
        assert_eq!(state.level, 2);
    }

    #[test]
    fn reset_is_the_only_decrement() {
        let mut ledger = ledger();
        ledger.record_answer(&answer("fractions", true));
        assert!(ledger.counter("fractions").is_some());

        ledger.reset();
        assert_eq!(ledger.counter("fractions"), None);
        assert_eq!(ledger.advancement(), Advancement::default());
    }

    #[test]
    fn state_survives_reload() {
        let store = Arc::new(MemoryStore::new());
        {
            let mut ledger = ProgressLedger::new(Subject::Science, store.clone());
            ledger.record_answer(&answer("plants", true));
        }

        let reloaded = ProgressLedger::new(Subject::Science, store);
        assert_eq!(reloaded.counter("plants"), Some(ProgressCounter { answered: 1, correct: 1 }));
    }

    proptest! {
        #[test]
        fn xp_never_decreases(outcomes in proptest::collection::vec(any::<bool>(), 1..100)) {
            let mut state = Advancement::default();
            for correct in outcomes {
                let next = state.apply(&answer("anything", correct));
                prop_assert!(next.xp > state.xp);
                prop_assert!(next.stars >= state.stars);
                prop_assert!(next.level >= state.level);
                state = next;
            }
        }
    }
}
