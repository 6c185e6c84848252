//! Non-repeating question scheduling
//!
//! Wraps an opaque content generator and keeps a bounded sliding window of
//! recently seen question identities. When the generator cannot produce
//! anything fresh within the attempt budget, the history resets and the last
//! candidate is accepted: the game never stalls on a small content pool.

use std::collections::VecDeque;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::model::{Difficulty, Grade};
use crate::tracking::MistakeLog;

/// Recently-seen keys kept before repetition is allowed again
pub const DEFAULT_HISTORY_CAP: usize = 60;
/// Generator calls per `next` before giving up on freshness
pub const DEFAULT_MAX_ATTEMPTS: usize = 50;

/// A generated question, the minimum the core needs to know about content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// The question as shown to the learner
    pub prompt: String,
    /// The expected answer
    pub correct_answer: String,
    /// Answer options, including the correct one
    pub choices: Vec<String>,
}

/// Parameters handed to the content generator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationParams {
    pub topic: String,
    pub grade: Grade,
    pub difficulty: Difficulty,
}

/// Opaque per-subject content collaborator.
///
/// Randomized output is expected; nothing here assumes determinism.
pub trait QuestionSource {
    fn generate(&mut self, params: &GenerationParams) -> Question;
}

/// Bounded FIFO of question identities
#[derive(Debug, Clone, Default)]
struct RecentHistory {
    keys: VecDeque<String>,
    cap: usize,
}

impl RecentHistory {
    fn new(cap: usize) -> Self {
        Self { keys: VecDeque::new(), cap }
    }

    fn contains(&self, key: &str) -> bool {
        self.keys.iter().any(|seen| seen == key)
    }

    fn insert(&mut self, key: String) {
        self.keys.push_back(key);
        while self.keys.len() > self.cap {
            self.keys.pop_front();
        }
    }

    fn clear(&mut self) {
        self.keys.clear();
    }

    fn len(&self) -> usize {
        self.keys.len()
    }
}

/// Canonical identity of a question: its text, trimmed, lowercased, with
/// whitespace collapsed.
fn dedup_key(question: &Question) -> String {
    question.prompt.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

/// Scheduler enforcing no-immediate-repeat semantics over a content source
pub struct QuestionScheduler {
    history: RecentHistory,
    max_attempts: usize,
}

impl Default for QuestionScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl QuestionScheduler {
    pub fn new() -> Self {
        Self::with_limits(DEFAULT_HISTORY_CAP, DEFAULT_MAX_ATTEMPTS)
    }

    /// Explicit history cap and attempt budget
    pub fn with_limits(history_cap: usize, max_attempts: usize) -> Self {
        Self { history: RecentHistory::new(history_cap), max_attempts: max_attempts.max(1) }
    }

    /// Questions currently remembered as recently seen
    pub fn recent_len(&self) -> usize {
        self.history.len()
    }

    /// Produce the next question, avoiding anything recently seen.
    ///
    /// After `max_attempts` duplicates the history is reset and the last
    /// candidate accepted anyway, so a content pool smaller than the dedup
    /// window degrades to occasional repeats instead of a stall.
    pub fn next(&mut self, source: &mut dyn QuestionSource, params: &GenerationParams) -> Question {
        let mut candidate = source.generate(params);
        for _ in 0..self.max_attempts {
            let key = dedup_key(&candidate);
            if !self.history.contains(&key) {
                self.history.insert(key);
                return candidate;
            }
            candidate = source.generate(params);
        }

        // Attempt budget exhausted: the pool is likely smaller than the
        // dedup window. Reset and accept the repeat.
        tracing::debug!(
            topic = params.topic.as_str(),
            history = self.history.len(),
            "question pool exhausted the dedup window, resetting history"
        );
        self.history.clear();
        self.history.insert(dedup_key(&candidate));
        candidate
    }

    /// Focused-mistake mode: bias generation toward a previously missed
    /// question by borrowing the topic, grade, and difficulty of a random
    /// mistake-log entry. An empty log falls back to `params`.
    pub fn next_focused<R: Rng>(
        &mut self,
        source: &mut dyn QuestionSource,
        mistakes: &MistakeLog,
        params: &GenerationParams,
        rng: &mut R,
    ) -> Question {
        let focused = if mistakes.is_empty() {
            params.clone()
        } else {
            let pick = rng.gen_range(0..mistakes.len());
            match mistakes.iter().nth(pick) {
                Some(record) => GenerationParams {
                    topic: record.topic.clone(),
                    grade: record.grade,
                    difficulty: record.difficulty,
                },
                None => params.clone(),
            }
        };
        self.next(source, &focused)
    }

    /// Graded mode: a coarse, stateless difficulty ramp over the running
    /// correct count. Easy below 5, medium below 15, then whatever the
    /// learner selected.
    pub fn ramp(correct_count: u64, selected: Difficulty) -> Difficulty {
        if correct_count < 5 {
            Difficulty::Easy
        } else if correct_count < 15 {
            Difficulty::Medium
        } else {
            selected
        }
    }

    /// `next` with the ramped difficulty substituted in
    pub fn next_ramped(
        &mut self,
        source: &mut dyn QuestionSource,
        params: &GenerationParams,
        correct_count: u64,
    ) -> Question {
        let ramped = GenerationParams {
            difficulty: Self::ramp(correct_count, params.difficulty),
            ..params.clone()
        };
        self.next(source, &ramped)
    }
}
