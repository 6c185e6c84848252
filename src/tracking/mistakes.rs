//! Wrong-answer log
//!
//! A bounded, append-only record of incorrect answers per subject. Appends
//! never fail; once the cap is reached the oldest record is evicted. Range
//! queries go by timestamp, and records whose stored timestamp is missing or
//! unparseable simply fall outside every range.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};

use crate::model::{Difficulty, Grade, Subject};
use crate::store::{KeyValueStore, StoreExt};

/// Default record cap per subject
pub const DEFAULT_CAP: usize = 50;

/// One incorrect answer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MistakeRecord {
    /// Topic the question belonged to
    pub topic: String,
    /// The question as shown to the learner
    pub question_text: String,
    /// The expected answer
    pub correct_answer: String,
    /// What the learner answered
    pub wrong_answer: String,
    /// Grade band the question was generated for
    pub grade: Grade,
    /// Difficulty tier of the attempt
    pub difficulty: Difficulty,
    /// When the mistake happened; `None` if the stored value was unusable
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub timestamp: Option<DateTime<Local>>,
}

impl MistakeRecord {
    /// Build a record stamped with the current local time
    pub fn new(
        topic: impl Into<String>,
        question_text: impl Into<String>,
        correct_answer: impl Into<String>,
        wrong_answer: impl Into<String>,
        grade: Grade,
        difficulty: Difficulty,
    ) -> Self {
        Self {
            topic: topic.into(),
            question_text: question_text.into(),
            correct_answer: correct_answer.into(),
            wrong_answer: wrong_answer.into(),
            grade,
            difficulty,
            timestamp: Some(Local::now()),
        }
    }
}

/// Decode a timestamp, mapping anything unusable to `None` instead of failing
/// the whole log.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Local>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(|value| value.as_str())
        .and_then(|text| DateTime::parse_from_rfc3339(text).ok())
        .map(|parsed| parsed.with_timezone(&Local)))
}

/// Windowed tally for one topic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicMistakes {
    /// Mistakes within the window
    pub count: u32,
    /// Most recent mistake within the window
    pub last_seen: DateTime<Local>,
}

/// Per-subject bounded mistake log
pub struct MistakeLog {
    subject: Subject,
    store: Arc<dyn KeyValueStore>,
    cap: usize,
    records: VecDeque<MistakeRecord>,
}

impl MistakeLog {
    /// Load the log for `subject` with the default cap
    pub fn new(subject: Subject, store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_capacity(subject, store, DEFAULT_CAP)
    }

    /// Load the log for `subject` with an explicit cap
    pub fn with_capacity(subject: Subject, store: Arc<dyn KeyValueStore>, cap: usize) -> Self {
        let records = store.get_json(&Self::store_key(subject)).unwrap_or_default();
        let mut log = Self { subject, store, cap, records };
        log.enforce_cap();
        log
    }

    fn store_key(subject: Subject) -> String {
        format!("mistakes.{}", subject.key())
    }

    pub fn subject(&self) -> Subject {
        self.subject
    }

    /// Append a record, evicting the oldest when the cap is exceeded
    pub fn append(&mut self, record: MistakeRecord) {
        self.records.push_back(record);
        self.enforce_cap();
        self.persist();
    }

    fn enforce_cap(&mut self) {
        while self.records.len() > self.cap {
            self.records.pop_front();
        }
    }

    fn persist(&self) {
        self.store.set_json(&Self::store_key(self.subject), &self.records);
    }

    /// Records whose timestamp falls within `[start, end]`, inclusive
    pub fn query_range(&self, start: NaiveDate, end: NaiveDate) -> Vec<&MistakeRecord> {
        self.records
            .iter()
            .filter(|record| in_range(record, start, end))
            .collect()
    }

    /// Per-topic counts within the window, with the most recent timestamp
    /// kept per topic for "recently struggling" signals
    pub fn count_by_topic(&self, start: NaiveDate, end: NaiveDate) -> HashMap<String, TopicMistakes> {
        let mut tallies: HashMap<String, TopicMistakes> = HashMap::new();
        for record in self.records.iter().filter(|record| in_range(record, start, end)) {
            let Some(timestamp) = record.timestamp else { continue };
            tallies
                .entry(record.topic.clone())
                .and_modify(|tally| {
                    tally.count += 1;
                    if timestamp > tally.last_seen {
                        tally.last_seen = timestamp;
                    }
                })
                .or_insert(TopicMistakes { count: 1, last_seen: timestamp });
        }
        tallies
    }

    /// Empty the log. Explicit and irreversible.
    pub fn clear(&mut self) {
        self.records.clear();
        self.persist();
    }

    /// All records, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &MistakeRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn in_range(record: &MistakeRecord, start: NaiveDate, end: NaiveDate) -> bool {
    match record.timestamp {
        Some(timestamp) => {
            let day = timestamp.date_naive();
            day >= start && day <= end
        }
        None => false,
    }
}
