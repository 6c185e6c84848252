//! Practice-time telemetry
//!
//! Accumulates practice duration per subject, keyed by calendar day and by
//! topic. Day boundaries follow the device's local calendar day at event
//! time; there is no timezone normalization.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::model::{Difficulty, Grade, PracticeEvent, Subject};
use crate::store::{KeyValueStore, StoreExt};

/// Sessions kept per topic before the oldest are evicted
const SESSION_CAP: usize = 1000;

const DAY_KEY_FORMAT: &str = "%Y-%m-%d";

/// Render a date as a stored day key (`YYYY-MM-DD`)
pub fn day_key(date: NaiveDate) -> String {
    date.format(DAY_KEY_FORMAT).to_string()
}

/// Parse a stored day key back to a date
pub fn parse_day_key(key: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(key, DAY_KEY_FORMAT).ok()
}

/// Everything recorded for one calendar day
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DailyBucket {
    /// Total practice time for the day
    pub total_seconds: u64,
    /// Time per topic; sums to `total_seconds`
    pub per_topic_seconds: HashMap<String, u64>,
    /// Time per grade band
    pub per_grade_seconds: HashMap<Grade, u64>,
    /// Time per difficulty tier
    pub per_difficulty_seconds: HashMap<Difficulty, u64>,
}

impl DailyBucket {
    fn fold(&mut self, event: &PracticeEvent) {
        self.total_seconds += event.duration_seconds;
        *self.per_topic_seconds.entry(event.topic.clone()).or_default() +=
            event.duration_seconds;
        *self.per_grade_seconds.entry(event.grade).or_default() += event.duration_seconds;
        *self.per_difficulty_seconds.entry(event.difficulty).or_default() +=
            event.duration_seconds;
    }
}

/// Lifetime accumulation for one topic
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TopicAccumulator {
    /// Total practice time on this topic
    pub total_seconds: u64,
    /// Recent session records, oldest first (bounded FIFO)
    pub sessions: VecDeque<PracticeEvent>,
    /// Time per grade band
    pub per_grade_seconds: HashMap<Grade, u64>,
    /// Time per difficulty tier
    pub per_difficulty_seconds: HashMap<Difficulty, u64>,
}

impl TopicAccumulator {
    fn fold(&mut self, event: PracticeEvent) {
        self.total_seconds += event.duration_seconds;
        *self.per_grade_seconds.entry(event.grade).or_default() += event.duration_seconds;
        *self.per_difficulty_seconds.entry(event.difficulty).or_default() +=
            event.duration_seconds;

        self.sessions.push_back(event);
        while self.sessions.len() > SESSION_CAP {
            self.sessions.pop_front();
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct TimeState {
    daily: HashMap<String, DailyBucket>,
    topics: HashMap<String, TopicAccumulator>,
}

/// One day inside a [`TimeWindowSummary`], for time-series charting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayActivity {
    pub date: NaiveDate,
    pub total_seconds: u64,
    pub per_topic_seconds: HashMap<String, u64>,
}

/// Aggregated result of a range query
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimeWindowSummary {
    /// Total seconds across every day in the window
    pub total_seconds: u64,
    /// Seconds per topic across the window
    pub per_topic_seconds: HashMap<String, u64>,
    /// Per-day entries, sorted by date
    pub days: Vec<DayActivity>,
}

/// Per-subject practice-time tracker
pub struct TimeTracker {
    subject: Subject,
    store: Arc<dyn KeyValueStore>,
    state: TimeState,
}

impl TimeTracker {
    /// Load the tracker for `subject`, starting empty if nothing is stored
    pub fn new(subject: Subject, store: Arc<dyn KeyValueStore>) -> Self {
        let state = store.get_json(&Self::store_key(subject)).unwrap_or_default();
        Self { subject, store, state }
    }

    fn store_key(subject: Subject) -> String {
        format!("time.{}", subject.key())
    }

    pub fn subject(&self) -> Subject {
        self.subject
    }

    /// Record one practice event at the current local time.
    ///
    /// A zero duration or an empty topic is rejected as a no-op.
    pub fn record(
        &mut self,
        topic: &str,
        grade: Grade,
        difficulty: Difficulty,
        duration_seconds: u64,
    ) {
        self.record_at(topic, grade, difficulty, duration_seconds, Local::now());
    }

    /// Record one practice event at an explicit timestamp
    pub fn record_at(
        &mut self,
        topic: &str,
        grade: Grade,
        difficulty: Difficulty,
        duration_seconds: u64,
        when: DateTime<Local>,
    ) {
        if duration_seconds == 0 || topic.trim().is_empty() {
            return;
        }

        let event = PracticeEvent {
            topic: topic.to_string(),
            grade,
            difficulty,
            duration_seconds,
            timestamp: when,
        };

        // Fold into the day bucket and the topic accumulator, then persist
        // both in one write so they stay consistent with each other.
        let key = day_key(when.date_naive());
        self.state.daily.entry(key).or_default().fold(&event);
        self.state.topics.entry(event.topic.clone()).or_default().fold(event);

        self.store.set_json(&Self::store_key(self.subject), &self.state);
    }

    /// Aggregate every stored day whose key falls within `[start, end]`.
    ///
    /// An inverted range matches nothing; unparseable day keys are skipped.
    pub fn query_range(&self, start: NaiveDate, end: NaiveDate) -> TimeWindowSummary {
        let mut summary = TimeWindowSummary::default();
        if start > end {
            return summary;
        }

        for (key, bucket) in &self.state.daily {
            let Some(date) = parse_day_key(key) else {
                tracing::warn!("skipping unparseable day key {key:?}");
                continue;
            };
            if date < start || date > end {
                continue;
            }

            summary.total_seconds += bucket.total_seconds;
            for (topic, seconds) in &bucket.per_topic_seconds {
                *summary.per_topic_seconds.entry(topic.clone()).or_default() += seconds;
            }
            summary.days.push(DayActivity {
                date,
                total_seconds: bucket.total_seconds,
                per_topic_seconds: bucket.per_topic_seconds.clone(),
            });
        }

        summary.days.sort_by_key(|day| day.date);
        summary
    }

    /// Lifetime session records for `topic`, oldest first
    pub fn sessions(&self, topic: &str) -> impl Iterator<Item = &PracticeEvent> {
        self.state.topics.get(topic).into_iter().flat_map(|acc| acc.sessions.iter())
    }

    /// Topics with any lifetime practice time
    pub fn topics(&self) -> impl Iterator<Item = &str> {
        self.state.topics.keys().map(String::as_str)
    }
}
