//! Period aggregation
//!
//! Rolls time telemetry, mistake tallies, and progress counters across all
//! subjects into one unified statistical snapshot for a reporting window.
//! Snapshots are computed on demand and never persisted.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::window::ReportWindow;
use crate::model::{Difficulty, Grade, Subject};
use crate::tracking::mistakes::TopicMistakes;
use crate::tracking::{MistakeLog, ProgressLedger, TimeTracker};

/// A statistic that may be absent; renders as "unavailable" instead of null
/// so report output stays total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode<T> {
    Known(T),
    Unavailable,
}

impl<T> Mode<T> {
    pub fn known(&self) -> Option<&T> {
        match self {
            Mode::Known(value) => Some(value),
            Mode::Unavailable => None,
        }
    }
}

impl<T: fmt::Display> fmt::Display for Mode<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Known(value) => value.fmt(f),
            Mode::Unavailable => f.write_str("unavailable"),
        }
    }
}

/// One topic's activity within the reporting window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicSnapshot {
    pub subject: Subject,
    pub topic: String,
    /// Questions answered (lifetime counters; the store keeps no windowed ones)
    pub questions: u64,
    /// Of those, answered correctly
    pub correct: u64,
    /// `round(correct / questions * 100)`, 0 when `questions == 0`
    pub accuracy_pct: u32,
    /// Practice minutes within the window, rounded to the nearest minute
    pub time_minutes: u64,
    /// Most common grade across this topic's session records
    pub most_common_grade: Mode<Grade>,
    /// Most common difficulty across this topic's session records
    pub most_common_difficulty: Mode<Difficulty>,
}

/// One row of the cross-subject activity chart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyActivity {
    pub date: NaiveDate,
    pub total_seconds: u64,
    /// Every subject appears, zero-filled where it had no activity
    pub per_subject_seconds: BTreeMap<Subject, u64>,
}

/// Borrowed view of one subject's trackers, the aggregation input
pub struct SubjectTelemetry<'a> {
    pub subject: Subject,
    pub time: &'a TimeTracker,
    pub mistakes: &'a MistakeLog,
    pub progress: &'a ProgressLedger,
}

/// Everything the classifier and report builder need for one window
#[derive(Debug, Default)]
pub struct AggregateWindow {
    /// One snapshot per topic with activity, sorted by subject then topic
    pub topics: Vec<TopicSnapshot>,
    /// Union of active days across subjects, sorted by date
    pub daily_activity: Vec<DailyActivity>,
    /// Windowed mistake tallies per subject and topic
    pub mistakes: HashMap<Subject, HashMap<String, TopicMistakes>>,
}

/// Round seconds to whole minutes
fn minutes(seconds: u64) -> u64 {
    (seconds + 30) / 60
}

/// `round(correct / questions * 100)`, 0 when `questions == 0`
pub fn accuracy_pct(correct: u64, questions: u64) -> u32 {
    if questions == 0 {
        return 0;
    }
    ((correct as f64 / questions as f64) * 100.0).round() as u32
}

/// Mode with ties broken by first encounter
fn mode_of<T: Copy + PartialEq>(values: impl Iterator<Item = T>) -> Mode<T> {
    let mut tallies: Vec<(T, u32)> = Vec::new();
    for value in values {
        match tallies.iter_mut().find(|(seen, _)| *seen == value) {
            Some((_, count)) => *count += 1,
            None => tallies.push((value, 1)),
        }
    }

    let mut best: Option<(T, u32)> = None;
    for (value, count) in tallies {
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((value, count));
        }
    }
    match best {
        Some((value, _)) => Mode::Known(value),
        None => Mode::Unavailable,
    }
}

/// Aggregate all subjects over `window`.
///
/// An inverted window yields an empty aggregate rather than an error.
pub fn aggregate(subjects: &[SubjectTelemetry<'_>], window: &ReportWindow) -> AggregateWindow {
    let mut result = AggregateWindow::default();
    if window.start > window.end {
        return result;
    }

    let mut by_date: BTreeMap<NaiveDate, BTreeMap<Subject, u64>> = BTreeMap::new();

    for telemetry in subjects {
        let time = telemetry.time.query_range(window.start, window.end);
        result
            .mistakes
            .insert(telemetry.subject, telemetry.mistakes.count_by_topic(window.start, window.end));

        for day in &time.days {
            by_date.entry(day.date).or_default().insert(telemetry.subject, day.total_seconds);
        }

        if time.days.is_empty() {
            // No windowed time series for this subject: fall back to lifetime
            // counters so the report is never silently empty.
            for (topic, counter) in telemetry.progress.counters() {
                if counter.answered == 0 {
                    continue;
                }
                result.topics.push(snapshot(telemetry, topic, counter.answered, counter.correct, 0));
            }
            continue;
        }

        for (topic, seconds) in &time.per_topic_seconds {
            let counter = telemetry.progress.counter(topic).unwrap_or_default();
            let time_minutes = minutes(*seconds);
            if time_minutes == 0 && counter.answered == 0 {
                continue;
            }
            result.topics.push(snapshot(
                telemetry,
                topic,
                counter.answered,
                counter.correct,
                time_minutes,
            ));
        }
    }

    for (date, per_subject) in by_date {
        let per_subject_seconds: BTreeMap<Subject, u64> = subjects
            .iter()
            .map(|telemetry| {
                (telemetry.subject, per_subject.get(&telemetry.subject).copied().unwrap_or(0))
            })
            .collect();
        let total_seconds = per_subject_seconds.values().sum();
        result.daily_activity.push(DailyActivity { date, total_seconds, per_subject_seconds });
    }

    result.topics.sort_by(|a, b| (a.subject, &a.topic).cmp(&(b.subject, &b.topic)));
    result
}

fn snapshot(
    telemetry: &SubjectTelemetry<'_>,
    topic: &str,
    questions: u64,
    correct: u64,
    time_minutes: u64,
) -> TopicSnapshot {
    TopicSnapshot {
        subject: telemetry.subject,
        topic: topic.to_string(),
        questions,
        correct,
        accuracy_pct: accuracy_pct(correct, questions),
        time_minutes,
        most_common_grade: mode_of(telemetry.time.sessions(topic).map(|event| event.grade)),
        most_common_difficulty: mode_of(
            telemetry.time.sessions(topic).map(|event| event.difficulty),
        ),
    }
}
