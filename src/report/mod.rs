//! Parent-facing progress reports
//!
//! Assembles the windowed aggregate, tiered recommendations, and achievements
//! into one read-only structure the presentation layer can render or export.

pub mod aggregate;
pub mod recommend;
pub mod window;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use aggregate::{AggregateWindow, DailyActivity, Mode, SubjectTelemetry, TopicSnapshot};
pub use recommend::{Recommendation, RecommendationKind, Thresholds, Tier};
pub use window::{ReportWindow, WindowError};

use crate::model::Subject;
use crate::tracking::StreakTracker;

/// Window-wide totals for the report header
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total_questions: u64,
    pub total_correct: u64,
    pub accuracy_pct: u32,
    pub total_minutes: u64,
    /// Days with any activity inside the window
    pub active_days: usize,
    /// Current streak length
    pub streak_days: u32,
}

/// Something worth celebrating on the report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    pub title: String,
    pub detail: String,
}

/// The full report handed to the presentation layer.
///
/// A read-only snapshot, safe to serialize for display or export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressReport {
    pub summary: ReportSummary,
    pub per_subject_topics: BTreeMap<Subject, Vec<TopicSnapshot>>,
    pub daily_activity: Vec<DailyActivity>,
    pub recommendations: Vec<Recommendation>,
    pub achievements: Vec<Achievement>,
}

/// Build the full report for one window
pub fn build_report(
    subjects: &[SubjectTelemetry<'_>],
    streak: &StreakTracker,
    window: &ReportWindow,
    thresholds: &Thresholds,
) -> ProgressReport {
    let aggregated = aggregate::aggregate(subjects, window);
    let recommendations = recommend::classify_window(&aggregated, thresholds);

    let mut per_subject_topics: BTreeMap<Subject, Vec<TopicSnapshot>> =
        subjects.iter().map(|telemetry| (telemetry.subject, Vec::new())).collect();
    for snapshot in &aggregated.topics {
        per_subject_topics.entry(snapshot.subject).or_default().push(snapshot.clone());
    }

    let total_questions: u64 = aggregated.topics.iter().map(|topic| topic.questions).sum();
    let total_correct: u64 = aggregated.topics.iter().map(|topic| topic.correct).sum();
    let total_seconds: u64 =
        aggregated.daily_activity.iter().map(|day| day.total_seconds).sum();
    let summary = ReportSummary {
        total_questions,
        total_correct,
        accuracy_pct: aggregate::accuracy_pct(total_correct, total_questions),
        total_minutes: total_seconds / 60,
        active_days: aggregated.daily_activity.len(),
        streak_days: streak.count(),
    };

    let mut achievements = Vec::new();
    if let Some(tier) = streak.reward_tier() {
        achievements.push(Achievement {
            title: format!("{}-day practice streak", streak.count()),
            detail: format!("{tier} streak reward"),
        });
    }
    for telemetry in subjects {
        let advancement = telemetry.progress.advancement();
        if advancement.stars > 0 {
            achievements.push(Achievement {
                title: format!("{} stars in {}", advancement.stars, telemetry.subject),
                detail: format!("level {} ({} XP)", advancement.level, advancement.xp),
            });
        }
    }

    ProgressReport {
        summary,
        per_subject_topics,
        daily_activity: aggregated.daily_activity,
        recommendations,
        achievements,
    }
}
