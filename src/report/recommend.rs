//! Tiered recommendations
//!
//! Turns one topic snapshot into one prioritized, explainable recommendation.
//! Promotion is tested first, then the sparse-data guard, then the struggle
//! and improvement tiers. Every message carries the numbers behind it so the
//! output is auditable, not just categorical.

use serde::{Deserialize, Serialize};

use super::aggregate::{AggregateWindow, Mode, TopicSnapshot};
use crate::model::Subject;

/// Numeric bars for every tier.
///
/// Tuned values, not invariants; override wholesale to experiment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thresholds {
    /// Promotion bar
    pub promote_accuracy: u32,
    pub promote_questions: u64,
    pub promote_minutes: u64,
    /// Stricter bar allowing a grade step-up below the hardest difficulty
    pub super_accuracy: u32,
    pub super_questions: u64,
    pub super_minutes: u64,
    /// Below either of these the signal is too sparse to judge
    pub sparse_questions: u64,
    pub sparse_minutes: u64,
    /// Struggle bar
    pub struggle_accuracy: u32,
    pub struggle_questions: u64,
    pub struggle_mistakes: u32,
    /// Below this accuracy a topic is "improving"
    pub improving_accuracy: u32,
    /// Bar for the calmest tier; accuracy alone is not enough
    pub solid_accuracy: u32,
    pub solid_questions: u64,
    pub solid_minutes: u64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            promote_accuracy: 92,
            promote_questions: 40,
            promote_minutes: 20,
            super_accuracy: 97,
            super_questions: 80,
            super_minutes: 30,
            sparse_questions: 10,
            sparse_minutes: 5,
            struggle_accuracy: 65,
            struggle_questions: 10,
            struggle_mistakes: 10,
            improving_accuracy: 80,
            solid_accuracy: 85,
            solid_questions: 15,
            solid_minutes: 10,
        }
    }
}

/// Priority class of a recommendation; variants are declared in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Success,
    High,
    Medium,
    Low,
}

impl Tier {
    /// 0 is highest priority
    pub fn priority_rank(&self) -> u8 {
        match self {
            Tier::Success => 0,
            Tier::High => 1,
            Tier::Medium => 2,
            Tier::Low => 3,
        }
    }
}

/// Machine-readable reason behind a recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    StepUpDifficulty,
    StepUpGrade,
    StepUpBoth,
    DoingGreat,
    InsufficientData,
    NeedsPractice,
    Improving,
    Solid,
    KeepGoing,
}

/// One prioritized, explainable recommendation for one topic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub subject: Subject,
    pub topic: String,
    pub tier: Tier,
    pub kind: RecommendationKind,
    pub message: String,
    pub priority_rank: u8,
}

/// Classify one topic snapshot. Pure.
pub fn classify(
    snapshot: &TopicSnapshot,
    mistakes_in_window: u32,
    thresholds: &Thresholds,
) -> Recommendation {
    let accuracy = snapshot.accuracy_pct;
    let questions = snapshot.questions;
    let minutes = snapshot.time_minutes;
    let evidence = format!("{accuracy}% accuracy, {questions} questions, {minutes} min");

    let build = |tier: Tier, kind: RecommendationKind, message: String| Recommendation {
        subject: snapshot.subject,
        topic: snapshot.topic.clone(),
        tier,
        kind,
        message,
        priority_rank: tier.priority_rank(),
    };

    // Promotion is tested before the sparse-data guard: a topic that clears
    // the full promotion bar has plenty of signal by construction.
    let promotes = accuracy >= thresholds.promote_accuracy
        && questions >= thresholds.promote_questions
        && minutes >= thresholds.promote_minutes;
    if promotes {
        let super_bar = accuracy >= thresholds.super_accuracy
            && questions >= thresholds.super_questions
            && minutes >= thresholds.super_minutes;

        let difficulty_up = match snapshot.most_common_difficulty {
            Mode::Known(difficulty) => difficulty.next(),
            Mode::Unavailable => None,
        };
        let at_hardest = snapshot
            .most_common_difficulty
            .known()
            .is_some_and(|difficulty| difficulty.is_hardest());
        let grade_up = if at_hardest || super_bar {
            snapshot.most_common_grade.known().and_then(|grade| grade.next())
        } else {
            None
        };

        let (kind, advice) = match (difficulty_up, grade_up) {
            (Some(difficulty), Some(grade)) => (
                RecommendationKind::StepUpBoth,
                format!("ready for {difficulty} difficulty and grade {grade} material"),
            ),
            (Some(difficulty), None) => (
                RecommendationKind::StepUpDifficulty,
                format!("ready to move up to {difficulty} difficulty"),
            ),
            (None, Some(grade)) => {
                (RecommendationKind::StepUpGrade, format!("ready for grade {grade} material"))
            }
            (None, None) => {
                (RecommendationKind::DoingGreat, "doing great at the current level".to_string())
            }
        };
        return build(Tier::Success, kind, format!("{evidence}: {advice}."));
    }

    if questions < thresholds.sparse_questions || minutes < thresholds.sparse_minutes {
        return build(
            Tier::Medium,
            RecommendationKind::InsufficientData,
            format!("{evidence}: not enough play yet for a reliable reading."),
        );
    }

    let low_accuracy = accuracy < thresholds.struggle_accuracy
        && questions >= thresholds.struggle_questions;
    let many_mistakes = mistakes_in_window >= thresholds.struggle_mistakes;
    if low_accuracy || many_mistakes {
        let mut reasons = Vec::new();
        if low_accuracy {
            reasons.push(format!("accuracy is down at {accuracy}%"));
        }
        if many_mistakes {
            reasons.push(format!("{mistakes_in_window} mistakes this period"));
        }
        if minutes < thresholds.solid_minutes {
            reasons.push(format!("only {minutes} min practiced"));
        }
        return build(
            Tier::High,
            RecommendationKind::NeedsPractice,
            format!("{evidence}: needs practice ({}).", reasons.join(", ")),
        );
    }

    if accuracy < thresholds.improving_accuracy {
        return build(
            Tier::Medium,
            RecommendationKind::Improving,
            format!("{evidence}: improving, keep up the regular practice."),
        );
    }

    if accuracy >= thresholds.solid_accuracy
        && questions >= thresholds.solid_questions
        && minutes >= thresholds.solid_minutes
    {
        return build(
            Tier::Low,
            RecommendationKind::Solid,
            format!("{evidence}: solid, steady work at this level."),
        );
    }

    build(
        Tier::Medium,
        RecommendationKind::KeepGoing,
        format!("{evidence}: looking good, more questions and time before stepping up."),
    )
}

/// Classify every topic in the window and sort by tier priority
pub fn classify_window(aggregate: &AggregateWindow, thresholds: &Thresholds) -> Vec<Recommendation> {
    let mut recommendations: Vec<Recommendation> = aggregate
        .topics
        .iter()
        .map(|snapshot| {
            let mistakes = aggregate
                .mistakes
                .get(&snapshot.subject)
                .and_then(|topics| topics.get(&snapshot.topic))
                .map(|tally| tally.count)
                .unwrap_or(0);
            classify(snapshot, mistakes, thresholds)
        })
        .collect();

    recommendations.sort_by(|a, b| {
        (a.tier, a.subject, &a.topic).cmp(&(b.tier, b.subject, &b.topic))
    });
    recommendations
}
