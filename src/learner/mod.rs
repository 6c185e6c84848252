//! Learner-facing facade
//!
//! Wires one set of trackers per subject over a shared store handle and
//! exposes the few entry points gameplay and the report screen actually
//! call. The presentation layer holds one [`LearnerProfile`] per device.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::model::{Difficulty, Grade, Subject};
use crate::report::{self, ProgressReport, ReportWindow, SubjectTelemetry, Thresholds};
use crate::store::KeyValueStore;
use crate::tracking::{
    AnswerEvent, CheckIn, MistakeLog, MistakeRecord, ProgressLedger, StreakTracker, TimeTracker,
};

/// Everything gameplay reports about one answered exercise
#[derive(Debug, Clone)]
pub struct AnswerOutcome {
    pub subject: Subject,
    pub topic: String,
    pub grade: Grade,
    pub difficulty: Difficulty,
    pub correct: bool,
    /// Time spent on the exercise, in seconds
    pub duration_seconds: u64,
    pub question_text: String,
    pub correct_answer: String,
    pub given_answer: String,
}

/// One subject's trackers
pub struct SubjectState {
    time: TimeTracker,
    mistakes: MistakeLog,
    progress: ProgressLedger,
}

impl SubjectState {
    fn new(subject: Subject, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            time: TimeTracker::new(subject, store.clone()),
            mistakes: MistakeLog::new(subject, store.clone()),
            progress: ProgressLedger::new(subject, store),
        }
    }

    pub fn time(&self) -> &TimeTracker {
        &self.time
    }

    pub fn mistakes(&self) -> &MistakeLog {
        &self.mistakes
    }

    /// Mutable log access, e.g. for the explicit clear action
    pub fn mistakes_mut(&mut self) -> &mut MistakeLog {
        &mut self.mistakes
    }

    pub fn progress(&self) -> &ProgressLedger {
        &self.progress
    }

    /// Mutable ledger access, e.g. for the explicit reset action
    pub fn progress_mut(&mut self) -> &mut ProgressLedger {
        &mut self.progress
    }

    fn telemetry(&self, subject: Subject) -> SubjectTelemetry<'_> {
        SubjectTelemetry {
            subject,
            time: &self.time,
            mistakes: &self.mistakes,
            progress: &self.progress,
        }
    }
}

/// One learner's full tracked state
pub struct LearnerProfile {
    subjects: BTreeMap<Subject, SubjectState>,
    streak: StreakTracker,
    thresholds: Thresholds,
}

impl LearnerProfile {
    /// Load (or start) the profile backed by `store`
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        let subjects = Subject::ALL
            .into_iter()
            .map(|subject| (subject, SubjectState::new(subject, store.clone())))
            .collect();
        Self { subjects, streak: StreakTracker::new(store), thresholds: Thresholds::default() }
    }

    /// Swap in different classifier thresholds
    pub fn set_thresholds(&mut self, thresholds: Thresholds) {
        self.thresholds = thresholds;
    }

    /// Mark today active; returns the streak and any newly earned reward
    pub fn start_session(&mut self) -> CheckIn {
        self.streak.check_in()
    }

    /// Current streak tracker, read-only
    pub fn streak(&self) -> &StreakTracker {
        &self.streak
    }

    pub fn subject(&self, subject: Subject) -> &SubjectState {
        &self.subjects[&subject]
    }

    pub fn subject_mut(&mut self, subject: Subject) -> &mut SubjectState {
        self.subjects.get_mut(&subject).expect("every subject is wired at construction")
    }

    /// Fold one answered exercise into every tracker it concerns.
    ///
    /// Time is recorded only when a duration accrued; progress counters
    /// always move; wrong answers also land in the mistake log.
    pub fn record_answer(&mut self, outcome: &AnswerOutcome) {
        let state = self.subjects.get_mut(&outcome.subject).expect("every subject is wired");

        state.time.record(
            &outcome.topic,
            outcome.grade,
            outcome.difficulty,
            outcome.duration_seconds,
        );

        state.progress.record_answer(&AnswerEvent {
            topic: outcome.topic.clone(),
            correct: outcome.correct,
            grade: outcome.grade,
            difficulty: outcome.difficulty,
        });

        if !outcome.correct {
            state.mistakes.append(MistakeRecord::new(
                outcome.topic.clone(),
                outcome.question_text.clone(),
                outcome.correct_answer.clone(),
                outcome.given_answer.clone(),
                outcome.grade,
                outcome.difficulty,
            ));
        }
    }

    /// Build the parent-facing report for `window`
    pub fn report(&self, window: &ReportWindow) -> ProgressReport {
        let telemetry: Vec<SubjectTelemetry<'_>> = self
            .subjects
            .iter()
            .map(|(subject, state)| state.telemetry(*subject))
            .collect();
        report::build_report(&telemetry, &self.streak, window, &self.thresholds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Tier;
    use crate::store::MemoryStore;

    fn outcome(subject: Subject, topic: &str, correct: bool) -> AnswerOutcome {
        AnswerOutcome {
            subject,
            topic: topic.to_string(),
            grade: Grade::Third,
            difficulty: Difficulty::Easy,
            correct,
            duration_seconds: 45,
            question_text: "2 + 2 = ?".to_string(),
            correct_answer: "4".to_string(),
            given_answer: if correct { "4".to_string() } else { "5".to_string() },
        }
    }

    #[test]
    fn answers_fan_out_to_every_tracker() {
        let mut profile = LearnerProfile::new(Arc::new(MemoryStore::new()));
        profile.record_answer(&outcome(Subject::Arithmetic, "addition", true));
        profile.record_answer(&outcome(Subject::Arithmetic, "addition", false));

        let state = profile.subject(Subject::Arithmetic);
        assert_eq!(state.progress().counter("addition").unwrap().answered, 2);
        assert_eq!(state.progress().counter("addition").unwrap().correct, 1);
        assert_eq!(state.mistakes().len(), 1);

        let window = ReportWindow::trailing_week();
        let summary = state.time().query_range(window.start, window.end);
        assert_eq!(summary.total_seconds, 90);
    }

    #[test]
    fn wrong_answer_without_duration_still_counts() {
        let mut profile = LearnerProfile::new(Arc::new(MemoryStore::new()));
        let mut abandoned = outcome(Subject::Geometry, "shapes", false);
        abandoned.duration_seconds = 0;

        profile.record_answer(&abandoned);

        let state = profile.subject(Subject::Geometry);
        assert_eq!(state.progress().counter("shapes").unwrap().answered, 1);
        assert_eq!(state.mistakes().len(), 1);

        let window = ReportWindow::trailing_week();
        assert_eq!(state.time().query_range(window.start, window.end).total_seconds, 0);
    }

    #[test]
    fn profile_reloads_from_the_same_store() {
        let store = Arc::new(MemoryStore::new());
        {
            let mut profile = LearnerProfile::new(store.clone());
            profile.start_session();
            for _ in 0..3 {
                profile.record_answer(&outcome(Subject::Language, "spelling", true));
            }
        }

        let profile = LearnerProfile::new(store);
        let state = profile.subject(Subject::Language);
        assert_eq!(state.progress().counter("spelling").unwrap().correct, 3);
        assert_eq!(profile.streak().count(), 1);
    }

    #[test]
    fn end_to_end_report_flow() {
        let mut profile = LearnerProfile::new(Arc::new(MemoryStore::new()));
        profile.start_session();

        for i in 0..20 {
            profile.record_answer(&outcome(Subject::Arithmetic, "addition", i % 2 == 0));
        }
        for _ in 0..20 {
            profile.record_answer(&outcome(Subject::Science, "plants", true));
        }

        let report = profile.report(&ReportWindow::trailing_week());

        assert_eq!(report.summary.total_questions, 40);
        assert_eq!(report.summary.streak_days, 1);
        assert_eq!(report.recommendations.len(), 2);
        // The struggling topic outranks the healthy one.
        assert_eq!(report.recommendations[0].subject, Subject::Arithmetic);
        assert_eq!(report.recommendations[0].tier, Tier::High);
        assert!(report.per_subject_topics[&Subject::Science].len() == 1);

        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("recommendations"));
    }

    #[test]
    fn explicit_clear_and_reset_actions() {
        let mut profile = LearnerProfile::new(Arc::new(MemoryStore::new()));
        profile.record_answer(&outcome(Subject::Civics, "flags", false));

        profile.subject_mut(Subject::Civics).mistakes_mut().clear();
        profile.subject_mut(Subject::Civics).progress_mut().reset();

        let state = profile.subject(Subject::Civics);
        assert!(state.mistakes().is_empty());
        assert_eq!(state.progress().counter("flags"), None);
    }
}
