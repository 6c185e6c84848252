//! Brainbox - core engine for a self-paced learning game suite
//!
//! Brainbox turns raw play telemetry into a non-repeating stream of
//! exercises and a parent-facing progress report with tiered, explainable
//! recommendations. This crate is the engine only: the presentation layer,
//! sounds, and per-subject question banks live elsewhere and talk to the
//! core through the [`store::KeyValueStore`] and
//! [`scheduler::QuestionSource`] seams.

pub mod learner;
pub mod model;
pub mod report;
pub mod scheduler;
pub mod store;
pub mod tracking;

pub use learner::{AnswerOutcome, LearnerProfile};
pub use model::{Difficulty, Grade, PracticeEvent, Subject};
pub use report::{ProgressReport, Recommendation, ReportWindow, Thresholds, Tier};
pub use scheduler::{GenerationParams, Question, QuestionScheduler, QuestionSource};
pub use store::{JsonFileStore, KeyValueStore, MemoryStore, StoreExt};
pub use tracking::{MistakeLog, MistakeRecord, RewardTier, StreakTracker, TimeTracker};
