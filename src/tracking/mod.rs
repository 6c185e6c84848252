//! Play telemetry trackers
//!
//! One tracker of each kind per subject, all parameterized by [`Subject`]
//! rather than duplicated, and all writing through an injected store handle.
//!
//! [`Subject`]: crate::model::Subject

pub mod mistakes;
pub mod progress;
pub mod streak;
pub mod time;

pub use mistakes::{MistakeLog, MistakeRecord};
pub use progress::{Advancement, AnswerEvent, ProgressLedger};
pub use streak::{CheckIn, RewardTier, StreakTracker};
pub use time::TimeTracker;
