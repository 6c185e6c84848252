//! Shared domain types
//!
//! The vocabulary every other module speaks: subjects, grade bands,
//! difficulty tiers, and the practice event produced by gameplay.

use std::fmt;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// A top-level learning domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Subject {
    Arithmetic,
    Geometry,
    Language,
    Science,
    Civics,
    Geography,
}

impl Subject {
    /// All subjects, in display order
    pub const ALL: [Subject; 6] = [
        Subject::Arithmetic,
        Subject::Geometry,
        Subject::Language,
        Subject::Science,
        Subject::Civics,
        Subject::Geography,
    ];

    /// Stable key used in store keys and serialized output
    pub fn key(&self) -> &'static str {
        match self {
            Subject::Arithmetic => "arithmetic",
            Subject::Geometry => "geometry",
            Subject::Language => "language",
            Subject::Science => "science",
            Subject::Civics => "civics",
            Subject::Geography => "geography",
        }
    }

    /// Human-readable name for report messages
    pub fn label(&self) -> &'static str {
        match self {
            Subject::Arithmetic => "Arithmetic",
            Subject::Geometry => "Geometry",
            Subject::Language => "Language",
            Subject::Science => "Science",
            Subject::Civics => "Civics",
            Subject::Geography => "Geography",
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// School-year band, ordered for promotion logic
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Grade {
    Kindergarten,
    First,
    Second,
    Third,
    Fourth,
    Fifth,
    Sixth,
}

impl Grade {
    /// The next grade up, or `None` at the top band
    pub fn next(&self) -> Option<Grade> {
        match self {
            Grade::Kindergarten => Some(Grade::First),
            Grade::First => Some(Grade::Second),
            Grade::Second => Some(Grade::Third),
            Grade::Third => Some(Grade::Fourth),
            Grade::Fourth => Some(Grade::Fifth),
            Grade::Fifth => Some(Grade::Sixth),
            Grade::Sixth => None,
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Grade::Kindergarten => "K",
            Grade::First => "1",
            Grade::Second => "2",
            Grade::Third => "3",
            Grade::Fourth => "4",
            Grade::Fifth => "5",
            Grade::Sixth => "6",
        };
        f.write_str(label)
    }
}

/// Difficulty tier for a single attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// The next tier up, or `None` at the hardest
    pub fn next(&self) -> Option<Difficulty> {
        match self {
            Difficulty::Easy => Some(Difficulty::Medium),
            Difficulty::Medium => Some(Difficulty::Hard),
            Difficulty::Hard => None,
        }
    }

    pub fn is_hardest(&self) -> bool {
        matches!(self, Difficulty::Hard)
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        };
        f.write_str(label)
    }
}

/// One answered exercise (or tracked interval), immutable once recorded
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PracticeEvent {
    /// Topic within the owning subject (e.g., "fractions")
    pub topic: String,
    /// Grade band the exercise was generated for
    pub grade: Grade,
    /// Difficulty tier of the attempt
    pub difficulty: Difficulty,
    /// Time spent, in seconds
    pub duration_seconds: u64,
    /// Wall-clock time the event was recorded
    pub timestamp: DateTime<Local>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grade_next_walks_the_bands() {
        assert_eq!(Grade::Kindergarten.next(), Some(Grade::First));
        assert_eq!(Grade::Fifth.next(), Some(Grade::Sixth));
        assert_eq!(Grade::Sixth.next(), None);
    }

    #[test]
    fn difficulty_ordering_and_top() {
        assert!(Difficulty::Easy < Difficulty::Medium);
        assert!(Difficulty::Medium < Difficulty::Hard);
        assert!(Difficulty::Hard.is_hardest());
        assert_eq!(Difficulty::Hard.next(), None);
    }

    #[test]
    fn subject_keys_are_snake_case() {
        for subject in Subject::ALL {
            let json = serde_json::to_string(&subject).unwrap();
            assert_eq!(json, format!("\"{}\"", subject.key()));
        }
    }

    #[test]
    fn grade_serializes_snake_case() {
        let json = serde_json::to_string(&Grade::Kindergarten).unwrap();
        assert_eq!(json, "\"kindergarten\"");
        let back: Grade = serde_json::from_str("\"third\"").unwrap();
        assert_eq!(back, Grade::Third);
    }
}
