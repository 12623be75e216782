//! Data types produced by the aggregation pipeline.

use crate::records::Grade;
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::fmt;

/// One row of the ranked leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardEntry {
    pub student_id: String,
    pub average_score: f64,
}

/// A student's 1-based leaderboard position, or [`Rank::Unranked`] when the
/// student has no grades.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rank {
    Position(usize),
    Unranked,
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rank::Position(n) => write!(f, "#{n}"),
            Rank::Unranked => f.write_str("unranked"),
        }
    }
}

impl Serialize for Rank {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Rank::Position(n) => serializer.serialize_u64(*n as u64),
            Rank::Unranked => serializer.serialize_str("unranked"),
        }
    }
}

/// Derived per-student figures. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentAggregate {
    pub student_id: String,
    pub weighted_average: f64,
    pub rank: Rank,
}

/// Full report for one student, uploaded as `reports/students/{id}.json`.
#[derive(Debug, Serialize)]
pub struct StudentReport {
    pub(crate) schema_version: u8,
    pub(crate) generated_at: DateTime<Utc>,
    pub(crate) aggregate: StudentAggregate,
    pub(crate) letter: &'static str,
    pub(crate) grade_count: usize,
    pub(crate) grades: Vec<Grade>,
}

/// Spread of per-student averages across the ranked class.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassSummary {
    pub ranked_students: usize,
    pub mean_average: f64,
    pub stddev_average: f64,
}

/// Top-level leaderboard snapshot, uploaded as `reports/leaderboard.json`.
#[derive(Debug, Serialize)]
pub struct LeaderboardIndex {
    pub(crate) generated_at: DateTime<Utc>,
    pub(crate) summary: ClassSummary,
    pub(crate) entries: Vec<LeaderboardEntry>,
}

/// What the acting user sees, chosen by their role.
#[derive(Debug, Serialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Dashboard {
    Student {
        name: String,
        grades: Vec<Grade>,
        gpa: f64,
        letter: &'static str,
        rank: Rank,
        leaderboard: Vec<LeaderboardEntry>,
    },
    Teacher {
        name: String,
        roster_size: usize,
        summary: ClassSummary,
        leaderboard: Vec<LeaderboardEntry>,
    },
}
