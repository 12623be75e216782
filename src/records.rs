//! Persisted records: users and their grades.

use anyhow::{Result, anyhow};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single grade row, owned by one student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grade {
    pub student_id: String,
    pub subject: String,
    pub score: f64,
    #[serde(default = "default_weight", deserialize_with = "weight_or_default")]
    pub weight: f64,
}

impl Grade {
    /// Creates a grade with the default weight of 1.0.
    pub fn new(student_id: &str, subject: &str, score: f64) -> Self {
        Self {
            student_id: student_id.to_string(),
            subject: subject.to_string(),
            score,
            weight: default_weight(),
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }
}

pub(crate) fn default_weight() -> f64 {
    1.0
}

// An empty CSV cell reads as "no weight given".
fn weight_or_default<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let weight: Option<f64> = Option::deserialize(deserializer)?;
    Ok(weight.unwrap_or_else(default_weight))
}

/// Which dashboard a user gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Role {
    Student,
    Teacher,
}

impl FromStr for Role {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "student" => Ok(Role::Student),
            "teacher" => Ok(Role::Teacher),
            other => Err(anyhow!("unknown role '{other}'")),
        }
    }
}

impl TryFrom<String> for Role {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Student => f.write_str("student"),
            Role::Teacher => f.write_str("teacher"),
        }
    }
}

/// A registered account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_new_defaults_weight() {
        let g = Grade::new("s1", "math", 85.0);
        assert_eq!(g.weight, 1.0);
        assert_eq!(g.with_weight(0.5).weight, 0.5);
    }

    #[test]
    fn test_role_from_str() {
        assert_eq!("student".parse::<Role>().unwrap(), Role::Student);
        assert_eq!(" Teacher ".parse::<Role>().unwrap(), Role::Teacher);
        assert!("admin".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_display_matches_serde() {
        assert_eq!(Role::Teacher.to_string(), "teacher");
        assert_eq!(serde_json::to_string(&Role::Student).unwrap(), "\"student\"");
    }

    #[test]
    fn test_user_csv_role_is_case_insensitive() {
        let data = "id,name,role\ns1,Amani,Student\nt1,Jean,TEACHER\n";
        let mut rdr = csv::Reader::from_reader(data.as_bytes());
        let users: Vec<User> = rdr.deserialize().collect::<Result<_, _>>().unwrap();

        assert_eq!(users[0].role, Role::Student);
        assert_eq!(users[1].role, Role::Teacher);
    }

    #[test]
    fn test_user_csv_unknown_role_is_rejected() {
        let data = "id,name,role\na1,Root,admin\n";
        let mut rdr = csv::Reader::from_reader(data.as_bytes());
        let result: Result<Vec<User>, _> = rdr.deserialize().collect();
        assert!(result.is_err());
    }

    #[test]
    fn test_grade_csv_empty_weight_is_one() {
        let data = "student_id,subject,score,weight\ns1,math,70,\ns1,art,90,0.5\n";
        let mut rdr = csv::Reader::from_reader(data.as_bytes());
        let grades: Vec<Grade> = rdr.deserialize().collect::<Result<_, _>>().unwrap();

        assert_eq!(grades.len(), 2);
        assert_eq!(grades[0].weight, 1.0);
        assert_eq!(grades[1].weight, 0.5);
    }
}
