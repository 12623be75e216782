use anyhow::{Context, Result};
use std::collections::HashMap;

use crate::records::default_weight;

/// Default weight per subject, used when a grade is entered without one.
///
/// Stored as a plain JSON object on disk:
/// ```json
/// {
///   "math": 2.0,
///   "physics": 1.5
/// }
/// ```
/// Subjects are matched case-insensitively.
#[derive(Debug, Default)]
pub struct SubjectWeights {
    entries: HashMap<String, f64>,
}

impl SubjectWeights {
    /// Loads the config from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read subject weights from {path}"))?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let raw: HashMap<String, f64> =
            serde_json::from_str(content).context("subject weights must map names to numbers")?;
        let entries = raw
            .into_iter()
            .map(|(subject, weight)| (subject.to_lowercase(), weight))
            .collect();
        Ok(Self { entries })
    }

    /// The configured weight for `subject`, or 1.0.
    pub fn weight_for(&self, subject: &str) -> f64 {
        self.entries
            .get(&subject.to_lowercase())
            .copied()
            .unwrap_or_else(default_weight)
    }
}
