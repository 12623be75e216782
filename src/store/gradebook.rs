use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

use super::{GradeStore, StudentGrades};
use crate::records::{Grade, Role, User};

pub const USERS_FILE: &str = "users.csv";
pub const GRADES_FILE: &str = "grades.csv";

/// A point-in-time snapshot of users and grades.
///
/// Loaded from two CSV sources:
/// ```text
/// users.csv:  id,name,role
/// grades.csv: student_id,subject,score,weight
/// ```
/// An empty `weight` cell reads as 1.0.
#[derive(Debug, Default, Clone)]
pub struct GradeBook {
    users: Vec<User>,
    grades: Vec<Grade>,
}

impl GradeBook {
    pub fn new(users: Vec<User>, grades: Vec<Grade>) -> Self {
        Self { users, grades }
    }

    /// Parses both CSV sources. `users` and `grades` can be files, fetched
    /// bytes or anything else readable.
    pub fn from_csv<U: Read, G: Read>(users: U, grades: G) -> Result<Self> {
        let users = read_rows(users, USERS_FILE)?;
        let grades = read_rows(grades, GRADES_FILE)?;
        debug!(users = users.len(), grades = grades.len(), "Grade book parsed");
        Ok(Self { users, grades })
    }

    /// Loads `users.csv` and `grades.csv` from `dir`.
    ///
    /// A missing `grades.csv` is treated as "no grades yet".
    #[tracing::instrument]
    pub fn load_dir(dir: &str) -> Result<Self> {
        let users_path = Path::new(dir).join(USERS_FILE);
        let grades_path = Path::new(dir).join(GRADES_FILE);

        let users_file = File::open(&users_path)
            .with_context(|| format!("failed to open {}", users_path.display()))?;

        let book = if grades_path.exists() {
            let grades_file = File::open(&grades_path)
                .with_context(|| format!("failed to open {}", grades_path.display()))?;
            Self::from_csv(users_file, grades_file)?
        } else {
            Self::from_csv(users_file, std::io::empty())?
        };

        info!(
            users = book.users.len(),
            grades = book.grades.len(),
            "Grade book loaded"
        );
        Ok(book)
    }

    pub fn students(&self) -> impl Iterator<Item = &User> {
        self.users.iter().filter(|u| u.role == Role::Student)
    }

    fn grades_of(&self, student_id: &str) -> Vec<Grade> {
        self.grades
            .iter()
            .filter(|g| g.student_id == student_id)
            .cloned()
            .collect()
    }
}

fn read_rows<T: DeserializeOwned, R: Read>(reader: R, name: &str) -> Result<Vec<T>> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut rows = Vec::new();

    for (idx, result) in rdr.deserialize().enumerate() {
        // header is line 1
        let record: T = result.with_context(|| format!("malformed row {} in {}", idx + 2, name))?;
        rows.push(record);
    }

    Ok(rows)
}

#[async_trait::async_trait]
impl GradeStore for GradeBook {
    async fn find_user(&self, user_id: &str) -> Result<Option<User>> {
        Ok(self.users.iter().find(|u| u.id == user_id).cloned())
    }

    async fn grades_for_student(&self, student_id: &str) -> Result<Vec<Grade>> {
        Ok(self.grades_of(student_id))
    }

    async fn grades_for_all_students(&self) -> Result<StudentGrades> {
        Ok(self
            .students()
            .map(|s| (s.id.clone(), self.grades_of(&s.id)))
            .collect())
    }
}
