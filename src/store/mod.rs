//! Persistence access for grade data.
//!
//! [`GradeStore`] is the async trait the aggregator's callers read through.
//! [`GradeBook`] implements it over an in-memory snapshot loaded from CSV.

mod gradebook;

pub use gradebook::{GRADES_FILE, GradeBook, USERS_FILE};

use crate::records::{Grade, User};
use anyhow::Result;

/// Every student with their grades, in roster order.
pub type StudentGrades = Vec<(String, Vec<Grade>)>;

/// Read-only view over users and grades.
#[async_trait::async_trait]
pub trait GradeStore: Send + Sync {
    /// Looks up a user by id.
    async fn find_user(&self, user_id: &str) -> Result<Option<User>>;

    /// All grades recorded for one student. Empty when there are none.
    async fn grades_for_student(&self, student_id: &str) -> Result<Vec<Grade>>;

    /// Grades for every user with the student role, including students
    /// that have no grades yet.
    async fn grades_for_all_students(&self) -> Result<StudentGrades>;
}
