use anyhow::Result;
use tracing::{debug, info};

use crate::aggregator::aggregate::{
    compute_aggregate, compute_gpa, compute_leaderboard, compute_rank, summarize_class,
};
use crate::aggregator::letter::letter;
use crate::aggregator::types::{Dashboard, LeaderboardEntry, StudentAggregate};
use crate::context::RequestContext;
use crate::records::Role;
use crate::store::{GradeStore, StudentGrades};

/// Ranks every student in `roster` with no truncation.
pub fn full_leaderboard(roster: &StudentGrades) -> Vec<LeaderboardEntry> {
    compute_leaderboard(
        roster.iter().map(|(id, grades)| (id.as_str(), grades.as_slice())),
        usize::MAX,
    )
}

/// Reads a fresh roster and returns the top `limit` students.
#[tracing::instrument(skip(store))]
pub async fn leaderboard<S: GradeStore + ?Sized>(
    store: &S,
    limit: usize,
) -> Result<Vec<LeaderboardEntry>> {
    let roster = store.grades_for_all_students().await?;
    let entries = compute_leaderboard(
        roster.iter().map(|(id, grades)| (id.as_str(), grades.as_slice())),
        limit,
    );
    debug!(roster = roster.len(), returned = entries.len(), "Leaderboard computed");
    Ok(entries)
}

/// GPA and rank for one student. The rank is taken from the full leaderboard.
#[tracing::instrument(skip(store))]
pub async fn student_aggregate<S: GradeStore + ?Sized>(
    store: &S,
    student_id: &str,
) -> Result<StudentAggregate> {
    let grades = store.grades_for_student(student_id).await?;
    let roster = store.grades_for_all_students().await?;
    let full = full_leaderboard(&roster);

    Ok(compute_aggregate(student_id, &grades, &full))
}

/// Assembles the dashboard for the acting user.
#[tracing::instrument(skip(store, ctx), fields(user_id = %ctx.user.id, role = %ctx.user.role))]
pub async fn build_dashboard<S: GradeStore + ?Sized>(
    store: &S,
    ctx: &RequestContext,
    limit: usize,
) -> Result<Dashboard> {
    let roster = store.grades_for_all_students().await?;
    let full = full_leaderboard(&roster);
    let top: Vec<LeaderboardEntry> = full.iter().take(limit).cloned().collect();

    let dashboard = match ctx.role() {
        Role::Student => {
            let grades = store.grades_for_student(&ctx.user.id).await?;
            let gpa = compute_gpa(&grades);

            Dashboard::Student {
                name: ctx.user.name.clone(),
                gpa,
                letter: letter(gpa),
                rank: compute_rank(&ctx.user.id, &full),
                grades,
                leaderboard: top,
            }
        }
        Role::Teacher => Dashboard::Teacher {
            name: ctx.user.name.clone(),
            roster_size: roster.len(),
            summary: summarize_class(&full),
            leaderboard: top,
        },
    };

    info!("Dashboard assembled");
    Ok(dashboard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::types::Rank;
    use crate::records::{Grade, User};
    use crate::store::GradeBook;

    fn user(id: &str, role: Role) -> User {
        User {
            id: id.to_string(),
            name: id.to_uppercase(),
            role,
        }
    }

    fn book() -> GradeBook {
        GradeBook::new(
            vec![
                user("s1", Role::Student),
                user("s2", Role::Student),
                user("s3", Role::Student),
                user("s4", Role::Student),
                user("t1", Role::Teacher),
            ],
            vec![
                Grade::new("s1", "math", 90.0),
                Grade::new("s2", "math", 75.0),
                Grade::new("s3", "math", 60.0),
                Grade::new("t1", "math", 100.0),
            ],
        )
    }

    #[tokio::test]
    async fn test_leaderboard_excludes_teachers() {
        let top = leaderboard(&book(), 10).await.unwrap();
        assert_eq!(top.len(), 3);
        assert!(top.iter().all(|e| e.student_id != "t1"));
    }

    #[tokio::test]
    async fn test_student_aggregate() {
        let agg = student_aggregate(&book(), "s3").await.unwrap();
        assert_eq!(agg.weighted_average, 60.0);
        assert_eq!(agg.rank, Rank::Position(3));

        let agg = student_aggregate(&book(), "s4").await.unwrap();
        assert_eq!(agg.weighted_average, 0.0);
        assert_eq!(agg.rank, Rank::Unranked);
    }

    #[tokio::test]
    async fn test_student_dashboard_rank_uses_full_list() {
        let ctx = RequestContext::for_user(user("s3", Role::Student));
        let dash = build_dashboard(&book(), &ctx, 2).await.unwrap();

        match dash {
            Dashboard::Student {
                gpa,
                letter,
                rank,
                leaderboard,
                grades,
                ..
            } => {
                assert_eq!(gpa, 60.0);
                assert_eq!(letter, "D");
                assert_eq!(rank, Rank::Position(3));
                assert_eq!(leaderboard.len(), 2);
                assert_eq!(grades.len(), 1);
            }
            Dashboard::Teacher { .. } => panic!("expected a student dashboard"),
        }
    }

    #[tokio::test]
    async fn test_teacher_dashboard() {
        let ctx = RequestContext::for_user(user("t1", Role::Teacher));
        let dash = build_dashboard(&book(), &ctx, 1).await.unwrap();

        match dash {
            Dashboard::Teacher {
                roster_size,
                summary,
                leaderboard,
                ..
            } => {
                assert_eq!(roster_size, 4);
                assert_eq!(summary.ranked_students, 3);
                assert_eq!(summary.mean_average, 75.0);
                assert_eq!(leaderboard.len(), 1);
                assert_eq!(leaderboard[0].student_id, "s1");
            }
            Dashboard::Student { .. } => panic!("expected a teacher dashboard"),
        }
    }
}
