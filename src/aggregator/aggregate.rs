use crate::aggregator::types::{ClassSummary, LeaderboardEntry, Rank, StudentAggregate};
use crate::aggregator::utility::{mean, round1, stddev};
use crate::records::Grade;

/// Weighted average of a student's scores, rounded to one decimal.
///
/// Returns 0.0 for an empty slice or when the weights sum to exactly zero.
/// Negative scores and weights are taken at face value.
pub fn compute_gpa(grades: &[Grade]) -> f64 {
    let mut weighted_total = 0.0;
    let mut weight_sum = 0.0;

    for grade in grades {
        weighted_total += grade.score * grade.weight;
        weight_sum += grade.weight;
    }

    if weight_sum == 0.0 {
        0.0
    } else {
        round1(weighted_total / weight_sum)
    }
}

/// Ranks students by their plain (unweighted) mean score, highest first.
///
/// Students without any grades are left out. Ties keep the order in which
/// the students were yielded. At most `limit` entries are returned.
pub fn compute_leaderboard<'a, I>(all_student_grades: I, limit: usize) -> Vec<LeaderboardEntry>
where
    I: IntoIterator<Item = (&'a str, &'a [Grade])>,
{
    let mut entries: Vec<LeaderboardEntry> = all_student_grades
        .into_iter()
        .filter(|(_, grades)| !grades.is_empty())
        .map(|(student_id, grades)| {
            let scores: Vec<f64> = grades.iter().map(|g| g.score).collect();
            LeaderboardEntry {
                student_id: student_id.to_string(),
                average_score: mean(&scores),
            }
        })
        .collect();

    // sort_by is stable
    entries.sort_by(|a, b| b.average_score.total_cmp(&a.average_score));
    entries.truncate(limit);
    entries
}

/// 1-based position of `student_id` in a full (untruncated) leaderboard.
pub fn compute_rank(student_id: &str, full_ranked_list: &[LeaderboardEntry]) -> Rank {
    full_ranked_list
        .iter()
        .position(|entry| entry.student_id == student_id)
        .map_or(Rank::Unranked, |idx| Rank::Position(idx + 1))
}

/// Builds the derived [`StudentAggregate`] for one student.
pub fn compute_aggregate(
    student_id: &str,
    grades: &[Grade],
    full_ranked_list: &[LeaderboardEntry],
) -> StudentAggregate {
    StudentAggregate {
        student_id: student_id.to_string(),
        weighted_average: compute_gpa(grades),
        rank: compute_rank(student_id, full_ranked_list),
    }
}

/// Mean and spread of the per-student averages on a leaderboard.
pub fn summarize_class(ranked: &[LeaderboardEntry]) -> ClassSummary {
    let averages: Vec<f64> = ranked.iter().map(|e| e.average_score).collect();
    let avg = mean(&averages);

    ClassSummary {
        ranked_students: averages.len(),
        mean_average: avg,
        stddev_average: stddev(&averages, avg),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grade(student: &str, score: f64, weight: f64) -> Grade {
        Grade::new(student, "subject", score).with_weight(weight)
    }

    fn board<'a>(rows: &'a [(&'a str, Vec<Grade>)]) -> impl Iterator<Item = (&'a str, &'a [Grade])> {
        rows.iter().map(|(id, grades)| (*id, grades.as_slice()))
    }

    #[test]
    fn test_gpa_empty_is_zero() {
        assert_eq!(compute_gpa(&[]), 0.0);
    }

    #[test]
    fn test_gpa_weighted() {
        let grades = vec![grade("s", 85.0, 1.0), grade("s", 72.0, 1.0), grade("s", 90.0, 0.5)];
        assert_eq!(compute_gpa(&grades), 80.8);
    }

    #[test]
    fn test_gpa_exact_half_rounds_to_even() {
        let grades = vec![grade("s", 80.5, 1.0), grade("s", 80.0, 1.0)];
        assert_eq!(compute_gpa(&grades), 80.2);
    }

    #[test]
    fn test_gpa_order_independent() {
        let a = vec![grade("s", 85.0, 1.0), grade("s", 72.0, 1.0), grade("s", 90.0, 0.5)];
        let b = vec![grade("s", 90.0, 0.5), grade("s", 85.0, 1.0), grade("s", 72.0, 1.0)];
        let c = vec![grade("s", 72.0, 1.0), grade("s", 90.0, 0.5), grade("s", 85.0, 1.0)];
        assert_eq!(compute_gpa(&a), compute_gpa(&b));
        assert_eq!(compute_gpa(&a), compute_gpa(&c));
    }

    #[test]
    fn test_gpa_zero_weights_is_zero() {
        let grades = vec![grade("s", 99.0, 0.0), grade("s", 12.0, 0.0)];
        assert_eq!(compute_gpa(&grades), 0.0);
    }

    #[test]
    fn test_gpa_accepts_negative_values() {
        let grades = vec![grade("s", -10.0, 1.0), grade("s", 30.0, 1.0)];
        assert_eq!(compute_gpa(&grades), 10.0);

        // weights cancel out to exactly zero
        let grades = vec![grade("s", 50.0, 2.0), grade("s", 70.0, -2.0)];
        assert_eq!(compute_gpa(&grades), 0.0);
    }

    #[test]
    fn test_leaderboard_uses_unweighted_mean() {
        let rows = vec![
            ("heavy", vec![grade("heavy", 100.0, 10.0), grade("heavy", 0.0, 1.0)]),
            ("flat", vec![grade("flat", 60.0, 1.0)]),
        ];
        let ranked = compute_leaderboard(board(&rows), 10);

        assert_eq!(ranked[0].student_id, "flat");
        assert_eq!(ranked[0].average_score, 60.0);
        assert_eq!(ranked[1].average_score, 50.0);
    }

    #[test]
    fn test_leaderboard_sorted_and_limited() {
        let rows = vec![
            ("c", vec![grade("c", 60.0, 1.0)]),
            ("a", vec![grade("a", 90.0, 1.0)]),
            ("b", vec![grade("b", 70.0, 1.0), grade("b", 80.0, 1.0)]),
        ];
        let top = compute_leaderboard(board(&rows), 2);

        assert_eq!(top.len(), 2);
        assert_eq!(top[0].student_id, "a");
        assert_eq!(top[1].student_id, "b");
        assert!(top.windows(2).all(|w| w[0].average_score >= w[1].average_score));
    }

    #[test]
    fn test_leaderboard_ties_keep_input_order() {
        let rows = vec![
            ("first", vec![grade("first", 80.0, 1.0)]),
            ("second", vec![grade("second", 80.0, 1.0)]),
            ("third", vec![grade("third", 80.0, 1.0)]),
        ];
        let ranked = compute_leaderboard(board(&rows), 10);
        let ids: Vec<_> = ranked.iter().map(|e| e.student_id.as_str()).collect();
        assert_eq!(ids, ["first", "second", "third"]);
    }

    #[test]
    fn test_leaderboard_skips_students_without_grades() {
        let rows = vec![("empty", vec![]), ("x", vec![grade("x", 50.0, 1.0)])];
        let ranked = compute_leaderboard(board(&rows), 10);
        assert_eq!(ranked.len(), 1);
        assert_eq!(compute_rank("empty", &ranked), Rank::Unranked);
    }

    #[test]
    fn test_leaderboard_zero_limit_is_empty() {
        let rows = vec![("x", vec![grade("x", 50.0, 1.0)])];
        assert!(compute_leaderboard(board(&rows), 0).is_empty());
    }

    #[test]
    fn test_rank_positions() {
        let rows = vec![
            ("s3", vec![grade("s3", 60.0, 1.0)]),
            ("s1", vec![grade("s1", 90.0, 1.0)]),
            ("s2", vec![grade("s2", 75.0, 1.0)]),
        ];
        let full = compute_leaderboard(board(&rows), usize::MAX);

        assert_eq!(compute_rank("s1", &full), Rank::Position(1));
        assert_eq!(compute_rank("s2", &full), Rank::Position(2));
        assert_eq!(compute_rank("s3", &full), Rank::Position(3));
        assert_eq!(compute_rank("nobody", &full), Rank::Unranked);
    }

    #[test]
    fn test_compute_aggregate() {
        let grades = vec![grade("s1", 85.0, 1.0), grade("s1", 72.0, 1.0), grade("s1", 90.0, 0.5)];
        let rows = vec![("s1", grades.clone())];
        let full = compute_leaderboard(board(&rows), usize::MAX);

        let agg = compute_aggregate("s1", &grades, &full);
        assert_eq!(agg.weighted_average, 80.8);
        assert_eq!(agg.rank, Rank::Position(1));

        let none = compute_aggregate("s9", &[], &full);
        assert_eq!(none.weighted_average, 0.0);
        assert_eq!(none.rank, Rank::Unranked);
    }

    #[test]
    fn test_summarize_class() {
        let ranked = vec![
            LeaderboardEntry { student_id: "a".into(), average_score: 90.0 },
            LeaderboardEntry { student_id: "b".into(), average_score: 60.0 },
        ];
        let summary = summarize_class(&ranked);
        assert_eq!(summary.ranked_students, 2);
        assert_eq!(summary.mean_average, 75.0);
        assert_eq!(summary.stddev_average, 15.0);

        let empty = summarize_class(&[]);
        assert_eq!(empty.ranked_students, 0);
        assert_eq!(empty.mean_average, 0.0);
    }
}
