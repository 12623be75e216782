use anyhow::Result;
use chrono::Utc;
use tracing::{debug, info};

use crate::aggregator::aggregate::{compute_aggregate, summarize_class};
use crate::aggregator::dashboard::full_leaderboard;
use crate::aggregator::letter::letter;
use crate::aggregator::types::{LeaderboardEntry, LeaderboardIndex, StudentReport};
use crate::aggregator::writetos3::write_json_to_s3;
use crate::records::Grade;
use crate::store::GradeStore;

/// Builds the report for one student against the full leaderboard.
pub fn student_report(
    student_id: &str,
    grades: Vec<Grade>,
    full_ranked_list: &[LeaderboardEntry],
) -> StudentReport {
    let aggregate = compute_aggregate(student_id, &grades, full_ranked_list);

    StudentReport {
        schema_version: 1,
        generated_at: Utc::now(),
        letter: letter(aggregate.weighted_average),
        grade_count: grades.len(),
        aggregate,
        grades,
    }
}

/// Computes every student report plus the leaderboard index and uploads
/// them as JSON to S3. Returns the number of student reports written.
#[tracing::instrument(skip(store, s3))]
pub async fn publish<S: GradeStore + ?Sized>(
    store: &S,
    s3: &aws_sdk_s3::Client,
    bucket: &str,
    gzip: bool,
) -> Result<usize> {
    let roster = store.grades_for_all_students().await?;
    let full = full_leaderboard(&roster);

    let mut written = 0;
    for (student_id, grades) in roster {
        let report = student_report(&student_id, grades, &full);

        write_json_to_s3(
            s3,
            bucket,
            &format!("reports/students/{}.json", student_id),
            &report,
            gzip,
        )
        .await?;

        debug!(student_id = %student_id, rank = %report.aggregate.rank, "Student report uploaded");
        written += 1;
    }

    let index = LeaderboardIndex {
        generated_at: Utc::now(),
        summary: summarize_class(&full),
        entries: full,
    };
    write_json_to_s3(s3, bucket, "reports/leaderboard.json", &index, gzip).await?;

    info!(written, "Reports published");
    Ok(written)
}
