//! CLI entry point for the IsomoLink grade tools.
//!
//! Provides subcommands for computing a student's GPA and rank, listing the
//! leaderboard, rendering role-based dashboards, entering grades and
//! publishing report snapshots to S3.

use anyhow::Result;
use clap::{Parser, Subcommand};
use isomolink::aggregator::dashboard::{build_dashboard, leaderboard, student_aggregate};
use isomolink::aggregator::publisher::publish;
use isomolink::{
    config::SubjectWeights,
    context::RequestContext,
    fetch::{BasicClient, auth::ApiKey, fetch_gradebook},
    output::{append_grade, render_json},
    records::Grade,
    store::GradeBook,
};
use std::ffi::OsStr;
use std::path::Path;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    filter::Directive,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "isomolink")]
#[command(about = "Grade aggregation and ranking for IsomoLink", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show one student's weighted GPA and leaderboard rank
    Gpa {
        /// Directory or URL holding users.csv and grades.csv
        #[arg(short, long, default_value = "data")]
        data: String,

        /// Student id
        #[arg(short, long)]
        student: String,
    },
    /// List the top students by average score
    Leaderboard {
        /// Directory or URL holding users.csv and grades.csv
        #[arg(short, long, default_value = "data")]
        data: String,

        /// Maximum number of entries
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },
    /// Render the dashboard for a user, according to their role
    Dashboard {
        /// Directory or URL holding users.csv and grades.csv
        #[arg(short, long, default_value = "data")]
        data: String,

        /// Acting user id
        #[arg(short, long)]
        user: String,

        /// Maximum number of leaderboard entries shown
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },
    /// Append a grade to a grades CSV file
    AddGrade {
        /// CSV file to append to
        #[arg(short, long, default_value = "data/grades.csv")]
        output: String,

        #[arg(long)]
        student: String,

        #[arg(long)]
        subject: String,

        #[arg(long, allow_negative_numbers = true)]
        score: f64,

        /// Explicit weight; overrides the subject weights file
        #[arg(long)]
        weight: Option<f64>,

        /// Optional JSON file mapping subjects to default weights
        #[arg(long)]
        weights: Option<String>,
    },
    /// Compute all student reports and the leaderboard and upload them to S3
    Publish {
        /// Directory or URL holding users.csv and grades.csv
        #[arg(short, long, default_value = "data")]
        data: String,

        /// Optional: S3 bucket name to upload JSON to (e.g., "my-bucket")
        #[arg(long)]
        s3_bucket: Option<String>,

        /// Gzip compress JSON before uploading
        #[arg(long, default_value_t = false)]
        gzip: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/isomolink.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("isomolink.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(
            EnvFilter::from_env("RUST_LOG").add_directive("info".parse::<Directive>()?),
        );

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(
            EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse::<Directive>()?),
        );

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Gpa { data, student } => {
            let book = load_gradebook(&data).await?;
            let aggregate = student_aggregate(&book, &student).await?;
            println!("{}", render_json(&aggregate)?);
        }
        Commands::Leaderboard { data, limit } => {
            let book = load_gradebook(&data).await?;
            let entries = leaderboard(&book, limit).await?;
            println!("{}", render_json(&entries)?);
        }
        Commands::Dashboard { data, user, limit } => {
            let book = load_gradebook(&data).await?;
            let ctx = RequestContext::resolve(&book, &user).await?;
            let dashboard = build_dashboard(&book, &ctx, limit).await?;
            println!("{}", render_json(&dashboard)?);
        }
        Commands::AddGrade {
            output,
            student,
            subject,
            score,
            weight,
            weights,
        } => {
            let weight = match (weight, weights) {
                (Some(w), _) => w,
                (None, Some(path)) => SubjectWeights::load(&path)?.weight_for(&subject),
                (None, None) => SubjectWeights::default().weight_for(&subject),
            };
            let grade = Grade::new(&student, &subject, score).with_weight(weight);
            append_grade(&output, &grade)?;
            info!(student = %student, subject = %subject, score, weight, "Grade recorded");
        }
        Commands::Publish {
            data,
            s3_bucket,
            gzip,
        } => {
            let Some(bucket) = s3_bucket else {
                info!("S3 bucket not specified, skipping upload");
                return Ok(());
            };
            let book = load_gradebook(&data).await?;
            let config = aws_config::load_from_env().await;
            let s3 = aws_sdk_s3::Client::new(&config);
            info!(bucket = %bucket, gzip, "S3 upload enabled");
            publish(&book, &s3, &bucket, gzip).await?;
        }
    }

    Ok(())
}

/// Loads a grade-book snapshot from a local directory or fetches it over HTTP.
///
/// Remote requests carry `ISOMOLINK_API_TOKEN` as a bearer token when set.
#[tracing::instrument]
async fn load_gradebook(source: &str) -> Result<GradeBook> {
    if !source.starts_with("http") {
        return GradeBook::load_dir(source);
    }

    let client = BasicClient::with_timeouts(Duration::from_secs(30), Duration::from_secs(10))?;
    match std::env::var("ISOMOLINK_API_TOKEN") {
        Ok(token) => fetch_gradebook(&ApiKey::bearer(client, &token)?, source).await,
        Err(_) => fetch_gradebook(&client, source).await,
    }
}
