//! Grade aggregation and ranking.
//!
//! Computes weighted GPAs for single students, ranks the class by plain
//! average score, assembles role-specific dashboards and publishes report
//! snapshots as JSON to S3.

pub mod aggregate;
pub mod dashboard;
pub mod letter;
pub mod publisher;
pub mod types;
pub mod utility;
pub mod writetos3;
