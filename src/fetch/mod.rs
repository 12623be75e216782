mod client;
mod basic;
pub mod auth;

pub use client::HttpClient;
pub use basic::BasicClient;

use anyhow::{Context, Result, bail};
use bytes::Bytes;
use tracing::debug;

use crate::store::{GRADES_FILE, GradeBook, USERS_FILE};

pub async fn fetch_bytes<C: HttpClient + ?Sized>(
    client: &C,
    url: &str,
) -> Result<Bytes> {
    let req = reqwest::Request::new(
        reqwest::Method::GET,
        url.parse()?,
    );

    let resp = client.execute(req).await?;
    if !resp.status().is_success() {
        bail!("GET {} returned status {}", url, resp.status());
    }
    Ok(resp.bytes().await?)
}

/// Fetches `users.csv` and `grades.csv` from under `base_url` and parses
/// them into a [`GradeBook`] snapshot.
#[tracing::instrument(skip(client))]
pub async fn fetch_gradebook<C: HttpClient + ?Sized>(
    client: &C,
    base_url: &str,
) -> Result<GradeBook> {
    let base = base_url.trim_end_matches('/');

    let users = fetch_bytes(client, &format!("{base}/{USERS_FILE}"))
        .await
        .context("failed to fetch users")?;
    let grades = fetch_bytes(client, &format!("{base}/{GRADES_FILE}"))
        .await
        .context("failed to fetch grades")?;
    debug!(users_bytes = users.len(), grades_bytes = grades.len(), "Grade book fetched");

    GradeBook::from_csv(&users[..], &grades[..])
}
