use anyhow::Result;
use flate2::Compression;
use flate2::write::GzEncoder;
use serde::Serialize;
use std::io::Write;

/// Serializes `value` to JSON, gzip-compressing it when `gzip` is set.
pub fn encode_json(value: &impl Serialize, gzip: bool) -> Result<Vec<u8>> {
    let body = serde_json::to_vec(value)?;
    if !gzip {
        return Ok(body);
    }

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&body)?;
    Ok(encoder.finish()?)
}

/// Serializes a value to JSON and uploads it to an S3 bucket with `application/json` content type.
///
/// With `gzip` the body is compressed and `.gz` is appended to `key`.
pub async fn write_json_to_s3(
    client: &aws_sdk_s3::Client,
    bucket: &str,
    key: &str,
    value: &impl Serialize,
    gzip: bool,
) -> Result<()> {
    let body = encode_json(value, gzip)?;

    let mut request = client
        .put_object()
        .bucket(bucket)
        .body(body.into())
        .content_type("application/json");

    request = if gzip {
        request.key(format!("{key}.gz")).content_encoding("gzip")
    } else {
        request.key(key)
    };

    request.send().await?;

    Ok(())
}
