use crate::contract::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct S3Location {
    pub bucket: String,
    pub prefix: String,
}

/// Splits `s3://bucket/some/prefix` into bucket and key prefix.
///
/// The prefix never starts with `/`. A bare `s3://bucket` yields an empty
/// prefix, which lists the whole bucket. Anything from the first `#` or `?`
/// on is a URI fragment or query, not part of the key prefix.
pub fn parse_s3_uri(uri: &str) -> Result<S3Location, ValidationError> {
    let trimmed = uri.trim();
    let Some(rest) = trimmed.strip_prefix("s3://") else {
        return Err(ValidationError::new(format!(
            "S3 URI must start with s3://: {trimmed}"
        )));
    };

    let rest = rest.split_once('#').map_or(rest, |(before, _)| before);
    let rest = rest.split_once('?').map_or(rest, |(before, _)| before);

    let (bucket, path) = match rest.split_once('/') {
        Some((bucket, path)) => (bucket, path),
        None => (rest, ""),
    };

    if bucket.is_empty() {
        return Err(ValidationError::new(format!(
            "S3 URI is missing a bucket: {trimmed}"
        )));
    }

    Ok(S3Location {
        bucket: bucket.to_string(),
        prefix: path.trim_start_matches('/').to_string(),
    })
}
