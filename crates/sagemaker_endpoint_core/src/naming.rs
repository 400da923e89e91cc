use chrono::{DateTime, Utc};

pub const RESOURCE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d-%H-%M-%S";

pub fn resource_timestamp(now: DateTime<Utc>) -> String {
    now.format(RESOURCE_TIMESTAMP_FORMAT).to_string()
}

pub fn model_name(group: &str, now: DateTime<Utc>) -> String {
    format!("{group}-{}", resource_timestamp(now))
}

pub fn endpoint_config_name(group: &str, now: DateTime<Utc>) -> String {
    format!("{group}-epc-{}", resource_timestamp(now))
}

/// Stable per group so that later deployments update the same endpoint.
pub fn endpoint_name(group: &str) -> String {
    format!("{group}-ep")
}

pub fn endpoint_config_name_filter(group: &str) -> String {
    format!("{group}-")
}

pub fn s3_url(bucket: &str, key: &str) -> String {
    format!("s3://{bucket}/{key}")
}
