use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::adapters::object_store::ObjectReader;
use crate::error::OrchestrationError;
use crate::handlers::parse_event;
use crate::runtime::contract::PostInferenceEvent;
use crate::runtime::s3_uri::parse_s3_uri;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PostInferenceReport {
    pub bucket: String,
    pub prefix: String,
    pub objects_listed: usize,
    pub objects_read: usize,
}

/// Logs every batch transform output object under the reported location.
///
/// A failed listing ends the invocation; an unreadable object is logged and
/// skipped so the remaining output is still visible.
pub fn handle_post_inference<R: ObjectReader>(
    payload: Value,
    connect: impl FnOnce() -> R,
) -> Result<PostInferenceReport, OrchestrationError> {
    let event: PostInferenceEvent = parse_event(payload)?;
    info!(component = "post_inference", ?event, "received event");

    let location = parse_s3_uri(&event.transform_output.s3_output_path)
        .map_err(OrchestrationError::invalid_event)?;

    let reader = connect();
    let keys = reader
        .list_keys(&location.bucket, &location.prefix)
        .map_err(OrchestrationError::remote("ListObjectsV2"))?;
    info!(bucket = %location.bucket, prefix = %location.prefix, objects = keys.len(), "listed batch output");

    let mut objects_read = 0usize;
    for key in &keys {
        match reader.read_object(&location.bucket, key) {
            Ok(body) => {
                objects_read += 1;
                info!(key = %key, content = %String::from_utf8_lossy(&body), "batch output object");
            }
            Err(error) => {
                warn!(key = %key, error = %error, "failed to read batch output object");
            }
        }
    }

    Ok(PostInferenceReport {
        bucket: location.bucket,
        prefix: location.prefix,
        objects_listed: keys.len(),
        objects_read,
    })
}
