use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::OrchestrationError;

pub mod create_endpoint;
pub mod create_multi_model_endpoint;
pub mod invoke_endpoint;
pub mod post_inference;
pub mod register_model;
pub mod update_endpoint;

fn parse_event<T: DeserializeOwned>(payload: Value) -> Result<T, OrchestrationError> {
    serde_json::from_value(payload)
        .map_err(|error| OrchestrationError::invalid_event(format!("malformed payload: {error}")))
}
