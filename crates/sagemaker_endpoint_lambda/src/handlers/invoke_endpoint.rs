use serde_json::Value;
use tracing::info;

use crate::adapters::endpoint_runtime::EndpointInvoker;
use crate::error::OrchestrationError;
use crate::handlers::parse_event;
use crate::runtime::config::InvokeConfig;
use crate::runtime::contract::{InvocationRequest, InvokeEndpointEvent};

/// Forwards the payload untouched and returns the response body as text.
pub fn handle_invoke_endpoint<I: EndpointInvoker>(
    payload: Value,
    lookup: impl Fn(&str) -> Option<String>,
    connect: impl FnOnce(&str) -> I,
) -> Result<String, OrchestrationError> {
    let event: InvokeEndpointEvent = parse_event(payload)?;
    info!(component = "invoke_endpoint", ?event, "received event");

    let config = InvokeConfig::from_lookup(lookup).map_err(OrchestrationError::Config)?;
    event
        .validate()
        .map_err(OrchestrationError::invalid_event)?;

    let invoker = connect(&config.region);
    let request = InvocationRequest::from_event(&event);
    let body = invoker
        .invoke(&request)
        .map_err(OrchestrationError::remote("InvokeEndpoint"))?;

    info!(
        endpoint_name = %request.endpoint_name,
        target_model = request.target_model.as_deref().unwrap_or("-"),
        response_bytes = body.len(),
        "endpoint invoked"
    );
    Ok(String::from_utf8_lossy(&body).into_owned())
}
