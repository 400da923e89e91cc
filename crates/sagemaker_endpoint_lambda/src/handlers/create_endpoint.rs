use serde_json::Value;
use tracing::info;

use crate::adapters::clock::Clock;
use crate::adapters::sagemaker::SageMakerControl;
use crate::error::OrchestrationError;
use crate::handlers::parse_event;
use crate::manager::EndpointManager;
use crate::runtime::config::EndpointManagerConfig;
use crate::runtime::contract::CreateEndpointEvent;

/// Deploys the newest approved package of a group behind a fresh endpoint.
///
/// Configuration is validated before `connect` runs, so a misconfigured
/// function never reaches the service.
pub fn handle_create_endpoint<S: SageMakerControl>(
    payload: Value,
    lookup: impl Fn(&str) -> Option<String>,
    connect: impl FnOnce(&str) -> S,
    clock: &dyn Clock,
) -> Result<String, OrchestrationError> {
    let event: CreateEndpointEvent = parse_event(payload)?;
    info!(component = "create_endpoint", ?event, "received event");

    let config = EndpointManagerConfig::from_lookup(lookup).map_err(OrchestrationError::Config)?;
    event
        .validate()
        .map_err(OrchestrationError::invalid_event)?;

    let sagemaker = connect(&config.region);
    let manager = EndpointManager::new(config, &sagemaker, clock);
    let group = event.model_package_group_name.as_str();

    let latest = manager.find_latest_model_package(group)?;
    let model_name = manager.create_model(group, &latest.arn)?;
    let endpoint_config_name =
        manager.create_endpoint_config(group, &event.instance_type, &model_name)?;
    manager.create_endpoint(group, &endpoint_config_name)
}
