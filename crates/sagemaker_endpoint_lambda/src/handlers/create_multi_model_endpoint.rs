use serde_json::Value;
use tracing::info;

use crate::adapters::clock::Clock;
use crate::adapters::sagemaker::SageMakerControl;
use crate::error::OrchestrationError;
use crate::handlers::parse_event;
use crate::manager::EndpointManager;
use crate::runtime::config::{EndpointManagerConfig, MultiModelConfig};
use crate::runtime::contract::CreateMultiModelEndpointEvent;

pub fn handle_create_multi_model_endpoint<S: SageMakerControl>(
    payload: Value,
    lookup: impl Fn(&str) -> Option<String>,
    connect: impl FnOnce(&str) -> S,
    clock: &dyn Clock,
) -> Result<String, OrchestrationError> {
    let event: CreateMultiModelEndpointEvent = parse_event(payload)?;
    info!(component = "create_multi_model_endpoint", ?event, "received event");

    let config =
        EndpointManagerConfig::from_lookup(&lookup).map_err(OrchestrationError::Config)?;
    let multi_model = MultiModelConfig::from_lookup(&lookup).map_err(OrchestrationError::Config)?;
    event
        .validate()
        .map_err(OrchestrationError::invalid_event)?;

    let sagemaker = connect(&config.region);
    let manager = EndpointManager::new(config, &sagemaker, clock);
    let group = event.model_package_group_name.as_str();

    let model_name = manager.create_multi_model(
        group,
        &event.model_artifacts_s3_prefix,
        &event.code_s3_key,
        &multi_model,
    )?;
    let endpoint_config_name =
        manager.create_endpoint_config(group, &event.instance_type, &model_name)?;
    manager.create_endpoint(group, &endpoint_config_name)
}
