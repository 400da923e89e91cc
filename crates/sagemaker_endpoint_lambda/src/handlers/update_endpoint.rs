use serde_json::Value;
use tracing::info;

use crate::adapters::clock::Clock;
use crate::adapters::sagemaker::SageMakerControl;
use crate::error::OrchestrationError;
use crate::handlers::parse_event;
use crate::manager::EndpointManager;
use crate::runtime::config::EndpointManagerConfig;
use crate::runtime::contract::{ApprovalStatus, EventBridgeEvent, ModelPackageStateChangeDetail};
use crate::runtime::naming::endpoint_name;

/// Rolls the group's endpoint onto the package named in a state-change
/// notification, reusing the variant layout of the newest configuration.
///
/// State changes other than approval are acknowledged without touching the
/// endpoint and yield `None`.
pub fn handle_update_endpoint<S: SageMakerControl>(
    payload: Value,
    lookup: impl Fn(&str) -> Option<String>,
    connect: impl FnOnce(&str) -> S,
    clock: &dyn Clock,
) -> Result<Option<String>, OrchestrationError> {
    let event: EventBridgeEvent<ModelPackageStateChangeDetail> = parse_event(payload)?;
    let detail = event.detail;
    info!(
        component = "update_endpoint",
        detail_type = event.detail_type.as_deref().unwrap_or("-"),
        ?detail,
        "received event"
    );

    let config = EndpointManagerConfig::from_lookup(lookup).map_err(OrchestrationError::Config)?;
    detail
        .validate()
        .map_err(OrchestrationError::invalid_event)?;

    let status = detail
        .model_approval_status
        .as_deref()
        .map(ApprovalStatus::parse);
    if status != Some(ApprovalStatus::Approved) {
        info!(
            model_package_arn = %detail.model_package_arn,
            status = status.as_ref().map(ApprovalStatus::as_str).unwrap_or("-"),
            "model package is not approved; endpoint left unchanged"
        );
        return Ok(None);
    }

    let sagemaker = connect(&config.region);
    let manager = EndpointManager::new(config, &sagemaker, clock);
    let group = detail.model_package_group_name.as_str();

    let model_name = manager.create_model(group, &detail.model_package_arn)?;
    let endpoint_config_name = manager.create_endpoint_config_from_latest(group, &model_name)?;
    manager
        .update_endpoint(&endpoint_name(group), &endpoint_config_name)
        .map(Some)
}
