use serde_json::Value;
use tracing::info;

use crate::adapters::sagemaker::SageMakerControl;
use crate::error::OrchestrationError;
use crate::handlers::parse_event;
use crate::registration::ModelRegistration;
use crate::runtime::config::MultiModelConfig;
use crate::runtime::contract::{RegisterModelEvent, RegistrationResponse};

pub fn handle_register_model<S: SageMakerControl>(
    payload: Value,
    lookup: impl Fn(&str) -> Option<String>,
    connect: impl FnOnce(&str) -> S,
) -> Result<RegistrationResponse, OrchestrationError> {
    let event: RegisterModelEvent = parse_event(payload)?;
    info!(component = "register_model", ?event, "received event");

    let config = MultiModelConfig::from_lookup(lookup).map_err(OrchestrationError::Config)?;
    event
        .validate()
        .map_err(OrchestrationError::invalid_event)?;

    let sagemaker = connect(&config.region);
    let registration = ModelRegistration::new(config, &sagemaker);

    let model_package_group_arn =
        registration.find_or_create_model_package_group(&event.model_package_group_name)?;
    let model_package_arn = registration.create_model_package(&model_package_group_arn, &event)?;

    Ok(RegistrationResponse {
        model_package_group_arn,
        model_package_arn,
    })
}
