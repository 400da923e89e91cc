use tracing::{info, warn};

use crate::adapters::sagemaker::SageMakerControl;
use crate::error::OrchestrationError;
use crate::manager::inference_environment;
use crate::runtime::config::MultiModelConfig;
use crate::runtime::contract::{
    ApprovalStatus, ModelPackageDefinition, RegisterModelEvent, REGISTRATION_CONTENT_TYPE,
    REGISTRATION_FRAMEWORK,
};
use crate::runtime::naming::s3_url;

/// Registers trained artifacts as approved model packages.
pub struct ModelRegistration<'a> {
    config: MultiModelConfig,
    sagemaker: &'a dyn SageMakerControl,
}

impl<'a> ModelRegistration<'a> {
    pub fn new(config: MultiModelConfig, sagemaker: &'a dyn SageMakerControl) -> Self {
        Self { config, sagemaker }
    }

    /// Any describe failure is read as "group does not exist yet".
    pub fn find_or_create_model_package_group(
        &self,
        group: &str,
    ) -> Result<String, OrchestrationError> {
        match self.sagemaker.describe_model_package_group(group) {
            Ok(arn) => Ok(arn),
            Err(message) => {
                warn!(group, error = %message, "model package group lookup failed; creating it");
                let arn = self
                    .sagemaker
                    .create_model_package_group(group)
                    .map_err(OrchestrationError::remote("CreateModelPackageGroup"))?;
                info!(group, model_package_group_arn = %arn, "created model package group");
                Ok(arn)
            }
        }
    }

    pub fn package_definition(
        &self,
        group_arn: &str,
        request: &RegisterModelEvent,
    ) -> ModelPackageDefinition {
        ModelPackageDefinition {
            model_package_group: group_arn.to_string(),
            approval_status: ApprovalStatus::Approved,
            image: self.config.inference_image.clone(),
            model_data_url: s3_url(
                &self.config.model_artifact_bucket,
                &request.model_artifact_s3_key,
            ),
            framework: REGISTRATION_FRAMEWORK.to_string(),
            environment: inference_environment(
                &self.config.region,
                &self.config.code_storage_bucket,
                &request.code_storage_s3_key,
            ),
            supported_transform_instance_types: vec![request.transform_instance_type.clone()],
            supported_realtime_inference_instance_types: vec![request
                .inference_instance_type
                .clone()],
            supported_content_types: vec![REGISTRATION_CONTENT_TYPE.to_string()],
            supported_response_mime_types: vec![REGISTRATION_CONTENT_TYPE.to_string()],
        }
    }

    pub fn create_model_package(
        &self,
        group_arn: &str,
        request: &RegisterModelEvent,
    ) -> Result<String, OrchestrationError> {
        let definition = self.package_definition(group_arn, request);
        let arn = self
            .sagemaker
            .create_model_package(&definition)
            .map_err(OrchestrationError::remote("CreateModelPackage"))?;
        info!(
            model_package_group_arn = group_arn,
            model_package_arn = %arn,
            model_data_url = %definition.model_data_url,
            "registered model package"
        );
        Ok(arn)
    }
}
