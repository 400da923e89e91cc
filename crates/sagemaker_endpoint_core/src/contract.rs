use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const ALL_TRAFFIC_VARIANT_NAME: &str = "AllTraffic";
pub const INVOCATION_CONTENT_TYPE: &str = "application/json";
pub const REGISTRATION_CONTENT_TYPE: &str = "text/csv";
pub const REGISTRATION_FRAMEWORK: &str = "SKLEARN";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TransformOutput {
    #[serde(rename = "S3OutputPath")]
    pub s3_output_path: String,
}

/// Batch transform state-change payload. Only `TransformOutput` is read.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PostInferenceEvent {
    #[serde(rename = "TransformOutput")]
    pub transform_output: TransformOutput,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreateEndpointEvent {
    pub model_package_group_name: String,
    pub instance_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreateMultiModelEndpointEvent {
    pub model_package_group_name: String,
    pub code_s3_key: String,
    pub model_artifacts_s3_prefix: String,
    pub instance_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InvokeEndpointEvent {
    pub endpoint_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_model: Option<String>,
    pub body: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct ModelPackageStateChangeDetail {
    pub model_package_group_name: String,
    pub model_package_arn: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_approval_status: Option<String>,
}

/// EventBridge envelope; `detail` carries the service-specific payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EventBridgeEvent<T> {
    #[serde(rename = "detail-type", default)]
    pub detail_type: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    pub detail: T,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RegisterModelEvent {
    pub model_artifact_s3_key: String,
    pub code_storage_s3_key: String,
    pub model_package_group_name: String,
    pub transform_instance_type: String,
    pub inference_instance_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApprovalStatus {
    Approved,
    Rejected,
    PendingManualApproval,
    Other(String),
}

impl ApprovalStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
            Self::PendingManualApproval => "PendingManualApproval",
            Self::Other(value) => value,
        }
    }

    pub fn parse(value: &str) -> Self {
        match value {
            "Approved" => Self::Approved,
            "Rejected" => Self::Rejected,
            "PendingManualApproval" => Self::PendingManualApproval,
            other => Self::Other(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelPackageSummary {
    pub arn: String,
    pub group_name: String,
    pub approval_status: ApprovalStatus,
    pub creation_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointConfigSummary {
    pub name: String,
    pub creation_time: Option<DateTime<Utc>>,
}

/// One weighted model/instance binding inside an endpoint configuration.
///
/// Carries every setting an endpoint configuration can hold for a variant so
/// that a described variant can be re-created with only `model_name` changed.
/// Provisioned variants set `instance_type`; serverless ones set `serverless`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductionVariant {
    pub variant_name: String,
    pub model_name: String,
    pub instance_type: Option<String>,
    pub initial_instance_count: Option<i32>,
    pub initial_variant_weight: Option<f32>,
    pub accelerator_type: Option<String>,
    pub serverless: Option<ServerlessVariantConfig>,
    pub volume_size_in_gb: Option<i32>,
    pub model_data_download_timeout_in_seconds: Option<i32>,
    pub container_startup_health_check_timeout_in_seconds: Option<i32>,
    pub enable_ssm_access: Option<bool>,
    pub inference_ami_version: Option<String>,
    pub routing_strategy: Option<String>,
    pub managed_instance_scaling: Option<ManagedInstanceScaling>,
    pub core_dump: Option<CoreDumpConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerlessVariantConfig {
    pub memory_size_in_mb: Option<i32>,
    pub max_concurrency: Option<i32>,
    pub provisioned_concurrency: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManagedInstanceScaling {
    pub status: Option<String>,
    pub min_instance_count: Option<i32>,
    pub max_instance_count: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoreDumpConfig {
    pub destination_s3_uri: Option<String>,
    pub kms_key_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerMode {
    SingleModel,
    MultiModel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerDefinition {
    pub model_package_name: Option<String>,
    pub image: Option<String>,
    pub model_data_url: Option<String>,
    pub mode: ContainerMode,
    pub environment: BTreeMap<String, String>,
}

impl ContainerDefinition {
    pub fn from_model_package(model_package_arn: impl Into<String>) -> Self {
        Self {
            model_package_name: Some(model_package_arn.into()),
            image: None,
            model_data_url: None,
            mode: ContainerMode::SingleModel,
            environment: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelDefinition {
    pub model_name: String,
    pub execution_role_arn: String,
    pub containers: Vec<ContainerDefinition>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelPackageDefinition {
    pub model_package_group: String,
    pub approval_status: ApprovalStatus,
    pub image: String,
    pub model_data_url: String,
    pub framework: String,
    pub environment: BTreeMap<String, String>,
    pub supported_transform_instance_types: Vec<String>,
    pub supported_realtime_inference_instance_types: Vec<String>,
    pub supported_content_types: Vec<String>,
    pub supported_response_mime_types: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationResponse {
    pub model_package_group_arn: String,
    pub model_package_arn: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationRequest {
    pub endpoint_name: String,
    pub target_model: Option<String>,
    pub content_type: String,
    pub body: Vec<u8>,
}

impl InvocationRequest {
    /// An empty `targetModel` is treated the same as an absent one.
    pub fn from_event(event: &InvokeEndpointEvent) -> Self {
        Self {
            endpoint_name: event.endpoint_name.clone(),
            target_model: event
                .target_model
                .as_ref()
                .filter(|value| !value.is_empty())
                .cloned(),
            content_type: INVOCATION_CONTENT_TYPE.to_string(),
            body: event.body.clone().into_bytes(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ValidationError {}

pub fn require_field(name: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(format!("{name} cannot be empty")));
    }
    Ok(())
}

impl CreateEndpointEvent {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_field("modelPackageGroupName", &self.model_package_group_name)?;
        require_field("instanceType", &self.instance_type)
    }
}

impl CreateMultiModelEndpointEvent {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_field("modelPackageGroupName", &self.model_package_group_name)?;
        require_field("codeS3Key", &self.code_s3_key)?;
        require_field("modelArtifactsS3Prefix", &self.model_artifacts_s3_prefix)?;
        require_field("instanceType", &self.instance_type)
    }
}

impl InvokeEndpointEvent {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_field("endpointName", &self.endpoint_name)
    }
}

impl ModelPackageStateChangeDetail {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_field("ModelPackageGroupName", &self.model_package_group_name)?;
        require_field("ModelPackageArn", &self.model_package_arn)
    }
}

impl RegisterModelEvent {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_field("modelPackageGroupName", &self.model_package_group_name)?;
        require_field("modelArtifactS3Key", &self.model_artifact_s3_key)?;
        require_field("codeStorageS3Key", &self.code_storage_s3_key)?;
        require_field("transformInstanceType", &self.transform_instance_type)?;
        require_field("inferenceInstanceType", &self.inference_instance_type)
    }
}
