//! Process configuration read from the Lambda environment.
//!
//! Every loader takes a lookup function so handlers can be exercised without
//! touching the real environment. Blank values count as missing, and the
//! resulting error names every missing variable at once.

use crate::contract::ValidationError;

pub const SAGEMAKER_REGION: &str = "SAGEMAKER_REGION";
pub const EXECUTION_ROLE_ARN: &str = "EXECUTION_ROLE_ARN";
pub const MODEL_ARTIFACT_BUCKET: &str = "MODEL_ARTIFACT_BUCKET";
pub const CODE_STORAGE_BUCKET: &str = "CODE_STORAGE_BUCKET";
pub const INFERENCE_IMAGE_URI: &str = "INFERENCE_IMAGE_URI";

pub const DEFAULT_INFERENCE_IMAGE: &str =
    "366743142698.dkr.ecr.ap-northeast-2.amazonaws.com/sagemaker-scikit-learn:1.2-1-cpu-py3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointManagerConfig {
    pub region: String,
    pub execution_role_arn: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiModelConfig {
    pub region: String,
    pub model_artifact_bucket: String,
    pub code_storage_bucket: String,
    pub inference_image: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvokeConfig {
    pub region: String,
}

impl EndpointManagerConfig {
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ValidationError> {
        let [region, execution_role_arn] =
            require_all(&lookup, [SAGEMAKER_REGION, EXECUTION_ROLE_ARN])?;
        Ok(Self {
            region,
            execution_role_arn,
        })
    }

    pub fn from_env() -> Result<Self, ValidationError> {
        Self::from_lookup(env_lookup)
    }
}

impl MultiModelConfig {
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ValidationError> {
        let [region, model_artifact_bucket, code_storage_bucket] = require_all(
            &lookup,
            [SAGEMAKER_REGION, MODEL_ARTIFACT_BUCKET, CODE_STORAGE_BUCKET],
        )?;
        let inference_image = non_blank(&lookup, INFERENCE_IMAGE_URI)
            .unwrap_or_else(|| DEFAULT_INFERENCE_IMAGE.to_string());
        Ok(Self {
            region,
            model_artifact_bucket,
            code_storage_bucket,
            inference_image,
        })
    }

    pub fn from_env() -> Result<Self, ValidationError> {
        Self::from_lookup(env_lookup)
    }
}

impl InvokeConfig {
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ValidationError> {
        let [region] = require_all(&lookup, [SAGEMAKER_REGION])?;
        Ok(Self { region })
    }

    pub fn from_env() -> Result<Self, ValidationError> {
        Self::from_lookup(env_lookup)
    }
}

pub fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn non_blank(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn require_all<const N: usize>(
    lookup: &impl Fn(&str) -> Option<String>,
    keys: [&str; N],
) -> Result<[String; N], ValidationError> {
    let values = keys.map(|key| non_blank(lookup, key));
    let missing: Vec<&str> = keys
        .iter()
        .zip(values.iter())
        .filter(|(_, value)| value.is_none())
        .map(|(key, _)| *key)
        .collect();

    if !missing.is_empty() {
        return Err(ValidationError::new(format!(
            "{} must be set",
            missing.join(" | ")
        )));
    }

    Ok(values.map(Option::unwrap_or_default))
}
