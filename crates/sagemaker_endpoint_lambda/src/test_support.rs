use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use chrono::{DateTime, TimeZone, Utc};

use crate::adapters::clock::Clock;
use crate::adapters::endpoint_runtime::EndpointInvoker;
use crate::adapters::object_store::ObjectReader;
use crate::adapters::sagemaker::SageMakerControl;
use crate::runtime::config::{
    EndpointManagerConfig, MultiModelConfig, CODE_STORAGE_BUCKET, EXECUTION_ROLE_ARN,
    MODEL_ARTIFACT_BUCKET, SAGEMAKER_REGION,
};
use crate::runtime::contract::{
    ApprovalStatus, EndpointConfigSummary, InvocationRequest, ModelDefinition,
    ModelPackageDefinition, ModelPackageSummary, ProductionVariant,
};

pub fn manager_config() -> EndpointManagerConfig {
    EndpointManagerConfig {
        region: "ap-northeast-2".to_string(),
        execution_role_arn: "arn:aws:iam::123:role/sagemaker".to_string(),
    }
}

pub fn multi_model_config() -> MultiModelConfig {
    MultiModelConfig {
        region: "ap-northeast-2".to_string(),
        model_artifact_bucket: "model-bucket".to_string(),
        code_storage_bucket: "code-bucket".to_string(),
        inference_image: "123.dkr.ecr.ap-northeast-2.amazonaws.com/sklearn:1.2-1".to_string(),
    }
}

/// Environment with every variable any handler needs.
pub fn full_env() -> HashMap<String, String> {
    HashMap::from([
        (SAGEMAKER_REGION.to_string(), "ap-northeast-2".to_string()),
        (
            EXECUTION_ROLE_ARN.to_string(),
            "arn:aws:iam::123:role/sagemaker".to_string(),
        ),
        (MODEL_ARTIFACT_BUCKET.to_string(), "model-bucket".to_string()),
        (CODE_STORAGE_BUCKET.to_string(), "code-bucket".to_string()),
    ])
}

pub fn env_without(key: &str) -> HashMap<String, String> {
    let mut env = full_env();
    env.insert(key.to_string(), String::new());
    env
}

pub struct FixedClock(pub DateTime<Utc>);

impl Default for FixedClock {
    fn default() -> Self {
        Self(
            Utc.with_ymd_and_hms(2026, 2, 14, 9, 5, 7)
                .single()
                .expect("valid timestamp"),
        )
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    ListModelPackages(String),
    CreateModel(String),
    CreateEndpointConfig(String),
    ListEndpointConfigs(String),
    DescribeEndpointConfig(String),
    CreateEndpoint(String, String),
    UpdateEndpoint(String, String),
    DescribeModelPackageGroup(String),
    CreateModelPackageGroup(String),
    CreateModelPackage(String),
}

#[derive(Default)]
struct SageMakerState {
    calls: Vec<RecordedCall>,
    model_packages: Vec<ModelPackageSummary>,
    endpoint_configs: Vec<(EndpointConfigSummary, Vec<ProductionVariant>)>,
    package_groups: BTreeMap<String, String>,
    created_models: Vec<ModelDefinition>,
    created_endpoint_configs: Vec<(String, Vec<ProductionVariant>)>,
    created_model_packages: Vec<ModelPackageDefinition>,
}

/// In-memory control plane. Listings come back in insertion order, which is
/// not necessarily newest first.
#[derive(Default)]
pub struct RecordingSageMaker {
    state: Mutex<SageMakerState>,
    failing_operation: Option<&'static str>,
}

impl RecordingSageMaker {
    pub fn failing_on(operation: &'static str) -> Self {
        Self {
            state: Mutex::new(SageMakerState::default()),
            failing_operation: Some(operation),
        }
    }

    pub fn add_model_package(&self, arn: &str, status: ApprovalStatus, created: DateTime<Utc>) {
        self.state
            .lock()
            .expect("poisoned mutex")
            .model_packages
            .push(ModelPackageSummary {
                arn: arn.to_string(),
                group_name: "my-model".to_string(),
                approval_status: status,
                creation_time: Some(created),
            });
    }

    pub fn add_endpoint_config(
        &self,
        name: &str,
        created: Option<DateTime<Utc>>,
        variants: Vec<ProductionVariant>,
    ) {
        self.state
            .lock()
            .expect("poisoned mutex")
            .endpoint_configs
            .push((
                EndpointConfigSummary {
                    name: name.to_string(),
                    creation_time: created,
                },
                variants,
            ));
    }

    pub fn add_package_group(&self, group: &str, arn: &str) {
        self.state
            .lock()
            .expect("poisoned mutex")
            .package_groups
            .insert(group.to_string(), arn.to_string());
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.lock().expect("poisoned mutex").calls.clone()
    }

    pub fn created_models(&self) -> Vec<ModelDefinition> {
        self.state.lock().expect("poisoned mutex").created_models.clone()
    }

    pub fn created_endpoint_configs(&self) -> Vec<(String, Vec<ProductionVariant>)> {
        self.state
            .lock()
            .expect("poisoned mutex")
            .created_endpoint_configs
            .clone()
    }

    pub fn created_model_packages(&self) -> Vec<ModelPackageDefinition> {
        self.state
            .lock()
            .expect("poisoned mutex")
            .created_model_packages
            .clone()
    }

    fn record(&self, operation: &'static str, call: RecordedCall) -> Result<(), String> {
        self.state.lock().expect("poisoned mutex").calls.push(call);
        if self.failing_operation == Some(operation) {
            return Err(format!("simulated {operation} failure"));
        }
        Ok(())
    }
}

impl SageMakerControl for RecordingSageMaker {
    fn list_model_packages(
        &self,
        group: &str,
        status: &ApprovalStatus,
    ) -> Result<Vec<ModelPackageSummary>, String> {
        self.record(
            "ListModelPackages",
            RecordedCall::ListModelPackages(group.to_string()),
        )?;
        Ok(self
            .state
            .lock()
            .expect("poisoned mutex")
            .model_packages
            .iter()
            .filter(|package| &package.approval_status == status)
            .cloned()
            .collect())
    }

    fn create_model(&self, model: &ModelDefinition) -> Result<(), String> {
        self.record(
            "CreateModel",
            RecordedCall::CreateModel(model.model_name.clone()),
        )?;
        self.state
            .lock()
            .expect("poisoned mutex")
            .created_models
            .push(model.clone());
        Ok(())
    }

    fn create_endpoint_config(
        &self,
        name: &str,
        variants: &[ProductionVariant],
    ) -> Result<(), String> {
        self.record(
            "CreateEndpointConfig",
            RecordedCall::CreateEndpointConfig(name.to_string()),
        )?;
        self.state
            .lock()
            .expect("poisoned mutex")
            .created_endpoint_configs
            .push((name.to_string(), variants.to_vec()));
        Ok(())
    }

    fn list_endpoint_configs(
        &self,
        name_contains: &str,
    ) -> Result<Vec<EndpointConfigSummary>, String> {
        self.record(
            "ListEndpointConfigs",
            RecordedCall::ListEndpointConfigs(name_contains.to_string()),
        )?;
        Ok(self
            .state
            .lock()
            .expect("poisoned mutex")
            .endpoint_configs
            .iter()
            .filter(|(summary, _)| summary.name.contains(name_contains))
            .map(|(summary, _)| summary.clone())
            .collect())
    }

    fn describe_endpoint_config(&self, name: &str) -> Result<Vec<ProductionVariant>, String> {
        self.record(
            "DescribeEndpointConfig",
            RecordedCall::DescribeEndpointConfig(name.to_string()),
        )?;
        self.state
            .lock()
            .expect("poisoned mutex")
            .endpoint_configs
            .iter()
            .find(|(summary, _)| summary.name == name)
            .map(|(_, variants)| variants.clone())
            .ok_or_else(|| format!("Could not find endpoint configuration \"{name}\""))
    }

    fn create_endpoint(&self, endpoint_name: &str, config_name: &str) -> Result<(), String> {
        self.record(
            "CreateEndpoint",
            RecordedCall::CreateEndpoint(endpoint_name.to_string(), config_name.to_string()),
        )
    }

    fn update_endpoint(&self, endpoint_name: &str, config_name: &str) -> Result<(), String> {
        self.record(
            "UpdateEndpoint",
            RecordedCall::UpdateEndpoint(endpoint_name.to_string(), config_name.to_string()),
        )
    }

    fn describe_model_package_group(&self, group: &str) -> Result<String, String> {
        self.record(
            "DescribeModelPackageGroup",
            RecordedCall::DescribeModelPackageGroup(group.to_string()),
        )?;
        self.state
            .lock()
            .expect("poisoned mutex")
            .package_groups
            .get(group)
            .cloned()
            .ok_or_else(|| format!("ModelPackageGroup {group} does not exist"))
    }

    fn create_model_package_group(&self, group: &str) -> Result<String, String> {
        self.record(
            "CreateModelPackageGroup",
            RecordedCall::CreateModelPackageGroup(group.to_string()),
        )?;
        let arn = format!("arn:aws:sagemaker:ap-northeast-2:123:model-package-group/{group}");
        self.state
            .lock()
            .expect("poisoned mutex")
            .package_groups
            .insert(group.to_string(), arn.clone());
        Ok(arn)
    }

    fn create_model_package(
        &self,
        definition: &ModelPackageDefinition,
    ) -> Result<String, String> {
        self.record(
            "CreateModelPackage",
            RecordedCall::CreateModelPackage(definition.model_package_group.clone()),
        )?;
        let mut state = self.state.lock().expect("poisoned mutex");
        state.created_model_packages.push(definition.clone());
        Ok(format!(
            "{}/{}",
            definition.model_package_group,
            state.created_model_packages.len()
        ))
    }
}

#[derive(Default)]
pub struct RecordingInvoker {
    requests: Mutex<Vec<InvocationRequest>>,
    response: Vec<u8>,
}

impl RecordingInvoker {
    pub fn responding_with(response: &[u8]) -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            response: response.to_vec(),
        }
    }

    pub fn requests(&self) -> Vec<InvocationRequest> {
        self.requests.lock().expect("poisoned mutex").clone()
    }
}

impl EndpointInvoker for RecordingInvoker {
    fn invoke(&self, request: &InvocationRequest) -> Result<Vec<u8>, String> {
        self.requests
            .lock()
            .expect("poisoned mutex")
            .push(request.clone());
        Ok(self.response.clone())
    }
}

/// Bucket contents keyed by object key; keys listed in `unreadable` fail on read.
#[derive(Default)]
pub struct RecordingObjectStore {
    objects: BTreeMap<String, Vec<u8>>,
    unreadable: Vec<String>,
    listed: Mutex<Vec<(String, String)>>,
}

impl RecordingObjectStore {
    pub fn with_objects(objects: &[(&str, &str)]) -> Self {
        Self {
            objects: objects
                .iter()
                .map(|(key, body)| (key.to_string(), body.as_bytes().to_vec()))
                .collect(),
            unreadable: Vec::new(),
            listed: Mutex::new(Vec::new()),
        }
    }

    pub fn unreadable(mut self, key: &str) -> Self {
        self.unreadable.push(key.to_string());
        self
    }

    pub fn listed(&self) -> Vec<(String, String)> {
        self.listed.lock().expect("poisoned mutex").clone()
    }
}

impl ObjectReader for RecordingObjectStore {
    fn list_keys(&self, bucket: &str, prefix: &str) -> Result<Vec<String>, String> {
        self.listed
            .lock()
            .expect("poisoned mutex")
            .push((bucket.to_string(), prefix.to_string()));
        Ok(self
            .objects
            .keys()
            .filter(|key| key.starts_with(prefix))
            .cloned()
            .collect())
    }

    fn read_object(&self, _bucket: &str, key: &str) -> Result<Vec<u8>, String> {
        if self.unreadable.iter().any(|denied| denied == key) {
            return Err(format!("simulated read failure for key: {key}"));
        }
        self.objects
            .get(key)
            .cloned()
            .ok_or_else(|| format!("NoSuchKey: {key}"))
    }
}
