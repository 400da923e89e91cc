//! AWS SDK implementations of the adapter traits.
//!
//! The traits are synchronous; every call here bridges onto the Lambda tokio
//! runtime with `block_in_place`, so the binaries must run on the
//! multi-threaded runtime.

use std::collections::{BTreeMap, HashMap};
use std::future::Future;

use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_sdk_sagemaker::error::DisplayErrorContext;
use aws_sdk_sagemaker::primitives::DateTime as SmithyDateTime;
use aws_sdk_sagemaker::types as sm;
use aws_sdk_sagemakerruntime::primitives::Blob;
use chrono::{DateTime, Utc};

use crate::adapters::endpoint_runtime::EndpointInvoker;
use crate::adapters::object_store::ObjectReader;
use crate::adapters::sagemaker::SageMakerControl;
use crate::runtime::contract::{
    ApprovalStatus, ContainerDefinition, ContainerMode, CoreDumpConfig, EndpointConfigSummary,
    InvocationRequest, ManagedInstanceScaling, ModelDefinition, ModelPackageDefinition,
    ModelPackageSummary, ProductionVariant, ServerlessVariantConfig,
};

fn block_on<F: Future>(future: F) -> F::Output {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

fn sdk_message<E: std::error::Error>(error: E) -> String {
    DisplayErrorContext(error).to_string()
}

/// Loads the shared SDK configuration, pinning the region when one is given.
pub fn load_sdk_config(region: Option<&str>) -> SdkConfig {
    let region = region.map(|value| Region::new(value.to_string()));
    block_on(async move {
        let loader = aws_config::defaults(BehaviorVersion::latest());
        match region {
            Some(region) => loader.region(region).load().await,
            None => loader.load().await,
        }
    })
}

fn to_chrono(value: &SmithyDateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(value.secs(), value.subsec_nanos())
}

/// The service models most identifiers as optional; a response without one is unusable.
fn required(value: Option<&str>, what: &str) -> Result<String, String> {
    value
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .ok_or_else(|| format!("response is missing {what}"))
}

fn environment_map(environment: &BTreeMap<String, String>) -> Option<HashMap<String, String>> {
    if environment.is_empty() {
        return None;
    }
    Some(
        environment
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect(),
    )
}

fn to_sdk_container(container: &ContainerDefinition) -> sm::ContainerDefinition {
    let mode = match container.mode {
        ContainerMode::SingleModel => None,
        ContainerMode::MultiModel => Some(sm::ContainerMode::MultiModel),
    };
    sm::ContainerDefinition::builder()
        .set_model_package_name(container.model_package_name.clone())
        .set_image(container.image.clone())
        .set_model_data_url(container.model_data_url.clone())
        .set_mode(mode)
        .set_environment(environment_map(&container.environment))
        .build()
}

fn to_sdk_variant(variant: &ProductionVariant) -> sm::ProductionVariant {
    let serverless = variant.serverless.as_ref().map(|config| {
        sm::ProductionVariantServerlessConfig::builder()
            .set_memory_size_in_mb(config.memory_size_in_mb)
            .set_max_concurrency(config.max_concurrency)
            .set_provisioned_concurrency(config.provisioned_concurrency)
            .build()
    });
    let scaling = variant.managed_instance_scaling.as_ref().map(|scaling| {
        sm::ProductionVariantManagedInstanceScaling::builder()
            .set_status(
                scaling
                    .status
                    .as_deref()
                    .map(sm::ManagedInstanceScalingStatus::from),
            )
            .set_min_instance_count(scaling.min_instance_count)
            .set_max_instance_count(scaling.max_instance_count)
            .build()
    });
    let routing = variant.routing_strategy.as_deref().map(|strategy| {
        sm::ProductionVariantRoutingConfig::builder()
            .routing_strategy(sm::RoutingStrategy::from(strategy))
            .build()
    });
    let core_dump = variant.core_dump.as_ref().map(|config| {
        sm::ProductionVariantCoreDumpConfig::builder()
            .set_destination_s3_uri(config.destination_s3_uri.clone())
            .set_kms_key_id(config.kms_key_id.clone())
            .build()
    });

    sm::ProductionVariant::builder()
        .variant_name(&variant.variant_name)
        .model_name(&variant.model_name)
        .set_instance_type(
            variant
                .instance_type
                .as_deref()
                .map(sm::ProductionVariantInstanceType::from),
        )
        .set_initial_instance_count(variant.initial_instance_count)
        .set_initial_variant_weight(variant.initial_variant_weight)
        .set_accelerator_type(
            variant
                .accelerator_type
                .as_deref()
                .map(sm::ProductionVariantAcceleratorType::from),
        )
        .set_serverless_config(serverless)
        .set_volume_size_in_gb(variant.volume_size_in_gb)
        .set_model_data_download_timeout_in_seconds(variant.model_data_download_timeout_in_seconds)
        .set_container_startup_health_check_timeout_in_seconds(
            variant.container_startup_health_check_timeout_in_seconds,
        )
        .set_enable_ssm_access(variant.enable_ssm_access)
        .set_inference_ami_version(
            variant
                .inference_ami_version
                .as_deref()
                .map(sm::ProductionVariantInferenceAmiVersion::from),
        )
        .set_routing_config(routing)
        .set_managed_instance_scaling(scaling)
        .set_core_dump_config(core_dump)
        .build()
}

fn from_sdk_variant(variant: &sm::ProductionVariant) -> Result<ProductionVariant, String> {
    Ok(ProductionVariant {
        variant_name: required(variant.variant_name(), "a production variant name")?,
        model_name: variant.model_name().unwrap_or_default().to_string(),
        instance_type: variant
            .instance_type()
            .map(|value| value.as_str().to_string()),
        initial_instance_count: variant.initial_instance_count(),
        initial_variant_weight: variant.initial_variant_weight(),
        accelerator_type: variant
            .accelerator_type()
            .map(|value| value.as_str().to_string()),
        serverless: variant
            .serverless_config()
            .map(|config| ServerlessVariantConfig {
                memory_size_in_mb: config.memory_size_in_mb(),
                max_concurrency: config.max_concurrency(),
                provisioned_concurrency: config.provisioned_concurrency(),
            }),
        volume_size_in_gb: variant.volume_size_in_gb(),
        model_data_download_timeout_in_seconds: variant.model_data_download_timeout_in_seconds(),
        container_startup_health_check_timeout_in_seconds: variant
            .container_startup_health_check_timeout_in_seconds(),
        enable_ssm_access: variant.enable_ssm_access(),
        inference_ami_version: variant
            .inference_ami_version()
            .map(|value| value.as_str().to_string()),
        routing_strategy: variant
            .routing_config()
            .and_then(|config| config.routing_strategy())
            .map(|value| value.as_str().to_string()),
        managed_instance_scaling: variant.managed_instance_scaling().map(|scaling| {
            ManagedInstanceScaling {
                status: scaling.status().map(|value| value.as_str().to_string()),
                min_instance_count: scaling.min_instance_count(),
                max_instance_count: scaling.max_instance_count(),
            }
        }),
        core_dump: variant.core_dump_config().map(|config| CoreDumpConfig {
            destination_s3_uri: config.destination_s3_uri().map(str::to_string),
            kms_key_id: config.kms_key_id().map(str::to_string),
        }),
    })
}

fn from_sdk_model_package(
    summary: &sm::ModelPackageSummary,
    group: &str,
    status: &ApprovalStatus,
) -> Result<ModelPackageSummary, String> {
    Ok(ModelPackageSummary {
        arn: required(summary.model_package_arn(), "a model package ARN")?,
        group_name: summary
            .model_package_group_name()
            .unwrap_or(group)
            .to_string(),
        approval_status: summary
            .model_approval_status()
            .map(|value| ApprovalStatus::parse(value.as_str()))
            .unwrap_or_else(|| status.clone()),
        creation_time: summary.creation_time().and_then(to_chrono),
    })
}

fn from_sdk_endpoint_config(
    summary: &sm::EndpointConfigSummary,
) -> Result<EndpointConfigSummary, String> {
    Ok(EndpointConfigSummary {
        name: required(summary.endpoint_config_name(), "an endpoint config name")?,
        creation_time: summary.creation_time().and_then(to_chrono),
    })
}

fn to_sdk_inference_specification(
    definition: &ModelPackageDefinition,
) -> sm::InferenceSpecification {
    let container = sm::ModelPackageContainerDefinition::builder()
        .image(&definition.image)
        .model_data_url(&definition.model_data_url)
        .framework(&definition.framework)
        .set_environment(environment_map(&definition.environment))
        .build();

    sm::InferenceSpecification::builder()
        .containers(container)
        .set_supported_transform_instance_types(Some(
            definition
                .supported_transform_instance_types
                .iter()
                .map(|value| sm::TransformInstanceType::from(value.as_str()))
                .collect(),
        ))
        .set_supported_realtime_inference_instance_types(Some(
            definition
                .supported_realtime_inference_instance_types
                .iter()
                .map(|value| sm::ProductionVariantInstanceType::from(value.as_str()))
                .collect(),
        ))
        .set_supported_content_types(Some(definition.supported_content_types.clone()))
        .set_supported_response_mime_types(Some(definition.supported_response_mime_types.clone()))
        .build()
}

/// An endpoint may legitimately answer with no payload.
fn response_body(body: Option<Blob>) -> Vec<u8> {
    body.map(Blob::into_inner).unwrap_or_default()
}

#[derive(Clone)]
pub struct AwsSageMakerControl {
    client: aws_sdk_sagemaker::Client,
}

impl AwsSageMakerControl {
    pub fn connect(region: &str) -> Self {
        let config = load_sdk_config(Some(region));
        Self {
            client: aws_sdk_sagemaker::Client::new(&config),
        }
    }
}

impl SageMakerControl for AwsSageMakerControl {
    fn list_model_packages(
        &self,
        group: &str,
        status: &ApprovalStatus,
    ) -> Result<Vec<ModelPackageSummary>, String> {
        let output = block_on(
            self.client
                .list_model_packages()
                .model_package_group_name(group)
                .model_approval_status(sm::ModelApprovalStatus::from(status.as_str()))
                .sort_by(sm::ModelPackageSortBy::CreationTime)
                .sort_order(sm::SortOrder::Descending)
                .send(),
        )
        .map_err(sdk_message)?;

        output
            .model_package_summary_list()
            .iter()
            .map(|summary| from_sdk_model_package(summary, group, status))
            .collect()
    }

    fn create_model(&self, model: &ModelDefinition) -> Result<(), String> {
        let containers = model.containers.iter().map(to_sdk_container).collect();
        block_on(
            self.client
                .create_model()
                .model_name(&model.model_name)
                .execution_role_arn(&model.execution_role_arn)
                .set_containers(Some(containers))
                .send(),
        )
        .map(|_| ())
        .map_err(sdk_message)
    }

    fn create_endpoint_config(
        &self,
        name: &str,
        variants: &[ProductionVariant],
    ) -> Result<(), String> {
        let variants = variants.iter().map(to_sdk_variant).collect();
        block_on(
            self.client
                .create_endpoint_config()
                .endpoint_config_name(name)
                .set_production_variants(Some(variants))
                .send(),
        )
        .map(|_| ())
        .map_err(sdk_message)
    }

    fn list_endpoint_configs(
        &self,
        name_contains: &str,
    ) -> Result<Vec<EndpointConfigSummary>, String> {
        let output = block_on(
            self.client
                .list_endpoint_configs()
                .name_contains(name_contains)
                .sort_by(sm::EndpointConfigSortKey::CreationTime)
                .sort_order(sm::OrderKey::Descending)
                .send(),
        )
        .map_err(sdk_message)?;

        output
            .endpoint_configs()
            .iter()
            .map(from_sdk_endpoint_config)
            .collect()
    }

    fn describe_endpoint_config(&self, name: &str) -> Result<Vec<ProductionVariant>, String> {
        let output = block_on(
            self.client
                .describe_endpoint_config()
                .endpoint_config_name(name)
                .send(),
        )
        .map_err(sdk_message)?;

        output
            .production_variants()
            .iter()
            .map(from_sdk_variant)
            .collect()
    }

    fn create_endpoint(&self, endpoint_name: &str, config_name: &str) -> Result<(), String> {
        block_on(
            self.client
                .create_endpoint()
                .endpoint_name(endpoint_name)
                .endpoint_config_name(config_name)
                .send(),
        )
        .map(|_| ())
        .map_err(sdk_message)
    }

    fn update_endpoint(&self, endpoint_name: &str, config_name: &str) -> Result<(), String> {
        block_on(
            self.client
                .update_endpoint()
                .endpoint_name(endpoint_name)
                .endpoint_config_name(config_name)
                .send(),
        )
        .map(|_| ())
        .map_err(sdk_message)
    }

    fn describe_model_package_group(&self, group: &str) -> Result<String, String> {
        let output = block_on(
            self.client
                .describe_model_package_group()
                .model_package_group_name(group)
                .send(),
        )
        .map_err(sdk_message)?;
        required(output.model_package_group_arn(), "a model package group ARN")
    }

    fn create_model_package_group(&self, group: &str) -> Result<String, String> {
        let output = block_on(
            self.client
                .create_model_package_group()
                .model_package_group_name(group)
                .send(),
        )
        .map_err(sdk_message)?;
        required(output.model_package_group_arn(), "a model package group ARN")
    }

    fn create_model_package(
        &self,
        definition: &ModelPackageDefinition,
    ) -> Result<String, String> {
        let specification = to_sdk_inference_specification(definition);

        let output = block_on(
            self.client
                .create_model_package()
                .model_package_group_name(&definition.model_package_group)
                .model_approval_status(sm::ModelApprovalStatus::from(
                    definition.approval_status.as_str(),
                ))
                .inference_specification(specification)
                .send(),
        )
        .map_err(sdk_message)?;
        required(output.model_package_arn(), "a model package ARN")
    }
}

#[derive(Clone)]
pub struct AwsEndpointInvoker {
    client: aws_sdk_sagemakerruntime::Client,
}

impl AwsEndpointInvoker {
    pub fn connect(region: &str) -> Self {
        let config = load_sdk_config(Some(region));
        Self {
            client: aws_sdk_sagemakerruntime::Client::new(&config),
        }
    }
}

impl EndpointInvoker for AwsEndpointInvoker {
    fn invoke(&self, request: &InvocationRequest) -> Result<Vec<u8>, String> {
        let output = block_on(
            self.client
                .invoke_endpoint()
                .endpoint_name(&request.endpoint_name)
                .content_type(&request.content_type)
                .set_target_model(request.target_model.clone())
                .body(Blob::new(request.body.clone()))
                .send(),
        )
        .map_err(sdk_message)?;
        Ok(response_body(output.body))
    }
}

#[derive(Clone)]
pub struct AwsObjectReader {
    client: aws_sdk_s3::Client,
}

impl AwsObjectReader {
    /// Uses the default region chain; batch output may live in any region.
    pub fn connect() -> Self {
        let config = load_sdk_config(None);
        Self {
            client: aws_sdk_s3::Client::new(&config),
        }
    }
}

impl ObjectReader for AwsObjectReader {
    fn list_keys(&self, bucket: &str, prefix: &str) -> Result<Vec<String>, String> {
        block_on(async {
            let mut keys = Vec::new();
            let mut pages = self
                .client
                .list_objects_v2()
                .bucket(bucket)
                .prefix(prefix)
                .into_paginator()
                .send();
            while let Some(page) = pages.next().await {
                let page = page.map_err(sdk_message)?;
                keys.extend(
                    page.contents()
                        .iter()
                        .filter_map(|object| object.key())
                        .map(str::to_string),
                );
            }
            Ok::<_, String>(keys)
        })
    }

    fn read_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, String> {
        block_on(async {
            let output = self
                .client
                .get_object()
                .bucket(bucket)
                .key(key)
                .send()
                .await
                .map_err(sdk_message)?;
            let data = output
                .body
                .collect()
                .await
                .map_err(|error| format!("failed to read object body: {error}"))?;
            Ok::<_, String>(data.into_bytes().to_vec())
        })
    }
}
