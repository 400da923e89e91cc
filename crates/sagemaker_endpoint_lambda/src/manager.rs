use std::collections::BTreeMap;

use tracing::info;

use crate::adapters::clock::Clock;
use crate::adapters::sagemaker::SageMakerControl;
use crate::error::OrchestrationError;
use crate::runtime::config::{EndpointManagerConfig, MultiModelConfig};
use crate::runtime::contract::{
    ApprovalStatus, ContainerDefinition, ContainerMode, ModelDefinition, ModelPackageSummary,
};
use crate::runtime::naming::{
    endpoint_config_name, endpoint_config_name_filter, endpoint_name, model_name, s3_url,
};
use crate::runtime::selection::{
    latest_approved_model_package, latest_endpoint_config, single_traffic_variant,
    with_model_name,
};

pub const INFERENCE_PROGRAM: &str = "inference.py";
pub const CONTAINER_LOG_LEVEL: &str = "20";

/// Environment handed to the scikit-learn serving container.
pub fn inference_environment(
    region: &str,
    code_bucket: &str,
    code_key: &str,
) -> BTreeMap<String, String> {
    BTreeMap::from([
        (
            "SAGEMAKER_CONTAINER_LOG_LEVEL".to_string(),
            CONTAINER_LOG_LEVEL.to_string(),
        ),
        ("SAGEMAKER_PROGRAM".to_string(), INFERENCE_PROGRAM.to_string()),
        ("SAGEMAKER_REGION".to_string(), region.to_string()),
        (
            "SAGEMAKER_SUBMIT_DIRECTORY".to_string(),
            s3_url(code_bucket, code_key),
        ),
    ])
}

/// Sequences control-plane calls that turn a model package group into a
/// served endpoint.
///
/// Each method issues its calls in order and stops at the first failure.
/// Nothing is retried, and resources created before a failure are left in
/// place.
pub struct EndpointManager<'a> {
    config: EndpointManagerConfig,
    sagemaker: &'a dyn SageMakerControl,
    clock: &'a dyn Clock,
}

impl<'a> EndpointManager<'a> {
    pub fn new(
        config: EndpointManagerConfig,
        sagemaker: &'a dyn SageMakerControl,
        clock: &'a dyn Clock,
    ) -> Self {
        Self {
            config,
            sagemaker,
            clock,
        }
    }

    pub fn find_latest_model_package(
        &self,
        group: &str,
    ) -> Result<ModelPackageSummary, OrchestrationError> {
        let packages = self
            .sagemaker
            .list_model_packages(group, &ApprovalStatus::Approved)
            .map_err(OrchestrationError::remote("ListModelPackages"))?;

        let latest =
            latest_approved_model_package(packages).ok_or_else(|| OrchestrationError::NotFound {
                resource: "approved model package",
                lookup: group.to_string(),
            })?;
        info!(group, model_package_arn = %latest.arn, "selected latest approved model package");
        Ok(latest)
    }

    pub fn create_model(
        &self,
        group: &str,
        model_package_arn: &str,
    ) -> Result<String, OrchestrationError> {
        let name = model_name(group, self.clock.now());
        let model = ModelDefinition {
            model_name: name.clone(),
            execution_role_arn: self.config.execution_role_arn.clone(),
            containers: vec![ContainerDefinition::from_model_package(model_package_arn)],
        };

        self.sagemaker
            .create_model(&model)
            .map_err(OrchestrationError::remote("CreateModel"))?;
        info!(group, model_name = %name, model_package_arn, "created model");
        Ok(name)
    }

    pub fn create_multi_model(
        &self,
        group: &str,
        model_artifacts_prefix: &str,
        code_key: &str,
        multi_model: &MultiModelConfig,
    ) -> Result<String, OrchestrationError> {
        let name = model_name(group, self.clock.now());
        let container = ContainerDefinition {
            model_package_name: None,
            image: Some(multi_model.inference_image.clone()),
            model_data_url: Some(s3_url(
                &multi_model.model_artifact_bucket,
                model_artifacts_prefix,
            )),
            mode: ContainerMode::MultiModel,
            environment: inference_environment(
                &multi_model.region,
                &multi_model.code_storage_bucket,
                code_key,
            ),
        };
        let model = ModelDefinition {
            model_name: name.clone(),
            execution_role_arn: self.config.execution_role_arn.clone(),
            containers: vec![container],
        };

        self.sagemaker
            .create_model(&model)
            .map_err(OrchestrationError::remote("CreateModel"))?;
        info!(group, model_name = %name, model_artifacts_prefix, "created multi-model");
        Ok(name)
    }

    pub fn create_endpoint_config(
        &self,
        group: &str,
        instance_type: &str,
        model_name: &str,
    ) -> Result<String, OrchestrationError> {
        let name = endpoint_config_name(group, self.clock.now());
        let variants = [single_traffic_variant(instance_type, model_name)];

        self.sagemaker
            .create_endpoint_config(&name, &variants)
            .map_err(OrchestrationError::remote("CreateEndpointConfig"))?;
        info!(group, endpoint_config_name = %name, model_name, instance_type, "created endpoint config");
        Ok(name)
    }

    /// Copies the newest configuration of `group`, pointing every variant at
    /// `new_model_name`.
    pub fn create_endpoint_config_from_latest(
        &self,
        group: &str,
        new_model_name: &str,
    ) -> Result<String, OrchestrationError> {
        let name = endpoint_config_name(group, self.clock.now());
        let filter = endpoint_config_name_filter(group);

        let configs = self
            .sagemaker
            .list_endpoint_configs(&filter)
            .map_err(OrchestrationError::remote("ListEndpointConfigs"))?;
        let latest = latest_endpoint_config(configs).ok_or_else(|| OrchestrationError::NotFound {
            resource: "endpoint config",
            lookup: filter.clone(),
        })?;

        let variants = self
            .sagemaker
            .describe_endpoint_config(&latest.name)
            .map_err(OrchestrationError::remote("DescribeEndpointConfig"))?;
        let variants = with_model_name(variants, new_model_name);

        self.sagemaker
            .create_endpoint_config(&name, &variants)
            .map_err(OrchestrationError::remote("CreateEndpointConfig"))?;
        info!(
            group,
            source_endpoint_config = %latest.name,
            endpoint_config_name = %name,
            model_name = new_model_name,
            variants = variants.len(),
            "cloned endpoint config"
        );
        Ok(name)
    }

    pub fn create_endpoint(
        &self,
        group: &str,
        config_name: &str,
    ) -> Result<String, OrchestrationError> {
        let name = endpoint_name(group);
        self.sagemaker
            .create_endpoint(&name, config_name)
            .map_err(OrchestrationError::remote("CreateEndpoint"))?;
        info!(group, endpoint_name = %name, endpoint_config_name = config_name, "created endpoint");
        Ok(name)
    }

    /// Returns as soon as the update is accepted; the rollout itself is
    /// asynchronous on the service side.
    pub fn update_endpoint(
        &self,
        name: &str,
        config_name: &str,
    ) -> Result<String, OrchestrationError> {
        self.sagemaker
            .update_endpoint(name, config_name)
            .map_err(OrchestrationError::remote("UpdateEndpoint"))?;
        info!(endpoint_name = name, endpoint_config_name = config_name, "requested endpoint update");
        Ok(name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use crate::runtime::contract::{EndpointConfigSummary, ProductionVariant};
    use crate::test_support::{
        manager_config, multi_model_config, FixedClock, RecordedCall, RecordingSageMaker,
    };

    use super::*;

    fn variant(name: &str, model: &str, weight: f32) -> ProductionVariant {
        ProductionVariant {
            variant_name: name.to_string(),
            model_name: model.to_string(),
            instance_type: Some("ml.m5.large".to_string()),
            initial_instance_count: Some(2),
            initial_variant_weight: Some(weight),
            accelerator_type: None,
            ..ProductionVariant::default()
        }
    }

    #[test]
    fn create_model_uses_group_and_timestamp() {
        let sagemaker = RecordingSageMaker::default();
        let clock = FixedClock::default();
        let manager = EndpointManager::new(manager_config(), &sagemaker, &clock);

        let name = manager
            .create_model("my-model", "arn:aws:sagemaker:pkg/my-model/1")
            .expect("model should be created");

        assert_eq!(name, "my-model-2026-02-14-09-05-07");
        let models = sagemaker.created_models();
        assert_eq!(models.len(), 1);
        assert_eq!(models[0].execution_role_arn, "arn:aws:iam::123:role/sagemaker");
        assert_eq!(
            models[0].containers[0].model_package_name.as_deref(),
            Some("arn:aws:sagemaker:pkg/my-model/1")
        );
        assert_eq!(models[0].containers[0].mode, ContainerMode::SingleModel);
    }

    #[test]
    fn create_endpoint_config_has_single_all_traffic_variant() {
        let sagemaker = RecordingSageMaker::default();
        let clock = FixedClock::default();
        let manager = EndpointManager::new(manager_config(), &sagemaker, &clock);

        let name = manager
            .create_endpoint_config("my-model", "ml.m5.large", "my-model-2026-02-14-09-05-07")
            .expect("config should be created");

        assert_eq!(name, "my-model-epc-2026-02-14-09-05-07");
        let configs = sagemaker.created_endpoint_configs();
        let (_, variants) = &configs[0];
        assert_eq!(variants.len(), 1);
        assert_eq!(variants[0].variant_name, "AllTraffic");
        assert_eq!(variants[0].instance_type.as_deref(), Some("ml.m5.large"));
        assert_eq!(variants[0].initial_instance_count, Some(1));
        assert_eq!(variants[0].initial_variant_weight, Some(1.0));
        assert_eq!(variants[0].model_name, "my-model-2026-02-14-09-05-07");
    }

    #[test]
    fn multi_model_points_at_artifact_bucket_and_code_location() {
        let sagemaker = RecordingSageMaker::default();
        let clock = FixedClock::default();
        let manager = EndpointManager::new(manager_config(), &sagemaker, &clock);

        manager
            .create_multi_model(
                "my-model",
                "models/v1",
                "code/inference.tar.gz",
                &multi_model_config(),
            )
            .expect("model should be created");

        let models = sagemaker.created_models();
        let container = &models[0].containers[0];
        assert_eq!(container.mode, ContainerMode::MultiModel);
        assert_eq!(
            container.model_data_url.as_deref(),
            Some("s3://model-bucket/models/v1")
        );
        assert_eq!(
            container.environment.get("SAGEMAKER_SUBMIT_DIRECTORY").map(String::as_str),
            Some("s3://code-bucket/code/inference.tar.gz")
        );
        assert_eq!(
            container.environment.get("SAGEMAKER_PROGRAM").map(String::as_str),
            Some("inference.py")
        );
        assert_eq!(
            container.environment.get("SAGEMAKER_REGION").map(String::as_str),
            Some("ap-northeast-2")
        );
        assert!(container.image.is_some());
    }

    #[test]
    fn latest_model_package_fails_explicitly_when_none_are_approved() {
        let sagemaker = RecordingSageMaker::default();
        let clock = FixedClock::default();
        let manager = EndpointManager::new(manager_config(), &sagemaker, &clock);

        let error = manager
            .find_latest_model_package("my-model")
            .expect_err("empty list should fail");
        assert_eq!(
            error,
            OrchestrationError::NotFound {
                resource: "approved model package",
                lookup: "my-model".to_string(),
            }
        );
    }

    #[test]
    fn clone_replaces_model_in_every_variant_and_nothing_else() {
        let sagemaker = RecordingSageMaker::default();
        sagemaker.add_endpoint_config(
            "my-model-epc-2026-02-13-00-00-00",
            Utc.with_ymd_and_hms(2026, 2, 13, 0, 0, 0).single(),
            vec![variant("Blue", "old", 0.8), variant("Green", "old", 0.2)],
        );
        let clock = FixedClock::default();
        let manager = EndpointManager::new(manager_config(), &sagemaker, &clock);

        let name = manager
            .create_endpoint_config_from_latest("my-model", "new")
            .expect("clone should succeed");

        assert_eq!(name, "my-model-epc-2026-02-14-09-05-07");
        let configs = sagemaker.created_endpoint_configs();
        let (created_name, variants) = &configs[0];
        assert_eq!(created_name, &name);
        assert_eq!(
            variants,
            &vec![variant("Blue", "new", 0.8), variant("Green", "new", 0.2)]
        );
    }

    #[test]
    fn clone_picks_newest_config_even_when_listed_out_of_order() {
        let sagemaker = RecordingSageMaker::default();
        let base = Utc.with_ymd_and_hms(2026, 2, 10, 0, 0, 0).single().expect("valid time");
        sagemaker.add_endpoint_config(
            "my-model-epc-older",
            Some(base),
            vec![variant("AllTraffic", "older-model", 1.0)],
        );
        sagemaker.add_endpoint_config(
            "my-model-epc-newer",
            Some(base + Duration::days(2)),
            vec![variant("AllTraffic", "newer-model", 1.0)],
        );
        let clock = FixedClock::default();
        let manager = EndpointManager::new(manager_config(), &sagemaker, &clock);

        manager
            .create_endpoint_config_from_latest("my-model", "replacement")
            .expect("clone should succeed");

        assert!(sagemaker
            .calls()
            .contains(&RecordedCall::DescribeEndpointConfig("my-model-epc-newer".to_string())));
    }

    #[test]
    fn clone_lists_configs_by_group_prefix() {
        let sagemaker = RecordingSageMaker::default();
        sagemaker.add_endpoint_config(
            "my-model-epc-2026-02-13-00-00-00",
            None,
            vec![variant("AllTraffic", "old", 1.0)],
        );
        let clock = FixedClock::default();
        let manager = EndpointManager::new(manager_config(), &sagemaker, &clock);

        manager
            .create_endpoint_config_from_latest("my-model", "new")
            .expect("clone should succeed");

        assert_eq!(
            sagemaker.calls()[0],
            RecordedCall::ListEndpointConfigs("my-model-".to_string())
        );
    }

    #[test]
    fn clone_without_existing_config_is_not_found_and_creates_nothing() {
        let sagemaker = RecordingSageMaker::default();
        let clock = FixedClock::default();
        let manager = EndpointManager::new(manager_config(), &sagemaker, &clock);

        let error = manager
            .create_endpoint_config_from_latest("my-model", "new")
            .expect_err("clone should fail");
        assert!(matches!(error, OrchestrationError::NotFound { .. }));
        assert!(sagemaker.created_endpoint_configs().is_empty());
    }

    #[test]
    fn endpoint_name_is_stable_across_create_and_update() {
        let sagemaker = RecordingSageMaker::default();
        let clock = FixedClock::default();
        let manager = EndpointManager::new(manager_config(), &sagemaker, &clock);

        let created = manager
            .create_endpoint("my-model", "my-model-epc-a")
            .expect("endpoint should be created");
        let updated = manager
            .update_endpoint(&created, "my-model-epc-b")
            .expect("endpoint should be updated");

        assert_eq!(created, "my-model-ep");
        assert_eq!(updated, "my-model-ep");
        assert_eq!(
            sagemaker.calls(),
            vec![
                RecordedCall::CreateEndpoint("my-model-ep".to_string(), "my-model-epc-a".to_string()),
                RecordedCall::UpdateEndpoint("my-model-ep".to_string(), "my-model-epc-b".to_string()),
            ]
        );
    }

    #[test]
    fn remote_failure_is_propagated_with_operation_name() {
        let sagemaker = RecordingSageMaker::failing_on("CreateEndpoint");
        let clock = FixedClock::default();
        let manager = EndpointManager::new(manager_config(), &sagemaker, &clock);

        let error = manager
            .create_endpoint("my-model", "my-model-epc-a")
            .expect_err("endpoint creation should fail");
        assert!(error.is_remote());
        assert_eq!(
            error.to_string(),
            "CreateEndpoint failed: simulated CreateEndpoint failure"
        );
    }
}
