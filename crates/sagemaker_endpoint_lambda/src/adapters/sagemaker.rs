use crate::runtime::contract::{
    ApprovalStatus, EndpointConfigSummary, ModelDefinition, ModelPackageDefinition,
    ModelPackageSummary, ProductionVariant,
};

/// Control-plane operations against the managed hosting service.
///
/// Every method maps to exactly one remote call. Errors carry the provider's
/// message unchanged; callers decide how to classify them.
pub trait SageMakerControl {
    /// Packages in `group` with `status`, newest first as reported by the service.
    fn list_model_packages(
        &self,
        group: &str,
        status: &ApprovalStatus,
    ) -> Result<Vec<ModelPackageSummary>, String>;

    fn create_model(&self, model: &ModelDefinition) -> Result<(), String>;

    fn create_endpoint_config(
        &self,
        name: &str,
        variants: &[ProductionVariant],
    ) -> Result<(), String>;

    /// Configurations whose name contains `name_contains`, newest first as
    /// reported by the service.
    fn list_endpoint_configs(
        &self,
        name_contains: &str,
    ) -> Result<Vec<EndpointConfigSummary>, String>;

    fn describe_endpoint_config(&self, name: &str) -> Result<Vec<ProductionVariant>, String>;

    fn create_endpoint(&self, endpoint_name: &str, config_name: &str) -> Result<(), String>;

    fn update_endpoint(&self, endpoint_name: &str, config_name: &str) -> Result<(), String>;

    /// Returns the group ARN.
    fn describe_model_package_group(&self, group: &str) -> Result<String, String>;

    /// Returns the group ARN.
    fn create_model_package_group(&self, group: &str) -> Result<String, String>;

    /// Returns the package ARN.
    fn create_model_package(&self, definition: &ModelPackageDefinition)
        -> Result<String, String>;
}

impl<T: SageMakerControl + ?Sized> SageMakerControl for &T {
    fn list_model_packages(
        &self,
        group: &str,
        status: &ApprovalStatus,
    ) -> Result<Vec<ModelPackageSummary>, String> {
        (**self).list_model_packages(group, status)
    }

    fn create_model(&self, model: &ModelDefinition) -> Result<(), String> {
        (**self).create_model(model)
    }

    fn create_endpoint_config(
        &self,
        name: &str,
        variants: &[ProductionVariant],
    ) -> Result<(), String> {
        (**self).create_endpoint_config(name, variants)
    }

    fn list_endpoint_configs(
        &self,
        name_contains: &str,
    ) -> Result<Vec<EndpointConfigSummary>, String> {
        (**self).list_endpoint_configs(name_contains)
    }

    fn describe_endpoint_config(&self, name: &str) -> Result<Vec<ProductionVariant>, String> {
        (**self).describe_endpoint_config(name)
    }

    fn create_endpoint(&self, endpoint_name: &str, config_name: &str) -> Result<(), String> {
        (**self).create_endpoint(endpoint_name, config_name)
    }

    fn update_endpoint(&self, endpoint_name: &str, config_name: &str) -> Result<(), String> {
        (**self).update_endpoint(endpoint_name, config_name)
    }

    fn describe_model_package_group(&self, group: &str) -> Result<String, String> {
        (**self).describe_model_package_group(group)
    }

    fn create_model_package_group(&self, group: &str) -> Result<String, String> {
        (**self).create_model_package_group(group)
    }

    fn create_model_package(
        &self,
        definition: &ModelPackageDefinition,
    ) -> Result<String, String> {
        (**self).create_model_package(definition)
    }
}
