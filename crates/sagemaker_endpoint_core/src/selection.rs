use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use crate::contract::{
    ApprovalStatus, EndpointConfigSummary, ModelPackageSummary, ProductionVariant,
    ALL_TRAFFIC_VARIANT_NAME,
};

/// Newest first. Entries without a creation time keep their listed order and
/// sort after every dated entry.
fn newest_first(left: Option<&DateTime<Utc>>, right: Option<&DateTime<Utc>>) -> Ordering {
    match (left, right) {
        (Some(left), Some(right)) => right.cmp(left),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

pub fn latest_approved_model_package(
    mut packages: Vec<ModelPackageSummary>,
) -> Option<ModelPackageSummary> {
    packages.retain(|package| package.approval_status == ApprovalStatus::Approved);
    packages.sort_by(|a, b| newest_first(a.creation_time.as_ref(), b.creation_time.as_ref()));
    packages.into_iter().next()
}

pub fn latest_endpoint_config(
    mut configs: Vec<EndpointConfigSummary>,
) -> Option<EndpointConfigSummary> {
    configs.sort_by(|a, b| newest_first(a.creation_time.as_ref(), b.creation_time.as_ref()));
    configs.into_iter().next()
}

pub fn single_traffic_variant(instance_type: &str, model_name: &str) -> ProductionVariant {
    ProductionVariant {
        variant_name: ALL_TRAFFIC_VARIANT_NAME.to_string(),
        model_name: model_name.to_string(),
        instance_type: Some(instance_type.to_string()),
        initial_instance_count: Some(1),
        initial_variant_weight: Some(1.0),
        ..ProductionVariant::default()
    }
}

pub fn with_model_name(variants: Vec<ProductionVariant>, model_name: &str) -> Vec<ProductionVariant> {
    variants
        .into_iter()
        .map(|variant| ProductionVariant {
            model_name: model_name.to_string(),
            ..variant
        })
        .collect()
}
