//! Shared SageMaker endpoint orchestration primitives.
//!
//! This crate owns event contracts, configuration validation, deterministic
//! resource naming and "latest resource" selection. It intentionally excludes
//! AWS SDK and Lambda runtime concerns.

pub mod config;
pub mod contract;
pub mod naming;
pub mod s3_uri;
pub mod selection;
