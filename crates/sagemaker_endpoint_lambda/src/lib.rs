//! Lambda functions that turn registered model packages into served SageMaker
//! endpoints, roll those endpoints onto newly approved packages, invoke them,
//! and read batch transform output back from S3.
//!
//! Handlers are plain functions over an event payload and injected clients;
//! `bin/` wires each one to the Lambda runtime with the AWS implementations.

pub mod adapters;
pub mod error;
pub mod handlers;
pub mod manager;
pub mod registration;
pub mod runtime;

#[cfg(test)]
pub(crate) mod test_support;
