pub mod aws;
pub mod clock;
pub mod endpoint_runtime;
pub mod object_store;
pub mod sagemaker;
