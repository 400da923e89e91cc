pub use sagemaker_endpoint_core::{config, contract, naming, s3_uri, selection};
