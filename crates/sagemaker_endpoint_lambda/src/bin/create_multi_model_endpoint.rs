use lambda_runtime::{service_fn, Error, LambdaEvent};
use sagemaker_endpoint_lambda::adapters::aws::AwsSageMakerControl;
use sagemaker_endpoint_lambda::adapters::clock::SystemClock;
use sagemaker_endpoint_lambda::handlers::create_multi_model_endpoint::handle_create_multi_model_endpoint;
use sagemaker_endpoint_lambda::runtime::config::env_lookup;
use serde_json::Value;

async fn handle_request(event: LambdaEvent<Value>) -> Result<String, Error> {
    handle_create_multi_model_endpoint(
        event.payload,
        env_lookup,
        AwsSageMakerControl::connect,
        &SystemClock,
    )
    .map_err(Error::from)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    lambda_runtime::tracing::init_default_subscriber();
    lambda_runtime::run(service_fn(handle_request)).await
}
