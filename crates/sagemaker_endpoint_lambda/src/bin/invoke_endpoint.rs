use lambda_runtime::{service_fn, Error, LambdaEvent};
use sagemaker_endpoint_lambda::adapters::aws::AwsEndpointInvoker;
use sagemaker_endpoint_lambda::handlers::invoke_endpoint::handle_invoke_endpoint;
use sagemaker_endpoint_lambda::runtime::config::env_lookup;
use serde_json::Value;

async fn handle_request(event: LambdaEvent<Value>) -> Result<String, Error> {
    handle_invoke_endpoint(event.payload, env_lookup, AwsEndpointInvoker::connect)
        .map_err(Error::from)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    lambda_runtime::tracing::init_default_subscriber();
    lambda_runtime::run(service_fn(handle_request)).await
}
