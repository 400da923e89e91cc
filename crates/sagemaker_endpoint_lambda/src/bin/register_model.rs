use lambda_runtime::{service_fn, Error, LambdaEvent};
use sagemaker_endpoint_lambda::adapters::aws::AwsSageMakerControl;
use sagemaker_endpoint_lambda::handlers::register_model::handle_register_model;
use sagemaker_endpoint_lambda::runtime::config::env_lookup;
use sagemaker_endpoint_lambda::runtime::contract::RegistrationResponse;
use serde_json::Value;

async fn handle_request(event: LambdaEvent<Value>) -> Result<RegistrationResponse, Error> {
    handle_register_model(event.payload, env_lookup, AwsSageMakerControl::connect)
        .map_err(Error::from)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    lambda_runtime::tracing::init_default_subscriber();
    lambda_runtime::run(service_fn(handle_request)).await
}
