use lambda_runtime::{service_fn, Error, LambdaEvent};
use sagemaker_endpoint_lambda::adapters::aws::AwsObjectReader;
use sagemaker_endpoint_lambda::handlers::post_inference::handle_post_inference;
use serde_json::Value;

async fn handle_request(event: LambdaEvent<Value>) -> Result<(), Error> {
    handle_post_inference(event.payload, AwsObjectReader::connect)
        .map(|_| ())
        .map_err(Error::from)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    lambda_runtime::tracing::init_default_subscriber();
    lambda_runtime::run(service_fn(handle_request)).await
}
