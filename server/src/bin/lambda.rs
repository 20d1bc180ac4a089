use bulb_server::{http, runtime};
use tracing::info;

/// AWS Lambda entrypoint. API Gateway and ALB events are translated to HTTP
/// requests and served by the same router as `bulb-server`.
#[tokio::main]
async fn main() -> Result<(), lambda_http::Error> {
    runtime::init();
    info!("Starting light bulb Lambda handler");

    let service = runtime::service_from_env().await?;
    lambda_http::run(http::build_router(service)).await
}
