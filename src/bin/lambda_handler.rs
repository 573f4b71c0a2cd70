//! AWS Lambda handler for quote requests
//!
//! Accepts an API Gateway proxy event whose JSON body is a quote request and
//! returns the calculation result. Rates are loaded once per cold start from
//! `RATES_DIR` (default `data/rates`).

use std::path::PathBuf;
use std::sync::Arc;

use aws_lambda_events::apigw::{ApiGatewayProxyRequest, ApiGatewayProxyResponse};
use aws_lambda_events::encodings::Body;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use life_quote_engine::{QuoteEngine, QuoteRequest, DEFAULT_RATES_PATH};
use log::{info, warn};
use serde_json::json;

fn response(status: i64, body: &serde_json::Value) -> ApiGatewayProxyResponse {
    ApiGatewayProxyResponse {
        status_code: status,
        body: Some(Body::Text(body.to_string())),
        ..Default::default()
    }
}

fn error_response(status: i64, kind: &str, message: &str) -> ApiGatewayProxyResponse {
    response(status, &json!({ "error": message, "kind": kind }))
}

/// Lambda handler function
async fn handler(
    engine: &QuoteEngine,
    event: LambdaEvent<ApiGatewayProxyRequest>,
) -> Result<ApiGatewayProxyResponse, Error> {
    let body = event.payload.body.unwrap_or_else(|| "{}".to_string());

    let request: QuoteRequest = match serde_json::from_str(&body) {
        Ok(r) => r,
        Err(e) => {
            return Ok(error_response(400, "MalformedInput", &format!("Invalid JSON: {}", e)));
        }
    };

    match engine.quote(&request) {
        Ok(result) => Ok(response(200, &serde_json::to_value(&result)?)),
        Err(e) => {
            warn!("Rejected quote request: {}", e);
            Ok(error_response(400, e.kind(), &e.to_string()))
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();

    let rates_dir = std::env::var("RATES_DIR").unwrap_or_else(|_| DEFAULT_RATES_PATH.to_string());
    let engine = Arc::new(QuoteEngine::from_dir(&PathBuf::from(&rates_dir))?);
    info!("Rates loaded from {}", rates_dir);

    run(service_fn(move |event| {
        let engine = Arc::clone(&engine);
        async move { handler(&engine, event).await }
    }))
    .await
}
