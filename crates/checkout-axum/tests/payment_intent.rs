//! Wire-contract tests for the payment-intent endpoint.

use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use checkout::PaymentIntentResponse;
use checkout_axum::{create_intent_router, ErrorResponse, IntentProcessor, IntentState};
use http_body_util::BodyExt;
use serde_json::json;
use tower::ServiceExt;

struct StaticProcessor {
    secret: Option<String>,
}

#[async_trait]
impl IntentProcessor for StaticProcessor {
    async fn create_payment_intent(&self, _amount: i64, _currency: &str) -> Result<String> {
        self.secret
            .clone()
            .ok_or_else(|| anyhow!("processor unavailable"))
    }
}

fn router(secret: Option<&str>) -> axum::Router {
    create_intent_router(IntentState {
        processor: Arc::new(StaticProcessor {
            secret: secret.map(String::from),
        }),
    })
}

fn intent_request(body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/payment-intent")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn returns_client_secret_on_success() -> Result<()> {
    let response = router(Some("pi_secret_123"))
        .oneshot(intent_request(json!({"amount": 1235, "currency": "EUR"})))
        .await?;

    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await?.to_bytes();
    let parsed: PaymentIntentResponse = serde_json::from_slice(&body)?;
    assert_eq!(parsed.client_secret, "pi_secret_123");

    // Wire field name is camelCase
    let raw: serde_json::Value = serde_json::from_slice(&body)?;
    assert!(raw.get("clientSecret").is_some());

    Ok(())
}

#[tokio::test]
async fn processor_failure_is_500_with_error_body() -> Result<()> {
    let response = router(None)
        .oneshot(intent_request(json!({"amount": 100, "currency": "USD"})))
        .await?;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = response.into_body().collect().await?.to_bytes();
    let parsed: ErrorResponse = serde_json::from_slice(&body)?;
    assert_eq!(parsed.error, "processor unavailable");

    Ok(())
}

#[tokio::test]
async fn non_post_methods_are_rejected() -> Result<()> {
    let response = router(Some("pi_secret_123"))
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/payment-intent")
                .body(Body::empty())?,
        )
        .await?;

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

    Ok(())
}
