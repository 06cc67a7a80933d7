//! Axum router for the payment-intent endpoint.
//!
//! Exposes `POST /api/payment-intent`, the backend collaborator that
//! issues authorization handles for the checkout payment step. The
//! processor-side work (creating a customer, opening the intent with
//! the external processor) sits behind [`IntentProcessor`]; this crate
//! only owns the wire contract: `{amount, currency}` in,
//! `{"clientSecret": …}` out, `500 {"error": …}` on failure.

#![warn(missing_docs)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Router;
use checkout::{PaymentIntentRequest, PaymentIntentResponse};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Creates payment intents with the external processor.
#[async_trait]
pub trait IntentProcessor: Send + Sync {
    /// Open an intent for `amount` minor units of `currency` and
    /// return its client secret.
    async fn create_payment_intent(&self, amount: i64, currency: &str) -> anyhow::Result<String>;
}

/// Shared state of the intent router.
#[derive(Clone)]
pub struct IntentState {
    /// Processor backing the endpoint
    pub processor: Arc<dyn IntentProcessor>,
}

/// Error body returned on failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable failure message
    pub error: String,
}

/// Build the router exposing `POST /api/payment-intent`.
///
/// Other methods on the path are rejected with 405 by axum's routing.
pub fn create_intent_router(state: IntentState) -> Router {
    Router::new()
        .route("/api/payment-intent", post(post_payment_intent))
        .with_state(state)
}

fn into_response(error: anyhow::Error) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: error.to_string(),
        }),
    )
        .into_response()
}

/// Create a payment intent for the cart's current total.
#[instrument(skip_all, fields(amount = payload.amount, currency = %payload.currency))]
async fn post_payment_intent(
    State(state): State<IntentState>,
    Json(payload): Json<PaymentIntentRequest>,
) -> Result<Json<PaymentIntentResponse>, Response> {
    let client_secret = state
        .processor
        .create_payment_intent(payload.amount, &payload.currency)
        .await
        .map_err(|err| {
            tracing::error!("Could not create payment intent: {}", err);
            into_response(err)
        })?;

    Ok(Json(PaymentIntentResponse { client_secret }))
}
