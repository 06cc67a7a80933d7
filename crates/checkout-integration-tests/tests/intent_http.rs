//! Intent acquisition over real HTTP: the axum router on one side,
//! `HttpIntentService` on the other.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use checkout::{acquire_authorization, AuthorizationHandle, CartTotals, HttpIntentService};
use checkout_axum::{create_intent_router, IntentProcessor, IntentState};
use checkout_integration_tests::setup_tracing;
use rust_decimal_macros::dec;

struct EchoProcessor;

#[async_trait]
impl IntentProcessor for EchoProcessor {
    async fn create_payment_intent(&self, amount: i64, currency: &str) -> Result<String> {
        if currency.is_empty() {
            anyhow::bail!("currency required");
        }
        Ok(format!("pi_{}_{}", amount, currency))
    }
}

async fn serve() -> Result<String> {
    let router = create_intent_router(IntentState {
        processor: Arc::new(EchoProcessor),
    });
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    Ok(format!("http://{}/api/payment-intent", addr))
}

#[tokio::test]
async fn acquires_handle_over_http() -> Result<()> {
    setup_tracing();

    let url = serve().await?;
    let service = HttpIntentService::new(url);

    let cart = CartTotals {
        grand_total: Some(dec!(12.345)),
        currency: "EUR".to_string(),
    };

    let handle = acquire_authorization(&cart, &service).await?;
    assert_eq!(handle, AuthorizationHandle("pi_1235_EUR".to_string()));

    Ok(())
}

#[tokio::test]
async fn backend_error_body_is_surfaced() -> Result<()> {
    setup_tracing();

    let url = serve().await?;
    let service = HttpIntentService::new(url);

    let cart = CartTotals {
        grand_total: None,
        currency: String::new(),
    };

    let err = acquire_authorization(&cart, &service).await.unwrap_err();
    assert_eq!(err, checkout::Error::Intent("currency required".to_string()));

    Ok(())
}
