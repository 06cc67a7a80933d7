//! Payment-intent acquisition.
//!
//! Before the hosted instrument element can mount, the backend must
//! issue a payment authorization handle (an opaque client secret bound
//! to the cart's amount and currency). Acquisition runs exactly once
//! per step mount; a cart-total change after issuance does not
//! re-trigger it, so the handle can go stale until the step is
//! remounted.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::amount::{minor_units, MINOR_UNIT_FACTOR};
use crate::cart::CartTotals;
use crate::Error;

/// Opaque authorization handle issued by the backend.
///
/// Scoped to one (amount, currency) pair and to the page session; it
/// has no lifecycle of its own beyond that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationHandle(
    /// Opaque client secret
    pub String,
);

/// Request body for the payment-intent endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentIntentRequest {
    /// Amount in integer minor units
    pub amount: i64,
    /// ISO currency code
    pub currency: String,
}

/// Response body of the payment-intent endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentIntentResponse {
    /// Client secret binding the payment session to amount and currency
    #[serde(rename = "clientSecret")]
    pub client_secret: String,
}

/// Backend collaborator that creates payment intents.
#[async_trait]
pub trait IntentService: Send + Sync {
    /// Create a payment intent for the given amount and currency.
    async fn create_intent(
        &self,
        request: PaymentIntentRequest,
    ) -> Result<PaymentIntentResponse, Error>;
}

/// Acquire an authorization handle for the cart's current grand total.
///
/// A missing total is normalized to zero before submission. On failure
/// the handle stays unset and dependent components must not mount; no
/// automatic retry is attempted.
#[instrument(skip_all, fields(currency = %cart.currency))]
pub async fn acquire_authorization(
    cart: &CartTotals,
    service: &dyn IntentService,
) -> Result<AuthorizationHandle, Error> {
    let amount = minor_units(cart.grand_total, MINOR_UNIT_FACTOR)?;

    tracing::debug!("Requesting payment intent for {} minor units", amount);

    let response = service
        .create_intent(PaymentIntentRequest {
            amount,
            currency: cart.currency.clone(),
        })
        .await?;

    Ok(AuthorizationHandle(response.client_secret))
}

#[cfg(feature = "http")]
pub use http::HttpIntentService;

#[cfg(feature = "http")]
mod http {
    use super::*;

    /// Error body returned by the payment-intent endpoint.
    #[derive(Debug, Clone, Deserialize)]
    struct ErrorBody {
        error: String,
    }

    /// [`IntentService`] over HTTP.
    ///
    /// POSTs the intent request as JSON to a configured URL. Non-2xx
    /// responses are decoded as `{"error": …}` where possible.
    #[derive(Debug, Clone)]
    pub struct HttpIntentService {
        client: reqwest::Client,
        url: String,
    }

    impl HttpIntentService {
        /// Create a service posting to `url`.
        pub fn new(url: impl Into<String>) -> Self {
            Self {
                client: reqwest::Client::new(),
                url: url.into(),
            }
        }
    }

    #[async_trait]
    impl IntentService for HttpIntentService {
        async fn create_intent(
            &self,
            request: PaymentIntentRequest,
        ) -> Result<PaymentIntentResponse, Error> {
            let response = self
                .client
                .post(&self.url)
                .json(&request)
                .send()
                .await
                .map_err(|e| Error::Intent(e.to_string()))?;

            if !response.status().is_success() {
                let status = response.status();
                let message = match response.json::<ErrorBody>().await {
                    Ok(body) => body.error,
                    Err(_) => status.to_string(),
                };
                return Err(Error::Intent(message));
            }

            response
                .json::<PaymentIntentResponse>()
                .await
                .map_err(|e| Error::Intent(e.to_string()))
        }
    }
}
