//! Instrument capture and tokenization.
//!
//! The hosted payment element is mounted only once an authorization
//! handle exists. Because the orchestrator wires its submit handler
//! before the element is ready, the element hands its confirm
//! capability up through a [`ConfirmSlot`] instead of returning it:
//! the slot is owned by the orchestrator, written once by the capture
//! component on readiness, and read once per submission attempt.

use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::intent::AuthorizationHandle;
use crate::Error;

/// Single-use payment-method token issued by the external tokenizer.
///
/// Attached to exactly one cart mutation; never persisted or reused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMethodToken(
    /// Opaque token identifier, e.g. `pm_…`
    pub String,
);

/// Structured error from the tokenization provider.
///
/// Provider failures are values, not panics, so callers can branch on
/// them; the message is surfaced to the user verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderError {
    /// Provider-supplied message, e.g. `card_declined`
    pub message: String,
}

impl ProviderError {
    /// Create a provider error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Hosted payment-instrument element.
///
/// The element owns the raw instrument fields; they never cross this
/// boundary. Only validation outcomes and single-use tokens do.
#[async_trait]
pub trait InstrumentElement: Send + Sync {
    /// Validate the captured instrument fields.
    async fn validate(&self) -> Result<(), ProviderError>;

    /// Tokenize the instrument into a single-use payment-method token.
    async fn create_payment_method(&self) -> Result<PaymentMethodToken, ProviderError>;
}

/// Confirm callback: validate then tokenize, at most once per attempt.
pub type ConfirmFn =
    Box<dyn Fn() -> BoxFuture<'static, Result<PaymentMethodToken, Error>> + Send + Sync>;

/// Registration channel for the confirm callback.
///
/// An empty slot is a valid state and maps to
/// [`Error::ConfirmUnavailable`] at submission time.
#[derive(Clone, Default)]
pub struct ConfirmSlot(Arc<Mutex<Option<ConfirmFn>>>);

impl ConfirmSlot {
    /// Create an empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the confirm callback, replacing any previous one.
    pub async fn register(&self, confirm: ConfirmFn) {
        *self.0.lock().await = Some(confirm);
    }

    /// Whether a callback has been registered.
    pub async fn is_registered(&self) -> bool {
        self.0.lock().await.is_some()
    }

    /// Invoke the registered callback once.
    pub(crate) async fn confirm(&self) -> Result<PaymentMethodToken, Error> {
        let guard = self.0.lock().await;
        let confirm = guard.as_ref().ok_or(Error::ConfirmUnavailable)?;
        confirm().await
    }
}

impl std::fmt::Debug for ConfirmSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfirmSlot").finish_non_exhaustive()
    }
}

/// Mounted capture component.
///
/// Constructing one requires the authorization handle, which enforces
/// the mount gate: no handle, no element, no registered callback.
pub struct InstrumentCapture {
    element: Arc<dyn InstrumentElement>,
    handle: AuthorizationHandle,
}

impl InstrumentCapture {
    /// Mount the capture component and register its confirm callback.
    pub async fn mount(
        handle: AuthorizationHandle,
        element: Arc<dyn InstrumentElement>,
        slot: &ConfirmSlot,
    ) -> Self {
        let confirm_element = Arc::clone(&element);
        slot.register(Box::new(move || {
            let element = Arc::clone(&confirm_element);
            Box::pin(async move {
                element
                    .validate()
                    .await
                    .map_err(|e| Error::Validation(e.message))?;

                element
                    .create_payment_method()
                    .await
                    .map_err(|e| Error::Tokenization(e.message))
            })
        }))
        .await;

        tracing::debug!("Instrument capture mounted, confirm callback registered");

        Self { element, handle }
    }

    /// Authorization handle this element was mounted with.
    pub fn authorization(&self) -> &AuthorizationHandle {
        &self.handle
    }

    /// The underlying hosted element.
    pub fn element(&self) -> &Arc<dyn InstrumentElement> {
        &self.element
    }
}

static DEFAULT_PROVIDER: OnceLock<Arc<dyn InstrumentElement>> = OnceLock::new();

/// Install the process-wide tokenization provider.
///
/// Lazy-init-once with no teardown: the first call wins and later
/// calls return the already-installed provider. Components that need
/// testability should take the provider as a constructor argument
/// instead.
pub fn init_default_provider(provider: Arc<dyn InstrumentElement>) -> Arc<dyn InstrumentElement> {
    Arc::clone(DEFAULT_PROVIDER.get_or_init(|| provider))
}

/// The process-wide provider, if one was installed.
pub fn default_provider() -> Option<Arc<dyn InstrumentElement>> {
    DEFAULT_PROVIDER.get().map(Arc::clone)
}
