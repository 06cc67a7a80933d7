//! Payment step orchestration.
//!
//! [`PaymentStep`] owns the submission lifecycle for one payment
//! method inside the checkout form: it acquires the authorization
//! handle once on mount, gates the capture component on that handle,
//! and drives the confirm → lock → mutate sequence through
//! [`SubmitSaga`] when the form is submitted.

use std::sync::Arc;

use tracing::instrument;

use crate::capture::{ConfirmSlot, InstrumentCapture, InstrumentElement};
use crate::cart::{CartLock, CartMutation, SharedCartTotals};
use crate::intent::{acquire_authorization, AuthorizationHandle, IntentService};
use crate::Error;

pub mod saga;

use saga::SubmitSaga;

/// State of the current submission attempt.
///
/// Transitions only move forward: Idle → Processing →
/// (Succeeded | Failed). A Failed step may re-enter Processing on
/// retry; Succeeded is terminal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SubmissionState {
    /// Form displayed, no attempt in flight
    #[default]
    Idle,
    /// An attempt is in flight; further submits are refused
    Processing,
    /// The payment method was placed on the cart
    Succeeded,
    /// The last attempt failed with this user-facing message
    Failed(String),
}

/// One payment-method step of the checkout form.
pub struct PaymentStep {
    method_code: String,
    cart_totals: SharedCartTotals,
    locker: Arc<dyn CartLock>,
    cart: Arc<dyn CartMutation>,
    confirm_slot: ConfirmSlot,
    authorization: Option<AuthorizationHandle>,
    state: tokio::sync::Mutex<SubmissionState>,
}

impl PaymentStep {
    /// Mount the payment step.
    ///
    /// Two effects run here, once per mount:
    /// - a lock that is held but was not just taken (left over from a
    ///   previous attempt or another step) is proactively released;
    /// - the authorization handle is fetched for the cart's current
    ///   total. If the fetch fails the handle stays unset, the capture
    ///   component cannot mount, and submission will fail with
    ///   [`Error::ConfirmUnavailable`].
    ///
    /// The handle is bound to the total at mount time; later cart-total
    /// changes do not re-trigger acquisition.
    #[instrument(skip_all, fields(method_code = %method_code))]
    pub async fn mount(
        method_code: impl Into<String> + std::fmt::Display,
        cart_totals: SharedCartTotals,
        locker: Arc<dyn CartLock>,
        cart: Arc<dyn CartMutation>,
        intent_service: &dyn IntentService,
    ) -> Self {
        let lock_state = locker.state().await;
        if lock_state.locked && !lock_state.just_locked {
            tracing::warn!("Releasing stale cart lock found on mount");
            if let Err(e) = locker.unlock().await {
                tracing::error!("Could not release stale cart lock: {}", e);
            }
        }

        let totals = cart_totals.read().await.clone();
        let authorization = match acquire_authorization(&totals, intent_service).await {
            Ok(handle) => Some(handle),
            Err(e) => {
                tracing::warn!("Payment intent acquisition failed: {}", e);
                None
            }
        };

        Self {
            method_code: method_code.into(),
            cart_totals,
            locker,
            cart,
            confirm_slot: ConfirmSlot::new(),
            authorization,
            state: tokio::sync::Mutex::new(SubmissionState::Idle),
        }
    }

    /// The authorization handle, if acquisition succeeded.
    pub fn authorization(&self) -> Option<&AuthorizationHandle> {
        self.authorization.as_ref()
    }

    /// The payment method code this step submits.
    pub fn method_code(&self) -> &str {
        &self.method_code
    }

    /// Registration slot for the confirm callback.
    pub fn confirm_slot(&self) -> &ConfirmSlot {
        &self.confirm_slot
    }

    /// Mount the instrument capture component for this step.
    ///
    /// Gated on the authorization handle: returns `None` (and registers
    /// nothing) when intent acquisition failed or has not completed.
    pub async fn mount_capture(
        &self,
        element: Arc<dyn InstrumentElement>,
    ) -> Option<InstrumentCapture> {
        let handle = self.authorization.clone()?;
        Some(InstrumentCapture::mount(handle, element, &self.confirm_slot).await)
    }

    /// Current submission state.
    pub async fn state(&self) -> SubmissionState {
        self.state.lock().await.clone()
    }

    /// Run one submission attempt.
    ///
    /// Enters Processing before any async work starts so duplicate
    /// submits are refused, then drives the saga. Every failure is
    /// caught here, stored as `Failed(message)` and returned; the cart
    /// lock never stays held past a failed attempt.
    #[instrument(skip_all, fields(method_code = %self.method_code))]
    pub async fn submit(&self) -> Result<(), Error> {
        {
            let mut state = self.state.lock().await;
            match &*state {
                SubmissionState::Processing => return Err(Error::SubmissionInFlight),
                SubmissionState::Succeeded => return Err(Error::AlreadyPlaced),
                SubmissionState::Idle | SubmissionState::Failed(_) => {
                    *state = SubmissionState::Processing;
                }
            }
        }

        let result = self.run_attempt().await;

        let mut state = self.state.lock().await;
        match result {
            Ok(()) => {
                *state = SubmissionState::Succeeded;
                Ok(())
            }
            Err(e) => {
                *state = SubmissionState::Failed(e.to_string());
                Err(e)
            }
        }
    }

    async fn run_attempt(&self) -> Result<(), Error> {
        if self.cart_totals.read().await.grand_total.is_none() {
            // Release unconditionally, like every other failure path; a
            // no-op when nothing is held.
            if let Err(e) = self.locker.unlock().await {
                tracing::error!("Could not release cart lock: {}", e);
            }
            return Err(Error::CartTotalMissing);
        }

        let placed = SubmitSaga::new(
            Arc::clone(&self.locker),
            Arc::clone(&self.cart),
            self.method_code.clone(),
        )
        .confirm(&self.confirm_slot)
        .await?
        .lock()
        .await?
        .place()
        .await?;

        tracing::info!(
            "Payment method {} set on cart (attempt {})",
            self.method_code,
            placed.attempt_id()
        );

        Ok(())
    }
}

impl std::fmt::Debug for PaymentStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentStep")
            .field("method_code", &self.method_code)
            .field("authorization", &self.authorization.is_some())
            .finish_non_exhaustive()
    }
}
