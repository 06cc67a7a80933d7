//! Submission saga - type state pattern implementation.
//!
//! One submission attempt walks a fixed sequence, each step a separate
//! suspension point that can fail independently:
//!
//! ```text
//! SubmitSaga<Initial>
//!   └─> confirm() -> SubmitSaga<Confirmed>
//!         └─> lock() -> SubmitSaga<Locked>
//!               └─> place() -> SubmitSaga<Placed>
//! ```
//!
//! The cart lock is acquired strictly after tokenization succeeded and
//! strictly before the mutation is sent. Any failing transition runs
//! the registered compensations before returning, so a held lock never
//! outlives its attempt.

use std::sync::Arc;

use tracing::instrument;
use uuid::Uuid;

use self::compensation::ReleaseCartLock;
use self::state::{Confirmed, Initial, Locked, Placed};
use crate::capture::{ConfirmSlot, PaymentMethodToken};
use crate::cart::{CartLock, CartMutation, LockState};
use crate::saga::{
    add_compensation, clear_compensations, execute_compensations, new_compensations, Compensations,
};
use crate::Error;

pub mod compensation;
pub mod state;

/// Saga driving one submission attempt.
///
/// Each state (Initial, Confirmed, Locked, Placed) is a distinct type;
/// the next transition is only available on the matching type.
pub struct SubmitSaga<S> {
    /// Lock service
    locker: Arc<dyn CartLock>,
    /// Cart mutation API
    cart: Arc<dyn CartMutation>,
    /// Selected payment method code, used as the lock tag
    method_code: String,
    /// Compensating actions in LIFO order (most recent first)
    compensations: Compensations,
    /// State-specific data
    state_data: S,
}

impl SubmitSaga<Initial> {
    /// Create a new saga in the Initial state.
    pub fn new(
        locker: Arc<dyn CartLock>,
        cart: Arc<dyn CartMutation>,
        method_code: impl Into<String>,
    ) -> Self {
        let attempt_id = Uuid::new_v4();

        Self {
            locker,
            cart,
            method_code: method_code.into(),
            compensations: new_compensations(),
            state_data: Initial { attempt_id },
        }
    }

    /// Invoke the registered confirm callback to validate and tokenize.
    ///
    /// An empty slot fails with [`Error::ConfirmUnavailable`] without
    /// proceeding. The lock-release compensation is registered before
    /// the callback runs: release is idempotent, which realizes the
    /// unconditional release-on-failure rule even for attempts that
    /// never reach the lock step.
    #[instrument(skip_all)]
    pub async fn confirm(self, slot: &ConfirmSlot) -> Result<SubmitSaga<Confirmed>, Error> {
        let attempt_id = self.state_data.attempt_id;

        tracing::info!("Confirming payment instrument for attempt {}", attempt_id);

        add_compensation(
            &self.compensations,
            Box::new(ReleaseCartLock {
                locker: Arc::clone(&self.locker),
                attempt_id,
            }),
        )
        .await;

        let token = match slot.confirm().await {
            Ok(token) => token,
            Err(e) => {
                execute_compensations(&self.compensations).await;
                return Err(e);
            }
        };

        Ok(SubmitSaga {
            locker: self.locker,
            cart: self.cart,
            method_code: self.method_code,
            compensations: self.compensations,
            state_data: Confirmed { attempt_id, token },
        })
    }
}

impl SubmitSaga<Confirmed> {
    /// The token produced by the confirm callback.
    pub fn token(&self) -> &PaymentMethodToken {
        &self.state_data.token
    }

    /// Acquire the cart lock, tagged with the payment method code.
    ///
    /// Runs strictly after tokenization so two concurrent submissions
    /// cannot both hold a token and the lock at the same time.
    #[instrument(skip_all)]
    pub async fn lock(self) -> Result<SubmitSaga<Locked>, Error> {
        tracing::info!(
            "Locking cart with tag {} for attempt {}",
            self.method_code,
            self.state_data.attempt_id
        );

        let lock = match self.locker.lock(&self.method_code).await {
            Ok(lock) => lock,
            Err(e) => {
                execute_compensations(&self.compensations).await;
                return Err(e);
            }
        };

        Ok(SubmitSaga {
            locker: self.locker,
            cart: self.cart,
            method_code: self.method_code,
            compensations: self.compensations,
            state_data: Locked {
                attempt_id: self.state_data.attempt_id,
                token: self.state_data.token,
                lock,
            },
        })
    }
}

impl SubmitSaga<Locked> {
    /// Lock state reported by the lock service.
    pub fn lock_state(&self) -> LockState {
        self.state_data.lock
    }

    /// Submit the payment-method-selection mutation with the token.
    ///
    /// On success compensations are cleared and the lock stays held
    /// for the following checkout step. On failure the lock is
    /// released before the error is returned.
    #[instrument(skip_all)]
    pub async fn place(self) -> Result<SubmitSaga<Placed>, Error> {
        tracing::info!(
            "Setting payment method {} on cart for attempt {}",
            self.method_code,
            self.state_data.attempt_id
        );

        if let Err(e) = self
            .cart
            .set_payment_method(&self.method_code, &self.state_data.token)
            .await
        {
            execute_compensations(&self.compensations).await;
            return Err(e);
        }

        // Attempt succeeded; the lock is handed over to the next step.
        clear_compensations(&self.compensations).await;

        Ok(SubmitSaga {
            locker: self.locker,
            cart: self.cart,
            method_code: self.method_code,
            compensations: self.compensations,
            state_data: Placed {
                attempt_id: self.state_data.attempt_id,
                token: self.state_data.token,
            },
        })
    }
}

impl SubmitSaga<Placed> {
    /// Get the attempt ID
    pub fn attempt_id(&self) -> Uuid {
        self.state_data.attempt_id
    }

    /// Token that was attached to the mutation.
    pub fn token(&self) -> &PaymentMethodToken {
        &self.state_data.token
    }
}

impl std::fmt::Debug for SubmitSaga<Confirmed> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubmitSaga<Confirmed>")
            .field("attempt_id", &self.state_data.attempt_id)
            .field("method_code", &self.method_code)
            .finish()
    }
}
