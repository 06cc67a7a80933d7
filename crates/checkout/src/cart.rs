//! Cart state and the cart-side collaborator boundaries.
//!
//! The orchestrator only ever reads cart totals; all mutating cart
//! operations (lock acquire/release, payment-method selection) go
//! through the traits below, which are provided by the surrounding
//! storefront.

use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::capture::PaymentMethodToken;
use crate::Error;

/// Grand total of the active cart, as read from shared cart state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartTotals {
    /// Grand total value; absent while the cart is still loading
    pub grand_total: Option<Decimal>,
    /// ISO currency code of the total
    pub currency: String,
}

/// Cart totals shared between intent acquisition and the orchestrator.
///
/// Both read it; neither writes. The surrounding storefront updates it
/// as the cart changes.
pub type SharedCartTotals = Arc<RwLock<CartTotals>>;

/// Observed state of the cart lock.
///
/// `just_locked` is only true for a lock taken by the current attempt.
/// A lock that is held but not just locked was inherited from an
/// earlier attempt or another checkout step and is treated as stale on
/// mount.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LockState {
    /// Whether the cart lock is currently held
    pub locked: bool,
    /// Whether the lock was taken by the most recent acquire call
    pub just_locked: bool,
}

/// Mutual-exclusion lock on the active cart.
///
/// Prevents concurrent checkout mutations on the same cart from two
/// tabs or sessions. The service owns expiry: a lock is released
/// automatically when its owning session ends, or explicitly through
/// [`unlock`](CartLock::unlock).
#[async_trait]
pub trait CartLock: Send + Sync {
    /// Acquire the lock, tagged with the selected payment method code.
    async fn lock(&self, tag: &str) -> Result<LockState, Error>;

    /// Release the lock.
    ///
    /// Must be a no-op when nothing is held; callers release
    /// unconditionally on failure paths.
    async fn unlock(&self) -> Result<(), Error>;

    /// Current lock state.
    async fn state(&self) -> LockState;
}

/// Payment-method-selection mutation on the active cart.
///
/// This is the single externally observable side effect of a
/// successful submission attempt.
#[async_trait]
pub trait CartMutation: Send + Sync {
    /// Set the selected payment method, attaching the single-use token.
    async fn set_payment_method(
        &self,
        method_code: &str,
        token: &PaymentMethodToken,
    ) -> Result<(), Error>;
}
