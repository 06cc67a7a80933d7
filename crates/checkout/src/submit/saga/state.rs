//! State types for the submission saga.
//!
//! Each state is a distinct type holding the data available at that
//! stage of the attempt, so invalid orderings (locking before a token
//! exists, mutating before the lock) do not compile.

use uuid::Uuid;

use crate::capture::PaymentMethodToken;
use crate::cart::LockState;

/// Initial state - attempt ID assigned, nothing confirmed yet.
///
/// Only `confirm()` is available.
pub struct Initial {
    /// Unique attempt identifier for logging
    pub attempt_id: Uuid,
}

/// Confirmed state - the instrument was validated and tokenized.
///
/// Only `lock()` is available.
pub struct Confirmed {
    /// Unique attempt identifier
    pub attempt_id: Uuid,
    /// Single-use token produced by the confirm callback
    pub token: PaymentMethodToken,
}

/// Locked state - the cart lock is held for this attempt.
///
/// Only `place()` is available.
pub struct Locked {
    /// Unique attempt identifier
    pub attempt_id: Uuid,
    /// Single-use token to attach to the mutation
    pub token: PaymentMethodToken,
    /// Lock state as reported by the lock service
    pub lock: LockState,
}

/// Placed state - the payment-method mutation succeeded.
///
/// The cart lock remains held for the following checkout step.
pub struct Placed {
    /// Unique attempt identifier
    pub attempt_id: Uuid,
    /// Token that was attached to the mutation
    pub token: PaymentMethodToken,
}
