//! Errors for the checkout payment step.

use thiserror::Error;

/// Checkout error
///
/// Every variant is scoped to a single submission attempt; none of them
/// are fatal to the host process. `Validation` and `Tokenization` carry
/// the provider's message verbatim because that text is what gets
/// surfaced to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Required cart grand total is absent from cart state
    #[error("Cart total not found")]
    CartTotalMissing,
    /// Capture component has not registered its confirm callback yet
    #[error("Payment confirmation not available")]
    ConfirmUnavailable,
    /// Hosted element rejected the instrument fields
    #[error("{0}")]
    Validation(String),
    /// External tokenizer returned an error
    #[error("{0}")]
    Tokenization(String),
    /// Cart lock service rejected the acquire call
    #[error("Could not lock cart: {0}")]
    Lock(String),
    /// Payment-method-selection mutation was rejected
    #[error("Could not set payment method on cart: {0}")]
    Mutation(String),
    /// Payment-intent request failed
    #[error("Could not create payment intent: {0}")]
    Intent(String),
    /// Minor-unit conversion overflowed
    #[error("Amount overflow")]
    AmountOverflow,
    /// A submission attempt is already in flight for this step
    #[error("Submission already in progress")]
    SubmissionInFlight,
    /// The payment method was already placed by a previous attempt
    #[error("Payment method already placed")]
    AlreadyPlaced,
    /// Custom error
    #[error("{0}")]
    Custom(String),
}
