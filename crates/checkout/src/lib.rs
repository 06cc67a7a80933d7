//! Checkout payment step orchestration.
//!
//! Coordinates the client-side payment step of a checkout: acquire a
//! server-issued payment authorization handle, capture and tokenize
//! the payment instrument through a hosted element, take an exclusive
//! lock on the cart, and submit the payment-method-selection mutation
//! carrying the token — releasing the lock on any failure.
//!
//! The external tokenizer, the cart lock service, the cart mutation
//! API and the payment-intent backend are collaborator traits; this
//! crate owns only the ordering and failure-recovery logic between
//! them.

#![warn(missing_docs)]

pub mod amount;
pub mod capture;
pub mod cart;
mod error;
pub mod form;
pub mod intent;
pub mod module;
pub mod saga;
pub mod submit;

pub use amount::{minor_units, MINOR_UNIT_FACTOR};
pub use capture::{
    ConfirmFn, ConfirmSlot, InstrumentCapture, InstrumentElement, PaymentMethodToken,
    ProviderError,
};
pub use cart::{CartLock, CartMutation, CartTotals, LockState, SharedCartTotals};
pub use error::Error;
pub use form::{ComposedForm, FormStep};
#[cfg(feature = "http")]
pub use intent::HttpIntentService;
pub use intent::{
    acquire_authorization, AuthorizationHandle, IntentService, PaymentIntentRequest,
    PaymentIntentResponse,
};
pub use module::{PaymentModule, PaymentModuleRegistry, STRIPE_PAYMENTS};
pub use submit::{PaymentStep, SubmissionState};
