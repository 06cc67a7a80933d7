//! Deterministic fakes for the checkout collaborator traits.
//!
//! Every fake records the calls it receives and can be switched into a
//! failure mode at runtime, so tests can script one failing attempt
//! followed by a successful retry. No fake performs real I/O.

#![warn(missing_docs)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use checkout::{
    CartLock, CartMutation, Error, InstrumentElement, IntentService, LockState,
    PaymentIntentRequest, PaymentIntentResponse, PaymentMethodToken, ProviderError,
};

/// Fake hosted payment element.
///
/// Yields a fixed token unless a validation or tokenization failure is
/// scripted.
pub struct FakeElement {
    token: String,
    validate_error: Mutex<Option<String>>,
    tokenize_error: Mutex<Option<String>>,
    confirm_calls: AtomicUsize,
}

impl FakeElement {
    /// Element that tokenizes to `token`.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            validate_error: Mutex::new(None),
            tokenize_error: Mutex::new(None),
            confirm_calls: AtomicUsize::new(0),
        }
    }

    /// Script the next validations to fail with `message`.
    pub fn fail_validation(&self, message: impl Into<String>) {
        *self.validate_error.lock().unwrap() = Some(message.into());
    }

    /// Script the next tokenizations to fail with `message`.
    pub fn fail_tokenization(&self, message: impl Into<String>) {
        *self.tokenize_error.lock().unwrap() = Some(message.into());
    }

    /// Clear any scripted failure.
    pub fn recover(&self) {
        *self.validate_error.lock().unwrap() = None;
        *self.tokenize_error.lock().unwrap() = None;
    }

    /// How many tokenization calls were made.
    pub fn tokenize_calls(&self) -> usize {
        self.confirm_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl InstrumentElement for FakeElement {
    async fn validate(&self) -> Result<(), ProviderError> {
        match self.validate_error.lock().unwrap().clone() {
            Some(message) => Err(ProviderError::new(message)),
            None => Ok(()),
        }
    }

    async fn create_payment_method(&self) -> Result<PaymentMethodToken, ProviderError> {
        self.confirm_calls.fetch_add(1, Ordering::SeqCst);
        match self.tokenize_error.lock().unwrap().clone() {
            Some(message) => Err(ProviderError::new(message)),
            None => Ok(PaymentMethodToken(self.token.clone())),
        }
    }
}

/// Fake cart lock service.
///
/// Tracks the held/just-locked state, every acquire tag and every
/// release. Release is idempotent like the real service.
#[derive(Default)]
pub struct FakeCartLock {
    state: Mutex<LockState>,
    tags: Mutex<Vec<String>>,
    unlock_calls: AtomicUsize,
    lock_error: Mutex<Option<String>>,
}

impl FakeCartLock {
    /// Unlocked lock service.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start out holding a lock that this session did not just take,
    /// as left behind by a crashed attempt in another tab.
    pub fn with_stale_lock() -> Self {
        let lock = Self::new();
        *lock.state.lock().unwrap() = LockState {
            locked: true,
            just_locked: false,
        };
        lock
    }

    /// Script acquire calls to fail with `message`.
    pub fn fail_lock(&self, message: impl Into<String>) {
        *self.lock_error.lock().unwrap() = Some(message.into());
    }

    /// Whether the lock is currently held.
    pub fn is_locked(&self) -> bool {
        self.state.lock().unwrap().locked
    }

    /// Tags of every successful acquire, in order.
    pub fn tags(&self) -> Vec<String> {
        self.tags.lock().unwrap().clone()
    }

    /// Number of release calls, including no-op releases.
    pub fn unlock_calls(&self) -> usize {
        self.unlock_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CartLock for FakeCartLock {
    async fn lock(&self, tag: &str) -> Result<LockState, Error> {
        if let Some(message) = self.lock_error.lock().unwrap().clone() {
            return Err(Error::Lock(message));
        }

        let state = LockState {
            locked: true,
            just_locked: true,
        };
        *self.state.lock().unwrap() = state;
        self.tags.lock().unwrap().push(tag.to_string());
        Ok(state)
    }

    async fn unlock(&self) -> Result<(), Error> {
        self.unlock_calls.fetch_add(1, Ordering::SeqCst);
        *self.state.lock().unwrap() = LockState::default();
        Ok(())
    }

    async fn state(&self) -> LockState {
        *self.state.lock().unwrap()
    }
}

/// Fake cart mutation API recording every payment-method selection.
#[derive(Default)]
pub struct FakeCart {
    submissions: Mutex<Vec<(String, String)>>,
    mutation_error: Mutex<Option<String>>,
}

impl FakeCart {
    /// Cart that accepts every mutation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Script mutations to fail with `message`.
    pub fn fail_mutation(&self, message: impl Into<String>) {
        *self.mutation_error.lock().unwrap() = Some(message.into());
    }

    /// Clear a scripted mutation failure.
    pub fn recover(&self) {
        *self.mutation_error.lock().unwrap() = None;
    }

    /// Every accepted `(method_code, token)` pair, in order.
    pub fn submissions(&self) -> Vec<(String, String)> {
        self.submissions.lock().unwrap().clone()
    }
}

#[async_trait]
impl CartMutation for FakeCart {
    async fn set_payment_method(
        &self,
        method_code: &str,
        token: &PaymentMethodToken,
    ) -> Result<(), Error> {
        if let Some(message) = self.mutation_error.lock().unwrap().clone() {
            return Err(Error::Mutation(message));
        }

        self.submissions
            .lock()
            .unwrap()
            .push((method_code.to_string(), token.0.clone()));
        Ok(())
    }
}

/// Fake payment-intent backend.
#[derive(Default)]
pub struct FakeIntentService {
    secret: String,
    requests: Mutex<Vec<PaymentIntentRequest>>,
    intent_error: Mutex<Option<String>>,
}

impl FakeIntentService {
    /// Backend that issues `secret` for every request.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            requests: Mutex::new(Vec::new()),
            intent_error: Mutex::new(None),
        }
    }

    /// Script intent creation to fail with `message`.
    pub fn fail(&self, message: impl Into<String>) {
        *self.intent_error.lock().unwrap() = Some(message.into());
    }

    /// Every intent request received, in order.
    pub fn requests(&self) -> Vec<PaymentIntentRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl IntentService for FakeIntentService {
    async fn create_intent(
        &self,
        request: PaymentIntentRequest,
    ) -> Result<PaymentIntentResponse, Error> {
        self.requests.lock().unwrap().push(request);

        if let Some(message) = self.intent_error.lock().unwrap().clone() {
            return Err(Error::Intent(message));
        }

        Ok(PaymentIntentResponse {
            client_secret: self.secret.clone(),
        })
    }
}
