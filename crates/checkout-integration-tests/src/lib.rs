//! Shared setup helpers for the checkout integration tests.

use std::sync::Arc;

use checkout::{CartTotals, PaymentStep, SharedCartTotals, STRIPE_PAYMENTS};
use checkout_fake_provider::{FakeCart, FakeCartLock, FakeElement, FakeIntentService};
use rust_decimal_macros::dec;
use tokio::sync::RwLock;

/// Initialize tracing for tests; safe to call more than once.
pub fn setup_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Cart totals of 12.345 EUR, exercising the rounding policy end to end.
pub fn default_totals() -> SharedCartTotals {
    Arc::new(RwLock::new(CartTotals {
        grand_total: Some(dec!(12.345)),
        currency: "EUR".to_string(),
    }))
}

/// A fully wired checkout payment step backed by fakes.
pub struct TestCheckout {
    /// Shared cart totals, writable by tests to simulate cart changes
    pub totals: SharedCartTotals,
    /// Fake lock service
    pub locker: Arc<FakeCartLock>,
    /// Fake cart mutation API
    pub cart: Arc<FakeCart>,
    /// Fake hosted element tokenizing to `tok_abc`
    pub element: Arc<FakeElement>,
    /// Fake intent backend issuing `pi_secret_123`
    pub intent: Arc<FakeIntentService>,
    /// The mounted payment step
    pub step: Arc<PaymentStep>,
}

/// Mount a `stripe_payments` step and its capture component.
pub async fn setup_checkout() -> TestCheckout {
    setup_tracing();

    let totals = default_totals();
    let locker = Arc::new(FakeCartLock::new());
    let cart = Arc::new(FakeCart::new());
    let element = Arc::new(FakeElement::new("tok_abc"));
    let intent = Arc::new(FakeIntentService::new("pi_secret_123"));

    let locker_dyn: Arc<dyn checkout::CartLock> = locker.clone();
    let cart_dyn: Arc<dyn checkout::CartMutation> = cart.clone();
    let element_dyn: Arc<dyn checkout::InstrumentElement> = element.clone();

    let step = PaymentStep::mount(
        STRIPE_PAYMENTS,
        Arc::clone(&totals),
        locker_dyn,
        cart_dyn,
        intent.as_ref(),
    )
    .await;

    let capture = step.mount_capture(element_dyn).await;
    assert!(capture.is_some(), "authorization handle should be present");

    TestCheckout {
        totals,
        locker,
        cart,
        element,
        intent,
        step: Arc::new(step),
    }
}
