//! Form composition.
//!
//! The checkout page is a multi-step form; each step registers a
//! submit handler under a unique key and the composer runs them in
//! registration order. The payment step participates through this
//! contract only.

use std::sync::Arc;

use async_trait::async_trait;

use crate::submit::PaymentStep;
use crate::Error;

/// One step of a composed checkout form.
#[async_trait]
pub trait FormStep: Send + Sync {
    /// Unique key for this step
    fn key(&self) -> String;

    /// Submit handler for this step
    async fn submit(&self) -> Result<(), Error>;
}

/// Composes form steps and submits them in registration order.
#[derive(Default)]
pub struct ComposedForm {
    steps: Vec<Arc<dyn FormStep>>,
}

impl ComposedForm {
    /// Create an empty form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a step, replacing an earlier one with the same key.
    pub fn register(&mut self, step: Arc<dyn FormStep>) {
        let key = step.key();
        if let Some(existing) = self.steps.iter_mut().find(|s| s.key() == key) {
            *existing = step;
        } else {
            self.steps.push(step);
        }
    }

    /// Registered step keys, in submission order.
    pub fn keys(&self) -> Vec<String> {
        self.steps.iter().map(|s| s.key()).collect()
    }

    /// Submit all steps in order, stopping at the first failure.
    pub async fn submit(&self) -> Result<(), Error> {
        for step in &self.steps {
            tracing::debug!("Submitting form step {}", step.key());
            step.submit().await?;
        }
        Ok(())
    }
}

#[async_trait]
impl FormStep for PaymentStep {
    fn key(&self) -> String {
        format!("payment_options_{}", self.method_code())
    }

    async fn submit(&self) -> Result<(), Error> {
        PaymentStep::submit(self).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    struct CountingStep {
        key: &'static str,
        calls: Arc<AtomicUsize>,
        fail: bool,
    }

    #[async_trait]
    impl FormStep for CountingStep {
        fn key(&self) -> String {
            self.key.to_string()
        }

        async fn submit(&self) -> Result<(), Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(Error::Custom("step failed".to_string()))
            } else {
                Ok(())
            }
        }
    }

    #[tokio::test]
    async fn submits_in_registration_order_and_stops_on_failure() {
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));
        let third = Arc::new(AtomicUsize::new(0));

        let mut form = ComposedForm::new();
        form.register(Arc::new(CountingStep {
            key: "shipping",
            calls: Arc::clone(&first),
            fail: false,
        }));
        form.register(Arc::new(CountingStep {
            key: "payment_options_stripe_payments",
            calls: Arc::clone(&second),
            fail: true,
        }));
        form.register(Arc::new(CountingStep {
            key: "place_order",
            calls: Arc::clone(&third),
            fail: false,
        }));

        assert!(form.submit().await.is_err());
        assert_eq!(first.load(Ordering::SeqCst), 1);
        assert_eq!(second.load(Ordering::SeqCst), 1);
        assert_eq!(third.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn re_registering_a_key_replaces_the_step() {
        let old_calls = Arc::new(AtomicUsize::new(0));
        let new_calls = Arc::new(AtomicUsize::new(0));

        let mut form = ComposedForm::new();
        form.register(Arc::new(CountingStep {
            key: "payment",
            calls: Arc::clone(&old_calls),
            fail: false,
        }));
        form.register(Arc::new(CountingStep {
            key: "payment",
            calls: Arc::clone(&new_calls),
            fail: false,
        }));

        form.submit().await.unwrap();
        assert_eq!(old_calls.load(Ordering::SeqCst), 0);
        assert_eq!(new_calls.load(Ordering::SeqCst), 1);
        assert_eq!(form.keys(), vec!["payment".to_string()]);
    }
}
