//! Payment-module plug-in point.
//!
//! A payment provider plugs into the checkout by registering a module
//! under its method code. Only the single provider's plug-in point is
//! modeled; a general multi-provider registry is a non-goal.

use std::collections::HashMap;
use std::sync::Arc;

use crate::capture::InstrumentElement;

/// Method code of the Stripe payments module.
pub const STRIPE_PAYMENTS: &str = "stripe_payments";

/// A payment provider module.
#[derive(Clone)]
pub struct PaymentModule {
    /// Payment method code the module handles
    pub code: String,
    /// Hosted-element provider used to capture and tokenize instruments
    pub element: Arc<dyn InstrumentElement>,
}

/// Registry of payment modules keyed by method code.
#[derive(Default)]
pub struct PaymentModuleRegistry {
    modules: HashMap<String, PaymentModule>,
}

impl PaymentModuleRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module; a later registration for the same code wins.
    pub fn register(&mut self, module: PaymentModule) {
        self.modules.insert(module.code.clone(), module);
    }

    /// Look up the module for a method code.
    pub fn get(&self, code: &str) -> Option<&PaymentModule> {
        self.modules.get(code)
    }

    /// Registered method codes.
    pub fn codes(&self) -> Vec<&str> {
        self.modules.keys().map(String::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::capture::{PaymentMethodToken, ProviderError};

    struct NoopElement;

    #[async_trait]
    impl InstrumentElement for NoopElement {
        async fn validate(&self) -> Result<(), ProviderError> {
            Ok(())
        }

        async fn create_payment_method(&self) -> Result<PaymentMethodToken, ProviderError> {
            Ok(PaymentMethodToken("tok_noop".to_string()))
        }
    }

    #[test]
    fn registers_the_stripe_module() {
        let mut registry = PaymentModuleRegistry::new();
        registry.register(PaymentModule {
            code: STRIPE_PAYMENTS.to_string(),
            element: Arc::new(NoopElement),
        });

        assert!(registry.get(STRIPE_PAYMENTS).is_some());
        assert!(registry.get("braintree").is_none());
        assert_eq!(registry.codes(), vec![STRIPE_PAYMENTS]);
    }

    #[test]
    fn later_registration_wins() {
        let mut registry = PaymentModuleRegistry::new();
        let first: Arc<dyn InstrumentElement> = Arc::new(NoopElement);
        let second: Arc<dyn InstrumentElement> = Arc::new(NoopElement);

        registry.register(PaymentModule {
            code: STRIPE_PAYMENTS.to_string(),
            element: Arc::clone(&first),
        });
        registry.register(PaymentModule {
            code: STRIPE_PAYMENTS.to_string(),
            element: Arc::clone(&second),
        });

        let module = registry.get(STRIPE_PAYMENTS).unwrap();
        assert!(Arc::ptr_eq(&module.element, &second));
    }
}
