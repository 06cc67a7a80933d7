//! Compensation actions for the submission saga.
//!
//! A failed attempt must never leave the cart lock held without a
//! corresponding mutation. Release is idempotent on the lock service
//! side, so the action is registered before the lock is even acquired
//! and runs unconditionally on every failure path.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::instrument;
use uuid::Uuid;

use crate::cart::CartLock;
use crate::saga::CompensatingAction;
use crate::Error;

/// Compensation action that releases the cart lock.
///
/// A no-op when nothing is held.
pub struct ReleaseCartLock {
    /// Lock service reference
    pub locker: Arc<dyn CartLock>,
    /// Attempt ID for logging
    pub attempt_id: Uuid,
}

#[async_trait]
impl CompensatingAction for ReleaseCartLock {
    #[instrument(skip_all)]
    async fn execute(&self) -> Result<(), Error> {
        tracing::info!(
            "Compensation: Releasing cart lock for attempt {}",
            self.attempt_id
        );

        self.locker.unlock().await
    }

    fn name(&self) -> &'static str {
        "ReleaseCartLock"
    }
}
