//! Compensation infrastructure for the submission saga.
//!
//! Steps of a submission attempt register compensating actions as they
//! complete. If a later step fails, the queue is executed in reverse
//! order (LIFO) so no partial state — most importantly a held cart
//! lock with no corresponding mutation — survives the failure. Each
//! action must be idempotent; compensation errors are logged and never
//! escalate.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::Error;

/// A compensating action registered during a submission attempt.
#[async_trait]
pub trait CompensatingAction: Send + Sync {
    /// Execute the compensating action
    async fn execute(&self) -> Result<(), Error>;

    /// Name of this action for logging
    fn name(&self) -> &'static str;
}

/// Queue of compensating actions, most recent first.
pub type Compensations = Arc<Mutex<VecDeque<Box<dyn CompensatingAction>>>>;

/// Create a new empty compensations queue.
pub fn new_compensations() -> Compensations {
    Arc::new(Mutex::new(VecDeque::new()))
}

/// Add a compensating action to the front of the queue (LIFO order).
pub async fn add_compensation(compensations: &Compensations, action: Box<dyn CompensatingAction>) {
    compensations.lock().await.push_front(action);
}

/// Execute all queued compensating actions in LIFO order.
///
/// Individual failures are logged and skipped so the remaining actions
/// still run.
pub async fn execute_compensations(compensations: &Compensations) {
    let mut queue = compensations.lock().await;

    if queue.is_empty() {
        return;
    }

    tracing::warn!("Running {} compensating actions", queue.len());

    while let Some(compensation) = queue.pop_front() {
        tracing::debug!("Running compensation: {}", compensation.name());
        if let Err(e) = compensation.execute().await {
            tracing::error!(
                "Compensation {} failed: {}. Continuing...",
                compensation.name(),
                e
            );
        }
    }
}

/// Drop all queued actions after a successful attempt.
pub async fn clear_compensations(compensations: &Compensations) {
    compensations.lock().await.clear();
}
