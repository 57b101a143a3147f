use async_trait::async_trait;

use crate::domain::{error::PublishError, models::event::RegistrationEvent};

/// Delivers registration events to a durable stream
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish once and wait for the broker's acknowledgement.
    async fn publish(&self, event: &RegistrationEvent) -> Result<(), PublishError>;
}
