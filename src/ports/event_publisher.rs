//! EventPublisher port - outbound delivery of assessment events.
//!
//! The domain never publishes directly. Handlers drain the aggregate outbox
//! after persisting it and hand each envelope to this port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, EventEnvelope};

/// Port for publishing domain events.
///
/// Delivery is at-least-once; consumers deduplicate on `event_id`.
/// Callers treat failures as fire-and-forget and only log them.
///
/// # Example
///
/// ```ignore
/// for event in assessment.take_events() {
///     publisher.publish(event.to_envelope()?).await?;
/// }
/// ```
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish a single event.
    async fn publish(&self, event: EventEnvelope) -> Result<(), DomainError>;

    /// Publish several events in order, stopping at the first failure.
    async fn publish_all(&self, events: Vec<EventEnvelope>) -> Result<(), DomainError> {
        for event in events {
            self.publish(event).await?;
        }
        Ok(())
    }
}
