//! Audit sink implementations.
//!
//! The engine emits a [`DomainEvent`] after each committed transition. The
//! default sink renders the event (with its before/after snapshots) as JSON
//! onto the structured log; the audit collaborator tails that stream. A
//! deployment can inject its own [`AuditSink`] instead.

use tracing::{info, warn};

use frontdesk_core::{AuditSink, DomainEvent};

/// Sink that writes every domain event to the `frontdesk::audit` log target.
#[derive(Debug, Default)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&self, event: &DomainEvent) {
        match serde_json::to_string(event) {
            Ok(payload) => {
                info!(
                    target: "frontdesk::audit",
                    event = event.name(),
                    payload = %payload,
                    "domain event"
                );
            }
            Err(err) => {
                // Must not fail the already-committed operation
                warn!(event = event.name(), error = %err, "failed to serialize audit event");
            }
        }
    }
}
