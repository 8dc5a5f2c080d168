//! Audit trail emission.
//!
//! Every generated statement and note is reported to an [`AuditSink`] after
//! it has been computed. Emission never blocks or fails the request: the
//! event is sent on a spawned task and sink errors are only logged.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tieout_shared::types::TenantId;

use crate::source::SourceError;

/// What was generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditKind {
    /// A primary statement.
    Statement,
    /// An IFRS disclosure note.
    IfrsNote,
    /// Persisted period-close notes.
    PeriodCloseNotes,
}

/// One generated artefact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Tenant the artefact belongs to.
    pub tenant_id: TenantId,
    /// Kind of artefact.
    pub kind: AuditKind,
    /// Short name, e.g. `BS` or `C`.
    pub name: String,
    /// Request parameters as written by the caller-facing API.
    pub parameters: String,
    /// When generation finished.
    pub generated_at: DateTime<Utc>,
}

impl AuditEvent {
    /// An event stamped now.
    #[must_use]
    pub fn now(
        tenant_id: TenantId,
        kind: AuditKind,
        name: impl Into<String>,
        parameters: impl Into<String>,
    ) -> Self {
        Self {
            tenant_id,
            kind,
            name: name.into(),
            parameters: parameters.into(),
            generated_at: Utc::now(),
        }
    }
}

/// Receiver of audit events.
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// Records one event.
    async fn record(&self, event: &AuditEvent) -> Result<(), SourceError>;
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopAuditSink;

#[async_trait]
impl AuditSink for NoopAuditSink {
    async fn record(&self, _event: &AuditEvent) -> Result<(), SourceError> {
        Ok(())
    }
}

/// Writes events to the `tieout::audit` tracing target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditSink;

#[async_trait]
impl AuditSink for TracingAuditSink {
    async fn record(&self, event: &AuditEvent) -> Result<(), SourceError> {
        tracing::info!(
            target: "tieout::audit",
            tenant_id = %event.tenant_id,
            kind = ?event.kind,
            name = %event.name,
            parameters = %event.parameters,
            generated_at = %event.generated_at,
            "report generated"
        );
        Ok(())
    }
}

/// Sends `event` to `sink` without waiting for it.
///
/// Outside a Tokio runtime the event is dropped with a debug log.
pub fn emit(sink: &Arc<dyn AuditSink>, event: AuditEvent) {
    let Ok(handle) = tokio::runtime::Handle::try_current() else {
        tracing::debug!(tenant_id = %event.tenant_id, "no runtime, audit event dropped");
        return;
    };

    let sink = Arc::clone(sink);
    handle.spawn(async move {
        if let Err(err) = sink.record(&event).await {
            tracing::warn!(
                tenant_id = %event.tenant_id,
                name = %event.name,
                error = %err,
                "audit sink failed, event discarded"
            );
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recording(Mutex<Vec<AuditEvent>>);

    #[async_trait]
    impl AuditSink for Recording {
        async fn record(&self, event: &AuditEvent) -> Result<(), SourceError> {
            self.0.lock().unwrap().push(event.clone());
            Ok(())
        }
    }

    struct Failing;

    #[async_trait]
    impl AuditSink for Failing {
        async fn record(&self, _event: &AuditEvent) -> Result<(), SourceError> {
            Err(SourceError::Unavailable("audit down".into()))
        }
    }

    #[tokio::test]
    async fn test_emit_delivers_event() {
        let recording = Arc::new(Recording::default());
        let sink: Arc<dyn AuditSink> = recording.clone();
        emit(&sink, AuditEvent::now(TenantId::new(), AuditKind::Statement, "BS", "asOf=2024-03-31"));

        for _ in 0..50 {
            if !recording.0.lock().unwrap().is_empty() {
                break;
            }
            tokio::task::yield_now().await;
        }
        let events = recording.0.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].name, "BS");
    }

    #[tokio::test]
    async fn test_emit_swallows_sink_failure() {
        let sink: Arc<dyn AuditSink> = Arc::new(Failing);
        emit(&sink, AuditEvent::now(TenantId::new(), AuditKind::IfrsNote, "C", "2024-01-01..2024-03-31"));
        tokio::task::yield_now().await;
    }

    #[test]
    fn test_emit_outside_runtime_is_noop() {
        let sink: Arc<dyn AuditSink> = Arc::new(NoopAuditSink);
        emit(&sink, AuditEvent::now(TenantId::new(), AuditKind::Statement, "TB", ""));
    }
}
