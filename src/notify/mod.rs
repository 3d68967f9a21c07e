//! User-visible notices ("toasts") emitted by the request flows.
//!
//! The controller emits exactly one notice per terminal transition, plus one for a
//! rejected blank submission. Where notices end up is up to the shell: the log, the
//! terminal, or an in-memory recorder in tests.

pub mod console;
pub mod recorder;

use anyhow::Result;
use chrono::{DateTime, Utc};
use std::sync::Arc;

pub use console::ConsoleNotifier;
pub use recorder::RecordingNotifier;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoticeLevel {
    Success,
    Error,
    Validation,
}

impl NoticeLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Validation => "validation",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    pub ts: DateTime<Utc>,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            ts: Utc::now(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Validation, message)
    }
}

#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, notice: &Notice) -> Result<()>;
}

/// Writes every notice to the tracing log.
pub struct TracingNotifier;

#[async_trait::async_trait]
impl Notifier for TracingNotifier {
    async fn send(&self, notice: &Notice) -> Result<()> {
        match notice.level {
            NoticeLevel::Success => {
                tracing::info!(target: "notice", kind = notice.level.as_str(), "{}", notice.message)
            }
            NoticeLevel::Error | NoticeLevel::Validation => {
                tracing::warn!(target: "notice", kind = notice.level.as_str(), "{}", notice.message)
            }
        }
        Ok(())
    }
}

/// Fans one notice out to every registered sink. A failing sink is logged and
/// skipped; it never fails the request flow.
#[derive(Clone, Default)]
pub struct NotifierMux {
    sinks: Vec<Arc<dyn Notifier>>,
}

impl NotifierMux {
    pub fn new() -> Self {
        Self::default()
    }

    /// Log-only mux.
    pub fn tracing_only() -> Self {
        Self::new().with(Arc::new(TracingNotifier))
    }

    pub fn with(mut self, sink: Arc<dyn Notifier>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    pub async fn notify(&self, notice: &Notice) {
        for sink in &self.sinks {
            if let Err(e) = sink.send(notice).await {
                tracing::warn!(error = ?e, "notice sink failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Broken;

    #[async_trait::async_trait]
    impl Notifier for Broken {
        async fn send(&self, _notice: &Notice) -> Result<()> {
            anyhow::bail!("sink down")
        }
    }

    #[tokio::test]
    async fn failing_sink_does_not_block_others() {
        let rec = Arc::new(RecordingNotifier::new());
        let mux = NotifierMux::new().with(Arc::new(Broken)).with(rec.clone());
        mux.notify(&Notice::success("done")).await;
        assert_eq!(rec.messages(), vec!["done".to_string()]);
        assert_eq!(mux.len(), 2);
    }
}
