//! # Analysis controller
//! Owns the lifecycle of the "analyze" action.
//!
//! `Idle → Pending → {Succeeded, Failed}`; a terminal state stays displayed and the
//! controller is immediately armed for the next submission. At most one analysis is
//! in flight per controller: a `submit` while `Pending` joins the running request and
//! resolves to its outcome without a second network call or a second notice.

use std::sync::Arc;

use metrics::counter;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::api::DynClassifier;
use crate::error::ClientError;
use crate::history::HistoryStore;
use crate::metrics::{
    ensure_metrics_described, ANALYSIS_FAILURES, ANALYSIS_JOINED, ANALYSIS_REJECTED,
    ANALYSIS_REQUESTS,
};
use crate::model::{
    stamp_now, AnalysisRequest, AnalysisResult, AnalysisState, InputKind,
    EMPTY_CONTENT_MESSAGE,
};
use crate::notify::{Notice, NotifierMux};

pub type AnalysisOutcome = Result<AnalysisResult, ClientError>;

pub struct AnalysisController {
    api: DynClassifier,
    history: Arc<HistoryStore>,
    notifier: NotifierMux,
    state: watch::Sender<AnalysisState>,
}

impl AnalysisController {
    pub fn new(api: DynClassifier, history: Arc<HistoryStore>, notifier: NotifierMux) -> Self {
        ensure_metrics_described();
        let (state, _) = watch::channel(AnalysisState::Idle);
        Self {
            api,
            history,
            notifier,
            state,
        }
    }

    /// Current displayed state.
    pub fn state(&self) -> AnalysisState {
        self.state.borrow().clone()
    }

    pub fn is_pending(&self) -> bool {
        self.state.borrow().is_pending()
    }

    /// Receiver that sees every transition (for renderers).
    pub fn subscribe(&self) -> watch::Receiver<AnalysisState> {
        self.state.subscribe()
    }

    pub fn history(&self) -> &Arc<HistoryStore> {
        &self.history
    }

    /// Build the request from raw input and submit it.
    pub async fn submit_text(&self, content: &str, kind: InputKind, advanced: bool) -> AnalysisOutcome {
        match AnalysisRequest::new(content, kind, advanced) {
            Ok(request) => self.submit(request).await,
            Err(err) => self.reject(err).await,
        }
    }

    pub async fn submit(&self, request: AnalysisRequest) -> AnalysisOutcome {
        // Fields are public, so a hand-built request is checked again here.
        let content = request.content.trim();
        if content.is_empty() {
            return self
                .reject(ClientError::Validation(EMPTY_CONTENT_MESSAGE.to_string()))
                .await;
        }

        let armed = self.state.send_if_modified(|s| {
            if s.is_pending() {
                false
            } else {
                *s = AnalysisState::Pending;
                true
            }
        });
        if !armed {
            counter!(ANALYSIS_JOINED).increment(1);
            debug!("analysis: already pending, joining in-flight request");
            return self.join_in_flight().await;
        }

        let request = AnalysisRequest {
            content: content.to_string(),
            ..request
        };
        let guard = PendingGuard { state: &self.state };

        counter!(ANALYSIS_REQUESTS).increment(1);
        info!(
            provider = self.api.name(),
            kind = request.kind.as_str(),
            advanced = request.advanced,
            chars = request.content.chars().count(),
            "analysis: submitting"
        );

        let outcome = self.api.analyze(&request).await.map(|v| AnalysisResult {
            classification: v.classification,
            confidence_score: v.confidence_score,
            country_of_origin: v.country_of_origin,
            is_verified: v.is_verified,
            source_metadata: v.source_metadata,
            explanation: v.explanation,
            content: request.content.clone(),
            timestamp: stamp_now(),
        });

        match &outcome {
            Ok(result) => {
                self.history.append(result.clone());
                self.state.send_replace(AnalysisState::Succeeded(result.clone()));
                info!(
                    classification = result.classification.as_str(),
                    confidence = result.confidence_score,
                    "analysis: succeeded"
                );
                self.notifier
                    .notify(&Notice::success(format!(
                        "Analysis complete: {} ({:.0}% confidence)",
                        result.classification.as_str(),
                        result.confidence_score
                    )))
                    .await;
            }
            Err(e) => {
                counter!(ANALYSIS_FAILURES).increment(1);
                self.state.send_replace(AnalysisState::Failed(e.clone()));
                warn!(kind = e.kind(), status = ?e.status(), "analysis failed: {e}");
                self.notifier.notify(&Notice::error(e.message())).await;
            }
        }
        drop(guard);
        outcome
    }

    /// Replay a past result into the view. No network call, no notice, and ignored
    /// while a request is in flight. Returns whether the view changed.
    pub fn show(&self, result: AnalysisResult) -> bool {
        self.state.send_if_modified(move |s| {
            if s.is_pending() {
                false
            } else {
                *s = AnalysisState::Succeeded(result);
                true
            }
        })
    }

    async fn reject(&self, err: ClientError) -> AnalysisOutcome {
        counter!(ANALYSIS_REJECTED).increment(1);
        debug!("analysis: blank submission rejected");
        self.notifier.notify(&Notice::validation(err.message())).await;
        Err(err)
    }

    async fn join_in_flight(&self) -> AnalysisOutcome {
        let mut rx = self.state.subscribe();
        let settled = rx
            .wait_for(|s| !s.is_pending())
            .await
            .map_err(|_| ClientError::Transport("analysis controller shut down".to_string()))?;
        match &*settled {
            AnalysisState::Succeeded(r) => Ok(r.clone()),
            AnalysisState::Failed(e) => Err(e.clone()),
            AnalysisState::Idle | AnalysisState::Pending => Err(ClientError::Transport(
                "analysis was cancelled".to_string(),
            )),
        }
    }
}

/// Puts a controller whose submit future was dropped mid-flight back to `Idle`, so it
/// never stays stuck in `Pending`.
struct PendingGuard<'a> {
    state: &'a watch::Sender<AnalysisState>,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.state.send_if_modified(|s| {
            if s.is_pending() {
                *s = AnalysisState::Idle;
                true
            } else {
                false
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::StaticClassifier;
    use crate::model::Classification;
    use crate::notify::{NoticeLevel, RecordingNotifier};

    fn controller() -> (AnalysisController, Arc<RecordingNotifier>) {
        let rec = Arc::new(RecordingNotifier::new());
        let c = AnalysisController::new(
            Arc::new(StaticClassifier::default()),
            Arc::new(HistoryStore::default()),
            NotifierMux::new().with(rec.clone()),
        );
        (c, rec)
    }

    #[tokio::test]
    async fn success_stamps_exact_trimmed_content() {
        let (c, rec) = controller();
        let r = c
            .submit_text("  Moon landing was staged  ", InputKind::Headline, false)
            .await
            .unwrap();
        assert_eq!(r.content, "Moon landing was staged");
        assert_eq!(r.classification, Classification::Unverified);
        assert!(r.timestamp_utc().is_some());
        assert_eq!(c.state(), AnalysisState::Succeeded(r.clone()));
        assert_eq!(c.history().all(), vec![r]);
        assert_eq!(rec.count(NoticeLevel::Success), 1);
    }

    #[tokio::test]
    async fn show_overwrites_terminal_state_without_notice() {
        let (c, rec) = controller();
        let first = c.submit_text("first", InputKind::Headline, false).await.unwrap();
        let _second = c.submit_text("second", InputKind::Headline, false).await.unwrap();
        assert!(c.show(first.clone()));
        assert_eq!(c.state().succeeded(), Some(&first));
        assert_eq!(rec.len(), 2);
        assert_eq!(c.history().len(), 2);
    }

    #[tokio::test]
    async fn blank_text_and_blank_request_share_the_validation_path() {
        let (c, rec) = controller();
        let from_text = c.submit_text(" \n\t ", InputKind::Article, true).await.unwrap_err();
        let hand_built = AnalysisRequest {
            content: "   ".into(),
            kind: InputKind::Headline,
            advanced: false,
        };
        let from_request = c.submit(hand_built).await.unwrap_err();

        assert_eq!(from_text, from_request);
        assert_eq!(from_text.kind(), "validation");
        assert_eq!(rec.count(NoticeLevel::Validation), 2);
        assert_eq!(rec.len(), 2);
        assert_eq!(c.state(), AnalysisState::Idle);
        assert!(c.history().is_empty());
    }
}
