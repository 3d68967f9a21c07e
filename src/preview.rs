//! # Preview fetcher
//! Debounced URL → link-preview lookups.
//!
//! Every `observe` restarts a trailing-edge debounce timer; only the last URL in a
//! quiet window is fetched. A blank URL cancels the timer and clears the view.
//!
//! Dispatched requests are never aborted, so responses can arrive out of order. Each
//! `observe` bumps a generation counter and a response is applied only if its
//! generation is still current (last-dispatched-wins); anything older is dropped.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use metrics::counter;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::api::DynClassifier;
use crate::debounce::DebounceTimer;
use crate::metrics::{ensure_metrics_described, PREVIEW_REQUESTS, PREVIEW_STALE};
use crate::model::PreviewState;

/// Default quiet period before a preview is fetched.
pub const DEFAULT_PREVIEW_DEBOUNCE: Duration = Duration::from_millis(1000);

struct Shared {
    api: DynClassifier,
    state: watch::Sender<PreviewState>,
    generation: AtomicU64,
}

impl Shared {
    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    /// Timer fired: go `Pending` and send one request. Runs synchronously inside the
    /// timer task; the request itself is a separate task so cancelling the timer can
    /// never abort it.
    fn dispatch(self: Arc<Self>, generation: u64, url: String) {
        // Checked under the state lock so a concurrent clear cannot be overwritten.
        let armed = self.state.send_if_modified(|s| {
            if !self.is_current(generation) {
                return false;
            }
            *s = PreviewState::Pending;
            true
        });
        if !armed {
            debug!(url = %url, "preview: superseded before dispatch");
            return;
        }
        counter!(PREVIEW_REQUESTS).increment(1);
        info!(url = %url, provider = self.api.name(), "preview: fetching");

        tokio::spawn(async move {
            let outcome = self.api.preview(&url).await;
            let applied = self.state.send_if_modified(|s| {
                if !self.is_current(generation) {
                    return false;
                }
                *s = match outcome {
                    Ok(p) => PreviewState::Succeeded(p),
                    Err(e) => {
                        warn!(url = %url, kind = e.kind(), "preview failed: {e}");
                        PreviewState::Failed(e)
                    }
                };
                true
            });
            if !applied {
                counter!(PREVIEW_STALE).increment(1);
                debug!(url = %url, "preview: stale response discarded");
            }
        });
    }
}

pub struct PreviewFetcher {
    shared: Arc<Shared>,
    timer: DebounceTimer,
}

impl PreviewFetcher {
    pub fn new(api: DynClassifier, debounce: Duration) -> Self {
        ensure_metrics_described();
        let (state, _) = watch::channel(PreviewState::Idle);
        Self {
            shared: Arc::new(Shared {
                api,
                state,
                generation: AtomicU64::new(0),
            }),
            timer: DebounceTimer::new(debounce),
        }
    }

    /// Feed the current URL input. Call on every change; must run inside a Tokio
    /// runtime.
    pub fn observe(&mut self, url_text: &str) {
        let generation = self.shared.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let url = url_text.trim();

        if url.is_empty() {
            self.timer.cancel();
            self.shared.state.send_if_modified(|s| {
                if matches!(s, PreviewState::Idle) {
                    false
                } else {
                    *s = PreviewState::Idle;
                    true
                }
            });
            return;
        }

        let shared = Arc::clone(&self.shared);
        let url = url.to_string();
        self.timer.schedule(move || shared.dispatch(generation, url));
    }

    /// Same as observing an empty input.
    pub fn clear(&mut self) {
        self.observe("");
    }

    pub fn state(&self) -> PreviewState {
        self.shared.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<PreviewState> {
        self.shared.state.subscribe()
    }

    /// True while a debounce timer is armed and has not fired.
    pub fn is_debouncing(&self) -> bool {
        self.timer.is_armed()
    }

    pub fn debounce(&self) -> Duration {
        self.timer.delay()
    }
}

impl Drop for PreviewFetcher {
    fn drop(&mut self) {
        // Teardown: invalidate anything still in flight. The timer cancels itself.
        self.shared.generation.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::StaticClassifier;

    fn idle_fetcher() -> PreviewFetcher {
        PreviewFetcher::new(Arc::new(StaticClassifier::default()), Duration::from_secs(60))
    }

    #[tokio::test]
    async fn superseded_dispatch_never_goes_pending() {
        let f = idle_fetcher();
        let shared = Arc::clone(&f.shared);
        let stale = shared.generation.fetch_add(1, Ordering::SeqCst);
        let mut rx = f.subscribe();

        Arc::clone(&shared).dispatch(stale, "https://example.com/a".into());
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }

        assert!(!rx.has_changed().unwrap(), "no transition for a superseded fire");
        assert_eq!(f.state(), PreviewState::Idle);
    }

    #[tokio::test]
    async fn current_dispatch_goes_pending_then_settles() {
        let f = idle_fetcher();
        let shared = Arc::clone(&f.shared);
        let current = shared.generation.load(Ordering::SeqCst);
        let mut rx = f.subscribe();

        Arc::clone(&shared).dispatch(current, "https://example.com/a".into());
        assert_eq!(f.state(), PreviewState::Pending);

        let settled = rx.wait_for(|s| s.is_terminal()).await.unwrap().clone();
        let preview = settled.succeeded().cloned().expect("static preview");
        assert_eq!(preview.domain.as_deref(), Some("example.com"));
    }
}
