//! Coordinating shell state: one per interactive session.
//!
//! Owns the input buffer and wires it to the two request flows. The buffer is the
//! only thing both flows read; neither flow writes anything the other owns.

use std::sync::Arc;

use anyhow::Result;

use crate::api::DynClassifier;
use crate::config::ClientConfig;
use crate::controller::{AnalysisController, AnalysisOutcome};
use crate::history::HistoryStore;
use crate::model::{AnalysisResult, AnalysisState, InputKind, PreviewState};
use crate::notify::NotifierMux;
use crate::preview::PreviewFetcher;
use crate::theme::{Theme, ThemeStore};

pub struct Session {
    input: String,
    kind: InputKind,
    advanced: bool,
    controller: AnalysisController,
    history: Arc<HistoryStore>,
    preview: PreviewFetcher,
    themes: ThemeStore,
    theme: Theme,
}

impl Session {
    /// Reads the stored theme once; must run inside a Tokio runtime.
    pub fn new(config: &ClientConfig, api: DynClassifier, notifier: NotifierMux) -> Self {
        let history = Arc::new(HistoryStore::with_capacity(config.history_cap));
        let controller = AnalysisController::new(Arc::clone(&api), Arc::clone(&history), notifier);
        let preview = PreviewFetcher::new(api, config.debounce());
        let themes = ThemeStore::new(config.theme_path.clone());
        let theme = themes.load();
        Self {
            input: String::new(),
            kind: InputKind::default(),
            advanced: false,
            controller,
            history,
            preview,
            themes,
            theme,
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn kind(&self) -> InputKind {
        self.kind
    }

    pub fn advanced(&self) -> bool {
        self.advanced
    }

    /// Replace the input text. In URL mode every change goes through the preview
    /// debounce.
    pub fn set_input(&mut self, text: &str) {
        self.input = text.to_string();
        if self.kind == InputKind::Url {
            self.preview.observe(&self.input);
        }
    }

    /// Switching away from URL mode drops any pending or shown preview.
    pub fn set_kind(&mut self, kind: InputKind) {
        if self.kind == kind {
            return;
        }
        self.kind = kind;
        if kind == InputKind::Url {
            self.preview.observe(&self.input);
        } else {
            self.preview.clear();
        }
    }

    pub fn set_advanced(&mut self, on: bool) {
        self.advanced = on;
    }

    pub async fn submit(&self) -> AnalysisOutcome {
        self.controller
            .submit_text(&self.input, self.kind, self.advanced)
            .await
    }

    /// Restore a past entry: the displayed result becomes the entry and the input
    /// text becomes its exact `content`. Refused while an analysis is in flight.
    pub fn replay(&mut self, index: usize) -> Option<AnalysisResult> {
        if self.controller.is_pending() {
            tracing::debug!(index, "replay ignored: analysis pending");
            return None;
        }
        let entry = self.history.select(index)?;
        self.controller.show(entry.clone());
        self.set_input(&entry.content);
        Some(entry)
    }

    pub fn analysis(&self) -> AnalysisState {
        self.controller.state()
    }

    pub fn preview(&self) -> PreviewState {
        self.preview.state()
    }

    pub fn controller(&self) -> &AnalysisController {
        &self.controller
    }

    pub fn preview_fetcher(&self) -> &PreviewFetcher {
        &self.preview
    }

    pub fn history(&self) -> &Arc<HistoryStore> {
        &self.history
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Persist on every change. The in-memory value changes even if the write fails.
    pub fn set_theme(&mut self, theme: Theme) -> Result<()> {
        self.theme = theme;
        self.themes.save(theme)
    }
}
