// src/lib.rs
// Public library surface for the shell binary and integration tests.

pub mod api;
pub mod config;
pub mod controller;
pub mod debounce;
pub mod error;
pub mod history;
pub mod metrics;
pub mod model;
pub mod notify;
pub mod preview;
pub mod render;
pub mod session;
pub mod theme;

// ---- Re-exports for stable public API ----
pub use crate::api::{ClassifierApi, DynClassifier, HttpClassifier, StaticClassifier, Verdict};
pub use crate::config::ClientConfig;
pub use crate::controller::AnalysisController;
pub use crate::error::ClientError;
pub use crate::history::{HistoryStore, DEFAULT_HISTORY_CAP};
pub use crate::model::{
    AnalysisRequest, AnalysisResult, AnalysisState, Classification, InputKind, PreviewResult,
    PreviewState, RequestState, SourceMetadata,
};
pub use crate::notify::{Notice, NoticeLevel, NotifierMux};
pub use crate::preview::PreviewFetcher;
pub use crate::session::Session;
pub use crate::theme::{Theme, ThemeStore};
