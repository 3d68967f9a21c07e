//! # Model
//! Request/response records shared by the controller, history and preview flows.
//!
//! Wire shapes (what the classification service sends) live in `api.rs`; the types
//! here are what the rest of the client works with. Optional service fields stay
//! `Option<_>` all the way through so absence is structural, not a sentinel.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ClientError;

/// What the user says the content is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    #[default]
    Headline,
    Article,
    Url,
}

impl InputKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "headline" => Some(Self::Headline),
            "article" => Some(Self::Article),
            "url" | "link" => Some(Self::Url),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Headline => "headline",
            Self::Article => "article",
            Self::Url => "url",
        }
    }
}

pub(crate) const EMPTY_CONTENT_MESSAGE: &str = "Please enter some content to analyze";

/// One submission. Built fresh from the input buffer and dropped after the call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub content: String,
    pub kind: InputKind,
    pub advanced: bool,
}

impl AnalysisRequest {
    /// Trims `content`. Blank input is rejected here so no caller can reach the
    /// network with it.
    pub fn new(content: &str, kind: InputKind, advanced: bool) -> Result<Self, ClientError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(ClientError::Validation(EMPTY_CONTENT_MESSAGE.to_string()));
        }
        Ok(Self {
            content: content.to_string(),
            kind,
            advanced,
        })
    }
}

/// Verdict returned by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Classification {
    True,
    Fake,
    Unverified,
}

impl Classification {
    /// Case-insensitive; anything unrecognized is `Unverified`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "true" | "real" => Self::True,
            "fake" | "false" => Self::Fake,
            _ => Self::Unverified,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::True => "True",
            Self::Fake => "Fake",
            Self::Unverified => "Unverified",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SourceMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
}

impl SourceMetadata {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.date.is_none() && self.author.is_none() && self.domain.is_none()
    }
}

/// A completed analysis. Immutable once built.
///
/// `content` and `timestamp` are stamped locally at receipt: `content` is the exact
/// trimmed text that was submitted, so replaying an entry reproduces the submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub classification: Classification,
    /// Always within `0.0..=100.0`.
    pub confidence_score: f64,
    pub country_of_origin: String,
    pub is_verified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_metadata: Option<SourceMetadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    pub content: String,
    /// RFC 3339, UTC, millisecond precision.
    pub timestamp: String,
}

impl AnalysisResult {
    pub fn timestamp_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.timestamp)
            .ok()
            .map(|t| t.with_timezone(&Utc))
    }
}

pub(crate) fn stamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Link preview. Every field is optional; a missing field means "not available".
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PreviewResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

/// Lifecycle of one request flow (analysis or preview).
#[derive(Debug, Clone, PartialEq)]
pub enum RequestState<T> {
    Idle,
    Pending,
    Succeeded(T),
    Failed(ClientError),
}

impl<T> Default for RequestState<T> {
    fn default() -> Self {
        Self::Idle
    }
}

impl<T> RequestState<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded(_) | Self::Failed(_))
    }

    pub fn succeeded(&self) -> Option<&T> {
        match self {
            Self::Succeeded(v) => Some(v),
            _ => None,
        }
    }

    /// User-facing message of a `Failed` state.
    pub fn failure_message(&self) -> Option<String> {
        match self {
            Self::Failed(e) => Some(e.message()),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Pending => "pending",
            Self::Succeeded(_) => "succeeded",
            Self::Failed(_) => "failed",
        }
    }
}

pub type AnalysisState = RequestState<AnalysisResult>;
pub type PreviewState = RequestState<PreviewResult>;
