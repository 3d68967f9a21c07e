//! Classification service client: provider seam + HTTP implementation + offline mock.
//!
//! The controller and the preview fetcher only see `DynClassifier`; tests and the
//! offline mode plug in their own implementation.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::model::{AnalysisRequest, Classification, InputKind, PreviewResult, SourceMetadata};

pub const ANALYZE_PATH: &str = "/api/analyze";
pub const PREVIEW_PATH: &str = "/api/preview-url";

pub type ApiFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, ClientError>> + Send + 'a>>;

/// Verdict as the service reports it, before the client stamps `content`/`timestamp`.
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    pub classification: Classification,
    pub confidence_score: f64,
    pub country_of_origin: String,
    pub is_verified: bool,
    pub explanation: Option<String>,
    pub source_metadata: Option<SourceMetadata>,
}

/// Remote classification service.
pub trait ClassifierApi: Send + Sync + 'static {
    fn analyze<'a>(&'a self, request: &'a AnalysisRequest) -> ApiFuture<'a, Verdict>;
    fn preview<'a>(&'a self, url: &'a str) -> ApiFuture<'a, PreviewResult>;
    /// Provider name for diagnostics.
    fn name(&self) -> &'static str;
}

pub type DynClassifier = Arc<dyn ClassifierApi>;

/// Build the client according to config and environment.
///
/// * `FACTLENS_TEST_MODE=mock` returns a deterministic offline classifier.
/// * Otherwise an HTTP client pointed at `config.base_url`.
pub fn build_classifier(config: &ClientConfig) -> anyhow::Result<DynClassifier> {
    if std::env::var("FACTLENS_TEST_MODE")
        .map(|v| v == "mock")
        .unwrap_or(false)
    {
        tracing::info!("classifier: offline mock mode");
        return Ok(Arc::new(StaticClassifier::default()));
    }
    let http = HttpClassifier::new(config)?;
    tracing::info!(base_url = %http.base_url, "classifier: http");
    Ok(Arc::new(http))
}

// ------------------------------------------------------------
// Wire shapes
// ------------------------------------------------------------

#[derive(Debug, Serialize)]
struct AnalyzeBody<'a> {
    content: &'a str,
    advanced_analysis: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<&'a str>,
}

impl<'a> AnalyzeBody<'a> {
    fn from_request(r: &'a AnalysisRequest) -> Self {
        Self {
            content: &r.content,
            advanced_analysis: r.advanced,
            url: (r.kind == InputKind::Url).then_some(r.content.as_str()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct AnalyzeWire {
    classification: String,
    confidence_score: f64,
    #[serde(default)]
    country_of_origin: Option<String>,
    #[serde(default)]
    is_verified: bool,
    #[serde(default)]
    explanation: Option<String>,
    #[serde(default)]
    source_metadata: Option<SourceMetadata>,
}

impl From<AnalyzeWire> for Verdict {
    fn from(w: AnalyzeWire) -> Self {
        let confidence = if w.confidence_score.is_finite() {
            w.confidence_score.clamp(0.0, 100.0)
        } else {
            0.0
        };
        Verdict {
            classification: Classification::from_label(&w.classification),
            confidence_score: confidence,
            country_of_origin: non_empty(w.country_of_origin).unwrap_or_else(|| "Unknown".to_string()),
            is_verified: w.is_verified,
            explanation: non_empty(w.explanation),
            source_metadata: w.source_metadata.map(clean_metadata).filter(|m| !m.is_empty()),
        }
    }
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn clean_metadata(m: SourceMetadata) -> SourceMetadata {
    SourceMetadata {
        name: non_empty(m.name),
        date: non_empty(m.date),
        author: non_empty(m.author),
        domain: non_empty(m.domain),
    }
}

/// Empty strings from the service mean "not available".
pub fn clean_preview(p: PreviewResult) -> PreviewResult {
    PreviewResult {
        title: non_empty(p.title),
        description: non_empty(p.description),
        image: non_empty(p.image),
        author: non_empty(p.author),
        domain: non_empty(p.domain),
        date: non_empty(p.date),
    }
}

/// Pull a human message out of an error body.
///
/// `{"detail": "..."}` is the common case; validation failures send
/// `{"detail": [{"msg": "..."}, ...]}`.
pub fn detail_message(body: &str) -> Option<String> {
    let v: Value = serde_json::from_str(body).ok()?;
    match v.get("detail")? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Array(items) => items
            .iter()
            .filter_map(|it| it.get("msg").and_then(Value::as_str))
            .map(str::to_string)
            .next(),
        _ => None,
    }
}

// ------------------------------------------------------------
// HTTP implementation
// ------------------------------------------------------------

pub struct HttpClassifier {
    http: reqwest::Client,
    base_url: String,
}

impl HttpClassifier {
    pub fn new(config: &ClientConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("factlens/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn read<T>(resp: reqwest::Response) -> Result<T, ClientError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            let message = detail_message(&body).unwrap_or_else(|| {
                format!(
                    "Request failed with status {} {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("")
                )
                .trim_end()
                .to_string()
            });
            return Err(ClientError::Request {
                status: status.as_u16(),
                message,
            });
        }
        Ok(serde_json::from_str(&body)?)
    }
}

impl ClassifierApi for HttpClassifier {
    fn analyze<'a>(&'a self, request: &'a AnalysisRequest) -> ApiFuture<'a, Verdict> {
        Box::pin(async move {
            let resp = self
                .http
                .post(format!("{}{}", self.base_url, ANALYZE_PATH))
                .json(&AnalyzeBody::from_request(request))
                .send()
                .await?;
            let wire: AnalyzeWire = Self::read(resp).await?;
            Ok(wire.into())
        })
    }

    fn preview<'a>(&'a self, url: &'a str) -> ApiFuture<'a, PreviewResult> {
        Box::pin(async move {
            let resp = self
                .http
                .get(format!("{}{}", self.base_url, PREVIEW_PATH))
                .query(&[("url", url)])
                .send()
                .await?;
            let wire: PreviewResult = Self::read(resp).await?;
            Ok(clean_preview(wire))
        })
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

// ------------------------------------------------------------
// Offline mock
// ------------------------------------------------------------

/// Deterministic classifier for local runs without a service.
#[derive(Clone)]
pub struct StaticClassifier {
    pub verdict: Verdict,
    pub preview: PreviewResult,
}

impl Default for StaticClassifier {
    fn default() -> Self {
        Self {
            verdict: Verdict {
                classification: Classification::Unverified,
                confidence_score: 50.0,
                country_of_origin: "Unknown".to_string(),
                is_verified: false,
                explanation: Some("Offline mode (mock)".to_string()),
                source_metadata: None,
            },
            preview: PreviewResult {
                title: Some("Preview unavailable offline".to_string()),
                ..PreviewResult::default()
            },
        }
    }
}

impl ClassifierApi for StaticClassifier {
    fn analyze<'a>(&'a self, _request: &'a AnalysisRequest) -> ApiFuture<'a, Verdict> {
        let out = self.verdict.clone();
        Box::pin(async move { Ok(out) })
    }

    fn preview<'a>(&'a self, url: &'a str) -> ApiFuture<'a, PreviewResult> {
        let mut out = self.preview.clone();
        if out.domain.is_none() {
            out.domain = domain_of(url);
        }
        Box::pin(async move { Ok(out) })
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

/// Host part of a URL-ish string, lowercased. Input without a scheme is read as
/// `http://`.
pub fn domain_of(url: &str) -> Option<String> {
    let url = url.trim();
    let host = |u: reqwest::Url| u.host_str().map(str::to_ascii_lowercase);
    reqwest::Url::parse(url)
        .ok()
        .and_then(host)
        .or_else(|| reqwest::Url::parse(&format!("http://{url}")).ok().and_then(host))
}
