// tests/common/mod.rs
//
// Scriptable in-process classifier shared by the integration tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use factlens::api::{ApiFuture, ClassifierApi, Verdict};
use factlens::{AnalysisRequest, Classification, ClientError, PreviewResult};

pub fn verdict(classification: Classification, confidence: f64) -> Verdict {
    Verdict {
        classification,
        confidence_score: confidence,
        country_of_origin: "US".to_string(),
        is_verified: true,
        explanation: None,
        source_metadata: None,
    }
}

pub fn titled(title: &str) -> PreviewResult {
    PreviewResult {
        title: Some(title.to_string()),
        ..PreviewResult::default()
    }
}

/// Records every call; responses and latencies are set by the test.
pub struct ScriptedClassifier {
    analyze_reply: Mutex<Result<Verdict, ClientError>>,
    analyze_delay: Mutex<Duration>,
    previews: Mutex<HashMap<String, (Duration, Result<PreviewResult, ClientError>)>>,
    pub analyze_calls: Mutex<Vec<AnalysisRequest>>,
    pub preview_calls: Mutex<Vec<String>>,
}

impl ScriptedClassifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            analyze_reply: Mutex::new(Ok(verdict(Classification::True, 92.0))),
            analyze_delay: Mutex::new(Duration::from_millis(100)),
            previews: Mutex::new(HashMap::new()),
            analyze_calls: Mutex::new(Vec::new()),
            preview_calls: Mutex::new(Vec::new()),
        })
    }

    pub fn reply_analyze(&self, reply: Result<Verdict, ClientError>) {
        *self.analyze_reply.lock() = reply;
    }

    pub fn analyze_latency(&self, d: Duration) {
        *self.analyze_delay.lock() = d;
    }

    pub fn reply_preview(
        &self,
        url: &str,
        latency: Duration,
        reply: Result<PreviewResult, ClientError>,
    ) {
        self.previews.lock().insert(url.to_string(), (latency, reply));
    }

    pub fn analyze_count(&self) -> usize {
        self.analyze_calls.lock().len()
    }

    pub fn preview_urls(&self) -> Vec<String> {
        self.preview_calls.lock().clone()
    }
}

impl ClassifierApi for ScriptedClassifier {
    fn analyze<'a>(&'a self, request: &'a AnalysisRequest) -> ApiFuture<'a, Verdict> {
        self.analyze_calls.lock().push(request.clone());
        let delay = *self.analyze_delay.lock();
        let reply = self.analyze_reply.lock().clone();
        Box::pin(async move {
            tokio::time::sleep(delay).await;
            reply
        })
    }

    fn preview<'a>(&'a self, url: &'a str) -> ApiFuture<'a, PreviewResult> {
        self.preview_calls.lock().push(url.to_string());
        let (delay, reply) = self
            .previews
            .lock()
            .get(url)
            .cloned()
            .unwrap_or((Duration::from_millis(50), Ok(PreviewResult::default())));
        Box::pin(async move {
            tokio::time::sleep(delay).await;
            reply
        })
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}
