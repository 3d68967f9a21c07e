// tests/controller_submit.rs
//
// Lifecycle of the analysis controller against a scripted classifier:
// validation, single-flight joining, failure handling and re-arming.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{verdict, ScriptedClassifier};
use factlens::notify::RecordingNotifier;
use factlens::{
    AnalysisController, AnalysisState, Classification, ClientError, DynClassifier, HistoryStore,
    InputKind, NoticeLevel, NotifierMux,
};

fn build(api: &Arc<ScriptedClassifier>) -> (AnalysisController, Arc<RecordingNotifier>) {
    let rec = Arc::new(RecordingNotifier::new());
    let dyn_api: DynClassifier = api.clone();
    let c = AnalysisController::new(
        dyn_api,
        Arc::new(HistoryStore::default()),
        NotifierMux::new().with(rec.clone()),
    );
    (c, rec)
}

#[tokio::test(start_paused = true)]
async fn whitespace_submission_never_reaches_the_network() {
    let api = ScriptedClassifier::new();
    let (c, rec) = build(&api);

    for blank in ["", "   ", "\n\t  \r\n"] {
        let err = c
            .submit_text(blank, InputKind::Headline, false)
            .await
            .expect_err("blank input must be rejected");
        assert!(matches!(err, ClientError::Validation(_)));
        assert_eq!(c.state(), AnalysisState::Idle, "state must stay Idle");
    }

    assert_eq!(api.analyze_count(), 0);
    assert_eq!(rec.count(NoticeLevel::Validation), 3);
    assert_eq!(rec.len(), 3);
    assert!(c.history().is_empty());
}

#[tokio::test(start_paused = true)]
async fn double_submit_while_pending_issues_one_request() {
    let api = ScriptedClassifier::new();
    api.analyze_latency(Duration::from_millis(500));
    let (c, rec) = build(&api);

    let (a, b) = tokio::join!(
        c.submit_text("Scientists find water on Mars", InputKind::Headline, false),
        c.submit_text("Scientists find water on Mars", InputKind::Headline, false),
    );

    let a = a.expect("first submit succeeds");
    let b = b.expect("joined submit resolves to the same outcome");
    assert_eq!(a, b);
    assert_eq!(api.analyze_count(), 1, "exactly one network call");
    assert_eq!(rec.count(NoticeLevel::Success), 1, "exactly one terminal notice");
    assert_eq!(c.history().len(), 1, "exactly one history entry");
}

#[tokio::test(start_paused = true)]
async fn pending_is_observable_and_emits_no_notice() {
    let api = ScriptedClassifier::new();
    api.analyze_latency(Duration::from_millis(1_000));
    let (c, rec) = build(&api);
    let c = Arc::new(c);

    let mut rx = c.subscribe();
    let task = {
        let c = Arc::clone(&c);
        tokio::spawn(async move { c.submit_text("Some headline", InputKind::Headline, false).await })
    };

    rx.changed().await.unwrap();
    assert!(rx.borrow_and_update().is_pending());
    assert!(c.is_pending());
    assert!(rec.is_empty(), "Idle -> Pending emits nothing");

    let out = task.await.unwrap().unwrap();
    assert_eq!(c.state(), AnalysisState::Succeeded(out));
    assert_eq!(rec.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn failure_keeps_history_and_rearms() {
    let api = ScriptedClassifier::new();
    api.reply_analyze(Err(ClientError::Request {
        status: 500,
        message: "Error loading text classification model".into(),
    }));
    let (c, rec) = build(&api);

    let err = c
        .submit_text("Aliens built the pyramids", InputKind::Headline, true)
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert_eq!(
        c.state().failure_message().as_deref(),
        Some("Error loading text classification model")
    );
    assert!(c.history().is_empty());
    assert_eq!(rec.count(NoticeLevel::Error), 1);

    // Manual retry is just another submit.
    api.reply_analyze(Ok(verdict(Classification::Fake, 99.0)));
    let ok = c
        .submit_text("Aliens built the pyramids", InputKind::Headline, true)
        .await
        .unwrap();
    assert_eq!(ok.classification, Classification::Fake);
    assert_eq!(c.history().len(), 1);
    assert_eq!(rec.count(NoticeLevel::Success), 1);
    assert_eq!(api.analyze_count(), 2);
    assert!(api.analyze_calls.lock().iter().all(|r| r.advanced));
}

#[tokio::test(start_paused = true)]
async fn history_follows_completion_order_newest_first() {
    let api = ScriptedClassifier::new();
    let (c, _rec) = build(&api);

    for text in ["one", "two", "three"] {
        c.submit_text(text, InputKind::Article, false).await.unwrap();
    }
    let contents: Vec<_> = c.history().all().into_iter().map(|r| r.content).collect();
    assert_eq!(contents, vec!["three", "two", "one"]);
}

#[tokio::test(start_paused = true)]
async fn dropped_submit_does_not_wedge_the_controller() {
    let api = ScriptedClassifier::new();
    api.analyze_latency(Duration::from_secs(10));
    let (c, rec) = build(&api);

    let timed_out = tokio::time::timeout(
        Duration::from_millis(100),
        c.submit_text("slow one", InputKind::Headline, false),
    )
    .await;
    assert!(timed_out.is_err());
    assert_eq!(c.state(), AnalysisState::Idle);
    assert!(rec.is_empty());

    api.analyze_latency(Duration::from_millis(10));
    assert!(c.submit_text("next one", InputKind::Headline, false).await.is_ok());
}
