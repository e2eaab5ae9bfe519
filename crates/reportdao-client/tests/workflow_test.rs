//! End-to-end report and verification flows against an in-process mock of
//! the scoring service.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use serde_json::{Value, json};

use reportdao_client::{
    AppContext, AppContextInner, ClientConfig, EvidenceFile, NoticeBoard, ReportForm, Verdict,
    VerifyView,
};
use reportdao_types::events::NoticeKind;
use reportdao_types::models::{EncodedImage, ReportReference, TallyState};

#[derive(Clone)]
struct Reply {
    status: StatusCode,
    body: String,
}

impl Reply {
    fn ok(body: Value) -> Self {
        Self {
            status: StatusCode::OK,
            body: body.to_string(),
        }
    }

    fn raw(status: StatusCode, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
        }
    }
}

#[derive(Clone)]
struct MockState {
    submit: Reply,
    verify: Reply,
    received: Arc<Mutex<Vec<(&'static str, Value)>>>,
}

impl MockState {
    fn received(&self) -> Vec<(&'static str, Value)> {
        self.received.lock().unwrap().clone()
    }
}

async fn submit_content(State(state): State<MockState>, Json(body): Json<Value>) -> (StatusCode, String) {
    state.received.lock().unwrap().push(("submit", body));
    (state.submit.status, state.submit.body.clone())
}

async fn verify_content(State(state): State<MockState>, Json(body): Json<Value>) -> (StatusCode, String) {
    state.received.lock().unwrap().push(("verify", body));
    (state.verify.status, state.verify.body.clone())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reportdao_client=debug".into()),
        )
        .with_test_writer()
        .try_init();
}

async fn spawn_mock(submit: Reply, verify: Reply) -> (SocketAddr, MockState) {
    init_tracing();

    let state = MockState {
        submit,
        verify,
        received: Arc::new(Mutex::new(Vec::new())),
    };
    let app = Router::new()
        .route("/submit-content", post(submit_content))
        .route("/verify-content", post(verify_content))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, state)
}

fn context(addr: SocketAddr) -> (AppContext, NoticeBoard) {
    let board = NoticeBoard::new();
    let ctx = AppContextInner::new(
        ClientConfig::new(format!("http://{}", addr)),
        Arc::new(board.clone()),
    )
    .unwrap();
    (ctx, board)
}

fn messages(board: &NoticeBoard) -> Vec<(NoticeKind, String)> {
    board
        .snapshot()
        .into_iter()
        .map(|n| (n.kind, n.message))
        .collect()
}

fn reference() -> ReportReference {
    ReportReference {
        text: "Broken streetlight: Corner of 5th and Main".into(),
        evidence: Some(EncodedImage::encode("image/png", b"original photo")),
    }
}

#[tokio::test]
async fn rejected_report_without_evidence() {
    let (addr, mock) = spawn_mock(
        Reply::raw(StatusCode::INTERNAL_SERVER_ERROR, "scoring unavailable"),
        Reply::ok(json!({})),
    )
    .await;
    let (ctx, board) = context(addr);

    let mut form = ReportForm::new(ctx);
    form.set_title("T");
    form.set_description("D");
    assert!(form.submit().await.is_none());

    let received = mock.received();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].1, json!({ "proof_text": "T: D", "proof_image": null }));

    assert_eq!(
        messages(&board),
        vec![(NoticeKind::Error, "Failed to submit the report".to_string())]
    );

    // Nothing is cleared, so the user can retry as is.
    assert_eq!(form.title(), "T");
    assert_eq!(form.description(), "D");
}

#[tokio::test]
async fn report_waits_for_evidence_before_sending() {
    let ack = json!({ "isMatching": true, "score": 91 });
    let (addr, mock) = spawn_mock(Reply::ok(ack.clone()), Reply::ok(json!({}))).await;
    let (ctx, board) = context(addr);

    let mut form = ReportForm::new(ctx);
    form.set_title("Illegal dumping");
    form.set_description("Behind the market");
    assert!(form.attach(EvidenceFile::from_bytes("dump.png", "image/png", b"pixels".to_vec())));

    // Submitted straight after attaching; the encode has not landed yet.
    let got = form.submit().await.expect("acknowledged");
    assert_eq!(got.0, ack);

    let body = &mock.received()[0].1;
    assert_eq!(body["proof_text"], "Illegal dumping: Behind the market");
    let image = EncodedImage::parse(body["proof_image"].as_str().unwrap()).unwrap();
    assert_eq!(image.mime_type(), "image/png");
    assert_eq!(image.decode().unwrap(), b"pixels");

    assert_eq!(
        messages(&board),
        vec![(NoticeKind::Success, "Report submitted successfully".to_string())]
    );
}

#[tokio::test]
async fn unparseable_ack_is_a_generic_failure() {
    let (addr, _mock) = spawn_mock(
        Reply::raw(StatusCode::OK, "<html>ok</html>"),
        Reply::ok(json!({})),
    )
    .await;
    let (ctx, board) = context(addr);

    let form = ReportForm::new(ctx);
    assert!(form.submit().await.is_none());
    assert_eq!(
        messages(&board),
        vec![(
            NoticeKind::Error,
            "An error occurred while submitting the report".to_string()
        )]
    );
}

#[tokio::test]
async fn unreachable_service_is_a_generic_failure() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let (ctx, board) = context(addr);

    let mut view = VerifyView::new(ctx, reference());
    assert!(view.submit().await.is_none());
    assert_eq!(view.tally(), TallyState::default());
    assert_eq!(
        messages(&board),
        vec![(
            NoticeKind::Error,
            "An error occurred while submitting the verification".to_string()
        )]
    );
}

#[tokio::test]
async fn high_score_upvotes() {
    let (addr, mock) = spawn_mock(
        Reply::ok(json!({})),
        Reply::ok(json!({ "reason_severity_score": 85, "reason": "same location" })),
    )
    .await;
    let (ctx, board) = context(addr);

    let mut view = VerifyView::new(ctx, reference());
    view.set_title("Still broken");
    view.set_description("Checked tonight");
    view.attach(EvidenceFile::from_bytes("night.jpg", "image/jpeg", b"dark".to_vec()));

    assert_eq!(view.submit().await, Some(Verdict::Corroborating));
    assert_eq!(
        view.tally(),
        TallyState {
            corroborating_count: 1,
            refuting_count: 0
        }
    );
    assert_eq!(
        messages(&board),
        vec![
            (NoticeKind::Success, "Upvoted successfully".to_string()),
            (NoticeKind::Success, "Verification submitted successfully".to_string()),
        ]
    );

    let body = &mock.received()[0].1;
    assert_eq!(body["submitted_text"], "Broken streetlight: Corner of 5th and Main");
    assert_eq!(body["verification_text"], "Still broken: Checked tonight");
    assert_eq!(
        body["submitted_image_base64"],
        reference().evidence.unwrap().as_str()
    );
    assert!(
        body["verification_image_base64"]
            .as_str()
            .unwrap()
            .starts_with("data:image/jpeg;base64,")
    );
}

#[tokio::test]
async fn threshold_score_downvotes() {
    let (addr, _mock) = spawn_mock(
        Reply::ok(json!({})),
        Reply::ok(json!({ "reason_severity_score": 70 })),
    )
    .await;
    let (ctx, board) = context(addr);

    let mut view = VerifyView::new(ctx, reference());
    assert_eq!(view.submit().await, Some(Verdict::Refuting));
    assert_eq!(
        view.tally(),
        TallyState {
            corroborating_count: 0,
            refuting_count: 1
        }
    );
    assert_eq!(board.snapshot()[0].message, "Downvoted successfully");
}

#[tokio::test]
async fn missing_score_leaves_tally_alone() {
    let (addr, _mock) = spawn_mock(
        Reply::ok(json!({})),
        Reply::ok(json!({ "reason": "no score today" })),
    )
    .await;
    let (ctx, board) = context(addr);

    let mut view = VerifyView::new(ctx, reference());
    assert!(view.submit().await.is_none());
    assert_eq!(view.tally(), TallyState::default());
    assert_eq!(
        messages(&board),
        vec![(
            NoticeKind::Error,
            "An error occurred while submitting the verification".to_string()
        )]
    );
}

#[tokio::test]
async fn rejected_verification_is_reported() {
    let (addr, _mock) = spawn_mock(
        Reply::ok(json!({})),
        Reply::raw(StatusCode::BAD_REQUEST, "bad image"),
    )
    .await;
    let (ctx, board) = context(addr);

    let mut view = VerifyView::new(ctx, reference());
    assert!(view.submit().await.is_none());
    assert_eq!(
        messages(&board),
        vec![(NoticeKind::Error, "Failed to submit the verification".to_string())]
    );
}

#[tokio::test]
async fn retried_attempt_counts_once() {
    let (addr, mock) = spawn_mock(
        Reply::ok(json!({})),
        Reply::ok(json!({ "reason_severity_score": 99.5 })),
    )
    .await;
    let (ctx, _board) = context(addr);

    let mut view = VerifyView::new(ctx, reference());
    let attempt = view.prepare().await;
    view.submit_request(&attempt).await;
    view.submit_request(&attempt).await;
    assert_eq!(mock.received().len(), 2);
    assert_eq!(view.tally().corroborating_count, 1);

    // A fresh attempt is a new vote.
    view.submit().await;
    assert_eq!(view.tally().corroborating_count, 2);
    assert_eq!(view.tally().refuting_count, 0);
}

#[tokio::test]
async fn remounted_view_starts_from_zero() {
    let (addr, _mock) = spawn_mock(
        Reply::ok(json!({})),
        Reply::ok(json!({ "reason_severity_score": 10 })),
    )
    .await;
    let (ctx, _board) = context(addr);

    let mut view = VerifyView::new(ctx.clone(), reference());
    view.submit().await;
    assert_eq!(view.tally().refuting_count, 1);
    drop(view);

    let view = VerifyView::new(ctx, reference());
    assert_eq!(view.tally(), TallyState::default());
}
