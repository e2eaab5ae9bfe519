//! Verification submission: evidence against an existing report, scored
//! upstream and tallied here.

use tracing::{debug, error, info};

use reportdao_types::api::VerifyContentRequest;
use reportdao_types::models::{ReportReference, SeverityScore, TallyState, VerificationRequest};

use crate::api::ContentApi;
use crate::context::AppContext;
use crate::error::{Error, Result};
use crate::evidence::{EvidenceFile, EvidenceSlot};
use crate::notify::Notifier;
use crate::tally::{Tally, Verdict, classify};

const MSG_SUBMITTED: &str = "Verification submitted successfully";
const MSG_REJECTED: &str = "Failed to submit the verification";
const MSG_FAILED: &str = "An error occurred while submitting the verification";

/// POST the verification and return the score the service assigned.
pub async fn submit_verification(
    api: &ContentApi,
    request: &VerificationRequest,
) -> Result<SeverityScore> {
    let resp = api
        .verify_content(&VerifyContentRequest::from(request))
        .await?;
    Ok(resp.reason_severity_score)
}

/// State behind the "submit verification" view. The tally lives and dies
/// with the view.
pub struct VerifyView {
    ctx: AppContext,
    reference: ReportReference,
    title: String,
    description: String,
    evidence: EvidenceSlot,
    tally: Tally,
}

impl VerifyView {
    pub fn new(ctx: AppContext, reference: ReportReference) -> Self {
        let evidence = EvidenceSlot::new(ctx.notifier.clone());
        Self {
            ctx,
            reference,
            title: String::new(),
            description: String::new(),
            evidence,
            tally: Tally::new(),
        }
    }

    pub fn reference(&self) -> &ReportReference {
        &self.reference
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn attach(&self, file: EvidenceFile) -> bool {
        self.evidence.attach(file)
    }

    pub fn evidence(&self) -> &EvidenceSlot {
        &self.evidence
    }

    pub fn tally(&self) -> TallyState {
        self.tally.state()
    }

    /// A new attempt with its own correlation id.
    pub async fn prepare(&self) -> VerificationRequest {
        let evidence = self.evidence.settled().await;
        VerificationRequest::new(&self.reference, &self.title, &self.description, evidence)
    }

    /// Prepare and submit a fresh attempt.
    pub async fn submit(&mut self) -> Option<Verdict> {
        let request = self.prepare().await;
        self.submit_request(&request).await
    }

    /// Run the exchange for `request` and tally the result. Submitting the
    /// same request again reaches the service again but is never counted
    /// twice.
    pub async fn submit_request(&mut self, request: &VerificationRequest) -> Option<Verdict> {
        let score = match submit_verification(&self.ctx.api, request).await {
            Ok(score) => score,
            Err(e) => {
                error!(exchange_id = %request.id, "verification failed: {}", e);
                self.ctx.notifier.error(failure_message(&e));
                return None;
            }
        };

        let verdict = classify(score);
        if self.tally.record(request.id, verdict) {
            info!(exchange_id = %request.id, %score, ?verdict, "verification tallied");
            self.ctx.notifier.success(verdict.notice_message());
        } else {
            debug!(exchange_id = %request.id, "exchange already tallied");
        }
        self.ctx.notifier.success(MSG_SUBMITTED);
        Some(verdict)
    }
}

fn failure_message(err: &Error) -> &'static str {
    match err {
        Error::SubmissionRejected { .. } => MSG_REJECTED,
        _ => MSG_FAILED,
    }
}
