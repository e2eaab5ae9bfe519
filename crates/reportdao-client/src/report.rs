//! Report submission: the create-report form and its one exchange.

use tracing::{error, info};

use reportdao_types::api::{SubmitAck, SubmitContentRequest};
use reportdao_types::models::Report;

use crate::api::ContentApi;
use crate::context::AppContext;
use crate::error::{Error, Result};
use crate::evidence::{EvidenceFile, EvidenceSlot};
use crate::notify::Notifier;

const MSG_SUBMITTED: &str = "Report submitted successfully";
const MSG_REJECTED: &str = "Failed to submit the report";
const MSG_FAILED: &str = "An error occurred while submitting the report";

/// POST the report to the "submit content" endpoint.
pub async fn submit_report(api: &ContentApi, report: &Report) -> Result<SubmitAck> {
    api.submit_content(&SubmitContentRequest::from(report)).await
}

/// State behind the "create a new report" view. Title and description are
/// free text; nothing is cleared after a submit so a failed one can be retried.
pub struct ReportForm {
    ctx: AppContext,
    title: String,
    description: String,
    evidence: EvidenceSlot,
}

impl ReportForm {
    pub fn new(ctx: AppContext) -> Self {
        let evidence = EvidenceSlot::new(ctx.notifier.clone());
        Self {
            ctx,
            title: String::new(),
            description: String::new(),
            evidence,
        }
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Both "attach" buttons land here; there is only one slot.
    pub fn attach(&self, file: EvidenceFile) -> bool {
        self.evidence.attach(file)
    }

    pub fn evidence(&self) -> &EvidenceSlot {
        &self.evidence
    }

    /// The report as it would be sent now, once any capture has landed.
    pub async fn to_report(&self) -> Report {
        Report {
            title: self.title.clone(),
            description: self.description.clone(),
            evidence: self.evidence.settled().await,
        }
    }

    /// Submit and tell the user how it went. Errors stop here.
    pub async fn submit(&self) -> Option<SubmitAck> {
        let report = self.to_report().await;

        match submit_report(&self.ctx.api, &report).await {
            Ok(ack) => {
                info!("report acknowledged: {}", ack.0);
                self.ctx.notifier.success(MSG_SUBMITTED);
                Some(ack)
            }
            Err(e) => {
                error!("report submission failed: {}", e);
                self.ctx.notifier.error(failure_message(&e));
                None
            }
        }
    }
}

fn failure_message(err: &Error) -> &'static str {
    match err {
        Error::SubmissionRejected { .. } => MSG_REJECTED,
        _ => MSG_FAILED,
    }
}
