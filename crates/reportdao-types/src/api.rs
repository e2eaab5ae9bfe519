use serde::{Deserialize, Serialize};

use crate::models::{EncodedImage, Report, SeverityScore, VerificationRequest};

// -- Submit content --

/// Body of the "submit content" exchange. `proof_image` is always present,
/// serialized as `null` when no evidence was attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitContentRequest {
    pub proof_text: String,
    pub proof_image: Option<EncodedImage>,
}

impl From<&Report> for SubmitContentRequest {
    fn from(report: &Report) -> Self {
        Self {
            proof_text: report.narrative(),
            proof_image: report.evidence.clone(),
        }
    }
}

/// Acknowledgment body. Its shape belongs to the scoring service and is
/// passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmitAck(pub serde_json::Value);

// -- Verify content --

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifyContentRequest {
    pub submitted_text: String,
    pub verification_text: String,
    pub submitted_image_base64: Option<EncodedImage>,
    pub verification_image_base64: Option<EncodedImage>,
}

impl From<&VerificationRequest> for VerifyContentRequest {
    fn from(req: &VerificationRequest) -> Self {
        Self {
            submitted_text: req.referenced_report_text.clone(),
            verification_text: req.verifier_narrative(),
            submitted_image_base64: req.referenced_report_evidence.clone(),
            verification_image_base64: req.verifier_evidence.clone(),
        }
    }
}

/// Only `reason_severity_score` is interpreted; anything else the service
/// returns is kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifyContentResponse {
    pub reason_severity_score: SeverityScore,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
