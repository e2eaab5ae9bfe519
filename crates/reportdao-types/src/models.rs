use std::fmt;

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Self-describing image payload: `data:<mime>;base64,<payload>`.
/// Safe to embed directly in a JSON string field.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EncodedImage(String);

impl EncodedImage {
    /// Encode raw image bytes under the given MIME type.
    pub fn encode(mime_type: &str, bytes: &[u8]) -> Self {
        Self(format!("data:{};base64,{}", mime_type, BASE64.encode(bytes)))
    }

    /// Accept an already-encoded data URL. Returns `None` if the value is not
    /// a base64 data URL.
    pub fn parse(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        let (header, _) = value.strip_prefix("data:")?.split_once(',')?;
        header.strip_suffix(";base64")?;
        Some(Self(value))
    }

    /// MIME type embedded in the header, e.g. `image/png`.
    pub fn mime_type(&self) -> &str {
        self.0
            .strip_prefix("data:")
            .and_then(|rest| rest.split_once(';'))
            .map(|(mime, _)| mime)
            .unwrap_or_default()
    }

    /// Decode back into raw bytes.
    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        let payload = self.0.split_once(',').map(|(_, p)| p).unwrap_or_default();
        BASE64.decode(payload)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// Payloads are large; keep logs readable.
impl fmt::Debug for EncodedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EncodedImage({}, {} chars)", self.mime_type(), self.0.len())
    }
}

/// Joins a title and description into the single narrative text field
/// sent upstream.
pub fn narrative(title: &str, description: &str) -> String {
    format!("{}: {}", title, description)
}

/// A user's claim of wrongdoing. Immutable once sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub title: String,
    pub description: String,
    pub evidence: Option<EncodedImage>,
}

impl Report {
    pub fn narrative(&self) -> String {
        narrative(&self.title, &self.description)
    }
}

/// What a verification carries over from the report being verified.
/// A copy, not a link: the original is never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportReference {
    pub text: String,
    pub evidence: Option<EncodedImage>,
}

impl From<&Report> for ReportReference {
    fn from(report: &Report) -> Self {
        Self {
            text: report.narrative(),
            evidence: report.evidence.clone(),
        }
    }
}

/// One verification attempt. `id` correlates the attempt with its tally entry
/// so that a retried exchange is never counted twice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationRequest {
    pub id: Uuid,
    pub referenced_report_text: String,
    pub referenced_report_evidence: Option<EncodedImage>,
    pub verifier_title: String,
    pub verifier_description: String,
    pub verifier_evidence: Option<EncodedImage>,
}

impl VerificationRequest {
    pub fn new(
        reference: &ReportReference,
        verifier_title: impl Into<String>,
        verifier_description: impl Into<String>,
        verifier_evidence: Option<EncodedImage>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            referenced_report_text: reference.text.clone(),
            referenced_report_evidence: reference.evidence.clone(),
            verifier_title: verifier_title.into(),
            verifier_description: verifier_description.into(),
            verifier_evidence,
        }
    }

    pub fn verifier_narrative(&self) -> String {
        narrative(&self.verifier_title, &self.verifier_description)
    }
}

/// Credibility signal computed by the external scoring service.
/// Opaque here: only compared against a threshold.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeverityScore(pub f64);

impl SeverityScore {
    pub fn value(self) -> f64 {
        self.0
    }
}

impl From<f64> for SeverityScore {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

impl fmt::Display for SeverityScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Corroborating/refuting counters for one verification view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TallyState {
    pub corroborating_count: u64,
    pub refuting_count: u64,
}
