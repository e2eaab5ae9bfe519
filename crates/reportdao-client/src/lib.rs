//! ReportDAO client core.
//!
//! Users file reports of civic wrongdoing with optional photo evidence; other
//! users submit verification evidence against a report. An external scoring
//! service returns a severity score for each verification, and scores above
//! the threshold upvote the report while the rest downvote it.
//!
//! - `evidence`: validate and encode a picked image into a form's single slot
//! - `report` / `verify`: the two submission flows and their view state
//! - `tally`: score classification and per-view counts
//! - `notify`: non-blocking user feedback
//! - `context`: the handles every view is built with

pub mod api;
pub mod config;
pub mod context;
pub mod error;
pub mod evidence;
pub mod notify;
pub mod report;
pub mod tally;
pub mod verify;

pub use api::ContentApi;
pub use config::ClientConfig;
pub use context::{AppContext, AppContextInner};
pub use error::{Error, Result};
pub use evidence::{EvidenceFile, EvidenceSlot, MAX_EVIDENCE_BYTES};
pub use notify::{NoticeBoard, Notifier, Notifiers, NullNotifier, TracingNotifier};
pub use report::{ReportForm, submit_report};
pub use tally::{CORROBORATION_THRESHOLD, Tally, Verdict, classify};
pub use verify::{VerifyView, submit_verification};
