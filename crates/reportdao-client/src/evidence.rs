//! Evidence capture: validate a user-picked image, encode it as a data URL,
//! and publish it into the form's single attachment slot.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::watch;
use tracing::{debug, warn};

use reportdao_types::models::EncodedImage;

use crate::error::{Error, Result};
use crate::notify::Notifier;

/// 2 MiB upload limit for evidence images.
pub const MAX_EVIDENCE_BYTES: u64 = 2 * 1024 * 1024;

const MSG_NOT_AN_IMAGE: &str = "Please upload an image file";
const MSG_TOO_LARGE: &str = "Please upload an image file under 2MB";
const MSG_UNREADABLE: &str = "Could not read the selected image";

/// A file the user picked. The declared MIME type is trusted as given.
#[derive(Debug, Clone)]
pub struct EvidenceFile {
    name: String,
    mime_type: String,
    size: u64,
    source: Source,
}

#[derive(Debug, Clone)]
enum Source {
    Path(PathBuf),
    Memory(Bytes),
}

impl EvidenceFile {
    pub fn from_bytes(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        let bytes = bytes.into();
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            size: bytes.len() as u64,
            source: Source::Memory(bytes),
        }
    }

    /// Size comes from file metadata; contents are read only when encoding.
    pub async fn from_path(path: impl AsRef<Path>, mime_type: impl Into<String>) -> Result<Self> {
        let path = path.as_ref();
        let size = tokio::fs::metadata(path).await?.len();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self {
            name,
            mime_type: mime_type.into(),
            size,
            source: Source::Path(path.to_path_buf()),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    async fn read(&self) -> Result<Bytes> {
        match &self.source {
            Source::Memory(bytes) => Ok(bytes.clone()),
            Source::Path(path) => Ok(Bytes::from(tokio::fs::read(path).await?)),
        }
    }
}

/// Type check first, then size.
pub fn validate(file: &EvidenceFile) -> Result<()> {
    let top_level = file.mime_type.split('/').next().unwrap_or_default();
    if !top_level.eq_ignore_ascii_case("image") {
        return Err(Error::InvalidMediaType {
            mime_type: file.mime_type.clone(),
        });
    }
    check_size(file.size)
}

fn check_size(size: u64) -> Result<()> {
    if size > MAX_EVIDENCE_BYTES {
        return Err(Error::MediaTooLarge {
            size,
            limit: MAX_EVIDENCE_BYTES,
        });
    }
    Ok(())
}

/// Read the file and encode it. Does not validate the MIME type.
pub async fn encode(file: &EvidenceFile) -> Result<EncodedImage> {
    let bytes = file.read().await?;
    // The file may have grown since its metadata was taken.
    check_size(bytes.len() as u64)?;
    Ok(EncodedImage::encode(&file.mime_type, &bytes))
}

/// Message shown to the user for a failed capture.
pub fn capture_failure_message(err: &Error) -> &'static str {
    match err {
        Error::InvalidMediaType { .. } => MSG_NOT_AN_IMAGE,
        Error::MediaTooLarge { .. } => MSG_TOO_LARGE,
        _ => MSG_UNREADABLE,
    }
}

#[derive(Debug, Clone, Default)]
struct SlotState {
    evidence: Option<EncodedImage>,
    /// Generation of the most recently started capture.
    latest: u64,
    /// Set while the latest capture is still encoding.
    pending: Option<u64>,
}

/// The one pending attachment of a form. Every attach affordance writes the
/// same slot; a newer capture replaces an older one.
///
/// Encoding runs on a spawned task, so [`EvidenceSlot::capture`] must be
/// called from within a Tokio runtime. Submitters await
/// [`EvidenceSlot::settled`] so a chosen image is never left behind.
#[derive(Clone)]
pub struct EvidenceSlot {
    inner: Arc<SlotInner>,
}

struct SlotInner {
    tx: watch::Sender<SlotState>,
    notifier: Arc<dyn Notifier>,
}

impl EvidenceSlot {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        let (tx, _) = watch::channel(SlotState::default());
        Self {
            inner: Arc::new(SlotInner { tx, notifier }),
        }
    }

    /// Capture and report any validation failure to the user.
    /// Returns whether encoding was started.
    pub fn attach(&self, file: EvidenceFile) -> bool {
        match self.capture(file) {
            Ok(()) => true,
            Err(e) => {
                warn!("evidence rejected: {}", e);
                self.inner.notifier.error(capture_failure_message(&e));
                false
            }
        }
    }

    /// Validate synchronously, then encode in the background. On validation
    /// failure the slot is left exactly as it was.
    pub fn capture(&self, file: EvidenceFile) -> Result<()> {
        validate(&file)?;

        let mut generation = 0;
        self.inner.tx.send_modify(|state| {
            state.latest += 1;
            state.pending = Some(state.latest);
            generation = state.latest;
        });
        debug!(
            generation,
            name = file.name(),
            size = file.size(),
            "encoding evidence"
        );

        let inner = self.inner.clone();
        tokio::spawn(async move {
            match encode(&file).await {
                Ok(image) => {
                    if !inner.finish(generation, Some(image)) {
                        debug!(generation, "evidence superseded by a newer capture");
                    }
                }
                Err(e) => {
                    warn!(generation, "evidence encoding failed: {}", e);
                    if inner.finish(generation, None) {
                        inner.notifier.error(capture_failure_message(&e));
                    }
                }
            }
        });

        Ok(())
    }

    /// Wait for the latest capture to finish, then return what the slot holds.
    pub async fn settled(&self) -> Option<EncodedImage> {
        let mut rx = self.inner.tx.subscribe();
        let evidence = match rx.wait_for(|state| state.pending.is_none()).await {
            Ok(state) => state.evidence.clone(),
            Err(_) => self.current(),
        };
        evidence
    }

    /// What the slot holds right now, ignoring any capture in flight.
    pub fn current(&self) -> Option<EncodedImage> {
        self.inner.tx.borrow().evidence.clone()
    }

    pub fn has_evidence(&self) -> bool {
        self.inner.tx.borrow().evidence.is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.inner.tx.borrow().pending.is_some()
    }

    /// Empty the slot. A capture still in flight is discarded when it lands.
    pub fn clear(&self) {
        self.inner.tx.send_modify(|state| {
            state.latest += 1;
            state.pending = None;
            state.evidence = None;
        });
    }
}

impl SlotInner {
    /// Publish a finished capture. Stale generations are dropped; a failed
    /// latest capture keeps the previous evidence. Returns whether this
    /// capture was still the latest.
    fn finish(&self, generation: u64, image: Option<EncodedImage>) -> bool {
        self.tx.send_if_modified(|state| {
            if state.latest != generation {
                return false;
            }
            state.pending = None;
            if let Some(image) = image {
                state.evidence = Some(image);
            }
            true
        })
    }
}
