use std::sync::Arc;

use crate::api::ContentApi;
use crate::config::ClientConfig;
use crate::error::Result;
use crate::notify::Notifier;

pub type AppContext = Arc<AppContextInner>;

/// Handles every view needs: the scoring service client and somewhere to
/// send user feedback. Built once and handed to each view at construction.
pub struct AppContextInner {
    pub api: ContentApi,
    pub notifier: Arc<dyn Notifier>,
}

impl AppContextInner {
    pub fn new(config: ClientConfig, notifier: Arc<dyn Notifier>) -> Result<AppContext> {
        Ok(Arc::new(Self {
            api: ContentApi::new(config)?,
            notifier,
        }))
    }
}
