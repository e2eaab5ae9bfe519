use std::time::Duration;

/// Where the scoring service lives and how to reach it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub submit_path: String,
    pub verify_path: String,
    /// `None` waits for the exchange to finish or fail on its own.
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".into(),
            submit_path: "/submit-content".into(),
            verify_path: "/verify-content".into(),
            timeout: None,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Load from `REPORTDAO_*` variables, reading `.env` if present.
    pub fn from_env() -> anyhow::Result<Self> {
        let _ = dotenvy::dotenv();

        let defaults = Self::default();
        let base_url = std::env::var("REPORTDAO_API_URL").unwrap_or(defaults.base_url);
        let submit_path = std::env::var("REPORTDAO_SUBMIT_PATH").unwrap_or(defaults.submit_path);
        let verify_path = std::env::var("REPORTDAO_VERIFY_PATH").unwrap_or(defaults.verify_path);
        let timeout = match std::env::var("REPORTDAO_TIMEOUT_SECS") {
            Ok(secs) => Some(Duration::from_secs(secs.parse()?)),
            Err(_) => None,
        };

        Ok(Self {
            base_url,
            submit_path,
            verify_path,
            timeout,
        })
    }

    pub fn submit_url(&self) -> String {
        join_url(&self.base_url, &self.submit_path)
    }

    pub fn verify_url(&self) -> String {
        join_url(&self.base_url, &self.verify_path)
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}
