use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, error, info};

use reportdao_types::api::{
    SubmitAck, SubmitContentRequest, VerifyContentRequest, VerifyContentResponse,
};

use crate::config::ClientConfig;
use crate::error::{Error, Result};

/// HTTP client for the scoring service's "submit content" and
/// "verify content" endpoints. One POST per call, no retries.
#[derive(Clone)]
pub struct ContentApi {
    client: Client,
    config: ClientConfig,
}

impl ContentApi {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            config,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub async fn submit_content(&self, body: &SubmitContentRequest) -> Result<SubmitAck> {
        debug!(
            proof_text = %body.proof_text,
            has_image = body.proof_image.is_some(),
            "submit-content payload"
        );
        self.post_json(&self.config.submit_url(), body).await
    }

    pub async fn verify_content(&self, body: &VerifyContentRequest) -> Result<VerifyContentResponse> {
        debug!(
            submitted_text = %body.submitted_text,
            verification_text = %body.verification_text,
            has_submitted_image = body.submitted_image_base64.is_some(),
            has_verification_image = body.verification_image_base64.is_some(),
            "verify-content payload"
        );
        self.post_json(&self.config.verify_url(), body).await
    }

    async fn post_json<B, R>(&self, url: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let resp = self.client.post(url).json(body).send().await?;

        let status = resp.status();
        info!(endpoint = %url, status = status.as_u16(), "exchange complete");

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            error!(endpoint = %url, status = status.as_u16(), "rejected: {}", body);
            return Err(Error::SubmissionRejected {
                status: status.as_u16(),
                body,
            });
        }

        let text = resp.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            error!(endpoint = %url, "unparseable response: {}", e);
            Error::MalformedResponse(e.to_string())
        })
    }
}
