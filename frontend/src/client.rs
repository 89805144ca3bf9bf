use log::{error, info, warn};
use reqwest::Client;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::PredictionError;
use crate::models::{InputParameters, PredictionResult};

/// HTTP access to the remote prediction service.
#[derive(Clone)]
pub struct PredictionClient {
    client: Client,
    config: ClientConfig,
}

impl PredictionClient {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// `GET /test`. The outcome is logged and otherwise discarded.
    pub async fn check_connectivity(&self) {
        let url = self.config.endpoint("test");

        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                error!("Backend connection failed: {}", e);
                return;
            }
        };

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if status.is_success() {
            info!("Backend connection successful: {}", body);
        } else {
            error!("Backend connection failed: HTTP {} from {}: {}", status, url, body);
        }
    }

    /// `POST /predict` with the seven raw inputs.
    pub async fn predict(&self, inputs: &InputParameters) -> Result<PredictionResult, PredictionError> {
        let url = self.config.endpoint("predict");

        let response = self.client.post(&url).json(inputs).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let message = server_error_message(&body);
            warn!(
                "HTTP {} from {}: {}",
                status,
                url,
                String::from_utf8_lossy(&body)
            );
            return Err(PredictionError::status(status.as_u16(), message));
        }

        let value: Value = serde_json::from_slice(&body)
            .map_err(|e| PredictionError::Decode(format!("invalid JSON: {}", e)))?;
        PredictionResult::from_json(value)
    }
}

/// The `error` string field of a failure body, if the body carries one.
fn server_error_message(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    value.get("error")?.as_str().map(str::to_string)
}
