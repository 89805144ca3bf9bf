use log::{debug, error, info};
use parking_lot::Mutex;
use serde::Serialize;

use crate::client::PredictionClient;
use crate::models::{FieldKey, InputParameters, PredictionResult};

/// Everything the page shows. Result and error are independent.
#[derive(Debug, Default, Serialize, Clone, PartialEq)]
pub struct FormSnapshot {
    pub inputs: InputParameters,
    pub result: Option<PredictionResult>,
    pub error: Option<String>,
}

/// The form's state, owned by the application and shared between handlers.
///
/// The lock is only taken around reads and writes of the state, never across
/// a request to the prediction service. Overlapping submits therefore race:
/// whichever response completes last is what the page ends up showing.
pub struct FormState {
    client: PredictionClient,
    inner: Mutex<FormSnapshot>,
}

impl FormState {
    pub fn new(client: PredictionClient) -> Self {
        Self {
            client,
            inner: Mutex::new(FormSnapshot::default()),
        }
    }

    /// Fires the one-off connectivity check on the current runtime.
    pub fn initialize(&self) {
        let client = self.client.clone();
        actix_web::rt::spawn(async move {
            client.check_connectivity().await;
        });
    }

    pub fn update_field(&self, key: FieldKey, value: impl Into<String>) {
        self.inner.lock().inputs.set(key, value);
    }

    /// Returns `false`, leaving state untouched, when `name` is not one of the seven keys.
    pub fn update_field_by_name(&self, name: &str, value: impl Into<String>) -> bool {
        match FieldKey::parse(name) {
            Some(key) => {
                self.update_field(key, value);
                true
            }
            None => {
                debug!("Ignoring unknown form field {:?}", name);
                false
            }
        }
    }

    pub async fn submit(&self) {
        let inputs = {
            let mut state = self.inner.lock();
            state.error = None;
            state.inputs.clone()
        };

        match self.client.predict(&inputs).await {
            Ok(result) => {
                info!("Prediction received: {} metrics", result.metrics.len());
                self.inner.lock().result = Some(result);
            }
            Err(e) => {
                error!("Error: {}", e);
                self.inner.lock().error = Some(e.display_message());
            }
        }
    }

    pub fn snapshot(&self) -> FormSnapshot {
        self.inner.lock().clone()
    }
}
