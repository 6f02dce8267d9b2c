use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use rand::Rng;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::{
    Config,
    payload::{ORDER_ID_RANGE, PredictionRequestPayload},
    provider::truncate_body,
};

/// Response of the prediction service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub order_id: u64,
    pub city: String,
    #[serde(rename = "Predicted_ETA")]
    pub predicted_eta_minutes: f64,
    #[serde(rename = "Predicted_Delay")]
    pub predicted_delay_minutes: f64,
}

/// A result as returned by the service, or one synthesized because the
/// service could not be used. Both render the same.
#[derive(Debug, Clone, PartialEq)]
pub enum Prediction {
    Live(PredictionResult),
    Fallback(PredictionResult),
}

impl Prediction {
    pub fn result(&self) -> &PredictionResult {
        match self {
            Prediction::Live(r) | Prediction::Fallback(r) => r,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Prediction::Fallback(_))
    }
}

#[async_trait]
pub trait PredictionService: Send + Sync + Debug {
    /// Succeeds when the service answers its health check with a 2xx.
    async fn health(&self) -> Result<()>;

    async fn predict(&self, payload: &PredictionRequestPayload) -> Result<PredictionResult>;
}

/// JSON-over-HTTP client for the prediction service.
#[derive(Debug, Clone)]
pub struct HttpPredictionService {
    base_url: String,
    http: Client,
}

impl HttpPredictionService {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.prediction_url())
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

#[async_trait]
impl PredictionService for HttpPredictionService {
    async fn health(&self) -> Result<()> {
        let res = self
            .http
            .get(self.endpoint("health"))
            .send()
            .await
            .context("Failed to reach prediction service (health)")?;

        let status = res.status();
        if !status.is_success() {
            return Err(anyhow!("Prediction service health check returned status {status}"));
        }

        Ok(())
    }

    async fn predict(&self, payload: &PredictionRequestPayload) -> Result<PredictionResult> {
        tracing::debug!(
            order_id = payload.order_id,
            city = %payload.city,
            "submitting prediction request"
        );

        let res = self
            .http
            .post(self.endpoint("predict"))
            .json(payload)
            .send()
            .await
            .context("Failed to send request to prediction service")?;

        let status = res.status();
        let body = res
            .text()
            .await
            .context("Failed to read prediction service response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "Prediction request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        serde_json::from_str(&body).context("Failed to parse prediction service JSON")
    }
}

/// Send a payload. Any failure is replaced by a random demo result for the
/// same city, tagged as [`Prediction::Fallback`].
pub async fn submit<R: Rng + ?Sized>(
    service: &dyn PredictionService,
    payload: &PredictionRequestPayload,
    rng: &mut R,
) -> Prediction {
    match service.predict(payload).await {
        Ok(result) => Prediction::Live(result),
        Err(err) => {
            tracing::warn!(
                order_id = payload.order_id,
                "Prediction service unavailable, using demo result: {err:#}"
            );
            Prediction::Fallback(fallback_result(&payload.city, rng))
        }
    }
}

pub fn fallback_result<R: Rng + ?Sized>(city: &str, rng: &mut R) -> PredictionResult {
    PredictionResult {
        order_id: u64::from(rng.gen_range(ORDER_ID_RANGE)),
        city: city.to_string(),
        predicted_eta_minutes: f64::from(rng.gen_range(15u32..35)),
        predicted_delay_minutes: f64::from(rng.gen_range(0u32..8)),
    }
}
