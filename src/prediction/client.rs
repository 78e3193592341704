use super::{ModelRef, Prediction, PredictionInput, PredictionStatus};
use crate::{config::AppConfig, error::RelayError};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Deserialize)]
struct ModelVersion {
    id: String,
}

/// How long and how patiently to wait on a prediction. The interval grows
/// toward `max_interval` so long-running jobs stop hammering the API, and
/// `timeout` bounds the whole wait.
#[derive(Debug, Clone, Copy)]
struct PollPolicy {
    interval: Duration,
    max_interval: Duration,
    timeout: Duration,
}

impl PollPolicy {
    fn next_interval(&self, current: Duration) -> Duration {
        (current * 2).min(self.max_interval)
    }
}

/// Client for the inference-hosting prediction API.
#[derive(Debug, Clone)]
pub struct ReplicateClient {
    http: Client,
    token: String,
    base: String,
    policy: PollPolicy,
}

impl ReplicateClient {
    pub fn new(http: Client, config: &AppConfig) -> Self {
        Self {
            http,
            token: config.replicate_api_token.clone(),
            base: config.replicate_api_base.clone(),
            policy: PollPolicy {
                interval: Duration::from_millis(config.poll_interval_ms),
                max_interval: Duration::from_millis(config.poll_max_interval_ms),
                timeout: Duration::from_secs(config.poll_timeout_secs),
            },
        }
    }

    /// Look up the model, then the specific version named by the reference.
    /// The two-step lookup also validates that both halves exist before a
    /// job is submitted.
    async fn resolve_version(&self, model: &ModelRef) -> Result<ModelVersion, RelayError> {
        self.http
            .get(format!("{}/models/{}", self.base, model.name))
            .bearer_auth(&self.token)
            .send()
            .await?
            .error_for_status()?;

        let version = self
            .http
            .get(format!(
                "{}/models/{}/versions/{}",
                self.base, model.name, model.version
            ))
            .bearer_auth(&self.token)
            .send()
            .await?
            .error_for_status()?
            .json::<ModelVersion>()
            .await?;

        Ok(version)
    }

    async fn create(
        &self,
        version_id: &str,
        input: &PredictionInput,
    ) -> Result<Prediction, RelayError> {
        let prediction = self
            .http
            .post(format!("{}/predictions", self.base))
            .bearer_auth(&self.token)
            .json(&json!({
                "version": version_id,
                "input": input,
            }))
            .send()
            .await?
            .error_for_status()?
            .json::<Prediction>()
            .await?;

        Ok(prediction)
    }

    async fn fetch(&self, id: &str) -> Result<Prediction, RelayError> {
        let prediction = self
            .http
            .get(format!("{}/predictions/{}", self.base, id))
            .bearer_auth(&self.token)
            .send()
            .await?
            .error_for_status()?
            .json::<Prediction>()
            .await?;

        Ok(prediction)
    }

    /// Submit a prediction against `model` and wait for a terminal status,
    /// returning the first output URL on success.
    #[tracing::instrument(skip_all, fields(model = %model.name))]
    pub async fn generate(
        &self,
        model: &ModelRef,
        input: PredictionInput,
    ) -> Result<String, RelayError> {
        let version = self.resolve_version(model).await?;
        let mut prediction = self.create(&version.id, &input).await?;
        tracing::info!(prediction_id = %prediction.id, "prediction submitted");

        let started = Instant::now();
        let mut interval = self.policy.interval;

        while !prediction.status.is_terminal() {
            if started.elapsed() >= self.policy.timeout {
                tracing::warn!(prediction_id = %prediction.id, "gave up waiting for prediction");
                return Err(RelayError::PollTimeout(self.policy.timeout));
            }

            tokio::time::sleep(interval).await;
            interval = self.policy.next_interval(interval);

            prediction = self.fetch(&prediction.id).await?;
            tracing::debug!(prediction_id = %prediction.id, status = %prediction.status, "polled prediction");
        }

        if prediction.status == PredictionStatus::Succeeded {
            tracing::info!(prediction_id = %prediction.id, output = ?prediction.output, "prediction output");
            prediction.first_output_url().ok_or_else(|| {
                RelayError::UpstreamShape("failed to generate image".to_string())
            })
        } else {
            Err(RelayError::UpstreamStatus {
                status: prediction.status,
                detail: prediction.error,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_doubles_up_to_the_cap() {
        let policy = PollPolicy {
            interval: Duration::from_millis(1000),
            max_interval: Duration::from_millis(3000),
            timeout: Duration::from_secs(600),
        };

        let second = policy.next_interval(policy.interval);
        assert_eq!(second, Duration::from_millis(2000));
        let third = policy.next_interval(second);
        assert_eq!(third, Duration::from_millis(3000));
        let fourth = policy.next_interval(third);
        assert_eq!(fourth, Duration::from_millis(3000));
    }
}
