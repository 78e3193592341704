use super::{AppError, AppForm, AppJson};
use crate::{
    error::RelayError,
    prediction::{ModelRef, PredictionInput},
    state::AppState,
};
use axum::{extract::State, routing::post, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

const OPENAPI_TAG: &str = "Generate";

const DEFAULT_NEGATIVE_PROMPT: &str = "low quality, ugly, distorted, artefacts, necklace, text";
const DEFAULT_CONTROL_TYPE: &str = "depth";

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct GenerateForm {
    #[serde(default)]
    control_image_url: String,
    #[serde(default)]
    model_description: String,
    negative_prompt: Option<String>,
    control_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GenerateResponse {
    generated_image_url: String,
}

/// Generate image
///
/// Submit a prediction conditioned on the control image using the cleaned
/// description as prompt, then wait for its terminal status.
#[utoipa::path(
    post,
    path = "/generate_image",
    request_body(content = GenerateForm, content_type = "application/x-www-form-urlencoded"),
    responses((
        status = OK,
        body = GenerateResponse
    )),
    tag = OPENAPI_TAG
)]
pub async fn generate_image(
    State(state): State<Arc<AppState>>,
    AppForm(form): AppForm<GenerateForm>,
) -> Result<AppJson<GenerateResponse>, AppError> {
    if form.control_image_url.trim().is_empty() {
        return Err(RelayError::MissingParameter("control_image_url").into());
    }
    if form.model_description.trim().is_empty() {
        return Err(RelayError::MissingParameter("model_description").into());
    }

    let config = state.config();
    let model: ModelRef = config
        .replicate_model
        .parse()
        .map_err(|e| RelayError::UpstreamShape(format!("invalid model reference: {e}")))?;

    let input = PredictionInput::new(
        form.model_description,
        form.control_image_url,
        form.control_type
            .unwrap_or_else(|| DEFAULT_CONTROL_TYPE.to_string()),
        form.negative_prompt
            .unwrap_or_else(|| DEFAULT_NEGATIVE_PROMPT.to_string()),
        config.lora_url.clone(),
    );

    let generated_image_url = state.replicate().generate(&model, input).await?;

    Ok(AppJson(GenerateResponse {
        generated_image_url,
    }))
}

pub fn generate_routes() -> Router<Arc<AppState>> {
    Router::new().route("/generate_image", post(generate_image))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::AppConfig, routes::test_util::form_request};
    use axum::http::StatusCode;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn test_state() -> Arc<AppState> {
        Arc::new(AppState::new(AppConfig {
            host: "127.0.0.1".into(),
            port: 0,
            openai_api_key: "".into(),
            openai_model: "".into(),
            openai_api_base: "http://127.0.0.1:1".into(),
            replicate_api_token: "".into(),
            replicate_api_base: "http://127.0.0.1:1".into(),
            replicate_model: "owner/portrait:abc".into(),
            lora_url: "https://weights.test/lora.safetensors".into(),
            max_description_tokens: 750,
            poll_interval_ms: 1,
            poll_max_interval_ms: 1,
            poll_timeout_secs: 1,
        }))
    }

    #[tokio::test]
    async fn missing_control_image_url_is_rejected_before_submission() {
        let app = generate_routes().with_state(test_state());

        let response = app
            .oneshot(form_request("/generate_image", "model_description=a+portrait"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            json["error"],
            "missing required parameter: control_image_url"
        );
    }

    #[tokio::test]
    async fn missing_model_description_is_rejected_before_submission() {
        let app = generate_routes().with_state(test_state());

        let response = app
            .oneshot(form_request(
                "/generate_image",
                "control_image_url=https%3A%2F%2Fimg.test%2Fa.png",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            json["error"],
            "missing required parameter: model_description"
        );
    }
}
