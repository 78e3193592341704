use super::{AppError, AppForm, AppJson};
use crate::{error::RelayError, sanitize, state::AppState};
use axum::{extract::State, routing::post, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

const OPENAPI_TAG: &str = "Describe";

/// Default pseudonymization list; the form can override it.
const DEFAULT_WORDS_TO_REPLACE: &str = "woman,women,girl,lady,female";
const DEFAULT_TRIGGER_WORD: &str = "VIDHYAASREE";

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct DescribeForm {
    #[serde(default)]
    control_image_url: String,
    words_to_replace: Option<String>,
    trigger_word: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DescribeResponse {
    modified_description: String,
}

fn split_words(list: &str) -> Vec<String> {
    list.split(',').map(|w| w.trim().to_string()).collect()
}

/// Generate description
///
/// Describe the control image with the vision model, strip markdown and
/// pseudonymize the word list to the trigger word.
#[utoipa::path(
    post,
    path = "/generate_description",
    request_body(content = DescribeForm, content_type = "application/x-www-form-urlencoded"),
    responses((
        status = OK,
        body = DescribeResponse
    )),
    tag = OPENAPI_TAG
)]
pub async fn generate_description(
    State(state): State<Arc<AppState>>,
    AppForm(form): AppForm<DescribeForm>,
) -> Result<AppJson<DescribeResponse>, AppError> {
    if form.control_image_url.trim().is_empty() {
        return Err(RelayError::MissingParameter("control_image_url").into());
    }

    let words = split_words(
        form.words_to_replace
            .as_deref()
            .unwrap_or(DEFAULT_WORDS_TO_REPLACE),
    );
    let trigger_word = form.trigger_word.as_deref().unwrap_or(DEFAULT_TRIGGER_WORD);

    let description = state.vision().describe(&form.control_image_url).await?;

    let clean = sanitize::remove_markdown(&description);
    let modified_description = sanitize::replace_words_with_trigger(&clean, &words, trigger_word);

    Ok(AppJson(DescribeResponse {
        modified_description,
    }))
}

pub fn describe_routes() -> Router<Arc<AppState>> {
    Router::new().route("/generate_description", post(generate_description))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::AppConfig, routes::test_util::form_request};
    use axum::http::StatusCode;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn test_state() -> Arc<AppState> {
        // empty upstream config; requests must fail before any network call
        Arc::new(AppState::new(AppConfig {
            host: "127.0.0.1".into(),
            port: 0,
            openai_api_key: "".into(),
            openai_model: "".into(),
            openai_api_base: "http://127.0.0.1:1".into(),
            replicate_api_token: "".into(),
            replicate_api_base: "http://127.0.0.1:1".into(),
            replicate_model: "".into(),
            lora_url: "".into(),
            max_description_tokens: 750,
            poll_interval_ms: 1,
            poll_max_interval_ms: 1,
            poll_timeout_secs: 1,
        }))
    }

    #[tokio::test]
    async fn missing_control_image_url_is_rejected_without_network() {
        let app = describe_routes().with_state(test_state());

        let response = app
            .oneshot(form_request("/generate_description", "control_image_url="))
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
    async fn absent_field_also_counts_as_missing() {
        let app = describe_routes().with_state(test_state());

        let response = app
            .oneshot(form_request("/generate_description", "trigger_word=X"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn words_split_on_commas_and_trim() {
        assert_eq!(
            split_words("woman, women ,girl"),
            vec!["woman".to_string(), "women".to_string(), "girl".to_string()]
        );
    }
}
