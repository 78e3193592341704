use crate::{config::AppConfig, error::RelayError};
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Fixed analysis prompt sent alongside the control image. The nine numbered
/// aspects keep the model's answer structured enough to survive sanitizing.
const ANALYSIS_PROMPT: &str = "Analyze this image in great detail. Describe the following aspects:\n\n\
1. Subject: Appearance, pose, and expressions.\n\
2. Clothing: Colors, styles, and types of garments worn.\n\
3. Setting: Location, background elements, and overall atmosphere.\n\
4. Lighting: Quality, direction, and mood created by the lighting.\n\
5. Composition: Camera angle, framing, and focal points.\n\
6. Technical details: Type of camera, lens, and any post-processing effects.\n\
7. Emotions and mood: The overall feeling conveyed by the image.\n\
8. Actions and interactions: What the subject is doing and how they interact with the environment.\n\
9. Notable details: Any unique or standout elements in the image.\n\n\
Provide a comprehensive and vivid description that captures both the visual elements and the essence of the photograph.";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: Vec<ContentPart<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart<'a> {
    Text { text: &'a str },
    ImageUrl { image_url: ImageUrl<'a> },
}

#[derive(Debug, Serialize)]
struct ImageUrl<'a> {
    url: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Client for the vision-language chat-completions API.
#[derive(Debug, Clone)]
pub struct VisionClient {
    http: Client,
    api_key: String,
    model: String,
    endpoint: String,
    max_tokens: u32,
}

impl VisionClient {
    pub fn new(http: Client, config: &AppConfig) -> Self {
        Self {
            http,
            api_key: config.openai_api_key.clone(),
            model: config.openai_model.clone(),
            endpoint: format!("{}/chat/completions", config.openai_api_base),
            max_tokens: config.max_description_tokens,
        }
    }

    /// Ask the vision model for a detailed description of the image behind
    /// `image_url`. One request, no retry; the raw text comes back unsanitized.
    pub async fn describe(&self, image_url: &str) -> Result<String, RelayError> {
        let payload = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: vec![
                    ContentPart::Text {
                        text: ANALYSIS_PROMPT,
                    },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl { url: image_url },
                    },
                ],
            }],
            max_tokens: self.max_tokens,
        };

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?;

        let result = response.json::<ChatResponse>().await?;

        result
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                RelayError::UpstreamShape("failed to get a description from the API".to_string())
            })
    }
}
