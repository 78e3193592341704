use std::{env, str::FromStr};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub openai_api_key: String,
    pub openai_model: String,
    pub openai_api_base: String,
    pub replicate_api_token: String,
    pub replicate_api_base: String,
    /// `name:version` reference to the generation model.
    pub replicate_model: String,
    pub lora_url: String,
    pub max_description_tokens: u32,
    pub poll_interval_ms: u64,
    pub poll_max_interval_ms: u64,
    pub poll_timeout_secs: u64,
}

trait FromEnvWithDefault: Sized {
    fn from_env_or_default(key: &str, default: Self) -> Self;
}

impl FromEnvWithDefault for u16 {
    fn from_env_or_default(key: &str, default: Self) -> Self {
        env::var(key)
            .ok()
            .and_then(|val| val.parse().ok())
            .unwrap_or(default)
    }
}

impl FromEnvWithDefault for u32 {
    fn from_env_or_default(key: &str, default: Self) -> Self {
        env::var(key)
            .ok()
            .and_then(|val| val.parse().ok())
            .unwrap_or(default)
    }
}

impl FromEnvWithDefault for u64 {
    fn from_env_or_default(key: &str, default: Self) -> Self {
        env::var(key)
            .ok()
            .and_then(|val| val.parse().ok())
            .unwrap_or(default)
    }
}

impl FromEnvWithDefault for String {
    fn from_env_or_default(key: &str, default: Self) -> Self {
        env::var(key).unwrap_or(default)
    }
}

impl<T> FromEnvWithDefault for Option<T>
where
    T: FromStr,
{
    fn from_env_or_default(key: &str, default: Self) -> Self {
        env::var(key)
            .ok()
            .and_then(|val| val.parse().ok())
            .or(default)
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            host: String::from_env_or_default("HOST", "0.0.0.0".into()),
            port: u16::from_env_or_default("PORT", 8080),
            openai_api_key: String::from_env_or_default("OPENAI_API_KEY", "".into()),
            openai_model: String::from_env_or_default("OPENAI_MODEL", "".into()),
            openai_api_base: String::from_env_or_default(
                "OPENAI_API_BASE",
                "https://api.openai.com/v1".into(),
            ),
            replicate_api_token: String::from_env_or_default("REPLICATE_API_TOKEN", "".into()),
            replicate_api_base: String::from_env_or_default(
                "REPLICATE_API_BASE",
                "https://api.replicate.com/v1".into(),
            ),
            replicate_model: String::from_env_or_default("REPLICATE_MODEL", "".into()),
            lora_url: String::from_env_or_default("LORA_URL", "".into()),
            max_description_tokens: u32::from_env_or_default("MAX_DESCRIPTION_TOKENS", 750),
            poll_interval_ms: u64::from_env_or_default("POLL_INTERVAL_MS", 1000),
            poll_max_interval_ms: u64::from_env_or_default("POLL_MAX_INTERVAL_MS", 10_000),
            poll_timeout_secs: u64::from_env_or_default("POLL_TIMEOUT_SECS", 600),
        }
    }
}
