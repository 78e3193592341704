use crate::{config::AppConfig, prediction::ReplicateClient, vision::VisionClient};
use reqwest::Client;

/// Shared per-process state. Everything here is read-only after startup;
/// requests never coordinate through it.
#[derive(Clone, Debug)]
pub struct AppState {
    config: AppConfig,
    vision: VisionClient,
    replicate: ReplicateClient,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let http = Client::new();
        let vision = VisionClient::new(http.clone(), &config);
        let replicate = ReplicateClient::new(http, &config);

        Self {
            config,
            vision,
            replicate,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn vision(&self) -> &VisionClient {
        &self.vision
    }

    pub fn replicate(&self) -> &ReplicateClient {
        &self.replicate
    }
}
