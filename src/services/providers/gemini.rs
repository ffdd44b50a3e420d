/// Google Gemini provider
///
/// Sends the composed instruction as a single user turn to the `generateContent`
/// endpoint and returns the text of the first candidate.
use crate::{
    config::Config,
    error::ProviderError,
    models::{
        GeminiContent, GeminiPart, GeminiRequest, GeminiResponse, RawProviderResponse,
        RecommendationRequest,
    },
    services::providers::{compose_instruction, RecommendationProvider},
};
use reqwest::Client as HttpClient;

#[derive(Clone)]
pub struct GeminiProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    model: String,
}

impl GeminiProvider {
    pub fn new(api_key: String, api_url: String, model: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            model,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.gemini_api_key.clone(),
            config.gemini_api_url.clone(),
            config.gemini_model.clone(),
        )
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_url, self.model
        )
    }

    fn build_request(&self, request: &RecommendationRequest) -> GeminiRequest {
        GeminiRequest {
            contents: vec![GeminiContent {
                role: Some("user".to_string()),
                parts: vec![GeminiPart {
                    text: Some(compose_instruction(request)),
                }],
            }],
        }
    }
}

#[async_trait::async_trait]
impl RecommendationProvider for GeminiProvider {
    async fn fetch(
        &self,
        request: &RecommendationRequest,
    ) -> Result<RawProviderResponse, ProviderError> {
        let response = self
            .http_client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&self.build_request(request))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Unavailable(format!(
                "Gemini API returned status {}: {}",
                status, body
            )));
        }

        let body: GeminiResponse = response.json().await?;

        if let Some(error) = &body.error {
            tracing::error!(
                code = ?error.code,
                message = %error.message,
                "Gemini reported an error"
            );
            return Err(ProviderError::Unavailable(format!(
                "Gemini error: {}",
                error.message
            )));
        }

        let text = body.text();
        tracing::debug!(
            model = %self.model,
            chars = text.len(),
            provider = self.name(),
            "Generation completed"
        );

        RawProviderResponse::new(text)
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}
