use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Failures of a single call to the text-generation provider
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// Transport, authentication or provider-side failure
    #[error("Provider unavailable: {0}")]
    Unavailable(String),

    /// The provider answered without any text
    #[error("Provider returned an empty response")]
    Empty,
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        ProviderError::Unavailable(err.to_string())
    }
}

/// Terminal outcomes of one recommendation pipeline invocation
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    #[error("Invalid recommendation request: {0}")]
    InvalidRequest(String),

    #[error("Provider call failed: {0}")]
    ProviderFailed(#[from] ProviderError),

    /// Neither the structured nor the heuristic path yielded a record
    #[error("No recommendations could be extracted from the provider response")]
    NoRecommendations,
}

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Pipeline(PipelineError::InvalidRequest(_)) => StatusCode::BAD_REQUEST,
            AppError::Pipeline(PipelineError::ProviderFailed(_)) => StatusCode::BAD_GATEWAY,
            AppError::Pipeline(PipelineError::NoRecommendations) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (
                AppError::from(PipelineError::InvalidRequest("count".to_string())),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::from(PipelineError::ProviderFailed(ProviderError::Empty)),
                StatusCode::BAD_GATEWAY,
            ),
            (
                AppError::from(PipelineError::NoRecommendations),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[test]
    fn test_provider_error_wraps_into_pipeline_error() {
        let err: PipelineError = ProviderError::Unavailable("timeout".to_string()).into();
        assert_eq!(
            err.to_string(),
            "Provider call failed: Provider unavailable: timeout"
        );
    }
}
