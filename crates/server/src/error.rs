use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use vpm::PipelineError;

pub type ServerResult<T> = Result<T, ServerError>;

/// Server error types
///
/// Request-level failures are reported in-band: the response status stays
/// `200 OK` and the body is `{"error": "<message>"}`.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error("{0}")]
    BadRequest(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found")]
    NotFound,
}

/// API error response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ServerError {
    /// Get HTTP status code for this error
    fn status_code(&self) -> StatusCode {
        match self {
            ServerError::NotFound => StatusCode::NOT_FOUND,
            ServerError::Pipeline(_)
            | ServerError::BadRequest(_)
            | ServerError::Config(_) => StatusCode::OK,
        }
    }

    /// Short error kind for logs and metrics labels
    pub fn kind(&self) -> &'static str {
        match self {
            ServerError::Pipeline(PipelineError::UnsupportedFormat { .. }) => "unsupported_format",
            ServerError::Pipeline(PipelineError::Labels(_)) => "label_source",
            ServerError::BadRequest(_) => "bad_request",
            ServerError::Config(_) => "config",
            ServerError::NotFound => "not_found",
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorResponse {
            error: self.to_string(),
        });

        (status, body).into_response()
    }
}

impl From<axum::extract::multipart::MultipartError> for ServerError {
    fn from(err: axum::extract::multipart::MultipartError) -> Self {
        ServerError::BadRequest(err.body_text())
    }
}

impl From<axum::extract::multipart::MultipartRejection> for ServerError {
    fn from(rejection: axum::extract::multipart::MultipartRejection) -> Self {
        ServerError::BadRequest(rejection.body_text())
    }
}

impl From<matcher::CatalogError> for ServerError {
    fn from(err: matcher::CatalogError) -> Self {
        ServerError::Config(err.to_string())
    }
}

impl From<labels::LabelError> for ServerError {
    fn from(err: labels::LabelError) -> Self {
        ServerError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use vpm::LabelError;

    async fn render(err: ServerError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn unsupported_format_is_in_band() {
        let err = ServerError::from(PipelineError::UnsupportedFormat {
            filename: "a.gif".into(),
        });
        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["error"],
            "Unsupported file format. Only PNG, JPG, and JPEG are supported."
        );
    }

    #[tokio::test]
    async fn label_service_message_is_verbatim() {
        let err = ServerError::from(PipelineError::Labels(LabelError::Service(
            "Bad image data.".into(),
        )));
        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!({"error": "Bad image data."}));
    }

    #[tokio::test]
    async fn not_found_uses_404() {
        let (status, body) = render(ServerError::NotFound).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Not found");
    }

    #[test]
    fn error_kinds() {
        assert_eq!(ServerError::BadRequest("x".into()).kind(), "bad_request");
        assert_eq!(
            ServerError::from(PipelineError::Labels(LabelError::Transport("x".into()))).kind(),
            "label_source"
        );
    }
}
