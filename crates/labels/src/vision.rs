use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{LabelAnnotation, LabelError, LabelSource, LabelSourceConfig};

/// Label source backed by the Google Cloud Vision `images:annotate` REST endpoint.
///
/// Each call sends one image with a single `LABEL_DETECTION` feature. Failures
/// are returned as-is; there is no retry.
pub struct VisionLabelSource {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
    auth_header: Option<String>,
    max_results: Option<u32>,
}

impl VisionLabelSource {
    pub fn new(cfg: &LabelSourceConfig) -> Result<Self, LabelError> {
        if cfg.api_url.trim().is_empty() {
            return Err(LabelError::InvalidConfig(
                "api_url is required for vision mode".into(),
            ));
        }
        if cfg.api_key.is_none() && cfg.api_auth_header.is_none() {
            tracing::warn!(
                url = %cfg.api_url,
                "vision label source has neither api_key nor api_auth_header configured"
            );
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| LabelError::InvalidConfig(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            url: cfg.api_url.clone(),
            api_key: cfg.api_key.clone(),
            auth_header: cfg.api_auth_header.clone(),
            max_results: cfg.max_results,
        })
    }

    async fn send_annotate_request(&self, payload: Value) -> Result<Value, LabelError> {
        let mut request = self.client.post(&self.url).json(&payload);
        if let Some(key) = self.api_key.as_deref() {
            request = request.query(&[("key", key)]);
        }
        if let Some(header) = self.auth_header.as_deref() {
            request = request.header("Authorization", header);
        }

        let response = request
            .send()
            .await
            .map_err(|e| LabelError::Transport(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // The service wraps most failures in a JSON status object.
            if let Some(message) = error_message_from_body(&body) {
                return Err(LabelError::Service(message));
            }
            return Err(LabelError::Transport(format!("HTTP error {status}: {body}")));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| LabelError::InvalidResponse(format!("invalid JSON response: {e}")))
    }
}

#[async_trait]
impl LabelSource for VisionLabelSource {
    fn name(&self) -> &str {
        "vision"
    }

    async fn detect_labels(&self, image: &[u8]) -> Result<Vec<LabelAnnotation>, LabelError> {
        let payload = build_annotate_payload(image, self.max_results);
        let response = self.send_annotate_request(payload).await?;
        let labels = parse_annotate_response(response)?;
        tracing::debug!(count = labels.len(), "vision returned labels");
        Ok(labels)
    }
}

/// Build the `images:annotate` request body for one image.
pub(crate) fn build_annotate_payload(image: &[u8], max_results: Option<u32>) -> Value {
    let mut feature = json!({ "type": "LABEL_DETECTION" });
    if let Some(max) = max_results {
        feature["maxResults"] = json!(max);
    }
    json!({
        "requests": [{
            "image": { "content": BASE64.encode(image) },
            "features": [feature],
        }]
    })
}

#[derive(Debug, Deserialize)]
struct AnnotateResponse {
    #[serde(default)]
    responses: Vec<AnnotateImageResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnnotateImageResponse {
    #[serde(default)]
    label_annotations: Vec<EntityAnnotation>,
    #[serde(default)]
    error: Option<Status>,
}

#[derive(Debug, Deserialize)]
struct EntityAnnotation {
    #[serde(default)]
    description: String,
    #[serde(default)]
    score: f32,
}

#[derive(Debug, Deserialize)]
struct Status {
    #[serde(default)]
    message: String,
}

/// Extract label annotations from an `images:annotate` response.
///
/// A non-empty per-image `error.message` wins over any labels present.
pub(crate) fn parse_annotate_response(value: Value) -> Result<Vec<LabelAnnotation>, LabelError> {
    let response: AnnotateResponse = serde_json::from_value(value)
        .map_err(|e| LabelError::InvalidResponse(format!("unexpected response shape: {e}")))?;

    let Some(first) = response.responses.into_iter().next() else {
        return Ok(Vec::new());
    };

    if let Some(status) = first.error {
        if !status.message.is_empty() {
            return Err(LabelError::Service(status.message));
        }
    }

    Ok(first
        .label_annotations
        .into_iter()
        .map(|a| LabelAnnotation {
            description: a.description,
            score: a.score,
        })
        .collect())
}

fn error_message_from_body(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let message = value.get("error")?.get("message")?.as_str()?;
    (!message.is_empty()).then(|| message.to_string())
}
