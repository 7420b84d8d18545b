use serde::{Deserialize, Serialize};

/// Default Google Cloud Vision annotate endpoint.
pub const DEFAULT_VISION_URL: &str = "https://vision.googleapis.com/v1/images:annotate";

/// Runtime configuration selecting and tuning the label source.
///
/// # Example
/// ```
/// use labels::LabelSourceConfig;
///
/// let cfg = LabelSourceConfig {
///     api_key: Some("AIza...".into()),
///     max_results: Some(20),
///     ..Default::default()
/// };
/// assert_eq!(cfg.mode, "vision");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LabelSourceConfig {
    /// `"vision"` calls the Cloud Vision REST API, `"static"` returns [`static_labels`](Self::static_labels).
    pub mode: String,
    /// Annotate endpoint used in `"vision"` mode.
    pub api_url: String,
    /// API key, sent as the `key` query parameter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Raw `Authorization` header value (e.g. `"Bearer ya29..."`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_auth_header: Option<String>,
    /// Overall request timeout in seconds.
    pub timeout_secs: u64,
    /// Upper bound on returned labels; the service default applies when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<u32>,
    /// Labels returned in `"static"` mode.
    pub static_labels: Vec<String>,
}

impl Default for LabelSourceConfig {
    fn default() -> Self {
        Self {
            mode: "vision".into(),
            api_url: DEFAULT_VISION_URL.into(),
            api_key: None,
            api_auth_header: None,
            timeout_secs: 30,
            max_results: None,
            static_labels: Vec::new(),
        }
    }
}
