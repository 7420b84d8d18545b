//! Image label sources for the visual product matcher.
//!
//! A [`LabelSource`] turns raw image bytes into a list of textual labels with
//! confidences. Two implementations ship with the crate:
//!
//! - [`VisionLabelSource`]: Google Cloud Vision `images:annotate` over REST.
//! - [`StaticLabelSource`]: fixed answer, for offline runs and tests.
//!
//! [`build_label_source`] picks one from a [`LabelSourceConfig`].
//!
//! ```no_run
//! use labels::{build_label_source, LabelSourceConfig};
//!
//! # async fn run() -> Result<(), labels::LabelError> {
//! let cfg = LabelSourceConfig {
//!     api_key: Some("AIza...".into()),
//!     ..Default::default()
//! };
//! let source = build_label_source(&cfg)?;
//! let image = std::fs::read("dog.jpg").unwrap_or_default();
//! for label in source.detect_labels(&image).await? {
//!     println!("{} ({:.2})", label.description, label.score);
//! }
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
mod stub;
mod vision;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use config::{LabelSourceConfig, DEFAULT_VISION_URL};
pub use error::LabelError;
pub use stub::StaticLabelSource;
pub use vision::VisionLabelSource;

/// One label detected on an image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelAnnotation {
    /// Human-readable label text as returned by the service.
    pub description: String,
    /// Confidence in `[0.0, 1.0]`. Carried for logging only.
    pub score: f32,
}

/// Produces labels for raw image bytes.
#[async_trait]
pub trait LabelSource: Send + Sync {
    /// Short identifier used in logs and readiness output.
    fn name(&self) -> &str;

    /// Detect labels on `image`. Labels are returned in service order.
    async fn detect_labels(&self, image: &[u8]) -> Result<Vec<LabelAnnotation>, LabelError>;
}

/// Build the label source selected by `cfg.mode`.
pub fn build_label_source(cfg: &LabelSourceConfig) -> Result<Arc<dyn LabelSource>, LabelError> {
    match cfg.mode.to_ascii_lowercase().as_str() {
        "vision" | "google" => Ok(Arc::new(VisionLabelSource::new(cfg)?)),
        "static" | "stub" => Ok(Arc::new(StaticLabelSource::with_labels(
            cfg.static_labels.iter().cloned(),
        ))),
        other => Err(LabelError::InvalidConfig(format!(
            "unknown label source mode `{other}`"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_static_source() {
        let cfg = LabelSourceConfig {
            mode: "static".into(),
            static_labels: vec!["dog".into()],
            ..Default::default()
        };
        let source = build_label_source(&cfg).unwrap();
        assert_eq!(source.name(), "static");
    }

    #[test]
    fn builds_vision_source() {
        let source = build_label_source(&LabelSourceConfig::default()).unwrap();
        assert_eq!(source.name(), "vision");
    }

    #[test]
    fn rejects_unknown_mode() {
        let cfg = LabelSourceConfig {
            mode: "ocr".into(),
            ..Default::default()
        };
        let err = build_label_source(&cfg).err().unwrap();
        assert!(err.to_string().contains("unknown label source mode `ocr`"));
    }
}
