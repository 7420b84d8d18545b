//! Workspace umbrella crate for the Visual Product Matcher (VPM).
//!
//! This crate stitches the label source and the catalog matcher together so
//! callers can go from an uploaded image to ranked products with a single
//! entry point, [`match_image`].

pub use labels::{
    build_label_source, LabelAnnotation, LabelError, LabelSource, LabelSourceConfig,
    StaticLabelSource, VisionLabelSource,
};
pub use matcher::{
    load_catalog, normalize, rank, score, Catalog, CatalogError, Label, LabelSet, MatchResult,
    Product, RankedResults,
};

use bytes::Bytes;
use std::sync::{Arc, OnceLock, RwLock};
use std::time::{Duration, Instant};
use thiserror::Error;

/// Message returned when an upload's filename has an unsupported extension.
pub const UNSUPPORTED_FORMAT_MESSAGE: &str =
    "Unsupported file format. Only PNG, JPG, and JPEG are supported.";

/// Errors that can occur while matching an uploaded image.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    #[error("{}", UNSUPPORTED_FORMAT_MESSAGE)]
    UnsupportedFormat { filename: String },

    #[error(transparent)]
    Labels(#[from] LabelError),
}

/// Image formats accepted for upload, decided by filename suffix alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
}

/// An uploaded image: the client-supplied filename and the raw bytes.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub filename: String,
    pub bytes: Bytes,
}

impl ImageUpload {
    pub fn new(filename: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            bytes: bytes.into(),
        }
    }
}

/// Check the filename suffix. Matching is case-sensitive: `photo.PNG` is rejected.
pub fn check_format(filename: &str) -> Result<ImageFormat, PipelineError> {
    if filename.ends_with(".png") {
        Ok(ImageFormat::Png)
    } else if filename.ends_with(".jpg") || filename.ends_with(".jpeg") {
        Ok(ImageFormat::Jpeg)
    } else {
        Err(PipelineError::UnsupportedFormat {
            filename: filename.to_string(),
        })
    }
}

/// Normalize label-source annotations into the detected label set.
pub fn detected_labels(annotations: &[LabelAnnotation]) -> LabelSet {
    annotations.iter().map(|a| a.description.as_str()).collect()
}

/// Metrics observer for pipeline stages.
pub trait PipelineMetrics: Send + Sync {
    fn record_labeling(&self, latency: Duration, result: Result<usize, &LabelError>);
    fn record_ranking(&self, latency: Duration, catalog_size: usize, matched: usize);
}

/// Install or clear the global pipeline metrics recorder.
pub fn set_pipeline_metrics(recorder: Option<Arc<dyn PipelineMetrics>>) {
    let mut guard = metrics_lock()
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = recorder;
}

fn metrics_lock() -> &'static RwLock<Option<Arc<dyn PipelineMetrics>>> {
    static METRICS: OnceLock<RwLock<Option<Arc<dyn PipelineMetrics>>>> = OnceLock::new();
    METRICS.get_or_init(|| RwLock::new(None))
}

fn metrics_recorder() -> Option<Arc<dyn PipelineMetrics>> {
    let guard = metrics_lock()
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    guard.clone()
}

struct MetricsSpan {
    recorder: Arc<dyn PipelineMetrics>,
    start: Instant,
}

impl MetricsSpan {
    fn start() -> Option<Self> {
        metrics_recorder().map(|recorder| Self {
            recorder,
            start: Instant::now(),
        })
    }

    fn record_labeling(self, result: Result<usize, &LabelError>) {
        self.recorder.record_labeling(self.start.elapsed(), result);
    }

    fn record_ranking(self, catalog_size: usize, matched: usize) {
        self.recorder
            .record_ranking(self.start.elapsed(), catalog_size, matched);
    }
}

/// Match an uploaded image against the catalog.
///
/// The filename is checked first; an unsupported format returns before the
/// label source is called. Label-source failures are returned unchanged and
/// never retried. Scoring itself cannot fail.
pub async fn match_image<'a>(
    source: &dyn LabelSource,
    catalog: &'a Catalog,
    upload: &ImageUpload,
) -> Result<RankedResults<'a>, PipelineError> {
    check_format(&upload.filename)?;

    let labeling_metrics = MetricsSpan::start();
    let annotations = match source.detect_labels(&upload.bytes).await {
        Ok(annotations) => {
            if let Some(span) = labeling_metrics {
                span.record_labeling(Ok(annotations.len()));
            }
            annotations
        }
        Err(err) => {
            if let Some(span) = labeling_metrics {
                span.record_labeling(Err(&err));
            }
            tracing::warn!(
                filename = %upload.filename,
                source = source.name(),
                error = %err,
                "label detection failed"
            );
            return Err(PipelineError::Labels(err));
        }
    };

    let detected = detected_labels(&annotations);
    tracing::info!(
        filename = %upload.filename,
        labels = ?detected.to_sorted_vec(),
        "detected labels"
    );

    let ranking_metrics = MetricsSpan::start();
    let results = rank(&detected, catalog);
    if let Some(span) = ranking_metrics {
        span.record_ranking(catalog.len(), results.len());
    }

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn catalog() -> Catalog {
        Catalog::from_json_value(json!([
            {"id": 1, "labels": ["dog", "animal"]},
            {"id": 2, "labels": ["cat", "animal"]},
            {"id": 3, "labels": ["car"]},
        ]))
        .unwrap()
    }

    #[test]
    fn check_format_accepts_supported_suffixes() {
        assert_eq!(check_format("a.png"), Ok(ImageFormat::Png));
        assert_eq!(check_format("a.jpg"), Ok(ImageFormat::Jpeg));
        assert_eq!(check_format("holiday.photo.jpeg"), Ok(ImageFormat::Jpeg));
    }

    #[test]
    fn check_format_is_case_sensitive() {
        assert!(check_format("a.PNG").is_err());
        assert!(check_format("a.Jpg").is_err());
    }

    #[test]
    fn check_format_rejects_other_suffixes() {
        for name in ["photo.gif", "photo.png.exe", "png", "", "photo.webp"] {
            let err = check_format(name).unwrap_err();
            assert_eq!(err.to_string(), UNSUPPORTED_FORMAT_MESSAGE, "{name}");
        }
    }

    #[test]
    fn detected_labels_normalize_and_dedupe() {
        let annotations = vec![
            LabelAnnotation { description: "Dog".into(), score: 0.9 },
            LabelAnnotation { description: "dog".into(), score: 0.8 },
            LabelAnnotation { description: "Snout".into(), score: 0.7 },
        ];
        assert_eq!(detected_labels(&annotations).to_sorted_vec(), vec!["dog", "snout"]);
    }

    #[tokio::test]
    async fn match_image_ranks_catalog() {
        let source = StaticLabelSource::with_labels(["Dog", "Animal", "Vehicle"]);
        let catalog = catalog();
        let upload = ImageUpload::new("dog.jpg", b"jpeg-bytes".to_vec());

        let results = match_image(&source, &catalog, &upload).await.unwrap();

        let ids: Vec<_> = results.iter().map(|r| r.product.id().cloned()).collect();
        assert_eq!(ids, vec![Some(json!(1)), Some(json!(2))]);
        assert_eq!(results[0].score, 1.0);
        assert_eq!(results[1].score, 0.5);
    }

    #[tokio::test]
    async fn unsupported_format_skips_label_source() {
        let source = StaticLabelSource::with_labels(["dog"]);
        let catalog = catalog();
        let upload = ImageUpload::new("photo.gif", b"gif".to_vec());

        let err = match_image(&source, &catalog, &upload).await.unwrap_err();

        assert!(matches!(err, PipelineError::UnsupportedFormat { ref filename } if filename == "photo.gif"));
        assert_eq!(source.calls(), 0);
    }

    #[tokio::test]
    async fn label_source_error_is_propagated_verbatim() {
        let source = StaticLabelSource::failing("Bad image data.");
        let catalog = catalog();
        let upload = ImageUpload::new("x.png", Vec::new());

        let err = match_image(&source, &catalog, &upload).await.unwrap_err();

        assert_eq!(err.to_string(), "Bad image data.");
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn no_detected_labels_gives_no_results() {
        let source = StaticLabelSource::with_labels(Vec::<String>::new());
        let catalog = catalog();
        let upload = ImageUpload::new("blank.png", Vec::new());

        assert!(match_image(&source, &catalog, &upload).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_catalog_gives_no_results() {
        let source = StaticLabelSource::with_labels(["dog"]);
        let catalog = Catalog::empty();
        let upload = ImageUpload::new("dog.png", Vec::new());

        assert!(match_image(&source, &catalog, &upload).await.unwrap().is_empty());
    }
}
