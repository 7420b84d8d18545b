use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::{LabelAnnotation, LabelError, LabelSource};

/// Deterministic label source returning a fixed answer.
///
/// Used for offline runs (`mode = "static"`) and in tests. Every call is
/// counted so callers can assert whether the source was consulted at all.
#[derive(Debug)]
pub struct StaticLabelSource {
    outcome: Result<Vec<LabelAnnotation>, LabelError>,
    calls: AtomicUsize,
}

impl StaticLabelSource {
    /// Always answer with `labels`, each with full confidence.
    pub fn with_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let labels = labels
            .into_iter()
            .map(|description| LabelAnnotation {
                description: description.into(),
                score: 1.0,
            })
            .collect();
        Self {
            outcome: Ok(labels),
            calls: AtomicUsize::new(0),
        }
    }

    /// Always fail with a service-level error carrying `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            outcome: Err(LabelError::Service(message.into())),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of times [`detect_labels`](LabelSource::detect_labels) has been invoked.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LabelSource for StaticLabelSource {
    fn name(&self) -> &str {
        "static"
    }

    async fn detect_labels(&self, _image: &[u8]) -> Result<Vec<LabelAnnotation>, LabelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone()
    }
}
