use crate::catalog::Catalog;
use crate::types::{Label, LabelSet, MatchResult, RankedResults};

#[cfg(test)]
mod tests;

/// Convert raw label text into the canonical form used for comparison.
///
/// Only lower-casing is applied: no trimming, stemming or synonym expansion.
/// `"Dog"` and `"dog"` collapse, `"car"` and `"cars"` stay distinct.
pub fn normalize(raw: &str) -> Label {
    Label::from_normalized(raw.to_lowercase())
}

/// Fraction of the product's labels that were also detected.
///
/// The measure is asymmetric: detected labels the product does not claim are
/// ignored, so a large detected set is never penalized. An empty product label
/// set scores `0.0`.
pub fn score(detected: &LabelSet, product: &LabelSet) -> f64 {
    if product.is_empty() {
        return 0.0;
    }
    detected.overlap(product) as f64 / product.len() as f64
}

/// Score every catalog product and return those with a positive score.
///
/// Results are sorted by descending score. The sort is stable, so products
/// with equal scores keep their catalog order.
pub fn rank<'a>(detected: &LabelSet, catalog: &'a Catalog) -> RankedResults<'a> {
    let mut results: RankedResults<'a> = catalog
        .iter()
        .filter_map(|product| {
            let score = score(detected, product.labels());
            (score > 0.0).then_some(MatchResult { product, score })
        })
        .collect();

    results.sort_by(|a, b| b.score.total_cmp(&a.score));

    tracing::debug!(
        catalog_size = catalog.len(),
        detected = detected.len(),
        matched = results.len(),
        "ranked catalog"
    );

    results
}
