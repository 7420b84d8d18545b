use super::*;
use crate::types::Product;
use serde_json::json;

fn labels(raw: &[&str]) -> LabelSet {
    raw.iter().collect()
}

fn product(id: u32, raw: &[&str]) -> Product {
    Product::new(json!({"id": id, "labels": raw}), labels(raw))
}

fn ids(results: &RankedResults<'_>) -> Vec<u64> {
    results
        .iter()
        .map(|r| r.product.id().and_then(|v| v.as_u64()).unwrap())
        .collect()
}

#[test]
fn normalize_lowercases_only() {
    assert_eq!(normalize("Dog"), normalize("dog"));
    assert_eq!(normalize("Dog").as_str(), "dog");
    assert_eq!(normalize(" Dog ").as_str(), " dog ");
    assert_ne!(normalize("cars"), normalize("car"));
    assert_ne!(normalize("dog"), normalize("puppy"));
}

#[test]
fn normalize_handles_unicode() {
    assert_eq!(normalize("ÉCLAIR").as_str(), "éclair");
}

#[test]
fn score_full_overlap_is_one() {
    let detected = labels(&["dog", "animal", "vehicle"]);
    assert_eq!(score(&detected, &labels(&["dog", "animal"])), 1.0);
}

#[test]
fn score_partial_overlap() {
    let detected = labels(&["dog", "animal"]);
    assert_eq!(score(&detected, &labels(&["cat", "animal"])), 0.5);

    let third = score(&detected, &labels(&["dog", "leash", "collar"]));
    assert!((third - 1.0 / 3.0).abs() < 1e-12);
}

#[test]
fn score_empty_product_labels_is_zero() {
    assert_eq!(score(&labels(&["dog"]), &LabelSet::new()), 0.0);
    assert_eq!(score(&LabelSet::new(), &LabelSet::new()), 0.0);
}

#[test]
fn score_empty_detected_is_zero() {
    assert_eq!(score(&LabelSet::new(), &labels(&["dog", "cat"])), 0.0);
}

#[test]
fn score_is_asymmetric() {
    let small = labels(&["dog"]);
    let large = labels(&["dog", "animal", "pet", "mammal"]);
    assert_eq!(score(&large, &small), 1.0);
    assert_eq!(score(&small, &large), 0.25);
}

#[test]
fn score_ignores_duplicates_and_order() {
    let a = score(&labels(&["dog", "dog", "Dog", "animal"]), &labels(&["animal", "cat"]));
    let b = score(&labels(&["animal", "dog"]), &labels(&["cat", "animal", "Cat"]));
    assert_eq!(a, b);
    assert_eq!(a, 0.5);
}

#[test]
fn score_is_one_only_for_subsets() {
    let detected = labels(&["a", "b", "c"]);
    let cases = vec![
        (vec!["a"], true),
        (vec!["a", "b", "c"], true),
        (vec!["a", "d"], false),
        (vec!["d"], false),
    ];
    for (product_labels, subset) in cases {
        let s = score(&detected, &labels(&product_labels));
        assert_eq!(s == 1.0, subset, "labels {product_labels:?}");
        assert!((0.0..=1.0).contains(&s));
    }
}

#[test]
fn rank_reference_catalog() {
    let catalog = Catalog::from_products(vec![
        product(1, &["dog", "animal"]),
        product(2, &["cat", "animal"]),
        product(3, &["car"]),
    ]);
    let detected = labels(&["dog", "animal", "vehicle"]);

    let ranked = rank(&detected, &catalog);

    assert_eq!(ids(&ranked), vec![1, 2]);
    assert_eq!(ranked[0].score, 1.0);
    assert_eq!(ranked[1].score, 0.5);
}

#[test]
fn rank_empty_catalog() {
    let catalog = Catalog::empty();
    assert!(rank(&labels(&["dog"]), &catalog).is_empty());
}

#[test]
fn rank_empty_detected_yields_nothing() {
    let catalog = Catalog::from_products(vec![product(1, &["dog"]), product(2, &["cat"])]);
    assert!(rank(&LabelSet::new(), &catalog).is_empty());
}

#[test]
fn rank_skips_products_without_labels() {
    let catalog = Catalog::from_products(vec![product(1, &[]), product(2, &["dog"])]);
    let ranked = rank(&labels(&["dog"]), &catalog);
    assert_eq!(ids(&ranked), vec![2]);
}

#[test]
fn rank_is_stable_on_ties() {
    let catalog = Catalog::from_products(vec![
        product(10, &["dog", "x"]),
        product(11, &["dog"]),
        product(12, &["cat", "y"]),
        product(13, &["dog", "z"]),
        product(14, &["cat"]),
    ]);
    let detected = labels(&["dog", "cat"]);

    let ranked = rank(&detected, &catalog);

    // 1.0 scores keep catalog order (11 then 14), then the 0.5 scores (10, 12, 13).
    assert_eq!(ids(&ranked), vec![11, 14, 10, 12, 13]);
}

#[test]
fn rank_output_is_sorted_and_positive() {
    let catalog = Catalog::from_products(
        (0..50)
            .map(|i| {
                let tags: Vec<String> = (0..=(i % 5)).map(|j| format!("t{}", (i + j) % 7)).collect();
                let refs: Vec<&str> = tags.iter().map(String::as_str).collect();
                product(i, &refs)
            })
            .collect(),
    );
    let detected = labels(&["t0", "t3", "t5"]);

    let ranked = rank(&detected, &catalog);

    assert!(!ranked.is_empty());
    assert!(ranked.iter().all(|r| r.score > 0.0 && r.score <= 1.0));
    assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));
}

#[test]
fn match_result_serializes_payload_and_score() {
    let catalog = Catalog::from_products(vec![product(1, &["dog"])]);
    let ranked = rank(&labels(&["dog"]), &catalog);

    let value = serde_json::to_value(&ranked).unwrap();

    assert_eq!(
        value,
        json!([{"product": {"id": 1, "labels": ["dog"]}, "similarity_score": 1.0}])
    );
}
