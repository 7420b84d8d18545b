//! # VPM Matcher (`matcher`)
//!
//! ## Purpose
//!
//! `matcher` is the scoring core of the visual product matcher. Given the
//! labels an image-labeling service detected on an uploaded image, it scores
//! every product of a read-only catalog by label overlap and returns the
//! matching products best-first.
//!
//! ## Core Types
//!
//! - [`Label`]: a lower-cased text token, produced by [`normalize`].
//! - [`LabelSet`]: unordered set of labels with set semantics.
//! - [`Product`]: opaque JSON record plus its label set.
//! - [`Catalog`]: ordered, immutable list of products loaded with [`load_catalog`].
//! - [`MatchResult`] / [`RankedResults`]: products paired with their score.
//!
//! ## Scoring
//!
//! [`score`] is the fraction of a product's labels that were detected:
//! `|detected ∩ product| / |product|`, or `0.0` for a product without labels.
//! [`rank`] drops zero scores and stable-sorts the rest by descending score.
//!
//! ## Example Usage
//!
//! ```
//! use matcher::{rank, Catalog, LabelSet};
//! use serde_json::json;
//!
//! let catalog = Catalog::from_json_value(json!([
//!     {"id": 1, "labels": ["dog", "animal"]},
//!     {"id": 2, "labels": ["cat", "animal"]},
//!     {"id": 3, "labels": ["car"]},
//! ]))
//! .expect("catalog");
//!
//! let detected: LabelSet = ["Dog", "Animal", "Vehicle"].into_iter().collect();
//! let ranked = rank(&detected, &catalog);
//!
//! assert_eq!(ranked.len(), 2);
//! assert_eq!(ranked[0].score, 1.0);
//! assert_eq!(ranked[1].score, 0.5);
//! ```

pub mod catalog;
pub mod engine;
pub mod types;

pub use crate::catalog::{load_catalog, Catalog, CatalogError};
pub use crate::engine::{normalize, rank, score};
pub use crate::types::{Label, LabelSet, MatchResult, Product, RankedResults};
