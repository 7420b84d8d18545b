use std::fs;
use std::io;
use std::path::Path;
use std::slice;

use serde_json::Value as JsonValue;
use thiserror::Error;

use crate::types::{LabelSet, Product};

/// Errors raised while reading the product catalog at startup.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// Top-level document is neither an array nor an object with a `products` array.
    #[error("unsupported catalog layout: {0}")]
    Layout(String),

    #[error("invalid product record at index {index}: {reason}")]
    InvalidRecord { index: usize, reason: String },
}

/// Read-only, ordered product catalog.
///
/// Built once at startup and shared by reference; there are no mutating
/// operations after construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_products(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// Build a catalog from a parsed JSON document.
    ///
    /// Accepts either a bare array of product records or an object holding
    /// that array under `products`.
    pub fn from_json_value(value: JsonValue) -> Result<Self, CatalogError> {
        let records = match value {
            JsonValue::Array(records) => records,
            JsonValue::Object(mut map) => match map.remove("products") {
                Some(JsonValue::Array(records)) => records,
                Some(other) => {
                    return Err(CatalogError::Layout(format!(
                        "`products` must be an array, found {}",
                        json_kind(&other)
                    )))
                }
                None => {
                    return Err(CatalogError::Layout(
                        "object catalog is missing the `products` key".into(),
                    ))
                }
            },
            other => {
                return Err(CatalogError::Layout(format!(
                    "expected an array or object, found {}",
                    json_kind(&other)
                )))
            }
        };

        let products = records
            .into_iter()
            .enumerate()
            .map(|(index, record)| parse_product(index, record))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { products })
    }

    pub fn from_json_str(text: &str) -> Result<Self, CatalogError> {
        Self::from_json_value(serde_json::from_str(text)?)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, Product> {
        self.products.iter()
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Product;
    type IntoIter = slice::Iter<'a, Product>;

    fn into_iter(self) -> Self::IntoIter {
        self.products.iter()
    }
}

/// Load the catalog from a JSON file.
///
/// A missing file yields an empty catalog so the service can still start.
/// Any other read or parse failure is an error.
pub fn load_catalog(path: impl AsRef<Path>) -> Result<Catalog, CatalogError> {
    let path = path.as_ref();
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            tracing::warn!(path = %path.display(), "catalog file not found, starting with an empty catalog");
            return Ok(Catalog::empty());
        }
        Err(source) => {
            return Err(CatalogError::Read {
                path: path.display().to_string(),
                source,
            })
        }
    };

    let catalog = Catalog::from_json_str(&text)?;
    tracing::info!(path = %path.display(), products = catalog.len(), "catalog loaded");
    Ok(catalog)
}

fn parse_product(index: usize, record: JsonValue) -> Result<Product, CatalogError> {
    let Some(fields) = record.as_object() else {
        return Err(CatalogError::InvalidRecord {
            index,
            reason: format!("expected an object, found {}", json_kind(&record)),
        });
    };

    let labels = match fields.get("labels") {
        None | Some(JsonValue::Null) => {
            tracing::warn!(index, "product has no labels and will never match");
            LabelSet::new()
        }
        Some(JsonValue::Array(items)) => {
            let mut labels = LabelSet::new();
            for item in items {
                let Some(text) = item.as_str() else {
                    return Err(CatalogError::InvalidRecord {
                        index,
                        reason: format!("labels must be strings, found {}", json_kind(item)),
                    });
                };
                labels.insert_raw(text);
            }
            labels
        }
        Some(other) => {
            return Err(CatalogError::InvalidRecord {
                index,
                reason: format!("`labels` must be an array, found {}", json_kind(other)),
            })
        }
    };

    Ok(Product::new(record, labels))
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bare_array_layout() {
        let catalog = Catalog::from_json_value(json!([
            {"id": 1, "labels": ["dog"]},
            {"id": 2, "labels": ["cat"]},
        ]))
        .unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.products()[1].id(), Some(&json!(2)));
    }

    #[test]
    fn wrapped_products_layout() {
        let catalog =
            Catalog::from_json_value(json!({"products": [{"id": 7, "labels": ["Shoe"]}]})).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.products()[0].labels().to_sorted_vec(), vec!["shoe"]);
    }

    #[test]
    fn payload_is_kept_verbatim() {
        let record = json!({"id": 3, "name": "Red Mug", "price": 9.5, "labels": ["Mug", "red"]});
        let catalog = Catalog::from_json_value(json!([record.clone()])).unwrap();
        assert_eq!(catalog.products()[0].payload(), &record);
    }

    #[test]
    fn missing_labels_gives_empty_set() {
        let catalog = Catalog::from_json_value(json!([{"id": 1}])).unwrap();
        assert!(catalog.products()[0].labels().is_empty());
    }

    #[test]
    fn object_without_products_key_is_rejected() {
        let err = Catalog::from_json_value(json!({"items": []})).unwrap_err();
        assert!(matches!(err, CatalogError::Layout(_)));
    }

    #[test]
    fn scalar_document_is_rejected() {
        let err = Catalog::from_json_value(json!(42)).unwrap_err();
        assert!(err.to_string().contains("a number"));
    }

    #[test]
    fn non_string_label_is_rejected() {
        let err = Catalog::from_json_value(json!([{"id": 1, "labels": ["ok"]}, {"labels": [1]}]))
            .unwrap_err();
        assert!(matches!(err, CatalogError::InvalidRecord { index: 1, .. }));
    }

    #[test]
    fn non_object_record_is_rejected() {
        let err = Catalog::from_json_value(json!(["dog"])).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidRecord { index: 0, .. }));
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let err = Catalog::from_json_str("[{").unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)));
    }
}
