//! Catalog product types.

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::patch::Patch;

/// A catalog product as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub in_stock: bool,
}

/// Payload for creating a product (every field except the generated id).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,
}

const fn default_in_stock() -> bool {
    true
}

impl NewProduct {
    /// Create a payload with the required fields; everything else takes its default.
    #[must_use]
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            description: None,
            price,
            category: None,
            image_url: None,
            in_stock: default_in_stock(),
        }
    }

    /// Attach the generated id.
    #[must_use]
    pub fn into_product(self, id: ProductId) -> Product {
        Product {
            id,
            name: self.name,
            description: self.description,
            price: self.price,
            category: self.category,
            image_url: self.image_url,
            in_stock: self.in_stock,
        }
    }
}

/// Partial update for a product.
///
/// Only fields that are [`Patch::Present`] are written. `description`,
/// `category` and `image_url` accept an explicit `null` to clear the value;
/// `name`, `price` and `in_stock` cannot be null.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductPatch {
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub name: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub description: Patch<Option<String>>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub price: Patch<f64>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub category: Patch<Option<String>>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub image_url: Patch<Option<String>>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub in_stock: Patch<bool>,
}

impl ProductPatch {
    /// Returns `true` if no field is present.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_absent()
            && self.description.is_absent()
            && self.price.is_absent()
            && self.category.is_absent()
            && self.image_url.is_absent()
            && self.in_stock.is_absent()
    }

    /// Merge the present fields into `product`.
    pub fn apply(self, product: &mut Product) {
        self.name.apply_to(&mut product.name);
        self.description.apply_to(&mut product.description);
        self.price.apply_to(&mut product.price);
        self.category.apply_to(&mut product.category);
        self.image_url.apply_to(&mut product.image_url);
        self.in_stock.apply_to(&mut product.in_stock);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample() -> Product {
        Product {
            id: ProductId::new(1),
            name: "Bồn cầu một khối".to_owned(),
            description: Some("Men sứ cao cấp".to_owned()),
            price: 4_500_000.0,
            category: Some("Bồn cầu".to_owned()),
            image_url: None,
            in_stock: true,
        }
    }

    #[test]
    fn test_new_product_defaults() {
        let payload: NewProduct =
            serde_json::from_str(r#"{"name": "Lavabo", "price": 1200000}"#).unwrap();
        assert_eq!(payload, NewProduct::new("Lavabo", 1_200_000.0));
        assert!(payload.in_stock);
        assert!(payload.description.is_none());
    }

    #[test]
    fn test_new_product_requires_name_and_price() {
        assert!(serde_json::from_str::<NewProduct>(r#"{"price": 1}"#).is_err());
        assert!(serde_json::from_str::<NewProduct>(r#"{"name": "x"}"#).is_err());
    }

    #[test]
    fn test_price_only_patch_leaves_other_fields() {
        let mut product = sample();
        let patch: ProductPatch = serde_json::from_str(r#"{"price": 3900000}"#).unwrap();
        patch.apply(&mut product);

        let expected = Product {
            price: 3_900_000.0,
            ..sample()
        };
        assert_eq!(product, expected);
    }

    #[test]
    fn test_null_clears_nullable_field() {
        let mut product = sample();
        let patch: ProductPatch = serde_json::from_str(r#"{"description": null}"#).unwrap();
        patch.apply(&mut product);

        assert_eq!(product.description, None);
        assert_eq!(product.name, sample().name);
    }

    #[test]
    fn test_null_name_is_rejected() {
        assert!(serde_json::from_str::<ProductPatch>(r#"{"name": null}"#).is_err());
    }

    #[test]
    fn test_empty_patch() {
        let patch: ProductPatch = serde_json::from_str("{}").unwrap();
        assert!(patch.is_empty());

        let mut product = sample();
        patch.apply(&mut product);
        assert_eq!(product, sample());
    }

    #[test]
    fn test_product_serializes_nulls() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["id"], 1);
        assert!(json["image_url"].is_null());
        assert_eq!(json["in_stock"], true);
    }
}
