// Copyright 2024-, SafeKart contributors.
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

/// A product of the trusted inventory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: u32,
    pub name: String,
    pub brand: String,
    /// Price in whole rupees
    pub price_inr: u32,
    pub rating: f32,
    pub verified: bool,
    pub image: String,
    pub category: String,
    pub description: String,
}

impl Product {
    /// Case-insensitive substring match over name, brand, category and description.
    ///
    /// `needle` must already be lower-cased.
    pub fn matches(&self, needle: &str) -> bool {
        [&self.name, &self.brand, &self.category, &self.description]
            .iter()
            .any(|haystack| haystack.to_lowercase().contains(needle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn honey() -> Product {
        Product {
            id: 1,
            name: "Organic Honey".to_string(),
            brand: "Pure Nature".to_string(),
            price_inr: 299,
            rating: 4.8,
            verified: true,
            image: "🍯".to_string(),
            category: "Food & Beverages".to_string(),
            description: "100% pure organic honey with certification".to_string(),
        }
    }

    #[test]
    fn matches_any_text_field() {
        let product = honey();
        assert!(product.matches("honey"));
        assert!(product.matches("pure nature"));
        assert!(product.matches("beverages"));
        assert!(product.matches("certification"));
        assert!(!product.matches("earbuds"));
    }
}
