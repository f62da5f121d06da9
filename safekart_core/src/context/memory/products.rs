// Copyright 2024-, SafeKart contributors.
// SPDX-License-Identifier: Apache-2.0

use safekart_model::Product;

#[allow(clippy::too_many_arguments)]
fn product(
    id: u32,
    name: &str,
    brand: &str,
    price_inr: u32,
    rating: f32,
    image: &str,
    category: &str,
    description: &str,
) -> Product {
    Product {
        id,
        name: name.to_string(),
        brand: brand.to_string(),
        price_inr,
        rating,
        verified: true,
        image: image.to_string(),
        category: category.to_string(),
        description: description.to_string(),
    }
}

/// The verified products of the demo catalog, in display order
pub(super) fn demo_products() -> Vec<Product> {
    vec![
        product(
            1,
            "Organic Honey",
            "Pure Nature",
            299,
            4.8,
            "🍯",
            "Food & Beverages",
            "100% pure organic honey with certification",
        ),
        product(
            2,
            "Wireless Earbuds",
            "TechSound Pro",
            2_499,
            4.6,
            "🎧",
            "Electronics",
            "Premium wireless earbuds with noise cancellation",
        ),
        product(
            3,
            "Vitamin D3 Tablets",
            "HealthFirst",
            599,
            4.9,
            "💊",
            "Health & Wellness",
            "Doctor recommended vitamin D3 supplements",
        ),
        product(
            4,
            "Cotton T-Shirt",
            "EcoWear",
            899,
            4.5,
            "👕",
            "Clothing",
            "100% organic cotton, sustainable fashion",
        ),
        product(
            5,
            "Green Tea",
            "Wellness Tea Co.",
            450,
            4.7,
            "🍵",
            "Food & Beverages",
            "Premium green tea leaves, antioxidant rich",
        ),
        product(
            6,
            "Smartphone Case",
            "ProtectPro",
            799,
            4.4,
            "📱",
            "Accessories",
            "Military grade protection for your device",
        ),
    ]
}
