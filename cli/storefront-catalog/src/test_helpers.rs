//! Fixtures shared by the test suites of this crate and its consumers.

use crate::types::{Category, CategoryId, Product, ProductId};

pub fn category(id: u64, name: &str) -> Category {
    Category {
        id: CategoryId::from(id),
        name: name.to_string(),
        slug: None,
        image: None,
    }
}

pub fn product(id: u64, category_id: u64) -> Product {
    Product {
        id: ProductId::from(id),
        title: format!("Product {id}"),
        price: 10.0,
        description: format!("Description of product {id}"),
        images: vec![format!("https://i.imgur.com/{id}.jpeg")],
        category: category(category_id, &format!("Category {category_id}")),
        slug: None,
    }
}

/// `count` products of one category with consecutive ids starting at `first_id`.
pub fn products(first_id: u64, count: usize, category_id: u64) -> Vec<Product> {
    (first_id..)
        .take(count)
        .map(|id| product(id, category_id))
        .collect()
}
