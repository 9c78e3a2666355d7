//! Product form fields and their validation into a [MutationPayload].

use storefront_catalog::{CategoryId, MutationPayload, Product};
use thiserror::Error;

/// A local form constraint was violated. No request is sent.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("price '{0}' is not a number")]
    InvalidPrice(String),
    #[error("price must not be negative")]
    NegativePrice,
    #[error("category '{0}' is not a valid category id")]
    InvalidCategory(String),
    #[error("at least one image URL is required")]
    NoImages,
}

/// The raw text of a create/update form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductForm {
    pub title: String,
    pub price: String,
    pub description: String,
    pub category_id: String,
    /// Comma separated image URLs.
    pub images: String,
}

impl ProductForm {
    /// An empty form preselecting `category`.
    pub fn new(category: Option<CategoryId>) -> Self {
        Self {
            category_id: category.map(|id| id.to_string()).unwrap_or_default(),
            ..Default::default()
        }
    }

    /// A form prefilled with an existing product.
    pub fn from_product(product: &Product) -> Self {
        Self {
            title: product.title.clone(),
            price: product.price.to_string(),
            description: product.description.clone(),
            category_id: product.category.id.to_string(),
            images: product.images.join(", "),
        }
    }

    /// Validate the form and build the request body.
    pub fn parse(&self) -> Result<MutationPayload, ValidationError> {
        let title = required("title", &self.title)?;
        let price = required("price", &self.price)?;
        let description = required("description", &self.description)?;
        let category_id = required("category", &self.category_id)?;
        required("images", &self.images)?;

        let price = parse_price(price)?;
        let category_id = category_id
            .trim()
            .parse::<CategoryId>()
            .map_err(|_| ValidationError::InvalidCategory(category_id.trim().to_string()))?;
        let images = parse_images(&self.images);
        if images.is_empty() {
            return Err(ValidationError::NoImages);
        }

        Ok(MutationPayload {
            title: title.to_string(),
            price,
            description: description.to_string(),
            category_id,
            images,
        })
    }
}

fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str, ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(value)
}

fn parse_price(price: &str) -> Result<f64, ValidationError> {
    let price = price.trim();
    let parsed = price
        .parse::<f64>()
        .ok()
        .filter(|p| p.is_finite())
        .ok_or_else(|| ValidationError::InvalidPrice(price.to_string()))?;
    if parsed < 0.0 {
        return Err(ValidationError::NegativePrice);
    }
    Ok(parsed)
}

/// Split a comma separated list of image URLs,
/// trimming each entry and dropping empty ones.
pub fn parse_images(images: &str) -> Vec<String> {
    images
        .split(',')
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(String::from)
        .collect()
}
