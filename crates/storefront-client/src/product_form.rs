//! Product edit form with inline field validation

use std::{collections::BTreeMap, fmt, str::FromStr};

use serde_json::Value;
use storefront_core::{Error, Result, types::Product};
use tracing::{debug, info};

use crate::api_client::BackendClient;

/// Editable product field
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProductField {
    /// Product name
    Name,
    /// Long description
    Description,
    /// Price
    Price,
    /// Category name
    Category,
    /// Brand
    Brand,
    /// Stock keeping unit
    Sku,
    /// Units in stock
    QuantityInStock,
    /// Discount in percent
    DiscountPercentage,
}

impl ProductField {
    /// Key used in error maps and on the command line
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Description => "description",
            Self::Price => "price",
            Self::Category => "category",
            Self::Brand => "brand",
            Self::Sku => "sku",
            Self::QuantityInStock => "quantityInStock",
            Self::DiscountPercentage => "discountPercentage",
        }
    }

    const ALL: [Self; 8] = [
        Self::Name,
        Self::Description,
        Self::Price,
        Self::Category,
        Self::Brand,
        Self::Sku,
        Self::QuantityInStock,
        Self::DiscountPercentage,
    ];
}

impl fmt::Display for ProductField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ProductField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|field| field.key().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::validation("field", format!("unknown product field '{s}'")))
    }
}

/// Per-field validation messages
pub type FieldErrors = BTreeMap<ProductField, String>;

/// Draft of a product being edited
#[derive(Debug, Clone)]
pub struct ProductForm {
    original: Product,
    draft: Product,
    errors: FieldErrors,
}

impl ProductForm {
    /// Start editing a fetched product
    #[must_use]
    pub fn new(product: Product) -> Self {
        Self {
            draft: product.clone(),
            original: product,
            errors: FieldErrors::new(),
        }
    }

    /// Fetch a product and start editing it
    ///
    /// # Errors
    ///
    /// Returns an error if the product cannot be fetched.
    pub async fn load(client: &BackendClient, product_id: &str) -> Result<Self> {
        client.get_product(product_id).await.map(Self::new)
    }

    /// Current draft
    #[must_use]
    pub const fn draft(&self) -> &Product {
        &self.draft
    }

    /// Messages from the last validation, minus fields edited since
    #[must_use]
    pub const fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Whether the draft differs from the fetched product
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.draft != self.original
    }

    /// Set a field from its textual form
    ///
    /// Editing a field clears its validation message.
    ///
    /// # Errors
    ///
    /// Returns a validation error when a numeric field is given text that
    /// is not a number.
    pub fn set(&mut self, field: ProductField, value: &str) -> Result<()> {
        let text = || (!value.is_empty()).then(|| value.to_string());

        match field {
            ProductField::Name => self.draft.name = value.to_string(),
            ProductField::Description => self.draft.description = text(),
            ProductField::Price => self.draft.price = text(),
            ProductField::Category => self.draft.category = text(),
            ProductField::Brand => self.draft.brand = text(),
            ProductField::Sku => self.draft.sku = text(),
            ProductField::QuantityInStock => {
                self.draft.quantity_in_stock = parse_optional(field, value)?;
            }
            ProductField::DiscountPercentage => {
                self.draft.discount_percentage = parse_optional(field, value)?;
            }
        }

        self.errors.remove(&field);
        Ok(())
    }

    /// Check the required fields and remember the messages
    ///
    /// Name and description must be present and the price must be a number.
    pub fn validate(&mut self) -> &FieldErrors {
        let mut errors = FieldErrors::new();

        if self.draft.name.trim().is_empty() {
            errors.insert(ProductField::Name, "Name is required".to_string());
        }
        if self
            .draft
            .description
            .as_deref()
            .is_none_or(|d| d.trim().is_empty())
        {
            errors.insert(ProductField::Description, "Description is required".to_string());
        }
        let price_ok = self
            .draft
            .price
            .as_deref()
            .and_then(|p| p.trim().parse::<f64>().ok())
            .is_some_and(f64::is_finite);
        if !price_ok {
            errors.insert(ProductField::Price, "Valid price is required".to_string());
        }

        if !errors.is_empty() {
            debug!(fields = ?errors.keys().collect::<Vec<_>>(), "Product form is invalid");
        }
        self.errors = errors;
        &self.errors
    }

    /// Throw away every edit
    pub fn discard(&mut self) {
        self.draft = self.original.clone();
        self.errors.clear();
    }

    /// Validate and send the draft on behalf of `admin_id`
    ///
    /// Nothing is sent while any field is invalid.
    ///
    /// # Errors
    ///
    /// Returns the first field's validation error, or the backend error of
    /// the update call.
    pub async fn submit(&mut self, client: &BackendClient, admin_id: &str) -> Result<Value> {
        if let Some((field, message)) = self.validate().iter().next() {
            return Err(Error::validation(field.key(), message.clone()));
        }

        let response = client
            .update_product(admin_id, &self.draft.id, &self.draft)
            .await?;
        info!(product_id = %self.draft.id, "Product updated");
        self.original = self.draft.clone();
        Ok(response)
    }
}

fn parse_optional<T: FromStr>(field: ProductField, value: &str) -> Result<Option<T>> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse()
        .map(Some)
        .map_err(|_| Error::validation(field.key(), format!("'{value}' is not a number")))
}
