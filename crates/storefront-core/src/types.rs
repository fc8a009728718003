//! Data-transfer types for the storefront backend endpoints
//!
//! Responses are parsed into these types at the client boundary. Fields the
//! dashboard does not interpret are kept in `extra` maps so that an edited
//! record can be sent back without losing data.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::{fmt, str::FromStr};
use validator::Validate;

use crate::listing::Listable;

/// Accept a string, a number, or an object carrying a `name`
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Object(map)) => map.get("name").and_then(Value::as_str).map(str::to_string),
        _ => None,
    })
}

/// Identifiers arrive as strings from the backend but as numbers from older fixtures
fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number identifier, got {other}"
        ))),
    }
}

/// Authenticated administrator identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminUser {
    /// Backend identifier
    #[serde(rename = "_id", alias = "id", deserialize_with = "id_string")]
    pub id: String,

    /// Display name
    #[serde(default, alias = "displayName")]
    pub name: String,

    /// Email address
    #[serde(default)]
    pub email: String,
}

/// Credentials sent to the login endpoint
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,

    /// Password
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

impl LoginRequest {
    /// Build a login request
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Successful login payload: a token plus the user fields at the top level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Opaque bearer token
    #[serde(default)]
    pub token: String,

    /// Identity of the logged-in administrator
    #[serde(flatten)]
    pub user: AdminUser,
}

/// Stock held for a product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryLevel {
    /// Units on hand
    pub quantity: u32,
    /// Unit the quantity is counted in
    pub unit: InventoryUnit,
    /// Total pieces across all units
    pub total: u32,
}

/// Units an inventory level can be counted in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum InventoryUnit {
    Pieces,
    Bottles,
    Cans,
    Kg,
    Grams,
    Tubes,
    Cartons,
}

impl InventoryUnit {
    /// Every unit, in the order the inventory table offers them
    pub const ALL: [Self; 7] = [
        Self::Pieces,
        Self::Bottles,
        Self::Cans,
        Self::Kg,
        Self::Grams,
        Self::Tubes,
        Self::Cartons,
    ];

    /// Label shown in the unit selector
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pieces => "Pieces",
            Self::Bottles => "Bottles",
            Self::Cans => "Cans",
            Self::Kg => "Kg",
            Self::Grams => "Grams",
            Self::Tubes => "Tubes",
            Self::Cartons => "Cartons",
        }
    }
}

impl fmt::Display for InventoryUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for InventoryUnit {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        Self::ALL
            .into_iter()
            .find(|unit| unit.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| crate::Error::validation("unit", format!("unknown unit '{s}'")))
    }
}

/// Product record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Backend identifier
    #[serde(rename = "_id", alias = "id", deserialize_with = "id_string")]
    pub id: String,

    /// Product name
    pub name: String,

    /// Long description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Price as entered, either plain or currency formatted
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,

    /// Category name
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Brand
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,

    /// Stock keeping unit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,

    /// Units in stock
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity_in_stock: Option<i64>,

    /// Main image URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_image: Option<String>,

    /// Discount in percent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_percentage: Option<f64>,

    /// Warehouse stock level
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inventory: Option<InventoryLevel>,

    /// Fields passed through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Product category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Backend identifier
    #[serde(rename = "_id", alias = "id", deserialize_with = "id_string")]
    pub id: String,

    /// Category name
    pub name: String,

    /// Description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Order status as reported by the backend
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
#[allow(missing_docs)]
pub enum OrderStatus {
    #[default]
    Pending,
    Completed,
    Shipped,
    Dispatched,
    Delivered,
    Cancelled,
    Returned,
    /// Status the dashboard does not know about
    Other(String),
}

impl OrderStatus {
    /// Label shown in the status column
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Pending => "Pending",
            Self::Completed => "Completed",
            Self::Shipped => "Shipped",
            Self::Dispatched => "Dispatched",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
            Self::Returned => "Returned",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for OrderStatus {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Self::Pending,
            "completed" => Self::Completed,
            "shipped" => Self::Shipped,
            "dispatched" => Self::Dispatched,
            "delivered" => Self::Delivered,
            "cancelled" | "canceled" => Self::Cancelled,
            "returned" => Self::Returned,
            _ => Self::Other(value),
        }
    }
}

impl From<OrderStatus> for String {
    fn from(status: OrderStatus) -> Self {
        status.label().to_string()
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Customer order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Backend identifier
    #[serde(rename = "_id", alias = "id", deserialize_with = "id_string")]
    pub id: String,

    /// Human-facing order number
    #[serde(default)]
    pub order_number: Option<String>,

    /// Name of the ordered product
    #[serde(default)]
    pub product_name: Option<String>,

    /// Customer name; the order table searches on this
    pub customer: String,

    /// Order date as sent by the backend
    #[serde(default)]
    pub date: Option<String>,

    /// Order total, plain or currency formatted
    #[serde(default, deserialize_with = "lenient_string")]
    pub total: Option<String>,

    /// Payment status
    #[serde(default)]
    pub status: OrderStatus,

    /// Number of items
    #[serde(default, alias = "item")]
    pub items: Option<u32>,

    /// Delivery method
    #[serde(default)]
    pub delivery: Option<String>,
}

/// Registered customer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// Backend identifier, when the backend sends one
    #[serde(default, rename = "_id", alias = "id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Full name
    pub name: String,

    /// Email address
    #[serde(default)]
    pub email: String,

    /// Phone number
    #[serde(default)]
    pub phone: String,
}

/// Marketplace vendor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vendor {
    /// Backend identifier
    #[serde(rename = "_id", alias = "id", deserialize_with = "id_string")]
    pub id: String,

    /// Vendor name
    pub name: String,

    /// Contact email
    #[serde(default)]
    pub email: Option<String>,

    /// Contact phone
    #[serde(default)]
    pub phone: Option<String>,
}

/// Promotional slides curated from the product catalogue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SlideKind {
    /// "Best Sellers" carousel
    BestSellers,
    /// "Featured" carousel
    Featured,
    /// "New In" carousel
    NewIn,
}

impl SlideKind {
    /// Every slide, in menu order
    pub const ALL: [Self; 3] = [Self::NewIn, Self::BestSellers, Self::Featured];

    /// Backend path holding the slide's selection
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::BestSellers => "bestsellers",
            Self::Featured => "feature",
            Self::NewIn => "in",
        }
    }

    /// Heading shown above the slide editor
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::BestSellers => "Best Sellers",
            Self::Featured => "Featured",
            Self::NewIn => "New In",
        }
    }

    const fn slug(self) -> &'static str {
        match self {
            Self::BestSellers => "best-sellers",
            Self::Featured => "featured",
            Self::NewIn => "new-in",
        }
    }
}

impl fmt::Display for SlideKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for SlideKind {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.slug() == s || kind.path() == s)
            .ok_or_else(|| crate::Error::validation("slide", format!("unknown slide '{s}'")))
    }
}

/// Request body replacing a slide's selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideSelection {
    /// Selected product identifiers, in display order
    #[serde(rename = "productIds")]
    pub product_ids: Vec<String>,
}

/// Extract product identifiers from a slide selection response
///
/// Entries come either wrapped (`{"product": {"_id": ..}}`) or bare
/// (`{"_id": ..}`); anything else is skipped.
#[must_use]
pub fn parse_selection_ids(value: &Value) -> Vec<String> {
    let Some(entries) = value.as_array() else {
        tracing::warn!(response = %value, "Unexpected slide selection format");
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|entry| {
            let id = entry
                .get("product")
                .and_then(|product| product.get("_id"))
                .or_else(|| entry.get("_id"))
                .and_then(Value::as_str);
            if id.is_none() {
                tracing::debug!(entry = %entry, "Skipping slide entry without an identifier");
            }
            id.map(str::to_string)
        })
        .collect()
}

impl Listable for Product {
    fn id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.name
    }
}

impl Listable for Category {
    fn id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.name
    }
}

impl Listable for Order {
    fn id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.customer
    }
}

impl Listable for Customer {
    fn id(&self) -> &str {
        self.id.as_deref().unwrap_or(&self.name)
    }

    fn display_name(&self) -> &str {
        &self.name
    }
}

impl Listable for Vendor {
    fn id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.name
    }
}
