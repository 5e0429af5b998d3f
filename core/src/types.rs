//! Request and response schemas for the storefront API.
//!
//! # Design
//! Field names follow the server's JSON exactly, so most fields carry a
//! `rename`. Response types tolerate fields the server may omit
//! (`#[serde(default)]`); request types skip unset optionals so partial
//! updates only send what changed.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A catalog entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    #[serde(rename = "ProductID")]
    pub id: i64,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "WholesalePrice")]
    pub wholesale_price: f64,
    #[serde(rename = "RetailPrice")]
    pub retail_price: f64,
    #[serde(rename = "Description", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Base64-encoded picture.
    #[serde(rename = "Image", default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// `{ "products": [...] }`, the envelope of every catalog listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductList {
    pub products: Vec<Product>,
}

/// Catalog columns the server can sort by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Id,
    Name,
    WholesalePrice,
    RetailPrice,
    Description,
}

impl SortField {
    pub const ALL: [SortField; 5] = [
        SortField::Id,
        SortField::Name,
        SortField::WholesalePrice,
        SortField::RetailPrice,
        SortField::Description,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::Name => "name",
            SortField::WholesalePrice => "wholesale_price",
            SortField::RetailPrice => "retail_price",
            SortField::Description => "description",
        }
    }
}

impl std::str::FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortField::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| format!("unknown sort field: {s}"))
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

/// Value of the `sort_by` query parameter, e.g. `retail_price_desc`.
pub fn sort_key(field: SortField, order: SortOrder) -> String {
    format!("{}_{}", field.as_str(), order.as_str())
}

/// Optional constraints for a catalog listing. Unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    /// Retail price strictly below.
    pub price_lt: Option<f64>,
    /// Retail price strictly above.
    pub price_gt: Option<f64>,
    /// Case-insensitive substring of the name.
    pub name: Option<String>,
    pub sort: Option<(SortField, SortOrder)>,
}

impl ProductFilter {
    /// Query parameters in a stable order.
    pub fn query(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(price) = self.price_lt {
            params.push(("price_lt", price.to_string()));
        }
        if let Some(price) = self.price_gt {
            params.push(("price_gt", price.to_string()));
        }
        if let Some(name) = self.name.as_deref().filter(|n| !n.is_empty()) {
            params.push(("name", name.to_string()));
        }
        if let Some((field, order)) = self.sort {
            params.push(("sort_by", sort_key(field, order)));
        }
        params
    }
}

/// Customer profile as returned by login, registration and `/customers/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Customer {
    #[serde(rename = "CustomerID")]
    pub id: i64,
    #[serde(rename = "Name", default)]
    pub name: String,
    #[serde(rename = "Email", default)]
    pub email: String,
    #[serde(rename = "Phone", default)]
    pub phone: String,
    #[serde(rename = "Address", default)]
    pub address: String,
    #[serde(rename = "ContactPerson", default)]
    pub contact_person: String,
}

/// Partial profile update. Only the fields present in the JSON are applied;
/// omitted fields remain unchanged on the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CustomerUpdate {
    #[serde(rename = "Name", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "Phone", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(rename = "ContactPerson", skip_serializing_if = "Option::is_none")]
    pub contact_person: Option<String>,
    #[serde(rename = "Address", skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(rename = "Email", skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Login payload. `password_hash` is the hex SHA-256 of the password.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password_hash: String,
}

/// Registration payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub contact_person: String,
    pub password_hash: String,
}

/// One product line of a cart. Also the reply to adding an item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartItem {
    #[serde(rename = "CartItemID", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(rename = "ProductID", default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<i64>,
    #[serde(rename = "ProductName")]
    pub product_name: String,
    #[serde(rename = "Price")]
    pub price: f64,
    #[serde(rename = "Quantity")]
    pub quantity: u32,
    #[serde(rename = "AddedDate", default, skip_serializing_if = "Option::is_none")]
    pub added_date: Option<String>,
}

impl CartItem {
    pub fn line_total(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}

/// A customer's cart with server-computed totals.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cart {
    pub items: Vec<CartItem>,
    pub total_price: f64,
    pub discounted_price: f64,
    /// Fraction, e.g. `0.1` for ten percent.
    pub discount_rate: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_items: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_id: Option<i64>,
    #[serde(rename = "CartID", default, skip_serializing_if = "Option::is_none")]
    pub cart_id: Option<i64>,
    #[serde(rename = "CustomerID", default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<i64>,
}

impl Cart {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn discount_amount(&self) -> f64 {
        self.total_price - self.discounted_price
    }
}

/// Request payload for `POST /customers/{id}/cart/items`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewCartItem {
    #[serde(rename = "ProductID")]
    pub product_id: i64,
    #[serde(rename = "Quantity")]
    pub quantity: u32,
}

/// Reply to clearing a cart: either `{message}` or `{error}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClearCartReply {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Request payload for placing an order from the current cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewOrder {
    pub employee_id: i64,
    pub is_wholesale: bool,
}

/// One line of a placed order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderLine {
    #[serde(rename = "TransactionDetailID")]
    pub id: i64,
    #[serde(rename = "TransactionID", default)]
    pub order_id: i64,
    #[serde(rename = "ProductID")]
    pub product_id: i64,
    pub quantity: u32,
    #[serde(default)]
    pub discount: Option<f64>,
    #[serde(default)]
    pub product_name: String,
    #[serde(default)]
    pub current_price: f64,
    #[serde(default)]
    pub calculated_total: f64,
}

/// A placed order (a "transaction" on the server).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    #[serde(rename = "TransactionID")]
    pub id: i64,
    #[serde(rename = "CustomerID", default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<i64>,
    #[serde(rename = "EmployeeID", default, skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<i64>,
    #[serde(rename = "IsWholesale", default)]
    pub is_wholesale: bool,
    #[serde(rename = "TransactionDate", default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Gross amount before the discount is taken off.
    #[serde(default)]
    pub total_amount: f64,
    #[serde(default)]
    pub discount_amount: Option<f64>,
    pub details: Vec<OrderLine>,
}

impl Order {
    pub fn payable(&self) -> f64 {
        self.total_amount - self.discount_amount.unwrap_or(0.0)
    }
}
