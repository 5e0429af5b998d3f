//! Per-resource operations of the storefront API.
//!
//! # Design
//! Each endpoint has a `build_*` method producing its `HttpRequest` and a
//! `parse_*` method consuming the `HttpResponse`; both are pure. The
//! convenience operation of the same name runs one through the transport
//! and hands the response to the other. Shape mismatches surface as
//! `UnexpectedShape`; callers that want "nothing to show" instead use
//! `OrEmpty::or_empty`.

use serde::Deserialize;
use serde_json::Value;

use crate::client::{classify, to_body, Reply, StoreClient};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::transport::Transport;
use crate::types::{
    Cart, CartItem, ClearCartReply, Credentials, Customer, CustomerUpdate, NewCartItem, NewOrder,
    Order, Product, ProductFilter, ProductList, Registration, SortField, SortOrder,
};

/// Order listings come either as a bare array or wrapped in `transactions`.
#[derive(Deserialize)]
#[serde(untagged)]
enum OrderListing {
    Plain(Vec<Order>),
    Wrapped { transactions: Vec<Order> },
}

impl<T: Transport> StoreClient<T> {
    // -----------------------------------------------------------------------
    // Build
    // -----------------------------------------------------------------------

    pub fn build_products(&self, filter: &ProductFilter) -> Result<HttpRequest, ApiError> {
        let query = filter.query();
        let params: Vec<(&str, &str)> = query.iter().map(|(k, v)| (*k, v.as_str())).collect();
        self.build_request(HttpMethod::Get, "/products", &params, None)
    }

    pub fn build_search_products(&self, query: &str) -> Result<HttpRequest, ApiError> {
        self.build_request(HttpMethod::Get, "/products/search", &[("query", query)], None)
    }

    pub fn build_product(&self, product_id: i64) -> Result<HttpRequest, ApiError> {
        self.build_request(HttpMethod::Get, &format!("/products/{product_id}"), &[], None)
    }

    pub fn build_customer(&self, customer_id: i64) -> Result<HttpRequest, ApiError> {
        self.build_request(HttpMethod::Get, &format!("/customers/{customer_id}"), &[], None)
    }

    pub fn build_update_customer(
        &self,
        customer_id: i64,
        update: &CustomerUpdate,
    ) -> Result<HttpRequest, ApiError> {
        self.build_request(
            HttpMethod::Put,
            &format!("/customers/{customer_id}"),
            &[],
            Some(to_body(update)?),
        )
    }

    pub fn build_cart(&self, customer_id: i64) -> Result<HttpRequest, ApiError> {
        self.build_request(HttpMethod::Get, &format!("/customers/{customer_id}/cart"), &[], None)
    }

    pub fn build_add_to_cart(
        &self,
        customer_id: i64,
        item: &NewCartItem,
    ) -> Result<HttpRequest, ApiError> {
        self.build_request(
            HttpMethod::Post,
            &format!("/customers/{customer_id}/cart/items"),
            &[],
            Some(to_body(item)?),
        )
    }

    pub fn build_clear_cart(&self, customer_id: i64) -> Result<HttpRequest, ApiError> {
        self.build_request(
            HttpMethod::Delete,
            &format!("/customers/{customer_id}/cart"),
            &[],
            None,
        )
    }

    pub fn build_remove_from_cart(
        &self,
        customer_id: i64,
        product_id: i64,
    ) -> Result<HttpRequest, ApiError> {
        self.build_request(
            HttpMethod::Delete,
            &format!("/customers/{customer_id}/cart/{product_id}"),
            &[],
            None,
        )
    }

    pub fn build_checkout(&self, customer_id: i64) -> Result<HttpRequest, ApiError> {
        self.build_request(
            HttpMethod::Post,
            &format!("/customers/{customer_id}/checkout"),
            &[],
            None,
        )
    }

    pub fn build_orders(&self, customer_id: i64) -> Result<HttpRequest, ApiError> {
        self.build_request(HttpMethod::Get, &format!("/customers/{customer_id}/orders"), &[], None)
    }

    pub fn build_place_order(
        &self,
        customer_id: i64,
        order: &NewOrder,
    ) -> Result<HttpRequest, ApiError> {
        self.build_request(
            HttpMethod::Post,
            &format!("/customers/{customer_id}/orders"),
            &[],
            Some(to_body(order)?),
        )
    }

    pub fn build_login(&self, credentials: &Credentials) -> Result<HttpRequest, ApiError> {
        self.build_request(HttpMethod::Post, "/login", &[], Some(to_body(credentials)?))
    }

    pub fn build_register(&self, registration: &Registration) -> Result<HttpRequest, ApiError> {
        self.build_request(HttpMethod::Post, "/register", &[], Some(to_body(registration)?))
    }

    // -----------------------------------------------------------------------
    // Parse
    // -----------------------------------------------------------------------

    /// Expects `{"products": [...]}`.
    pub fn parse_products(&self, response: HttpResponse) -> Result<Vec<Product>, ApiError> {
        Ok(classify(response)?.json::<ProductList>()?.products)
    }

    pub fn parse_product(&self, response: HttpResponse) -> Result<Product, ApiError> {
        classify(response)?.json()
    }

    pub fn parse_customer(&self, response: HttpResponse) -> Result<Customer, ApiError> {
        classify(response)?.json()
    }

    /// Any success status will do; the body is ignored.
    pub fn parse_update_customer(&self, response: HttpResponse) -> Result<(), ApiError> {
        classify(response).map(drop)
    }

    pub fn parse_cart(&self, response: HttpResponse) -> Result<Cart, ApiError> {
        classify(response)?.json()
    }

    pub fn parse_add_to_cart(&self, response: HttpResponse) -> Result<CartItem, ApiError> {
        classify(response)?.json()
    }

    /// Passes `{"error": ...}` through untouched; telling it apart from
    /// `{"message": ...}` is the caller's job.
    pub fn parse_clear_cart(&self, response: HttpResponse) -> Result<ClearCartReply, ApiError> {
        classify(response)?.json()
    }

    pub fn parse_remove_from_cart(&self, response: HttpResponse) -> Result<(), ApiError> {
        classify(response).map(drop)
    }

    pub fn parse_checkout(&self, response: HttpResponse) -> Result<(), ApiError> {
        classify(response).map(drop)
    }

    pub fn parse_orders(&self, response: HttpResponse) -> Result<Vec<Order>, ApiError> {
        let orders = match classify(response)?.json::<OrderListing>()? {
            OrderListing::Plain(orders) | OrderListing::Wrapped { transactions: orders } => orders,
        };
        Ok(orders)
    }

    pub fn parse_place_order(&self, response: HttpResponse) -> Result<Order, ApiError> {
        classify(response)?.json()
    }

    /// A login reply without `CustomerID` is a domain failure.
    pub fn parse_login(&self, response: HttpResponse) -> Result<Customer, ApiError> {
        identity_from(classify(response)?, "login failed")
    }

    pub fn parse_register(&self, response: HttpResponse) -> Result<Customer, ApiError> {
        identity_from(classify(response)?, "registration failed")
    }

    // -----------------------------------------------------------------------
    // Operations
    // -----------------------------------------------------------------------

    pub fn products(&self) -> Result<Vec<Product>, ApiError> {
        self.filtered_products(&ProductFilter::default())
    }

    pub fn sorted_products(
        &self,
        field: SortField,
        order: SortOrder,
    ) -> Result<Vec<Product>, ApiError> {
        self.filtered_products(&ProductFilter {
            sort: Some((field, order)),
            ..ProductFilter::default()
        })
    }

    pub fn filtered_products(&self, filter: &ProductFilter) -> Result<Vec<Product>, ApiError> {
        self.call("products", self.build_products(filter)?, Self::parse_products)
    }

    pub fn search_products(&self, query: &str) -> Result<Vec<Product>, ApiError> {
        self.call("search products", self.build_search_products(query)?, Self::parse_products)
    }

    pub fn product(&self, product_id: i64) -> Result<Product, ApiError> {
        self.call("product", self.build_product(product_id)?, Self::parse_product)
    }

    pub fn customer(&self, customer_id: i64) -> Result<Customer, ApiError> {
        self.call("customer", self.build_customer(customer_id)?, Self::parse_customer)
    }

    pub fn update_customer(&self, customer_id: i64, update: &CustomerUpdate) -> Result<(), ApiError> {
        self.call(
            "update customer",
            self.build_update_customer(customer_id, update)?,
            Self::parse_update_customer,
        )
    }

    pub fn cart(&self, customer_id: i64) -> Result<Cart, ApiError> {
        self.call("cart", self.build_cart(customer_id)?, Self::parse_cart)
    }

    pub fn add_to_cart(
        &self,
        customer_id: i64,
        product_id: i64,
        quantity: u32,
    ) -> Result<CartItem, ApiError> {
        let item = NewCartItem {
            product_id,
            quantity,
        };
        self.call(
            "add to cart",
            self.build_add_to_cart(customer_id, &item)?,
            Self::parse_add_to_cart,
        )
    }

    pub fn clear_cart(&self, customer_id: i64) -> Result<ClearCartReply, ApiError> {
        self.call("clear cart", self.build_clear_cart(customer_id)?, Self::parse_clear_cart)
    }

    pub fn remove_from_cart(&self, customer_id: i64, product_id: i64) -> Result<(), ApiError> {
        self.call(
            "remove from cart",
            self.build_remove_from_cart(customer_id, product_id)?,
            Self::parse_remove_from_cart,
        )
    }

    pub fn checkout(&self, customer_id: i64) -> Result<(), ApiError> {
        self.call("checkout", self.build_checkout(customer_id)?, Self::parse_checkout)
    }

    pub fn orders(&self, customer_id: i64) -> Result<Vec<Order>, ApiError> {
        self.call("orders", self.build_orders(customer_id)?, Self::parse_orders)
    }

    pub fn place_order(&self, customer_id: i64, order: &NewOrder) -> Result<Order, ApiError> {
        self.call(
            "place order",
            self.build_place_order(customer_id, order)?,
            Self::parse_place_order,
        )
    }

    pub fn login(&self, credentials: &Credentials) -> Result<Customer, ApiError> {
        self.call("login", self.build_login(credentials)?, Self::parse_login)
    }

    pub fn register(&self, registration: &Registration) -> Result<Customer, ApiError> {
        self.call("register", self.build_register(registration)?, Self::parse_register)
    }

    fn call<R>(
        &self,
        operation: &'static str,
        request: HttpRequest,
        parse: impl FnOnce(&Self, HttpResponse) -> Result<R, ApiError>,
    ) -> Result<R, ApiError> {
        let response = self.dispatch(&request)?;
        parse(self, response).inspect_err(|e| {
            tracing::warn!(operation, error = %e, "storefront call failed");
        })
    }
}

/// Require `CustomerID` in an identity reply. Without it, the reply's own
/// `detail`/`error` text (or `fallback`) becomes the domain error.
fn identity_from(reply: Reply, fallback: &str) -> Result<Customer, ApiError> {
    let payload = reply.into_payload().unwrap_or(Value::Null);
    if payload.get("CustomerID").is_none() {
        let message = payload
            .get("detail")
            .or_else(|| payload.get("error"))
            .and_then(Value::as_str)
            .unwrap_or(fallback);
        return Err(ApiError::Domain(message.to_string()));
    }
    serde_json::from_value(payload).map_err(|e| ApiError::UnexpectedShape(e.to_string()))
}

/// Collapse a failed call into an empty value, for callers that treat
/// "failed" and "nothing there" alike.
pub trait OrEmpty<T> {
    fn or_empty(self) -> T;
}

impl<T: Default> OrEmpty<T> for Result<T, ApiError> {
    fn or_empty(self) -> T {
        self.unwrap_or_else(|e| {
            tracing::debug!(error = %e, "showing empty result after failure");
            T::default()
        })
    }
}
