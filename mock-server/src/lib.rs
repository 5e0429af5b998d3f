use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};

/// SHA-256 hex digest of `password`, the seeded customer's password.
pub const SEED_PASSWORD_HASH: &str =
    "5e884898da28047151d0e56f8dc6292773603d0d6aabbdd62a11ef721d1542d8";
pub const SEED_EMAIL: &str = "buyer@example.com";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "ProductID")]
    pub id: i64,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "WholesalePrice")]
    pub wholesale_price: f64,
    #[serde(rename = "RetailPrice")]
    pub retail_price: f64,
    #[serde(rename = "Description")]
    pub description: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Customer {
    #[serde(rename = "CustomerID")]
    pub id: i64,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "Phone")]
    pub phone: String,
    #[serde(rename = "Address")]
    pub address: String,
    #[serde(rename = "ContactPerson")]
    pub contact_person: String,
    #[serde(skip)]
    pub password_hash: String,
}

/// Quantity and order-total window a discount rate applies to.
#[derive(Clone, Debug)]
pub struct Discount {
    pub id: i64,
    pub min_quantity: u32,
    pub max_quantity: u32,
    pub min_total: f64,
    pub rate: f64,
}

#[derive(Clone, Debug)]
struct CartLine {
    id: i64,
    product_id: i64,
    quantity: u32,
    added: String,
}

#[derive(Clone, Debug)]
struct CartRecord {
    id: i64,
    lines: Vec<CartLine>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CartItem {
    #[serde(rename = "CartItemID")]
    pub id: i64,
    #[serde(rename = "ProductID")]
    pub product_id: i64,
    #[serde(rename = "ProductName")]
    pub product_name: String,
    #[serde(rename = "Price")]
    pub price: f64,
    #[serde(rename = "Quantity")]
    pub quantity: u32,
    #[serde(rename = "AddedDate")]
    pub added_date: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CartView {
    pub items: Vec<CartItem>,
    pub total_items: u32,
    pub total_price: f64,
    pub discounted_price: f64,
    pub discount_rate: f64,
    pub discount_id: Option<i64>,
    #[serde(rename = "CartID")]
    pub cart_id: i64,
    #[serde(rename = "CustomerID")]
    pub customer_id: i64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OrderLine {
    #[serde(rename = "TransactionDetailID")]
    pub id: i64,
    #[serde(rename = "TransactionID")]
    pub order_id: i64,
    #[serde(rename = "ProductID")]
    pub product_id: i64,
    pub quantity: u32,
    pub discount: f64,
    pub product_name: String,
    pub current_price: f64,
    pub calculated_total: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Order {
    #[serde(rename = "TransactionID")]
    pub id: i64,
    #[serde(rename = "CustomerID")]
    pub customer_id: i64,
    #[serde(rename = "EmployeeID")]
    pub employee_id: i64,
    #[serde(rename = "IsWholesale")]
    pub is_wholesale: bool,
    #[serde(rename = "TransactionDate")]
    pub date: String,
    /// Gross amount before the discount.
    pub total_amount: f64,
    pub discount_amount: f64,
    pub details: Vec<OrderLine>,
}

#[derive(Deserialize)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub contact_person: String,
    pub password_hash: String,
}

#[derive(Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password_hash: String,
}

#[derive(Deserialize)]
pub struct CustomerUpdate {
    #[serde(rename = "Name")]
    pub name: Option<String>,
    #[serde(rename = "Phone")]
    pub phone: Option<String>,
    #[serde(rename = "ContactPerson")]
    pub contact_person: Option<String>,
    #[serde(rename = "Address")]
    pub address: Option<String>,
    #[serde(rename = "Email")]
    pub email: Option<String>,
}

#[derive(Deserialize)]
pub struct NewCartItem {
    #[serde(rename = "ProductID")]
    pub product_id: i64,
    #[serde(rename = "Quantity", default = "one")]
    pub quantity: u32,
}

fn one() -> u32 {
    1
}

#[derive(Deserialize)]
pub struct NewOrder {
    #[serde(default = "default_employee")]
    pub employee_id: i64,
    #[serde(default)]
    pub is_wholesale: bool,
}

fn default_employee() -> i64 {
    1
}

#[derive(Deserialize, Default)]
pub struct ProductQuery {
    pub price_lt: Option<f64>,
    pub price_gt: Option<f64>,
    pub name: Option<String>,
    pub sort_by: Option<String>,
}

#[derive(Deserialize)]
pub struct SearchQuery {
    pub query: Option<String>,
}

/// Error reply in the `{"detail": "..."}` shape.
#[derive(Debug)]
pub struct Failure(StatusCode, String);

impl Failure {
    fn not_found(what: &str) -> Self {
        Self(StatusCode::NOT_FOUND, format!("{what} not found"))
    }

    fn bad_request(detail: impl Into<String>) -> Self {
        Self(StatusCode::BAD_REQUEST, detail.into())
    }
}

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        (self.0, Json(json!({ "detail": self.1 }))).into_response()
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn now() -> String {
    chrono::Utc::now().format("%Y-%m-%dT%H:%M:%S").to_string()
}

/// In-memory state of the whole shop.
#[derive(Debug, Default)]
pub struct Store {
    products: BTreeMap<i64, Product>,
    customers: BTreeMap<i64, Customer>,
    discounts: Vec<Discount>,
    carts: BTreeMap<i64, CartRecord>,
    orders: Vec<Order>,
    next_id: i64,
}

impl Store {
    /// A store holding a small catalog, the discount tiers and one customer
    /// (`buyer@example.com` / `password`).
    pub fn seeded() -> Self {
        let mut store = Store {
            next_id: 100,
            ..Store::default()
        };

        let catalog = [
            (1, "Widget", 5.0, 9.99, "Standard widget"),
            (2, "Gadget", 12.5, 19.9, "Pocket gadget"),
            (3, "Bolt M8", 0.2, 0.5, "Steel bolt"),
            (4, "Cable 3m", 2.1, 4.75, "Copper cable"),
            (5, "Desk lamp", 15.0, 29.99, "Lamp with a steel arm"),
        ];
        for (id, name, wholesale, retail, description) in catalog {
            store.products.insert(
                id,
                Product {
                    id,
                    name: name.to_string(),
                    wholesale_price: wholesale,
                    retail_price: retail,
                    description: Some(description.to_string()),
                },
            );
        }

        store.discounts = vec![
            Discount { id: 1, min_quantity: 5, max_quantity: 9, min_total: 0.0, rate: 0.05 },
            Discount { id: 2, min_quantity: 10, max_quantity: 49, min_total: 0.0, rate: 0.10 },
            Discount { id: 3, min_quantity: 50, max_quantity: u32::MAX, min_total: 0.0, rate: 0.15 },
            Discount { id: 4, min_quantity: 1, max_quantity: u32::MAX, min_total: 500.0, rate: 0.12 },
        ];

        store.customers.insert(
            1,
            Customer {
                id: 1,
                name: "Acme".to_string(),
                email: SEED_EMAIL.to_string(),
                phone: "+79990001122".to_string(),
                address: "Lenina 1".to_string(),
                contact_person: "Ivan".to_string(),
                password_hash: SEED_PASSWORD_HASH.to_string(),
            },
        );
        store
    }

    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn customer(&self, id: i64) -> Result<&Customer, Failure> {
        self.customers.get(&id).ok_or_else(|| Failure::not_found("Customer"))
    }

    /// Highest rate whose window covers the cart; nothing for an empty cart.
    fn discount_for(&self, total_items: u32, total_price: f64) -> Option<&Discount> {
        if total_items == 0 {
            return None;
        }
        self.discounts
            .iter()
            .filter(|d| {
                d.min_quantity <= total_items
                    && total_items <= d.max_quantity
                    && d.min_total <= total_price
            })
            .max_by(|a, b| a.rate.total_cmp(&b.rate))
    }

    fn cart_for(&mut self, customer_id: i64) -> &mut CartRecord {
        let next_id = &mut self.next_id;
        self.carts.entry(customer_id).or_insert_with(|| {
            *next_id += 1;
            CartRecord {
                id: *next_id,
                lines: Vec::new(),
            }
        })
    }

    fn item_view(&self, line: &CartLine) -> Option<CartItem> {
        let product = self.products.get(&line.product_id)?;
        Some(CartItem {
            id: line.id,
            product_id: line.product_id,
            product_name: product.name.clone(),
            price: product.retail_price,
            quantity: line.quantity,
            added_date: line.added.clone(),
        })
    }

    pub fn cart_view(&mut self, customer_id: i64) -> Result<CartView, Failure> {
        self.customer(customer_id)?;
        let cart = self.cart_for(customer_id).clone();

        let items: Vec<CartItem> = cart.lines.iter().filter_map(|l| self.item_view(l)).collect();
        let total_items = items.iter().map(|i| i.quantity).sum();
        let total_price: f64 = items.iter().map(|i| i.price * f64::from(i.quantity)).sum();
        let discount = self.discount_for(total_items, total_price);
        let discount_rate = discount.map_or(0.0, |d| d.rate);

        Ok(CartView {
            items,
            total_items,
            total_price: round2(total_price),
            discounted_price: round2(total_price * (1.0 - discount_rate)),
            discount_rate,
            discount_id: discount.map(|d| d.id),
            cart_id: cart.id,
            customer_id,
        })
    }

    pub fn add_to_cart(&mut self, customer_id: i64, item: &NewCartItem) -> Result<CartItem, Failure> {
        self.customer(customer_id)?;
        if !self.products.contains_key(&item.product_id) {
            return Err(Failure::not_found("Product"));
        }
        if item.quantity == 0 {
            return Err(Failure::bad_request("Quantity must be positive"));
        }

        let line_id = self.next_id();
        let cart = self.cart_for(customer_id);
        let line = match cart.lines.iter_mut().find(|l| l.product_id == item.product_id) {
            Some(line) => {
                line.quantity = line
                    .quantity
                    .checked_add(item.quantity)
                    .ok_or_else(|| Failure::bad_request("Quantity too large"))?;
                line.clone()
            }
            None => {
                let line = CartLine {
                    id: line_id,
                    product_id: item.product_id,
                    quantity: item.quantity,
                    added: now(),
                };
                cart.lines.push(line.clone());
                line
            }
        };
        self.item_view(&line).ok_or_else(|| Failure::not_found("Product"))
    }

    pub fn place_order(&mut self, customer_id: i64, order: &NewOrder) -> Result<Order, Failure> {
        let failed = |reason: &str| Failure::bad_request(format!("Order creation failed: {reason}"));

        if !self.customers.contains_key(&customer_id) {
            return Err(failed("Customer not found"));
        }
        let lines = match self.carts.get(&customer_id) {
            Some(cart) if !cart.lines.is_empty() => cart.lines.clone(),
            Some(_) => return Err(failed("Cart is empty")),
            None => return Err(failed("Cart not found")),
        };

        // (product, quantity, name, unit price)
        let priced: Vec<(i64, u32, String, f64)> = lines
            .iter()
            .filter_map(|line| {
                let product = self.products.get(&line.product_id)?;
                let price = if order.is_wholesale {
                    product.wholesale_price
                } else {
                    product.retail_price
                };
                Some((line.product_id, line.quantity, product.name.clone(), price))
            })
            .collect();

        let total_quantity = priced.iter().map(|(_, qty, _, _)| *qty).sum();
        let total: f64 = priced.iter().map(|(_, qty, _, price)| price * f64::from(*qty)).sum();
        let rate = self.discount_for(total_quantity, total).map_or(0.0, |d| d.rate);

        let order_id = self.next_id();
        let mut order_lines = Vec::with_capacity(priced.len());
        for (product_id, quantity, product_name, price) in priced {
            order_lines.push(OrderLine {
                id: self.next_id(),
                order_id,
                product_id,
                quantity,
                discount: rate,
                product_name,
                current_price: price,
                calculated_total: round2(price * f64::from(quantity) * (1.0 - rate)),
            });
        }

        let placed = Order {
            id: order_id,
            customer_id,
            employee_id: order.employee_id,
            is_wholesale: order.is_wholesale,
            date: now(),
            total_amount: round2(total),
            discount_amount: round2(total * rate),
            details: order_lines,
        };
        self.orders.push(placed.clone());
        if let Some(cart) = self.carts.get_mut(&customer_id) {
            cart.lines.clear();
        }
        tracing::info!(order = placed.id, customer = customer_id, "order placed");
        Ok(placed)
    }

    /// Filtered and optionally sorted catalog. Unknown sort keys keep id order.
    pub fn products(&self, query: &ProductQuery) -> Vec<Product> {
        let needle = query.name.as_deref().map(str::to_lowercase);
        let mut products: Vec<Product> = self
            .products
            .values()
            .filter(|p| query.price_lt.is_none_or(|lt| p.retail_price < lt))
            .filter(|p| query.price_gt.is_none_or(|gt| p.retail_price > gt))
            .filter(|p| {
                needle
                    .as_deref()
                    .is_none_or(|n| n.is_empty() || p.name.to_lowercase().contains(n))
            })
            .cloned()
            .collect();

        let Some(sort_by) = query.sort_by.as_deref() else {
            return products;
        };
        let (field, descending) = match sort_by.rsplit_once('_') {
            Some((field, "asc")) => (field, false),
            Some((field, "desc")) => (field, true),
            _ => return products,
        };
        match field {
            "id" => products.sort_by_key(|p| p.id),
            "name" => products.sort_by(|a, b| a.name.cmp(&b.name)),
            "retail_price" => products.sort_by(|a, b| a.retail_price.total_cmp(&b.retail_price)),
            "wholesale_price" => {
                products.sort_by(|a, b| a.wholesale_price.total_cmp(&b.wholesale_price))
            }
            "description" => products.sort_by(|a, b| a.description.cmp(&b.description)),
            _ => return products,
        }
        if descending {
            products.reverse();
        }
        products
    }

    /// Matches name or description; a numeric query also matches the id
    /// and either price.
    pub fn search(&self, query: &str) -> Vec<Product> {
        let needle = query.to_lowercase();
        let number = query.parse::<f64>().ok();
        self.products
            .values()
            .filter(|p| {
                let text = p.name.to_lowercase().contains(&needle)
                    || p
                        .description
                        .as_deref()
                        .is_some_and(|d| d.to_lowercase().contains(&needle));
                let numeric = number.is_some_and(|n| {
                    p.id == n.trunc() as i64 || p.wholesale_price == n || p.retail_price == n
                });
                text || numeric
            })
            .cloned()
            .collect()
    }
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    app_with(Store::seeded())
}

pub fn app_with(store: Store) -> Router {
    let db: Db = Arc::new(RwLock::new(store));
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/products", get(list_products))
        .route("/products/search", get(search_products))
        .route("/products/{id}", get(get_product))
        .route("/customers/{id}", get(get_customer).put(update_customer))
        .route("/customers/{id}/cart", get(get_cart).delete(clear_cart))
        .route("/customers/{id}/cart/items", post(add_cart_item))
        .route("/customers/{id}/cart/{product_id}", delete(remove_cart_item))
        .route("/customers/{id}/checkout", post(checkout))
        .route("/customers/{id}/orders", get(list_orders).post(create_order))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn register(
    State(db): State<Db>,
    Json(input): Json<Registration>,
) -> Result<Json<Customer>, Failure> {
    let mut store = db.write().await;
    if store.customers.values().any(|c| c.email == input.email) {
        return Err(Failure::bad_request("Email already registered"));
    }
    let customer = Customer {
        id: store.next_id(),
        name: input.name,
        email: input.email,
        phone: input.phone,
        address: input.address,
        contact_person: input.contact_person,
        password_hash: input.password_hash,
    };
    store.customers.insert(customer.id, customer.clone());
    tracing::info!(customer = customer.id, "customer registered");
    Ok(Json(customer))
}

async fn login(
    State(db): State<Db>,
    Json(input): Json<Credentials>,
) -> Result<Json<Customer>, Failure> {
    let store = db.read().await;
    store
        .customers
        .values()
        .find(|c| c.email == input.email && c.password_hash == input.password_hash)
        .cloned()
        .map(Json)
        .ok_or_else(|| Failure(StatusCode::UNAUTHORIZED, "Incorrect credentials".to_string()))
}

async fn list_products(
    State(db): State<Db>,
    Query(query): Query<ProductQuery>,
) -> Json<Value> {
    let products = db.read().await.products(&query);
    Json(json!({ "products": products }))
}

async fn search_products(
    State(db): State<Db>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Value>, Failure> {
    let text = query.query.unwrap_or_default();
    let text = text.trim();
    if text.chars().count() < 2 {
        return Err(Failure::bad_request(
            "Search query must be at least 2 characters long",
        ));
    }
    let products = db.read().await.search(text);
    Ok(Json(json!({ "products": products })))
}

async fn get_product(State(db): State<Db>, Path(id): Path<i64>) -> Result<Json<Product>, Failure> {
    let store = db.read().await;
    store.products.get(&id).cloned().map(Json).ok_or_else(|| Failure::not_found("Product"))
}

async fn get_customer(State(db): State<Db>, Path(id): Path<i64>) -> Result<Json<Customer>, Failure> {
    db.read().await.customer(id).cloned().map(Json)
}

async fn update_customer(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(input): Json<CustomerUpdate>,
) -> Result<Json<Customer>, Failure> {
    let mut store = db.write().await;
    let customer = store.customers.get_mut(&id).ok_or_else(|| Failure::not_found("Customer"))?;
    if let Some(name) = input.name {
        customer.name = name;
    }
    if let Some(phone) = input.phone {
        customer.phone = phone;
    }
    if let Some(contact_person) = input.contact_person {
        customer.contact_person = contact_person;
    }
    if let Some(address) = input.address {
        customer.address = address;
    }
    if let Some(email) = input.email {
        customer.email = email;
    }
    Ok(Json(customer.clone()))
}

async fn get_cart(State(db): State<Db>, Path(id): Path<i64>) -> Result<Json<CartView>, Failure> {
    db.write().await.cart_view(id).map(Json)
}

async fn add_cart_item(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(input): Json<NewCartItem>,
) -> Result<Json<CartItem>, Failure> {
    db.write().await.add_to_cart(id, &input).map(Json)
}

/// An already empty cart is reported in the body with status 200.
async fn clear_cart(State(db): State<Db>, Path(id): Path<i64>) -> Result<Json<Value>, Failure> {
    let mut store = db.write().await;
    store.customer(id)?;
    match store.carts.get_mut(&id) {
        Some(cart) if !cart.lines.is_empty() => {
            cart.lines.clear();
            Ok(Json(json!({ "message": "Cart cleared" })))
        }
        _ => Ok(Json(json!({ "error": "cart already empty" }))),
    }
}

async fn remove_cart_item(
    State(db): State<Db>,
    Path((id, product_id)): Path<(i64, i64)>,
) -> Result<Json<Value>, Failure> {
    let mut store = db.write().await;
    store.customer(id)?;
    let cart = store.carts.get_mut(&id).ok_or_else(|| Failure::not_found("Cart item"))?;
    let before = cart.lines.len();
    cart.lines.retain(|l| l.product_id != product_id);
    if cart.lines.len() == before {
        return Err(Failure::not_found("Cart item"));
    }
    Ok(Json(json!({ "message": "Item removed from cart" })))
}

/// Places a retail order for the whole cart.
async fn checkout(State(db): State<Db>, Path(id): Path<i64>) -> Result<Json<Value>, Failure> {
    let order = db.write().await.place_order(
        id,
        &NewOrder {
            employee_id: default_employee(),
            is_wholesale: false,
        },
    )?;
    Ok(Json(json!({ "message": "Order placed", "TransactionID": order.id })))
}

async fn list_orders(State(db): State<Db>, Path(id): Path<i64>) -> Result<Json<Value>, Failure> {
    let store = db.read().await;
    store.customer(id)?;
    let mut orders: Vec<&Order> = store.orders.iter().filter(|o| o.customer_id == id).collect();
    orders.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
    Ok(Json(json!({ "transactions": orders })))
}

async fn create_order(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(input): Json<NewOrder>,
) -> Result<Json<Order>, Failure> {
    db.write().await.place_order(id, &input).map(Json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn customer_json_hides_password_hash() {
        let store = Store::seeded();
        let json = serde_json::to_value(store.customer(1).unwrap()).unwrap();
        assert_eq!(json["CustomerID"], 1);
        assert_eq!(json["Email"], SEED_EMAIL);
        assert!(json.get("password_hash").is_none());
    }

    #[test]
    fn discount_picks_highest_matching_rate() {
        let store = Store::seeded();
        assert!(store.discount_for(0, 0.0).is_none());
        assert!(store.discount_for(2, 20.0).is_none());
        assert_eq!(store.discount_for(5, 10.0).unwrap().rate, 0.05);
        assert_eq!(store.discount_for(10, 600.0).unwrap().rate, 0.12);
        assert_eq!(store.discount_for(60, 10.0).unwrap().rate, 0.15);
    }

    #[test]
    fn cart_totals_apply_discount() {
        let mut store = Store::seeded();
        store
            .add_to_cart(1, &NewCartItem { product_id: 1, quantity: 10 })
            .unwrap();
        let cart = store.cart_view(1).unwrap();
        assert_eq!(cart.total_items, 10);
        assert_eq!(cart.total_price, 99.9);
        assert_eq!(cart.discount_rate, 0.10);
        assert_eq!(cart.discounted_price, 89.91);
        assert_eq!(cart.discount_id, Some(2));
    }

    #[test]
    fn repeated_add_increments_quantity() {
        let mut store = Store::seeded();
        let first = store.add_to_cart(1, &NewCartItem { product_id: 3, quantity: 1 }).unwrap();
        let second = store.add_to_cart(1, &NewCartItem { product_id: 3, quantity: 2 }).unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(second.quantity, 3);
        assert_eq!(store.cart_view(1).unwrap().items.len(), 1);
    }

    #[test]
    fn quantity_overflow_is_rejected() {
        let mut store = Store::seeded();
        store
            .add_to_cart(1, &NewCartItem { product_id: 2, quantity: u32::MAX })
            .unwrap();
        let err = store
            .add_to_cart(1, &NewCartItem { product_id: 2, quantity: 1 })
            .unwrap_err();
        assert_eq!(err.0, StatusCode::BAD_REQUEST);
        assert_eq!(err.1, "Quantity too large");
        assert_eq!(store.cart_view(1).unwrap().items[0].quantity, u32::MAX);
    }

    #[test]
    fn order_reports_gross_total_and_clears_cart() {
        let mut store = Store::seeded();
        store.add_to_cart(1, &NewCartItem { product_id: 1, quantity: 10 }).unwrap();
        let order = store
            .place_order(1, &NewOrder { employee_id: 3, is_wholesale: false })
            .unwrap();
        assert_eq!(order.total_amount, 99.9);
        assert_eq!(order.discount_amount, 9.99);
        assert_eq!(order.details[0].calculated_total, 89.91);
        assert_eq!(order.employee_id, 3);
        assert!(store.cart_view(1).unwrap().items.is_empty());
    }

    #[test]
    fn wholesale_order_uses_wholesale_price() {
        let mut store = Store::seeded();
        store.add_to_cart(1, &NewCartItem { product_id: 1, quantity: 2 }).unwrap();
        let order = store
            .place_order(1, &NewOrder { employee_id: 1, is_wholesale: true })
            .unwrap();
        assert_eq!(order.details[0].current_price, 5.0);
        assert_eq!(order.total_amount, 10.0);
    }

    #[test]
    fn empty_cart_cannot_be_ordered() {
        let mut store = Store::seeded();
        let err = store
            .place_order(1, &NewOrder { employee_id: 1, is_wholesale: false })
            .unwrap_err();
        assert_eq!(err.0, StatusCode::BAD_REQUEST);
        assert_eq!(err.1, "Order creation failed: Cart not found");
    }

    #[test]
    fn products_filter_and_sort() {
        let store = Store::seeded();
        let query = ProductQuery {
            price_lt: Some(20.0),
            price_gt: Some(1.0),
            sort_by: Some("retail_price_desc".to_string()),
            ..ProductQuery::default()
        };
        let names: Vec<String> = store.products(&query).into_iter().map(|p| p.name).collect();
        assert_eq!(names, ["Gadget", "Widget", "Cable 3m"]);

        let query = ProductQuery {
            name: Some("GAD".to_string()),
            ..ProductQuery::default()
        };
        assert_eq!(store.products(&query).len(), 1);
    }

    #[test]
    fn unknown_sort_key_keeps_id_order() {
        let store = Store::seeded();
        let query = ProductQuery {
            sort_by: Some("colour_asc".to_string()),
            ..ProductQuery::default()
        };
        let ids: Vec<i64> = store.products(&query).into_iter().map(|p| p.id).collect();
        assert_eq!(ids, [1, 2, 3, 4, 5]);
    }

    #[test]
    fn search_matches_text_and_numbers() {
        let store = Store::seeded();
        let names = |q: &str| -> Vec<String> { store.search(q).into_iter().map(|p| p.name).collect() };
        assert_eq!(names("steel"), ["Bolt M8", "Desk lamp"]);
        assert_eq!(names("9.99"), ["Widget"]);
        assert_eq!(names("4"), ["Cable 3m"]);
    }
}
