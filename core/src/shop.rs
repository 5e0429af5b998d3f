//! The customer-facing storefront: session handling and the checks a front
//! end performs around each API call.
//!
//! # Design
//! `Storefront` owns the client and the session, so every operation that
//! needs an identity reads it from `self` instead of a global. Listing
//! operations collapse failures into an empty list; an unreachable server
//! and an empty catalog look the same to the caller. Everything else
//! returns the `ApiError` so the front end can show `user_message()`.

use crate::client::StoreClient;
use crate::config::{ClientConfig, DEFAULT_EMPLOYEE_ID};
use crate::error::ApiError;
use crate::password::hash_password;
use crate::resources::OrEmpty;
use crate::session::Session;
use crate::transport::{Transport, UreqTransport};
use crate::types::{
    Cart, CartItem, ClearCartReply, Credentials, Customer, CustomerUpdate, NewOrder, Order,
    Product, ProductFilter, Registration, SortField, SortOrder,
};

/// Input of the registration form. `password` is plain text and is hashed
/// before it is sent.
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub contact_person: String,
    pub password: String,
}

/// Input of the profile editor.
#[derive(Debug, Clone, Default)]
pub struct ProfileForm {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub contact_person: String,
    pub address: String,
}

/// Strip the mask characters of a phone input: `+7(999)123-45-67` becomes
/// `+79991234567`.
pub fn normalize_phone(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, '(' | ')' | '-'))
        .collect::<String>()
        .trim()
        .to_string()
}

fn required(value: &str, message: &str) -> Result<String, ApiError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ApiError::InvalidInput(message.to_string()));
    }
    Ok(value.to_string())
}

#[derive(Debug)]
pub struct Storefront<T = UreqTransport> {
    client: StoreClient<T>,
    session: Session,
    employee_id: i64,
    last_sort: Option<(SortField, SortOrder)>,
}

impl Storefront<UreqTransport> {
    pub fn from_config(config: &ClientConfig) -> Self {
        Storefront::new(StoreClient::from_config(config)).with_employee_id(config.employee_id)
    }
}

impl<T: Transport> Storefront<T> {
    pub fn new(client: StoreClient<T>) -> Self {
        Self {
            client,
            session: Session::new(),
            employee_id: DEFAULT_EMPLOYEE_ID,
            last_sort: None,
        }
    }

    /// Employee recorded on orders placed through this storefront.
    pub fn with_employee_id(mut self, employee_id: i64) -> Self {
        self.employee_id = employee_id;
        self
    }

    pub fn client(&self) -> &StoreClient<T> {
        &self.client
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    // --- account ---

    pub fn login(&mut self, email: &str, password: &str) -> Result<&Customer, ApiError> {
        let email = required(email, "fill in all fields")?;
        let password = required(password, "fill in all fields")?;

        let credentials = Credentials {
            email,
            password_hash: hash_password(&password),
        };
        let customer = self.client.login(&credentials)?;
        self.session.sign_in(customer)
    }

    /// Register a new customer and sign in as them.
    pub fn register(&mut self, form: &RegistrationForm) -> Result<&Customer, ApiError> {
        let missing = "fill in all required fields";
        let registration = Registration {
            name: required(&form.name, missing)?,
            email: required(&form.email, missing)?,
            phone: normalize_phone(&required(&form.phone, missing)?),
            address: required(&form.address, missing)?,
            contact_person: required(&form.contact_person, missing)?,
            password_hash: hash_password(&required(&form.password, missing)?),
        };
        let customer = self.client.register(&registration)?;
        self.session.sign_in(customer)
    }

    pub fn logout(&mut self) {
        self.session.sign_out();
        self.last_sort = None;
    }

    pub fn profile(&self) -> Result<Customer, ApiError> {
        let customer_id = self.session.require_customer_id()?;
        self.client.customer(customer_id)
    }

    /// Send every profile field and mirror the change into the session.
    pub fn update_profile(&mut self, form: &ProfileForm) -> Result<(), ApiError> {
        let customer_id = self.session.require_customer_id()?;
        let missing = "name, phone and email are required";

        let update = CustomerUpdate {
            name: Some(required(&form.name, missing)?),
            phone: Some(required(&normalize_phone(&form.phone), missing)?),
            email: Some(required(&form.email, missing)?),
            contact_person: Some(form.contact_person.trim().to_string()),
            address: Some(form.address.trim().to_string()),
        };
        self.client.update_customer(customer_id, &update)?;
        self.session.update_contact(&update);
        Ok(())
    }

    // --- catalog ---

    pub fn catalog(&self) -> Vec<Product> {
        self.client.products().or_empty()
    }

    pub fn browse(&self, filter: &ProductFilter) -> Vec<Product> {
        self.client.filtered_products(filter).or_empty()
    }

    pub fn product(&self, product_id: i64) -> Result<Product, ApiError> {
        self.client.product(product_id)
    }

    pub fn search(&self, text: &str) -> Result<Vec<Product>, ApiError> {
        let query = required(text, "enter search criteria")?;
        Ok(self.client.search_products(&query).or_empty())
    }

    /// Ascending on a newly chosen field; asking for the same field again
    /// flips the direction.
    pub fn sort(&mut self, field: SortField) -> Vec<Product> {
        let order = match self.last_sort {
            Some((last, order)) if last == field => order.reversed(),
            _ => SortOrder::Asc,
        };
        self.last_sort = Some((field, order));
        self.client.sorted_products(field, order).or_empty()
    }

    pub fn current_sort(&self) -> Option<(SortField, SortOrder)> {
        self.last_sort
    }

    pub fn reset_filters(&mut self) -> Vec<Product> {
        self.last_sort = None;
        self.catalog()
    }

    // --- cart ---

    pub fn cart(&self) -> Result<Cart, ApiError> {
        let customer_id = self.session.require_customer_id()?;
        self.client.cart(customer_id)
    }

    pub fn add_to_cart(&self, product_id: i64) -> Result<CartItem, ApiError> {
        let customer_id = self.session.require_customer_id()?;
        self.client.add_to_cart(customer_id, product_id, 1)
    }

    pub fn remove_from_cart(&self, product_id: i64) -> Result<(), ApiError> {
        let customer_id = self.session.require_customer_id()?;
        self.client.remove_from_cart(customer_id, product_id)
    }

    /// Returns the server's confirmation. A reply carrying `error` instead
    /// of `message` is a domain failure with that text.
    pub fn clear_cart(&self) -> Result<String, ApiError> {
        let customer_id = self.session.require_customer_id()?;
        match self.client.clear_cart(customer_id)? {
            ClearCartReply {
                message: Some(message),
                ..
            } => Ok(message),
            ClearCartReply {
                error: Some(error), ..
            } => Err(ApiError::Domain(error)),
            ClearCartReply { .. } => Err(ApiError::Domain("unknown error".to_string())),
        }
    }

    pub fn checkout(&self) -> Result<(), ApiError> {
        let customer_id = self.session.require_customer_id()?;
        self.client.checkout(customer_id)
    }

    // --- orders ---

    /// Place a retail order for everything in the cart.
    pub fn place_order(&self) -> Result<Order, ApiError> {
        let customer_id = self.session.require_customer_id()?;
        let order = NewOrder {
            employee_id: self.employee_id,
            is_wholesale: false,
        };
        self.client.place_order(customer_id, &order)
    }

    /// Only `NotLoggedIn` is reported; any other failure reads as "no orders".
    pub fn orders(&self) -> Result<Vec<Order>, ApiError> {
        let customer_id = self.session.require_customer_id()?;
        Ok(self.client.orders(customer_id).or_empty())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;
    use crate::error::ErrorKind;
    use crate::http::HttpMethod;
    use crate::transport::stub::StubTransport;

    const CUSTOMER: &str = r#"{"CustomerID":7,"Name":"Acme","Email":"buyer@example.com","Phone":"+79990001122","Address":"Lenina 1","ContactPerson":"Ivan"}"#;

    fn shop(transport: StubTransport) -> Storefront<StubTransport> {
        Storefront::new(StoreClient::with_transport("http://127.0.0.1:8080", transport))
    }

    /// A storefront already signed in as customer 7, followed by `rest`.
    fn signed_in(rest: StubTransport) -> Storefront<StubTransport> {
        let mut shop = shop(rest);
        shop.session
            .sign_in(serde_json::from_str(CUSTOMER).unwrap())
            .unwrap();
        shop
    }

    fn last_body(shop: &Storefront<StubTransport>) -> Value {
        let req = shop.client().transport().last_request();
        serde_json::from_str(req.body.as_deref().unwrap()).unwrap()
    }

    #[test]
    fn normalize_phone_strips_mask() {
        assert_eq!(normalize_phone("+7(999)123-45-67"), "+79991234567");
        assert_eq!(normalize_phone("  12-34 "), "1234");
    }

    #[test]
    fn login_signs_in_and_hashes_password() {
        let mut shop = shop(StubTransport::new().respond(200, CUSTOMER));
        let customer = shop.login(" buyer@example.com ", "password").unwrap();
        assert_eq!(customer.id, 7);
        assert_eq!(shop.session().customer_id(), Some(7));
        assert_eq!(
            last_body(&shop),
            json!({
                "email": "buyer@example.com",
                "password_hash": "5e884898da28047151d0e56f8dc6292773603d0d6aabbdd62a11ef721d1542d8",
            })
        );
    }

    #[test]
    fn login_without_customer_id_stays_signed_out() {
        let mut shop = shop(StubTransport::new().respond(200, r#"{"Name":"Acme"}"#));
        let err = shop.login("buyer@example.com", "password").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Domain);
        assert!(!shop.session().is_logged_in());
    }

    #[test]
    fn login_rejected_by_server_shows_detail() {
        let mut shop = shop(StubTransport::new().respond(401, r#"{"detail":"Incorrect credentials"}"#));
        let err = shop.login("buyer@example.com", "wrong").unwrap_err();
        assert_eq!(err.user_message(), "Incorrect credentials");
        assert!(!shop.session().is_logged_in());
    }

    #[test]
    fn login_with_blank_fields_sends_nothing() {
        let mut shop = shop(StubTransport::new());
        let err = shop.login("  ", "password").unwrap_err();
        assert!(matches!(err, ApiError::InvalidInput(_)));
        assert!(shop.client().transport().requests().is_empty());
    }

    #[test]
    fn register_normalizes_phone_and_signs_in() {
        let mut shop = shop(StubTransport::new().respond(200, CUSTOMER));
        let form = RegistrationForm {
            name: "Acme".to_string(),
            email: "buyer@example.com".to_string(),
            phone: "+7(999)000-11-22".to_string(),
            address: "Lenina 1".to_string(),
            contact_person: "Ivan".to_string(),
            password: "password".to_string(),
        };
        shop.register(&form).unwrap();
        assert!(shop.session().is_logged_in());
        let body = last_body(&shop);
        assert_eq!(body["phone"], "+79990001122");
        assert_eq!(body["password_hash"].as_str().unwrap().len(), 64);
    }

    #[test]
    fn register_requires_every_field() {
        let mut shop = shop(StubTransport::new());
        let form = RegistrationForm {
            name: "Acme".to_string(),
            ..RegistrationForm::default()
        };
        assert!(matches!(shop.register(&form), Err(ApiError::InvalidInput(_))));
        assert!(shop.client().transport().requests().is_empty());
    }

    #[test]
    fn cart_operations_require_login() {
        let mut shop = shop(StubTransport::new());
        assert!(matches!(shop.cart(), Err(ApiError::NotLoggedIn)));
        assert!(matches!(shop.add_to_cart(1), Err(ApiError::NotLoggedIn)));
        assert!(matches!(shop.clear_cart(), Err(ApiError::NotLoggedIn)));
        assert!(matches!(shop.place_order(), Err(ApiError::NotLoggedIn)));
        assert!(matches!(shop.orders(), Err(ApiError::NotLoggedIn)));
        assert!(matches!(
            shop.update_profile(&ProfileForm::default()),
            Err(ApiError::NotLoggedIn)
        ));
        shop.logout();
        assert!(shop.client().transport().requests().is_empty());
    }

    #[test]
    fn cart_uses_session_customer() {
        let shop = signed_in(StubTransport::new().respond(
            200,
            r#"{"items":[{"ProductName":"Widget","Price":9.99,"Quantity":2}],"total_price":19.98,"discounted_price":17.98,"discount_rate":0.10}"#,
        ));
        let cart = shop.cart().unwrap();
        assert_eq!(cart.items[0].quantity, 2);
        assert_eq!(
            shop.client().transport().last_request().url,
            "http://127.0.0.1:8080/customers/7/cart"
        );
    }

    #[test]
    fn add_to_cart_sends_quantity_one() {
        let shop = signed_in(StubTransport::new().respond(
            200,
            r#"{"CartItemID":1,"ProductID":3,"Quantity":1,"ProductName":"Widget","Price":9.99,"AddedDate":"2026-10-19T10:00:00"}"#,
        ));
        let line = shop.add_to_cart(3).unwrap();
        assert_eq!(line.product_id, Some(3));
        assert_eq!(last_body(&shop), json!({"ProductID": 3, "Quantity": 1}));
    }

    #[test]
    fn clear_cart_flags_error_reply() {
        let shop = signed_in(
            StubTransport::new()
                .respond(200, r#"{"error":"cart already empty"}"#)
                .respond(200, r#"{"message":"Cart cleared"}"#)
                .respond(200, r#"{}"#),
        );

        let err = shop.clear_cart().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Domain);
        assert_eq!(err.user_message(), "cart already empty");

        assert_eq!(shop.clear_cart().unwrap(), "Cart cleared");

        let err = shop.clear_cart().unwrap_err();
        assert_eq!(err.user_message(), "unknown error");
    }

    #[test]
    fn sort_toggles_direction_on_same_field() {
        let products = r#"{"products":[]}"#;
        let mut shop = shop(
            StubTransport::new()
                .respond(200, products)
                .respond(200, products)
                .respond(200, products)
                .respond(200, products),
        );

        shop.sort(SortField::Name);
        shop.sort(SortField::Name);
        shop.sort(SortField::RetailPrice);
        shop.sort(SortField::RetailPrice);

        let urls: Vec<String> = shop
            .client()
            .transport()
            .requests()
            .into_iter()
            .map(|r| r.url)
            .collect();
        assert_eq!(
            urls,
            vec![
                "http://127.0.0.1:8080/products?sort_by=name_asc",
                "http://127.0.0.1:8080/products?sort_by=name_desc",
                "http://127.0.0.1:8080/products?sort_by=retail_price_asc",
                "http://127.0.0.1:8080/products?sort_by=retail_price_desc",
            ]
        );
        assert_eq!(
            shop.current_sort(),
            Some((SortField::RetailPrice, SortOrder::Desc))
        );
    }

    #[test]
    fn search_rejects_blank_text() {
        let shop = shop(StubTransport::new().respond(400, r#"{"detail":"Search query must be at least 2 characters long"}"#));
        assert!(matches!(shop.search("   "), Err(ApiError::InvalidInput(_))));
        assert!(shop.search("x").unwrap().is_empty());
    }

    #[test]
    fn orders_unreachable_reads_as_no_orders() {
        let shop = signed_in(StubTransport::new().unreachable());
        assert!(shop.orders().unwrap().is_empty());
    }

    #[test]
    fn place_order_sends_employee_and_retail_flag() {
        let shop = signed_in(StubTransport::new().respond(
            200,
            r#"{"TransactionID":9,"CustomerID":7,"EmployeeID":4,"IsWholesale":false,"TransactionDate":"2026-10-19T12:00:00","total_amount":19.98,"discount_amount":2.0,"details":[]}"#,
        ))
        .with_employee_id(4);
        let order = shop.place_order().unwrap();
        assert_eq!(order.id, 9);
        let req = shop.client().transport().last_request();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(last_body(&shop), json!({"employee_id": 4, "is_wholesale": false}));
    }

    #[test]
    fn update_profile_mirrors_into_session() {
        let mut shop = signed_in(StubTransport::new().respond(200, CUSTOMER));
        shop.update_profile(&ProfileForm {
            name: "Acme Ltd".to_string(),
            phone: "+7(000)000-00-00".to_string(),
            email: "ops@example.com".to_string(),
            contact_person: "Olga".to_string(),
            address: "Mira 5".to_string(),
        })
        .unwrap();

        let customer = shop.session().customer().unwrap();
        assert_eq!(customer.name, "Acme Ltd");
        assert_eq!(customer.phone, "+70000000000");
        assert_eq!(customer.email, "ops@example.com");
        assert_eq!(last_body(&shop)["ContactPerson"], "Olga");
    }

    #[test]
    fn failed_profile_update_leaves_session() {
        let mut shop = signed_in(StubTransport::new().respond(404, r#"{"detail":"Customer not found"}"#));
        let err = shop
            .update_profile(&ProfileForm {
                name: "Other".to_string(),
                phone: "1".to_string(),
                email: "x@y.z".to_string(),
                ..ProfileForm::default()
            })
            .unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert_eq!(shop.session().customer().unwrap().name, "Acme");
    }

    #[test]
    fn profile_requires_name_phone_email() {
        let mut shop = signed_in(StubTransport::new());
        let err = shop
            .update_profile(&ProfileForm {
                name: "Acme".to_string(),
                phone: "--".to_string(),
                email: "a@b.c".to_string(),
                ..ProfileForm::default()
            })
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidInput(_)));
    }
}
