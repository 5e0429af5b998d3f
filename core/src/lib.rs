//! Synchronous API client for the storefront service.
//!
//! # Overview
//! Every operation is split into a pure `build_*` step that produces an
//! `HttpRequest` and a pure `parse_*` step that consumes an `HttpResponse`.
//! The convenience methods in between run the round-trip through a
//! `Transport`, by default a blocking `ureq` agent.
//!
//! # Design
//! - `StoreClient` holds only the base URL and its transport.
//! - `classify` turns a raw response into a `Reply` or an `ApiError`; the
//!   typed operations in `resources` decode the reply into DTOs.
//! - `Storefront` layers the customer session and form checks on top.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod password;
pub mod report;
pub mod resources;
pub mod session;
pub mod shop;
pub mod transport;
pub mod types;

pub use client::{classify, Reply, StoreClient};
pub use config::{ClientConfig, ConfigError};
pub use error::{ApiError, ErrorKind};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use password::hash_password;
pub use resources::OrEmpty;
pub use session::Session;
pub use shop::{ProfileForm, RegistrationForm, Storefront};
pub use transport::{Transport, UreqTransport};
pub use types::{
    Cart, CartItem, ClearCartReply, Credentials, Customer, CustomerUpdate, NewCartItem, NewOrder,
    Order, OrderLine, Product, ProductFilter, Registration, SortField, SortOrder,
};
