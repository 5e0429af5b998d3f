//! The signed-in customer.
//!
//! # Design
//! A `Session` is an ordinary value owned by whoever drives the storefront,
//! so several independent sessions can coexist (tests do this). It holds at
//! most one identity; "signed out" is `None`, which no valid customer id can
//! be confused with.

use crate::error::ApiError;
use crate::types::{Customer, CustomerUpdate};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    customer: Option<Customer>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current identity. Server ids are positive; anything else
    /// is refused and the session is left untouched.
    pub fn sign_in(&mut self, customer: Customer) -> Result<&Customer, ApiError> {
        if customer.id <= 0 {
            return Err(ApiError::Domain(format!(
                "server returned invalid customer id {}",
                customer.id
            )));
        }
        tracing::info!(customer_id = customer.id, "signed in");
        Ok(self.customer.insert(customer))
    }

    pub fn sign_out(&mut self) {
        if let Some(customer) = self.customer.take() {
            tracing::info!(customer_id = customer.id, "signed out");
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.customer.is_some()
    }

    pub fn customer(&self) -> Option<&Customer> {
        self.customer.as_ref()
    }

    pub fn customer_id(&self) -> Option<i64> {
        self.customer.as_ref().map(|c| c.id)
    }

    pub fn require_customer_id(&self) -> Result<i64, ApiError> {
        self.customer_id().ok_or(ApiError::NotLoggedIn)
    }

    /// Apply the fields of a successful profile update. The id never changes.
    pub fn update_contact(&mut self, update: &CustomerUpdate) {
        let Some(customer) = self.customer.as_mut() else {
            return;
        };
        if let Some(name) = &update.name {
            customer.name.clone_from(name);
        }
        if let Some(email) = &update.email {
            customer.email.clone_from(email);
        }
        if let Some(phone) = &update.phone {
            customer.phone.clone_from(phone);
        }
        if let Some(address) = &update.address {
            customer.address.clone_from(address);
        }
        if let Some(contact_person) = &update.contact_person {
            customer.contact_person.clone_from(contact_person);
        }
    }
}
