//! Command bodies: call the storefront and print the result to stdout.

use storefront_core::report::{
    cart_rows, order_receipt, product_rows, render_table, TableRow, CART_HEADERS, PRODUCT_HEADERS,
};
use storefront_core::{
    ApiError, Product, ProductFilter, ProfileForm, RegistrationForm, SortField, SortOrder,
    Storefront,
};

/// Profile fields given on the command line; `None` keeps the stored value.
pub struct ProfileChanges {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub contact_person: Option<String>,
    pub address: Option<String>,
}

fn print_products(products: &[Product]) {
    if products.is_empty() {
        println!("No products found.");
        return;
    }
    println!("{}", render_table(&PRODUCT_HEADERS, &product_rows(products)));
}

pub fn products(
    shop: &Storefront,
    sort: Option<SortField>,
    desc: bool,
    below: Option<f64>,
    above: Option<f64>,
    name: Option<String>,
) {
    let order = if desc { SortOrder::Desc } else { SortOrder::Asc };
    let filter = ProductFilter {
        price_lt: below,
        price_gt: above,
        name,
        sort: sort.map(|field| (field, order)),
    };
    print_products(&shop.browse(&filter));
}

pub fn search(shop: &Storefront, query: &str) -> Result<(), ApiError> {
    print_products(&shop.search(query)?);
    Ok(())
}

pub fn show(shop: &Storefront, product_id: i64) -> Result<(), ApiError> {
    let product = shop.product(product_id)?;
    print_products(std::slice::from_ref(&product));
    Ok(())
}

pub fn cart(shop: &Storefront) -> Result<(), ApiError> {
    let cart = shop.cart()?;
    if cart.is_empty() {
        println!("Your cart is empty.");
        return Ok(());
    }
    let rows: Vec<[String; 4]> = cart_rows(&cart).iter().map(TableRow::cells).collect();
    println!("{}", render_table(&CART_HEADERS, &rows));
    Ok(())
}

pub fn add(shop: &Storefront, product_id: i64) -> Result<(), ApiError> {
    let line = shop.add_to_cart(product_id)?;
    println!(
        "Added {} (now {} in cart).",
        line.product_name, line.quantity
    );
    Ok(())
}

pub fn remove(shop: &Storefront, product_id: i64) -> Result<(), ApiError> {
    shop.remove_from_cart(product_id)?;
    println!("Removed product {product_id} from the cart.");
    Ok(())
}

pub fn clear_cart(shop: &Storefront) -> Result<(), ApiError> {
    println!("{}", shop.clear_cart()?);
    Ok(())
}

pub fn checkout(shop: &Storefront) -> Result<(), ApiError> {
    shop.checkout()?;
    println!("Checked out.");
    Ok(())
}

pub fn order(shop: &Storefront) -> Result<(), ApiError> {
    let order = shop.place_order()?;
    println!("Order placed.");
    for line in order_receipt(&order) {
        println!("  {line}");
    }
    Ok(())
}

pub fn orders(shop: &Storefront) -> Result<(), ApiError> {
    let orders = shop.orders()?;
    if orders.is_empty() {
        println!("No orders yet.");
        return Ok(());
    }
    for order in &orders {
        for line in order_receipt(order) {
            println!("{line}");
        }
        for detail in &order.details {
            println!(
                "  {} x{} @ {:.2} = {:.2}",
                detail.product_name, detail.quantity, detail.current_price, detail.calculated_total
            );
        }
        println!();
    }
    Ok(())
}

pub fn profile(shop: &Storefront) -> Result<(), ApiError> {
    let customer = shop.profile()?;
    println!("Name:           {}", customer.name);
    println!("Email:          {}", customer.email);
    println!("Phone:          {}", customer.phone);
    println!("Address:        {}", customer.address);
    println!("Contact person: {}", customer.contact_person);
    Ok(())
}

/// Fill the unchanged fields from the stored profile, then save.
pub fn update_profile(shop: &mut Storefront, changes: ProfileChanges) -> Result<(), ApiError> {
    let current = shop.profile()?;
    let form = ProfileForm {
        name: changes.name.unwrap_or(current.name),
        phone: changes.phone.unwrap_or(current.phone),
        email: changes.email.unwrap_or(current.email),
        contact_person: changes.contact_person.unwrap_or(current.contact_person),
        address: changes.address.unwrap_or(current.address),
    };
    shop.update_profile(&form)?;
    println!("Profile updated.");
    Ok(())
}

pub fn register(shop: &mut Storefront, form: &RegistrationForm) -> Result<(), ApiError> {
    let customer = shop.register(form)?;
    println!("Registered {} (customer #{}).", customer.name, customer.id);
    Ok(())
}
