//! Plain-data renderings of API results for a front end to display.

use crate::types::{Cart, Order, Product};

/// One row of the cart table: product, quantity, unit price, line sum.
/// Summary rows leave the middle columns blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub label: String,
    pub quantity: String,
    pub price: String,
    pub sum: String,
}

impl TableRow {
    fn summary(label: String, sum: String) -> Self {
        Self {
            label,
            quantity: String::new(),
            price: String::new(),
            sum,
        }
    }

    pub fn cells(&self) -> [String; 4] {
        [
            self.label.clone(),
            self.quantity.clone(),
            self.price.clone(),
            self.sum.clone(),
        ]
    }
}

pub const CART_HEADERS: [&str; 4] = ["Product", "Qty", "Price", "Sum"];

/// Item rows followed by the total, discount and payable rows.
pub fn cart_rows(cart: &Cart) -> Vec<TableRow> {
    let mut rows: Vec<TableRow> = cart
        .items
        .iter()
        .map(|item| TableRow {
            label: item.product_name.clone(),
            quantity: item.quantity.to_string(),
            price: format!("{:.2}", item.price),
            sum: format!("{:.2}", item.line_total()),
        })
        .collect();

    rows.push(TableRow::summary(
        "Total".to_string(),
        format!("{:.2}", cart.total_price),
    ));
    rows.push(TableRow::summary(
        format!("Discount ({:.1}%)", cart.discount_rate * 100.0),
        format!("-{:.2}", cart.discount_amount()),
    ));
    rows.push(TableRow::summary(
        "Payable".to_string(),
        format!("{:.2}", cart.discounted_price),
    ));
    rows
}

pub const PRODUCT_HEADERS: [&str; 5] = ["ID", "Name", "Wholesale", "Retail", "Description"];

pub fn product_rows(products: &[Product]) -> Vec<[String; 5]> {
    products
        .iter()
        .map(|p| {
            [
                p.id.to_string(),
                p.name.clone(),
                format!("{:.2}", p.wholesale_price),
                format!("{:.2}", p.retail_price),
                p.description.clone().unwrap_or_default(),
            ]
        })
        .collect()
}

/// Summary lines printed after an order is placed.
pub fn order_receipt(order: &Order) -> Vec<String> {
    let discount = order.discount_amount.unwrap_or(0.0);
    vec![
        format!("Order #{}", order.id),
        format!("Date: {}", order.date.as_deref().unwrap_or("-")),
        format!(
            "Type: {}",
            if order.is_wholesale { "wholesale" } else { "retail" }
        ),
        format!("Amount: {:.2}", order.total_amount),
        format!("Discount: {discount:.2}"),
        format!("Payable: {:.2}", order.payable()),
    ]
}

/// Render rows as aligned text columns.
pub fn render_table<R: AsRef<[String]>>(headers: &[&str], rows: &[R]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row.as_ref()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: Vec<&str>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = vec![line(headers.to_vec())];
    out.extend(
        rows.iter()
            .map(|row| line(row.as_ref().iter().map(String::as_str).collect())),
    );
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CartItem, OrderLine};

    fn sample_cart() -> Cart {
        serde_json::from_str(
            r#"{"items":[{"ProductName":"Widget","Price":9.99,"Quantity":2}],"total_price":19.98,"discounted_price":17.98,"discount_rate":0.10}"#,
        )
        .unwrap()
    }

    #[test]
    fn cart_rows_show_items_and_summary() {
        let rows = cart_rows(&sample_cart());
        assert_eq!(rows.len(), 4);
        assert_eq!(
            rows[0],
            TableRow {
                label: "Widget".to_string(),
                quantity: "2".to_string(),
                price: "9.99".to_string(),
                sum: "19.98".to_string(),
            }
        );
        assert_eq!(rows[1].label, "Total");
        assert_eq!(rows[1].sum, "19.98");
        assert_eq!(rows[2].label, "Discount (10.0%)");
        assert_eq!(rows[2].sum, "-2.00");
        assert_eq!(rows[3].label, "Payable");
        assert_eq!(rows[3].sum, "17.98");
        assert!(rows[3].quantity.is_empty());
    }

    #[test]
    fn cart_without_discount() {
        let cart = Cart {
            items: vec![CartItem {
                id: Some(1),
                product_id: Some(2),
                product_name: "Bolt".to_string(),
                price: 0.5,
                quantity: 3,
                added_date: None,
            }],
            total_price: 1.5,
            discounted_price: 1.5,
            discount_rate: 0.0,
            total_items: Some(3),
            discount_id: None,
            cart_id: Some(1),
            customer_id: Some(7),
        };
        let rows = cart_rows(&cart);
        assert_eq!(rows[0].sum, "1.50");
        assert_eq!(rows[2].label, "Discount (0.0%)");
        assert_eq!(rows[2].sum, "-0.00");
    }

    #[test]
    fn product_rows_format_prices() {
        let products = vec![Product {
            id: 1,
            name: "Widget".to_string(),
            wholesale_price: 5.0,
            retail_price: 9.99,
            description: None,
            image: None,
        }];
        assert_eq!(
            product_rows(&products),
            vec![[
                "1".to_string(),
                "Widget".to_string(),
                "5.00".to_string(),
                "9.99".to_string(),
                String::new(),
            ]]
        );
    }

    #[test]
    fn receipt_lists_amounts() {
        let order = Order {
            id: 42,
            customer_id: Some(7),
            employee_id: Some(1),
            is_wholesale: false,
            date: Some("2026-10-19T12:00:00Z".to_string()),
            total_amount: 19.98,
            discount_amount: Some(2.0),
            details: vec![OrderLine {
                id: 1,
                order_id: 42,
                product_id: 1,
                quantity: 2,
                discount: Some(0.1),
                product_name: "Widget".to_string(),
                current_price: 9.99,
                calculated_total: 17.98,
            }],
        };
        let lines = order_receipt(&order);
        assert_eq!(lines[0], "Order #42");
        assert_eq!(lines[2], "Type: retail");
        assert_eq!(lines[3], "Amount: 19.98");
        assert_eq!(lines[4], "Discount: 2.00");
        assert_eq!(lines[5], "Payable: 17.98");
    }

    #[test]
    fn render_table_aligns_columns() {
        let rows: Vec<[String; 4]> = cart_rows(&sample_cart()).iter().map(TableRow::cells).collect();
        let text = render_table(&CART_HEADERS, &rows);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("Product"));
        assert!(lines[1].starts_with("Widget"));
        assert!(lines[4].ends_with("17.98"));
    }
}
