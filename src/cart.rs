//! Cart ledger: one line per product, quantities always >= 1
use super::product::{Product, effective_price};
use super::utils::round_cents;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Pricing fields copied from the catalog when a product enters the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, minicbor::Encode, minicbor::Decode)]
#[serde(rename_all = "camelCase")]
pub struct ProductSnapshot {
    #[n(0)]
    pub id: u64,
    #[n(1)]
    pub name: String,
    #[n(2)]
    pub category: String,
    #[n(3)]
    pub brand: String,
    #[n(4)]
    pub price: f64,
    #[n(5)]
    pub discount: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, minicbor::Encode, minicbor::Decode)]
pub struct CartLine {
    #[n(0)]
    pub product: ProductSnapshot,
    #[n(1)]
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CartAction {
    Add {
        product: ProductSnapshot,
        quantity: u32,
    },
    SetQuantity {
        product_id: u64,
        quantity: i64,
    },
    Remove {
        product_id: u64,
    },
    Clear,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<CartLine>", into = "Vec<CartLine>")]
pub struct Cart {
    lines: Vec<CartLine>,
}

/// Amounts shown at checkout, rounded to cents. Shipping is free.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CheckoutSummary {
    pub subtotal: f64,
    pub shipping: f64,
    pub tax: f64,
    pub total: f64,
}

impl From<&Product> for ProductSnapshot {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            category: product.category.clone(),
            brand: product.brand.clone(),
            price: product.price,
            discount: product.discount,
        }
    }
}

impl ProductSnapshot {
    pub fn effective_price(&self) -> f64 {
        effective_price(self.price, self.discount)
    }
}

impl CartLine {
    pub fn line_total(&self) -> f64 {
        self.product.effective_price() * f64::from(self.quantity)
    }
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reduce(mut self, action: CartAction) -> Self {
        match action {
            CartAction::Add { product, quantity } => {
                // callers only add positive amounts; zero counts as one
                let quantity = quantity.max(1);
                match self.line_mut(product.id) {
                    Some(line) => line.quantity = line.quantity.saturating_add(quantity),
                    None => self.lines.push(CartLine { product, quantity }),
                }
            }
            CartAction::SetQuantity {
                product_id,
                quantity,
            } => {
                if quantity < 1 {
                    return self.reduce(CartAction::Remove { product_id });
                }
                if let Some(line) = self.line_mut(product_id) {
                    line.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
                }
            }
            CartAction::Remove { product_id } => self.lines.retain(|l| l.product.id != product_id),
            CartAction::Clear => self.lines.clear(),
        }
        self
    }

    fn line_mut(&mut self, product_id: u64) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|l| l.product.id == product_id)
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }
    pub fn get(&self, product_id: u64) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.product.id == product_id)
    }
    pub fn contains(&self, product_id: u64) -> bool {
        self.get(product_id).is_some()
    }
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of quantity times effective price over all lines.
    pub fn total(&self) -> f64 {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Sum of quantities over all lines.
    pub fn count(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }

    pub fn summary(&self, tax_rate: f64) -> CheckoutSummary {
        let subtotal = self.total();
        let tax = subtotal * tax_rate;
        CheckoutSummary {
            subtotal: round_cents(subtotal),
            shipping: 0.0,
            tax: round_cents(tax),
            total: round_cents(subtotal + tax),
        }
    }
}

// Persisted carts are merged by product id and stripped of empty lines.
impl From<Vec<CartLine>> for Cart {
    fn from(lines: Vec<CartLine>) -> Self {
        let mut cart = Cart::new();
        for line in lines {
            if line.quantity == 0 {
                warn!(id = line.product.id, "dropping zero quantity cart line");
                continue;
            }
            cart = cart.reduce(CartAction::Add {
                product: line.product,
                quantity: line.quantity,
            });
        }
        cart
    }
}

impl From<Cart> for Vec<CartLine> {
    fn from(cart: Cart) -> Self {
        cart.lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(id: u64, price: f64, discount: u8) -> ProductSnapshot {
        ProductSnapshot::from(
            &Product::new(id, "item")
                .set_price(price)
                .set_discount(discount),
        )
    }

    fn add(cart: Cart, id: u64, price: f64, quantity: u32) -> Cart {
        cart.reduce(CartAction::Add {
            product: snapshot(id, price, 0),
            quantity,
        })
    }

    #[test]
    fn adding_twice_merges_lines() {
        let cart = add(add(Cart::new(), 1, 10.0, 1), 1, 10.0, 1);

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.count(), 2);
        assert_eq!(cart.total(), 20.0);
    }

    #[test]
    fn zero_quantity_add_counts_as_one() {
        let cart = add(Cart::new(), 1, 10.0, 0);
        assert_eq!(cart.count(), 1);
    }

    #[test]
    fn set_quantity_below_one_removes() {
        let cart = add(add(Cart::new(), 1, 10.0, 3), 2, 5.0, 1);

        let cart = cart.reduce(CartAction::SetQuantity {
            product_id: 1,
            quantity: 0,
        });
        assert!(!cart.contains(1));
        assert_eq!(cart.total(), 5.0);

        let cart = cart.reduce(CartAction::SetQuantity {
            product_id: 2,
            quantity: -4,
        });
        assert!(cart.is_empty());
    }

    #[test]
    fn set_quantity_on_missing_line_is_noop() {
        let cart = add(Cart::new(), 1, 10.0, 1).reduce(CartAction::SetQuantity {
            product_id: 99,
            quantity: 5,
        });

        assert_eq!(cart.count(), 1);
        assert!(!cart.contains(99));
    }

    #[test]
    fn remove_missing_is_noop_and_clear_empties() {
        let cart = add(Cart::new(), 1, 10.0, 1).reduce(CartAction::Remove { product_id: 5 });
        assert_eq!(cart.count(), 1);

        assert!(cart.reduce(CartAction::Clear).is_empty());
    }

    #[test]
    fn total_uses_snapshot_discount() {
        let cart = Cart::new().reduce(CartAction::Add {
            product: snapshot(2, 50.0, 20),
            quantity: 3,
        });

        assert_eq!(cart.total(), 120.0);
    }

    #[test]
    fn summary_adds_tax() {
        let cart = add(Cart::new(), 1, 100.0, 2);
        let summary = cart.summary(0.08);

        assert_eq!(summary.subtotal, 200.0);
        assert_eq!(summary.shipping, 0.0);
        assert_eq!(summary.tax, 16.0);
        assert_eq!(summary.total, 216.0);
    }

    #[test]
    fn persisted_lines_are_normalized() {
        let json = r#"[
            {"product": {"id": 1, "name": "a", "category": "", "brand": "", "price": 10.0, "discount": 0}, "quantity": 2},
            {"product": {"id": 1, "name": "a", "category": "", "brand": "", "price": 10.0, "discount": 0}, "quantity": 1},
            {"product": {"id": 2, "name": "b", "category": "", "brand": "", "price": 5.0, "discount": 0}, "quantity": 0}
        ]"#;
        let cart: Cart = serde_json::from_str(json).unwrap();

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.count(), 3);
    }
}
