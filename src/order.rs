//! Orders committed from the cart and the newest-first order journal
use super::cart::{Cart, CartLine};
use super::error::OrderError;
use super::utils::{self, ORDER_HRP};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimeStamp(DateTime<Utc>);

impl TimeStamp {
    pub fn new() -> Self {
        Self(Utc::now())
    }
    pub fn new_with(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        min: u32,
        sec: u32,
    ) -> Option<Self> {
        Utc.with_ymd_and_hms(year, month, day, hour, min, sec)
            .single()
            .map(Self)
    }
    pub fn to_datetime_utc(&self) -> DateTime<Utc> {
        self.0
    }
}

impl Default for TimeStamp {
    fn default() -> Self {
        Self::new()
    }
}

impl From<DateTime<Utc>> for TimeStamp {
    fn from(value: DateTime<Utc>) -> Self {
        TimeStamp(value)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderDetails {
    pub shipping_address: String,
    pub payment_method: String,
}

impl OrderDetails {
    pub fn new(shipping_address: &str, payment_method: &str) -> Self {
        Self {
            shipping_address: shipping_address.to_string(),
            payment_method: payment_method.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String, // bech32m encoded uuid7, hrp `ord_`
    pub date: TimeStamp,
    pub items: Vec<CartLine>,
    pub total: f64,
    pub status: OrderStatus,
    pub shipping_address: String,
    pub payment_method: String,
    // sha256 of the cbor encoded items
    #[serde(default)]
    pub items_digest: String,
}

impl Order {
    /// Freezes the cart contents into a new `processing` order. The cart itself
    /// is left untouched.
    ///
    /// Checkout never fails: an id that can't be bech32 encoded falls back to
    /// the plain uuid, and a digest that can't be taken is left empty.
    pub fn commit(cart: &Cart, details: OrderDetails) -> Self {
        let id = utils::new_uuid_to_bech32(ORDER_HRP).unwrap_or_else(|err| {
            warn!(error = %err, "bech32 order id failed, using plain uuid");
            uuid7::uuid7().to_string()
        });
        let items = cart.lines().to_vec();
        let items_digest = items_digest(&items).unwrap_or_else(|err| {
            warn!(order_id = %id, error = %err, "order committed without items digest");
            String::new()
        });

        Self {
            id,
            date: TimeStamp::new(),
            items,
            total: cart.total(),
            status: OrderStatus::Processing,
            shipping_address: details.shipping_address,
            payment_method: details.payment_method,
            items_digest,
        }
    }

    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|l| u64::from(l.quantity)).sum()
    }

    /// Checks the frozen items still hash to the digest taken at commit.
    pub fn verify_items(&self) -> bool {
        items_digest(&self.items).is_ok_and(|digest| digest == self.items_digest)
    }
}

pub fn items_digest(items: &[CartLine]) -> Result<String, OrderError> {
    let cbor = minicbor::to_vec(items).map_err(|e| OrderError::Encode(e.to_string()))?;
    Ok(sha256::digest(&cbor))
}

/// Append-only log of committed orders, newest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderJournal {
    orders: Vec<Order>,
}

impl OrderJournal {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn record(&mut self, order: Order) {
        self.orders.insert(0, order);
    }
    pub fn latest(&self) -> Option<&Order> {
        self.orders.first()
    }
    pub fn get(&self, id: &str) -> Option<&Order> {
        self.orders.iter().find(|o| o.id == id)
    }
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }
    pub fn len(&self) -> usize {
        self.orders.len()
    }
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}
