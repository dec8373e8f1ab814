//! Product records and the read-only catalog store
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use tracing::warn;

/// Stock at or below this (and above zero) is reported as low.
pub const LOW_STOCK_THRESHOLD: u32 = 10;

/// Price after applying a percentage discount. Discounts above 100 are
/// treated as 100 so the result never goes negative.
pub fn effective_price(price: f64, discount: u8) -> f64 {
    let price = price.max(0.0);
    if discount == 0 {
        return price;
    }
    price * f64::from(100 - discount.min(100)) / 100.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
    pub brand: String,
    pub price: f64,
    #[serde(default, deserialize_with = "saturating_percent")]
    pub discount: u8, // percent, 0..=100
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub rating: f64, // 0..=5
    #[serde(default)]
    pub review_count: u32,
    #[serde(default)]
    pub features: BTreeSet<String>,
    #[serde(default)]
    pub is_trending: bool,
    #[serde(default)]
    pub express_delivery: bool,
}

// Out-of-range discounts in catalog data clamp to 0..=100 instead of
// rejecting the whole catalog.
fn saturating_percent<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = f64::deserialize(deserializer)?;
    if !(0.0..=100.0).contains(&raw) {
        warn!(discount = raw, "catalog discount out of range, clamping");
    }
    Ok(raw.clamp(0.0, 100.0).round() as u8)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockStatus {
    InStock,
    LowStock(u32),
    OutOfStock,
}

impl Product {
    pub fn new(id: u64, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            description: String::new(),
            category: String::new(),
            brand: String::new(),
            price: 0.0,
            discount: 0,
            stock: 0,
            rating: 0.0,
            review_count: 0,
            features: BTreeSet::new(),
            is_trending: false,
            express_delivery: false,
        }
    }
    pub fn set_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }
    pub fn set_category(mut self, category: &str) -> Self {
        self.category = category.to_string();
        self
    }
    pub fn set_brand(mut self, brand: &str) -> Self {
        self.brand = brand.to_string();
        self
    }
    pub fn set_price(mut self, price: f64) -> Self {
        self.price = price.max(0.0);
        self
    }
    pub fn set_discount(mut self, discount: u8) -> Self {
        self.discount = discount.min(100);
        self
    }
    pub fn set_stock(mut self, stock: u32) -> Self {
        self.stock = stock;
        self
    }
    pub fn set_rating(mut self, rating: f64) -> Self {
        self.rating = rating.clamp(0.0, 5.0);
        self
    }
    pub fn set_review_count(mut self, count: u32) -> Self {
        self.review_count = count;
        self
    }
    pub fn add_feature(mut self, feature: &str) -> Self {
        self.features.insert(feature.to_string());
        self
    }
    pub fn set_trending(mut self, trending: bool) -> Self {
        self.is_trending = trending;
        self
    }
    pub fn set_express_delivery(mut self, express: bool) -> Self {
        self.express_delivery = express;
        self
    }

    pub fn effective_price(&self) -> f64 {
        effective_price(self.price, self.discount)
    }

    pub fn has_feature(&self, feature: &str) -> bool {
        self.features.contains(feature)
    }

    pub fn stock_status(&self) -> StockStatus {
        match self.stock {
            0 => StockStatus::OutOfStock,
            n if n <= LOW_STOCK_THRESHOLD => StockStatus::LowStock(n),
            _ => StockStatus::InStock,
        }
    }
}

/// A category or brand with the number of catalog products carrying it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facet {
    pub id: String,
    pub name: String,
    pub count: usize,
}

/// The immutable source catalog, loaded once at startup.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
    categories: Vec<Facet>,
    brands: Vec<Facet>,
}

impl Catalog {
    /// Builds the catalog. Products repeating an earlier id are dropped.
    pub fn new(products: Vec<Product>) -> Self {
        let mut seen = HashSet::new();
        let products: Vec<Product> = products
            .into_iter()
            .filter(|product| {
                let fresh = seen.insert(product.id);
                if !fresh {
                    warn!(id = product.id, "duplicate product id dropped from catalog");
                }
                fresh
            })
            .collect();

        let categories = facets(products.iter().map(|p| p.category.as_str()));
        let brands = facets(products.iter().map(|p| p.brand.as_str()));

        Self {
            products,
            categories,
            brands,
        }
    }

    /// Parses a JSON array of products.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let products: Vec<Product> = serde_json::from_str(json)?;
        Ok(Self::new(products))
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }
    pub fn get(&self, id: u64) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }
    pub fn categories(&self) -> &[Facet] {
        &self.categories
    }
    pub fn brands(&self) -> &[Facet] {
        &self.brands
    }
    pub fn len(&self) -> usize {
        self.products.len()
    }
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Highest effective price in the catalog, 0 when empty.
    pub fn max_price(&self) -> f64 {
        self.products
            .iter()
            .map(Product::effective_price)
            .fold(0.0, f64::max)
    }

    pub fn average_rating(&self) -> f64 {
        if self.products.is_empty() {
            return 0.0;
        }
        self.products.iter().map(|p| p.rating).sum::<f64>() / self.products.len() as f64
    }
}

fn facets<'a>(values: impl Iterator<Item = &'a str>) -> Vec<Facet> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for value in values.filter(|v| !v.is_empty()) {
        *counts.entry(value).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .map(|(id, count)| Facet {
            id: id.to_string(),
            name: id.to_string(),
            count,
        })
        .collect()
}
