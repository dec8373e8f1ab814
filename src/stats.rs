//! Dashboard summary figures. Only `total_products` and `average_rating` come
//! from the catalog; the rest are fixed display values.
use super::product::Catalog;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_products: usize,
    pub average_rating: f64,
    pub total_sales: u64,
    pub total_orders: u64,
    pub total_customers: u64,
    pub revenue_growth: f64,
    pub order_growth: f64,
    pub customer_growth: f64,
}

impl DashboardStats {
    pub fn for_catalog(catalog: &Catalog) -> Self {
        Self {
            total_products: catalog.len(),
            average_rating: (catalog.average_rating() * 10.0).round() / 10.0,
            total_sales: 125_430,
            total_orders: 2_456,
            total_customers: 1_234,
            revenue_growth: 24.5,
            order_growth: 18.2,
            customer_growth: 12.7,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::Product;

    #[test]
    fn counts_catalog_products() {
        let catalog = Catalog::new(vec![
            Product::new(1, "a").set_rating(4.0),
            Product::new(2, "b").set_rating(5.0),
        ]);
        let stats = DashboardStats::for_catalog(&catalog);

        assert_eq!(stats.total_products, 2);
        assert_eq!(stats.average_rating, 4.5);
        assert_eq!(stats.total_sales, 125_430);
    }

    #[test]
    fn empty_catalog_has_zero_rating() {
        let stats = DashboardStats::for_catalog(&Catalog::default());
        assert_eq!(stats.total_products, 0);
        assert_eq!(stats.average_rating, 0.0);
    }
}
