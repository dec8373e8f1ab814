//! Filter state, its reducer, and the pure filter & sort pass over the catalog
use super::config::DEFAULT_PRICE_CEILING;
use super::product::{Catalog, Product};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::convert::Infallible;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", from = "String")]
pub enum SortBy {
    #[default]
    Featured,
    Newest,
    PriceLow,
    PriceHigh,
    Rating,
}

impl SortBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Featured => "featured",
            Self::Newest => "newest",
            Self::PriceLow => "price-low",
            Self::PriceHigh => "price-high",
            Self::Rating => "rating",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Featured => "Featured",
            Self::Newest => "Newest",
            Self::PriceLow => "Price: Low to High",
            Self::PriceHigh => "Price: High to Low",
            Self::Rating => "Top Rated",
        }
    }

    fn compare(&self, a: &Product, b: &Product) -> Ordering {
        match self {
            Self::PriceLow => a.effective_price().total_cmp(&b.effective_price()),
            Self::PriceHigh => b.effective_price().total_cmp(&a.effective_price()),
            Self::Rating => b.rating.total_cmp(&a.rating),
            Self::Newest => b.id.cmp(&a.id),
            Self::Featured => b
                .is_trending
                .cmp(&a.is_trending)
                .then_with(|| b.rating.total_cmp(&a.rating)),
        }
    }
}

// unknown keys sort as featured
impl FromStr for SortBy {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "newest" => Self::Newest,
            "price-low" => Self::PriceLow,
            "price-high" => Self::PriceHigh,
            "rating" => Self::Rating,
            _ => Self::Featured,
        })
    }
}

impl From<&str> for SortBy {
    fn from(value: &str) -> Self {
        let Ok(sort) = value.parse::<SortBy>();
        sort
    }
}

impl From<String> for SortBy {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    pub categories: BTreeSet<String>,
    pub price_range: (f64, f64),
    pub min_rating: f64,
    pub brands: BTreeSet<String>,
    pub features: BTreeSet<String>, // all must be present on a product
    pub sort_by: SortBy,
    pub search_query: String,
}

impl Default for FilterState {
    fn default() -> Self {
        Self::with_ceiling(DEFAULT_PRICE_CEILING)
    }
}

/// Partial update merged field by field into a [`FilterState`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterPatch {
    pub categories: Option<BTreeSet<String>>,
    pub price_range: Option<(f64, f64)>,
    pub min_rating: Option<f64>,
    pub brands: Option<BTreeSet<String>>,
    pub features: Option<BTreeSet<String>>,
    pub sort_by: Option<SortBy>,
    pub search_query: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FilterAction {
    Update(FilterPatch),
    ToggleCategory(String),
    ToggleBrand(String),
    ToggleFeature(String),
    Clear { price_ceiling: f64 },
}

impl FilterState {
    /// Default filters with the price range spanning `[0, ceiling]`.
    pub fn with_ceiling(ceiling: f64) -> Self {
        Self {
            categories: BTreeSet::new(),
            price_range: (0.0, ceiling.max(0.0)),
            min_rating: 0.0,
            brands: BTreeSet::new(),
            features: BTreeSet::new(),
            sort_by: SortBy::Featured,
            search_query: String::new(),
        }
    }

    pub fn reduce(mut self, action: FilterAction) -> Self {
        match action {
            FilterAction::Update(patch) => self.merge(patch),
            FilterAction::ToggleCategory(category) => toggle(&mut self.categories, category),
            FilterAction::ToggleBrand(brand) => toggle(&mut self.brands, brand),
            FilterAction::ToggleFeature(feature) => toggle(&mut self.features, feature),
            FilterAction::Clear { price_ceiling } => return Self::with_ceiling(price_ceiling),
        }
        self
    }

    fn merge(&mut self, patch: FilterPatch) {
        if let Some(categories) = patch.categories {
            self.categories = categories;
        }
        if let Some((min, max)) = patch.price_range {
            let (min, max) = (min.max(0.0), max.max(0.0));
            self.price_range = if min <= max { (min, max) } else { (max, min) };
        }
        if let Some(rating) = patch.min_rating {
            self.min_rating = rating.max(0.0).min(5.0);
        }
        if let Some(brands) = patch.brands {
            self.brands = brands;
        }
        if let Some(features) = patch.features {
            self.features = features;
        }
        if let Some(sort_by) = patch.sort_by {
            self.sort_by = sort_by;
        }
        if let Some(query) = patch.search_query {
            self.search_query = query;
        }
    }

    /// True when the product passes every active predicate.
    pub fn matches(&self, product: &Product) -> bool {
        if !self.categories.is_empty() && !self.categories.contains(&product.category) {
            return false;
        }

        let price = product.effective_price();
        if price < self.price_range.0 || price > self.price_range.1 {
            return false;
        }

        if self.min_rating > 0.0 && product.rating < self.min_rating {
            return false;
        }

        if !self.brands.is_empty() && !self.brands.contains(&product.brand) {
            return false;
        }

        if !self.search_query.is_empty()
            && !product
                .name
                .to_lowercase()
                .contains(&self.search_query.to_lowercase())
        {
            return false;
        }

        self.features.is_subset(&product.features)
    }

    /// Number of selected chips shown next to the filter panel.
    pub fn active_count(&self) -> usize {
        self.categories.len()
            + usize::from(self.min_rating > 0.0)
            + self.brands.len()
            + self.features.len()
    }
}

impl FilterPatch {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn categories<I: IntoIterator<Item = S>, S: Into<String>>(mut self, values: I) -> Self {
        self.categories = Some(values.into_iter().map(Into::into).collect());
        self
    }
    pub fn price_range(mut self, min: f64, max: f64) -> Self {
        self.price_range = Some((min, max));
        self
    }
    pub fn min_rating(mut self, rating: f64) -> Self {
        self.min_rating = Some(rating);
        self
    }
    pub fn brands<I: IntoIterator<Item = S>, S: Into<String>>(mut self, values: I) -> Self {
        self.brands = Some(values.into_iter().map(Into::into).collect());
        self
    }
    pub fn features<I: IntoIterator<Item = S>, S: Into<String>>(mut self, values: I) -> Self {
        self.features = Some(values.into_iter().map(Into::into).collect());
        self
    }
    pub fn sort_by(mut self, sort_by: impl Into<SortBy>) -> Self {
        self.sort_by = Some(sort_by.into());
        self
    }
    pub fn search_query(mut self, query: &str) -> Self {
        self.search_query = Some(query.to_string());
        self
    }
}

fn toggle(set: &mut BTreeSet<String>, value: String) {
    if !set.remove(&value) {
        set.insert(value);
    }
}

/// Filters the catalog and stable-sorts the survivors. Ties keep catalog order.
pub fn compute_view<'a>(catalog: &'a [Product], filters: &FilterState) -> Vec<&'a Product> {
    let mut view: Vec<&Product> = catalog.iter().filter(|p| filters.matches(p)).collect();
    view.sort_by(|a, b| filters.sort_by.compare(a, b));
    view
}

/// Filtered and sorted products with the counts shown alongside them.
#[derive(Debug, Clone)]
pub struct CatalogView<'a> {
    pub products: Vec<&'a Product>,
    pub total: usize,
}

impl<'a> CatalogView<'a> {
    pub fn new(catalog: &'a Catalog, filters: &FilterState) -> Self {
        Self {
            products: compute_view(catalog.products(), filters),
            total: catalog.len(),
        }
    }

    pub fn filtered(&self) -> usize {
        self.products.len()
    }

    pub fn ids(&self) -> Vec<u64> {
        self.products.iter().map(|p| p.id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Product> {
        vec![
            Product::new(1, "Alpha Phone").set_price(100.0).set_rating(4.0),
            Product::new(2, "Beta Case").set_price(50.0).set_discount(20).set_rating(5.0),
            Product::new(3, "Gamma Phone")
                .set_price(70.0)
                .set_rating(4.0)
                .set_trending(true),
        ]
    }

    fn ids(view: &[&Product]) -> Vec<u64> {
        view.iter().map(|p| p.id).collect()
    }

    #[test]
    fn sort_key_parsing_falls_back_to_featured() {
        assert_eq!(SortBy::from("price-low"), SortBy::PriceLow);
        assert_eq!(SortBy::from("price-high"), SortBy::PriceHigh);
        assert_eq!(SortBy::from("bogus"), SortBy::Featured);

        let parsed: SortBy = serde_json::from_str("\"alphabetical\"").unwrap();
        assert_eq!(parsed, SortBy::Featured);
        assert_eq!(serde_json::to_string(&SortBy::PriceLow).unwrap(), "\"price-low\"");
    }

    #[test]
    fn featured_puts_trending_first_then_rating() {
        let catalog = sample();
        let view = compute_view(&catalog, &FilterState::default());

        assert_eq!(ids(&view), vec![3, 2, 1]);
    }

    #[test]
    fn each_sort_order() {
        let catalog = sample();
        let sorted = |key: &str| {
            let filters = FilterState::default().reduce(FilterAction::Update(
                FilterPatch::new().sort_by(key),
            ));
            ids(&compute_view(&catalog, &filters))
        };

        assert_eq!(sorted("price-low"), vec![2, 3, 1]);
        assert_eq!(sorted("price-high"), vec![1, 3, 2]);
        assert_eq!(sorted("rating"), vec![2, 1, 3]);
        assert_eq!(sorted("newest"), vec![3, 2, 1]);
    }

    #[test]
    fn search_is_case_insensitive() {
        let catalog = sample();
        let filters = FilterState::default()
            .reduce(FilterAction::Update(FilterPatch::new().search_query("PHONE")));

        assert_eq!(ids(&compute_view(&catalog, &filters)), vec![3, 1]);
    }

    #[test]
    fn price_range_uses_effective_price_inclusive() {
        let catalog = sample();
        let filters = FilterState::default()
            .reduce(FilterAction::Update(FilterPatch::new().price_range(40.0, 70.0)));

        assert_eq!(ids(&compute_view(&catalog, &filters)), vec![3, 2]);
    }

    #[test]
    fn patch_normalizes_range_and_rating() {
        let filters = FilterState::default().reduce(FilterAction::Update(
            FilterPatch::new().price_range(300.0, -10.0).min_rating(9.0),
        ));

        assert_eq!(filters.price_range, (0.0, 300.0));
        assert_eq!(filters.min_rating, 5.0);
    }

    #[test]
    fn patch_leaves_unset_fields_alone() {
        let filters = FilterState::default()
            .reduce(FilterAction::Update(FilterPatch::new().brands(["Acme"])))
            .reduce(FilterAction::Update(FilterPatch::new().sort_by(SortBy::Rating)));

        assert!(filters.brands.contains("Acme"));
        assert_eq!(filters.sort_by, SortBy::Rating);
    }

    #[test]
    fn toggles_and_active_count() {
        let filters = FilterState::default()
            .reduce(FilterAction::ToggleCategory("audio".into()))
            .reduce(FilterAction::ToggleBrand("Acme".into()))
            .reduce(FilterAction::ToggleFeature("On Sale".into()))
            .reduce(FilterAction::Update(FilterPatch::new().min_rating(3.0)));
        assert_eq!(filters.active_count(), 4);

        let filters = filters.reduce(FilterAction::ToggleBrand("Acme".into()));
        assert_eq!(filters.active_count(), 3);
    }

    #[test]
    fn clear_restores_defaults() {
        let filters = FilterState::default()
            .reduce(FilterAction::Update(
                FilterPatch::new().categories(["audio"]).search_query("x"),
            ))
            .reduce(FilterAction::Clear {
                price_ceiling: DEFAULT_PRICE_CEILING,
            });

        assert_eq!(filters, FilterState::default());
    }

    #[test]
    fn catalog_view_reports_counts() {
        let catalog = Catalog::new(sample());
        let filters = FilterState::default()
            .reduce(FilterAction::Update(FilterPatch::new().min_rating(5.0)));
        let view = CatalogView::new(&catalog, &filters);

        assert_eq!(view.total, 3);
        assert_eq!(view.filtered(), 1);
        assert_eq!(view.ids(), vec![2]);
    }
}
