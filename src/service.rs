//! Storefront engine: owns the state tree and mirrors every slice to storage
use super::cart::{Cart, CartAction, CheckoutSummary};
use super::config::EngineConfig;
use super::error::StorageError;
use super::filter::{CatalogView, FilterAction, FilterPatch, FilterState};
use super::order::{Order, OrderDetails, OrderJournal};
use super::product::{Catalog, Product};
use super::profile::{ProfilePatch, UserProfile};
use super::stats::DashboardStats;
use super::storage::{Persistence, Slot};
use super::wishlist::Wishlist;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct Storefront {
    config: EngineConfig,
    catalog: Catalog,
    store: Persistence,
    cart: Cart,
    wishlist: Wishlist,
    filters: FilterState,
    orders: OrderJournal,
    profile: UserProfile,
    dark_mode: bool,
}

impl Storefront {
    /// Builds the engine from the catalog and whatever each slot holds.
    /// Absent or unreadable slots start from their defaults.
    pub fn new(instance: Arc<sled::Db>, config: EngineConfig, catalog: Catalog) -> Self {
        let store = Persistence::new(instance, config.key_prefix());

        let cart = store.load(Slot::Cart, Cart::new());
        let wishlist = store.load(Slot::Wishlist, Wishlist::new());
        let orders = store.load(Slot::Orders, OrderJournal::new());
        let profile = store.load(Slot::User, UserProfile::default());
        let dark_mode = store.load(Slot::DarkMode, false);
        let filters = FilterState::with_ceiling(config.price_ceiling());

        info!(
            products = catalog.len(),
            cart_lines = cart.lines().len(),
            orders = orders.len(),
            "storefront initialised"
        );

        Self {
            config,
            catalog,
            store,
            cart,
            wishlist,
            filters,
            orders,
            profile,
            dark_mode,
        }
    }

    /// Opens the configured database and initialises the engine on it.
    pub fn open(config: EngineConfig, catalog: Catalog) -> anyhow::Result<Self> {
        let db = config.open_db()?;
        Ok(Self::new(Arc::new(db), config, catalog))
    }

    /// Flushes pending writes (when configured) and drops the engine.
    pub fn teardown(self) -> Result<(), StorageError> {
        if self.config.flush_on_teardown() {
            let bytes = self.store.flush()?;
            info!(bytes, "storefront flushed on teardown");
        }
        Ok(())
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The catalog filtered and sorted by the current filters.
    pub fn view(&self) -> CatalogView<'_> {
        CatalogView::new(&self.catalog, &self.filters)
    }

    pub fn stats(&self) -> DashboardStats {
        DashboardStats::for_catalog(&self.catalog)
    }

    // CART

    pub fn dispatch_cart(&mut self, action: CartAction) {
        debug!(?action, "cart action");
        self.cart = std::mem::take(&mut self.cart).reduce(action);
        self.store.save(Slot::Cart, &self.cart);
    }

    pub fn add_to_cart(&mut self, product: &Product, quantity: u32) {
        self.dispatch_cart(CartAction::Add {
            product: product.into(),
            quantity,
        });
    }

    /// Adds a catalog product by id. Returns false if the id is unknown.
    pub fn add_to_cart_by_id(&mut self, product_id: u64, quantity: u32) -> bool {
        let Some(product) = self.catalog.get(product_id) else {
            warn!(product_id, "add to cart for unknown product ignored");
            return false;
        };
        let action = CartAction::Add {
            product: product.into(),
            quantity,
        };
        self.dispatch_cart(action);
        true
    }

    /// Sets a line's quantity; anything below 1 removes the line.
    pub fn update_cart_quantity(&mut self, product_id: u64, quantity: i64) {
        self.dispatch_cart(CartAction::SetQuantity {
            product_id,
            quantity,
        });
    }

    pub fn remove_from_cart(&mut self, product_id: u64) {
        self.dispatch_cart(CartAction::Remove { product_id });
    }

    pub fn clear_cart(&mut self) {
        self.dispatch_cart(CartAction::Clear);
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }
    pub fn cart_total(&self) -> f64 {
        self.cart.total()
    }
    pub fn cart_count(&self) -> u64 {
        self.cart.count()
    }
    pub fn checkout_summary(&self) -> CheckoutSummary {
        self.cart.summary(self.config.tax_rate())
    }

    // WISHLIST

    pub fn toggle_wishlist(&mut self, product_id: u64) -> bool {
        let wished = self.wishlist.toggle(product_id);
        debug!(product_id, wished, "wishlist toggled");
        self.store.save(Slot::Wishlist, &self.wishlist);
        wished
    }

    pub fn wishlist(&self) -> &Wishlist {
        &self.wishlist
    }

    // FILTERS

    pub fn dispatch_filter(&mut self, action: FilterAction) {
        debug!(?action, "filter action");
        self.filters = std::mem::take(&mut self.filters).reduce(action);
    }

    pub fn update_filters(&mut self, patch: FilterPatch) {
        self.dispatch_filter(FilterAction::Update(patch));
    }

    pub fn clear_filters(&mut self) {
        let price_ceiling = self.config.price_ceiling();
        self.dispatch_filter(FilterAction::Clear { price_ceiling });
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    // ORDERS

    /// Commits the cart as a new order and empties the cart. An empty cart
    /// still yields a zero-total order.
    pub fn place_order(&mut self, details: OrderDetails) -> Order {
        let order = Order::commit(&self.cart, details);

        self.orders.record(order.clone());
        self.cart = Cart::new();

        if let Err(err) = self.persist_checkout() {
            warn!(order_id = %order.id, error = %err, "failed to persist checkout");
        }
        info!(order_id = %order.id, total = order.total, "order placed");

        order
    }

    // orders and the emptied cart land together or not at all
    fn persist_checkout(&self) -> Result<(), StorageError> {
        let mut batch = self.store.batch();
        batch.insert(Slot::Orders, &self.orders)?;
        batch.insert(Slot::Cart, &self.cart)?;
        self.store.try_apply(batch)
    }

    pub fn orders(&self) -> &OrderJournal {
        &self.orders
    }

    // PROFILE & THEME

    pub fn update_profile(&mut self, patch: ProfilePatch) {
        self.profile = std::mem::take(&mut self.profile).merge(patch);
        self.store.save(Slot::User, &self.profile);
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn toggle_theme(&mut self) -> bool {
        self.dark_mode = !self.dark_mode;
        self.store.save(Slot::DarkMode, &self.dark_mode);
        self.dark_mode
    }

    pub fn is_dark_mode(&self) -> bool {
        self.dark_mode
    }
}
