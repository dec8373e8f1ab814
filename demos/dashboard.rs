use storefront_engine::{
    config::EngineConfig,
    context::StorefrontProvider,
    filter::{FilterPatch, SortBy},
    order::OrderDetails,
    product::Catalog,
    service::Storefront,
};
use tracing_subscriber::EnvFilter;

const PRODUCTS: &str = r#"[
    {"id": 1, "name": "Wireless Headphones", "category": "electronics", "brand": "Sonic",
     "price": 199.99, "discount": 15, "stock": 8, "rating": 4.6, "reviewCount": 1284,
     "features": ["Free Shipping", "On Sale", "Best Seller"], "isTrending": true, "expressDelivery": true},
    {"id": 2, "name": "Smart Watch Pro", "category": "wearables", "brand": "Tick",
     "price": 249.0, "discount": 0, "stock": 40, "rating": 4.8, "reviewCount": 892,
     "features": ["Free Shipping", "In Stock"], "isTrending": false, "expressDelivery": true},
    {"id": 3, "name": "Bluetooth Speaker", "category": "electronics", "brand": "Sonic",
     "price": 89.0, "discount": 10, "stock": 0, "rating": 4.2, "reviewCount": 311,
     "features": ["On Sale"], "isTrending": false, "expressDelivery": false},
    {"id": 4, "name": "Running Shoes", "category": "fashion", "brand": "Stride",
     "price": 129.5, "discount": 25, "stock": 64, "rating": 4.4, "reviewCount": 2051,
     "features": ["Free Shipping", "On Sale", "In Stock"], "isTrending": true, "expressDelivery": false}
]"#;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storefront_engine=debug".into()),
        )
        .init();

    let catalog = Catalog::from_json(PRODUCTS)?;
    let config = EngineConfig::new().set_path("storefront-demo.db");
    let provider = StorefrontProvider::new(Storefront::open(config, catalog)?);

    // the grid and the cart drawer each hold their own handle
    let grid = provider.handle();
    let drawer = provider.handle();

    grid.with(|engine| {
        engine.update_filters(
            FilterPatch::new()
                .features(["On Sale"])
                .sort_by(SortBy::PriceLow),
        );
        let view = engine.view();
        println!("showing {} of {} products", view.filtered(), view.total);
        for product in &view.products {
            println!(
                "  #{} {:<22} ${:>8.2} {:?}",
                product.id,
                product.name,
                product.effective_price(),
                product.stock_status()
            );
        }
    });

    grid.with(|engine| {
        engine.add_to_cart_by_id(1, 1);
        engine.add_to_cart_by_id(4, 2);
        engine.toggle_wishlist(2);
    });

    let order = drawer.with(|engine| {
        let summary = engine.checkout_summary();
        println!(
            "cart: {} items, subtotal ${:.2}, tax ${:.2}, total ${:.2}",
            engine.cart_count(),
            summary.subtotal,
            summary.tax,
            summary.total
        );
        engine.place_order(OrderDetails::new("221B Baker Street, London", "card"))
    });
    println!("placed {} for ${:.2}", order.id, order.total);

    let orders = drawer.with(|engine| engine.orders().len());
    println!("{orders} orders on record");

    provider.teardown()?;
    Ok(())
}
