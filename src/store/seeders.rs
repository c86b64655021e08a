//! Demonstration data loaded at startup
//!
//! The store is memory-only, so this runs on every start when seeding is enabled.

use tracing::info;

use super::{NewProduct, NewUser, Store, StoreResult};

pub const DEMO_USER_NAME: &str = "Demo User";
pub const DEMO_USER_EMAIL: &str = "demo@example.com";

/// Seed one demo customer and two products. On an empty store these get
/// user id 1 and product ids 1 (Milk) and 2 (Bread).
pub fn seed_demo_data(store: &Store, demo_password_hash: &str) -> StoreResult<()> {
    info!("Seeding demonstration data...");

    let user = store.create_user(NewUser::customer(
        DEMO_USER_NAME,
        DEMO_USER_EMAIL,
        demo_password_hash,
    ))?;

    // Format: (name, category, stock, price)
    let products: [(&str, &str, i64, f64); 2] = [
        ("Milk", "Dairy", 10, 650.0),
        ("Bread", "Bakery", 15, 300.0),
    ];

    for (name, category, stock, price) in products {
        store.create_product(NewProduct::new(name, category, stock, price));
    }

    info!(user_id = user.id, products = products.len(), "Seeded demonstration data");
    Ok(())
}
