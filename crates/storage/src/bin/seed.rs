//! Populates an empty database with sample products and customers.
//!
//! ```bash
//! DATABASE_URL=sqlite://esales.db cargo run -p esales-storage --bin seed
//! ```
//!
//! Products are only inserted when the table is empty, so re-running is safe.

use chrono::NaiveDate;
use esales_core::Customer;
use esales_storage::Database;
use tracing::info;
use tracing_subscriber::EnvFilter;

const PRODUCTS: &[(&str, &str)] = &[
    ("Laptop", "14 inch ultrabook"),
    ("Monitor", "27 inch IPS display"),
    ("Keyboard", "Mechanical, US layout"),
    ("Mouse", "Wireless optical mouse"),
    ("Headset", "USB headset with microphone"),
    ("Docking Station", "USB-C dock with dual display output"),
];

const CUSTOMERS: &[(&str, &str, &str)] = &[
    ("Ivan Petrov", "ivan.petrov@example.com", "495-555-0101"),
    ("Maria Ivanova", "maria.ivanova@example.com", "495-555-0102"),
    ("John Smith", "john.smith@example.com", "212-555-0147"),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    esales_util::load_env_file();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let url = esales_util::database_url();
    let db = Database::connect(&url).await?;
    db.run_migrations().await?;

    let mut uow = db.begin().await?;
    if uow.products().count().await? > 0 {
        info!(stage = "seed", %url, "products already present, nothing to do");
        return Ok(());
    }

    for (name, description) in PRODUCTS {
        uow.products().add(name, Some(*description)).await?;
    }

    let registered = NaiveDate::from_ymd_opt(2024, 1, 1).ok_or("invalid seed date")?;
    for (name, email, phone) in CUSTOMERS {
        let customer = Customer {
            customer_id: 0,
            name: name.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
            registration_date: registered,
        };
        uow.customers().add(&customer).await?;
    }

    uow.commit().await?;
    info!(
        stage = "seed",
        %url,
        products = PRODUCTS.len(),
        customers = CUSTOMERS.len(),
        "sample data inserted"
    );
    Ok(())
}
