use std::time::Duration;

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};

use super::config::Config;

/// Connect with driver defaults and bring the schema up to date.
pub async fn init_db(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(database_url).await?;
    run_migrations(&db).await?;
    Ok(db)
}

/// Connect with the pool settings from `config` and bring the schema up to date.
pub async fn init_pool(config: &Config) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.database_url.clone());
    options
        .max_connections(config.max_connections)
        .connect_timeout(Duration::from_secs(8))
        .sqlx_logging(!config.is_production());

    let db = Database::connect(options).await?;
    run_migrations(&db).await?;
    tracing::info!("Database ready ({} connections max)", config.max_connections);
    Ok(db)
}

const SCHEMA: &[(&str, &str)] = &[
    (
        "users",
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username VARCHAR(50) NOT NULL UNIQUE,
            email VARCHAR(100) NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            user_type VARCHAR(16) NOT NULL CHECK (user_type IN ('buyer', 'seller'))
        )
        "#,
    ),
    (
        "buyers",
        r#"
        CREATE TABLE IF NOT EXISTS buyers (
            id INTEGER PRIMARY KEY REFERENCES users(id) ON DELETE CASCADE
        )
        "#,
    ),
    (
        "sellers",
        r#"
        CREATE TABLE IF NOT EXISTS sellers (
            id INTEGER PRIMARY KEY REFERENCES users(id) ON DELETE CASCADE,
            subscription_level VARCHAR(16) NOT NULL DEFAULT 'basic'
        )
        "#,
    ),
    (
        "products",
        r#"
        CREATE TABLE IF NOT EXISTS products (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name VARCHAR(100) NOT NULL UNIQUE,
            description TEXT,
            price INTEGER NOT NULL CHECK (price >= 0),
            seller_id INTEGER NOT NULL REFERENCES sellers(id)
        )
        "#,
    ),
    (
        "product_images",
        r#"
        CREATE TABLE IF NOT EXISTS product_images (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            image_url VARCHAR(255) NOT NULL,
            product_id INTEGER NOT NULL REFERENCES products(id) ON DELETE CASCADE
        )
        "#,
    ),
    (
        "tags",
        r#"
        CREATE TABLE IF NOT EXISTS tags (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name VARCHAR(50) NOT NULL UNIQUE
        )
        "#,
    ),
    (
        "products_tags",
        r#"
        CREATE TABLE IF NOT EXISTS products_tags (
            product_id INTEGER NOT NULL REFERENCES products(id) ON DELETE CASCADE,
            tag_id INTEGER NOT NULL REFERENCES tags(id) ON DELETE CASCADE,
            PRIMARY KEY (product_id, tag_id)
        )
        "#,
    ),
    (
        "reviews",
        r#"
        CREATE TABLE IF NOT EXISTS reviews (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            rating INTEGER NOT NULL CHECK (rating BETWEEN 1 AND 5),
            comment VARCHAR(500),
            reviewer_id INTEGER NOT NULL REFERENCES users(id),
            reviewed_user_id INTEGER NOT NULL REFERENCES users(id),
            product_id INTEGER REFERENCES products(id) ON DELETE SET NULL,
            UNIQUE (reviewer_id, reviewed_user_id, product_id)
        )
        "#,
    ),
    (
        "favorites",
        r#"
        CREATE TABLE IF NOT EXISTS favorites (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            buyer_id INTEGER NOT NULL REFERENCES buyers(id) ON DELETE CASCADE,
            product_id INTEGER NOT NULL REFERENCES products(id) ON DELETE CASCADE,
            UNIQUE (buyer_id, product_id)
        )
        "#,
    ),
    (
        "subscriptions",
        r#"
        CREATE TABLE IF NOT EXISTS subscriptions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            seller_id INTEGER NOT NULL REFERENCES sellers(id) ON DELETE CASCADE,
            subscription_level VARCHAR(16) NOT NULL,
            start_date DATE NOT NULL,
            end_date DATE NOT NULL
        )
        "#,
    ),
];

const INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_products_seller ON products(seller_id)",
    "CREATE INDEX IF NOT EXISTS idx_product_images_product ON product_images(product_id)",
    "CREATE INDEX IF NOT EXISTS idx_reviews_reviewed_user ON reviews(reviewed_user_id)",
    "CREATE INDEX IF NOT EXISTS idx_reviews_product ON reviews(product_id)",
    "CREATE INDEX IF NOT EXISTS idx_subscriptions_seller ON subscriptions(seller_id)",
];

// Tables are created parents first; every statement is idempotent.
async fn run_migrations(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();

    for (table, sql) in SCHEMA {
        db.execute(Statement::from_string(backend, sql.to_string()))
            .await
            .map_err(|e| {
                tracing::error!("Failed to create table {}: {}", table, e);
                e
            })?;
    }

    for sql in INDEXES {
        db.execute(Statement::from_string(backend, sql.to_string()))
            .await?;
    }

    tracing::debug!("Schema up to date ({} tables)", SCHEMA.len());
    Ok(())
}
