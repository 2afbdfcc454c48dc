// src/publish.rs
//! Upsert the four record sets into their Postgres tables. One transaction
//! per run: the store keeps either the whole batch or none of it.

use anyhow::{Context, Result};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;
use tracing::info;

use crate::config::StoreSettings;
use crate::transform::MartTables;

const UPSERT_PRODUCT_DIM: &str = r#"
    INSERT INTO product_dim (ProductID, Name, Brand, Category)
    VALUES ($1, $2, $3, $4)
    ON CONFLICT (ProductID) DO UPDATE SET
        Name = EXCLUDED.Name,
        Brand = EXCLUDED.Brand,
        Category = EXCLUDED.Category
"#;

const UPSERT_RETAILER_DIM: &str = r#"
    INSERT INTO retailer_dim (RetailerID, Name, Channel, Location)
    VALUES ($1, $2, $3, $4)
    ON CONFLICT (RetailerID) DO UPDATE SET
        Name = EXCLUDED.Name,
        Channel = EXCLUDED.Channel,
        Location = EXCLUDED.Location
"#;

const UPSERT_DATE_DIM: &str = r#"
    INSERT INTO date_dim (Date, Day, Month, Year, Quarter, DayOfWeek, WeekOfYear)
    VALUES ($1, $2, $3, $4, $5, $6, $7)
    ON CONFLICT (Date) DO UPDATE SET
        Day = EXCLUDED.Day,
        Month = EXCLUDED.Month,
        Year = EXCLUDED.Year,
        Quarter = EXCLUDED.Quarter,
        DayOfWeek = EXCLUDED.DayOfWeek,
        WeekOfYear = EXCLUDED.WeekOfYear
"#;

const UPSERT_SALES_FACT: &str = r#"
    INSERT INTO sales_fact (SaleID, ProductID, RetailerID, Date, Quantity, Price)
    VALUES ($1, $2, $3, $4, $5, $6)
    ON CONFLICT (SaleID) DO UPDATE SET
        ProductID = EXCLUDED.ProductID,
        RetailerID = EXCLUDED.RetailerID,
        Date = EXCLUDED.Date,
        Quantity = EXCLUDED.Quantity,
        Price = EXCLUDED.Price
"#;

/// Settings become discrete connection parameters, never URL text, so
/// credentials may contain any characters.
fn connect_options(settings: &StoreSettings) -> PgConnectOptions {
    PgConnectOptions::new()
        .host(&settings.host)
        .port(settings.port)
        .username(&settings.user)
        .password(&settings.password)
        .database(&settings.database)
}

/// Open a connection pool scoped to this call, upsert all four record sets
/// inside a single transaction, and close the pool again.
pub async fn publish_tables(tables: &MartTables, settings: &StoreSettings) -> Result<()> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect_with(connect_options(settings))
        .await
        .with_context(|| {
            format!(
                "connecting to postgres at {}:{}/{}",
                settings.host, settings.port, settings.database
            )
        })?;

    let result = upsert_all(&pool, tables).await;
    pool.close().await;
    result
}

async fn upsert_all(pool: &PgPool, tables: &MartTables) -> Result<()> {
    let mut tx = pool.begin().await.context("opening mart transaction")?;

    for row in &tables.product_dim {
        sqlx::query(UPSERT_PRODUCT_DIM)
            .bind(row.product_id)
            .bind(&row.name)
            .bind(&row.brand)
            .bind(&row.category)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("upserting product {}", row.product_id))?;
    }

    for row in &tables.retailer_dim {
        sqlx::query(UPSERT_RETAILER_DIM)
            .bind(row.retailer_id)
            .bind(&row.name)
            .bind(&row.channel)
            .bind(&row.location)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("upserting retailer {}", row.retailer_id))?;
    }

    for row in &tables.date_dim {
        sqlx::query(UPSERT_DATE_DIM)
            .bind(&row.date)
            .bind(row.day)
            .bind(row.month)
            .bind(row.year)
            .bind(row.quarter)
            .bind(&row.day_of_week)
            .bind(row.week_of_year)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("upserting date {}", row.date))?;
    }

    for row in &tables.sales_fact {
        sqlx::query(UPSERT_SALES_FACT)
            .bind(row.sale_id)
            .bind(row.product_id)
            .bind(row.retailer_id)
            .bind(&row.date)
            .bind(row.quantity)
            .bind(row.price)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("upserting sale {}", row.sale_id))?;
    }

    tx.commit().await.context("committing mart transaction")?;

    info!(
        products = tables.product_dim.len(),
        retailers = tables.retailer_dim.len(),
        dates = tables.date_dim.len(),
        facts = tables.sales_fact.len(),
        "published sales mart batch"
    );
    Ok(())
}
