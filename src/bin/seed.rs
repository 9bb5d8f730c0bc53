use argon2::{
    Argon2, PasswordHasher,
    password_hash::{SaltString, rand_core::OsRng},
};
use garagelink_api::{
    config::AppConfig,
    db::{create_orm_conn, create_pool, run_migrations},
};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    // Ensure migrations are applied.
    let orm = create_orm_conn(&config.database_url).await?;
    run_migrations(&orm).await?;

    let roles = [
        ("admin@garagelink.test", "admin123", "admin", "Asha Admin"),
        (
            "garage@garagelink.test",
            "garage123",
            "service_provider",
            "Sunrise Garage",
        ),
        (
            "owner@garagelink.test",
            "owner123",
            "vehicle_owner",
            "Omar Owner",
        ),
        (
            "collector@garagelink.test",
            "collect123",
            "payment_collector",
            "Channi Collector",
        ),
        (
            "warehouse@garagelink.test",
            "pack123",
            "warehouse_staff",
            "Wren Warehouse",
        ),
        (
            "dispatch@garagelink.test",
            "dispatch123",
            "dispatcher",
            "Dara Dispatch",
        ),
        (
            "agent@garagelink.test",
            "insure123",
            "insurance_agent",
            "Ira Agent",
        ),
    ];

    for (email, password, role, name) in roles {
        let id = ensure_user(&pool, email, password, role, name).await?;
        println!("Ensured {role} {email} ({id})");
    }

    seed_inventory(&pool).await?;

    println!("Seed completed");
    Ok(())
}

async fn ensure_user(
    pool: &sqlx::PgPool,
    email: &str,
    password: &str,
    role: &str,
    full_name: &str,
) -> anyhow::Result<Uuid> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .to_string();

    let row: Option<(Uuid,)> = sqlx::query_as(
        r#"
        INSERT INTO users (id, email, password_hash, full_name, user_type)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (email) DO NOTHING
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(password_hash)
    .bind(full_name)
    .bind(role)
    .fetch_optional(pool)
    .await?;

    let user_id = match row {
        Some((id,)) => id,
        None => {
            let existing: (Uuid,) = sqlx::query_as("SELECT id FROM users WHERE email = $1")
                .bind(email)
                .fetch_one(pool)
                .await?;
            existing.0
        }
    };

    Ok(user_id)
}

async fn seed_inventory(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    // (name, code, category, brand, unit_price, mrp, stock, minimum, uom)
    let items = [
        ("Engine Oil 10W-40 1L", "OIL-1040-1L", "fluids", "Castrol", 45_000_i64, 52_000_i64, 120, 20, "bottle"),
        ("Brake Pad Set Front", "BRK-PAD-F", "brakes", "Bosch", 180_000, 210_000, 40, 10, "set"),
        ("Air Filter", "FLT-AIR-01", "filters", "Mann", 35_000, 42_000, 80, 15, "piece"),
        ("Spark Plug", "IGN-PLUG-01", "ignition", "NGK", 25_000, 30_000, 200, 40, "piece"),
        ("Chain Sprocket Kit", "DRV-CHN-2W", "drivetrain", "Rolon", 220_000, 260_000, 25, 5, "kit"),
        ("Battery 12V 35Ah", "ELC-BAT-35", "electrical", "Exide", 450_000, 520_000, 15, 5, "piece"),
        ("Coolant 1L", "FLD-COOL-1L", "fluids", "Motul", 30_000, 38_000, 60, 10, "bottle"),
        ("Wiper Blade Pair", "BDY-WIP-01", "body", "Bosch", 55_000, 65_000, 35, 8, "pair"),
    ];

    for (name, code, category, brand, price, mrp, stock, minimum, uom) in items {
        sqlx::query(
            r#"
            INSERT INTO inventory_items
                (id, item_name, item_code, category, brand, unit_price, mrp,
                 stock_quantity, minimum_stock, unit_of_measure, compatible_vehicles)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, '["2w","3w","4w"]'::jsonb)
            ON CONFLICT (item_code) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(code)
        .bind(category)
        .bind(brand)
        .bind(price)
        .bind(mrp)
        .bind(stock)
        .bind(minimum)
        .bind(uom)
        .execute(pool)
        .await?;
    }

    println!("Ensured {} inventory items", items.len());
    Ok(())
}
