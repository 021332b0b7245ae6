use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set,
    ActiveValue::NotSet,
};
use tea_storefront::{
    config::AppConfig,
    db::{OrmConn, create_orm_conn, run_migrations},
    entity::{admin_users, products},
    models::{ADMIN_ROLE, DELIVERY_FEE},
    services::auth_service::hash_password,
};

struct SampleTea {
    name: &'static str,
    description: &'static str,
    details: &'static str,
    price: i64,
    stock: i32,
}

const SAMPLE_TEAS: [SampleTea; 4] = [
    SampleTea {
        name: "Chamomile Calm",
        description: "Whole chamomile flowers for a quiet evening.",
        details: "Steep 5 minutes at 95C.",
        price: 12,
        stock: 40,
    },
    SampleTea {
        name: "Peppermint Lift",
        description: "Bright peppermint leaf.",
        details: "Steep 4 minutes at 100C.",
        price: 10,
        stock: 8,
    },
    SampleTea {
        name: "Hibiscus Rose",
        description: "Tart hibiscus with rose petals.",
        details: "Great iced. Steep 6 minutes.",
        price: 14,
        stock: 0,
    },
    SampleTea {
        name: "Lemon Verbena",
        description: "Citrus-scented verbena leaves.",
        details: "Steep 5 minutes at 90C.",
        price: 11,
        stock: 25,
    },
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let orm = create_orm_conn(&config.database_url).await?;
    // Ensure migrations are applied.
    run_migrations(&orm).await?;

    let email = std::env::var("SEED_ADMIN_EMAIL").unwrap_or_else(|_| "admin@example.com".into());
    let password = std::env::var("SEED_ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".into());
    let admin_id = ensure_admin(&orm, &email, &password).await?;
    let seeded = seed_products(&orm).await?;

    println!("Seed completed. Admin ID: {admin_id}, products added: {seeded}");
    Ok(())
}

async fn ensure_admin(orm: &OrmConn, email: &str, password: &str) -> anyhow::Result<i64> {
    let existing = admin_users::Entity::find()
        .filter(admin_users::Column::Email.eq(email))
        .one(orm)
        .await?;
    if let Some(existing) = existing {
        return Ok(existing.id);
    }

    let password_hash = hash_password(password).map_err(|e| anyhow::anyhow!(e.to_string()))?;
    let admin = admin_users::ActiveModel {
        id: NotSet,
        email: Set(email.to_string()),
        password_hash: Set(password_hash),
        role: Set(ADMIN_ROLE.to_string()),
        active: Set(true),
        created_at: NotSet,
    }
    .insert(orm)
    .await?;
    Ok(admin.id)
}

async fn seed_products(orm: &OrmConn) -> anyhow::Result<usize> {
    if products::Entity::find().count(orm).await? > 0 {
        return Ok(0);
    }

    for tea in SAMPLE_TEAS.iter() {
        products::ActiveModel {
            id: NotSet,
            name: Set(tea.name.to_string()),
            description: Set(Some(tea.description.to_string())),
            details: Set(Some(tea.details.to_string())),
            price: Set(Some(Decimal::from(tea.price))),
            shipping_cost: Set(Some(DELIVERY_FEE)),
            image_url: Set(None),
            stock: Set(Some(tea.stock)),
            created_at: NotSet,
        }
        .insert(orm)
        .await?;
    }
    Ok(SAMPLE_TEAS.len())
}
