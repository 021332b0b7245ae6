use rust_decimal::Decimal;
use tea_storefront::{
    db::{create_orm_conn, create_pool, run_migrations},
    gateway::{CatalogGateway, OrderGateway, SeaOrmCatalog, SeaOrmOrders},
    models::{NewOrder, NewProduct, OrderStatus, ProductPatch, UNKNOWN_PRODUCT},
    session::{AdminSession, PgSessionStore},
};

// Catalog, orders and session slots against a real Postgres.
#[tokio::test]
async fn catalog_orders_and_sessions_against_postgres() -> anyhow::Result<()> {
    // Allow skipping when no DB is configured in the environment.
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            return Ok(());
        }
    };

    let orm = create_orm_conn(&database_url).await?;
    run_migrations(&orm).await?;
    let pool = create_pool(&database_url).await?;

    let catalog = SeaOrmCatalog::new(orm.clone());
    let orders = SeaOrmOrders::new(orm);

    let product = catalog
        .create(NewProduct {
            name: "Integration Rooibos".into(),
            description: Some("Red bush".into()),
            details: None,
            price: Decimal::new(12500, 3),
            shipping_cost: Some(Decimal::from(2)),
            stock: Some(4),
            image_url: None,
        })
        .await?;

    let patched = catalog
        .update(
            product.id,
            ProductPatch {
                price: Some(Decimal::from(7)),
                ..Default::default()
            },
        )
        .await?
        .expect("product exists");
    assert_eq!(patched.price, Decimal::from(7));
    assert_eq!(patched.description, product.description);
    assert_eq!(patched.stock, Some(4));

    let order = orders
        .submit(NewOrder {
            product_id: product.id,
            customer_name: "Integration".into(),
            customer_email: None,
            customer_phone: "1".into(),
            customer_address: "Somewhere".into(),
            quantity: 2,
            total_price: Decimal::from(16),
            status: None,
        })
        .await?;
    assert_eq!(order.status, OrderStatus::New);

    let updated = orders
        .update_status(order.id, OrderStatus::from("on-hold"))
        .await?
        .expect("order exists");
    assert_eq!(updated.status.to_string(), "on-hold");

    assert!(catalog.delete(product.id).await?);
    let listing = orders
        .list()
        .await?
        .into_iter()
        .find(|l| l.order.id == order.id)
        .expect("order listed");
    assert_eq!(listing.product_name, UNKNOWN_PRODUCT);

    let session = AdminSession::new(std::sync::Arc::new(PgSessionStore::new(pool)));
    let token = session.open().await?;
    assert!(session.is_authenticated(token).await?);
    session.clear(token).await?;
    assert!(!session.is_authenticated(token).await?);

    Ok(())
}
