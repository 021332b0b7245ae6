#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use axum::body::Bytes;
use chrono::Utc;
use rust_decimal::Decimal;
use tea_storefront::{
    cart::CartRegistry,
    gateway::{
        CatalogGateway, CredentialStore, GatewayError, GatewayResult, ImageStorage, OrderGateway,
    },
    models::{
        AdminCredential, NewOrder, NewProduct, Order, OrderListing, OrderStatus, Product,
        ProductPatch,
    },
    services::auth_service::hash_password,
    session::{AdminSession, MemorySessionStore},
    state::AppState,
};

pub fn product(id: i64, name: &str, price: i64, stock: Option<i32>) -> Product {
    Product {
        id,
        name: name.to_string(),
        description: None,
        details: None,
        price: Decimal::from(price),
        shipping_cost: None,
        image_url: None,
        stock,
        created_at: Utc::now(),
    }
}

/// Writes the `Some` fields of `patch` onto `product`, like a column-wise
/// update would.
pub fn apply_patch(patch: ProductPatch, product: &mut Product) {
    if let Some(name) = patch.name {
        product.name = name;
    }
    if let Some(description) = patch.description {
        product.description = Some(description);
    }
    if let Some(details) = patch.details {
        product.details = Some(details);
    }
    if let Some(price) = patch.price {
        product.price = price;
    }
    if let Some(shipping_cost) = patch.shipping_cost {
        product.shipping_cost = Some(shipping_cost);
    }
    if let Some(stock) = patch.stock {
        product.stock = Some(stock);
    }
    if let Some(image_url) = patch.image_url {
        product.image_url = Some(image_url);
    }
}

#[derive(Default)]
pub struct MemoryCatalog {
    products: Mutex<Vec<Product>>,
    next_id: AtomicUsize,
}

impl MemoryCatalog {
    pub fn with_products(products: Vec<Product>) -> Self {
        let next = products.iter().map(|p| p.id).max().unwrap_or(0) as usize;
        Self {
            products: Mutex::new(products),
            next_id: AtomicUsize::new(next),
        }
    }

    pub fn name_of(&self, id: i64) -> Option<String> {
        self.products
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.name.clone())
    }
}

#[async_trait]
impl CatalogGateway for MemoryCatalog {
    async fn list(&self) -> GatewayResult<Vec<Product>> {
        let mut items = self.products.lock().unwrap().clone();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(items)
    }

    async fn get(&self, id: i64) -> GatewayResult<Option<Product>> {
        Ok(self
            .products
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn create(&self, product: NewProduct) -> GatewayResult<Product> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) as i64 + 1;
        let created = Product {
            id,
            name: product.name,
            description: product.description,
            details: product.details,
            price: product.price,
            shipping_cost: product.shipping_cost,
            image_url: product.image_url,
            stock: product.stock,
            created_at: Utc::now(),
        };
        self.products.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: i64, patch: ProductPatch) -> GatewayResult<Option<Product>> {
        let mut products = self.products.lock().unwrap();
        let Some(product) = products.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        apply_patch(patch, product);
        Ok(Some(product.clone()))
    }

    async fn delete(&self, id: i64) -> GatewayResult<bool> {
        let mut products = self.products.lock().unwrap();
        let before = products.len();
        products.retain(|p| p.id != id);
        Ok(products.len() != before)
    }
}

/// Orders kept in memory. `fail_on` makes the n-th submit (1-based) fail.
pub struct MemoryOrders {
    catalog: Arc<MemoryCatalog>,
    orders: Mutex<Vec<Order>>,
    submits: AtomicUsize,
    fail_on: Option<usize>,
}

impl MemoryOrders {
    pub fn new(catalog: Arc<MemoryCatalog>) -> Self {
        Self {
            catalog,
            orders: Mutex::new(Vec::new()),
            submits: AtomicUsize::new(0),
            fail_on: None,
        }
    }

    pub fn failing_on(catalog: Arc<MemoryCatalog>, call: usize) -> Self {
        Self {
            fail_on: Some(call),
            ..Self::new(catalog)
        }
    }

    pub fn submitted(&self) -> Vec<Order> {
        self.orders.lock().unwrap().clone()
    }

    pub fn submit_calls(&self) -> usize {
        self.submits.load(Ordering::SeqCst)
    }

    pub fn insert(&self, order: Order) {
        self.orders.lock().unwrap().push(order);
    }
}

#[async_trait]
impl OrderGateway for MemoryOrders {
    async fn submit(&self, order: NewOrder) -> GatewayResult<Order> {
        let call = self.submits.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_on == Some(call) {
            return Err(GatewayError::new("insert rejected"));
        }
        let mut orders = self.orders.lock().unwrap();
        let stored = Order {
            id: orders.len() as i64 + 1,
            product_id: order.product_id,
            customer_name: order.customer_name,
            customer_email: order.customer_email,
            customer_phone: order.customer_phone,
            customer_address: order.customer_address,
            quantity: order.quantity,
            total_price: order.total_price,
            status: order.status.unwrap_or_default(),
            created_at: Utc::now(),
        };
        orders.push(stored.clone());
        Ok(stored)
    }

    async fn list(&self) -> GatewayResult<Vec<OrderListing>> {
        let mut orders = self.orders.lock().unwrap().clone();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(orders
            .into_iter()
            .map(|order| {
                let name = self.catalog.name_of(order.product_id);
                OrderListing::new(order, name)
            })
            .collect())
    }

    async fn update_status(&self, id: i64, status: OrderStatus) -> GatewayResult<Option<Order>> {
        let mut orders = self.orders.lock().unwrap();
        let Some(order) = orders.iter_mut().find(|o| o.id == id) else {
            return Ok(None);
        };
        order.status = status;
        Ok(Some(order.clone()))
    }
}

#[derive(Default)]
pub struct MemoryCredentials {
    records: Vec<(AdminCredential, bool)>,
}

impl MemoryCredentials {
    /// Adds a record with an argon2 hash of `password`.
    pub fn with(mut self, email: &str, password: &str, role: &str, active: bool) -> Self {
        let id = self.records.len() as i64 + 1;
        let credential = AdminCredential {
            id,
            email: email.to_string(),
            password_hash: hash_password(password).unwrap(),
            role: role.to_string(),
        };
        self.records.push((credential, active));
        self
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentials {
    async fn find_active_by_email(&self, email: &str) -> GatewayResult<Vec<AdminCredential>> {
        Ok(self
            .records
            .iter()
            .filter(|(record, active)| *active && record.email == email)
            .map(|(record, _)| record.clone())
            .collect())
    }
}

#[derive(Default)]
pub struct MemoryImages {
    pub objects: Mutex<HashMap<String, (Option<String>, Bytes)>>,
}

#[async_trait]
impl ImageStorage for MemoryImages {
    async fn upload(
        &self,
        object_name: &str,
        content_type: Option<&str>,
        bytes: Bytes,
    ) -> GatewayResult<String> {
        let mut objects = self.objects.lock().unwrap();
        if objects.contains_key(object_name) {
            return Err(GatewayError::new("The resource already exists"));
        }
        objects.insert(
            object_name.to_string(),
            (content_type.map(str::to_string), bytes),
        );
        Ok(object_name.to_string())
    }

    fn public_url(&self, object_path: &str) -> String {
        format!("https://backend.test/storage/v1/object/public/tea-varieties/{object_path}")
    }
}

pub struct TestBackend {
    pub state: AppState,
    pub catalog: Arc<MemoryCatalog>,
    pub orders: Arc<MemoryOrders>,
    pub images: Arc<MemoryImages>,
}

pub fn backend(products: Vec<Product>) -> TestBackend {
    let catalog = Arc::new(MemoryCatalog::with_products(products));
    let orders = Arc::new(MemoryOrders::new(catalog.clone()));
    build(catalog, orders, MemoryCredentials::default())
}

pub fn build(
    catalog: Arc<MemoryCatalog>,
    orders: Arc<MemoryOrders>,
    credentials: MemoryCredentials,
) -> TestBackend {
    let images = Arc::new(MemoryImages::default());
    let state = AppState {
        catalog: catalog.clone(),
        orders: orders.clone(),
        credentials: Arc::new(credentials),
        images: images.clone(),
        admin: AdminSession::new(Arc::new(MemorySessionStore::new())),
        carts: CartRegistry::new(),
    };
    TestBackend {
        state,
        catalog,
        orders,
        images,
    }
}
