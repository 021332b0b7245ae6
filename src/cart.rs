use std::{collections::HashMap, sync::Arc, time::Duration};

use rust_decimal::Decimal;
use serde::Serialize;
use tokio::{
    sync::{Mutex, RwLock},
    time::Instant,
};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{DELIVERY_FEE, Product};

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CartItem {
    pub product: Product,
    pub quantity: u32,
}

impl CartItem {
    pub fn line_total(&self) -> Decimal {
        self.product.price * Decimal::from(self.quantity)
    }
}

/// Line items for one visitor session, in the order they were first added.
/// Holds at most one entry per product id.
#[derive(Debug, Clone, Default)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn add(&mut self, product: Product) {
        match self.items.iter_mut().find(|item| item.product.id == product.id) {
            Some(item) => item.quantity = item.quantity.saturating_add(1),
            None => self.items.push(CartItem {
                product,
                quantity: 1,
            }),
        }
    }

    pub fn remove(&mut self, product_id: i64) {
        self.items.retain(|item| item.product.id != product_id);
    }

    /// Sets the quantity to `floor(quantity)`. Non-finite input, or
    /// anything that floors below 1, drops the line item.
    pub fn update_quantity(&mut self, product_id: i64, quantity: f64) {
        let next = quantity.floor();
        if !quantity.is_finite() || next < 1.0 {
            self.remove(product_id);
            return;
        }
        if let Some(item) = self
            .items
            .iter_mut()
            .find(|item| item.product.id == product_id)
        {
            // `as` saturates at u32::MAX
            item.quantity = next as u32;
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn subtotal(&self) -> Decimal {
        self.items.iter().map(CartItem::line_total).sum()
    }

    pub fn delivery_fee(&self) -> Decimal {
        if self.items.is_empty() {
            Decimal::ZERO
        } else {
            DELIVERY_FEE
        }
    }

    pub fn total(&self) -> Decimal {
        self.subtotal() + self.delivery_fee()
    }

    /// Badge count: sum of quantities.
    pub fn count(&self) -> u32 {
        self.items
            .iter()
            .fold(0u32, |sum, item| sum.saturating_add(item.quantity))
    }

    pub fn summary(&self, cart_id: Uuid) -> CartSummary {
        CartSummary {
            cart_id,
            items: self.items.clone(),
            count: self.count(),
            subtotal: self.subtotal(),
            delivery_fee: self.delivery_fee(),
            total: self.total(),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CartSummary {
    pub cart_id: Uuid,
    pub items: Vec<CartItem>,
    pub count: u32,
    pub subtotal: Decimal,
    pub delivery_fee: Decimal,
    pub total: Decimal,
}

pub type SharedCart = Arc<Mutex<Cart>>;

/// Carts untouched for this long are dropped on the next `open`.
pub const DEFAULT_IDLE_TTL: Duration = Duration::from_secs(2 * 60 * 60);

/// Upper bound on live carts; the least recently touched one makes room.
pub const DEFAULT_MAX_CARTS: usize = 10_000;

struct CartSlot {
    cart: SharedCart,
    last_touched: Instant,
}

/// In-process carts keyed by visitor session id. Nothing here survives a
/// restart. A cart lives until it sits idle past the TTL or is pushed out
/// by the capacity cap.
#[derive(Clone)]
pub struct CartRegistry {
    carts: Arc<RwLock<HashMap<Uuid, CartSlot>>>,
    idle_ttl: Duration,
    max_carts: usize,
}

impl Default for CartRegistry {
    fn default() -> Self {
        Self::with_limits(DEFAULT_IDLE_TTL, DEFAULT_MAX_CARTS)
    }
}

impl CartRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(idle_ttl: Duration, max_carts: usize) -> Self {
        Self {
            carts: Arc::new(RwLock::new(HashMap::new())),
            idle_ttl,
            max_carts: max_carts.max(1),
        }
    }

    pub async fn open(&self) -> Uuid {
        let now = Instant::now();
        let mut carts = self.carts.write().await;

        let before = carts.len();
        carts.retain(|_, slot| now.duration_since(slot.last_touched) < self.idle_ttl);
        let expired = before - carts.len();
        if expired > 0 {
            tracing::debug!(expired, "idle carts dropped");
        }

        while carts.len() >= self.max_carts {
            let oldest = carts
                .iter()
                .min_by_key(|(_, slot)| slot.last_touched)
                .map(|(id, _)| *id);
            match oldest {
                Some(id) => {
                    carts.remove(&id);
                    tracing::debug!(cart_id = %id, "cart evicted at capacity");
                }
                None => break,
            }
        }

        let id = Uuid::new_v4();
        carts.insert(
            id,
            CartSlot {
                cart: Arc::new(Mutex::new(Cart::new())),
                last_touched: now,
            },
        );
        id
    }

    /// Looks up a cart and marks it as recently used.
    pub async fn get(&self, id: Uuid) -> Option<SharedCart> {
        let mut carts = self.carts.write().await;
        let slot = carts.get_mut(&id)?;
        slot.last_touched = Instant::now();
        Some(slot.cart.clone())
    }

    pub async fn len(&self) -> usize {
        self.carts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.carts.read().await.is_empty()
    }
}
