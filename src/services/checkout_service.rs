//! Turns a cart into order rows, one per line item.
//!
//! Orders go out one at a time in cart order. The delivery fee rides on the
//! first order only. A failed submission stops the loop; rows already written
//! stay written, and the cart is left as it was so the customer can retry.

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    cart::Cart,
    dto::orders::{CheckoutReceipt, CheckoutRequest},
    error::{AppError, AppResult},
    gateway::OrderGateway,
    models::NewOrder,
    response::{ApiResponse, Meta},
    services::cart_service::find_cart,
    state::AppState,
};

pub const CONFIRMATION_MESSAGE: &str = "Thank you for your order. Our team will contact you to arrange delivery and payment.";

/// Validated, trimmed checkout form.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerDetails {
    pub name: String,
    pub email: Option<String>,
    pub phone: String,
    pub address: String,
}

impl TryFrom<CheckoutRequest> for CustomerDetails {
    type Error = AppError;

    fn try_from(req: CheckoutRequest) -> Result<Self, Self::Error> {
        let name = req.name.trim().to_string();
        let phone = req.phone.trim().to_string();
        let address = req.address.trim().to_string();
        let email = req
            .email
            .map(|email| email.trim().to_string())
            .filter(|email| !email.is_empty());

        if name.is_empty() || phone.is_empty() || address.is_empty() {
            return Err(AppError::Validation(
                "Name, phone, and address are required.".into(),
            ));
        }

        Ok(Self {
            name,
            email,
            phone,
            address,
        })
    }
}

pub async fn checkout(
    state: &AppState,
    cart_id: Uuid,
    payload: CheckoutRequest,
) -> AppResult<ApiResponse<CheckoutReceipt>> {
    let cart = find_cart(state, cart_id).await?;
    // Held for the whole loop so the cart cannot change under a submission.
    let mut cart = cart.lock().await;

    let receipt = place_orders(state.orders.as_ref(), &cart, payload).await?;
    cart.clear();

    tracing::info!(
        %cart_id,
        orders = receipt.orders.len(),
        total = %receipt.total,
        "checkout completed"
    );
    Ok(ApiResponse::success(
        "Order placed",
        receipt,
        Some(Meta::empty()),
    ))
}

/// Submits one order per line item. Does not touch the cart.
pub async fn place_orders(
    orders: &dyn OrderGateway,
    cart: &Cart,
    payload: CheckoutRequest,
) -> AppResult<CheckoutReceipt> {
    if cart.is_empty() {
        return Err(AppError::Validation(
            "Add products to your cart before checking out.".into(),
        ));
    }
    let customer = CustomerDetails::try_from(payload)?;

    let mut quantities = Vec::with_capacity(cart.items().len());
    for item in cart.items() {
        let quantity = i32::try_from(item.quantity).map_err(|_| {
            AppError::Validation(format!("Quantity for {} is too large", item.product.name))
        })?;
        quantities.push(quantity);
    }

    let delivery_fee = cart.delivery_fee();
    let mut submitted = Vec::with_capacity(cart.items().len());

    for (index, (item, quantity)) in cart.items().iter().zip(quantities).enumerate() {
        let fee = if index == 0 { delivery_fee } else { Decimal::ZERO };
        let new_order = NewOrder {
            product_id: item.product.id,
            customer_name: customer.name.clone(),
            customer_email: customer.email.clone(),
            customer_phone: customer.phone.clone(),
            customer_address: customer.address.clone(),
            quantity,
            total_price: item.line_total() + fee,
            status: None,
        };

        match orders.submit(new_order).await {
            Ok(order) => {
                tracing::info!(order_id = order.id, product_id = item.product.id, "order submitted");
                submitted.push(order);
            }
            Err(err) => {
                return Err(AppError::Checkout {
                    position: index + 1,
                    product_id: item.product.id,
                    product_name: item.product.name.clone(),
                    submitted: submitted.len(),
                    message: err.message().to_string(),
                });
            }
        }
    }

    Ok(CheckoutReceipt {
        message: CONFIRMATION_MESSAGE.to_string(),
        orders: submitted,
        subtotal: cart.subtotal(),
        delivery_fee,
        total: cart.total(),
    })
}
