use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    cart::{CartItem, CartSummary},
    dto::{
        admin::{Dashboard, DashboardMetrics},
        auth::{LoginRequest, LoginResponse},
        cart::{AddToCartRequest, OpenCartResponse, UpdateQuantityRequest},
        orders::{CheckoutReceipt, CheckoutRequest, OrderList, OrderStatusOptions, UpdateOrderStatusRequest},
        products::{CatalogItem, CatalogList, CreateProductRequest, UpdateProductRequest, UploadedImage},
    },
    models::{Order, OrderListing, Product},
    response::{ApiResponse, Meta},
    routes::{admin, auth, cart, health, products},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("session token")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        products::list_products,
        products::get_product,
        cart::open_cart,
        cart::get_cart,
        cart::add_to_cart,
        cart::update_quantity,
        cart::remove_from_cart,
        cart::clear_cart,
        cart::checkout,
        auth::login,
        auth::logout,
        admin::dashboard,
        admin::create_product,
        admin::update_product,
        admin::delete_product,
        admin::upload_image,
        admin::list_orders,
        admin::update_order_status,
        admin::order_statuses
    ),
    components(
        schemas(
            Product,
            Order,
            OrderListing,
            CartItem,
            CartSummary,
            CatalogItem,
            CatalogList,
            CreateProductRequest,
            UpdateProductRequest,
            UploadedImage,
            OpenCartResponse,
            AddToCartRequest,
            UpdateQuantityRequest,
            CheckoutRequest,
            CheckoutReceipt,
            OrderList,
            OrderStatusOptions,
            UpdateOrderStatusRequest,
            LoginRequest,
            LoginResponse,
            Dashboard,
            DashboardMetrics,
            Meta,
            ApiResponse<CatalogList>,
            ApiResponse<CartSummary>,
            ApiResponse<CheckoutReceipt>,
            ApiResponse<Dashboard>,
            ApiResponse<OrderList>
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Products", description = "Storefront catalog"),
        (name = "Cart", description = "Visitor carts and checkout"),
        (name = "Auth", description = "Admin session endpoints"),
        (name = "Admin", description = "Admin dashboard endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
