use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::{
    gateway::GatewayError,
    response::{ApiResponse, Meta},
};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not Found")]
    NotFound,

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Gateway(#[from] GatewayError),

    /// A checkout stopped at `position` (1-based). Orders before it were
    /// already persisted and are not rolled back.
    #[error("Order for {product_name} failed: {message}")]
    Checkout {
        position: usize,
        product_id: i64,
        product_name: String,
        submitted: usize,
        message: String,
    },

    #[error("Internal Server Error")]
    Internal(#[from] anyhow::Error),
}

#[derive(Serialize)]
struct ErrorData {
    error: String,
}

#[derive(Serialize)]
struct CheckoutErrorData {
    error: String,
    failed_position: usize,
    failed_product_id: i64,
    orders_submitted: usize,
}

impl AppError {
    pub fn invalid_credentials() -> Self {
        AppError::Unauthorized("Invalid credentials".into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Gateway(_) | AppError::Checkout { .. } => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();

        match &self {
            AppError::Gateway(err) => tracing::error!(error = %err, "backend call failed"),
            AppError::Checkout {
                position,
                product_id,
                submitted,
                message,
                ..
            } => tracing::error!(
                position,
                product_id,
                submitted,
                error = %message,
                "checkout stopped"
            ),
            AppError::Internal(err) => tracing::error!(error = ?err, "internal error"),
            _ => {}
        }

        if let AppError::Checkout {
            position,
            product_id,
            submitted,
            ..
        } = self
        {
            let body = ApiResponse {
                message: message.clone(),
                data: Some(CheckoutErrorData {
                    error: message,
                    failed_position: position,
                    failed_product_id: product_id,
                    orders_submitted: submitted,
                }),
                meta: Some(Meta::empty()),
            };
            return (status, axum::Json(body)).into_response();
        }

        let body = ApiResponse {
            message: message.clone(),
            data: Some(ErrorData { error: message }),
            meta: Some(Meta::empty()),
        };

        (status, axum::Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
