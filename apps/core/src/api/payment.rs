use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use super::SharedState;
use crate::error::AppError;
use crate::payment::PaymentRequest;

/// `POST /api/payment/process`
pub async fn process(
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    let body: Value = serde_json::from_slice(&body)?;
    let request: PaymentRequest = serde_json::from_value(body)
        .map_err(|e| AppError::Validation(format!("Invalid payment request: {}", e)))?;

    let order = state.payments.process(request.validate()?).await?;

    Ok(Json(json!({
        "success": true,
        "orderId": order.order_id,
        "message": "Payment order created successfully",
        "razorpayOrderId": order.razorpay_order_id,
        "order": order,
    })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrdersQuery {
    pub user_id: Option<String>,
}

/// `GET /api/payment/orders?userId=`
pub async fn orders(
    State(state): State<SharedState>,
    Query(query): Query<OrdersQuery>,
) -> Result<Json<Value>, AppError> {
    let user_id = query
        .user_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| AppError::Validation("User ID is required".to_string()))?;

    let orders = state.payments.orders_for(&user_id).await?;

    Ok(Json(json!({
        "success": true,
        "orders": orders,
        "message": "Orders retrieved successfully",
    })))
}
