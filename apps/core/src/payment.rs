//! Mock payment processing.
//!
//! Orders get a fabricated id and a simulated gateway delay. Nothing is
//! charged and no gateway is contacted.

use chrono::Utc;
use rand::Rng;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::info;

use crate::error::AppError;
use crate::models::{OrderStatus, PaymentMethod, PaymentOrder, PlanType};
use crate::store::{load, save, Store};

pub const ORDERS_KEY: &str = "minegpt-orders";
pub const CURRENCY: &str = "INR";

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const ORDER_SUFFIX_LEN: usize = 9;

/// Body of `POST /api/payment/process`. Every field is required; they are
/// optional here so a missing one maps to a 400 instead of a decode error.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub user_id: Option<String>,
    pub user_email: Option<String>,
    pub plan_type: Option<PlanType>,
    pub plan_name: Option<String>,
    pub amount: Option<f64>,
    pub payment_method: Option<PaymentMethod>,
    pub payment_method_data: Option<Value>,
}

/// A request that passed validation.
#[derive(Debug, Clone)]
pub struct ValidPayment {
    pub user_id: String,
    pub user_email: String,
    pub plan_type: PlanType,
    pub plan_name: String,
    pub amount: f64,
    pub payment_method: PaymentMethod,
    pub payment_method_data: Value,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

impl PaymentRequest {
    /// Empty strings, zero amounts and null method data count as missing.
    pub fn validate(self) -> Result<ValidPayment, AppError> {
        let missing = || AppError::Validation("Missing required fields".to_string());

        Ok(ValidPayment {
            user_id: non_empty(self.user_id).ok_or_else(missing)?,
            user_email: non_empty(self.user_email).ok_or_else(missing)?,
            plan_type: self.plan_type.ok_or_else(missing)?,
            plan_name: non_empty(self.plan_name).ok_or_else(missing)?,
            amount: self.amount.filter(|a| *a != 0.0 && a.is_finite()).ok_or_else(missing)?,
            payment_method: self.payment_method.ok_or_else(missing)?,
            payment_method_data: self
                .payment_method_data
                .filter(is_present)
                .ok_or_else(missing)?,
        })
    }
}

/// `ORD-<epoch ms>-<9 base36 chars>`
pub fn generate_order_id(now_ms: i64) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..ORDER_SUFFIX_LEN)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();
    format!("ORD-{}-{}", now_ms, suffix)
}

pub struct Payments {
    store: Arc<dyn Store>,
    delay: Duration,
    lock: Mutex<()>,
}

impl Payments {
    pub fn new(store: Arc<dyn Store>, delay: Duration) -> Self {
        Self {
            store,
            delay,
            lock: Mutex::new(()),
        }
    }

    /// Create a `processing` order after the simulated gateway delay and
    /// record it.
    pub async fn process(&self, payment: ValidPayment) -> Result<PaymentOrder, AppError> {
        let now = Utc::now().timestamp_millis();
        let order = PaymentOrder {
            order_id: generate_order_id(now),
            user_id: payment.user_id,
            user_email: payment.user_email,
            plan_type: payment.plan_type,
            plan_name: payment.plan_name,
            amount: payment.amount,
            currency: CURRENCY.to_string(),
            payment_method: payment.payment_method,
            payment_method_data: payment.payment_method_data,
            status: OrderStatus::Processing,
            created_at: now,
            updated_at: now,
            completed_at: None,
            razorpay_order_id: Some(format!("rzp_{}", now)),
        };

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        {
            let _guard = self.lock.lock().await;
            let mut orders = self.all().await?;
            orders.push(order.clone());
            save(self.store.as_ref(), ORDERS_KEY, &orders).await?;
        }

        info!(
            "Created order {} for user {} ({:?}, {} {})",
            order.order_id, order.user_id, order.plan_type, order.amount, order.currency
        );
        Ok(order)
    }

    pub async fn orders_for(&self, user_id: &str) -> Result<Vec<PaymentOrder>, AppError> {
        Ok(self
            .all()
            .await?
            .into_iter()
            .filter(|o| o.user_id == user_id)
            .collect())
    }

    async fn all(&self) -> Result<Vec<PaymentOrder>, AppError> {
        Ok(load(self.store.as_ref(), ORDERS_KEY).await?.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;
    use serde_json::json;

    fn full_request() -> PaymentRequest {
        serde_json::from_value(json!({
            "userId": "demo-user-001",
            "userEmail": "demo@minegpt.com",
            "planType": "professional",
            "planName": "Professional",
            "amount": 999,
            "paymentMethod": "UPI",
            "paymentMethodData": { "upiId": "demo@upi" }
        }))
        .unwrap()
    }

    #[test]
    fn test_order_id_format() {
        let re = Regex::new(r"^ORD-1700000000000-[0-9a-z]{9}$").unwrap();
        assert!(re.is_match(&generate_order_id(1_700_000_000_000)));
    }

    #[test]
    fn test_validate_accepts_full_request() {
        let valid = full_request().validate().unwrap();
        assert_eq!(valid.plan_type, PlanType::Professional);
        assert_eq!(valid.payment_method, PaymentMethod::Upi);
        assert_eq!(valid.amount, 999.0);
    }

    #[test]
    fn test_validate_rejects_zero_amount_and_blank_fields() {
        let mut request = full_request();
        request.amount = Some(0.0);
        assert!(matches!(request.validate(), Err(AppError::Validation(_))));

        let mut request = full_request();
        request.user_email = Some(String::new());
        assert!(matches!(request.validate(), Err(AppError::Validation(_))));

        let mut request = full_request();
        request.payment_method_data = Some(Value::Null);
        assert!(matches!(request.validate(), Err(AppError::Validation(_))));
    }
}
