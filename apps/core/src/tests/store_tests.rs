//! Store Module Tests
//!
//! SQLite persistence plus the chat history and payment services built on
//! the store interface.

use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tempfile::tempdir;

use crate::error::AppError;
use crate::history::ChatHistory;
use crate::models::{ChatMessage, OrderStatus, PaymentMethod, PlanType, Role, Settings, Theme};
use crate::payment::{Payments, ValidPayment, CURRENCY};
use crate::store::{MemoryStore, SqliteStore, Store};

fn memory_store() -> Arc<dyn Store> {
    Arc::new(MemoryStore::new())
}

fn payment_for(user_id: &str) -> ValidPayment {
    ValidPayment {
        user_id: user_id.to_string(),
        user_email: format!("{}@minegpt.com", user_id),
        plan_type: PlanType::Enterprise,
        plan_name: "Enterprise".to_string(),
        amount: 4999.0,
        payment_method: PaymentMethod::Card,
        payment_method_data: json!({ "last4": "4242" }),
    }
}

#[cfg(test)]
mod sqlite_tests {
    use super::*;

    #[tokio::test]
    async fn test_sqlite_store_persists_across_connections() {
        let dir = tempdir().expect("Failed to create temp dir");
        let db_url = format!("sqlite://{}", dir.path().join("nested/store.sqlite").display());

        {
            let store = SqliteStore::connect(&db_url).await.expect("connect");
            store.set("k", json!({"v": [1, 2, 3]})).await.unwrap();
            store.set("k", json!({"v": [4]})).await.unwrap();
            store.ping().await.unwrap();
        }

        let store = SqliteStore::connect(&db_url).await.expect("reconnect");
        assert_eq!(store.get("k").await.unwrap(), Some(json!({"v": [4]})));

        store.remove("k").await.unwrap();
        assert!(store.get("k").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_history_on_sqlite() {
        let dir = tempdir().expect("Failed to create temp dir");
        let db_url = format!("sqlite://{}", dir.path().join("history.sqlite").display());
        let store: Arc<dyn Store> = Arc::new(SqliteStore::connect(&db_url).await.unwrap());

        let history = ChatHistory::new(store);
        let session = history
            .create("Lignite".to_string(), vec![ChatMessage::user("lignite?")])
            .await
            .unwrap();

        let loaded = history.get(&session.id).await.unwrap();
        assert_eq!(loaded, session);
    }
}

#[cfg(test)]
mod history_tests {
    use super::*;

    #[tokio::test]
    async fn test_sessions_listed_newest_first() {
        let history = ChatHistory::new(memory_store());

        let a = history.create("A".into(), vec![]).await.unwrap();
        let b = history.create("B".into(), vec![]).await.unwrap();
        let c = history.create("C".into(), vec![]).await.unwrap();

        let ids: Vec<String> = history.list().await.unwrap().into_iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![c.id, b.id, a.id]);
    }

    #[tokio::test]
    async fn test_record_appends_to_existing_session() {
        let history = ChatHistory::new(memory_store());

        let first = history
            .record(
                None,
                "What is lignite".into(),
                vec![ChatMessage::user("What is lignite"), ChatMessage::assistant("Brown coal")],
            )
            .await
            .unwrap();
        let other = history.create("Other".into(), vec![]).await.unwrap();

        let updated = history
            .record(
                Some(first.id.as_str()),
                "ignored".into(),
                vec![ChatMessage::user("And anthracite?")],
            )
            .await
            .unwrap();

        assert_eq!(updated.id, first.id);
        assert_eq!(updated.title, "What is lignite");
        assert_eq!(updated.messages.len(), 3);
        assert_eq!(updated.messages[2].role, Role::User);

        // appending does not reorder
        let sessions = history.list().await.unwrap();
        assert_eq!(sessions[0].id, other.id);
    }

    #[tokio::test]
    async fn test_record_with_unknown_session_starts_new_one() {
        let history = ChatHistory::new(memory_store());
        let session = history
            .record(Some("missing"), "Fresh".into(), vec![ChatMessage::user("hi")])
            .await
            .unwrap();
        assert_ne!(session.id, "missing");
        assert_eq!(session.title, "Fresh");
        assert_eq!(history.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_and_clear() {
        let history = ChatHistory::new(memory_store());
        let a = history.create("A".into(), vec![]).await.unwrap();
        history.create("B".into(), vec![]).await.unwrap();

        history.delete(&a.id).await.unwrap();
        assert!(matches!(history.get(&a.id).await, Err(AppError::NotFound(_))));
        assert!(matches!(history.delete(&a.id).await, Err(AppError::NotFound(_))));

        history.clear().await.unwrap();
        assert!(history.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_creates_are_not_lost() {
        let history = Arc::new(ChatHistory::new(memory_store()));

        let tasks: Vec<_> = (0..20)
            .map(|i| {
                let history = history.clone();
                tokio::spawn(async move { history.create(format!("S{}", i), vec![]).await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        assert_eq!(history.list().await.unwrap().len(), 20);
    }

    #[tokio::test]
    async fn test_settings_default_and_save() {
        let history = ChatHistory::new(memory_store());
        assert_eq!(history.settings().await.unwrap(), Settings::default());

        let settings = Settings {
            theme: Theme::Light,
            save_history: false,
            ..Settings::default()
        };
        history.save_settings(&settings).await.unwrap();
        assert_eq!(history.settings().await.unwrap(), settings);
    }
}

#[cfg(test)]
mod payment_tests {
    use super::*;

    #[tokio::test]
    async fn test_process_creates_processing_order() {
        let payments = Payments::new(memory_store(), Duration::ZERO);

        let order = payments.process(payment_for("u1")).await.unwrap();

        assert!(order.order_id.starts_with(&format!("ORD-{}-", order.created_at)));
        assert_eq!(order.status, OrderStatus::Processing);
        assert_eq!(order.currency, CURRENCY);
        assert_eq!(order.created_at, order.updated_at);
        assert_eq!(
            order.razorpay_order_id.as_deref(),
            Some(format!("rzp_{}", order.created_at).as_str())
        );
        assert!(order.completed_at.is_none());
    }

    #[tokio::test]
    async fn test_orders_are_filtered_by_user() {
        let payments = Payments::new(memory_store(), Duration::ZERO);
        payments.process(payment_for("u1")).await.unwrap();
        payments.process(payment_for("u2")).await.unwrap();
        payments.process(payment_for("u1")).await.unwrap();

        assert_eq!(payments.orders_for("u1").await.unwrap().len(), 2);
        assert_eq!(payments.orders_for("u2").await.unwrap().len(), 1);
        assert!(payments.orders_for("nobody").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_process_waits_for_gateway_delay() {
        let payments = Payments::new(memory_store(), Duration::from_millis(50));
        let start = std::time::Instant::now();

        payments.process(payment_for("u1")).await.unwrap();

        assert!(start.elapsed() >= Duration::from_millis(50));
    }
}
