use serde::{Deserialize, Serialize};
use sqlx::prelude::{FromRow, Type};
use uuid::Uuid;

#[derive(Debug, PartialEq, Clone, Type, Serialize, Deserialize)]
#[sqlx(type_name = "subscription_plan", rename_all = "UPPERCASE")]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionPlan {
    #[sqlx(rename = "MONTHLY")]
    Monthly,
    #[sqlx(rename = "YEARLY")]
    Yearly,
}

#[derive(Debug, PartialEq, Clone, Type, Serialize, Deserialize)]
#[sqlx(type_name = "subscription_status", rename_all = "UPPERCASE")]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    #[sqlx(rename = "PENDING")]
    Pending,
    #[sqlx(rename = "ACTIVE")]
    Active,
    #[sqlx(rename = "EXPIRED")]
    Expired,
    #[sqlx(rename = "CANCELED")]
    Canceled,
}

#[derive(Debug, PartialEq, Clone, Type, Serialize, Deserialize)]
#[sqlx(type_name = "payment_status", rename_all = "UPPERCASE")]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[sqlx(rename = "PENDING")]
    Pending,
    #[sqlx(rename = "COMPLETED")]
    Completed,
    #[sqlx(rename = "FAILED")]
    Failed,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SubscriptionEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub plan: SubscriptionPlan,
    pub status: SubscriptionStatus,
    pub started_at: Option<chrono::DateTime<chrono::Utc>>,
    pub expires_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Row per order sent to the external payment provider;
/// `provider_order_id` is the provider's reference and is unique.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PaymentTransactionEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub subscription_id: Option<Uuid>,
    pub provider: String,
    pub provider_order_id: String,
    pub amount_cents: i64,
    pub currency: String,
    pub status: PaymentStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
}
