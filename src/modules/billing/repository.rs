use uuid::Uuid;

use crate::api::error;
use crate::modules::billing::schema::{
    PaymentTransactionEntity, SubscriptionEntity, SubscriptionPlan,
};

#[async_trait::async_trait]
pub trait BillingRepository {
    /// Latest subscription row for the user, any status.
    async fn find_subscription(
        &self,
        user_id: &Uuid,
    ) -> Result<Option<SubscriptionEntity>, error::SystemError>;

    /// ACTIVE and unexpired.
    async fn find_active_subscription(
        &self,
        user_id: &Uuid,
    ) -> Result<Option<SubscriptionEntity>, error::SystemError>;

    async fn create_subscription(
        &self,
        user_id: &Uuid,
        plan: &SubscriptionPlan,
    ) -> Result<SubscriptionEntity, error::SystemError>;

    async fn create_transaction(
        &self,
        user_id: &Uuid,
        subscription_id: &Uuid,
        provider: &str,
        provider_order_id: &str,
        amount_cents: i64,
        currency: &str,
    ) -> Result<PaymentTransactionEntity, error::SystemError>;

    async fn find_transaction_by_order(
        &self,
        provider_order_id: &str,
    ) -> Result<Option<PaymentTransactionEntity>, error::SystemError>;

    /// Mark COMPLETED and activate/extend the linked subscription in one
    /// transaction. Extension stacks onto an unexpired subscription.
    /// Completing an already-completed order returns it unchanged.
    async fn complete_transaction_atomic(
        &self,
        provider_order_id: &str,
        extension_days: i64,
    ) -> Result<PaymentTransactionEntity, error::SystemError>;

    async fn fail_transaction(
        &self,
        provider_order_id: &str,
    ) -> Result<PaymentTransactionEntity, error::SystemError>;

    async fn list_transactions(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<PaymentTransactionEntity>, error::SystemError>;

    /// Flip stale ACTIVE rows to EXPIRED; returns how many changed.
    async fn expire_stale(&self, user_id: &Uuid) -> Result<u64, error::SystemError>;
}
