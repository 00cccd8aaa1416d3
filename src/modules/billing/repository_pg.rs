use uuid::Uuid;

use crate::{
    api::error,
    modules::billing::{
        repository::BillingRepository,
        schema::{PaymentStatus, PaymentTransactionEntity, SubscriptionEntity, SubscriptionPlan},
    },
};

#[derive(Clone)]
pub struct BillingRepositoryPg {
    pool: sqlx::PgPool,
}

impl BillingRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl BillingRepository for BillingRepositoryPg {
    async fn find_subscription(
        &self,
        user_id: &Uuid,
    ) -> Result<Option<SubscriptionEntity>, error::SystemError> {
        let subscription = sqlx::query_as::<_, SubscriptionEntity>(
            r#"
            SELECT * FROM subscriptions
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(subscription)
    }

    async fn find_active_subscription(
        &self,
        user_id: &Uuid,
    ) -> Result<Option<SubscriptionEntity>, error::SystemError> {
        let subscription = sqlx::query_as::<_, SubscriptionEntity>(
            r#"
            SELECT * FROM subscriptions
            WHERE user_id = $1
              AND status = 'ACTIVE'
              AND expires_at > NOW()
            ORDER BY expires_at DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(subscription)
    }

    async fn create_subscription(
        &self,
        user_id: &Uuid,
        plan: &SubscriptionPlan,
    ) -> Result<SubscriptionEntity, error::SystemError> {
        let id = Uuid::now_v7();
        let subscription = sqlx::query_as::<_, SubscriptionEntity>(
            r#"
            INSERT INTO subscriptions (id, user_id, plan)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(plan)
        .fetch_one(&self.pool)
        .await?;

        Ok(subscription)
    }

    async fn create_transaction(
        &self,
        user_id: &Uuid,
        subscription_id: &Uuid,
        provider: &str,
        provider_order_id: &str,
        amount_cents: i64,
        currency: &str,
    ) -> Result<PaymentTransactionEntity, error::SystemError> {
        let id = Uuid::now_v7();
        let transaction = sqlx::query_as::<_, PaymentTransactionEntity>(
            r#"
            INSERT INTO payment_transactions
                (id, user_id, subscription_id, provider, provider_order_id, amount_cents, currency)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(subscription_id)
        .bind(provider)
        .bind(provider_order_id)
        .bind(amount_cents)
        .bind(currency)
        .fetch_one(&self.pool)
        .await?;

        Ok(transaction)
    }

    async fn find_transaction_by_order(
        &self,
        provider_order_id: &str,
    ) -> Result<Option<PaymentTransactionEntity>, error::SystemError> {
        let transaction = sqlx::query_as::<_, PaymentTransactionEntity>(
            "SELECT * FROM payment_transactions WHERE provider_order_id = $1",
        )
        .bind(provider_order_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(transaction)
    }

    async fn complete_transaction_atomic(
        &self,
        provider_order_id: &str,
        extension_days: i64,
    ) -> Result<PaymentTransactionEntity, error::SystemError> {
        let mut tx = self.pool.begin().await?;

        let transaction = sqlx::query_as::<_, PaymentTransactionEntity>(
            "SELECT * FROM payment_transactions WHERE provider_order_id = $1 FOR UPDATE",
        )
        .bind(provider_order_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| error::SystemError::not_found("Transaction not found"))?;

        // provider callbacks may repeat; the first completion wins
        if transaction.status == PaymentStatus::Completed {
            tx.rollback().await?;
            return Ok(transaction);
        }

        if transaction.status == PaymentStatus::Failed {
            tx.rollback().await?;
            return Err(error::SystemError::bad_request("Transaction already failed"));
        }

        let transaction = sqlx::query_as::<_, PaymentTransactionEntity>(
            r#"
            UPDATE payment_transactions
            SET status = 'COMPLETED', completed_at = NOW()
            WHERE provider_order_id = $1
            RETURNING *
            "#,
        )
        .bind(provider_order_id)
        .fetch_one(&mut *tx)
        .await?;

        if let Some(subscription_id) = &transaction.subscription_id {
            sqlx::query(
                r#"
                UPDATE subscriptions
                SET
                    status     = 'ACTIVE',
                    started_at = COALESCE(started_at, NOW()),
                    expires_at = GREATEST(COALESCE(expires_at, NOW()), NOW())
                                 + make_interval(days => $2::int),
                    updated_at = NOW()
                WHERE id = $1
                "#,
            )
            .bind(subscription_id)
            .bind(extension_days as i32)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(transaction)
    }

    async fn fail_transaction(
        &self,
        provider_order_id: &str,
    ) -> Result<PaymentTransactionEntity, error::SystemError> {
        let transaction = sqlx::query_as::<_, PaymentTransactionEntity>(
            r#"
            UPDATE payment_transactions
            SET status = 'FAILED'
            WHERE provider_order_id = $1 AND status = 'PENDING'
            RETURNING *
            "#,
        )
        .bind(provider_order_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| error::SystemError::bad_request("Transaction is not pending"))?;

        Ok(transaction)
    }

    async fn list_transactions(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<PaymentTransactionEntity>, error::SystemError> {
        let transactions = sqlx::query_as::<_, PaymentTransactionEntity>(
            "SELECT * FROM payment_transactions WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(transactions)
    }

    async fn expire_stale(&self, user_id: &Uuid) -> Result<u64, error::SystemError> {
        let rows = sqlx::query(
            r#"
            UPDATE subscriptions
            SET status = 'EXPIRED', updated_at = NOW()
            WHERE user_id = $1 AND status = 'ACTIVE' AND expires_at <= NOW()
            "#,
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(rows)
    }
}
