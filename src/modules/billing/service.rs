use std::sync::Arc;

use log::info;
use uuid::Uuid;

use crate::{
    api::error,
    modules::billing::{
        model::{duration_for_amount, plan_price, SubscriptionStatusResponse},
        repository::BillingRepository,
        schema::{PaymentTransactionEntity, SubscriptionPlan, SubscriptionStatus},
    },
};

#[derive(Clone)]
pub struct BillingService {
    repo: Arc<dyn BillingRepository + Send + Sync>,
    provider: String,
}

impl BillingService {
    pub fn with_dependencies(
        repo: Arc<dyn BillingRepository + Send + Sync>,
        provider: String,
    ) -> Self {
        BillingService { repo, provider }
    }

    /// Opens an order with the payment provider for the given plan. The
    /// user's subscription row is created PENDING on the first order.
    pub async fn create_order(
        &self,
        user_id: Uuid,
        plan: SubscriptionPlan,
    ) -> Result<PaymentTransactionEntity, error::SystemError> {
        let price = plan_price(&plan);

        let subscription = match self.repo.find_subscription(&user_id).await? {
            Some(existing) if existing.status != SubscriptionStatus::Canceled => existing,
            _ => self.repo.create_subscription(&user_id, &plan).await?,
        };

        let provider_order_id = format!("{}-{}", self.provider, Uuid::now_v7());

        let transaction = self
            .repo
            .create_transaction(
                &user_id,
                &subscription.id,
                &self.provider,
                &provider_order_id,
                price.amount_cents,
                price.currency,
            )
            .await?;

        info!("Payment order {} opened for {}", transaction.provider_order_id, user_id);
        Ok(transaction)
    }

    /// Provider success callback. Safe to call repeatedly for the same
    /// order; only the first call activates the subscription.
    pub async fn complete_order(
        &self,
        provider_order_id: &str,
    ) -> Result<PaymentTransactionEntity, error::SystemError> {
        let transaction = self
            .repo
            .find_transaction_by_order(provider_order_id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Transaction not found"))?;

        let days = duration_for_amount(transaction.amount_cents).ok_or_else(|| {
            error::SystemError::bad_request("Charged amount matches no known plan")
        })?;

        self.repo.complete_transaction_atomic(provider_order_id, days).await
    }

    pub async fn fail_order(
        &self,
        provider_order_id: &str,
    ) -> Result<PaymentTransactionEntity, error::SystemError> {
        self.repo.fail_transaction(provider_order_id).await
    }

    pub async fn get_status(
        &self,
        user_id: Uuid,
    ) -> Result<SubscriptionStatusResponse, error::SystemError> {
        // lazily retire subscriptions that ran out
        self.repo.expire_stale(&user_id).await?;

        let subscription = self.repo.find_subscription(&user_id).await?;
        let is_premium = matches!(
            &subscription,
            Some(s) if s.status == SubscriptionStatus::Active
        );

        Ok(SubscriptionStatusResponse { subscription, is_premium })
    }

    pub async fn list_transactions(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<PaymentTransactionEntity>, error::SystemError> {
        self.repo.list_transactions(&user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::billing::schema::{PaymentStatus, SubscriptionEntity};
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeBillingRepo {
        subscriptions: Mutex<Vec<SubscriptionEntity>>,
        transactions: Mutex<Vec<PaymentTransactionEntity>>,
    }

    #[async_trait::async_trait]
    impl BillingRepository for FakeBillingRepo {
        async fn find_subscription(
            &self,
            user_id: &Uuid,
        ) -> Result<Option<SubscriptionEntity>, error::SystemError> {
            Ok(self
                .subscriptions
                .lock()
                .unwrap()
                .iter()
                .filter(|s| s.user_id == *user_id)
                .max_by_key(|s| s.created_at)
                .cloned())
        }

        async fn find_active_subscription(
            &self,
            user_id: &Uuid,
        ) -> Result<Option<SubscriptionEntity>, error::SystemError> {
            let now = chrono::Utc::now();
            Ok(self
                .subscriptions
                .lock()
                .unwrap()
                .iter()
                .find(|s| {
                    s.user_id == *user_id
                        && s.status == SubscriptionStatus::Active
                        && s.expires_at.is_some_and(|e| e > now)
                })
                .cloned())
        }

        async fn create_subscription(
            &self,
            user_id: &Uuid,
            plan: &SubscriptionPlan,
        ) -> Result<SubscriptionEntity, error::SystemError> {
            let sub = SubscriptionEntity {
                id: Uuid::now_v7(),
                user_id: *user_id,
                plan: plan.clone(),
                status: SubscriptionStatus::Pending,
                started_at: None,
                expires_at: None,
                created_at: chrono::Utc::now(),
                updated_at: chrono::Utc::now(),
            };
            self.subscriptions.lock().unwrap().push(sub.clone());
            Ok(sub)
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
            let tx = PaymentTransactionEntity {
                id: Uuid::now_v7(),
                user_id: *user_id,
                subscription_id: Some(*subscription_id),
                provider: provider.into(),
                provider_order_id: provider_order_id.into(),
                amount_cents,
                currency: currency.into(),
                status: PaymentStatus::Pending,
                created_at: chrono::Utc::now(),
                completed_at: None,
            };
            self.transactions.lock().unwrap().push(tx.clone());
            Ok(tx)
        }

        async fn find_transaction_by_order(
            &self,
            provider_order_id: &str,
        ) -> Result<Option<PaymentTransactionEntity>, error::SystemError> {
            Ok(self
                .transactions
                .lock()
                .unwrap()
                .iter()
                .find(|t| t.provider_order_id == provider_order_id)
                .cloned())
        }

        async fn complete_transaction_atomic(
            &self,
            provider_order_id: &str,
            extension_days: i64,
        ) -> Result<PaymentTransactionEntity, error::SystemError> {
            let mut txs = self.transactions.lock().unwrap();
            let tx = txs
                .iter_mut()
                .find(|t| t.provider_order_id == provider_order_id)
                .ok_or_else(|| error::SystemError::not_found("Transaction not found"))?;

            if tx.status == PaymentStatus::Completed {
                return Ok(tx.clone());
            }

            tx.status = PaymentStatus::Completed;
            tx.completed_at = Some(chrono::Utc::now());

            if let Some(subscription_id) = tx.subscription_id {
                let mut subs = self.subscriptions.lock().unwrap();
                if let Some(sub) = subs.iter_mut().find(|s| s.id == subscription_id) {
                    let now = chrono::Utc::now();
                    let base = sub.expires_at.filter(|e| *e > now).unwrap_or(now);
                    sub.status = SubscriptionStatus::Active;
                    if sub.started_at.is_none() {
                        sub.started_at = Some(now);
                    }
                    sub.expires_at = Some(base + chrono::Duration::days(extension_days));
                }
            }

            Ok(tx.clone())
        }

        async fn fail_transaction(
            &self,
            provider_order_id: &str,
        ) -> Result<PaymentTransactionEntity, error::SystemError> {
            let mut txs = self.transactions.lock().unwrap();
            let tx = txs
                .iter_mut()
                .find(|t| {
                    t.provider_order_id == provider_order_id
                        && t.status == PaymentStatus::Pending
                })
                .ok_or_else(|| error::SystemError::bad_request("Transaction is not pending"))?;
            tx.status = PaymentStatus::Failed;
            Ok(tx.clone())
        }

        async fn list_transactions(
            &self,
            user_id: &Uuid,
        ) -> Result<Vec<PaymentTransactionEntity>, error::SystemError> {
            Ok(self
                .transactions
                .lock()
                .unwrap()
                .iter()
                .filter(|t| t.user_id == *user_id)
                .cloned()
                .collect())
        }

        async fn expire_stale(&self, user_id: &Uuid) -> Result<u64, error::SystemError> {
            let now = chrono::Utc::now();
            let mut count = 0;
            for sub in self.subscriptions.lock().unwrap().iter_mut() {
                if sub.user_id == *user_id
                    && sub.status == SubscriptionStatus::Active
                    && sub.expires_at.is_some_and(|e| e <= now)
                {
                    sub.status = SubscriptionStatus::Expired;
                    count += 1;
                }
            }
            Ok(count)
        }
    }

    fn service() -> BillingService {
        BillingService::with_dependencies(Arc::new(FakeBillingRepo::default()), "testpay".into())
    }

    #[test]
    fn plan_prices_are_stable() {
        let monthly = plan_price(&SubscriptionPlan::Monthly);
        assert_eq!(monthly.amount_cents, 499);
        assert_eq!(monthly.duration_days, 30);

        let yearly = plan_price(&SubscriptionPlan::Yearly);
        assert_eq!(yearly.amount_cents, 4999);
        assert_eq!(yearly.duration_days, 365);
    }

    #[test]
    fn amounts_map_back_to_durations() {
        assert_eq!(duration_for_amount(499), Some(30));
        assert_eq!(duration_for_amount(4999), Some(365));
        assert_eq!(duration_for_amount(1234), None);
    }

    #[tokio::test]
    async fn order_then_complete_activates_subscription() {
        let svc = service();
        let user = Uuid::now_v7();

        let order = svc.create_order(user, SubscriptionPlan::Monthly).await.unwrap();
        assert_eq!(order.status, PaymentStatus::Pending);

        let status = svc.get_status(user).await.unwrap();
        assert!(!status.is_premium);

        svc.complete_order(&order.provider_order_id).await.unwrap();

        let status = svc.get_status(user).await.unwrap();
        assert!(status.is_premium);
        let sub = status.subscription.unwrap();
        assert_eq!(sub.status, SubscriptionStatus::Active);
        assert!(sub.expires_at.unwrap() > chrono::Utc::now());
    }

    #[tokio::test]
    async fn completing_twice_is_idempotent() {
        let svc = service();
        let user = Uuid::now_v7();

        let order = svc.create_order(user, SubscriptionPlan::Monthly).await.unwrap();
        svc.complete_order(&order.provider_order_id).await.unwrap();

        let before = svc.get_status(user).await.unwrap().subscription.unwrap().expires_at;
        svc.complete_order(&order.provider_order_id).await.unwrap();
        let after = svc.get_status(user).await.unwrap().subscription.unwrap().expires_at;

        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn second_completed_order_extends_expiry() {
        let svc = service();
        let user = Uuid::now_v7();

        let first = svc.create_order(user, SubscriptionPlan::Monthly).await.unwrap();
        svc.complete_order(&first.provider_order_id).await.unwrap();
        let expiry_one = svc.get_status(user).await.unwrap().subscription.unwrap().expires_at;

        let second = svc.create_order(user, SubscriptionPlan::Monthly).await.unwrap();
        svc.complete_order(&second.provider_order_id).await.unwrap();
        let expiry_two = svc.get_status(user).await.unwrap().subscription.unwrap().expires_at;

        assert!(expiry_two.unwrap() > expiry_one.unwrap());
    }

    #[tokio::test]
    async fn unknown_order_is_not_found() {
        let svc = service();
        let err = svc.complete_order("testpay-missing").await.unwrap_err();
        assert!(matches!(err, error::SystemError::NotFound(_)));
    }

    #[tokio::test]
    async fn failed_order_never_activates() {
        let svc = service();
        let user = Uuid::now_v7();

        let order = svc.create_order(user, SubscriptionPlan::Yearly).await.unwrap();
        svc.fail_order(&order.provider_order_id).await.unwrap();

        let status = svc.get_status(user).await.unwrap();
        assert!(!status.is_premium);
    }
}
