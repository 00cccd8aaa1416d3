use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::modules::billing::schema::{SubscriptionEntity, SubscriptionPlan};

#[derive(Deserialize, Validate)]
pub struct CreateOrderBody {
    pub plan: SubscriptionPlan,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanPrice {
    pub amount_cents: i64,
    pub currency: &'static str,
    pub duration_days: i64,
}

/// Static price table; the provider charges in these units.
pub fn plan_price(plan: &SubscriptionPlan) -> PlanPrice {
    match plan {
        SubscriptionPlan::Monthly => {
            PlanPrice { amount_cents: 4_99, currency: "USD", duration_days: 30 }
        }
        SubscriptionPlan::Yearly => {
            PlanPrice { amount_cents: 49_99, currency: "USD", duration_days: 365 }
        }
    }
}

/// Reverse price-table lookup. Completion credits the duration matching
/// the amount actually charged, so a settled order stays self-describing
/// even if the subscription later switches plans.
pub fn duration_for_amount(amount_cents: i64) -> Option<i64> {
    [SubscriptionPlan::Monthly, SubscriptionPlan::Yearly]
        .iter()
        .map(plan_price)
        .find(|p| p.amount_cents == amount_cents)
        .map(|p| p.duration_days)
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionStatusResponse {
    pub subscription: Option<SubscriptionEntity>,
    pub is_premium: bool,
}
