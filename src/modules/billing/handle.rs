use actix_web::{get, post, web, HttpRequest};

use crate::{
    api::{error, success},
    middlewares::get_claims,
    modules::billing::{
        model::{CreateOrderBody, SubscriptionStatusResponse},
        schema::PaymentTransactionEntity,
        service::BillingService,
    },
    utils::ValidatedJson,
};

#[post("/orders")]
pub async fn create_order(
    billing_service: web::Data<BillingService>,
    body: ValidatedJson<CreateOrderBody>,
    req: HttpRequest,
) -> Result<success::Success<PaymentTransactionEntity>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let order = billing_service.create_order(user_id, body.0.plan).await?;
    Ok(success::Success::accepted(Some(order)).message("Payment order created"))
}

#[get("/subscription")]
pub async fn subscription_status(
    billing_service: web::Data<BillingService>,
    req: HttpRequest,
) -> Result<success::Success<SubscriptionStatusResponse>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let status = billing_service.get_status(user_id).await?;
    Ok(success::Success::ok(Some(status)))
}

#[get("/transactions")]
pub async fn list_transactions(
    billing_service: web::Data<BillingService>,
    req: HttpRequest,
) -> Result<success::Success<Vec<PaymentTransactionEntity>>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let transactions = billing_service.list_transactions(user_id).await?;
    Ok(success::Success::ok(Some(transactions)))
}

#[post("/orders/{provider_order_id}/complete")]
pub async fn complete_order(
    billing_service: web::Data<BillingService>,
    provider_order_id: web::Path<String>,
) -> Result<success::Success<PaymentTransactionEntity>, error::Error> {
    let transaction = billing_service.complete_order(&provider_order_id).await?;
    Ok(success::Success::ok(Some(transaction)).message("Payment completed"))
}

#[post("/orders/{provider_order_id}/fail")]
pub async fn fail_order(
    billing_service: web::Data<BillingService>,
    provider_order_id: web::Path<String>,
) -> Result<success::Success<PaymentTransactionEntity>, error::Error> {
    let transaction = billing_service.fail_order(&provider_order_id).await?;
    Ok(success::Success::ok(Some(transaction)).message("Payment marked failed"))
}
