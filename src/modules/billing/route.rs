use crate::modules::billing::handle::*;
use actix_web::web::{scope, ServiceConfig};

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/billing")
            .service(create_order)
            .service(subscription_status)
            .service(list_transactions),
    );
}

/// Provider settlement callbacks sit behind the admin scope.
pub fn admin_configure(cfg: &mut ServiceConfig) {
    cfg.service(scope("/billing").service(complete_order).service(fail_order));
}
