use crate::modules::poll::handle::*;
use actix_web::web::{scope, ServiceConfig};

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/polls")
            .service(create_poll)
            .service(list_polls)
            .service(close_poll)
            .service(vote)
            .service(results),
    );
}
