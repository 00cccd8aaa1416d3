use crate::modules::whiteboard::handle::*;
use actix_web::web::{scope, ServiceConfig};

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/whiteboards")
            .service(open_session)
            .service(list_my_sessions)
            .service(list_room_sessions)
            .service(append_action)
            .service(replay)
            .service(clear_board)
            .service(close_session)
            .service(create_template)
            .service(list_templates)
            .service(get_template)
            .service(delete_template)
            .service(instantiate_template),
    );
}
