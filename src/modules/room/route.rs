use crate::modules::room::handle::*;
use actix_web::web::{scope, ServiceConfig};

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/rooms")
            .service(create_room)
            .service(join_room)
            .service(lookup_room)
            .service(assign_breakout)
            .service(unassign_breakout)
            .service(get_room)
            .service(leave_room)
            .service(end_room)
            .service(list_participants)
            .service(post_message)
            .service(list_messages)
            .service(list_events)
            .service(open_breakouts)
            .service(list_breakouts),
    );
}
