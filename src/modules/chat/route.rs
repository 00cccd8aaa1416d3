use crate::modules::chat::handle::*;
use actix_web::web::{scope, ServiceConfig};

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/chat")
            .service(create_group)
            .service(list_groups)
            .service(rename_group)
            .service(delete_group)
            .service(list_members)
            .service(add_member)
            .service(remove_member)
            .service(send_group_message)
            .service(list_group_messages)
            .service(send_direct_message)
            .service(list_direct_messages)
            .service(edit_message)
            .service(delete_message)
            .service(attach_media)
            .service(list_media)
            .service(react)
            .service(unreact)
            .service(list_reactions)
            .service(list_stickers),
    );
}

/// Sticker authoring sits behind the admin scope.
pub fn admin_configure(cfg: &mut ServiceConfig) {
    cfg.service(scope("/stickers").service(create_sticker));
}
