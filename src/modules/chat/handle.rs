use actix_web::{delete, get, patch, post, web, HttpRequest};
use uuid::Uuid;

use crate::{
    api::{error, success},
    middlewares::get_claims,
    modules::chat::{
        model::{
            AddMemberBody, AttachMediaBody, CreateGroupBody, CreateStickerBody, EditMessageBody,
            GroupMemberRow, GroupSummary, MessageQuery, MessagesResponse, ReactBody, ReactionRow,
            RenameGroupBody, SendDirectMessageBody, SendGroupMessageBody,
        },
        schema::{
            ChatGroupEntity, GroupMemberEntity, MediaEntity, MessageEntity,
            MessageReactionEntity, StickerEntity,
        },
        service::ChatService,
    },
    utils::ValidatedJson,
};

#[post("/groups")]
pub async fn create_group(
    chat_service: web::Data<ChatService>,
    body: ValidatedJson<CreateGroupBody>,
    req: HttpRequest,
) -> Result<success::Success<ChatGroupEntity>, error::Error> {
    let owner_id = get_claims(&req)?.sub;
    let group = chat_service.create_group(owner_id, body.0).await?;
    Ok(success::Success::created(Some(group)).message("Group created successfully"))
}

#[get("/groups")]
pub async fn list_groups(
    chat_service: web::Data<ChatService>,
    req: HttpRequest,
) -> Result<success::Success<Vec<GroupSummary>>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let groups = chat_service.get_groups(user_id).await?;
    Ok(success::Success::ok(Some(groups)))
}

#[patch("/groups/{group_id}")]
pub async fn rename_group(
    chat_service: web::Data<ChatService>,
    group_id: web::Path<Uuid>,
    body: ValidatedJson<RenameGroupBody>,
    req: HttpRequest,
) -> Result<success::Success<()>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    chat_service.rename_group(user_id, *group_id, &body.0.name).await?;
    Ok(success::Success::ok(None).message("Group renamed successfully"))
}

#[delete("/groups/{group_id}")]
pub async fn delete_group(
    chat_service: web::Data<ChatService>,
    group_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<()>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    chat_service.delete_group(user_id, *group_id).await?;
    Ok(success::Success::no_content())
}

#[get("/groups/{group_id}/members")]
pub async fn list_members(
    chat_service: web::Data<ChatService>,
    group_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<Vec<GroupMemberRow>>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let members = chat_service.get_members(user_id, *group_id).await?;
    Ok(success::Success::ok(Some(members)))
}

#[post("/groups/{group_id}/members")]
pub async fn add_member(
    chat_service: web::Data<ChatService>,
    group_id: web::Path<Uuid>,
    body: ValidatedJson<AddMemberBody>,
    req: HttpRequest,
) -> Result<success::Success<GroupMemberEntity>, error::Error> {
    let actor_id = get_claims(&req)?.sub;
    let member = chat_service.add_member(actor_id, *group_id, body.0.user_id).await?;
    Ok(success::Success::created(Some(member)).message("Member added successfully"))
}

#[delete("/groups/{group_id}/members/{user_id}")]
pub async fn remove_member(
    chat_service: web::Data<ChatService>,
    path: web::Path<(Uuid, Uuid)>,
    req: HttpRequest,
) -> Result<success::Success<()>, error::Error> {
    let actor_id = get_claims(&req)?.sub;
    let (group_id, target_id) = path.into_inner();
    chat_service.remove_member(actor_id, group_id, target_id).await?;
    Ok(success::Success::no_content())
}

#[post("/groups/{group_id}/messages")]
pub async fn send_group_message(
    chat_service: web::Data<ChatService>,
    group_id: web::Path<Uuid>,
    body: ValidatedJson<SendGroupMessageBody>,
    req: HttpRequest,
) -> Result<success::Success<MessageEntity>, error::Error> {
    let sender_id = get_claims(&req)?.sub;
    let message = chat_service.send_group_message(sender_id, *group_id, body.0).await?;
    Ok(success::Success::created(Some(message)))
}

#[get("/groups/{group_id}/messages")]
pub async fn list_group_messages(
    chat_service: web::Data<ChatService>,
    group_id: web::Path<Uuid>,
    query: web::Query<MessageQuery>,
    req: HttpRequest,
) -> Result<success::Success<MessagesResponse>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let messages =
        chat_service.get_group_messages(user_id, *group_id, query.into_inner()).await?;
    Ok(success::Success::ok(Some(messages)))
}

#[post("/messages/direct")]
pub async fn send_direct_message(
    chat_service: web::Data<ChatService>,
    body: ValidatedJson<SendDirectMessageBody>,
    req: HttpRequest,
) -> Result<success::Success<MessageEntity>, error::Error> {
    let sender_id = get_claims(&req)?.sub;
    let message = chat_service.send_direct_message(sender_id, body.0).await?;
    Ok(success::Success::created(Some(message)))
}

#[get("/messages/direct/{user_id}")]
pub async fn list_direct_messages(
    chat_service: web::Data<ChatService>,
    other_id: web::Path<Uuid>,
    query: web::Query<MessageQuery>,
    req: HttpRequest,
) -> Result<success::Success<MessagesResponse>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let messages =
        chat_service.get_direct_messages(user_id, *other_id, query.into_inner()).await?;
    Ok(success::Success::ok(Some(messages)))
}

#[patch("/messages/{message_id}")]
pub async fn edit_message(
    chat_service: web::Data<ChatService>,
    message_id: web::Path<Uuid>,
    body: ValidatedJson<EditMessageBody>,
    req: HttpRequest,
) -> Result<success::Success<MessageEntity>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let message = chat_service.edit_message(user_id, *message_id, &body.0.content).await?;
    Ok(success::Success::ok(Some(message)).message("Message edited successfully"))
}

#[delete("/messages/{message_id}")]
pub async fn delete_message(
    chat_service: web::Data<ChatService>,
    message_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<()>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    chat_service.delete_message(user_id, *message_id).await?;
    Ok(success::Success::no_content())
}

#[post("/messages/{message_id}/media")]
pub async fn attach_media(
    chat_service: web::Data<ChatService>,
    message_id: web::Path<Uuid>,
    body: ValidatedJson<AttachMediaBody>,
    req: HttpRequest,
) -> Result<success::Success<MediaEntity>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let media = chat_service.attach_media(user_id, *message_id, body.0).await?;
    Ok(success::Success::created(Some(media)))
}

#[get("/messages/{message_id}/media")]
pub async fn list_media(
    chat_service: web::Data<ChatService>,
    message_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<Vec<MediaEntity>>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let media = chat_service.get_media(user_id, *message_id).await?;
    Ok(success::Success::ok(Some(media)))
}

#[post("/messages/{message_id}/reactions")]
pub async fn react(
    chat_service: web::Data<ChatService>,
    message_id: web::Path<Uuid>,
    body: ValidatedJson<ReactBody>,
    req: HttpRequest,
) -> Result<success::Success<MessageReactionEntity>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let reaction = chat_service.react(user_id, *message_id, &body.0.emoji).await?;
    Ok(success::Success::created(Some(reaction)))
}

#[delete("/messages/{message_id}/reactions")]
pub async fn unreact(
    chat_service: web::Data<ChatService>,
    message_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<()>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    chat_service.unreact(user_id, *message_id).await?;
    Ok(success::Success::no_content())
}

#[get("/messages/{message_id}/reactions")]
pub async fn list_reactions(
    chat_service: web::Data<ChatService>,
    message_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<Vec<ReactionRow>>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let reactions = chat_service.get_reactions(user_id, *message_id).await?;
    Ok(success::Success::ok(Some(reactions)))
}

#[get("/stickers")]
pub async fn list_stickers(
    chat_service: web::Data<ChatService>,
) -> Result<success::Success<Vec<StickerEntity>>, error::Error> {
    let stickers = chat_service.get_stickers().await?;
    Ok(success::Success::ok(Some(stickers)))
}

#[post("/stickers")]
pub async fn create_sticker(
    chat_service: web::Data<ChatService>,
    body: ValidatedJson<CreateStickerBody>,
) -> Result<success::Success<StickerEntity>, error::Error> {
    let sticker = chat_service.create_sticker(&body.0.code, &body.0.url).await?;
    Ok(success::Success::created(Some(sticker)))
}
