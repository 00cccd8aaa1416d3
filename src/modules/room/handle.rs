use actix_web::{delete, get, post, web, HttpRequest};
use uuid::Uuid;

use crate::{
    api::{error, success},
    middlewares::get_claims,
    modules::room::{
        model::{
            AssignBreakoutBody, BreakoutWithParticipants, CreateRoomBody, EventQuery,
            JoinRoomBody, OpenBreakoutsBody, ParticipantRow, RoomMessageBody, RoomMessageQuery,
            RoomMessagesResponse,
        },
        schema::{RoomEventEntity, RoomMessageEntity, RoomParticipantEntity, VideoRoomEntity},
        service::RoomService,
    },
    utils::ValidatedJson,
};

#[post("/")]
pub async fn create_room(
    room_service: web::Data<RoomService>,
    body: ValidatedJson<CreateRoomBody>,
    req: HttpRequest,
) -> Result<success::Success<VideoRoomEntity>, error::Error> {
    let host_id = get_claims(&req)?.sub;
    let room = room_service.create_room(host_id, &body.0.name).await?;
    Ok(success::Success::created(Some(room)).message("Room created successfully"))
}

#[post("/join")]
pub async fn join_room(
    room_service: web::Data<RoomService>,
    body: ValidatedJson<JoinRoomBody>,
    req: HttpRequest,
) -> Result<success::Success<RoomParticipantEntity>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let participant = room_service.join_room(user_id, &body.0.password).await?;
    Ok(success::Success::ok(Some(participant)).message("Joined room successfully"))
}

#[get("/lookup/{password}")]
pub async fn lookup_room(
    room_service: web::Data<RoomService>,
    password: web::Path<String>,
) -> Result<success::Success<VideoRoomEntity>, error::Error> {
    let room = room_service.get_room_by_password(&password).await?;
    Ok(success::Success::ok(Some(room)))
}

#[get("/{room_id}")]
pub async fn get_room(
    room_service: web::Data<RoomService>,
    room_id: web::Path<Uuid>,
) -> Result<success::Success<VideoRoomEntity>, error::Error> {
    let room = room_service.get_room(*room_id).await?;
    Ok(success::Success::ok(Some(room)))
}

#[post("/{room_id}/leave")]
pub async fn leave_room(
    room_service: web::Data<RoomService>,
    room_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<()>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    room_service.leave_room(user_id, *room_id).await?;
    Ok(success::Success::no_content())
}

#[post("/{room_id}/end")]
pub async fn end_room(
    room_service: web::Data<RoomService>,
    room_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<()>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    room_service.end_room(user_id, *room_id).await?;
    Ok(success::Success::no_content())
}

#[get("/{room_id}/participants")]
pub async fn list_participants(
    room_service: web::Data<RoomService>,
    room_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<Vec<ParticipantRow>>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let participants = room_service.get_participants(user_id, *room_id).await?;
    Ok(success::Success::ok(Some(participants)))
}

#[post("/{room_id}/messages")]
pub async fn post_message(
    room_service: web::Data<RoomService>,
    room_id: web::Path<Uuid>,
    body: ValidatedJson<RoomMessageBody>,
    req: HttpRequest,
) -> Result<success::Success<RoomMessageEntity>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let message = room_service.post_message(user_id, *room_id, &body.0.content).await?;
    Ok(success::Success::created(Some(message)))
}

#[get("/{room_id}/messages")]
pub async fn list_messages(
    room_service: web::Data<RoomService>,
    room_id: web::Path<Uuid>,
    query: web::Query<RoomMessageQuery>,
    req: HttpRequest,
) -> Result<success::Success<RoomMessagesResponse>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let messages = room_service.get_messages(user_id, *room_id, query.into_inner()).await?;
    Ok(success::Success::ok(Some(messages)))
}

#[get("/{room_id}/events")]
pub async fn list_events(
    room_service: web::Data<RoomService>,
    room_id: web::Path<Uuid>,
    query: web::Query<EventQuery>,
    req: HttpRequest,
) -> Result<success::Success<Vec<RoomEventEntity>>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let events = room_service.get_events(user_id, *room_id, query.into_inner()).await?;
    Ok(success::Success::ok(Some(events)))
}

#[post("/{room_id}/breakouts")]
pub async fn open_breakouts(
    room_service: web::Data<RoomService>,
    room_id: web::Path<Uuid>,
    body: ValidatedJson<OpenBreakoutsBody>,
    req: HttpRequest,
) -> Result<success::Success<Vec<BreakoutWithParticipants>>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let breakouts = room_service.open_breakouts(user_id, *room_id, &body.0.names).await?;
    Ok(success::Success::created(Some(breakouts)).message("Breakout rooms opened"))
}

#[get("/{room_id}/breakouts")]
pub async fn list_breakouts(
    room_service: web::Data<RoomService>,
    room_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<Vec<BreakoutWithParticipants>>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let breakouts = room_service.get_breakouts(user_id, *room_id).await?;
    Ok(success::Success::ok(Some(breakouts)))
}

#[post("/breakouts/{breakout_id}/participants")]
pub async fn assign_breakout(
    room_service: web::Data<RoomService>,
    breakout_id: web::Path<Uuid>,
    body: ValidatedJson<AssignBreakoutBody>,
    req: HttpRequest,
) -> Result<success::Success<()>, error::Error> {
    let actor_id = get_claims(&req)?.sub;
    room_service.assign_to_breakout(actor_id, *breakout_id, body.0.user_id).await?;
    Ok(success::Success::created(None).message("Participant assigned"))
}

#[delete("/breakouts/{breakout_id}/participants/{user_id}")]
pub async fn unassign_breakout(
    room_service: web::Data<RoomService>,
    path: web::Path<(Uuid, Uuid)>,
    req: HttpRequest,
) -> Result<success::Success<()>, error::Error> {
    let actor_id = get_claims(&req)?.sub;
    let (breakout_id, user_id) = path.into_inner();
    room_service.unassign_from_breakout(actor_id, breakout_id, user_id).await?;
    Ok(success::Success::no_content())
}
