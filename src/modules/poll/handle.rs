use actix_web::{get, post, web, HttpRequest};
use uuid::Uuid;

use crate::{
    api::{error, success},
    middlewares::get_claims,
    modules::poll::{
        model::{CreatePollBody, PollResults, PollWithOptions, VoteBody},
        schema::{PollVoteEntity, RoomPollEntity},
        service::PollService,
    },
    utils::ValidatedJson,
};

#[post("/rooms/{room_id}/polls")]
pub async fn create_poll(
    poll_service: web::Data<PollService>,
    room_id: web::Path<Uuid>,
    body: ValidatedJson<CreatePollBody>,
    req: HttpRequest,
) -> Result<success::Success<PollWithOptions>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let poll = poll_service.create_poll(user_id, *room_id, body.0).await?;
    Ok(success::Success::created(Some(poll)).message("Poll opened"))
}

#[get("/rooms/{room_id}/polls")]
pub async fn list_polls(
    poll_service: web::Data<PollService>,
    room_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<Vec<PollWithOptions>>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let polls = poll_service.list_polls(user_id, *room_id).await?;
    Ok(success::Success::ok(Some(polls)))
}

#[post("/{poll_id}/close")]
pub async fn close_poll(
    poll_service: web::Data<PollService>,
    poll_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<RoomPollEntity>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let poll = poll_service.close_poll(user_id, *poll_id).await?;
    Ok(success::Success::ok(Some(poll)).message("Poll closed"))
}

#[post("/{poll_id}/votes")]
pub async fn vote(
    poll_service: web::Data<PollService>,
    poll_id: web::Path<Uuid>,
    body: ValidatedJson<VoteBody>,
    req: HttpRequest,
) -> Result<success::Success<PollVoteEntity>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let vote = poll_service.vote(user_id, *poll_id, body.0.option_id).await?;
    Ok(success::Success::created(Some(vote)).message("Vote recorded"))
}

#[get("/{poll_id}/results")]
pub async fn results(
    poll_service: web::Data<PollService>,
    poll_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<PollResults>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let results = poll_service.results(user_id, *poll_id).await?;
    Ok(success::Success::ok(Some(results)))
}
