use actix_web::{delete, get, post, web, HttpRequest};
use uuid::Uuid;

use crate::{
    api::{error, success},
    middlewares::get_claims,
    modules::whiteboard::{
        model::{
            CreateTemplateBody, DrawActionBody, InstantiateTemplateBody, OpenSessionBody,
            ReplayQuery, SessionWithActions,
        },
        schema::{DrawActionEntity, WhiteboardSessionEntity, WhiteboardTemplateEntity},
        service::WhiteboardService,
    },
    utils::ValidatedJson,
};

#[post("/sessions")]
pub async fn open_session(
    wb_service: web::Data<WhiteboardService>,
    body: ValidatedJson<OpenSessionBody>,
    req: HttpRequest,
) -> Result<success::Success<WhiteboardSessionEntity>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let session = wb_service.open_session(user_id, body.0).await?;
    Ok(success::Success::created(Some(session)).message("Whiteboard session opened"))
}

#[get("/sessions/mine")]
pub async fn list_my_sessions(
    wb_service: web::Data<WhiteboardService>,
    req: HttpRequest,
) -> Result<success::Success<Vec<WhiteboardSessionEntity>>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let sessions = wb_service.list_my_sessions(user_id).await?;
    Ok(success::Success::ok(Some(sessions)))
}

#[get("/rooms/{room_id}/sessions")]
pub async fn list_room_sessions(
    wb_service: web::Data<WhiteboardService>,
    room_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<Vec<WhiteboardSessionEntity>>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let sessions = wb_service.list_room_sessions(user_id, *room_id).await?;
    Ok(success::Success::ok(Some(sessions)))
}

#[post("/sessions/{session_id}/actions")]
pub async fn append_action(
    wb_service: web::Data<WhiteboardService>,
    session_id: web::Path<Uuid>,
    body: ValidatedJson<DrawActionBody>,
    req: HttpRequest,
) -> Result<success::Success<DrawActionEntity>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let action = wb_service.append_action(user_id, *session_id, body.0).await?;
    Ok(success::Success::created(Some(action)))
}

#[get("/sessions/{session_id}/actions")]
pub async fn replay(
    wb_service: web::Data<WhiteboardService>,
    session_id: web::Path<Uuid>,
    query: web::Query<ReplayQuery>,
    req: HttpRequest,
) -> Result<success::Success<Vec<DrawActionEntity>>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let actions = wb_service.replay(user_id, *session_id, query.into_inner()).await?;
    Ok(success::Success::ok(Some(actions)))
}

#[post("/sessions/{session_id}/clear")]
pub async fn clear_board(
    wb_service: web::Data<WhiteboardService>,
    session_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<DrawActionEntity>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let action = wb_service.clear_board(user_id, *session_id).await?;
    Ok(success::Success::created(Some(action)).message("Board cleared"))
}

#[post("/sessions/{session_id}/close")]
pub async fn close_session(
    wb_service: web::Data<WhiteboardService>,
    session_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<()>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    wb_service.close_session(user_id, *session_id).await?;
    Ok(success::Success::ok(None).message("Session closed"))
}

#[post("/templates")]
pub async fn create_template(
    wb_service: web::Data<WhiteboardService>,
    body: ValidatedJson<CreateTemplateBody>,
    req: HttpRequest,
) -> Result<success::Success<WhiteboardTemplateEntity>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let template = wb_service.create_template(user_id, &body.0.name, body.0.content).await?;
    Ok(success::Success::created(Some(template)))
}

#[get("/templates")]
pub async fn list_templates(
    wb_service: web::Data<WhiteboardService>,
) -> Result<success::Success<Vec<WhiteboardTemplateEntity>>, error::Error> {
    let templates = wb_service.list_templates().await?;
    Ok(success::Success::ok(Some(templates)))
}

#[get("/templates/{template_id}")]
pub async fn get_template(
    wb_service: web::Data<WhiteboardService>,
    template_id: web::Path<Uuid>,
) -> Result<success::Success<WhiteboardTemplateEntity>, error::Error> {
    let template = wb_service.get_template(*template_id).await?;
    Ok(success::Success::ok(Some(template)))
}

#[delete("/templates/{template_id}")]
pub async fn delete_template(
    wb_service: web::Data<WhiteboardService>,
    template_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<()>, error::Error> {
    let claims = get_claims(&req)?;
    wb_service.delete_template(claims.sub, claims.role, *template_id).await?;
    Ok(success::Success::no_content())
}

#[post("/templates/{template_id}/instantiate")]
pub async fn instantiate_template(
    wb_service: web::Data<WhiteboardService>,
    template_id: web::Path<Uuid>,
    body: ValidatedJson<InstantiateTemplateBody>,
    req: HttpRequest,
) -> Result<success::Success<SessionWithActions>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let session = wb_service
        .instantiate_template(user_id, *template_id, body.0.room_id, &body.0.title)
        .await?;
    Ok(success::Success::created(Some(session)).message("Session created from template"))
}
