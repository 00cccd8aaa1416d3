use actix_web::{get, post, web, HttpRequest};
use uuid::Uuid;

use crate::{
    api::{error, success},
    middlewares::get_claims,
    modules::call::{
        model::{
            AppendSubtitlesBody, AttendanceRow, CreateTranscriptBody, RegisterRecordingBody,
            SessionNode, StartSessionBody, SubtitleWindowQuery, TranscriptTextResponse,
        },
        schema::{
            AttendanceEntity, CallSessionEntity, CallTranscriptEntity, RecordingEntity,
            SubtitleEntity,
        },
        service::CallService,
    },
    utils::ValidatedJson,
};

#[post("/rooms/{room_id}/sessions")]
pub async fn start_session(
    call_service: web::Data<CallService>,
    room_id: web::Path<Uuid>,
    body: ValidatedJson<StartSessionBody>,
    req: HttpRequest,
) -> Result<success::Success<CallSessionEntity>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let session =
        call_service.start_session(user_id, *room_id, body.0.parent_session_id).await?;
    Ok(success::Success::created(Some(session)).message("Session started"))
}

#[get("/rooms/{room_id}/sessions")]
pub async fn session_tree(
    call_service: web::Data<CallService>,
    room_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<Vec<SessionNode>>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let tree = call_service.get_session_tree(user_id, *room_id).await?;
    Ok(success::Success::ok(Some(tree)))
}

#[post("/sessions/{session_id}/end")]
pub async fn end_session(
    call_service: web::Data<CallService>,
    session_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<CallSessionEntity>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let session = call_service.end_session(user_id, *session_id).await?;
    Ok(success::Success::ok(Some(session)).message("Session ended"))
}

#[post("/sessions/{session_id}/attendance/join")]
pub async fn mark_join(
    call_service: web::Data<CallService>,
    session_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<AttendanceEntity>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let attendance = call_service.mark_join(user_id, *session_id).await?;
    Ok(success::Success::ok(Some(attendance)))
}

#[post("/sessions/{session_id}/attendance/leave")]
pub async fn mark_leave(
    call_service: web::Data<CallService>,
    session_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<()>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    call_service.mark_leave(user_id, *session_id).await?;
    Ok(success::Success::no_content())
}

#[get("/sessions/{session_id}/attendance")]
pub async fn list_attendance(
    call_service: web::Data<CallService>,
    session_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<Vec<AttendanceRow>>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let attendance = call_service.get_attendance(user_id, *session_id).await?;
    Ok(success::Success::ok(Some(attendance)))
}

#[post("/rooms/{room_id}/recordings")]
pub async fn register_recording(
    call_service: web::Data<CallService>,
    room_id: web::Path<Uuid>,
    body: ValidatedJson<RegisterRecordingBody>,
    req: HttpRequest,
) -> Result<success::Success<RecordingEntity>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let recording = call_service.register_recording(user_id, *room_id, body.0).await?;
    Ok(success::Success::created(Some(recording)).message("Recording registered"))
}

#[get("/rooms/{room_id}/recordings")]
pub async fn list_recordings(
    call_service: web::Data<CallService>,
    room_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<Vec<RecordingEntity>>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let recordings = call_service.get_recordings(user_id, *room_id).await?;
    Ok(success::Success::ok(Some(recordings)))
}

#[post("/sessions/{session_id}/transcripts")]
pub async fn create_transcript(
    call_service: web::Data<CallService>,
    session_id: web::Path<Uuid>,
    body: ValidatedJson<CreateTranscriptBody>,
    req: HttpRequest,
) -> Result<success::Success<CallTranscriptEntity>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let transcript =
        call_service.create_transcript(user_id, *session_id, &body.0.language).await?;
    Ok(success::Success::created(Some(transcript)))
}

#[get("/sessions/{session_id}/transcripts")]
pub async fn list_transcripts(
    call_service: web::Data<CallService>,
    session_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<Vec<CallTranscriptEntity>>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let transcripts = call_service.get_transcripts(user_id, *session_id).await?;
    Ok(success::Success::ok(Some(transcripts)))
}

#[post("/transcripts/{transcript_id}/subtitles")]
pub async fn append_subtitles(
    call_service: web::Data<CallService>,
    transcript_id: web::Path<Uuid>,
    body: ValidatedJson<AppendSubtitlesBody>,
    req: HttpRequest,
) -> Result<success::Success<Vec<SubtitleEntity>>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let subtitles =
        call_service.append_subtitles(user_id, *transcript_id, body.0.subtitles).await?;
    Ok(success::Success::created(Some(subtitles)))
}

#[get("/transcripts/{transcript_id}/subtitles")]
pub async fn subtitles_window(
    call_service: web::Data<CallService>,
    transcript_id: web::Path<Uuid>,
    query: web::Query<SubtitleWindowQuery>,
    req: HttpRequest,
) -> Result<success::Success<Vec<SubtitleEntity>>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let subtitles = call_service
        .get_subtitles_window(user_id, *transcript_id, query.from, query.to)
        .await?;
    Ok(success::Success::ok(Some(subtitles)))
}

#[get("/transcripts/{transcript_id}/text")]
pub async fn transcript_text(
    call_service: web::Data<CallService>,
    transcript_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<TranscriptTextResponse>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let text = call_service.get_transcript_text(user_id, *transcript_id).await?;
    Ok(success::Success::ok(Some(text)))
}
