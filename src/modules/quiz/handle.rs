use actix_web::{delete, get, patch, post, web, HttpRequest};
use uuid::Uuid;

use crate::{
    api::{error, success},
    middlewares::get_claims,
    modules::quiz::{
        model::{
            AnswerBody, AttemptResult, CreateQuizBody, QuizForOwner, QuizForTaker, UpdateQuizBody,
        },
        schema::{QuizAttemptDetailEntity, QuizAttemptEntity, QuizEntity},
        service::QuizService,
    },
    utils::ValidatedJson,
};

#[post("/")]
pub async fn create_quiz(
    quiz_service: web::Data<QuizService>,
    body: ValidatedJson<CreateQuizBody>,
    req: HttpRequest,
) -> Result<success::Success<QuizEntity>, error::Error> {
    let owner_id = get_claims(&req)?.sub;
    let quiz = quiz_service.create_quiz(owner_id, body.0).await?;
    Ok(success::Success::created(Some(quiz)).message("Quiz created successfully"))
}

#[get("/")]
pub async fn list_published(
    quiz_service: web::Data<QuizService>,
) -> Result<success::Success<Vec<QuizEntity>>, error::Error> {
    let quizzes = quiz_service.list_published().await?;
    Ok(success::Success::ok(Some(quizzes)))
}

#[get("/mine")]
pub async fn list_mine(
    quiz_service: web::Data<QuizService>,
    req: HttpRequest,
) -> Result<success::Success<Vec<QuizEntity>>, error::Error> {
    let owner_id = get_claims(&req)?.sub;
    let quizzes = quiz_service.list_mine(owner_id).await?;
    Ok(success::Success::ok(Some(quizzes)))
}

#[get("/attempts/mine")]
pub async fn list_my_attempts(
    quiz_service: web::Data<QuizService>,
    req: HttpRequest,
) -> Result<success::Success<Vec<QuizAttemptEntity>>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let attempts = quiz_service.list_my_attempts(user_id).await?;
    Ok(success::Success::ok(Some(attempts)))
}

#[get("/{quiz_id}")]
pub async fn get_quiz(
    quiz_service: web::Data<QuizService>,
    quiz_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<QuizForTaker>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let quiz = quiz_service.get_quiz_for_taker(user_id, *quiz_id).await?;
    Ok(success::Success::ok(Some(quiz)))
}

#[get("/{quiz_id}/full")]
pub async fn get_quiz_full(
    quiz_service: web::Data<QuizService>,
    quiz_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<QuizForOwner>, error::Error> {
    let owner_id = get_claims(&req)?.sub;
    let quiz = quiz_service.get_quiz_for_owner(owner_id, *quiz_id).await?;
    Ok(success::Success::ok(Some(quiz)))
}

#[patch("/{quiz_id}")]
pub async fn update_quiz(
    quiz_service: web::Data<QuizService>,
    quiz_id: web::Path<Uuid>,
    body: ValidatedJson<UpdateQuizBody>,
    req: HttpRequest,
) -> Result<success::Success<QuizEntity>, error::Error> {
    let owner_id = get_claims(&req)?.sub;
    let quiz = quiz_service.update_quiz(owner_id, *quiz_id, body.0).await?;
    Ok(success::Success::ok(Some(quiz)).message("Quiz updated successfully"))
}

#[post("/{quiz_id}/publish")]
pub async fn publish_quiz(
    quiz_service: web::Data<QuizService>,
    quiz_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<()>, error::Error> {
    let owner_id = get_claims(&req)?.sub;
    quiz_service.publish_quiz(owner_id, *quiz_id).await?;
    Ok(success::Success::ok(None).message("Quiz published"))
}

#[delete("/{quiz_id}")]
pub async fn delete_quiz(
    quiz_service: web::Data<QuizService>,
    quiz_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<()>, error::Error> {
    let owner_id = get_claims(&req)?.sub;
    quiz_service.delete_quiz(owner_id, *quiz_id).await?;
    Ok(success::Success::no_content())
}

#[post("/{quiz_id}/attempts")]
pub async fn start_attempt(
    quiz_service: web::Data<QuizService>,
    quiz_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<QuizAttemptEntity>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let attempt = quiz_service.start_attempt(user_id, *quiz_id).await?;
    Ok(success::Success::created(Some(attempt)).message("Attempt started"))
}

#[get("/{quiz_id}/attempts")]
pub async fn list_attempts(
    quiz_service: web::Data<QuizService>,
    quiz_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<Vec<QuizAttemptEntity>>, error::Error> {
    let owner_id = get_claims(&req)?.sub;
    let attempts = quiz_service.list_attempts_for_quiz(owner_id, *quiz_id).await?;
    Ok(success::Success::ok(Some(attempts)))
}

#[post("/attempts/{attempt_id}/answers")]
pub async fn answer(
    quiz_service: web::Data<QuizService>,
    attempt_id: web::Path<Uuid>,
    body: ValidatedJson<AnswerBody>,
    req: HttpRequest,
) -> Result<success::Success<QuizAttemptDetailEntity>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let detail = quiz_service.answer(user_id, *attempt_id, body.0).await?;
    Ok(success::Success::created(Some(detail)))
}

#[post("/attempts/{attempt_id}/finish")]
pub async fn finish_attempt(
    quiz_service: web::Data<QuizService>,
    attempt_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<QuizAttemptEntity>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let attempt = quiz_service.finish_attempt(user_id, *attempt_id).await?;
    Ok(success::Success::ok(Some(attempt)).message("Attempt finished"))
}

#[get("/attempts/{attempt_id}/result")]
pub async fn attempt_result(
    quiz_service: web::Data<QuizService>,
    attempt_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<AttemptResult>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let result = quiz_service.get_result(user_id, *attempt_id).await?;
    Ok(success::Success::ok(Some(result)))
}
