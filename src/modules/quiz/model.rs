use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::modules::quiz::schema::{
    QuizAttemptDetailEntity, QuizAttemptEntity, QuizEntity, QuizQuestionEntity,
};

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct QuestionInput {
    #[validate(length(min = 1, max = 2000, message = "Prompt must be 1-2000 characters"))]
    pub prompt: String,
    #[validate(length(min = 1, message = "Option A cannot be empty"))]
    pub option_a: String,
    #[validate(length(min = 1, message = "Option B cannot be empty"))]
    pub option_b: String,
    pub option_c: Option<String>,
    pub option_d: Option<String>,
    #[validate(length(equal = 1, message = "Correct option must be a single letter"))]
    pub correct_option: String,
    #[validate(range(min = 1, max = 100, message = "Points must be 1-100"))]
    pub points: i32,
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuizBody {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,
    pub description: Option<String>,
    #[validate(range(min = 10, max = 14400, message = "Time limit must be 10-14400 seconds"))]
    pub time_limit_seconds: Option<i32>,
    #[validate(length(min = 1, max = 100, message = "A quiz needs 1-100 questions"), nested)]
    pub questions: Vec<QuestionInput>,
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuizBody {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 10, max = 14400, message = "Time limit must be 10-14400 seconds"))]
    pub time_limit_seconds: Option<i32>,
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AnswerBody {
    pub question_id: Uuid,
    #[validate(length(equal = 1, message = "Chosen option must be a single letter"))]
    pub chosen_option: Option<String>,
    #[validate(range(min = 0, message = "Time taken cannot be negative"))]
    pub time_taken_ms: i64,
}

/// Question as shown to a quiz taker: no correct answer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionView {
    pub id: Uuid,
    pub position: i32,
    pub prompt: String,
    pub option_a: String,
    pub option_b: String,
    pub option_c: Option<String>,
    pub option_d: Option<String>,
    pub points: i32,
}

impl From<QuizQuestionEntity> for QuestionView {
    fn from(q: QuizQuestionEntity) -> Self {
        QuestionView {
            id: q.id,
            position: q.position,
            prompt: q.prompt,
            option_a: q.option_a,
            option_b: q.option_b,
            option_c: q.option_c,
            option_d: q.option_d,
            points: q.points,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct QuizForTaker {
    #[serde(flatten)]
    pub quiz: QuizEntity,
    pub questions: Vec<QuestionView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuizForOwner {
    #[serde(flatten)]
    pub quiz: QuizEntity,
    pub questions: Vec<QuizQuestionEntity>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AttemptResult {
    #[serde(flatten)]
    pub attempt: QuizAttemptEntity,
    pub details: Vec<QuizAttemptDetailEntity>,
    pub max_score: i32,
}
