use serde::Serialize;
use sqlx::prelude::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct QuizEntity {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub time_limit_seconds: Option<i32>,
    pub is_published: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Multiple-choice question, options A-D with C/D optional.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct QuizQuestionEntity {
    pub id: Uuid,
    pub quiz_id: Uuid,
    pub position: i32,
    pub prompt: String,
    pub option_a: String,
    pub option_b: String,
    pub option_c: Option<String>,
    pub option_d: Option<String>,
    pub correct_option: String,
    pub points: i32,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct QuizAttemptEntity {
    pub id: Uuid,
    pub quiz_id: Uuid,
    pub user_id: Uuid,
    pub started_at: chrono::DateTime<chrono::Utc>,
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub score: Option<i32>,
    pub duration_seconds: Option<i32>,
}

impl QuizAttemptEntity {
    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }
}

/// Per-question answer record, unique per (attempt, question).
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct QuizAttemptDetailEntity {
    pub id: Uuid,
    pub attempt_id: Uuid,
    pub question_id: Uuid,
    pub chosen_option: Option<String>,
    pub is_correct: bool,
    pub time_taken_ms: i64,
    pub answered_at: chrono::DateTime<chrono::Utc>,
}
