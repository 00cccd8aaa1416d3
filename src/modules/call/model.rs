use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::modules::call::schema::CallSessionEntity;

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StartSessionBody {
    pub parent_session_id: Option<Uuid>,
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRecordingBody {
    pub session_id: Option<Uuid>,
    #[validate(url(message = "Invalid recording URL"))]
    pub file_url: String,
    #[validate(range(min = 1, message = "Duration must be positive"))]
    pub duration_seconds: Option<i32>,
}

#[derive(Deserialize, Validate)]
pub struct CreateTranscriptBody {
    #[validate(length(min = 2, max = 16, message = "Language tag must be 2-16 characters"))]
    pub language: String,
}

#[derive(Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubtitleItem {
    pub speaker_id: Option<Uuid>,
    pub start_seconds: f64,
    pub end_seconds: f64,
    #[validate(length(min = 1, max = 1000, message = "Subtitle must be 1-1000 characters"))]
    pub content: String,
}

#[derive(Deserialize, Validate)]
pub struct AppendSubtitlesBody {
    #[validate(length(min = 1, message = "At least one subtitle required"), nested)]
    pub subtitles: Vec<SubtitleItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubtitleWindowQuery {
    pub from: f64,
    pub to: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionNode {
    #[serde(flatten)]
    pub session: CallSessionEntity,
    pub children: Vec<SessionNode>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AttendanceRow {
    pub user_id: Uuid,
    pub username: String,
    pub display_name: String,
    pub joined_at: chrono::DateTime<chrono::Utc>,
    pub left_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TranscriptTextResponse {
    pub transcript_id: Uuid,
    pub language: String,
    pub text: String,
}
