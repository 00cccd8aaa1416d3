use serde::Serialize;
use sqlx::prelude::FromRow;
use uuid::Uuid;

/// A live call inside a room. Breakout sessions point at their parent
/// through `parent_session_id` (self-referencing).
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CallSessionEntity {
    pub id: Uuid,
    pub room_id: Uuid,
    pub parent_session_id: Option<Uuid>,
    pub started_at: chrono::DateTime<chrono::Utc>,
    pub ended_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AttendanceEntity {
    pub id: Uuid,
    pub session_id: Uuid,
    pub user_id: Uuid,
    pub joined_at: chrono::DateTime<chrono::Utc>,
    pub left_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Recording of a room, optionally tied to one session.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct RecordingEntity {
    pub id: Uuid,
    pub room_id: Uuid,
    pub session_id: Option<Uuid>,
    pub file_url: String,
    pub duration_seconds: Option<i32>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CallTranscriptEntity {
    pub id: Uuid,
    pub session_id: Uuid,
    pub language: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// One caption line. Times are seconds from session start, fractional for
/// sub-second precision.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SubtitleEntity {
    pub id: Uuid,
    pub transcript_id: Uuid,
    pub speaker_id: Option<Uuid>,
    pub start_seconds: f64,
    pub end_seconds: f64,
    pub content: String,
}
