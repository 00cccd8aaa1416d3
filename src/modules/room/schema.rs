use serde::{Deserialize, Serialize};
use sqlx::prelude::{FromRow, Type};
use uuid::Uuid;

#[derive(Debug, PartialEq, Clone, Type, Serialize, Deserialize)]
#[sqlx(type_name = "participant_role", rename_all = "UPPERCASE")]
#[serde(rename_all = "lowercase")]
pub enum ParticipantRole {
    #[sqlx(rename = "HOST")]
    Host,
    #[sqlx(rename = "COHOST")]
    Cohost,
    #[sqlx(rename = "ATTENDEE")]
    Attendee,
}

#[derive(Debug, PartialEq, Clone, Type, Serialize, Deserialize)]
#[sqlx(type_name = "room_event_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "snake_case")]
pub enum RoomEventType {
    Joined,
    Left,
    RoomEnded,
    SessionStarted,
    SessionEnded,
    RecordingStarted,
    PollOpened,
    PollClosed,
    BreakoutOpened,
}

/// A meeting room. `password` is the join credential and is unique.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct VideoRoomEntity {
    pub id: Uuid,
    pub name: String,
    pub password: String,
    pub host_id: Uuid,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Membership join table, composite primary key (room_id, user_id).
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct RoomParticipantEntity {
    pub room_id: Uuid,
    pub user_id: Uuid,
    pub participant_role: ParticipantRole,
    pub joined_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct RoomMessageEntity {
    pub id: Uuid,
    pub room_id: Uuid,
    pub sender_id: Uuid,
    pub content: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Audit log row; `detail` carries event-specific JSON.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct RoomEventEntity {
    pub id: Uuid,
    pub room_id: Uuid,
    pub actor_id: Option<Uuid>,
    pub event_type: RoomEventType,
    pub detail: Option<serde_json::Value>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Breakout sub-room, keyed by the parent room's unique password.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct BreakoutRoomEntity {
    pub id: Uuid,
    pub room_password: String,
    pub name: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Composite primary key (breakout_room_id, user_id).
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct BreakoutRoomParticipantEntity {
    pub breakout_room_id: Uuid,
    pub user_id: Uuid,
    pub assigned_at: chrono::DateTime<chrono::Utc>,
}
