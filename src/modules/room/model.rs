use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::modules::room::schema::{BreakoutRoomEntity, ParticipantRole, RoomMessageEntity};

#[derive(Deserialize, Validate)]
pub struct CreateRoomBody {
    #[validate(length(min = 1, max = 100, message = "Room name must be 1-100 characters"))]
    pub name: String,
}

#[derive(Deserialize, Validate)]
pub struct JoinRoomBody {
    #[validate(length(min = 1, message = "Password cannot be empty"))]
    pub password: String,
}

#[derive(Deserialize, Validate)]
pub struct RoomMessageBody {
    #[validate(length(min = 1, max = 2000, message = "Message must be 1-2000 characters"))]
    pub content: String,
}

#[derive(Deserialize, Validate)]
pub struct OpenBreakoutsBody {
    #[validate(length(min = 1, max = 20, message = "Between 1 and 20 breakout rooms"))]
    pub names: Vec<String>,
}

#[derive(Deserialize, Validate)]
pub struct AssignBreakoutBody {
    pub user_id: Uuid,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RoomMessageQuery {
    pub before: Option<chrono::DateTime<chrono::Utc>>,
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ParticipantRow {
    pub user_id: Uuid,
    pub username: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub participant_role: ParticipantRole,
    pub joined_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct BreakoutParticipantRow {
    pub user_id: Uuid,
    pub username: String,
    pub display_name: String,
    pub assigned_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BreakoutWithParticipants {
    #[serde(flatten)]
    pub breakout: BreakoutRoomEntity,
    pub participants: Vec<BreakoutParticipantRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoomMessagesResponse {
    pub messages: Vec<RoomMessageEntity>,
    pub cursor: Option<String>,
}
