use serde::{Deserialize, Serialize};
use sqlx::prelude::{FromRow, Type};
use uuid::Uuid;

#[derive(Debug, PartialEq, Clone, Type, Serialize, Deserialize)]
#[sqlx(type_name = "draw_action_type", rename_all = "UPPERCASE")]
#[serde(rename_all = "lowercase")]
pub enum DrawActionType {
    #[sqlx(rename = "STROKE")]
    Stroke,
    #[sqlx(rename = "ERASE")]
    Erase,
    #[sqlx(rename = "SHAPE")]
    Shape,
    #[sqlx(rename = "TEXT")]
    Text,
    #[sqlx(rename = "CLEAR")]
    Clear,
    #[sqlx(rename = "UNDO")]
    Undo,
}

/// A drawing surface, optionally bound to a meeting room.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct WhiteboardSessionEntity {
    pub id: Uuid,
    pub room_id: Option<Uuid>,
    pub owner_id: Uuid,
    pub title: String,
    pub closed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl WhiteboardSessionEntity {
    pub fn is_closed(&self) -> bool {
        self.closed_at.is_some()
    }
}

/// Append-only drawing log. `seq` is assigned server-side and unique per
/// session, so replay order is total.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct DrawActionEntity {
    pub id: Uuid,
    pub session_id: Uuid,
    pub user_id: Uuid,
    pub seq: i64,
    pub action_type: DrawActionType,
    pub payload: serde_json::Value,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct WhiteboardTemplateEntity {
    pub id: Uuid,
    pub name: String,
    pub owner_id: Option<Uuid>,
    pub content: serde_json::Value,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
