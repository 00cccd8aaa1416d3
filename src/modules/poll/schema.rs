use serde::Serialize;
use sqlx::prelude::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct RoomPollEntity {
    pub id: Uuid,
    pub room_id: Uuid,
    pub creator_id: Uuid,
    pub question: String,
    pub closed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl RoomPollEntity {
    pub fn is_closed(&self) -> bool {
        self.closed_at.is_some()
    }
}

/// Strictly owned by its poll; deleting the poll cascades here.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PollOptionEntity {
    pub id: Uuid,
    pub poll_id: Uuid,
    pub label: String,
    pub position: i32,
}

/// One vote per (poll, voter), enforced by a unique index.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PollVoteEntity {
    pub id: Uuid,
    pub poll_id: Uuid,
    pub option_id: Uuid,
    pub voter_id: Uuid,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
