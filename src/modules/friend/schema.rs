use serde::{Deserialize, Serialize};
use sqlx::prelude::{FromRow, Type};
use uuid::Uuid;

#[derive(Debug, PartialEq, Clone, Type, Serialize, Deserialize)]
#[sqlx(type_name = "friendship_status", rename_all = "UPPERCASE")]
#[serde(rename_all = "lowercase")]
pub enum FriendshipStatus {
    #[sqlx(rename = "PENDING")]
    Pending,
    #[sqlx(rename = "ACCEPTED")]
    Accepted,
    #[sqlx(rename = "REJECTED")]
    Rejected,
}

/// Directed request/accept relation: requester sent, addressee answers.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct FriendshipEntity {
    pub id: Uuid,
    pub requester_id: Uuid,
    pub addressee_id: Uuid,
    pub status: FriendshipStatus,
    pub message: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub responded_at: Option<chrono::DateTime<chrono::Utc>>,
}
