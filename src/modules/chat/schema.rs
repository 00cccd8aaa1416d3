use serde::{Deserialize, Serialize};
use sqlx::prelude::{FromRow, Type};
use uuid::Uuid;

#[derive(Debug, PartialEq, Clone, Type, Serialize, Deserialize)]
#[sqlx(type_name = "member_role", rename_all = "UPPERCASE")]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    #[sqlx(rename = "OWNER")]
    Owner,
    #[sqlx(rename = "ADMIN")]
    Admin,
    #[sqlx(rename = "MEMBER")]
    Member,
}

#[derive(Debug, PartialEq, Clone, Type, Serialize, Deserialize)]
#[sqlx(type_name = "media_type", rename_all = "UPPERCASE")]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    #[sqlx(rename = "IMAGE")]
    Image,
    #[sqlx(rename = "VIDEO")]
    Video,
    #[sqlx(rename = "AUDIO")]
    Audio,
    #[sqlx(rename = "FILE")]
    File,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ChatGroupEntity {
    pub id: Uuid,
    pub name: String,
    pub owner_id: Uuid,
    pub avatar_url: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Membership join table, composite primary key (group_id, user_id).
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct GroupMemberEntity {
    pub group_id: Uuid,
    pub user_id: Uuid,
    pub member_role: MemberRole,
    pub joined_at: chrono::DateTime<chrono::Utc>,
}

/// A message is either a group message (group_id set) or a direct message
/// (recipient_id set), never both.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MessageEntity {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub group_id: Option<Uuid>,
    pub recipient_id: Option<Uuid>,
    pub sticker_id: Option<Uuid>,
    pub content: Option<String>,
    pub is_edited: bool,
    pub deleted_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MediaEntity {
    pub id: Uuid,
    pub message_id: Uuid,
    pub media_type: MediaType,
    pub url: String,
    pub file_name: String,
    pub file_size: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct StickerEntity {
    pub id: Uuid,
    pub code: String,
    pub url: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// One reaction per (message, user), enforced by a unique index.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MessageReactionEntity {
    pub id: Uuid,
    pub message_id: Uuid,
    pub user_id: Uuid,
    pub emoji: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
