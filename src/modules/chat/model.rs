use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::modules::chat::schema::{MediaType, MemberRole, MessageEntity};

#[derive(Deserialize, Validate)]
pub struct CreateGroupBody {
    #[validate(length(min = 1, max = 100, message = "Group name must be 1-100 characters"))]
    pub name: String,
    pub avatar_url: Option<String>,
    /// Members invited at creation, beside the owner.
    pub member_ids: Option<Vec<Uuid>>,
}

#[derive(Deserialize, Validate)]
pub struct RenameGroupBody {
    #[validate(length(min = 1, max = 100, message = "Group name must be 1-100 characters"))]
    pub name: String,
}

#[derive(Deserialize, Validate)]
pub struct AddMemberBody {
    pub user_id: Uuid,
}

#[derive(Deserialize, Validate)]
pub struct SendGroupMessageBody {
    #[validate(length(min = 1, max = 4000, message = "Message must be 1-4000 characters"))]
    pub content: Option<String>,
    pub sticker_id: Option<Uuid>,
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SendDirectMessageBody {
    pub recipient_id: Uuid,
    #[validate(length(min = 1, max = 4000, message = "Message must be 1-4000 characters"))]
    pub content: Option<String>,
    pub sticker_id: Option<Uuid>,
}

#[derive(Deserialize, Validate)]
pub struct EditMessageBody {
    #[validate(length(min = 1, max = 4000, message = "Message must be 1-4000 characters"))]
    pub content: String,
}

#[derive(Deserialize, Validate)]
pub struct ReactBody {
    #[validate(length(min = 1, max = 32, message = "Emoji must be 1-32 characters"))]
    pub emoji: String,
}

#[derive(Deserialize, Validate)]
pub struct AttachMediaBody {
    pub media_type: MediaType,
    #[validate(url(message = "Invalid media URL"))]
    pub url: String,
    #[validate(length(min = 1, max = 255, message = "File name must be 1-255 characters"))]
    pub file_name: String,
    #[validate(range(min = 1, message = "File size must be positive"))]
    pub file_size: i64,
}

#[derive(Deserialize, Validate)]
pub struct CreateStickerBody {
    #[validate(length(min = 1, max = 64, message = "Sticker code must be 1-64 characters"))]
    pub code: String,
    #[validate(url(message = "Invalid sticker URL"))]
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessageQuery {
    pub before: Option<chrono::DateTime<chrono::Utc>>,
    pub limit: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct InsertMessage {
    pub sender_id: Uuid,
    pub group_id: Option<Uuid>,
    pub recipient_id: Option<Uuid>,
    pub sticker_id: Option<Uuid>,
    pub content: Option<String>,
}

#[derive(Debug, Clone)]
pub struct InsertMedia {
    pub message_id: Uuid,
    pub media_type: MediaType,
    pub url: String,
    pub file_name: String,
    pub file_size: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MessagesResponse {
    pub messages: Vec<MessageEntity>,
    pub cursor: Option<String>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct GroupSummary {
    pub id: Uuid,
    pub name: String,
    pub owner_id: Uuid,
    pub avatar_url: Option<String>,
    pub member_count: i64,
    pub joined_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct GroupMemberRow {
    pub user_id: Uuid,
    pub username: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub member_role: MemberRole,
    pub joined_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ReactionRow {
    pub user_id: Uuid,
    pub display_name: String,
    pub emoji: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
