use uuid::Uuid;

use crate::api::error;
use crate::modules::chat::model::{
    GroupMemberRow, GroupSummary, InsertMedia, InsertMessage, ReactionRow,
};
use crate::modules::chat::schema::{
    ChatGroupEntity, GroupMemberEntity, MediaEntity, MemberRole, MessageEntity,
    MessageReactionEntity, StickerEntity,
};

#[async_trait::async_trait]
pub trait GroupRepository {
    /// Insert the group and its OWNER membership in one transaction.
    async fn create_group_atomic(
        &self,
        name: &str,
        owner_id: &Uuid,
        avatar_url: &Option<String>,
        member_ids: &[Uuid],
    ) -> Result<ChatGroupEntity, error::SystemError>;

    async fn find_group(&self, id: &Uuid) -> Result<Option<ChatGroupEntity>, error::SystemError>;

    async fn rename_group(&self, id: &Uuid, name: &str) -> Result<(), error::SystemError>;

    async fn delete_group(&self, id: &Uuid) -> Result<bool, error::SystemError>;

    async fn find_groups_for_user(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<GroupSummary>, error::SystemError>;

    async fn find_member(
        &self,
        group_id: &Uuid,
        user_id: &Uuid,
    ) -> Result<Option<GroupMemberEntity>, error::SystemError>;

    async fn add_member(
        &self,
        group_id: &Uuid,
        user_id: &Uuid,
        role: MemberRole,
    ) -> Result<GroupMemberEntity, error::SystemError>;

    async fn remove_member(
        &self,
        group_id: &Uuid,
        user_id: &Uuid,
    ) -> Result<bool, error::SystemError>;

    async fn count_members(&self, group_id: &Uuid) -> Result<i64, error::SystemError>;

    async fn list_members(&self, group_id: &Uuid)
    -> Result<Vec<GroupMemberRow>, error::SystemError>;
}

#[async_trait::async_trait]
pub trait MessageRepository {
    async fn create_message(
        &self,
        message: &InsertMessage,
    ) -> Result<MessageEntity, error::SystemError>;

    async fn find_message(&self, id: &Uuid) -> Result<Option<MessageEntity>, error::SystemError>;

    async fn find_group_messages(
        &self,
        group_id: &Uuid,
        before: Option<chrono::DateTime<chrono::Utc>>,
        limit: i64,
    ) -> Result<Vec<MessageEntity>, error::SystemError>;

    async fn find_direct_messages(
        &self,
        user_id_a: &Uuid,
        user_id_b: &Uuid,
        before: Option<chrono::DateTime<chrono::Utc>>,
        limit: i64,
    ) -> Result<Vec<MessageEntity>, error::SystemError>;

    /// Rewrite content and flag the message as edited.
    async fn mark_edited(
        &self,
        id: &Uuid,
        content: &str,
    ) -> Result<MessageEntity, error::SystemError>;

    async fn soft_delete_message(&self, id: &Uuid) -> Result<bool, error::SystemError>;

    async fn attach_media(&self, media: &InsertMedia) -> Result<MediaEntity, error::SystemError>;

    async fn find_media_for_message(
        &self,
        message_id: &Uuid,
    ) -> Result<Vec<MediaEntity>, error::SystemError>;
}

#[async_trait::async_trait]
pub trait StickerRepository {
    async fn create_sticker(
        &self,
        code: &str,
        url: &str,
    ) -> Result<StickerEntity, error::SystemError>;

    async fn find_sticker(&self, id: &Uuid) -> Result<Option<StickerEntity>, error::SystemError>;

    async fn list_stickers(&self) -> Result<Vec<StickerEntity>, error::SystemError>;
}

#[async_trait::async_trait]
pub trait ReactionRepository {
    /// One reaction per (message, user): re-reacting replaces the emoji.
    async fn upsert_reaction(
        &self,
        message_id: &Uuid,
        user_id: &Uuid,
        emoji: &str,
    ) -> Result<MessageReactionEntity, error::SystemError>;

    async fn delete_reaction(
        &self,
        message_id: &Uuid,
        user_id: &Uuid,
    ) -> Result<bool, error::SystemError>;

    async fn list_reactions(
        &self,
        message_id: &Uuid,
    ) -> Result<Vec<ReactionRow>, error::SystemError>;
}

pub trait ChatRepo:
    GroupRepository + MessageRepository + StickerRepository + ReactionRepository + Send + Sync
{
}

impl<T> ChatRepo for T where
    T: GroupRepository + MessageRepository + StickerRepository + ReactionRepository + Send + Sync
{
}
