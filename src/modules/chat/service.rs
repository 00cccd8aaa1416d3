use std::sync::Arc;

use uuid::Uuid;

use crate::{
    api::error,
    modules::{
        chat::{
            model::{
                AttachMediaBody, CreateGroupBody, GroupMemberRow, GroupSummary, InsertMedia,
                InsertMessage, MessageQuery, MessagesResponse, ReactionRow, SendDirectMessageBody,
                SendGroupMessageBody,
            },
            repository::ChatRepo,
            schema::{
                ChatGroupEntity, GroupMemberEntity, MediaEntity, MemberRole, MessageEntity,
                MessageReactionEntity, StickerEntity,
            },
        },
        friend::{repository::FriendRepository, schema::FriendshipStatus},
        user::repository::UserRepository,
    },
};

const DEFAULT_PAGE: i64 = 50;
const MAX_PAGE: i64 = 100;

#[derive(Clone)]
pub struct ChatService {
    chat_repo: Arc<dyn ChatRepo>,
    friend_repo: Arc<dyn FriendRepository + Send + Sync>,
    user_repo: Arc<dyn UserRepository + Send + Sync>,
}

impl ChatService {
    pub fn with_dependencies(
        chat_repo: Arc<dyn ChatRepo>,
        friend_repo: Arc<dyn FriendRepository + Send + Sync>,
        user_repo: Arc<dyn UserRepository + Send + Sync>,
    ) -> Self {
        ChatService { chat_repo, friend_repo, user_repo }
    }

    // ---- groups ----

    pub async fn create_group(
        &self,
        owner_id: Uuid,
        body: CreateGroupBody,
    ) -> Result<ChatGroupEntity, error::SystemError> {
        let mut member_ids: Vec<Uuid> = body.member_ids.unwrap_or_default();
        member_ids.sort();
        member_ids.dedup();
        member_ids.retain(|id| *id != owner_id);

        for member_id in &member_ids {
            if self.user_repo.find_by_id(member_id).await?.is_none() {
                return Err(error::SystemError::not_found("Invited user not found"));
            }
        }

        self.chat_repo
            .create_group_atomic(&body.name, &owner_id, &body.avatar_url, &member_ids)
            .await
    }

    pub async fn rename_group(
        &self,
        user_id: Uuid,
        group_id: Uuid,
        name: &str,
    ) -> Result<(), error::SystemError> {
        self.require_group_admin(&group_id, &user_id).await?;
        self.chat_repo.rename_group(&group_id, name).await
    }

    pub async fn delete_group(
        &self,
        user_id: Uuid,
        group_id: Uuid,
    ) -> Result<(), error::SystemError> {
        let group = self
            .chat_repo
            .find_group(&group_id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Group not found"))?;

        if group.owner_id != user_id {
            return Err(error::SystemError::forbidden("Only the owner may delete the group"));
        }

        self.chat_repo.delete_group(&group_id).await?;
        Ok(())
    }

    pub async fn get_groups(&self, user_id: Uuid) -> Result<Vec<GroupSummary>, error::SystemError> {
        self.chat_repo.find_groups_for_user(&user_id).await
    }

    pub async fn get_members(
        &self,
        user_id: Uuid,
        group_id: Uuid,
    ) -> Result<Vec<GroupMemberRow>, error::SystemError> {
        self.require_member(&group_id, &user_id).await?;
        self.chat_repo.list_members(&group_id).await
    }

    pub async fn add_member(
        &self,
        actor_id: Uuid,
        group_id: Uuid,
        user_id: Uuid,
    ) -> Result<GroupMemberEntity, error::SystemError> {
        self.require_group_admin(&group_id, &actor_id).await?;

        if self.user_repo.find_by_id(&user_id).await?.is_none() {
            return Err(error::SystemError::not_found("User not found"));
        }

        if self.chat_repo.find_member(&group_id, &user_id).await?.is_some() {
            return Err(error::SystemError::bad_request("User is already a member"));
        }

        self.chat_repo.add_member(&group_id, &user_id, MemberRole::Member).await
    }

    pub async fn remove_member(
        &self,
        actor_id: Uuid,
        group_id: Uuid,
        target_id: Uuid,
    ) -> Result<(), error::SystemError> {
        let target = self
            .chat_repo
            .find_member(&group_id, &target_id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Member not found"))?;

        if actor_id == target_id {
            // self-leave; the owner must hand the group over (or delete it) first
            if target.member_role == MemberRole::Owner
                && self.chat_repo.count_members(&group_id).await? > 1
            {
                return Err(error::SystemError::bad_request(
                    "Owner cannot leave while the group has other members",
                ));
            }
        } else {
            self.require_group_admin(&group_id, &actor_id).await?;
            if target.member_role == MemberRole::Owner {
                return Err(error::SystemError::forbidden("The owner cannot be removed"));
            }
        }

        self.chat_repo.remove_member(&group_id, &target_id).await?;
        Ok(())
    }

    // ---- messages ----

    pub async fn send_group_message(
        &self,
        sender_id: Uuid,
        group_id: Uuid,
        body: SendGroupMessageBody,
    ) -> Result<MessageEntity, error::SystemError> {
        self.require_member(&group_id, &sender_id).await?;
        self.check_payload(&body.content, &body.sticker_id).await?;

        self.chat_repo
            .create_message(&InsertMessage {
                sender_id,
                group_id: Some(group_id),
                recipient_id: None,
                sticker_id: body.sticker_id,
                content: body.content,
            })
            .await
    }

    pub async fn send_direct_message(
        &self,
        sender_id: Uuid,
        body: SendDirectMessageBody,
    ) -> Result<MessageEntity, error::SystemError> {
        if body.recipient_id == sender_id {
            return Err(error::SystemError::bad_request("Cannot message yourself"));
        }

        if self.user_repo.find_by_id(&body.recipient_id).await?.is_none() {
            return Err(error::SystemError::not_found("Recipient not found"));
        }

        let friendship = self.friend_repo.find_between(&sender_id, &body.recipient_id).await?;
        if !matches!(friendship, Some(f) if f.status == FriendshipStatus::Accepted) {
            return Err(error::SystemError::forbidden("Direct messages require a friendship"));
        }

        self.check_payload(&body.content, &body.sticker_id).await?;

        self.chat_repo
            .create_message(&InsertMessage {
                sender_id,
                group_id: None,
                recipient_id: Some(body.recipient_id),
                sticker_id: body.sticker_id,
                content: body.content,
            })
            .await
    }

    pub async fn get_group_messages(
        &self,
        user_id: Uuid,
        group_id: Uuid,
        query: MessageQuery,
    ) -> Result<MessagesResponse, error::SystemError> {
        self.require_member(&group_id, &user_id).await?;

        let limit = query.limit.unwrap_or(DEFAULT_PAGE).clamp(1, MAX_PAGE);
        let messages = self.chat_repo.find_group_messages(&group_id, query.before, limit).await?;

        Ok(Self::paginate(messages, limit))
    }

    pub async fn get_direct_messages(
        &self,
        user_id: Uuid,
        other_id: Uuid,
        query: MessageQuery,
    ) -> Result<MessagesResponse, error::SystemError> {
        let limit = query.limit.unwrap_or(DEFAULT_PAGE).clamp(1, MAX_PAGE);
        let messages =
            self.chat_repo.find_direct_messages(&user_id, &other_id, query.before, limit).await?;

        Ok(Self::paginate(messages, limit))
    }

    pub async fn edit_message(
        &self,
        user_id: Uuid,
        message_id: Uuid,
        content: &str,
    ) -> Result<MessageEntity, error::SystemError> {
        let message = self.require_message(&message_id).await?;

        if message.sender_id != user_id {
            return Err(error::SystemError::forbidden("Only the sender may edit a message"));
        }

        if message.content.is_none() {
            return Err(error::SystemError::bad_request("Sticker messages cannot be edited"));
        }

        self.chat_repo.mark_edited(&message_id, content).await
    }

    pub async fn delete_message(
        &self,
        user_id: Uuid,
        message_id: Uuid,
    ) -> Result<(), error::SystemError> {
        let message = self.require_message(&message_id).await?;

        let allowed = if message.sender_id == user_id {
            true
        } else if let Some(group_id) = message.group_id {
            matches!(
                self.chat_repo.find_member(&group_id, &user_id).await?,
                Some(m) if m.member_role != MemberRole::Member
            )
        } else {
            false
        };

        if !allowed {
            return Err(error::SystemError::forbidden("Not allowed to delete this message"));
        }

        self.chat_repo.soft_delete_message(&message_id).await?;
        Ok(())
    }

    pub async fn attach_media(
        &self,
        user_id: Uuid,
        message_id: Uuid,
        body: AttachMediaBody,
    ) -> Result<MediaEntity, error::SystemError> {
        let message = self.require_message(&message_id).await?;

        if message.sender_id != user_id {
            return Err(error::SystemError::forbidden(
                "Only the sender may attach media to a message",
            ));
        }

        self.chat_repo
            .attach_media(&InsertMedia {
                message_id,
                media_type: body.media_type,
                url: body.url,
                file_name: body.file_name,
                file_size: body.file_size,
            })
            .await
    }

    pub async fn get_media(
        &self,
        user_id: Uuid,
        message_id: Uuid,
    ) -> Result<Vec<MediaEntity>, error::SystemError> {
        let message = self.require_message(&message_id).await?;
        self.require_visible(&message, &user_id).await?;
        self.chat_repo.find_media_for_message(&message_id).await
    }

    // ---- reactions ----

    pub async fn react(
        &self,
        user_id: Uuid,
        message_id: Uuid,
        emoji: &str,
    ) -> Result<MessageReactionEntity, error::SystemError> {
        let message = self.require_message(&message_id).await?;
        self.require_visible(&message, &user_id).await?;
        self.chat_repo.upsert_reaction(&message_id, &user_id, emoji).await
    }

    pub async fn unreact(
        &self,
        user_id: Uuid,
        message_id: Uuid,
    ) -> Result<(), error::SystemError> {
        let removed = self.chat_repo.delete_reaction(&message_id, &user_id).await?;
        if !removed {
            return Err(error::SystemError::not_found("Reaction not found"));
        }
        Ok(())
    }

    pub async fn get_reactions(
        &self,
        user_id: Uuid,
        message_id: Uuid,
    ) -> Result<Vec<ReactionRow>, error::SystemError> {
        let message = self.require_message(&message_id).await?;
        self.require_visible(&message, &user_id).await?;
        self.chat_repo.list_reactions(&message_id).await
    }

    // ---- stickers ----

    pub async fn create_sticker(
        &self,
        code: &str,
        url: &str,
    ) -> Result<StickerEntity, error::SystemError> {
        self.chat_repo.create_sticker(code, url).await
    }

    pub async fn get_stickers(&self) -> Result<Vec<StickerEntity>, error::SystemError> {
        self.chat_repo.list_stickers().await
    }

    // ---- helpers ----

    fn paginate(messages: Vec<MessageEntity>, limit: i64) -> MessagesResponse {
        let cursor = if messages.len() as i64 == limit {
            messages.last().map(|m| m.created_at.to_rfc3339())
        } else {
            None
        };
        MessagesResponse { messages, cursor }
    }

    async fn check_payload(
        &self,
        content: &Option<String>,
        sticker_id: &Option<Uuid>,
    ) -> Result<(), error::SystemError> {
        if content.is_none() && sticker_id.is_none() {
            return Err(error::SystemError::bad_request(
                "Message needs content or a sticker",
            ));
        }

        if let Some(sticker_id) = sticker_id {
            if self.chat_repo.find_sticker(sticker_id).await?.is_none() {
                return Err(error::SystemError::not_found("Sticker not found"));
            }
        }

        Ok(())
    }

    async fn require_message(
        &self,
        message_id: &Uuid,
    ) -> Result<MessageEntity, error::SystemError> {
        self.chat_repo
            .find_message(message_id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Message not found"))
    }

    async fn require_member(
        &self,
        group_id: &Uuid,
        user_id: &Uuid,
    ) -> Result<GroupMemberEntity, error::SystemError> {
        self.chat_repo
            .find_member(group_id, user_id)
            .await?
            .ok_or_else(|| error::SystemError::forbidden("Not a member of this group"))
    }

    async fn require_group_admin(
        &self,
        group_id: &Uuid,
        user_id: &Uuid,
    ) -> Result<(), error::SystemError> {
        let member = self.require_member(group_id, user_id).await?;
        if member.member_role == MemberRole::Member {
            return Err(error::SystemError::forbidden("Requires group admin"));
        }
        Ok(())
    }

    async fn require_visible(
        &self,
        message: &MessageEntity,
        user_id: &Uuid,
    ) -> Result<(), error::SystemError> {
        let visible = if let Some(group_id) = message.group_id {
            self.chat_repo.find_member(&group_id, user_id).await?.is_some()
        } else {
            message.sender_id == *user_id || message.recipient_id == Some(*user_id)
        };

        if !visible {
            return Err(error::SystemError::forbidden("Not allowed to view this message"));
        }
        Ok(())
    }
}
