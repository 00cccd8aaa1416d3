use uuid::Uuid;

use crate::{
    api::error,
    modules::chat::{
        model::{GroupMemberRow, GroupSummary, InsertMedia, InsertMessage, ReactionRow},
        repository::{GroupRepository, MessageRepository, ReactionRepository, StickerRepository},
        schema::{
            ChatGroupEntity, GroupMemberEntity, MediaEntity, MemberRole, MessageEntity,
            MessageReactionEntity, StickerEntity,
        },
    },
};

#[derive(Clone)]
pub struct ChatRepositoryPg {
    pool: sqlx::PgPool,
}

impl ChatRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl GroupRepository for ChatRepositoryPg {
    async fn create_group_atomic(
        &self,
        name: &str,
        owner_id: &Uuid,
        avatar_url: &Option<String>,
        member_ids: &[Uuid],
    ) -> Result<ChatGroupEntity, error::SystemError> {
        let mut tx = self.pool.begin().await?;

        let id = Uuid::now_v7();
        let group = sqlx::query_as::<_, ChatGroupEntity>(
            r#"
            INSERT INTO chat_groups (id, name, owner_id, avatar_url)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(owner_id)
        .bind(avatar_url)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("INSERT INTO group_members (group_id, user_id, member_role) VALUES ($1, $2, 'OWNER')")
            .bind(group.id)
            .bind(owner_id)
            .execute(&mut *tx)
            .await?;

        for member_id in member_ids {
            sqlx::query(
                r#"
                INSERT INTO group_members (group_id, user_id, member_role)
                VALUES ($1, $2, 'MEMBER')
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(group.id)
            .bind(member_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(group)
    }

    async fn find_group(&self, id: &Uuid) -> Result<Option<ChatGroupEntity>, error::SystemError> {
        let group = sqlx::query_as::<_, ChatGroupEntity>("SELECT * FROM chat_groups WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(group)
    }

    async fn rename_group(&self, id: &Uuid, name: &str) -> Result<(), error::SystemError> {
        sqlx::query("UPDATE chat_groups SET name = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(name)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn delete_group(&self, id: &Uuid) -> Result<bool, error::SystemError> {
        // members and group messages go with it via ON DELETE CASCADE
        let rows = sqlx::query("DELETE FROM chat_groups WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(rows > 0)
    }

    async fn find_groups_for_user(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<GroupSummary>, error::SystemError> {
        let groups = sqlx::query_as::<_, GroupSummary>(
            r#"
            SELECT
                g.id,
                g.name,
                g.owner_id,
                g.avatar_url,
                (SELECT COUNT(*) FROM group_members m2 WHERE m2.group_id = g.id) AS member_count,
                m.joined_at
            FROM group_members m
            JOIN chat_groups g ON g.id = m.group_id
            WHERE m.user_id = $1
            ORDER BY m.joined_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(groups)
    }

    async fn find_member(
        &self,
        group_id: &Uuid,
        user_id: &Uuid,
    ) -> Result<Option<GroupMemberEntity>, error::SystemError> {
        let member = sqlx::query_as::<_, GroupMemberEntity>(
            "SELECT * FROM group_members WHERE group_id = $1 AND user_id = $2",
        )
        .bind(group_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(member)
    }

    async fn add_member(
        &self,
        group_id: &Uuid,
        user_id: &Uuid,
        role: MemberRole,
    ) -> Result<GroupMemberEntity, error::SystemError> {
        let member = sqlx::query_as::<_, GroupMemberEntity>(
            r#"
            INSERT INTO group_members (group_id, user_id, member_role)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(group_id)
        .bind(user_id)
        .bind(&role)
        .fetch_one(&self.pool)
        .await?;

        Ok(member)
    }

    async fn remove_member(
        &self,
        group_id: &Uuid,
        user_id: &Uuid,
    ) -> Result<bool, error::SystemError> {
        let rows = sqlx::query("DELETE FROM group_members WHERE group_id = $1 AND user_id = $2")
            .bind(group_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(rows > 0)
    }

    async fn count_members(&self, group_id: &Uuid) -> Result<i64, error::SystemError> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM group_members WHERE group_id = $1")
                .bind(group_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }

    async fn list_members(
        &self,
        group_id: &Uuid,
    ) -> Result<Vec<GroupMemberRow>, error::SystemError> {
        let members = sqlx::query_as::<_, GroupMemberRow>(
            r#"
            SELECT
                m.user_id,
                u.username,
                u.display_name,
                u.avatar_url,
                m.member_role,
                m.joined_at
            FROM group_members m
            JOIN users u ON u.id = m.user_id
            WHERE m.group_id = $1
            ORDER BY m.joined_at
            "#,
        )
        .bind(group_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(members)
    }
}

#[async_trait::async_trait]
impl MessageRepository for ChatRepositoryPg {
    async fn create_message(
        &self,
        message: &InsertMessage,
    ) -> Result<MessageEntity, error::SystemError> {
        let id = Uuid::now_v7();
        let message = sqlx::query_as::<_, MessageEntity>(
            r#"
            INSERT INTO messages (id, sender_id, group_id, recipient_id, sticker_id, content)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(message.sender_id)
        .bind(message.group_id)
        .bind(message.recipient_id)
        .bind(message.sticker_id)
        .bind(&message.content)
        .fetch_one(&self.pool)
        .await?;

        Ok(message)
    }

    async fn find_message(&self, id: &Uuid) -> Result<Option<MessageEntity>, error::SystemError> {
        let message = sqlx::query_as::<_, MessageEntity>(
            "SELECT * FROM messages WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(message)
    }

    async fn find_group_messages(
        &self,
        group_id: &Uuid,
        before: Option<chrono::DateTime<chrono::Utc>>,
        limit: i64,
    ) -> Result<Vec<MessageEntity>, error::SystemError> {
        let messages = sqlx::query_as::<_, MessageEntity>(
            r#"
            SELECT * FROM messages
            WHERE group_id = $1
              AND deleted_at IS NULL
              AND ($2::timestamptz IS NULL OR created_at < $2)
            ORDER BY created_at DESC
            LIMIT $3
            "#,
        )
        .bind(group_id)
        .bind(before)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(messages)
    }

    async fn find_direct_messages(
        &self,
        user_id_a: &Uuid,
        user_id_b: &Uuid,
        before: Option<chrono::DateTime<chrono::Utc>>,
        limit: i64,
    ) -> Result<Vec<MessageEntity>, error::SystemError> {
        let messages = sqlx::query_as::<_, MessageEntity>(
            r#"
            SELECT * FROM messages
            WHERE group_id IS NULL
              AND deleted_at IS NULL
              AND (
                    (sender_id = $1 AND recipient_id = $2)
                 OR (sender_id = $2 AND recipient_id = $1)
              )
              AND ($3::timestamptz IS NULL OR created_at < $3)
            ORDER BY created_at DESC
            LIMIT $4
            "#,
        )
        .bind(user_id_a)
        .bind(user_id_b)
        .bind(before)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(messages)
    }

    async fn mark_edited(
        &self,
        id: &Uuid,
        content: &str,
    ) -> Result<MessageEntity, error::SystemError> {
        let message = sqlx::query_as::<_, MessageEntity>(
            r#"
            UPDATE messages
            SET content = $2, is_edited = TRUE, updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(content)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| error::SystemError::not_found("Message not found"))?;

        Ok(message)
    }

    async fn soft_delete_message(&self, id: &Uuid) -> Result<bool, error::SystemError> {
        let rows = sqlx::query(
            "UPDATE messages SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(rows > 0)
    }

    async fn attach_media(&self, media: &InsertMedia) -> Result<MediaEntity, error::SystemError> {
        let id = Uuid::now_v7();
        let media = sqlx::query_as::<_, MediaEntity>(
            r#"
            INSERT INTO media (id, message_id, media_type, url, file_name, file_size)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(media.message_id)
        .bind(&media.media_type)
        .bind(&media.url)
        .bind(&media.file_name)
        .bind(media.file_size)
        .fetch_one(&self.pool)
        .await?;

        Ok(media)
    }

    async fn find_media_for_message(
        &self,
        message_id: &Uuid,
    ) -> Result<Vec<MediaEntity>, error::SystemError> {
        let media = sqlx::query_as::<_, MediaEntity>(
            "SELECT * FROM media WHERE message_id = $1 ORDER BY created_at",
        )
        .bind(message_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(media)
    }
}

#[async_trait::async_trait]
impl StickerRepository for ChatRepositoryPg {
    async fn create_sticker(
        &self,
        code: &str,
        url: &str,
    ) -> Result<StickerEntity, error::SystemError> {
        let id = Uuid::now_v7();
        let sticker = sqlx::query_as::<_, StickerEntity>(
            "INSERT INTO stickers (id, code, url) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(id)
        .bind(code)
        .bind(url)
        .fetch_one(&self.pool)
        .await?;

        Ok(sticker)
    }

    async fn find_sticker(&self, id: &Uuid) -> Result<Option<StickerEntity>, error::SystemError> {
        let sticker = sqlx::query_as::<_, StickerEntity>("SELECT * FROM stickers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(sticker)
    }

    async fn list_stickers(&self) -> Result<Vec<StickerEntity>, error::SystemError> {
        let stickers =
            sqlx::query_as::<_, StickerEntity>("SELECT * FROM stickers ORDER BY code")
                .fetch_all(&self.pool)
                .await?;

        Ok(stickers)
    }
}

#[async_trait::async_trait]
impl ReactionRepository for ChatRepositoryPg {
    async fn upsert_reaction(
        &self,
        message_id: &Uuid,
        user_id: &Uuid,
        emoji: &str,
    ) -> Result<MessageReactionEntity, error::SystemError> {
        let id = Uuid::now_v7();
        let reaction = sqlx::query_as::<_, MessageReactionEntity>(
            r#"
            INSERT INTO message_reactions (id, message_id, user_id, emoji)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (message_id, user_id)
                DO UPDATE SET emoji = EXCLUDED.emoji, created_at = NOW()
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(message_id)
        .bind(user_id)
        .bind(emoji)
        .fetch_one(&self.pool)
        .await?;

        Ok(reaction)
    }

    async fn delete_reaction(
        &self,
        message_id: &Uuid,
        user_id: &Uuid,
    ) -> Result<bool, error::SystemError> {
        let rows =
            sqlx::query("DELETE FROM message_reactions WHERE message_id = $1 AND user_id = $2")
                .bind(message_id)
                .bind(user_id)
                .execute(&self.pool)
                .await?
                .rows_affected();

        Ok(rows > 0)
    }

    async fn list_reactions(
        &self,
        message_id: &Uuid,
    ) -> Result<Vec<ReactionRow>, error::SystemError> {
        let reactions = sqlx::query_as::<_, ReactionRow>(
            r#"
            SELECT
                r.user_id,
                u.display_name,
                r.emoji,
                r.created_at
            FROM message_reactions r
            JOIN users u ON u.id = r.user_id
            WHERE r.message_id = $1
            ORDER BY r.created_at
            "#,
        )
        .bind(message_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(reactions)
    }
}
