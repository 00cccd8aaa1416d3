use uuid::Uuid;

use crate::{
    api::error,
    modules::whiteboard::{
        repository::WhiteboardRepository,
        schema::{
            DrawActionEntity, DrawActionType, WhiteboardSessionEntity, WhiteboardTemplateEntity,
        },
    },
};

#[derive(Clone)]
pub struct WhiteboardRepositoryPg {
    pool: sqlx::PgPool,
}

impl WhiteboardRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl WhiteboardRepository for WhiteboardRepositoryPg {
    async fn create_session(
        &self,
        owner_id: &Uuid,
        room_id: Option<&Uuid>,
        title: &str,
    ) -> Result<WhiteboardSessionEntity, error::SystemError> {
        let id = Uuid::now_v7();
        let session = sqlx::query_as::<_, WhiteboardSessionEntity>(
            r#"
            INSERT INTO whiteboard_sessions (id, room_id, owner_id, title)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(room_id)
        .bind(owner_id)
        .bind(title)
        .fetch_one(&self.pool)
        .await?;

        Ok(session)
    }

    async fn find_session(
        &self,
        id: &Uuid,
    ) -> Result<Option<WhiteboardSessionEntity>, error::SystemError> {
        let session = sqlx::query_as::<_, WhiteboardSessionEntity>(
            "SELECT * FROM whiteboard_sessions WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(session)
    }

    async fn close_session(&self, id: &Uuid) -> Result<bool, error::SystemError> {
        let rows = sqlx::query(
            r#"
            UPDATE whiteboard_sessions
            SET closed_at = NOW(), updated_at = NOW()
            WHERE id = $1 AND closed_at IS NULL
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(rows > 0)
    }

    async fn list_sessions_for_owner(
        &self,
        owner_id: &Uuid,
    ) -> Result<Vec<WhiteboardSessionEntity>, error::SystemError> {
        let sessions = sqlx::query_as::<_, WhiteboardSessionEntity>(
            "SELECT * FROM whiteboard_sessions WHERE owner_id = $1 ORDER BY created_at DESC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(sessions)
    }

    async fn list_sessions_for_room(
        &self,
        room_id: &Uuid,
    ) -> Result<Vec<WhiteboardSessionEntity>, error::SystemError> {
        let sessions = sqlx::query_as::<_, WhiteboardSessionEntity>(
            "SELECT * FROM whiteboard_sessions WHERE room_id = $1 ORDER BY created_at DESC",
        )
        .bind(room_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(sessions)
    }

    async fn append_action_atomic(
        &self,
        session_id: &Uuid,
        user_id: &Uuid,
        action_type: DrawActionType,
        payload: serde_json::Value,
    ) -> Result<DrawActionEntity, error::SystemError> {
        let mut tx = self.pool.begin().await?;

        // lock the session row to serialize seq assignment
        sqlx::query("SELECT id FROM whiteboard_sessions WHERE id = $1 FOR UPDATE")
            .bind(session_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Whiteboard session not found"))?;

        let (next_seq,): (i64,) = sqlx::query_as(
            "SELECT COALESCE(MAX(seq), 0) + 1 FROM draw_actions WHERE session_id = $1",
        )
        .bind(session_id)
        .fetch_one(&mut *tx)
        .await?;

        let action = sqlx::query_as::<_, DrawActionEntity>(
            r#"
            INSERT INTO draw_actions (id, session_id, user_id, seq, action_type, payload)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(session_id)
        .bind(user_id)
        .bind(next_seq)
        .bind(&action_type)
        .bind(&payload)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE whiteboard_sessions SET updated_at = NOW() WHERE id = $1")
            .bind(session_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(action)
    }

    async fn list_actions_since(
        &self,
        session_id: &Uuid,
        after_seq: i64,
        limit: i64,
    ) -> Result<Vec<DrawActionEntity>, error::SystemError> {
        let actions = sqlx::query_as::<_, DrawActionEntity>(
            r#"
            SELECT * FROM draw_actions
            WHERE session_id = $1 AND seq > $2
            ORDER BY seq
            LIMIT $3
            "#,
        )
        .bind(session_id)
        .bind(after_seq)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(actions)
    }

    async fn create_template(
        &self,
        name: &str,
        owner_id: Option<&Uuid>,
        content: &serde_json::Value,
    ) -> Result<WhiteboardTemplateEntity, error::SystemError> {
        let id = Uuid::now_v7();
        let template = sqlx::query_as::<_, WhiteboardTemplateEntity>(
            r#"
            INSERT INTO whiteboard_templates (id, name, owner_id, content)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(owner_id)
        .bind(content)
        .fetch_one(&self.pool)
        .await?;

        Ok(template)
    }

    async fn find_template(
        &self,
        id: &Uuid,
    ) -> Result<Option<WhiteboardTemplateEntity>, error::SystemError> {
        let template = sqlx::query_as::<_, WhiteboardTemplateEntity>(
            "SELECT * FROM whiteboard_templates WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(template)
    }

    async fn list_templates(
        &self,
    ) -> Result<Vec<WhiteboardTemplateEntity>, error::SystemError> {
        let templates = sqlx::query_as::<_, WhiteboardTemplateEntity>(
            "SELECT * FROM whiteboard_templates ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(templates)
    }

    async fn delete_template(&self, id: &Uuid) -> Result<bool, error::SystemError> {
        let rows = sqlx::query("DELETE FROM whiteboard_templates WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(rows > 0)
    }
}
