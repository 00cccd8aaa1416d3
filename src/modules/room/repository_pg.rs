use uuid::Uuid;

use crate::{
    api::error,
    modules::room::{
        model::{BreakoutParticipantRow, ParticipantRow},
        repository::RoomRepository,
        schema::{
            BreakoutRoomEntity, ParticipantRole, RoomEventEntity, RoomEventType,
            RoomMessageEntity, RoomParticipantEntity, VideoRoomEntity,
        },
    },
};

#[derive(Clone)]
pub struct RoomRepositoryPg {
    pool: sqlx::PgPool,
}

impl RoomRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl RoomRepository for RoomRepositoryPg {
    async fn create_room_atomic(
        &self,
        name: &str,
        password: &str,
        host_id: &Uuid,
    ) -> Result<VideoRoomEntity, error::SystemError> {
        let mut tx = self.pool.begin().await?;

        let id = Uuid::now_v7();
        let room = sqlx::query_as::<_, VideoRoomEntity>(
            r#"
            INSERT INTO video_rooms (id, name, password, host_id)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(password)
        .bind(host_id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO room_participants (room_id, user_id, participant_role) VALUES ($1, $2, 'HOST')",
        )
        .bind(room.id)
        .bind(host_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(room)
    }

    async fn find_room(&self, id: &Uuid) -> Result<Option<VideoRoomEntity>, error::SystemError> {
        let room = sqlx::query_as::<_, VideoRoomEntity>("SELECT * FROM video_rooms WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(room)
    }

    async fn find_room_by_password(
        &self,
        password: &str,
    ) -> Result<Option<VideoRoomEntity>, error::SystemError> {
        let room =
            sqlx::query_as::<_, VideoRoomEntity>("SELECT * FROM video_rooms WHERE password = $1")
                .bind(password)
                .fetch_optional(&self.pool)
                .await?;

        Ok(room)
    }

    async fn deactivate_room(&self, id: &Uuid) -> Result<bool, error::SystemError> {
        let rows = sqlx::query(
            "UPDATE video_rooms SET is_active = FALSE, updated_at = NOW() WHERE id = $1 AND is_active",
        )
        .bind(id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(rows > 0)
    }

    async fn find_participant(
        &self,
        room_id: &Uuid,
        user_id: &Uuid,
    ) -> Result<Option<RoomParticipantEntity>, error::SystemError> {
        let participant = sqlx::query_as::<_, RoomParticipantEntity>(
            "SELECT * FROM room_participants WHERE room_id = $1 AND user_id = $2",
        )
        .bind(room_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(participant)
    }

    async fn add_participant(
        &self,
        room_id: &Uuid,
        user_id: &Uuid,
        role: ParticipantRole,
    ) -> Result<RoomParticipantEntity, error::SystemError> {
        let participant = sqlx::query_as::<_, RoomParticipantEntity>(
            r#"
            INSERT INTO room_participants (room_id, user_id, participant_role)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(room_id)
        .bind(user_id)
        .bind(&role)
        .fetch_one(&self.pool)
        .await?;

        Ok(participant)
    }

    async fn remove_participant(
        &self,
        room_id: &Uuid,
        user_id: &Uuid,
    ) -> Result<bool, error::SystemError> {
        let rows =
            sqlx::query("DELETE FROM room_participants WHERE room_id = $1 AND user_id = $2")
                .bind(room_id)
                .bind(user_id)
                .execute(&self.pool)
                .await?
                .rows_affected();

        Ok(rows > 0)
    }

    async fn list_participants(
        &self,
        room_id: &Uuid,
    ) -> Result<Vec<ParticipantRow>, error::SystemError> {
        let participants = sqlx::query_as::<_, ParticipantRow>(
            r#"
            SELECT
                p.user_id,
                u.username,
                u.display_name,
                u.avatar_url,
                p.participant_role,
                p.joined_at
            FROM room_participants p
            JOIN users u ON u.id = p.user_id
            WHERE p.room_id = $1
            ORDER BY p.joined_at
            "#,
        )
        .bind(room_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(participants)
    }

    async fn create_room_message(
        &self,
        room_id: &Uuid,
        sender_id: &Uuid,
        content: &str,
    ) -> Result<RoomMessageEntity, error::SystemError> {
        let id = Uuid::now_v7();
        let message = sqlx::query_as::<_, RoomMessageEntity>(
            r#"
            INSERT INTO room_messages (id, room_id, sender_id, content)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(room_id)
        .bind(sender_id)
        .bind(content)
        .fetch_one(&self.pool)
        .await?;

        Ok(message)
    }

    async fn list_room_messages(
        &self,
        room_id: &Uuid,
        before: Option<chrono::DateTime<chrono::Utc>>,
        limit: i64,
    ) -> Result<Vec<RoomMessageEntity>, error::SystemError> {
        let messages = sqlx::query_as::<_, RoomMessageEntity>(
            r#"
            SELECT * FROM room_messages
            WHERE room_id = $1
              AND ($2::timestamptz IS NULL OR created_at < $2)
            ORDER BY created_at DESC
            LIMIT $3
            "#,
        )
        .bind(room_id)
        .bind(before)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(messages)
    }

    async fn record_event(
        &self,
        room_id: &Uuid,
        actor_id: Option<&Uuid>,
        event_type: RoomEventType,
        detail: Option<serde_json::Value>,
    ) -> Result<RoomEventEntity, error::SystemError> {
        let id = Uuid::now_v7();
        let event = sqlx::query_as::<_, RoomEventEntity>(
            r#"
            INSERT INTO room_events (id, room_id, actor_id, event_type, detail)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(room_id)
        .bind(actor_id)
        .bind(&event_type)
        .bind(detail)
        .fetch_one(&self.pool)
        .await?;

        Ok(event)
    }

    async fn list_events(
        &self,
        room_id: &Uuid,
        limit: i64,
    ) -> Result<Vec<RoomEventEntity>, error::SystemError> {
        let events = sqlx::query_as::<_, RoomEventEntity>(
            r#"
            SELECT * FROM room_events
            WHERE room_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(room_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    async fn create_breakout(
        &self,
        room_password: &str,
        name: &str,
    ) -> Result<BreakoutRoomEntity, error::SystemError> {
        let id = Uuid::now_v7();
        let breakout = sqlx::query_as::<_, BreakoutRoomEntity>(
            r#"
            INSERT INTO breakout_rooms (id, room_password, name)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(room_password)
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        Ok(breakout)
    }

    async fn find_breakout(
        &self,
        id: &Uuid,
    ) -> Result<Option<BreakoutRoomEntity>, error::SystemError> {
        let breakout =
            sqlx::query_as::<_, BreakoutRoomEntity>("SELECT * FROM breakout_rooms WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(breakout)
    }

    async fn list_breakouts(
        &self,
        room_password: &str,
    ) -> Result<Vec<BreakoutRoomEntity>, error::SystemError> {
        let breakouts = sqlx::query_as::<_, BreakoutRoomEntity>(
            "SELECT * FROM breakout_rooms WHERE room_password = $1 ORDER BY created_at",
        )
        .bind(room_password)
        .fetch_all(&self.pool)
        .await?;

        Ok(breakouts)
    }

    async fn assign_breakout(
        &self,
        breakout_room_id: &Uuid,
        user_id: &Uuid,
    ) -> Result<(), error::SystemError> {
        sqlx::query(
            r#"
            INSERT INTO breakout_room_participants (breakout_room_id, user_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(breakout_room_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn unassign_breakout(
        &self,
        breakout_room_id: &Uuid,
        user_id: &Uuid,
    ) -> Result<bool, error::SystemError> {
        let rows = sqlx::query(
            "DELETE FROM breakout_room_participants WHERE breakout_room_id = $1 AND user_id = $2",
        )
        .bind(breakout_room_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(rows > 0)
    }

    async fn list_breakout_participants(
        &self,
        breakout_room_id: &Uuid,
    ) -> Result<Vec<BreakoutParticipantRow>, error::SystemError> {
        let participants = sqlx::query_as::<_, BreakoutParticipantRow>(
            r#"
            SELECT
                b.user_id,
                u.username,
                u.display_name,
                b.assigned_at
            FROM breakout_room_participants b
            JOIN users u ON u.id = b.user_id
            WHERE b.breakout_room_id = $1
            ORDER BY b.assigned_at
            "#,
        )
        .bind(breakout_room_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(participants)
    }
}
