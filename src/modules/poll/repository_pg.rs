use uuid::Uuid;

use crate::{
    api::error,
    modules::poll::{
        model::TallyRow,
        repository::PollRepository,
        schema::{PollOptionEntity, PollVoteEntity, RoomPollEntity},
    },
};

#[derive(Clone)]
pub struct PollRepositoryPg {
    pool: sqlx::PgPool,
}

impl PollRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl PollRepository for PollRepositoryPg {
    async fn create_poll_atomic(
        &self,
        room_id: &Uuid,
        creator_id: &Uuid,
        question: &str,
        options: &[String],
    ) -> Result<(RoomPollEntity, Vec<PollOptionEntity>), error::SystemError> {
        let mut tx = self.pool.begin().await?;

        let id = Uuid::now_v7();
        let poll = sqlx::query_as::<_, RoomPollEntity>(
            r#"
            INSERT INTO room_polls (id, room_id, creator_id, question)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(room_id)
        .bind(creator_id)
        .bind(question)
        .fetch_one(&mut *tx)
        .await?;

        let mut rows = Vec::with_capacity(options.len());
        for (position, label) in options.iter().enumerate() {
            let option = sqlx::query_as::<_, PollOptionEntity>(
                r#"
                INSERT INTO poll_options (id, poll_id, label, position)
                VALUES ($1, $2, $3, $4)
                RETURNING *
                "#,
            )
            .bind(Uuid::now_v7())
            .bind(poll.id)
            .bind(label)
            .bind(position as i32)
            .fetch_one(&mut *tx)
            .await?;
            rows.push(option);
        }

        tx.commit().await?;

        Ok((poll, rows))
    }

    async fn find_poll(&self, id: &Uuid) -> Result<Option<RoomPollEntity>, error::SystemError> {
        let poll = sqlx::query_as::<_, RoomPollEntity>("SELECT * FROM room_polls WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(poll)
    }

    async fn list_polls(
        &self,
        room_id: &Uuid,
    ) -> Result<Vec<RoomPollEntity>, error::SystemError> {
        let polls = sqlx::query_as::<_, RoomPollEntity>(
            "SELECT * FROM room_polls WHERE room_id = $1 ORDER BY created_at DESC",
        )
        .bind(room_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(polls)
    }

    async fn list_options(
        &self,
        poll_id: &Uuid,
    ) -> Result<Vec<PollOptionEntity>, error::SystemError> {
        let options = sqlx::query_as::<_, PollOptionEntity>(
            "SELECT * FROM poll_options WHERE poll_id = $1 ORDER BY position",
        )
        .bind(poll_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(options)
    }

    async fn find_option(
        &self,
        option_id: &Uuid,
    ) -> Result<Option<PollOptionEntity>, error::SystemError> {
        let option =
            sqlx::query_as::<_, PollOptionEntity>("SELECT * FROM poll_options WHERE id = $1")
                .bind(option_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(option)
    }

    async fn close_poll_atomic(&self, id: &Uuid) -> Result<RoomPollEntity, error::SystemError> {
        let mut tx = self.pool.begin().await?;

        let poll = sqlx::query_as::<_, RoomPollEntity>(
            "SELECT * FROM room_polls WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| error::SystemError::not_found("Poll not found"))?;

        if poll.closed_at.is_some() {
            tx.rollback().await?;
            return Err(error::SystemError::bad_request("Poll already closed"));
        }

        let poll = sqlx::query_as::<_, RoomPollEntity>(
            "UPDATE room_polls SET closed_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(poll)
    }

    async fn create_vote(
        &self,
        poll_id: &Uuid,
        option_id: &Uuid,
        voter_id: &Uuid,
    ) -> Result<PollVoteEntity, error::SystemError> {
        let id = Uuid::now_v7();
        let vote = sqlx::query_as::<_, PollVoteEntity>(
            r#"
            INSERT INTO poll_votes (id, poll_id, option_id, voter_id)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(poll_id)
        .bind(option_id)
        .bind(voter_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(vote)
    }

    async fn find_vote(
        &self,
        poll_id: &Uuid,
        voter_id: &Uuid,
    ) -> Result<Option<PollVoteEntity>, error::SystemError> {
        let vote = sqlx::query_as::<_, PollVoteEntity>(
            "SELECT * FROM poll_votes WHERE poll_id = $1 AND voter_id = $2",
        )
        .bind(poll_id)
        .bind(voter_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(vote)
    }

    async fn tally(&self, poll_id: &Uuid) -> Result<Vec<TallyRow>, error::SystemError> {
        let rows = sqlx::query_as::<_, TallyRow>(
            r#"
            SELECT option_id, COUNT(*) AS votes
            FROM poll_votes
            WHERE poll_id = $1
            GROUP BY option_id
            "#,
        )
        .bind(poll_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
