use uuid::Uuid;

use crate::{
    api::error,
    modules::friend::{
        model::{FriendRequestRow, FriendResponse},
        repository::FriendRepository,
        schema::{FriendshipEntity, FriendshipStatus},
    },
};

#[derive(Clone)]
pub struct FriendRepositoryPg {
    pool: sqlx::PgPool,
}

impl FriendRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl FriendRepository for FriendRepositoryPg {
    async fn find_between(
        &self,
        user_id_a: &Uuid,
        user_id_b: &Uuid,
    ) -> Result<Option<FriendshipEntity>, error::SystemError> {
        let friendship = sqlx::query_as::<_, FriendshipEntity>(
            r#"
            SELECT *
            FROM friendships
            WHERE
                (requester_id = $1 AND addressee_id = $2)
             OR (requester_id = $2 AND addressee_id = $1)
            "#,
        )
        .bind(user_id_a)
        .bind(user_id_b)
        .fetch_optional(&self.pool)
        .await?;

        Ok(friendship)
    }

    async fn find_by_id(
        &self,
        request_id: &Uuid,
    ) -> Result<Option<FriendshipEntity>, error::SystemError> {
        let friendship =
            sqlx::query_as::<_, FriendshipEntity>("SELECT * FROM friendships WHERE id = $1")
                .bind(request_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(friendship)
    }

    async fn find_friends(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<FriendResponse>, error::SystemError> {
        let friends = sqlx::query_as::<_, FriendResponse>(
            r#"
        SELECT
            u.id,
            u.username,
            u.display_name,
            u.avatar_url
        FROM friendships f
        JOIN users u
            ON u.id = CASE
                WHEN f.requester_id = $1 THEN f.addressee_id
                ELSE f.requester_id
            END
        WHERE f.status = 'ACCEPTED'
          AND (f.requester_id = $1 OR f.addressee_id = $1)
          AND u.deleted_at IS NULL
        "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(friends)
    }

    async fn find_pending_to(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<FriendRequestRow>, error::SystemError> {
        let rows = sqlx::query_as::<_, FriendRequestRow>(
            r#"
            SELECT
                f.id AS req_id,
                u.id AS user_id,
                u.username,
                u.display_name,
                u.avatar_url,
                f.message,
                f.created_at
            FROM friendships f
            JOIN users u
                ON f.requester_id = u.id
            WHERE f.addressee_id = $1
              AND f.status = 'PENDING'
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn find_pending_from(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<FriendRequestRow>, error::SystemError> {
        let rows = sqlx::query_as::<_, FriendRequestRow>(
            r#"
            SELECT
                f.id AS req_id,
                u.id AS user_id,
                u.username,
                u.display_name,
                u.avatar_url,
                f.message,
                f.created_at
            FROM friendships f
            JOIN users u
                ON f.addressee_id = u.id
            WHERE f.requester_id = $1
              AND f.status = 'PENDING'
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn create_request(
        &self,
        requester_id: &Uuid,
        addressee_id: &Uuid,
        message: &Option<String>,
    ) -> Result<FriendshipEntity, error::SystemError> {
        let id = Uuid::now_v7();
        let friendship = sqlx::query_as::<_, FriendshipEntity>(
            r#"
            INSERT INTO friendships (id, requester_id, addressee_id, message)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(requester_id)
        .bind(addressee_id)
        .bind(message)
        .fetch_one(&self.pool)
        .await?;

        Ok(friendship)
    }

    async fn respond_atomic(
        &self,
        request_id: &Uuid,
        user_id: &Uuid,
        status: FriendshipStatus,
    ) -> Result<Uuid, error::SystemError> {
        let mut tx = self.pool.begin().await?;

        let request = sqlx::query_as::<_, FriendshipEntity>(
            "SELECT * FROM friendships WHERE id = $1 FOR UPDATE",
        )
        .bind(request_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| error::SystemError::not_found("Friend request not found"))?;

        if request.addressee_id != *user_id {
            tx.rollback().await?;
            return Err(error::SystemError::forbidden(
                "You are not allowed to answer this friend request",
            ));
        }

        if request.status != FriendshipStatus::Pending {
            tx.rollback().await?;
            return Err(error::SystemError::bad_request("Friend request already answered"));
        }

        sqlx::query("UPDATE friendships SET status = $2, responded_at = NOW() WHERE id = $1")
            .bind(request_id)
            .bind(&status)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(request.requester_id)
    }

    async fn delete_friendship(
        &self,
        user_id_a: &Uuid,
        user_id_b: &Uuid,
    ) -> Result<bool, error::SystemError> {
        let rows = sqlx::query(
            r#"
            DELETE FROM friendships
            WHERE status = 'ACCEPTED'
              AND (
                    (requester_id = $1 AND addressee_id = $2)
                 OR (requester_id = $2 AND addressee_id = $1)
              )
            "#,
        )
        .bind(user_id_a)
        .bind(user_id_b)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(rows > 0)
    }

    async fn delete_request(&self, request_id: &Uuid) -> Result<(), error::SystemError> {
        sqlx::query("DELETE FROM friendships WHERE id = $1")
            .bind(request_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
