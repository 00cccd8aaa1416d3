use uuid::Uuid;

use crate::api::error;
use crate::modules::friend::model::{FriendRequestRow, FriendResponse};
use crate::modules::friend::schema::{FriendshipEntity, FriendshipStatus};

#[async_trait::async_trait]
pub trait FriendRepository {
    /// Relationship row between two users, in either direction.
    async fn find_between(
        &self,
        user_id_a: &Uuid,
        user_id_b: &Uuid,
    ) -> Result<Option<FriendshipEntity>, error::SystemError>;

    async fn find_by_id(
        &self,
        request_id: &Uuid,
    ) -> Result<Option<FriendshipEntity>, error::SystemError>;

    async fn find_friends(&self, user_id: &Uuid)
    -> Result<Vec<FriendResponse>, error::SystemError>;

    async fn find_pending_to(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<FriendRequestRow>, error::SystemError>;

    async fn find_pending_from(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<FriendRequestRow>, error::SystemError>;

    async fn create_request(
        &self,
        requester_id: &Uuid,
        addressee_id: &Uuid,
        message: &Option<String>,
    ) -> Result<FriendshipEntity, error::SystemError>;

    /// Flip a pending request to ACCEPTED/REJECTED, guarding that `user_id`
    /// is the addressee. Runs under FOR UPDATE. Returns the requester id.
    async fn respond_atomic(
        &self,
        request_id: &Uuid,
        user_id: &Uuid,
        status: FriendshipStatus,
    ) -> Result<Uuid, error::SystemError>;

    /// Drop an accepted friendship between two users, either direction.
    async fn delete_friendship(
        &self,
        user_id_a: &Uuid,
        user_id_b: &Uuid,
    ) -> Result<bool, error::SystemError>;

    async fn delete_request(&self, request_id: &Uuid) -> Result<(), error::SystemError>;
}
