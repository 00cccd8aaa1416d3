use uuid::Uuid;

use crate::api::error;
use crate::modules::poll::model::TallyRow;
use crate::modules::poll::schema::{PollOptionEntity, PollVoteEntity, RoomPollEntity};

#[async_trait::async_trait]
pub trait PollRepository {
    /// Insert the poll and its options in one transaction.
    async fn create_poll_atomic(
        &self,
        room_id: &Uuid,
        creator_id: &Uuid,
        question: &str,
        options: &[String],
    ) -> Result<(RoomPollEntity, Vec<PollOptionEntity>), error::SystemError>;

    async fn find_poll(&self, id: &Uuid) -> Result<Option<RoomPollEntity>, error::SystemError>;

    async fn list_polls(&self, room_id: &Uuid)
    -> Result<Vec<RoomPollEntity>, error::SystemError>;

    async fn list_options(
        &self,
        poll_id: &Uuid,
    ) -> Result<Vec<PollOptionEntity>, error::SystemError>;

    async fn find_option(
        &self,
        option_id: &Uuid,
    ) -> Result<Option<PollOptionEntity>, error::SystemError>;

    /// Stamp closed_at under FOR UPDATE; closing twice is an error.
    async fn close_poll_atomic(&self, id: &Uuid) -> Result<RoomPollEntity, error::SystemError>;

    /// The unique (poll_id, voter_id) index rejects double votes.
    async fn create_vote(
        &self,
        poll_id: &Uuid,
        option_id: &Uuid,
        voter_id: &Uuid,
    ) -> Result<PollVoteEntity, error::SystemError>;

    async fn find_vote(
        &self,
        poll_id: &Uuid,
        voter_id: &Uuid,
    ) -> Result<Option<PollVoteEntity>, error::SystemError>;

    async fn tally(&self, poll_id: &Uuid) -> Result<Vec<TallyRow>, error::SystemError>;
}
