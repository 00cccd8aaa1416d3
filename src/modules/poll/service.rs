use std::collections::HashMap;
use std::sync::Arc;

use serde_json::json;
use uuid::Uuid;

use crate::{
    api::error,
    modules::{
        poll::{
            model::{CreatePollBody, OptionTally, PollResults, PollWithOptions, TallyRow},
            repository::PollRepository,
            schema::{PollOptionEntity, PollVoteEntity, RoomPollEntity},
        },
        room::{
            repository::RoomRepository,
            schema::{ParticipantRole, RoomEventType},
        },
    },
};

#[derive(Clone)]
pub struct PollService {
    poll_repo: Arc<dyn PollRepository + Send + Sync>,
    room_repo: Arc<dyn RoomRepository + Send + Sync>,
}

impl PollService {
    pub fn with_dependencies(
        poll_repo: Arc<dyn PollRepository + Send + Sync>,
        room_repo: Arc<dyn RoomRepository + Send + Sync>,
    ) -> Self {
        PollService { poll_repo, room_repo }
    }

    pub async fn create_poll(
        &self,
        user_id: Uuid,
        room_id: Uuid,
        body: CreatePollBody,
    ) -> Result<PollWithOptions, error::SystemError> {
        let room = self
            .room_repo
            .find_room(&room_id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Room not found"))?;

        if !room.is_active {
            return Err(error::SystemError::bad_request("Room has ended"));
        }

        self.require_participant(&room_id, &user_id).await?;

        if body.options.iter().any(|o| o.trim().is_empty()) {
            return Err(error::SystemError::bad_request("Option labels cannot be empty"));
        }

        let (poll, options) = self
            .poll_repo
            .create_poll_atomic(&room_id, &user_id, &body.question, &body.options)
            .await?;

        self.room_repo
            .record_event(
                &room_id,
                Some(&user_id),
                RoomEventType::PollOpened,
                Some(json!({ "poll_id": poll.id })),
            )
            .await?;

        Ok(PollWithOptions { poll, options })
    }

    pub async fn close_poll(
        &self,
        user_id: Uuid,
        poll_id: Uuid,
    ) -> Result<RoomPollEntity, error::SystemError> {
        let poll = self.require_poll(&poll_id).await?;

        if poll.creator_id != user_id {
            self.require_moderator(&poll.room_id, &user_id).await?;
        }

        let poll = self.poll_repo.close_poll_atomic(&poll_id).await?;

        self.room_repo
            .record_event(
                &poll.room_id,
                Some(&user_id),
                RoomEventType::PollClosed,
                Some(json!({ "poll_id": poll.id })),
            )
            .await?;

        Ok(poll)
    }

    pub async fn vote(
        &self,
        user_id: Uuid,
        poll_id: Uuid,
        option_id: Uuid,
    ) -> Result<PollVoteEntity, error::SystemError> {
        let poll = self.require_poll(&poll_id).await?;

        if poll.is_closed() {
            return Err(error::SystemError::bad_request("Poll is closed"));
        }

        self.require_participant(&poll.room_id, &user_id).await?;

        let option = self
            .poll_repo
            .find_option(&option_id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Option not found"))?;

        if option.poll_id != poll_id {
            return Err(error::SystemError::bad_request("Option belongs to another poll"));
        }

        if self.poll_repo.find_vote(&poll_id, &user_id).await?.is_some() {
            return Err(error::SystemError::bad_request("Already voted on this poll"));
        }

        // the unique (poll_id, voter_id) index still backs the race
        self.poll_repo.create_vote(&poll_id, &option_id, &user_id).await
    }

    pub async fn results(
        &self,
        user_id: Uuid,
        poll_id: Uuid,
    ) -> Result<PollResults, error::SystemError> {
        let poll = self.require_poll(&poll_id).await?;
        self.require_participant(&poll.room_id, &user_id).await?;

        let (options, tallies) = tokio::try_join!(
            self.poll_repo.list_options(&poll_id),
            self.poll_repo.tally(&poll_id),
        )?;

        Ok(merge_results(poll, options, tallies))
    }

    pub async fn list_polls(
        &self,
        user_id: Uuid,
        room_id: Uuid,
    ) -> Result<Vec<PollWithOptions>, error::SystemError> {
        self.require_participant(&room_id, &user_id).await?;

        let polls = self.poll_repo.list_polls(&room_id).await?;

        let mut out = Vec::with_capacity(polls.len());
        for poll in polls {
            let options = self.poll_repo.list_options(&poll.id).await?;
            out.push(PollWithOptions { poll, options });
        }

        Ok(out)
    }

    async fn require_poll(&self, poll_id: &Uuid) -> Result<RoomPollEntity, error::SystemError> {
        self.poll_repo
            .find_poll(poll_id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Poll not found"))
    }

    async fn require_participant(
        &self,
        room_id: &Uuid,
        user_id: &Uuid,
    ) -> Result<(), error::SystemError> {
        self.room_repo
            .find_participant(room_id, user_id)
            .await?
            .ok_or_else(|| error::SystemError::forbidden("Not a participant of this room"))?;
        Ok(())
    }

    async fn require_moderator(
        &self,
        room_id: &Uuid,
        user_id: &Uuid,
    ) -> Result<(), error::SystemError> {
        let participant = self
            .room_repo
            .find_participant(room_id, user_id)
            .await?
            .ok_or_else(|| error::SystemError::forbidden("Not a participant of this room"))?;

        if participant.participant_role == ParticipantRole::Attendee {
            return Err(error::SystemError::forbidden("Requires host or cohost"));
        }
        Ok(())
    }
}

/// Zip options with their vote counts; options nobody picked count zero.
fn merge_results(
    poll: RoomPollEntity,
    options: Vec<PollOptionEntity>,
    tallies: Vec<TallyRow>,
) -> PollResults {
    let counts: HashMap<Uuid, i64> = tallies.into_iter().map(|t| (t.option_id, t.votes)).collect();

    let options: Vec<OptionTally> = options
        .into_iter()
        .map(|option| {
            let votes = counts.get(&option.id).copied().unwrap_or(0);
            OptionTally { option, votes }
        })
        .collect();

    let total_votes = options.iter().map(|o| o.votes).sum();

    PollResults { poll, options, total_votes }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn poll() -> RoomPollEntity {
        RoomPollEntity {
            id: Uuid::now_v7(),
            room_id: Uuid::now_v7(),
            creator_id: Uuid::now_v7(),
            question: "Lunch?".into(),
            closed_at: None,
            created_at: chrono::Utc::now(),
        }
    }

    fn option(poll_id: Uuid, label: &str, position: i32) -> PollOptionEntity {
        PollOptionEntity { id: Uuid::now_v7(), poll_id, label: label.into(), position }
    }

    #[test]
    fn merge_counts_and_zero_fills() {
        let p = poll();
        let a = option(p.id, "Pizza", 0);
        let b = option(p.id, "Sushi", 1);
        let c = option(p.id, "Salad", 2);

        let tallies =
            vec![TallyRow { option_id: a.id, votes: 3 }, TallyRow { option_id: c.id, votes: 1 }];

        let results = merge_results(p, vec![a.clone(), b.clone(), c.clone()], tallies);

        assert_eq!(results.total_votes, 4);
        assert_eq!(results.options[0].votes, 3);
        assert_eq!(results.options[1].votes, 0);
        assert_eq!(results.options[2].votes, 1);
    }

    #[test]
    fn merge_keeps_option_order() {
        let p = poll();
        let a = option(p.id, "First", 0);
        let b = option(p.id, "Second", 1);

        let results = merge_results(p, vec![a.clone(), b.clone()], Vec::new());

        assert_eq!(results.options[0].option.id, a.id);
        assert_eq!(results.options[1].option.id, b.id);
        assert_eq!(results.total_votes, 0);
    }
}
