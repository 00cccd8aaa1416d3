use std::sync::Arc;

use log::{info, warn};
use serde_json::json;
use uuid::Uuid;

use crate::{
    api::error,
    constants::ROOM_PASSWORD_LEN,
    modules::room::{
        model::{
            BreakoutWithParticipants, EventQuery, ParticipantRow, RoomMessageQuery,
            RoomMessagesResponse,
        },
        repository::RoomRepository,
        schema::{
            ParticipantRole, RoomEventEntity, RoomEventType, RoomMessageEntity,
            RoomParticipantEntity, VideoRoomEntity,
        },
    },
    utils::generate_join_password,
};

const PASSWORD_RETRIES: usize = 5;
const DEFAULT_PAGE: i64 = 50;
const MAX_PAGE: i64 = 100;

#[derive(Clone)]
pub struct RoomService {
    repo: Arc<dyn RoomRepository + Send + Sync>,
}

impl RoomService {
    pub fn with_dependencies(repo: Arc<dyn RoomRepository + Send + Sync>) -> Self {
        RoomService { repo }
    }

    pub async fn create_room(
        &self,
        host_id: Uuid,
        name: &str,
    ) -> Result<VideoRoomEntity, error::SystemError> {
        // the unique index on password is the arbiter; collide -> regenerate
        let mut last_err = None;
        for _ in 0..PASSWORD_RETRIES {
            let password = generate_join_password(ROOM_PASSWORD_LEN);
            match self.repo.create_room_atomic(name, &password, &host_id).await {
                Ok(room) => {
                    info!("Room {} created by {}", room.id, host_id);
                    return Ok(room);
                }
                Err(error::SystemError::Conflict(meta)) => {
                    warn!("Join password collision, retrying");
                    last_err = Some(error::SystemError::Conflict(meta));
                }
                Err(e) => return Err(e),
            }
        }
        Err(last_err.unwrap_or_else(|| error::SystemError::Conflict(None)))
    }

    pub async fn get_room(&self, room_id: Uuid) -> Result<VideoRoomEntity, error::SystemError> {
        self.repo
            .find_room(&room_id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Room not found"))
    }

    /// Pre-join lookup by the join credential.
    pub async fn get_room_by_password(
        &self,
        password: &str,
    ) -> Result<VideoRoomEntity, error::SystemError> {
        self.repo
            .find_room_by_password(password)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Room not found"))
    }

    pub async fn join_room(
        &self,
        user_id: Uuid,
        password: &str,
    ) -> Result<RoomParticipantEntity, error::SystemError> {
        let room = self
            .repo
            .find_room_by_password(password)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Room not found"))?;

        if !room.is_active {
            return Err(error::SystemError::bad_request("Room has ended"));
        }

        if let Some(existing) = self.repo.find_participant(&room.id, &user_id).await? {
            return Ok(existing);
        }

        let participant =
            self.repo.add_participant(&room.id, &user_id, ParticipantRole::Attendee).await?;

        self.repo.record_event(&room.id, Some(&user_id), RoomEventType::Joined, None).await?;

        Ok(participant)
    }

    pub async fn leave_room(&self, user_id: Uuid, room_id: Uuid) -> Result<(), error::SystemError> {
        let removed = self.repo.remove_participant(&room_id, &user_id).await?;
        if !removed {
            return Err(error::SystemError::not_found("Not a participant of this room"));
        }

        self.repo.record_event(&room_id, Some(&user_id), RoomEventType::Left, None).await?;

        Ok(())
    }

    pub async fn end_room(&self, user_id: Uuid, room_id: Uuid) -> Result<(), error::SystemError> {
        let room = self.get_room(room_id).await?;

        if room.host_id != user_id {
            return Err(error::SystemError::forbidden("Only the host may end the room"));
        }

        let ended = self.repo.deactivate_room(&room_id).await?;
        if !ended {
            return Err(error::SystemError::bad_request("Room already ended"));
        }

        self.repo.record_event(&room_id, Some(&user_id), RoomEventType::RoomEnded, None).await?;

        Ok(())
    }

    pub async fn get_participants(
        &self,
        user_id: Uuid,
        room_id: Uuid,
    ) -> Result<Vec<ParticipantRow>, error::SystemError> {
        self.require_participant(&room_id, &user_id).await?;
        self.repo.list_participants(&room_id).await
    }

    pub async fn post_message(
        &self,
        user_id: Uuid,
        room_id: Uuid,
        content: &str,
    ) -> Result<RoomMessageEntity, error::SystemError> {
        let room = self.get_room(room_id).await?;
        if !room.is_active {
            return Err(error::SystemError::bad_request("Room has ended"));
        }

        self.require_participant(&room_id, &user_id).await?;
        self.repo.create_room_message(&room_id, &user_id, content).await
    }

    pub async fn get_messages(
        &self,
        user_id: Uuid,
        room_id: Uuid,
        query: RoomMessageQuery,
    ) -> Result<RoomMessagesResponse, error::SystemError> {
        self.require_participant(&room_id, &user_id).await?;

        let limit = query.limit.unwrap_or(DEFAULT_PAGE).clamp(1, MAX_PAGE);
        let messages = self.repo.list_room_messages(&room_id, query.before, limit).await?;

        let cursor = if messages.len() as i64 == limit {
            messages.last().map(|m| m.created_at.to_rfc3339())
        } else {
            None
        };

        Ok(RoomMessagesResponse { messages, cursor })
    }

    pub async fn get_events(
        &self,
        user_id: Uuid,
        room_id: Uuid,
        query: EventQuery,
    ) -> Result<Vec<RoomEventEntity>, error::SystemError> {
        self.require_moderator(&room_id, &user_id).await?;
        let limit = query.limit.unwrap_or(100).clamp(1, 500);
        self.repo.list_events(&room_id, limit).await
    }

    pub async fn open_breakouts(
        &self,
        user_id: Uuid,
        room_id: Uuid,
        names: &[String],
    ) -> Result<Vec<BreakoutWithParticipants>, error::SystemError> {
        let room = self.get_room(room_id).await?;
        if !room.is_active {
            return Err(error::SystemError::bad_request("Room has ended"));
        }

        self.require_moderator(&room_id, &user_id).await?;

        if names.iter().any(|n| n.trim().is_empty()) {
            return Err(error::SystemError::bad_request("Breakout name cannot be empty"));
        }

        let mut out = Vec::with_capacity(names.len());
        for name in names {
            let breakout = self.repo.create_breakout(&room.password, name).await?;
            out.push(BreakoutWithParticipants { breakout, participants: Vec::new() });
        }

        self.repo
            .record_event(
                &room_id,
                Some(&user_id),
                RoomEventType::BreakoutOpened,
                Some(json!({ "count": names.len() })),
            )
            .await?;

        Ok(out)
    }

    pub async fn assign_to_breakout(
        &self,
        actor_id: Uuid,
        breakout_id: Uuid,
        user_id: Uuid,
    ) -> Result<(), error::SystemError> {
        let (room, _) = self.require_breakout_room(&breakout_id).await?;

        self.require_moderator(&room.id, &actor_id).await?;

        if self.repo.find_participant(&room.id, &user_id).await?.is_none() {
            return Err(error::SystemError::bad_request(
                "User is not a participant of the parent room",
            ));
        }

        self.repo.assign_breakout(&breakout_id, &user_id).await
    }

    pub async fn unassign_from_breakout(
        &self,
        actor_id: Uuid,
        breakout_id: Uuid,
        user_id: Uuid,
    ) -> Result<(), error::SystemError> {
        let (room, _) = self.require_breakout_room(&breakout_id).await?;

        if actor_id != user_id {
            self.require_moderator(&room.id, &actor_id).await?;
        }

        let removed = self.repo.unassign_breakout(&breakout_id, &user_id).await?;
        if !removed {
            return Err(error::SystemError::not_found("User is not in this breakout room"));
        }
        Ok(())
    }

    pub async fn get_breakouts(
        &self,
        user_id: Uuid,
        room_id: Uuid,
    ) -> Result<Vec<BreakoutWithParticipants>, error::SystemError> {
        let room = self.get_room(room_id).await?;
        self.require_participant(&room_id, &user_id).await?;

        let breakouts = self.repo.list_breakouts(&room.password).await?;

        let mut out = Vec::with_capacity(breakouts.len());
        for breakout in breakouts {
            let participants = self.repo.list_breakout_participants(&breakout.id).await?;
            out.push(BreakoutWithParticipants { breakout, participants });
        }

        Ok(out)
    }

    async fn require_participant(
        &self,
        room_id: &Uuid,
        user_id: &Uuid,
    ) -> Result<RoomParticipantEntity, error::SystemError> {
        self.repo
            .find_participant(room_id, user_id)
            .await?
            .ok_or_else(|| error::SystemError::forbidden("Not a participant of this room"))
    }

    async fn require_moderator(
        &self,
        room_id: &Uuid,
        user_id: &Uuid,
    ) -> Result<(), error::SystemError> {
        let participant = self.require_participant(room_id, user_id).await?;
        if participant.participant_role == ParticipantRole::Attendee {
            return Err(error::SystemError::forbidden("Requires host or cohost"));
        }
        Ok(())
    }

    async fn require_breakout_room(
        &self,
        breakout_id: &Uuid,
    ) -> Result<(VideoRoomEntity, Uuid), error::SystemError> {
        let breakout = self
            .repo
            .find_breakout(breakout_id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Breakout room not found"))?;

        let room = self
            .repo
            .find_room_by_password(&breakout.room_password)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Parent room not found"))?;

        Ok((room, breakout.id))
    }
}
