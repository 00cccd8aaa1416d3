use uuid::Uuid;

use crate::api::error;
use crate::modules::room::model::{BreakoutParticipantRow, ParticipantRow};
use crate::modules::room::schema::{
    BreakoutRoomEntity, ParticipantRole, RoomEventEntity, RoomEventType, RoomMessageEntity,
    RoomParticipantEntity, VideoRoomEntity,
};

#[async_trait::async_trait]
pub trait RoomRepository {
    /// Insert the room and its HOST participant in one transaction.
    /// Fails with Conflict when the password is already taken.
    async fn create_room_atomic(
        &self,
        name: &str,
        password: &str,
        host_id: &Uuid,
    ) -> Result<VideoRoomEntity, error::SystemError>;

    async fn find_room(&self, id: &Uuid) -> Result<Option<VideoRoomEntity>, error::SystemError>;

    async fn find_room_by_password(
        &self,
        password: &str,
    ) -> Result<Option<VideoRoomEntity>, error::SystemError>;

    async fn deactivate_room(&self, id: &Uuid) -> Result<bool, error::SystemError>;

    async fn find_participant(
        &self,
        room_id: &Uuid,
        user_id: &Uuid,
    ) -> Result<Option<RoomParticipantEntity>, error::SystemError>;

    async fn add_participant(
        &self,
        room_id: &Uuid,
        user_id: &Uuid,
        role: ParticipantRole,
    ) -> Result<RoomParticipantEntity, error::SystemError>;

    async fn remove_participant(
        &self,
        room_id: &Uuid,
        user_id: &Uuid,
    ) -> Result<bool, error::SystemError>;

    async fn list_participants(
        &self,
        room_id: &Uuid,
    ) -> Result<Vec<ParticipantRow>, error::SystemError>;

    async fn create_room_message(
        &self,
        room_id: &Uuid,
        sender_id: &Uuid,
        content: &str,
    ) -> Result<RoomMessageEntity, error::SystemError>;

    async fn list_room_messages(
        &self,
        room_id: &Uuid,
        before: Option<chrono::DateTime<chrono::Utc>>,
        limit: i64,
    ) -> Result<Vec<RoomMessageEntity>, error::SystemError>;

    async fn record_event(
        &self,
        room_id: &Uuid,
        actor_id: Option<&Uuid>,
        event_type: RoomEventType,
        detail: Option<serde_json::Value>,
    ) -> Result<RoomEventEntity, error::SystemError>;

    async fn list_events(
        &self,
        room_id: &Uuid,
        limit: i64,
    ) -> Result<Vec<RoomEventEntity>, error::SystemError>;

    async fn create_breakout(
        &self,
        room_password: &str,
        name: &str,
    ) -> Result<BreakoutRoomEntity, error::SystemError>;

    async fn find_breakout(
        &self,
        id: &Uuid,
    ) -> Result<Option<BreakoutRoomEntity>, error::SystemError>;

    async fn list_breakouts(
        &self,
        room_password: &str,
    ) -> Result<Vec<BreakoutRoomEntity>, error::SystemError>;

    async fn assign_breakout(
        &self,
        breakout_room_id: &Uuid,
        user_id: &Uuid,
    ) -> Result<(), error::SystemError>;

    async fn unassign_breakout(
        &self,
        breakout_room_id: &Uuid,
        user_id: &Uuid,
    ) -> Result<bool, error::SystemError>;

    async fn list_breakout_participants(
        &self,
        breakout_room_id: &Uuid,
    ) -> Result<Vec<BreakoutParticipantRow>, error::SystemError>;
}
