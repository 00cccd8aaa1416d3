use uuid::Uuid;

use crate::api::error;
use crate::modules::whiteboard::schema::{
    DrawActionEntity, DrawActionType, WhiteboardSessionEntity, WhiteboardTemplateEntity,
};

#[async_trait::async_trait]
pub trait WhiteboardRepository {
    async fn create_session(
        &self,
        owner_id: &Uuid,
        room_id: Option<&Uuid>,
        title: &str,
    ) -> Result<WhiteboardSessionEntity, error::SystemError>;

    async fn find_session(
        &self,
        id: &Uuid,
    ) -> Result<Option<WhiteboardSessionEntity>, error::SystemError>;

    async fn close_session(&self, id: &Uuid) -> Result<bool, error::SystemError>;

    async fn list_sessions_for_owner(
        &self,
        owner_id: &Uuid,
    ) -> Result<Vec<WhiteboardSessionEntity>, error::SystemError>;

    async fn list_sessions_for_room(
        &self,
        room_id: &Uuid,
    ) -> Result<Vec<WhiteboardSessionEntity>, error::SystemError>;

    /// Append with the next per-session seq, assigned under the session's
    /// row lock so concurrent drawers cannot collide.
    async fn append_action_atomic(
        &self,
        session_id: &Uuid,
        user_id: &Uuid,
        action_type: DrawActionType,
        payload: serde_json::Value,
    ) -> Result<DrawActionEntity, error::SystemError>;

    async fn list_actions_since(
        &self,
        session_id: &Uuid,
        after_seq: i64,
        limit: i64,
    ) -> Result<Vec<DrawActionEntity>, error::SystemError>;

    async fn create_template(
        &self,
        name: &str,
        owner_id: Option<&Uuid>,
        content: &serde_json::Value,
    ) -> Result<WhiteboardTemplateEntity, error::SystemError>;

    async fn find_template(
        &self,
        id: &Uuid,
    ) -> Result<Option<WhiteboardTemplateEntity>, error::SystemError>;

    async fn list_templates(&self)
    -> Result<Vec<WhiteboardTemplateEntity>, error::SystemError>;

    async fn delete_template(&self, id: &Uuid) -> Result<bool, error::SystemError>;
}
