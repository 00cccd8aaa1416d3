use std::sync::Arc;

use serde_json::json;
use uuid::Uuid;

use crate::{
    api::error,
    modules::{
        room::repository::RoomRepository,
        user::schema::UserRole,
        whiteboard::{
            model::{DrawActionBody, OpenSessionBody, ReplayQuery, SessionWithActions},
            repository::WhiteboardRepository,
            schema::{
                DrawActionEntity, DrawActionType, WhiteboardSessionEntity,
                WhiteboardTemplateEntity,
            },
        },
    },
};

const DEFAULT_REPLAY_PAGE: i64 = 500;
const MAX_REPLAY_PAGE: i64 = 2000;

#[derive(Clone)]
pub struct WhiteboardService {
    wb_repo: Arc<dyn WhiteboardRepository + Send + Sync>,
    room_repo: Arc<dyn RoomRepository + Send + Sync>,
}

impl WhiteboardService {
    pub fn with_dependencies(
        wb_repo: Arc<dyn WhiteboardRepository + Send + Sync>,
        room_repo: Arc<dyn RoomRepository + Send + Sync>,
    ) -> Self {
        WhiteboardService { wb_repo, room_repo }
    }

    pub async fn open_session(
        &self,
        user_id: Uuid,
        body: OpenSessionBody,
    ) -> Result<WhiteboardSessionEntity, error::SystemError> {
        if let Some(room_id) = &body.room_id {
            if self.room_repo.find_room(room_id).await?.is_none() {
                return Err(error::SystemError::not_found("Room not found"));
            }
            self.require_room_participant(room_id, &user_id).await?;
        }

        self.wb_repo.create_session(&user_id, body.room_id.as_ref(), &body.title).await
    }

    pub async fn append_action(
        &self,
        user_id: Uuid,
        session_id: Uuid,
        body: DrawActionBody,
    ) -> Result<DrawActionEntity, error::SystemError> {
        let session = self.require_session(&session_id).await?;

        if session.is_closed() {
            return Err(error::SystemError::bad_request("Whiteboard session is closed"));
        }

        self.require_can_draw(&session, &user_id).await?;

        self.wb_repo
            .append_action_atomic(&session_id, &user_id, body.action_type, body.payload)
            .await
    }

    /// Clearing keeps the history: it is just another action in the log.
    pub async fn clear_board(
        &self,
        user_id: Uuid,
        session_id: Uuid,
    ) -> Result<DrawActionEntity, error::SystemError> {
        self.append_action(
            user_id,
            session_id,
            DrawActionBody { action_type: DrawActionType::Clear, payload: json!({}) },
        )
        .await
    }

    pub async fn replay(
        &self,
        user_id: Uuid,
        session_id: Uuid,
        query: ReplayQuery,
    ) -> Result<Vec<DrawActionEntity>, error::SystemError> {
        let session = self.require_session(&session_id).await?;
        self.require_can_draw(&session, &user_id).await?;

        let after_seq = query.since.unwrap_or(0).max(0);
        let limit = query.limit.unwrap_or(DEFAULT_REPLAY_PAGE).clamp(1, MAX_REPLAY_PAGE);

        self.wb_repo.list_actions_since(&session_id, after_seq, limit).await
    }

    pub async fn close_session(
        &self,
        user_id: Uuid,
        session_id: Uuid,
    ) -> Result<(), error::SystemError> {
        let session = self.require_session(&session_id).await?;

        if session.owner_id != user_id {
            return Err(error::SystemError::forbidden("Only the owner may close the session"));
        }

        let closed = self.wb_repo.close_session(&session_id).await?;
        if !closed {
            return Err(error::SystemError::bad_request("Session already closed"));
        }
        Ok(())
    }

    pub async fn list_my_sessions(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<WhiteboardSessionEntity>, error::SystemError> {
        self.wb_repo.list_sessions_for_owner(&user_id).await
    }

    pub async fn list_room_sessions(
        &self,
        user_id: Uuid,
        room_id: Uuid,
    ) -> Result<Vec<WhiteboardSessionEntity>, error::SystemError> {
        self.require_room_participant(&room_id, &user_id).await?;
        self.wb_repo.list_sessions_for_room(&room_id).await
    }

    // ---- templates ----

    pub async fn create_template(
        &self,
        user_id: Uuid,
        name: &str,
        content: serde_json::Value,
    ) -> Result<WhiteboardTemplateEntity, error::SystemError> {
        self.wb_repo.create_template(name, Some(&user_id), &content).await
    }

    pub async fn list_templates(
        &self,
    ) -> Result<Vec<WhiteboardTemplateEntity>, error::SystemError> {
        self.wb_repo.list_templates().await
    }

    pub async fn get_template(
        &self,
        template_id: Uuid,
    ) -> Result<WhiteboardTemplateEntity, error::SystemError> {
        self.wb_repo
            .find_template(&template_id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Template not found"))
    }

    pub async fn delete_template(
        &self,
        user_id: Uuid,
        role: UserRole,
        template_id: Uuid,
    ) -> Result<(), error::SystemError> {
        let template = self.get_template(template_id).await?;

        if template.owner_id != Some(user_id) && role != UserRole::Admin {
            return Err(error::SystemError::forbidden(
                "Only the template owner or an admin may delete it",
            ));
        }

        self.wb_repo.delete_template(&template_id).await?;
        Ok(())
    }

    /// New session seeded with the template content as its first action.
    pub async fn instantiate_template(
        &self,
        user_id: Uuid,
        template_id: Uuid,
        room_id: Option<Uuid>,
        title: &str,
    ) -> Result<SessionWithActions, error::SystemError> {
        let template = self.get_template(template_id).await?;

        let session = self
            .open_session(user_id, OpenSessionBody { room_id, title: title.to_string() })
            .await?;

        let seed = self
            .wb_repo
            .append_action_atomic(
                &session.id,
                &user_id,
                DrawActionType::Shape,
                template.content,
            )
            .await?;

        Ok(SessionWithActions { session, actions: vec![seed] })
    }

    async fn require_session(
        &self,
        session_id: &Uuid,
    ) -> Result<WhiteboardSessionEntity, error::SystemError> {
        self.wb_repo
            .find_session(session_id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Whiteboard session not found"))
    }

    async fn require_room_participant(
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

    /// Room-bound boards are open to every room participant; personal
    /// boards only to their owner.
    async fn require_can_draw(
        &self,
        session: &WhiteboardSessionEntity,
        user_id: &Uuid,
    ) -> Result<(), error::SystemError> {
        if session.owner_id == *user_id {
            return Ok(());
        }

        match &session.room_id {
            Some(room_id) => self.require_room_participant(room_id, user_id).await,
            None => Err(error::SystemError::forbidden("Not allowed to use this whiteboard")),
        }
    }
}
