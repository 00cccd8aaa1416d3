use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::modules::whiteboard::schema::{
    DrawActionEntity, DrawActionType, WhiteboardSessionEntity,
};

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OpenSessionBody {
    pub room_id: Option<Uuid>,
    #[validate(length(min = 1, max = 100, message = "Title must be 1-100 characters"))]
    pub title: String,
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DrawActionBody {
    pub action_type: DrawActionType,
    pub payload: serde_json::Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReplayQuery {
    pub since: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Deserialize, Validate)]
pub struct CreateTemplateBody {
    #[validate(length(min = 1, max = 100, message = "Template name must be 1-100 characters"))]
    pub name: String,
    pub content: serde_json::Value,
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct InstantiateTemplateBody {
    pub room_id: Option<Uuid>,
    #[validate(length(min = 1, max = 100, message = "Title must be 1-100 characters"))]
    pub title: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionWithActions {
    #[serde(flatten)]
    pub session: WhiteboardSessionEntity,
    pub actions: Vec<DrawActionEntity>,
}
