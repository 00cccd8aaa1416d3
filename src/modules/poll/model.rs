use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::modules::poll::schema::{PollOptionEntity, RoomPollEntity};

#[derive(Deserialize, Validate)]
pub struct CreatePollBody {
    #[validate(length(min = 1, max = 500, message = "Question must be 1-500 characters"))]
    pub question: String,
    #[validate(length(min = 2, max = 10, message = "A poll needs 2-10 options"))]
    pub options: Vec<String>,
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct VoteBody {
    pub option_id: Uuid,
}

#[derive(Debug, Clone, Serialize)]
pub struct PollWithOptions {
    #[serde(flatten)]
    pub poll: RoomPollEntity,
    pub options: Vec<PollOptionEntity>,
}

#[derive(Debug, Clone, FromRow)]
pub struct TallyRow {
    pub option_id: Uuid,
    pub votes: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct OptionTally {
    #[serde(flatten)]
    pub option: PollOptionEntity,
    pub votes: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PollResults {
    #[serde(flatten)]
    pub poll: RoomPollEntity,
    pub options: Vec<OptionTally>,
    pub total_votes: i64,
}
