use uuid::Uuid;

use crate::api::error;
use crate::modules::call::model::AttendanceRow;
use crate::modules::call::schema::{
    AttendanceEntity, CallSessionEntity, CallTranscriptEntity, RecordingEntity, SubtitleEntity,
};

#[async_trait::async_trait]
pub trait CallRepository {
    async fn create_session(
        &self,
        room_id: &Uuid,
        parent_session_id: Option<&Uuid>,
    ) -> Result<CallSessionEntity, error::SystemError>;

    async fn find_session(
        &self,
        id: &Uuid,
    ) -> Result<Option<CallSessionEntity>, error::SystemError>;

    /// Stamp ended_at under FOR UPDATE; double-ending is an error.
    async fn end_session_atomic(
        &self,
        id: &Uuid,
    ) -> Result<CallSessionEntity, error::SystemError>;

    async fn list_sessions_for_room(
        &self,
        room_id: &Uuid,
    ) -> Result<Vec<CallSessionEntity>, error::SystemError>;

    async fn find_open_attendance(
        &self,
        session_id: &Uuid,
        user_id: &Uuid,
    ) -> Result<Option<AttendanceEntity>, error::SystemError>;

    async fn open_attendance(
        &self,
        session_id: &Uuid,
        user_id: &Uuid,
    ) -> Result<AttendanceEntity, error::SystemError>;

    /// Set left_at on the user's open attendance row.
    async fn close_attendance(
        &self,
        session_id: &Uuid,
        user_id: &Uuid,
    ) -> Result<bool, error::SystemError>;

    async fn list_attendance(
        &self,
        session_id: &Uuid,
    ) -> Result<Vec<AttendanceRow>, error::SystemError>;

    async fn create_recording(
        &self,
        room_id: &Uuid,
        session_id: Option<&Uuid>,
        file_url: &str,
        duration_seconds: Option<i32>,
    ) -> Result<RecordingEntity, error::SystemError>;

    async fn list_recordings(
        &self,
        room_id: &Uuid,
    ) -> Result<Vec<RecordingEntity>, error::SystemError>;

    async fn create_transcript(
        &self,
        session_id: &Uuid,
        language: &str,
    ) -> Result<CallTranscriptEntity, error::SystemError>;

    async fn find_transcript(
        &self,
        id: &Uuid,
    ) -> Result<Option<CallTranscriptEntity>, error::SystemError>;

    async fn list_transcripts(
        &self,
        session_id: &Uuid,
    ) -> Result<Vec<CallTranscriptEntity>, error::SystemError>;

    async fn append_subtitle(
        &self,
        transcript_id: &Uuid,
        speaker_id: Option<&Uuid>,
        start_seconds: f64,
        end_seconds: f64,
        content: &str,
    ) -> Result<SubtitleEntity, error::SystemError>;

    /// Subtitles overlapping [from, to), ordered by start time.
    async fn find_subtitles_window(
        &self,
        transcript_id: &Uuid,
        from: f64,
        to: f64,
    ) -> Result<Vec<SubtitleEntity>, error::SystemError>;

    async fn list_subtitles(
        &self,
        transcript_id: &Uuid,
    ) -> Result<Vec<SubtitleEntity>, error::SystemError>;
}
