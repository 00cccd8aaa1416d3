use uuid::Uuid;

use crate::{
    api::error,
    modules::call::{
        model::AttendanceRow,
        repository::CallRepository,
        schema::{
            AttendanceEntity, CallSessionEntity, CallTranscriptEntity, RecordingEntity,
            SubtitleEntity,
        },
    },
};

#[derive(Clone)]
pub struct CallRepositoryPg {
    pool: sqlx::PgPool,
}

impl CallRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl CallRepository for CallRepositoryPg {
    async fn create_session(
        &self,
        room_id: &Uuid,
        parent_session_id: Option<&Uuid>,
    ) -> Result<CallSessionEntity, error::SystemError> {
        let id = Uuid::now_v7();
        let session = sqlx::query_as::<_, CallSessionEntity>(
            r#"
            INSERT INTO call_sessions (id, room_id, parent_session_id)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(room_id)
        .bind(parent_session_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(session)
    }

    async fn find_session(
        &self,
        id: &Uuid,
    ) -> Result<Option<CallSessionEntity>, error::SystemError> {
        let session =
            sqlx::query_as::<_, CallSessionEntity>("SELECT * FROM call_sessions WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(session)
    }

    async fn end_session_atomic(
        &self,
        id: &Uuid,
    ) -> Result<CallSessionEntity, error::SystemError> {
        let mut tx = self.pool.begin().await?;

        let session = sqlx::query_as::<_, CallSessionEntity>(
            "SELECT * FROM call_sessions WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| error::SystemError::not_found("Session not found"))?;

        if session.ended_at.is_some() {
            tx.rollback().await?;
            return Err(error::SystemError::bad_request("Session already ended"));
        }

        let session = sqlx::query_as::<_, CallSessionEntity>(
            "UPDATE call_sessions SET ended_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        // open attendance rows close with the session
        sqlx::query(
            "UPDATE attendances SET left_at = NOW() WHERE session_id = $1 AND left_at IS NULL",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(session)
    }

    async fn list_sessions_for_room(
        &self,
        room_id: &Uuid,
    ) -> Result<Vec<CallSessionEntity>, error::SystemError> {
        let sessions = sqlx::query_as::<_, CallSessionEntity>(
            "SELECT * FROM call_sessions WHERE room_id = $1 ORDER BY started_at",
        )
        .bind(room_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(sessions)
    }

    async fn find_open_attendance(
        &self,
        session_id: &Uuid,
        user_id: &Uuid,
    ) -> Result<Option<AttendanceEntity>, error::SystemError> {
        let attendance = sqlx::query_as::<_, AttendanceEntity>(
            "SELECT * FROM attendances WHERE session_id = $1 AND user_id = $2 AND left_at IS NULL",
        )
        .bind(session_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(attendance)
    }

    async fn open_attendance(
        &self,
        session_id: &Uuid,
        user_id: &Uuid,
    ) -> Result<AttendanceEntity, error::SystemError> {
        let id = Uuid::now_v7();
        let attendance = sqlx::query_as::<_, AttendanceEntity>(
            r#"
            INSERT INTO attendances (id, session_id, user_id)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(session_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(attendance)
    }

    async fn close_attendance(
        &self,
        session_id: &Uuid,
        user_id: &Uuid,
    ) -> Result<bool, error::SystemError> {
        let rows = sqlx::query(
            r#"
            UPDATE attendances
            SET left_at = NOW()
            WHERE session_id = $1 AND user_id = $2 AND left_at IS NULL
            "#,
        )
        .bind(session_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(rows > 0)
    }

    async fn list_attendance(
        &self,
        session_id: &Uuid,
    ) -> Result<Vec<AttendanceRow>, error::SystemError> {
        let rows = sqlx::query_as::<_, AttendanceRow>(
            r#"
            SELECT
                a.user_id,
                u.username,
                u.display_name,
                a.joined_at,
                a.left_at
            FROM attendances a
            JOIN users u ON u.id = a.user_id
            WHERE a.session_id = $1
            ORDER BY a.joined_at
            "#,
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn create_recording(
        &self,
        room_id: &Uuid,
        session_id: Option<&Uuid>,
        file_url: &str,
        duration_seconds: Option<i32>,
    ) -> Result<RecordingEntity, error::SystemError> {
        let id = Uuid::now_v7();
        let recording = sqlx::query_as::<_, RecordingEntity>(
            r#"
            INSERT INTO recordings (id, room_id, session_id, file_url, duration_seconds)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(room_id)
        .bind(session_id)
        .bind(file_url)
        .bind(duration_seconds)
        .fetch_one(&self.pool)
        .await?;

        Ok(recording)
    }

    async fn list_recordings(
        &self,
        room_id: &Uuid,
    ) -> Result<Vec<RecordingEntity>, error::SystemError> {
        let recordings = sqlx::query_as::<_, RecordingEntity>(
            "SELECT * FROM recordings WHERE room_id = $1 ORDER BY created_at",
        )
        .bind(room_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(recordings)
    }

    async fn create_transcript(
        &self,
        session_id: &Uuid,
        language: &str,
    ) -> Result<CallTranscriptEntity, error::SystemError> {
        let id = Uuid::now_v7();
        let transcript = sqlx::query_as::<_, CallTranscriptEntity>(
            r#"
            INSERT INTO call_transcripts (id, session_id, language)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(session_id)
        .bind(language)
        .fetch_one(&self.pool)
        .await?;

        Ok(transcript)
    }

    async fn find_transcript(
        &self,
        id: &Uuid,
    ) -> Result<Option<CallTranscriptEntity>, error::SystemError> {
        let transcript = sqlx::query_as::<_, CallTranscriptEntity>(
            "SELECT * FROM call_transcripts WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(transcript)
    }

    async fn list_transcripts(
        &self,
        session_id: &Uuid,
    ) -> Result<Vec<CallTranscriptEntity>, error::SystemError> {
        let transcripts = sqlx::query_as::<_, CallTranscriptEntity>(
            "SELECT * FROM call_transcripts WHERE session_id = $1 ORDER BY created_at",
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(transcripts)
    }

    async fn append_subtitle(
        &self,
        transcript_id: &Uuid,
        speaker_id: Option<&Uuid>,
        start_seconds: f64,
        end_seconds: f64,
        content: &str,
    ) -> Result<SubtitleEntity, error::SystemError> {
        let id = Uuid::now_v7();
        let subtitle = sqlx::query_as::<_, SubtitleEntity>(
            r#"
            INSERT INTO subtitles (id, transcript_id, speaker_id, start_seconds, end_seconds, content)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(transcript_id)
        .bind(speaker_id)
        .bind(start_seconds)
        .bind(end_seconds)
        .bind(content)
        .fetch_one(&self.pool)
        .await?;

        Ok(subtitle)
    }

    async fn find_subtitles_window(
        &self,
        transcript_id: &Uuid,
        from: f64,
        to: f64,
    ) -> Result<Vec<SubtitleEntity>, error::SystemError> {
        let subtitles = sqlx::query_as::<_, SubtitleEntity>(
            r#"
            SELECT * FROM subtitles
            WHERE transcript_id = $1
              AND start_seconds < $3
              AND end_seconds > $2
            ORDER BY start_seconds
            "#,
        )
        .bind(transcript_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(subtitles)
    }

    async fn list_subtitles(
        &self,
        transcript_id: &Uuid,
    ) -> Result<Vec<SubtitleEntity>, error::SystemError> {
        let subtitles = sqlx::query_as::<_, SubtitleEntity>(
            "SELECT * FROM subtitles WHERE transcript_id = $1 ORDER BY start_seconds",
        )
        .bind(transcript_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(subtitles)
    }
}
