use std::collections::HashMap;
use std::sync::Arc;

use serde_json::json;
use uuid::Uuid;

use crate::{
    api::error,
    modules::{
        call::{
            model::{
                AttendanceRow, RegisterRecordingBody, SessionNode, SubtitleItem,
                TranscriptTextResponse,
            },
            repository::CallRepository,
            schema::{
                AttendanceEntity, CallSessionEntity, CallTranscriptEntity, RecordingEntity,
                SubtitleEntity,
            },
        },
        room::{
            repository::RoomRepository,
            schema::{ParticipantRole, RoomEventType},
        },
    },
};

#[derive(Clone)]
pub struct CallService {
    call_repo: Arc<dyn CallRepository + Send + Sync>,
    room_repo: Arc<dyn RoomRepository + Send + Sync>,
}

impl CallService {
    pub fn with_dependencies(
        call_repo: Arc<dyn CallRepository + Send + Sync>,
        room_repo: Arc<dyn RoomRepository + Send + Sync>,
    ) -> Self {
        CallService { call_repo, room_repo }
    }

    pub async fn start_session(
        &self,
        user_id: Uuid,
        room_id: Uuid,
        parent_session_id: Option<Uuid>,
    ) -> Result<CallSessionEntity, error::SystemError> {
        let room = self
            .room_repo
            .find_room(&room_id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Room not found"))?;

        if !room.is_active {
            return Err(error::SystemError::bad_request("Room has ended"));
        }

        self.require_moderator(&room_id, &user_id).await?;

        if let Some(parent_id) = &parent_session_id {
            let parent = self
                .call_repo
                .find_session(parent_id)
                .await?
                .ok_or_else(|| error::SystemError::not_found("Parent session not found"))?;

            if parent.room_id != room_id {
                return Err(error::SystemError::bad_request(
                    "Parent session belongs to another room",
                ));
            }
            if parent.ended_at.is_some() {
                return Err(error::SystemError::bad_request("Parent session has ended"));
            }
        }

        let session =
            self.call_repo.create_session(&room_id, parent_session_id.as_ref()).await?;

        self.room_repo
            .record_event(
                &room_id,
                Some(&user_id),
                RoomEventType::SessionStarted,
                Some(json!({ "session_id": session.id })),
            )
            .await?;

        Ok(session)
    }

    pub async fn end_session(
        &self,
        user_id: Uuid,
        session_id: Uuid,
    ) -> Result<CallSessionEntity, error::SystemError> {
        let session = self.require_session(&session_id).await?;
        self.require_moderator(&session.room_id, &user_id).await?;

        let session = self.call_repo.end_session_atomic(&session_id).await?;

        self.room_repo
            .record_event(
                &session.room_id,
                Some(&user_id),
                RoomEventType::SessionEnded,
                Some(json!({ "session_id": session.id })),
            )
            .await?;

        Ok(session)
    }

    pub async fn get_session_tree(
        &self,
        user_id: Uuid,
        room_id: Uuid,
    ) -> Result<Vec<SessionNode>, error::SystemError> {
        self.require_participant(&room_id, &user_id).await?;
        let sessions = self.call_repo.list_sessions_for_room(&room_id).await?;
        Ok(build_session_tree(sessions))
    }

    pub async fn mark_join(
        &self,
        user_id: Uuid,
        session_id: Uuid,
    ) -> Result<AttendanceEntity, error::SystemError> {
        let session = self.require_session(&session_id).await?;

        if session.ended_at.is_some() {
            return Err(error::SystemError::bad_request("Session has ended"));
        }

        self.require_participant(&session.room_id, &user_id).await?;

        // rejoining without leaving keeps the open row
        if let Some(open) = self.call_repo.find_open_attendance(&session_id, &user_id).await? {
            return Ok(open);
        }

        self.call_repo.open_attendance(&session_id, &user_id).await
    }

    pub async fn mark_leave(
        &self,
        user_id: Uuid,
        session_id: Uuid,
    ) -> Result<(), error::SystemError> {
        let closed = self.call_repo.close_attendance(&session_id, &user_id).await?;
        if !closed {
            return Err(error::SystemError::not_found("No open attendance for this session"));
        }
        Ok(())
    }

    pub async fn get_attendance(
        &self,
        user_id: Uuid,
        session_id: Uuid,
    ) -> Result<Vec<AttendanceRow>, error::SystemError> {
        let session = self.require_session(&session_id).await?;
        self.require_moderator(&session.room_id, &user_id).await?;
        self.call_repo.list_attendance(&session_id).await
    }

    pub async fn register_recording(
        &self,
        user_id: Uuid,
        room_id: Uuid,
        body: RegisterRecordingBody,
    ) -> Result<RecordingEntity, error::SystemError> {
        self.require_moderator(&room_id, &user_id).await?;

        if let Some(session_id) = &body.session_id {
            let session = self.require_session(session_id).await?;
            if session.room_id != room_id {
                return Err(error::SystemError::bad_request(
                    "Session belongs to another room",
                ));
            }
        }

        let recording = self
            .call_repo
            .create_recording(
                &room_id,
                body.session_id.as_ref(),
                &body.file_url,
                body.duration_seconds,
            )
            .await?;

        self.room_repo
            .record_event(
                &room_id,
                Some(&user_id),
                RoomEventType::RecordingStarted,
                Some(json!({ "recording_id": recording.id })),
            )
            .await?;

        Ok(recording)
    }

    pub async fn get_recordings(
        &self,
        user_id: Uuid,
        room_id: Uuid,
    ) -> Result<Vec<RecordingEntity>, error::SystemError> {
        self.require_participant(&room_id, &user_id).await?;
        self.call_repo.list_recordings(&room_id).await
    }

    pub async fn create_transcript(
        &self,
        user_id: Uuid,
        session_id: Uuid,
        language: &str,
    ) -> Result<CallTranscriptEntity, error::SystemError> {
        let session = self.require_session(&session_id).await?;
        self.require_moderator(&session.room_id, &user_id).await?;
        self.call_repo.create_transcript(&session_id, language).await
    }

    pub async fn get_transcripts(
        &self,
        user_id: Uuid,
        session_id: Uuid,
    ) -> Result<Vec<CallTranscriptEntity>, error::SystemError> {
        let session = self.require_session(&session_id).await?;
        self.require_participant(&session.room_id, &user_id).await?;
        self.call_repo.list_transcripts(&session_id).await
    }

    pub async fn append_subtitles(
        &self,
        user_id: Uuid,
        transcript_id: Uuid,
        items: Vec<SubtitleItem>,
    ) -> Result<Vec<SubtitleEntity>, error::SystemError> {
        let transcript = self.require_transcript(&transcript_id).await?;
        let session = self.require_session(&transcript.session_id).await?;
        self.require_moderator(&session.room_id, &user_id).await?;

        for item in &items {
            if item.start_seconds < 0.0 || item.end_seconds <= item.start_seconds {
                return Err(error::SystemError::bad_request(
                    "Subtitle range must satisfy 0 <= start < end",
                ));
            }
        }

        let mut out = Vec::with_capacity(items.len());
        for item in items {
            let subtitle = self
                .call_repo
                .append_subtitle(
                    &transcript_id,
                    item.speaker_id.as_ref(),
                    item.start_seconds,
                    item.end_seconds,
                    &item.content,
                )
                .await?;
            out.push(subtitle);
        }

        Ok(out)
    }

    pub async fn get_subtitles_window(
        &self,
        user_id: Uuid,
        transcript_id: Uuid,
        from: f64,
        to: f64,
    ) -> Result<Vec<SubtitleEntity>, error::SystemError> {
        if from < 0.0 || to <= from {
            return Err(error::SystemError::bad_request(
                "Window must satisfy 0 <= from < to",
            ));
        }

        let transcript = self.require_transcript(&transcript_id).await?;
        let session = self.require_session(&transcript.session_id).await?;
        self.require_participant(&session.room_id, &user_id).await?;

        self.call_repo.find_subtitles_window(&transcript_id, from, to).await
    }

    pub async fn get_transcript_text(
        &self,
        user_id: Uuid,
        transcript_id: Uuid,
    ) -> Result<TranscriptTextResponse, error::SystemError> {
        let transcript = self.require_transcript(&transcript_id).await?;
        let session = self.require_session(&transcript.session_id).await?;
        self.require_participant(&session.room_id, &user_id).await?;

        let subtitles = self.call_repo.list_subtitles(&transcript_id).await?;

        Ok(TranscriptTextResponse {
            transcript_id,
            language: transcript.language,
            text: assemble_transcript(&subtitles),
        })
    }

    async fn require_session(
        &self,
        session_id: &Uuid,
    ) -> Result<CallSessionEntity, error::SystemError> {
        self.call_repo
            .find_session(session_id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Session not found"))
    }

    async fn require_transcript(
        &self,
        transcript_id: &Uuid,
    ) -> Result<CallTranscriptEntity, error::SystemError> {
        self.call_repo
            .find_transcript(transcript_id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Transcript not found"))
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

/// Arrange a room's flat session list into parent/child trees. Sessions whose
/// parent is missing from the list are treated as roots.
fn build_session_tree(sessions: Vec<CallSessionEntity>) -> Vec<SessionNode> {
    let ids: std::collections::HashSet<Uuid> = sessions.iter().map(|s| s.id).collect();

    let mut children_of: HashMap<Uuid, Vec<CallSessionEntity>> = HashMap::new();
    let mut roots = Vec::new();

    for session in sessions {
        match session.parent_session_id {
            Some(parent_id) if ids.contains(&parent_id) => {
                children_of.entry(parent_id).or_default().push(session);
            }
            _ => roots.push(session),
        }
    }

    fn attach(
        session: CallSessionEntity,
        children_of: &mut HashMap<Uuid, Vec<CallSessionEntity>>,
    ) -> SessionNode {
        let children = children_of
            .remove(&session.id)
            .unwrap_or_default()
            .into_iter()
            .map(|c| attach(c, children_of))
            .collect();
        SessionNode { session, children }
    }

    roots.into_iter().map(|r| attach(r, &mut children_of)).collect()
}

/// Join caption lines in playback order.
fn assemble_transcript(subtitles: &[SubtitleEntity]) -> String {
    subtitles.iter().map(|s| s.content.as_str()).collect::<Vec<_>>().join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(id: Uuid, parent: Option<Uuid>) -> CallSessionEntity {
        CallSessionEntity {
            id,
            room_id: Uuid::now_v7(),
            parent_session_id: parent,
            started_at: chrono::Utc::now(),
            ended_at: None,
        }
    }

    #[test]
    fn session_tree_nests_breakouts_under_parent() {
        let root = Uuid::now_v7();
        let child_a = Uuid::now_v7();
        let child_b = Uuid::now_v7();
        let grandchild = Uuid::now_v7();

        let tree = build_session_tree(vec![
            session(root, None),
            session(child_a, Some(root)),
            session(child_b, Some(root)),
            session(grandchild, Some(child_a)),
        ]);

        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].session.id, root);
        assert_eq!(tree[0].children.len(), 2);

        let a = tree[0].children.iter().find(|n| n.session.id == child_a).unwrap();
        assert_eq!(a.children.len(), 1);
        assert_eq!(a.children[0].session.id, grandchild);
    }

    #[test]
    fn session_with_unknown_parent_becomes_root() {
        let orphan = Uuid::now_v7();
        let tree = build_session_tree(vec![session(orphan, Some(Uuid::now_v7()))]);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].session.id, orphan);
    }

    #[test]
    fn transcript_assembles_in_order() {
        let transcript_id = Uuid::now_v7();
        let lines = vec![
            SubtitleEntity {
                id: Uuid::now_v7(),
                transcript_id,
                speaker_id: None,
                start_seconds: 0.0,
                end_seconds: 1.25,
                content: "hello".into(),
            },
            SubtitleEntity {
                id: Uuid::now_v7(),
                transcript_id,
                speaker_id: None,
                start_seconds: 1.25,
                end_seconds: 2.5,
                content: "world".into(),
            },
        ];
        assert_eq!(assemble_transcript(&lines), "hello\nworld");
    }
}
