use crate::modules::call::handle::*;
use actix_web::web::{scope, ServiceConfig};

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/calls")
            .service(start_session)
            .service(session_tree)
            .service(end_session)
            .service(mark_join)
            .service(mark_leave)
            .service(list_attendance)
            .service(register_recording)
            .service(list_recordings)
            .service(create_transcript)
            .service(list_transcripts)
            .service(append_subtitles)
            .service(subtitles_window)
            .service(transcript_text),
    );
}
