use crate::modules::quiz::handle::*;
use actix_web::web::{scope, ServiceConfig};

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/quizzes")
            .service(create_quiz)
            .service(list_published)
            .service(list_mine)
            .service(list_my_attempts)
            .service(answer)
            .service(finish_attempt)
            .service(attempt_result)
            .service(get_quiz_full)
            .service(get_quiz)
            .service(update_quiz)
            .service(publish_quiz)
            .service(delete_quiz)
            .service(start_attempt)
            .service(list_attempts),
    );
}
