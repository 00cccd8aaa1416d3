use uuid::Uuid;

use crate::api::error;
use crate::modules::quiz::model::{QuestionInput, UpdateQuizBody};
use crate::modules::quiz::schema::{
    QuizAttemptDetailEntity, QuizAttemptEntity, QuizEntity, QuizQuestionEntity,
};

#[async_trait::async_trait]
pub trait QuizRepository {
    /// Insert the quiz and its questions in one transaction.
    async fn create_quiz_atomic(
        &self,
        owner_id: &Uuid,
        title: &str,
        description: &Option<String>,
        time_limit_seconds: Option<i32>,
        questions: &[QuestionInput],
    ) -> Result<QuizEntity, error::SystemError>;

    async fn find_quiz(&self, id: &Uuid) -> Result<Option<QuizEntity>, error::SystemError>;

    async fn update_quiz(
        &self,
        id: &Uuid,
        update: &UpdateQuizBody,
    ) -> Result<QuizEntity, error::SystemError>;

    async fn publish_quiz(&self, id: &Uuid) -> Result<bool, error::SystemError>;

    /// Questions cascade with the quiz.
    async fn delete_quiz(&self, id: &Uuid) -> Result<bool, error::SystemError>;

    async fn list_quizzes_by_owner(
        &self,
        owner_id: &Uuid,
    ) -> Result<Vec<QuizEntity>, error::SystemError>;

    async fn list_published(&self) -> Result<Vec<QuizEntity>, error::SystemError>;

    async fn count_quizzes_by_owner(&self, owner_id: &Uuid) -> Result<i64, error::SystemError>;

    async fn list_questions(
        &self,
        quiz_id: &Uuid,
    ) -> Result<Vec<QuizQuestionEntity>, error::SystemError>;

    async fn find_question(
        &self,
        id: &Uuid,
    ) -> Result<Option<QuizQuestionEntity>, error::SystemError>;

    async fn create_attempt(
        &self,
        quiz_id: &Uuid,
        user_id: &Uuid,
    ) -> Result<QuizAttemptEntity, error::SystemError>;

    async fn find_attempt(
        &self,
        id: &Uuid,
    ) -> Result<Option<QuizAttemptEntity>, error::SystemError>;

    async fn find_open_attempt(
        &self,
        quiz_id: &Uuid,
        user_id: &Uuid,
    ) -> Result<Option<QuizAttemptEntity>, error::SystemError>;

    async fn create_detail(
        &self,
        attempt_id: &Uuid,
        question_id: &Uuid,
        chosen_option: &Option<String>,
        is_correct: bool,
        time_taken_ms: i64,
    ) -> Result<QuizAttemptDetailEntity, error::SystemError>;

    async fn find_detail(
        &self,
        attempt_id: &Uuid,
        question_id: &Uuid,
    ) -> Result<Option<QuizAttemptDetailEntity>, error::SystemError>;

    async fn list_details(
        &self,
        attempt_id: &Uuid,
    ) -> Result<Vec<QuizAttemptDetailEntity>, error::SystemError>;

    async fn complete_attempt(
        &self,
        id: &Uuid,
        score: i32,
        duration_seconds: i32,
    ) -> Result<QuizAttemptEntity, error::SystemError>;

    async fn list_attempts_for_quiz(
        &self,
        quiz_id: &Uuid,
    ) -> Result<Vec<QuizAttemptEntity>, error::SystemError>;

    async fn list_attempts_for_user(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<QuizAttemptEntity>, error::SystemError>;
}
