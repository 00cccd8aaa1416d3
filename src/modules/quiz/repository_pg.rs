use uuid::Uuid;

use crate::{
    api::error,
    modules::quiz::{
        model::{QuestionInput, UpdateQuizBody},
        repository::QuizRepository,
        schema::{QuizAttemptDetailEntity, QuizAttemptEntity, QuizEntity, QuizQuestionEntity},
    },
};

#[derive(Clone)]
pub struct QuizRepositoryPg {
    pool: sqlx::PgPool,
}

impl QuizRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl QuizRepository for QuizRepositoryPg {
    async fn create_quiz_atomic(
        &self,
        owner_id: &Uuid,
        title: &str,
        description: &Option<String>,
        time_limit_seconds: Option<i32>,
        questions: &[QuestionInput],
    ) -> Result<QuizEntity, error::SystemError> {
        let mut tx = self.pool.begin().await?;

        let id = Uuid::now_v7();
        let quiz = sqlx::query_as::<_, QuizEntity>(
            r#"
            INSERT INTO quizzes (id, owner_id, title, description, time_limit_seconds)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .bind(title)
        .bind(description)
        .bind(time_limit_seconds)
        .fetch_one(&mut *tx)
        .await?;

        for (position, q) in questions.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO quiz_questions
                    (id, quiz_id, position, prompt, option_a, option_b, option_c, option_d, correct_option, points)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                "#,
            )
            .bind(Uuid::now_v7())
            .bind(quiz.id)
            .bind(position as i32)
            .bind(&q.prompt)
            .bind(&q.option_a)
            .bind(&q.option_b)
            .bind(&q.option_c)
            .bind(&q.option_d)
            .bind(q.correct_option.to_uppercase())
            .bind(q.points)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(quiz)
    }

    async fn find_quiz(&self, id: &Uuid) -> Result<Option<QuizEntity>, error::SystemError> {
        let quiz = sqlx::query_as::<_, QuizEntity>("SELECT * FROM quizzes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(quiz)
    }

    async fn update_quiz(
        &self,
        id: &Uuid,
        update: &UpdateQuizBody,
    ) -> Result<QuizEntity, error::SystemError> {
        let quiz = sqlx::query_as::<_, QuizEntity>(
            r#"
            UPDATE quizzes
            SET
                title              = COALESCE($2, title),
                description        = COALESCE($3, description),
                time_limit_seconds = COALESCE($4, time_limit_seconds),
                updated_at         = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&update.title)
        .bind(&update.description)
        .bind(update.time_limit_seconds)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| error::SystemError::not_found("Quiz not found"))?;

        Ok(quiz)
    }

    async fn publish_quiz(&self, id: &Uuid) -> Result<bool, error::SystemError> {
        let rows = sqlx::query(
            "UPDATE quizzes SET is_published = TRUE, updated_at = NOW() WHERE id = $1 AND NOT is_published",
        )
        .bind(id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(rows > 0)
    }

    async fn delete_quiz(&self, id: &Uuid) -> Result<bool, error::SystemError> {
        let rows = sqlx::query("DELETE FROM quizzes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(rows > 0)
    }

    async fn list_quizzes_by_owner(
        &self,
        owner_id: &Uuid,
    ) -> Result<Vec<QuizEntity>, error::SystemError> {
        let quizzes = sqlx::query_as::<_, QuizEntity>(
            "SELECT * FROM quizzes WHERE owner_id = $1 ORDER BY created_at DESC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(quizzes)
    }

    async fn list_published(&self) -> Result<Vec<QuizEntity>, error::SystemError> {
        let quizzes = sqlx::query_as::<_, QuizEntity>(
            "SELECT * FROM quizzes WHERE is_published ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(quizzes)
    }

    async fn count_quizzes_by_owner(&self, owner_id: &Uuid) -> Result<i64, error::SystemError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM quizzes WHERE owner_id = $1")
            .bind(owner_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn list_questions(
        &self,
        quiz_id: &Uuid,
    ) -> Result<Vec<QuizQuestionEntity>, error::SystemError> {
        let questions = sqlx::query_as::<_, QuizQuestionEntity>(
            "SELECT * FROM quiz_questions WHERE quiz_id = $1 ORDER BY position",
        )
        .bind(quiz_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(questions)
    }

    async fn find_question(
        &self,
        id: &Uuid,
    ) -> Result<Option<QuizQuestionEntity>, error::SystemError> {
        let question =
            sqlx::query_as::<_, QuizQuestionEntity>("SELECT * FROM quiz_questions WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(question)
    }

    async fn create_attempt(
        &self,
        quiz_id: &Uuid,
        user_id: &Uuid,
    ) -> Result<QuizAttemptEntity, error::SystemError> {
        let id = Uuid::now_v7();
        let attempt = sqlx::query_as::<_, QuizAttemptEntity>(
            r#"
            INSERT INTO quiz_attempts (id, quiz_id, user_id)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(quiz_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(attempt)
    }

    async fn find_attempt(
        &self,
        id: &Uuid,
    ) -> Result<Option<QuizAttemptEntity>, error::SystemError> {
        let attempt =
            sqlx::query_as::<_, QuizAttemptEntity>("SELECT * FROM quiz_attempts WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(attempt)
    }

    async fn find_open_attempt(
        &self,
        quiz_id: &Uuid,
        user_id: &Uuid,
    ) -> Result<Option<QuizAttemptEntity>, error::SystemError> {
        let attempt = sqlx::query_as::<_, QuizAttemptEntity>(
            r#"
            SELECT * FROM quiz_attempts
            WHERE quiz_id = $1 AND user_id = $2 AND completed_at IS NULL
            "#,
        )
        .bind(quiz_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(attempt)
    }

    async fn create_detail(
        &self,
        attempt_id: &Uuid,
        question_id: &Uuid,
        chosen_option: &Option<String>,
        is_correct: bool,
        time_taken_ms: i64,
    ) -> Result<QuizAttemptDetailEntity, error::SystemError> {
        let id = Uuid::now_v7();
        let detail = sqlx::query_as::<_, QuizAttemptDetailEntity>(
            r#"
            INSERT INTO quiz_attempt_details
                (id, attempt_id, question_id, chosen_option, is_correct, time_taken_ms)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(attempt_id)
        .bind(question_id)
        .bind(chosen_option)
        .bind(is_correct)
        .bind(time_taken_ms)
        .fetch_one(&self.pool)
        .await?;

        Ok(detail)
    }

    async fn find_detail(
        &self,
        attempt_id: &Uuid,
        question_id: &Uuid,
    ) -> Result<Option<QuizAttemptDetailEntity>, error::SystemError> {
        let detail = sqlx::query_as::<_, QuizAttemptDetailEntity>(
            "SELECT * FROM quiz_attempt_details WHERE attempt_id = $1 AND question_id = $2",
        )
        .bind(attempt_id)
        .bind(question_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(detail)
    }

    async fn list_details(
        &self,
        attempt_id: &Uuid,
    ) -> Result<Vec<QuizAttemptDetailEntity>, error::SystemError> {
        let details = sqlx::query_as::<_, QuizAttemptDetailEntity>(
            "SELECT * FROM quiz_attempt_details WHERE attempt_id = $1 ORDER BY answered_at",
        )
        .bind(attempt_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(details)
    }

    async fn complete_attempt(
        &self,
        id: &Uuid,
        score: i32,
        duration_seconds: i32,
    ) -> Result<QuizAttemptEntity, error::SystemError> {
        let attempt = sqlx::query_as::<_, QuizAttemptEntity>(
            r#"
            UPDATE quiz_attempts
            SET completed_at = NOW(), score = $2, duration_seconds = $3
            WHERE id = $1 AND completed_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(score)
        .bind(duration_seconds)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| error::SystemError::bad_request("Attempt already completed"))?;

        Ok(attempt)
    }

    async fn list_attempts_for_quiz(
        &self,
        quiz_id: &Uuid,
    ) -> Result<Vec<QuizAttemptEntity>, error::SystemError> {
        let attempts = sqlx::query_as::<_, QuizAttemptEntity>(
            "SELECT * FROM quiz_attempts WHERE quiz_id = $1 ORDER BY started_at DESC",
        )
        .bind(quiz_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(attempts)
    }

    async fn list_attempts_for_user(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<QuizAttemptEntity>, error::SystemError> {
        let attempts = sqlx::query_as::<_, QuizAttemptEntity>(
            "SELECT * FROM quiz_attempts WHERE user_id = $1 ORDER BY started_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(attempts)
    }
}
