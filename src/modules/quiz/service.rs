use std::collections::HashMap;
use std::sync::Arc;

use log::info;
use uuid::Uuid;

use crate::{
    api::error,
    constants::FREE_PLAN_QUIZ_LIMIT,
    modules::{
        billing::repository::BillingRepository,
        quiz::{
            model::{
                AnswerBody, AttemptResult, CreateQuizBody, QuestionInput, QuestionView,
                QuizForOwner, QuizForTaker, UpdateQuizBody,
            },
            repository::QuizRepository,
            schema::{QuizAttemptDetailEntity, QuizAttemptEntity, QuizEntity, QuizQuestionEntity},
        },
    },
};

#[derive(Clone)]
pub struct QuizService {
    quiz_repo: Arc<dyn QuizRepository + Send + Sync>,
    billing_repo: Arc<dyn BillingRepository + Send + Sync>,
}

impl QuizService {
    pub fn with_dependencies(
        quiz_repo: Arc<dyn QuizRepository + Send + Sync>,
        billing_repo: Arc<dyn BillingRepository + Send + Sync>,
    ) -> Self {
        QuizService { quiz_repo, billing_repo }
    }

    pub async fn create_quiz(
        &self,
        owner_id: Uuid,
        body: CreateQuizBody,
    ) -> Result<QuizEntity, error::SystemError> {
        validate_questions(&body.questions)?;

        let owned = self.quiz_repo.count_quizzes_by_owner(&owner_id).await?;
        if owned >= FREE_PLAN_QUIZ_LIMIT {
            let premium =
                self.billing_repo.find_active_subscription(&owner_id).await?.is_some();
            if !premium {
                return Err(error::SystemError::forbidden(
                    "Free plan quiz limit reached, upgrade to create more",
                ));
            }
        }

        let quiz = self
            .quiz_repo
            .create_quiz_atomic(
                &owner_id,
                &body.title,
                &body.description,
                body.time_limit_seconds,
                &body.questions,
            )
            .await?;

        info!("Quiz {} created by {}", quiz.id, owner_id);
        Ok(quiz)
    }

    pub async fn update_quiz(
        &self,
        owner_id: Uuid,
        quiz_id: Uuid,
        body: UpdateQuizBody,
    ) -> Result<QuizEntity, error::SystemError> {
        self.require_owned_quiz(&quiz_id, &owner_id).await?;
        self.quiz_repo.update_quiz(&quiz_id, &body).await
    }

    pub async fn publish_quiz(
        &self,
        owner_id: Uuid,
        quiz_id: Uuid,
    ) -> Result<(), error::SystemError> {
        self.require_owned_quiz(&quiz_id, &owner_id).await?;

        let published = self.quiz_repo.publish_quiz(&quiz_id).await?;
        if !published {
            return Err(error::SystemError::bad_request("Quiz already published"));
        }
        Ok(())
    }

    pub async fn delete_quiz(
        &self,
        owner_id: Uuid,
        quiz_id: Uuid,
    ) -> Result<(), error::SystemError> {
        let quiz = self.require_owned_quiz(&quiz_id, &owner_id).await?;

        if quiz.is_published {
            return Err(error::SystemError::bad_request(
                "Published quizzes cannot be deleted",
            ));
        }

        self.quiz_repo.delete_quiz(&quiz_id).await?;
        Ok(())
    }

    pub async fn get_quiz_for_taker(
        &self,
        user_id: Uuid,
        quiz_id: Uuid,
    ) -> Result<QuizForTaker, error::SystemError> {
        let quiz = self.require_quiz(&quiz_id).await?;

        if !quiz.is_published && quiz.owner_id != user_id {
            return Err(error::SystemError::not_found("Quiz not found"));
        }

        let questions = self.quiz_repo.list_questions(&quiz_id).await?;
        Ok(QuizForTaker {
            quiz,
            questions: questions.into_iter().map(QuestionView::from).collect(),
        })
    }

    pub async fn get_quiz_for_owner(
        &self,
        owner_id: Uuid,
        quiz_id: Uuid,
    ) -> Result<QuizForOwner, error::SystemError> {
        let quiz = self.require_owned_quiz(&quiz_id, &owner_id).await?;
        let questions = self.quiz_repo.list_questions(&quiz_id).await?;
        Ok(QuizForOwner { quiz, questions })
    }

    pub async fn list_published(&self) -> Result<Vec<QuizEntity>, error::SystemError> {
        self.quiz_repo.list_published().await
    }

    pub async fn list_mine(&self, owner_id: Uuid) -> Result<Vec<QuizEntity>, error::SystemError> {
        self.quiz_repo.list_quizzes_by_owner(&owner_id).await
    }

    pub async fn start_attempt(
        &self,
        user_id: Uuid,
        quiz_id: Uuid,
    ) -> Result<QuizAttemptEntity, error::SystemError> {
        let quiz = self.require_quiz(&quiz_id).await?;

        if !quiz.is_published {
            return Err(error::SystemError::bad_request("Quiz is not published"));
        }

        // one open attempt per user per quiz
        if let Some(open) = self.quiz_repo.find_open_attempt(&quiz_id, &user_id).await? {
            return Ok(open);
        }

        self.quiz_repo.create_attempt(&quiz_id, &user_id).await
    }

    pub async fn answer(
        &self,
        user_id: Uuid,
        attempt_id: Uuid,
        body: AnswerBody,
    ) -> Result<QuizAttemptDetailEntity, error::SystemError> {
        let attempt = self.require_attempt(&attempt_id).await?;

        if attempt.user_id != user_id {
            return Err(error::SystemError::forbidden("Not your attempt"));
        }
        if attempt.is_completed() {
            return Err(error::SystemError::bad_request("Attempt already completed"));
        }

        let question = self
            .quiz_repo
            .find_question(&body.question_id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Question not found"))?;

        if question.quiz_id != attempt.quiz_id {
            return Err(error::SystemError::bad_request("Question belongs to another quiz"));
        }

        let chosen = body.chosen_option.map(|c| c.to_uppercase());
        validate_choice(&question, &chosen)?;

        if self.quiz_repo.find_detail(&attempt_id, &body.question_id).await?.is_some() {
            return Err(error::SystemError::bad_request("Question already answered"));
        }

        let is_correct = answer_is_correct(&question, &chosen);

        self.quiz_repo
            .create_detail(&attempt_id, &body.question_id, &chosen, is_correct, body.time_taken_ms)
            .await
    }

    pub async fn finish_attempt(
        &self,
        user_id: Uuid,
        attempt_id: Uuid,
    ) -> Result<QuizAttemptEntity, error::SystemError> {
        let attempt = self.require_attempt(&attempt_id).await?;

        if attempt.user_id != user_id {
            return Err(error::SystemError::forbidden("Not your attempt"));
        }
        if attempt.is_completed() {
            return Err(error::SystemError::bad_request("Attempt already completed"));
        }

        let quiz = self.require_quiz(&attempt.quiz_id).await?;
        let (questions, details) = tokio::try_join!(
            self.quiz_repo.list_questions(&attempt.quiz_id),
            self.quiz_repo.list_details(&attempt_id),
        )?;

        let score =
            compute_score(attempt.started_at, quiz.time_limit_seconds, &questions, &details);
        let duration =
            (chrono::Utc::now() - attempt.started_at).num_seconds().max(0) as i32;

        self.quiz_repo.complete_attempt(&attempt_id, score, duration).await
    }

    pub async fn get_result(
        &self,
        user_id: Uuid,
        attempt_id: Uuid,
    ) -> Result<AttemptResult, error::SystemError> {
        let attempt = self.require_attempt(&attempt_id).await?;
        let quiz = self.require_quiz(&attempt.quiz_id).await?;

        if attempt.user_id != user_id && quiz.owner_id != user_id {
            return Err(error::SystemError::forbidden("Not allowed to view this attempt"));
        }

        let (questions, details) = tokio::try_join!(
            self.quiz_repo.list_questions(&attempt.quiz_id),
            self.quiz_repo.list_details(&attempt_id),
        )?;

        let max_score = questions.iter().map(|q| q.points).sum();

        Ok(AttemptResult { attempt, details, max_score })
    }

    pub async fn list_attempts_for_quiz(
        &self,
        owner_id: Uuid,
        quiz_id: Uuid,
    ) -> Result<Vec<QuizAttemptEntity>, error::SystemError> {
        self.require_owned_quiz(&quiz_id, &owner_id).await?;
        self.quiz_repo.list_attempts_for_quiz(&quiz_id).await
    }

    pub async fn list_my_attempts(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<QuizAttemptEntity>, error::SystemError> {
        self.quiz_repo.list_attempts_for_user(&user_id).await
    }

    async fn require_quiz(&self, quiz_id: &Uuid) -> Result<QuizEntity, error::SystemError> {
        self.quiz_repo
            .find_quiz(quiz_id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Quiz not found"))
    }

    async fn require_owned_quiz(
        &self,
        quiz_id: &Uuid,
        owner_id: &Uuid,
    ) -> Result<QuizEntity, error::SystemError> {
        let quiz = self.require_quiz(quiz_id).await?;
        if quiz.owner_id != *owner_id {
            return Err(error::SystemError::forbidden("Not the owner of this quiz"));
        }
        Ok(quiz)
    }

    async fn require_attempt(
        &self,
        attempt_id: &Uuid,
    ) -> Result<QuizAttemptEntity, error::SystemError> {
        self.quiz_repo
            .find_attempt(attempt_id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Attempt not found"))
    }
}

/// Authoring check: the correct option letter must name an option the
/// question actually has.
fn validate_questions(questions: &[QuestionInput]) -> Result<(), error::SystemError> {
    for q in questions {
        let correct = q.correct_option.to_uppercase();
        let present = match correct.as_str() {
            "A" | "B" => true,
            "C" => q.option_c.is_some(),
            "D" => q.option_d.is_some(),
            _ => {
                return Err(error::SystemError::bad_request(
                    "Correct option must be one of A, B, C, D",
                ));
            }
        };
        if !present {
            return Err(error::SystemError::bad_request(
                "Correct option refers to a missing option",
            ));
        }
    }
    Ok(())
}

/// Answer check: a chosen letter must name an option the question has.
/// `None` means the question was skipped.
fn validate_choice(
    question: &QuizQuestionEntity,
    chosen: &Option<String>,
) -> Result<(), error::SystemError> {
    let Some(choice) = chosen else {
        return Ok(());
    };

    let present = match choice.as_str() {
        "A" | "B" => true,
        "C" => question.option_c.is_some(),
        "D" => question.option_d.is_some(),
        _ => false,
    };

    if !present {
        return Err(error::SystemError::bad_request("Chosen option does not exist"));
    }
    Ok(())
}

fn answer_is_correct(question: &QuizQuestionEntity, chosen: &Option<String>) -> bool {
    matches!(chosen, Some(c) if c.eq_ignore_ascii_case(&question.correct_option))
}

/// Sum of points over correct answers; with a time limit, answers recorded
/// after the deadline do not count.
fn compute_score(
    started_at: chrono::DateTime<chrono::Utc>,
    time_limit_seconds: Option<i32>,
    questions: &[QuizQuestionEntity],
    details: &[QuizAttemptDetailEntity],
) -> i32 {
    let deadline =
        time_limit_seconds.map(|s| started_at + chrono::Duration::seconds(s as i64));

    let points: HashMap<Uuid, i32> = questions.iter().map(|q| (q.id, q.points)).collect();

    details
        .iter()
        .filter(|d| d.is_correct)
        .filter(|d| deadline.map_or(true, |dl| d.answered_at <= dl))
        .filter_map(|d| points.get(&d.question_id))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(correct: &str, points: i32, with_cd: bool) -> QuizQuestionEntity {
        QuizQuestionEntity {
            id: Uuid::now_v7(),
            quiz_id: Uuid::now_v7(),
            position: 0,
            prompt: "?".into(),
            option_a: "a".into(),
            option_b: "b".into(),
            option_c: with_cd.then(|| "c".into()),
            option_d: with_cd.then(|| "d".into()),
            correct_option: correct.into(),
            points,
        }
    }

    fn detail(
        question_id: Uuid,
        is_correct: bool,
        answered_at: chrono::DateTime<chrono::Utc>,
    ) -> QuizAttemptDetailEntity {
        QuizAttemptDetailEntity {
            id: Uuid::now_v7(),
            attempt_id: Uuid::now_v7(),
            question_id,
            chosen_option: Some("A".into()),
            is_correct,
            time_taken_ms: 1500,
            answered_at,
        }
    }

    #[test]
    fn question_validation_requires_existing_correct_option() {
        let ok = QuestionInput {
            prompt: "?".into(),
            option_a: "a".into(),
            option_b: "b".into(),
            option_c: None,
            option_d: None,
            correct_option: "b".into(),
            points: 5,
        };
        assert!(validate_questions(&[ok.clone()]).is_ok());

        let missing = QuestionInput { correct_option: "D".into(), ..ok.clone() };
        assert!(validate_questions(&[missing]).is_err());

        let bogus = QuestionInput { correct_option: "X".into(), ..ok };
        assert!(validate_questions(&[bogus]).is_err());
    }

    #[test]
    fn choice_must_exist_on_question() {
        let q = question("A", 1, false);
        assert!(validate_choice(&q, &Some("B".into())).is_ok());
        assert!(validate_choice(&q, &Some("C".into())).is_err());
        assert!(validate_choice(&q, &None).is_ok());
    }

    #[test]
    fn correctness_is_case_insensitive() {
        let q = question("B", 1, false);
        assert!(answer_is_correct(&q, &Some("b".into())));
        assert!(!answer_is_correct(&q, &Some("a".into())));
        assert!(!answer_is_correct(&q, &None));
    }

    #[test]
    fn score_sums_correct_answers() {
        let started = chrono::Utc::now();
        let q1 = question("A", 3, true);
        let q2 = question("B", 7, true);

        let details = vec![
            detail(q1.id, true, started + chrono::Duration::seconds(5)),
            detail(q2.id, false, started + chrono::Duration::seconds(10)),
        ];

        assert_eq!(compute_score(started, None, &[q1, q2], &details), 3);
    }

    #[test]
    fn late_answers_score_nothing() {
        let started = chrono::Utc::now();
        let q1 = question("A", 3, true);
        let q2 = question("B", 7, true);

        let details = vec![
            detail(q1.id, true, started + chrono::Duration::seconds(30)),
            detail(q2.id, true, started + chrono::Duration::seconds(90)),
        ];

        // limit 60s: only the first answer counts
        assert_eq!(compute_score(started, Some(60), &[q1, q2], &details), 3);
    }
}
