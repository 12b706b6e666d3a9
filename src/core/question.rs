//! Question business logic - multiple-choice questions attached to exams.
//!
//! Every write checks that the prompt is present, that there is at least one
//! option and that the correct answer is one of the options. The checks run
//! before anything reaches the store.

use crate::{
    entities::{AnswerOptions, Exam, Question, question},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use serde::Deserialize;
use tracing::info;

/// Question content as sent by the client
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDraft {
    /// Prompt text
    pub question: String,
    /// Answer choices, in display order
    pub options: Vec<String>,
    /// Must equal one of `options`
    pub correct_answer: String,
}

/// Payload for adding one question
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewQuestion {
    /// Exam the question belongs to
    pub exam_id: i64,
    /// Question content
    #[serde(flatten)]
    pub draft: QuestionDraft,
}

/// Payload for adding several questions to one exam
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionBatch {
    /// Exam receiving every question
    pub exam_id: i64,
    /// Questions in display order
    pub questions: Vec<QuestionDraft>,
}

/// Payload for replacing a question; `examId` optionally moves it to another exam
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionUpdate {
    /// Target exam, if moving
    #[serde(default)]
    pub exam_id: Option<i64>,
    /// New question content
    #[serde(flatten)]
    pub draft: QuestionDraft,
}

struct CheckedDraft {
    question: String,
    options: AnswerOptions,
    correct_answer: String,
}

impl QuestionDraft {
    fn check(self) -> Result<CheckedDraft> {
        let question = self.question.trim().to_string();
        if question.is_empty() || self.options.is_empty() {
            return Err(Error::validation("Invalid question or options"));
        }
        let options = AnswerOptions(self.options);
        if !options.contains(&self.correct_answer) {
            return Err(Error::validation(
                "Correct answer must be one of the options",
            ));
        }
        Ok(CheckedDraft {
            question,
            options,
            correct_answer: self.correct_answer,
        })
    }
}

impl CheckedDraft {
    fn into_active_model(self, exam_id: i64) -> question::ActiveModel {
        question::ActiveModel {
            exam_id: Set(exam_id),
            question: Set(self.question),
            options: Set(self.options),
            correct_answer: Set(self.correct_answer),
            ..Default::default()
        }
    }
}

async fn ensure_exam_exists<C>(db: &C, exam_id: i64) -> Result<()>
where
    C: ConnectionTrait,
{
    Exam::find_by_id(exam_id)
        .one(db)
        .await?
        .map(|_| ())
        .ok_or(Error::NotFound { entity: "Exam" })
}

/// Adds one question to an exam.
///
/// # Errors
/// [`Error::Validation`] when the draft is invalid (nothing is written),
/// [`Error::NotFound`] when the exam does not exist.
pub async fn create_question(
    db: &DatabaseConnection,
    payload: NewQuestion,
) -> Result<question::Model> {
    let draft = payload.draft.check()?;
    ensure_exam_exists(db, payload.exam_id).await?;

    let created = draft.into_active_model(payload.exam_id).insert(db).await?;
    info!(id = created.id, exam_id = created.exam_id, "Added question");
    Ok(created)
}

/// Adds several questions to one exam in a single store transaction.
///
/// Every draft is checked before the first insert; one bad draft rejects the
/// whole batch. Returns the number of questions written.
pub async fn create_questions(db: &DatabaseConnection, batch: QuestionBatch) -> Result<usize> {
    if batch.questions.is_empty() {
        return Err(Error::validation("Questions must be a non-empty array"));
    }
    let drafts = batch
        .questions
        .into_iter()
        .map(QuestionDraft::check)
        .collect::<Result<Vec<_>>>()?;
    let count = drafts.len();

    let txn = db.begin().await?;
    ensure_exam_exists(&txn, batch.exam_id).await?;
    Question::insert_many(
        drafts
            .into_iter()
            .map(|draft| draft.into_active_model(batch.exam_id)),
    )
    .exec(&txn)
    .await?;
    txn.commit().await?;

    info!(exam_id = batch.exam_id, count, "Added questions");
    Ok(count)
}

/// Lists the questions of an exam in insertion order.
pub async fn list_questions_for_exam(
    db: &DatabaseConnection,
    exam_id: i64,
) -> Result<Vec<question::Model>> {
    Question::find()
        .filter(question::Column::ExamId.eq(exam_id))
        .order_by_asc(question::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves one question.
pub async fn get_question(db: &DatabaseConnection, question_id: i64) -> Result<question::Model> {
    Question::find_by_id(question_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound { entity: "Question" })
}

/// Replaces a question's prompt, options and answer.
pub async fn update_question(
    db: &DatabaseConnection,
    question_id: i64,
    payload: QuestionUpdate,
) -> Result<question::Model> {
    let draft = payload.draft.check()?;

    let existing = get_question(db, question_id).await?;
    let exam_id = payload.exam_id.unwrap_or(existing.exam_id);
    if exam_id != existing.exam_id {
        ensure_exam_exists(db, exam_id).await?;
    }

    let mut question: question::ActiveModel = existing.into();
    question.exam_id = Set(exam_id);
    question.question = Set(draft.question);
    question.options = Set(draft.options);
    question.correct_answer = Set(draft.correct_answer);
    let updated = question.update(db).await?;

    info!(id = updated.id, "Updated question");
    Ok(updated)
}

/// Deletes a question by ID.
pub async fn delete_question(db: &DatabaseConnection, question_id: i64) -> Result<()> {
    let result = Question::delete_by_id(question_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::NotFound { entity: "Question" });
    }
    info!(id = question_id, "Deleted question");
    Ok(())
}
