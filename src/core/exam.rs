//! Exam business logic - Handles exam scheduling, visibility and lookups.
//!
//! A school has at most one exam per `(level, termType, subject)`. The rule is
//! enforced by a unique index, and a violating insert is reported as
//! [`Error::Conflict`] without touching the existing exam.

use crate::{
    core::{resolver, subject::get_subject_by_id, validate, view::ExamDetail, view::ExamSummary},
    entities::{Exam, Question, Subject, exam, question},
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use serde::Deserialize;
use tracing::{info, warn};

const DUPLICATE_EXAM: &str =
    "An exam for this subject already exists for the selected term and class.";

/// Payload for creating an exam.
///
/// The subject is given either by id, or by name (created in the school on
/// first use). When both are present the id wins.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExam {
    /// Owning school
    pub school_id: String,
    /// Class level, e.g. `JSS1`
    pub level: String,
    /// Term, e.g. `FIRST`
    pub term_type: String,
    /// Existing subject
    #[serde(default)]
    pub subject_id: Option<i64>,
    /// Subject name, created in the school if new
    #[serde(default)]
    pub subject_name: Option<String>,
    /// Whether students can see the exam
    #[serde(default)]
    pub visible: bool,
    /// Allowed time in minutes
    pub exam_duration: i32,
}

/// Query for listing exams of one class level and term
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelTermQuery {
    /// Class level
    pub level: Option<String>,
    /// Term
    pub term_type: Option<String>,
    /// Owning school
    pub school_id: Option<String>,
}

/// New visibility and duration for one exam
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamSettings {
    /// Exam to change
    pub id: i64,
    /// New visibility
    pub visible: bool,
    /// New allowed time in minutes
    pub exam_duration: i32,
}

fn require_duration(minutes: i32) -> Result<i32> {
    if minutes <= 0 {
        return Err(Error::validation("examDuration must be a positive number of minutes"));
    }
    Ok(minutes)
}

async fn subject_for_exam<C>(db: &C, school_id: &str, payload: &NewExam) -> Result<i64>
where
    C: ConnectionTrait,
{
    match (payload.subject_id, payload.subject_name.as_deref()) {
        (Some(subject_id), _) => {
            let subject = get_subject_by_id(db, subject_id)
                .await?
                .ok_or(Error::NotFound { entity: "Subject" })?;
            if subject.school_id != school_id {
                return Err(Error::validation("Subject belongs to a different school"));
            }
            Ok(subject.id)
        }
        (None, Some(name)) => resolver::resolve::<Subject, C>(db, school_id, name).await,
        (None, None) => Err(Error::validation("subjectId or subjectName is required")),
    }
}

/// Creates an exam.
///
/// # Errors
/// Returns an error if:
/// - `schoolId`, `level` or `termType` is blank, or the duration is not positive
/// - the subject id is unknown or belongs to another school
/// - an exam already exists for the same school, level, term and subject
pub async fn create_exam(db: &DatabaseConnection, payload: NewExam) -> Result<ExamSummary> {
    let school_id = validate::require_text("schoolId", &payload.school_id)?;
    let level = validate::require_text("level", &payload.level)?;
    let term_type = validate::require_text("termType", &payload.term_type)?;
    let exam_duration = require_duration(payload.exam_duration)?;

    let txn = db.begin().await?;
    let subject_id = subject_for_exam(&txn, &school_id, &payload).await?;

    let exam = exam::ActiveModel {
        school_id: Set(school_id),
        level: Set(level),
        term_type: Set(term_type),
        subject_id: Set(subject_id),
        visible: Set(payload.visible),
        exam_duration: Set(exam_duration),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    let created = match exam.insert(&txn).await {
        Ok(created) => created,
        Err(e) => {
            let err = Error::conflict_on_unique(e, DUPLICATE_EXAM);
            if matches!(err, Error::Conflict { .. }) {
                warn!(subject_id, "Duplicate exam rejected");
            }
            return Err(err);
        }
    };
    let subject = get_subject_by_id(&txn, subject_id).await?;
    txn.commit().await?;

    info!(id = created.id, school_id = %created.school_id, subject_id, "Created exam");
    Ok(ExamSummary::new(created, subject))
}

/// Deletes an exam and, through the foreign key, all of its questions.
pub async fn delete_exam(db: &DatabaseConnection, exam_id: i64) -> Result<()> {
    let result = Exam::delete_by_id(exam_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::NotFound { entity: "Exam" });
    }
    info!(id = exam_id, "Deleted exam");
    Ok(())
}

/// Lists the exams of one level and term in a school, with subject names.
pub async fn list_exams_by_level_term(
    db: &DatabaseConnection,
    query: LevelTermQuery,
) -> Result<Vec<ExamSummary>> {
    let (Some(level), Some(term_type), Some(school_id)) =
        (query.level, query.term_type, query.school_id)
    else {
        return Err(Error::validation(
            "level, termType and schoolId are required to fetch exams.",
        ));
    };
    let level = validate::require_text("level", &level)?;
    let term_type = validate::require_text("termType", &term_type)?;
    let school_id = validate::require_text("schoolId", &school_id)?;

    let rows = Exam::find()
        .filter(exam::Column::SchoolId.eq(school_id))
        .filter(exam::Column::Level.eq(level))
        .filter(exam::Column::TermType.eq(term_type))
        .order_by_asc(exam::Column::Id)
        .find_also_related(Subject)
        .all(db)
        .await?;
    Ok(rows
        .into_iter()
        .map(|(exam, subject)| ExamSummary::new(exam, subject))
        .collect())
}

/// Lists all exams of a subject.
pub async fn list_exams_for_subject(
    db: &DatabaseConnection,
    subject_id: i64,
) -> Result<Vec<exam::Model>> {
    Exam::find()
        .filter(exam::Column::SubjectId.eq(subject_id))
        .order_by_asc(exam::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Lists the exams of a school that students can currently see.
pub async fn list_visible_exams(
    db: &DatabaseConnection,
    school_id: &str,
) -> Result<Vec<ExamSummary>> {
    let rows = Exam::find()
        .filter(exam::Column::SchoolId.eq(school_id))
        .filter(exam::Column::Visible.eq(true))
        .order_by_asc(exam::Column::Id)
        .find_also_related(Subject)
        .all(db)
        .await?;
    Ok(rows
        .into_iter()
        .map(|(exam, subject)| ExamSummary::new(exam, subject))
        .collect())
}

/// Applies a batch of visibility/duration changes.
///
/// The batch is all-or-nothing: it runs in one store transaction and an unknown
/// exam id rolls back every change.
pub async fn update_exam_settings(
    db: &DatabaseConnection,
    updates: Vec<ExamSettings>,
) -> Result<usize> {
    if updates.is_empty() {
        return Err(Error::validation(
            "Updates array is required and cannot be empty.",
        ));
    }
    for update in &updates {
        require_duration(update.exam_duration)?;
    }

    let txn = db.begin().await?;
    for update in &updates {
        let mut exam: exam::ActiveModel = Exam::find_by_id(update.id)
            .one(&txn)
            .await?
            .ok_or(Error::NotFound { entity: "Exam" })?
            .into();
        exam.visible = Set(update.visible);
        exam.exam_duration = Set(update.exam_duration);
        exam.update(&txn).await?;
    }
    txn.commit().await?;

    info!(count = updates.len(), "Updated exam visibility and durations");
    Ok(updates.len())
}

/// Retrieves an exam with its subject name and questions.
pub async fn get_exam_detail(db: &DatabaseConnection, exam_id: i64) -> Result<ExamDetail> {
    let (exam, subject) = Exam::find_by_id(exam_id)
        .find_also_related(Subject)
        .one(db)
        .await?
        .ok_or(Error::NotFound { entity: "Exam" })?;

    let questions = Question::find()
        .filter(question::Column::ExamId.eq(exam.id))
        .order_by_asc(question::Column::Id)
        .all(db)
        .await?;

    Ok(ExamDetail {
        summary: ExamSummary::new(exam, subject),
        questions: questions.into_iter().map(Into::into).collect(),
    })
}
