//! Client-facing views of stored rows.
//!
//! Joined parents are flattened to a single scalar (their name) so clients never
//! see the nested parent row. Each view names its own projected field:
//! finance records expose `category`, exams expose `subjectName`.

use crate::entities::{category, exam, question, subject, user};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Placeholder for a parent row that could not be joined.
pub const UNKNOWN_PARENT: &str = "Unknown";

/// A finance record with its category flattened to the category name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorizedRecord<M> {
    /// The record's own columns
    #[serde(flatten)]
    pub record: M,
    /// Name of the category the record is filed under
    pub category: String,
}

/// Flattens a record joined with its (optional) category.
pub fn with_category<M>(record: M, category: Option<category::Model>) -> CategorizedRecord<M> {
    CategorizedRecord {
        record,
        category: category.map_or_else(|| UNKNOWN_PARENT.to_string(), |c| c.name),
    }
}

/// Flattens a list of `(record, category)` join results.
pub fn with_categories<M>(rows: Vec<(M, Option<category::Model>)>) -> Vec<CategorizedRecord<M>> {
    rows.into_iter()
        .map(|(record, category)| with_category(record, category))
        .collect()
}

/// Exam row with its subject flattened to `subjectName`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamSummary {
    /// Exam id
    pub id: i64,
    /// Owning school
    pub school_id: String,
    /// Class level
    pub level: String,
    /// Term
    pub term_type: String,
    /// Whether students can see the exam
    pub visible: bool,
    /// Allowed time in minutes
    pub exam_duration: i32,
    /// Subject id
    pub subject_id: i64,
    /// Subject name, or `"Unknown"`
    pub subject_name: String,
}

impl ExamSummary {
    /// Builds the summary from an exam joined with its subject.
    #[must_use]
    pub fn new(exam: exam::Model, subject: Option<subject::Model>) -> Self {
        Self {
            id: exam.id,
            school_id: exam.school_id,
            level: exam.level,
            term_type: exam.term_type,
            visible: exam.visible,
            exam_duration: exam.exam_duration,
            subject_id: exam.subject_id,
            subject_name: subject.map_or_else(|| UNKNOWN_PARENT.to_string(), |s| s.name),
        }
    }
}

/// Question as shown inside an exam detail (no `examId`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionView {
    /// Question id
    pub id: i64,
    /// Prompt text
    pub question: String,
    /// Answer choices
    pub options: Vec<String>,
    /// Correct choice
    pub correct_answer: String,
}

impl From<question::Model> for QuestionView {
    fn from(model: question::Model) -> Self {
        Self {
            id: model.id,
            question: model.question,
            options: model.options.0,
            correct_answer: model.correct_answer,
        }
    }
}

/// Exam with its subject name and all of its questions
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamDetail {
    /// Exam columns and subject name
    #[serde(flatten)]
    pub summary: ExamSummary,
    /// Questions in insertion order
    pub questions: Vec<QuestionView>,
}

/// Public view of a user. The password hash is never part of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    /// User id (UUID)
    pub id: String,
    /// Login name
    pub username: String,
    /// Registration time
    pub created_at: DateTime<Utc>,
}

impl From<user::Model> for UserView {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            created_at: model.created_at,
        }
    }
}
