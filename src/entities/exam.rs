//! Exam entity - One exam per subject, class level and term inside a school.
//!
//! `(school_id, level, term_type, subject_id)` is unique; the index is created
//! alongside the table in `config::database`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Exam database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[sea_orm(table_name = "exams")]
pub struct Model {
    /// Unique identifier for the exam
    #[sea_orm(primary_key)]
    pub id: i64,
    /// School the exam belongs to
    pub school_id: String,
    /// Class level (e.g. "JSS1")
    pub level: String,
    /// Term (e.g. "FIRST")
    pub term_type: String,
    /// Subject being examined
    pub subject_id: i64,
    /// Whether students can currently see the exam
    pub visible: bool,
    /// Allowed time in minutes
    pub exam_duration: i32,
    /// When the row was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Exam and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each exam belongs to one subject
    #[sea_orm(
        belongs_to = "super::subject::Entity",
        from = "Column::SubjectId",
        to = "super::subject::Column::Id"
    )]
    Subject,
    /// One exam has many questions
    #[sea_orm(has_many = "super::question::Entity")]
    Questions,
}

impl Related<super::subject::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subject.def()
    }
}

impl Related<super::question::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Questions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
