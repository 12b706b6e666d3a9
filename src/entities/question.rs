//! Question entity - A multiple-choice question attached to an exam.
//!
//! Options are stored as a JSON array; `correct_answer` is always one of them.

use sea_orm::FromJsonQueryResult;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Ordered answer choices, stored as a JSON array of strings
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct AnswerOptions(pub Vec<String>);

impl AnswerOptions {
    /// Returns true when `answer` is exactly one of the options.
    #[must_use]
    pub fn contains(&self, answer: &str) -> bool {
        self.0.iter().any(|option| option == answer)
    }
}

/// Question database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[sea_orm(table_name = "questions")]
pub struct Model {
    /// Unique identifier for the question
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Exam the question belongs to
    pub exam_id: i64,
    /// Prompt text
    pub question: String,
    /// Answer choices in display order
    #[sea_orm(column_type = "Json")]
    pub options: AnswerOptions,
    /// The option that scores
    pub correct_answer: String,
}

/// Defines relationships between Question and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each question belongs to one exam; deleting the exam removes its questions
    #[sea_orm(
        belongs_to = "super::exam::Entity",
        from = "Column::ExamId",
        to = "super::exam::Column::Id",
        on_delete = "Cascade"
    )]
    Exam,
}

impl Related<super::exam::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Exam.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answer_options_match_exactly() {
        let options = AnswerOptions(vec!["Paris".to_string(), "Rome".to_string()]);
        assert!(options.contains("Rome"));
        assert!(!options.contains("rome"));
        assert!(!options.contains("Rome "));
        assert!(!AnswerOptions::default().contains(""));
    }
}
