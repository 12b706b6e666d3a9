//! Shared test utilities.
//!
//! Helpers for setting up an in-memory store and building request payloads
//! with sensible defaults.

use crate::{
    core::{
        budget::{BudgetFields, NewBudget},
        exam::NewExam,
        expense::{ExpenseFields, NewExpense},
        income::{IncomeFields, NewIncome},
        question::{NewQuestion, QuestionDraft},
        subject::{self, NewSubject},
    },
    entities,
    errors::Result,
};
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a subject named `name` in `school_id`.
pub async fn create_test_subject(
    db: &DatabaseConnection,
    school_id: &str,
    name: &str,
) -> Result<entities::subject::Model> {
    subject::create_subject(
        db,
        NewSubject {
            name: name.to_string(),
            school_id: school_id.to_string(),
        },
    )
    .await
}

/// Expense payload without a description.
pub fn new_expense(user_id: &str, amount: f64, category: &str, date: &str) -> NewExpense {
    NewExpense {
        user_id: user_id.to_string(),
        fields: ExpenseFields {
            amount,
            category: category.to_string(),
            description: None,
            date: date.to_string(),
        },
    }
}

/// Income payload.
pub fn new_income(
    user_id: &str,
    amount: f64,
    category: &str,
    source: &str,
    date: &str,
) -> NewIncome {
    NewIncome {
        user_id: user_id.to_string(),
        fields: IncomeFields {
            amount,
            category: category.to_string(),
            source: source.to_string(),
            date: date.to_string(),
        },
    }
}

/// Budget payload.
pub fn new_budget(
    user_id: &str,
    amount: f64,
    category: &str,
    start_date: &str,
    end_date: &str,
) -> NewBudget {
    NewBudget {
        user_id: user_id.to_string(),
        fields: BudgetFields {
            amount,
            category: category.to_string(),
            start_date: start_date.to_string(),
            end_date: end_date.to_string(),
        },
    }
}

/// Exam payload referencing an existing subject by id.
///
/// # Defaults
/// * `visible`: false
/// * `exam_duration`: 60 minutes
pub fn new_exam(school_id: &str, level: &str, term_type: &str, subject_id: i64) -> NewExam {
    NewExam {
        school_id: school_id.to_string(),
        level: level.to_string(),
        term_type: term_type.to_string(),
        subject_id: Some(subject_id),
        subject_name: None,
        visible: false,
        exam_duration: 60,
    }
}

/// Single-question payload.
pub fn new_question(exam_id: i64, prompt: &str, options: &[&str], answer: &str) -> NewQuestion {
    NewQuestion {
        exam_id,
        draft: QuestionDraft {
            question: prompt.to_string(),
            options: options.iter().map(ToString::to_string).collect(),
            correct_answer: answer.to_string(),
        },
    }
}
