//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod budget;
pub mod category;
pub mod exam;
pub mod expense;
pub mod income;
pub mod question;
pub mod subject;
pub mod user;

// Re-export specific types to avoid conflicts
pub use budget::{Column as BudgetColumn, Entity as Budget, Model as BudgetModel};
pub use category::{Column as CategoryColumn, Entity as Category, Model as CategoryModel};
pub use exam::{Column as ExamColumn, Entity as Exam, Model as ExamModel};
pub use expense::{Column as ExpenseColumn, Entity as Expense, Model as ExpenseModel};
pub use income::{Column as IncomeColumn, Entity as Income, Model as IncomeModel};
pub use question::{
    AnswerOptions, Column as QuestionColumn, Entity as Question, Model as QuestionModel,
};
pub use subject::{Column as SubjectColumn, Entity as Subject, Model as SubjectModel};
pub use user::{Column as UserColumn, Entity as User, Model as UserModel};
