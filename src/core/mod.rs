//! Core business logic - framework-agnostic operations over the store.
//!
//! Every operation is a plain async function taking a `SeaORM` connection, so
//! the HTTP layer stays a thin translation of requests into these calls.

/// Budget operations
pub mod budget;
/// Per-owner expense/income categories
pub mod category;
/// Exam scheduling, visibility and detail lookups
pub mod exam;
/// Expense operations
pub mod expense;
/// Income operations
pub mod income;
/// Multiple-choice questions attached to exams
pub mod question;
/// Find-or-create by `(name, scope)` natural key
pub mod resolver;
/// School subjects
pub mod subject;
/// Registration and login
pub mod user;
/// Shared input checks
pub mod validate;
/// Client-facing projections of joined rows
pub mod view;
