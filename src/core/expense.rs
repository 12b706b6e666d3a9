//! Expense business logic - Handles all expense-related operations.
//!
//! Expenses name their category by text. Creating or updating an expense
//! resolves that name to a category row of the owner (creating it on first use)
//! inside the same store transaction as the expense write, so an expense never
//! points at a missing category.

use crate::{
    core::{
        category::resolve_category,
        validate,
        view::{CategorizedRecord, with_categories, with_category},
    },
    entities::{Category, Expense, expense},
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use serde::Deserialize;
use tracing::{debug, info};

/// Mutable fields of an expense, as sent by the client
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseFields {
    /// Amount spent, must be positive
    pub amount: f64,
    /// Category name, resolved within the owner's categories
    pub category: String,
    /// Optional note
    #[serde(default)]
    pub description: Option<String>,
    /// `YYYY-MM-DD` or RFC 3339
    pub date: String,
}

/// Payload for creating an expense
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExpense {
    /// Owner of the expense
    pub user_id: String,
    /// Expense fields
    #[serde(flatten)]
    pub fields: ExpenseFields,
}

struct CheckedFields {
    amount: f64,
    category: String,
    description: Option<String>,
    date: DateTime<Utc>,
}

impl ExpenseFields {
    fn check(self) -> Result<CheckedFields> {
        Ok(CheckedFields {
            amount: validate::require_amount(self.amount)?,
            category: validate::require_text("category", &self.category)?,
            description: validate::optional_text(self.description),
            date: validate::parse_date("date", &self.date)?,
        })
    }
}

/// Creates an expense, resolving its category for the owner first.
///
/// # Errors
/// Returns an error if:
/// - `userId` or `category` is blank, or `date` cannot be parsed
/// - The amount is not a positive finite number
/// - The database write fails
pub async fn create_expense(
    db: &DatabaseConnection,
    payload: NewExpense,
) -> Result<CategorizedRecord<expense::Model>> {
    let user_id = validate::require_text("userId", &payload.user_id)?;
    let fields = payload.fields.check()?;

    let txn = db.begin().await?;
    let category_id = resolve_category(&txn, &user_id, &fields.category).await?;

    let expense = expense::ActiveModel {
        user_id: Set(user_id),
        category_id: Set(category_id),
        amount: Set(fields.amount),
        description: Set(fields.description),
        date: Set(fields.date),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    let created = expense.insert(&txn).await?;
    txn.commit().await?;

    info!(id = created.id, user_id = %created.user_id, amount = created.amount, "Created expense");
    Ok(CategorizedRecord {
        record: created,
        category: fields.category,
    })
}

/// Lists all expenses of an owner, newest first, with category names.
pub async fn list_expenses_for_user(
    db: &DatabaseConnection,
    user_id: Option<&str>,
) -> Result<Vec<CategorizedRecord<expense::Model>>> {
    let user_id = validate::require_param("userId", user_id)?;
    debug!(user_id = %user_id, "Listing expenses");

    let rows = Expense::find()
        .filter(expense::Column::UserId.eq(user_id))
        .order_by_desc(expense::Column::CreatedAt)
        .order_by_desc(expense::Column::Id)
        .find_also_related(Category)
        .all(db)
        .await?;
    Ok(with_categories(rows))
}

/// Retrieves a specific expense by its ID, with its category name.
pub async fn get_expense(
    db: &DatabaseConnection,
    expense_id: i64,
) -> Result<CategorizedRecord<expense::Model>> {
    let (expense, category) = Expense::find_by_id(expense_id)
        .find_also_related(Category)
        .one(db)
        .await?
        .ok_or(Error::NotFound { entity: "Expense" })?;
    Ok(with_category(expense, category))
}

/// Replaces the mutable fields of an expense.
///
/// The category is resolved within the expense owner's scope.
pub async fn update_expense(
    db: &DatabaseConnection,
    expense_id: i64,
    fields: ExpenseFields,
) -> Result<CategorizedRecord<expense::Model>> {
    let fields = fields.check()?;

    let txn = db.begin().await?;
    let existing = Expense::find_by_id(expense_id)
        .one(&txn)
        .await?
        .ok_or(Error::NotFound { entity: "Expense" })?;
    let category_id = resolve_category(&txn, &existing.user_id, &fields.category).await?;

    let mut expense: expense::ActiveModel = existing.into();
    expense.category_id = Set(category_id);
    expense.amount = Set(fields.amount);
    expense.description = Set(fields.description);
    expense.date = Set(fields.date);
    let updated = expense.update(&txn).await?;
    txn.commit().await?;

    info!(id = updated.id, "Updated expense");
    Ok(CategorizedRecord {
        record: updated,
        category: fields.category,
    })
}

/// Deletes an expense by ID.
///
/// # Errors
/// [`Error::NotFound`] when no row had that ID.
pub async fn delete_expense(db: &DatabaseConnection, expense_id: i64) -> Result<()> {
    let result = Expense::delete_by_id(expense_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::NotFound { entity: "Expense" });
    }
    info!(id = expense_id, "Deleted expense");
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase, PaginatorTrait};

    #[tokio::test]
    async fn test_create_expense_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        let result = create_expense(&db, new_expense("u1", 0.0, "Food", "2024-01-01")).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InvalidAmount { amount: 0.0 }
        ));

        let result = create_expense(&db, new_expense("u1", f64::NAN, "Food", "2024-01-01")).await;
        assert!(matches!(result.unwrap_err(), Error::InvalidAmount { .. }));

        let result = create_expense(&db, new_expense("", 10.0, "Food", "2024-01-01")).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));

        let result = create_expense(&db, new_expense("u1", 10.0, " ", "2024-01-01")).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));

        let result = create_expense(&db, new_expense("u1", 10.0, "Food", "01/02/2024")).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_and_list_round_trip() -> Result<()> {
        let db = setup_test_db().await?;

        let created = create_expense(&db, new_expense("u1", 42.0, "Food", "2024-01-01")).await?;
        assert_eq!(created.category, "Food");

        let listed = list_expenses_for_user(&db, Some("u1")).await?;
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].category, "Food");
        assert_eq!(listed[0].record.amount, 42.0);
        assert_eq!(listed[0].record.date.to_rfc3339(), "2024-01-01T00:00:00+00:00");
        assert_eq!(listed[0].record.category_id, created.record.category_id);

        assert!(list_expenses_for_user(&db, Some("someone-else")).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_same_category_name_shares_category_id() -> Result<()> {
        let db = setup_test_db().await?;

        let first = create_expense(&db, new_expense("u1", 5.0, "Food", "2024-01-01")).await?;
        let second = create_expense(&db, new_expense("u1", 7.5, "Food", "2024-01-02")).await?;
        assert_eq!(first.record.category_id, second.record.category_id);

        assert_eq!(Category::find().count(&db).await?, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_list_is_newest_first() -> Result<()> {
        let db = setup_test_db().await?;

        let older = create_expense(&db, new_expense("u1", 1.0, "Food", "2024-01-01")).await?;
        let newer = create_expense(&db, new_expense("u1", 2.0, "Rent", "2023-06-01")).await?;

        let listed = list_expenses_for_user(&db, Some("u1")).await?;
        assert_eq!(listed[0].record.id, newer.record.id);
        assert_eq!(listed[1].record.id, older.record.id);
        Ok(())
    }

    #[tokio::test]
    async fn test_list_requires_user_id() -> Result<()> {
        let db = setup_test_db().await?;
        let result = list_expenses_for_user(&db, Some("")).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_expense_replaces_fields_and_category() -> Result<()> {
        let db = setup_test_db().await?;
        let created = create_expense(&db, new_expense("u1", 42.0, "Food", "2024-01-01")).await?;

        let updated = update_expense(
            &db,
            created.record.id,
            ExpenseFields {
                amount: 50.0,
                category: "Groceries".to_string(),
                description: Some("weekly shop".to_string()),
                date: "2024-02-01T09:30:00Z".to_string(),
            },
        )
        .await?;

        assert_eq!(updated.category, "Groceries");
        assert_eq!(updated.record.amount, 50.0);
        assert_eq!(updated.record.user_id, "u1");
        assert_ne!(updated.record.category_id, created.record.category_id);
        assert_eq!(updated.record.created_at, created.record.created_at);

        let fetched = get_expense(&db, created.record.id).await?;
        assert_eq!(fetched.category, "Groceries");
        assert_eq!(fetched.record.description.as_deref(), Some("weekly shop"));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_missing_expense_is_not_found() -> Result<()> {
        let db = setup_test_db().await?;
        let result = update_expense(
            &db,
            404,
            ExpenseFields {
                amount: 1.0,
                category: "Food".to_string(),
                description: None,
                date: "2024-01-01".to_string(),
            },
        )
        .await;
        assert!(matches!(
            result.unwrap_err(),
            Error::NotFound { entity: "Expense" }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_then_get_is_not_found() -> Result<()> {
        let db = setup_test_db().await?;
        let created = create_expense(&db, new_expense("u1", 42.0, "Food", "2024-01-01")).await?;

        delete_expense(&db, created.record.id).await?;

        let fetched = get_expense(&db, created.record.id).await;
        assert!(matches!(fetched.unwrap_err(), Error::NotFound { .. }));

        let again = delete_expense(&db, created.record.id).await;
        assert!(matches!(again.unwrap_err(), Error::NotFound { .. }));

        // The category outlives its records
        assert_eq!(Category::find().count(&db).await?, 1);
        Ok(())
    }
}
