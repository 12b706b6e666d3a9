//! Income business logic.
//!
//! Mirrors expenses, except that every income must name its `source` and all
//! fields are mandatory.

use crate::{
    core::{
        category::resolve_category,
        validate,
        view::{CategorizedRecord, with_categories, with_category},
    },
    entities::{Category, Income, income},
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use serde::Deserialize;
use tracing::info;

/// Mutable fields of an income
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeFields {
    /// Amount received
    pub amount: f64,
    /// Category name, created for the owner if new
    pub category: String,
    /// Where the money came from
    pub source: String,
    /// Day the money arrived
    pub date: String,
}

/// Payload for recording an income
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewIncome {
    /// Owner of the income
    pub user_id: String,
    /// Income fields
    #[serde(flatten)]
    pub fields: IncomeFields,
}

struct CheckedFields {
    amount: f64,
    category: String,
    source: String,
    date: DateTime<Utc>,
}

impl IncomeFields {
    fn check(self) -> Result<CheckedFields> {
        Ok(CheckedFields {
            amount: validate::require_amount(self.amount)?,
            category: validate::require_text("category", &self.category)?,
            source: validate::require_text("source", &self.source)?,
            date: validate::parse_date("date", &self.date)?,
        })
    }
}

/// Records an income, resolving its category for the owner first.
pub async fn create_income(
    db: &DatabaseConnection,
    payload: NewIncome,
) -> Result<CategorizedRecord<income::Model>> {
    let user_id = validate::require_text("userId", &payload.user_id)?;
    let fields = payload.fields.check()?;

    let txn = db.begin().await?;
    let category_id = resolve_category(&txn, &user_id, &fields.category).await?;
    let created = income::ActiveModel {
        user_id: Set(user_id),
        category_id: Set(category_id),
        amount: Set(fields.amount),
        source: Set(fields.source),
        date: Set(fields.date),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;
    txn.commit().await?;

    info!(id = created.id, user_id = %created.user_id, amount = created.amount, "Recorded income");
    Ok(CategorizedRecord {
        record: created,
        category: fields.category,
    })
}

/// Lists all incomes of an owner, newest first.
pub async fn list_incomes_for_user(
    db: &DatabaseConnection,
    user_id: Option<&str>,
) -> Result<Vec<CategorizedRecord<income::Model>>> {
    let user_id = validate::require_param("userId", user_id)?;
    let rows = Income::find()
        .filter(income::Column::UserId.eq(user_id))
        .order_by_desc(income::Column::CreatedAt)
        .order_by_desc(income::Column::Id)
        .find_also_related(Category)
        .all(db)
        .await?;
    Ok(with_categories(rows))
}

/// Retrieves one income with its category name.
pub async fn get_income(
    db: &DatabaseConnection,
    income_id: i64,
) -> Result<CategorizedRecord<income::Model>> {
    let (income, category) = Income::find_by_id(income_id)
        .find_also_related(Category)
        .one(db)
        .await?
        .ok_or(Error::NotFound { entity: "Income" })?;
    Ok(with_category(income, category))
}

/// Replaces the mutable fields of an income.
pub async fn update_income(
    db: &DatabaseConnection,
    income_id: i64,
    fields: IncomeFields,
) -> Result<CategorizedRecord<income::Model>> {
    let fields = fields.check()?;

    let txn = db.begin().await?;
    let existing = Income::find_by_id(income_id)
        .one(&txn)
        .await?
        .ok_or(Error::NotFound { entity: "Income" })?;
    let category_id = resolve_category(&txn, &existing.user_id, &fields.category).await?;

    let mut income: income::ActiveModel = existing.into();
    income.category_id = Set(category_id);
    income.amount = Set(fields.amount);
    income.source = Set(fields.source);
    income.date = Set(fields.date);
    let updated = income.update(&txn).await?;
    txn.commit().await?;

    info!(id = updated.id, "Updated income");
    Ok(CategorizedRecord {
        record: updated,
        category: fields.category,
    })
}

/// Deletes an income by ID.
pub async fn delete_income(db: &DatabaseConnection, income_id: i64) -> Result<()> {
    let result = Income::delete_by_id(income_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::NotFound { entity: "Income" });
    }
    info!(id = income_id, "Deleted income");
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::expense::list_expenses_for_user;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_income_requires_source() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();
        let result = create_income(&db, new_income("u1", 1000.0, "Salary", "  ", "2024-01-31")).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn test_income_crud() -> Result<()> {
        let db = setup_test_db().await?;

        let created =
            create_income(&db, new_income("u1", 1000.0, "Salary", "ACME", "2024-01-31")).await?;
        assert_eq!(created.category, "Salary");
        assert_eq!(created.record.source, "ACME");

        let listed = list_incomes_for_user(&db, Some("u1")).await?;
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].category, "Salary");

        let updated = update_income(
            &db,
            created.record.id,
            IncomeFields {
                amount: 1200.0,
                category: "Salary".to_string(),
                source: "ACME Ltd".to_string(),
                date: "2024-02-29".to_string(),
            },
        )
        .await?;
        assert_eq!(updated.record.amount, 1200.0);
        assert_eq!(updated.record.category_id, created.record.category_id);

        delete_income(&db, created.record.id).await?;
        assert!(matches!(
            get_income(&db, created.record.id).await.unwrap_err(),
            Error::NotFound { entity: "Income" }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_income_and_expense_share_owner_categories() -> Result<()> {
        let db = setup_test_db().await?;

        let income =
            create_income(&db, new_income("u1", 50.0, "Side gigs", "Market", "2024-01-05")).await?;
        crate::core::expense::create_expense(
            &db,
            new_expense("u1", 20.0, "Side gigs", "2024-01-06"),
        )
        .await?;

        let expenses = list_expenses_for_user(&db, Some("u1")).await?;
        assert_eq!(expenses[0].record.category_id, income.record.category_id);
        Ok(())
    }
}
