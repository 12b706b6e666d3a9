//! Budget business logic.
//!
//! A budget caps spending in one category between `startDate` and `endDate`
//! (both inclusive, `startDate <= endDate`).

use crate::{
    core::{
        category::resolve_category,
        validate,
        view::{CategorizedRecord, with_categories, with_category},
    },
    entities::{Budget, Category, budget},
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use serde::Deserialize;
use tracing::info;

/// Mutable fields of a budget
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetFields {
    /// Spending limit
    pub amount: f64,
    /// Category name the limit applies to
    pub category: String,
    /// First covered day
    pub start_date: String,
    /// Last covered day
    pub end_date: String,
}

/// Payload for creating a budget
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBudget {
    /// Owner of the budget
    pub user_id: String,
    /// Budget fields
    #[serde(flatten)]
    pub fields: BudgetFields,
}

struct CheckedFields {
    amount: f64,
    category: String,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
}

impl BudgetFields {
    fn check(self) -> Result<CheckedFields> {
        let start_date = validate::parse_date("startDate", &self.start_date)?;
        let end_date = validate::parse_date("endDate", &self.end_date)?;
        if start_date > end_date {
            return Err(Error::validation("startDate must not be after endDate"));
        }
        Ok(CheckedFields {
            amount: validate::require_amount(self.amount)?,
            category: validate::require_text("category", &self.category)?,
            start_date,
            end_date,
        })
    }
}

/// Creates a budget for the owner's category, creating the category if needed.
///
/// # Errors
/// Returns an error if:
/// - `userId` or `category` is blank
/// - either date is unparseable or the range is inverted
/// - the amount is not a positive finite number
/// - the database write fails
pub async fn create_budget(
    db: &DatabaseConnection,
    payload: NewBudget,
) -> Result<CategorizedRecord<budget::Model>> {
    let user_id = validate::require_text("userId", &payload.user_id)?;
    let fields = payload.fields.check()?;

    let txn = db.begin().await?;
    let category_id = resolve_category(&txn, &user_id, &fields.category).await?;
    let created = budget::ActiveModel {
        user_id: Set(user_id),
        category_id: Set(category_id),
        amount: Set(fields.amount),
        start_date: Set(fields.start_date),
        end_date: Set(fields.end_date),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;
    txn.commit().await?;

    info!(id = created.id, user_id = %created.user_id, amount = created.amount, "Created budget");
    Ok(CategorizedRecord {
        record: created,
        category: fields.category,
    })
}

/// Lists all budgets of an owner, latest first.
pub async fn list_budgets_for_user(
    db: &DatabaseConnection,
    user_id: Option<&str>,
) -> Result<Vec<CategorizedRecord<budget::Model>>> {
    let user_id = validate::require_param("userId", user_id)?;
    let rows = Budget::find()
        .filter(budget::Column::UserId.eq(user_id))
        .order_by_desc(budget::Column::CreatedAt)
        .order_by_desc(budget::Column::Id)
        .find_also_related(Category)
        .all(db)
        .await?;
    Ok(with_categories(rows))
}

/// Retrieves one budget with its category name.
pub async fn get_budget(
    db: &DatabaseConnection,
    budget_id: i64,
) -> Result<CategorizedRecord<budget::Model>> {
    let (budget, category) = Budget::find_by_id(budget_id)
        .find_also_related(Category)
        .one(db)
        .await?
        .ok_or(Error::NotFound { entity: "Budget" })?;
    Ok(with_category(budget, category))
}

/// Replaces amount, category and date range of a budget.
pub async fn update_budget(
    db: &DatabaseConnection,
    budget_id: i64,
    fields: BudgetFields,
) -> Result<CategorizedRecord<budget::Model>> {
    let fields = fields.check()?;

    let txn = db.begin().await?;
    let existing = Budget::find_by_id(budget_id)
        .one(&txn)
        .await?
        .ok_or(Error::NotFound { entity: "Budget" })?;
    let category_id = resolve_category(&txn, &existing.user_id, &fields.category).await?;

    let mut budget: budget::ActiveModel = existing.into();
    budget.category_id = Set(category_id);
    budget.amount = Set(fields.amount);
    budget.start_date = Set(fields.start_date);
    budget.end_date = Set(fields.end_date);
    let updated = budget.update(&txn).await?;
    txn.commit().await?;

    info!(id = updated.id, "Updated budget");
    Ok(CategorizedRecord {
        record: updated,
        category: fields.category,
    })
}

/// Deletes a budget by ID.
pub async fn delete_budget(db: &DatabaseConnection, budget_id: i64) -> Result<()> {
    let result = Budget::delete_by_id(budget_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::NotFound { entity: "Budget" });
    }
    info!(id = budget_id, "Deleted budget");
    Ok(())
}
