//! Finance routes: expenses, incomes, budgets and categories.

use crate::{
    api::{
        AppState,
        error::{ValidJson, ValidPath, ValidQuery},
    },
    core::{
        budget::{self, BudgetFields, NewBudget},
        category,
        expense::{self, ExpenseFields, NewExpense},
        income::{self, IncomeFields, NewIncome},
        view::CategorizedRecord,
    },
    entities::{BudgetModel, CategoryModel, ExpenseModel, IncomeModel},
    errors::Result,
};
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::get,
};
use serde::Deserialize;
use serde_json::{Value, json};

/// `?userId=` filter used by every list route
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerQuery {
    /// Owner whose rows are listed
    pub user_id: Option<String>,
}

/// Finance route group
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/categories", get(list_categories))
        .route("/api/expenses", get(list_expenses).post(create_expense))
        .route(
            "/api/expenses/:id",
            get(get_expense).put(update_expense).delete(delete_expense),
        )
        .route("/api/incomes", get(list_incomes).post(create_income))
        .route(
            "/api/incomes/:id",
            get(get_income).put(update_income).delete(delete_income),
        )
        .route("/api/budgets", get(list_budgets).post(create_budget))
        .route(
            "/api/budgets/:id",
            get(get_budget).put(update_budget).delete(delete_budget),
        )
}

fn deleted(entity: &str) -> Json<Value> {
    Json(json!({ "message": format!("{entity} deleted successfully") }))
}

async fn list_categories(
    State(state): State<AppState>,
    ValidQuery(query): ValidQuery<OwnerQuery>,
) -> Result<Json<Vec<CategoryModel>>> {
    let categories = category::list_categories_for_user(&state.db, query.user_id.as_deref()).await?;
    Ok(Json(categories))
}

// === Expenses ===

async fn create_expense(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<NewExpense>,
) -> Result<(StatusCode, Json<CategorizedRecord<ExpenseModel>>)> {
    let created = expense::create_expense(&state.db, payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn list_expenses(
    State(state): State<AppState>,
    ValidQuery(query): ValidQuery<OwnerQuery>,
) -> Result<Json<Vec<CategorizedRecord<ExpenseModel>>>> {
    let expenses = expense::list_expenses_for_user(&state.db, query.user_id.as_deref()).await?;
    Ok(Json(expenses))
}

async fn get_expense(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<i64>,
) -> Result<Json<CategorizedRecord<ExpenseModel>>> {
    Ok(Json(expense::get_expense(&state.db, id).await?))
}

async fn update_expense(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<i64>,
    ValidJson(fields): ValidJson<ExpenseFields>,
) -> Result<Json<CategorizedRecord<ExpenseModel>>> {
    Ok(Json(expense::update_expense(&state.db, id, fields).await?))
}

async fn delete_expense(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<i64>,
) -> Result<Json<Value>> {
    expense::delete_expense(&state.db, id).await?;
    Ok(deleted("Expense"))
}

// === Incomes ===

async fn create_income(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<NewIncome>,
) -> Result<(StatusCode, Json<CategorizedRecord<IncomeModel>>)> {
    let created = income::create_income(&state.db, payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn list_incomes(
    State(state): State<AppState>,
    ValidQuery(query): ValidQuery<OwnerQuery>,
) -> Result<Json<Vec<CategorizedRecord<IncomeModel>>>> {
    let incomes = income::list_incomes_for_user(&state.db, query.user_id.as_deref()).await?;
    Ok(Json(incomes))
}

async fn get_income(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<i64>,
) -> Result<Json<CategorizedRecord<IncomeModel>>> {
    Ok(Json(income::get_income(&state.db, id).await?))
}

async fn update_income(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<i64>,
    ValidJson(fields): ValidJson<IncomeFields>,
) -> Result<Json<CategorizedRecord<IncomeModel>>> {
    Ok(Json(income::update_income(&state.db, id, fields).await?))
}

async fn delete_income(State(state): State<AppState>, ValidPath(id): ValidPath<i64>) -> Result<Json<Value>> {
    income::delete_income(&state.db, id).await?;
    Ok(deleted("Income"))
}

// === Budgets ===

async fn create_budget(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<NewBudget>,
) -> Result<(StatusCode, Json<CategorizedRecord<BudgetModel>>)> {
    let created = budget::create_budget(&state.db, payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn list_budgets(
    State(state): State<AppState>,
    ValidQuery(query): ValidQuery<OwnerQuery>,
) -> Result<Json<Vec<CategorizedRecord<BudgetModel>>>> {
    let budgets = budget::list_budgets_for_user(&state.db, query.user_id.as_deref()).await?;
    Ok(Json(budgets))
}

async fn get_budget(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<i64>,
) -> Result<Json<CategorizedRecord<BudgetModel>>> {
    Ok(Json(budget::get_budget(&state.db, id).await?))
}

async fn update_budget(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<i64>,
    ValidJson(fields): ValidJson<BudgetFields>,
) -> Result<Json<CategorizedRecord<BudgetModel>>> {
    Ok(Json(budget::update_budget(&state.db, id, fields).await?))
}

async fn delete_budget(State(state): State<AppState>, ValidPath(id): ValidPath<i64>) -> Result<Json<Value>> {
    budget::delete_budget(&state.db, id).await?;
    Ok(deleted("Budget"))
}
