//! Category business logic - lazily created, per-owner categories.
//!
//! Categories have no create endpoint of their own: the finance record writers
//! resolve them by name through [`crate::core::resolver`].

use crate::{
    core::resolver::ScopedName,
    core::validate,
    entities::{Category, category},
    errors::Result,
};
use sea_orm::{QueryOrder, Set, prelude::*};

impl ScopedName for Category {
    const LABEL: &'static str = "Category";

    fn name_column() -> category::Column {
        category::Column::Name
    }

    fn scope_column() -> category::Column {
        category::Column::UserId
    }

    fn new_row(scope: &str, name: &str) -> category::ActiveModel {
        category::ActiveModel {
            name: Set(name.to_string()),
            user_id: Set(scope.to_string()),
            ..Default::default()
        }
    }

    fn row_id(model: &category::Model) -> i64 {
        model.id
    }
}

/// Resolves (and creates on first use) the category `name` owned by `user_id`.
pub async fn resolve_category<C>(db: &C, user_id: &str, name: &str) -> Result<i64>
where
    C: ConnectionTrait,
{
    crate::core::resolver::resolve::<Category, C>(db, user_id, name).await
}

/// Lists every category owned by `user_id`, alphabetically.
pub async fn list_categories_for_user(
    db: &DatabaseConnection,
    user_id: Option<&str>,
) -> Result<Vec<category::Model>> {
    let user_id = validate::require_param("userId", user_id)?;
    Category::find()
        .filter(category::Column::UserId.eq(user_id))
        .order_by_asc(category::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;
    use crate::test_utils::setup_test_db;

    #[tokio::test]
    async fn test_list_categories_scoped_and_sorted() -> Result<()> {
        let db = setup_test_db().await?;

        resolve_category(&db, "u1", "Travel").await?;
        resolve_category(&db, "u1", "Food").await?;
        resolve_category(&db, "u2", "Rent").await?;

        let names: Vec<String> = list_categories_for_user(&db, Some("u1"))
            .await?
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Food".to_string(), "Travel".to_string()]);
        Ok(())
    }

    #[tokio::test]
    async fn test_list_categories_requires_user() -> Result<()> {
        let db = setup_test_db().await?;
        let result = list_categories_for_user(&db, None).await;
        assert!(matches!(result, Err(Error::Validation { .. })));
        Ok(())
    }
}
