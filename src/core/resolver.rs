//! Find-or-create resolution of scoped parent rows (categories, subjects).
//!
//! A parent row is identified by its natural key `(name, scope)`, where the
//! scope is the owning user or school. [`resolve`] returns the id of the row
//! with that key, inserting it first when it does not exist yet.
//!
//! The insert is `INSERT .. ON CONFLICT (name, scope) DO NOTHING` against the
//! unique index created in `config::database`, followed by a re-read. Two
//! concurrent resolutions of the same new key therefore land on the same row:
//! the loser's insert is a no-op and its re-read sees the winner's row.

use crate::errors::{Error, Result};
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, QueryFilter};
use tracing::{debug, info};

/// An entity whose rows are uniquely named within a scope.
pub trait ScopedName: EntityTrait {
    /// Entity label used in error messages (e.g. `"Category"`)
    const LABEL: &'static str;

    /// Column holding the name half of the natural key
    fn name_column() -> Self::Column;

    /// Column holding the scope half of the natural key
    fn scope_column() -> Self::Column;

    /// Fresh row for the key, ready to insert
    fn new_row(scope: &str, name: &str) -> Self::ActiveModel;

    /// Surrogate key of a stored row
    fn row_id(model: &Self::Model) -> i64;
}

/// Looks up the row with key `(name, scope)` without creating it.
pub async fn find_by_key<E, C>(db: &C, scope: &str, name: &str) -> Result<Option<E::Model>>
where
    E: ScopedName,
    C: ConnectionTrait,
{
    E::find()
        .filter(E::name_column().eq(name))
        .filter(E::scope_column().eq(scope))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Returns the id of the row keyed by `(name, scope)`, creating the row if needed.
///
/// `name` is trimmed first. Calling this twice with the same key yields the same
/// id and leaves exactly one row.
///
/// # Errors
/// Returns [`Error::Validation`] when `name` or `scope` is blank, and
/// [`Error::Database`] on any store failure.
pub async fn resolve<E, C>(db: &C, scope: &str, name: &str) -> Result<i64>
where
    E: ScopedName,
    E::Model: IntoActiveModel<E::ActiveModel>,
    C: ConnectionTrait,
{
    let name = name.trim();
    let scope = scope.trim();
    if name.is_empty() {
        return Err(Error::validation(format!("{} name is required", E::LABEL)));
    }
    if scope.is_empty() {
        return Err(Error::validation(format!("{} scope is required", E::LABEL)));
    }

    if let Some(existing) = find_by_key::<E, C>(db, scope, name).await? {
        debug!(kind = E::LABEL, name, scope, "Resolved existing row");
        return Ok(E::row_id(&existing));
    }

    let inserted = E::insert(E::new_row(scope, name))
        .on_conflict(
            OnConflict::columns([E::name_column(), E::scope_column()])
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;

    let row = find_by_key::<E, C>(db, scope, name)
        .await?
        .ok_or(Error::NotFound { entity: E::LABEL })?;

    if inserted > 0 {
        info!(kind = E::LABEL, name, scope, id = E::row_id(&row), "Created row on first use");
    } else {
        debug!(kind = E::LABEL, name, scope, "Lost insert race, reusing existing row");
    }

    Ok(E::row_id(&row))
}
