//! Subject business logic - creating, listing and renaming school subjects.
//!
//! Subjects are unique by `(name, school_id)`. The explicit create endpoint
//! reports a duplicate as a conflict, while exam creation may resolve a subject
//! by name and create it on first use.

use crate::{
    core::resolver::ScopedName,
    core::validate,
    entities::{Subject, subject},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use serde::Deserialize;
use tracing::{info, warn};

impl ScopedName for Subject {
    const LABEL: &'static str = "Subject";

    fn name_column() -> subject::Column {
        subject::Column::Name
    }

    fn scope_column() -> subject::Column {
        subject::Column::SchoolId
    }

    fn new_row(scope: &str, name: &str) -> subject::ActiveModel {
        subject::ActiveModel {
            name: Set(name.to_string()),
            school_id: Set(scope.to_string()),
            ..Default::default()
        }
    }

    fn row_id(model: &subject::Model) -> i64 {
        model.id
    }
}

/// Payload for creating a subject
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSubject {
    /// Subject name
    pub name: String,
    /// Owning school
    pub school_id: String,
}

/// Payload for renaming a subject
#[derive(Debug, Clone, Deserialize)]
pub struct SubjectRename {
    /// New subject name
    pub name: String,
}

fn duplicate_message(name: &str) -> String {
    format!("Subject '{name}' already exists for the given school.")
}

/// Creates a subject; a subject with the same name in the same school is a conflict.
pub async fn create_subject(db: &DatabaseConnection, payload: NewSubject) -> Result<subject::Model> {
    let name = validate::require_text("name", &payload.name)?;
    let school_id = validate::require_text("schoolId", &payload.school_id)?;

    let subject = subject::ActiveModel {
        name: Set(name.clone()),
        school_id: Set(school_id.clone()),
        ..Default::default()
    };

    let created = subject.insert(db).await.map_err(|e| {
        let err = Error::conflict_on_unique(e, duplicate_message(&name));
        if matches!(err, Error::Conflict { .. }) {
            warn!(name = %name, school_id = %school_id, "Duplicate subject rejected");
        }
        err
    })?;
    info!(id = created.id, school_id = %created.school_id, "Created subject {}", created.name);
    Ok(created)
}

/// Lists the subjects of a school, alphabetically.
pub async fn list_subjects_for_school(
    db: &DatabaseConnection,
    school_id: &str,
) -> Result<Vec<subject::Model>> {
    Subject::find()
        .filter(subject::Column::SchoolId.eq(school_id))
        .order_by_asc(subject::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a subject by its id.
pub async fn get_subject_by_id<C>(db: &C, subject_id: i64) -> Result<Option<subject::Model>>
where
    C: ConnectionTrait,
{
    Subject::find_by_id(subject_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Renames a subject, keeping it in its school.
///
/// # Errors
/// [`Error::NotFound`] when the id is unknown, [`Error::Conflict`] when the
/// school already has a subject with the new name.
pub async fn rename_subject(
    db: &DatabaseConnection,
    subject_id: i64,
    payload: SubjectRename,
) -> Result<subject::Model> {
    let name = validate::require_text("name", &payload.name)?;

    let mut subject: subject::ActiveModel = get_subject_by_id(db, subject_id)
        .await?
        .ok_or(Error::NotFound { entity: "Subject" })?
        .into();

    subject.name = Set(name.clone());
    subject
        .update(db)
        .await
        .map_err(|e| Error::conflict_on_unique(e, duplicate_message(&name)))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::{create_test_subject, setup_test_db};
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_create_subject_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        let result = create_subject(
            &db,
            NewSubject {
                name: "  ".to_string(),
                school_id: "s1".to_string(),
            },
        )
        .await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_subject_is_conflict() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_subject(&db, "s1", "Biology").await?;

        let result = create_test_subject(&db, "s1", "Biology").await;
        assert!(matches!(result.unwrap_err(), Error::Conflict { .. }));

        // Same name in another school is fine
        create_test_subject(&db, "s2", "Biology").await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_list_subjects_for_school() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_subject(&db, "s1", "Physics").await?;
        create_test_subject(&db, "s1", "Chemistry").await?;
        create_test_subject(&db, "s2", "Art").await?;

        let subjects = list_subjects_for_school(&db, "s1").await?;
        assert_eq!(subjects.len(), 2);
        assert_eq!(subjects[0].name, "Chemistry");

        assert!(list_subjects_for_school(&db, "nowhere").await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_rename_subject() -> Result<()> {
        let db = setup_test_db().await?;
        let physics = create_test_subject(&db, "s1", "Physcis").await?;
        create_test_subject(&db, "s1", "Chemistry").await?;

        let renamed = rename_subject(
            &db,
            physics.id,
            SubjectRename {
                name: "Physics".to_string(),
            },
        )
        .await?;
        assert_eq!(renamed.name, "Physics");
        assert_eq!(renamed.school_id, "s1");

        let clash = rename_subject(
            &db,
            physics.id,
            SubjectRename {
                name: "Chemistry".to_string(),
            },
        )
        .await;
        assert!(matches!(clash.unwrap_err(), Error::Conflict { .. }));

        let missing = rename_subject(
            &db,
            999,
            SubjectRename {
                name: "Anything".to_string(),
            },
        )
        .await;
        assert!(matches!(
            missing.unwrap_err(),
            Error::NotFound { entity: "Subject" }
        ));
        Ok(())
    }
}
