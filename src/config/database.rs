//! Database configuration module.
//!
//! This module handles the `SQLite` connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the schema always matches the Rust
//! structs. Composite natural keys are not expressible on the entities, so their
//! unique indexes are created here right after the tables.

use crate::entities::{
    Budget, Category, Exam, Expense, Income, Question, Subject, User, category, exam, subject,
};
use crate::errors::Result;
use sea_orm::sea_query::{Index, IndexCreateStatement};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema};
use tracing::{debug, info};

/// Default database used when neither `DATABASE_URL` nor config.toml names one.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/records.sqlite?mode=rwc";

/// Establishes a connection to the database at `database_url` and makes sure
/// all tables and natural-key indexes exist.
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    debug!("Connecting to database at {}", database_url);
    let db = Database::connect(database_url).await?;
    create_tables(&db).await?;
    info!("Database ready");
    Ok(db)
}

async fn create_table<E, C>(db: &C, schema: &Schema, entity: E) -> Result<()>
where
    E: EntityTrait,
    C: ConnectionTrait,
{
    let builder = db.get_database_backend();
    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();
    db.execute(builder.build(&statement)).await?;
    Ok(())
}

fn natural_key_indexes() -> Vec<IndexCreateStatement> {
    vec![
        Index::create()
            .name("idx_categories_name_user")
            .table(Category)
            .col(category::Column::Name)
            .col(category::Column::UserId)
            .unique()
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("idx_subjects_name_school")
            .table(Subject)
            .col(subject::Column::Name)
            .col(subject::Column::SchoolId)
            .unique()
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("idx_exams_school_level_term_subject")
            .table(Exam)
            .col(exam::Column::SchoolId)
            .col(exam::Column::Level)
            .col(exam::Column::TermType)
            .col(exam::Column::SubjectId)
            .unique()
            .if_not_exists()
            .to_owned(),
    ]
}

/// Creates all tables (parents first) and the unique indexes backing the
/// natural keys. Safe to run on every startup.
pub async fn create_tables<C>(db: &C) -> Result<()>
where
    C: ConnectionTrait,
{
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    create_table(db, &schema, User).await?;
    create_table(db, &schema, Category).await?;
    create_table(db, &schema, Expense).await?;
    create_table(db, &schema, Income).await?;
    create_table(db, &schema, Budget).await?;
    create_table(db, &schema, Subject).await?;
    create_table(db, &schema, Exam).await?;
    create_table(db, &schema, Question).await?;

    for index in natural_key_indexes() {
        db.execute(builder.build(&index)).await?;
    }

    Ok(())
}
