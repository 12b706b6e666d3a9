//! User entity - Owners of categories and financial records.
//!
//! Only the Argon2 hash of the password is stored. The hash is never serialized.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Opaque identifier (UUID v4 string)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Login name, unique across all users
    #[sea_orm(unique)]
    pub username: String,
    /// PHC-formatted Argon2 hash
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// When the account was registered
    pub created_at: DateTimeUtc,
}

/// Users are referenced by opaque `user_id` strings, not by foreign keys
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
