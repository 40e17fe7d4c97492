use sea_orm::entity::prelude::*;
use sea_orm::sea_query::StringLen;
use serde::{Deserialize, Serialize};

use crate::entities::user_metadata::UserMetadata;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    #[sea_orm(unique)]
    pub email: String,

    /// SHA-256 hex digest of the plaintext password
    pub password: String,

    /// Argon2id hash computed over the digest
    pub password_hash: String,

    /// Random 32-char key; doubles as the token `jti` claim
    #[sea_orm(unique)]
    pub auth_key: String,

    pub first_name: String,

    pub last_name: String,

    pub role: UserRole,

    pub status: UserStatus,

    #[sea_orm(column_type = "Json")]
    pub metadata: UserMetadata,

    pub created_at: DateTimeUtc,

    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[sea_orm(string_value = "user")]
    User,
    #[sea_orm(string_value = "admin")]
    Admin,
}

impl UserRole {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "i16", db_type = "SmallInteger")]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    #[sea_orm(num_value = 0)]
    Deleted,
    #[sea_orm(num_value = 1)]
    Disabled,
    #[sea_orm(num_value = 2)]
    Blocked,
    #[sea_orm(num_value = 3)]
    Inactive,
    #[sea_orm(num_value = 10)]
    Active,
}

impl Model {
    #[must_use]
    pub fn fullname(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
