use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::user;

pub const ROLE_THERAPIST: &str = "therapist";
pub const ROLE_NURSE: &str = "nurse";
pub const ROLE_ADMIN: &str = "admin";
pub const ROLES: [&str; 3] = [ROLE_THERAPIST, ROLE_NURSE, ROLE_ADMIN];

/// A role granted to a user.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "permission")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub permission_id: i32,
    pub user_id: i32,
    pub role: String,
    #[serde(default)]
    pub row_version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    User,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::User => Entity::belongs_to(user::Entity)
                .from(Column::UserId)
                .to(user::Column::UserId)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_role(role: &str) -> Result<(), ModelError> {
    if !ROLES.contains(&role) {
        return Err(ModelError::Validation(format!(
            "role must be one of {}",
            ROLES.join(", ")
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_known_roles_pass() {
        for role in ROLES {
            assert!(validate_role(role).is_ok());
        }
        assert!(validate_role("Therapist").is_err());
        assert!(validate_role("janitor").is_err());
        assert!(validate_role("").is_err());
    }
}
