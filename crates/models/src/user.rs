use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// Staff account. `password` is write-only over the API: it is accepted on
/// input and never serialized back out.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: i32,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub address: Option<String>,
    pub phone_number: Option<String>,
    #[sea_orm(unique)]
    pub username: String,
    #[serde(default, skip_serializing)]
    pub password: String,
    #[serde(default = "crate::default_active")]
    pub active: bool,
    #[serde(default)]
    pub row_version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match *self {}
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub const MAX_USERNAME_LEN: usize = 128;

pub fn validate_username(username: &str) -> Result<(), ModelError> {
    if username.trim().is_empty() {
        return Err(ModelError::Validation("username required".into()));
    }
    if username.chars().count() > MAX_USERNAME_LEN {
        return Err(ModelError::Validation(format!("username longer than {MAX_USERNAME_LEN} characters")));
    }
    Ok(())
}
