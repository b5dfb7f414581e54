use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Catalogue entry for what a therapist can spend time on. Keyed by name.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "therapist_activity")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub activity_name: String,
    #[serde(default)]
    pub is_productive: bool,
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
