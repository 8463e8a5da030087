use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "category")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub name: String,
    pub display_order: i32,

    #[sea_orm(has_many)]
    pub ingredients: HasMany<super::ingredient::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
