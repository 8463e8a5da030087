use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "dish_ingredient")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub dish_id: i32,
    #[sea_orm(primary_key)]
    pub ingredient_id: i32,
    #[sea_orm(belongs_to, from = "dish_id", to = "id")]
    pub dish: Option<super::dish::Entity>,
    #[sea_orm(belongs_to, from = "ingredient_id", to = "id")]
    pub ingredient: Option<super::ingredient::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
