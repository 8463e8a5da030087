use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "ingredient")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub name: String,

    pub category_id: i32,
    #[sea_orm(belongs_to, from = "category_id", to = "id")]
    pub category: Option<super::category::Entity>,

    /// Ordering within the owning category, assigned max+1 on insert.
    pub display_order: i32,

    #[sea_orm(has_many, via = "dish_ingredient")]
    pub dishes: HasMany<super::dish::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
