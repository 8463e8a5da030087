use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "dish")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,
    pub difficulty: i32, // 1 (easy) to 5 (involved)
    pub memo: Option<String>,

    #[sea_orm(has_many, via = "dish_genre")]
    pub genres: HasMany<super::genre::Entity>,

    #[sea_orm(has_many, via = "dish_ingredient")]
    pub ingredients: HasMany<super::ingredient::Entity>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
