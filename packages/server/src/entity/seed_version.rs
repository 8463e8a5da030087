use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Marker row recording which master-data seed has been applied.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "seed_version")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub version: i32,

    pub applied_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
