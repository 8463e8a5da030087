use sea_orm::*;
use tracing::info;

use crate::entity::{category, genre, seed_version};

/// Current master-data revision. Bump when the fixed lists below change.
pub const SEED_VERSION: i32 = 1;

/// Fixed ingredient categories: (id, name, display_order).
const CATEGORIES: &[(i32, &str, i32)] = &[
    (1, "肉", 1),
    (2, "魚介", 2),
    (3, "野菜", 3),
    (4, "加工食品", 4),
    (5, "既製品", 5),
];

/// Fixed dish genres: (id, name).
const GENRES: &[(i32, &str)] = &[
    (1, "和風"),
    (2, "洋風"),
    (3, "中華"),
    (4, "パスタ"),
    (5, "麺"),
    (6, "海鮮"),
    (7, "汁物"),
    (8, "副菜"),
];

/// Seed the fixed category and genre lists on first startup.
///
/// The whole operation runs in one transaction guarded by a `seed_version`
/// marker row, so an interrupted seed rolls back wholesale and a rerun
/// starts from scratch instead of treating a partial set as complete.
pub async fn seed_master_data(db: &DatabaseConnection) -> Result<(), DbErr> {
    let txn = db.begin().await?;

    if seed_version::Entity::find_by_id(SEED_VERSION)
        .one(&txn)
        .await?
        .is_some()
    {
        txn.rollback().await?;
        return Ok(());
    }

    for &(id, name, display_order) in CATEGORIES {
        category::ActiveModel {
            id: Set(id),
            name: Set(name.to_string()),
            display_order: Set(display_order),
        }
        .insert(&txn)
        .await?;
    }

    for &(id, name) in GENRES {
        genre::ActiveModel {
            id: Set(id),
            name: Set(name.to_string()),
        }
        .insert(&txn)
        .await?;
    }

    seed_version::ActiveModel {
        version: Set(SEED_VERSION),
        applied_at: Set(chrono::Utc::now()),
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;
    info!(
        categories = CATEGORIES.len(),
        genres = GENRES.len(),
        "Seeded master data"
    );

    Ok(())
}
