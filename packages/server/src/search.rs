use sea_orm::sea_query::Query as SeaQuery;
use sea_orm::*;

use crate::entity::{dish, dish_genre, dish_ingredient};

/// How selected ingredients are matched against a dish's ingredient set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MatchMode {
    /// The dish must contain every selected ingredient (superset match).
    Exact,
    /// The dish must contain at least one selected ingredient.
    #[default]
    Fuzzy,
}

impl MatchMode {
    /// Parse the `mode` query value. Anything other than `exact` falls
    /// back to fuzzy, matching the form's default.
    pub fn parse(raw: &str) -> Self {
        if raw == "exact" {
            MatchMode::Exact
        } else {
            MatchMode::Fuzzy
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MatchMode::Exact => "exact",
            MatchMode::Fuzzy => "fuzzy",
        }
    }
}

/// A dish search selection.
#[derive(Clone, Debug, Default)]
pub struct DishFilter {
    pub ingredient_ids: Vec<i32>,
    pub genre_ids: Vec<i32>,
    pub mode: MatchMode,
}

/// Compile a filter into a single query over `dish`.
///
/// Genre selection keeps dishes with at least one selected genre
/// regardless of mode. Ordering is newest-updated first, ties broken by
/// id descending so pagination is deterministic.
pub fn filtered_dishes(filter: &DishFilter) -> Select<dish::Entity> {
    let mut select = dish::Entity::find();

    if !filter.genre_ids.is_empty() {
        select = select.filter(
            dish::Column::Id.in_subquery(
                SeaQuery::select()
                    .column(dish_genre::Column::DishId)
                    .from(dish_genre::Entity)
                    .and_where(dish_genre::Column::GenreId.is_in(filter.genre_ids.iter().copied()))
                    .to_owned(),
            ),
        );
    }

    if !filter.ingredient_ids.is_empty() {
        match filter.mode {
            MatchMode::Exact => {
                // One membership subquery per selected ingredient.
                for &ingredient_id in &filter.ingredient_ids {
                    select = select.filter(
                        dish::Column::Id.in_subquery(
                            SeaQuery::select()
                                .column(dish_ingredient::Column::DishId)
                                .from(dish_ingredient::Entity)
                                .and_where(dish_ingredient::Column::IngredientId.eq(ingredient_id))
                                .to_owned(),
                        ),
                    );
                }
            }
            MatchMode::Fuzzy => {
                select = select.filter(
                    dish::Column::Id.in_subquery(
                        SeaQuery::select()
                            .column(dish_ingredient::Column::DishId)
                            .from(dish_ingredient::Entity)
                            .and_where(
                                dish_ingredient::Column::IngredientId
                                    .is_in(filter.ingredient_ids.iter().copied()),
                            )
                            .to_owned(),
                    ),
                );
            }
        }
    }

    select
        .order_by_desc(dish::Column::UpdatedAt)
        .order_by_desc(dish::Column::Id)
}
