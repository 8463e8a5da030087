use std::collections::HashMap;

use axum::Json;
use axum::extract::{Query, State};
use sea_orm::*;
use tracing::instrument;

use crate::entity::{category, dish, dish_genre, dish_ingredient, genre, ingredient};
use crate::error::AppError;
use crate::models::dish::DishListItem;
use crate::models::pages::*;
use crate::models::shared::{
    CategoryWithIngredients, GenreRef, IngredientRef, Pagination, parse_id_list, resolve_page,
    resolve_per_page,
};
use crate::search::{DishFilter, MatchMode, filtered_dishes};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/",
    tag = "Search",
    operation_id = "searchPage",
    summary = "Initial search page data",
    description = "Returns the reference lists the search page renders its filter panel from: categories ordered by display order, each with its ingredients, plus all genres.",
    responses(
        (status = 200, description = "Search page reference data", body = SearchPageResponse),
    ),
)]
#[instrument(skip(state))]
pub async fn search_page(
    State(state): State<AppState>,
) -> Result<Json<SearchPageResponse>, AppError> {
    let categories = categories_with_ingredients(&state.db).await?;
    let genres = all_genres(&state.db).await?;

    Ok(Json(SearchPageResponse { categories, genres }))
}

#[utoipa::path(
    get,
    path = "/edit",
    tag = "Search",
    operation_id = "editPage",
    summary = "Dish management page data",
    description = "Returns the reference lists plus all dishes, newest-updated first, paginated. Out-of-range pages return an empty list, not an error.",
    params(PageQuery),
    responses(
        (status = 200, description = "Management page data", body = EditPageResponse),
    ),
)]
#[instrument(skip(state, query))]
pub async fn edit_page(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<EditPageResponse>, AppError> {
    let page = resolve_page(query.page);
    let per_page = resolve_per_page(query.per_page, state.config.catalog.items_per_page);

    let select = filtered_dishes(&DishFilter::default());
    let total = select
        .clone()
        .paginate(&state.db, per_page)
        .num_items()
        .await?;
    let models = select
        .offset(Some((page - 1) * per_page))
        .limit(Some(per_page))
        .all(&state.db)
        .await?;

    let dishes = to_list_items(&state.db, models).await?;
    let categories = categories_with_ingredients(&state.db).await?;
    let genres = all_genres(&state.db).await?;

    Ok(Json(EditPageResponse {
        categories,
        genres,
        dishes,
        pagination: Pagination::new(page, per_page, total),
    }))
}

#[utoipa::path(
    get,
    path = "/search",
    tag = "Search",
    operation_id = "searchDishes",
    summary = "Search dishes by ingredients and genres",
    description = "Filters dishes by the selected ingredient and genre ids. Genres match with OR semantics; ingredients match in `exact` mode (dish contains every selected ingredient) or `fuzzy` mode (dish contains at least one). Empty selections on both dimensions return all dishes, newest-updated first. Non-numeric id tokens are dropped silently.",
    params(SearchQuery),
    responses(
        (status = 200, description = "Filtered, paginated dish list", body = SearchResultsResponse),
    ),
)]
#[instrument(skip(state, query))]
pub async fn search_dishes(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<SearchResultsResponse>, AppError> {
    let filter = DishFilter {
        ingredient_ids: parse_id_list(query.ingredient_ids.as_deref().unwrap_or_default()),
        genre_ids: parse_id_list(query.genre_ids.as_deref().unwrap_or_default()),
        mode: MatchMode::parse(query.mode.as_deref().unwrap_or_default()),
    };
    let view_mode = if query.view_mode.as_deref() == Some("edit") {
        "edit"
    } else {
        "search"
    };

    let page = resolve_page(query.page);
    let per_page = resolve_per_page(query.per_page, state.config.catalog.items_per_page);

    let select = filtered_dishes(&filter);
    let total = select
        .clone()
        .paginate(&state.db, per_page)
        .num_items()
        .await?;
    let models = select
        .offset(Some((page - 1) * per_page))
        .limit(Some(per_page))
        .all(&state.db)
        .await?;

    let data = to_list_items(&state.db, models).await?;

    Ok(Json(SearchResultsResponse {
        data,
        pagination: Pagination::new(page, per_page, total),
        selected_ingredient_ids: filter.ingredient_ids,
        selected_genre_ids: filter.genre_ids,
        mode: filter.mode.as_str(),
        view_mode,
    }))
}

/// All categories ordered by display order, each with its ingredients
/// ordered the same way.
pub(crate) async fn categories_with_ingredients<C: ConnectionTrait>(
    db: &C,
) -> Result<Vec<CategoryWithIngredients>, AppError> {
    let categories = category::Entity::find()
        .order_by_asc(category::Column::DisplayOrder)
        .all(db)
        .await?;
    let ingredients = ingredient::Entity::find()
        .order_by_asc(ingredient::Column::CategoryId)
        .order_by_asc(ingredient::Column::DisplayOrder)
        .all(db)
        .await?;

    let mut by_category: HashMap<i32, Vec<IngredientRef>> = HashMap::new();
    for ing in ingredients {
        by_category
            .entry(ing.category_id)
            .or_default()
            .push(IngredientRef {
                id: ing.id,
                name: ing.name,
            });
    }

    Ok(categories
        .into_iter()
        .map(|c| CategoryWithIngredients {
            ingredients: by_category.remove(&c.id).unwrap_or_default(),
            id: c.id,
            name: c.name,
            display_order: c.display_order,
        })
        .collect())
}

pub(crate) async fn all_genres<C: ConnectionTrait>(db: &C) -> Result<Vec<GenreRef>, AppError> {
    Ok(genre::Entity::find()
        .order_by_asc(genre::Column::Id)
        .all(db)
        .await?
        .into_iter()
        .map(|g| GenreRef {
            id: g.id,
            name: g.name,
        })
        .collect())
}

/// Load both membership sets for a batch of dishes in two queries.
pub(crate) async fn dish_memberships<C: ConnectionTrait>(
    db: &C,
    dish_ids: &[i32],
) -> Result<
    (
        HashMap<i32, Vec<GenreRef>>,
        HashMap<i32, Vec<IngredientRef>>,
    ),
    AppError,
> {
    if dish_ids.is_empty() {
        return Ok((HashMap::new(), HashMap::new()));
    }

    let genre_rows = dish_genre::Entity::find()
        .filter(dish_genre::Column::DishId.is_in(dish_ids.iter().copied()))
        .find_also_related(genre::Entity)
        .order_by_asc(dish_genre::Column::GenreId)
        .all(db)
        .await?;
    let mut genres: HashMap<i32, Vec<GenreRef>> = HashMap::new();
    for (edge, g) in genre_rows {
        if let Some(g) = g {
            genres.entry(edge.dish_id).or_default().push(GenreRef {
                id: g.id,
                name: g.name,
            });
        }
    }

    let ingredient_rows = dish_ingredient::Entity::find()
        .filter(dish_ingredient::Column::DishId.is_in(dish_ids.iter().copied()))
        .find_also_related(ingredient::Entity)
        .order_by_asc(dish_ingredient::Column::IngredientId)
        .all(db)
        .await?;
    let mut ingredients: HashMap<i32, Vec<IngredientRef>> = HashMap::new();
    for (edge, i) in ingredient_rows {
        if let Some(i) = i {
            ingredients
                .entry(edge.dish_id)
                .or_default()
                .push(IngredientRef {
                    id: i.id,
                    name: i.name,
                });
        }
    }

    Ok((genres, ingredients))
}

pub(crate) async fn to_list_items<C: ConnectionTrait>(
    db: &C,
    models: Vec<dish::Model>,
) -> Result<Vec<DishListItem>, AppError> {
    let ids: Vec<i32> = models.iter().map(|m| m.id).collect();
    let (mut genres, mut ingredients) = dish_memberships(db, &ids).await?;

    Ok(models
        .into_iter()
        .map(|m| DishListItem {
            genres: genres.remove(&m.id).unwrap_or_default(),
            ingredients: ingredients.remove(&m.id).unwrap_or_default(),
            id: m.id,
            name: m.name,
            difficulty: m.difficulty,
            updated_at: m.updated_at,
        })
        .collect())
}
