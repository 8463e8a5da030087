use axum::Json;
use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Redirect, Response};
use sea_orm::prelude::Expr;
use sea_orm::sea_query::{Func, LikeExpr};
use sea_orm::*;
use serde::Deserialize;
use tracing::instrument;

use crate::entity::{category, dish, dish_ingredient, ingredient};
use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::models::ingredient::*;
use crate::models::shared::{CategoryRef, FieldError, escape_like};
use crate::state::AppState;

use super::pages::categories_with_ingredients;

/// How many referencing dish names the usage check samples.
const USAGE_SAMPLE: u64 = 5;

/// Autocomplete result cap.
const AUTOCOMPLETE_LIMIT: u64 = 10;

#[utoipa::path(
    get,
    path = "/ingredient/new",
    tag = "Ingredients",
    operation_id = "ingredientNewForm",
    summary = "Blank ingredient registration form",
    responses(
        (status = 200, description = "Blank form state", body = IngredientFormResponse),
    ),
)]
#[instrument(skip(state))]
pub async fn ingredient_new_form(
    State(state): State<AppState>,
) -> Result<Json<IngredientFormResponse>, AppError> {
    Ok(Json(IngredientFormResponse {
        values: IngredientFormValues::default(),
        errors: Vec::new(),
        categories: category_refs(&state.db).await?,
    }))
}

#[utoipa::path(
    post,
    path = "/ingredient/new",
    tag = "Ingredients",
    operation_id = "ingredientCreate",
    summary = "Register an ingredient",
    description = "Validates the submission and inserts the ingredient with display_order assigned max+1 within its category, all inside one transaction. A name collision surfaces from the unique constraint as a field error. On field errors the form is re-rendered (200) with nothing written; on success redirects to the submitted referrer or the management page.",
    request_body = IngredientFormValues,
    responses(
        (status = 303, description = "Ingredient created; redirect"),
        (status = 200, description = "Field errors; form re-rendered", body = IngredientFormResponse),
        (status = 400, description = "Malformed body (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, values), fields(name = %values.name))]
pub async fn ingredient_create(
    State(state): State<AppState>,
    AppJson(values): AppJson<IngredientFormValues>,
) -> Result<Response, AppError> {
    let form = match validate_ingredient_form(&values) {
        Ok(form) => form,
        Err(errors) => return form_errors(&state.db, values, errors).await,
    };

    let txn = state.db.begin().await?;

    if category::Entity::find_by_id(form.category_id)
        .one(&txn)
        .await?
        .is_none()
    {
        txn.rollback().await?;
        let errors = vec![FieldError::new("category_id", "Unknown category")];
        return form_errors(&state.db, values, errors).await;
    }

    let max_order: Option<i32> = ingredient::Entity::find()
        .filter(ingredient::Column::CategoryId.eq(form.category_id))
        .select_only()
        .column_as(ingredient::Column::DisplayOrder.max(), "max_order")
        .into_tuple::<Option<i32>>()
        .one(&txn)
        .await?
        .flatten();

    let inserted = ingredient::ActiveModel {
        name: Set(form.name),
        category_id: Set(form.category_id),
        display_order: Set(max_order.unwrap_or(0) + 1),
        ..Default::default()
    }
    .insert(&txn)
    .await;

    match inserted {
        Ok(_) => {}
        // The unique constraint on name doubles as the duplicate check.
        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            txn.rollback().await?;
            let errors = vec![FieldError::new(
                "name",
                "An ingredient with this name already exists",
            )];
            return form_errors(&state.db, values, errors).await;
        }
        Err(e) => return Err(e.into()),
    }

    txn.commit().await?;

    let target = values
        .referrer
        .filter(|r| !r.is_empty())
        .unwrap_or_else(|| "/ingredients".to_string());
    Ok(Redirect::to(&target).into_response())
}

#[derive(Deserialize, utoipa::IntoParams)]
pub struct IngredientsQuery {
    /// Narrow the `filtered` view to one category.
    pub category_id: Option<i32>,
}

#[utoipa::path(
    get,
    path = "/ingredients",
    tag = "Ingredients",
    operation_id = "ingredientsPage",
    summary = "Ingredient management page data",
    params(IngredientsQuery),
    responses(
        (status = 200, description = "Categories with their ingredients", body = IngredientsPageResponse),
    ),
)]
#[instrument(skip(state, query))]
pub async fn ingredients_page(
    State(state): State<AppState>,
    Query(query): Query<IngredientsQuery>,
) -> Result<Json<IngredientsPageResponse>, AppError> {
    let categories = categories_with_ingredients(&state.db).await?;
    let filtered = match query.category_id {
        Some(id) => categories.iter().filter(|c| c.id == id).cloned().collect(),
        None => categories.clone(),
    };

    Ok(Json(IngredientsPageResponse {
        categories,
        filtered,
        selected_category_id: query.category_id,
    }))
}

#[utoipa::path(
    get,
    path = "/ingredient/{id}/check-usage",
    tag = "Ingredients",
    operation_id = "ingredientCheckUsage",
    summary = "Count dishes referencing an ingredient",
    description = "Delete-confirmation helper: how many dishes reference the ingredient, with up to five of their names (dish id order).",
    params(("id" = i32, Path, description = "Ingredient ID")),
    responses(
        (status = 200, description = "Usage summary", body = UsageResponse),
        (status = 404, description = "Ingredient not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn check_usage(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<UsageResponse>, AppError> {
    find_ingredient(&state.db, id).await?;

    let count = dish_ingredient::Entity::find()
        .filter(dish_ingredient::Column::IngredientId.eq(id))
        .count(&state.db)
        .await?;

    let rows = dish_ingredient::Entity::find()
        .filter(dish_ingredient::Column::IngredientId.eq(id))
        .find_also_related(dish::Entity)
        .order_by_asc(dish_ingredient::Column::DishId)
        .limit(USAGE_SAMPLE)
        .all(&state.db)
        .await?;
    let dishes = rows
        .into_iter()
        .filter_map(|(_, d)| d.map(|d| d.name))
        .collect();

    Ok(Json(UsageResponse {
        count,
        dishes,
        has_more: count > USAGE_SAMPLE,
    }))
}

#[utoipa::path(
    post,
    path = "/ingredient/{id}/delete",
    tag = "Ingredients",
    operation_id = "ingredientDelete",
    summary = "Delete an ingredient",
    description = "Removes the ingredient and its dish memberships in one transaction; the dishes themselves survive with their remaining ingredients. Redirects to the management page.",
    params(("id" = i32, Path, description = "Ingredient ID")),
    responses(
        (status = 303, description = "Ingredient deleted; redirect to /ingredients"),
        (status = 404, description = "Ingredient not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn ingredient_delete(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response, AppError> {
    find_ingredient(&state.db, id).await?;

    let txn = state.db.begin().await?;
    dish_ingredient::Entity::delete_many()
        .filter(dish_ingredient::Column::IngredientId.eq(id))
        .exec(&txn)
        .await?;
    ingredient::Entity::delete_by_id(id).exec(&txn).await?;
    txn.commit().await?;

    Ok(Redirect::to("/ingredients").into_response())
}

#[derive(Deserialize, utoipa::IntoParams)]
pub struct AutocompleteQuery {
    /// Substring to match against ingredient names.
    pub q: Option<String>,
}

#[utoipa::path(
    get,
    path = "/ingredient/search",
    tag = "Ingredients",
    operation_id = "ingredientSearch",
    summary = "Ingredient name autocomplete",
    description = "Case-insensitive substring match against ingredient names, ordered by name ascending, at most ten results. An empty query returns an empty list, not all ingredients.",
    params(AutocompleteQuery),
    responses(
        (status = 200, description = "Matching ingredients", body = Vec<AutocompleteItem>),
    ),
)]
#[instrument(skip(state, query))]
pub async fn ingredient_search(
    State(state): State<AppState>,
    Query(query): Query<AutocompleteQuery>,
) -> Result<Json<Vec<AutocompleteItem>>, AppError> {
    let q = query.q.as_deref().unwrap_or_default().trim().to_string();
    if q.is_empty() {
        return Ok(Json(Vec::new()));
    }

    let term = escape_like(&q);
    let items = ingredient::Entity::find()
        .filter(
            Expr::expr(Func::lower(Expr::col(ingredient::Column::Name)))
                .like(LikeExpr::new(format!("%{}%", term.to_lowercase())).escape('\\')),
        )
        .order_by_asc(ingredient::Column::Name)
        .limit(AUTOCOMPLETE_LIMIT)
        .all(&state.db)
        .await?
        .into_iter()
        .map(|i| AutocompleteItem {
            id: i.id,
            name: i.name,
            category_id: i.category_id,
        })
        .collect();

    Ok(Json(items))
}

async fn find_ingredient<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<ingredient::Model, AppError> {
    ingredient::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Ingredient not found".into()))
}

async fn form_errors(
    db: &DatabaseConnection,
    values: IngredientFormValues,
    errors: Vec<FieldError>,
) -> Result<Response, AppError> {
    Ok(Json(IngredientFormResponse {
        values,
        errors,
        categories: category_refs(db).await?,
    })
    .into_response())
}

async fn category_refs<C: ConnectionTrait>(db: &C) -> Result<Vec<CategoryRef>, AppError> {
    Ok(category::Entity::find()
        .order_by_asc(category::Column::DisplayOrder)
        .all(db)
        .await?
        .into_iter()
        .map(|c| CategoryRef {
            id: c.id,
            name: c.name,
        })
        .collect())
}
