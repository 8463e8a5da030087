use axum::Json;
use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Redirect, Response};
use sea_orm::*;
use serde::Deserialize;
use tracing::instrument;

use crate::entity::{dish, dish_genre, dish_ingredient, genre, ingredient};
use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::models::dish::*;
use crate::models::shared::FieldError;
use crate::state::AppState;

use super::pages::{all_genres, categories_with_ingredients, dish_memberships};

#[derive(Deserialize, utoipa::IntoParams)]
pub struct DetailQuery {
    /// Back-navigation target carried through the page flow.
    pub referrer: Option<String>,
}

#[utoipa::path(
    get,
    path = "/dish/{id}",
    tag = "Dishes",
    operation_id = "dishDetail",
    summary = "Dish detail page data",
    params(
        ("id" = i32, Path, description = "Dish ID"),
        DetailQuery,
    ),
    responses(
        (status = 200, description = "Dish details", body = DishDetailResponse),
        (status = 404, description = "Dish not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query), fields(id))]
pub async fn dish_detail(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(query): Query<DetailQuery>,
) -> Result<Json<DishDetailResponse>, AppError> {
    let model = find_dish(&state.db, id).await?;
    let (mut genres, mut ingredients) = dish_memberships(&state.db, &[id]).await?;

    Ok(Json(DishDetailResponse {
        dish: DishResponse::from_parts(
            model,
            genres.remove(&id).unwrap_or_default(),
            ingredients.remove(&id).unwrap_or_default(),
        ),
        referrer: query.referrer.unwrap_or_else(|| "/".to_string()),
    }))
}

#[utoipa::path(
    get,
    path = "/dish/new",
    tag = "Dishes",
    operation_id = "dishNewForm",
    summary = "Blank dish creation form",
    description = "Returns an empty form state plus the reference lists the form renders its genre checkboxes and ingredient picker from.",
    responses(
        (status = 200, description = "Blank form state", body = DishFormResponse),
    ),
)]
#[instrument(skip(state))]
pub async fn dish_new_form(
    State(state): State<AppState>,
) -> Result<Json<DishFormResponse>, AppError> {
    form_response(&state.db, None, DishFormValues::default(), Vec::new())
        .await
        .map(Json)
}

#[utoipa::path(
    post,
    path = "/dish/new",
    tag = "Dishes",
    operation_id = "dishCreate",
    summary = "Create a dish",
    description = "Validates the submission and creates the dish with its genre and ingredient memberships in one transaction. On field errors the form is re-rendered (200) with the submitted values preserved and nothing written. On success redirects to the management page.",
    request_body = DishFormValues,
    responses(
        (status = 303, description = "Dish created; redirect to /edit"),
        (status = 200, description = "Field errors; form re-rendered", body = DishFormResponse),
        (status = 400, description = "Malformed body (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, values), fields(name = %values.name))]
pub async fn dish_create(
    State(state): State<AppState>,
    AppJson(values): AppJson<DishFormValues>,
) -> Result<Response, AppError> {
    let form = match validate_dish_form(&values, &state.config.catalog) {
        Ok(form) => form,
        Err(errors) => {
            let body = form_response(&state.db, None, values, errors).await?;
            return Ok(Json(body).into_response());
        }
    };

    let now = chrono::Utc::now();
    let txn = state.db.begin().await?;

    let model = dish::ActiveModel {
        name: Set(form.name),
        difficulty: Set(form.difficulty),
        memo: Set(form.memo),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    insert_memberships(&txn, model.id, &form.genre_ids, &form.ingredient_ids).await?;
    txn.commit().await?;

    Ok(Redirect::to("/edit").into_response())
}

#[utoipa::path(
    get,
    path = "/dish/{id}/edit",
    tag = "Dishes",
    operation_id = "dishEditForm",
    summary = "Dish edit form, prefilled",
    params(
        ("id" = i32, Path, description = "Dish ID"),
        DetailQuery,
    ),
    responses(
        (status = 200, description = "Prefilled form state", body = DishFormResponse),
        (status = 404, description = "Dish not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query), fields(id))]
pub async fn dish_edit_form(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(query): Query<DetailQuery>,
) -> Result<Json<DishFormResponse>, AppError> {
    let model = find_dish(&state.db, id).await?;
    let (mut genres, mut ingredients) = dish_memberships(&state.db, &[id]).await?;

    let values = DishFormValues {
        name: model.name,
        genre_ids: genres
            .remove(&id)
            .unwrap_or_default()
            .into_iter()
            .map(|g| g.id)
            .collect(),
        ingredient_ids: ingredients
            .remove(&id)
            .unwrap_or_default()
            .iter()
            .map(|i| i.id.to_string())
            .collect::<Vec<_>>()
            .join(","),
        difficulty: model.difficulty,
        memo: model.memo,
        referrer: query.referrer,
    };

    form_response(&state.db, Some(id), values, Vec::new())
        .await
        .map(Json)
}

#[utoipa::path(
    post,
    path = "/dish/{id}/edit",
    tag = "Dishes",
    operation_id = "dishUpdate",
    summary = "Update a dish",
    description = "Full replace of name, difficulty, memo and both membership sets in one transaction; `updated_at` is refreshed. On field errors the form is re-rendered (200) and nothing changes. On success redirects back to the detail page when the referrer points at it, otherwise to the referrer or the management page.",
    params(("id" = i32, Path, description = "Dish ID")),
    request_body = DishFormValues,
    responses(
        (status = 303, description = "Dish updated; redirect"),
        (status = 200, description = "Field errors; form re-rendered", body = DishFormResponse),
        (status = 400, description = "Malformed body (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Dish not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, values), fields(id))]
pub async fn dish_update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(values): AppJson<DishFormValues>,
) -> Result<Response, AppError> {
    let existing = find_dish(&state.db, id).await?;

    let form = match validate_dish_form(&values, &state.config.catalog) {
        Ok(form) => form,
        Err(errors) => {
            let body = form_response(&state.db, Some(id), values, errors).await?;
            return Ok(Json(body).into_response());
        }
    };
    let referrer = values.referrer;

    let txn = state.db.begin().await?;

    let mut active: dish::ActiveModel = existing.into();
    active.name = Set(form.name);
    active.difficulty = Set(form.difficulty);
    active.memo = Set(form.memo);
    active.updated_at = Set(chrono::Utc::now());
    let model = active.update(&txn).await?;

    dish_genre::Entity::delete_many()
        .filter(dish_genre::Column::DishId.eq(id))
        .exec(&txn)
        .await?;
    dish_ingredient::Entity::delete_many()
        .filter(dish_ingredient::Column::DishId.eq(id))
        .exec(&txn)
        .await?;
    insert_memberships(&txn, id, &form.genre_ids, &form.ingredient_ids).await?;

    txn.commit().await?;

    let target = match referrer.as_deref() {
        Some(r) if r.contains("dish/") => format!("/dish/{}", model.id),
        Some(r) if !r.is_empty() => r.to_string(),
        _ => "/edit".to_string(),
    };
    Ok(Redirect::to(&target).into_response())
}

#[utoipa::path(
    post,
    path = "/dish/{id}/delete",
    tag = "Dishes",
    operation_id = "dishDelete",
    summary = "Delete a dish",
    description = "Deletes the dish and its membership rows in one transaction; genres and ingredients themselves are untouched. Redirects to the management page.",
    params(("id" = i32, Path, description = "Dish ID")),
    responses(
        (status = 303, description = "Dish deleted; redirect to /edit"),
        (status = 404, description = "Dish not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn dish_delete(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response, AppError> {
    find_dish(&state.db, id).await?;

    let txn = state.db.begin().await?;
    dish_genre::Entity::delete_many()
        .filter(dish_genre::Column::DishId.eq(id))
        .exec(&txn)
        .await?;
    dish_ingredient::Entity::delete_many()
        .filter(dish_ingredient::Column::DishId.eq(id))
        .exec(&txn)
        .await?;
    dish::Entity::delete_by_id(id).exec(&txn).await?;
    txn.commit().await?;

    Ok(Redirect::to("/edit").into_response())
}

async fn find_dish<C: ConnectionTrait>(db: &C, id: i32) -> Result<dish::Model, AppError> {
    dish::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Dish not found".into()))
}

async fn form_response<C: ConnectionTrait>(
    db: &C,
    dish_id: Option<i32>,
    values: DishFormValues,
    errors: Vec<FieldError>,
) -> Result<DishFormResponse, AppError> {
    Ok(DishFormResponse {
        dish_id,
        values,
        errors,
        genres: all_genres(db).await?,
        categories: categories_with_ingredients(db).await?,
    })
}

/// Insert membership edges for ids that reference existing rows; stale
/// ids from the form are skipped rather than rejected.
async fn insert_memberships<C: ConnectionTrait>(
    db: &C,
    dish_id: i32,
    genre_ids: &[i32],
    ingredient_ids: &[i32],
) -> Result<(), AppError> {
    if !genre_ids.is_empty() {
        let known = genre::Entity::find()
            .filter(genre::Column::Id.is_in(genre_ids.iter().copied()))
            .all(db)
            .await?;
        for g in known {
            dish_genre::ActiveModel {
                dish_id: Set(dish_id),
                genre_id: Set(g.id),
            }
            .insert(db)
            .await?;
        }
    }

    if !ingredient_ids.is_empty() {
        let known = ingredient::Entity::find()
            .filter(ingredient::Column::Id.is_in(ingredient_ids.iter().copied()))
            .all(db)
            .await?;
        for i in known {
            dish_ingredient::ActiveModel {
                dish_id: Set(dish_id),
                ingredient_id: Set(i.id),
            }
            .insert(db)
            .await?;
        }
    }

    Ok(())
}
