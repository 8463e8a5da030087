use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::CatalogConfig;
use crate::entity::dish;

use super::shared::{
    CategoryWithIngredients, FieldError, GenreRef, IngredientRef, parse_id_list,
};

/// Dish form state: the payload a submission carries and the values
/// echoed back when the form is re-rendered. `ingredient_ids` is the
/// comma-separated value the client-side picker maintains in its hidden
/// field.
#[derive(Clone, Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct DishFormValues {
    pub name: String,
    #[serde(default)]
    pub genre_ids: Vec<i32>,
    #[serde(default)]
    pub ingredient_ids: String,
    pub difficulty: i32,
    #[serde(default)]
    pub memo: Option<String>,
    #[serde(default)]
    pub referrer: Option<String>,
}

impl Default for DishFormValues {
    fn default() -> Self {
        Self {
            name: String::new(),
            genre_ids: Vec::new(),
            ingredient_ids: String::new(),
            difficulty: 1,
            memo: None,
            referrer: None,
        }
    }
}

/// A dish submission that passed validation. Id lists are deduplicated
/// (memberships are sets) with input order preserved.
#[derive(Debug)]
pub struct ValidatedDishForm {
    pub name: String,
    pub genre_ids: Vec<i32>,
    pub ingredient_ids: Vec<i32>,
    pub difficulty: i32,
    pub memo: Option<String>,
}

/// Validate a dish submission against the configured limits.
///
/// All raw inputs go in, and either a validated value or the full set of
/// field errors comes out; the caller re-renders the form with the
/// errors and the original input, writing nothing. Non-numeric tokens in
/// the ingredient list are dropped silently while an over-cap list is a
/// hard error; that asymmetry is deliberate and must stay.
pub fn validate_dish_form(
    values: &DishFormValues,
    limits: &CatalogConfig,
) -> Result<ValidatedDishForm, Vec<FieldError>> {
    let mut errors = Vec::new();

    let name = values.name.trim();
    if name.is_empty() || name.chars().count() > 100 {
        errors.push(FieldError::new("name", "Name must be 1-100 characters"));
    }

    if !(1..=5).contains(&values.difficulty) {
        errors.push(FieldError::new(
            "difficulty",
            "Difficulty must be between 1 and 5",
        ));
    }

    let memo = values
        .memo
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty());
    if let Some(memo) = memo
        && memo.chars().count() > limits.max_memo_length
    {
        errors.push(FieldError::new(
            "memo",
            format!("Memo must be at most {} characters", limits.max_memo_length),
        ));
    }

    let genre_ids = dedup_preserving_order(&values.genre_ids);
    if genre_ids.len() > limits.max_genres_per_dish {
        errors.push(FieldError::new(
            "genre_ids",
            format!(
                "At most {} genres can be selected",
                limits.max_genres_per_dish
            ),
        ));
    }

    let ingredient_ids = dedup_preserving_order(&parse_id_list(&values.ingredient_ids));
    if ingredient_ids.len() > limits.max_ingredients_per_dish {
        errors.push(FieldError::new(
            "ingredient_ids",
            format!(
                "At most {} ingredients can be selected",
                limits.max_ingredients_per_dish
            ),
        ));
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(ValidatedDishForm {
        name: name.to_string(),
        genre_ids,
        ingredient_ids,
        difficulty: values.difficulty,
        memo: memo.map(str::to_string),
    })
}

fn dedup_preserving_order(ids: &[i32]) -> Vec<i32> {
    let mut seen = std::collections::HashSet::new();
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}

/// Full dish representation for the detail view.
#[derive(Serialize, utoipa::ToSchema)]
pub struct DishResponse {
    pub id: i32,
    pub name: String,
    pub difficulty: i32,
    pub memo: Option<String>,
    pub genres: Vec<GenreRef>,
    pub ingredients: Vec<IngredientRef>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DishResponse {
    pub fn from_parts(
        m: dish::Model,
        genres: Vec<GenreRef>,
        ingredients: Vec<IngredientRef>,
    ) -> Self {
        Self {
            id: m.id,
            name: m.name,
            difficulty: m.difficulty,
            memo: m.memo,
            genres,
            ingredients,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Search result / management list entry.
#[derive(Serialize, utoipa::ToSchema)]
pub struct DishListItem {
    pub id: i32,
    pub name: String,
    pub difficulty: i32,
    pub genres: Vec<GenreRef>,
    pub ingredients: Vec<IngredientRef>,
    pub updated_at: DateTime<Utc>,
}

/// Dish detail page data. `referrer` is echoed so the page can link back
/// to wherever the user came from.
#[derive(Serialize, utoipa::ToSchema)]
pub struct DishDetailResponse {
    pub dish: DishResponse,
    pub referrer: String,
}

/// Dish form page data: current values, field errors from the last
/// submission (empty on a fresh form), and the reference lists the form
/// renders its pickers from.
#[derive(Serialize, utoipa::ToSchema)]
pub struct DishFormResponse {
    /// Id of the dish being edited; `null` on the creation form.
    pub dish_id: Option<i32>,
    pub values: DishFormValues,
    pub errors: Vec<FieldError>,
    pub genres: Vec<GenreRef>,
    pub categories: Vec<CategoryWithIngredients>,
}
