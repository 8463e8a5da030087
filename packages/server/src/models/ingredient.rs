use serde::{Deserialize, Serialize};

use super::shared::{CategoryRef, CategoryWithIngredients, FieldError};

/// Ingredient form state: submission payload and re-render echo.
#[derive(Clone, Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct IngredientFormValues {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category_id: Option<i32>,
    #[serde(default)]
    pub referrer: Option<String>,
}

/// An ingredient submission that passed field validation. Whether the
/// category exists and whether the name is taken are checked at write
/// time.
#[derive(Debug)]
pub struct ValidatedIngredientForm {
    pub name: String,
    pub category_id: i32,
}

pub fn validate_ingredient_form(
    values: &IngredientFormValues,
) -> Result<ValidatedIngredientForm, Vec<FieldError>> {
    let mut errors = Vec::new();

    let name = values.name.trim();
    if name.is_empty() || name.chars().count() > 100 {
        errors.push(FieldError::new("name", "Name must be 1-100 characters"));
    }

    if values.category_id.is_none() {
        errors.push(FieldError::new("category_id", "Category is required"));
    }

    match (values.category_id, errors.is_empty()) {
        (Some(category_id), true) => Ok(ValidatedIngredientForm {
            name: name.to_string(),
            category_id,
        }),
        _ => Err(errors),
    }
}

/// Ingredient form page data.
#[derive(Serialize, utoipa::ToSchema)]
pub struct IngredientFormResponse {
    pub values: IngredientFormValues,
    pub errors: Vec<FieldError>,
    pub categories: Vec<CategoryRef>,
}

/// Ingredient management page data. `categories` always carries the full
/// list for the filter tabs; `filtered` narrows to the selected category
/// when one is given.
#[derive(Serialize, utoipa::ToSchema)]
pub struct IngredientsPageResponse {
    pub categories: Vec<CategoryWithIngredients>,
    pub filtered: Vec<CategoryWithIngredients>,
    pub selected_category_id: Option<i32>,
}

/// Delete-confirmation data: how many dishes reference an ingredient,
/// with a sample of their names.
#[derive(Serialize, utoipa::ToSchema)]
pub struct UsageResponse {
    pub count: u64,
    /// Up to five referencing dish names.
    pub dishes: Vec<String>,
    /// Whether `count` exceeds the sampled names.
    pub has_more: bool,
}

/// Autocomplete entry.
#[derive(Serialize, utoipa::ToSchema)]
pub struct AutocompleteItem {
    pub id: i32,
    pub name: String,
    pub category_id: i32,
}
