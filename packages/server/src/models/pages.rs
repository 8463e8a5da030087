use serde::{Deserialize, Serialize};

use super::dish::DishListItem;
use super::shared::{CategoryWithIngredients, GenreRef, Pagination};

/// Query parameters for the paginated management listing.
#[derive(Deserialize, utoipa::IntoParams)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Query parameters for `/search`. Id lists arrive comma-separated;
/// non-numeric tokens are dropped silently.
#[derive(Deserialize, utoipa::IntoParams)]
pub struct SearchQuery {
    pub ingredient_ids: Option<String>,
    pub genre_ids: Option<String>,
    /// `exact` or `fuzzy` (the default).
    pub mode: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    /// `search` or `edit`; echoed back so the client renders the right page.
    pub view_mode: Option<String>,
}

/// Initial search page data: the reference lists the filter panel
/// renders from.
#[derive(Serialize, utoipa::ToSchema)]
pub struct SearchPageResponse {
    pub categories: Vec<CategoryWithIngredients>,
    pub genres: Vec<GenreRef>,
}

/// Management page data: reference lists plus the paginated dish list,
/// newest-updated first.
#[derive(Serialize, utoipa::ToSchema)]
pub struct EditPageResponse {
    pub categories: Vec<CategoryWithIngredients>,
    pub genres: Vec<GenreRef>,
    pub dishes: Vec<DishListItem>,
    pub pagination: Pagination,
}

/// Filtered search results with the selection echoed back.
#[derive(Serialize, utoipa::ToSchema)]
pub struct SearchResultsResponse {
    pub data: Vec<DishListItem>,
    pub pagination: Pagination,
    pub selected_ingredient_ids: Vec<i32>,
    pub selected_genre_ids: Vec<i32>,
    /// Effective match mode (`exact` or `fuzzy`).
    pub mode: &'static str,
    /// Effective view mode (`search` or `edit`).
    pub view_mode: &'static str,
}
