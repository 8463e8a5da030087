use serde::Serialize;

/// Hard ceiling on page size, whatever the client asks for.
pub const MAX_PER_PAGE: u64 = 100;

/// Pagination metadata included in list responses.
#[derive(Serialize, utoipa::ToSchema)]
pub struct Pagination {
    /// Current page number (1-based).
    #[schema(example = 1)]
    pub page: u64,
    /// Number of items per page.
    #[schema(example = 10)]
    pub per_page: u64,
    /// Total number of matching items across all pages.
    #[schema(example = 47)]
    pub total: u64,
    /// Total number of pages.
    #[schema(example = 5)]
    pub total_pages: u64,
    /// Whether pages beyond `page` exist.
    pub has_more: bool,
}

impl Pagination {
    pub fn new(page: u64, per_page: u64, total: u64) -> Self {
        let total_pages = total.div_ceil(per_page);
        Self {
            page,
            per_page,
            total,
            total_pages,
            has_more: page < total_pages,
        }
    }
}

/// A single field-level validation failure, rendered inline on the form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct FieldError {
    /// Name of the offending form field.
    #[schema(example = "difficulty")]
    pub field: &'static str,
    /// Human-readable reason.
    #[schema(example = "Difficulty must be between 1 and 5")]
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Genre reference as rendered in lists and detail views.
#[derive(Clone, Serialize, utoipa::ToSchema)]
pub struct GenreRef {
    pub id: i32,
    pub name: String,
}

/// Ingredient reference as rendered in lists and detail views.
#[derive(Clone, Serialize, utoipa::ToSchema)]
pub struct IngredientRef {
    pub id: i32,
    pub name: String,
}

/// Category reference for form select lists.
#[derive(Clone, Serialize, utoipa::ToSchema)]
pub struct CategoryRef {
    pub id: i32,
    pub name: String,
}

/// A category with its ingredients, ordered for display.
#[derive(Clone, Serialize, utoipa::ToSchema)]
pub struct CategoryWithIngredients {
    pub id: i32,
    pub name: String,
    pub display_order: i32,
    pub ingredients: Vec<IngredientRef>,
}

/// Escape LIKE wildcard characters in a search string.
pub fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Parse a comma-separated id list as assembled by the client-side
/// pickers. Non-numeric tokens are dropped silently, not rejected.
pub fn parse_id_list(raw: &str) -> Vec<i32> {
    raw.split(',')
        .filter_map(|tok| {
            let tok = tok.trim();
            if tok.is_empty() || !tok.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            tok.parse().ok()
        })
        .collect()
}

/// Resolve the requested page number; anything below 1 becomes 1.
pub fn resolve_page(requested: Option<i64>) -> u64 {
    requested.map_or(1, |p| p.max(1)) as u64
}

/// Resolve the requested page size. Absent, zero, or negative values are
/// clamped to the configured default; everything is capped at
/// [`MAX_PER_PAGE`].
pub fn resolve_per_page(requested: Option<i64>, default_per_page: u64) -> u64 {
    match requested {
        Some(v) if v >= 1 => (v as u64).min(MAX_PER_PAGE),
        _ => default_per_page.clamp(1, MAX_PER_PAGE),
    }
}
