use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::handlers;
use crate::state::AppState;

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::pages::search_page))
        .routes(routes!(handlers::pages::edit_page))
        .routes(routes!(handlers::pages::search_dishes))
        .routes(routes!(
            handlers::dish::dish_new_form,
            handlers::dish::dish_create
        ))
        .routes(routes!(handlers::dish::dish_detail))
        .routes(routes!(
            handlers::dish::dish_edit_form,
            handlers::dish::dish_update
        ))
        .routes(routes!(handlers::dish::dish_delete))
        .routes(routes!(
            handlers::ingredient::ingredient_new_form,
            handlers::ingredient::ingredient_create
        ))
        .routes(routes!(handlers::ingredient::ingredients_page))
        .routes(routes!(handlers::ingredient::ingredient_search))
        .routes(routes!(handlers::ingredient::check_usage))
        .routes(routes!(handlers::ingredient::ingredient_delete))
}
