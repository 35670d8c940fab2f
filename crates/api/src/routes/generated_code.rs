//! Route definitions for the `/generated-code` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::generated_code;
use crate::state::AppState;

/// Routes mounted at `/generated-code`.
///
/// ```text
/// GET    /        -> list_generated_code
/// POST   /        -> create_generated_code
/// DELETE /        -> delete_all_generated_code
/// GET    /{id}    -> get_generated_code
/// DELETE /{id}    -> delete_generated_code
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(generated_code::list_generated_code)
                .post(generated_code::create_generated_code)
                .delete(generated_code::delete_all_generated_code),
        )
        .route(
            "/{id}",
            get(generated_code::get_generated_code).delete(generated_code::delete_generated_code),
        )
}
