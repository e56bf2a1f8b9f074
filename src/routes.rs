// routes.rs
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{self, AppState};

pub fn create_routes(state: AppState) -> Router {
    let admin = Router::new()
        .route(
            "/configuration",
            get(handlers::get_configuration).put(handlers::put_configuration),
        )
        .route("/tokens", get(handlers::list_tokens))
        .route("/tokens/reset", post(handlers::reset_tokens))
        .route(
            "/votes/{question}",
            get(handlers::list_votes).delete(handlers::clear_votes),
        )
        .route("/tally", get(handlers::real_tallies))
        .route("/results", get(handlers::admin_results));

    let api = Router::new()
        .route("/ballot", get(handlers::get_ballot))
        .route("/intention", post(handlers::submit_intention))
        .route("/rejection", post(handlers::submit_rejection))
        .route("/results", get(handlers::get_results))
        .nest("/admin", admin);

    Router::new()
        .nest("/api", api)
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
