use axum::http::{header, HeaderValue};
use axum::routing::{get, post};
use axum::Router;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use super::handlers;
use super::state::SharedState;

pub fn build_routes(state: SharedState) -> Router {
    let static_files = ServeDir::new(&state.settings.static_dir);
    Router::new()
        .route("/", get(handlers::home))
        .route("/saved", get(handlers::saved))
        .route("/jobs/save", post(handlers::toggle_save))
        .route("/refresh", post(handlers::refresh))
        .route("/suggest", get(handlers::suggest_form).post(handlers::suggest))
        .route("/share", get(handlers::share))
        .route("/livez", get(handlers::livez))
        .route("/healthz", get(handlers::healthz))
        .nest_service("/static", static_files)
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::REFERRER_POLICY,
            HeaderValue::from_static("no-referrer"),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
