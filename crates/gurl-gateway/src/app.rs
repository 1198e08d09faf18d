use axum::http::header::ACCESS_CONTROL_ALLOW_ORIGIN;
use axum::http::HeaderValue;
use axum::routing::get;
use axum::Router;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{
    create_link_handler, delete_link_handler, greeting_handler, health_handler,
    resolve_link_handler,
};
use crate::state::AppState;

pub struct App {}

impl App {
    pub fn router(state: AppState) -> Router {
        let allow_any_origin = SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        );

        Router::new()
            .route("/", get(greeting_handler))
            .route("/health", get(health_handler))
            .route("/b/{key}", get(resolve_link_handler))
            .merge(
                Router::new()
                    .route("/c/{*target}", get(create_link_handler))
                    .route("/d/{key}", get(delete_link_handler).delete(delete_link_handler))
                    .route_layer(allow_any_origin),
            )
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }
}
