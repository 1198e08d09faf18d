use crate::model::HealthResponse;
use axum::Json;

pub const GREETING: &str = "Haaaaay, gurl! This is an ultralight url shortener.\nTry /c/your-url!";

pub async fn greeting_handler() -> &'static str {
    GREETING
}

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
