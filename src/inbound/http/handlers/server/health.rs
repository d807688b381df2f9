use crate::inbound::http::responses::health::health_response;
use axum::Json;
use axum::response::IntoResponse;

/// Public probe for load balancers. Touches neither the database nor the
/// session store.
pub async fn server_health() -> impl IntoResponse {
    Json(health_response())
}
