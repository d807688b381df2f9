use crate::inbound::http::responses::shared::ResponseType;
use serde::Serialize;

const HEALTHY: &str = "OK";

/// Liveness payload with the build version.
#[derive(Serialize)]
pub struct HealthResponse {
    data: HealthData,
    #[serde(rename = "type")]
    object_type: ResponseType,
}

#[derive(Serialize)]
pub struct HealthData {
    status: &'static str,
    version: &'static str,
}

pub fn health_response() -> HealthResponse {
    HealthResponse {
        data: HealthData {
            status: HEALTHY,
            version: env!("CARGO_PKG_VERSION"),
        },
        object_type: ResponseType::Health,
    }
}
