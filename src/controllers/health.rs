use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Map, Value};
use std::sync::Arc;

use crate::domain::language::{Capability, LanguageSupportTable};

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Providers wired for each capability. The table is validated against
/// the configured credentials at startup, so reaching here means ready.
pub async fn health_ready(State(table): State<Arc<LanguageSupportTable>>) -> impl IntoResponse {
    let mut providers = Map::new();
    for capability in Capability::ALL {
        let names: Vec<Value> = table
            .providers_for(capability)
            .into_iter()
            .map(|provider| Value::from(provider.as_str()))
            .collect();
        providers.insert(capability.as_str().to_string(), Value::Array(names));
    }

    (
        StatusCode::OK,
        Json(json!({
            "status": "ready",
            "providers": providers,
        })),
    )
}
