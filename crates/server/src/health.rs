use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;

use crate::bootstrap::AppState;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: HealthCheck,
    pub catalog: HealthCheck,
    pub database: HealthCheck,
    pub checked_at: String,
}

pub fn router(state: AppState) -> Router {
    Router::new().route("/health", get(health)).with_state(state)
}

pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let catalog = catalog_check(&state).await;
    let database = database_check(&state).await;
    let ready = catalog.status == "ready" && database.status != "failed";

    let payload = HealthResponse {
        status: if ready { "ready" } else { "degraded" },
        service: HealthCheck {
            status: "ready",
            detail: "yardage-server runtime initialized".to_string(),
        },
        catalog,
        database,
        checked_at: Utc::now().to_rfc3339(),
    };

    let status_code = if ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (status_code, Json(payload))
}

async fn catalog_check(state: &AppState) -> HealthCheck {
    let catalog = state.catalog.read().await;
    match catalog.last_error() {
        None => HealthCheck {
            status: "ready",
            detail: format!(
                "{} products, {} hero images cached",
                catalog.products().len(),
                catalog.hero_images().len()
            ),
        },
        Some(error) => HealthCheck { status: "failed", detail: error.to_string() },
    }
}

async fn database_check(state: &AppState) -> HealthCheck {
    let Some(pool) = &state.db_pool else {
        return HealthCheck {
            status: "skipped",
            detail: "catalog backend does not use the database".to_string(),
        };
    };

    match sqlx::query_scalar::<_, i64>("SELECT 1").fetch_one(pool).await {
        Ok(_) => HealthCheck { status: "ready", detail: "database query succeeded".to_string() },
        Err(error) => HealthCheck { status: "failed", detail: error.to_string() },
    }
}
