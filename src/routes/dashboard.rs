use axum::{Json, Router, extract::State, routing::get};

use crate::{dashboard::DashboardOverview, services::dashboard_service, state::AppState};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(overview))
}

/// Never fails: when the data cannot be loaded the zeroed overview is returned.
#[utoipa::path(
    get,
    path = "/api/dashboard",
    responses(
        (status = 200, description = "Dashboard aggregates", body = DashboardOverview)
    ),
    tag = "Dashboard"
)]
pub async fn overview(State(state): State<AppState>) -> Json<DashboardOverview> {
    Json(dashboard_service::overview(&state).await)
}
