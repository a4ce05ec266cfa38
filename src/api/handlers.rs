//! Request handlers for the API endpoints.

use std::sync::PoisonError;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use super::types::{AppliancesResponse, MutationResponse, ProjectSummary, ProjectsResponse};
use super::{SharedState, dispatch};
use crate::audit::{ApplianceForm, ApplianceId};
use crate::sizing::SizingReport;
use crate::state::{Action, Notice};

type Rejection = (StatusCode, Json<Notice>);

/// `GET /report` → 200 + `SizingReport` JSON
pub async fn get_report(State(state): State<SharedState>) -> Json<SizingReport> {
    let app = state.read().unwrap_or_else(PoisonError::into_inner);
    Json(app.report())
}

/// `GET /appliances` → 200 + appliances and totals
pub async fn list_appliances(State(state): State<SharedState>) -> Json<AppliancesResponse> {
    let app = state.read().unwrap_or_else(PoisonError::into_inner);
    Json(AppliancesResponse {
        appliances: app.energy_data.appliances().to_vec(),
        totals: app.energy_data.totals(),
    })
}

/// `POST /appliances` → 201 on success, 400 + notice when the form is invalid
pub async fn add_appliance(
    State(state): State<SharedState>,
    Json(form): Json<ApplianceForm>,
) -> Result<(StatusCode, Json<MutationResponse>), Rejection> {
    let notice = dispatch(&state, Action::AddAppliance(form));
    if notice.is_error() {
        return Err((StatusCode::BAD_REQUEST, Json(notice)));
    }
    Ok((StatusCode::CREATED, Json(mutation(&state, notice))))
}

/// `DELETE /appliances/{id}` → 200, or 404 + notice for an unknown id
pub async fn remove_appliance(
    State(state): State<SharedState>,
    Path(id): Path<u64>,
) -> Result<Json<MutationResponse>, Rejection> {
    let notice = dispatch(&state, Action::RemoveAppliance(ApplianceId(id)));
    if notice.is_error() {
        return Err((StatusCode::NOT_FOUND, Json(notice)));
    }
    Ok(Json(mutation(&state, notice)))
}

/// `GET /projects` → 200 + dashboard and project summaries
pub async fn list_projects(State(state): State<SharedState>) -> Json<ProjectsResponse> {
    let app = state.read().unwrap_or_else(PoisonError::into_inner);
    Json(ProjectsResponse {
        dashboard: app.dashboard(),
        current_project: app.current_project,
        projects: app.projects.iter().map(ProjectSummary::from).collect(),
    })
}

fn mutation(state: &SharedState, notice: Notice) -> MutationResponse {
    let app = state.read().unwrap_or_else(PoisonError::into_inner);
    MutationResponse {
        notice,
        totals: app.energy_data.totals(),
    }
}

#[cfg(test)]
mod tests {
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use serde_json::Value;
    use tower::util::ServiceExt;

    use super::*;
    use crate::api::{router, shared};
    use crate::state::AppState;

    async fn body_json(res: axum::response::Response) -> Value {
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_form(json: &str) -> Request<Body> {
        Request::post("/appliances")
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn report_on_empty_session_is_not_ready() {
        let app = router(shared(AppState::default()));
        let res = app
            .oneshot(Request::get("/report").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let json = body_json(res).await;
        assert_eq!(json["battery"]["status"], "not_ready");
    }

    #[tokio::test]
    async fn invalid_form_is_bad_request() {
        let state = shared(AppState::default());
        let res = router(state.clone())
            .oneshot(post_form(r#"{"name": "", "quantity": 1, "power_rating": 10, "runtime": 1}"#))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let json = body_json(res).await;
        assert_eq!(json["title"], "Invalid Input");
        assert!(state.read().unwrap().energy_data.is_empty());
    }

    #[tokio::test]
    async fn remove_unknown_is_not_found() {
        let res = router(shared(AppState::default()))
            .oneshot(
                Request::delete("/appliances/7")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn add_accepts_string_numbers() {
        let state = shared(AppState::default());
        let res = router(state.clone())
            .oneshot(post_form(
                r#"{"name": "Fan", "quantity": "2", "power_rating": "60", "runtime": "10"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);
        let json = body_json(res).await;
        assert_eq!(json["totals"]["total_raw_energy"], 1.2);
    }
}
