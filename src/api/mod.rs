//! REST API over a live design session.
//!
//! - `GET /report` sizing report for the current design
//! - `GET /appliances` current audit lines
//! - `POST /appliances` add an appliance from a form body
//! - `DELETE /appliances/{id}` remove an appliance
//! - `GET /projects` saved projects with dashboard stats

mod handlers;
mod types;

pub use types::{AppliancesResponse, ProjectSummary, ProjectsResponse};

use std::io;
use std::net::SocketAddr;
use std::sync::{Arc, PoisonError, RwLock};

use axum::Router;
use axum::routing::{delete, get};
use tracing::info;

use crate::state::{Action, AppState, Notice};

/// Session state shared by every handler.
pub type SharedState = Arc<RwLock<AppState>>;

pub fn shared(state: AppState) -> SharedState {
    Arc::new(RwLock::new(state))
}

/// Applies one action under the write lock and returns its notice.
pub(crate) fn dispatch(state: &SharedState, action: Action) -> Notice {
    let mut guard = state.write().unwrap_or_else(PoisonError::into_inner);
    let current = std::mem::take(&mut *guard);
    let (next, notice) = current.reduce(action);
    *guard = next;
    notice
}

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/report", get(handlers::get_report))
        .route(
            "/appliances",
            get(handlers::list_appliances).post(handlers::add_appliance),
        )
        .route("/appliances/{id}", delete(handlers::remove_appliance))
        .route("/projects", get(handlers::list_projects))
        .with_state(state)
}

/// Binds to `addr` and serves until the process exits.
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind or the server fails.
pub async fn serve(state: SharedState, addr: SocketAddr) -> io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "API server listening");
    eprintln!("API server listening on http://{addr}");
    axum::serve(listener, router(state)).await
}
