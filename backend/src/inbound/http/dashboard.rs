//! Protected dashboard view.
//!
//! The handler is mounted under the `/dashboard` scope, which the
//! [`crate::middleware::RequireSession`] middleware guards. Browsers without a
//! session are redirected before the handler runs.

use actix_web::{get, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{Panel, SessionUser, visible_panels};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// The logged-in user and the panels they may open.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub user: SessionUser,
    pub panels: Vec<Panel>,
}

impl DashboardView {
    /// Dashboard listing the panels `user` may open.
    pub fn for_user(user: SessionUser) -> Self {
        let panels = visible_panels(&user).into_iter().copied().collect();
        Self { user, panels }
    }
}

/// Render the dashboard for the logged-in user.
#[utoipa::path(
    get,
    path = "/dashboard",
    responses(
        (status = 200, description = "Dashboard view", body = DashboardView),
        (status = 303, description = "Not logged in; redirect to the login path"),
        (status = 500, description = "Internal server error", body = crate::domain::Error)
    ),
    tags = ["dashboard"],
    operation_id = "dashboard"
)]
#[get("")]
pub async fn dashboard(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<DashboardView>> {
    let user = session.require_user(&state)?;
    Ok(web::Json(DashboardView::for_user(user)))
}
