//! Permission check handler.
//!
//! ```text
//! GET /api/v1/permissions/messaging
//! ```

use actix_web::{get, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{Error, Permission};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Outcome of a permission check for the logged-in user.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PermissionCheck {
    #[schema(example = "messaging")]
    pub permission: String,
    pub granted: bool,
}

/// Report whether the logged-in user holds a permission.
///
/// The `all` wildcard grants every permission; otherwise membership is a
/// literal, case-sensitive match.
#[utoipa::path(
    get,
    path = "/api/v1/permissions/{permission}",
    params(("permission" = String, Path, description = "Permission token")),
    responses(
        (status = 200, description = "Check result", body = PermissionCheck),
        (status = 400, description = "Malformed permission", body = Error),
        (status = 401, description = "Not logged in", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "checkPermission"
)]
#[get("/permissions/{permission}")]
pub async fn check_permission(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<PermissionCheck>> {
    let user = session.require_user(&state)?;
    let permission = Permission::new(path.into_inner()).map_err(|err| {
        Error::invalid_request(err.to_string())
            .with_details(json!({ "field": "permission", "code": "invalid_permission" }))
    })?;
    Ok(web::Json(PermissionCheck {
        granted: user.has_permission(&permission),
        permission: permission.into(),
    }))
}
