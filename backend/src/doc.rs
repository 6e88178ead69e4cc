//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the REST API. It registers:
//!
//! - **Paths**: every HTTP endpoint from the inbound layer (auth, permissions,
//!   automations, dashboard, health)
//! - **Schemas**: the error payload, the session user projection and the
//!   request and response bodies
//! - **Security**: Session cookie authentication scheme
//!
//! The generated specification is used by Swagger UI (debug builds) and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use crate::domain::{Error, ErrorCode, Panel, Role, SessionUser, WebhookReceipt};
use crate::inbound::http::auth::LoginRequest;
use crate::inbound::http::dashboard::DashboardView;
use crate::inbound::http::permissions::PermissionCheck;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Private session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Campaign access control API",
        description = "Login, session and permission checks for the campaign dashboard.",
        license(
            name = "MIT",
            url = "https://opensource.org/license/mit"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::auth::current_session,
        crate::inbound::http::permissions::check_permission,
        crate::inbound::http::automations::trigger_automation,
        crate::inbound::http::dashboard::dashboard,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        SessionUser,
        Role,
        LoginRequest,
        PermissionCheck,
        WebhookReceipt,
        Panel,
        DashboardView
    )),
    tags(
        (name = "auth", description = "Login, logout, session and permission checks"),
        (name = "automations", description = "Workflow triggers on the automation server"),
        (name = "dashboard", description = "Protected dashboard view"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying OpenAPI schema field structure.

    use super::*;
    use rstest::rstest;
    use utoipa::OpenApi;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    /// Assert that an Object schema contains a field with the given name.
    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    #[case::error("Error", &["code", "message", "traceId", "details"])]
    #[case::session_user("SessionUser", &["id", "username", "email", "role", "permissions", "isDemoUser"])]
    #[case::login_request("LoginRequest", &["identifier", "password"])]
    #[case::receipt("WebhookReceipt", &["workflow", "attempts", "status"])]
    fn schemas_expose_wire_fields(#[case] name: &str, #[case] fields: &[&str]) {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let schema = schemas.get(name).expect("schema registered");
        for field in fields {
            assert_object_schema_has_field(schema, field);
        }
    }

    #[test]
    fn session_user_schema_never_mentions_passwords() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let RefOr::T(Schema::Object(user)) = schemas.get("SessionUser").expect("SessionUser")
        else {
            panic!("expected Object schema");
        };
        assert!(!user.properties.contains_key("password"));
        assert!(!user.properties.contains_key("passwordHash"));
    }

    #[rstest]
    #[case("/api/v1/login")]
    #[case("/api/v1/logout")]
    #[case("/api/v1/session")]
    #[case("/api/v1/permissions/{permission}")]
    #[case("/api/v1/automations/{workflow}")]
    #[case("/dashboard")]
    #[case("/health/ready")]
    #[case("/health/live")]
    fn documents_every_route(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing path {path}");
    }
}
