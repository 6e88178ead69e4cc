//! Dashboard panel catalogue.

use serde::Serialize;
use utoipa::ToSchema;

use super::SessionUser;

/// One dashboard panel and the permission that opens it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Panel {
    /// Stable panel identifier.
    #[schema(value_type = String, example = "messaging")]
    pub id: &'static str,
    /// Display title.
    #[schema(value_type = String, example = "Mensajería")]
    pub title: &'static str,
    /// Permission token required to open the panel.
    #[schema(value_type = String, example = "messaging")]
    pub permission: &'static str,
}

/// Every panel, in display order.
pub const PANELS: [Panel; 6] = [
    Panel {
        id: "api_keys",
        title: "Claves API",
        permission: "api_keys",
    },
    Panel {
        id: "database",
        title: "Base de datos",
        permission: "database",
    },
    Panel {
        id: "audits",
        title: "Auditorías",
        permission: "audits",
    },
    Panel {
        id: "navigation",
        title: "Navegación",
        permission: "navigation",
    },
    Panel {
        id: "messaging",
        title: "Mensajería",
        permission: "messaging",
    },
    Panel {
        id: "automations",
        title: "Automatizaciones",
        permission: "automations",
    },
];

/// Panels `user` may open, in catalogue order.
pub fn visible_panels(user: &SessionUser) -> Vec<&'static Panel> {
    PANELS
        .iter()
        .filter(|panel| user.permissions().allows_token(panel.permission))
        .collect()
}
