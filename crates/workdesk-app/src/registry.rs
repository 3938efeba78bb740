//! The screen registry.
//!
//! One static route table for the whole console. Every navigation goes
//! through [`ScreenRegistry::open`], which resolves the path and runs
//! the route guard over the current session; screens never check
//! authorization themselves.

use tracing::debug;
use workdesk_auth::{guard, GuardDecision, RouteSpec, Session};

/// Roles with the marketing portion.
const MARKETING_ROLES: &[&str] = &["marketing", "estimator", "super_admin"];
/// Roles with the engineering portion.
const ENGINEERING_ROLES: &[&str] = &["engineer", "site_engineer", "supervisor"];
/// Every role the client knows; screens open to all authenticated
/// users still list roles explicitly (an empty list means locked).
const ALL_ROLES: &[&str] = &[
    "marketing",
    "estimator",
    "super_admin",
    "engineer",
    "site_engineer",
    "supervisor",
];

/// The console's route table.
///
/// Shared grids (BOQ, project status) admit both portions; which
/// fields they may edit inline is the capability's decision, not the
/// guard's.
const STANDARD_ROUTES: &[RouteSpec] = &[
    RouteSpec {
        path: "/dashboard",
        title: "Dashboard",
        allowed_roles: ALL_ROLES,
    },
    RouteSpec {
        path: "/clients",
        title: "Clients",
        allowed_roles: MARKETING_ROLES,
    },
    RouteSpec {
        path: "/quotations",
        title: "Quotations",
        allowed_roles: MARKETING_ROLES,
    },
    RouteSpec {
        path: "/projects/boq",
        title: "Bill of Quantity",
        allowed_roles: ALL_ROLES,
    },
    RouteSpec {
        path: "/status-projects",
        title: "Project Status",
        allowed_roles: ALL_ROLES,
    },
    RouteSpec {
        path: "/outstanding-projects",
        title: "Outstanding Projects",
        allowed_roles: MARKETING_ROLES,
    },
    RouteSpec {
        path: "/phc",
        title: "Handover Checklists",
        allowed_roles: ENGINEERING_ROLES,
    },
    RouteSpec {
        path: "/wo-summary",
        title: "Work Orders",
        allowed_roles: ENGINEERING_ROLES,
    },
    RouteSpec {
        path: "/notifications",
        title: "Notifications",
        allowed_roles: ALL_ROLES,
    },
    RouteSpec {
        path: "/profile",
        title: "Profile",
        allowed_roles: ALL_ROLES,
    },
];

/// Where one navigation attempt lands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// Authorized: render this screen.
    Screen(&'static RouteSpec),
    /// Not authenticated: the login screen, bouncing back afterwards.
    Login {
        /// The originally requested path.
        return_to: String,
    },
    /// Authenticated but not allowed: the static unauthorized screen.
    Unauthorized,
    /// No such route.
    NotFound,
}

/// Static route table consulted through the guard.
///
/// # Example
///
/// ```
/// use workdesk_app::{Navigation, ScreenRegistry};
///
/// let registry = ScreenRegistry::standard();
/// assert_eq!(
///     registry.open(None, "/phc"),
///     Navigation::Login { return_to: "/phc".into() }
/// );
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ScreenRegistry {
    routes: &'static [RouteSpec],
}

impl ScreenRegistry {
    /// The console's full route table.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            routes: STANDARD_ROUTES,
        }
    }

    /// A registry over an explicit table. Intended for tests.
    #[must_use]
    pub fn with_routes(routes: &'static [RouteSpec]) -> Self {
        Self { routes }
    }

    /// Returns every registered route.
    #[must_use]
    pub fn routes(&self) -> &'static [RouteSpec] {
        self.routes
    }

    /// Looks a route up by its exact path.
    #[must_use]
    pub fn find(&self, path: &str) -> Option<&'static RouteSpec> {
        self.routes.iter().find(|route| route.path == path)
    }

    /// Resolves a navigation attempt for the given session.
    #[must_use]
    pub fn open(&self, session: Option<&Session>, path: &str) -> Navigation {
        let Some(route) = self.find(path) else {
            debug!(path, "navigation to unknown path");
            return Navigation::NotFound;
        };

        match guard(session, route) {
            GuardDecision::Render => Navigation::Screen(route),
            GuardDecision::RedirectToLogin { return_to } => {
                debug!(path, "unauthenticated navigation, redirecting to login");
                Navigation::Login { return_to }
            }
            GuardDecision::RedirectUnauthorized => {
                debug!(path, "role not allowed for route");
                Navigation::Unauthorized
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use workdesk_types::{Role, User, UserId};

    fn session(role: &str) -> Session {
        Session::new(
            User {
                id: UserId(3),
                name: "Rina".into(),
                role: Role::new(role),
            },
            "tok",
        )
    }

    #[test]
    fn unauthenticated_navigation_preserves_the_requested_path() {
        let registry = ScreenRegistry::standard();
        assert_eq!(
            registry.open(None, "/outstanding-projects"),
            Navigation::Login {
                return_to: "/outstanding-projects".into()
            }
        );
    }

    #[test]
    fn allowed_role_reaches_the_screen() {
        let registry = ScreenRegistry::standard();
        let opened = registry.open(Some(&session("engineer")), "/phc");
        let Navigation::Screen(route) = opened else {
            panic!("expected a screen, got {opened:?}");
        };
        assert_eq!(route.title, "Handover Checklists");
    }

    #[test]
    fn role_outside_the_allow_list_is_unauthorized() {
        let registry = ScreenRegistry::standard();
        assert_eq!(
            registry.open(Some(&session("marketing")), "/phc"),
            Navigation::Unauthorized
        );
        assert_eq!(
            registry.open(Some(&session("engineer")), "/clients"),
            Navigation::Unauthorized
        );
    }

    #[test]
    fn unknown_role_is_unauthorized_everywhere_but_finds_routes() {
        let registry = ScreenRegistry::standard();
        for route in registry.routes() {
            assert_eq!(
                registry.open(Some(&session("auditor_v2")), route.path),
                Navigation::Unauthorized,
                "route {}",
                route.path
            );
        }
    }

    #[test]
    fn shared_grids_admit_both_portions() {
        let registry = ScreenRegistry::standard();
        for role in ["marketing", "engineer"] {
            assert!(
                matches!(
                    registry.open(Some(&session(role)), "/projects/boq"),
                    Navigation::Screen(_)
                ),
                "role {role}"
            );
        }
    }

    #[test]
    fn unknown_path_is_not_found() {
        let registry = ScreenRegistry::standard();
        assert_eq!(
            registry.open(Some(&session("engineer")), "/admin"),
            Navigation::NotFound
        );
    }

    #[test]
    fn every_menu_path_has_a_route() {
        use crate::menu_for;
        use workdesk_types::Capability;

        let registry = ScreenRegistry::standard();
        for capability in [Capability::Marketing, Capability::Engineer] {
            for group in menu_for(Some(capability)) {
                for item in group.items {
                    assert!(
                        registry.find(item.path).is_some(),
                        "menu path {} has no route",
                        item.path
                    );
                    for child in item.children {
                        assert!(
                            registry.find(child.path).is_some(),
                            "menu path {} has no route",
                            child.path
                        );
                    }
                }
            }
        }
    }
}
