//! Capability-driven navigation menu.
//!
//! Menus are static configuration, one fixed tree per capability. The
//! session's capability picks the tree; no capability picks the empty
//! one. There is deliberately no per-item visibility logic: whether a
//! screen may actually open is the route guard's decision, made again
//! at navigation time.

use workdesk_types::Capability;

/// One navigable entry, optionally with nested sub-items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuItem {
    pub title: &'static str,
    pub path: &'static str,
    pub children: &'static [MenuItem],
}

impl MenuItem {
    /// An item with no sub-items.
    #[must_use]
    pub const fn leaf(title: &'static str, path: &'static str) -> Self {
        Self {
            title,
            path,
            children: &[],
        }
    }
}

/// A titled group of menu items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuGroup {
    pub title: &'static str,
    pub items: &'static [MenuItem],
}

/// Menu tree for the marketing portion.
const MARKETING_MENU: &[MenuGroup] = &[
    MenuGroup {
        title: "Sales",
        items: &[
            MenuItem::leaf("Dashboard", "/dashboard"),
            MenuItem::leaf("Clients", "/clients"),
            MenuItem::leaf("Quotations", "/quotations"),
        ],
    },
    MenuGroup {
        title: "Projects",
        items: &[
            MenuItem::leaf("Bill of Quantity", "/projects/boq"),
            MenuItem {
                title: "Monitoring",
                path: "/status-projects",
                children: &[
                    MenuItem::leaf("Project Status", "/status-projects"),
                    MenuItem::leaf("Outstanding Projects", "/outstanding-projects"),
                ],
            },
        ],
    },
    MenuGroup {
        title: "Account",
        items: &[
            MenuItem::leaf("Notifications", "/notifications"),
            MenuItem::leaf("Profile", "/profile"),
        ],
    },
];

/// Menu tree for the engineering portion.
const ENGINEERING_MENU: &[MenuGroup] = &[
    MenuGroup {
        title: "Execution",
        items: &[
            MenuItem::leaf("Dashboard", "/dashboard"),
            MenuItem::leaf("Handover Checklists", "/phc"),
            MenuItem::leaf("Bill of Quantity", "/projects/boq"),
            MenuItem::leaf("Work Orders", "/wo-summary"),
        ],
    },
    MenuGroup {
        title: "Projects",
        items: &[MenuItem::leaf("Project Status", "/status-projects")],
    },
    MenuGroup {
        title: "Account",
        items: &[
            MenuItem::leaf("Notifications", "/notifications"),
            MenuItem::leaf("Profile", "/profile"),
        ],
    },
];

/// Returns the menu tree for a capability.
///
/// `None` (logged out, or an unknown role) yields the empty menu;
/// unknown roles see nothing rather than a best guess.
#[must_use]
pub fn menu_for(capability: Option<Capability>) -> &'static [MenuGroup] {
    match capability {
        Some(Capability::Marketing) => MARKETING_MENU,
        Some(Capability::Engineer) => ENGINEERING_MENU,
        None => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use workdesk_types::Role;

    #[test]
    fn no_capability_means_empty_menu() {
        assert!(menu_for(None).is_empty());
        assert!(menu_for(Role::new("auditor_v2").capability()).is_empty());
    }

    #[test]
    fn marketing_menu_carries_the_sales_screens() {
        let menu = menu_for(Some(Capability::Marketing));
        let paths: Vec<_> = menu
            .iter()
            .flat_map(|g| g.items)
            .map(|item| item.path)
            .collect();
        assert!(paths.contains(&"/clients"));
        assert!(paths.contains(&"/quotations"));
        assert!(!paths.contains(&"/phc"));
    }

    #[test]
    fn engineering_menu_carries_the_execution_screens() {
        let menu = menu_for(Some(Capability::Engineer));
        let paths: Vec<_> = menu
            .iter()
            .flat_map(|g| g.items)
            .map(|item| item.path)
            .collect();
        assert!(paths.contains(&"/phc"));
        assert!(paths.contains(&"/wo-summary"));
        assert!(!paths.contains(&"/clients"));
    }

    #[test]
    fn nested_items_expose_their_children() {
        let monitoring = menu_for(Some(Capability::Marketing))
            .iter()
            .flat_map(|g| g.items)
            .find(|item| item.title == "Monitoring")
            .expect("item");
        assert_eq!(monitoring.children.len(), 2);
        assert_eq!(monitoring.children[1].path, "/outstanding-projects");
    }
}
