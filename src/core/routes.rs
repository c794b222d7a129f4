//! Role-gated navigation

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Role granted by the identity service
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Evaluator,
    User,
}

impl FromStr for Role {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "evaluator" => Ok(Role::Evaluator),
            "user" => Ok(Role::User),
            other => anyhow::bail!("unknown role {other:?}"),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Role::Admin => "admin",
            Role::Evaluator => "evaluator",
            Role::User => "user",
        })
    }
}

const EVALUATORS: &[Role] = &[Role::Evaluator];
const ADMINS: &[Role] = &[Role::Admin];

/// Top-level views reachable from the sidebar
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    Dashboard,
    Assignment,
    Reports,
    System,
}

impl View {
    pub const ALL: [View; 4] = [View::Dashboard, View::Assignment, View::Reports, View::System];

    /// Sidebar label
    pub fn title(self) -> &'static str {
        match self {
            View::Dashboard => "Dashboard",
            View::Assignment => "Assignment & Evaluation",
            View::Reports => "Reports & Analytics",
            View::System => "System & Utilities",
        }
    }

    /// Roles allowed to open this view; `None` means everyone
    fn allowed_roles(self) -> Option<&'static [Role]> {
        match self {
            View::Dashboard => None,
            View::Assignment => Some(EVALUATORS),
            View::Reports | View::System => Some(ADMINS),
        }
    }

    pub fn permits(self, role: Role) -> bool {
        self.allowed_roles().is_none_or(|roles| roles.contains(&role))
    }
}

/// What the content area shows
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    Login,
    View(View),
    AccessDenied(View),
}

/// Sidebar entries visible to `role`, in display order
pub fn nav_items(role: Role) -> Vec<View> {
    View::ALL.into_iter().filter(|v| v.permits(role)).collect()
}

/// Resolve a navigation request for a logged-in role
pub fn route(role: Role, view: View) -> Screen {
    if view.permits(role) {
        Screen::View(view)
    } else {
        log::warn!("Role {role} denied access to {}", view.title());
        Screen::AccessDenied(view)
    }
}
