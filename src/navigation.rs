//! Navigation shell: the role menu, greeting and logout wrapped around every
//! protected page.

use serde::Serialize;

use crate::error::Result;
use crate::routes::Route;
use crate::session::{Role, Session, SessionContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MenuItem {
    pub label: &'static str,
    pub path: &'static str,
}

const fn item(label: &'static str, path: &'static str) -> MenuItem {
    MenuItem { label, path }
}

const SUPER_ADMIN_MENU: &[MenuItem] = &[
    item("Dashboard", "/dashboard"),
    item("Manage Teachers", "/teachers"),
    item("Manage Students", "/students"),
    item("Settings", "/settings"),
];

const TEACHER_MENU: &[MenuItem] = &[
    item("Dashboard", "/dashboard"),
    item("My Classes", "/classes"),
    item("Assignments", "/assignments"),
    item("Profile", "/profile"),
];

const STUDENT_MENU: &[MenuItem] = &[
    item("Dashboard", "/dashboard"),
    item("My Courses", "/courses"),
    item("Assignments", "/assignments"),
    item("Profile", "/profile"),
];

const FALLBACK_MENU: &[MenuItem] = &[item("Dashboard", "/dashboard")];

pub fn menu_for(role: Option<Role>) -> &'static [MenuItem] {
    match role {
        Some(Role::SuperAdmin) => SUPER_ADMIN_MENU,
        Some(Role::Teacher) => TEACHER_MENU,
        Some(Role::Student) => STUDENT_MENU,
        None => FALLBACK_MENU,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShellEntry {
    pub label: &'static str,
    pub path: &'static str,
    pub active: bool,
}

/// What the shell shows for one page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShellView {
    pub title: &'static str,
    pub greeting: String,
    pub role: Option<Role>,
    pub menu: Vec<ShellEntry>,
}

impl ShellView {
    pub fn active(&self) -> Option<&ShellEntry> {
        self.menu.iter().find(|e| e.active)
    }
}

#[derive(Debug, Clone)]
pub struct NavigationShell {
    session: SessionContext,
}

impl NavigationShell {
    pub const TITLE: &'static str = "School App";

    pub fn new(session: SessionContext) -> Self {
        Self { session }
    }

    /// Shell for the current session at `current_path`
    pub fn current_view(&self, current_path: &str) -> ShellView {
        Self::view(&self.session.current(), current_path)
    }

    pub fn view(session: &Session, current_path: &str) -> ShellView {
        let current = current_path.split(['?', '#']).next().unwrap_or_default();
        let current = match current.trim_end_matches('/') {
            "" => "/",
            trimmed => trimmed,
        };

        let menu = menu_for(session.role)
            .iter()
            .map(|item| ShellEntry {
                label: item.label,
                path: item.path,
                active: item.path == current,
            })
            .collect();

        ShellView {
            title: Self::TITLE,
            greeting: format!("Welcome, {}!", session.display_name.as_deref().unwrap_or("")),
            role: session.role,
            menu,
        }
    }

    /// Clear the session and hand back where to go next
    pub fn logout(&self) -> Result<Route> {
        self.session.logout()?;
        Ok(Route::Login)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::AuthUser;

    fn session(role: Option<Role>, name: &str) -> Session {
        Session {
            token: Some("t".into()),
            role,
            display_name: Some(name.into()),
            ..Default::default()
        }
    }

    #[test]
    fn each_role_gets_its_menu() {
        let labels = |role| menu_for(role).iter().map(|i| i.label).collect::<Vec<_>>();

        assert_eq!(
            labels(Some(Role::SuperAdmin)),
            ["Dashboard", "Manage Teachers", "Manage Students", "Settings"]
        );
        assert_eq!(labels(Some(Role::Teacher))[1], "My Classes");
        assert_eq!(labels(Some(Role::Student))[1], "My Courses");
        assert_eq!(labels(None), ["Dashboard"]);
    }

    #[test]
    fn current_path_is_highlighted() {
        let view = NavigationShell::view(&session(Some(Role::SuperAdmin), "Root"), "/teachers/");
        let active = view.active().expect("an active entry");
        assert_eq!(active.path, "/teachers");
        assert_eq!(view.menu.iter().filter(|e| e.active).count(), 1);
        assert_eq!(view.greeting, "Welcome, Root!");
    }

    #[test]
    fn nested_paths_do_not_highlight_parent() {
        let view = NavigationShell::view(&session(Some(Role::SuperAdmin), "Root"), "/teachers/4");
        assert!(view.active().is_none());
    }

    #[test]
    fn logout_clears_session_and_returns_login() {
        let ctx = SessionContext::in_memory();
        ctx.login(
            "t1",
            &AuthUser {
                role: Some(Role::Student),
                name: Some("Kim".into()),
                ..Default::default()
            },
        )
        .unwrap();

        let shell = NavigationShell::new(ctx.clone());
        assert_eq!(shell.current_view("/dashboard").menu.len(), 4);

        assert_eq!(shell.logout().unwrap(), Route::Login);
        assert!(!ctx.current().is_authenticated());
        assert_eq!(shell.current_view("/dashboard").menu.len(), 1);
    }
}
