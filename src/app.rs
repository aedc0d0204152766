//! Router: resolves a path to a route, runs the guard against the current
//! session, and mounts the matching screen inside the navigation shell.

use std::sync::Arc;

use serde::Serialize;

use crate::api::ApiClient;
use crate::error::Result;
use crate::guard::{self, GuardDecision};
use crate::navigation::{NavigationShell, ShellView};
use crate::resources::{ListQuery, Resource, ResourceClient, SchoolClasses, Students, Teachers};
use crate::routes::{Collection, Route};
use crate::screens::{
    DashboardKind, DashboardScreen, DetailScreen, FormScreen, ListScreen, PageView, Screen,
};
use crate::session::{FileSessionStore, Session, SessionContext};

/// Outcome of one navigation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Page {
    Login,
    NotFound { path: String },
    Redirect { from: String, to: String },
    Screen {
        path: String,
        shell: ShellView,
        view: PageView,
    },
}

#[derive(Debug, Clone)]
pub struct App {
    session: SessionContext,
    api: ApiClient,
    shell: NavigationShell,
}

impl App {
    /// The app shares the API client's session context
    pub fn new(api: ApiClient) -> Self {
        let session = api.session().clone();
        Self {
            shell: NavigationShell::new(session.clone()),
            session,
            api,
        }
    }

    /// File-backed session plus the configured API client
    pub fn from_config() -> Result<Self> {
        let store = FileSessionStore::from_config()?;
        tracing::debug!(path = %store.path().display(), "using session file");
        let session = SessionContext::new(Arc::new(store));
        Ok(Self::new(ApiClient::from_config(session)?))
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn shell(&self) -> &NavigationShell {
        &self.shell
    }

    pub fn resource<R: Resource>(&self) -> ResourceClient<R> {
        ResourceClient::new(self.api.clone())
    }

    pub fn guard(&self, route: &Route) -> GuardDecision {
        guard::evaluate(route.descriptor(), &self.session.current())
    }

    pub async fn navigate(&self, path: &str) -> Result<Page> {
        self.navigate_with(path, ListQuery::default()).await
    }

    /// Navigate, passing search/paging to list screens
    pub async fn navigate_with(&self, path: &str, query: ListQuery) -> Result<Page> {
        let Some(route) = Route::parse(path) else {
            tracing::debug!(path, "no route matches");
            return Ok(Page::NotFound {
                path: path.to_string(),
            });
        };

        if let GuardDecision::Denied { reason, redirect } = self.guard(&route) {
            tracing::debug!(path, ?reason, to = %redirect, "navigation denied");
            return Ok(Page::Redirect {
                from: route.path(),
                to: redirect.path(),
            });
        }

        let screen = match self.screen_for(&route, query) {
            Some(screen) => screen,
            None => return Ok(Page::Login),
        };

        let view = screen.render().await?;
        Ok(Page::Screen {
            shell: self.shell.current_view(&route.path()),
            path: route.path(),
            view,
        })
    }

    fn screen_for(&self, route: &Route, query: ListQuery) -> Option<Box<dyn Screen>> {
        let dashboard = |kind: DashboardKind| -> Box<dyn Screen> {
            Box::new(DashboardScreen::new(self.api.clone(), kind))
        };

        let screen: Box<dyn Screen> = match route {
            Route::Login => return None,
            Route::Dashboard => dashboard(DashboardKind::General),
            Route::AdminDashboard => dashboard(DashboardKind::Admin),
            Route::TeacherDashboard => dashboard(DashboardKind::Teacher),
            Route::StudentDashboard => dashboard(DashboardKind::Student),
            Route::List(c) => match c {
                Collection::Teachers => Box::new(ListScreen::new(self.resource::<Teachers>(), query)),
                Collection::Students => Box::new(ListScreen::new(self.resource::<Students>(), query)),
                Collection::SchoolClasses => {
                    Box::new(ListScreen::new(self.resource::<SchoolClasses>(), query))
                }
            },
            Route::Detail(c, id) => match c {
                Collection::Teachers => Box::new(DetailScreen::new(self.resource::<Teachers>(), id)),
                Collection::Students => Box::new(DetailScreen::new(self.resource::<Students>(), id)),
                Collection::SchoolClasses => {
                    Box::new(DetailScreen::new(self.resource::<SchoolClasses>(), id))
                }
            },
            Route::Create(c) => match c {
                Collection::Teachers => Box::new(FormScreen::create(self.resource::<Teachers>())),
                Collection::Students => Box::new(FormScreen::create(self.resource::<Students>())),
                Collection::SchoolClasses => {
                    Box::new(FormScreen::create(self.resource::<SchoolClasses>()))
                }
            },
            Route::Edit(c, id) => match c {
                Collection::Teachers => Box::new(FormScreen::edit(self.resource::<Teachers>(), id)),
                Collection::Students => Box::new(FormScreen::edit(self.resource::<Students>(), id)),
                Collection::SchoolClasses => {
                    Box::new(FormScreen::edit(self.resource::<SchoolClasses>(), id))
                }
            },
        };

        Some(screen)
    }

    /// Log in and return the role's landing page
    pub async fn login(&self, email: &str, password: &str) -> Result<Route> {
        let response = self.api.login(email, password).await?;
        let session = self.session.login(response.token, &response.user)?;
        Ok(Route::dashboard_for(session.role))
    }

    pub fn logout(&self) -> Result<Route> {
        self.shell.logout()
    }

    pub fn current_session(&self) -> Session {
        self.session.current()
    }
}
