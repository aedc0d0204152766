use async_trait::async_trait;

use crate::api::ApiClient;
use crate::error::Result;
use crate::resources::{ListQuery, ResourceClient, Teachers};
use crate::routes::{Collection, Route};
use crate::screens::{Card, DashboardView, PageView, Screen};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardKind {
    /// Shared landing page; shows the profile from `GET /user`
    General,
    Admin,
    Teacher,
    Student,
}

pub struct DashboardScreen {
    api: ApiClient,
    kind: DashboardKind,
}

impl DashboardScreen {
    pub fn new(api: ApiClient, kind: DashboardKind) -> Self {
        Self { api, kind }
    }

    pub async fn mount(&self) -> Result<DashboardView> {
        match self.kind {
            DashboardKind::General => {
                let user = self.api.current_user().await?;
                let text = |key: &str| user.get(key).and_then(|v| v.as_str()).unwrap_or_default().to_string();

                Ok(DashboardView {
                    heading: format!("Welcome, {}", text("name")),
                    lines: vec![
                        format!("Email: {}", text("email")),
                        format!("Role: {}", text("role")),
                    ],
                    cards: Vec::new(),
                })
            }
            DashboardKind::Admin => {
                let teachers = ResourceClient::<Teachers>::new(self.api.clone())
                    .list(&ListQuery::default())
                    .await?;
                let total = teachers.total.unwrap_or(teachers.items.len() as u64);

                Ok(DashboardView {
                    heading: "Super Admin Dashboard".to_string(),
                    lines: vec!["Here you can manage teachers, students, etc.".to_string()],
                    cards: vec![Card {
                        title: "Total Teachers".to_string(),
                        value: total.to_string(),
                        link: Route::List(Collection::Teachers).path(),
                    }],
                })
            }
            DashboardKind::Teacher => Ok(DashboardView {
                heading: "Teacher Dashboard".to_string(),
                lines: vec!["Your classes, assignments and profile.".to_string()],
                cards: Vec::new(),
            }),
            DashboardKind::Student => Ok(DashboardView {
                heading: "Student Dashboard".to_string(),
                lines: vec!["Your courses, assignments and profile.".to_string()],
                cards: Vec::new(),
            }),
        }
    }
}

#[async_trait]
impl Screen for DashboardScreen {
    async fn render(&self) -> Result<PageView> {
        Ok(PageView::Dashboard(self.mount().await?))
    }
}
