//! Page controllers. Each screen mounts by issuing its reads through a
//! [`crate::resources::ResourceClient`] and produces a [`PageView`] the
//! console prints.

pub mod dashboard;
pub mod detail;
pub mod form;
pub mod list;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::error::{FieldErrors, Result};
use crate::routes::{Collection, Route};

pub use dashboard::{DashboardKind, DashboardScreen};
pub use detail::DetailScreen;
pub use form::{FormMode, FormScreen, FormState, SubmitOutcome};
pub use list::ListScreen;

/// Anything the router can mount for a route
#[async_trait]
pub trait Screen: Send + Sync {
    async fn render(&self) -> Result<PageView>;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "page", rename_all = "snake_case")]
pub enum PageView {
    Dashboard(DashboardView),
    List(ListView),
    Detail(DetailView),
    Form(FormView),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub heading: String,
    pub lines: Vec<String>,
    /// Cards linking elsewhere, e.g. the teacher total
    pub cards: Vec<Card>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Card {
    pub title: String,
    pub value: String,
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Row {
    pub id: String,
    pub cells: Vec<String>,
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListView {
    pub collection: Collection,
    pub heading: String,
    pub columns: Vec<&'static str>,
    pub rows: Vec<Row>,
    pub page: u32,
    pub last_page: u32,
    pub create_link: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailView {
    pub collection: Collection,
    pub id: String,
    pub title: String,
    pub fields: Vec<(&'static str, String)>,
    pub image_url: Option<String>,
    pub edit_link: String,
    pub back_link: String,
}

/// A choice in a select input, e.g. the class teacher picker
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Choice {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormView {
    pub collection: Collection,
    pub mode: FormMode,
    pub values: Value,
    pub errors: FieldErrors,
    pub general_error: Option<String>,
    pub choices: Vec<Choice>,
    /// File input, rendered apart from `values`
    pub upload_field: Option<&'static str>,
    pub cancel_link: String,
}

pub(crate) fn list_link(collection: Collection) -> String {
    Route::List(collection).path()
}

/// Message shown when a failure has nothing field-specific to say
pub const GENERIC_ERROR: &str = "Something went wrong. Please try again.";
