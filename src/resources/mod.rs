//! Generic CRUD client shared by every resource screen.
//!
//! A [`Resource`] names a backend collection and its record and draft
//! shapes; [`ResourceClient`] turns that into list/get/create/update/delete
//! calls on the [`ApiClient`].

pub mod school_class;
pub mod student;
pub mod teacher;

use std::fmt::Debug;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::api::{ApiClient, FormPayload};
use crate::error::{ClientError, FieldErrors, Result};
use crate::routes::Collection;

pub use school_class::{SchoolClass, SchoolClassDraft, SchoolClasses};
pub use student::{Student, StudentDraft, Students};
pub use teacher::{Teacher, TeacherDraft, Teachers};

/// A backend-owned record as the console displays it
pub trait Record: DeserializeOwned + Serialize + Clone + Debug + Send + Sync {
    fn id(&self) -> &str;
    fn title(&self) -> &str;
    /// Labelled values in display order
    fn fields(&self) -> Vec<(&'static str, String)>;

    /// Uploaded image, relative to the public storage root
    fn image(&self) -> Option<&str> {
        None
    }
}

/// Form state for a create or edit screen
pub trait Draft: Serialize + Default + Clone + Debug + Send + Sync {
    /// Names of required fields that are still blank
    fn missing_required(&self) -> Vec<&'static str>;

    /// Set one field from its form name
    fn set_field(&mut self, name: &str, value: &str) -> Result<()>;

    /// Multipart encoding of the draft, uploads included
    fn to_form(&self) -> FormPayload;

    /// Client-side "required" errors, keyed like backend validation errors
    fn required_errors(&self) -> Option<FieldErrors> {
        let missing = self.missing_required();
        if missing.is_empty() {
            return None;
        }

        Some(
            missing
                .into_iter()
                .map(|field| {
                    let label = field.replace('_', " ");
                    (field.to_string(), vec![format!("The {} field is required.", label)])
                })
                .collect(),
        )
    }
}

pub trait Resource: Send + Sync + 'static {
    const COLLECTION: Collection;
    /// Singular display noun, e.g. "teacher"
    const NOUN: &'static str;
    /// Title of the list page
    const HEADING: &'static str;
    /// Form field that carries the record's image, if it has one
    const UPLOAD_FIELD: Option<&'static str>;
    /// Records with an image submit as multipart
    const MULTIPART: bool = Self::UPLOAD_FIELD.is_some();

    type Record: Record;
    type Draft: Draft;

    /// Prefill an edit form from the stored record
    fn draft_from(record: &Self::Record) -> Self::Draft;

    fn path() -> String {
        format!("/{}", Self::COLLECTION.segment())
    }

    fn record_path(id: &str) -> String {
        format!("/{}/{}", Self::COLLECTION.segment(), id)
    }
}

/// Search and paging parameters for a list fetch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ListQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
}

impl ListQuery {
    pub fn page(page: u32) -> Self {
        Self {
            page: Some(page),
            ..Default::default()
        }
    }
}

/// One page of records
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Listing<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub last_page: u32,
    pub total: Option<u64>,
}

impl<T> Listing<T> {
    pub fn has_next(&self) -> bool {
        self.page < self.last_page
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }
}

/// The backend answers list calls either with a bare array or with a
/// paginated envelope
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ListResponse<T> {
    Paginated {
        data: Vec<T>,
        #[serde(default)]
        current_page: Option<u32>,
        #[serde(default)]
        last_page: Option<u32>,
        #[serde(default)]
        total: Option<u64>,
    },
    Plain(Vec<T>),
}

impl<T> From<ListResponse<T>> for Listing<T> {
    fn from(response: ListResponse<T>) -> Self {
        match response {
            ListResponse::Paginated {
                data,
                current_page,
                last_page,
                total,
            } => {
                let page = current_page.unwrap_or(1).max(1);
                Listing {
                    items: data,
                    page,
                    last_page: last_page.unwrap_or(page).max(page),
                    total,
                }
            }
            ListResponse::Plain(items) => Listing {
                total: Some(items.len() as u64),
                items,
                page: 1,
                last_page: 1,
            },
        }
    }
}

/// Single records may come back wrapped in `{ "data": ... }`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecordResponse<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> RecordResponse<T> {
    fn into_inner(self) -> T {
        match self {
            RecordResponse::Wrapped { data } => data,
            RecordResponse::Bare(record) => record,
        }
    }
}

pub fn decode_listing<T: DeserializeOwned>(body: Value) -> Result<Listing<T>> {
    let response: ListResponse<T> = serde_json::from_value(body)?;
    Ok(response.into())
}

pub fn decode_record<T: DeserializeOwned>(body: Value) -> Result<T> {
    let response: RecordResponse<T> = serde_json::from_value(body)?;
    Ok(response.into_inner())
}

/// CRUD calls for one resource collection
#[derive(Debug, Clone)]
pub struct ResourceClient<R: Resource> {
    api: ApiClient,
    _resource: PhantomData<R>,
}

impl<R: Resource> ResourceClient<R> {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            _resource: PhantomData,
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub async fn list(&self, query: &ListQuery) -> Result<Listing<R::Record>> {
        let body: Value = self.api.get_with_query(&R::path(), query).await?;
        decode_listing(body)
    }

    pub async fn get(&self, id: &str) -> Result<R::Record> {
        let body: Value = self.api.get(&R::record_path(id)).await?;
        decode_record(body)
    }

    /// Required fields are checked locally; nothing is sent while any is blank
    pub async fn create(&self, draft: &R::Draft) -> Result<Value> {
        Self::check_required(draft)?;

        if R::MULTIPART {
            self.api.post_multipart(&R::path(), draft.to_form()).await
        } else {
            self.api.post(&R::path(), draft).await
        }
    }

    pub async fn update(&self, id: &str, draft: &R::Draft) -> Result<Value> {
        Self::check_required(draft)?;

        if R::MULTIPART {
            self.api
                .put_multipart(&R::record_path(id), draft.to_form())
                .await
        } else {
            self.api.put(&R::record_path(id), draft).await
        }
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.api.delete(&R::record_path(id)).await
    }

    fn check_required(draft: &R::Draft) -> Result<()> {
        match draft.required_errors() {
            Some(errors) => Err(ClientError::Validation {
                message: "Please fill in all required fields.".to_string(),
                errors,
            }),
            None => Ok(()),
        }
    }
}

/// Error for a `set_field` call naming a field the form does not have
pub(crate) fn unknown_field(noun: &str, name: &str) -> ClientError {
    let mut errors = FieldErrors::new();
    errors.insert(name.to_string(), vec![format!("{} has no field '{}'", noun, name)]);
    ClientError::Validation {
        message: format!("Unknown {} field '{}'", noun, name),
        errors,
    }
}

/// Ids arrive as numbers or strings; both are kept as text
pub(crate) fn de_id<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_text(value).unwrap_or_default())
}

/// Optional scalar that may be a number, a string or null
pub(crate) fn de_opt_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(value_to_text))
}

fn value_to_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

/// Public URL of a file under the storage root
pub fn storage_link(storage_url: &str, path: &str) -> String {
    format!("{}/{}", storage_url.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// Blank-or-missing check used by the drafts
pub(crate) fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
