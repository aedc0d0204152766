use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::error::{ClientError, FieldErrors, Result};
use crate::resources::{Draft, ListQuery, Record, Resource, ResourceClient, Teachers};
use crate::routes::{Collection, Route};
use crate::screens::{list_link, Choice, FormView, PageView, Screen, GENERIC_ERROR};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", content = "id", rename_all = "snake_case")]
pub enum FormMode {
    Create,
    Edit(String),
}

/// Result of pressing submit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Saved; the screen navigates away
    Saved { redirect: Route },
    /// Not saved; the form stays with its errors filled in
    Rejected,
}

/// Transient form state of one create or edit screen
#[derive(Debug, Clone)]
pub struct FormState<R: Resource> {
    pub mode: FormMode,
    pub draft: R::Draft,
    pub errors: FieldErrors,
    pub general_error: Option<String>,
    pub choices: Vec<Choice>,
}

impl<R: Resource> FormState<R> {
    fn new(mode: FormMode, draft: R::Draft, choices: Vec<Choice>) -> Self {
        Self {
            mode,
            draft,
            errors: FieldErrors::new(),
            general_error: None,
            choices,
        }
    }

    /// Edit one input; its stale error goes away with the old value
    pub fn set(&mut self, field: &str, value: &str) -> Result<()> {
        self.draft.set_field(field, value)?;
        self.errors.remove(field);
        Ok(())
    }

    /// First message for a field, as shown under its input
    pub fn error_for(&self, field: &str) -> Option<&str> {
        self.errors
            .get(field)
            .and_then(|messages| messages.first())
            .map(String::as_str)
    }

    pub fn view(&self) -> FormView {
        FormView {
            collection: R::COLLECTION,
            mode: self.mode.clone(),
            values: serde_json::to_value(&self.draft).unwrap_or_default(),
            errors: self.errors.clone(),
            general_error: self.general_error.clone(),
            choices: self.choices.clone(),
            upload_field: R::UPLOAD_FIELD,
            cancel_link: list_link(R::COLLECTION),
        }
    }

    /// Names of the inputs the form renders, the file input included
    pub fn inputs(&self) -> Vec<String> {
        let mut names: Vec<String> = match serde_json::to_value(&self.draft) {
            Ok(Value::Object(fields)) => fields.into_iter().map(|(name, _)| name).collect(),
            _ => Vec::new(),
        };
        names.extend(R::UPLOAD_FIELD.map(str::to_string));
        names
    }

    /// Errors with an input stay on it; the rest become the form's alert
    fn apply_errors(&mut self, errors: FieldErrors) {
        let inputs = self.inputs();
        let (placed, unplaced): (FieldErrors, FieldErrors) = errors
            .into_iter()
            .partition(|(field, _)| inputs.contains(field));

        self.errors = placed;
        if !unplaced.is_empty() {
            let message = unplaced
                .values()
                .flatten()
                .cloned()
                .collect::<Vec<_>>()
                .join(" ");
            self.general_error = Some(if message.is_empty() {
                GENERIC_ERROR.to_string()
            } else {
                message
            });
        }
    }
}

pub struct FormScreen<R: Resource> {
    client: ResourceClient<R>,
    mode: FormMode,
}

impl<R: Resource> FormScreen<R> {
    pub fn create(client: ResourceClient<R>) -> Self {
        Self {
            client,
            mode: FormMode::Create,
        }
    }

    pub fn edit(client: ResourceClient<R>, id: impl Into<String>) -> Self {
        Self {
            client,
            mode: FormMode::Edit(id.into()),
        }
    }

    pub async fn mount(&self) -> Result<FormState<R>> {
        match &self.mode {
            FormMode::Create => {
                let choices = self.load_choices().await?;
                Ok(FormState::new(FormMode::Create, R::Draft::default(), choices))
            }
            FormMode::Edit(id) => {
                // The record and the picker options are independent reads
                let (record, choices) =
                    futures::try_join!(self.client.get(id), self.load_choices())?;
                Ok(FormState::new(
                    FormMode::Edit(record.id().to_string()),
                    R::draft_from(&record),
                    choices,
                ))
            }
        }
    }

    /// Class forms pick a class teacher from the teacher list
    async fn load_choices(&self) -> Result<Vec<Choice>> {
        if R::COLLECTION != Collection::SchoolClasses {
            return Ok(Vec::new());
        }

        let teachers = ResourceClient::<Teachers>::new(self.client.api().clone());
        let listing = teachers.list(&ListQuery::default()).await?;
        Ok(listing
            .items
            .iter()
            .map(|t| Choice {
                value: t.id().to_string(),
                label: t.title().to_string(),
            })
            .collect())
    }

    /// Send the draft. Validation failures land on `state.errors`, anything
    /// else on `state.general_error`; neither navigates.
    pub async fn submit(&self, state: &mut FormState<R>) -> SubmitOutcome {
        state.errors.clear();
        state.general_error = None;

        let result = match &state.mode {
            FormMode::Create => self.client.create(&state.draft).await,
            FormMode::Edit(id) => self.client.update(id, &state.draft).await,
        };

        match result {
            Ok(_) => {
                tracing::info!(resource = R::NOUN, mode = ?state.mode, "record saved");
                SubmitOutcome::Saved {
                    redirect: Route::List(R::COLLECTION),
                }
            }
            Err(ClientError::Validation { message, errors }) => {
                tracing::debug!(resource = R::NOUN, "{}", message);
                state.apply_errors(errors);
                SubmitOutcome::Rejected
            }
            Err(e) => {
                tracing::error!(resource = R::NOUN, "failed to save record: {}", e);
                state.general_error = Some(GENERIC_ERROR.to_string());
                SubmitOutcome::Rejected
            }
        }
    }
}

#[async_trait]
impl<R: Resource> Screen for FormScreen<R> {
    async fn render(&self) -> Result<PageView> {
        Ok(PageView::Form(self.mount().await?.view()))
    }
}
