use serde::{Deserialize, Serialize};

use crate::api::FormPayload;
use crate::error::{ClientError, FieldErrors, Result};
use crate::resources::{de_id, de_opt_text, is_blank, unknown_field, Draft, Record, Resource, Teacher};
use crate::routes::Collection;

/// Default seat count for a new class
pub const DEFAULT_CAPACITY: u32 = 40;

#[derive(Debug, Clone, Copy, Default)]
pub struct SchoolClasses;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchoolClass {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "de_opt_text")]
    pub numeric_name: Option<String>,
    #[serde(default, deserialize_with = "de_opt_text")]
    pub description: Option<String>,
    #[serde(default)]
    pub capacity: Option<u32>,
    #[serde(default, deserialize_with = "de_opt_text")]
    pub class_teacher_id: Option<String>,
    #[serde(default)]
    pub class_teacher: Option<Teacher>,
    #[serde(default)]
    pub sections_count: Option<u32>,
    #[serde(default)]
    pub total_students: Option<u32>,
}

impl Record for SchoolClass {
    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.name
    }

    fn fields(&self) -> Vec<(&'static str, String)> {
        let teacher = self
            .class_teacher
            .as_ref()
            .map(|t| t.name.clone())
            .unwrap_or_else(|| "Not assigned".to_string());

        vec![
            ("Name", self.name.clone()),
            ("Numeric Name", self.numeric_name.clone().unwrap_or_default()),
            ("Capacity", self.capacity.map(|c| c.to_string()).unwrap_or_default()),
            ("Class Teacher", teacher),
            ("Students", self.total_students.unwrap_or(0).to_string()),
            ("Sections", self.sections_count.unwrap_or(0).to_string()),
            ("Description", self.description.clone().unwrap_or_default()),
        ]
    }
}

/// Sent as JSON; blank optional fields go out as null
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchoolClassDraft {
    pub name: String,
    pub numeric_name: String,
    pub description: Option<String>,
    pub capacity: Option<u32>,
    pub class_teacher_id: Option<String>,
}

impl Default for SchoolClassDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            numeric_name: String::new(),
            description: None,
            capacity: Some(DEFAULT_CAPACITY),
            class_teacher_id: None,
        }
    }
}

impl Draft for SchoolClassDraft {
    fn missing_required(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if is_blank(&self.name) {
            missing.push("name");
        }
        if is_blank(&self.numeric_name) {
            missing.push("numeric_name");
        }
        if self.capacity.is_none() {
            missing.push("capacity");
        }
        missing
    }

    fn set_field(&mut self, name: &str, value: &str) -> Result<()> {
        let optional = |v: &str| (!is_blank(v)).then(|| v.to_string());
        match name {
            "name" => self.name = value.to_string(),
            "numeric_name" => self.numeric_name = value.to_string(),
            "description" => self.description = optional(value),
            "class_teacher_id" => self.class_teacher_id = optional(value),
            "capacity" if is_blank(value) => self.capacity = None,
            "capacity" => {
                let capacity = value.trim().parse().map_err(|_| {
                    let mut errors = FieldErrors::new();
                    errors.insert(
                        "capacity".to_string(),
                        vec!["The capacity must be a whole number.".to_string()],
                    );
                    ClientError::Validation {
                        message: format!("Invalid capacity '{}'", value),
                        errors,
                    }
                })?;
                self.capacity = Some(capacity);
            }
            other => return Err(unknown_field(SchoolClasses::NOUN, other)),
        }
        Ok(())
    }

    fn to_form(&self) -> FormPayload {
        FormPayload::new()
            .text("name", &self.name)
            .text("numeric_name", &self.numeric_name)
            .optional_text("description", self.description.clone())
            .optional_text("capacity", self.capacity.map(|c| c.to_string()))
            .optional_text("class_teacher_id", self.class_teacher_id.clone())
    }
}

impl Resource for SchoolClasses {
    const COLLECTION: Collection = Collection::SchoolClasses;
    const NOUN: &'static str = "class";
    const HEADING: &'static str = "School Classes";
    const UPLOAD_FIELD: Option<&'static str> = None;

    type Record = SchoolClass;
    type Draft = SchoolClassDraft;

    fn draft_from(record: &SchoolClass) -> SchoolClassDraft {
        SchoolClassDraft {
            name: record.name.clone(),
            numeric_name: record.numeric_name.clone().unwrap_or_default(),
            description: record.description.clone(),
            capacity: record.capacity,
            class_teacher_id: record.class_teacher_id.clone(),
        }
    }
}
