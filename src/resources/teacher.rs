use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::api::{FormPayload, Upload};
use crate::error::Result;
use crate::resources::{
    de_id, de_opt_text, is_blank, storage_link, unknown_field, Draft, Record, Resource,
};
use crate::routes::Collection;

#[derive(Debug, Clone, Copy, Default)]
pub struct Teachers;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Teacher {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, deserialize_with = "de_opt_text")]
    pub subject: Option<String>,
    #[serde(default, deserialize_with = "de_opt_text")]
    pub phone: Option<String>,
    /// Path relative to the public storage root
    #[serde(default, deserialize_with = "de_opt_text")]
    pub profile_picture: Option<String>,
}

impl Teacher {
    pub fn picture_url(&self, storage_url: &str) -> Option<String> {
        self.image().map(|p| storage_link(storage_url, p))
    }
}

impl Record for Teacher {
    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.name
    }

    fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Name", self.name.clone()),
            ("Email", self.email.clone()),
            ("Subject", self.subject.clone().unwrap_or_default()),
            ("Phone", self.phone.clone().unwrap_or_default()),
        ]
    }

    fn image(&self) -> Option<&str> {
        self.profile_picture.as_deref()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TeacherDraft {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub phone: String,
    #[serde(skip)]
    pub profile_picture: Option<PathBuf>,
}

impl Draft for TeacherDraft {
    fn missing_required(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if is_blank(&self.name) {
            missing.push("name");
        }
        if is_blank(&self.email) {
            missing.push("email");
        }
        missing
    }

    fn set_field(&mut self, name: &str, value: &str) -> Result<()> {
        match name {
            "name" => self.name = value.to_string(),
            "email" => self.email = value.to_string(),
            "subject" => self.subject = value.to_string(),
            "phone" => self.phone = value.to_string(),
            "profile_picture" => self.profile_picture = Some(PathBuf::from(value)),
            other => return Err(unknown_field(Teachers::NOUN, other)),
        }
        Ok(())
    }

    fn to_form(&self) -> FormPayload {
        let form = FormPayload::new()
            .text("name", &self.name)
            .text("email", &self.email)
            .text("subject", &self.subject)
            .text("phone", &self.phone);

        match &self.profile_picture {
            Some(path) => form.upload(Upload::new("profile_picture", path)),
            None => form,
        }
    }
}

impl Resource for Teachers {
    const COLLECTION: Collection = Collection::Teachers;
    const NOUN: &'static str = "teacher";
    const HEADING: &'static str = "Teachers";
    const UPLOAD_FIELD: Option<&'static str> = Some("profile_picture");

    type Record = Teacher;
    type Draft = TeacherDraft;

    fn draft_from(record: &Teacher) -> TeacherDraft {
        TeacherDraft {
            name: record.name.clone(),
            email: record.email.clone(),
            subject: record.subject.clone().unwrap_or_default(),
            phone: record.phone.clone().unwrap_or_default(),
            profile_picture: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_carries_picture_as_upload() {
        let mut draft = TeacherDraft::default();
        draft.set_field("name", "Ada").unwrap();
        draft.set_field("email", "ada@school.test").unwrap();
        draft.set_field("profile_picture", "/tmp/ada.png").unwrap();

        let form = draft.to_form();
        assert_eq!(form.field("name"), Some("Ada"));
        assert_eq!(form.uploads, vec![Upload::new("profile_picture", "/tmp/ada.png")]);
        assert!(draft.missing_required().is_empty());
    }

    #[test]
    fn unknown_field_is_rejected() {
        let mut draft = TeacherDraft::default();
        let err = draft.set_field("salary", "1").unwrap_err();
        assert!(err.field_errors().unwrap().contains_key("salary"));
    }

    #[test]
    fn picture_url_joins_storage_root() {
        let teacher = Teacher {
            id: "1".into(),
            profile_picture: Some("teachers/ada.png".into()),
            ..Default::default()
        };
        assert_eq!(
            teacher.picture_url("http://127.0.0.1:8000/storage/").as_deref(),
            Some("http://127.0.0.1:8000/storage/teachers/ada.png")
        );
    }

    #[test]
    fn edit_draft_prefills_from_record() {
        let teacher: Teacher = serde_json::from_str(
            r#"{"id":3,"name":"Alan","email":"alan@school.test","subject":"CS","phone":null}"#,
        )
        .unwrap();
        let draft = Teachers::draft_from(&teacher);
        assert_eq!(draft.subject, "CS");
        assert_eq!(draft.phone, "");
        assert!(draft.profile_picture.is_none());
    }
}
