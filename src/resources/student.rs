use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::api::{FormPayload, Upload};
use crate::error::Result;
use crate::resources::{de_id, de_opt_text, is_blank, unknown_field, Draft, Record, Resource};
use crate::routes::Collection;

#[derive(Debug, Clone, Copy, Default)]
pub struct Students;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Student {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "de_opt_text")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "de_opt_text")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "de_opt_text")]
    pub roll_number: Option<String>,
    #[serde(default, deserialize_with = "de_opt_text")]
    pub class: Option<String>,
    #[serde(default, deserialize_with = "de_opt_text")]
    pub section: Option<String>,
    #[serde(default, deserialize_with = "de_opt_text")]
    pub date_of_birth: Option<String>,
    #[serde(default, deserialize_with = "de_opt_text")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "de_opt_text")]
    pub profile_image: Option<String>,
    #[serde(default, deserialize_with = "de_opt_text")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "de_opt_text")]
    pub updated_at: Option<String>,
}

impl Record for Student {
    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.name
    }

    fn fields(&self) -> Vec<(&'static str, String)> {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        vec![
            ("Name", self.name.clone()),
            ("Email", text(&self.email)),
            ("Phone", text(&self.phone)),
            ("Roll Number", text(&self.roll_number)),
            ("Class", text(&self.class)),
            ("Section", text(&self.section)),
            ("Date of Birth", text(&self.date_of_birth)),
            ("Address", text(&self.address)),
        ]
    }

    fn image(&self) -> Option<&str> {
        self.profile_image.as_deref()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StudentDraft {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub roll_number: String,
    pub class: String,
    pub section: String,
    pub date_of_birth: String,
    pub address: String,
    #[serde(skip)]
    pub profile_image: Option<PathBuf>,
}

impl Draft for StudentDraft {
    fn missing_required(&self) -> Vec<&'static str> {
        [
            ("name", &self.name),
            ("email", &self.email),
            ("roll_number", &self.roll_number),
            ("date_of_birth", &self.date_of_birth),
        ]
        .into_iter()
        .filter(|(_, value)| is_blank(value))
        .map(|(field, _)| field)
        .collect()
    }

    fn set_field(&mut self, name: &str, value: &str) -> Result<()> {
        let value = value.to_string();
        match name {
            "name" => self.name = value,
            "email" => self.email = value,
            "phone" => self.phone = value,
            "roll_number" => self.roll_number = value,
            "class" => self.class = value,
            "section" => self.section = value,
            "date_of_birth" => self.date_of_birth = value,
            "address" => self.address = value,
            "profile_image" => self.profile_image = Some(PathBuf::from(value)),
            other => return Err(unknown_field(Students::NOUN, other)),
        }
        Ok(())
    }

    fn to_form(&self) -> FormPayload {
        let form = FormPayload::new()
            .text("name", &self.name)
            .text("email", &self.email)
            .text("phone", &self.phone)
            .text("roll_number", &self.roll_number)
            .text("class", &self.class)
            .text("section", &self.section)
            .text("date_of_birth", &self.date_of_birth)
            .text("address", &self.address);

        match &self.profile_image {
            Some(path) => form.upload(Upload::new("profile_image", path)),
            None => form,
        }
    }
}

impl Resource for Students {
    const COLLECTION: Collection = Collection::Students;
    const NOUN: &'static str = "student";
    const HEADING: &'static str = "Students";
    const UPLOAD_FIELD: Option<&'static str> = Some("profile_image");

    type Record = Student;
    type Draft = StudentDraft;

    fn draft_from(record: &Student) -> StudentDraft {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        StudentDraft {
            name: record.name.clone(),
            email: text(&record.email),
            phone: text(&record.phone),
            roll_number: text(&record.roll_number),
            class: text(&record.class),
            section: text(&record.section),
            // date inputs only take the day part of a timestamp
            date_of_birth: text(&record.date_of_birth)
                .split('T')
                .next()
                .unwrap_or_default()
                .to_string(),
            address: text(&record.address),
            profile_image: None,
        }
    }
}
