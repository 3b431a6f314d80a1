//! Volunteer endpoints: profile and own applications.

use reqwest::Method;
use serde::Serialize;

use super::models::{Application, ApplicationList, VolunteerData, VolunteerProfile};
use super::mutate;
use crate::error::ApiError;
use crate::gateway::{Envelope, Form, Gateway, RequestOptions, Upload};

pub const PHOTO_FIELD: &str = "photo";

/// Volunteer profile form. List fields go out as repeated `name[]` parts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VolunteerProfileForm {
    pub name: String,
    pub age: String,
    pub country: String,
    pub skills: Vec<String>,
    pub interests: Vec<String>,
    pub languages: Vec<String>,
    pub photo: Option<Upload>,
}

/// Split a comma-separated input into trimmed, non-empty entries.
pub fn split_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

impl VolunteerProfileForm {
    /// Build from raw text inputs (lists comma-separated).
    pub fn from_input(
        name: &str,
        age: &str,
        country: &str,
        skills: &str,
        interests: &str,
        languages: &str,
    ) -> Self {
        Self {
            name: name.to_string(),
            age: age.to_string(),
            country: country.to_string(),
            skills: split_list(skills),
            interests: split_list(interests),
            languages: split_list(languages),
            photo: None,
        }
    }

    pub fn to_form(&self) -> Form {
        let mut form = Form::new()
            .text("name", &self.name)
            .text("age", &self.age)
            .text("country", &self.country);
        for (field, values) in [
            ("skills[]", &self.skills),
            ("interests[]", &self.interests),
            ("languages[]", &self.languages),
        ] {
            for v in values {
                form.push_text(field, v.as_str());
            }
        }
        if let Some(photo) = &self.photo {
            form.push_file(PHOTO_FIELD, photo.clone());
        }
        form
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ApplyBody {
    program_id: i64,
}

#[derive(Clone)]
pub struct VolunteerApi {
    gateway: Gateway,
}

impl VolunteerApi {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    /// `GET /volunteers/me`. `Ok(None)` when the backend reports no profile yet.
    pub async fn profile(&self) -> Result<Option<VolunteerProfile>, ApiError> {
        let env: Envelope<VolunteerData> = self.gateway.get("/volunteers/me").await?;
        if !env.success {
            return Ok(None);
        }
        Ok(env.data.map(|d| d.volunteer))
    }

    /// `POST /volunteers/me` (multipart).
    pub async fn save_profile(&self, form: &VolunteerProfileForm) -> Result<(), ApiError> {
        let options = RequestOptions::new(Method::POST).form(form.to_form());
        mutate(&self.gateway, "/volunteers/me", options).await
    }

    /// `GET /volunteers/applications`.
    pub async fn my_applications(&self) -> Result<Vec<Application>, ApiError> {
        let env: Envelope<ApplicationList> = self.gateway.get("/volunteers/applications").await?;
        Ok(env.ensure_success()?.unwrap_or_default().applications)
    }

    /// `POST /volunteers/applications`.
    pub async fn apply(&self, program_id: i64) -> Result<(), ApiError> {
        let options = RequestOptions::new(Method::POST).json(&ApplyBody { program_id })?;
        mutate(&self.gateway, "/volunteers/applications", options).await
    }
}
