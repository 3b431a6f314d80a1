//! `/programs` endpoints and the program form.

use reqwest::Method;

use super::models::{Program, ProgramData};
use super::mutate;
use crate::error::ApiError;
use crate::gateway::{Envelope, Form, Gateway, RequestOptions, Upload};

/// Multipart field the backend's upload middleware reads program images from.
pub const PROGRAM_IMAGES_FIELD: &str = "programImages";

/// Create/edit form for a program.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProgramForm {
    pub title: String,
    pub description: String,
    pub category: String,
    pub sub_category: String,
    pub location: String,
    pub duration: String,
    pub max_volunteers: u32,
    pub images: Vec<Upload>,
}

impl ProgramForm {
    /// Prefill from an existing program (images are not re-uploaded).
    pub fn from_program(program: &Program) -> Self {
        Self {
            title: program.title.clone(),
            description: program.description.clone().unwrap_or_default(),
            category: program.category.clone().unwrap_or_default(),
            sub_category: program.sub_category.clone().unwrap_or_default(),
            location: program.location.clone().unwrap_or_default(),
            duration: program.duration.clone().unwrap_or_default(),
            max_volunteers: program.max_volunteers.unwrap_or(0),
            images: Vec::new(),
        }
    }

    /// A new program needs at least one image.
    pub fn validate_new(&self) -> Result<(), ApiError> {
        if self.images.is_empty() {
            return Err(ApiError::Validation(
                "Please upload at least one image".to_string(),
            ));
        }
        Ok(())
    }

    /// Required fields always; optional ones only when set.
    pub fn to_form(&self) -> Form {
        let mut form = Form::new()
            .text("title", &self.title)
            .text("description", &self.description)
            .text("category", &self.category);
        for (name, value) in [
            ("subCategory", &self.sub_category),
            ("location", &self.location),
            ("duration", &self.duration),
        ] {
            if !value.is_empty() {
                form.push_text(name, value.as_str());
            }
        }
        if self.max_volunteers > 0 {
            form.push_text("maxVolunteers", self.max_volunteers.to_string());
        }
        for image in &self.images {
            form.push_file(PROGRAM_IMAGES_FIELD, image.clone());
        }
        form
    }
}

#[derive(Clone)]
pub struct ProgramsApi {
    gateway: Gateway,
}

impl ProgramsApi {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    /// `GET /programs/{id}`.
    pub async fn get(&self, id: i64) -> Result<Program, ApiError> {
        let env: Envelope<ProgramData> = self.gateway.get(&format!("/programs/{}", id)).await?;
        Ok(env.into_data()?.program)
    }

    /// `POST /programs` (multipart). Validates images first.
    pub async fn create(&self, form: &ProgramForm) -> Result<(), ApiError> {
        form.validate_new()?;
        let options = RequestOptions::new(Method::POST).form(form.to_form());
        mutate(&self.gateway, "/programs", options).await
    }

    /// `PUT /programs/{id}` (multipart). Images are optional on edit.
    pub async fn update(&self, id: i64, form: &ProgramForm) -> Result<(), ApiError> {
        let options = RequestOptions::new(Method::PUT).form(form.to_form());
        mutate(&self.gateway, &format!("/programs/{}", id), options).await
    }

    /// `DELETE /programs/{id}`.
    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        let options = RequestOptions::new(Method::DELETE);
        mutate(&self.gateway, &format!("/programs/{}", id), options).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ProgramForm {
        ProgramForm {
            title: "Organic farm help".into(),
            description: "Harvest season".into(),
            category: "Farming".into(),
            location: "Himachal".into(),
            ..Default::default()
        }
    }

    #[test]
    fn new_program_requires_image() {
        let form = sample();
        let err = form.validate_new().unwrap_err();
        assert_eq!(err.to_string(), "Please upload at least one image");
    }

    #[test]
    fn optional_fields_skipped_when_empty() {
        let mut form = sample();
        form.images.push(Upload::guess("farm.png", vec![0u8; 4]));
        let mp = form.to_form();
        assert_eq!(mp.values("location"), vec!["Himachal"]);
        assert!(mp.values("subCategory").is_empty());
        assert!(mp.values("maxVolunteers").is_empty());
        assert_eq!(mp.file_count(PROGRAM_IMAGES_FIELD), 1);
    }

    #[test]
    fn max_volunteers_sent_when_positive() {
        let mut form = sample();
        form.max_volunteers = 4;
        assert_eq!(form.to_form().values("maxVolunteers"), vec!["4"]);
    }
}
