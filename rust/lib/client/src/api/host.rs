//! Host endpoints: profile, own programs, incoming applications.

use reqwest::Method;
use serde::Serialize;

use super::models::{Application, ApplicationList, ApplicationStatus, HostProfile, Program, ProgramList};
use super::mutate;
use crate::error::ApiError;
use crate::gateway::{Envelope, Form, Gateway, RequestOptions, Upload};

pub const PROPERTY_IMAGES_FIELD: &str = "propertyImages";

/// Host profile edit form. Every field is sent, empty or not.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HostProfileForm {
    pub name: String,
    pub property_name: String,
    pub location: String,
    pub acomodation_type: String,
    pub meals: String,
    pub work_required: String,
    pub capacity: String,
    pub contact: String,
    pub images: Vec<Upload>,
}

impl HostProfileForm {
    pub fn from_profile(profile: &HostProfile) -> Self {
        let s = |v: &Option<String>| v.clone().unwrap_or_default();
        Self {
            name: s(&profile.name),
            property_name: s(&profile.property_name),
            location: s(&profile.location),
            acomodation_type: s(&profile.acomodation_type),
            meals: s(&profile.meals),
            work_required: s(&profile.work_required),
            capacity: s(&profile.capacity),
            contact: s(&profile.contact),
            images: Vec::new(),
        }
    }

    pub fn to_form(&self) -> Form {
        let mut form = Form::new()
            .text("name", &self.name)
            .text("propertyName", &self.property_name)
            .text("location", &self.location)
            .text("acomodationType", &self.acomodation_type)
            .text("meals", &self.meals)
            .text("workRequired", &self.work_required)
            .text("capacity", &self.capacity)
            .text("contact", &self.contact);
        for image in &self.images {
            form.push_file(PROPERTY_IMAGES_FIELD, image.clone());
        }
        form
    }
}

#[derive(Serialize)]
struct StatusBody {
    status: ApplicationStatus,
}

#[derive(Clone)]
pub struct HostApi {
    gateway: Gateway,
}

impl HostApi {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    /// `GET /hosts/me`.
    pub async fn my_profile(&self) -> Result<HostProfile, ApiError> {
        let env: Envelope<HostProfile> = self.gateway.get("/hosts/me").await?;
        env.into_data()
    }

    /// `PUT /hosts/me` (multipart).
    pub async fn update_profile(&self, form: &HostProfileForm) -> Result<(), ApiError> {
        let options = RequestOptions::new(Method::PUT).form(form.to_form());
        mutate(&self.gateway, "/hosts/me", options).await
    }

    /// `GET /hosts/programs`.
    pub async fn programs(&self) -> Result<Vec<Program>, ApiError> {
        let env: Envelope<ProgramList> = self.gateway.get("/hosts/programs").await?;
        Ok(env.ensure_success()?.unwrap_or_default().programs)
    }

    /// `GET /hosts/applications`.
    pub async fn applications(&self) -> Result<Vec<Application>, ApiError> {
        let env: Envelope<ApplicationList> = self.gateway.get("/hosts/applications").await?;
        Ok(env.ensure_success()?.unwrap_or_default().applications)
    }

    /// `PATCH /applications/{id}/status`.
    pub async fn update_application_status(
        &self,
        id: i64,
        status: ApplicationStatus,
    ) -> Result<(), ApiError> {
        let options = RequestOptions::new(Method::PATCH).json(&StatusBody { status })?;
        mutate(&self.gateway, &format!("/applications/{}/status", id), options).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_form_sends_every_field() {
        let form = HostProfileForm {
            name: "Ravi".into(),
            capacity: "8".into(),
            images: vec![Upload::guess("house.webp", vec![1])],
            ..Default::default()
        };
        let mp = form.to_form();
        assert_eq!(mp.values("name"), vec!["Ravi"]);
        assert_eq!(mp.values("meals"), vec![""]);
        assert_eq!(mp.values("acomodationType"), vec![""]);
        assert_eq!(mp.file_count(PROPERTY_IMAGES_FIELD), 1);
        assert_eq!(mp.len(), 9);
    }

    #[test]
    fn profile_form_prefills_from_profile() {
        let profile = HostProfile {
            name: Some("Ravi".into()),
            capacity: Some("12".into()),
            ..Default::default()
        };
        let form = HostProfileForm::from_profile(&profile);
        assert_eq!(form.name, "Ravi");
        assert_eq!(form.capacity, "12");
        assert_eq!(form.contact, "");
    }
}
