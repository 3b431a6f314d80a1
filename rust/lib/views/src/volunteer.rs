//! Volunteer dashboard and profile editor.

use std::sync::Arc;

use tracing::warn;
use yatri_client::api::VolunteerProfileForm;
use yatri_client::{Application, Role, Upload, VolunteerProfile};
use yatri_session::{SessionManager, ViewScope};

use crate::dialog::{Dialog, DialogKind};

/// Where volunteers without a profile are sent.
pub const ADD_INFO_PATH: &str = "/volunteer/add-info";

pub struct VolunteerDashboard {
    session: Arc<SessionManager>,
    scope: ViewScope,
    pub loading: bool,
    pub profile: Option<VolunteerProfile>,
    pub applications: Vec<Application>,
}

impl VolunteerDashboard {
    pub fn new(session: Arc<SessionManager>) -> Self {
        Self {
            session,
            scope: ViewScope::new(),
            loading: true,
            profile: None,
            applications: Vec::new(),
        }
    }

    pub fn scope(&self) -> &ViewScope {
        &self.scope
    }

    /// Fetch profile and applications together. No profile, or any
    /// failure, redirects to the profile form.
    pub async fn load(&mut self) {
        let volunteer = self.session.gateway().volunteer();
        let fetched = self
            .scope
            .run(async { tokio::try_join!(volunteer.profile(), volunteer.my_applications()) })
            .await;
        let Some(fetched) = fetched else { return };

        match fetched {
            Ok((Some(profile), applications)) => {
                self.profile = Some(profile);
                self.applications = applications;
            }
            Ok((None, _)) => self.session.navigator().push(ADD_INFO_PATH),
            Err(e) => {
                warn!("volunteer dashboard load failed: {e}");
                self.session.navigator().push(ADD_INFO_PATH);
            }
        }
        self.loading = false;
    }

    pub fn edit_profile(&self) {
        self.session.navigator().push(ADD_INFO_PATH);
    }

    pub fn unmount(&self) {
        self.scope.unmount();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorAction {
    GoToDashboard,
}

/// Raw inputs of the volunteer profile form. List fields are
/// comma-separated.
pub struct VolunteerProfileEditor {
    session: Arc<SessionManager>,
    scope: ViewScope,
    pub name: String,
    pub age: String,
    pub country: String,
    pub skills: String,
    pub interests: String,
    pub languages: String,
    pub photo: Option<Upload>,
    pub submitting: bool,
    pub dialog: Dialog<EditorAction>,
}

impl VolunteerProfileEditor {
    pub fn new(session: Arc<SessionManager>) -> Self {
        Self {
            session,
            scope: ViewScope::new(),
            name: String::new(),
            age: String::new(),
            country: String::new(),
            skills: String::new(),
            interests: String::new(),
            languages: String::new(),
            photo: None,
            submitting: false,
            dialog: Dialog::new(),
        }
    }

    pub fn scope(&self) -> &ViewScope {
        &self.scope
    }

    pub fn to_form(&self) -> VolunteerProfileForm {
        let mut form = VolunteerProfileForm::from_input(
            &self.name,
            &self.age,
            &self.country,
            &self.skills,
            &self.interests,
            &self.languages,
        );
        form.photo = self.photo.clone();
        form
    }

    pub async fn submit(&mut self) {
        self.submitting = true;
        let volunteer = self.session.gateway().volunteer();
        let form = self.to_form();
        let Some(result) = self.scope.run(volunteer.save_profile(&form)).await else {
            return;
        };
        match result {
            Ok(()) => self.dialog.show_then(
                "Success",
                "Profile saved successfully!",
                DialogKind::Success,
                EditorAction::GoToDashboard,
            ),
            Err(e) => {
                let message = e.to_string();
                let message = if message.is_empty() {
                    "An unexpected error occurred".to_string()
                } else {
                    message
                };
                self.dialog.show("Error", message, DialogKind::Error);
            }
        }
        self.submitting = false;
    }

    pub fn confirm_dialog(&mut self) {
        if let Some(EditorAction::GoToDashboard) = self.dialog.take_confirmed() {
            self.session
                .navigator()
                .push(Role::Volunteer.dashboard_path());
        }
    }

    pub fn unmount(&self) {
        self.scope.unmount();
    }
}
