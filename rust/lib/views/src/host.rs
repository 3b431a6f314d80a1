//! Host dashboard: listings, posting and editing programs, incoming
//! applications, property profile.

use std::sync::Arc;

use tracing::warn;
use yatri_client::api::{HostProfileForm, ProgramForm};
use yatri_client::{Application, ApplicationStatus, HostProfile, Program, Role};
use yatri_session::{SessionManager, ViewScope, LOGIN_PATH};

use crate::dialog::{Dialog, DialogKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HostTab {
    #[default]
    ManageListings,
    PostOpportunity,
    Applications,
    Profile,
}

impl HostTab {
    /// Menu label; the posting tab reads "Edit Opportunity" while editing.
    pub fn label(&self, editing: bool) -> &'static str {
        match self {
            HostTab::PostOpportunity if editing => "Edit Opportunity",
            HostTab::PostOpportunity => "Post New Opportunity",
            HostTab::ManageListings => "Manage Listings",
            HostTab::Applications => "Applications",
            HostTab::Profile => "Profile & Settings",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostAction {
    DeleteProgram(i64),
    SetStatus(i64, ApplicationStatus),
}

pub struct HostDashboard {
    session: Arc<SessionManager>,
    scope: ViewScope,
    pub tab: HostTab,
    pub host_name: String,
    pub profile: Option<HostProfile>,
    pub profile_form: HostProfileForm,
    pub programs: Vec<Program>,
    pub applications: Vec<Application>,
    pub program_form: ProgramForm,
    editing: Option<i64>,
    pub dialog: Dialog<HostAction>,
}

impl HostDashboard {
    pub fn new(session: Arc<SessionManager>) -> Self {
        Self {
            session,
            scope: ViewScope::new(),
            tab: HostTab::default(),
            host_name: "Host".to_string(),
            profile: None,
            profile_form: HostProfileForm::default(),
            programs: Vec::new(),
            applications: Vec::new(),
            program_form: ProgramForm::default(),
            editing: None,
            dialog: Dialog::new(),
        }
    }

    pub fn scope(&self) -> &ViewScope {
        &self.scope
    }

    /// Enter the page: profile first, then the default listings tab.
    pub async fn mount(&mut self) -> bool {
        if self.session.require_role(Role::Host).is_err() {
            self.session.navigator().push(LOGIN_PATH);
            return false;
        }
        self.load_profile().await;
        self.switch_tab(self.tab).await;
        true
    }

    /// Change tab; listings and applications re-fetch on entry.
    pub async fn switch_tab(&mut self, tab: HostTab) {
        self.tab = tab;
        match tab {
            HostTab::ManageListings => self.load_programs().await,
            HostTab::Applications => self.load_applications().await,
            HostTab::PostOpportunity | HostTab::Profile => {}
        }
    }

    pub async fn load_profile(&mut self) {
        let host = self.session.gateway().host();
        let Some(result) = self.scope.run(host.my_profile()).await else {
            return;
        };
        match result {
            Ok(profile) => {
                if let Some(name) = profile.name.as_deref().filter(|n| !n.is_empty()) {
                    self.host_name = name.to_string();
                }
                self.profile_form = HostProfileForm::from_profile(&profile);
                self.profile = Some(profile);
            }
            Err(e) => warn!("failed to fetch host profile: {e}"),
        }
    }

    pub async fn load_programs(&mut self) {
        let host = self.session.gateway().host();
        match self.scope.run(host.programs()).await {
            Some(Ok(programs)) => self.programs = programs,
            Some(Err(e)) => warn!("failed to fetch host programs: {e}"),
            None => {}
        }
    }

    pub async fn load_applications(&mut self) {
        let host = self.session.gateway().host();
        match self.scope.run(host.applications()).await {
            Some(Ok(applications)) => self.applications = applications,
            Some(Err(e)) => warn!("failed to fetch host applications: {e}"),
            None => {}
        }
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    pub fn editing_id(&self) -> Option<i64> {
        self.editing
    }

    /// Prefill the form from `program` and open the posting tab in edit mode.
    pub fn start_edit(&mut self, program: &Program) {
        self.program_form = ProgramForm::from_program(program);
        self.editing = Some(program.program_id);
        self.tab = HostTab::PostOpportunity;
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
        self.program_form = ProgramForm::default();
    }

    /// Create or update depending on edit mode. New programs need an image;
    /// without one a warning is shown and nothing is sent.
    pub async fn submit_program(&mut self) {
        if self.editing.is_none() && self.program_form.images.is_empty() {
            self.dialog.show(
                "Missing Information",
                "Please upload at least one image",
                DialogKind::Warning,
            );
            return;
        }

        let programs = self.session.gateway().programs();
        let form = self.program_form.clone();
        let (result, done) = match self.editing {
            Some(id) => (
                self.scope.run(programs.update(id, &form)).await,
                "Program updated successfully!",
            ),
            None => (
                self.scope.run(programs.create(&form)).await,
                "Program created successfully!",
            ),
        };
        let Some(result) = result else { return };

        if let Err(e) = result {
            self.dialog.show("Error", e.to_string(), DialogKind::Error);
            return;
        }
        self.dialog.show("Success", done, DialogKind::Success);
        self.editing = None;
        self.program_form = ProgramForm::default();
        self.switch_tab(HostTab::ManageListings).await;
    }

    pub fn request_delete_program(&mut self, id: i64) {
        self.dialog.confirm(
            "Delete Program?",
            "Are you sure you want to delete this program? This action cannot be undone.",
            HostAction::DeleteProgram(id),
        );
    }

    pub async fn delete_program(&mut self, id: i64) {
        let programs = self.session.gateway().programs();
        let Some(result) = self.scope.run(programs.delete(id)).await else {
            return;
        };
        match result {
            Ok(()) => {
                self.programs.retain(|p| p.program_id != id);
                self.dialog.show(
                    "Deleted",
                    "Program has been deleted successfully",
                    DialogKind::Success,
                );
            }
            Err(e) => {
                warn!("delete program {id} failed: {e}");
                self.dialog
                    .show("Error", "Failed to delete program", DialogKind::Error);
            }
        }
    }

    pub async fn update_profile(&mut self) {
        let host = self.session.gateway().host();
        let form = self.profile_form.clone();
        let Some(result) = self.scope.run(host.update_profile(&form)).await else {
            return;
        };
        match result {
            Ok(()) => {
                self.dialog
                    .show("Success", "Profile updated successfully!", DialogKind::Success);
                self.profile_form.images.clear();
                self.load_profile().await;
            }
            Err(e) => self.dialog.show(
                "Error",
                format!("Failed to update profile: {e}"),
                DialogKind::Error,
            ),
        }
    }

    /// Ask before accepting or rejecting an application.
    pub fn request_status_change(&mut self, id: i64, status: ApplicationStatus) {
        let action = match status {
            ApplicationStatus::Accepted => "Accept",
            _ => "Reject",
        };
        self.dialog.confirm(
            format!("{action} Application?"),
            format!(
                "Are you sure you want to {} this application?",
                action.to_lowercase()
            ),
            HostAction::SetStatus(id, status),
        );
    }

    pub async fn set_application_status(&mut self, id: i64, status: ApplicationStatus) {
        let host = self.session.gateway().host();
        let Some(result) = self
            .scope
            .run(host.update_application_status(id, status))
            .await
        else {
            return;
        };
        match result {
            Ok(()) => {
                self.load_applications().await;
                self.dialog.show(
                    "Success",
                    format!("Application {status} successfully"),
                    DialogKind::Success,
                );
            }
            Err(e) => warn!("update application {id} to {status} failed: {e}"),
        }
    }

    pub async fn confirm_dialog(&mut self) {
        match self.dialog.take_confirmed() {
            Some(HostAction::DeleteProgram(id)) => self.delete_program(id).await,
            Some(HostAction::SetStatus(id, status)) => {
                self.set_application_status(id, status).await
            }
            None => {}
        }
    }

    pub async fn logout(&self) {
        self.session.logout().await;
    }

    pub fn unmount(&self) {
        self.scope.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tab_labels() {
        assert_eq!(HostTab::PostOpportunity.label(false), "Post New Opportunity");
        assert_eq!(HostTab::PostOpportunity.label(true), "Edit Opportunity");
        assert_eq!(HostTab::Profile.label(true), "Profile & Settings");
        assert_eq!(HostTab::default(), HostTab::ManageListings);
    }
}
