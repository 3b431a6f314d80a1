//! Public program detail page and the apply flow.

use std::sync::Arc;

use tracing::warn;
use yatri_client::{Program, Role};
use yatri_session::{SessionManager, ViewScope, LOGIN_PATH};

use crate::dialog::{Dialog, DialogKind};

/// Shown when a program has no usable images.
pub const FALLBACK_IMAGE: &str = "/featuredImgs/weekendtrips.webp";

pub const HOST_CANNOT_APPLY: &str =
    "Host accounts cannot apply for programs. Please use a volunteer account.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgramAction {
    GoToDashboard,
}

pub struct ProgramDetail {
    session: Arc<SessionManager>,
    scope: ViewScope,
    pub program_id: Option<i64>,
    pub program: Option<Program>,
    pub loading: bool,
    pub error: Option<String>,
    pub has_applied: bool,
    pub applying: bool,
    pub dialog: Dialog<ProgramAction>,
}

impl ProgramDetail {
    pub fn new(session: Arc<SessionManager>) -> Self {
        Self {
            session,
            scope: ViewScope::new(),
            program_id: None,
            program: None,
            loading: true,
            error: None,
            has_applied: false,
            applying: false,
            dialog: Dialog::new(),
        }
    }

    pub fn scope(&self) -> &ViewScope {
        &self.scope
    }

    /// Load the program named by the route segment `raw_id`. A volunteer
    /// also gets whether they already applied.
    pub async fn load(&mut self, raw_id: &str) {
        self.loading = true;
        self.program_id = None;
        self.program = None;
        self.has_applied = false;
        self.error = None;
        let Ok(id) = raw_id.trim().parse::<i64>() else {
            self.error = Some("Invalid program ID".to_string());
            self.loading = false;
            return;
        };
        self.program_id = Some(id);

        let programs = self.session.gateway().programs();
        let Some(result) = self.scope.run(programs.get(id)).await else {
            return;
        };
        match result {
            Ok(program) => {
                self.program = Some(program);
                self.error = None;
            }
            Err(e) => {
                warn!("failed to fetch program {id}: {e}");
                self.error = Some(e.to_string());
                self.loading = false;
                return;
            }
        }

        if self.session.snapshot().has_role(Role::Volunteer) {
            let volunteer = self.session.gateway().volunteer();
            match self.scope.run(volunteer.my_applications()).await {
                Some(Ok(applications)) => {
                    self.has_applied = applications
                        .iter()
                        .any(|a| a.target_program_id() == Some(id));
                }
                Some(Err(e)) => warn!("failed to fetch application status: {e}"),
                None => return,
            }
        }
        self.loading = false;
    }

    /// Apply as the current volunteer. Guests go to login with a return
    /// path; hosts get an error dialog.
    pub async fn apply(&mut self) {
        let session = self.session.snapshot();
        let Some(id) = self.program_id else { return };

        if !session.is_logged_in {
            let target = format!("{LOGIN_PATH}?redirect=/experiences/{id}");
            self.session.navigator().push(&target);
            return;
        }
        if session.role == Some(Role::Host) {
            self.dialog
                .show("Account Type Error", HOST_CANNOT_APPLY, DialogKind::Error);
            return;
        }
        let Some(program_id) = self.program.as_ref().map(|p| p.program_id) else {
            return;
        };

        self.applying = true;
        let volunteer = self.session.gateway().volunteer();
        let Some(result) = self.scope.run(volunteer.apply(program_id)).await else {
            return;
        };
        match result {
            Ok(()) => self.dialog.show_then(
                "Success",
                "Application sent successfully!",
                DialogKind::Success,
                ProgramAction::GoToDashboard,
            ),
            Err(e) => {
                let message = e.to_string();
                let message = if message.is_empty() {
                    "Failed to book program".to_string()
                } else {
                    message
                };
                self.dialog.show("Error", message, DialogKind::Error);
            }
        }
        self.applying = false;
    }

    pub fn confirm_dialog(&mut self) {
        if let Some(ProgramAction::GoToDashboard) = self.dialog.take_confirmed() {
            self.session
                .navigator()
                .push(Role::Volunteer.dashboard_path());
        }
    }

    /// Program images, or the fallback when there are none.
    pub fn images(&self) -> Vec<String> {
        let images: Vec<String> = self
            .program
            .iter()
            .flat_map(|p| p.program_images.iter())
            .filter(|s| !s.trim().is_empty())
            .cloned()
            .collect();
        if images.is_empty() {
            vec![FALLBACK_IMAGE.to_string()]
        } else {
            images
        }
    }

    /// Text of the booking button.
    pub fn cta_label(&self) -> &'static str {
        let session = self.session.snapshot();
        if !session.is_logged_in {
            "Login to Book"
        } else if session.role == Some(Role::Host) {
            "Hosts Cannot Apply"
        } else if self.has_applied {
            "Already Applied"
        } else if self.applying {
            "Sending Request..."
        } else {
            "Request to Book"
        }
    }

    pub fn can_apply(&self) -> bool {
        self.session.snapshot().role != Some(Role::Host) && !self.applying && !self.has_applied
    }

    pub fn unmount(&self) {
        self.scope.unmount();
    }
}
