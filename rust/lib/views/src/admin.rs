//! Admin dashboard: platform stats, user and program tables.

use std::sync::Arc;

use tracing::warn;
use yatri_client::api::{ProgramQuery, UserQuery};
use yatri_client::{AdminProgram, AdminUser, DashboardStats, Role, SortOrder};
use yatri_session::{SessionManager, ViewScope, LOGIN_PATH};

use crate::dialog::{Dialog, DialogKind};

pub const CONNECTION_FAILED: &str = "Connection failed. Please check backend.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminAction {
    DeleteUser(i64),
}

pub struct AdminDashboard {
    session: Arc<SessionManager>,
    scope: ViewScope,
    pub filters: UserQuery,
    pub stats: DashboardStats,
    pub users: Vec<AdminUser>,
    pub hosts: Vec<AdminUser>,
    pub programs: Vec<AdminProgram>,
    pub loading: bool,
    pub error: Option<String>,
    pub dialog: Dialog<AdminAction>,
}

impl AdminDashboard {
    pub fn new(session: Arc<SessionManager>) -> Self {
        Self {
            session,
            scope: ViewScope::new(),
            filters: UserQuery::default(),
            stats: DashboardStats::default(),
            users: Vec::new(),
            hosts: Vec::new(),
            programs: Vec::new(),
            loading: true,
            error: None,
            dialog: Dialog::new(),
        }
    }

    pub fn scope(&self) -> &ViewScope {
        &self.scope
    }

    /// Enter the page. Anyone but a settled admin is sent to the login
    /// surface; returns whether the page loaded.
    pub async fn mount(&mut self) -> bool {
        if self.session.require_role(Role::Admin).is_err() {
            self.session.navigator().push(LOGIN_PATH);
            return false;
        }
        self.load().await;
        true
    }

    /// Fetch stats, users and programs together. Any failure keeps the
    /// previous data and sets [`CONNECTION_FAILED`].
    pub async fn load(&mut self) {
        self.loading = true;
        let admin = self.session.gateway().admin();
        let users_query = self.filters.clone();
        let programs_query = ProgramQuery {
            sort_by: self.filters.sort_by.clone(),
            order: self.filters.order,
        };

        let fetched = self
            .scope
            .run(async {
                tokio::try_join!(
                    admin.dashboard_stats(),
                    admin.users(&users_query),
                    admin.programs(&programs_query),
                )
            })
            .await;
        let Some(fetched) = fetched else { return };

        match fetched {
            Ok((stats, users, programs)) => {
                self.stats = stats;
                self.hosts = users.iter().filter(|u| u.is_host()).cloned().collect();
                self.users = users;
                self.programs = programs;
                self.error = None;
            }
            Err(e) => {
                warn!("admin dashboard load failed: {e}");
                self.error = Some(CONNECTION_FAILED.to_string());
            }
        }
        self.loading = false;
    }

    /// Change the listing filters and re-fetch.
    pub async fn set_filters(&mut self, role: &str, sort_by: &str, order: SortOrder) {
        self.filters = UserQuery {
            role: role.to_string(),
            sort_by: sort_by.to_string(),
            order,
        };
        self.load().await;
    }

    /// Flip a program's active flag. On success the local row is flipped
    /// without re-fetching.
    pub async fn toggle_program(&mut self, id: i64) {
        let admin = self.session.gateway().admin();
        let Some(result) = self.scope.run(admin.toggle_program(id)).await else {
            return;
        };
        match result {
            Ok(()) => {
                if let Some(p) = self.programs.iter_mut().find(|p| p.id == id) {
                    p.is_active = !p.is_active;
                }
                self.dialog.show(
                    "Success",
                    "Program status updated successfully",
                    DialogKind::Success,
                );
            }
            Err(e) => {
                warn!("toggle program {id} failed: {e}");
                self.dialog.show("Error", "Toggle failed", DialogKind::Error);
            }
        }
    }

    pub fn request_delete_user(&mut self, id: i64) {
        self.dialog.confirm(
            "Delete User?",
            "Are you sure? This will delete all associated profiles.",
            AdminAction::DeleteUser(id),
        );
    }

    /// Run whatever the open dialog was confirming.
    pub async fn confirm_dialog(&mut self) {
        match self.dialog.take_confirmed() {
            Some(AdminAction::DeleteUser(id)) => self.delete_user(id).await,
            None => {}
        }
    }

    pub async fn delete_user(&mut self, id: i64) {
        let admin = self.session.gateway().admin();
        let Some(result) = self.scope.run(admin.delete_user(id)).await else {
            return;
        };
        match result {
            Ok(()) => {
                self.users.retain(|u| u.id != id);
                self.hosts.retain(|u| u.id != id);
                self.dialog
                    .show("Success", "User deleted successfully", DialogKind::Success);
            }
            Err(e) => {
                warn!("delete user {id} failed: {e}");
                self.dialog.show("Error", "Delete failed", DialogKind::Error);
            }
        }
    }

    pub fn unmount(&self) {
        self.scope.unmount();
    }
}
