//! `/admin` endpoints.

use reqwest::Method;

use super::models::{AdminProgram, AdminUser, DashboardStats, SortOrder};
use crate::error::ApiError;
use crate::gateway::{Envelope, Gateway, RequestOptions};

/// Filters for the admin user listing.
#[derive(Debug, Clone, PartialEq)]
pub struct UserQuery {
    /// Role tag or `all`.
    pub role: String,
    pub sort_by: String,
    pub order: SortOrder,
}

impl Default for UserQuery {
    fn default() -> Self {
        Self {
            role: "all".to_string(),
            sort_by: "createdAt".to_string(),
            order: SortOrder::Desc,
        }
    }
}

/// Sorting for the admin program listing.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgramQuery {
    pub sort_by: String,
    pub order: SortOrder,
}

impl Default for ProgramQuery {
    fn default() -> Self {
        Self {
            sort_by: "createdAt".to_string(),
            order: SortOrder::Desc,
        }
    }
}

#[derive(Clone)]
pub struct AdminApi {
    gateway: Gateway,
}

impl AdminApi {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    /// `GET /admin/dashboard-stats`.
    pub async fn dashboard_stats(&self) -> Result<DashboardStats, ApiError> {
        let env: Envelope<DashboardStats> = self.gateway.get("/admin/dashboard-stats").await?;
        env.into_data()
    }

    /// `GET /admin/users?role=&sortBy=&order=`.
    pub async fn users(&self, query: &UserQuery) -> Result<Vec<AdminUser>, ApiError> {
        let env: Envelope<Vec<AdminUser>> = self
            .gateway
            .get_query(
                "/admin/users",
                &[
                    ("role", query.role.as_str()),
                    ("sortBy", query.sort_by.as_str()),
                    ("order", query.order.as_str()),
                ],
            )
            .await?;
        env.into_data()
    }

    /// `GET /admin/programs?sortBy=&order=`.
    pub async fn programs(&self, query: &ProgramQuery) -> Result<Vec<AdminProgram>, ApiError> {
        let env: Envelope<Vec<AdminProgram>> = self
            .gateway
            .get_query(
                "/admin/programs",
                &[
                    ("sortBy", query.sort_by.as_str()),
                    ("order", query.order.as_str()),
                ],
            )
            .await?;
        env.into_data()
    }

    /// `PATCH /admin/programs/{id}/toggle`.
    pub async fn toggle_program(&self, id: i64) -> Result<(), ApiError> {
        let path = format!("/admin/programs/{}/toggle", id);
        self.gateway
            .execute(&path, RequestOptions::new(Method::PATCH))
            .await
    }

    /// `DELETE /admin/users/{id}`.
    pub async fn delete_user(&self, id: i64) -> Result<(), ApiError> {
        let path = format!("/admin/users/{}", id);
        self.gateway
            .execute(&path, RequestOptions::new(Method::DELETE))
            .await
    }
}
