//! Page view models for the Nomad Yatri client.
//!
//! Each view owns its local state and a [`ViewScope`](yatri_session::ViewScope);
//! network results that land after `unmount()` are dropped. Navigation goes
//! through the session's [`Navigator`](yatri_session::Navigator).

pub mod admin;
pub mod dialog;
pub mod format;
pub mod host;
pub mod program;
pub mod volunteer;

pub use admin::{AdminAction, AdminDashboard, CONNECTION_FAILED};
pub use dialog::{Dialog, DialogKind};
pub use format::{format_date, or_na};
pub use host::{HostAction, HostDashboard, HostTab};
pub use program::{ProgramAction, ProgramDetail, FALLBACK_IMAGE, HOST_CANNOT_APPLY};
pub use volunteer::{EditorAction, VolunteerDashboard, VolunteerProfileEditor, ADD_INFO_PATH};
