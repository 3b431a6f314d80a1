//! Session handling for the Nomad Yatri client.
//!
//! - [`SessionManager`]: initialize, verify, login, logout; observable
//!   through a `watch` channel.
//! - [`FileCredentials`]: credential store over one context of
//!   `~/.yatri/config.toml`.
//! - [`Navigator`]: soft and hard route changes.
//! - [`ViewScope`]: drops async results that land after a view unmounts.

pub mod config;
pub mod error;
pub mod nav;
pub mod scope;
pub mod session;
pub mod store;

pub use config::{ClientConfig, Context};
pub use error::SessionError;
pub use nav::{Navigation, Navigator, RecordingNavigator};
pub use scope::ViewScope;
pub use session::{Session, SessionManager, LOGIN_PATH};
pub use store::FileCredentials;
