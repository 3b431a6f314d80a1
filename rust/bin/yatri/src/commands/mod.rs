//! Command implementations plus the plumbing they share: resolving the
//! current context into a session, and turning API failures and dialogs
//! into CLI output.

pub mod admin;
pub mod context;
pub mod host;
pub mod login;
pub mod program;
pub mod volunteer;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use yatri_client::{base_url_from_env, ApiError, Gateway, Upload};
use yatri_session::{ClientConfig, FileCredentials, RecordingNavigator, SessionManager};
use yatri_views::{Dialog, DialogKind, CONNECTION_FAILED};

/// Session bound to the current context, plus the navigator it reports to.
pub struct Connection {
    pub session: Arc<SessionManager>,
    pub nav: Arc<RecordingNavigator>,
    pub context: String,
}

/// Resolve the backend URL: the context's server, else `YATRI_API_URL`,
/// else the built-in default.
pub fn server_url(server: &str) -> String {
    if server.is_empty() {
        base_url_from_env()
    } else {
        server.trim_end_matches('/').to_string()
    }
}

/// Build a session over the current context without touching the network.
pub fn connect(config_path: &Path) -> Result<Connection> {
    let config = ClientConfig::load(config_path)?;
    let ctx = config
        .current()
        .ok_or_else(|| {
            anyhow::anyhow!("No current context. Run `yatri context create <name>` first.")
        })?
        .clone();

    let store = Arc::new(FileCredentials::new(config_path, &ctx.name));
    let gateway = Gateway::new(server_url(&ctx.server), store);
    let nav = Arc::new(RecordingNavigator::new());
    let session = Arc::new(SessionManager::new(gateway, nav.clone()));
    Ok(Connection {
        session,
        nav,
        context: ctx.name,
    })
}

/// [`connect`] and settle the session from the stored token.
pub async fn connect_verified(config_path: &Path) -> Result<Connection> {
    let conn = connect(config_path)?;
    conn.session.initialize().await;
    Ok(conn)
}

/// CLI wording for a failed API call.
pub fn api_error(e: ApiError) -> anyhow::Error {
    if e.is_network() {
        anyhow::anyhow!(CONNECTION_FAILED)
    } else {
        anyhow::anyhow!("{}", e)
    }
}

/// Print a finished dialog; error and warning dialogs become failures.
pub fn finish<A>(dialog: &Dialog<A>) -> Result<()> {
    match dialog.kind {
        DialogKind::Error | DialogKind::Warning => anyhow::bail!("{}", dialog.message),
        _ => {
            println!("{}", dialog.message);
            Ok(())
        }
    }
}

/// Read image files for upload.
pub fn read_uploads(paths: &[String]) -> Result<Vec<Upload>> {
    paths
        .iter()
        .map(|p| {
            let bytes = std::fs::read(p)
                .map_err(|e| anyhow::anyhow!("cannot read {}: {}", p, e))?;
            let name = Path::new(p)
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| p.clone());
            Ok(Upload::guess(name, bytes))
        })
        .collect()
}

/// Ask on stderr; anything but `y` cancels.
pub fn confirm(prompt: &str) -> Result<bool> {
    eprint!("{} [y/N]: ", prompt);
    let mut s = String::new();
    std::io::stdin().read_line(&mut s)?;
    Ok(s.trim().eq_ignore_ascii_case("y"))
}
