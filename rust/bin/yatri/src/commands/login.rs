//! Login / logout / whoami.

use std::path::Path;

use anyhow::Result;
use serde::Serialize;
use yatri_client::Credentials;

use super::{api_error, connect, connect_verified};

pub async fn login(email: &str, password: &str, client_config_path: &Path) -> Result<()> {
    let conn = connect(client_config_path)?;
    let credentials = Credentials {
        email: email.to_string(),
        password: password.to_string(),
    };
    let role = conn
        .session
        .sign_in(&credentials)
        .await
        .map_err(api_error)?;

    println!("Logged in as {} ({}).", email, role);
    println!("Token saved to context \"{}\".", conn.context);
    Ok(())
}

/// Notify the backend, then clear the context's token whatever it says.
pub async fn logout(client_config_path: &Path) -> Result<()> {
    let conn = connect(client_config_path)?;
    conn.session.logout().await;
    println!("Logged out from context \"{}\".", conn.context);
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WhoAmI<'a> {
    context: &'a str,
    is_logged_in: bool,
    role: Option<&'static str>,
}

/// Verify the stored token and print the settled session.
pub async fn whoami(json: bool, client_config_path: &Path) -> Result<()> {
    let conn = connect_verified(client_config_path).await?;
    let session = conn.session.snapshot();

    if json {
        let out = WhoAmI {
            context: &conn.context,
            is_logged_in: session.is_logged_in,
            role: session.role.map(|r| r.as_str()),
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    match session.role.filter(|_| session.is_logged_in) {
        Some(role) => println!(
            "Logged in as {} on context \"{}\" (dashboard: {}).",
            role,
            conn.context,
            role.dashboard_path()
        ),
        None => println!("Not logged in on context \"{}\".", conn.context),
    }
    Ok(())
}
