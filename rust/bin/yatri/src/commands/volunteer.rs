//! `yatri volunteer ...`

use std::path::Path;

use anyhow::Result;
use yatri_client::Role;
use yatri_session::LOGIN_PATH;
use yatri_views::{or_na, ProgramDetail, VolunteerDashboard, VolunteerProfileEditor, ADD_INFO_PATH};

use super::{connect_verified, finish, read_uploads, Connection};

async fn open(client_config_path: &Path) -> Result<(Connection, VolunteerDashboard)> {
    let conn = connect_verified(client_config_path).await?;
    if !conn.session.snapshot().has_role(Role::Volunteer) {
        anyhow::bail!("Not logged in as volunteer. Run `yatri login` first.");
    }
    let mut view = VolunteerDashboard::new(conn.session.clone());
    view.load().await;
    if conn.nav.last().is_some_and(|n| n.path() == ADD_INFO_PATH) {
        anyhow::bail!("No volunteer profile yet. Run `yatri volunteer set-profile` first.");
    }
    Ok((conn, view))
}

pub async fn profile(json: bool, client_config_path: &Path) -> Result<()> {
    let (_, view) = open(client_config_path).await?;
    let Some(p) = &view.profile else {
        anyhow::bail!("No volunteer profile found.");
    };
    if json {
        println!("{}", serde_json::to_string_pretty(p)?);
        return Ok(());
    }
    let age = p.age.map(|a| a.to_string());
    println!("Name:      {}", or_na(p.name.as_deref()));
    println!("Age:       {}", or_na(age.as_deref()));
    println!("Country:   {}", or_na(p.country.as_deref()));
    println!("Skills:    {}", p.skills.join(", "));
    println!("Interests: {}", p.interests.join(", "));
    println!("Languages: {}", p.languages.join(", "));
    println!("Photo:     {}", or_na(p.photo.as_deref()));
    Ok(())
}

pub async fn applications(json: bool, client_config_path: &Path) -> Result<()> {
    let (_, view) = open(client_config_path).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&view.applications)?);
        return Ok(());
    }
    if view.applications.is_empty() {
        println!("No applications yet.");
        return Ok(());
    }
    println!("{:6} {:10} {:30} {:20}", "ID", "STATUS", "PROGRAM", "LOCATION");
    for a in &view.applications {
        let program = a.program.as_ref();
        println!(
            "{:6} {:10} {:30} {:20}",
            a.application_id,
            a.status,
            or_na(program.map(|p| p.title.as_str())),
            or_na(program.and_then(|p| p.location.as_deref()))
        );
    }
    Ok(())
}

/// Profile fields from the command line. Lists are comma separated.
#[derive(Debug, Default)]
pub struct ProfileArgs {
    pub name: String,
    pub age: String,
    pub country: String,
    pub skills: String,
    pub interests: String,
    pub languages: String,
    pub photo: Option<String>,
}

pub async fn set_profile(args: ProfileArgs, client_config_path: &Path) -> Result<()> {
    let conn = connect_verified(client_config_path).await?;
    if !conn.session.snapshot().has_role(Role::Volunteer) {
        anyhow::bail!("Not logged in as volunteer. Run `yatri login` first.");
    }

    let mut editor = VolunteerProfileEditor::new(conn.session.clone());
    editor.name = args.name;
    editor.age = args.age;
    editor.country = args.country;
    editor.skills = args.skills;
    editor.interests = args.interests;
    editor.languages = args.languages;
    if let Some(photo) = args.photo {
        editor.photo = read_uploads(&[photo])?.into_iter().next();
    }

    editor.submit().await;
    finish(&editor.dialog)
}

pub async fn apply(program_id: &str, client_config_path: &Path) -> Result<()> {
    let conn = connect_verified(client_config_path).await?;
    let mut view = ProgramDetail::new(conn.session.clone());
    view.load(program_id).await;
    if let Some(err) = &view.error {
        anyhow::bail!("{}", err);
    }
    if view.has_applied {
        println!("Already applied to this program.");
        return Ok(());
    }

    view.apply().await;
    if conn.nav.last().is_some_and(|n| n.path().starts_with(LOGIN_PATH)) {
        anyhow::bail!("Not logged in. Run `yatri login` first.");
    }
    finish(&view.dialog)
}
