//! `yatri host ...`: listings, applications and property profile.

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use yatri_client::ApplicationStatus;
use yatri_session::SessionManager;
use yatri_views::{or_na, HostDashboard, HostTab};

use super::{api_error, confirm, connect_verified, finish, read_uploads};

/// Program fields from the command line; `None` keeps the current value.
#[derive(Debug, Default)]
pub struct ProgramArgs {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub sub_category: Option<String>,
    pub location: Option<String>,
    pub duration: Option<String>,
    pub max_volunteers: Option<u32>,
    pub images: Vec<String>,
}

/// Profile fields from the command line; `None` keeps the current value.
#[derive(Debug, Default)]
pub struct ProfileArgs {
    pub name: Option<String>,
    pub property_name: Option<String>,
    pub location: Option<String>,
    pub acomodation_type: Option<String>,
    pub meals: Option<String>,
    pub work_required: Option<String>,
    pub capacity: Option<String>,
    pub contact: Option<String>,
    pub images: Vec<String>,
}

fn set(field: &mut String, value: Option<String>) {
    if let Some(v) = value {
        *field = v;
    }
}

async fn open_with_session(client_config_path: &Path) -> Result<(Arc<SessionManager>, HostDashboard)> {
    let conn = connect_verified(client_config_path).await?;
    let mut view = HostDashboard::new(conn.session.clone());
    if !view.mount().await {
        anyhow::bail!("Not logged in as host. Run `yatri login` first.");
    }
    Ok((conn.session, view))
}

async fn open(client_config_path: &Path) -> Result<HostDashboard> {
    Ok(open_with_session(client_config_path).await?.1)
}

pub async fn profile(json: bool, client_config_path: &Path) -> Result<()> {
    let view = open(client_config_path).await?;
    let Some(p) = &view.profile else {
        anyhow::bail!("No host profile found.");
    };
    if json {
        println!("{}", serde_json::to_string_pretty(p)?);
        return Ok(());
    }
    println!("Name:          {}", or_na(p.name.as_deref()));
    println!("Property:      {}", or_na(p.property_name.as_deref()));
    println!("Location:      {}", or_na(p.location.as_deref()));
    println!("Accommodation: {}", or_na(p.acomodation_type.as_deref()));
    println!("Meals:         {}", or_na(p.meals.as_deref()));
    println!("Work required: {}", or_na(p.work_required.as_deref()));
    println!("Capacity:      {}", or_na(p.capacity.as_deref()));
    println!("Contact:       {}", or_na(p.contact.as_deref()));
    for img in &p.property_images {
        println!("Image:         {}", img);
    }
    Ok(())
}

pub async fn update_profile(args: ProfileArgs, client_config_path: &Path) -> Result<()> {
    let mut view = open(client_config_path).await?;
    view.switch_tab(HostTab::Profile).await;
    let form = &mut view.profile_form;
    set(&mut form.name, args.name);
    set(&mut form.property_name, args.property_name);
    set(&mut form.location, args.location);
    set(&mut form.acomodation_type, args.acomodation_type);
    set(&mut form.meals, args.meals);
    set(&mut form.work_required, args.work_required);
    set(&mut form.capacity, args.capacity);
    set(&mut form.contact, args.contact);
    form.images = read_uploads(&args.images)?;

    view.update_profile().await;
    finish(&view.dialog)
}

pub async fn programs(json: bool, client_config_path: &Path) -> Result<()> {
    let view = open(client_config_path).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&view.programs)?);
        return Ok(());
    }
    println!("{:6} {:30} {:16} {:20} {:6}", "ID", "TITLE", "CATEGORY", "LOCATION", "MAX");
    for p in &view.programs {
        println!(
            "{:6} {:30} {:16} {:20} {:6}",
            p.program_id,
            p.title,
            or_na(p.category.as_deref()),
            or_na(p.location.as_deref()),
            p.max_volunteers.map(|m| m.to_string()).unwrap_or_else(|| "-".into())
        );
    }
    Ok(())
}

pub async fn applications(json: bool, client_config_path: &Path) -> Result<()> {
    let mut view = open(client_config_path).await?;
    view.switch_tab(HostTab::Applications).await;
    if json {
        println!("{}", serde_json::to_string_pretty(&view.applications)?);
        return Ok(());
    }
    println!("{:6} {:10} {:30} {:24}", "ID", "STATUS", "PROGRAM", "VOLUNTEER");
    for a in &view.applications {
        let program = a.program.as_ref().map(|p| p.title.as_str());
        let volunteer = a.user.as_ref().and_then(|u| {
            u.volunteer
                .as_ref()
                .and_then(|v| v.name.as_deref())
                .or(u.email.as_deref())
        });
        println!(
            "{:6} {:10} {:30} {:24}",
            a.application_id,
            a.status,
            or_na(program),
            or_na(volunteer)
        );
    }
    Ok(())
}

pub async fn set_status(id: i64, status: ApplicationStatus, client_config_path: &Path) -> Result<()> {
    let mut view = open(client_config_path).await?;
    view.request_status_change(id, status);
    view.confirm_dialog().await;
    if view.dialog.open {
        finish(&view.dialog)
    } else {
        anyhow::bail!("Failed to update application {}.", id)
    }
}

pub async fn create_program(args: ProgramArgs, client_config_path: &Path) -> Result<()> {
    let mut view = open(client_config_path).await?;
    view.switch_tab(HostTab::PostOpportunity).await;
    let form = &mut view.program_form;
    set(&mut form.title, args.title);
    set(&mut form.description, args.description);
    set(&mut form.category, args.category);
    set(&mut form.sub_category, args.sub_category);
    set(&mut form.location, args.location);
    set(&mut form.duration, args.duration);
    form.max_volunteers = args.max_volunteers.unwrap_or(0);
    form.images = read_uploads(&args.images)?;

    view.submit_program().await;
    finish(&view.dialog)
}

pub async fn update_program(id: i64, args: ProgramArgs, client_config_path: &Path) -> Result<()> {
    let (session, mut view) = open_with_session(client_config_path).await?;
    let program = match view.programs.iter().find(|p| p.program_id == id) {
        Some(p) => p.clone(),
        None => session.gateway().programs().get(id).await.map_err(api_error)?,
    };
    view.start_edit(&program);
    let form = &mut view.program_form;
    set(&mut form.title, args.title);
    set(&mut form.description, args.description);
    set(&mut form.category, args.category);
    set(&mut form.sub_category, args.sub_category);
    set(&mut form.location, args.location);
    set(&mut form.duration, args.duration);
    if let Some(m) = args.max_volunteers {
        form.max_volunteers = m;
    }
    form.images = read_uploads(&args.images)?;

    view.submit_program().await;
    finish(&view.dialog)
}

pub async fn delete_program(id: i64, yes: bool, client_config_path: &Path) -> Result<()> {
    let mut view = open(client_config_path).await?;
    view.request_delete_program(id);
    if !yes && !confirm(&view.dialog.message)? {
        view.dialog.close();
        println!("Cancelled.");
        return Ok(());
    }
    view.confirm_dialog().await;
    finish(&view.dialog)
}
