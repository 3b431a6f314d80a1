//! `yatri admin ...`: platform overview and moderation.

use std::path::Path;

use anyhow::Result;
use yatri_client::SortOrder;
use yatri_views::{format_date, or_na, AdminDashboard};

use super::{confirm, connect_verified, finish};

/// Listing filters from the command line.
pub struct Filters<'a> {
    pub role: &'a str,
    pub sort_by: &'a str,
    pub order: SortOrder,
}

async fn open(client_config_path: &Path, filters: Option<Filters<'_>>) -> Result<AdminDashboard> {
    let conn = connect_verified(client_config_path).await?;
    let mut view = AdminDashboard::new(conn.session.clone());
    if let Some(f) = filters {
        view.filters.role = f.role.to_string();
        view.filters.sort_by = f.sort_by.to_string();
        view.filters.order = f.order;
    }
    if !view.mount().await {
        anyhow::bail!("Not logged in as admin. Run `yatri login` first.");
    }
    if let Some(err) = &view.error {
        anyhow::bail!("{}", err);
    }
    Ok(view)
}

pub async fn stats(json: bool, client_config_path: &Path) -> Result<()> {
    let view = open(client_config_path, None).await?;
    let s = &view.stats;
    if json {
        println!("{}", serde_json::to_string_pretty(s)?);
    } else {
        println!("Total users:    {}", s.total_users);
        println!("Total hosts:    {}", s.total_hosts);
        println!("Total programs: {}", s.total_programs);
    }
    Ok(())
}

pub async fn users(json: bool, filters: Filters<'_>, client_config_path: &Path) -> Result<()> {
    let view = open(client_config_path, Some(filters)).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&view.users)?);
        return Ok(());
    }
    println!("{:6} {:30} {:10} {:16} {:14}", "ID", "EMAIL", "ROLE", "CONTACT", "JOINED");
    for u in &view.users {
        println!(
            "{:6} {:30} {:10} {:16} {:14}",
            u.id,
            u.email,
            u.role,
            or_na(u.contact()),
            format_date(u.created_at.as_deref())
        );
    }
    Ok(())
}

pub async fn programs(json: bool, client_config_path: &Path) -> Result<()> {
    let view = open(client_config_path, None).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&view.programs)?);
        return Ok(());
    }
    println!("{:6} {:30} {:16} {:20} {:8}", "ID", "TITLE", "CATEGORY", "LOCATION", "ACTIVE");
    for p in &view.programs {
        println!(
            "{:6} {:30} {:16} {:20} {:8}",
            p.id,
            p.title,
            or_na(p.category.as_deref()),
            or_na(p.location.as_deref()),
            if p.is_active { "yes" } else { "no" }
        );
    }
    Ok(())
}

pub async fn toggle(id: i64, client_config_path: &Path) -> Result<()> {
    let mut view = open(client_config_path, None).await?;
    view.toggle_program(id).await;
    finish(&view.dialog)?;
    if let Some(p) = view.programs.iter().find(|p| p.id == id) {
        println!(
            "Program {} is now {}.",
            p.id,
            if p.is_active { "active" } else { "inactive" }
        );
    }
    Ok(())
}

pub async fn delete_user(id: i64, yes: bool, client_config_path: &Path) -> Result<()> {
    let mut view = open(client_config_path, None).await?;
    view.request_delete_user(id);
    if !yes && !confirm(&view.dialog.message)? {
        view.dialog.close();
        println!("Cancelled.");
        return Ok(());
    }
    view.confirm_dialog().await;
    finish(&view.dialog)
}
