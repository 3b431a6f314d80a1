//! `yatri program show <id>`: public program page.

use std::path::Path;

use anyhow::Result;
use yatri_views::{format_date, or_na, ProgramDetail};

use super::connect_verified;

pub async fn show(id: &str, json: bool, client_config_path: &Path) -> Result<()> {
    let conn = connect_verified(client_config_path).await?;
    let mut view = ProgramDetail::new(conn.session.clone());
    view.load(id).await;

    if let Some(err) = &view.error {
        anyhow::bail!("{}", err);
    }
    let Some(p) = &view.program else {
        anyhow::bail!("Program not found");
    };

    if json {
        println!("{}", serde_json::to_string_pretty(p)?);
        return Ok(());
    }

    let host = p.host.as_ref();
    let max = p.max_volunteers.map(|m| m.to_string());
    println!("{}", p.title);
    println!("  Category:       {}", or_na(p.category.as_deref()));
    println!("  Sub-category:   {}", or_na(p.sub_category.as_deref()));
    println!("  Location:       {}", or_na(p.location.as_deref()));
    println!("  Duration:       {}", or_na(p.duration.as_deref()));
    println!("  Max volunteers: {}", or_na(max.as_deref()));
    println!("  Host:           {}", or_na(host.and_then(|h| h.name.as_deref())));
    println!("  Property:       {}", or_na(host.and_then(|h| h.property_name.as_deref())));
    println!("  Posted:         {}", format_date(p.created_at.as_deref()));
    for img in view.images() {
        println!("  Image:          {}", img);
    }
    if let Some(desc) = p.description.as_deref().filter(|d| !d.is_empty()) {
        println!();
        println!("{}", desc);
    }
    println!();
    println!("[{}]", view.cta_label());
    Ok(())
}
