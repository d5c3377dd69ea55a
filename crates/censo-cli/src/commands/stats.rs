use std::path::Path;

use censo_core::models::Group;
use censo_core::stats::{status_totals, summarize};
use chrono::Utc;

use crate::commands::common::AppContext;
use crate::error::CliError;

pub async fn run_stats(as_json: bool, db_path: &Path) -> Result<(), CliError> {
    let ctx = AppContext::load(db_path).await?;
    let records = ctx.visible.snapshot();
    let today = Utc::now().date_naive();

    let totals = status_totals(&records);
    let summary = summarize(&records, today);

    if as_json {
        let groups: serde_json::Map<String, serde_json::Value> = summary
            .groups
            .iter()
            .map(|(group, tally)| {
                (
                    group.to_string(),
                    serde_json::json!({ "men": tally.men, "women": tally.women }),
                )
            })
            .collect();
        let payload = serde_json::json!({
            "totals": {
                "activo": totals.active,
                "retirado_temporal": totals.temporarily_withdrawn,
                "archivado": totals.archived,
                "trasladado": totals.transferred,
            },
            "groups": groups,
            "adult_subtotal": { "men": summary.adult_subtotal.men, "women": summary.adult_subtotal.women },
            "children": { "men": summary.children.men, "women": summary.children.women },
            "total": { "men": summary.total.men, "women": summary.total.women },
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    println!("Membership totals");
    println!("  Activo:            {}", totals.active);
    println!("  Retirado Temporal: {}", totals.temporarily_withdrawn);
    println!("  Archivado:         {}", totals.archived);
    println!("  Trasladado:        {}", totals.transferred);
    println!();
    println!("Census summary (Activo + Retirado Temporal)");
    println!("  {:<22} {:>5} {:>7}", "Group", "Men", "Women");
    for (group, tally) in &summary.groups {
        println!("  {:<22} {:>5} {:>7}", group.label(), tally.men, tally.women);
    }
    println!(
        "  {:<22} {:>5} {:>7}",
        "Adult subtotal", summary.adult_subtotal.men, summary.adult_subtotal.women
    );
    println!(
        "  {:<22} {:>5} {:>7}",
        Group::N.label(),
        summary.children.men,
        summary.children.women
    );
    println!(
        "  {:<22} {:>5} {:>7}",
        "Total", summary.total.men, summary.total.women
    );

    Ok(())
}
