use std::path::Path;

use censo_core::import::{parse_drafts, plan_import};

use crate::commands::common::AppContext;
use crate::error::CliError;

pub async fn run_import(file: &Path, db_path: &Path) -> Result<(), CliError> {
    let ctx = AppContext::load(db_path).await?;
    if !ctx.remote_configured || !ctx.reachability.is_online() {
        return Err(CliError::ImportRequiresConnection);
    }

    let payload = std::fs::read_to_string(file)?;
    let drafts = parse_drafts(&payload)?;
    let plan = plan_import(&ctx.visible.snapshot(), drafts);

    if plan.is_empty() {
        println!(
            "No new records to import ({} duplicates skipped)",
            plan.skipped_duplicates
        );
        return Ok(());
    }

    let created = ctx.remote.bulk_create_records(&plan.drafts).await?;
    println!(
        "Imported {} records ({} duplicates skipped)",
        created.len(),
        plan.skipped_duplicates
    );

    // Pull the authoritative collection back down
    ctx.engine().sync_cycle().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(flavor = "multi_thread")]
    async fn import_requires_connection() {
        let tmp = tempfile::tempdir().unwrap();
        let db_path = tmp.path().join("censo.db");
        let file = tmp.path().join("drafts.json");
        std::fs::write(&file, "[]").unwrap();

        let error = run_import(&file, &db_path).await.unwrap_err();
        assert!(matches!(error, CliError::ImportRequiresConnection));
    }
}
