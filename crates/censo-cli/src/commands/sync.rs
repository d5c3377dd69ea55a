use std::path::Path;

use censo_core::store::CensusStore;

use crate::commands::common::AppContext;
use crate::error::CliError;

pub async fn run_sync(db_path: &Path) -> Result<(), CliError> {
    let ctx = AppContext::load(db_path).await?;
    if !ctx.remote_configured {
        return Err(CliError::SyncNotConfigured);
    }

    let engine = ctx.engine();
    engine.sync_cycle().await?;

    println!("Sync completed: {} records", ctx.visible.len());
    Ok(())
}

pub async fn run_status(db_path: &Path) -> Result<(), CliError> {
    let ctx = AppContext::load(db_path).await?;
    let queue = ctx.store.sync_queue().await?;

    let connection = if ctx.remote_configured {
        "configured"
    } else {
        "not configured"
    };
    println!("Remote service: {connection}");
    println!("Local records:  {}", ctx.visible.len());
    println!("Pending queue:  {} operations", queue.len());

    for operation in &queue {
        println!(
            "  #{:<6} {:<7} record {}",
            operation.id,
            operation.mutation.kind(),
            operation.mutation.target()
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(flavor = "multi_thread")]
    async fn sync_requires_configuration() {
        let tmp = tempfile::tempdir().unwrap();
        let db_path = tmp.path().join("censo.db");

        let error = run_sync(&db_path).await.unwrap_err();
        assert!(matches!(error, CliError::SyncNotConfigured));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn status_works_without_remote() {
        let tmp = tempfile::tempdir().unwrap();
        let db_path = tmp.path().join("censo.db");

        run_status(&db_path).await.unwrap();
    }
}
