use std::path::Path;

use crate::commands::common::AppContext;
use crate::error::CliError;

pub async fn run_delete(id: &str, db_path: &Path) -> Result<(), CliError> {
    let ctx = AppContext::load(db_path).await?;
    let record = ctx.find_record(id)?;

    ctx.router().delete(record.id).await?;
    println!("{}", record.id);
    Ok(())
}
