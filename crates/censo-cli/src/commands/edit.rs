use std::path::Path;

use crate::commands::common::{parse_birth_date, AppContext};
use crate::error::CliError;

#[derive(Default)]
pub struct EditArgs {
    pub name: Option<String>,
    pub birth_date: Option<String>,
    pub national_id: Option<String>,
    pub gender: Option<String>,
    pub group: Option<String>,
    pub status: Option<String>,
}

pub async fn run_edit(id: &str, args: EditArgs, db_path: &Path) -> Result<(), CliError> {
    let ctx = AppContext::load(db_path).await?;
    let mut record = ctx.find_record(id)?;

    if let Some(name) = args.name {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(CliError::EmptyName);
        }
        record.full_name = name;
    }
    if let Some(raw) = args.birth_date {
        record.birth_date = Some(parse_birth_date(&raw)?);
    }
    if let Some(national_id) = args.national_id {
        record.national_id = Some(national_id);
    }
    if let Some(raw) = args.gender {
        record.gender = Some(raw.parse()?);
    }
    if let Some(raw) = args.group {
        record.group = Some(raw.parse()?);
    }
    if let Some(raw) = args.status {
        record.status = raw.parse()?;
    }

    let updated = ctx.router().update(record).await?;
    println!("{}", updated.id);
    Ok(())
}
