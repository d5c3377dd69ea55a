use std::path::Path;

use censo_core::models::{MembershipStatus, NewCensusRecord};

use crate::commands::common::{parse_birth_date, AppContext};
use crate::error::CliError;

#[derive(Default)]
pub struct AddArgs {
    pub birth_date: Option<String>,
    pub national_id: Option<String>,
    pub gender: Option<String>,
    pub group: Option<String>,
    pub status: Option<String>,
}

pub async fn run_add(name_parts: &[String], args: AddArgs, db_path: &Path) -> Result<(), CliError> {
    let name = name_parts.join(" ");
    if name.trim().is_empty() {
        return Err(CliError::EmptyName);
    }

    let status = match args.status {
        Some(raw) => raw.parse()?,
        None => MembershipStatus::Active,
    };

    let mut draft = NewCensusRecord::new(name, status)?;
    if let Some(raw) = args.birth_date {
        draft = draft.with_birth_date(parse_birth_date(&raw)?);
    }
    if let Some(national_id) = args.national_id {
        draft = draft.with_national_id(national_id);
    }
    if let Some(raw) = args.gender {
        draft = draft.with_gender(raw.parse()?);
    }
    if let Some(raw) = args.group {
        draft = draft.with_group(raw.parse()?);
    }

    let ctx = AppContext::load(db_path).await?;
    let created = ctx.router().create(draft).await?;

    if created.id.is_placeholder() {
        tracing::info!("Remote unavailable; queued for the next sync");
    }
    println!("{}", created.id);
    Ok(())
}
