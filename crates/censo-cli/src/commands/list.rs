use std::path::Path;

use censo_core::models::{Group, MembershipStatus};
use censo_core::stats::display_group;
use chrono::Utc;

use crate::cli::StatusFilter;
use crate::commands::common::{
    format_record_lines, record_to_list_item, sort_for_listing, AppContext, RecordListItem,
};
use crate::error::CliError;

pub async fn run_list(
    status: StatusFilter,
    group: Option<&str>,
    search: Option<&str>,
    as_json: bool,
    db_path: &Path,
) -> Result<(), CliError> {
    let ctx = AppContext::load(db_path).await?;
    let today = Utc::now().date_naive();

    let group_filter: Option<Group> = group.map(str::parse).transpose()?;
    let search_lower = search.map(str::to_lowercase);

    let mut records: Vec<_> = ctx
        .visible
        .snapshot()
        .into_iter()
        .filter(|record| match status {
            StatusFilter::All => true,
            StatusFilter::General => matches!(
                record.status,
                MembershipStatus::Active | MembershipStatus::TemporarilyWithdrawn
            ),
            StatusFilter::Archivado => record.status == MembershipStatus::Archived,
            StatusFilter::Trasladado => record.status == MembershipStatus::Transferred,
        })
        .filter(|record| {
            group_filter.is_none_or(|wanted| display_group(record, today) == Some(wanted))
        })
        .filter(|record| {
            search_lower
                .as_deref()
                .is_none_or(|needle| record.full_name.to_lowercase().contains(needle))
        })
        .collect();
    sort_for_listing(&mut records);

    if as_json {
        let items: Vec<RecordListItem> = records.iter().map(record_to_list_item).collect();
        println!("{}", serde_json::to_string_pretty(&items)?);
    } else {
        for line in format_record_lines(&records) {
            println!("{line}");
        }
    }

    Ok(())
}
