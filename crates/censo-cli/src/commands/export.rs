use std::io::Write as _;
use std::path::Path;

use censo_core::export::{render_records_export, ExportFormat};

use crate::cli::ExportFormatArg;
use crate::commands::common::{sort_for_listing, AppContext};
use crate::error::CliError;

pub async fn run_export(
    format: ExportFormatArg,
    output_path: Option<&Path>,
    db_path: &Path,
) -> Result<(), CliError> {
    let ctx = AppContext::load(db_path).await?;
    let mut records = ctx.visible.snapshot();
    sort_for_listing(&mut records);

    let format = match format {
        ExportFormatArg::Json => ExportFormat::Json,
        ExportFormatArg::Csv => ExportFormat::Csv,
    };
    let rendered = render_records_export(&records, format)?;

    if let Some(path) = output_path {
        std::fs::write(path, rendered)?;
        println!("{}", path.display());
    } else {
        std::io::stdout().write_all(rendered.as_bytes())?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use censo_core::models::{CensusRecord, MembershipStatus, RecordId};
    use censo_core::store::CensusStore;
    use uuid::Uuid;

    use super::*;

    #[tokio::test(flavor = "multi_thread")]
    async fn export_writes_csv_file() {
        let tmp = tempfile::tempdir().unwrap();
        let db_path = tmp.path().join("censo.db");

        {
            let ctx = AppContext::load(&db_path).await.unwrap();
            ctx.store
                .replace_records(&[CensusRecord {
                    id: RecordId::new(1),
                    user_id: Uuid::nil(),
                    full_name: "Ana".to_string(),
                    birth_date: None,
                    national_id: None,
                    gender: None,
                    group: None,
                    status: MembershipStatus::Active,
                    created_at: None,
                }])
                .await
                .unwrap();
        }

        let output = tmp.path().join("export.csv");
        run_export(ExportFormatArg::Csv, Some(&output), &db_path)
            .await
            .unwrap();

        let exported = std::fs::read_to_string(&output).unwrap();
        assert!(exported.starts_with("id,nombre_completo"));
        assert!(exported.contains("1,Ana"));
    }
}
