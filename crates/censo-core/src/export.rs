//! Record export helpers shared by the clients.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::models::CensusRecord;

/// Export output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }
}

/// Render records as pretty-printed JSON in the wire shape.
pub fn render_json_export(records: &[CensusRecord]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(records)
}

/// Render records as CSV with the remote table's column names.
#[must_use]
pub fn render_csv_export(records: &[CensusRecord]) -> String {
    let mut output = String::from(
        "id,nombre_completo,fecha_nacimiento,numero_cedula,genero,grupo,estado\n",
    );

    for record in records {
        let _ = writeln!(
            output,
            "{},{},{},{},{},{},{}",
            record.id,
            csv_field(&record.full_name),
            record
                .birth_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            csv_field(record.national_id.as_deref().unwrap_or_default()),
            record.gender.map(|g| g.to_string()).unwrap_or_default(),
            record.group.map(|g| g.to_string()).unwrap_or_default(),
            csv_field(&record.status.to_string()),
        );
    }

    output
}

/// Render records in the selected format.
pub fn render_records_export(
    records: &[CensusRecord],
    format: ExportFormat,
) -> serde_json::Result<String> {
    match format {
        ExportFormat::Json => render_json_export(records),
        ExportFormat::Csv => Ok(render_csv_export(records)),
    }
}

/// Build a deterministic default file name for export flows.
#[must_use]
pub fn suggested_export_file_name(format: ExportFormat, timestamp_ms: i64) -> String {
    format!("censo-export-{timestamp_ms}.{}", format.extension())
}

/// Quote a field when it contains a delimiter, quote, or newline.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::models::{Gender, Group, MembershipStatus, RecordId};

    fn record(name: &str) -> CensusRecord {
        CensusRecord {
            id: RecordId::new(7),
            user_id: Uuid::nil(),
            full_name: name.to_string(),
            birth_date: chrono::NaiveDate::from_ymd_opt(1990, 5, 1),
            national_id: Some("8-123".to_string()),
            gender: Some(Gender::Female),
            group: Some(Group::S),
            status: MembershipStatus::TemporarilyWithdrawn,
            created_at: None,
        }
    }

    #[test]
    fn csv_export_includes_header_and_row() {
        let rendered = render_csv_export(&[record("Ana")]);
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(
            lines[0],
            "id,nombre_completo,fecha_nacimiento,numero_cedula,genero,grupo,estado"
        );
        assert_eq!(lines[1], "7,Ana,1990-05-01,8-123,Femenino,S,Retirado Temporal");
    }

    #[test]
    fn csv_fields_with_commas_are_quoted() {
        let rendered = render_csv_export(&[record("Morales, Ana \"Anita\"")]);
        assert!(rendered.contains("\"Morales, Ana \"\"Anita\"\"\""));
    }

    #[test]
    fn json_export_uses_wire_names() {
        let rendered = render_json_export(&[record("Ana")]).unwrap();
        assert!(rendered.contains("\"nombre_completo\": \"Ana\""));
        assert!(rendered.contains("\"estado\": \"Retirado Temporal\""));
    }

    #[test]
    fn suggested_export_file_name_uses_format_extension() {
        assert_eq!(
            suggested_export_file_name(ExportFormat::Json, 123),
            "censo-export-123.json"
        );
        assert_eq!(
            suggested_export_file_name(ExportFormat::Csv, 456),
            "censo-export-456.csv"
        );
    }
}
