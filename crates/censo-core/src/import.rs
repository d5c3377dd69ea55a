//! Bulk import planning.
//!
//! Spreadsheet decoding and column mapping happen outside this crate; what
//! arrives here is a JSON array of drafts. Planning deduplicates against
//! the current record set and within the batch by normalized full name.
//! A malformed row rejects the whole batch — imports never partially
//! commit from a bad file.

use crate::error::Result;
use crate::models::{CensusRecord, NewCensusRecord};
use crate::util::normalize_name;

/// Outcome of deduplicating an import batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportPlan {
    /// Drafts that survived deduplication, in input order
    pub drafts: Vec<NewCensusRecord>,
    /// Rows dropped as duplicates of existing records or earlier rows
    pub skipped_duplicates: usize,
}

impl ImportPlan {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.drafts.is_empty()
    }
}

/// Parse an import payload: a JSON array of draft records.
pub fn parse_drafts(payload: &str) -> Result<Vec<NewCensusRecord>> {
    Ok(serde_json::from_str(payload)?)
}

/// Deduplicate a batch against existing records and itself.
///
/// Rows with blank names are silently dropped (not counted as
/// duplicates), matching how ingest treats filler rows.
#[must_use]
pub fn plan_import(existing: &[CensusRecord], drafts: Vec<NewCensusRecord>) -> ImportPlan {
    let mut seen: std::collections::HashSet<String> = existing
        .iter()
        .map(|record| normalize_name(&record.full_name))
        .collect();

    let mut plan = ImportPlan {
        drafts: Vec::new(),
        skipped_duplicates: 0,
    };

    for draft in drafts {
        let normalized = normalize_name(&draft.full_name);
        if normalized.is_empty() {
            continue;
        }
        if seen.contains(&normalized) {
            plan.skipped_duplicates += 1;
            continue;
        }
        seen.insert(normalized);
        plan.drafts.push(draft);
    }

    plan
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use uuid::Uuid;

    use super::*;
    use crate::models::{MembershipStatus, RecordId};

    fn existing(name: &str) -> CensusRecord {
        CensusRecord {
            id: RecordId::new(1),
            user_id: Uuid::nil(),
            full_name: name.to_string(),
            birth_date: None,
            national_id: None,
            gender: None,
            group: None,
            status: MembershipStatus::Active,
            created_at: None,
        }
    }

    fn draft(name: &str) -> NewCensusRecord {
        NewCensusRecord::new(name, MembershipStatus::Active).unwrap()
    }

    #[test]
    fn parse_drafts_accepts_wire_names() {
        let payload = r#"[
            {"nombre_completo": "Ana", "estado": "Activo"},
            {"nombre_completo": "Luis", "estado": "Trasladado", "genero": "Masculino"}
        ]"#;

        let drafts = parse_drafts(payload).unwrap();
        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[0].full_name, "Ana");
        assert_eq!(drafts[1].status, MembershipStatus::Transferred);
    }

    #[test]
    fn parse_drafts_rejects_malformed_rows() {
        // A bad status in row 2 rejects the whole batch
        let payload = r#"[
            {"nombre_completo": "Ana", "estado": "Activo"},
            {"nombre_completo": "Luis", "estado": "Fantasma"}
        ]"#;

        assert!(parse_drafts(payload).is_err());
    }

    #[test]
    fn plan_skips_duplicates_of_existing_records() {
        let current = vec![existing("Ana Morales")];
        let plan = plan_import(&current, vec![draft("  ana MORALES "), draft("Luis")]);

        assert_eq!(plan.drafts.len(), 1);
        assert_eq!(plan.drafts[0].full_name, "Luis");
        assert_eq!(plan.skipped_duplicates, 1);
    }

    #[test]
    fn plan_deduplicates_within_the_batch() {
        let plan = plan_import(&[], vec![draft("Ana"), draft("ANA"), draft("Ana ")]);

        assert_eq!(plan.drafts.len(), 1);
        assert_eq!(plan.skipped_duplicates, 2);
    }

    #[test]
    fn empty_plan_when_everything_is_known() {
        let current = vec![existing("Ana")];
        let plan = plan_import(&current, vec![draft("Ana")]);
        assert!(plan.is_empty());
        assert_eq!(plan.skipped_duplicates, 1);
    }
}
