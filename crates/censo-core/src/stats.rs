//! Census tabulation helpers.
//!
//! Age and display-group derivation feed both listings and the summary
//! tabulation. The presentation of the summary table itself lives with the
//! clients; this module only counts.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::models::{CensusRecord, Gender, Group, MembershipStatus};

/// Whole years between a birth date and `today`.
#[must_use]
pub fn age_on(birth_date: NaiveDate, today: NaiveDate) -> i32 {
    use chrono::Datelike;

    let mut age = today.year() - birth_date.year();
    if (today.month(), today.day()) < (birth_date.month(), birth_date.day()) {
        age -= 1;
    }
    age
}

/// Group shown for a record.
///
/// Only the generic married group `C` is refined by age (<= 30 → `CC`,
/// <= 45 → `CM`, older → `CG`); an explicitly assigned subgroup is
/// respected as-is, and `C` without a birth date stays `C`.
#[must_use]
pub fn display_group(record: &CensusRecord, today: NaiveDate) -> Option<Group> {
    let group = record.group?;
    if group != Group::C {
        return Some(group);
    }

    match record.birth_date {
        Some(birth_date) => {
            let age = age_on(birth_date, today);
            Some(if age <= 30 {
                Group::CC
            } else if age <= 45 {
                Group::CM
            } else {
                Group::CG
            })
        }
        None => Some(Group::C),
    }
}

/// Membership counters for the whole record set.
///
/// Active and temporarily-withdrawn counts exclude children (assigned
/// group `N`); archived and transferred counts include everyone.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StatusTotals {
    pub active: u32,
    pub temporarily_withdrawn: u32,
    pub archived: u32,
    pub transferred: u32,
}

#[must_use]
pub fn status_totals(records: &[CensusRecord]) -> StatusTotals {
    let mut totals = StatusTotals::default();

    for record in records {
        let is_child = record.group == Some(Group::N);
        match record.status {
            MembershipStatus::Active => {
                if !is_child {
                    totals.active += 1;
                }
            }
            MembershipStatus::TemporarilyWithdrawn => {
                if !is_child {
                    totals.temporarily_withdrawn += 1;
                }
            }
            MembershipStatus::Archived => totals.archived += 1,
            MembershipStatus::Transferred => totals.transferred += 1,
        }
    }

    totals
}

/// Men/women pair in one summary cell.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Tally {
    pub men: u32,
    pub women: u32,
}

impl Tally {
    fn add(&mut self, other: Self) {
        self.men += other.men;
        self.women += other.women;
    }
}

/// Census summary over active and temporarily-withdrawn members.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CensusSummary {
    /// Adult group cells: CG, CM, CC, S, J
    pub groups: BTreeMap<Group, Tally>,
    pub adult_subtotal: Tally,
    pub children: Tally,
    pub total: Tally,
}

/// Tabulate the census summary.
///
/// Records whose display group resolves to none of the adult cells (no
/// group, or `C` left unrefined for lack of a birth date) are not counted,
/// matching the established report.
#[must_use]
pub fn summarize(records: &[CensusRecord], today: NaiveDate) -> CensusSummary {
    const ADULT_GROUPS: [Group; 5] = [Group::CG, Group::CM, Group::CC, Group::S, Group::J];

    let mut summary = CensusSummary::default();
    for group in ADULT_GROUPS {
        summary.groups.insert(group, Tally::default());
    }

    let counted = records.iter().filter(|r| {
        matches!(
            r.status,
            MembershipStatus::Active | MembershipStatus::TemporarilyWithdrawn
        )
    });

    for record in counted {
        let cell = Tally {
            men: u32::from(record.gender == Some(Gender::Male)),
            women: u32::from(record.gender != Some(Gender::Male)),
        };

        match display_group(record, today) {
            Some(Group::N) => summary.children.add(cell),
            Some(group) => {
                if let Some(tally) = summary.groups.get_mut(&group) {
                    tally.add(cell);
                }
            }
            None => {}
        }
    }

    for tally in summary.groups.values() {
        summary.adult_subtotal.add(*tally);
    }
    summary.total = summary.adult_subtotal;
    summary.total.add(summary.children);

    summary
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use uuid::Uuid;

    use super::*;
    use crate::models::{Gender, RecordId};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 1).unwrap()
    }

    fn member(
        name: &str,
        status: MembershipStatus,
        group: Option<Group>,
        gender: Option<Gender>,
        birth_year: Option<i32>,
    ) -> CensusRecord {
        CensusRecord {
            id: RecordId::new(1),
            user_id: Uuid::nil(),
            full_name: name.to_string(),
            birth_date: birth_year.and_then(|y| NaiveDate::from_ymd_opt(y, 6, 15)),
            national_id: None,
            gender,
            group,
            status,
            created_at: None,
        }
    }

    #[test]
    fn age_counts_whole_years_only() {
        let birth = NaiveDate::from_ymd_opt(1990, 9, 1).unwrap();
        // Birthday hasn't happened yet this year
        assert_eq!(age_on(birth, today()), 35);

        let birth = NaiveDate::from_ymd_opt(1990, 8, 1).unwrap();
        assert_eq!(age_on(birth, today()), 36);
    }

    #[test]
    fn display_group_refines_c_by_age() {
        let young = member("A", MembershipStatus::Active, Some(Group::C), None, Some(2000));
        assert_eq!(display_group(&young, today()), Some(Group::CC));

        let middle = member("B", MembershipStatus::Active, Some(Group::C), None, Some(1985));
        assert_eq!(display_group(&middle, today()), Some(Group::CM));

        let older = member("C", MembershipStatus::Active, Some(Group::C), None, Some(1960));
        assert_eq!(display_group(&older, today()), Some(Group::CG));
    }

    #[test]
    fn display_group_respects_explicit_subgroup() {
        let explicit = member("A", MembershipStatus::Active, Some(Group::CG), None, Some(2000));
        assert_eq!(display_group(&explicit, today()), Some(Group::CG));
    }

    #[test]
    fn display_group_keeps_c_without_birth_date() {
        let unknown = member("A", MembershipStatus::Active, Some(Group::C), None, None);
        assert_eq!(display_group(&unknown, today()), Some(Group::C));
    }

    #[test]
    fn status_totals_exclude_children_from_active_counts() {
        let records = vec![
            member("A", MembershipStatus::Active, Some(Group::J), None, None),
            member("B", MembershipStatus::Active, Some(Group::N), None, None),
            member("C", MembershipStatus::TemporarilyWithdrawn, Some(Group::S), None, None),
            member("D", MembershipStatus::Archived, Some(Group::N), None, None),
            member("E", MembershipStatus::Transferred, None, None, None),
        ];

        let totals = status_totals(&records);
        assert_eq!(
            totals,
            StatusTotals {
                active: 1,
                temporarily_withdrawn: 1,
                archived: 1,
                transferred: 1,
            }
        );
    }

    #[test]
    fn summarize_counts_by_group_and_gender() {
        let records = vec![
            member("A", MembershipStatus::Active, Some(Group::J), Some(Gender::Male), None),
            member("B", MembershipStatus::Active, Some(Group::J), Some(Gender::Female), None),
            member("C", MembershipStatus::Active, Some(Group::C), Some(Gender::Male), Some(1990)),
            member("D", MembershipStatus::TemporarilyWithdrawn, Some(Group::N), Some(Gender::Female), None),
            // Archived members don't appear in the summary
            member("E", MembershipStatus::Archived, Some(Group::S), Some(Gender::Male), None),
        ];

        let summary = summarize(&records, today());

        assert_eq!(summary.groups[&Group::J], Tally { men: 1, women: 1 });
        assert_eq!(summary.groups[&Group::CM], Tally { men: 1, women: 0 });
        assert_eq!(summary.children, Tally { men: 0, women: 1 });
        assert_eq!(summary.adult_subtotal, Tally { men: 2, women: 1 });
        assert_eq!(summary.total, Tally { men: 2, women: 2 });
    }

    #[test]
    fn summarize_drops_unresolved_groups() {
        let records = vec![
            member("A", MembershipStatus::Active, None, Some(Gender::Male), None),
            member("B", MembershipStatus::Active, Some(Group::C), Some(Gender::Male), None),
        ];

        let summary = summarize(&records, today());
        assert_eq!(summary.total, Tally::default());
    }
}
