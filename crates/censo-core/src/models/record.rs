//! Census record model

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

/// Identifier of a census record.
///
/// Positive values are assigned by the remote service and durable.
/// Negative values are client-synthesized placeholders for records created
/// while the remote service was unreachable; they disappear once the
/// queued create is confirmed and a fresh snapshot is fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecordId(i64);

impl RecordId {
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Synthesize a placeholder id for an offline create.
    ///
    /// Shaped as the negative of the current Unix-ms timestamp; an atomic
    /// guard keeps each issued id strictly below the previous one so two
    /// creates in the same millisecond still get distinct ids.
    #[must_use]
    pub fn placeholder() -> Self {
        static LAST_ISSUED: AtomicI64 = AtomicI64::new(0);

        let candidate = -Utc::now().timestamp_millis();
        // fetch_update yields the previous value; the issued id is the
        // minimum the closure stored
        let previous = LAST_ISSUED
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |last| {
                Some(candidate.min(last - 1))
            })
            .unwrap_or(0);
        Self(candidate.min(previous - 1))
    }

    #[must_use]
    pub const fn as_i64(self) -> i64 {
        self.0
    }

    /// Whether this id is a client-synthesized placeholder.
    #[must_use]
    pub const fn is_placeholder(self) -> bool {
        self.0 < 0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

impl From<i64> for RecordId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

/// Member gender, serialized with the remote table's Spanish values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "Masculino")]
    Male,
    #[serde(rename = "Femenino")]
    Female,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Male => "Masculino",
            Self::Female => "Femenino",
        };
        write!(f, "{label}")
    }
}

impl FromStr for Gender {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "Masculino" | "masculino" | "M" | "m" => Ok(Self::Male),
            "Femenino" | "femenino" | "F" | "f" => Ok(Self::Female),
            other => Err(Error::InvalidInput(format!("Unknown gender: {other}"))),
        }
    }
}

/// Congregation group classification.
///
/// `C` is the generic married group; `CC`/`CM`/`CG` are its age-derived
/// subgroups (see [`crate::stats::display_group`]). `N` marks children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Group {
    C,
    CC,
    CM,
    CG,
    J,
    S,
    N,
}

impl Group {
    /// Human-readable label used by listings
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::C => "C (Casado)",
            Self::CC => "CC (Casado Chico)",
            Self::CM => "CM (Casado Mediano)",
            Self::CG => "CG (Casado Grande)",
            Self::J => "J (Joven)",
            Self::S => "S (Sol@)",
            Self::N => "N (Ni\u{f1}@s)",
        }
    }

    /// All groups, in the order listings present them
    #[must_use]
    pub const fn all() -> [Self; 7] {
        [
            Self::C,
            Self::CC,
            Self::CM,
            Self::CG,
            Self::J,
            Self::S,
            Self::N,
        ]
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            Self::C => "C",
            Self::CC => "CC",
            Self::CM => "CM",
            Self::CG => "CG",
            Self::J => "J",
            Self::S => "S",
            Self::N => "N",
        };
        write!(f, "{code}")
    }
}

impl FromStr for Group {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "C" => Ok(Self::C),
            "CC" => Ok(Self::CC),
            "CM" => Ok(Self::CM),
            "CG" => Ok(Self::CG),
            "J" => Ok(Self::J),
            "S" => Ok(Self::S),
            "N" => Ok(Self::N),
            other => Err(Error::InvalidInput(format!("Unknown group: {other}"))),
        }
    }
}

/// Membership status, serialized with the remote table's Spanish values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MembershipStatus {
    #[serde(rename = "Activo")]
    Active,
    #[serde(rename = "Retirado Temporal")]
    TemporarilyWithdrawn,
    #[serde(rename = "Archivado")]
    Archived,
    #[serde(rename = "Trasladado")]
    Transferred,
}

impl fmt::Display for MembershipStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Active => "Activo",
            Self::TemporarilyWithdrawn => "Retirado Temporal",
            Self::Archived => "Archivado",
            Self::Transferred => "Trasladado",
        };
        write!(f, "{label}")
    }
}

impl FromStr for MembershipStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "Activo" => Ok(Self::Active),
            "Retirado Temporal" => Ok(Self::TemporarilyWithdrawn),
            "Archivado" => Ok(Self::Archived),
            "Trasladado" => Ok(Self::Transferred),
            other => Err(Error::InvalidInput(format!(
                "Unknown membership status: {other}"
            ))),
        }
    }
}

/// One member's census entry.
///
/// Field names follow the remote `registros_censo` table on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CensusRecord {
    pub id: RecordId,
    /// Authenticated user that owns this record
    pub user_id: Uuid,
    #[serde(rename = "nombre_completo")]
    pub full_name: String,
    #[serde(rename = "fecha_nacimiento", skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,
    #[serde(rename = "numero_cedula", skip_serializing_if = "Option::is_none")]
    pub national_id: Option<String>,
    #[serde(rename = "genero", skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(rename = "grupo", skip_serializing_if = "Option::is_none")]
    pub group: Option<Group>,
    #[serde(rename = "estado")]
    pub status: MembershipStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl CensusRecord {
    /// Build the placeholder record for an offline create.
    #[must_use]
    pub fn placeholder_for(draft: NewCensusRecord, user_id: Uuid) -> Self {
        Self {
            id: RecordId::placeholder(),
            user_id,
            full_name: draft.full_name,
            birth_date: draft.birth_date,
            national_id: draft.national_id,
            gender: draft.gender,
            group: draft.group,
            status: draft.status,
            created_at: None,
        }
    }

    /// Strip identity back down to a draft, e.g. when replaying a queued
    /// create against the remote service (which assigns its own id).
    #[must_use]
    pub fn as_draft(&self) -> NewCensusRecord {
        NewCensusRecord {
            full_name: self.full_name.clone(),
            birth_date: self.birth_date,
            national_id: self.national_id.clone(),
            gender: self.gender,
            group: self.group,
            status: self.status,
        }
    }
}

/// A record as submitted for creation: no id, owner, or timestamp yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCensusRecord {
    #[serde(rename = "nombre_completo")]
    pub full_name: String,
    #[serde(rename = "fecha_nacimiento", skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,
    #[serde(rename = "numero_cedula", skip_serializing_if = "Option::is_none")]
    pub national_id: Option<String>,
    #[serde(rename = "genero", skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(rename = "grupo", skip_serializing_if = "Option::is_none")]
    pub group: Option<Group>,
    #[serde(rename = "estado")]
    pub status: MembershipStatus,
}

impl NewCensusRecord {
    /// Create a draft with the required fields, rejecting blank names.
    pub fn new(full_name: impl Into<String>, status: MembershipStatus) -> Result<Self> {
        let full_name = full_name.into().trim().to_string();
        if full_name.is_empty() {
            return Err(Error::InvalidInput(
                "Full name must not be empty".to_string(),
            ));
        }
        Ok(Self {
            full_name,
            birth_date: None,
            national_id: None,
            gender: None,
            group: None,
            status,
        })
    }

    #[must_use]
    pub fn with_birth_date(mut self, birth_date: NaiveDate) -> Self {
        self.birth_date = Some(birth_date);
        self
    }

    #[must_use]
    pub fn with_national_id(mut self, national_id: impl Into<String>) -> Self {
        self.national_id = Some(national_id.into());
        self
    }

    #[must_use]
    pub const fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = Some(gender);
        self
    }

    #[must_use]
    pub const fn with_group(mut self, group: Group) -> Self {
        self.group = Some(group);
        self
    }
}
