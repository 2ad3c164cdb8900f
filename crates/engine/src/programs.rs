//! Cost-assistance programs.
//!
//! Programs are catalog data administered outside the engine; the engine only
//! reads them. `program_status` is the only field that changes over time and
//! it gates every first enrollment action.

use chrono::NaiveDate;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Administrative status of a program.
///
/// Unknown stored values are read as [`ProgramStatus::Other`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgramStatus {
    Open,
    Waitlisted,
    Closed,
    Identified,
    #[default]
    Other,
}

impl ProgramStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Waitlisted => "waitlisted",
            Self::Closed => "closed",
            Self::Identified => "identified",
            Self::Other => "other",
        }
    }

    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }
}

impl From<&str> for ProgramStatus {
    fn from(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "open" => Self::Open,
            "waitlisted" => Self::Waitlisted,
            "closed" => Self::Closed,
            "identified" => Self::Identified,
            _ => Self::Other,
        }
    }
}

impl core::fmt::Display for ProgramStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A cost-assistance program as seen by the patient.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    pub id: String,
    pub name: String,
    pub sponsor: String,
    /// Free-text cap as entered in the catalog, e.g. `"$1,200"`.
    pub monetary_cap: String,
    pub description: String,
    pub status: ProgramStatus,
    pub re_enrollment_date: Option<NaiveDate>,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "programs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub sponsor: String,
    pub monetary_cap: String,
    pub description: String,
    pub program_status: String,
    pub re_enrollment_date: Option<Date>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Program {
    fn from(model: Model) -> Self {
        Self {
            status: ProgramStatus::from(model.program_status.as_str()),
            id: model.id,
            name: model.name,
            sponsor: model.sponsor,
            monetary_cap: model.monetary_cap,
            description: model.description,
            re_enrollment_date: model.re_enrollment_date,
        }
    }
}
