//! Enrollment records.
//!
//! An `Enrollment` exists as soon as the patient took any action on a program
//! and is never deleted by the engine. Inside the engine the status is the
//! tagged [`EnrollmentStatus`]; the stored form is a nullable string where
//! `NULL` means *rejected*. The translation lives only in this module.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

const ENROLLED: &str = "enrolled";
const ONGOING: &str = "ongoing";
const COMPLETED: &str = "completed";

/// Status of an existing enrollment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EnrollmentStatus {
    Enrolled,
    Ongoing,
    Completed { on: NaiveDate },
    Rejected,
}

impl EnrollmentStatus {
    /// Stored form of the status (`None` for rejected).
    #[must_use]
    pub const fn as_stored(self) -> Option<&'static str> {
        match self {
            Self::Enrolled => Some(ENROLLED),
            Self::Ongoing => Some(ONGOING),
            Self::Completed { .. } => Some(COMPLETED),
            Self::Rejected => None,
        }
    }

    #[must_use]
    pub const fn completion_date(self) -> Option<NaiveDate> {
        match self {
            Self::Completed { on } => Some(on),
            _ => None,
        }
    }

    /// Reads the stored `(status, completion_date)` pair.
    ///
    /// A completed row without a completion date is dated `fallback`.
    pub fn from_stored(
        status: Option<&str>,
        completion_date: Option<NaiveDate>,
        fallback: NaiveDate,
    ) -> ResultEngine<Self> {
        match status {
            None => Ok(Self::Rejected),
            Some(ENROLLED) => Ok(Self::Enrolled),
            Some(ONGOING) => Ok(Self::Ongoing),
            Some(COMPLETED) => Ok(Self::Completed {
                on: completion_date.unwrap_or(fallback),
            }),
            Some(other) => Err(EngineError::InvalidStatus(format!(
                "unknown enrollment status: {other}"
            ))),
        }
    }
}

/// The relationship between a patient and a single program.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: String,
    pub user_id: String,
    pub program_id: String,
    #[serde(flatten)]
    pub status: EnrollmentStatus,
    pub enrolled_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Enrollment {
    pub fn new(
        user_id: &str,
        program_id: &str,
        status: EnrollmentStatus,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            program_id: program_id.to_string(),
            status,
            enrolled_at: now,
            updated_at: now,
        }
    }

    /// Moves the record to `status`, stamping `updated_at`.
    pub fn set_status(&mut self, status: EnrollmentStatus, now: DateTime<Utc>) {
        self.status = status;
        self.updated_at = now;
    }

    #[must_use]
    pub fn completion_date(&self) -> Option<NaiveDate> {
        self.status.completion_date()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "enrollments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub program_id: String,
    pub status: Option<String>,
    pub completion_date: Option<Date>,
    pub enrolled_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Enrollment {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let status = EnrollmentStatus::from_stored(
            model.status.as_deref(),
            model.completion_date,
            model.updated_at.date_naive(),
        )?;
        Ok(Self {
            id: model.id,
            user_id: model.user_id,
            program_id: model.program_id,
            status,
            enrolled_at: model.enrolled_at,
            updated_at: model.updated_at,
        })
    }
}

impl From<&Enrollment> for ActiveModel {
    fn from(value: &Enrollment) -> Self {
        Self {
            id: ActiveValue::Set(value.id.clone()),
            user_id: ActiveValue::Set(value.user_id.clone()),
            program_id: ActiveValue::Set(value.program_id.clone()),
            status: ActiveValue::Set(value.status.as_stored().map(ToString::to_string)),
            completion_date: ActiveValue::Set(value.completion_date()),
            enrolled_at: ActiveValue::Set(value.enrolled_at),
            updated_at: ActiveValue::Set(value.updated_at),
        }
    }
}
