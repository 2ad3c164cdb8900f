//! Command structs for engine operations.
//!
//! These types group the parameters of write operations (status changes and
//! medication selection), keeping call sites readable.

use chrono::{DateTime, NaiveDate, Utc};

use crate::lifecycle::StatusRequest;

/// Change the enrollment status of a program.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransitionCmd {
    pub program_id: String,
    pub request: StatusRequest,
    /// Stamped on the record as `updated_at`.
    pub now: DateTime<Utc>,
}

impl TransitionCmd {
    #[must_use]
    pub fn new(program_id: impl Into<String>, request: StatusRequest, now: DateTime<Utc>) -> Self {
        Self {
            program_id: program_id.into(),
            request,
            now,
        }
    }

    #[must_use]
    pub fn enroll(program_id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self::new(program_id, StatusRequest::Enroll, now)
    }

    #[must_use]
    pub fn ongoing(program_id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self::new(program_id, StatusRequest::MarkOngoing, now)
    }

    #[must_use]
    pub fn completed(
        program_id: impl Into<String>,
        completion_date: Option<NaiveDate>,
        now: DateTime<Utc>,
    ) -> Self {
        Self::new(
            program_id,
            StatusRequest::MarkCompleted { completion_date },
            now,
        )
    }

    #[must_use]
    pub fn reject(program_id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self::new(program_id, StatusRequest::Reject, now)
    }
}

/// Select the patient's medication, replacing the previous one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectDrugCmd {
    pub drug_id: String,
    pub refill_date: Option<NaiveDate>,
}

impl SelectDrugCmd {
    #[must_use]
    pub fn new(drug_id: impl Into<String>) -> Self {
        Self {
            drug_id: drug_id.into(),
            refill_date: None,
        }
    }

    #[must_use]
    pub fn refill_date(mut self, refill_date: NaiveDate) -> Self {
        self.refill_date = Some(refill_date);
        self
    }
}
