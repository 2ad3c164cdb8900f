//! Enrollment lifecycle state machine.
//!
//! ```text
//!                 enroll (handoff)
//!   NotEnrolled ───────────────────▶ Enrolled ──┐
//!        │  ongoing / completed / reject          │ ongoing / completed / reject
//!        ▼                                        ▼
//!     Ongoing ◀──────────────────────────────────┘
//!        │  ongoing (re-affirm) / completed / reject
//!        ▼
//!   Completed { on }        Rejected          (terminal)
//! ```
//!
//! Every first action (from `NotEnrolled`) requires the program to be open.
//! Completion requires a date that is not after today.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    EngineError, ResultEngine,
    enrollments::{Enrollment, EnrollmentStatus},
    programs::ProgramStatus,
};

/// Where a patient stands with respect to one program.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum EnrollmentState {
    #[default]
    NotEnrolled,
    Enrolled,
    Ongoing,
    Completed {
        on: NaiveDate,
    },
    Rejected,
}

impl EnrollmentState {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed { .. } | Self::Rejected)
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::NotEnrolled => "not enrolled",
            Self::Enrolled => "enrolled",
            Self::Ongoing => "ongoing",
            Self::Completed { .. } => "completed",
            Self::Rejected => "rejected",
        }
    }
}

impl From<EnrollmentStatus> for EnrollmentState {
    fn from(status: EnrollmentStatus) -> Self {
        match status {
            EnrollmentStatus::Enrolled => Self::Enrolled,
            EnrollmentStatus::Ongoing => Self::Ongoing,
            EnrollmentStatus::Completed { on } => Self::Completed { on },
            EnrollmentStatus::Rejected => Self::Rejected,
        }
    }
}

impl From<Option<&Enrollment>> for EnrollmentState {
    fn from(enrollment: Option<&Enrollment>) -> Self {
        enrollment.map_or(Self::NotEnrolled, |e| e.status.into())
    }
}

/// An affordance the presentation tier may offer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    EnrollNow,
    MarkOngoing,
    MarkCompleted,
    Reject,
}

impl Action {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EnrollNow => "enroll now",
            Self::MarkOngoing => "mark ongoing",
            Self::MarkCompleted => "mark completed",
            Self::Reject => "reject",
        }
    }
}

/// A status change requested by the patient.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusRequest {
    Enroll,
    MarkOngoing,
    MarkCompleted { completion_date: Option<NaiveDate> },
    Reject,
}

impl StatusRequest {
    #[must_use]
    pub const fn action(self) -> Action {
        match self {
            Self::Enroll => Action::EnrollNow,
            Self::MarkOngoing => Action::MarkOngoing,
            Self::MarkCompleted { .. } => Action::MarkCompleted,
            Self::Reject => Action::Reject,
        }
    }
}

/// An accepted transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    pub from: EnrollmentState,
    pub to: EnrollmentStatus,
    /// The patient must be sent to the external enrollment portal.
    pub requires_external_handoff: bool,
}

const FIRST_ACTIONS: &[Action] = &[
    Action::EnrollNow,
    Action::MarkOngoing,
    Action::MarkCompleted,
    Action::Reject,
];
const UPDATE_ACTIONS: &[Action] = &[Action::MarkOngoing, Action::MarkCompleted, Action::Reject];

/// Actions legal from `state` for a program in `program_status`.
#[must_use]
pub fn allowed_actions(state: EnrollmentState, program_status: ProgramStatus) -> &'static [Action] {
    match state {
        EnrollmentState::NotEnrolled if program_status.is_open() => FIRST_ACTIONS,
        EnrollmentState::NotEnrolled => &[],
        EnrollmentState::Enrolled | EnrollmentState::Ongoing => UPDATE_ACTIONS,
        EnrollmentState::Completed { .. } | EnrollmentState::Rejected => &[],
    }
}

/// Validates `request` against `state` and returns the resulting status.
///
/// Nothing is mutated: the caller persists [`Transition::to`].
pub fn transition(
    state: EnrollmentState,
    program_status: ProgramStatus,
    request: StatusRequest,
    today: NaiveDate,
) -> ResultEngine<Transition> {
    let action = request.action();
    if !allowed_actions(state, program_status).contains(&action) {
        return Err(match state {
            EnrollmentState::NotEnrolled => {
                EngineError::ProgramNotOpen(format!("program is {program_status}"))
            }
            other => EngineError::InvalidTransition(format!(
                "cannot {} from {}",
                action.as_str(),
                other.label()
            )),
        });
    }

    let to = match request {
        StatusRequest::Enroll => EnrollmentStatus::Enrolled,
        StatusRequest::MarkOngoing => EnrollmentStatus::Ongoing,
        StatusRequest::MarkCompleted { completion_date } => EnrollmentStatus::Completed {
            on: validate_completion_date(completion_date, today)?,
        },
        StatusRequest::Reject => EnrollmentStatus::Rejected,
    };

    Ok(Transition {
        from: state,
        to,
        requires_external_handoff: matches!(request, StatusRequest::Enroll),
    })
}

fn validate_completion_date(date: Option<NaiveDate>, today: NaiveDate) -> ResultEngine<NaiveDate> {
    let date = date.ok_or_else(|| {
        EngineError::InvalidCompletionDate("completion date is required".to_string())
    })?;
    if date > today {
        return Err(EngineError::InvalidCompletionDate(format!(
            "{date} is after today ({today})"
        )));
    }
    Ok(date)
}
