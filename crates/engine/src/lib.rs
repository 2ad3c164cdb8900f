//! Enrollment tracking for pharmaceutical cost-assistance programs.
//!
//! The crate is split in pure parts ([`lifecycle`], [`cost`], [`calendar`])
//! and an async orchestrator, [`Engine`], which reads and writes records
//! through a [`Store`] and keeps a per-patient [`SessionState`] in sync.

pub use calendar::{
    CalendarDay, CalendarMarks, DayMark, MonthCursor, MonthView, days_in_month, month_view,
};
pub use care_team::CareTeam;
pub use clinics::Clinic;
pub use commands::{SelectDrugCmd, TransitionCmd};
pub use cost::{CostSummary, out_of_pocket_cost, parse_monetary_cap, potential_saving};
pub use drugs::Drug;
pub use enrollments::{Enrollment, EnrollmentStatus};
pub use error::EngineError;
pub use lifecycle::{Action, EnrollmentState, StatusRequest, Transition, allowed_actions};
pub use money::Money;
pub use ops::{DEFAULT_PORTAL_URL, DatabaseStore, Engine, EngineBuilder, TransitionOutcome};
pub use patient_drugs::PatientDrug;
pub use programs::{Program, ProgramStatus};
pub use providers::Provider;
pub use session::{ProgramView, SessionState};
pub use store::{ProgramFilter, Store};

pub mod calendar;
mod care_team;
pub mod clinic_providers;
pub mod clinics;
pub mod commands;
pub mod cost;
pub mod drugs;
pub mod enrollments;
mod error;
pub mod lifecycle;
mod money;
mod ops;
pub mod patient_clinics;
pub mod patient_drugs;
pub mod patient_programs;
pub mod patient_providers;
pub mod programs;
pub mod providers;
mod session;
mod store;

pub type ResultEngine<T> = Result<T, EngineError>;
