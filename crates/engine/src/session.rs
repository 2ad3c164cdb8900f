//! Per-patient view of the records, opened at login and dropped at logout.

use std::collections::HashMap;

use serde::Serialize;

use crate::{
    care_team::CareTeam,
    enrollments::Enrollment,
    lifecycle::{Action, EnrollmentState, allowed_actions},
    patient_drugs::PatientDrug,
    programs::Program,
};

/// Cached collections of one patient.
///
/// Built by [`crate::Engine::open_session`] and refreshed after every write.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SessionState {
    user_id: String,
    programs: Vec<Program>,
    enrollments: HashMap<String, Enrollment>,
    patient_drug: Option<PatientDrug>,
    care_team: CareTeam,
}

/// A program as shown to the patient.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProgramView<'a> {
    pub program: &'a Program,
    pub state: EnrollmentState,
    pub actions: &'static [Action],
    /// Savings are only shown for completed programs of a patient with a
    /// medication.
    pub show_cost_summary: bool,
}

impl SessionState {
    pub(crate) fn new(
        user_id: impl Into<String>,
        programs: Vec<Program>,
        enrollments: Vec<Enrollment>,
        patient_drug: Option<PatientDrug>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            programs,
            enrollments: index_enrollments(enrollments),
            patient_drug,
            care_team: CareTeam::default(),
        }
    }

    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    #[must_use]
    pub fn programs(&self) -> &[Program] {
        &self.programs
    }

    #[must_use]
    pub fn program(&self, program_id: &str) -> Option<&Program> {
        self.programs.iter().find(|p| p.id == program_id)
    }

    #[must_use]
    pub fn enrollment(&self, program_id: &str) -> Option<&Enrollment> {
        self.enrollments.get(program_id)
    }

    pub fn enrollments(&self) -> impl Iterator<Item = &Enrollment> {
        self.enrollments.values()
    }

    #[must_use]
    pub fn state(&self, program_id: &str) -> EnrollmentState {
        self.enrollment(program_id).into()
    }

    #[must_use]
    pub fn patient_drug(&self) -> Option<&PatientDrug> {
        self.patient_drug.as_ref()
    }

    #[must_use]
    pub fn care_team(&self) -> &CareTeam {
        &self.care_team
    }

    /// Programs in catalog order with their state and affordances.
    #[must_use]
    pub fn program_views(&self) -> Vec<ProgramView<'_>> {
        self.programs.iter().map(|p| self.view(p)).collect()
    }

    #[must_use]
    pub fn program_view(&self, program_id: &str) -> Option<ProgramView<'_>> {
        self.program(program_id).map(|p| self.view(p))
    }

    fn view<'a>(&'a self, program: &'a Program) -> ProgramView<'a> {
        let state = self.state(&program.id);
        ProgramView {
            program,
            state,
            actions: allowed_actions(state, program.status),
            show_cost_summary: matches!(state, EnrollmentState::Completed { .. })
                && self.patient_drug.is_some(),
        }
    }

    /// Replaces every cached collection.
    pub(crate) fn reconcile(
        &mut self,
        programs: Vec<Program>,
        enrollments: Vec<Enrollment>,
        patient_drug: Option<PatientDrug>,
        care_team: CareTeam,
    ) {
        self.programs = programs;
        self.enrollments = index_enrollments(enrollments);
        self.patient_drug = patient_drug;
        self.care_team = care_team;
    }

    pub(crate) fn replace_program(&mut self, program: Program) {
        match self.programs.iter_mut().find(|p| p.id == program.id) {
            Some(slot) => *slot = program,
            None => self.programs.push(program),
        }
    }

    pub(crate) fn replace_enrollment(&mut self, enrollment: Enrollment) {
        self.enrollments
            .insert(enrollment.program_id.clone(), enrollment);
    }

    pub(crate) fn set_patient_drug(&mut self, patient_drug: Option<PatientDrug>) {
        self.patient_drug = patient_drug;
    }

    pub(crate) fn set_care_team(&mut self, care_team: CareTeam) {
        self.care_team = care_team;
    }
}

fn index_enrollments(enrollments: Vec<Enrollment>) -> HashMap<String, Enrollment> {
    enrollments
        .into_iter()
        .map(|e| (e.program_id.clone(), e))
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Utc};

    use super::*;
    use crate::{Money, enrollments::EnrollmentStatus, programs::ProgramStatus};

    fn program(id: &str, status: ProgramStatus) -> Program {
        Program {
            id: id.to_string(),
            name: id.to_uppercase(),
            sponsor: "Acme".to_string(),
            monetary_cap: "$500".to_string(),
            description: String::new(),
            status,
            re_enrollment_date: None,
        }
    }

    fn enrollment(program_id: &str, status: EnrollmentStatus) -> Enrollment {
        let now = Utc.with_ymd_and_hms(2026, 10, 1, 12, 0, 0).unwrap();
        Enrollment::new("alice", program_id, status, now)
    }

    fn patient_drug() -> PatientDrug {
        PatientDrug {
            id: "pd1".to_string(),
            user_id: "alice".to_string(),
            drug_id: "d1".to_string(),
            refill_date: None,
            weekly_price: Money::ZERO,
            monthly_price: Money::ZERO,
            yearly_price: Money::from_dollars(1000),
        }
    }

    #[test]
    fn views_carry_state_and_actions() {
        let completed = EnrollmentStatus::Completed {
            on: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
        };
        let session = SessionState::new(
            "alice",
            vec![
                program("a", ProgramStatus::Open),
                program("b", ProgramStatus::Closed),
                program("c", ProgramStatus::Closed),
            ],
            vec![enrollment("c", completed)],
            Some(patient_drug()),
        );

        let views = session.program_views();
        assert_eq!(views[0].state, EnrollmentState::NotEnrolled);
        assert_eq!(views[0].actions.len(), 4);
        assert!(views[1].actions.is_empty());
        assert!(!views[1].show_cost_summary);
        assert_eq!(views[2].state, EnrollmentState::from(completed));
        assert!(views[2].show_cost_summary);
    }

    #[test]
    fn cost_summary_needs_a_drug() {
        let completed = EnrollmentStatus::Completed {
            on: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
        };
        let session = SessionState::new(
            "alice",
            vec![program("a", ProgramStatus::Open)],
            vec![enrollment("a", completed)],
            None,
        );
        assert!(!session.program_view("a").unwrap().show_cost_summary);
    }

    #[test]
    fn replace_enrollment_overrides_by_program() {
        let mut session = SessionState::new(
            "alice",
            vec![program("a", ProgramStatus::Open)],
            vec![enrollment("a", EnrollmentStatus::Enrolled)],
            None,
        );
        session.replace_enrollment(enrollment("a", EnrollmentStatus::Ongoing));

        assert_eq!(session.enrollments().count(), 1);
        assert_eq!(session.state("a"), EnrollmentState::Ongoing);
    }
}
