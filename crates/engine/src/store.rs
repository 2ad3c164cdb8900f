//! Persistence boundary of the engine.
//!
//! [`Store`] is the only way the engine reaches records. The bundled
//! implementation is [`crate::DatabaseStore`]; tests plug in their own.

use std::{collections::BTreeSet, future::Future};

use chrono::NaiveDate;

use crate::{
    ResultEngine, care_team::CareTeam, clinics::Clinic, drugs::Drug, enrollments::Enrollment,
    patient_drugs::PatientDrug, programs::Program, providers::Provider,
};

/// Which catalog programs to load.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ProgramFilter {
    #[default]
    All,
    /// Only these ids. An empty set loads nothing.
    Ids(BTreeSet<String>),
}

impl ProgramFilter {
    #[must_use]
    pub fn ids<I, T>(ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self::Ids(ids.into_iter().map(Into::into).collect())
    }

    #[must_use]
    pub fn matches(&self, program_id: &str) -> bool {
        match self {
            Self::All => true,
            Self::Ids(ids) => ids.contains(program_id),
        }
    }
}

/// Record access used by [`crate::Engine`].
///
/// Loads return `Ok(None)` for a missing record; every write is atomic.
pub trait Store: Send + Sync {
    /// Catalog programs matching `filter`, ordered by name.
    fn load_programs(
        &self,
        filter: &ProgramFilter,
    ) -> impl Future<Output = ResultEngine<Vec<Program>>> + Send;

    /// Ids of the programs assigned to `user_id`.
    fn assigned_program_ids(
        &self,
        user_id: &str,
    ) -> impl Future<Output = ResultEngine<BTreeSet<String>>> + Send;

    fn load_enrollment(
        &self,
        user_id: &str,
        program_id: &str,
    ) -> impl Future<Output = ResultEngine<Option<Enrollment>>> + Send;

    fn load_enrollments(
        &self,
        user_id: &str,
    ) -> impl Future<Output = ResultEngine<Vec<Enrollment>>> + Send;

    /// Inserts or updates the enrollment of `(user_id, program_id)`.
    ///
    /// The stored id is kept when a record already exists; the returned value
    /// is the record as persisted.
    fn upsert_enrollment(
        &self,
        enrollment: &Enrollment,
    ) -> impl Future<Output = ResultEngine<Enrollment>> + Send;

    fn load_patient_drug(
        &self,
        user_id: &str,
    ) -> impl Future<Output = ResultEngine<Option<PatientDrug>>> + Send;

    fn load_drug(&self, drug_id: &str) -> impl Future<Output = ResultEngine<Option<Drug>>> + Send;

    /// Replaces whatever medication the patient had with `patient_drug`.
    fn replace_patient_drug(
        &self,
        patient_drug: &PatientDrug,
    ) -> impl Future<Output = ResultEngine<PatientDrug>> + Send;

    /// Sets the refill date of the patient's medication.
    ///
    /// Returns `Ok(None)` when the patient has none.
    fn update_refill_date(
        &self,
        user_id: &str,
        refill_date: Option<NaiveDate>,
    ) -> impl Future<Output = ResultEngine<Option<PatientDrug>>> + Send;

    /// Returns whether a medication was removed.
    fn remove_patient_drug(&self, user_id: &str) -> impl Future<Output = ResultEngine<bool>> + Send;

    fn load_clinic(
        &self,
        clinic_id: &str,
    ) -> impl Future<Output = ResultEngine<Option<Clinic>>> + Send;

    fn load_provider(
        &self,
        provider_id: &str,
    ) -> impl Future<Output = ResultEngine<Option<Provider>>> + Send;

    /// Ids of the providers practicing at `clinic_id`, in ascending order.
    fn clinic_provider_ids(
        &self,
        clinic_id: &str,
    ) -> impl Future<Output = ResultEngine<Vec<String>>> + Send;

    fn load_care_team(&self, user_id: &str) -> impl Future<Output = ResultEngine<CareTeam>> + Send;

    /// Replaces the patient's clinic and, when `provider_id` is given, their
    /// provider in the same write.
    fn replace_patient_clinic(
        &self,
        user_id: &str,
        clinic_id: &str,
        provider_id: Option<&str>,
    ) -> impl Future<Output = ResultEngine<CareTeam>> + Send;

    fn replace_patient_provider(
        &self,
        user_id: &str,
        provider_id: &str,
    ) -> impl Future<Output = ResultEngine<CareTeam>> + Send;

    /// Returns whether a clinic was removed. The provider is kept.
    fn remove_patient_clinic(&self, user_id: &str)
    -> impl Future<Output = ResultEngine<bool>> + Send;

    /// Returns whether a provider was removed. The clinic is kept.
    fn remove_patient_provider(
        &self,
        user_id: &str,
    ) -> impl Future<Output = ResultEngine<bool>> + Send;
}
