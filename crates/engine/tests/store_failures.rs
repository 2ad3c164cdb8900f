use std::{
    collections::BTreeSet,
    sync::{
        Mutex,
        atomic::{AtomicBool, Ordering},
    },
};

use chrono::{NaiveDate, TimeZone, Utc};

use engine::{
    CareTeam, Clinic, Drug, EngineError, Enrollment, EnrollmentState, EnrollmentStatus, Engine,
    PatientDrug, Program, ProgramFilter, ProgramStatus, Provider, ResultEngine, Store,
    TransitionCmd,
};

#[derive(Default)]
struct Records {
    programs: Vec<Program>,
    enrollments: Vec<Enrollment>,
    patient_drug: Option<PatientDrug>,
    clinics: Vec<Clinic>,
    clinic_providers: Vec<(String, String)>,
    care_team: CareTeam,
}

/// In-memory store whose writes and reloads can be made to fail.
#[derive(Default)]
struct MemoryStore {
    records: Mutex<Records>,
    fail_writes: AtomicBool,
    fail_reload: AtomicBool,
}

impl MemoryStore {
    fn with_program(status: ProgramStatus) -> Self {
        let store = Self::default();
        store.records.lock().unwrap().programs.push(Program {
            id: "p1".to_string(),
            name: "Copay Card".to_string(),
            sponsor: "Acme Pharma".to_string(),
            monetary_cap: "$300".to_string(),
            description: String::new(),
            status,
            re_enrollment_date: None,
        });
        store
    }

    fn with_clinic(self, clinic_id: &str, provider_id: &str) -> Self {
        {
            let mut records = self.records.lock().unwrap();
            records.clinics.push(Clinic {
                id: clinic_id.to_string(),
                name: clinic_id.to_uppercase(),
            });
            records
                .clinic_providers
                .push((clinic_id.to_string(), provider_id.to_string()));
        }
        self
    }

    fn stored(&self) -> Vec<Enrollment> {
        self.records.lock().unwrap().enrollments.clone()
    }

    fn check_write(&self) -> ResultEngine<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(EngineError::Persistence("store unavailable".to_string()));
        }
        Ok(())
    }
}

impl Store for MemoryStore {
    async fn load_programs(&self, filter: &ProgramFilter) -> ResultEngine<Vec<Program>> {
        let records = self.records.lock().unwrap();
        Ok(records
            .programs
            .iter()
            .filter(|p| filter.matches(&p.id))
            .cloned()
            .collect())
    }

    async fn assigned_program_ids(&self, _user_id: &str) -> ResultEngine<BTreeSet<String>> {
        let records = self.records.lock().unwrap();
        Ok(records.programs.iter().map(|p| p.id.clone()).collect())
    }

    async fn load_enrollment(
        &self,
        user_id: &str,
        program_id: &str,
    ) -> ResultEngine<Option<Enrollment>> {
        let records = self.records.lock().unwrap();
        Ok(records
            .enrollments
            .iter()
            .find(|e| e.user_id == user_id && e.program_id == program_id)
            .cloned())
    }

    async fn load_enrollments(&self, user_id: &str) -> ResultEngine<Vec<Enrollment>> {
        if self.fail_reload.load(Ordering::SeqCst) {
            return Err(EngineError::Persistence("reload failed".to_string()));
        }
        let records = self.records.lock().unwrap();
        Ok(records
            .enrollments
            .iter()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn upsert_enrollment(&self, enrollment: &Enrollment) -> ResultEngine<Enrollment> {
        self.check_write()?;
        let mut records = self.records.lock().unwrap();
        records.enrollments.retain(|e| {
            !(e.user_id == enrollment.user_id && e.program_id == enrollment.program_id)
        });
        records.enrollments.push(enrollment.clone());
        Ok(enrollment.clone())
    }

    async fn load_patient_drug(&self, _user_id: &str) -> ResultEngine<Option<PatientDrug>> {
        Ok(self.records.lock().unwrap().patient_drug.clone())
    }

    async fn load_drug(&self, _drug_id: &str) -> ResultEngine<Option<Drug>> {
        Ok(None)
    }

    async fn replace_patient_drug(&self, patient_drug: &PatientDrug) -> ResultEngine<PatientDrug> {
        self.check_write()?;
        self.records.lock().unwrap().patient_drug = Some(patient_drug.clone());
        Ok(patient_drug.clone())
    }

    async fn update_refill_date(
        &self,
        _user_id: &str,
        refill_date: Option<NaiveDate>,
    ) -> ResultEngine<Option<PatientDrug>> {
        self.check_write()?;
        let mut records = self.records.lock().unwrap();
        Ok(records.patient_drug.as_mut().map(|drug| {
            drug.refill_date = refill_date;
            drug.clone()
        }))
    }

    async fn remove_patient_drug(&self, _user_id: &str) -> ResultEngine<bool> {
        self.check_write()?;
        Ok(self.records.lock().unwrap().patient_drug.take().is_some())
    }

    async fn load_clinic(&self, clinic_id: &str) -> ResultEngine<Option<Clinic>> {
        let records = self.records.lock().unwrap();
        Ok(records.clinics.iter().find(|c| c.id == clinic_id).cloned())
    }

    async fn load_provider(&self, provider_id: &str) -> ResultEngine<Option<Provider>> {
        let records = self.records.lock().unwrap();
        Ok(records
            .clinic_providers
            .iter()
            .find(|(_, id)| id == provider_id)
            .map(|(_, id)| Provider {
                id: id.clone(),
                name: id.to_uppercase(),
            }))
    }

    async fn clinic_provider_ids(&self, clinic_id: &str) -> ResultEngine<Vec<String>> {
        let records = self.records.lock().unwrap();
        Ok(records
            .clinic_providers
            .iter()
            .filter(|(clinic, _)| clinic == clinic_id)
            .map(|(_, provider)| provider.clone())
            .collect())
    }

    async fn load_care_team(&self, _user_id: &str) -> ResultEngine<CareTeam> {
        Ok(self.records.lock().unwrap().care_team.clone())
    }

    async fn replace_patient_clinic(
        &self,
        _user_id: &str,
        clinic_id: &str,
        provider_id: Option<&str>,
    ) -> ResultEngine<CareTeam> {
        self.check_write()?;
        let mut records = self.records.lock().unwrap();
        records.care_team.clinic_id = Some(clinic_id.to_string());
        if let Some(provider_id) = provider_id {
            records.care_team.provider_id = Some(provider_id.to_string());
        }
        Ok(records.care_team.clone())
    }

    async fn replace_patient_provider(
        &self,
        _user_id: &str,
        provider_id: &str,
    ) -> ResultEngine<CareTeam> {
        self.check_write()?;
        let mut records = self.records.lock().unwrap();
        records.care_team.provider_id = Some(provider_id.to_string());
        Ok(records.care_team.clone())
    }

    async fn remove_patient_clinic(&self, _user_id: &str) -> ResultEngine<bool> {
        self.check_write()?;
        Ok(self.records.lock().unwrap().care_team.clinic_id.take().is_some())
    }

    async fn remove_patient_provider(&self, _user_id: &str) -> ResultEngine<bool> {
        self.check_write()?;
        Ok(self
            .records
            .lock()
            .unwrap()
            .care_team
            .provider_id
            .take()
            .is_some())
    }
}

fn now() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap()
}

#[tokio::test]
async fn failed_write_leaves_session_untouched() {
    let engine = Engine::with_store(MemoryStore::with_program(ProgramStatus::Open));
    let mut session = engine.open_session("alice").await.unwrap();
    let before = session.clone();

    engine.store().fail_writes.store(true, Ordering::SeqCst);
    let err = engine
        .apply_status(&mut session, TransitionCmd::enroll("p1", now()))
        .await
        .unwrap_err();

    assert_eq!(err, EngineError::Persistence("store unavailable".to_string()));
    assert!(!err.is_validation());
    assert_eq!(session, before);
    assert!(engine.store().stored().is_empty());
}

#[tokio::test]
async fn failed_reload_keeps_written_record() {
    let engine = Engine::with_store(MemoryStore::with_program(ProgramStatus::Open));
    let mut session = engine.open_session("alice").await.unwrap();

    engine.store().fail_reload.store(true, Ordering::SeqCst);
    let outcome = engine
        .apply_status(&mut session, TransitionCmd::ongoing("p1", now()))
        .await
        .unwrap();

    assert_eq!(outcome.enrollment.status, EnrollmentStatus::Ongoing);
    assert_eq!(session.state("p1"), EnrollmentState::Ongoing);
    assert_eq!(engine.store().stored(), vec![outcome.enrollment]);
}

#[tokio::test]
async fn refused_request_writes_nothing() {
    let engine = Engine::with_store(MemoryStore::with_program(ProgramStatus::Identified));
    let mut session = engine.open_session("alice").await.unwrap();

    let err = engine
        .apply_status(&mut session, TransitionCmd::reject("p1", now()))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        EngineError::ProgramNotOpen("program is identified".to_string())
    );
    assert!(engine.store().stored().is_empty());
}

#[tokio::test]
async fn custom_store_uses_default_portal() {
    let engine = Engine::with_store(MemoryStore::with_program(ProgramStatus::Open));
    let mut session = engine.open_session("alice").await.unwrap();

    let outcome = engine
        .apply_status(&mut session, TransitionCmd::enroll("p1", now()))
        .await
        .unwrap();
    assert_eq!(outcome.handoff_url.as_deref(), Some(engine.portal_url()));
}

#[tokio::test]
async fn failed_clinic_write_keeps_care_team() {
    let engine = Engine::with_store(
        MemoryStore::with_program(ProgramStatus::Open).with_clinic("c1", "dr1"),
    );
    let mut session = engine.open_session("alice").await.unwrap();

    engine.store().fail_writes.store(true, Ordering::SeqCst);
    let err = engine.select_clinic(&mut session, "c1").await.unwrap_err();
    assert_eq!(err, EngineError::Persistence("store unavailable".to_string()));
    assert!(session.care_team().is_empty());

    engine.store().fail_writes.store(false, Ordering::SeqCst);
    let team = engine.select_clinic(&mut session, "c1").await.unwrap();
    assert_eq!(team.provider_id.as_deref(), Some("dr1"));
    assert_eq!(session.care_team(), &team);
}
