use crate::{
    CareTeam, Enrollment, PatientDrug, Program, ResultEngine,
    session::SessionState,
    store::{ProgramFilter, Store},
};

use super::Engine;

type Collections = (Vec<Program>, Vec<Enrollment>, Option<PatientDrug>, CareTeam);

impl<S: Store> Engine<S> {
    /// Loads the collections of `user_id` into a fresh session ("login").
    pub async fn open_session(&self, user_id: &str) -> ResultEngine<SessionState> {
        let (programs, enrollments, patient_drug, care_team) =
            self.load_collections(user_id).await?;
        tracing::info!(
            user_id,
            programs = programs.len(),
            enrollments = enrollments.len(),
            "session opened"
        );
        let mut session = SessionState::new(user_id, programs, enrollments, patient_drug);
        session.set_care_team(care_team);
        Ok(session)
    }

    /// Reloads every cached collection of `session`.
    ///
    /// On error the session is left as it was.
    pub async fn refresh(&self, session: &mut SessionState) -> ResultEngine<()> {
        let (programs, enrollments, patient_drug, care_team) =
            self.load_collections(session.user_id()).await?;
        session.reconcile(programs, enrollments, patient_drug, care_team);
        Ok(())
    }

    /// Ends the session ("logout"); its caches are dropped.
    pub fn close_session(&self, session: SessionState) {
        tracing::info!(user_id = session.user_id(), "session closed");
    }

    async fn load_collections(&self, user_id: &str) -> ResultEngine<Collections> {
        let assigned = self.store.assigned_program_ids(user_id).await?;
        let programs = self
            .store
            .load_programs(&ProgramFilter::Ids(assigned))
            .await?;
        let enrollments = self.store.load_enrollments(user_id).await?;
        let patient_drug = self.store.load_patient_drug(user_id).await?;
        let care_team = self.store.load_care_team(user_id).await?;
        Ok((programs, enrollments, patient_drug, care_team))
    }

    /// Runs `refresh`, downgrading a failure to a warning.
    ///
    /// Used after a successful write: the session was already patched with
    /// the written record, so it stays consistent with the store.
    pub(super) async fn refresh_after_write(&self, session: &mut SessionState) {
        if let Err(err) = self.refresh(session).await {
            tracing::warn!(
                user_id = session.user_id(),
                error = %err,
                "reload after write failed, keeping patched session"
            );
        }
    }
}
