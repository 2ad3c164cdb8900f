use chrono::NaiveDate;

use crate::{
    EngineError, ResultEngine, commands::SelectDrugCmd, patient_drugs::PatientDrug,
    session::SessionState, store::Store,
};

use super::Engine;

impl<S: Store> Engine<S> {
    /// Selects the patient's medication, snapshotting the catalog prices.
    ///
    /// Any previous medication is replaced.
    pub async fn select_drug(
        &self,
        session: &mut SessionState,
        cmd: SelectDrugCmd,
    ) -> ResultEngine<PatientDrug> {
        let drug = self
            .store
            .load_drug(&cmd.drug_id)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(cmd.drug_id.clone()))?;
        let patient_drug = PatientDrug::snapshot(session.user_id(), &drug, cmd.refill_date)?;

        let saved = self.store.replace_patient_drug(&patient_drug).await?;
        tracing::info!(
            user_id = session.user_id(),
            drug_id = %saved.drug_id,
            "medication selected"
        );

        session.set_patient_drug(Some(saved.clone()));
        self.refresh_after_write(session).await;
        Ok(saved)
    }

    /// Sets or clears the refill date of the patient's medication.
    pub async fn set_refill_date(
        &self,
        session: &mut SessionState,
        refill_date: Option<NaiveDate>,
    ) -> ResultEngine<PatientDrug> {
        let saved = self
            .store
            .update_refill_date(session.user_id(), refill_date)
            .await?
            .ok_or_else(|| {
                EngineError::KeyNotFound(format!("medication of {}", session.user_id()))
            })?;
        tracing::info!(
            user_id = session.user_id(),
            refill_date = ?saved.refill_date,
            "refill date updated"
        );

        session.set_patient_drug(Some(saved.clone()));
        self.refresh_after_write(session).await;
        Ok(saved)
    }

    /// Removes the patient's medication. Returns whether there was one.
    pub async fn remove_drug(&self, session: &mut SessionState) -> ResultEngine<bool> {
        let removed = self.store.remove_patient_drug(session.user_id()).await?;
        if removed {
            tracing::info!(user_id = session.user_id(), "medication removed");
        }

        session.set_patient_drug(None);
        self.refresh_after_write(session).await;
        Ok(removed)
    }
}
