use crate::{EngineError, ResultEngine, care_team::CareTeam, session::SessionState, store::Store};

use super::Engine;

impl<S: Store> Engine<S> {
    /// Sets the patient's clinic, replacing the previous one.
    ///
    /// The first provider of the clinic becomes the patient's provider in the
    /// same write. A clinic without providers keeps the current provider.
    pub async fn select_clinic(
        &self,
        session: &mut SessionState,
        clinic_id: &str,
    ) -> ResultEngine<CareTeam> {
        let clinic = self
            .store
            .load_clinic(clinic_id)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(clinic_id.to_string()))?;
        let provider_id = self
            .store
            .clinic_provider_ids(&clinic.id)
            .await?
            .into_iter()
            .next();

        let saved = self
            .store
            .replace_patient_clinic(session.user_id(), &clinic.id, provider_id.as_deref())
            .await?;
        tracing::info!(
            user_id = session.user_id(),
            clinic_id = %clinic.id,
            provider_id = ?provider_id,
            "clinic selected"
        );

        session.set_care_team(saved.clone());
        self.refresh_after_write(session).await;
        Ok(saved)
    }

    /// Sets the patient's provider, replacing the previous one. The clinic is
    /// left as it is.
    pub async fn select_provider(
        &self,
        session: &mut SessionState,
        provider_id: &str,
    ) -> ResultEngine<CareTeam> {
        let provider = self
            .store
            .load_provider(provider_id)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(provider_id.to_string()))?;

        let saved = self
            .store
            .replace_patient_provider(session.user_id(), &provider.id)
            .await?;
        tracing::info!(
            user_id = session.user_id(),
            provider_id = %provider.id,
            "provider selected"
        );

        session.set_care_team(saved.clone());
        self.refresh_after_write(session).await;
        Ok(saved)
    }

    /// Removes the patient's clinic. Returns whether there was one.
    pub async fn remove_clinic(&self, session: &mut SessionState) -> ResultEngine<bool> {
        let removed = self.store.remove_patient_clinic(session.user_id()).await?;
        if removed {
            tracing::info!(user_id = session.user_id(), "clinic removed");
        }

        session.set_care_team(session.care_team().clone().without_clinic());
        self.refresh_after_write(session).await;
        Ok(removed)
    }

    /// Removes the patient's provider. Returns whether there was one.
    pub async fn remove_provider(&self, session: &mut SessionState) -> ResultEngine<bool> {
        let removed = self
            .store
            .remove_patient_provider(session.user_id())
            .await?;
        if removed {
            tracing::info!(user_id = session.user_id(), "provider removed");
        }

        session.set_care_team(session.care_team().clone().without_provider());
        self.refresh_after_write(session).await;
        Ok(removed)
    }
}
