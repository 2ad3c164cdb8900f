//! Where and by whom a patient is treated.
//!
//! The clinic and the provider are stored as two independent links: removing
//! the clinic keeps the provider, and a provider may be picked outside the
//! clinic.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CareTeam {
    pub clinic_id: Option<String>,
    pub provider_id: Option<String>,
}

impl CareTeam {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clinic_id.is_none() && self.provider_id.is_none()
    }

    #[must_use]
    pub fn without_clinic(self) -> Self {
        Self {
            clinic_id: None,
            ..self
        }
    }

    #[must_use]
    pub fn without_provider(self) -> Self {
        Self {
            provider_id: None,
            ..self
        }
    }
}
