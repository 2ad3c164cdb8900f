use std::collections::BTreeSet;

use chrono::NaiveDate;
use sea_orm::{
    ActiveValue, ConnectionTrait, DatabaseConnection, QueryFilter, QueryOrder, TransactionTrait,
    prelude::*,
};

use crate::{
    ResultEngine,
    care_team::CareTeam,
    clinic_providers,
    clinics::{self, Clinic},
    drugs::{self, Drug},
    enrollments::{self, Enrollment},
    patient_clinics,
    patient_drugs::{self, PatientDrug},
    patient_programs, patient_providers,
    programs::{self, Program},
    providers::{self, Provider},
    store::{ProgramFilter, Store},
};

use super::with_tx;

/// [`Store`] over a sea-orm connection.
#[derive(Clone, Debug)]
pub struct DatabaseStore {
    database: DatabaseConnection,
}

impl DatabaseStore {
    pub fn new(database: DatabaseConnection) -> Self {
        Self { database }
    }

    pub fn database(&self) -> &DatabaseConnection {
        &self.database
    }
}

impl Store for DatabaseStore {
    async fn load_programs(&self, filter: &ProgramFilter) -> ResultEngine<Vec<Program>> {
        let mut query = programs::Entity::find()
            .order_by_asc(programs::Column::Name)
            .order_by_asc(programs::Column::Id);
        if let ProgramFilter::Ids(ids) = filter {
            if ids.is_empty() {
                return Ok(Vec::new());
            }
            query = query.filter(programs::Column::Id.is_in(ids.iter().cloned()));
        }
        let models = query.all(&self.database).await?;
        Ok(models.into_iter().map(Program::from).collect())
    }

    async fn assigned_program_ids(&self, user_id: &str) -> ResultEngine<BTreeSet<String>> {
        let rows = patient_programs::Entity::find()
            .filter(patient_programs::Column::UserId.eq(user_id))
            .all(&self.database)
            .await?;
        Ok(rows.into_iter().map(|row| row.program_id).collect())
    }

    async fn load_enrollment(
        &self,
        user_id: &str,
        program_id: &str,
    ) -> ResultEngine<Option<Enrollment>> {
        enrollments::Entity::find()
            .filter(enrollments::Column::UserId.eq(user_id))
            .filter(enrollments::Column::ProgramId.eq(program_id))
            .one(&self.database)
            .await?
            .map(Enrollment::try_from)
            .transpose()
    }

    async fn load_enrollments(&self, user_id: &str) -> ResultEngine<Vec<Enrollment>> {
        enrollments::Entity::find()
            .filter(enrollments::Column::UserId.eq(user_id))
            .all(&self.database)
            .await?
            .into_iter()
            .map(Enrollment::try_from)
            .collect()
    }

    async fn upsert_enrollment(&self, enrollment: &Enrollment) -> ResultEngine<Enrollment> {
        with_tx!(self, |db_tx| {
            let existing = enrollments::Entity::find()
                .filter(enrollments::Column::UserId.eq(enrollment.user_id.as_str()))
                .filter(enrollments::Column::ProgramId.eq(enrollment.program_id.as_str()))
                .one(&db_tx)
                .await?;

            // Upsert: the (user, program) pair keeps its first id and creation time.
            let model = match existing {
                Some(row) => {
                    let mut active = enrollments::ActiveModel::from(enrollment);
                    active.id = ActiveValue::Unchanged(row.id);
                    active.enrolled_at = ActiveValue::Unchanged(row.enrolled_at);
                    active.update(&db_tx).await?
                }
                None => enrollments::ActiveModel::from(enrollment).insert(&db_tx).await?,
            };
            Enrollment::try_from(model)
        })
    }

    async fn load_patient_drug(&self, user_id: &str) -> ResultEngine<Option<PatientDrug>> {
        let model = patient_drugs::Entity::find()
            .filter(patient_drugs::Column::UserId.eq(user_id))
            .one(&self.database)
            .await?;
        Ok(model.map(PatientDrug::from))
    }

    async fn load_drug(&self, drug_id: &str) -> ResultEngine<Option<Drug>> {
        let model = drugs::Entity::find_by_id(drug_id.to_string())
            .one(&self.database)
            .await?;
        Ok(model.map(Drug::from))
    }

    async fn replace_patient_drug(&self, patient_drug: &PatientDrug) -> ResultEngine<PatientDrug> {
        with_tx!(self, |db_tx| {
            patient_drugs::Entity::delete_many()
                .filter(patient_drugs::Column::UserId.eq(patient_drug.user_id.as_str()))
                .exec(&db_tx)
                .await?;
            let model = patient_drugs::ActiveModel::from(patient_drug)
                .insert(&db_tx)
                .await?;
            Ok(PatientDrug::from(model))
        })
    }

    async fn update_refill_date(
        &self,
        user_id: &str,
        refill_date: Option<NaiveDate>,
    ) -> ResultEngine<Option<PatientDrug>> {
        with_tx!(self, |db_tx| {
            let existing = patient_drugs::Entity::find()
                .filter(patient_drugs::Column::UserId.eq(user_id))
                .one(&db_tx)
                .await?;
            match existing {
                Some(row) => {
                    let mut active: patient_drugs::ActiveModel = row.into();
                    active.refill_date = ActiveValue::Set(refill_date);
                    let model = active.update(&db_tx).await?;
                    Ok(Some(PatientDrug::from(model)))
                }
                None => Ok(None),
            }
        })
    }

    async fn remove_patient_drug(&self, user_id: &str) -> ResultEngine<bool> {
        let result = patient_drugs::Entity::delete_many()
            .filter(patient_drugs::Column::UserId.eq(user_id))
            .exec(&self.database)
            .await?;
        Ok(result.rows_affected > 0)
    }

    async fn load_clinic(&self, clinic_id: &str) -> ResultEngine<Option<Clinic>> {
        let model = clinics::Entity::find_by_id(clinic_id.to_string())
            .one(&self.database)
            .await?;
        Ok(model.map(Clinic::from))
    }

    async fn load_provider(&self, provider_id: &str) -> ResultEngine<Option<Provider>> {
        let model = providers::Entity::find_by_id(provider_id.to_string())
            .one(&self.database)
            .await?;
        Ok(model.map(Provider::from))
    }

    async fn clinic_provider_ids(&self, clinic_id: &str) -> ResultEngine<Vec<String>> {
        let rows = clinic_providers::Entity::find()
            .filter(clinic_providers::Column::ClinicId.eq(clinic_id))
            .order_by_asc(clinic_providers::Column::ProviderId)
            .all(&self.database)
            .await?;
        Ok(rows.into_iter().map(|row| row.provider_id).collect())
    }

    async fn load_care_team(&self, user_id: &str) -> ResultEngine<CareTeam> {
        care_team(&self.database, user_id).await
    }

    async fn replace_patient_clinic(
        &self,
        user_id: &str,
        clinic_id: &str,
        provider_id: Option<&str>,
    ) -> ResultEngine<CareTeam> {
        with_tx!(self, |db_tx| {
            patient_clinics::Entity::delete_many()
                .filter(patient_clinics::Column::UserId.eq(user_id))
                .exec(&db_tx)
                .await?;
            patient_clinics::ActiveModel {
                user_id: ActiveValue::Set(user_id.to_string()),
                clinic_id: ActiveValue::Set(clinic_id.to_string()),
            }
            .insert(&db_tx)
            .await?;
            if let Some(provider_id) = provider_id {
                set_provider(&db_tx, user_id, provider_id).await?;
            }
            care_team(&db_tx, user_id).await
        })
    }

    async fn replace_patient_provider(
        &self,
        user_id: &str,
        provider_id: &str,
    ) -> ResultEngine<CareTeam> {
        with_tx!(self, |db_tx| {
            set_provider(&db_tx, user_id, provider_id).await?;
            care_team(&db_tx, user_id).await
        })
    }

    async fn remove_patient_clinic(&self, user_id: &str) -> ResultEngine<bool> {
        let result = patient_clinics::Entity::delete_many()
            .filter(patient_clinics::Column::UserId.eq(user_id))
            .exec(&self.database)
            .await?;
        Ok(result.rows_affected > 0)
    }

    async fn remove_patient_provider(&self, user_id: &str) -> ResultEngine<bool> {
        let result = patient_providers::Entity::delete_many()
            .filter(patient_providers::Column::UserId.eq(user_id))
            .exec(&self.database)
            .await?;
        Ok(result.rows_affected > 0)
    }
}

async fn care_team<C: ConnectionTrait>(db: &C, user_id: &str) -> ResultEngine<CareTeam> {
    let clinic = patient_clinics::Entity::find_by_id(user_id.to_string())
        .one(db)
        .await?;
    let provider = patient_providers::Entity::find_by_id(user_id.to_string())
        .one(db)
        .await?;
    Ok(CareTeam {
        clinic_id: clinic.map(|row| row.clinic_id),
        provider_id: provider.map(|row| row.provider_id),
    })
}

/// Replaces the provider link of `user_id`.
async fn set_provider<C: ConnectionTrait>(
    db: &C,
    user_id: &str,
    provider_id: &str,
) -> Result<(), DbErr> {
    patient_providers::Entity::delete_many()
        .filter(patient_providers::Column::UserId.eq(user_id))
        .exec(db)
        .await?;
    patient_providers::ActiveModel {
        user_id: ActiveValue::Set(user_id.to_string()),
        provider_id: ActiveValue::Set(provider_id.to_string()),
    }
    .insert(db)
    .await?;
    Ok(())
}
