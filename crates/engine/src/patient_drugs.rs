//! The medication a patient is currently taking.
//!
//! A patient has at most one `PatientDrug`. Prices are a snapshot of the
//! catalog [`Drug`] taken when the medication was selected; changing the
//! selection replaces the whole record instead of updating it.

use chrono::NaiveDate;
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, Money, ResultEngine, drugs::Drug};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientDrug {
    pub id: String,
    pub user_id: String,
    pub drug_id: String,
    pub refill_date: Option<NaiveDate>,
    pub weekly_price: Money,
    pub monthly_price: Money,
    pub yearly_price: Money,
}

impl PatientDrug {
    /// Snapshots the catalog prices of `drug` for `user_id`.
    ///
    /// Fails with [`EngineError::InvalidAmount`] if the catalog holds a
    /// negative price.
    pub fn snapshot(
        user_id: &str,
        drug: &Drug,
        refill_date: Option<NaiveDate>,
    ) -> ResultEngine<Self> {
        for (label, price) in [
            ("weekly", drug.weekly_price),
            ("monthly", drug.monthly_price),
            ("yearly", drug.yearly_price),
        ] {
            if price.is_negative() {
                return Err(EngineError::InvalidAmount(format!(
                    "{label} price of drug '{}' must be >= 0",
                    drug.id
                )));
            }
        }

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            drug_id: drug.id.clone(),
            refill_date,
            weekly_price: drug.weekly_price,
            monthly_price: drug.monthly_price,
            yearly_price: drug.yearly_price,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "patient_drugs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub user_id: String,
    pub drug_id: String,
    pub refill_date: Option<Date>,
    pub weekly_price: i64,
    pub monthly_price: i64,
    pub yearly_price: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for PatientDrug {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            drug_id: model.drug_id,
            refill_date: model.refill_date,
            weekly_price: Money::new(model.weekly_price),
            monthly_price: Money::new(model.monthly_price),
            yearly_price: Money::new(model.yearly_price),
        }
    }
}

impl From<&PatientDrug> for ActiveModel {
    fn from(value: &PatientDrug) -> Self {
        Self {
            id: ActiveValue::Set(value.id.clone()),
            user_id: ActiveValue::Set(value.user_id.clone()),
            drug_id: ActiveValue::Set(value.drug_id.clone()),
            refill_date: ActiveValue::Set(value.refill_date),
            weekly_price: ActiveValue::Set(value.weekly_price.cents()),
            monthly_price: ActiveValue::Set(value.monthly_price.cents()),
            yearly_price: ActiveValue::Set(value.yearly_price.cents()),
        }
    }
}
