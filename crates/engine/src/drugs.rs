//! Drug catalog (read-only for the engine).
//!
//! Prices are stored as integer cents.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::Money;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Drug {
    pub id: String,
    pub name: String,
    pub weekly_price: Money,
    pub monthly_price: Money,
    pub yearly_price: Money,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "drugs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub weekly_price: i64,
    pub monthly_price: i64,
    pub yearly_price: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Drug {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            weekly_price: Money::new(model.weekly_price),
            monthly_price: Money::new(model.monthly_price),
            yearly_price: Money::new(model.yearly_price),
        }
    }
}
