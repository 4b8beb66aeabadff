use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain::{Category, DomainError};
use crate::utils::money::from_minor_units;
use crate::utils::time::parse_timestamp;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "device_categories")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    /// Late fee per started day, in cents
    pub daily_late_rate_cents: i64,
    /// Fixed fee charged when a device comes back damaged, in cents
    pub damage_fee_cents: i64,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::device::Entity")]
    Device,
}

impl Related<super::device::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Device.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Category {
    type Error = DomainError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            name: model.name,
            daily_late_rate: from_minor_units(model.daily_late_rate_cents),
            damage_fee: from_minor_units(model.damage_fee_cents),
            created_at: parse_timestamp(&model.created_at)?,
            updated_at: parse_timestamp(&model.updated_at)?,
        })
    }
}
