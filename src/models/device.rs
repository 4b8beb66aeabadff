use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain::{Device, DeviceStatus, DomainError};
use crate::utils::time::parse_timestamp;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "devices")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    /// Externally assigned identifier (TISID)
    #[sea_orm(unique)]
    pub tis_id: String,
    pub category_id: i32,
    pub details: Option<String>,
    pub notes: Option<String>,
    /// Availability status.
    /// Valid values:
    /// - `available`: On the shelf, can be loaned
    /// - `loaned`: Held by an open loan
    /// - `retired`: Withdrawn from circulation
    /// - `damaged`: Returned damaged
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::device_category::Entity",
        from = "Column::CategoryId",
        to = "super::device_category::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    DeviceCategory,
    #[sea_orm(has_many = "super::loan::Entity")]
    Loan,
}

impl Related<super::device_category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DeviceCategory.def()
    }
}

impl Related<super::loan::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Loan.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn device_status(&self) -> Result<DeviceStatus, DomainError> {
        self.status.parse().map_err(|_| {
            DomainError::Database(format!(
                "device {} has unknown status '{}'",
                self.id, self.status
            ))
        })
    }
}

impl TryFrom<Model> for Device {
    type Error = DomainError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let status = model.device_status()?;
        Ok(Self {
            id: model.id,
            name: model.name,
            tis_id: model.tis_id,
            category_id: model.category_id,
            category_name: None,
            details: model.details,
            notes: model.notes,
            status,
            created_at: parse_timestamp(&model.created_at)?,
            updated_at: parse_timestamp(&model.updated_at)?,
        })
    }
}
