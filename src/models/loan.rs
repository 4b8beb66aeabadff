use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, Loan};
use crate::utils::money::from_minor_units;
use crate::utils::time::parse_timestamp;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "loans")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub device_id: i32,
    pub category_name: String,
    pub device_name: String,
    pub due_date: String,
    /// NULL while the loan is open
    pub check_in_date: Option<String>,
    pub notes: Option<String>,
    pub return_flag: bool,
    pub penalty_cents: i64,
    pub damaged_penalty_cents: i64,
    pub deduction_cents: i64,
    /// Category late rate captured when the loan was opened
    pub daily_late_rate_cents: i64,
    pub comments: Option<String>,
    pub course_id: i32,
    /// Check-out timestamp of the episode
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::device::Entity",
        from = "Column::DeviceId",
        to = "super::device::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Device,
    #[sea_orm(has_one = "super::loan_detail::Entity")]
    LoanDetail,
}

impl Related<super::device::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Device.def()
    }
}

impl Related<super::loan_detail::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LoanDetail.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Loan {
    type Error = DomainError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            device_id: model.device_id,
            category_name: model.category_name,
            device_name: model.device_name,
            due_date: parse_timestamp(&model.due_date)?,
            check_in_date: model
                .check_in_date
                .as_deref()
                .map(parse_timestamp)
                .transpose()?,
            notes: model.notes,
            return_flag: model.return_flag,
            penalty: from_minor_units(model.penalty_cents),
            damaged_penalty: from_minor_units(model.damaged_penalty_cents),
            deduction: from_minor_units(model.deduction_cents),
            daily_late_rate: from_minor_units(model.daily_late_rate_cents),
            comments: model.comments,
            course_id: model.course_id,
            created_at: parse_timestamp(&model.created_at)?,
            updated_at: parse_timestamp(&model.updated_at)?,
        })
    }
}
