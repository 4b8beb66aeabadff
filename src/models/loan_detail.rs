use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, LoanDetail};
use crate::utils::time::parse_timestamp;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "loan_details")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub loan_id: i32,
    pub patron_id: String,
    pub check_out_date: String,
    pub notes: Option<String>,
    pub late: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::loan::Entity",
        from = "Column::LoanId",
        to = "super::loan::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Loan,
}

impl Related<super::loan::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Loan.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for LoanDetail {
    type Error = DomainError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            loan_id: model.loan_id,
            patron_id: model.patron_id,
            check_out_date: parse_timestamp(&model.check_out_date)?,
            notes: model.notes,
            late: model.late,
        })
    }
}
