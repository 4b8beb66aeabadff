//! SeaORM implementation of LoanDetailRepository

use async_trait::async_trait;
use sea_orm::{ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

use crate::domain::{DomainError, LoanDetail, LoanDetailFilter, LoanDetailRepository};
use crate::models::loan_detail::{Column, Entity as LoanDetailEntity};

/// SeaORM-based implementation of LoanDetailRepository
pub struct SeaOrmLoanDetailRepository {
    db: DatabaseConnection,
}

impl SeaOrmLoanDetailRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl LoanDetailRepository for SeaOrmLoanDetailRepository {
    async fn find_all(&self, filter: LoanDetailFilter) -> Result<Vec<LoanDetail>, DomainError> {
        let mut condition = Condition::all();

        if let Some(loan_id) = filter.loan_id {
            condition = condition.add(Column::LoanId.eq(loan_id));
        }

        if let Some(patron_id) = filter.patron_id {
            condition = condition.add(Column::PatronId.eq(patron_id));
        }

        LoanDetailEntity::find()
            .filter(condition)
            .order_by_desc(Column::CheckOutDate)
            .all(&self.db)
            .await?
            .into_iter()
            .map(LoanDetail::try_from)
            .collect()
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<LoanDetail>, DomainError> {
        LoanDetailEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(LoanDetail::try_from)
            .transpose()
    }

    async fn find_by_loan_id(&self, loan_id: i32) -> Result<Option<LoanDetail>, DomainError> {
        LoanDetailEntity::find()
            .filter(Column::LoanId.eq(loan_id))
            .one(&self.db)
            .await?
            .map(LoanDetail::try_from)
            .transpose()
    }
}
