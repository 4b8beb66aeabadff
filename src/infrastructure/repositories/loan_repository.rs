//! SeaORM implementation of LoanRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

use crate::domain::{DomainError, Loan, LoanFilter, LoanRepository};
use crate::models::loan::{Column, Entity as LoanEntity};
use crate::utils::time::format_timestamp;

/// SeaORM-based implementation of LoanRepository
pub struct SeaOrmLoanRepository {
    db: DatabaseConnection,
}

impl SeaOrmLoanRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl LoanRepository for SeaOrmLoanRepository {
    async fn find_all(&self, filter: LoanFilter) -> Result<Vec<Loan>, DomainError> {
        let mut condition = Condition::all();

        match filter.open {
            Some(true) => condition = condition.add(Column::CheckInDate.is_null()),
            Some(false) => condition = condition.add(Column::CheckInDate.is_not_null()),
            None => {}
        }

        if let Some(device_id) = filter.device_id {
            condition = condition.add(Column::DeviceId.eq(device_id));
        }

        if let Some(course_id) = filter.course_id {
            condition = condition.add(Column::CourseId.eq(course_id));
        }

        LoanEntity::find()
            .filter(condition)
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(Loan::try_from)
            .collect()
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Loan>, DomainError> {
        LoanEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(Loan::try_from)
            .transpose()
    }

    async fn find_overdue(&self, now: DateTime<Utc>) -> Result<Vec<Loan>, DomainError> {
        // Stored timestamps sort chronologically as text
        LoanEntity::find()
            .filter(Column::CheckInDate.is_null())
            .filter(Column::DueDate.lt(format_timestamp(now)))
            .order_by_asc(Column::DueDate)
            .all(&self.db)
            .await?
            .into_iter()
            .map(Loan::try_from)
            .collect()
    }
}
