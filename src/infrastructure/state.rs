//! Application state containing repositories and shared resources

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::domain::{
    CategoryRepository, DeviceRepository, LoanDetailRepository, LoanRepository,
};
use crate::infrastructure::{
    SeaOrmCategoryRepository, SeaOrmDeviceRepository, SeaOrmLoanDetailRepository,
    SeaOrmLoanRepository,
};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection, handed to the lifecycle services
    db: DatabaseConnection,
    /// Category repository
    pub category_repo: Arc<dyn CategoryRepository>,
    /// Device repository
    pub device_repo: Arc<dyn DeviceRepository>,
    /// Loan repository
    pub loan_repo: Arc<dyn LoanRepository>,
    /// Loan detail (check-out record) repository
    pub loan_detail_repo: Arc<dyn LoanDetailRepository>,
}

impl AppState {
    /// Create a new AppState with all repositories initialized
    pub fn new(db: DatabaseConnection) -> Self {
        let category_repo = Arc::new(SeaOrmCategoryRepository::new(db.clone()));
        let device_repo = Arc::new(SeaOrmDeviceRepository::new(db.clone()));
        let loan_repo = Arc::new(SeaOrmLoanRepository::new(db.clone()));
        let loan_detail_repo = Arc::new(SeaOrmLoanDetailRepository::new(db.clone()));

        Self {
            db,
            category_repo,
            device_repo,
            loan_repo,
            loan_detail_repo,
        }
    }

    /// Get the database connection
    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

