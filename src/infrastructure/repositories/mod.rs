//! Repository implementations using SeaORM

pub mod category_repository;
pub mod device_repository;
pub mod loan_detail_repository;
pub mod loan_repository;

pub use category_repository::SeaOrmCategoryRepository;
pub use device_repository::SeaOrmDeviceRepository;
pub use loan_detail_repository::SeaOrmLoanDetailRepository;
pub use loan_repository::SeaOrmLoanRepository;
