pub mod device;
pub mod device_category;
pub mod loan;
pub mod loan_detail;
