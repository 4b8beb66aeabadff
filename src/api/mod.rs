pub mod category;
pub mod device;
pub mod error;
pub mod health;
pub mod loan;
pub mod loan_detail;

use axum::{
    routing::{get, put},
    Router,
};

use crate::infrastructure::AppState;

pub fn api_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Categories
        .route(
            "/categories",
            get(category::list_categories).post(category::create_category),
        )
        .route(
            "/categories/:id",
            get(category::get_category).delete(category::delete_category),
        )
        // Devices
        .route(
            "/devices",
            get(device::list_devices).post(device::register_device),
        )
        .route(
            "/devices/:id",
            get(device::get_device)
                .put(device::update_device)
                .delete(device::delete_device),
        )
        .route("/devices/:id/status", put(device::set_device_status))
        // Loans
        .route("/loans", get(loan::list_loans).post(loan::open_loan))
        .route("/loans/overdue", get(loan::list_overdue_loans))
        .route(
            "/loans/:id",
            get(loan::get_loan)
                .patch(loan::annotate_loan)
                .delete(loan::delete_loan),
        )
        .route("/loans/:id/return", put(loan::return_loan))
        // Check-out records
        .route("/loan-details", get(loan_detail::list_loan_details))
        .route(
            "/loan-details/:id",
            get(loan_detail::get_loan_detail).patch(loan_detail::annotate_loan_detail),
        )
        .with_state(state)
}
