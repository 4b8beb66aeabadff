use crate::api;
use crate::domain;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::health::health_check,
        api::category::list_categories,
        api::category::create_category,
        api::category::get_category,
        api::category::delete_category,
        api::device::list_devices,
        api::device::register_device,
        api::device::get_device,
        api::device::update_device,
        api::device::set_device_status,
        api::device::delete_device,
        api::loan::list_loans,
        api::loan::list_overdue_loans,
        api::loan::open_loan,
        api::loan::get_loan,
        api::loan::annotate_loan,
        api::loan::return_loan,
        api::loan::delete_loan,
        api::loan_detail::list_loan_details,
        api::loan_detail::get_loan_detail,
        api::loan_detail::annotate_loan_detail,
    ),
    components(
        schemas(
            domain::DeviceStatus,
            domain::LoanState,
            domain::Category,
            domain::CategoryInput,
            domain::Device,
            domain::RegisterDeviceInput,
            domain::UpdateDeviceInput,
            domain::Loan,
            domain::LoanDetail,
            domain::LoanReceipt,
            domain::DamageReport,
            domain::AnnotateLoanInput,
            domain::AnnotateLoanDetailInput,
            api::device::SetStatusRequest,
            api::loan::OpenLoanRequest,
            api::loan::CloseLoanRequest,
        )
    ),
    tags(
        (name = "device-loans", description = "Device loan tracking API")
    )
)]
pub struct ApiDoc;
