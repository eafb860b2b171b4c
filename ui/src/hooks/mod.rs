pub mod use_api;
pub mod use_appointments;
pub mod use_fetch;
pub mod use_inventory;
pub mod use_login;
pub mod use_logout;
pub mod use_permissions;
pub mod use_push_route;
pub mod use_refresh_profile;
pub mod use_require_auth;
pub mod use_services;
pub mod use_session;
pub mod use_statistics;
pub mod use_title;
pub mod use_vaccination_plans;

pub use use_api::{ApiHandle, use_api, use_api_with_params};
pub use use_appointments::{
    use_appointments, use_approve_appointment, use_cancel_appointment,
    use_create_payment, use_register_appointment,
};
pub use use_fetch::{FetchHookReturn, use_fetch};
pub use use_inventory::{use_create_inventory_slip, use_vaccine_lots};
pub use use_login::use_login;
pub use use_logout::use_logout;
pub use use_permissions::{PermissionSnapshot, use_permissions};
pub use use_push_route::use_push_route;
pub use use_refresh_profile::use_refresh_profile;
pub use use_require_auth::use_require_auth;
pub use use_services::{use_services, use_vaccines};
pub use use_session::use_session;
pub use use_statistics::use_statistics;
pub use use_title::use_title;
pub use use_vaccination_plans::{use_record_dose, use_vaccination_plans};
