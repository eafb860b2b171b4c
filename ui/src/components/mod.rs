pub mod access_denied;
pub mod can;
pub mod error_banner;
pub mod layout;
pub mod login_form;
pub mod require_auth;
pub mod require_permission;
pub mod timestamp_display;

pub use access_denied::AccessDenied;
pub use can::Can;
pub use error_banner::ErrorBanner;
pub use login_form::LoginForm;
pub use require_auth::RequireAuth;
pub use require_permission::RequirePermission;
pub use timestamp_display::TimestampDisplay;
