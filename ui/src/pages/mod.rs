pub mod appointments;
pub mod home;
pub mod inventory;
pub mod not_found;
pub mod services;
pub mod sign_in;
pub mod statistics;
pub mod unauthorized;
pub mod vaccination_plans;

pub use appointments::AppointmentsPage;
pub use home::HomePage;
pub use inventory::InventoryPage;
pub use not_found::NotFoundPage;
pub use services::ServicesPage;
pub use sign_in::SignInPage;
pub use statistics::StatisticsPage;
pub use unauthorized::UnauthorizedPage;
pub use vaccination_plans::VaccinationPlansPage;
