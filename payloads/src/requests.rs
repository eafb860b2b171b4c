use crate::{
    AppointmentId, CustomerId, ServiceId, VaccinationPlanId, VaccineLotId,
    responses::{AppointmentStatus, InventorySlipKind},
};
use jiff::{Timestamp, civil::Date};
use serde::{Deserialize, Serialize};

pub const PASSWORD_MIN_LEN: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

impl LoginCredentials {
    /// Check the form input before it is sent.
    pub fn validate(&self) -> Result<(), String> {
        if self.email.trim().is_empty() || self.password.is_empty() {
            return Err("Please enter both email and password".to_string());
        }
        if !self.email.contains('@') {
            return Err("Please enter a valid email address".to_string());
        }
        if self.password.chars().count() < PASSWORD_MIN_LEN {
            return Err(format!(
                "Password must be at least {PASSWORD_MIN_LEN} characters"
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshToken {
    pub refresh_token: String,
}

/// Query filter for listing appointments. `None` fields are left out of the
/// query string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentFilter {
    pub status: Option<AppointmentStatus>,
    pub customer_id: Option<CustomerId>,
    pub from: Option<Date>,
    pub to: Option<Date>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterAppointment {
    pub service_id: ServiceId,
    pub scheduled_at: Timestamp,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanFilter {
    pub customer_id: Option<CustomerId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordDose {
    pub plan_id: VaccinationPlanId,
    pub dose_number: u32,
    pub vaccine_lot_id: VaccineLotId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInventorySlip {
    pub kind: InventorySlipKind,
    pub vaccine_lot_id: VaccineLotId,
    pub quantity: u32,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatisticsRange {
    pub from: Option<Date>,
    pub to: Option<Date>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Cash,
    Card,
    BankTransfer,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePayment {
    pub appointment_id: AppointmentId,
    pub method: PaymentMethod,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials(email: &str, password: &str) -> LoginCredentials {
        LoginCredentials {
            email: email.into(),
            password: password.into(),
        }
    }

    #[test]
    fn login_validation() {
        assert!(credentials("a@clinic.vn", "secret").validate().is_ok());
        assert!(credentials("", "secret").validate().is_err());
        assert!(credentials("a@clinic.vn", "").validate().is_err());
        assert_eq!(
            credentials("clinic.vn", "secret").validate(),
            Err("Please enter a valid email address".to_string())
        );
        assert_eq!(
            credentials("a@clinic.vn", "12345").validate(),
            Err("Password must be at least 6 characters".to_string())
        );
    }
}
