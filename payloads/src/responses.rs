use crate::{
    AppointmentId, CustomerId, InventorySlipId, PaymentId, Permissions,
    Resource, Role, ServiceId, UserId, VaccinationPlanId, VaccineId, VaccineLotId,
};
use jiff::{Timestamp, civil::Date};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Every successful backend response wraps its body in this envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub payload: T,
}

/// The signed-in user, as returned by `auth/me` and `auth/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub permissions: Permissions,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: UserInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub access_token: String,
    /// Some backends rotate refresh tokens, others keep the old one.
    pub refresh_token: Option<String>,
}

/// A vaccination service customers can book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: ServiceId,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    /// Number of doses in the full course.
    pub dose_count: u32,
    pub vaccine_ids: Vec<VaccineId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vaccine {
    pub id: VaccineId,
    pub name: String,
    pub manufacturer: String,
    pub price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaccineLot {
    pub id: VaccineLotId,
    pub vaccine_id: VaccineId,
    pub lot_number: String,
    pub quantity: u32,
    pub expires_on: Date,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentStatus {
    Pending,
    Approved,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub const ALL: [AppointmentStatus; 4] =
        [Self::Pending, Self::Approved, Self::Completed, Self::Cancelled];

    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: AppointmentId,
    pub customer_id: CustomerId,
    pub service_id: ServiceId,
    pub scheduled_at: Timestamp,
    pub status: AppointmentStatus,
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedDose {
    pub dose_number: u32,
    pub due_on: Date,
    pub administered_at: Option<Timestamp>,
    pub vaccine_lot_id: Option<VaccineLotId>,
}

/// A customer's multi-dose course for one service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaccinationPlan {
    pub id: VaccinationPlanId,
    pub customer_id: CustomerId,
    pub service_id: ServiceId,
    pub doses: Vec<PlannedDose>,
}

impl VaccinationPlan {
    pub fn next_dose(&self) -> Option<&PlannedDose> {
        self.doses.iter().find(|dose| dose.administered_at.is_none())
    }

    pub fn is_complete(&self) -> bool {
        self.next_dose().is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InventorySlipKind {
    Import,
    Export,
    Disposal,
}

impl InventorySlipKind {
    pub const ALL: [InventorySlipKind; 3] =
        [Self::Import, Self::Export, Self::Disposal];

    /// The permission resource that governs this kind of slip.
    pub fn resource(self) -> Resource {
        match self {
            Self::Import => Resource::PhieuNhap,
            Self::Export => Resource::PhieuXuat,
            Self::Disposal => Resource::PhieuHuy,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Import => "Import",
            Self::Export => "Export",
            Self::Disposal => "Disposal",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventorySlip {
    pub id: InventorySlipId,
    pub kind: InventorySlipKind,
    pub vaccine_lot_id: VaccineLotId,
    pub quantity: u32,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsOverview {
    pub appointments: u32,
    pub doses_administered: u32,
    pub new_customers: u32,
    pub revenue: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: PaymentId,
    pub appointment_id: AppointmentId,
    pub amount: Decimal,
    pub status: PaymentStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn next_dose_is_first_not_administered() {
        let dose = |n: u32, given: bool| PlannedDose {
            dose_number: n,
            due_on: Date::constant(2025, 3, n as i8),
            administered_at: given.then(Timestamp::now),
            vaccine_lot_id: None,
        };
        let mut plan = VaccinationPlan {
            id: VaccinationPlanId::new(),
            customer_id: CustomerId::new(),
            service_id: ServiceId::new(),
            doses: vec![dose(1, true), dose(2, false), dose(3, false)],
        };
        assert_eq!(plan.next_dose().map(|d| d.dose_number), Some(2));
        assert!(!plan.is_complete());

        for dose in &mut plan.doses {
            dose.administered_at = Some(Timestamp::now());
        }
        assert!(plan.is_complete());
    }

    #[test]
    fn each_slip_kind_has_its_own_resource() {
        assert_eq!(InventorySlipKind::Import.resource(), Resource::PhieuNhap);
        assert_eq!(InventorySlipKind::Export.resource(), Resource::PhieuXuat);
        assert_eq!(InventorySlipKind::Disposal.resource(), Resource::PhieuHuy);
    }

    #[test]
    fn appointment_parses_backend_shape() {
        let appointment: Appointment = serde_json::from_value(json!({
            "id": "6f1c2a34-7d7e-4a53-9c55-2f1a1b2c3d4e",
            "customerId": "0b7e9a3c-1111-4c2d-8e9f-aabbccddeeff",
            "serviceId": "1c2d3e4f-2222-4a5b-8c9d-001122334455",
            "scheduledAt": "2025-03-03T02:30:00Z",
            "status": "PENDING",
            "note": null
        }))
        .unwrap();
        assert_eq!(appointment.status, AppointmentStatus::Pending);
        assert_eq!(appointment.note, None);
    }
}
