//! Seed data for the mock clinic backend.
//!
//! The same dataset backs the integration tests and the dev server:
//! - three accounts (manager, doctor, customer) sharing one password
//! - two services backed by two vaccines, with lots in and out of date
//! - customer appointments in each state
//! - a three-dose plan with the first dose given

use jiff::{SignedDuration, Timestamp, civil::Date, tz::TimeZone};
use payloads::{
    AppointmentId, CustomerId, Permissions, Resource, Role, ServiceId, UserId,
    UserInfo, VaccinationPlanId, VaccineId, VaccineLotId,
    responses::{
        Appointment, AppointmentStatus, PlannedDose, Service,
        VaccinationPlan, Vaccine, VaccineLot,
    },
};
use rust_decimal::Decimal;

use crate::store::{Account, ClinicStore};

pub const MANAGER_EMAIL: &str = "manager@clinic.test";
pub const DOCTOR_EMAIL: &str = "doctor@clinic.test";
pub const CUSTOMER_EMAIL: &str = "customer@clinic.test";
pub const PASSWORD: &str = "supersecret";

const DOCTOR_PERMISSIONS: [&str; 7] = [
    "LichHen_ALL",
    "KeHoachTiem_ALL",
    "LoVacXin_VIEW",
    "PhieuXuat_ALL",
    "VacXin_VIEW",
    "DichVu_VIEW",
    "KhachHang_VIEW",
];

const CUSTOMER_PERMISSIONS: [&str; 4] =
    ["LichHen_VIEW", "KeHoachTiem_VIEW", "DichVu_VIEW", "ThanhToan_VIEW"];

pub struct DevDataset {
    pub manager: UserInfo,
    pub doctor: UserInfo,
    pub customer: UserInfo,
    pub customer_id: CustomerId,
    pub hepatitis_service: Service,
    pub flu_service: Service,
    /// In stock and in date.
    pub usable_lot: VaccineLot,
    /// Past its expiry date.
    pub expired_lot: VaccineLot,
    pub pending_appointment: Appointment,
    pub approved_appointment: Appointment,
    pub completed_appointment: Appointment,
    pub plan: VaccinationPlan,
}

impl DevDataset {
    /// Fill `store` with the dataset, dated relative to the store's clock.
    pub fn seed(store: &ClinicStore) -> Self {
        let now = store.now();
        let today = now.to_zoned(TimeZone::UTC).date();

        let manager_permissions: Vec<String> = Resource::KNOWN
            .iter()
            .map(|resource| format!("{resource}_ALL"))
            .collect();
        let manager = user(
            "Nguyen Van Quan",
            MANAGER_EMAIL,
            Role::Manager,
            &manager_permissions,
        );
        let doctor = user(
            "Tran Thi Bich",
            DOCTOR_EMAIL,
            Role::Doctor,
            &DOCTOR_PERMISSIONS,
        );
        let customer = user(
            "Le Minh Khang",
            CUSTOMER_EMAIL,
            Role::User,
            &CUSTOMER_PERMISSIONS,
        );
        let customer_id = CustomerId::new();

        let hepatitis = Vaccine {
            id: VaccineId::new(),
            name: "Engerix-B".into(),
            manufacturer: "GSK".into(),
            price: Decimal::new(250_000, 0),
        };
        let flu = Vaccine {
            id: VaccineId::new(),
            name: "Vaxigrip Tetra".into(),
            manufacturer: "Sanofi".into(),
            price: Decimal::new(356_000, 0),
        };
        let hepatitis_service = Service {
            id: ServiceId::new(),
            name: "Hepatitis B course".into(),
            description: Some("Three doses over six months".into()),
            price: Decimal::new(750_000, 0),
            dose_count: 3,
            vaccine_ids: vec![hepatitis.id],
        };
        let flu_service = Service {
            id: ServiceId::new(),
            name: "Seasonal flu".into(),
            description: None,
            price: Decimal::new(356_000, 0),
            dose_count: 1,
            vaccine_ids: vec![flu.id],
        };

        let usable_lot = VaccineLot {
            id: VaccineLotId::new(),
            vaccine_id: hepatitis.id,
            lot_number: "EB-2411".into(),
            quantity: 40,
            expires_on: days_from(today, 180),
        };
        let expired_lot = VaccineLot {
            id: VaccineLotId::new(),
            vaccine_id: hepatitis.id,
            lot_number: "EB-2302".into(),
            quantity: 5,
            expires_on: days_from(today, -30),
        };
        let flu_lot = VaccineLot {
            id: VaccineLotId::new(),
            vaccine_id: flu.id,
            lot_number: "VT-2501".into(),
            quantity: 12,
            expires_on: days_from(today, 90),
        };

        let appointment = |service: &Service,
                           hours: i64,
                           status: AppointmentStatus| Appointment {
            id: AppointmentId::new(),
            customer_id,
            service_id: service.id,
            scheduled_at: at(now, hours),
            status,
            note: None,
        };
        let pending_appointment =
            appointment(&flu_service, 26, AppointmentStatus::Pending);
        let approved_appointment =
            appointment(&hepatitis_service, 3, AppointmentStatus::Approved);
        let completed_appointment = appointment(
            &hepatitis_service,
            -24 * 30,
            AppointmentStatus::Completed,
        );

        let plan = VaccinationPlan {
            id: VaccinationPlanId::new(),
            customer_id,
            service_id: hepatitis_service.id,
            doses: vec![
                PlannedDose {
                    dose_number: 1,
                    due_on: days_from(today, -30),
                    administered_at: Some(at(now, -24 * 30)),
                    vaccine_lot_id: Some(usable_lot.id),
                },
                PlannedDose {
                    dose_number: 2,
                    due_on: today,
                    administered_at: None,
                    vaccine_lot_id: None,
                },
                PlannedDose {
                    dose_number: 3,
                    due_on: days_from(today, 150),
                    administered_at: None,
                    vaccine_lot_id: None,
                },
            ],
        };

        store.with_state(|state| {
            for (info, customer_id) in [
                (&manager, CustomerId::new()),
                (&doctor, CustomerId::new()),
                (&customer, customer_id),
            ] {
                state.accounts.push(Account {
                    user: info.clone(),
                    password: PASSWORD.into(),
                    customer_id,
                });
            }
            state.vaccines.extend([hepatitis, flu]);
            state
                .services
                .extend([hepatitis_service.clone(), flu_service.clone()]);
            state
                .lots
                .extend([usable_lot.clone(), expired_lot.clone(), flu_lot]);
            state.appointments.extend([
                pending_appointment.clone(),
                approved_appointment.clone(),
                completed_appointment.clone(),
            ]);
            state.plans.push(plan.clone());
        });

        Self {
            manager,
            doctor,
            customer,
            customer_id,
            hepatitis_service,
            flu_service,
            usable_lot,
            expired_lot,
            pending_appointment,
            approved_appointment,
            completed_appointment,
            plan,
        }
    }

    pub fn print_summary(&self) {
        tracing::info!("📋 Seeded accounts (password: {PASSWORD}):");
        for user in [&self.manager, &self.doctor, &self.customer] {
            tracing::info!(
                "   {} <{}> {} [{}]",
                user.name,
                user.email,
                user.role,
                user.permissions.codes().join(", ")
            );
        }
        tracing::info!(
            "💉 Services: {}, {}",
            self.hepatitis_service.name,
            self.flu_service.name
        );
        tracing::info!(
            "📅 Appointments: pending {}, approved {}, completed {}",
            self.pending_appointment.id,
            self.approved_appointment.id,
            self.completed_appointment.id
        );
    }
}

fn user<S: AsRef<str>>(
    name: &str,
    email: &str,
    role: Role,
    permissions: &[S],
) -> UserInfo {
    UserInfo {
        id: UserId::new(),
        name: name.into(),
        email: email.into(),
        role,
        permissions: Permissions::from_codes(permissions),
    }
}

fn days_from(today: Date, days: i32) -> Date {
    today
        .checked_add(jiff::Span::new().days(days))
        .unwrap_or(today)
}

fn at(now: Timestamp, hours: i64) -> Timestamp {
    now.saturating_add(SignedDuration::from_hours(hours))
        .unwrap_or(now)
}
