//! In-memory clinic state behind the mock backend.
//!
//! Everything lives in one [`ClinicState`] guarded by a mutex. Tokens are
//! opaque random strings; each grant remembers its user and expiry, checked
//! against the store's [`TimeSource`].

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, PoisonError};

use jiff::{SignedDuration, Timestamp, civil::Date, tz::TimeZone};
use payloads::{
    AccessLevel, AppointmentId, CustomerId, InventorySlipId, PaymentId,
    Resource, UserId, UserInfo, requests,
    responses::{
        Appointment, AppointmentStatus, InventorySlip, InventorySlipKind,
        Payment, PaymentStatus, Service, StatisticsOverview, VaccinationPlan,
        Vaccine, VaccineLot,
    },
};
use reqwest::StatusCode;
use rust_decimal::Decimal;
use serde_json::Value;
use uuid::Uuid;

use crate::time::TimeSource;

/// Lifetimes of the tokens the backend issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenPolicy {
    pub access_ttl: SignedDuration,
    pub refresh_ttl: SignedDuration,
}

impl Default for TokenPolicy {
    fn default() -> Self {
        Self {
            access_ttl: SignedDuration::from_mins(15),
            refresh_ttl: SignedDuration::from_hours(24 * 7),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Account {
    pub user: UserInfo,
    pub password: String,
    pub customer_id: CustomerId,
}

#[derive(Debug, Clone, Copy)]
struct Grant {
    user_id: UserId,
    expires_at: Timestamp,
}

impl Grant {
    fn is_live(&self, now: Timestamp) -> bool {
        now < self.expires_at
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedTokens {
    pub access_token: String,
    /// Only set when the refresh token was rotated.
    pub refresh_token: Option<String>,
}

#[derive(Debug, Default)]
pub struct ClinicState {
    pub accounts: Vec<Account>,
    pub services: Vec<Service>,
    pub vaccines: Vec<Vaccine>,
    pub lots: Vec<VaccineLot>,
    pub appointments: Vec<Appointment>,
    pub plans: Vec<VaccinationPlan>,
    pub slips: Vec<InventorySlip>,
    pub payments: Vec<Payment>,
    /// Issue a fresh refresh token on every refresh, revoking the old one.
    pub rotate_refresh_tokens: bool,
    access_tokens: HashMap<String, Grant>,
    refresh_tokens: HashMap<String, Grant>,
    scripted: VecDeque<(u16, Value)>,
    hits: HashMap<String, usize>,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Invalid or expired token")]
    InvalidToken,
    #[error("Missing {0} permission")]
    Forbidden(String),
    #[error("{0}")]
    Validation(String),
    #[error("Account not found")]
    AccountNotFound,
    #[error("Service not found")]
    ServiceNotFound,
    #[error("Appointment not found")]
    AppointmentNotFound,
    #[error("Vaccination plan not found")]
    PlanNotFound,
    #[error("Vaccine lot not found")]
    LotNotFound,
    #[error(
        "Cannot {action} an appointment that is {}",
        .status.label().to_lowercase()
    )]
    InvalidTransition {
        action: &'static str,
        status: AppointmentStatus,
    },
    #[error("Dose {requested} is not the next dose of this plan")]
    DoseOutOfOrder { requested: u32 },
    #[error("Vaccine lot is empty or expired")]
    LotUnusable,
    #[error("Only {available} left in stock")]
    InsufficientStock { available: u32 },
}

pub struct ClinicStore {
    state: Mutex<ClinicState>,
    time_source: TimeSource,
    policy: TokenPolicy,
}

impl ClinicStore {
    pub fn new(policy: TokenPolicy, time_source: TimeSource) -> Self {
        Self {
            state: Mutex::new(ClinicState::default()),
            time_source,
            policy,
        }
    }

    pub fn policy(&self) -> TokenPolicy {
        self.policy
    }

    pub fn now(&self) -> Timestamp {
        self.time_source.now()
    }

    /// Run `f` with exclusive access to the state. Used for seeding and for
    /// inspection in tests.
    pub fn with_state<R>(&self, f: impl FnOnce(&mut ClinicState) -> R) -> R {
        let mut state =
            self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut state)
    }

    pub fn record_hit(&self, path: &str) {
        self.with_state(|state| {
            *state.hits.entry(path.to_string()).or_default() += 1;
        });
    }

    /// How many requests reached `path`, e.g. `/api/auth/refresh`.
    pub fn hits(&self, path: &str) -> usize {
        self.with_state(|state| state.hits.get(path).copied().unwrap_or(0))
    }

    /// Answer the next authenticated request with `status` and `body`
    /// instead of handling it. Queued responses are used in order.
    pub fn script_response(&self, status: StatusCode, body: Value) {
        self.with_state(|state| {
            state.scripted.push_back((status.as_u16(), body))
        });
    }

    pub fn next_scripted(&self) -> Option<(u16, Value)> {
        self.with_state(|state| state.scripted.pop_front())
    }

    /// Number of access and refresh tokens on record, live or not.
    pub fn token_counts(&self) -> (usize, usize) {
        self.with_state(|state| {
            (state.access_tokens.len(), state.refresh_tokens.len())
        })
    }

    pub fn revoke_refresh_tokens(&self) {
        self.with_state(|state| state.refresh_tokens.clear());
    }

    pub fn account(&self, user_id: &UserId) -> Result<Account, StoreError> {
        self.with_state(|state| {
            state
                .accounts
                .iter()
                .find(|account| &account.user.id == user_id)
                .cloned()
                .ok_or(StoreError::AccountNotFound)
        })
    }
}

/// Sessions
impl ClinicStore {
    /// Check credentials and open a session, returning the token pair.
    pub fn login(
        &self,
        credentials: &requests::LoginCredentials,
    ) -> Result<(Account, String, String), StoreError> {
        let now = self.now();
        let policy = self.policy;
        self.with_state(|state| {
            let account = state
                .accounts
                .iter()
                .find(|account| {
                    account.user.email.eq_ignore_ascii_case(&credentials.email)
                        && account.password == credentials.password
                })
                .cloned()
                .ok_or(StoreError::InvalidCredentials)?;
            let access_token =
                state.issue_access(account.user.id, now, policy.access_ttl);
            let refresh_token =
                state.issue_refresh(account.user.id, now, policy.refresh_ttl);
            Ok((account, access_token, refresh_token))
        })
    }

    pub fn refresh(
        &self,
        refresh_token: &str,
    ) -> Result<IssuedTokens, StoreError> {
        let now = self.now();
        let policy = self.policy;
        self.with_state(|state| {
            let grant = state
                .refresh_tokens
                .get(refresh_token)
                .copied()
                .filter(|grant| grant.is_live(now))
                .ok_or(StoreError::InvalidToken)?;
            let access_token =
                state.issue_access(grant.user_id, now, policy.access_ttl);
            let refresh_token = state.rotate_refresh_tokens.then(|| {
                state.refresh_tokens.remove(refresh_token);
                state.issue_refresh(grant.user_id, now, policy.refresh_ttl)
            });
            Ok(IssuedTokens {
                access_token,
                refresh_token,
            })
        })
    }

    pub fn authenticate(
        &self,
        access_token: &str,
    ) -> Result<Account, StoreError> {
        let now = self.now();
        let user_id = self.with_state(|state| {
            state
                .access_tokens
                .get(access_token)
                .filter(|grant| grant.is_live(now))
                .map(|grant| grant.user_id)
                .ok_or(StoreError::InvalidToken)
        })?;
        self.account(&user_id)
    }

    /// End the session behind `access_token`, including every refresh token
    /// of its user.
    pub fn logout(&self, access_token: &str) {
        self.with_state(|state| {
            if let Some(grant) = state.access_tokens.remove(access_token) {
                state
                    .refresh_tokens
                    .retain(|_, other| other.user_id != grant.user_id);
            }
        });
    }
}

impl ClinicState {
    fn issue_access(
        &mut self,
        user_id: UserId,
        now: Timestamp,
        ttl: SignedDuration,
    ) -> String {
        self.access_tokens.retain(|_, grant| grant.is_live(now));
        let token = format!("access-{}", Uuid::new_v4());
        self.access_tokens.insert(token.clone(), grant(user_id, now, ttl));
        token
    }

    fn issue_refresh(
        &mut self,
        user_id: UserId,
        now: Timestamp,
        ttl: SignedDuration,
    ) -> String {
        self.refresh_tokens.retain(|_, grant| grant.is_live(now));
        let token = format!("refresh-{}", Uuid::new_v4());
        self.refresh_tokens.insert(token.clone(), grant(user_id, now, ttl));
        token
    }

    fn service(
        &self,
        id: &payloads::ServiceId,
    ) -> Result<&Service, StoreError> {
        self.services
            .iter()
            .find(|service| &service.id == id)
            .ok_or(StoreError::ServiceNotFound)
    }

    fn appointment_mut(
        &mut self,
        id: &AppointmentId,
    ) -> Result<&mut Appointment, StoreError> {
        self.appointments
            .iter_mut()
            .find(|appointment| &appointment.id == id)
            .ok_or(StoreError::AppointmentNotFound)
    }

    fn lot_mut(
        &mut self,
        id: &payloads::VaccineLotId,
    ) -> Result<&mut VaccineLot, StoreError> {
        self.lots
            .iter_mut()
            .find(|lot| &lot.id == id)
            .ok_or(StoreError::LotNotFound)
    }
}

fn grant(user_id: UserId, now: Timestamp, ttl: SignedDuration) -> Grant {
    Grant {
        user_id,
        expires_at: now.saturating_add(ttl).unwrap_or(Timestamp::MAX),
    }
}

/// Fail unless `account` holds at least `level` on `resource`.
pub fn require(
    account: &Account,
    resource: Resource,
    level: AccessLevel,
) -> Result<(), StoreError> {
    if account.user.permissions.allows(&resource, level) {
        Ok(())
    } else {
        Err(StoreError::Forbidden(format!("{resource}_{}", level.suffix())))
    }
}

/// Customers are limited to their own records; staff see everyone's.
fn own_customer(account: &Account) -> Option<CustomerId> {
    (!account.user.role.is_staff()).then_some(account.customer_id)
}

fn clinic_date(at: Timestamp) -> Date {
    at.to_zoned(TimeZone::UTC).date()
}

fn in_range(date: Date, from: Option<Date>, to: Option<Date>) -> bool {
    from.is_none_or(|from| date >= from) && to.is_none_or(|to| date <= to)
}

/// Clinic operations
impl ClinicStore {
    pub fn services(&self) -> Vec<Service> {
        self.with_state(|state| state.services.clone())
    }

    pub fn vaccines(&self) -> Vec<Vaccine> {
        self.with_state(|state| state.vaccines.clone())
    }

    pub fn lots(
        &self,
        account: &Account,
    ) -> Result<Vec<VaccineLot>, StoreError> {
        require(account, Resource::LoVacXin, AccessLevel::View)?;
        Ok(self.with_state(|state| state.lots.clone()))
    }

    pub fn appointments(
        &self,
        account: &Account,
        filter: &requests::AppointmentFilter,
    ) -> Result<Vec<Appointment>, StoreError> {
        require(account, Resource::LichHen, AccessLevel::View)?;
        let own = own_customer(account);
        Ok(self.with_state(|state| {
            state
                .appointments
                .iter()
                .filter(|a| own.is_none_or(|own| a.customer_id == own))
                .filter(|a| filter.status.is_none_or(|s| a.status == s))
                .filter(|a| {
                    filter.customer_id.is_none_or(|c| a.customer_id == c)
                })
                .filter(|a| {
                    let date = clinic_date(a.scheduled_at);
                    in_range(date, filter.from, filter.to)
                })
                .cloned()
                .collect()
        }))
    }

    pub fn register_appointment(
        &self,
        account: &Account,
        details: &requests::RegisterAppointment,
    ) -> Result<Appointment, StoreError> {
        if details.scheduled_at <= self.now() {
            return Err(StoreError::Validation(
                "Appointment must be scheduled in the future".into(),
            ));
        }
        self.with_state(|state| {
            state.service(&details.service_id)?;
            let appointment = Appointment {
                id: AppointmentId::new(),
                customer_id: account.customer_id,
                service_id: details.service_id,
                scheduled_at: details.scheduled_at,
                status: AppointmentStatus::Pending,
                note: details.note.clone(),
            };
            state.appointments.push(appointment.clone());
            Ok(appointment)
        })
    }

    pub fn approve_appointment(
        &self,
        account: &Account,
        id: &AppointmentId,
    ) -> Result<Appointment, StoreError> {
        require(account, Resource::LichHen, AccessLevel::All)?;
        self.with_state(|state| {
            let appointment = state.appointment_mut(id)?;
            if appointment.status != AppointmentStatus::Pending {
                return Err(StoreError::InvalidTransition {
                    action: "approve",
                    status: appointment.status,
                });
            }
            appointment.status = AppointmentStatus::Approved;
            Ok(appointment.clone())
        })
    }

    /// Staff may cancel any appointment; customers only their own.
    pub fn cancel_appointment(
        &self,
        account: &Account,
        id: &AppointmentId,
    ) -> Result<(), StoreError> {
        let staff = account
            .user
            .permissions
            .allows(&Resource::LichHen, AccessLevel::All);
        self.with_state(|state| {
            let appointment = state.appointment_mut(id)?;
            if !staff && appointment.customer_id != account.customer_id {
                return Err(StoreError::Forbidden("LichHen_ALL".into()));
            }
            match appointment.status {
                AppointmentStatus::Pending | AppointmentStatus::Approved => {
                    appointment.status = AppointmentStatus::Cancelled;
                    Ok(())
                }
                status => Err(StoreError::InvalidTransition {
                    action: "cancel",
                    status,
                }),
            }
        })
    }

    pub fn vaccination_plans(
        &self,
        account: &Account,
        filter: &requests::PlanFilter,
    ) -> Result<Vec<VaccinationPlan>, StoreError> {
        require(account, Resource::KeHoachTiem, AccessLevel::View)?;
        let own = own_customer(account);
        Ok(self.with_state(|state| {
            state
                .plans
                .iter()
                .filter(|p| own.is_none_or(|own| p.customer_id == own))
                .filter(|p| {
                    filter.customer_id.is_none_or(|c| p.customer_id == c)
                })
                .cloned()
                .collect()
        }))
    }

    /// Administer the next dose of a plan from a usable lot.
    pub fn record_dose(
        &self,
        account: &Account,
        details: &requests::RecordDose,
    ) -> Result<VaccinationPlan, StoreError> {
        require(account, Resource::KeHoachTiem, AccessLevel::All)?;
        let now = self.now();
        let today = clinic_date(now);
        self.with_state(|state| {
            let plan_index = state
                .plans
                .iter()
                .position(|plan| plan.id == details.plan_id)
                .ok_or(StoreError::PlanNotFound)?;
            let next = state.plans[plan_index]
                .next_dose()
                .map(|dose| dose.dose_number);
            if next != Some(details.dose_number) {
                return Err(StoreError::DoseOutOfOrder {
                    requested: details.dose_number,
                });
            }

            let lot = state.lot_mut(&details.vaccine_lot_id)?;
            if lot.quantity == 0 || lot.expires_on < today {
                return Err(StoreError::LotUnusable);
            }
            lot.quantity -= 1;

            let plan = &mut state.plans[plan_index];
            if let Some(dose) = plan
                .doses
                .iter_mut()
                .find(|dose| dose.dose_number == details.dose_number)
            {
                dose.administered_at = Some(now);
                dose.vaccine_lot_id = Some(details.vaccine_lot_id);
            }
            Ok(plan.clone())
        })
    }

    /// Imports add stock; exports and disposals remove it.
    pub fn create_inventory_slip(
        &self,
        account: &Account,
        details: &requests::CreateInventorySlip,
    ) -> Result<InventorySlip, StoreError> {
        require(account, details.kind.resource(), AccessLevel::All)?;
        if details.quantity == 0 {
            return Err(StoreError::Validation(
                "Quantity must be a positive number".into(),
            ));
        }
        let now = self.now();
        self.with_state(|state| {
            let lot = state.lot_mut(&details.vaccine_lot_id)?;
            match details.kind {
                InventorySlipKind::Import => {
                    lot.quantity =
                        lot.quantity.saturating_add(details.quantity);
                }
                InventorySlipKind::Export | InventorySlipKind::Disposal => {
                    if lot.quantity < details.quantity {
                        return Err(StoreError::InsufficientStock {
                            available: lot.quantity,
                        });
                    }
                    lot.quantity -= details.quantity;
                }
            }
            let slip = InventorySlip {
                id: InventorySlipId::new(),
                kind: details.kind,
                vaccine_lot_id: details.vaccine_lot_id,
                quantity: details.quantity,
                created_at: now,
            };
            state.slips.push(slip.clone());
            Ok(slip)
        })
    }

    /// Charge the service price of an approved appointment, completing it.
    pub fn create_payment(
        &self,
        account: &Account,
        details: &requests::CreatePayment,
    ) -> Result<Payment, StoreError> {
        require(account, Resource::ThanhToan, AccessLevel::All)?;
        self.with_state(|state| {
            let appointment = state.appointment_mut(&details.appointment_id)?;
            if appointment.status != AppointmentStatus::Approved {
                return Err(StoreError::InvalidTransition {
                    action: "charge",
                    status: appointment.status,
                });
            }
            let service_id = appointment.service_id;
            let amount = state.service(&service_id)?.price;
            state.appointment_mut(&details.appointment_id)?.status =
                AppointmentStatus::Completed;
            let payment = Payment {
                id: PaymentId::new(),
                appointment_id: details.appointment_id,
                amount,
                status: PaymentStatus::Paid,
            };
            state.payments.push(payment.clone());
            Ok(payment)
        })
    }

    pub fn statistics(
        &self,
        account: &Account,
        range: &requests::StatisticsRange,
    ) -> Result<StatisticsOverview, StoreError> {
        require(account, Resource::ThongKe, AccessLevel::View)?;
        Ok(self.with_state(|state| {
            let in_window = |at: Timestamp| {
                in_range(clinic_date(at), range.from, range.to)
            };
            let appointments: Vec<&Appointment> = state
                .appointments
                .iter()
                .filter(|a| in_window(a.scheduled_at))
                .collect();
            let mut customers: Vec<CustomerId> =
                appointments.iter().map(|a| a.customer_id).collect();
            customers.sort();
            customers.dedup();

            let doses_administered = state
                .plans
                .iter()
                .flat_map(|plan| &plan.doses)
                .filter(|dose| dose.administered_at.is_some_and(in_window))
                .count();
            let revenue: Decimal = state
                .payments
                .iter()
                .filter(|payment| payment.status == PaymentStatus::Paid)
                .filter(|payment| {
                    appointments.iter().any(|a| a.id == payment.appointment_id)
                })
                .map(|payment| payment.amount)
                .sum();

            StatisticsOverview {
                appointments: count(appointments.len()),
                doses_administered: count(doses_administered),
                new_customers: count(customers.len()),
                revenue,
            }
        }))
    }
}

fn count(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{self, DevDataset};

    fn credentials() -> requests::LoginCredentials {
        requests::LoginCredentials {
            email: mock::DOCTOR_EMAIL.into(),
            password: mock::PASSWORD.into(),
        }
    }

    #[test]
    fn dead_tokens_are_dropped_when_new_ones_are_issued() {
        let time_source =
            TimeSource::new("2025-03-03T01:00:00Z".parse().unwrap());
        let store =
            ClinicStore::new(TokenPolicy::default(), time_source.clone());
        DevDataset::seed(&store);

        store.login(&credentials()).unwrap();
        store.login(&credentials()).unwrap();
        assert_eq!(store.token_counts(), (2, 2));

        // access tokens are dead, refresh tokens still live
        time_source.advance(store.policy().access_ttl);
        store.login(&credentials()).unwrap();
        assert_eq!(store.token_counts(), (1, 3));

        time_source.advance(store.policy().refresh_ttl);
        let (_, access, _) = store.login(&credentials()).unwrap();
        assert_eq!(store.token_counts(), (1, 1));
        assert!(store.authenticate(&access).is_ok());
    }
}
