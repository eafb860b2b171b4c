//! Role and permission model shared by the console and the backend fixtures.
//!
//! The backend hands out a flat list of permission codes such as
//! `"DonHang_ALL"` or `"LichHen_VIEW"`. The list is parsed once, at the
//! deserialization boundary, into a map of [`Resource`] to [`AccessLevel`],
//! so every later check is a lookup rather than string concatenation.
//!
//! Only two suffixes exist: `_ALL` grants full access and `_VIEW` grants read
//! access. Anything else is ignored, and a resource missing from the list has
//! no access at all.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::responses::UserInfo;

/// A user's role, as the single discriminator string sent by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Manager,
    Doctor,
    User,
    /// A role this client doesn't know about. Kept verbatim so that exact
    /// string comparisons still work.
    Other(String),
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Manager => "MANAGER",
            Self::Doctor => "DOCTOR",
            Self::User => "USER",
            Self::Other(role) => role,
        }
    }

    /// Staff roles get the management console; customers get the portal.
    pub fn is_staff(&self) -> bool {
        matches!(self, Self::Manager | Self::Doctor)
    }
}

impl From<&str> for Role {
    fn from(role: &str) -> Self {
        match role {
            "MANAGER" => Self::Manager,
            "DOCTOR" => Self::Doctor,
            "USER" => Self::User,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for Role {
    fn from(role: String) -> Self {
        Self::from(role.as_str())
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A protected capability of the clinic backend, identified by its code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Resource {
    /// Orders.
    DonHang,
    /// Appointments.
    LichHen,
    /// Vaccine catalogue.
    VacXin,
    /// Vaccine lots in stock.
    LoVacXin,
    /// Inventory import slips.
    PhieuNhap,
    /// Inventory export slips.
    PhieuXuat,
    /// Inventory disposal slips.
    PhieuHuy,
    /// Customers.
    KhachHang,
    /// Staff accounts.
    NhanVien,
    /// Statistics dashboards.
    ThongKe,
    /// Vaccination services offered to customers.
    DichVu,
    /// Multi-dose vaccination plans.
    KeHoachTiem,
    /// Payments.
    ThanhToan,
    Other(String),
}

impl Resource {
    pub const KNOWN: [Resource; 13] = [
        Self::DonHang,
        Self::LichHen,
        Self::VacXin,
        Self::LoVacXin,
        Self::PhieuNhap,
        Self::PhieuXuat,
        Self::PhieuHuy,
        Self::KhachHang,
        Self::NhanVien,
        Self::ThongKe,
        Self::DichVu,
        Self::KeHoachTiem,
        Self::ThanhToan,
    ];

    pub fn code(&self) -> &str {
        match self {
            Self::DonHang => "DonHang",
            Self::LichHen => "LichHen",
            Self::VacXin => "VacXin",
            Self::LoVacXin => "LoVacXin",
            Self::PhieuNhap => "PhieuNhap",
            Self::PhieuXuat => "PhieuXuat",
            Self::PhieuHuy => "PhieuHuy",
            Self::KhachHang => "KhachHang",
            Self::NhanVien => "NhanVien",
            Self::ThongKe => "ThongKe",
            Self::DichVu => "DichVu",
            Self::KeHoachTiem => "KeHoachTiem",
            Self::ThanhToan => "ThanhToan",
            Self::Other(code) => code,
        }
    }
}

impl From<&str> for Resource {
    fn from(code: &str) -> Self {
        Self::KNOWN
            .iter()
            .find(|resource| resource.code() == code)
            .cloned()
            .unwrap_or_else(|| Self::Other(code.to_string()))
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Access tiers. `All` implies everything `View` does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AccessLevel {
    View,
    All,
}

impl AccessLevel {
    pub fn suffix(self) -> &'static str {
        match self {
            Self::View => "VIEW",
            Self::All => "ALL",
        }
    }

    fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "VIEW" => Some(Self::View),
            "ALL" => Some(Self::All),
            _ => None,
        }
    }

    pub fn grants(self, required: AccessLevel) -> bool {
        self >= required
    }
}

/// Parsed permission list: the strongest access level held per resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Permissions {
    levels: HashMap<Resource, AccessLevel>,
}

impl Permissions {
    pub fn from_codes<S: AsRef<str>>(codes: &[S]) -> Self {
        codes.iter().map(AsRef::as_ref).collect()
    }

    /// Split `"<resource>_<SUFFIX>"` into its parts. Returns `None` for
    /// unrecognized suffixes or an empty resource.
    pub fn parse_code(code: &str) -> Option<(Resource, AccessLevel)> {
        let (resource, suffix) = code.rsplit_once('_')?;
        let level = AccessLevel::from_suffix(suffix)?;
        Some((Resource::from(resource), level))
    }

    pub fn grant(&mut self, resource: Resource, level: AccessLevel) {
        let entry = self.levels.entry(resource).or_insert(level);
        if level > *entry {
            *entry = level;
        }
    }

    pub fn level(&self, resource: &Resource) -> Option<AccessLevel> {
        self.levels.get(resource).copied()
    }

    pub fn allows(&self, resource: &Resource, required: AccessLevel) -> bool {
        self.level(resource)
            .is_some_and(|level| level.grants(required))
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// The wire form, sorted so it is stable across runs.
    pub fn codes(&self) -> Vec<String> {
        let mut codes: Vec<String> = self
            .levels
            .iter()
            .map(|(resource, level)| {
                format!("{}_{}", resource.code(), level.suffix())
            })
            .collect();
        codes.sort();
        codes
    }
}

impl<'a> FromIterator<&'a str> for Permissions {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut permissions = Self::default();
        for (resource, level) in iter.into_iter().filter_map(Self::parse_code)
        {
            permissions.grant(resource, level);
        }
        permissions
    }
}

impl From<Vec<String>> for Permissions {
    fn from(codes: Vec<String>) -> Self {
        Self::from_codes(&codes)
    }
}

impl From<Permissions> for Vec<String> {
    fn from(permissions: Permissions) -> Self {
        permissions.codes()
    }
}

/// How a list of required permissions is combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Combinator {
    All,
    #[default]
    Any,
}

impl From<bool> for Combinator {
    /// `true` maps to `All`, matching a `require_all` flag.
    fn from(require_all: bool) -> Self {
        if require_all { Self::All } else { Self::Any }
    }
}

/// A set of role and permission constraints attached to a route, a menu
/// entry or an action.
///
/// Roles are always matched any-of, since a user holds exactly one role.
/// Permissions are matched with the combinator. When both lists are present
/// both must pass; an empty list places no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessRequirement {
    pub roles: Vec<String>,
    pub permissions: Vec<String>,
    pub combinator: Combinator,
}

impl AccessRequirement {
    pub fn permissions<S: Into<String>>(
        codes: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            permissions: codes.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn roles<S: Into<String>>(roles: impl IntoIterator<Item = S>) -> Self {
        Self {
            roles: roles.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn with_roles<S: Into<String>>(
        mut self,
        roles: impl IntoIterator<Item = S>,
    ) -> Self {
        self.roles = roles.into_iter().map(Into::into).collect();
        self
    }

    pub fn require_all(mut self, require_all: bool) -> Self {
        self.combinator = require_all.into();
        self
    }

    pub fn is_unconstrained(&self) -> bool {
        self.roles.is_empty() && self.permissions.is_empty()
    }
}

/// Pure queries over a snapshot of the signed-in user.
///
/// Every query answers `false` when no user is loaded, except
/// [`has_all_permissions`](Self::has_all_permissions) on an empty list which
/// is vacuously `true`.
#[derive(Debug, Clone, Copy)]
pub struct PermissionEvaluator<'a> {
    user: Option<&'a UserInfo>,
}

impl<'a> PermissionEvaluator<'a> {
    pub fn new(user: Option<&'a UserInfo>) -> Self {
        Self { user }
    }

    pub fn user(&self) -> Option<&'a UserInfo> {
        self.user
    }

    /// True if the user holds `<code>_ALL` or `<code>_VIEW`.
    pub fn has_permission(&self, code: &str) -> bool {
        self.can(&Resource::from(code), AccessLevel::View)
    }

    pub fn can(&self, resource: &Resource, level: AccessLevel) -> bool {
        self.user
            .is_some_and(|user| user.permissions.allows(resource, level))
    }

    pub fn has_any_permission<S: AsRef<str>>(&self, codes: &[S]) -> bool {
        codes.iter().any(|code| self.has_permission(code.as_ref()))
    }

    pub fn has_all_permissions<S: AsRef<str>>(&self, codes: &[S]) -> bool {
        codes.iter().all(|code| self.has_permission(code.as_ref()))
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.user.is_some_and(|user| user.role.as_str() == role)
    }

    pub fn has_any_role<S: AsRef<str>>(&self, roles: &[S]) -> bool {
        roles.iter().any(|role| self.has_role(role.as_ref()))
    }

    pub fn satisfies(&self, requirement: &AccessRequirement) -> bool {
        let roles_ok = requirement.roles.is_empty()
            || self.has_any_role(&requirement.roles);
        let permissions_ok = requirement.permissions.is_empty()
            || match requirement.combinator {
                Combinator::All => {
                    self.has_all_permissions(&requirement.permissions)
                }
                Combinator::Any => {
                    self.has_any_permission(&requirement.permissions)
                }
            };
        roles_ok && permissions_ok
    }
}
