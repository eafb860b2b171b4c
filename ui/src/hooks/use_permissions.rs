use payloads::{
    AccessLevel, AccessRequirement, PermissionEvaluator, Resource, UserInfo,
};
use yew::prelude::*;

use crate::hooks::use_session;

/// Permission queries over the user signed in at render time.
#[derive(Debug, Clone, PartialEq)]
pub struct PermissionSnapshot {
    user: Option<UserInfo>,
}

impl PermissionSnapshot {
    pub fn new(user: Option<UserInfo>) -> Self {
        Self { user }
    }

    pub fn evaluator(&self) -> PermissionEvaluator<'_> {
        PermissionEvaluator::new(self.user.as_ref())
    }

    pub fn has_permission(&self, code: &str) -> bool {
        self.evaluator().has_permission(code)
    }

    pub fn has_any_permission<S: AsRef<str>>(&self, codes: &[S]) -> bool {
        self.evaluator().has_any_permission(codes)
    }

    pub fn has_all_permissions<S: AsRef<str>>(&self, codes: &[S]) -> bool {
        self.evaluator().has_all_permissions(codes)
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.evaluator().has_role(role)
    }

    pub fn has_any_role<S: AsRef<str>>(&self, roles: &[S]) -> bool {
        self.evaluator().has_any_role(roles)
    }

    /// Full access (`_ALL`) to a resource, needed for mutations.
    pub fn can_manage(&self, resource: Resource) -> bool {
        self.evaluator().can(&resource, AccessLevel::All)
    }

    pub fn satisfies(&self, requirement: &AccessRequirement) -> bool {
        self.evaluator().satisfies(requirement)
    }
}

#[hook]
pub fn use_permissions() -> PermissionSnapshot {
    let session = use_session();
    PermissionSnapshot::new(session.state().user().cloned())
}
