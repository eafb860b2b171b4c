pub mod api_client;
pub mod credentials;
pub mod envelope;
pub mod permissions;
pub mod requests;
pub mod responses;

pub use api_client::{APIClient, ClientError, query_pairs};
pub use credentials::{
    CredentialPolicy, CredentialStore, MemoryCredentials, StoredCredential,
    TokenPair,
};
pub use envelope::{PayloadError, classify};
pub use permissions::{
    AccessLevel, AccessRequirement, Combinator, PermissionEvaluator,
    Permissions, Resource, Role,
};
pub use responses::UserInfo;

use derive_more::Display;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Id type wrappers help ensure we don't mix up ids for different resources.
macro_rules! id_type {
    ($($name:ident),* $(,)?) => {
        $(
            #[derive(
                Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
                Display, Serialize, Deserialize,
            )]
            #[serde(transparent)]
            pub struct $name(pub Uuid);

            impl $name {
                pub fn new() -> Self {
                    Self(Uuid::new_v4())
                }
            }

            impl Default for $name {
                fn default() -> Self {
                    Self::new()
                }
            }
        )*
    };
}

id_type!(
    UserId,
    CustomerId,
    ServiceId,
    VaccineId,
    VaccineLotId,
    AppointmentId,
    VaccinationPlanId,
    InventorySlipId,
    PaymentId,
);
