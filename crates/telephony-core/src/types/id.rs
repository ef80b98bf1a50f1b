//! Newtype wrappers around [`uuid::Uuid`] for registry entity identifiers.
//!
//! Every object the registry hands out carries one of these as its opaque
//! identity; the monitor prints them where a raw address would otherwise be
//! shown.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Macro to define a newtype ID wrapper around `Uuid`.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Return the inner UUID value.
            pub fn into_uuid(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }
    };
}

define_id!(
    /// Identity of a registered plugin record.
    PluginId
);

define_id!(
    /// Identity of a registered storage.
    StorageId
);

define_id!(
    /// Identity of a registered communicator.
    CommunicatorId
);

define_id!(
    /// Identity of a registered transport.
    TransportId
);

define_id!(
    /// Identity of a core object owned by a plugin.
    CoreObjectId
);

define_id!(
    /// Identity of a user request travelling through a transport.
    UserRequestId
);
