use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! define_id {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            pub fn to_uuid(self) -> Uuid {
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

        impl From<Uuid> for $name {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }

        impl From<$name> for Uuid {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

// Scheduling IDs
define_id!(AppointmentId);

// CRM IDs
define_id!(ClientId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_round_trips_through_uuid() {
        let id = AppointmentId::new();
        let parsed = Uuid::parse_str(&id.to_string()).expect("valid uuid");
        assert_eq!(AppointmentId::from_uuid(parsed), id);
    }

    #[test]
    fn distinct_ids_are_not_equal() {
        assert_ne!(ClientId::new(), ClientId::new());
    }
}
