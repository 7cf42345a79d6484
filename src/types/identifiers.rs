//! Unique identifier types for the compliance monitor
//!
//! Facilities, violations and evidence items are keyed by UUID-backed newtypes.
//! Each identifier serializes with a short prefix (`LOT_`, `VIO_`, `EVD_`) so that
//! identifiers of different kinds cannot be confused in snapshots or seed files.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! prefixed_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Prefix used in the textual form of this identifier
            pub const PREFIX: &'static str = $prefix;

            /// Create a new random identifier
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Build an identifier from raw bytes (used by seeded generators)
            pub fn from_bytes(bytes: [u8; 16]) -> Self {
                Self(uuid::Builder::from_random_bytes(bytes).into_uuid())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $prefix, self.0.simple())
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                // Raw UUIDs are accepted as well as the prefixed form
                let raw = s.strip_prefix($prefix).unwrap_or(s);
                Uuid::parse_str(raw).map($name)
            }
        }

        impl Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                serializer.collect_str(self)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

prefixed_id!(
    /// Unique identifier for a monitored parking facility
    FacilityId,
    "LOT_"
);

prefixed_id!(
    /// Unique identifier for a capacity violation record
    ViolationId,
    "VIO_"
);

prefixed_id!(
    /// Unique identifier for a captured evidence item
    EvidenceId,
    "EVD_"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_facility_id_creation() {
        let id1 = FacilityId::new();
        let id2 = FacilityId::new();
        assert_ne!(id1, id2);
        assert_ne!(id1, FacilityId::default());
    }

    #[test]
    fn test_id_display_prefixes() {
        let lot = FacilityId::new().to_string();
        assert!(lot.starts_with("LOT_"));
        assert_eq!(lot.len(), 36);

        let violation = ViolationId::new().to_string();
        assert!(violation.starts_with("VIO_"));
        assert_eq!(violation.len(), 36);

        let evidence = EvidenceId::new().to_string();
        assert!(evidence.starts_with("EVD_"));
    }

    #[test]
    fn test_id_parse_accepts_prefixed_and_raw() {
        let id = ViolationId::new();
        let prefixed: ViolationId = id.to_string().parse().unwrap();
        assert_eq!(prefixed, id);

        let raw: ViolationId = id.0.to_string().parse().unwrap();
        assert_eq!(raw, id);

        assert!("VIO_not-a-uuid".parse::<ViolationId>().is_err());
    }

    #[test]
    fn test_id_serde_format() {
        let id = FacilityId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id));

        let back: FacilityId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_from_bytes_is_deterministic() {
        let a = FacilityId::from_bytes([7u8; 16]);
        let b = FacilityId::from_bytes([7u8; 16]);
        assert_eq!(a, b);
        assert_ne!(a, FacilityId::from_bytes([8u8; 16]));
    }
}
