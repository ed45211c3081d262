// Task identity: provisional (client-minted) vs confirmed (store-assigned).
//
// The remote store issues small sequential ids. The client mints provisional
// ids from the millisecond clock, so every provisional id sits above
// `PROVISIONAL_FLOOR` and the two ranges never collide within a session.
// Internally the distinction is a tagged enum; the numeric floor survives
// only at the wire boundary (`from_wire`) and in the minting path.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Smallest value a provisional id may take (2001-09-09 in unix millis).
/// Store-assigned ids are guaranteed to stay below this for the lifetime
/// of a session.
pub const PROVISIONAL_FLOOR: u64 = 1_000_000_000_000;

/// A task identifier of known provenance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TaskId {
    /// Minted locally; the create has not been confirmed by the store.
    Provisional(u64),
    /// Assigned (or accepted) by the remote store.
    Confirmed(u64),
}

impl TaskId {
    /// Classify a raw wire id by magnitude.
    pub fn from_wire(raw: u64) -> Self {
        if raw >= PROVISIONAL_FLOOR {
            Self::Provisional(raw)
        } else {
            Self::Confirmed(raw)
        }
    }

    pub fn as_u64(self) -> u64 {
        match self {
            Self::Provisional(v) | Self::Confirmed(v) => v,
        }
    }

    pub fn is_provisional(self) -> bool {
        matches!(self, Self::Provisional(_))
    }

    pub fn is_confirmed(self) -> bool {
        matches!(self, Self::Confirmed(_))
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u64())
    }
}

// On the wire a task id is a bare number; provenance is re-derived on read.
impl Serialize for TaskId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(self.as_u64())
    }
}

impl<'de> Deserialize<'de> for TaskId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        u64::deserialize(deserializer).map(TaskId::from_wire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_wire_classifies_by_floor() {
        assert_eq!(TaskId::from_wire(1), TaskId::Confirmed(1));
        assert_eq!(TaskId::from_wire(PROVISIONAL_FLOOR - 1), TaskId::Confirmed(PROVISIONAL_FLOOR - 1));
        assert_eq!(TaskId::from_wire(PROVISIONAL_FLOOR), TaskId::Provisional(PROVISIONAL_FLOOR));
        assert_eq!(
            TaskId::from_wire(1_700_000_000_000),
            TaskId::Provisional(1_700_000_000_000)
        );
    }

    #[test]
    fn serializes_as_bare_number() {
        assert_eq!(serde_json::to_string(&TaskId::Confirmed(42)).unwrap(), "42");
        assert_eq!(
            serde_json::to_string(&TaskId::Provisional(1_700_000_000_000)).unwrap(),
            "1700000000000"
        );
    }

    #[test]
    fn deserializes_with_provenance() {
        let id: TaskId = serde_json::from_str("42").unwrap();
        assert_eq!(id, TaskId::Confirmed(42));
        let id: TaskId = serde_json::from_str("1700000000000").unwrap();
        assert!(id.is_provisional());
    }

    #[test]
    fn display_is_the_raw_number() {
        assert_eq!(TaskId::Confirmed(7).to_string(), "7");
        assert_eq!(TaskId::Provisional(1_700_000_000_000).to_string(), "1700000000000");
    }
}
