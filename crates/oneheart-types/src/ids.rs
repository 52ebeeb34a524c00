//! Type-safe identifier wrappers around [`Uuid`].
//!
//! Every record in the backend has a strongly-typed ID so a quest ID can
//! never be passed where a player ID is expected. All IDs use UUID v7
//! (time-ordered), which keeps inserts index-friendly and stays unique
//! under concurrent creation within the same millisecond.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Generates a newtype wrapper around [`Uuid`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[serde(transparent)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new identifier using UUID v7 (time-ordered).
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Return the inner [`Uuid`] value.
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Unique identifier for a player.
    PlayerId
}

define_id! {
    /// Unique identifier for a quest definition.
    QuestId
}

define_id! {
    /// Unique identifier for a player-quest assignment row.
    AssignmentId
}

define_id! {
    /// Unique identifier for an impact log entry.
    ImpactLogId
}

define_id! {
    /// Unique identifier for a token ledger transaction.
    TransactionId
}

define_id! {
    /// Unique identifier for a planned Worldwalker expedition.
    ExpeditionId
}

define_id! {
    /// Unique identifier for a synchronized global mission.
    MissionId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_distinct_types() {
        let player = PlayerId::new();
        let quest = QuestId::new();
        assert_ne!(player.into_inner(), Uuid::nil());
        assert_ne!(quest.into_inner(), Uuid::nil());
    }

    #[test]
    fn ids_serialize_as_bare_uuid() {
        let id = PlayerId::new();
        let json = serde_json::to_string(&id).unwrap_or_default();
        assert_eq!(json, format!("\"{}\"", id.into_inner()));
    }

    #[test]
    fn ids_generated_back_to_back_are_unique() {
        let a = TransactionId::new();
        let b = TransactionId::new();
        assert_ne!(a, b);
    }
}
