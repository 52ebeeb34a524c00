//! Conversions between domain values and their column representations.
//!
//! Enums are stored as `TEXT` guarded by `CHECK` constraints. Unsigned
//! counters are stored as signed `PostgreSQL` integers.

use uuid::Uuid;

use oneheart_types::{
    Alignment, AssignmentStatus, ExpeditionId, ImpactReference, MissionId, QuestCategory,
    QuestId, TokenTxType,
};

use crate::error::DbError;

/// Convert an [`Alignment`] to its column string.
pub(crate) const fn alignment_to_db(alignment: Alignment) -> &'static str {
    match alignment {
        Alignment::Balanced => "balanced",
        Alignment::Generous => "generous",
        Alignment::Service => "service",
        Alignment::Growth => "growth",
        Alignment::Community => "community",
        Alignment::Other => "other",
    }
}

/// Parse an [`Alignment`] column string.
pub(crate) fn alignment_from_db(value: &str) -> Result<Alignment, DbError> {
    match value {
        "balanced" => Ok(Alignment::Balanced),
        "generous" => Ok(Alignment::Generous),
        "service" => Ok(Alignment::Service),
        "growth" => Ok(Alignment::Growth),
        "community" => Ok(Alignment::Community),
        "other" => Ok(Alignment::Other),
        other => Err(DbError::Decode(format!("unknown alignment: {other}"))),
    }
}

/// Convert a [`QuestCategory`] to its column string.
pub(crate) const fn category_to_db(category: QuestCategory) -> &'static str {
    match category {
        QuestCategory::Cleanup => "cleanup",
        QuestCategory::Training => "training",
        QuestCategory::Cultural => "cultural",
        QuestCategory::Research => "research",
        QuestCategory::Sports => "sports",
    }
}

/// Parse a [`QuestCategory`] column string.
pub(crate) fn category_from_db(value: &str) -> Result<QuestCategory, DbError> {
    match value {
        "cleanup" => Ok(QuestCategory::Cleanup),
        "training" => Ok(QuestCategory::Training),
        "cultural" => Ok(QuestCategory::Cultural),
        "research" => Ok(QuestCategory::Research),
        "sports" => Ok(QuestCategory::Sports),
        other => Err(DbError::Decode(format!("unknown quest category: {other}"))),
    }
}

/// Convert an [`AssignmentStatus`] to its column string.
pub(crate) const fn status_to_db(status: AssignmentStatus) -> &'static str {
    match status {
        AssignmentStatus::Available => "available",
        AssignmentStatus::Completed => "completed",
    }
}

/// Parse an [`AssignmentStatus`] column string.
pub(crate) fn status_from_db(value: &str) -> Result<AssignmentStatus, DbError> {
    match value {
        "available" => Ok(AssignmentStatus::Available),
        "completed" => Ok(AssignmentStatus::Completed),
        other => Err(DbError::Decode(format!("unknown assignment status: {other}"))),
    }
}

/// Convert a [`TokenTxType`] to its column string.
pub(crate) const fn tx_type_to_db(tx_type: TokenTxType) -> &'static str {
    match tx_type {
        TokenTxType::Mint => "mint",
        TokenTxType::Burn => "burn",
        TokenTxType::Transfer => "transfer",
        TokenTxType::Redeem => "redeem",
    }
}

/// Parse a [`TokenTxType`] column string.
pub(crate) fn tx_type_from_db(value: &str) -> Result<TokenTxType, DbError> {
    match value {
        "mint" => Ok(TokenTxType::Mint),
        "burn" => Ok(TokenTxType::Burn),
        "transfer" => Ok(TokenTxType::Transfer),
        "redeem" => Ok(TokenTxType::Redeem),
        other => Err(DbError::Decode(format!("unknown token tx type: {other}"))),
    }
}

/// Split an [`ImpactReference`] into its kind column and id column.
pub(crate) const fn reference_to_db(reference: ImpactReference) -> (&'static str, Uuid) {
    match reference {
        ImpactReference::Quest(id) => ("quest", id.into_inner()),
        ImpactReference::GlobalMission(id) => ("global_mission", id.into_inner()),
        ImpactReference::Expedition(id) => ("expedition", id.into_inner()),
    }
}

/// Rebuild an [`ImpactReference`] from its kind and id columns.
pub(crate) fn reference_from_db(kind: &str, id: Uuid) -> Result<ImpactReference, DbError> {
    match kind {
        "quest" => Ok(ImpactReference::Quest(QuestId::from(id))),
        "global_mission" => Ok(ImpactReference::GlobalMission(MissionId::from(id))),
        "expedition" => Ok(ImpactReference::Expedition(ExpeditionId::from(id))),
        other => Err(DbError::Decode(format!("unknown impact reference kind: {other}"))),
    }
}

/// Store an unsigned counter in a `BIGINT` column, saturating.
pub(crate) fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Store an unsigned value in an `INTEGER` column, saturating.
pub(crate) fn to_i32(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

/// Read a `BIGINT` column that must not be negative.
pub(crate) fn to_u64(field: &str, value: i64) -> Result<u64, DbError> {
    u64::try_from(value).map_err(|e| DbError::Decode(format!("{field} = {value}: {e}")))
}

/// Read an `INTEGER` column that must not be negative.
pub(crate) fn to_u32(field: &str, value: i32) -> Result<u32, DbError> {
    u32::try_from(value).map_err(|e| DbError::Decode(format!("{field} = {value}: {e}")))
}

/// Derive a transaction-scoped advisory lock key from a UUID.
pub(crate) fn advisory_key(id: Uuid) -> i64 {
    let (high, low) = id.as_u64_pair();
    i64::from_ne_bytes((high ^ low).to_ne_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enum_strings_match_check_constraints() {
        for category in QuestCategory::ALL {
            let parsed = category_from_db(category_to_db(category));
            assert_eq!(parsed.ok(), Some(category));
        }
        for tx_type in [
            TokenTxType::Mint,
            TokenTxType::Burn,
            TokenTxType::Transfer,
            TokenTxType::Redeem,
        ] {
            assert_eq!(tx_type_from_db(tx_type_to_db(tx_type)).ok(), Some(tx_type));
        }
    }

    #[test]
    fn unknown_strings_are_decode_errors() {
        assert!(matches!(alignment_from_db("greedy"), Err(DbError::Decode(_))));
        assert!(matches!(status_from_db("pending"), Err(DbError::Decode(_))));
    }

    #[test]
    fn reference_splits_and_rejoins() {
        let id = ExpeditionId::new();
        let (kind, uuid) = reference_to_db(ImpactReference::Expedition(id));
        assert_eq!(kind, "expedition");
        assert_eq!(
            reference_from_db(kind, uuid).ok(),
            Some(ImpactReference::Expedition(id))
        );
    }

    #[test]
    fn negative_counters_are_rejected() {
        assert!(to_u64("xp_total", -1).is_err());
        assert_eq!(to_i64(u64::MAX), i64::MAX);
    }

    #[test]
    fn advisory_key_is_stable() {
        let id = Uuid::now_v7();
        assert_eq!(advisory_key(id), advisory_key(id));
    }
}
