// Snapshot format migration
// Accepts the full {counts, log} snapshot and the older counts-only snapshot

use crate::session::StoreError;
use crate::session::types::{Counts, SessionState};
use serde::Deserialize;

/// Every snapshot shape the loader understands
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StoredSnapshot {
    Full(SessionState),
    /// Counts-only snapshot written by the summary-only tool (no event log)
    Legacy(Counts),
}

/// Migration result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationResult {
    pub state: SessionState,
    /// Whether the snapshot was in the legacy format
    pub migrated: bool,
}

/// Decode a stored snapshot, upgrading legacy counts-only snapshots
pub fn decode_snapshot(raw: &str) -> Result<MigrationResult, StoreError> {
    let result = match serde_json::from_str::<StoredSnapshot>(raw) {
        Ok(StoredSnapshot::Full(state)) => Ok(MigrationResult {
            state,
            migrated: false,
        }),
        Ok(StoredSnapshot::Legacy(counts)) => Ok(MigrationResult {
            state: SessionState {
                counts,
                log: Vec::new(),
            },
            migrated: true,
        }),
        Err(e) => Err(StoreError::Json(e)),
    }?;

    // Each count fits on its own; the displayed total must too
    if result.state.counts.checked_total().is_none() {
        return Err(StoreError::Malformed(
            "counts add up to more than u64::MAX".to_string(),
        ));
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::types::{Category, TallyEvent};

    #[test]
    fn test_full_snapshot() {
        let raw = r#"{
            "counts": {"folded-right": 2, "folded-left": 0, "unfolded-right": 0, "unfolded-left": 1},
            "log": [
                {"timestamp": 1, "category": "folded-right"},
                {"timestamp": 2, "category": "folded-right"},
                {"timestamp": 3, "category": "unfolded-left"}
            ]
        }"#;
        let result = decode_snapshot(raw).unwrap();
        assert!(!result.migrated);
        assert_eq!(result.state.counts.total(), 3);
        assert_eq!(result.state.log[2], TallyEvent::new(3, Category::UnfoldedLeft));
    }

    #[test]
    fn test_summary_and_logs_field_names() {
        let raw = r#"{
            "summary": {"folded-right": 1, "folded-left": 0, "unfolded-right": 0, "unfolded-left": 0},
            "logs": [{"t": 1700000000000, "type": "folded-right"}]
        }"#;
        let result = decode_snapshot(raw).unwrap();
        assert!(!result.migrated);
        assert_eq!(result.state.log.len(), 1);
        assert_eq!(result.state.counts.get(Category::FoldedRight), 1);
    }

    #[test]
    fn test_legacy_counts_only_snapshot() {
        let raw = r#"{"folded-right": 4, "folded-left": 3, "unfolded-right": 2, "unfolded-left": 1}"#;
        let result = decode_snapshot(raw).unwrap();
        assert!(result.migrated);
        assert_eq!(result.state.counts.total(), 10);
        assert!(result.state.log.is_empty());
    }

    #[test]
    fn test_malformed_snapshots_are_rejected() {
        let cases = [
            "",
            "not json",
            "[]",
            "null",
            r#"{"folded-right": 1}"#,
            r#"{"folded-right": -1, "folded-left": 0, "unfolded-right": 0, "unfolded-left": 0}"#,
            r#"{"counts": {"folded-right": 0, "folded-left": 0, "unfolded-right": 0, "unfolded-left": 0},
                "log": [{"timestamp": 1, "category": "sideways"}]}"#,
        ];
        for raw in cases {
            assert!(decode_snapshot(raw).is_err(), "accepted malformed snapshot: {raw}");
        }
    }

    #[test]
    fn test_overflowing_counts_are_rejected() {
        let full = r#"{
            "counts": {"folded-right": 18446744073709551615, "folded-left": 1, "unfolded-right": 0, "unfolded-left": 0},
            "log": []
        }"#;
        let legacy = r#"{"folded-right": 0, "folded-left": 0, "unfolded-right": 18446744073709551615, "unfolded-left": 1}"#;

        for raw in [full, legacy] {
            assert!(matches!(decode_snapshot(raw), Err(StoreError::Malformed(_))));
        }

        // The largest representable total is still accepted
        let at_limit = r#"{"folded-right": 18446744073709551615, "folded-left": 0, "unfolded-right": 0, "unfolded-left": 0}"#;
        assert_eq!(
            decode_snapshot(at_limit).unwrap().state.counts.total(),
            u64::MAX
        );
    }
}
