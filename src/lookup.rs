//! # Lookup Engine Module
//!
//! ## Purpose
//! Resolves a query into zero-or-one matching record by scanning the
//! in-memory Record Table. The engine owns an explicit table handle produced
//! at initialization; a failed load leaves the engine in a degraded state
//! that reports not-ready and refuses lookups with a typed outcome instead of
//! crashing the process.
//!
//! ## Input/Output Specification
//! - **Input**: A key value (or a composite of filter + key values) and the
//!   key-column mapping from configuration
//! - **Output**: `Ok(Some(record))`, `Ok(None)` for not-found, or a typed
//!   error (`InvalidQuery`, `DatasetUnavailable`, `Normalization`)
//! - **Tie-break**: first match in table (source concatenation) order wins
//!
//! ## Key Features
//! - Numeric equality for numeric keys, byte-exact equality for string keys
//! - Case-insensitive secondary filtering (consignee)
//! - O(n) ordered scan per query; no index, matching the small data volumes
//!   this service is built for

use crate::config::KeyColumns;
use crate::dataset::RecordTable;
use crate::errors::{LookupError, Result};
use crate::normalize;
use crate::records::{CarrierRecord, ContainerRecord};

/// Lookup key with the equality semantics of its column type
#[derive(Debug, Clone)]
pub enum Key {
    /// Numeric equality: a cell `"123.0"` matches `Integer(123)`
    Integer(i64),
    /// Byte-exact string equality
    Text(String),
}

impl Key {
    fn matches(&self, cell: &str) -> bool {
        match self {
            Key::Integer(expected) => normalize::parse_integer(cell) == Some(*expected),
            Key::Text(expected) => cell == expected,
        }
    }
}

/// Read-only lookup engine over the Record Table
pub struct LookupEngine {
    keys: KeyColumns,
    table: Option<RecordTable>,
}

impl LookupEngine {
    /// Create an engine from an explicit load outcome.
    ///
    /// Passing `None` builds a degraded engine: `is_ready()` is false and
    /// every lookup returns `DatasetUnavailable`.
    pub fn new(keys: KeyColumns, table: Option<RecordTable>) -> Self {
        Self { keys, table }
    }

    /// Whether the dataset loaded successfully at startup
    pub fn is_ready(&self) -> bool {
        self.table.is_some()
    }

    /// Number of rows available for lookup (zero when degraded)
    pub fn row_count(&self) -> usize {
        self.table.as_ref().map_or(0, RecordTable::row_count)
    }

    fn table(&self) -> Result<&RecordTable> {
        self.table.as_ref().ok_or_else(|| LookupError::DatasetUnavailable {
            details: "dataset failed to load at startup".to_string(),
        })
    }

    fn column(table: &RecordTable, name: &str) -> Result<usize> {
        table.column(name).ok_or_else(|| LookupError::MissingColumn {
            column: name.to_string(),
        })
    }

    /// Scan the table in order and return the first row whose `column` cell
    /// equals `key`. Ignores every later match; the table owns no uniqueness
    /// guarantee beyond what the data provides.
    fn find_by_exact_key(table: &RecordTable, column: usize, key: &Key) -> Option<usize> {
        table
            .row_indices()
            .find(|&row| key.matches(table.cell(row, column)))
    }

    /// Narrow the table to rows whose `filter_column` cell equals
    /// `filter_value` case-insensitively, then apply the exact-key scan
    /// within that subset.
    fn find_by_key_and_filter(
        table: &RecordTable,
        filter_column: usize,
        filter_value: &str,
        column: usize,
        key: &Key,
    ) -> Option<usize> {
        let filter_upper = filter_value.trim().to_uppercase();
        table
            .row_indices()
            .filter(|&row| table.cell(row, filter_column).to_uppercase() == filter_upper)
            .find(|&row| key.matches(table.cell(row, column)))
    }

    /// Look up a carrier by DOT number.
    ///
    /// Returns the first matching row normalized into a `CarrierRecord`, or
    /// `Ok(None)` when no row matches.
    pub fn lookup_carrier(&self, dot_number: i64) -> Result<Option<CarrierRecord>> {
        let table = self.table()?;
        let column = Self::column(table, &self.keys.dot_number)?;
        let key = Key::Integer(dot_number);

        match Self::find_by_exact_key(table, column, &key) {
            Some(row) => {
                tracing::debug!("Carrier lookup hit: DOT {} at row {}", dot_number, row);
                CarrierRecord::from_row(table, row).map(Some)
            }
            None => Ok(None),
        }
    }

    /// Look up a container record by container number or BOL reference,
    /// optionally scoped to a consignee.
    ///
    /// At least one of `container_number` and `bol` must be supplied; neither
    /// being usable is a caller error, not a not-found. When both are given
    /// the container number is matched first and the BOL is a fallback. A
    /// supplied consignee narrows either scan case-insensitively.
    pub fn lookup_container(
        &self,
        container_number: Option<&str>,
        bol: Option<&str>,
        consignee: Option<&str>,
    ) -> Result<Option<ContainerRecord>> {
        let container_number = container_number.map(str::trim).filter(|v| !v.is_empty());
        let bol = bol.map(str::trim).filter(|v| !v.is_empty());
        let consignee = consignee.map(str::trim).filter(|v| !v.is_empty());

        if container_number.is_none() && bol.is_none() {
            return Err(LookupError::InvalidQuery {
                reason: "must supply container_number or bol".to_string(),
            });
        }

        let table = self.table()?;

        let stages = [
            (container_number, &self.keys.container_number),
            (bol, &self.keys.bol),
        ];
        for (value, column_name) in stages {
            let Some(value) = value else { continue };
            let column = Self::column(table, column_name)?;
            let key = Key::Text(value.to_string());

            let hit = match consignee {
                Some(consignee) => {
                    let filter_column = Self::column(table, &self.keys.consignee)?;
                    Self::find_by_key_and_filter(table, filter_column, consignee, column, &key)
                }
                None => Self::find_by_exact_key(table, column, &key),
            };

            if let Some(row) = hit {
                tracing::debug!("Container lookup hit: {} = '{}' at row {}", column_name, value, row);
                return Ok(Some(ContainerRecord::from_row(table, row)));
            }
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KeyColumns;

    fn carrier_engine() -> LookupEngine {
        let table = RecordTable::from_rows(
            vec![
                "DOT_NUMBER".into(),
                "MC_NUMBER".into(),
                "COMPANY_NAME".into(),
                "PHY_STREET".into(),
                "PHY_CITY".into(),
                "PHY_STATE".into(),
                "PHY_ZIP".into(),
                "PHONE".into(),
                "CELL_PHONE".into(),
                "TRUCK_UNITS".into(),
                "POWER_UNITS".into(),
            ],
            vec![
                vec![
                    "123".into(),
                    "MC-1".into(),
                    "ACME TRUCKING".into(),
                    "1 Main St".into(),
                    "Springfield".into(),
                    "IL".into(),
                    "62701".into(),
                    "5551234567.0".into(),
                    "nan".into(),
                    "12".into(),
                    "10".into(),
                ],
                vec![
                    "456.0".into(),
                    "nan".into(),
                    "BETA HAULING".into(),
                    "2 Oak Ave".into(),
                    "Dayton".into(),
                    "OH".into(),
                    "45402".into(),
                    "5559876543".into(),
                    "5550001111.0".into(),
                    "3.0".into(),
                    "3".into(),
                ],
            ],
        );
        LookupEngine::new(KeyColumns::default(), Some(table))
    }

    fn container_engine() -> LookupEngine {
        let table = RecordTable::from_rows(
            vec![
                "CONTAINER_NUMBER".into(),
                "BOL_NUMBER".into(),
                "CONSIGNEE".into(),
                "VESSEL".into(),
            ],
            vec![
                vec!["CONT1".into(), "BOL1".into(), "ACME CORP".into(), "EVER A".into()],
                vec!["CONT1".into(), "BOL2".into(), "OTHER".into(), "EVER B".into()],
                vec!["CONT2".into(), "BOL3".into(), "ACME CORP".into(), "EVER C".into()],
            ],
        );
        LookupEngine::new(KeyColumns::default(), Some(table))
    }

    #[test]
    fn carrier_lookup_returns_normalized_match() {
        let engine = carrier_engine();
        let record = engine.lookup_carrier(123).unwrap().unwrap();
        assert_eq!(record.company_name, "ACME TRUCKING");
        assert_eq!(record.phone.as_deref(), Some("5551234567"));
        assert_eq!(record.cell_phone, None);
    }

    #[test]
    fn carrier_lookup_is_idempotent() {
        let engine = carrier_engine();
        let first = engine.lookup_carrier(123).unwrap();
        let second = engine.lookup_carrier(123).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn carrier_key_matches_float_shaped_cells() {
        let engine = carrier_engine();
        let record = engine.lookup_carrier(456).unwrap().unwrap();
        assert_eq!(record.company_name, "BETA HAULING");
        assert_eq!(record.truck_units, 3);
    }

    #[test]
    fn carrier_absent_key_is_not_found_not_an_error() {
        let engine = carrier_engine();
        assert!(engine.lookup_carrier(999).unwrap().is_none());
    }

    #[test]
    fn container_lookup_first_match_wins() {
        let engine = container_engine();
        let record = engine
            .lookup_container(Some("CONT1"), None, None)
            .unwrap()
            .unwrap();
        assert_eq!(record.get("BOL_NUMBER"), Some("BOL1"));
    }

    #[test]
    fn consignee_filter_is_case_insensitive() {
        let engine = container_engine();
        let record = engine
            .lookup_container(Some("CONT1"), None, Some("acme corp"))
            .unwrap()
            .unwrap();
        assert_eq!(record.get("CONSIGNEE"), Some("ACME CORP"));
        assert_eq!(record.get("BOL_NUMBER"), Some("BOL1"));

        let other = engine
            .lookup_container(Some("CONT1"), None, Some("other"))
            .unwrap()
            .unwrap();
        assert_eq!(record.get("CONTAINER_NUMBER"), other.get("CONTAINER_NUMBER"));
        assert_eq!(other.get("BOL_NUMBER"), Some("BOL2"));
    }

    #[test]
    fn bol_is_a_fallback_when_container_misses() {
        let engine = container_engine();
        let record = engine
            .lookup_container(Some("NOPE"), Some("BOL3"), None)
            .unwrap()
            .unwrap();
        assert_eq!(record.get("CONTAINER_NUMBER"), Some("CONT2"));
    }

    #[test]
    fn missing_both_keys_is_a_caller_error() {
        let engine = container_engine();
        let err = engine.lookup_container(None, None, None).unwrap_err();
        assert!(err.is_caller_error());

        // Blank values are as unusable as missing ones.
        let err = engine.lookup_container(Some("  "), Some(""), None).unwrap_err();
        assert!(err.is_caller_error());
    }

    #[test]
    fn degraded_engine_reports_not_ready_and_refuses_lookups() {
        let engine = LookupEngine::new(KeyColumns::default(), None);
        assert!(!engine.is_ready());
        assert_eq!(engine.row_count(), 0);
        assert!(matches!(
            engine.lookup_carrier(123),
            Err(LookupError::DatasetUnavailable { .. })
        ));
        assert!(matches!(
            engine.lookup_container(Some("CONT1"), None, None),
            Err(LookupError::DatasetUnavailable { .. })
        ));
    }

    #[test]
    fn caller_error_takes_precedence_over_unavailability() {
        let engine = LookupEngine::new(KeyColumns::default(), None);
        let err = engine.lookup_container(None, None, None).unwrap_err();
        assert!(err.is_caller_error());
    }
}
