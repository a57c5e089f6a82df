//! # Response Record Module
//!
//! Normalized record shapes returned by the lookup engine. A `CarrierRecord`
//! is fully typed with the field names the original service exposed; a
//! `ContainerRecord` carries its key fields plus the open column set passed
//! through verbatim.

use crate::dataset::RecordTable;
use crate::errors::{LookupError, Result};
use crate::normalize;
use serde::Serialize;
use serde_json::Value;

/// Carrier column names fixed by the dataset schema
mod carrier_columns {
    pub const DOT_NUMBER: &str = "DOT_NUMBER";
    pub const MC_NUMBER: &str = "MC_NUMBER";
    pub const COMPANY_NAME: &str = "COMPANY_NAME";
    pub const PHY_STREET: &str = "PHY_STREET";
    pub const PHY_CITY: &str = "PHY_CITY";
    pub const PHY_STATE: &str = "PHY_STATE";
    pub const PHY_ZIP: &str = "PHY_ZIP";
    pub const PHONE: &str = "PHONE";
    pub const CELL_PHONE: &str = "CELL_PHONE";
    pub const TRUCK_UNITS: &str = "TRUCK_UNITS";
    pub const POWER_UNITS: &str = "POWER_UNITS";
}

/// Normalized carrier record, serialized with the original field names
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CarrierRecord {
    #[serde(rename = "DOT_NUMBER")]
    pub dot_number: i64,
    #[serde(rename = "MC_NUMBER")]
    pub mc_number: Option<String>,
    #[serde(rename = "COMPANY_NAME")]
    pub company_name: String,
    #[serde(rename = "PHY_STREET")]
    pub phy_street: String,
    #[serde(rename = "PHY_CITY")]
    pub phy_city: String,
    #[serde(rename = "PHY_STATE")]
    pub phy_state: String,
    #[serde(rename = "PHY_ZIP")]
    pub phy_zip: String,
    #[serde(rename = "PHONE")]
    pub phone: Option<String>,
    #[serde(rename = "CELL_PHONE")]
    pub cell_phone: Option<String>,
    #[serde(rename = "TRUCK_UNITS")]
    pub truck_units: i64,
    #[serde(rename = "POWER_UNITS")]
    pub power_units: i64,
}

impl CarrierRecord {
    /// Build a normalized carrier record from one table row.
    ///
    /// Required fields that are absent or unparseable surface as
    /// `Normalization` errors; they are data defects, not not-found.
    pub fn from_row(table: &RecordTable, row: usize) -> Result<Self> {
        use carrier_columns as col;

        let raw = |name: &str| -> Result<&str> {
            let idx = table.column(name).ok_or_else(|| LookupError::MissingColumn {
                column: name.to_string(),
            })?;
            Ok(table.cell(row, idx))
        };

        Ok(Self {
            dot_number: normalize::integer(raw(col::DOT_NUMBER)?, col::DOT_NUMBER)?,
            mc_number: normalize::optional_string(raw(col::MC_NUMBER)?),
            company_name: normalize::required_string(raw(col::COMPANY_NAME)?, col::COMPANY_NAME)?,
            phy_street: normalize::required_string(raw(col::PHY_STREET)?, col::PHY_STREET)?,
            phy_city: normalize::required_string(raw(col::PHY_CITY)?, col::PHY_CITY)?,
            phy_state: normalize::required_string(raw(col::PHY_STATE)?, col::PHY_STATE)?,
            phy_zip: normalize::required_string(raw(col::PHY_ZIP)?, col::PHY_ZIP)?,
            phone: normalize::phone(raw(col::PHONE)?, col::PHONE)?,
            cell_phone: normalize::phone(raw(col::CELL_PHONE)?, col::CELL_PHONE)?,
            truck_units: normalize::integer(raw(col::TRUCK_UNITS)?, col::TRUCK_UNITS)?,
            power_units: normalize::integer(raw(col::POWER_UNITS)?, col::POWER_UNITS)?,
        })
    }
}

/// Normalized container record: every column of the row, passed through
/// verbatim with absent cells rendered as JSON null.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ContainerRecord {
    pub fields: serde_json::Map<String, Value>,
}

impl ContainerRecord {
    /// Build a container record from one table row
    pub fn from_row(table: &RecordTable, row: usize) -> Self {
        let mut fields = serde_json::Map::new();
        for (idx, header) in table.headers().iter().enumerate() {
            let value = match normalize::passthrough(table.cell(row, idx)) {
                Some(text) => Value::String(text),
                None => Value::Null,
            };
            fields.insert(header.clone(), value);
        }
        Self { fields }
    }

    /// Value of a named field, if present and non-null
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn carrier_table() -> RecordTable {
        RecordTable::from_rows(
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
            vec![vec![
                "123".into(),
                "nan".into(),
                "ACME TRUCKING".into(),
                "1 Main St".into(),
                "Springfield".into(),
                "IL".into(),
                "62701".into(),
                "5551234567.0".into(),
                "".into(),
                "12.0".into(),
                "10".into(),
            ]],
        )
    }

    #[test]
    fn carrier_record_normalizes_every_field() {
        let table = carrier_table();
        let record = CarrierRecord::from_row(&table, 0).unwrap();
        assert_eq!(record.dot_number, 123);
        assert_eq!(record.mc_number, None);
        assert_eq!(record.company_name, "ACME TRUCKING");
        assert_eq!(record.phone.as_deref(), Some("5551234567"));
        assert_eq!(record.cell_phone, None);
        assert_eq!(record.truck_units, 12);
        assert_eq!(record.power_units, 10);
    }

    #[test]
    fn carrier_record_serializes_with_original_field_names() {
        let table = carrier_table();
        let record = CarrierRecord::from_row(&table, 0).unwrap();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["DOT_NUMBER"], 123);
        assert_eq!(json["PHONE"], "5551234567");
        assert_eq!(json["MC_NUMBER"], Value::Null);
    }

    #[test]
    fn carrier_record_missing_required_field_is_an_error() {
        let mut headers = carrier_table().headers().to_vec();
        headers.retain(|h| h != "TRUCK_UNITS");
        let table = RecordTable::from_rows(headers, vec![vec!["123".into(); 10]]);
        assert!(matches!(
            CarrierRecord::from_row(&table, 0),
            Err(LookupError::MissingColumn { column }) if column == "TRUCK_UNITS"
        ));
    }

    #[test]
    fn container_record_passes_open_columns_through() {
        let table = RecordTable::from_rows(
            vec![
                "CONTAINER_NUMBER".into(),
                "BOL_NUMBER".into(),
                "CONSIGNEE".into(),
                "VESSEL".into(),
                "SEAL".into(),
            ],
            vec![vec![
                "CONT1".into(),
                "BOL9".into(),
                "ACME CORP".into(),
                "EVER GIVEN".into(),
                "nan".into(),
            ]],
        );
        let record = ContainerRecord::from_row(&table, 0);
        assert_eq!(record.get("VESSEL"), Some("EVER GIVEN"));
        assert_eq!(record.fields["SEAL"], Value::Null);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["CONTAINER_NUMBER"], "CONT1");
    }
}
