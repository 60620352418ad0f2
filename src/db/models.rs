use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One stored property row, as it exists in the registry.
///
/// Records are raw rows: they carry no validation of their own. Hydration
/// into a [`crate::property::Property`] re-validates every field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyRecord {
    pub id: i64,
    pub registration: i64,
    pub release_date: NaiveDate,
    pub assessed_value: Decimal,
    pub area: i64,
    pub category: char,
}
