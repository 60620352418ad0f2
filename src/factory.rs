//! Lookup-backed property hydration
//!
//! Turns stored rows into validated [`Property`] entities through an
//! injected [`PropertyLookup`] port. An absent row is "no such property"
//! (`None`), never an error; a malformed identifier is `InvalidArgument`.

use crate::db::PropertyRecord;
use crate::error::{IptuError, Result};
use crate::property::Property;

/// Lookup port over the property registry.
pub trait PropertyLookup {
    fn find_by_id(&self, id: i64) -> Result<Option<PropertyRecord>>;
    fn find_by_registration(&self, registration: i64) -> Result<Option<PropertyRecord>>;
}

/// Hydrate the property stored under `id`.
pub fn by_id(lookup: &dyn PropertyLookup, id: i64) -> Result<Option<Property>> {
    if id <= 0 {
        return Err(IptuError::InvalidArgument(format!("id {} must be positive", id)).into());
    }
    match lookup.find_by_id(id)? {
        Some(record) => Ok(Some(Property::from_record(&record)?)),
        None => Ok(None),
    }
}

/// Hydrate the property stored under a cadastral registration number.
pub fn by_registration(lookup: &dyn PropertyLookup, registration: i64) -> Result<Option<Property>> {
    if registration <= 0 {
        return Err(IptuError::InvalidArgument(format!(
            "registration {} must be positive",
            registration
        ))
        .into());
    }
    match lookup.find_by_registration(registration)? {
        Some(record) => Ok(Some(Property::from_record(&record)?)),
        None => Ok(None),
    }
}
