//! Property entity
//!
//! A `Property` is a validated value entity: construction and every setter
//! re-check the field they touch, so an invalid instance can never be
//! observed. Persistence is delegated to a [`PropertyStore`] port passed in
//! explicitly; the entity never reaches for a global connection.

use std::fmt;

use chrono::{Datelike, Local, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::db::PropertyRecord;
use crate::error::{IptuError, Result};

/// Inclusive bounds of the 8-digit cadastral registration number.
pub const REGISTRATION_MIN: i64 = 10_000_000;
pub const REGISTRATION_MAX: i64 = 99_999_999;

/// Persistence port consumed by [`Property::save`] and [`Property::delete`].
///
/// Implementations signal failure through their return values (`0` / `false`)
/// and never propagate errors into the entity.
pub trait PropertyStore {
    /// Insert a new row, returning the generated id, or 0 on failure.
    fn insert(&self, property: &Property) -> i64;
    /// Update the row matching the property's id.
    fn update(&self, property: &Property) -> bool;
    /// Delete the row matching the property's id.
    fn delete(&self, property: &Property) -> bool;
}

/// One taxable urban property.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Property {
    id: i64,
    registration: i64,
    release_date: NaiveDate,
    assessed_value: Decimal,
    area: i64,
    category: char,
}

impl Property {
    /// Build a validated property, checking every field against today's date.
    pub fn new(
        registration: i64,
        release_date: NaiveDate,
        assessed_value: Decimal,
        area: i64,
        category: char,
    ) -> Result<Self> {
        Self::new_at(
            Local::now().date_naive(),
            registration,
            release_date,
            assessed_value,
            area,
            category,
        )
    }

    /// Build a validated property against a caller-supplied "today".
    pub fn new_at(
        today: NaiveDate,
        registration: i64,
        release_date: NaiveDate,
        assessed_value: Decimal,
        area: i64,
        category: char,
    ) -> Result<Self> {
        validate_registration(registration)?;
        validate_release_date(release_date, today)?;
        validate_assessed_value(assessed_value)?;
        validate_area(area)?;
        validate_category(category)?;

        Ok(Self {
            id: 0,
            registration,
            release_date,
            assessed_value,
            area,
            category,
        })
    }

    /// Hydrate a property from a stored row, carrying the persisted id.
    /// The row is re-validated: a corrupt record never becomes an entity.
    pub fn from_record(record: &PropertyRecord) -> Result<Self> {
        let mut property = Self::new(
            record.registration,
            record.release_date,
            record.assessed_value,
            record.area,
            record.category,
        )?;
        property.id = record.id;
        Ok(property)
    }

    pub fn to_record(&self) -> PropertyRecord {
        PropertyRecord {
            id: self.id,
            registration: self.registration,
            release_date: self.release_date,
            assessed_value: self.assessed_value,
            area: self.area,
            category: self.category,
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn registration(&self) -> i64 {
        self.registration
    }

    pub fn release_date(&self) -> NaiveDate {
        self.release_date
    }

    pub fn assessed_value(&self) -> Decimal {
        self.assessed_value
    }

    pub fn area(&self) -> i64 {
        self.area
    }

    pub fn category(&self) -> char {
        self.category
    }

    /// Whole years elapsed between the release date and `today`.
    pub fn age_years(&self, today: NaiveDate) -> i64 {
        let mut years = i64::from(today.year()) - i64::from(self.release_date.year());
        if (today.month(), today.day()) < (self.release_date.month(), self.release_date.day()) {
            years -= 1;
        }
        years
    }

    pub fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    pub fn set_registration(&mut self, registration: i64) -> Result<()> {
        validate_registration(registration)?;
        self.registration = registration;
        Ok(())
    }

    pub fn set_release_date(&mut self, release_date: NaiveDate) -> Result<()> {
        validate_release_date(release_date, Local::now().date_naive())?;
        self.release_date = release_date;
        Ok(())
    }

    pub fn set_assessed_value(&mut self, assessed_value: Decimal) -> Result<()> {
        validate_assessed_value(assessed_value)?;
        self.assessed_value = assessed_value;
        Ok(())
    }

    pub fn set_area(&mut self, area: i64) -> Result<()> {
        validate_area(area)?;
        self.area = area;
        Ok(())
    }

    pub fn set_category(&mut self, category: char) -> Result<()> {
        validate_category(category)?;
        self.category = category;
        Ok(())
    }

    /// Persist this property: insert when not yet stored (id 0), update
    /// otherwise. A failed insert leaves the id at 0; a failed update leaves
    /// the id unchanged.
    pub fn save(&mut self, store: &dyn PropertyStore) {
        if self.id == 0 {
            let id = store.insert(self);
            if id != 0 {
                self.id = id;
            }
        } else {
            store.update(self);
        }
    }

    /// Remove this property from the store. A no-op when the property was
    /// never persisted (id 0). The id is cleared only when the store
    /// confirms the delete.
    pub fn delete(&mut self, store: &dyn PropertyStore) {
        if self.id == 0 {
            return;
        }
        if store.delete(self) {
            self.id = 0;
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Property [id={}, registration={}, release_date={}, value={}, area={}, category={}]",
            self.id,
            self.registration,
            self.release_date,
            self.assessed_value,
            self.area,
            self.category
        )
    }
}

fn validate_registration(registration: i64) -> Result<()> {
    if !(REGISTRATION_MIN..=REGISTRATION_MAX).contains(&registration) {
        return Err(IptuError::InvalidProperty(format!(
            "registration number {} outside {}..={}",
            registration, REGISTRATION_MIN, REGISTRATION_MAX
        ))
        .into());
    }
    Ok(())
}

fn validate_release_date(release_date: NaiveDate, today: NaiveDate) -> Result<()> {
    if release_date > today {
        return Err(IptuError::InvalidProperty(format!(
            "release date {} is in the future",
            release_date
        ))
        .into());
    }
    Ok(())
}

fn validate_assessed_value(assessed_value: Decimal) -> Result<()> {
    if assessed_value <= Decimal::ZERO {
        return Err(IptuError::InvalidProperty(format!(
            "assessed value {} must be positive",
            assessed_value
        ))
        .into());
    }
    Ok(())
}

fn validate_area(area: i64) -> Result<()> {
    if area <= 0 {
        return Err(IptuError::InvalidProperty(format!(
            "area {} must be positive",
            area
        ))
        .into());
    }
    Ok(())
}

fn validate_category(category: char) -> Result<()> {
    if !category.is_ascii_uppercase() {
        return Err(IptuError::InvalidProperty(format!(
            "category '{}' must be an uppercase letter A-Z",
            category
        ))
        .into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::cell::{Cell, RefCell};

    fn years_ago(years: i32) -> NaiveDate {
        let today = Local::now().date_naive();
        today
            .with_year(today.year() - years)
            .unwrap_or_else(|| today - chrono::Days::new(365 * years as u64))
    }

    fn sample_property() -> Property {
        Property::new(12_345_678, years_ago(1), dec!(1000), 50, 'A').unwrap()
    }

    fn assert_invalid_property(result: Result<Property>) {
        let err = result.unwrap_err();
        match err.downcast_ref::<IptuError>() {
            Some(IptuError::InvalidProperty(_)) => {}
            other => panic!("expected InvalidProperty, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_construction() {
        let property = sample_property();
        assert_eq!(property.id(), 0);
        assert_eq!(property.registration(), 12_345_678);
        assert_eq!(property.assessed_value(), dec!(1000));
        assert_eq!(property.area(), 50);
        assert_eq!(property.category(), 'A');
    }

    #[test]
    fn test_registration_boundaries() {
        for registration in [10_000_000, 99_999_999] {
            assert!(Property::new(registration, years_ago(1), dec!(1000), 50, 'A').is_ok());
        }
        for registration in [9_999_999, 100_000_000, 119_999_999] {
            assert_invalid_property(Property::new(
                registration,
                years_ago(1),
                dec!(1000),
                50,
                'A',
            ));
        }
    }

    #[test]
    fn test_future_release_date_rejected() {
        let tomorrow = Local::now().date_naive() + chrono::Days::new(1);
        assert_invalid_property(Property::new(12_345_678, tomorrow, dec!(1000), 50, 'A'));
    }

    #[test]
    fn test_today_is_a_valid_release_date() {
        let today = Local::now().date_naive();
        assert!(Property::new(12_345_678, today, dec!(1000), 50, 'A').is_ok());
    }

    #[test]
    fn test_non_positive_value_rejected() {
        assert_invalid_property(Property::new(12_345_678, years_ago(1), dec!(0), 50, 'A'));
        assert_invalid_property(Property::new(12_345_678, years_ago(1), dec!(-10), 50, 'A'));
    }

    #[test]
    fn test_non_positive_area_rejected() {
        assert_invalid_property(Property::new(12_345_678, years_ago(1), dec!(1000), 0, 'A'));
        assert_invalid_property(Property::new(12_345_678, years_ago(1), dec!(1000), -5, 'A'));
    }

    #[test]
    fn test_category_must_be_uppercase_letter() {
        // '@' and '[' sit just outside 'A'..'Z' in ASCII
        for category in ['@', '[', 'a', '1', ' '] {
            assert_invalid_property(Property::new(
                12_345_678,
                years_ago(1),
                dec!(1000),
                50,
                category,
            ));
        }
        for category in ['A', 'M', 'Z'] {
            assert!(Property::new(12_345_678, years_ago(1), dec!(1000), 50, category).is_ok());
        }
    }

    #[test]
    fn test_setters_revalidate() {
        let mut property = sample_property();

        property.set_registration(87_654_321).unwrap();
        property.set_release_date(years_ago(5)).unwrap();
        property.set_assessed_value(dec!(5000)).unwrap();
        property.set_area(100).unwrap();
        property.set_category('C').unwrap();
        property.set_id(10);

        assert_eq!(property.registration(), 87_654_321);
        assert_eq!(property.release_date(), years_ago(5));
        assert_eq!(property.assessed_value(), dec!(5000));
        assert_eq!(property.area(), 100);
        assert_eq!(property.category(), 'C');
        assert_eq!(property.id(), 10);

        // a failing setter leaves the previous value in place
        assert!(property.set_registration(1).is_err());
        assert_eq!(property.registration(), 87_654_321);
        assert!(property.set_category('@').is_err());
        assert_eq!(property.category(), 'C');
    }

    #[test]
    fn test_age_years_counts_whole_years() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        let property = Property::new_at(
            today,
            12_345_678,
            NaiveDate::from_ymd_opt(2015, 6, 15).unwrap(),
            dec!(1000),
            50,
            'A',
        )
        .unwrap();
        assert_eq!(property.age_years(today), 10);

        // one day short of the anniversary
        let almost = Property::new_at(
            today,
            12_345_678,
            NaiveDate::from_ymd_opt(2015, 6, 16).unwrap(),
            dec!(1000),
            50,
            'A',
        )
        .unwrap();
        assert_eq!(almost.age_years(today), 9);
    }

    #[test]
    fn test_display_format() {
        let mut property = Property::new_at(
            NaiveDate::from_ymd_opt(2025, 6, 15).unwrap(),
            12_345_678,
            NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            dec!(1000.0),
            50,
            'A',
        )
        .unwrap();
        property.set_id(1);
        assert_eq!(
            property.to_string(),
            "Property [id=1, registration=12345678, release_date=2020-01-01, \
             value=1000.0, area=50, category=A]"
        );
    }

    /// In-memory store double; counts calls and scripts return values.
    struct FakeStore {
        insert_result: i64,
        update_result: bool,
        delete_result: bool,
        calls: RefCell<Vec<&'static str>>,
        delete_calls: Cell<u32>,
    }

    impl FakeStore {
        fn new(insert_result: i64, update_result: bool, delete_result: bool) -> Self {
            Self {
                insert_result,
                update_result,
                delete_result,
                calls: RefCell::new(Vec::new()),
                delete_calls: Cell::new(0),
            }
        }
    }

    impl PropertyStore for FakeStore {
        fn insert(&self, _property: &Property) -> i64 {
            self.calls.borrow_mut().push("insert");
            self.insert_result
        }

        fn update(&self, _property: &Property) -> bool {
            self.calls.borrow_mut().push("update");
            self.update_result
        }

        fn delete(&self, _property: &Property) -> bool {
            self.calls.borrow_mut().push("delete");
            self.delete_calls.set(self.delete_calls.get() + 1);
            self.delete_result
        }
    }

    #[test]
    fn test_save_inserts_when_unpersisted() {
        let store = FakeStore::new(42, true, true);
        let mut property = sample_property();
        property.save(&store);
        assert_eq!(property.id(), 42);
        assert_eq!(*store.calls.borrow(), vec!["insert"]);
    }

    #[test]
    fn test_save_keeps_zero_id_on_failed_insert() {
        let store = FakeStore::new(0, true, true);
        let mut property = sample_property();
        property.save(&store);
        assert_eq!(property.id(), 0);
    }

    #[test]
    fn test_save_updates_when_persisted() {
        let store = FakeStore::new(42, true, true);
        let mut property = sample_property();
        property.set_id(10);
        property.save(&store);
        assert_eq!(property.id(), 10);
        assert_eq!(*store.calls.borrow(), vec!["update"]);
    }

    #[test]
    fn test_delete_is_noop_at_id_zero() {
        let store = FakeStore::new(0, true, true);
        let mut property = sample_property();
        property.delete(&store);
        assert_eq!(store.delete_calls.get(), 0);
        assert_eq!(property.id(), 0);
    }

    #[test]
    fn test_delete_clears_id_on_success() {
        let store = FakeStore::new(0, true, true);
        let mut property = sample_property();
        property.set_id(15);
        property.delete(&store);
        assert_eq!(property.id(), 0);
        assert_eq!(store.delete_calls.get(), 1);
    }

    #[test]
    fn test_delete_keeps_id_on_failure() {
        let store = FakeStore::new(0, true, false);
        let mut property = sample_property();
        property.set_id(20);
        property.delete(&store);
        assert_eq!(property.id(), 20);
        assert_eq!(store.delete_calls.get(), 1);
    }

    #[test]
    fn test_from_record_carries_id() {
        let record = PropertyRecord {
            id: 5,
            registration: 87_654_321,
            release_date: years_ago(2),
            assessed_value: dec!(2000),
            area: 80,
            category: 'B',
        };
        let property = Property::from_record(&record).unwrap();
        assert_eq!(property.id(), 5);
        assert_eq!(property.registration(), 87_654_321);
        assert_eq!(property.assessed_value(), dec!(2000));
        assert_eq!(property.area(), 80);
        assert_eq!(property.category(), 'B');
    }

    #[test]
    fn test_from_record_rejects_corrupt_row() {
        let record = PropertyRecord {
            id: 5,
            registration: 1, // out of cadastral range
            release_date: years_ago(2),
            assessed_value: dec!(2000),
            area: 80,
            category: 'B',
        };
        assert_invalid_property(Property::from_record(&record));
    }
}
