// Database module - SQLite connection and the property registry store

pub mod models;

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::property::{Property, PropertyStore};
pub use models::PropertyRecord;

/// Get the default database path (~/.iptu/data.db)
pub fn get_default_db_path() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    let iptu_dir = PathBuf::from(home).join(".iptu");

    std::fs::create_dir_all(&iptu_dir).context("Failed to create .iptu directory")?;

    Ok(iptu_dir.join("data.db"))
}

/// Open database connection
pub fn open_db(db_path: Option<PathBuf>) -> Result<Connection> {
    let path = db_path.unwrap_or(get_default_db_path()?);
    let conn = Connection::open(&path).context(format!("Failed to open database at {:?}", path))?;

    conn.execute("PRAGMA foreign_keys = ON", [])
        .context("Failed to enable foreign keys")?;

    Ok(conn)
}

/// Initialize an open connection with the registry schema
pub fn init_database(conn: &Connection) -> Result<()> {
    let schema_sql = include_str!("schema.sql");

    conn.execute_batch(schema_sql)
        .context("Failed to execute schema")?;

    info!("Property registry initialized");
    Ok(())
}

/// Insert a property row, returning the generated id
pub fn insert_property(conn: &Connection, property: &Property) -> Result<i64> {
    conn.execute(
        "INSERT INTO properties (registration, release_date, assessed_value, area, category)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            property.registration(),
            property.release_date(),
            property.assessed_value().to_string(),
            property.area(),
            property.category().to_string(),
        ],
    )?;

    Ok(conn.last_insert_rowid())
}

/// Update the row matching the property's id, returning whether a row changed
pub fn update_property(conn: &Connection, property: &Property) -> Result<bool> {
    let changed = conn.execute(
        "UPDATE properties
         SET registration = ?1, release_date = ?2, assessed_value = ?3, area = ?4, category = ?5
         WHERE id = ?6",
        params![
            property.registration(),
            property.release_date(),
            property.assessed_value().to_string(),
            property.area(),
            property.category().to_string(),
            property.id(),
        ],
    )?;

    Ok(changed > 0)
}

/// Delete the row matching the property's id, returning whether a row changed
pub fn delete_property(conn: &Connection, property: &Property) -> Result<bool> {
    let changed = conn.execute(
        "DELETE FROM properties WHERE id = ?1",
        params![property.id()],
    )?;

    Ok(changed > 0)
}

/// Fetch a property row by id
pub fn get_property_by_id(conn: &Connection, id: i64) -> Result<Option<PropertyRecord>> {
    let mut stmt = conn.prepare(
        "SELECT id, registration, release_date, assessed_value, area, category
         FROM properties WHERE id = ?1",
    )?;

    let record = stmt
        .query_row(params![id], record_from_row)
        .optional()
        .context("Failed to query property by id")?;

    Ok(record)
}

/// Fetch a property row by cadastral registration number
pub fn get_property_by_registration(
    conn: &Connection,
    registration: i64,
) -> Result<Option<PropertyRecord>> {
    let mut stmt = conn.prepare(
        "SELECT id, registration, release_date, assessed_value, area, category
         FROM properties WHERE registration = ?1",
    )?;

    let record = stmt
        .query_row(params![registration], record_from_row)
        .optional()
        .context("Failed to query property by registration")?;

    Ok(record)
}

fn record_from_row(row: &rusqlite::Row) -> Result<PropertyRecord, rusqlite::Error> {
    let category: String = row.get(5)?;
    let category = category.chars().next().ok_or_else(|| {
        rusqlite::Error::InvalidColumnType(5, "category".to_string(), rusqlite::types::Type::Null)
    })?;

    Ok(PropertyRecord {
        id: row.get(0)?,
        registration: row.get(1)?,
        release_date: row.get(2)?,
        assessed_value: get_decimal_value(row, 3)?,
        area: row.get(4)?,
        category,
    })
}

/// Helper to read Decimal from SQLite (handles both TEXT and numeric affinity)
fn get_decimal_value(row: &rusqlite::Row, idx: usize) -> Result<Decimal, rusqlite::Error> {
    if let Ok(s) = row.get::<_, String>(idx) {
        return Decimal::from_str(&s)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)));
    }

    if let Ok(i) = row.get::<_, i64>(idx) {
        return Ok(Decimal::from(i));
    }

    if let Ok(f) = row.get::<_, f64>(idx) {
        return Decimal::try_from(f)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)));
    }

    Err(rusqlite::Error::InvalidColumnType(
        idx,
        "assessed_value".to_string(),
        rusqlite::types::Type::Null,
    ))
}

/// SQLite-backed implementation of the persistence and lookup ports,
/// borrowing an explicitly passed connection handle.
pub struct SqliteStore<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

// Port contract: failures stay inside the store, signalled as 0/false.
impl PropertyStore for SqliteStore<'_> {
    fn insert(&self, property: &Property) -> i64 {
        match insert_property(self.conn, property) {
            Ok(id) => id,
            Err(e) => {
                warn!("property insert failed: {:#}", e);
                0
            }
        }
    }

    fn update(&self, property: &Property) -> bool {
        match update_property(self.conn, property) {
            Ok(changed) => changed,
            Err(e) => {
                warn!("property update failed: {:#}", e);
                false
            }
        }
    }

    fn delete(&self, property: &Property) -> bool {
        match delete_property(self.conn, property) {
            Ok(changed) => changed,
            Err(e) => {
                warn!("property delete failed: {:#}", e);
                false
            }
        }
    }
}

impl crate::factory::PropertyLookup for SqliteStore<'_> {
    fn find_by_id(&self, id: i64) -> Result<Option<PropertyRecord>> {
        get_property_by_id(self.conn, id)
    }

    fn find_by_registration(&self, registration: i64) -> Result<Option<PropertyRecord>> {
        get_property_by_registration(self.conn, registration)
    }
}
