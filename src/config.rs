//! Category multiplier configuration
//!
//! The per-category tax multiplier is municipal business configuration, not
//! engine logic. Only the anchors confirmed by the fiscal tables ship as
//! defaults (A, B, C); any other letter resolves to a neutral 1.00 unless a
//! TOML table supplies it. Category 'Z' never reaches the table: it is the
//! distinguished "no tax" category, short-circuited by the calculator.

use std::collections::HashMap;
use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::{IptuError, Result};

/// Category that is exempt from IPTU altogether.
pub const NO_TAX_CATEGORY: char = 'Z';

/// Per-category tax multiplier table.
#[derive(Debug, Clone)]
pub struct CategoryTable {
    multipliers: HashMap<char, Decimal>,
}

#[derive(Deserialize)]
struct RawTable {
    multipliers: HashMap<String, Decimal>,
}

impl Default for CategoryTable {
    fn default() -> Self {
        let multipliers = HashMap::from([
            ('A', Decimal::new(110, 2)),
            ('B', Decimal::new(107, 2)),
            ('C', Decimal::new(105, 2)),
        ]);
        Self { multipliers }
    }
}

impl CategoryTable {
    /// Multiplier for a category letter; letters without an entry are neutral.
    pub fn multiplier(&self, category: char) -> Decimal {
        self.multipliers
            .get(&category)
            .copied()
            .unwrap_or(Decimal::ONE)
    }

    /// Parse a multiplier table from TOML, merged over the defaults.
    ///
    /// ```toml
    /// [multipliers]
    /// A = "1.10"
    /// D = "1.02"
    /// ```
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let raw: RawTable = toml::from_str(content)
            .map_err(|e| IptuError::Config(format!("invalid multiplier table: {}", e)))?;

        let mut table = Self::default();
        for (key, value) in raw.multipliers {
            let mut chars = key.chars();
            let letter = match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_ascii_uppercase() => c,
                _ => {
                    return Err(IptuError::Config(format!(
                        "multiplier key must be a single uppercase letter, got '{}'",
                        key
                    ))
                    .into());
                }
            };
            if value < Decimal::ZERO {
                return Err(IptuError::Config(format!(
                    "multiplier for '{}' must not be negative",
                    letter
                ))
                .into());
            }
            table.multipliers.insert(letter, value);
        }
        Ok(table)
    }

    /// Load a multiplier table from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(IptuError::Io)?;
        Self::from_toml_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_anchors() {
        let table = CategoryTable::default();
        assert_eq!(table.multiplier('A'), dec!(1.10));
        assert_eq!(table.multiplier('B'), dec!(1.07));
        assert_eq!(table.multiplier('C'), dec!(1.05));
    }

    #[test]
    fn test_unknown_letter_is_neutral() {
        let table = CategoryTable::default();
        assert_eq!(table.multiplier('D'), dec!(1));
        assert_eq!(table.multiplier('Y'), dec!(1));
    }

    #[test]
    fn test_toml_overrides_merge_over_defaults() {
        let table = CategoryTable::from_toml_str(
            r#"
            [multipliers]
            A = "1.20"
            D = "1.02"
            "#,
        )
        .unwrap();
        assert_eq!(table.multiplier('A'), dec!(1.20));
        assert_eq!(table.multiplier('D'), dec!(1.02));
        assert_eq!(table.multiplier('B'), dec!(1.07));
    }

    #[test]
    fn test_rejects_bad_keys() {
        assert!(CategoryTable::from_toml_str("[multipliers]\nAB = \"1.0\"").is_err());
        assert!(CategoryTable::from_toml_str("[multipliers]\na = \"1.0\"").is_err());
    }

    #[test]
    fn test_rejects_negative_multiplier() {
        assert!(CategoryTable::from_toml_str("[multipliers]\nA = \"-1.0\"").is_err());
    }
}
