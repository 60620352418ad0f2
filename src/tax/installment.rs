//! Installment plan amortization
//!
//! The assessed tax value is amortized over a fixed tier of installments
//! (0, 3, 5 or 10). The per-installment value compounds the annual interest
//! rate forward over the plan's fractional-year duration and divides evenly,
//! rounding each installment to cents.

use rust_decimal::{Decimal, MathematicalOps};
use serde::Serialize;

use crate::error::{IptuError, Result};
use crate::money;

/// Largest tax value admitted to the 3-installment tier.
/// Boundary pending confirmation by the municipality's fiscal tables.
pub const TIER_THREE_MAX: i64 = 300;
/// Largest tax value admitted to the 5-installment tier.
/// Boundary pending confirmation by the municipality's fiscal tables.
pub const TIER_FIVE_MAX: i64 = 600;

const MONTHS_PER_YEAR: i64 = 12;

/// Amortization of a tax value over a fixed installment tier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstallmentPlan {
    installment_count: u32,
    installment_value: Decimal,
    total_value: Decimal,
}

impl InstallmentPlan {
    /// Build a plan for `tax_value` at `annual_interest` percent per year.
    ///
    /// A zero tax value yields the zero-installment plan. Fails with
    /// `InvalidArgument` on a negative tax value or interest rate.
    pub fn new(tax_value: Decimal, annual_interest: Decimal) -> Result<Self> {
        if tax_value < Decimal::ZERO {
            return Err(IptuError::InvalidArgument(format!(
                "tax value {} must not be negative",
                tax_value
            ))
            .into());
        }
        if annual_interest < Decimal::ZERO {
            return Err(IptuError::InvalidArgument(format!(
                "annual interest {} must not be negative",
                annual_interest
            ))
            .into());
        }

        let installment_count = tier_for(tax_value);
        if installment_count == 0 {
            return Ok(Self {
                installment_count: 0,
                installment_value: Decimal::ZERO,
                total_value: Decimal::ZERO,
            });
        }

        // value * (1 + r/100)^(n/12) / n, rounded to cents per installment
        let rate = Decimal::ONE + annual_interest / Decimal::ONE_HUNDRED;
        let duration_years =
            Decimal::from(installment_count) / Decimal::from(MONTHS_PER_YEAR);
        let compounded = tax_value * rate.powd(duration_years);
        let installment_value = money::round(compounded / Decimal::from(installment_count));
        let total_value = installment_value * Decimal::from(installment_count);

        Ok(Self {
            installment_count,
            installment_value,
            total_value,
        })
    }

    pub fn installment_count(&self) -> u32 {
        self.installment_count
    }

    pub fn installment_value(&self) -> Decimal {
        self.installment_value
    }

    pub fn total_value(&self) -> Decimal {
        self.total_value
    }
}

/// Smallest tier whose upper threshold admits the tax value.
fn tier_for(tax_value: Decimal) -> u32 {
    if tax_value <= Decimal::ZERO {
        0
    } else if tax_value <= Decimal::from(TIER_THREE_MAX) {
        3
    } else if tax_value <= Decimal::from(TIER_FIVE_MAX) {
        5
    } else {
        10
    }
}
