//! Tax value calculation
//!
//! Computes the annual IPTU due for one property: an area-tiered percentage
//! of the assessed value, scaled by the category multiplier, discounted by
//! building age, then packaged with the cash price and installment plan.

use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::config::{CategoryTable, NO_TAX_CATEGORY};
use crate::error::{IptuError, Result};
use crate::money;
use crate::property::Property;
use crate::tax::InstallmentPlan;

/// Square meters covered by one area tier.
const AREA_TIER_SIZE: i64 = 20;
/// Percentage points of assessed value added per area tier.
const AREA_TIER_PERCENT: Decimal = Decimal::from_parts(5, 0, 0, false, 2); // 0.05
/// Buildings at least this old are exempt.
const AGE_EXEMPTION_YEARS: i64 = 170;
/// Age discount accrues once per this many whole years.
const AGE_DISCOUNT_STEP_YEARS: i64 = 5;
/// Discount fraction granted per accrued step.
const AGE_DISCOUNT_PER_STEP: Decimal = Decimal::from_parts(3, 0, 0, false, 2); // 0.03

/// The three output values of one assessment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssessmentResult {
    /// Final annual tax due.
    pub tax_value: Decimal,
    /// Price when paid in a single upfront payment, after the cash discount.
    pub cash_value: Decimal,
    /// Amortization of the tax value; zero installments when no tax is due.
    pub installment_plan: InstallmentPlan,
}

/// Stateless assessment over one property and a category multiplier table.
pub struct TaxCalculator<'a> {
    property: &'a Property,
    table: CategoryTable,
}

impl<'a> TaxCalculator<'a> {
    pub fn new(property: &'a Property) -> Self {
        Self::with_table(property, CategoryTable::default())
    }

    pub fn with_table(property: &'a Property, table: CategoryTable) -> Self {
        Self { property, table }
    }

    /// Assess against today's date.
    pub fn assess(
        &self,
        cash_discount_percent: Decimal,
        annual_interest_percent: Decimal,
    ) -> Result<AssessmentResult> {
        self.assess_at(
            Local::now().date_naive(),
            cash_discount_percent,
            annual_interest_percent,
        )
    }

    /// Assess against a caller-supplied "today".
    ///
    /// Fails with `InvalidArgument` unless `0 <= cash_discount_percent <= 100`
    /// and `annual_interest_percent >= 0`.
    pub fn assess_at(
        &self,
        today: NaiveDate,
        cash_discount_percent: Decimal,
        annual_interest_percent: Decimal,
    ) -> Result<AssessmentResult> {
        if cash_discount_percent < Decimal::ZERO || cash_discount_percent > Decimal::ONE_HUNDRED {
            return Err(IptuError::InvalidArgument(format!(
                "cash discount {} outside 0..=100",
                cash_discount_percent
            ))
            .into());
        }
        if annual_interest_percent < Decimal::ZERO {
            return Err(IptuError::InvalidArgument(format!(
                "annual interest {} must not be negative",
                annual_interest_percent
            ))
            .into());
        }

        let tax_value = self.tax_value_at(today);
        let cash_value = money::round(
            tax_value * (Decimal::ONE - cash_discount_percent / Decimal::ONE_HUNDRED),
        );
        let installment_plan = InstallmentPlan::new(tax_value, annual_interest_percent)?;

        Ok(AssessmentResult {
            tax_value,
            cash_value,
            installment_plan,
        })
    }

    fn tax_value_at(&self, today: NaiveDate) -> Decimal {
        if self.property.category() == NO_TAX_CATEGORY {
            return Decimal::ZERO;
        }

        let age_years = self.property.age_years(today);
        if age_years >= AGE_EXEMPTION_YEARS {
            return Decimal::ZERO;
        }

        // ceiling division: a started tier counts whole
        let area = self.property.area();
        let area_tier = area / AREA_TIER_SIZE + i64::from(area % AREA_TIER_SIZE != 0);
        let area_percent = Decimal::from(area_tier) * AREA_TIER_PERCENT;
        let base = self.property.assessed_value() * area_percent / Decimal::ONE_HUNDRED;

        let multiplier = self.table.multiplier(self.property.category());
        let age_discount =
            Decimal::from(age_years / AGE_DISCOUNT_STEP_YEARS) * AGE_DISCOUNT_PER_STEP;

        money::round(base * multiplier * (Decimal::ONE - age_discount))
    }
}
