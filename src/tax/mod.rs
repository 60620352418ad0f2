//! IPTU assessment: tax value calculation and installment amortization

pub mod calculator;
pub mod installment;

pub use calculator::{AssessmentResult, TaxCalculator};
pub use installment::InstallmentPlan;
