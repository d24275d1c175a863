//! Year-by-year itemize-vs-standard analysis of mortgage interest.
//!
//! Consumes the yearly aggregation of a schedule plus a tax profile,
//! and prices what the mortgage actually costs after the deduction.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::yearly::YearSummary;
use crate::error::MortgageError;
use crate::tax::tables::{FilingStatus, TaxTableProvider};
use crate::types::{with_metadata, ComputationOutput, Money, Percent, Rate};
use crate::MortgageResult;

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// The taxpayer side of the calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxProfile {
    pub filing_status: FilingStatus,
    pub annual_income: Money,
    /// Explicit marginal rate; when absent the bracket table decides.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marginal_rate_override: Option<Rate>,
    /// State income tax rate as a decimal fraction.
    pub state_tax_rate: Rate,
    /// State and local taxes paid (subject to the SALT cap).
    pub state_local_taxes: Money,
    pub charitable_contributions: Money,
    pub other_deductions: Money,
    /// Drives the mortgage-debt limit (pre/post TCJA).
    pub origination_date: NaiveDate,
}

/// Tax benefit analysis input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxBenefitInput {
    pub loan_amount: Money,
    pub profile: TaxProfile,
    /// Yearly aggregation of the schedule, in loan-year order.
    pub years: Vec<YearSummary>,
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// One year's itemize-vs-standard decision and savings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YearlyTaxBenefit {
    pub loan_year: u32,
    pub calendar_year: i32,
    pub interest_paid: Money,
    /// Interest after debt-limit proration.
    pub deductible_interest: Money,
    pub itemized_total: Money,
    pub standard_deduction: Money,
    pub should_itemize: bool,
    pub marginal_rate: Rate,
    pub federal_savings: Money,
    pub state_savings: Money,
    pub total_savings: Money,
    /// Interest net of tax savings.
    pub net_interest_cost: Money,
    /// Monthly payment net of that year's tax savings.
    pub effective_monthly_payment: Money,
    /// After-tax interest rate on the year's average balance, in percent.
    pub effective_rate_pct: Percent,
}

/// Lifetime rollup of the yearly analyses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxBenefitSummary {
    pub years: Vec<YearlyTaxBenefit>,
    pub total_interest: Money,
    pub total_tax_savings: Money,
    /// First loan year in which the profile stops itemizing after
    /// having itemized at least once; `None` if that never happens.
    pub break_even_year: Option<u32>,
    pub years_itemizing: u32,
    pub average_annual_savings: Money,
    /// After-tax rate over the whole loan, approximated on a constant
    /// `loan_amount / 2` average balance.
    pub overall_effective_rate_pct: Percent,
    pub first_year_effective_rate_pct: Percent,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Run the itemize-vs-standard analysis across every loan year.
pub fn analyze_tax_benefit(
    input: &TaxBenefitInput,
    tables: &impl TaxTableProvider,
) -> MortgageResult<ComputationOutput<TaxBenefitSummary>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();
    validate(input)?;

    if let Some(rate) = input.profile.marginal_rate_override {
        if rate >= Decimal::ONE {
            warnings.push(format!(
                "Marginal rate override {rate} looks like a percentage; expected a decimal fraction"
            ));
        }
    }

    let profile = &input.profile;
    let debt_limit = tables.mortgage_deduction_limit(profile.origination_date);

    let mut years = Vec::with_capacity(input.years.len());
    let mut start_balance = input.loan_amount;
    let mut total_interest = Decimal::ZERO;
    let mut total_savings = Decimal::ZERO;
    let mut years_itemizing = 0u32;
    let mut has_itemized = false;
    let mut break_even_year: Option<u32> = None;

    for year in &input.years {
        let config = tables.tax_year_config(year.calendar_year);

        // Loans above the debt limit only deduct a pro-rata share,
        // scaled by the original loan amount rather than the average
        // balance. Understates slightly on loans amortized near the
        // limit; kept for compatibility.
        let deductible_interest = if input.loan_amount <= debt_limit {
            year.interest_paid
        } else {
            year.interest_paid * debt_limit / input.loan_amount
        };

        let marginal_rate = profile.marginal_rate_override.unwrap_or_else(|| {
            config.marginal_rate(profile.annual_income, profile.filing_status)
        });

        let capped_salt = profile.state_local_taxes.min(config.salt_cap);
        let itemized_total = deductible_interest
            + capped_salt
            + profile.charitable_contributions
            + profile.other_deductions;
        let standard_deduction = config.standard_deduction(profile.filing_status);

        // Strict inequality: a tie goes to the standard deduction.
        let should_itemize = itemized_total > standard_deduction;

        let excess = (itemized_total - standard_deduction).max(Decimal::ZERO);
        let federal_savings = excess * marginal_rate;
        let state_savings = if should_itemize {
            deductible_interest * profile.state_tax_rate
        } else {
            Decimal::ZERO
        };
        let savings = federal_savings + state_savings;

        let average_balance = (start_balance + year.ending_balance) / dec!(2);
        let effective_rate_pct = if average_balance <= Decimal::ZERO {
            Decimal::ZERO
        } else {
            (year.interest_paid - savings) / average_balance * dec!(100)
        };

        if has_itemized && !should_itemize && break_even_year.is_none() {
            break_even_year = Some(year.loan_year);
        }
        if should_itemize {
            has_itemized = true;
            years_itemizing += 1;
        }

        total_interest += year.interest_paid;
        total_savings += savings;

        years.push(YearlyTaxBenefit {
            loan_year: year.loan_year,
            calendar_year: year.calendar_year,
            interest_paid: year.interest_paid,
            deductible_interest,
            itemized_total,
            standard_deduction,
            should_itemize,
            marginal_rate,
            federal_savings,
            state_savings,
            total_savings: savings,
            net_interest_cost: year.interest_paid - savings,
            effective_monthly_payment: (year.total_paid - savings) / dec!(12),
            effective_rate_pct,
        });

        start_balance = year.ending_balance;
    }

    let year_count = Decimal::from(years.len() as u64);
    let average_annual_savings = if year_count.is_zero() {
        Decimal::ZERO
    } else {
        total_savings / year_count
    };

    // Constant loan_amount/2 average-balance approximation, not a
    // year-weighted average.
    let half_balance = input.loan_amount / dec!(2);
    let overall_effective_rate_pct = if year_count.is_zero() || half_balance.is_zero() {
        Decimal::ZERO
    } else {
        (total_interest - total_savings) / year_count / half_balance * dec!(100)
    };

    let first_year_effective_rate_pct = years
        .first()
        .map(|y| y.effective_rate_pct)
        .unwrap_or(Decimal::ZERO);

    let summary = TaxBenefitSummary {
        years,
        total_interest,
        total_tax_savings: total_savings,
        break_even_year,
        years_itemizing,
        average_annual_savings,
        overall_effective_rate_pct,
        first_year_effective_rate_pct,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Itemized vs Standard Deduction Analysis",
        input,
        warnings,
        elapsed,
        summary,
    ))
}

fn validate(input: &TaxBenefitInput) -> MortgageResult<()> {
    if input.loan_amount <= Decimal::ZERO {
        return Err(MortgageError::InvalidInput {
            field: "loan_amount".into(),
            reason: "Loan amount must be positive".into(),
        });
    }
    if input.profile.annual_income < Decimal::ZERO {
        return Err(MortgageError::InvalidInput {
            field: "profile.annual_income".into(),
            reason: "Income cannot be negative".into(),
        });
    }
    if input.profile.state_tax_rate < Decimal::ZERO {
        return Err(MortgageError::InvalidInput {
            field: "profile.state_tax_rate".into(),
            reason: "State tax rate cannot be negative".into(),
        });
    }
    Ok(())
}
