//! Closed-form payment math: monthly payment, PMI, and loan-to-value.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::MortgageError;
use crate::types::{Money, Percent};
use crate::MortgageResult;

/// LTV above which lenders require PMI.
pub const PMI_REQUIRED_LTV: Decimal = dec!(0.80);

/// LTV at which PMI contractually drops off.
pub const PMI_DROP_LTV: Decimal = dec!(0.78);

/// Safety bound on the PMI drop-off simulation.
const PMI_SIM_CAP: u32 = 360;

/// Compute (1 + r)^n via iterative multiplication (avoids Decimal::powd drift).
pub(crate) fn compound(rate: Decimal, n: u32) -> Decimal {
    let mut result = Decimal::ONE;
    let factor = Decimal::ONE + rate;
    for _ in 0..n {
        result *= factor;
    }
    result
}

/// Convert an annual percentage rate to a monthly decimal rate.
pub(crate) fn monthly_rate(annual_rate_pct: Percent) -> Decimal {
    annual_rate_pct / dec!(100) / dec!(12)
}

/// Level monthly payment for a fully amortizing loan:
/// `M = P·r(1+r)^n / ((1+r)^n − 1)`.
///
/// At a zero rate the formula degenerates to 0/0, so the payment is
/// exactly `principal / term_months`.
pub fn monthly_payment(
    principal: Money,
    annual_rate_pct: Percent,
    term_months: u32,
) -> MortgageResult<Money> {
    if term_months == 0 {
        return Err(MortgageError::InvalidInput {
            field: "term_months".into(),
            reason: "Term must be greater than zero".into(),
        });
    }

    let r = monthly_rate(annual_rate_pct);
    if r.is_zero() {
        return Ok(principal / Decimal::from(term_months));
    }

    let factor = compound(r, term_months);
    let denominator = factor - Decimal::ONE;
    if denominator.is_zero() {
        return Err(MortgageError::DivisionByZero {
            context: "monthly payment annuity factor".into(),
        });
    }

    Ok(principal * r * factor / denominator)
}

/// Total interest paid over the life of the loan at the level payment.
pub fn total_interest(principal: Money, monthly_payment: Money, term_months: u32) -> Money {
    monthly_payment * Decimal::from(term_months) - principal
}

/// Loan-to-value ratio.
pub fn loan_to_value(loan_amount: Money, home_value: Money) -> MortgageResult<Decimal> {
    if home_value.is_zero() {
        return Err(MortgageError::DivisionByZero {
            context: "loan-to-value home value".into(),
        });
    }
    Ok(loan_amount / home_value)
}

/// Monthly PMI premium. Zero when LTV is at or below 80%.
pub fn monthly_pmi(
    loan_amount: Money,
    home_value: Money,
    annual_pmi_rate_pct: Percent,
) -> MortgageResult<Money> {
    let ltv = loan_to_value(loan_amount, home_value)?;
    if ltv <= PMI_REQUIRED_LTV {
        return Ok(Decimal::ZERO);
    }
    Ok(loan_amount * (annual_pmi_rate_pct / dec!(100)) / dec!(12))
}

/// Month at which the balance amortizes down to 78% of the home value
/// and PMI drops off.
///
/// `None` when the initial LTV is at or below 80% (no PMI to drop).
/// The simulation is capped at 360 months; if the target balance is
/// never reached the cap itself is returned, so callers cannot
/// distinguish "month 360" from "never" — interpret the cap
/// accordingly.
pub fn pmi_drop_off_month(
    loan_amount: Money,
    home_value: Money,
    monthly_payment: Money,
    annual_rate_pct: Percent,
) -> MortgageResult<Option<u32>> {
    let ltv = loan_to_value(loan_amount, home_value)?;
    if ltv <= PMI_REQUIRED_LTV {
        return Ok(None);
    }

    let target = home_value * PMI_DROP_LTV;
    let r = monthly_rate(annual_rate_pct);
    let mut balance = loan_amount;

    for month in 1..=PMI_SIM_CAP {
        let interest = balance * r;
        balance -= monthly_payment - interest;
        if balance <= target {
            return Ok(Some(month));
        }
    }

    Ok(Some(PMI_SIM_CAP))
}
