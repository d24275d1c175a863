//! Month-by-month amortization: the full payment ledger for a loan,
//! with optional recurring and annual extra principal payments.

use chrono::{Datelike, Months, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::MortgageError;
use crate::payment::{monthly_payment, monthly_rate};
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::MortgageResult;

/// Balance below which an extra-payment schedule is considered paid off.
const PAYOFF_EPSILON: Decimal = dec!(0.01);

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// Extra principal applied on top of the level payment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtraPayments {
    /// Constant extra principal every month.
    pub monthly: Money,
    /// Lump sum applied once per year.
    pub annual: Money,
    /// Calendar month (1-12) in which the annual lump sum lands.
    pub annual_month: u32,
}

/// Amortization schedule input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleInput {
    /// Loan principal.
    pub principal: Money,
    /// Annual nominal rate as a percentage (6.5 = 6.5%).
    pub annual_rate_pct: Percent,
    /// Loan term in months.
    pub term_months: u32,
    /// Origination date; payment n falls n months after this.
    pub start_date: NaiveDate,
    /// Extra principal payments. When present the schedule stops as
    /// soon as the balance is paid down, modelling early payoff.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<ExtraPayments>,
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// One row of the payment ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRecord {
    /// Payment number (1-indexed).
    pub number: u32,
    /// Calendar date of the payment.
    pub date: NaiveDate,
    /// Gross cash paid this period (principal + interest + extras).
    pub amount: Money,
    /// Principal portion, including extras.
    pub principal: Money,
    /// Interest portion.
    pub interest: Money,
    /// Remaining balance after this payment, clamped at zero.
    pub balance: Money,
    /// Running total of principal paid through this payment.
    pub cumulative_principal: Money,
    /// Running total of interest paid through this payment.
    pub cumulative_interest: Money,
}

/// The full ordered ledger plus totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule {
    pub payments: Vec<PaymentRecord>,
    /// Level payment before extras.
    pub monthly_payment: Money,
    pub total_principal: Money,
    pub total_interest: Money,
    pub total_paid: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Build the amortization schedule for a loan.
pub fn build_schedule(
    input: &ScheduleInput,
) -> MortgageResult<ComputationOutput<Schedule>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();
    validate(input)?;

    let base_payment = monthly_payment(input.principal, input.annual_rate_pct, input.term_months)?;
    let r = monthly_rate(input.annual_rate_pct);

    if let Some(extra) = &input.extra {
        if extra.monthly >= base_payment {
            warnings.push(format!(
                "Extra monthly payment ({}) is at least the base payment ({})",
                extra.monthly, base_payment
            ));
        }
    }

    let early_exit = input.extra.is_some();
    let mut balance = input.principal;
    let mut cumulative_principal = Decimal::ZERO;
    let mut cumulative_interest = Decimal::ZERO;
    let mut payments = Vec::with_capacity(input.term_months as usize);

    for number in 1..=input.term_months {
        if early_exit && balance <= PAYOFF_EPSILON {
            break;
        }

        let date = input
            .start_date
            .checked_add_months(Months::new(number))
            .ok_or_else(|| {
                MortgageError::DateError(format!("Payment date overflow at period {number}"))
            })?;

        let interest = balance * r;
        let mut principal_portion = base_payment - interest;

        if let Some(extra) = &input.extra {
            principal_portion += extra.monthly;
            if date.month() == extra.annual_month {
                principal_portion += extra.annual;
            }
        }

        // Never overpay the remaining balance.
        if principal_portion > balance {
            principal_portion = balance;
        }

        balance -= principal_portion;
        if balance < Decimal::ZERO {
            balance = Decimal::ZERO;
        }

        cumulative_principal += principal_portion;
        cumulative_interest += interest;

        payments.push(PaymentRecord {
            number,
            date,
            amount: principal_portion + interest,
            principal: principal_portion,
            interest,
            balance,
            cumulative_principal,
            cumulative_interest,
        });
    }

    let schedule = Schedule {
        payments,
        monthly_payment: base_payment,
        total_principal: cumulative_principal,
        total_interest: cumulative_interest,
        total_paid: cumulative_principal + cumulative_interest,
    };

    let methodology = if early_exit {
        "Level-Payment Amortization with Extra Principal"
    } else {
        "Level-Payment Amortization"
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(methodology, input, warnings, elapsed, schedule))
}

fn validate(input: &ScheduleInput) -> MortgageResult<()> {
    if input.principal <= Decimal::ZERO {
        return Err(MortgageError::InvalidInput {
            field: "principal".into(),
            reason: "Principal must be positive".into(),
        });
    }
    if input.term_months == 0 {
        return Err(MortgageError::InvalidInput {
            field: "term_months".into(),
            reason: "Term must be greater than zero".into(),
        });
    }
    if input.annual_rate_pct < Decimal::ZERO {
        return Err(MortgageError::InvalidInput {
            field: "annual_rate_pct".into(),
            reason: "Rate cannot be negative".into(),
        });
    }
    if let Some(extra) = &input.extra {
        if extra.monthly < Decimal::ZERO || extra.annual < Decimal::ZERO {
            return Err(MortgageError::InvalidInput {
                field: "extra".into(),
                reason: "Extra payments cannot be negative".into(),
            });
        }
        if extra.annual_month < 1 || extra.annual_month > 12 {
            return Err(MortgageError::InvalidInput {
                field: "extra.annual_month".into(),
                reason: "Annual extra month must be between 1 and 12".into(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn standard_input() -> ScheduleInput {
        ScheduleInput {
            principal: dec!(320000),
            annual_rate_pct: dec!(6.5),
            term_months: 360,
            start_date: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
            extra: None,
        }
    }

    #[test]
    fn test_standard_schedule_runs_full_term() {
        let out = build_schedule(&standard_input()).unwrap();
        let schedule = &out.result;
        assert_eq!(schedule.payments.len(), 360);
        assert!(schedule.payments.last().unwrap().balance < dec!(0.000001));
    }

    #[test]
    fn test_principal_sums_to_loan_amount() {
        let out = build_schedule(&standard_input()).unwrap();
        let diff = (out.result.total_principal - dec!(320000)).abs();
        assert!(diff < dec!(0.000001), "residual {diff}");
    }

    #[test]
    fn test_balance_monotone_non_increasing() {
        let out = build_schedule(&standard_input()).unwrap();
        let mut prev = dec!(320000);
        for p in &out.result.payments {
            assert!(p.balance <= prev, "balance rose at payment {}", p.number);
            prev = p.balance;
        }
    }

    #[test]
    fn test_first_payment_date_one_month_after_start() {
        let out = build_schedule(&standard_input()).unwrap();
        assert_eq!(
            out.result.payments[0].date,
            NaiveDate::from_ymd_opt(2025, 2, 15).unwrap()
        );
    }

    #[test]
    fn test_extra_payments_shorten_schedule() {
        let mut input = standard_input();
        input.extra = Some(ExtraPayments {
            monthly: dec!(200),
            annual: dec!(2000),
            annual_month: 3,
        });
        let out = build_schedule(&input).unwrap();
        assert!(out.result.payments.len() < 360);
        let last = out.result.payments.last().unwrap();
        assert!(last.balance <= dec!(0.01));
    }

    #[test]
    fn test_more_extra_means_less_interest() {
        let base = build_schedule(&standard_input()).unwrap().result.total_interest;
        let mut prev = base;
        for monthly in [dec!(100), dec!(300), dec!(500)] {
            let mut input = standard_input();
            input.extra = Some(ExtraPayments {
                monthly,
                annual: Decimal::ZERO,
                annual_month: 1,
            });
            let interest = build_schedule(&input).unwrap().result.total_interest;
            assert!(interest <= prev, "interest rose at extra {monthly}");
            prev = interest;
        }
    }

    #[test]
    fn test_annual_extra_lands_in_configured_month() {
        let mut input = standard_input();
        input.extra = Some(ExtraPayments {
            monthly: Decimal::ZERO,
            annual: dec!(5000),
            annual_month: 6,
        });
        let out = build_schedule(&input).unwrap();
        // June payments carry the lump sum: principal jumps by ~5000
        let june = out
            .result
            .payments
            .iter()
            .find(|p| p.date.month() == 6)
            .unwrap();
        let may = out
            .result
            .payments
            .iter()
            .find(|p| p.date.month() == 5)
            .unwrap();
        assert!(june.principal - may.principal > dec!(4900));
    }

    #[test]
    fn test_zero_rate_schedule() {
        let input = ScheduleInput {
            principal: dec!(120000),
            annual_rate_pct: Decimal::ZERO,
            term_months: 120,
            start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            extra: None,
        };
        let out = build_schedule(&input).unwrap();
        assert_eq!(out.result.total_interest, Decimal::ZERO);
        assert_eq!(out.result.monthly_payment, dec!(1000));
    }

    #[test]
    fn test_negative_principal_rejected() {
        let mut input = standard_input();
        input.principal = dec!(-1);
        assert!(build_schedule(&input).is_err());
    }
}
