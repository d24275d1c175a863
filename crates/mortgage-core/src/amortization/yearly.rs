//! Calendar-year aggregation of a payment ledger.

use chrono::Datelike;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::amortization::schedule::Schedule;
use crate::types::Money;

/// Per-calendar-year rollup of a schedule.
///
/// `loan_year` is the 1-based position of the calendar year within the
/// schedule, which differs from "12 payments per row" when the loan
/// starts mid-year.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YearSummary {
    pub loan_year: u32,
    pub calendar_year: i32,
    pub principal_paid: Money,
    pub interest_paid: Money,
    pub total_paid: Money,
    /// Balance after the last payment of this calendar year.
    pub ending_balance: Money,
    /// Principal share of this year's payments, in percent.
    pub principal_pct: Decimal,
    /// Interest share of this year's payments, in percent.
    pub interest_pct: Decimal,
}

/// How front-loaded the interest is: first half of payments vs second.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterestProfile {
    pub first_half_interest: Money,
    pub second_half_interest: Money,
    /// first/second ratio; `None` when the second half pays no interest.
    pub front_load_ratio: Option<Decimal>,
    pub first_year_interest: Money,
    pub last_year_interest: Money,
}

/// Reduce a schedule's ledger into per-calendar-year summaries, in
/// ascending calendar-year order.
pub fn yearly_summaries(schedule: &Schedule) -> Vec<YearSummary> {
    let mut by_year: BTreeMap<i32, (Money, Money, Money)> = BTreeMap::new();

    for payment in &schedule.payments {
        let entry = by_year
            .entry(payment.date.year())
            .or_insert((Decimal::ZERO, Decimal::ZERO, Decimal::ZERO));
        entry.0 += payment.principal;
        entry.1 += payment.interest;
        entry.2 = payment.balance;
    }

    by_year
        .into_iter()
        .enumerate()
        .map(|(idx, (calendar_year, (principal, interest, ending_balance)))| {
            let total = principal + interest;
            let (principal_pct, interest_pct) = if total.is_zero() {
                (Decimal::ZERO, Decimal::ZERO)
            } else {
                (
                    principal / total * dec!(100),
                    interest / total * dec!(100),
                )
            };
            YearSummary {
                loan_year: idx as u32 + 1,
                calendar_year,
                principal_paid: principal,
                interest_paid: interest,
                total_paid: total,
                ending_balance,
                principal_pct,
                interest_pct,
            }
        })
        .collect()
}

/// Interest concentration analysis over the ledger.
pub fn interest_profile(schedule: &Schedule) -> InterestProfile {
    let midpoint = schedule.payments.len() / 2;
    let first_half_interest: Money = schedule.payments[..midpoint]
        .iter()
        .map(|p| p.interest)
        .sum();
    let second_half_interest: Money = schedule.payments[midpoint..]
        .iter()
        .map(|p| p.interest)
        .sum();

    let front_load_ratio = if second_half_interest.is_zero() {
        None
    } else {
        Some(first_half_interest / second_half_interest)
    };

    let years = yearly_summaries(schedule);
    let first_year_interest = years.first().map(|y| y.interest_paid).unwrap_or_default();
    let last_year_interest = years.last().map(|y| y.interest_paid).unwrap_or_default();

    InterestProfile {
        first_half_interest,
        second_half_interest,
        front_load_ratio,
        first_year_interest,
        last_year_interest,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amortization::schedule::{build_schedule, ScheduleInput};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn schedule() -> Schedule {
        build_schedule(&ScheduleInput {
            principal: dec!(320000),
            annual_rate_pct: dec!(6.5),
            term_months: 360,
            start_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            extra: None,
        })
        .unwrap()
        .result
    }

    #[test]
    fn test_mid_year_start_spans_31_calendar_years() {
        // Payments run 2025-07 through 2055-06
        let years = yearly_summaries(&schedule());
        assert_eq!(years.len(), 31);
        assert_eq!(years[0].calendar_year, 2025);
        assert_eq!(years[0].loan_year, 1);
        assert_eq!(years.last().unwrap().calendar_year, 2055);
    }

    #[test]
    fn test_year_totals_match_schedule_totals() {
        let s = schedule();
        let years = yearly_summaries(&s);
        let total: Decimal = years.iter().map(|y| y.total_paid).sum();
        assert!((total - s.total_paid).abs() < dec!(0.000001));
    }

    #[test]
    fn test_percentages_sum_to_100() {
        for y in yearly_summaries(&schedule()) {
            let sum = y.principal_pct + y.interest_pct;
            assert!((sum - dec!(100)).abs() < dec!(0.000001), "year {}", y.calendar_year);
        }
    }

    #[test]
    fn test_ending_balances_descend() {
        let years = yearly_summaries(&schedule());
        for pair in years.windows(2) {
            assert!(pair[1].ending_balance <= pair[0].ending_balance);
        }
    }

    #[test]
    fn test_interest_is_front_loaded() {
        let profile = interest_profile(&schedule());
        assert!(profile.first_half_interest > profile.second_half_interest);
        assert!(profile.front_load_ratio.unwrap() > Decimal::ONE);
        assert!(profile.first_year_interest > profile.last_year_interest);
    }

    #[test]
    fn test_zero_rate_front_load_ratio_is_none() {
        let s = build_schedule(&ScheduleInput {
            principal: dec!(120000),
            annual_rate_pct: Decimal::ZERO,
            term_months: 120,
            start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            extra: None,
        })
        .unwrap()
        .result;
        assert_eq!(interest_profile(&s).front_load_ratio, None);
    }
}
