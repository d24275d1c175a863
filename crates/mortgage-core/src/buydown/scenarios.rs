//! Discount-point ("buydown") break-even analysis: one scenario per
//! candidate point level, and the optimal pick for an expected
//! ownership horizon.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::MortgageError;
use crate::payment::{monthly_payment, total_interest};
use crate::types::{with_metadata, ComputationOutput, Money, Percent, Rate};
use crate::MortgageResult;

/// Rate reduction per discount point when the lender doesn't quote one.
pub const DEFAULT_REDUCTION_PER_POINT: Decimal = dec!(0.25);

/// Candidate point levels when the caller doesn't supply any.
pub fn default_point_levels() -> Vec<Decimal> {
    vec![
        dec!(0),
        dec!(0.5),
        dec!(1),
        dec!(1.5),
        dec!(2),
        dec!(2.5),
        dec!(3),
    ]
}

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// Purchase and refinance points are deducted differently: purchase
/// points in full the year paid, refinance points amortized evenly
/// over the loan term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanPurpose {
    Purchase,
    Refinance,
}

/// Buydown comparison input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuydownInput {
    pub loan_amount: Money,
    /// Quoted rate before any points, as a percentage.
    pub base_rate_pct: Percent,
    pub term_months: u32,
    /// How long the borrower expects to keep the loan.
    pub ownership_months: u32,
    /// Marginal tax rate as a decimal fraction, for the after-tax
    /// break-even.
    pub marginal_tax_rate: Rate,
    pub purpose: LoanPurpose,
    /// Rate reduction per point; defaults to 0.25.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reduction_per_point: Option<Decimal>,
    /// Candidate point levels; defaults to 0 through 3 in half steps.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub point_levels: Option<Vec<Decimal>>,
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// One candidate point level, fully priced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuydownScenario {
    pub points: Decimal,
    pub points_cost: Money,
    pub original_rate_pct: Percent,
    pub bought_down_rate_pct: Percent,
    pub original_payment: Money,
    pub bought_down_payment: Money,
    pub monthly_savings: Money,
    /// Months to recoup the points cost; `None` when the points never
    /// pay off.
    pub break_even_months: Option<Decimal>,
    /// Break-even on the after-tax points cost.
    pub tax_adjusted_break_even_months: Option<Decimal>,
    pub lifetime_interest_original: Money,
    pub lifetime_interest_bought_down: Money,
    pub lifetime_interest_savings: Money,
    /// Lifetime interest savings net of the points cost.
    pub net_lifetime_benefit: Money,
    /// Points deduction in the year paid.
    pub points_deduction_year_one: Money,
    /// Points deduction in each subsequent year (refinance only).
    pub points_deduction_recurring: Money,
}

/// All scenarios plus the optimal pick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuydownComparison {
    pub scenarios: Vec<BuydownScenario>,
    pub optimal: BuydownScenario,
    pub recommendation: String,
}

// ---------------------------------------------------------------------------
// Point math
// ---------------------------------------------------------------------------

/// Upfront cost of discount points: 1 point = 1% of the loan.
pub fn points_cost(loan_amount: Money, points: Decimal) -> Money {
    loan_amount * points / dec!(100)
}

/// Rate after buying points, floored at zero.
pub fn bought_down_rate(
    base_rate_pct: Percent,
    points: Decimal,
    reduction_per_point: Decimal,
) -> Percent {
    (base_rate_pct - points * reduction_per_point).max(Decimal::ZERO)
}

/// Months until cumulative savings cover the upfront cost. `None` when
/// monthly savings are zero or negative: the points never pay off.
pub fn break_even_months(cost: Money, monthly_savings: Money) -> Option<Decimal> {
    if monthly_savings <= Decimal::ZERO {
        return None;
    }
    Some(cost / monthly_savings)
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Build a scenario per candidate point level and pick the optimal one
/// for the expected ownership horizon.
pub fn analyze_buydown(
    input: &BuydownInput,
) -> MortgageResult<ComputationOutput<BuydownComparison>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();
    validate(input)?;

    if input.marginal_tax_rate >= Decimal::ONE {
        warnings.push(format!(
            "Marginal tax rate {} looks like a percentage; expected a decimal fraction",
            input.marginal_tax_rate
        ));
    }

    let reduction = input
        .reduction_per_point
        .unwrap_or(DEFAULT_REDUCTION_PER_POINT);
    let levels = input
        .point_levels
        .clone()
        .unwrap_or_else(default_point_levels);

    let original_payment =
        monthly_payment(input.loan_amount, input.base_rate_pct, input.term_months)?;
    let lifetime_interest_original =
        total_interest(input.loan_amount, original_payment, input.term_months);

    let mut scenarios = Vec::with_capacity(levels.len());
    for &points in &levels {
        scenarios.push(build_scenario(
            input,
            points,
            reduction,
            original_payment,
            lifetime_interest_original,
        )?);
    }

    // Optimal: maximize savings over the ownership horizon net of the
    // upfront cost. Strict comparison keeps the earliest candidate on
    // ties.
    let horizon = Decimal::from(input.ownership_months);
    let mut optimal_idx = 0usize;
    let mut best_value = horizon_value(&scenarios[0], horizon);
    for (idx, scenario) in scenarios.iter().enumerate().skip(1) {
        let value = horizon_value(scenario, horizon);
        if value > best_value {
            best_value = value;
            optimal_idx = idx;
        }
    }

    let optimal = scenarios[optimal_idx].clone();
    let recommendation = recommend(&optimal, input.ownership_months);

    let comparison = BuydownComparison {
        scenarios,
        optimal,
        recommendation,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Discount Point Break-Even Analysis",
        input,
        warnings,
        elapsed,
        comparison,
    ))
}

fn build_scenario(
    input: &BuydownInput,
    points: Decimal,
    reduction: Decimal,
    original_payment: Money,
    lifetime_interest_original: Money,
) -> MortgageResult<BuydownScenario> {
    let cost = points_cost(input.loan_amount, points);
    let rate = bought_down_rate(input.base_rate_pct, points, reduction);
    let payment = monthly_payment(input.loan_amount, rate, input.term_months)?;
    let monthly_savings = original_payment - payment;

    let after_tax_cost = cost * (Decimal::ONE - input.marginal_tax_rate);
    let lifetime_interest = total_interest(input.loan_amount, payment, input.term_months);
    let lifetime_savings = lifetime_interest_original - lifetime_interest;

    let term_years = Decimal::from(input.term_months) / dec!(12);
    let (year_one, recurring) = match input.purpose {
        LoanPurpose::Purchase => (cost, Decimal::ZERO),
        // Refinance points amortize evenly; year one gets one slice,
        // not the full amount.
        LoanPurpose::Refinance => {
            let slice = cost / term_years;
            (slice, slice)
        }
    };

    Ok(BuydownScenario {
        points,
        points_cost: cost,
        original_rate_pct: input.base_rate_pct,
        bought_down_rate_pct: rate,
        original_payment,
        bought_down_payment: payment,
        monthly_savings,
        break_even_months: break_even_months(cost, monthly_savings),
        tax_adjusted_break_even_months: break_even_months(after_tax_cost, monthly_savings),
        lifetime_interest_original,
        lifetime_interest_bought_down: lifetime_interest,
        lifetime_interest_savings: lifetime_savings,
        net_lifetime_benefit: lifetime_savings - cost,
        points_deduction_year_one: year_one,
        points_deduction_recurring: recurring,
    })
}

fn horizon_value(scenario: &BuydownScenario, ownership_months: Decimal) -> Money {
    scenario.monthly_savings * ownership_months - scenario.points_cost
}

fn recommend(optimal: &BuydownScenario, ownership_months: u32) -> String {
    if optimal.points.is_zero() {
        return format!(
            "Buying discount points does not pay off within {} months of expected \
             ownership; keep the {}% rate with no points.",
            ownership_months, optimal.original_rate_pct
        );
    }

    match optimal.break_even_months {
        Some(break_even) => {
            let months_beyond = Decimal::from(ownership_months) - break_even;
            let projected = (optimal.monthly_savings * months_beyond).round_dp(2);
            format!(
                "Paying {} points ({}) buys the rate down to {}% and breaks even \
                 after {} months; over the remaining {} months of ownership that \
                 projects {} in savings.",
                optimal.points,
                optimal.points_cost.round_dp(2),
                optimal.bought_down_rate_pct,
                break_even.round_dp(1),
                months_beyond.round_dp(1).max(Decimal::ZERO),
                projected
            )
        }
        None => format!(
            "Paying {} points never breaks even at these savings; keep the {}% \
             rate with no points.",
            optimal.points, optimal.original_rate_pct
        ),
    }
}

fn validate(input: &BuydownInput) -> MortgageResult<()> {
    if input.loan_amount <= Decimal::ZERO {
        return Err(MortgageError::InvalidInput {
            field: "loan_amount".into(),
            reason: "Loan amount must be positive".into(),
        });
    }
    if input.base_rate_pct < Decimal::ZERO {
        return Err(MortgageError::InvalidInput {
            field: "base_rate_pct".into(),
            reason: "Rate cannot be negative".into(),
        });
    }
    if input.term_months == 0 {
        return Err(MortgageError::InvalidInput {
            field: "term_months".into(),
            reason: "Term must be greater than zero".into(),
        });
    }
    if let Some(levels) = &input.point_levels {
        if levels.is_empty() {
            return Err(MortgageError::InvalidInput {
                field: "point_levels".into(),
                reason: "At least one candidate point level is required".into(),
            });
        }
        if levels.iter().any(|p| *p < Decimal::ZERO) {
            return Err(MortgageError::InvalidInput {
                field: "point_levels".into(),
                reason: "Point levels cannot be negative".into(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn input() -> BuydownInput {
        BuydownInput {
            loan_amount: dec!(400000),
            base_rate_pct: dec!(6.5),
            term_months: 360,
            ownership_months: 84,
            marginal_tax_rate: dec!(0.24),
            purpose: LoanPurpose::Purchase,
            reduction_per_point: None,
            point_levels: None,
        }
    }

    #[test]
    fn test_points_cost_one_percent_per_point() {
        assert_eq!(points_cost(dec!(400000), dec!(1)), dec!(4000));
        assert_eq!(points_cost(dec!(400000), dec!(0)), Decimal::ZERO);
    }

    #[test]
    fn test_bought_down_rate_quarter_point_default() {
        assert_eq!(bought_down_rate(dec!(6.5), dec!(1), dec!(0.25)), dec!(6.25));
        // Floored at zero
        assert_eq!(bought_down_rate(dec!(0.5), dec!(3), dec!(0.25)), Decimal::ZERO);
    }

    #[test]
    fn test_break_even_none_on_zero_savings() {
        assert_eq!(break_even_months(dec!(4000), Decimal::ZERO), None);
        assert_eq!(break_even_months(dec!(4000), dec!(-10)), None);
        assert_eq!(break_even_months(dec!(4000), dec!(100)), Some(dec!(40)));
    }

    #[test]
    fn test_zero_point_scenario_is_identity() {
        let out = analyze_buydown(&input()).unwrap();
        let zero = &out.result.scenarios[0];
        assert_eq!(zero.points, Decimal::ZERO);
        assert_eq!(zero.points_cost, Decimal::ZERO);
        assert_eq!(zero.bought_down_rate_pct, dec!(6.5));
        assert_eq!(zero.monthly_savings, Decimal::ZERO);
        assert_eq!(zero.break_even_months, None);
    }

    #[test]
    fn test_default_candidate_levels() {
        let out = analyze_buydown(&input()).unwrap();
        let points: Vec<Decimal> = out.result.scenarios.iter().map(|s| s.points).collect();
        assert_eq!(points, default_point_levels());
    }

    #[test]
    fn test_tax_adjusted_break_even_is_sooner() {
        let out = analyze_buydown(&input()).unwrap();
        for s in &out.result.scenarios {
            if s.points > Decimal::ZERO {
                let raw = s.break_even_months.unwrap();
                let adjusted = s.tax_adjusted_break_even_months.unwrap();
                assert!(adjusted < raw, "points {}", s.points);
            }
        }
    }

    #[test]
    fn test_long_ownership_favors_points() {
        let mut long = input();
        long.ownership_months = 360;
        let out = analyze_buydown(&long).unwrap();
        assert!(out.result.optimal.points > Decimal::ZERO);
    }

    #[test]
    fn test_short_ownership_favors_no_points() {
        let mut short = input();
        short.ownership_months = 12;
        let out = analyze_buydown(&short).unwrap();
        assert_eq!(out.result.optimal.points, Decimal::ZERO);
        assert!(out.result.recommendation.contains("does not pay off"));
    }

    #[test]
    fn test_refinance_points_amortize_over_term() {
        let mut refi = input();
        refi.purpose = LoanPurpose::Refinance;
        let out = analyze_buydown(&refi).unwrap();
        let one_point = out
            .result
            .scenarios
            .iter()
            .find(|s| s.points == dec!(1))
            .unwrap();
        // 4000 over 30 years
        let slice = dec!(4000) / dec!(30);
        assert_eq!(one_point.points_deduction_year_one, slice);
        assert_eq!(one_point.points_deduction_recurring, slice);
    }

    #[test]
    fn test_purchase_points_deduct_in_full_year_one() {
        let out = analyze_buydown(&input()).unwrap();
        let one_point = out
            .result
            .scenarios
            .iter()
            .find(|s| s.points == dec!(1))
            .unwrap();
        assert_eq!(one_point.points_deduction_year_one, dec!(4000));
        assert_eq!(one_point.points_deduction_recurring, Decimal::ZERO);
    }

    #[test]
    fn test_recommendation_names_optimal_points() {
        let mut long = input();
        long.ownership_months = 240;
        let out = analyze_buydown(&long).unwrap();
        let optimal = &out.result.optimal;
        assert!(out
            .result
            .recommendation
            .contains(&optimal.points.to_string()));
    }

    #[test]
    fn test_empty_point_levels_rejected() {
        let mut bad = input();
        bad.point_levels = Some(vec![]);
        assert!(analyze_buydown(&bad).is_err());
    }
}
