use chrono::NaiveDate;
use mortgage_core::amortization::schedule::{build_schedule, ExtraPayments, ScheduleInput};
use mortgage_core::amortization::yearly::{interest_profile, yearly_summaries};
use mortgage_core::payment;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Payment calculator tests
// ===========================================================================

#[test]
fn test_monthly_payment_reference_scenario() {
    // 320k at 6.5% over 30 years
    let pmt = payment::monthly_payment(dec!(320000), dec!(6.5), 360).unwrap();
    assert!((pmt - dec!(2023.76)).abs() < dec!(0.01), "got {pmt}");
}

#[test]
fn test_total_paid_covers_principal_across_terms() {
    for (principal, rate, term) in [
        (dec!(100000), dec!(0), 120u32),
        (dec!(250000), dec!(3.75), 180),
        (dec!(320000), dec!(6.5), 360),
        (dec!(750000), dec!(9.99), 480),
    ] {
        let pmt = payment::monthly_payment(principal, rate, term).unwrap();
        let paid = pmt * Decimal::from(term);
        assert!(paid >= principal, "{principal} at {rate}% over {term}");
    }
}

#[test]
fn test_zero_rate_payment_is_exact_division() {
    let pmt = payment::monthly_payment(dec!(360000), dec!(0), 360).unwrap();
    assert_eq!(pmt, dec!(1000));
}

#[test]
fn test_pmi_boundary_at_80_percent() {
    // 320k/400k is exactly 80% LTV: no PMI
    assert_eq!(
        payment::monthly_pmi(dec!(320000), dec!(400000), dec!(0.55)).unwrap(),
        Decimal::ZERO
    );
    // One dollar more crosses the threshold
    assert!(
        payment::monthly_pmi(dec!(320001), dec!(400000), dec!(0.55)).unwrap() > Decimal::ZERO
    );
}

// ===========================================================================
// Schedule tests
// ===========================================================================

fn base_input() -> ScheduleInput {
    ScheduleInput {
        principal: dec!(320000),
        annual_rate_pct: dec!(6.5),
        term_months: 360,
        start_date: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
        extra: None,
    }
}

#[test]
fn test_full_term_schedule_retires_principal() {
    let schedule = build_schedule(&base_input()).unwrap().result;
    assert_eq!(schedule.payments.len(), 360);
    assert!((schedule.total_principal - dec!(320000)).abs() < dec!(0.000001));
    assert!(schedule.payments.last().unwrap().balance < dec!(0.000001));
}

#[test]
fn test_cumulative_columns_track_totals() {
    let schedule = build_schedule(&base_input()).unwrap().result;
    let last = schedule.payments.last().unwrap();
    assert_eq!(last.cumulative_principal, schedule.total_principal);
    assert_eq!(last.cumulative_interest, schedule.total_interest);
}

#[test]
fn test_extra_payments_never_lengthen_the_schedule() {
    let standard_len = build_schedule(&base_input()).unwrap().result.payments.len();
    for monthly in [dec!(0), dec!(50), dec!(250), dec!(1000)] {
        let mut input = base_input();
        input.extra = Some(ExtraPayments {
            monthly,
            annual: Decimal::ZERO,
            annual_month: 1,
        });
        let len = build_schedule(&input).unwrap().result.payments.len();
        assert!(len <= standard_len, "extra {monthly} lengthened to {len}");
    }
}

#[test]
fn test_interest_monotone_in_extra_amount() {
    let mut prev = build_schedule(&base_input()).unwrap().result.total_interest;
    for monthly in [dec!(50), dec!(100), dec!(200), dec!(400), dec!(800)] {
        let mut input = base_input();
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
fn test_annual_lump_sum_only_shortens() {
    let mut input = base_input();
    input.extra = Some(ExtraPayments {
        monthly: Decimal::ZERO,
        annual: dec!(10000),
        annual_month: 12,
    });
    let schedule = build_schedule(&input).unwrap().result;
    assert!(schedule.payments.len() < 360);
    assert!((schedule.total_principal - dec!(320000)).abs() < dec!(0.01));
}

// ===========================================================================
// Yearly aggregation tests
// ===========================================================================

#[test]
fn test_yearly_totals_reconcile_with_schedule() {
    let schedule = build_schedule(&base_input()).unwrap().result;
    let years = yearly_summaries(&schedule);

    let principal: Decimal = years.iter().map(|y| y.principal_paid).sum();
    let interest: Decimal = years.iter().map(|y| y.interest_paid).sum();
    assert!((principal + interest - schedule.total_paid).abs() < dec!(0.000001));
}

#[test]
fn test_loan_year_indices_are_sequential() {
    let schedule = build_schedule(&base_input()).unwrap().result;
    let years = yearly_summaries(&schedule);
    for (idx, y) in years.iter().enumerate() {
        assert_eq!(y.loan_year, idx as u32 + 1);
    }
}

#[test]
fn test_percentage_split_sums_to_100() {
    let schedule = build_schedule(&base_input()).unwrap().result;
    for y in yearly_summaries(&schedule) {
        assert!((y.principal_pct + y.interest_pct - dec!(100)).abs() < dec!(0.000001));
    }
}

#[test]
fn test_front_loading_on_long_loans() {
    let schedule = build_schedule(&base_input()).unwrap().result;
    let profile = interest_profile(&schedule);
    // At 6.5% over 30 years roughly two thirds of interest lands in
    // the first half of the schedule
    let ratio = profile.front_load_ratio.unwrap();
    assert!(ratio > dec!(1.5), "ratio {ratio}");
}
