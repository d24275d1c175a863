//! Federal tax tables: brackets, standard deductions, SALT cap, and
//! mortgage-debt limits, with inflation extrapolation past the base year.
//!
//! The engine never embeds table data in its calculations; it goes
//! through [`TaxTableProvider`], so shipping a new tax year means
//! swapping the provider, not touching the engine.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Rate};

/// Latest year with enacted figures; later years are extrapolated.
pub const BASE_TABLE_YEAR: i32 = 2025;

/// Assumed annual inflation for extrapolated years.
const INFLATION_FACTOR: Decimal = dec!(1.025);

/// Extrapolated standard deductions round to the nearest $50.
const DEDUCTION_STEP: Decimal = dec!(50);

/// Extrapolated bracket edges round to the nearest $25.
const BRACKET_STEP: Decimal = dec!(25);

/// TCJA mortgage-interest debt limit for loans originated after 2017-12-15.
const DEBT_LIMIT_TCJA: Decimal = dec!(750000);

/// Grandfathered debt limit for loans originated on or before 2017-12-15.
const DEBT_LIMIT_GRANDFATHERED: Decimal = dec!(1000000);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilingStatus {
    Single,
    MarriedFilingJointly,
    MarriedFilingSeparately,
    HeadOfHousehold,
}

/// One marginal bracket: `min` inclusive, `max` exclusive (`None` =
/// unbounded top bracket).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub min: Money,
    pub max: Option<Money>,
    pub rate: Rate,
}

/// Per-filing-status amounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandardDeductions {
    pub single: Money,
    pub married_filing_jointly: Money,
    pub married_filing_separately: Money,
    pub head_of_household: Money,
}

/// Per-filing-status bracket ladders. Invariant: ordered by `min`
/// ascending, contiguous, first `min` 0, last `max` `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketTables {
    pub single: Vec<TaxBracket>,
    pub married_filing_jointly: Vec<TaxBracket>,
    pub married_filing_separately: Vec<TaxBracket>,
    pub head_of_household: Vec<TaxBracket>,
}

/// Everything the benefit engine needs for one tax year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxYearConfig {
    pub year: i32,
    pub salt_cap: Money,
    pub standard_deductions: StandardDeductions,
    pub brackets: BracketTables,
}

impl TaxYearConfig {
    pub fn standard_deduction(&self, status: FilingStatus) -> Money {
        match status {
            FilingStatus::Single => self.standard_deductions.single,
            FilingStatus::MarriedFilingJointly => self.standard_deductions.married_filing_jointly,
            FilingStatus::MarriedFilingSeparately => {
                self.standard_deductions.married_filing_separately
            }
            FilingStatus::HeadOfHousehold => self.standard_deductions.head_of_household,
        }
    }

    pub fn brackets(&self, status: FilingStatus) -> &[TaxBracket] {
        match status {
            FilingStatus::Single => &self.brackets.single,
            FilingStatus::MarriedFilingJointly => &self.brackets.married_filing_jointly,
            FilingStatus::MarriedFilingSeparately => &self.brackets.married_filing_separately,
            FilingStatus::HeadOfHousehold => &self.brackets.head_of_household,
        }
    }

    /// Marginal rate at `income`: highest bracket whose `min` is at or
    /// below the income. Zero income lands in the first bracket.
    pub fn marginal_rate(&self, income: Money, status: FilingStatus) -> Rate {
        self.brackets(status)
            .iter()
            .rev()
            .find(|b| b.min <= income)
            .map(|b| b.rate)
            .unwrap_or(Decimal::ZERO)
    }
}

// ---------------------------------------------------------------------------
// Provider interface
// ---------------------------------------------------------------------------

/// Source of tax-year data. The benefit engine depends only on this
/// trait, never on concrete table values.
pub trait TaxTableProvider {
    fn tax_year_config(&self, year: i32) -> TaxYearConfig;

    /// Mortgage-interest deduction debt limit by origination date.
    fn mortgage_deduction_limit(&self, origination_date: NaiveDate) -> Money;

    fn marginal_tax_rate(&self, income: Money, status: FilingStatus, year: i32) -> Rate {
        self.tax_year_config(year).marginal_rate(income, status)
    }
}

// ---------------------------------------------------------------------------
// Bundled federal tables
// ---------------------------------------------------------------------------

/// Federal tables with enacted 2025 figures.
///
/// Requests past the base year compound 2.5% annual inflation onto the
/// standard deductions (nearest $50) and bracket edges (nearest $25).
/// The SALT cap is statutory and stays fixed. Requests at or before
/// the base year return the base table unchanged.
#[derive(Debug, Clone, Default)]
pub struct FederalTaxTables;

impl TaxTableProvider for FederalTaxTables {
    fn tax_year_config(&self, year: i32) -> TaxYearConfig {
        let base = base_config();
        if year <= BASE_TABLE_YEAR {
            return base;
        }
        extrapolate(&base, year)
    }

    fn mortgage_deduction_limit(&self, origination_date: NaiveDate) -> Money {
        // TCJA cutover: loans closed on or before 2017-12-15 keep the
        // pre-TCJA $1M limit.
        let cutover = NaiveDate::from_ymd_opt(2017, 12, 15).expect("valid date");
        if origination_date <= cutover {
            DEBT_LIMIT_GRANDFATHERED
        } else {
            DEBT_LIMIT_TCJA
        }
    }
}

/// Project a base-year config forward by compounding inflation.
fn extrapolate(base: &TaxYearConfig, year: i32) -> TaxYearConfig {
    let years_out = (year - base.year) as u32;
    let mut factor = Decimal::ONE;
    for _ in 0..years_out {
        factor *= INFLATION_FACTOR;
    }

    let deduction = |amount: Money| round_to_step(amount * factor, DEDUCTION_STEP);
    let edge = |amount: Money| round_to_step(amount * factor, BRACKET_STEP);
    let ladder = |brackets: &[TaxBracket]| -> Vec<TaxBracket> {
        brackets
            .iter()
            .map(|b| TaxBracket {
                min: edge(b.min),
                max: b.max.map(edge),
                rate: b.rate,
            })
            .collect()
    };

    TaxYearConfig {
        year,
        salt_cap: base.salt_cap,
        standard_deductions: StandardDeductions {
            single: deduction(base.standard_deductions.single),
            married_filing_jointly: deduction(base.standard_deductions.married_filing_jointly),
            married_filing_separately: deduction(
                base.standard_deductions.married_filing_separately,
            ),
            head_of_household: deduction(base.standard_deductions.head_of_household),
        },
        brackets: BracketTables {
            single: ladder(&base.brackets.single),
            married_filing_jointly: ladder(&base.brackets.married_filing_jointly),
            married_filing_separately: ladder(&base.brackets.married_filing_separately),
            head_of_household: ladder(&base.brackets.head_of_household),
        },
    }
}

fn round_to_step(amount: Money, step: Decimal) -> Money {
    (amount / step).round() * step
}

fn bracket(min: Money, max: Option<Money>, rate: Rate) -> TaxBracket {
    TaxBracket { min, max, rate }
}

/// Enacted 2025 federal figures.
fn base_config() -> TaxYearConfig {
    TaxYearConfig {
        year: BASE_TABLE_YEAR,
        salt_cap: dec!(10000),
        standard_deductions: StandardDeductions {
            single: dec!(15000),
            married_filing_jointly: dec!(30000),
            married_filing_separately: dec!(15000),
            head_of_household: dec!(22500),
        },
        brackets: BracketTables {
            single: vec![
                bracket(dec!(0), Some(dec!(11925)), dec!(0.10)),
                bracket(dec!(11925), Some(dec!(48475)), dec!(0.12)),
                bracket(dec!(48475), Some(dec!(103350)), dec!(0.22)),
                bracket(dec!(103350), Some(dec!(197300)), dec!(0.24)),
                bracket(dec!(197300), Some(dec!(250525)), dec!(0.32)),
                bracket(dec!(250525), Some(dec!(626350)), dec!(0.35)),
                bracket(dec!(626350), None, dec!(0.37)),
            ],
            married_filing_jointly: vec![
                bracket(dec!(0), Some(dec!(23850)), dec!(0.10)),
                bracket(dec!(23850), Some(dec!(96950)), dec!(0.12)),
                bracket(dec!(96950), Some(dec!(206700)), dec!(0.22)),
                bracket(dec!(206700), Some(dec!(394600)), dec!(0.24)),
                bracket(dec!(394600), Some(dec!(501050)), dec!(0.32)),
                bracket(dec!(501050), Some(dec!(751600)), dec!(0.35)),
                bracket(dec!(751600), None, dec!(0.37)),
            ],
            married_filing_separately: vec![
                bracket(dec!(0), Some(dec!(11925)), dec!(0.10)),
                bracket(dec!(11925), Some(dec!(48475)), dec!(0.12)),
                bracket(dec!(48475), Some(dec!(103350)), dec!(0.22)),
                bracket(dec!(103350), Some(dec!(197300)), dec!(0.24)),
                bracket(dec!(197300), Some(dec!(250525)), dec!(0.32)),
                bracket(dec!(250525), Some(dec!(375800)), dec!(0.35)),
                bracket(dec!(375800), None, dec!(0.37)),
            ],
            head_of_household: vec![
                bracket(dec!(0), Some(dec!(17000)), dec!(0.10)),
                bracket(dec!(17000), Some(dec!(64850)), dec!(0.12)),
                bracket(dec!(64850), Some(dec!(103350)), dec!(0.22)),
                bracket(dec!(103350), Some(dec!(197300)), dec!(0.24)),
                bracket(dec!(197300), Some(dec!(250500)), dec!(0.32)),
                bracket(dec!(250500), Some(dec!(626350)), dec!(0.35)),
                bracket(dec!(626350), None, dec!(0.37)),
            ],
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    #[test]
    fn test_base_year_returned_unchanged() {
        let config = FederalTaxTables.tax_year_config(2025);
        assert_eq!(config.year, 2025);
        assert_eq!(
            config.standard_deduction(FilingStatus::MarriedFilingJointly),
            dec!(30000)
        );
    }

    #[test]
    fn test_extrapolated_deduction_rounds_to_50() {
        // 30000 * 1.025^5 = 33942.25 → nearest 50 is 33950
        let config = FederalTaxTables.tax_year_config(2030);
        assert_eq!(
            config.standard_deduction(FilingStatus::MarriedFilingJointly),
            dec!(33950)
        );
    }

    #[test]
    fn test_extrapolated_bracket_edges_round_to_25() {
        let config = FederalTaxTables.tax_year_config(2030);
        for b in config.brackets(FilingStatus::Single) {
            assert!((b.min % dec!(25)).is_zero(), "min {}", b.min);
            if let Some(max) = b.max {
                assert!((max % dec!(25)).is_zero(), "max {max}");
            }
        }
    }

    #[test]
    fn test_salt_cap_not_inflated() {
        assert_eq!(FederalTaxTables.tax_year_config(2040).salt_cap, dec!(10000));
    }

    #[test]
    fn test_bracket_ladders_contiguous() {
        let config = base_config();
        for status in [
            FilingStatus::Single,
            FilingStatus::MarriedFilingJointly,
            FilingStatus::MarriedFilingSeparately,
            FilingStatus::HeadOfHousehold,
        ] {
            let ladder = config.brackets(status);
            assert_eq!(ladder[0].min, Decimal::ZERO);
            assert_eq!(ladder.last().unwrap().max, None);
            for pair in ladder.windows(2) {
                assert_eq!(pair[0].max, Some(pair[1].min));
            }
        }
    }

    #[test]
    fn test_marginal_rate_lookup() {
        let config = base_config();
        assert_eq!(
            config.marginal_rate(dec!(0), FilingStatus::Single),
            dec!(0.10)
        );
        assert_eq!(
            config.marginal_rate(dec!(100000), FilingStatus::MarriedFilingJointly),
            dec!(0.22)
        );
        // Bracket min is inclusive
        assert_eq!(
            config.marginal_rate(dec!(48475), FilingStatus::Single),
            dec!(0.22)
        );
        assert_eq!(
            config.marginal_rate(dec!(1000000), FilingStatus::Single),
            dec!(0.37)
        );
    }

    #[test]
    fn test_debt_limit_cutover() {
        let tables = FederalTaxTables;
        let on_cutover = NaiveDate::from_ymd_opt(2017, 12, 15).unwrap();
        let after = NaiveDate::from_ymd_opt(2017, 12, 16).unwrap();
        assert_eq!(tables.mortgage_deduction_limit(on_cutover), dec!(1000000));
        assert_eq!(tables.mortgage_deduction_limit(after), dec!(750000));
    }
}
