pub mod benefit;
pub mod tables;

pub use benefit::{
    analyze_tax_benefit, TaxBenefitInput, TaxBenefitSummary, TaxProfile, YearlyTaxBenefit,
};
pub use tables::{
    FederalTaxTables, FilingStatus, TaxBracket, TaxTableProvider, TaxYearConfig,
};
