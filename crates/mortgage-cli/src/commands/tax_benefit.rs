use clap::Args;
use serde::Deserialize;
use serde_json::Value;

use mortgage_core::amortization::schedule::{build_schedule, ScheduleInput};
use mortgage_core::amortization::yearly::yearly_summaries;
use mortgage_core::tax::benefit::{analyze_tax_benefit, TaxBenefitInput, TaxProfile};
use mortgage_core::tax::tables::FederalTaxTables;

use crate::input;

#[derive(Args)]
pub struct TaxBenefitArgs {
    /// JSON input file (or pipe via stdin)
    #[arg(long)]
    pub input: Option<String>,
}

/// One document drives the whole pipeline: schedule, yearly rollup,
/// then the tax engine.
#[derive(Deserialize)]
struct TaxBenefitDocument {
    schedule: ScheduleInput,
    profile: TaxProfile,
}

pub fn run_tax_benefit(args: TaxBenefitArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let doc: TaxBenefitDocument = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input <file.json> or stdin required for tax-benefit".into());
    };

    let schedule = build_schedule(&doc.schedule)?.result;
    let years = yearly_summaries(&schedule);
    let benefit_input = TaxBenefitInput {
        loan_amount: doc.schedule.principal,
        profile: doc.profile,
        years,
    };
    let result = analyze_tax_benefit(&benefit_input, &FederalTaxTables)?;
    Ok(serde_json::to_value(result)?)
}
