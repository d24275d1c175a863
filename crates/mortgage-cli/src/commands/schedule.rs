use clap::Args;
use serde_json::Value;

use mortgage_core::amortization::schedule::{self, ScheduleInput};
use mortgage_core::amortization::yearly;

use crate::input;

#[derive(Args)]
pub struct ScheduleArgs {
    /// JSON input file (or pipe via stdin)
    #[arg(long)]
    pub input: Option<String>,

    /// Include the full month-by-month ledger, not just the yearly rollup
    #[arg(long)]
    pub ledger: bool,
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let schedule_input: ScheduleInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input <file.json> or stdin required for schedule".into());
    };

    let out = schedule::build_schedule(&schedule_input)?;
    let years = yearly::yearly_summaries(&out.result);
    let profile = yearly::interest_profile(&out.result);

    let mut value = serde_json::to_value(&out)?;
    if !args.ledger {
        // The ledger can run to 360 rows; drop it unless asked for.
        if let Some(result) = value.get_mut("result").and_then(|r| r.as_object_mut()) {
            result.remove("payments");
        }
    }
    if let Some(result) = value.get_mut("result").and_then(|r| r.as_object_mut()) {
        result.insert("years".into(), serde_json::to_value(&years)?);
        result.insert("interest_profile".into(), serde_json::to_value(&profile)?);
    }
    Ok(value)
}
