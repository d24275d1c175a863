use clap::Args;
use serde_json::Value;

use mortgage_core::buydown::scenarios::{self, BuydownInput};

use crate::input;

#[derive(Args)]
pub struct BuydownArgs {
    /// JSON input file (or pipe via stdin)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_buydown(args: BuydownArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let buydown_input: BuydownInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input <file.json> or stdin required for buydown".into());
    };
    let result = scenarios::analyze_buydown(&buydown_input)?;
    Ok(serde_json::to_value(result)?)
}
