use clap::Args;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use mortgage_core::payment;
use mortgage_core::types::{Money, Percent};

use crate::input;

#[derive(Args)]
pub struct PaymentArgs {
    /// JSON input file (or pipe via stdin)
    #[arg(long)]
    pub input: Option<String>,
}

#[derive(Serialize, Deserialize)]
struct PaymentQuoteInput {
    principal: Money,
    annual_rate_pct: Percent,
    term_months: u32,
    /// With a home value the quote also covers LTV and PMI.
    #[serde(default)]
    home_value: Option<Money>,
    #[serde(default)]
    annual_pmi_rate_pct: Option<Percent>,
}

#[derive(Serialize)]
struct PaymentQuote {
    monthly_payment: Money,
    total_interest: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    loan_to_value: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    monthly_pmi: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pmi_drop_off_month: Option<u32>,
}

pub fn run_payment(args: PaymentArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let quote_input: PaymentQuoteInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input <file.json> or stdin required for payment quote".into());
    };

    let monthly = payment::monthly_payment(
        quote_input.principal,
        quote_input.annual_rate_pct,
        quote_input.term_months,
    )?;
    let interest = payment::total_interest(quote_input.principal, monthly, quote_input.term_months);

    let mut quote = PaymentQuote {
        monthly_payment: monthly,
        total_interest: interest,
        loan_to_value: None,
        monthly_pmi: None,
        pmi_drop_off_month: None,
    };

    if let Some(home_value) = quote_input.home_value {
        quote.loan_to_value = Some(payment::loan_to_value(quote_input.principal, home_value)?);
        if let Some(pmi_rate) = quote_input.annual_pmi_rate_pct {
            quote.monthly_pmi =
                Some(payment::monthly_pmi(quote_input.principal, home_value, pmi_rate)?);
        }
        quote.pmi_drop_off_month = payment::pmi_drop_off_month(
            quote_input.principal,
            home_value,
            monthly,
            quote_input.annual_rate_pct,
        )?;
    }

    Ok(serde_json::to_value(quote)?)
}
