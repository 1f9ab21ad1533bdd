use clap::Args;
use serde_json::Value;

use gpc_core::report;
use gpc_core::schedules::Schedules;
use gpc_core::types::Lang;
use gpc_core::valuation::{self, ValuationInput};

use crate::input;

/// Arguments for a valuation run
#[derive(Args)]
pub struct ValuateArgs {
    /// Path to JSON input file
    #[arg(long)]
    pub input: Option<String>,

    /// Path to a JSON rate-table file overriding the built-in schedules
    #[arg(long)]
    pub schedules: Option<String>,
}

/// Arguments for report payload generation
#[derive(Args)]
pub struct ReportArgs {
    /// Path to JSON input file
    #[arg(long)]
    pub input: Option<String>,

    /// Path to a JSON rate-table file overriding the built-in schedules
    #[arg(long)]
    pub schedules: Option<String>,

    /// Report language (en or zh)
    #[arg(long, default_value = "en")]
    pub lang: String,

    /// Generation date stamped into the report (defaults to today)
    #[arg(long)]
    pub generated_at: Option<String>,
}

pub fn run_valuate(args: ValuateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let val_input = read_input(args.input.as_deref())?;
    let result = match read_schedules(args.schedules.as_deref())? {
        Some(schedules) => valuation::compute_with_schedules(&val_input, &schedules)?,
        None => valuation::compute(&val_input)?,
    };
    Ok(serde_json::to_value(result)?)
}

pub fn run_report(args: ReportArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let lang = parse_lang(&args.lang)?;
    let val_input = read_input(args.input.as_deref())?;
    let computed = match read_schedules(args.schedules.as_deref())? {
        Some(schedules) => valuation::compute_with_schedules(&val_input, &schedules)?,
        None => valuation::compute(&val_input)?,
    };
    let generated_at = args
        .generated_at
        .unwrap_or_else(|| chrono::Local::now().format("%Y-%m-%d").to_string());
    let payload = report::build_report_payload(&val_input, &computed.result, lang, &generated_at);
    Ok(serde_json::to_value(payload)?)
}

fn read_input(path: Option<&str>) -> Result<ValuationInput, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        input::file::read_json(path)
    } else if let Some(data) = input::stdin::read_stdin()? {
        Ok(serde_json::from_value(data)?)
    } else {
        Err("--input <file.json> or stdin required for a valuation".into())
    }
}

fn read_schedules(path: Option<&str>) -> Result<Option<Schedules>, Box<dyn std::error::Error>> {
    match path {
        Some(path) => Ok(Some(input::file::read_json(path)?)),
        None => Ok(None),
    }
}

fn parse_lang(lang: &str) -> Result<Lang, Box<dyn std::error::Error>> {
    match lang {
        "en" => Ok(Lang::En),
        "zh" => Ok(Lang::Zh),
        other => {
            Err(format!("unsupported report language '{}' (expected en or zh)", other).into())
        }
    }
}
