//! Report whether a call is eligible for compile-time evaluation

use clap::Args;
use console::style;
use pe_eval::check_eligibility;
use pe_golang::render_value;

use crate::call::CallArgs;
use crate::config::CliConfig;
use crate::Result;

/// Arguments for the check command
#[derive(Args, Debug, Clone, Default)]
pub struct CheckArgs {
    #[command(flatten)]
    pub call: CallArgs,
}

/// Execute the check command. Ineligibility is a verdict, not an error.
pub fn check_command(args: CheckArgs, _config: &CliConfig) -> Result<()> {
    let verdict = verdict(&args.call)?;
    match &verdict {
        Ok(summary) => println!("{} {}", style("eligible:").green().bold(), summary),
        Err(reason) => println!("{} {}", style("ineligible:").yellow().bold(), reason),
    }
    Ok(())
}

/// `Ok` with the call as it would be evaluated, or `Err` with the reason it would not.
pub fn verdict(call_args: &CallArgs) -> Result<std::result::Result<String, String>> {
    let call = call_args.resolve()?;
    Ok(match check_eligibility(&call) {
        Ok(args) => {
            let rendered: Vec<String> = args
                .iter()
                .map(|a| render_value(&a.value).unwrap_or_else(|_| a.value.to_string()))
                .collect();
            Ok(format!("{}({})", call.callee.func, rendered.join(", ")))
        }
        Err(reason) => Err(reason.to_string()),
    })
}
