pub(crate) mod build;
pub(crate) mod parse;
pub(crate) mod validate;

use crate::OutputFormat;

/// Prints a pipeline error: its JSON value under `--output json`, the
/// one-line message otherwise. Nothing under `--quiet`.
pub(crate) fn report_core_error(e: &fsmgen_core::Error, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Json => {
            let err_json = serde_json::to_string_pretty(&e.to_json_value())
                .unwrap_or_else(|_| format!("{{\"error\": \"{:?}\"}}", e));
            eprintln!("{}", err_json);
        }
        OutputFormat::Text => eprintln!("{}", e),
    }
}
