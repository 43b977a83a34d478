use std::path::Path;
use std::process;

use fsmgen_core::compile::{build_tree, parse_file};
use fsmgen_core::serialize::to_json_string;

use super::report_core_error;
use crate::config::Config;
use crate::diag::DiagDir;
use crate::{report_error, OutputFormat};

pub(crate) struct BuildArgs<'a> {
    pub file: &'a Path,
    pub out: Option<&'a Path>,
    pub strict: bool,
    pub id: Option<&'a str>,
    pub diag: Option<&'a DiagDir>,
}

pub(crate) fn cmd_build(args: BuildArgs<'_>, config: &Config, output: OutputFormat, quiet: bool) {
    let file_name = args.file.display().to_string();

    let tree = match parse_file(args.file) {
        Ok(t) => t,
        Err(e) => {
            report_core_error(&e, output, quiet);
            process::exit(1);
        }
    };
    if let Some(diag) = args.diag {
        if let Err(msg) = diag.write_parse_tree(&tree) {
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    }

    let mut options = config.build_options(args.id, args.strict);
    options.source_diagram = Some(file_name.clone());
    let sm = match build_tree(&tree, &file_name, options) {
        Ok(sm) => sm,
        Err(e) => {
            report_core_error(&e, output, quiet);
            process::exit(1);
        }
    };
    tracing::info!(
        file = %file_name,
        states = sm.states().count(),
        transitions = sm.transitions().count(),
        "model built"
    );

    let json = to_json_string(&sm);
    if let Some(diag) = args.diag {
        if let Err(msg) = diag.write_model(&json) {
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    }

    match args.out {
        Some(out) => {
            if let Err(e) = std::fs::write(out, &json) {
                let msg = format!("error writing '{}': {}", out.display(), e);
                report_error(&msg, output, quiet);
                process::exit(1);
            }
            if !quiet {
                match output {
                    OutputFormat::Text => println!("wrote {}", out.display()),
                    OutputFormat::Json => {
                        println!("{}", serde_json::json!({ "written": out.display().to_string() }))
                    }
                }
            }
        }
        None => print!("{}", json),
    }
}
