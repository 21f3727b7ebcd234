// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowcanvas and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Flowcanvas CLI entrypoint.
//!
//! Replays a scripted canvas session (JSON) against the interaction core and prints the
//! per-step log plus the final selection and affordance flags.
//!
//! Set `FLOWCANVAS_LOG` (e.g. `flowcanvas=debug`) to see interaction tracing on stderr.

use std::error::Error;

use tracing_subscriber::EnvFilter;

const DEMO_SCRIPT: &str = include_str!("../demos/ingest.json");

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} <script.json> [--json]\n  {program} --script <script.json> [--json]\n  {program} --demo [--json]\n\n--demo replays a built-in script and cannot be combined with a script path.\n--json prints the report as JSON instead of text.\n\nSet FLOWCANVAS_LOG to a tracing filter (default: warn) to log interaction events."
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    demo: bool,
    json: bool,
    script_path: Option<String>,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--demo" => {
                if options.demo {
                    return Err(());
                }
                options.demo = true;
            }
            "--json" => {
                if options.json {
                    return Err(());
                }
                options.json = true;
            }
            "--script" => {
                if options.script_path.is_some() {
                    return Err(());
                }
                let path = args.next().ok_or(())?;
                options.script_path = Some(path);
            }
            _ if arg.starts_with('-') => return Err(()),
            _ => {
                if options.script_path.is_some() {
                    return Err(());
                }
                options.script_path = Some(arg);
            }
        }
    }

    if options.demo == options.script_path.is_some() {
        return Err(());
    }

    Ok(options)
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_env("FLOWCANVAS_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "flowcanvas".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        init_tracing();

        let script = match &options.script_path {
            Some(path) => flowcanvas::replay::load_script(path)?,
            None => serde_json::from_str(DEMO_SCRIPT)?,
        };

        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
        let report = runtime.block_on(flowcanvas::replay::run(&script))?;

        if options.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            print!("{}", flowcanvas::replay::format_report(&report));
        }
        Ok(())
    })();

    if let Err(err) = result {
        eprintln!("flowcanvas: {err}");
        std::process::exit(1);
    }
}
