//! hostcheck-rs-memory: Memory usage check binary.
//!
//! Prints one status line with performance data and exits with the
//! monitoring plugin code: 0 OK, 1 WARNING, 2 CRITICAL, 3 UNKNOWN.

use anyhow::Context;
use clap::error::ErrorKind;
use clap::Parser;
use hostcheck_rs_core::{
    logging, Check, CheckError, CheckOutput, ErrorCategory, Status, ThresholdSpec,
};
use hostcheck_rs_memory::{MemoryCheck, PROC_MEMINFO_PATH};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, error};

/// Command-line arguments for the memory check.
#[derive(Parser)]
#[command(name = "hostcheck-rs-memory")]
#[command(about = "Memory usage check for hostcheck-rs")]
#[command(version)]
#[command(author)]
struct Args {
    /// Warning threshold: used kB, or percent of total with a trailing '%'
    #[arg(short, long, default_value = "70%", value_name = "INT[%]")]
    warning: ThresholdSpec,

    /// Critical threshold: used kB, or percent of total with a trailing '%'
    #[arg(short, long, default_value = "80%", value_name = "INT[%]")]
    critical: ThresholdSpec,

    /// Memory statistics source
    #[arg(long, default_value = PROC_MEMINFO_PATH, value_name = "PATH")]
    meminfo: PathBuf,

    /// Print the result as a single line of JSON
    #[arg(long)]
    json: bool,

    /// Check that the memory source is usable and exit
    #[arg(long)]
    check: bool,

    /// Log debug details to stderr
    #[arg(short, long)]
    verbose: bool,
}

/// Main entry point for the memory check.
fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => return argument_failure(err),
    };

    logging::init(args.verbose);
    debug!(
        warning = %args.warning,
        critical = %args.critical,
        meminfo = %args.meminfo.display(),
        "starting memory check"
    );

    let mut check =
        MemoryCheck::new(args.warning, args.critical).with_meminfo_path(&args.meminfo);

    if args.check {
        return match check.check_availability() {
            Ok(()) => {
                let output = CheckOutput::new(Status::Ok, "Memory check is available");
                match emit(&output, args.json) {
                    Ok(()) => ExitCode::from(output.status.exit_code()),
                    Err(e) => write_failure(&e),
                }
            }
            Err(e) => fail("check_availability", &e, args.json),
        };
    }

    match check.run() {
        Ok(output) => match emit(&output, args.json) {
            Ok(()) => ExitCode::from(output.status.exit_code()),
            Err(e) => write_failure(&e),
        },
        Err(e) => fail(operation_for(&e), &e, args.json),
    }
}

/// Handle a clap parse failure.
///
/// Help and version requests are successes; every other parse problem is an
/// UNKNOWN result rather than clap's own exit status.
fn argument_failure(err: clap::Error) -> ExitCode {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            let _ = err.print();
            ExitCode::from(Status::Ok.exit_code())
        }
        _ => {
            logging::init(false);
            let rendered = err.to_string();
            let first_line = rendered.lines().next().unwrap_or_default();
            let message = first_line.strip_prefix("error: ").unwrap_or(first_line);
            fail("parse_arguments", &CheckError::argument(message), false)
        }
    }
}

/// Stage of the run an error came from, for diagnostics.
fn operation_for(err: &CheckError) -> &'static str {
    match err.category() {
        ErrorCategory::Argument => "parse_arguments",
        ErrorCategory::SourceRead => "read_snapshot",
        ErrorCategory::Compute => "evaluate",
    }
}

/// Report `err` on stderr and as an UNKNOWN line on stdout.
fn fail(operation: &str, err: &CheckError, json: bool) -> ExitCode {
    error!(operation, category = %err.category(), "{err}");

    let output = CheckOutput::unknown(err.to_string());
    if let Err(e) = emit(&output, json) {
        return write_failure(&e);
    }
    ExitCode::from(Status::Unknown.exit_code())
}

fn write_failure(err: &anyhow::Error) -> ExitCode {
    error!(operation = "write_output", "{err:#}");
    ExitCode::from(Status::Unknown.exit_code())
}

fn emit(output: &CheckOutput, json: bool) -> anyhow::Result<()> {
    let line = if json {
        output.to_json().context("Failed to serialize check output")?
    } else {
        output.to_string()
    };
    emit_line(&line)
}

fn emit_line(line: &str) -> anyhow::Result<()> {
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{line}").context("Failed to write check output")?;
    stdout.flush().context("Failed to flush stdout")?;
    Ok(())
}
