//! Argument contract for the external tool.
//!
//! `<tool> --no-progress --no-warnings [extra...] -o <template> -- <link>`
//!
//! Arguments are passed as a list, so nothing in the link is ever
//! interpreted by a shell. The `--` terminator keeps a link that starts with
//! a dash from being parsed as an option.

use std::ffi::OsString;
use std::process::Stdio;

use tokio::process::Command;
use vidgrab_core::Job;

use super::RunnerConfig;

pub const NO_PROGRESS_FLAG: &str = "--no-progress";
pub const NO_WARNINGS_FLAG: &str = "--no-warnings";
pub const OUTPUT_FLAG: &str = "-o";
pub const END_OF_OPTIONS: &str = "--";

/// Build the argument list for `job`. The link is always last.
pub fn build_args(extra_args: &[String], job: &Job) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![NO_PROGRESS_FLAG.into(), NO_WARNINGS_FLAG.into()];
    args.extend(extra_args.iter().map(OsString::from));
    args.push(OUTPUT_FLAG.into());
    args.push(job.output_template.clone().into_os_string());
    args.push(END_OF_OPTIONS.into());
    args.push(job.link.clone().into());
    args
}

/// Prepare the tool invocation with piped output and no stdin.
pub(crate) fn build_command(config: &RunnerConfig, job: &Job) -> Command {
    let mut cmd = Command::new(&config.tool_path);
    cmd.args(build_args(&config.tool_args, job))
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    cmd
}
