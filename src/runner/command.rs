//! Command execution
//!
//! Shell entries go through the interpreter (`sh -c <script>`). Command
//! entries are split into words and the program is spawned directly, so
//! no shell sees their quoting. Both inherit the tool's stdio.

use crate::error::{ExecutionError, ExecutionResult};
use crate::runner::Context;
use crate::ui;
use std::process::{Command as StdCommand, Stdio};
use std::thread;

/// Run a script through the context's interpreter
pub fn execute_shell(script: &str, ctx: &Context) -> ExecutionResult<()> {
    ctx.print_info("Shell", format!("{} '{}'", ctx.interpreter.join(" "), script));

    let (program, args) = ctx
        .interpreter
        .split_first()
        .ok_or(ExecutionError::EmptyCommand)?;

    let mut command = StdCommand::new(program);
    command.args(args).arg(script);

    spawn(command, program, script, ctx)
}

/// Split a command line into words and run the program directly
pub fn execute_command(line: &str, ctx: &Context) -> ExecutionResult<()> {
    let argv = split_command(line)?;
    ctx.print_info("Command", ui::quote_argv(&argv));

    let (program, args) = argv.split_first().ok_or(ExecutionError::EmptyCommand)?;

    let mut command = StdCommand::new(program);
    command.args(args);

    spawn(command, program, line, ctx)
}

/// Split a command line using POSIX shell quoting rules
pub fn split_command(line: &str) -> ExecutionResult<Vec<String>> {
    let argv = shlex::split(line).ok_or_else(|| ExecutionError::InvalidCommand(line.to_string()))?;
    if argv.is_empty() {
        return Err(ExecutionError::EmptyCommand);
    }
    Ok(argv)
}

fn spawn(mut command: StdCommand, program: &str, shown: &str, ctx: &Context) -> ExecutionResult<()> {
    command
        .current_dir(&ctx.working_dir)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());

    let status = command.status().map_err(|e| ExecutionError::Spawn {
        program: program.to_string(),
        error: e.to_string(),
    })?;

    if !status.success() {
        return Err(ExecutionError::CommandFailed {
            command: shown.to_string(),
            code: status.code(),
        });
    }

    Ok(())
}

/// Run every entry of a list and collect the failures.
///
/// A failing entry is reported and does not stop its siblings. In
/// parallel mode every entry is launched on its own thread and this
/// returns once all of them have finished.
pub fn run_all<F>(entries: &[String], ctx: &Context, run: F) -> Vec<ExecutionError>
where
    F: Fn(&str, &Context) -> ExecutionResult<()> + Sync,
{
    let run = &run;
    let results: Vec<ExecutionResult<()>> = if ctx.parallel && entries.len() > 1 {
        thread::scope(|scope| {
            let handles: Vec<_> = entries
                .iter()
                .map(|entry| scope.spawn(move || run(entry, ctx)))
                .collect();

            handles
                .into_iter()
                .zip(entries)
                .map(|(handle, entry)| {
                    handle.join().unwrap_or_else(|_| {
                        Err(ExecutionError::Spawn {
                            program: entry.clone(),
                            error: "worker thread panicked".to_string(),
                        })
                    })
                })
                .collect()
        })
    } else {
        entries.iter().map(|entry| run(entry, ctx)).collect()
    };

    results
        .into_iter()
        .filter_map(Result::err)
        .inspect(|err| ctx.print_error(err))
        .collect()
}
