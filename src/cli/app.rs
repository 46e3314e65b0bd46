//! Main CLI application

use crate::config::{
    config_dir, find_config_file, parse_config_file, parse_override, validate_config, Config,
    Properties, Resolver,
};
use crate::runner::{Context, TaskRunner, Verbosity};
use crate::ui;
use anyhow::Context as _;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use clap_complete::Shell;
use std::ffi::OsString;
use std::io;
use std::path::PathBuf;

/// Task run when no task name is given
pub const DEFAULT_TASK: &str = "default";

/// CLI application
pub struct App {
    /// The clap command
    command: Command,
}

/// Positional arguments split into overrides and task names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Invocation {
    /// `key=value` arguments
    pub overrides: Properties,
    /// Bare task names, `default` if none were given
    pub tasks: Vec<String>,
}

impl Invocation {
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> Self {
        let mut invocation = Invocation::default();

        for arg in args {
            match parse_override(arg.as_ref()) {
                Some((key, value)) => {
                    invocation.overrides.insert(key, value);
                }
                None => invocation.tasks.push(arg.as_ref().to_string()),
            }
        }

        if invocation.tasks.is_empty() {
            invocation.tasks.push(DEFAULT_TASK.to_string());
        }

        invocation
    }
}

impl App {
    pub fn new() -> Self {
        App {
            command: build_command(),
        }
    }

    /// Run the application with the process arguments
    pub fn run(self) -> anyhow::Result<()> {
        self.run_from(std::env::args_os())
    }

    /// Run the application with the given arguments
    pub fn run_from<I, T>(mut self, args: I) -> anyhow::Result<()>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = self.command.clone().get_matches_from(args);

        if let Some(shell) = matches.get_one::<Shell>("completions") {
            clap_complete::generate(*shell, &mut self.command, "rcall", &mut io::stdout());
            return Ok(());
        }

        let verbosity = get_verbosity(&matches);
        let config_path = match matches.get_one::<String>("file") {
            Some(path) => PathBuf::from(path),
            None => find_config_file()?,
        };
        let working_dir = config_dir(&config_path);

        let document = parse_config_file(&config_path)
            .with_context(|| format!("failed to load {}", config_path.display()))?;

        let ctx = Context::new()
            .with_working_dir(working_dir.clone())
            .with_parallel(matches.get_flag("parallel"))
            .with_verbosity(verbosity);

        if verbosity >= Verbosity::Verbose {
            ui::dump("Document", &document)?;
        }

        let args: Vec<String> = matches
            .get_many::<String>("args")
            .map(|values| values.cloned().collect())
            .unwrap_or_default();
        let invocation = Invocation::from_args(&args);

        let resolution = Resolver::new()
            .with_interpreter(ctx.interpreter.clone())
            .with_working_dir(working_dir)
            .resolve(&document, invocation.overrides);

        for warning in &resolution.warnings {
            if warning.is_debug() {
                ctx.print_debug("Shell", warning);
            } else {
                ctx.print_warning(warning);
            }
        }

        let config = resolution.config;
        if verbosity >= Verbosity::Verbose {
            ui::dump("Config", &config)?;
        }

        validate_config(&config)?;

        if matches.get_flag("list") {
            print_task_list(&config);
            return Ok(());
        }

        let runner = TaskRunner::new(&config, &ctx);
        for task in &invocation.tasks {
            runner.check(task)?;
        }
        for task in &invocation.tasks {
            runner.run(task)?;
        }

        Ok(())
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the clap command
fn build_command() -> Command {
    Command::new("rcall")
        .version(crate::VERSION)
        .about("A tiny make(1)-like task runner")
        .arg(
            Arg::new("args")
                .value_name("TASK|KEY=VALUE")
                .help("Tasks to run (default: 'default') and property overrides")
                .num_args(1..)
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("file")
                .short('f')
                .long("file")
                .value_name("FILE")
                .help("Path to the Taskfile"),
        )
        .arg(
            Arg::new("parallel")
                .short('p')
                .long("parallel")
                .help("Run the entries of each shell and cmd list concurrently")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("list")
                .short('l')
                .long("list")
                .help("List declared tasks and exit")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("completions")
                .long("completions")
                .value_name("SHELL")
                .help("Print a shell completion script and exit")
                .value_parser(value_parser!(Shell)),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Only print command output and errors")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("silent")
                .short('s')
                .long("silent")
                .help("Print no output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Print verbose output")
                .action(ArgAction::SetTrue),
        )
}

/// Get verbosity level from matches
fn get_verbosity(matches: &ArgMatches) -> Verbosity {
    if matches.get_flag("silent") {
        Verbosity::Silent
    } else if matches.get_flag("quiet") {
        Verbosity::Quiet
    } else if matches.get_flag("verbose") {
        Verbosity::Verbose
    } else {
        Verbosity::Normal
    }
}

fn print_task_list(config: &Config) {
    for (name, section) in &config.sections {
        if section.child.is_empty() {
            println!("{name}");
        } else {
            println!("{name}: {}", section.child.join(" "));
        }
    }
}

/// Run the CLI application with the process arguments
pub fn run() -> anyhow::Result<()> {
    App::new().run()
}
