//! Task execution
//!
//! A task runs its children first, depth-first and in declared order, then
//! its own shell entries, then its command entries. A task reached through
//! two parents runs twice. A failing entry is reported and the walk goes
//! on; only an undeclared task stops it.

use crate::config::{Config, Section};
use crate::error::{ConfigError, Result};
use crate::runner::{execute_command, execute_shell, run_all, Context};

/// Walks the task graph of a validated configuration
pub struct TaskRunner<'a> {
    config: &'a Config,
    ctx: &'a Context,
}

impl<'a> TaskRunner<'a> {
    pub fn new(config: &'a Config, ctx: &'a Context) -> Self {
        TaskRunner { config, ctx }
    }

    /// Verify that `name` and every task it depends on are declared.
    ///
    /// The configuration must already be free of cycles.
    pub fn check(&self, name: &str) -> Result<()> {
        let section = self.section(name)?;
        for child in &section.child {
            self.check(child)?;
        }
        Ok(())
    }

    /// Run a task after checking its whole tree, so an unknown name anywhere
    /// in it means nothing runs.
    pub fn run(&self, name: &str) -> Result<()> {
        self.check(name)?;
        self.execute(name)
    }

    fn execute(&self, name: &str) -> Result<()> {
        let section = self.section(name)?;

        for child in &section.child {
            self.execute(child)?;
        }

        self.ctx.print_task_start(name);

        // Entry failures are reported by run_all and never abort the walk.
        let failures = run_all(&section.shell, self.ctx, execute_shell).len()
            + run_all(&section.command, self.ctx, execute_command).len();

        if failures == 0 {
            self.ctx.print_task_complete(name);
        }
        Ok(())
    }

    fn section(&self, name: &str) -> Result<&'a Section> {
        self.config
            .section(name)
            .ok_or_else(|| ConfigError::TaskNotFound(name.to_string()).into())
    }
}
