//! Task runner

use crate::discovery::Task;
use crate::error::{ExecutionError, ExecutionResult};
use crate::runner::{ensure_executable, execute, ContextResolver, ExecutionContext};
use crate::ui::{indent, Reporter};
use std::fs;

/// Runs tasks of one project, one at a time
pub struct Runner<'a> {
    resolver: &'a ContextResolver,
    reporter: &'a Reporter,
}

impl<'a> Runner<'a> {
    pub fn new(resolver: &'a ContextResolver, reporter: &'a Reporter) -> Self {
        Runner { resolver, reporter }
    }

    /// Run a task with extra arguments and return its exit code
    ///
    /// A nonzero exit code of the task is a regular result, not an error.
    pub fn run(&self, task: &Task, args: &[String]) -> ExecutionResult<i32> {
        let bytes =
            fs::read(&task.path).map_err(|_| ExecutionError::ScriptNotFound(task.path.clone()))?;
        let script_text = String::from_utf8_lossy(&bytes);

        let ctx = self.resolver.resolve(task, &script_text, args)?;

        if ctx.program == task.path {
            match ensure_executable(&task.path) {
                Ok(true) => self
                    .reporter
                    .debug(&format!("made {} executable", task.path.display())),
                Ok(false) => {}
                Err(e) => self.reporter.warn(&format!(
                    "cannot make {} executable: {}",
                    task.path.display(),
                    e
                )),
            }
        }

        self.report_start(task, &ctx, args, &script_text);
        self.reporter
            .debug(&format!("full command: '{}'", ctx.command_line()));

        let code = execute(&ctx)?;
        if code != 0 {
            self.reporter
                .debug(&format!("task {} exited with {}", task.name, code));
        }

        Ok(code)
    }

    fn report_start(&self, task: &Task, ctx: &ExecutionContext, args: &[String], script_text: &str) {
        let root = self.resolver.root();
        let mut msg = task.long_name(root);

        if ctx.changes_dir {
            let shown = match ctx.working_dir.strip_prefix(root) {
                Ok(rel) if rel.as_os_str().is_empty() => "<qox root>".to_string(),
                Ok(rel) => rel.display().to_string(),
                Err(_) => {
                    self.reporter
                        .debug(&format!("task will run outside of {}", root.display()));
                    ctx.working_dir.display().to_string()
                }
            };
            msg.push_str(&format!("\n[CHANGEDIR] {}", shown));
        }

        if !args.is_empty() {
            msg.push_str(&format!("\n[args] {:?}", args));
        }

        msg.push_str("\n[definition]\n");
        msg.push_str(&indent(script_text, "  "));
        self.reporter.info(&msg);
    }
}
