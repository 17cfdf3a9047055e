//! Main CLI application

use crate::discovery::{discover, TaskRegistry};
use crate::error::{DiscoveryError, QoxError};
use crate::runner::{ContextResolver, EvalContextFile, Runner};
use crate::ui::{format_task_list, Reporter, Verbosity};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use clap_complete::Shell;
use std::env;
use std::io;
use std::path::PathBuf;

/// CLI application
pub struct App {
    /// Diagnostics sink
    reporter: Reporter,
    /// Directory discovery starts from
    start_dir: PathBuf,
}

impl App {
    /// Create an app starting discovery in `start_dir`
    pub fn new(start_dir: PathBuf, verbosity: Verbosity) -> Self {
        App {
            reporter: Reporter::new(verbosity),
            start_dir,
        }
    }

    /// Discover tasks and build the resolver with the project's overrides
    ///
    /// With `strict` unset, a broken override file is reported and skipped.
    fn load(&self, strict: bool) -> Result<(TaskRegistry, ContextResolver), QoxError> {
        let registry = discover(&self.start_dir, &self.reporter)?;
        let mut resolver = ContextResolver::for_registry(&registry);

        let overrides = match EvalContextFile::load(registry.root()) {
            Ok(overrides) => overrides,
            Err(e) if !strict => {
                self.reporter.error(&format!("{}, listing without overrides", e));
                None
            }
            Err(e) => return Err(e.into()),
        };

        if let Some(overrides) = overrides {
            self.reporter.debug(&format!(
                "loaded {} override(s) from {}",
                overrides.len(),
                EvalContextFile::path_for(registry.root()).display()
            ));
            resolver = resolver.with_override(Box::new(overrides));
        }

        Ok((registry, resolver))
    }

    /// Render the list of available tasks
    pub fn list(&self) -> Result<String, QoxError> {
        let (registry, resolver) = self.load(false)?;

        if registry.is_empty() && !registry.is_degraded() {
            return Err(DiscoveryError::NoTasks(registry.root().display().to_string()).into());
        }

        for conflict in registry.conflicts() {
            self.reporter.warn(&format!(
                "'{}' is ambiguous and cannot be run - rename one of its scripts",
                conflict.name
            ));
        }

        Ok(format_task_list(&registry, |task| resolver.is_runnable(task)))
    }

    /// Run a task by name and return its exit code
    pub fn run_task(&self, name: &str, args: &[String]) -> Result<i32, QoxError> {
        let (registry, resolver) = self.load(true)?;
        let task = registry.fetch(name)?;

        let runner = Runner::new(&resolver, &self.reporter);
        Ok(runner.run(task, args)?)
    }
}

/// Build the clap command
fn build_command() -> Command {
    Command::new("qox")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Quality out of the box - run the scripts in your .qox folders")
        .after_help("Without TASK, all available tasks are listed.")
        .arg(
            Arg::new("directory")
                .short('C')
                .long("directory")
                .value_name("DIR")
                .help("Look for tasks from DIR instead of the current directory")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Only print task output and errors")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("silent")
                .short('s')
                .long("silent")
                .help("Print no output of qox itself")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Print verbose output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("completions")
                .long("completions")
                .value_name("SHELL")
                .help("Print a completion script for SHELL")
                .value_parser(value_parser!(Shell)),
        )
        .arg(
            Arg::new("task")
                .value_name("TASK")
                .help("Task to run; arguments after it are passed to the task")
                .num_args(1..)
                .trailing_var_arg(true),
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

/// Task name and the arguments forwarded to it
///
/// Option parsing stops at the task name, so anything after it reaches the
/// task untouched, even if it looks like a qox option.
fn task_invocation(matches: &ArgMatches) -> Option<(String, Vec<String>)> {
    let mut words = matches.get_many::<String>("task")?.cloned();
    let name = words.next()?;
    Some((name, words.collect()))
}

/// Run the CLI application with the process arguments
pub fn run() -> Result<i32, QoxError> {
    let args: Vec<String> = env::args().collect();
    run_from(&args)
}

/// Run the CLI application with provided arguments, returning the exit code
pub fn run_from(args: &[String]) -> Result<i32, QoxError> {
    let matches = build_command().get_matches_from(args);

    if let Some(shell) = matches.get_one::<Shell>("completions") {
        clap_complete::generate(*shell, &mut build_command(), "qox", &mut io::stdout());
        return Ok(0);
    }

    let start_dir = match matches.get_one::<PathBuf>("directory") {
        Some(dir) => dir.clone(),
        None => env::current_dir()?,
    };
    let app = App::new(start_dir, get_verbosity(&matches));

    match task_invocation(&matches) {
        Some((name, task_args)) => app.run_task(&name, &task_args),
        None => {
            println!("{}", app.list()?);
            Ok(0)
        }
    }
}
