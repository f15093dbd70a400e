use crate::command::{
    CommandFactory, Dispatch, ExecutionError, OutputTarget, report_failure,
};
use crate::env::Environment;
use crate::{lexer, parser};
use anyhow::Context;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::process::Child;

/// Character that separates commands intended to run concurrently.
const PARALLEL_MARKER: char = '&';

/// Prompt shown in interactive mode.
const PROMPT: &str = "wish> ";

/// Factory allows creating instances of ExecutableCommand.
///
/// Only supports commands defined in this crate — builtins and ExternalCommand.
pub(crate) struct Factory<T> {
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Default for Factory<T> {
    fn default() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

/// A shell interpreter that executes built-in and external commands.
///
/// The interpreter owns the shell state ([`Environment`]) and an ordered list
/// of [`CommandFactory`] objects queried to create commands by name; builtin
/// factories come before the external-command launcher. One call to
/// [`execute_line`](Interpreter::execute_line) processes a whole input line:
/// the line is split on `&` into command groups, each group is dispatched in
/// left-to-right order, and every child process launched for the line is
/// joined before the call returns.
pub struct Interpreter {
    env: Environment,
    commands: Vec<Box<dyn CommandFactory>>,
}

impl Interpreter {
    /// Create a new interpreter with a custom set of command factories.
    pub fn new(commands: Vec<Box<dyn CommandFactory>>) -> Self {
        Self {
            env: Environment::new(),
            commands,
        }
    }

    /// Execute one raw input line.
    ///
    /// Groups that are empty after trimming are silently dropped. A failure in
    /// one group is reported and never cancels its siblings; whatever children
    /// did launch are all waited on before this returns, with their exit
    /// statuses discarded.
    pub fn execute_line(&mut self, line: &str) {
        let mut children: Vec<Child> = Vec::new();

        for group in line.split(PARALLEL_MARKER) {
            let group = group.trim();
            if group.is_empty() {
                continue;
            }
            match self.dispatch_group(group) {
                Ok(Some(child)) => children.push(child),
                Ok(None) => {}
                Err(_) => report_failure(),
            }
        }

        for mut child in children {
            // child exit statuses do not influence the shell's own behavior
            let _ = child.wait();
        }
    }

    /// Dispatch a single command group: tokenize, resolve redirection, then
    /// run a builtin in-process or launch an external command.
    ///
    /// Returns the launched child, if any; builtins complete immediately.
    fn dispatch_group(&mut self, group: &str) -> anyhow::Result<Option<Child>> {
        let mut argv = lexer::split_words(group);
        if argv.is_empty() {
            return Ok(None);
        }

        let target = parser::take_redirect(&mut argv)?;
        let output = OutputTarget::from(target);

        let (name, args) = argv.split_first().expect("argv checked non-empty");
        for factory in &self.commands {
            if let Some(cmd) = factory.try_create(&self.env, name, args) {
                return match cmd.execute(&mut self.env, output)? {
                    Dispatch::Completed => Ok(None),
                    Dispatch::Launched(child) => Ok(Some(child)),
                };
            }
        }

        Err(ExecutionError::CommandNotFound.into())
    }

    /// Interactive read-eval loop.
    ///
    /// Reads one line at a time with the `wish> ` prompt, keeps history, and
    /// hands each accepted line to [`execute_line`](Interpreter::execute_line).
    /// End-of-input and Ctrl-C end the loop.
    pub fn repl(&mut self) -> rustyline::Result<()> {
        let mut rl = DefaultEditor::new()?;

        loop {
            match rl.readline(PROMPT) {
                Ok(line) => {
                    rl.add_history_entry(line.as_str())?;
                    self.execute_line(&line);
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
                Err(err) => return Err(err),
            }
        }

        Ok(())
    }

    /// Batch mode: execute a script file line by line until end-of-input.
    pub fn run_script(&mut self, script: &std::path::Path) -> anyhow::Result<()> {
        let file = File::open(script)
            .with_context(|| format!("cannot open script {}", script.display()))?;

        for line in BufReader::new(file).lines() {
            let line = line.context("cannot read script line")?;
            self.execute_line(&line);
        }

        Ok(())
    }
}

impl Default for Interpreter {
    /// Create an interpreter with the default command set: the builtins
    /// `exit`, `cd` and `path`, then the external command launcher.
    fn default() -> Self {
        use crate::builtin::{Cd, Exit, Path};
        use crate::external::ExternalCommand;
        Self::new(vec![
            Box::new(Factory::<Exit>::default()),
            Box::new(Factory::<Cd>::default()),
            Box::new(Factory::<Path>::default()),
            Box::new(Factory::<ExternalCommand>::default()),
        ])
    }
}
