use crate::env::Environment;
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::{Child, Stdio};

/// Diagnostic written to standard error for every engine-detected failure.
///
/// The shell does not distinguish error causes to the outside world: malformed
/// redirection, missing executable, bad builtin usage and process-creation
/// failures all surface as this one line.
const ERROR_MESSAGE: &str = "An error has occurred\n";

/// Report a standard failure on the diagnostic channel.
pub fn report_failure() {
    // stderr write failures have nowhere left to be reported
    let _ = io::stderr().write_all(ERROR_MESSAGE.as_bytes());
}

/// Outcome of dispatching one command.
///
/// Builtins complete synchronously in the calling process; external commands
/// are started without blocking and handed back to the scheduler, which owns
/// the child from launch until it is waited on.
pub enum Dispatch {
    /// The command ran to completion in-process.
    Completed,
    /// A child process was started; the caller must eventually `wait` it.
    Launched(Child),
}

/// Destination for a launched command's standard output and standard error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// Inherit the shell's own streams.
    Inherit,
    /// Write to the file at this path, created if absent, truncated if present.
    File(PathBuf),
}

impl OutputTarget {
    /// Build the stdout/stderr handles for a child about to be spawned.
    ///
    /// Opening the target is the atomic pre-launch configuration step: it
    /// happens before any process is created, and a failure here means no
    /// process is created at all. The shell's own streams are never touched.
    pub fn open(&self) -> io::Result<(Stdio, Stdio)> {
        match self {
            OutputTarget::Inherit => Ok((Stdio::inherit(), Stdio::inherit())),
            OutputTarget::File(path) => {
                let file = File::create(path)?;
                let stderr = file.try_clone()?;
                Ok((file.into(), stderr.into()))
            }
        }
    }
}

impl From<Option<PathBuf>> for OutputTarget {
    fn from(target: Option<PathBuf>) -> Self {
        match target {
            Some(path) => OutputTarget::File(path),
            None => OutputTarget::Inherit,
        }
    }
}

/// Errors produced while dispatching a single command.
///
/// Each variant is terminal for its command and local to it: the scheduler
/// reports the failure and proceeds to the next command group.
#[derive(Debug)]
pub enum ExecutionError {
    /// A builtin was invoked with the wrong number of arguments.
    BadUsage,
    /// `cd` could not enter the target directory.
    Chdir(io::Error),
    /// No directory in the search path holds an executable with this name.
    CommandNotFound,
    /// The redirection target could not be opened for writing.
    Redirect(io::Error),
    /// The child process could not be created.
    Spawn(io::Error),
}

impl std::fmt::Display for ExecutionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExecutionError::BadUsage => f.write_str("invalid arguments"),
            ExecutionError::Chdir(e) => write!(f, "cannot change directory: {}", e),
            ExecutionError::CommandNotFound => f.write_str("command not found"),
            ExecutionError::Redirect(e) => write!(f, "cannot open redirection target: {}", e),
            ExecutionError::Spawn(e) => write!(f, "cannot start process: {}", e),
        }
    }
}

impl std::error::Error for ExecutionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExecutionError::Chdir(e)
            | ExecutionError::Redirect(e)
            | ExecutionError::Spawn(e) => Some(e),
            ExecutionError::BadUsage | ExecutionError::CommandNotFound => None,
        }
    }
}

/// Object-safe trait for any command the shell can dispatch.
///
/// Implemented by built-ins via a blanket impl and by external commands.
pub trait ExecutableCommand {
    /// Execute the command against the shell state.
    ///
    /// `output` is the already-resolved redirection target; builtins ignore it
    /// since they write nothing to standard output.
    fn execute(
        self: Box<Self>,
        env: &mut Environment,
        output: OutputTarget,
    ) -> Result<Dispatch, ExecutionError>;
}

/// Factory that tries to create a command from a name and its arguments.
///
/// Returns `None` when the factory doesn't recognize the `name`. The external
/// command factory uses the environment to resolve the name against the
/// search path.
pub trait CommandFactory {
    /// Attempt to create a command instance for the provided name and arguments.
    fn try_create(
        &self,
        env: &Environment,
        name: &str,
        args: &[String],
    ) -> Option<Box<dyn ExecutableCommand>>;
}
