use crate::command::{
    CommandFactory, Dispatch, ExecutableCommand, ExecutionError, OutputTarget,
};
use crate::env::Environment;
use crate::interpreter::Factory;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Command that is not a builtin: an executable resolved from the search path.
///
/// Execution spawns the child and returns without blocking; the scheduler
/// joins it after the whole line has been dispatched, so commands separated
/// by `&` genuinely run concurrently.
pub(crate) struct ExternalCommand {
    program: PathBuf,
    args: Vec<OsString>,
}

impl ExternalCommand {
    pub(crate) fn new(program: PathBuf, args: Vec<OsString>) -> Self {
        Self { program, args }
    }
}

impl CommandFactory for Factory<ExternalCommand> {
    fn try_create(
        &self,
        env: &Environment,
        name: &str,
        args: &[String],
    ) -> Option<Box<dyn ExecutableCommand>> {
        let program = find_in_search_path(&env.search_path, name)?;
        Some(Box::new(ExternalCommand::new(
            program,
            args.iter().map(|x| x.into()).collect(),
        )))
    }
}

impl ExecutableCommand for ExternalCommand {
    fn execute(
        self: Box<Self>,
        env: &mut Environment,
        output: OutputTarget,
    ) -> Result<Dispatch, ExecutionError> {
        let (stdout, stderr) = output.open().map_err(ExecutionError::Redirect)?;
        let child = Command::new(&self.program)
            .args(&self.args)
            .current_dir(&env.current_dir)
            .stdout(stdout)
            .stderr(stderr)
            .spawn()
            .map_err(ExecutionError::Spawn)?;
        Ok(Dispatch::Launched(child))
    }
}

/// Resolve a command name against the search path.
///
/// Tests `<dir>/<name>` for each directory in order and returns the first
/// entry that is an executable regular file. An empty search path resolves
/// nothing, so no external command can run until `path` sets a new one.
/// Resolution is by search path only; absolute and relative program paths
/// get no special treatment.
pub(crate) fn find_in_search_path(search_path: &[PathBuf], name: &str) -> Option<PathBuf> {
    search_path
        .iter()
        .map(|dir| dir.join(name))
        .find(|candidate| is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
