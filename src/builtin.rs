use crate::command::{
    CommandFactory, Dispatch, ExecutableCommand, ExecutionError, OutputTarget,
};
use crate::env::Environment;
use crate::interpreter::Factory;
use std::fs;
use std::path::PathBuf;

/// Built-in commands known to the shell at compile time.
///
/// Builtins execute synchronously in the calling process and never fork, so
/// they always complete by the time dispatch returns. Argument counts are
/// validated at construction time; a command with the wrong arity is never
/// run.
pub(crate) trait BuiltinCommand: Sized {
    /// Canonical name of the command, e.g. "cd" or "path".
    fn name() -> &'static str;

    /// Validate the argument list and construct the command.
    fn from_args(args: &[String]) -> Result<Self, ExecutionError>;

    /// Execute the command against the shell state.
    fn execute(self, env: &mut Environment) -> Result<(), ExecutionError>;
}

impl<T: BuiltinCommand> ExecutableCommand for T {
    fn execute(
        self: Box<Self>,
        env: &mut Environment,
        _output: OutputTarget,
    ) -> Result<Dispatch, ExecutionError> {
        BuiltinCommand::execute(*self, env)?;
        Ok(Dispatch::Completed)
    }
}

/// Placeholder for a recognized builtin whose arguments failed validation.
///
/// Created by the factory so that the usage error surfaces through the same
/// execute path as every other failure.
struct InvalidUsage;

impl ExecutableCommand for InvalidUsage {
    fn execute(
        self: Box<Self>,
        _env: &mut Environment,
        _output: OutputTarget,
    ) -> Result<Dispatch, ExecutionError> {
        Err(ExecutionError::BadUsage)
    }
}

impl<T: BuiltinCommand + 'static> CommandFactory for Factory<T> {
    fn try_create(
        &self,
        _env: &Environment,
        name: &str,
        args: &[String],
    ) -> Option<Box<dyn ExecutableCommand>> {
        if name == T::name() {
            Some(match T::from_args(args) {
                Ok(cmd) => Box::new(cmd),
                Err(_) => Box::new(InvalidUsage),
            })
        } else {
            None
        }
    }
}

/// Terminate the shell process immediately.
///
/// Takes no arguments; any argument is a usage error and the shell keeps
/// running. On success the process exits with status 0 without returning to
/// the scheduler, so sibling commands already launched on the same line are
/// abandoned rather than awaited.
pub(crate) struct Exit;

impl BuiltinCommand for Exit {
    fn name() -> &'static str {
        "exit"
    }

    fn from_args(args: &[String]) -> Result<Self, ExecutionError> {
        if args.is_empty() {
            Ok(Exit)
        } else {
            Err(ExecutionError::BadUsage)
        }
    }

    fn execute(self, _env: &mut Environment) -> Result<(), ExecutionError> {
        std::process::exit(0)
    }
}

/// Change the working directory of the whole shell process.
///
/// Takes exactly one argument, absolute or relative to the current directory.
/// On failure the working directory is left unchanged.
pub(crate) struct Cd {
    target: PathBuf,
}

impl BuiltinCommand for Cd {
    fn name() -> &'static str {
        "cd"
    }

    fn from_args(args: &[String]) -> Result<Self, ExecutionError> {
        match args {
            [target] => Ok(Cd {
                target: PathBuf::from(target),
            }),
            _ => Err(ExecutionError::BadUsage),
        }
    }

    fn execute(self, env: &mut Environment) -> Result<(), ExecutionError> {
        let target = if self.target.is_absolute() {
            self.target
        } else {
            env.current_dir.join(self.target)
        };

        let canonical = fs::canonicalize(&target).map_err(ExecutionError::Chdir)?;
        std::env::set_current_dir(&canonical).map_err(ExecutionError::Chdir)?;
        env.current_dir = canonical;
        Ok(())
    }
}

/// Replace the search path wholesale with the given directories.
///
/// Accepts any number of arguments, including none; `path` with no arguments
/// empties the search path, after which no external command can be resolved
/// until a new path is set.
pub(crate) struct Path {
    entries: Vec<PathBuf>,
}

impl BuiltinCommand for Path {
    fn name() -> &'static str {
        "path"
    }

    fn from_args(args: &[String]) -> Result<Self, ExecutionError> {
        Ok(Path {
            entries: args.iter().map(PathBuf::from).collect(),
        })
    }

    fn execute(self, env: &mut Environment) -> Result<(), ExecutionError> {
        env.set_search_path(self.entries);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env as stdenv;
    use std::io;
    use std::sync::{Mutex, MutexGuard, OnceLock};
    use std::time::{SystemTime, UNIX_EPOCH};

    fn lock_current_dir() -> MutexGuard<'static, ()> {
        static MUTEX: OnceLock<Mutex<()>> = OnceLock::new();
        MUTEX.get_or_init(|| Mutex::new(())).lock().unwrap()
    }

    fn args(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|t| t.to_string()).collect()
    }

    fn make_unique_temp_dir(tag: &str) -> io::Result<PathBuf> {
        let mut p = stdenv::temp_dir();
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        p.push(format!("wish_builtin_{}_{}_{}", tag, std::process::id(), nanos));
        fs::create_dir_all(&p)?;
        Ok(p)
    }

    #[test]
    fn test_exit_rejects_any_argument() {
        assert!(matches!(
            Exit::from_args(&args(&["0"])),
            Err(ExecutionError::BadUsage)
        ));
        assert!(matches!(
            Exit::from_args(&args(&["a", "b"])),
            Err(ExecutionError::BadUsage)
        ));
        assert!(Exit::from_args(&[]).is_ok());
    }

    #[test]
    fn test_cd_requires_exactly_one_argument() {
        assert!(matches!(
            Cd::from_args(&[]),
            Err(ExecutionError::BadUsage)
        ));
        assert!(matches!(
            Cd::from_args(&args(&["a", "b"])),
            Err(ExecutionError::BadUsage)
        ));
        assert!(Cd::from_args(&args(&["somewhere"])).is_ok());
    }

    #[test]
    fn test_cd_to_absolute_path() {
        let _lock = lock_current_dir();
        let temp = make_unique_temp_dir("cd_abs").expect("failed to create temp dir");
        let canonical_temp = fs::canonicalize(&temp).expect("canonicalize failed");
        let orig = stdenv::current_dir().unwrap();

        let mut env = Environment::new();
        let cmd = Cd::from_args(&args(&[&canonical_temp.to_string_lossy()])).unwrap();
        let res = cmd.execute(&mut env);

        assert!(res.is_ok());
        assert_eq!(stdenv::current_dir().unwrap(), canonical_temp);
        assert_eq!(env.current_dir, canonical_temp);

        stdenv::set_current_dir(orig).expect("failed to restore cwd");
        let _ = fs::remove_dir_all(&temp);
    }

    #[test]
    fn test_cd_relative_resolves_against_tracked_dir() {
        let _lock = lock_current_dir();
        let temp = make_unique_temp_dir("cd_rel").expect("failed to create temp dir");
        fs::create_dir_all(temp.join("sub")).expect("create sub dir");
        let canonical_sub = fs::canonicalize(temp.join("sub")).unwrap();
        let orig = stdenv::current_dir().unwrap();

        let mut env = Environment::new();
        env.current_dir = fs::canonicalize(&temp).unwrap();

        let cmd = Cd::from_args(&args(&["sub"])).unwrap();
        let res = cmd.execute(&mut env);

        assert!(res.is_ok());
        assert_eq!(env.current_dir, canonical_sub);

        stdenv::set_current_dir(orig).expect("failed to restore cwd");
        let _ = fs::remove_dir_all(&temp);
    }

    #[test]
    fn test_cd_nonexistent_path_errors_and_preserves_cwd() {
        let _lock = lock_current_dir();
        let orig = stdenv::current_dir().unwrap();

        let mut env = Environment::new();
        let before = env.current_dir.clone();
        let name = format!("nonexistent_dir_for_wish_test_{}", std::process::id());

        let cmd = Cd::from_args(&args(&[&name])).unwrap();
        let res = cmd.execute(&mut env);

        assert!(matches!(res, Err(ExecutionError::Chdir(_))));
        assert_eq!(stdenv::current_dir().unwrap(), orig);
        assert_eq!(env.current_dir, before);
    }

    #[test]
    fn test_path_replaces_search_path_in_order() {
        let mut env = Environment::new();
        let cmd = Path::from_args(&args(&["/usr/bin", "/opt/bin"])).unwrap();
        cmd.execute(&mut env).unwrap();
        assert_eq!(
            env.search_path,
            vec![PathBuf::from("/usr/bin"), PathBuf::from("/opt/bin")]
        );
    }

    #[test]
    fn test_path_with_no_arguments_empties_search_path() {
        let mut env = Environment::new();
        let cmd = Path::from_args(&[]).unwrap();
        cmd.execute(&mut env).unwrap();
        assert!(env.search_path.is_empty());
    }

    #[test]
    fn test_factory_matches_by_exact_name() {
        let env = Environment::new();
        let factory = Factory::<Path>::default();
        assert!(factory.try_create(&env, "path", &[]).is_some());
        assert!(factory.try_create(&env, "paths", &[]).is_none());
        assert!(factory.try_create(&env, "cd", &[]).is_none());
    }

    #[test]
    fn test_factory_surfaces_usage_error_at_execute() {
        let mut env = Environment::new();
        let before = env.search_path.clone();
        let factory = Factory::<Cd>::default();

        let cmd = factory
            .try_create(&env, "cd", &args(&["a", "b"]))
            .expect("name is recognized even with bad arguments");
        let res = cmd.execute(&mut env, OutputTarget::Inherit);

        assert!(matches!(res, Err(ExecutionError::BadUsage)));
        assert_eq!(env.search_path, before);
    }
}
