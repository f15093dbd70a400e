use std::env as stdenv;
use std::path::PathBuf;

/// Mutable shell state shared across dispatch attempts.
///
/// The environment contains:
/// - `search_path`: the ordered list of directories consulted to resolve an
///   external command name; first match wins. Replaced wholesale by the
///   `path` builtin and read by the process launcher. An empty list is a
///   valid state in which no external command can be found.
/// - `current_dir`: the working directory for command execution, mutated only
///   by the `cd` builtin and inherited by every spawned child.
///
/// Note: fields are public for simplicity to keep the crate small.
#[derive(Debug, Clone)]
pub struct Environment {
    /// Directories searched, in order, for external commands.
    pub search_path: Vec<PathBuf>,
    /// The current working directory for command execution.
    pub current_dir: PathBuf,
}

impl Environment {
    /// Capture the current process state into a new `Environment`.
    ///
    /// The search path starts as `/bin`; `current_dir` is initialized from
    /// `std::env::current_dir()`.
    pub fn new() -> Self {
        let current_dir = stdenv::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self {
            search_path: vec![PathBuf::from("/bin")],
            current_dir,
        }
    }

    /// Replace the search path wholesale with `dirs`, in the order given.
    pub fn set_search_path(&mut self, dirs: impl IntoIterator<Item = PathBuf>) {
        self.search_path = dirs.into_iter().collect();
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}
