use argh::FromArgs;
use std::path::PathBuf;
use wish::{Interpreter, report_failure};

#[derive(FromArgs)]
/// A small command shell with parallel execution and output redirection.
struct WishArgs {
    /// script file to run in batch mode; interactive mode when omitted
    #[argh(positional)]
    script: Option<PathBuf>,
}

fn main() {
    let args: WishArgs = argh::from_env();
    let mut shell = Interpreter::default();

    let result = match args.script {
        Some(script) => shell.run_script(&script),
        None => shell.repl().map_err(Into::into),
    };

    if result.is_err() {
        report_failure();
        std::process::exit(1);
    }
}
