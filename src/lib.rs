//! A small command shell with parallel execution and output redirection.
//!
//! This crate implements the execution engine of a POSIX-like shell: it turns
//! one raw input line into a set of independently dispatched commands, resolves
//! each against built-ins (`exit`, `cd`, `path`) or a configurable search path,
//! applies at most one output redirection per command, launches external
//! commands as concurrent child processes when separated by `&`, and joins them
//! all before accepting the next line.
//!
//! The main entry point is [`Interpreter`], which owns the shell state and a
//! set of pluggable command factories. The public modules [`command`] and
//! [`env`] expose the traits and types for implementing your own commands and
//! for inspecting the shell state.

mod builtin;
pub mod command;
pub mod env;
mod external;
mod interpreter;
mod lexer;
mod parser;

pub use command::report_failure;
pub use interpreter::Interpreter;
