//! Rox: a tree‑walking interpreter for the Lox scripting language.
//!
//! The pipeline is `scan → parse → resolve → interpret`.  Each pass reports
//! into an explicit [`Diagnostics`] collector; [`Lox`] wires the passes
//! together around one long‑lived [`Interpreter`] so globals survive across
//! runs, which is what a REPL needs.

pub mod environment;
pub mod error;
pub mod expr;
pub mod interpreter;
pub mod parser;
pub mod resolver;
pub mod scanner;
pub mod stmt;
pub mod token;
pub mod value;

use std::io::Write;

use log::info;

pub use error::{Diagnostics, LoxError, Result};
pub use interpreter::Interpreter;

use parser::Parser;
use resolver::Resolver;
use stmt::Stmt;

/// How a single [`Lox::run`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Ok,
    /// A lexical, syntax or resolution error; nothing was executed.
    StaticError,
    /// Execution started and was aborted by a runtime error.
    RuntimeError,
}

/// A persistent interpreter session.
pub struct Lox {
    interpreter: Interpreter,
}

impl Default for Lox {
    fn default() -> Self {
        Self::new()
    }
}

impl Lox {
    pub fn new() -> Self {
        Self {
            interpreter: Interpreter::new(),
        }
    }

    /// A session whose `print` output goes to `output`.
    pub fn with_output(output: Box<dyn Write>) -> Self {
        Self {
            interpreter: Interpreter::with_output(output),
        }
    }

    /// Scan, parse and resolve `source` without running it.  Returns the
    /// statements, or `None` when this call reported a static error.  Errors
    /// already held by `diagnostics` are left alone and do not count.
    pub fn prepare(&mut self, source: &str, diagnostics: &mut Diagnostics) -> Option<Vec<Stmt>> {
        let first = diagnostics.errors().len();

        let tokens = scanner::scan(source, diagnostics);
        let statements = Parser::new(&tokens).parse(diagnostics);

        if reported(diagnostics, first, |e| !e.is_runtime()) {
            info!("Stopping after parse: static errors reported");
            return None;
        }

        Resolver::new(&mut self.interpreter).resolve(&statements, diagnostics);

        if reported(diagnostics, first, |e| !e.is_runtime()) {
            info!("Stopping after resolve: static errors reported");
            return None;
        }

        Some(statements)
    }

    /// Run `source` to completion, reporting every problem to `diagnostics`.
    /// The status reflects this call only.
    pub fn run(&mut self, source: &str, diagnostics: &mut Diagnostics) -> RunStatus {
        let first = diagnostics.errors().len();

        let Some(statements) = self.prepare(source, diagnostics) else {
            return RunStatus::StaticError;
        };

        self.interpreter.interpret(&statements, diagnostics);

        if reported(diagnostics, first, LoxError::is_runtime) {
            RunStatus::RuntimeError
        } else {
            RunStatus::Ok
        }
    }
}

/// Whether an error matching `kind` was reported at or after index `first`.
fn reported(diagnostics: &Diagnostics, first: usize, kind: impl Fn(&LoxError) -> bool) -> bool {
    diagnostics
        .errors()
        .get(first..)
        .is_some_and(|fresh| fresh.iter().any(kind))
}
