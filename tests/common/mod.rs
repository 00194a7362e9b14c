#![allow(dead_code)]

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use rox::{Diagnostics, Lox, RunStatus};

/// `Write` sink that can be read back after the interpreter is done with it.
#[derive(Clone, Default)]
pub struct Capture(Rc<RefCell<Vec<u8>>>);

impl Capture {
    pub fn lines(&self) -> Vec<String> {
        String::from_utf8_lossy(&self.0.borrow())
            .lines()
            .map(str::to_string)
            .collect()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

impl Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A session printing into a [`Capture`].
pub fn session() -> (Lox, Capture) {
    let capture = Capture::default();
    let lox = Lox::with_output(Box::new(capture.clone()));
    (lox, capture)
}

pub struct Outcome {
    pub status: RunStatus,
    pub stdout: Vec<String>,
    pub diagnostics: Diagnostics,
}

impl Outcome {
    /// Rendered diagnostics, one string per error.
    pub fn errors(&self) -> Vec<String> {
        self.diagnostics
            .errors()
            .iter()
            .map(|e| e.to_string())
            .collect()
    }
}

/// Run `source` in a fresh session.
pub fn run(source: &str) -> Outcome {
    let (mut lox, capture) = session();
    let mut diagnostics = Diagnostics::new();
    let status = lox.run(source, &mut diagnostics);

    Outcome {
        status,
        stdout: capture.lines(),
        diagnostics,
    }
}
