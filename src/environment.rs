//! Lexical scopes.  Each scope is shared (`Rc<RefCell<_>>`) by every frame and
//! closure that reached it, so a write through one holder is seen by all.
//! A closure stored in the scope it captured forms a cycle; such scopes live
//! until the process exits.

use crate::error::{LoxError, Result};
use crate::token::Token;
use crate::value::Value;
use log::debug;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Shared handle to a scope.
pub type EnvRef = Rc<RefCell<Environment>>;

#[derive(Debug, Default)]
pub struct Environment {
    values: HashMap<String, Value>,
    enclosing: Option<EnvRef>,
}

impl Environment {
    /// A root scope with no parent.
    pub fn new() -> Self {
        Environment {
            values: HashMap::new(),
            enclosing: None,
        }
    }

    pub fn with_enclosing(enclosing: EnvRef) -> Self {
        Environment {
            values: HashMap::new(),
            enclosing: Some(enclosing),
        }
    }

    /// Wrap into a shared handle.
    pub fn into_ref(self) -> EnvRef {
        Rc::new(RefCell::new(self))
    }

    pub fn enclosing(&self) -> Option<EnvRef> {
        self.enclosing.clone()
    }

    /// Bind `name` in this scope, replacing any previous binding.
    pub fn define(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_string(), value);
    }

    /// Dynamic lookup walking the whole chain.  Only the globals scope is
    /// queried this way; locals go through [`get_at`].
    pub fn get(&self, name: &Token) -> Result<Value> {
        if let Some(value) = self.values.get(&name.lexeme) {
            Ok(value.clone())
        } else if let Some(enclosing) = &self.enclosing {
            enclosing.borrow().get(name)
        } else {
            Err(undefined(name))
        }
    }

    pub fn assign(&mut self, name: &Token, value: Value) -> Result<()> {
        if let Some(slot) = self.values.get_mut(&name.lexeme) {
            *slot = value;
            Ok(())
        } else if let Some(enclosing) = &self.enclosing {
            enclosing.borrow_mut().assign(name, value)
        } else {
            Err(undefined(name))
        }
    }
}

/// Walk `distance` parent links up from `env`.
pub fn ancestor(env: &EnvRef, distance: usize) -> Result<EnvRef> {
    let mut current: EnvRef = Rc::clone(env);

    for _ in 0..distance {
        let parent = current.borrow().enclosing();
        current = parent.ok_or_else(|| {
            LoxError::runtime(0, format!("Scope chain shorter than {} hops", distance))
        })?;
    }

    Ok(current)
}

/// Read `name` from the scope exactly `distance` hops up.
pub fn get_at(env: &EnvRef, distance: usize, name: &Token) -> Result<Value> {
    debug!("get_at '{}' distance={}", name.lexeme, distance);

    let scope = ancestor(env, distance)?;
    let scope = scope.borrow();

    scope
        .values
        .get(&name.lexeme)
        .cloned()
        .ok_or_else(|| undefined(name))
}

/// Write `name` into the scope exactly `distance` hops up.
pub fn assign_at(env: &EnvRef, distance: usize, name: &Token, value: Value) -> Result<()> {
    debug!("assign_at '{}' distance={}", name.lexeme, distance);

    ancestor(env, distance)?
        .borrow_mut()
        .define(&name.lexeme, value);

    Ok(())
}

fn undefined(name: &Token) -> LoxError {
    LoxError::runtime(name.line, format!("Undefined variable '{}'.", name.lexeme))
}
