use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::token::Token;

/// Identity of an expression node.  Keys the resolver's distance table, so two
/// structurally identical references are still distinct entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExprId(usize);

static NEXT_EXPR_ID: AtomicUsize = AtomicUsize::new(0);

impl ExprId {
    /// Allocate an id never handed out before in this process.  Trees parsed
    /// by separate REPL lines share one interpreter, so ids must not restart.
    pub fn fresh() -> Self {
        ExprId(NEXT_EXPR_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ExprId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A literal constant appearing directly in the source.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Number(f64),
    Str(String),
    Bool(bool),
    Nil,
}

/// An expression node: its identity plus the syntactic form.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub id: ExprId,
    pub kind: ExprKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Literal(LiteralValue),

    // Parenthesised sub‑expression
    Grouping(Box<Expr>),

    // `!x`, `-x`
    Unary {
        operator: Token,
        right: Box<Expr>,
    },

    // Arithmetic, comparison and equality operators
    Binary {
        left: Box<Expr>,
        operator: Token,
        right: Box<Expr>,
    },

    // Short‑circuiting `and` / `or`
    Logical {
        left: Box<Expr>,
        operator: Token,
        right: Box<Expr>,
    },

    Variable(Token),

    Assign {
        name: Token,
        value: Box<Expr>,
    },

    Call {
        callee: Box<Expr>,
        // closing `)`, kept for error lines
        paren: Token,
        arguments: Vec<Expr>,
    },

    // object.name
    Get {
        object: Box<Expr>,
        name: Token,
    },

    // object.name = value
    Set {
        object: Box<Expr>,
        name: Token,
        value: Box<Expr>,
    },

    This(Token),

    // super.method
    Super {
        keyword: Token,
        method: Token,
    },
}

impl Expr {
    pub fn new(kind: ExprKind) -> Self {
        Self {
            id: ExprId::fresh(),
            kind,
        }
    }
}
