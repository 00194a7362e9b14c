use std::rc::Rc;

use crate::expr::Expr;
use crate::token::Token;

/// A function or method declaration.  Shared behind an `Rc` because every
/// runtime closure created from it points back at the same body.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub name: Token,
    pub params: Vec<Token>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Expression(Expr),

    Print(Expr),

    Var {
        name: Token,
        initializer: Option<Expr>,
    },

    Block(Vec<Stmt>),

    If {
        condition: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },

    // `for` loops are desugared into this by the parser
    While {
        condition: Expr,
        body: Box<Stmt>,
    },

    Function(Rc<FunctionDecl>),

    Return {
        keyword: Token,
        value: Option<Expr>,
    },

    Class {
        name: Token,
        // always an `ExprKind::Variable` when present
        superclass: Option<Expr>,
        methods: Vec<Rc<FunctionDecl>>,
    },
}
