//! Tree‑walking evaluator.
//!
//! Holds the globals scope, the *current* scope, the resolver's distance table
//! and the output channel `print` writes to.  The current scope is swapped in
//! [`Interpreter::execute_block`] and always restored before it returns, on
//! success, early `return` and error alike, so one failed `interpret` call
//! leaves the interpreter ready for the next.

use std::collections::HashMap;
use std::io::{self, Write};
use std::rc::Rc;

use chrono::Utc;
use log::{debug, info};

use crate::environment::{self, EnvRef, Environment};
use crate::error::{Diagnostics, LoxError, Result};
use crate::expr::{Expr, ExprId, ExprKind, LiteralValue};
use crate::stmt::{FunctionDecl, Stmt};
use crate::token::{Token, TokenType};
use crate::value::{Callable, LoxClass, LoxFunction, LoxInstance, NativeFunction, Value, INITIALIZER};

/// Outcome of executing a statement.  `return` travels up as a value, not as
/// an error, and stops at the nearest call boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    Normal,
    Return(Value),
}

pub struct Interpreter {
    globals: EnvRef,
    environment: EnvRef,
    locals: HashMap<ExprId, usize>,
    output: Box<dyn Write>,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    /// An interpreter printing to standard output.
    pub fn new() -> Self {
        Self::with_output(Box::new(io::stdout()))
    }

    /// An interpreter printing to `output`.
    pub fn with_output(output: Box<dyn Write>) -> Self {
        info!("Initializing Interpreter");

        let globals: EnvRef = Environment::new().into_ref();

        debug!("Defining native function 'clock'");

        globals.borrow_mut().define(
            "clock",
            Value::Callable(Callable::Native(Rc::new(NativeFunction {
                name: "clock",
                arity: 0,
                func: |_args: &[Value]| {
                    let micros = Utc::now().timestamp_micros();
                    Ok(Value::Number(micros as f64 / 1_000_000.0))
                },
            }))),
        );

        Self {
            environment: Rc::clone(&globals),
            globals,
            locals: HashMap::new(),
            output,
        }
    }

    /// Record that the variable expression `id` lives `depth` scopes out.
    pub fn note_local(&mut self, id: ExprId, depth: usize) {
        debug!("Noting local {} at depth {}", id, depth);

        self.locals.insert(id, depth);
    }

    /// Resolved depth of `id`, if the resolver found it in a local scope.
    pub fn local_depth(&self, id: ExprId) -> Option<usize> {
        self.locals.get(&id).copied()
    }

    /// Execute a resolved program.  The first runtime error aborts the rest of
    /// `statements` and is reported to `diagnostics`.
    pub fn interpret(&mut self, statements: &[Stmt], diagnostics: &mut Diagnostics) {
        info!("Interpreting {} statement(s)", statements.len());

        for stmt in statements {
            if let Err(e) = self.execute(stmt) {
                debug!("Runtime error, aborting: {}", e);
                diagnostics.report(e);
                return;
            }
        }

        info!("Interpretation completed successfully");
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Statements
    // ─────────────────────────────────────────────────────────────────────────

    fn execute(&mut self, stmt: &Stmt) -> Result<Flow> {
        match stmt {
            Stmt::Expression(expr) => {
                self.evaluate(expr)?;
            }

            Stmt::Print(expr) => {
                let value = self.evaluate(expr)?;
                writeln!(self.output, "{}", value)?;
                debug!("Printed value: {}", value);
            }

            Stmt::Var { name, initializer } => {
                let value = match initializer {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Nil,
                };
                debug!("Defining variable '{}' = {}", name.lexeme, value);
                self.environment.borrow_mut().define(&name.lexeme, value);
            }

            Stmt::Block(statements) => {
                let scope = Environment::with_enclosing(Rc::clone(&self.environment));
                return self.execute_block(statements, scope.into_ref());
            }

            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.evaluate(condition)?.is_truthy() {
                    return self.execute(then_branch);
                } else if let Some(else_branch) = else_branch {
                    return self.execute(else_branch);
                }
            }

            Stmt::While { condition, body } => {
                while self.evaluate(condition)?.is_truthy() {
                    if let Flow::Return(value) = self.execute(body)? {
                        return Ok(Flow::Return(value));
                    }
                }
            }

            Stmt::Function(declaration) => {
                debug!("Defining function '{}'", declaration.name.lexeme);
                let function = LoxFunction::new(
                    Rc::clone(declaration),
                    Rc::clone(&self.environment),
                    false,
                );
                self.environment.borrow_mut().define(
                    &declaration.name.lexeme,
                    Value::Callable(Callable::Function(Rc::new(function))),
                );
            }

            Stmt::Return { value, .. } => {
                let value = match value {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Nil,
                };
                debug!("Returning value: {}", value);
                return Ok(Flow::Return(value));
            }

            Stmt::Class {
                name,
                superclass,
                methods,
            } => self.execute_class(name, superclass.as_ref(), methods)?,
        }

        Ok(Flow::Normal)
    }

    fn execute_class(
        &mut self,
        name: &Token,
        superclass: Option<&Expr>,
        methods: &[Rc<FunctionDecl>],
    ) -> Result<()> {
        debug!("Declaring class '{}'", name.lexeme);

        let superclass: Option<Rc<LoxClass>> = match superclass {
            Some(expr) => match self.evaluate(expr)? {
                Value::Class(class) => Some(class),
                _ => {
                    let line = match &expr.kind {
                        ExprKind::Variable(token) => token.line,
                        _ => name.line,
                    };
                    return Err(LoxError::runtime(line, "Superclass must be a class."));
                }
            },
            None => None,
        };

        self.environment
            .borrow_mut()
            .define(&name.lexeme, Value::Nil);

        // Subclass methods close over an extra scope holding `super`.
        let method_scope: EnvRef = match &superclass {
            Some(superclass) => {
                let mut scope = Environment::with_enclosing(Rc::clone(&self.environment));
                scope.define("super", Value::Class(Rc::clone(superclass)));
                scope.into_ref()
            }
            None => Rc::clone(&self.environment),
        };

        let table: HashMap<String, Rc<LoxFunction>> = methods
            .iter()
            .map(|method| {
                let is_initializer = method.name.lexeme == INITIALIZER;
                let function =
                    LoxFunction::new(Rc::clone(method), Rc::clone(&method_scope), is_initializer);
                (method.name.lexeme.clone(), Rc::new(function))
            })
            .collect();

        let class = LoxClass::new(name.lexeme.clone(), superclass, table);

        self.environment
            .borrow_mut()
            .define(&name.lexeme, Value::Class(Rc::new(class)));

        info!("Class '{}' defined", name.lexeme);
        Ok(())
    }

    /// Run `statements` with `environment` as the current scope, restoring the
    /// previous scope on every exit path.
    pub fn execute_block(&mut self, statements: &[Stmt], environment: EnvRef) -> Result<Flow> {
        let previous = std::mem::replace(&mut self.environment, environment);

        let result = self.execute_all(statements);

        self.environment = previous;
        result
    }

    fn execute_all(&mut self, statements: &[Stmt]) -> Result<Flow> {
        for stmt in statements {
            if let Flow::Return(value) = self.execute(stmt)? {
                return Ok(Flow::Return(value));
            }
        }

        Ok(Flow::Normal)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Expressions
    // ─────────────────────────────────────────────────────────────────────────

    fn evaluate(&mut self, expr: &Expr) -> Result<Value> {
        match &expr.kind {
            ExprKind::Literal(literal) => Ok(match literal {
                LiteralValue::Number(n) => Value::Number(*n),
                LiteralValue::Str(s) => Value::from(s.as_str()),
                LiteralValue::Bool(b) => Value::Bool(*b),
                LiteralValue::Nil => Value::Nil,
            }),

            ExprKind::Grouping(inner) => self.evaluate(inner),

            ExprKind::Unary { operator, right } => self.evaluate_unary(operator, right),

            ExprKind::Binary {
                left,
                operator,
                right,
            } => self.evaluate_binary(left, operator, right),

            ExprKind::Logical {
                left,
                operator,
                right,
            } => {
                let left = self.evaluate(left)?;

                let short_circuit = if operator.token_type == TokenType::OR {
                    left.is_truthy()
                } else {
                    !left.is_truthy()
                };

                if short_circuit {
                    Ok(left)
                } else {
                    self.evaluate(right)
                }
            }

            ExprKind::Variable(name) => self.look_up_variable(name, expr.id),

            ExprKind::Assign { name, value } => {
                let value = self.evaluate(value)?;

                match self.local_depth(expr.id) {
                    Some(distance) => {
                        environment::assign_at(&self.environment, distance, name, value.clone())?
                    }
                    None => self.globals.borrow_mut().assign(name, value.clone())?,
                }

                debug!("Assigned {} to '{}'", value, name.lexeme);
                Ok(value)
            }

            ExprKind::Call {
                callee,
                paren,
                arguments,
            } => {
                let callee = self.evaluate(callee)?;

                let mut values: Vec<Value> = Vec::with_capacity(arguments.len());
                for argument in arguments {
                    values.push(self.evaluate(argument)?);
                }

                self.call(callee, values, paren)
            }

            ExprKind::Get { object, name } => match self.evaluate(object)? {
                Value::Instance(instance) => instance.get(name),
                _ => Err(LoxError::runtime(
                    name.line,
                    "Only instances have properties.",
                )),
            },

            ExprKind::Set {
                object,
                name,
                value,
            } => {
                let Value::Instance(instance) = self.evaluate(object)? else {
                    return Err(LoxError::runtime(name.line, "Only instances have fields."));
                };

                let value = self.evaluate(value)?;
                instance.set(name, value.clone());
                Ok(value)
            }

            ExprKind::This(keyword) => self.look_up_variable(keyword, expr.id),

            ExprKind::Super { keyword, method } => self.evaluate_super(expr.id, keyword, method),
        }
    }

    fn evaluate_unary(&mut self, operator: &Token, right: &Expr) -> Result<Value> {
        let right = self.evaluate(right)?;

        match (&operator.token_type, right) {
            (TokenType::BANG, value) => Ok(Value::Bool(!value.is_truthy())),
            (TokenType::MINUS, Value::Number(n)) => Ok(Value::Number(-n)),
            (TokenType::MINUS, _) => Err(LoxError::runtime(
                operator.line,
                "Operand must be a number.",
            )),
            _ => Err(LoxError::runtime(
                operator.line,
                format!("Invalid unary operator '{}'.", operator.lexeme),
            )),
        }
    }

    fn evaluate_binary(&mut self, left: &Expr, operator: &Token, right: &Expr) -> Result<Value> {
        let left = self.evaluate(left)?;
        let right = self.evaluate(right)?;

        debug!(
            "Binary '{}' on {} and {}",
            operator.lexeme,
            left.type_name(),
            right.type_name()
        );

        match &operator.token_type {
            TokenType::EQUAL_EQUAL => return Ok(Value::Bool(left == right)),
            TokenType::BANG_EQUAL => return Ok(Value::Bool(left != right)),
            TokenType::PLUS => {
                return match (left, right) {
                    (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
                    (Value::String(a), Value::String(b)) => {
                        let joined: String = [&*a, &*b].concat();
                        Ok(Value::String(Rc::from(joined)))
                    }
                    _ => Err(LoxError::runtime(
                        operator.line,
                        "Operands must be two numbers or two strings.",
                    )),
                };
            }
            _ => {}
        }

        let (Value::Number(a), Value::Number(b)) = (left, right) else {
            return Err(LoxError::runtime(operator.line, "Operands must be numbers."));
        };

        Ok(match &operator.token_type {
            TokenType::MINUS => Value::Number(a - b),
            TokenType::STAR => Value::Number(a * b),
            // IEEE semantics: x/0 is ±Infinity or NaN, not an error.
            TokenType::SLASH => Value::Number(a / b),
            TokenType::GREATER => Value::Bool(a > b),
            TokenType::GREATER_EQUAL => Value::Bool(a >= b),
            TokenType::LESS => Value::Bool(a < b),
            TokenType::LESS_EQUAL => Value::Bool(a <= b),
            _ => {
                return Err(LoxError::runtime(
                    operator.line,
                    format!("Invalid binary operator '{}'.", operator.lexeme),
                ))
            }
        })
    }

    fn evaluate_super(&mut self, id: ExprId, keyword: &Token, method: &Token) -> Result<Value> {
        let distance = self.local_depth(id).ok_or_else(|| {
            LoxError::runtime(keyword.line, "Can't use 'super' outside of a subclass.")
        })?;

        let superclass = match environment::get_at(&self.environment, distance, keyword)? {
            Value::Class(class) => class,
            other => {
                return Err(LoxError::runtime(
                    keyword.line,
                    format!("'super' is bound to a {}, not a class.", other.type_name()),
                ))
            }
        };

        // `this` always lives in the scope just inside the one holding `super`.
        let this = Token::synthetic("this", keyword.line);
        let Value::Instance(instance) =
            environment::get_at(&self.environment, distance.saturating_sub(1), &this)?
        else {
            return Err(LoxError::runtime(keyword.line, "'this' is not an instance."));
        };

        let function = superclass.find_method(&method.lexeme).ok_or_else(|| {
            LoxError::runtime(
                method.line,
                format!("Undefined property '{}'.", method.lexeme),
            )
        })?;

        Ok(Value::Callable(Callable::Function(Rc::new(
            function.bind(instance),
        ))))
    }

    fn look_up_variable(&self, name: &Token, id: ExprId) -> Result<Value> {
        let value = match self.local_depth(id) {
            Some(distance) => environment::get_at(&self.environment, distance, name)?,
            None => self.globals.borrow().get(name)?,
        };

        debug!("Variable '{}' evaluated to: {}", name.lexeme, value);
        Ok(value)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Calls
    // ─────────────────────────────────────────────────────────────────────────

    fn call(&mut self, callee: Value, arguments: Vec<Value>, paren: &Token) -> Result<Value> {
        let arity = match &callee {
            Value::Callable(callable) => callable.arity(),
            Value::Class(class) => class.arity(),
            _ => {
                return Err(LoxError::runtime(
                    paren.line,
                    "Can only call functions and classes.",
                ))
            }
        };

        if arguments.len() != arity {
            return Err(LoxError::runtime(
                paren.line,
                format!("Expected {} arguments but got {}.", arity, arguments.len()),
            ));
        }

        match callee {
            Value::Callable(Callable::Native(native)) => {
                debug!("Calling native function '{}'", native.name);
                (native.func)(&arguments)
            }

            Value::Callable(Callable::Function(function)) => {
                debug!("Calling user-defined function '{}'", function.name());
                function.call(self, arguments)
            }

            Value::Class(class) => {
                debug!("Instantiating class '{}'", class.name);
                let instance = Rc::new(LoxInstance::new(Rc::clone(&class)));

                if let Some(initializer) = class.find_method(INITIALIZER) {
                    initializer
                        .bind(Rc::clone(&instance))
                        .call(self, arguments)?;
                }

                Ok(Value::Instance(instance))
            }

            _ => Err(LoxError::runtime(
                paren.line,
                "Can only call functions and classes.",
            )),
        }
    }
}
