use pretty_assertions::assert_eq;
use rstest::rstest;

use rox::error::Diagnostics;
use rox::expr::{Expr, ExprKind};
use rox::parser::Parser;
use rox::resolver::Resolver;
use rox::scanner::scan;
use rox::stmt::Stmt;
use rox::Interpreter;

fn resolve(source: &str) -> (Vec<Stmt>, Interpreter, Diagnostics) {
    let mut diagnostics = Diagnostics::new();
    let tokens = scan(source, &mut diagnostics);
    let statements = Parser::new(&tokens).parse(&mut diagnostics);
    assert!(!diagnostics.had_error(), "unexpected syntax errors");

    let mut interpreter = Interpreter::with_output(Box::new(std::io::sink()));
    Resolver::new(&mut interpreter).resolve(&statements, &mut diagnostics);

    (statements, interpreter, diagnostics)
}

fn rendered_errors(diagnostics: &Diagnostics) -> Vec<String> {
    diagnostics.errors().iter().map(|e| e.to_string()).collect()
}

/// The expression of the `print` statements in `statements`, depth first.
fn printed<'a>(statements: &'a [Stmt], out: &mut Vec<&'a Expr>) {
    for stmt in statements {
        match stmt {
            Stmt::Print(expr) => out.push(expr),
            Stmt::Block(inner) => printed(inner, out),
            Stmt::Function(decl) => printed(&decl.body, out),
            _ => {}
        }
    }
}

#[test]
fn distances_follow_nesting_depth() {
    let source = "
        var g = 0;
        {
            var a = 1;
            {
                var a = 2;
                print a;
                {
                    print a;
                }
            }
            print a;
            print g;
        }
    ";
    let (statements, interpreter, diagnostics) = resolve(source);
    assert!(!diagnostics.had_error());

    let mut exprs = Vec::new();
    printed(&statements, &mut exprs);

    let depths: Vec<Option<usize>> = exprs
        .iter()
        .map(|e| interpreter.local_depth(e.id))
        .collect();

    // inner a, inner a one block deeper, outer a, global g
    assert_eq!(depths, [Some(0), Some(1), Some(0), None]);
}

#[test]
fn parameters_live_in_the_function_scope() {
    let (statements, interpreter, _) = resolve("fun f(x) { { print x; } }");

    let mut exprs = Vec::new();
    printed(&statements, &mut exprs);

    assert!(matches!(exprs[0].kind, ExprKind::Variable(_)));
    assert_eq!(interpreter.local_depth(exprs[0].id), Some(1));
}

#[test]
fn forward_reference_to_global_is_not_a_static_error() {
    let (_, _, diagnostics) = resolve("fun f() { return later; } var later = 1;");
    assert!(!diagnostics.had_error());
}

#[test]
fn redeclaration_is_reported_and_resolution_continues() {
    let source = "
        {
            var a = 1;
            var a = 2;
            print b;
            var b = b;
        }
    ";
    let (_, _, diagnostics) = resolve(source);

    assert_eq!(
        rendered_errors(&diagnostics),
        [
            "[line 4] Error at 'a': Already a variable with this name in this scope.",
            "[line 6] Error at 'b': Can't read local variable in its own initializer.",
        ]
    );
}

#[test]
fn globals_may_be_redeclared() {
    let (_, _, diagnostics) = resolve("var a = 1; var a = 2;");
    assert!(!diagnostics.had_error());
}

#[rstest]
#[case("return 1;", "[line 1] Error at 'return': Can't return from top-level code.")]
#[case("print this;", "[line 1] Error at 'this': Can't use 'this' outside of a class.")]
#[case(
    "fun f() { print this; }",
    "[line 1] Error at 'this': Can't use 'this' outside of a class."
)]
#[case(
    "class A { init() { return 1; } }",
    "[line 1] Error at 'return': Can't return a value from an initializer."
)]
#[case(
    "print super.x;",
    "[line 1] Error at 'super': Can't use 'super' outside of a class."
)]
#[case(
    "class A { f() { return super.f(); } }",
    "[line 1] Error at 'super': Can't use 'super' in a class with no superclass."
)]
#[case("class A < A {}", "[line 1] Error at 'A': A class can't inherit from itself.")]
fn static_errors(#[case] source: &str, #[case] expected: &str) {
    let (_, _, diagnostics) = resolve(source);
    assert_eq!(rendered_errors(&diagnostics), [expected]);
}

#[test]
fn bare_return_in_initializer_is_allowed() {
    let (_, _, diagnostics) = resolve("class A { init() { return; } }");
    assert!(!diagnostics.had_error());
}

#[test]
fn all_errors_in_one_pass_are_collected() {
    let (_, _, diagnostics) = resolve("return 1; print this; { var x = 1; var x = 2; }");
    assert_eq!(diagnostics.errors().len(), 3);
}
