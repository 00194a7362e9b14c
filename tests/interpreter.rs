mod common;

use pretty_assertions::assert_eq;
use rstest::rstest;

use rox::{Diagnostics, RunStatus};

use common::{run, session};

#[rstest]
#[case("print (1 + 2) * 3;", &["9"])]
#[case("print 7 / 2;", &["3.5"])]
#[case("print -4 - -6;", &["2"])]
#[case("print \"foo\" + \"bar\";", &["foobar"])]
#[case("print nil == nil;", &["true"])]
#[case("print 0 == false;", &["false"])]
#[case("print \"foo\" == \"foo\";", &["true"])]
#[case("print \"foo\" == \"bar\";", &["false"])]
#[case("print 1 != \"1\";", &["true"])]
#[case("print 3 >= 3; print 2 < 1;", &["true", "false"])]
#[case("print !nil; print !0; print !\"\";", &["true", "false", "false"])]
#[case("print 1 / 0; print -1 / 0;", &["Infinity", "-Infinity"])]
#[case("print nil or \"right\"; print 0 or \"right\";", &["right", "0"])]
#[case("print false and boom; print 1 and 2;", &["false", "2"])]
#[case("var a; print a;", &["nil"])]
#[case("var a = 1; a = a + 1; print a;", &["2"])]
#[case("if (0) print \"zero is truthy\"; else print \"no\";", &["zero is truthy"])]
#[case("if (nil) print 1; else print 2;", &["2"])]
#[case("var i = 0; while (i < 3) { print i; i = i + 1; }", &["0", "1", "2"])]
#[case("for (var i = 0; i < 3; i = i + 1) print i;", &["0", "1", "2"])]
#[case(
    "var n = 0/0; print n == n; print n != n; print 0 == -0; print 0 == 0;",
    &["true", "false", "false", "true"]
)]
#[case(
    "print 1000000 * 1000000 * 1000000000; print 1 / 10000000; print 10000000; print -10000000;",
    &["1.0E21", "1.0E-7", "1.0E7", "-1.0E7"]
)]
#[case(
    "print 1234567; print 0.001; print 1.5 * 100000000; print 0.25;",
    &["1234567", "0.001", "1.5E8", "0.25"]
)]
fn expressions_and_statements(#[case] source: &str, #[case] expected: &[&str]) {
    let outcome = run(source);
    assert_eq!(outcome.errors(), Vec::<String>::new());
    assert_eq!(outcome.stdout, expected);
}

#[rstest]
#[case(
    r#"
        fun makeCounter() {
            var count = 0;
            fun increment() {
                count = count + 1;
                return count;
            }
            return increment;
        }

        var counter = makeCounter();
        print counter();
        print counter();
        print counter();
    "#,
    &["1", "2", "3"],
)]
#[case(
    r#"
        var a = "global";
        {
            fun show() { print a; }
            show();
            var a = "block";
            show();
        }
    "#,
    &["global", "global"],
)]
#[case(
    r#"
        var x = "outer";
        {
            var x = "inner";
            x = "inner changed";
            print x;
        }
        print x;
        {
            x = "outer changed";
        }
        print x;
    "#,
    &["inner changed", "outer", "outer changed"],
)]
#[case(
    r#"
        fun fib(n) {
            if (n < 2) return n;
            return fib(n - 1) + fib(n - 2);
        }
        print fib(15);
    "#,
    &["610"],
)]
#[case(
    r#"
        fun early() {
            while (true) {
                {
                    return "out";
                }
            }
        }
        print early();
    "#,
    &["out"],
)]
#[case(
    r#"
        fun noReturn() {}
        print noReturn();
        print noReturn;
        print clock;
    "#,
    &["nil", "<fn noReturn>", "<native fn clock>"],
)]
#[case(
    r#"
        var get;
        var set;
        {
            var shared = 1;
            fun g() { return shared; }
            fun s(v) { shared = v; }
            get = g;
            set = s;
        }
        set(42);
        print get();
    "#,
    &["42"],
)]
fn functions_and_closures(#[case] source: &str, #[case] expected: &[&str]) {
    let outcome = run(source);
    assert_eq!(outcome.errors(), Vec::<String>::new());
    assert_eq!(outcome.stdout, expected);
}

#[rstest]
#[case(
    r#"
        class Point {
            init(x, y) {
                this.x = x;
                this.y = y;
            }
            sum() { return this.x + this.y; }
        }
        var p = Point(1, 2);
        print p.sum();
        print p;
        print Point;
    "#,
    &["3", "Point instance", "Point"],
)]
#[case(
    r#"
        class A {
            method() { return "A method"; }
        }
        class B < A {}
        print B().method();
    "#,
    &["A method"],
)]
#[case(
    r#"
        class A {
            init(name) { this.name = name; }
        }
        class B < A {}
        print B("inherited").name;
    "#,
    &["inherited"],
)]
#[case(
    r#"
        class A {
            say() { return "A"; }
        }
        class B < A {
            say() { return "B then " + super.say(); }
        }
        class C < B {}
        print C().say();
    "#,
    &["B then A"],
)]
#[case(
    r#"
        class Box {
            value() { return "method"; }
        }
        var b = Box();
        b.value = "field";
        print b.value;
    "#,
    &["field"],
)]
#[case(
    r#"
        class Person {
            init(name) { this.name = name; }
            greet() { return "hi " + this.name; }
        }
        var alice = Person("alice");
        var bob = Person("bob");
        bob.greet = alice.greet;
        print bob.greet();
    "#,
    &["hi alice"],
)]
#[case(
    r#"
        class Foo {
            init() {
                this.count = 0;
                return;
            }
        }
        var foo = Foo();
        print foo.init() == foo;
    "#,
    &["true"],
)]
#[case(
    r#"
        class Node {
            link(other) { this.next = other; return this; }
        }
        var a = Node();
        var b = Node();
        print a.link(b).next == b;
        print a == b;
    "#,
    &["true", "false"],
)]
fn classes_and_instances(#[case] source: &str, #[case] expected: &[&str]) {
    let outcome = run(source);
    assert_eq!(outcome.errors(), Vec::<String>::new());
    assert_eq!(outcome.stdout, expected);
}

#[rstest]
#[case("print 1 + \"a\";", "Operands must be two numbers or two strings.\n[line 1]")]
#[case("print -\"a\";", "Operand must be a number.\n[line 1]")]
#[case("print 1 < \"2\";", "Operands must be numbers.\n[line 1]")]
#[case("print missing;", "Undefined variable 'missing'.\n[line 1]")]
#[case("missing = 1;", "Undefined variable 'missing'.\n[line 1]")]
#[case("\"text\"();", "Can only call functions and classes.\n[line 1]")]
#[case(
    "fun f(a, b) {}\nf(1);",
    "Expected 2 arguments but got 1.\n[line 2]"
)]
#[case(
    "class A { init(x) {} }\nA();",
    "Expected 1 arguments but got 0.\n[line 2]"
)]
#[case("class A {}\nprint A().nope;", "Undefined property 'nope'.\n[line 2]")]
#[case("var n = 1; print n.field;", "Only instances have properties.\n[line 1]")]
#[case("var n = 1; n.field = 2;", "Only instances have fields.\n[line 1]")]
#[case("var NotAClass = 1;\nclass B < NotAClass {}", "Superclass must be a class.\n[line 2]")]
fn runtime_errors(#[case] source: &str, #[case] expected: &str) {
    let outcome = run(source);
    assert_eq!(outcome.status, RunStatus::RuntimeError);
    assert_eq!(outcome.errors(), [expected]);
}

#[test]
fn runtime_error_aborts_the_rest_of_the_program() {
    let outcome = run("print 1; print nope; print 2;");

    assert_eq!(outcome.status, RunStatus::RuntimeError);
    assert_eq!(outcome.stdout, ["1"]);
}

#[test]
fn static_error_prevents_execution() {
    let outcome = run("print 1; { var a = 1; var a = 2; }");

    assert_eq!(outcome.status, RunStatus::StaticError);
    assert!(outcome.stdout.is_empty());
}

#[test]
fn session_survives_runtime_errors() {
    let (mut lox, capture) = session();
    let mut diagnostics = Diagnostics::new();

    assert_eq!(lox.run("var kept = \"still here\";", &mut diagnostics), RunStatus::Ok);

    // an error deep inside a call must not leave the call frame installed
    let failing = "fun inner() { var local = 1; return local + nil; } { var block = 1; inner(); }";
    assert_eq!(lox.run(failing, &mut diagnostics), RunStatus::RuntimeError);
    diagnostics.reset();

    assert_eq!(lox.run("print 1 + \"a\";", &mut diagnostics), RunStatus::RuntimeError);
    diagnostics.reset();

    assert_eq!(lox.run("print undefinedThing;", &mut diagnostics), RunStatus::RuntimeError);
    diagnostics.reset();

    assert_eq!(lox.run("var fresh = 2; print kept; print fresh;", &mut diagnostics), RunStatus::Ok);
    assert_eq!(capture.lines(), ["still here", "2"]);
}

#[test]
fn status_reflects_only_the_current_run() {
    let (mut lox, capture) = session();
    let mut diagnostics = Diagnostics::new();

    assert_eq!(lox.run("print nope;", &mut diagnostics), RunStatus::RuntimeError);
    assert_eq!(lox.run("print 1;", &mut diagnostics), RunStatus::Ok);
    assert_eq!(lox.run("var = 1;", &mut diagnostics), RunStatus::StaticError);
    assert_eq!(lox.run("print 2;", &mut diagnostics), RunStatus::Ok);

    // nothing was reset, so both failures are still on record
    assert_eq!(diagnostics.errors().len(), 2);
    assert!(diagnostics.had_error());
    assert!(diagnostics.had_runtime_error());
    assert_eq!(capture.lines(), ["1", "2"]);
}

#[test]
fn runtime_error_exposes_message_and_line() {
    let outcome = run("var a = 1;\n\nprint a + nil;");

    let [error] = outcome.diagnostics.errors() else {
        panic!("expected one error, got {:?}", outcome.errors());
    };
    assert_eq!(error.message(), "Operands must be two numbers or two strings.");
    assert_eq!(error.line(), Some(3));
}

#[test]
fn closures_from_earlier_runs_keep_working() {
    let (mut lox, capture) = session();
    let mut diagnostics = Diagnostics::new();

    let define = "fun make() { var n = 0; fun inc() { n = n + 1; return n; } return inc; } var c = make();";
    assert_eq!(lox.run(define, &mut diagnostics), RunStatus::Ok);

    for _ in 0..3 {
        assert_eq!(lox.run("{ var shadow = 0; print c(); }", &mut diagnostics), RunStatus::Ok);
    }

    assert_eq!(capture.lines(), ["1", "2", "3"]);
}

#[test]
fn clock_returns_seconds_since_epoch() {
    let outcome = run("print clock() > 1600000000;");
    assert_eq!(outcome.stdout, ["true"]);
}
