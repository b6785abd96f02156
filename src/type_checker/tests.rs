//! Unit tests for the type checker.

use std::rc::Rc;

use super::{
    annotations::{Annotations, VarRef},
    type_checker::type_check,
};
use crate::{
    ast::{
        ast::Program,
        expressions::ExprKind,
        statements::{walk_body, StmtKind},
        types::{BaseType, Type},
    },
    errors::errors::{Error, ErrorKind},
    lexer::lexer::tokenize,
    parser::parser::parse,
};

fn parse_source(source: &str) -> Program {
    let tokens = tokenize(source.to_string(), Some("test.c".to_string())).unwrap();
    parse(tokens, Rc::new("test.c".to_string())).unwrap()
}

fn check(source: &str) -> Result<Annotations, Error> {
    type_check(&parse_source(source), false)
}

fn check_err(source: &str) -> Error {
    check(source).err().unwrap()
}

#[test]
fn test_literal_types() {
    let program = parse_source("void f(void) { 1; 1.5; 'c'; \"s\"; }");
    let annotations = type_check(&program, false).unwrap();
    let (_, function) = program.user_functions().next().unwrap();

    let types: Vec<Type> = function
        .body
        .iter()
        .map(|stmt| match &stmt.kind {
            StmtKind::Expression(expr) => annotations.type_of(expr.id).unwrap(),
            _ => unreachable!(),
        })
        .collect();

    assert_eq!(
        types,
        vec![
            Type::INT,
            Type::FLOAT,
            Type::CHAR,
            Type::array(BaseType::Char)
        ]
    );
}

#[test]
fn test_resolution_prefers_function_scope() {
    let program = parse_source("int x; float y; int f(int x) { x; y; return x; }");
    let annotations = type_check(&program, false).unwrap();
    let (id, function) = program.user_functions().next().unwrap();

    let mut refs = vec![];
    walk_body(&function.body, &mut |expr| {
        if let ExprKind::Identifier(_) = expr.kind {
            refs.push(annotations.variable(expr.id).unwrap());
        }
    });

    assert_eq!(
        refs,
        vec![VarRef::Local(id, 0), VarRef::Global(1), VarRef::Local(id, 0)]
    );
}

#[test]
fn test_every_expression_is_typed() {
    let program = parse_source(
        "int a[4]; char s[8];
         int f(int n, float x) {
             int i;
             for (i = 0; i < n; i++) a[i] = i * 2;
             s[0] = (char) a[(int) x];
             return n > 0 ? a[1] : -n;
         }",
    );
    let annotations = type_check(&program, false).unwrap();
    let (_, function) = program.user_functions().next().unwrap();

    let mut count = 0;
    walk_body(&function.body, &mut |expr| {
        assert!(annotations.type_of(expr.id).is_some(), "untyped {:?}", expr);
        count += 1;
    });
    assert!(count > 10);
}

#[test]
fn test_check_is_idempotent() {
    let program = parse_source("int g; int f(int a) { g = a + 1; return g * 2 > a ? g : a; }");

    let first = type_check(&program, false).unwrap();
    let second = type_check(&program, true).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_comparison_and_not_yield_char() {
    let program = parse_source("void f(float a, float b) { a < b; !a; a && b; }");
    let annotations = type_check(&program, false).unwrap();
    let (_, function) = program.user_functions().next().unwrap();

    for stmt in &function.body {
        if let StmtKind::Expression(expr) = &stmt.kind {
            assert_eq!(annotations.type_of(expr.id), Some(Type::CHAR));
        }
    }
}

#[test]
fn test_address_and_index_types() {
    let program = parse_source("int x; float v[3]; void f(void) { &x; v[1]; v[1.5]; }");
    let annotations = type_check(&program, false).unwrap();
    let (_, function) = program.user_functions().next().unwrap();

    let types: Vec<Type> = function
        .body
        .iter()
        .filter_map(|stmt| match &stmt.kind {
            StmtKind::Expression(expr) => annotations.type_of(expr.id),
            _ => None,
        })
        .collect();

    assert_eq!(types, vec![Type::array(BaseType::Int), Type::FLOAT, Type::FLOAT]);
}

#[test]
fn test_call_records_target() {
    let program = parse_source("int g(int a); int f(void) { return g(1) + getchar(); }");
    let annotations = type_check(&program, false).unwrap();
    let (_, function) = program.user_functions().nth(1).unwrap();

    let mut targets = vec![];
    walk_body(&function.body, &mut |expr| {
        if let ExprKind::Call { .. } = expr.kind {
            targets.push(annotations.call_target(expr.id).unwrap());
        }
    });

    assert_eq!(targets, vec![2, 0]);
}

#[test]
fn test_unknown_variable() {
    let error = check_err("void f(void) {\n  missing = 1;\n}");

    assert_eq!(error.kind(), ErrorKind::NameResolution);
    assert_eq!(error.message(), "unknown variable name 'missing'");
    assert_eq!(error.get_position().line(), 2);
}

#[test]
fn test_unknown_function() {
    let error = check_err("void f(void) { g(); }");

    assert_eq!(error.message(), "unknown function name 'g'");
}

#[test]
fn test_arity_mismatch() {
    let error = check_err("int g(int a, int b); void f(void) { g(1, 2, 3); }");

    assert_eq!(error.kind(), ErrorKind::Arity);
    assert_eq!(
        error.message(),
        "incorrect number of arguments to 'g'; expected 2, got 3"
    );
}

#[test]
fn test_argument_type_mismatch() {
    let error = check_err("int g(int a, char s[]); void f(void) { g(1, 'c'); }");

    assert_eq!(error.kind(), ErrorKind::Type);
    assert_eq!(
        error.message(),
        "argument 2 to 'g' has type char; expected char[]"
    );
}

#[test]
fn test_assignment_type_mismatch() {
    let error = check_err("float y; void f(void) { y = \"str\"; }");

    assert_eq!(error.get_error_name(), "TypeMismatch");
    assert_eq!(error.message(), "cannot assign char[] to float lvalue");
}

#[test]
fn test_array_assignment_rejected() {
    let error = check_err("char s[4]; void f(void) { s = \"abc\"; }");

    assert_eq!(error.message(), "cannot assign to lvalue of type char[]");
}

#[test]
fn test_not_indexable_and_index_type() {
    assert_eq!(
        check_err("int x; void f(void) { x[0]; }").message(),
        "'x' is not an array"
    );
    assert_eq!(
        check_err("int a[2]; void f(void) { a['c']; }").message(),
        "invalid array index type char"
    );
    // element stores need an int index
    assert_eq!(
        check_err("int a[2]; void f(void) { a[1.0] = 1; }").message(),
        "invalid array index type float"
    );
}

#[test]
fn test_cannot_address_array() {
    let error = check_err("int a[2]; void f(void) { &a; }");

    assert_eq!(error.message(), "cannot take the address of array 'a'");
}

#[test]
fn test_operand_errors() {
    assert_eq!(
        check_err("void f(int a, float b) { a + b; }").message(),
        "mismatched operand types int and float for '+'"
    );
    assert_eq!(
        check_err("void f(float a) { ~a; }").message(),
        "invalid operand type float for bitwise operator '~'"
    );
    assert_eq!(
        check_err("void f(float a, float b) { a % b; }").message(),
        "invalid operand type float for bitwise operator '%'"
    );
    assert_eq!(
        check_err("void f(int a[]) { -a; }").message(),
        "invalid operand type int[] for '-'"
    );
    assert_eq!(
        check_err("void f(char s[]) { s++; }").message(),
        "invalid operand type char[] for '++'"
    );
}

#[test]
fn test_condition_and_branch_errors() {
    assert_eq!(
        check_err("void f(int a[]) { if (a) return; }").message(),
        "invalid condition type int[]"
    );
    assert_eq!(
        check_err("void f(int a[]) { while (a) { } }").message(),
        "invalid condition type int[]"
    );
    assert_eq!(
        check_err("void f(int a) { a ? 1 : 2.0; }").message(),
        "mismatched branch types int and float"
    );
}

#[test]
fn test_cast_rules() {
    assert!(check("void f(char c, float x) { (float) c; (char) x; (int) c; }").is_ok());
    assert_eq!(
        check_err("void f(int a[]) { (int) a; }").message(),
        "cannot cast int[] to int"
    );
    assert_eq!(
        check_err("void f(int a) { (void) a; }").message(),
        "cannot cast int to void"
    );
}

#[test]
fn test_return_rules() {
    assert_eq!(
        check_err("void f(void) { return 1; }").message(),
        "cannot return a value from void function 'f'"
    );
    assert_eq!(
        check_err("int f(void) { return; }").message(),
        "function 'f' must return a value of type int"
    );
    assert_eq!(
        check_err("int f(void) { return 'c'; }").message(),
        "cannot return char from function 'f' returning int"
    );
}

#[test]
fn test_first_error_wins() {
    let error = check_err("void f(void) {\n  a = 1;\n  b = 2;\n}");

    assert_eq!(error.message(), "unknown variable name 'a'");
}

#[test]
fn test_prototypes_are_not_checked() {
    assert!(check("int f(int a); int g(void) { return f(1); }").is_ok());
}
