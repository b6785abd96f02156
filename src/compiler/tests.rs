use std::rc::Rc;

use super::{
    compiler::{format_build_stamp, CodeBuffer, CompileOptions, Compiler},
    storage::{reserve, ConstantPool, Location},
};
use crate::{
    ast::ast::Program,
    compile_source,
    errors::errors::{Error, ErrorKind},
    lexer::lexer::tokenize,
    parser::parser::parse,
};

fn options() -> CompileOptions {
    CompileOptions {
        verbose: false,
        build_stamp: String::from("test"),
    }
}

fn parse_source(source: &str) -> Program {
    let tokens = tokenize(source.to_string(), Some("test.c".to_string())).unwrap();
    parse(tokens, Rc::new("test.c".to_string())).unwrap()
}

fn compile(source: &str) -> String {
    compile_source(source, "test.c", options()).unwrap()
}

fn compile_err(source: &str) -> Error {
    compile_source(source, "test.c", options()).unwrap_err()
}

/// Instruction lines of the named function, without indentation.
fn body(ir: &str, name: &str) -> Vec<String> {
    let mut lines = ir.lines().skip_while(|line| {
        !(line.starts_with(".FUNC ") && line.ends_with(&format!(" {}", name)))
    });
    lines.next();
    lines
        .skip_while(|line| line.starts_with("  ."))
        .take_while(|line| *line != ".end FUNC")
        .map(|line| line.trim().to_string())
        .collect()
}

#[test]
fn test_simple_function() {
    let ir = compile("int x;\nint f(int a) { return a + x; }\n");

    assert_eq!(
        ir,
        "; compiler build test\n\
         .CONSTANTS 0\n\
         \n\
         .GLOBALS 1\n\
         \n\
         .FUNCTIONS 1\n\
         \n\
         .FUNC 2 f\n\
         \x20 .params 1\n\
         \x20 .return 1\n\
         \x20 .locals 0\n\
         \x20   push L0\n\
         \x20   push G0\n\
         \x20   addi\n\
         \x20   ret\n\
         .end FUNC\n\
         \n"
    );
}

#[test]
fn test_local_slots() {
    let program = parse_source("void f(int p) { char s[20]; int a[5]; float y; }");
    let storage = reserve(&program);
    let (id, _) = program.user_functions().next().unwrap();
    let frame = storage.frame(id).unwrap();

    assert_eq!(
        frame.locations,
        vec![
            Location::Local(0),
            Location::Local(1),
            Location::Local(6),
            Location::Local(11)
        ]
    );
    assert_eq!(frame.param_slots, 1);
    assert_eq!(frame.local_slots, 11);

    let ir = compile("void f(int p) { char s[20]; int a[5]; float y; }");
    assert!(ir.contains("  .params 1\n  .return 0\n  .locals 11\n"));
    assert_eq!(body(&ir, "f"), vec!["ret"]);
}

#[test]
fn test_global_slots() {
    let program = parse_source("int g; char buf[10]; float h;");
    let storage = reserve(&program);

    assert_eq!(
        storage.globals,
        vec![Location::Global(0), Location::Global(1), Location::Global(4)]
    );
    assert_eq!(storage.global_slots, 5);
}

#[test]
fn test_function_numbering() {
    let ir = compile("int g(int a); void h(void) { g(1); } int g(int a) { return a; }");

    assert!(ir.contains(".FUNCTIONS 2\n"));
    let g = ir.find(".FUNC 2 g").unwrap();
    let h = ir.find(".FUNC 3 h").unwrap();
    assert!(g < h);
    assert_eq!(body(&ir, "h"), vec!["push C0", "call 2", "drop", "ret"]);
}

#[test]
fn test_builtin_numbers() {
    let program = parse_source("void f(void) { }");
    let storage = reserve(&program);

    assert_eq!(storage.function_number(0), Some(0));
    assert_eq!(storage.function_number(1), Some(1));
    assert_eq!(storage.function_number(2), Some(2));
}

#[test]
fn test_constant_pool_packing() {
    let mut pool = ConstantPool::new();

    assert_eq!(pool.push_word(7), Location::Constant(0));
    assert_eq!(pool.push_string(b"hello"), Location::Constant(1));
    assert_eq!(pool.push_string(b""), Location::Constant(3));
    assert_eq!(pool.words(), &[7, 0x6c6c6568, 0x0000006f, 0]);
}

#[test]
fn test_non_ascii_literals() {
    // "€€" is six UTF-8 bytes, so two words
    let ir = compile("void show(char s[]) { } void f(void) { show(\"€€\"); putchar('\\xff'); }");

    assert!(ir.contains(".CONSTANTS 3\n  0xe2ac82e2\n  0x0000ac82\n  0x000000ff\n"));
    assert_eq!(
        body(&ir, "f"),
        vec!["ptrto C0", "call 2", "push C2", "call 1", "ret"]
    );

    let error = compile_err("void f(void) { putchar('€'); }");
    assert_eq!(error.kind(), ErrorKind::Syntax);
    assert_eq!(error.get_error_name(), "UnexpectedTokenDetailed");
}

#[test]
fn test_int_min_literal() {
    let ir = compile("int f(void) { return -2147483648; }");

    assert!(ir.contains(".CONSTANTS 1\n  0x80000000\n"));
    assert_eq!(body(&ir, "f"), vec!["push C0", "ret"]);

    let ir = compile("int f(void) { return -7; }");
    assert_eq!(body(&ir, "f"), vec!["push C0", "negi", "ret"]);

    let error = compile_err("int f(void) { return 2147483648; }");
    assert_eq!(error.get_error_name(), "NumberParseError");
}

#[test]
fn test_literal_constants() {
    let ir = compile("float f(void) { 'A'; 42; return 1.5; }");

    assert!(ir.contains(".CONSTANTS 3\n  0x00000041\n  0x0000002a\n  0x3fc00000\n"));
    assert_eq!(body(&ir, "f"), vec!["push C2", "ret"]);
}

#[test]
fn test_for_loop_labels() {
    let ir = compile("int f(int n) { int i; for (i = 0; i < n; i++) continue; return i; }");

    assert_eq!(
        body(&ir, "f"),
        vec![
            "push C0",
            "pop L1",
            "_L0: push L1",
            "push L0",
            "jlti _L3",
            "push 0",
            "goto _L4",
            "_L3: push 1",
            "_L4: jzc _L2",
            "goto _L1",
            "_L1: push L1",
            "inci",
            "pop L1",
            "goto _L0",
            "_L2: push L1",
            "ret",
        ]
    );
}

#[test]
fn test_while_break() {
    let ir = compile("void f(void) { while (1) { break; } }");

    assert_eq!(
        body(&ir, "f"),
        vec!["_L0: push C0", "jzi _L1", "goto _L1", "goto _L0", "_L1: ret"]
    );
}

#[test]
fn test_do_while_continue() {
    let ir = compile("void f(int a) { do { a--; continue; } while (a); }");

    assert_eq!(
        body(&ir, "f"),
        vec![
            "_L0: push L0",
            "deci",
            "pop L0",
            "goto _L1",
            "_L1: push L0",
            "jzi _L2",
            "goto _L0",
            "_L2: ret",
        ]
    );
}

#[test]
fn test_nested_loop_labels() {
    let ir = compile(
        "void f(int n) {
             int i; int j;
             for (i = 0; i < n; i++) {
                 j = i;
                 while (j) { if (j) break; continue; }
                 if (i) continue;
                 break;
             }
         }",
    );

    assert_eq!(
        body(&ir, "f"),
        vec![
            "push C0",
            "pop L1",
            "_L0: push L1",
            "push L0",
            "jlti _L3",
            "push 0",
            "goto _L4",
            "_L3: push 1",
            "_L4: jzc _L2",
            "push L1",
            "pop L2",
            // inner while: continue _L5, break _L6
            "_L5: push L2",
            "jzi _L6",
            "push L2",
            "jzi _L7",
            "goto _L6",
            "_L7: goto _L5",
            "goto _L5",
            // back in the for: continue _L1, break _L2
            "_L6: push L1",
            "jzi _L8",
            "goto _L1",
            "_L8: goto _L2",
            "_L1: push L1",
            "inci",
            "pop L1",
            "goto _L0",
            "_L2: ret",
        ]
    );
}

#[test]
fn test_assignments() {
    let ir = compile("int g; int a[4]; void f(int i) { g = i; g += 2; a[i] = g; a[i] += 1; }");

    assert!(ir.contains(".GLOBALS 5\n"));
    assert_eq!(
        body(&ir, "f"),
        vec![
            "push L0", "pop G0", // g = i
            "push G0", "push C0", "addi", "pop G0", // g += 2
            "push G0", "push L0", "ptrto G1", "apopi", // a[i] = g
            "push L0", "ptrto G1", "apushi", "push C1", "addi", "push L0", "ptrto G1",
            "apopi", // a[i] += 1
            "ret",
        ]
    );
}

#[test]
fn test_kept_values() {
    let ir = compile("int f(int x) { int y; y = x++; return ++y; }");

    assert_eq!(
        body(&ir, "f"),
        vec![
            "push L0", "copy", "inci", "pop L0", "pop L1", "push L1", "inci", "copy", "pop L1",
            "ret",
        ]
    );
}

#[test]
fn test_arrays_strings_and_calls() {
    let ir = compile(
        "void show(char s[]) { putchar(s[0]); }
         void f(void) { char t[8]; show(t); show(\"hi\"); getchar(); }",
    );

    assert!(ir.contains(".CONSTANTS 2\n  0x00000000\n  0x00006968\n"));
    assert_eq!(
        body(&ir, "show"),
        vec!["push C0", "push L0", "apushc", "call 1", "ret"]
    );
    assert!(ir.contains(".FUNC 3 f\n  .params 0\n  .return 0\n  .locals 2\n"));
    assert_eq!(
        body(&ir, "f"),
        vec!["ptrto L0", "call 2", "ptrto C1", "call 2", "call 0", "drop", "ret"]
    );
}

#[test]
fn test_float_index_and_address() {
    let ir = compile("int a[3]; int x; void f(float i) { a[i]; &x; x = a[i]; }");

    assert_eq!(
        body(&ir, "f"),
        vec!["push L0", "ftoi", "ptrto G0", "apushi", "pop G3", "ret"]
    );
}

#[test]
fn test_if_else_and_cast() {
    let ir = compile("float f(int a) { if (a) return (float) a; else return -1.0; }");

    assert_eq!(
        body(&ir, "f"),
        vec![
            "push L0",
            "jzi _L0",
            "push L0",
            "itof",
            "ret",
            "goto _L1",
            "_L0: push C0",
            "negf",
            "ret",
            "_L1: push 0",
            "ret",
        ]
    );
}

#[test]
fn test_ternary() {
    let ir = compile("int f(int a) { return a > 0 ? a : -a; }");

    assert_eq!(
        body(&ir, "f"),
        vec![
            "push L0",
            "push C0",
            "jgti _L2",
            "push 0",
            "goto _L3",
            "_L2: push 1",
            "_L3: jzc _L0",
            "push L0",
            "goto _L1",
            "_L0: push L0",
            "negi",
            "_L1: ret",
        ]
    );
}

#[test]
fn test_logical_not() {
    let ir = compile("char f(int a) { return !a; }");

    assert_eq!(
        body(&ir, "f"),
        vec!["push L0", "jzi _L0", "push 0", "goto _L1", "_L0: push 1", "_L1: ret"]
    );
}

#[test]
fn test_consecutive_labels_get_nop() {
    let ir = compile("void f(int a) { if (a) { if (a) a = 1; } }");

    assert_eq!(
        body(&ir, "f"),
        vec![
            "push L0", "jzi _L0", "push L0", "jzi _L1", "push C0", "pop L0", "_L1: nop",
            "_L0: ret",
        ]
    );
}

#[test]
fn test_logical_operators_not_implemented() {
    let error = compile_err("int f(int a, int b) { return a && b; }");

    assert_eq!(error.kind(), ErrorKind::Codegen);
    assert_eq!(error.get_error_name(), "NotImplemented");
    assert_eq!(error.message(), "operator '&&' is not implemented");
}

#[test]
fn test_break_outside_loop() {
    let error = compile_err("void f(void) { break; }");

    assert_eq!(error.message(), "'break' outside of a loop");
}

#[test]
fn test_undefined_function() {
    let error = compile_err("int g(int a); int f(void) { return g(1); }");

    assert_eq!(error.kind(), ErrorKind::Codegen);
    assert_eq!(error.message(), "function 'g' declared but never defined");
}

#[test]
fn test_generate_ir_runs_type_checker() {
    let mut compiler = Compiler::new(parse_source("int f(void) { return 1; }"), options());

    assert!(compiler.annotations().is_none());
    let ir = compiler.generate_ir().unwrap();
    assert!(compiler.annotations().is_some());
    assert!(ir.starts_with("; compiler build test\n.CONSTANTS 1\n  0x00000001\n"));
}

#[test]
fn test_code_buffer_labels() {
    let mut code = CodeBuffer::new();
    let first = code.new_label();
    let second = code.new_label();

    code.place_label(first);
    code.place_label(second);
    code.emit("ret");

    assert_eq!(code.lines(), &["    _L0: nop", "    _L1: ret"]);
    assert!(code.ends_with_ret());
    assert!(!code.has_pending_label());
}

#[test]
fn test_build_stamp() {
    assert_eq!(format_build_stamp(0), "1970-01-01 00:00:00");
    assert_eq!(format_build_stamp(951_782_400), "2000-02-29 00:00:00");
    assert_eq!(format_build_stamp(1_792_415_109), "2026-10-19 13:05:09");
}
