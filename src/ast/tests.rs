use std::rc::Rc;

use crate::{
    errors::errors::ErrorKind,
    Position, Span,
};

use super::{
    ast::{Function, Program, Variable, VariableName},
    dump::dump_program,
    scope::Scope,
    types::{BaseType, Type},
};

fn span(line: u32) -> Span {
    let position = Position(line, Rc::new("test.c".to_string()));
    Span {
        start: position.clone(),
        end: position,
    }
}

fn scalar(base: BaseType, name: &str, line: u32) -> Variable {
    Variable::new(base, VariableName::scalar(name, span(line)))
}

fn params(variables: Vec<Variable>) -> Scope {
    Scope::from_variables(variables).unwrap()
}

#[test]
fn test_type_display() {
    assert_eq!(Type::INT.to_string(), "int");
    assert_eq!(Type::array(BaseType::Char).to_string(), "char[]");
    assert_eq!(Type::FLOAT.tag(), 'f');
    assert!(Type::CHAR.is_numeric());
    assert!(!Type::VOID.is_numeric());
    assert!(!Type::array(BaseType::Int).is_numeric());
}

#[test]
fn test_storage_slots() {
    let char_array = Variable::new(
        BaseType::Char,
        VariableName::array("s", Some(20), span(1)),
    );
    let odd_chars = Variable::new(BaseType::Char, VariableName::array("t", Some(5), span(1)));
    let ints = Variable::new(BaseType::Int, VariableName::array("a", Some(5), span(1)));
    let param = Variable::new(BaseType::Float, VariableName::array("p", None, span(1)));

    assert_eq!(char_array.storage_slots(), 5);
    assert_eq!(odd_chars.storage_slots(), 2);
    assert_eq!(ints.storage_slots(), 5);
    assert_eq!(param.storage_slots(), 1);
    assert!(!param.has_array_storage());
    assert_eq!(scalar(BaseType::Int, "x", 1).storage_slots(), 1);
}

#[test]
fn test_declare_and_lookup_variable() {
    let mut scope = Scope::new();
    scope.declare_variable(scalar(BaseType::Int, "x", 1)).unwrap();
    scope.declare_variable(scalar(BaseType::Float, "y", 2)).unwrap();

    assert_eq!(scope.lookup_variable("y").unwrap().base_type, BaseType::Float);
    assert_eq!(scope.variable_index("y"), Some(1));
    assert!(scope.lookup_variable("z").is_none());
    assert!(scope.lookup_function("x").is_none());
}

#[test]
fn test_duplicate_variable() {
    let mut scope = Scope::new();
    scope.declare_variable(scalar(BaseType::Int, "x", 1)).unwrap();
    let error = scope
        .declare_variable(scalar(BaseType::Char, "x", 4))
        .unwrap_err();

    assert_eq!(error.kind(), ErrorKind::NameResolution);
    assert_eq!(error.get_position().line(), 4);
    assert_eq!(
        error.to_string(),
        "test.c:4: multiple definition of variable x; previously defined at test.c:1"
    );
}

#[test]
fn test_variable_conflicts_with_function() {
    let mut scope = Scope::new();
    scope
        .declare_function(Function::declaration(span(1), BaseType::Int, "f", Scope::new()))
        .unwrap();
    let error = scope
        .declare_variable(scalar(BaseType::Int, "f", 2))
        .unwrap_err();

    assert_eq!(error.message(), "f already defined as a function at test.c:1");
}

#[test]
fn test_function_conflicts_with_variable() {
    let mut scope = Scope::new();
    scope.declare_variable(scalar(BaseType::Int, "g", 1)).unwrap();
    let error = scope
        .declare_function(Function::declaration(span(3), BaseType::Int, "g", Scope::new()))
        .unwrap_err();

    assert_eq!(error.get_error_name(), "NameConflict");
    assert_eq!(error.message(), "g already defined as a variable at test.c:1");
}

#[test]
fn test_signature_parameter_count() {
    let mut scope = Scope::new();
    scope
        .declare_function(Function::declaration(
            span(1),
            BaseType::Int,
            "f",
            params(vec![scalar(BaseType::Int, "a", 1)]),
        ))
        .unwrap();
    let error = scope
        .declare_function(Function::declaration(span(2), BaseType::Int, "f", Scope::new()))
        .unwrap_err();

    assert_eq!(error.message(), "f already declared with 1 arguments at test.c:1");
}

#[test]
fn test_signature_array_parameter() {
    let mut scope = Scope::new();
    let array = Variable::new(BaseType::Int, VariableName::array("a", None, span(1)));
    scope
        .declare_function(Function::declaration(span(1), BaseType::Void, "f", params(vec![array])))
        .unwrap();
    let error = scope
        .declare_function(Function::declaration(
            span(2),
            BaseType::Void,
            "f",
            params(vec![scalar(BaseType::Int, "a", 2)]),
        ))
        .unwrap_err();

    assert_eq!(
        error.message(),
        "f declared with different type int[] for parameter 1 at test.c:1"
    );
}

#[test]
fn test_signature_return_type() {
    let mut scope = Scope::new();
    scope
        .declare_function(Function::declaration(span(1), BaseType::Int, "f", Scope::new()))
        .unwrap();
    let error = scope
        .declare_function(Function::declaration(span(2), BaseType::Char, "f", Scope::new()))
        .unwrap_err();

    assert_eq!(
        error.message(),
        "f was already declared with return type int at test.c:1"
    );
}

#[test]
fn test_definition_completes_prototype() {
    let mut scope = Scope::new();
    let first = scope
        .declare_function(Function::declaration(span(1), BaseType::Int, "f", Scope::new()))
        .unwrap();
    let definition = Function::definition(
        span(5),
        BaseType::Int,
        "f",
        Scope::new(),
        params(vec![scalar(BaseType::Int, "local", 6)]),
        vec![],
    )
    .unwrap();
    let second = scope.declare_function(definition).unwrap();

    assert_eq!(first, second);
    assert_eq!(scope.functions.len(), 1);
    let f = &scope.functions[0];
    assert!(f.defined);
    assert_eq!(f.span.start.line(), 5);
    assert_eq!(f.locals().len(), 1);
}

#[test]
fn test_repeated_prototype_is_not_duplicated() {
    let mut scope = Scope::new();
    for line in 1..4 {
        scope
            .declare_function(Function::declaration(span(line), BaseType::Void, "f", Scope::new()))
            .unwrap();
    }

    assert_eq!(scope.functions.len(), 1);
    assert_eq!(scope.functions[0].span.start.line(), 1);
}

#[test]
fn test_merged_leaves_first_scope_untouched() {
    let first = params(vec![scalar(BaseType::Int, "a", 1)]);
    let merged = Scope::merged(&first, params(vec![scalar(BaseType::Int, "b", 2)])).unwrap();

    assert_eq!(first.variables.len(), 1);
    assert_eq!(merged.variables.len(), 2);
    assert!(Scope::merged(&first, params(vec![scalar(BaseType::Int, "a", 3)])).is_err());
}

#[test]
fn test_program_registers_builtins() {
    let program = Program::new(span(1));

    assert_eq!(program.function(0).name, "getchar");
    assert_eq!(program.function(1).name, "putchar");
    assert!(program.function(1).builtin);
    assert_eq!(program.user_functions().count(), 0);
}

#[test]
fn test_dump_program() {
    let mut program = Program::new(span(1));
    program
        .push_globals(params(vec![Variable::new(
            BaseType::Char,
            VariableName::array("buf", Some(8), span(1)),
        )]))
        .unwrap();
    program
        .push_function(Function::declaration(span(2), BaseType::Void, "f", Scope::new()))
        .unwrap();

    let dump = dump_program(&program);

    assert!(dump.starts_with("<Program>\n<Scope>\n(variables)\n<Variable base_type=char>\n"));
    assert!(dump.contains("<VariableName name=\"buf\" is_array=1 array_size=8 />\n"));
    assert!(dump.contains("<Function name=f ret_type=void defined=0>\n"));
    assert!(!dump.contains("getchar"));
    assert!(dump.ends_with("</Scope>\n</Program>\n"));
}
