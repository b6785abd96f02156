use std::time::{SystemTime, UNIX_EPOCH};

use log::{debug, info};

use crate::{
    ast::{
        ast::{Function, FunctionId, Program, Variable},
        expressions::ExprId,
        types::{BaseType, Type},
    },
    errors::errors::{Error, ErrorImpl},
    type_checker::{
        annotations::{Annotations, VarRef},
        type_checker::type_check,
    },
    Position,
};

use super::{
    stmt::gen_statement,
    storage::{reserve, Location, Storage},
};

/// Library configuration for one compilation.
#[derive(Debug, Clone, PartialEq)]
pub struct CompileOptions {
    /// Log every type the checker assigns at info level.
    pub verbose: bool,
    /// Printed in the first line of the IR.
    pub build_stamp: String,
}

impl Default for CompileOptions {
    fn default() -> Self {
        CompileOptions {
            verbose: false,
            build_stamp: current_build_stamp(),
        }
    }
}

/// The current UTC time as `YYYY-MM-DD HH:MM:SS`.
pub fn current_build_stamp() -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    format_build_stamp(secs)
}

/// Formats seconds since the Unix epoch as a UTC `YYYY-MM-DD HH:MM:SS` stamp.
pub fn format_build_stamp(secs: u64) -> String {
    let days = (secs / 86_400) as i64;
    let rem = secs % 86_400;

    // days-from-civil inverse, proleptic Gregorian calendar
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1_460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = yoe + era * 400 + if month <= 2 { 1 } else { 0 };

    format!(
        "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
        year,
        month,
        day,
        rem / 3_600,
        rem % 3_600 / 60,
        rem % 60
    )
}

/// The compilation pipeline for one program.
///
/// Owns the tree and the results of each pass.
pub struct Compiler {
    pub program: Program,
    pub options: CompileOptions,
    annotations: Option<Annotations>,
}

impl Compiler {
    pub fn new(program: Program, options: CompileOptions) -> Self {
        Compiler {
            program,
            options,
            annotations: None,
        }
    }

    /// Runs the type checker and keeps its annotations.
    ///
    /// # Arguments
    ///
    /// * `verbose` - Log every assigned type at info level
    pub fn check_types(&mut self, verbose: bool) -> Result<(), Error> {
        let annotations = type_check(&self.program, verbose)?;
        info!(
            "type checking succeeded ({} typed expressions)",
            annotations.len()
        );
        self.annotations = Some(annotations);
        Ok(())
    }

    pub fn annotations(&self) -> Option<&Annotations> {
        self.annotations.as_ref()
    }

    /// Allocates storage and emits the IR text.
    ///
    /// Type checks first when `check_types` has not run.
    ///
    /// # Returns
    ///
    /// The complete IR, or the first error found
    pub fn generate_ir(&mut self) -> Result<String, Error> {
        if self.annotations.is_none() {
            self.check_types(self.options.verbose)?;
        }
        let storage = reserve(&self.program);
        match &self.annotations {
            Some(annotations) => generate(
                &self.program,
                annotations,
                &storage,
                &self.options.build_stamp,
            ),
            None => Err(missing("type", &self.program.span.start)),
        }
    }
}

/// Instruction buffer of one function, with its label state.
#[derive(Debug, Default)]
pub struct CodeBuffer {
    lines: Vec<String>,
    pending_label: Option<String>,
    last_instruction: Option<String>,
    label_count: usize,
}

impl CodeBuffer {
    pub fn new() -> Self {
        CodeBuffer::default()
    }

    /// A fresh `_L<n>` label, numbered per function.
    pub fn new_label(&mut self) -> String {
        let label = format!("_L{}", self.label_count);
        self.label_count += 1;
        label
    }

    /// Appends one instruction, attaching the pending label if any.
    pub fn emit(&mut self, instruction: impl Into<String>) {
        let instruction = instruction.into();
        let line = match self.pending_label.take() {
            Some(label) => format!("    {}: {}", label, instruction),
            None => format!("    {}", instruction),
        };
        self.lines.push(line);
        self.last_instruction = Some(instruction);
    }

    /// Marks the position of the next instruction.
    pub fn place_label(&mut self, label: String) {
        if self.pending_label.is_some() {
            self.emit("nop");
        }
        self.pending_label = Some(label);
    }

    pub fn has_pending_label(&self) -> bool {
        self.pending_label.is_some()
    }

    pub fn ends_with_ret(&self) -> bool {
        self.last_instruction.as_deref() == Some("ret")
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

/// Code generation state for one function body.
pub struct FunctionCompiler<'a> {
    pub program: &'a Program,
    pub annotations: &'a Annotations,
    pub storage: &'a Storage,
    pub function_id: FunctionId,
    pub function: &'a Function,
    pub code: CodeBuffer,
}

impl<'a> FunctionCompiler<'a> {
    pub fn new(
        program: &'a Program,
        annotations: &'a Annotations,
        storage: &'a Storage,
        function_id: FunctionId,
    ) -> Self {
        FunctionCompiler {
            program,
            annotations,
            storage,
            function_id,
            function: program.function(function_id),
            code: CodeBuffer::new(),
        }
    }

    pub fn emit(&mut self, instruction: impl Into<String>) {
        self.code.emit(instruction);
    }

    pub fn new_label(&mut self) -> String {
        self.code.new_label()
    }

    pub fn place_label(&mut self, label: String) {
        self.code.place_label(label);
    }

    /// The type the checker recorded for an expression.
    pub fn type_of(&self, id: ExprId, position: &Position) -> Result<Type, Error> {
        self.annotations
            .type_of(id)
            .ok_or_else(|| missing("type", position))
    }

    /// The variable an identifier or lvalue resolved to, with its location.
    pub fn variable_of(
        &self,
        id: ExprId,
        position: &Position,
    ) -> Result<(Location, &'a Variable), Error> {
        let program = self.program;
        let resolved = match self.annotations.variable(id) {
            Some(VarRef::Global(index)) => self
                .storage
                .global(index)
                .map(|location| (location, &program.globals()[index])),
            Some(VarRef::Local(function, index)) => self
                .storage
                .local(function, index)
                .map(|location| (location, &program.function(function).scope.variables[index])),
            None => None,
        };
        resolved.ok_or_else(|| missing("variable", position))
    }

    /// The function number a call resolved to, with its definition.
    pub fn call_target(
        &self,
        id: ExprId,
        position: &Position,
    ) -> Result<(usize, &'a Function), Error> {
        let program = self.program;
        self.annotations
            .call_target(id)
            .and_then(|target| {
                self.storage
                    .function_number(target)
                    .map(|number| (number, program.function(target)))
            })
            .ok_or_else(|| missing("call target", position))
    }

    pub fn literal(&self, id: ExprId, position: &Position) -> Result<Location, Error> {
        self.storage
            .literal(id)
            .ok_or_else(|| missing("constant", position))
    }
}

fn missing(what: &'static str, position: &Position) -> Error {
    Error::new(ErrorImpl::MissingAnnotation { what }, position.clone())
}

/// Emits the body of one user function, including its directives.
///
/// # Arguments
///
/// * `compiler` - State for the function being compiled
/// * `out` - The IR text being built
pub fn gen_function(compiler: &mut FunctionCompiler, out: &mut String) -> Result<(), Error> {
    let function = compiler.function;
    if !function.defined {
        return Err(Error::new(
            ErrorImpl::UndefinedFunction {
                function: function.name.clone(),
            },
            function.span.start.clone(),
        ));
    }

    for stmt in &function.body {
        gen_statement(compiler, stmt, None)?;
    }

    if compiler.code.has_pending_label() || !compiler.code.ends_with_ret() {
        if function.ret_type != BaseType::Void {
            compiler.emit("push 0");
        }
        compiler.emit("ret");
    }

    let storage = compiler.storage;
    let number = storage.function_number(compiler.function_id);
    let frame = storage.frame(compiler.function_id);
    let (number, frame) = match (number, frame) {
        (Some(number), Some(frame)) => (number, frame),
        _ => return Err(missing("storage", &function.span.start)),
    };

    debug!(
        "function {} '{}': {} instructions",
        number,
        function.name,
        compiler.code.lines().len()
    );

    out.push_str(&format!(".FUNC {} {}\n", number, function.name));
    out.push_str(&format!("  .params {}\n", function.param_count()));
    out.push_str(&format!("  .return {}\n", (function.ret_type != BaseType::Void) as u8));
    out.push_str(&format!("  .locals {}\n", frame.local_slots));
    for line in compiler.code.lines() {
        out.push_str(line);
        out.push('\n');
    }
    out.push_str(".end FUNC\n");
    out.push('\n');

    Ok(())
}

/// Generates the IR for a checked and laid-out program.
///
/// # Arguments
///
/// * `program` - The program to compile
/// * `annotations` - Type checker results for `program`
/// * `storage` - Allocator results for `program`
/// * `stamp` - Build stamp for the header line
///
/// # Returns
///
/// The IR text: header, constant, global and function sections
pub fn generate(
    program: &Program,
    annotations: &Annotations,
    storage: &Storage,
    stamp: &str,
) -> Result<String, Error> {
    let mut out = String::new();

    out.push_str(&format!("; compiler build {}\n", stamp));
    out.push_str(&format!(".CONSTANTS {}\n", storage.constants.len()));
    for word in storage.constants.words() {
        out.push_str(&format!("  0x{:08x}\n", word));
    }
    out.push('\n');
    out.push_str(&format!(".GLOBALS {}\n", storage.global_slots));
    out.push('\n');
    out.push_str(&format!(".FUNCTIONS {}\n", program.user_functions().count()));
    out.push('\n');

    for (id, _) in program.user_functions() {
        let mut compiler = FunctionCompiler::new(program, annotations, storage, id);
        gen_function(&mut compiler, &mut out)?;
    }

    Ok(out)
}
