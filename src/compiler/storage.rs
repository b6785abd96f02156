use std::{collections::HashMap, fmt::Display};

use log::debug;

use crate::ast::{
    ast::{FunctionId, Program, Variable},
    expressions::{Expr, ExprId, ExprKind},
    statements::walk_body,
};

use super::stdlib::BUILTIN_COUNT;

/// A symbolic storage slot, resolved to an address by the loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Location {
    Global(usize),
    Local(usize),
    Constant(usize),
}

impl Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Location::Global(n) => write!(f, "G{}", n),
            Location::Local(n) => write!(f, "L{}", n),
            Location::Constant(n) => write!(f, "C{}", n),
        }
    }
}

/// The 32-bit words of the constant section, in allocation order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConstantPool {
    words: Vec<u32>,
}

impl ConstantPool {
    pub fn new() -> Self {
        ConstantPool::default()
    }

    /// Appends one word and returns its location.
    pub fn push_word(&mut self, word: u32) -> Location {
        self.words.push(word);
        Location::Constant(self.words.len() - 1)
    }

    /// Packs string bytes four per word, little-endian, zero padded.
    /// Returns the location of the first word.
    pub fn push_string(&mut self, bytes: &[u8]) -> Location {
        let first = self.words.len();

        for chunk in bytes.chunks(4) {
            let mut word = [0u8; 4];
            word[..chunk.len()].copy_from_slice(chunk);
            self.words.push(u32::from_le_bytes(word));
        }
        if bytes.is_empty() {
            self.words.push(0);
        }

        Location::Constant(first)
    }

    pub fn words(&self) -> &[u32] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Slots of one user function: its parameters first, then its locals.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameLayout {
    /// Location of each variable of the function scope, by index.
    pub locations: Vec<Location>,
    pub param_slots: usize,
    /// Slots used by locals, excluding parameters.
    pub local_slots: usize,
}

/// Everything the allocator assigns ahead of code generation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Storage {
    /// Location of each global variable, by index.
    pub globals: Vec<Location>,
    pub global_slots: usize,
    pub frames: HashMap<FunctionId, FrameLayout>,
    pub function_numbers: HashMap<FunctionId, usize>,
    pub literals: HashMap<ExprId, Location>,
    pub constants: ConstantPool,
}

impl Storage {
    pub fn global(&self, index: usize) -> Option<Location> {
        self.globals.get(index).copied()
    }

    pub fn local(&self, function: FunctionId, index: usize) -> Option<Location> {
        self.frames
            .get(&function)
            .and_then(|frame| frame.locations.get(index).copied())
    }

    pub fn frame(&self, function: FunctionId) -> Option<&FrameLayout> {
        self.frames.get(&function)
    }

    pub fn function_number(&self, function: FunctionId) -> Option<usize> {
        self.function_numbers.get(&function).copied()
    }

    pub fn literal(&self, id: ExprId) -> Option<Location> {
        self.literals.get(&id).copied()
    }
}

/// Lays out `variables` on consecutive slots starting at `first`.
/// Returns the locations and the next free slot.
fn layout(
    variables: &[Variable],
    first: usize,
    slot: impl Fn(usize) -> Location,
) -> (Vec<Location>, usize) {
    let mut next = first;
    let locations = variables
        .iter()
        .map(|variable| {
            let location = slot(next);
            debug!(
                "{} '{}' ({} slot(s))",
                location,
                variable.name(),
                variable.storage_slots()
            );
            next += variable.storage_slots();
            location
        })
        .collect();
    (locations, next)
}

fn reserve_literal(storage: &mut Storage, expr: &Expr) {
    let location = match &expr.kind {
        ExprKind::IntConst(value) => storage.constants.push_word(*value as u32),
        ExprKind::CharConst(value) => storage.constants.push_word(*value as u32),
        ExprKind::RealConst(value) => storage.constants.push_word(value.to_bits()),
        ExprKind::StrConst(value) => storage.constants.push_string(value),
        _ => return,
    };
    debug!("{} literal {:?}", location, expr.id);
    storage.literals.insert(expr.id, location);
}

/// Assigns storage to a type-checked program.
///
/// Globals get `G` slots in declaration order. Within each user function
/// parameters take `L0..Lk-1` and locals continue the same counter; arrays
/// take as many 4-byte words as their elements need. Every numeric, char and
/// string literal gets a constant pool entry. Builtins are numbered first,
/// user functions follow in function-table order.
///
/// # Arguments
///
/// * `program` - The program to lay out
///
/// # Returns
///
/// The storage assignment consumed by the code generator
pub fn reserve(program: &Program) -> Storage {
    let mut storage = Storage::default();

    let (globals, global_slots) = layout(program.globals(), 0, Location::Global);
    storage.globals = globals;
    storage.global_slots = global_slots;

    for (number, (id, _)) in program.functions().filter(|(_, f)| f.builtin).enumerate() {
        storage.function_numbers.insert(id, number);
    }

    for (offset, (id, function)) in program.user_functions().enumerate() {
        let number = BUILTIN_COUNT + offset;
        debug!("function {} '{}'", number, function.name);
        storage.function_numbers.insert(id, number);

        let param_count = function.param_count();
        let (mut locations, param_slots) =
            layout(&function.scope.variables[..param_count], 0, Location::Local);
        let (locals, next) = layout(function.locals(), param_slots, Location::Local);
        locations.extend(locals);

        storage.frames.insert(
            id,
            FrameLayout {
                locations,
                param_slots,
                local_slots: next - param_slots,
            },
        );

        walk_body(&function.body, &mut |expr| reserve_literal(&mut storage, expr));
    }

    storage
}
