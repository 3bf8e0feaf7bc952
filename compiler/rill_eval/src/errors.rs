//! Evaluation errors.
//!
//! One error struct, one kind enum, and `#[cold]` constructor functions for
//! every error shape the core raises. Errors unwind through `Result` to the
//! caller of `Interpreter::run`; native clauses propagate re-entrant dispatch
//! errors with `?` rather than swallowing them.

use std::fmt;

use crate::value::Value;

/// Result of evaluation.
pub type EvalResult = Result<Value, EvalError>;

/// Classification of an evaluation failure.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Raised by the parser collaborator, propagated unchanged.
    Parse,
    /// A name lookup reached the kernel scope without finding a binding.
    UnresolvedIdentifier,
    /// The dispatch chain was exhausted without finding the method.
    NoSuchMethod,
    /// Instance-variable access on a primitive, or a native clause handed an
    /// unexpected receiver or argument variant.
    TypeMisuse,
    /// Scope lookup without fallback at the scope primitive level.
    Index,
    /// Call arguments fit no clause of the selected functor.
    ArityMismatch,
    /// Invariant violation inside the interpreter. Fatal.
    Bug,
}

/// Evaluation error.
#[derive(Clone, Debug)]
pub struct EvalError {
    pub kind: ErrorKind,
    pub message: String,
}

impl EvalError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        EvalError {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for EvalError {}

// Name and dispatch errors

/// Unresolved identifier.
#[cold]
pub fn unresolved_identifier(name: &str) -> EvalError {
    EvalError::new(
        ErrorKind::UnresolvedIdentifier,
        format!("unresolved identifier: {name}"),
    )
}

/// No method with this selector anywhere on the receiver's chain.
#[cold]
pub fn no_such_method(method: &str, type_name: &str) -> EvalError {
    EvalError::new(
        ErrorKind::NoSuchMethod,
        format!("no method '{method}' on {type_name}"),
    )
}

/// A binding exists but is not callable.
#[cold]
pub fn not_callable(name: &str, type_name: &str) -> EvalError {
    EvalError::new(
        ErrorKind::TypeMisuse,
        format!("'{name}' is bound to a {type_name}, which is not callable"),
    )
}

// Arity errors

/// No clause of the functor accepts this argument count.
#[cold]
pub fn arity_mismatch(name: &str, got: usize) -> EvalError {
    EvalError::new(
        ErrorKind::ArityMismatch,
        format!("no clause of '{name}' accepts {got} argument(s)"),
    )
}

/// A native clause received the wrong number of arguments.
#[cold]
pub fn wrong_arg_count(method: &str, expected: usize, got: usize) -> EvalError {
    EvalError::new(
        ErrorKind::ArityMismatch,
        format!("{method} expects {expected} argument(s), got {got}"),
    )
}

// Type misuse errors

/// Instance-variable access on a value without a binding table.
#[cold]
pub fn ivar_on_primitive(type_name: &str) -> EvalError {
    EvalError::new(
        ErrorKind::TypeMisuse,
        format!("{type_name} values carry no instance variables"),
    )
}

/// A native clause received an unexpected receiver variant.
#[cold]
pub fn wrong_receiver(method: &str, expected: &str, got: &str) -> EvalError {
    EvalError::new(
        ErrorKind::TypeMisuse,
        format!("{method} expects a {expected} receiver, got {got}"),
    )
}

/// A native clause received an unexpected argument variant.
#[cold]
pub fn wrong_arg_type(method: &str, expected: &str, got: &str) -> EvalError {
    EvalError::new(
        ErrorKind::TypeMisuse,
        format!("{method} expects a {expected} argument, got {got}"),
    )
}

/// A declared superclass name did not resolve to a class.
#[cold]
pub fn superclass_not_a_class(name: &str) -> EvalError {
    EvalError::new(ErrorKind::TypeMisuse, format!("superclass {name} is not a class"))
}

/// An include/extend target did not resolve to a module.
#[cold]
pub fn mixin_not_a_module(name: &str) -> EvalError {
    EvalError::new(ErrorKind::TypeMisuse, format!("{name} is not a module"))
}

// Arithmetic errors

/// Integer division or remainder by zero.
#[cold]
pub fn division_by_zero() -> EvalError {
    EvalError::new(ErrorKind::TypeMisuse, "division by zero")
}

/// Checked integer arithmetic overflowed.
#[cold]
pub fn integer_overflow(operation: &str) -> EvalError {
    EvalError::new(
        ErrorKind::TypeMisuse,
        format!("integer overflow in {operation}"),
    )
}

// Index errors

/// List index beyond what the operation can address.
#[cold]
pub fn index_out_of_bounds(index: i64) -> EvalError {
    EvalError::new(ErrorKind::Index, format!("index {index} out of bounds"))
}

// Driver errors

/// Call depth exceeded the configured limit.
#[cold]
pub fn recursion_limit(limit: usize) -> EvalError {
    EvalError::new(
        ErrorKind::Bug,
        format!("call depth exceeded the limit of {limit}"),
    )
}

/// Invariant violation inside the interpreter.
#[cold]
pub fn interpreter_bug(message: &str) -> EvalError {
    EvalError::new(ErrorKind::Bug, format!("interpreter bug: {message}"))
}
