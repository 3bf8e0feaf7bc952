//! Rill Eval - tree-walking interpreter core for the Rill language.
//!
//! # Architecture
//!
//! - `Value`: the tagged value domain (inline primitives, shared heap values)
//! - `Environment`: name binding through a scope stack with closure capture
//! - `ModuleDef`/`ClassDef`/`Instance`: containers and ancestor resolution
//! - `Functor`: multi-clause callables unifying user methods and natives
//! - dispatch: selector lookup along the receiver's ancestor chain
//! - natives: the built-in prelude, registered through the same definition
//!   path user code uses
//! - `Interpreter`: the driver walking `rill_ir` expressions
//!
//! The parser is an external collaborator: it shares the interner and
//! produces a `rill_ir::Program` this crate evaluates.

mod dispatch;
pub mod environment;
pub mod errors;
mod interpreter;
mod natives;
mod print_handler;
mod shared;
pub mod value;

#[cfg(test)]
mod tests;

pub use environment::{Environment, Scope};
pub use errors::{ErrorKind, EvalError, EvalResult};
pub use interpreter::{Interpreter, InterpreterBuilder, DEFAULT_MAX_CALL_DEPTH};
pub use print_handler::{buffer_handler, stdout_handler, PrintHandlerImpl, SharedPrintHandler};
pub use shared::Shared;
pub use value::{
    class_ancestors, class_extended_ancestors, Ancestor, ClassDef, Clause, Functor, Instance,
    Ivars, ListValue, MapValue, ModuleDef, NativeFn, UserClause, Value,
};
