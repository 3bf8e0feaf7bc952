//! Argument validation and registration helpers shared by the native
//! prelude modules.

use rill_ir::SymbolInterner;

use crate::dispatch::define_method;
use crate::environment::Scope;
use crate::errors::{wrong_arg_count, wrong_arg_type, EvalError};
use crate::shared::Shared;
use crate::value::{ClassDef, Clause, Functor, NativeFn, Value};

/// Install a native clause as a method on a built-in class's instance scope.
///
/// Goes through the same `define_method` path user definitions use, so a
/// selector that already holds a functor gains a clause.
pub(crate) fn native_method(
    interner: &SymbolInterner,
    lexical: &Shared<Scope>,
    class: &Shared<ClassDef>,
    name: &str,
    native: NativeFn,
) {
    let selector = interner.intern(name);
    let scope = class.borrow().instance_scope.clone();
    define_method(&scope, selector, Clause::Native(native), lexical.clone());
}

/// Bind a native functor directly in the kernel scope, making it callable
/// without a receiver (`puts`, `print`).
pub(crate) fn kernel_function(
    interner: &SymbolInterner,
    kernel: &Shared<Scope>,
    name: &str,
    native: NativeFn,
) {
    let selector = interner.intern(name);
    let functor = Functor::method(selector, Clause::Native(native), kernel.clone());
    kernel.borrow_mut().define(selector, Value::Functor(functor));
}

/// Validate that a native received exactly `expected` arguments.
#[inline]
pub(crate) fn require_args(method: &str, expected: usize, args: &[Value]) -> Result<(), EvalError> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(wrong_arg_count(method, expected, args.len()))
    }
}

/// Extract the block argument as a functor, when present.
pub(crate) fn require_block(
    method: &str,
    block: Option<Value>,
) -> Result<Option<Shared<Functor>>, EvalError> {
    match block {
        None => Ok(None),
        Some(Value::Functor(functor)) => Ok(Some(functor)),
        Some(other) => Err(wrong_arg_type(method, "Functor block", other.type_name())),
    }
}
