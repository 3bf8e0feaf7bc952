//! Native methods on List.
//!
//! Lists mutate in place: `push`/`<<` and `[]=` modify the receiver.
//! Equality is language-level, dispatching `==` per element.

use crate::errors::{
    index_out_of_bounds, wrong_arg_type, wrong_receiver, EvalError, EvalResult,
};
use crate::interpreter::Interpreter;
use crate::natives::{native_method, require_args, require_block};
use crate::shared::Shared;
use crate::value::{ListValue, Value};

pub(crate) fn install(interp: &mut Interpreter) {
    let interner = interp.interner.clone();
    let kernel = interp.env.kernel().clone();
    let class = interp.builtins.list.clone();
    native_method(&interner, &kernel, &class, "push", list_push);
    native_method(&interner, &kernel, &class, "<<", list_push);
    native_method(&interner, &kernel, &class, "[]", list_index);
    native_method(&interner, &kernel, &class, "[]=", list_index_set);
    native_method(&interner, &kernel, &class, "+", list_concat);
    native_method(&interner, &kernel, &class, "==", list_eq);
    native_method(&interner, &kernel, &class, "!=", list_ne);
    native_method(&interner, &kernel, &class, "size", list_size);
    native_method(&interner, &kernel, &class, "each", list_each);
    native_method(&interner, &kernel, &class, "first", list_first);
    native_method(&interner, &kernel, &class, "last", list_last);
    native_method(&interner, &kernel, &class, "to_s", list_to_s);
}

fn receiver_list(method: &str, value: &Value) -> Result<Shared<ListValue>, EvalError> {
    match value {
        Value::List(list) => Ok(list.clone()),
        other => Err(wrong_receiver(method, "List", other.type_name())),
    }
}

fn arg_int(method: &str, value: &Value) -> Result<i64, EvalError> {
    match value {
        Value::Int(n) => Ok(*n),
        other => Err(wrong_arg_type(method, "Integer", other.type_name())),
    }
}

/// Resolve an index, counting from the end when negative.
fn resolve_index(index: i64, len: usize) -> Option<usize> {
    if index >= 0 {
        Some(index as usize)
    } else {
        let from_end = index.unsigned_abs() as usize;
        len.checked_sub(from_end)
    }
}

fn list_push(_: &mut Interpreter, receiver: Value, args: &[Value], _: Option<Value>) -> EvalResult {
    require_args("push", 1, args)?;
    let list = receiver_list("push", &receiver)?;
    list.borrow_mut().items.push(args[0].clone());
    Ok(receiver)
}

/// Indexing an absent position yields nil, never an error.
fn list_index(_: &mut Interpreter, receiver: Value, args: &[Value], _: Option<Value>) -> EvalResult {
    require_args("[]", 1, args)?;
    let list = receiver_list("[]", &receiver)?;
    let index = arg_int("[]", &args[0])?;
    let items = list.borrow();
    let value = resolve_index(index, items.items.len())
        .and_then(|i| items.items.get(i).cloned())
        .unwrap_or(Value::Nil);
    Ok(value)
}

/// Assignment beyond the end grows the list, padding with nil. An index
/// before the start is an error.
fn list_index_set(
    _: &mut Interpreter,
    receiver: Value,
    args: &[Value],
    _: Option<Value>,
) -> EvalResult {
    require_args("[]=", 2, args)?;
    let list = receiver_list("[]=", &receiver)?;
    let index = arg_int("[]=", &args[0])?;
    let value = args[1].clone();

    let mut items = list.borrow_mut();
    let len = items.items.len();
    let Some(slot) = resolve_index(index, len) else {
        return Err(index_out_of_bounds(index));
    };
    if slot >= len {
        items.items.resize(slot + 1, Value::Nil);
    }
    items.items[slot] = value.clone();
    Ok(value)
}

fn list_concat(_: &mut Interpreter, receiver: Value, args: &[Value], _: Option<Value>) -> EvalResult {
    require_args("+", 1, args)?;
    let left = receiver_list("+", &receiver)?;
    let Value::List(right) = &args[0] else {
        return Err(wrong_arg_type("+", "List", args[0].type_name()));
    };
    let mut items = left.borrow().items.clone();
    items.extend(right.borrow().items.iter().cloned());
    Ok(Value::list(items))
}

/// Same length and pairwise dispatched `==` on elements.
fn lists_equal(
    interp: &mut Interpreter,
    left: &Shared<ListValue>,
    right: &Shared<ListValue>,
) -> Result<bool, EvalError> {
    let eq = interp.names.eq;
    let left_items = left.borrow().items.clone();
    let right_items = right.borrow().items.clone();
    if left_items.len() != right_items.len() {
        return Ok(false);
    }
    for (a, b) in left_items.iter().zip(right_items.iter()) {
        let equal = interp.call_method(a.clone(), eq, vec![b.clone()], None)?;
        if !equal.is_truthy() {
            return Ok(false);
        }
    }
    Ok(true)
}

fn list_eq(
    interp: &mut Interpreter,
    receiver: Value,
    args: &[Value],
    _: Option<Value>,
) -> EvalResult {
    require_args("==", 1, args)?;
    let left = receiver_list("==", &receiver)?;
    match &args[0] {
        Value::List(right) => Ok(Value::Bool(lists_equal(interp, &left, right)?)),
        _ => Ok(Value::Bool(false)),
    }
}

fn list_ne(
    interp: &mut Interpreter,
    receiver: Value,
    args: &[Value],
    _: Option<Value>,
) -> EvalResult {
    require_args("!=", 1, args)?;
    let left = receiver_list("!=", &receiver)?;
    match &args[0] {
        Value::List(right) => Ok(Value::Bool(!lists_equal(interp, &left, right)?)),
        _ => Ok(Value::Bool(true)),
    }
}

fn list_size(_: &mut Interpreter, receiver: Value, args: &[Value], _: Option<Value>) -> EvalResult {
    require_args("size", 0, args)?;
    let list = receiver_list("size", &receiver)?;
    let len = list.borrow().items.len();
    Ok(Value::Int(len as i64))
}

/// Invoke the block once per element, in order. Returns the receiver.
fn list_each(
    interp: &mut Interpreter,
    receiver: Value,
    args: &[Value],
    block: Option<Value>,
) -> EvalResult {
    require_args("each", 0, args)?;
    let list = receiver_list("each", &receiver)?;
    if let Some(block) = require_block("each", block)? {
        let items = list.borrow().items.clone();
        for item in items {
            interp.invoke_functor(&block, Value::Nil, vec![item], None)?;
        }
    }
    Ok(receiver)
}

fn list_first(_: &mut Interpreter, receiver: Value, args: &[Value], _: Option<Value>) -> EvalResult {
    require_args("first", 0, args)?;
    let list = receiver_list("first", &receiver)?;
    let value = list.borrow().items.first().cloned().unwrap_or(Value::Nil);
    Ok(value)
}

fn list_last(_: &mut Interpreter, receiver: Value, args: &[Value], _: Option<Value>) -> EvalResult {
    require_args("last", 0, args)?;
    let list = receiver_list("last", &receiver)?;
    let value = list.borrow().items.last().cloned().unwrap_or(Value::Nil);
    Ok(value)
}

fn list_to_s(
    interp: &mut Interpreter,
    receiver: Value,
    args: &[Value],
    _: Option<Value>,
) -> EvalResult {
    require_args("to_s", 0, args)?;
    receiver_list("to_s", &receiver)?;
    Ok(Value::string(receiver.display(&*interp.interner)))
}
