//! Native methods on Map.
//!
//! The ordered-map operator contract:
//! - `==`/`!=` dispatch `==` per entry (language-level equality)
//! - `<=`/`<` compare key sets by host identity, not dispatched equality —
//!   a known inconsistency with `==`, kept deliberately (see DESIGN.md)
//! - `[]` yields nil for absent keys, never an error
//! - `[]=` binds in place and returns the value
//! - `+` merges right-biased into a fresh map
//! - `each` visits entries in insertion order and returns the receiver

use crate::errors::{wrong_arg_type, wrong_receiver, EvalError, EvalResult};
use crate::interpreter::Interpreter;
use crate::natives::{native_method, require_args, require_block};
use crate::shared::Shared;
use crate::value::{MapValue, Value};

pub(crate) fn install(interp: &mut Interpreter) {
    let interner = interp.interner.clone();
    let kernel = interp.env.kernel().clone();
    let class = interp.builtins.map.clone();
    native_method(&interner, &kernel, &class, "[]", map_index);
    native_method(&interner, &kernel, &class, "[]=", map_index_set);
    native_method(&interner, &kernel, &class, "+", map_merge);
    native_method(&interner, &kernel, &class, "==", map_eq);
    native_method(&interner, &kernel, &class, "!=", map_ne);
    native_method(&interner, &kernel, &class, "<=", map_subset);
    native_method(&interner, &kernel, &class, "<", map_proper_subset);
    native_method(&interner, &kernel, &class, "size", map_size);
    native_method(&interner, &kernel, &class, "each", map_each);
    native_method(&interner, &kernel, &class, "keys", map_keys);
    native_method(&interner, &kernel, &class, "values", map_values);
    native_method(&interner, &kernel, &class, "to_s", map_to_s);
}

fn receiver_map(method: &str, value: &Value) -> Result<Shared<MapValue>, EvalError> {
    match value {
        Value::Map(map) => Ok(map.clone()),
        other => Err(wrong_receiver(method, "Map", other.type_name())),
    }
}

fn arg_map(method: &str, value: &Value) -> Result<Shared<MapValue>, EvalError> {
    match value {
        Value::Map(map) => Ok(map.clone()),
        other => Err(wrong_arg_type(method, "Map", other.type_name())),
    }
}

/// Dispatched key equality: `key == candidate` is truthy.
fn keys_equal(interp: &mut Interpreter, key: &Value, candidate: &Value) -> Result<bool, EvalError> {
    let eq = interp.names.eq;
    let result = interp.call_method(key.clone(), eq, vec![candidate.clone()], None)?;
    Ok(result.is_truthy())
}

/// Bind a key in place using dispatched equality: an existing key keeps its
/// position, a fresh key appends. Also used by the driver for map literals.
pub(crate) fn map_store(
    interp: &mut Interpreter,
    map: &Shared<MapValue>,
    key: Value,
    value: Value,
) -> Result<(), EvalError> {
    let entries = map.borrow().entries().to_vec();
    for (position, (existing, _)) in entries.iter().enumerate() {
        if keys_equal(interp, existing, &key)? {
            map.borrow_mut().set_value_at(position, value);
            return Ok(());
        }
    }
    map.borrow_mut().push_entry(key, value);
    Ok(())
}

/// `[k]` — the bound value, or nil when absent. Never raises for a missing
/// key.
fn map_index(
    interp: &mut Interpreter,
    receiver: Value,
    args: &[Value],
    _: Option<Value>,
) -> EvalResult {
    require_args("[]", 1, args)?;
    let map = receiver_map("[]", &receiver)?;
    let entries = map.borrow().entries().to_vec();
    for (key, value) in &entries {
        if keys_equal(interp, key, &args[0])? {
            return Ok(value.clone());
        }
    }
    Ok(Value::Nil)
}

/// `[k] = v` — bind in place; returns `v`.
fn map_index_set(
    interp: &mut Interpreter,
    receiver: Value,
    args: &[Value],
    _: Option<Value>,
) -> EvalResult {
    require_args("[]=", 2, args)?;
    let map = receiver_map("[]=", &receiver)?;
    map_store(interp, &map, args[0].clone(), args[1].clone())?;
    Ok(args[1].clone())
}

/// `+` — a fresh map holding the receiver's entries overlaid with the
/// argument's; the argument wins on key collision.
fn map_merge(
    interp: &mut Interpreter,
    receiver: Value,
    args: &[Value],
    _: Option<Value>,
) -> EvalResult {
    require_args("+", 1, args)?;
    let left = receiver_map("+", &receiver)?;
    let right = arg_map("+", &args[0])?;

    let merged = Shared::new(MapValue::new());
    for (key, value) in left.borrow().entries() {
        merged.borrow_mut().push_entry(key.clone(), value.clone());
    }
    let right_entries = right.borrow().entries().to_vec();
    for (key, value) in right_entries {
        map_store(interp, &merged, key, value)?;
    }
    Ok(Value::Map(merged))
}

/// Positional comparison: same size, and at every position the receiver's
/// key and value both dispatch `==` truthy against the other map's.
fn maps_equal(
    interp: &mut Interpreter,
    left: &Shared<MapValue>,
    right: &Shared<MapValue>,
) -> Result<bool, EvalError> {
    let eq = interp.names.eq;
    let left_entries = left.borrow().entries().to_vec();
    let right_entries = right.borrow().entries().to_vec();
    if left_entries.len() != right_entries.len() {
        return Ok(false);
    }
    for ((k, v), (ok, ov)) in left_entries.iter().zip(right_entries.iter()) {
        let key_equal = interp.call_method(k.clone(), eq, vec![ok.clone()], None)?;
        if !key_equal.is_truthy() {
            return Ok(false);
        }
        let value_equal = interp.call_method(v.clone(), eq, vec![ov.clone()], None)?;
        if !value_equal.is_truthy() {
            return Ok(false);
        }
    }
    Ok(true)
}

fn map_eq(
    interp: &mut Interpreter,
    receiver: Value,
    args: &[Value],
    _: Option<Value>,
) -> EvalResult {
    require_args("==", 1, args)?;
    let left = receiver_map("==", &receiver)?;
    match &args[0] {
        Value::Map(right) => Ok(Value::Bool(maps_equal(interp, &left, right)?)),
        _ => Ok(Value::Bool(false)),
    }
}

/// `!=` — NOT the negation of `==`.
///
/// Known quirk, preserved deliberately: when a positionally-matched key pair
/// compares EQUAL, the comparison short-circuits to `true`, so two non-empty
/// maps with the same keys in the same order always report `!=` as true.
/// Empty maps fall through to `false`, consistent with `{} == {}`. Existing
/// scripts observe this behavior; see DESIGN.md before changing it.
fn map_ne(
    interp: &mut Interpreter,
    receiver: Value,
    args: &[Value],
    _: Option<Value>,
) -> EvalResult {
    require_args("!=", 1, args)?;
    let left = receiver_map("!=", &receiver)?;
    let Value::Map(right) = &args[0] else {
        return Ok(Value::Bool(true));
    };

    let eq = interp.names.eq;
    let left_entries = left.borrow().entries().to_vec();
    let right_entries = right.borrow().entries().to_vec();
    if left_entries.len() != right_entries.len() {
        return Ok(Value::Bool(true));
    }
    for ((k, v), (ok, ov)) in left_entries.iter().zip(right_entries.iter()) {
        let key_equal = interp.call_method(k.clone(), eq, vec![ok.clone()], None)?;
        if key_equal.is_truthy() {
            return Ok(Value::Bool(true));
        }
        let value_equal = interp.call_method(v.clone(), eq, vec![ov.clone()], None)?;
        if !value_equal.is_truthy() {
            return Ok(Value::Bool(true));
        }
    }
    Ok(Value::Bool(false))
}

/// `<=` — every receiver key appears in the argument. Host key identity,
/// not dispatched equality.
fn map_subset(_: &mut Interpreter, receiver: Value, args: &[Value], _: Option<Value>) -> EvalResult {
    require_args("<=", 1, args)?;
    let left = receiver_map("<=", &receiver)?;
    let right = arg_map("<=", &args[0])?;
    let subset = left.borrow().is_host_subset_of(&right.borrow());
    Ok(Value::Bool(subset))
}

/// `<` — subset with differing key sets. Host key identity.
fn map_proper_subset(
    _: &mut Interpreter,
    receiver: Value,
    args: &[Value],
    _: Option<Value>,
) -> EvalResult {
    require_args("<", 1, args)?;
    let left = receiver_map("<", &receiver)?;
    let right = arg_map("<", &args[0])?;
    let (left, right) = (left.borrow(), right.borrow());
    Ok(Value::Bool(
        left.is_host_subset_of(&right) && !left.host_keys_equal(&right),
    ))
}

fn map_size(_: &mut Interpreter, receiver: Value, args: &[Value], _: Option<Value>) -> EvalResult {
    require_args("size", 0, args)?;
    let map = receiver_map("size", &receiver)?;
    let len = map.borrow().len();
    Ok(Value::Int(len as i64))
}

/// `each` — invoke the block with `(key, value)` per entry in insertion
/// order; the receiver is the result.
fn map_each(
    interp: &mut Interpreter,
    receiver: Value,
    args: &[Value],
    block: Option<Value>,
) -> EvalResult {
    require_args("each", 0, args)?;
    let map = receiver_map("each", &receiver)?;
    if let Some(block) = require_block("each", block)? {
        let entries = map.borrow().entries().to_vec();
        for (key, value) in entries {
            interp.invoke_functor(&block, Value::Nil, vec![key, value], None)?;
        }
    }
    Ok(receiver)
}

fn map_keys(_: &mut Interpreter, receiver: Value, args: &[Value], _: Option<Value>) -> EvalResult {
    require_args("keys", 0, args)?;
    let map = receiver_map("keys", &receiver)?;
    let keys: Vec<Value> = map.borrow().keys().cloned().collect();
    Ok(Value::list(keys))
}

fn map_values(_: &mut Interpreter, receiver: Value, args: &[Value], _: Option<Value>) -> EvalResult {
    require_args("values", 0, args)?;
    let map = receiver_map("values", &receiver)?;
    let values: Vec<Value> = map.borrow().values().cloned().collect();
    Ok(Value::list(values))
}

fn map_to_s(
    interp: &mut Interpreter,
    receiver: Value,
    args: &[Value],
    _: Option<Value>,
) -> EvalResult {
    require_args("to_s", 0, args)?;
    receiver_map("to_s", &receiver)?;
    Ok(Value::string(receiver.display(&*interp.interner)))
}
