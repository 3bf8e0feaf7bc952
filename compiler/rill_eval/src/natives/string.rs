//! Native methods on String.

use std::rc::Rc;

use crate::errors::{wrong_arg_type, wrong_receiver, EvalError, EvalResult};
use crate::interpreter::Interpreter;
use crate::natives::{native_method, require_args};
use crate::value::Value;

pub(crate) fn install(interp: &mut Interpreter) {
    let interner = interp.interner.clone();
    let kernel = interp.env.kernel().clone();
    let class = interp.builtins.string.clone();
    native_method(&interner, &kernel, &class, "+", str_concat);
    native_method(&interner, &kernel, &class, "==", str_eq);
    native_method(&interner, &kernel, &class, "!=", str_ne);
    native_method(&interner, &kernel, &class, "<", str_lt);
    native_method(&interner, &kernel, &class, "<=", str_le);
    native_method(&interner, &kernel, &class, "size", str_size);
    native_method(&interner, &kernel, &class, "to_s", str_to_s);
    native_method(&interner, &kernel, &class, "to_sym", str_to_sym);
}

fn receiver_str(method: &str, value: &Value) -> Result<Rc<str>, EvalError> {
    match value {
        Value::Str(s) => Ok(s.clone()),
        other => Err(wrong_receiver(method, "String", other.type_name())),
    }
}

fn arg_str(method: &str, value: &Value) -> Result<Rc<str>, EvalError> {
    match value {
        Value::Str(s) => Ok(s.clone()),
        other => Err(wrong_arg_type(method, "String", other.type_name())),
    }
}

fn str_concat(_: &mut Interpreter, receiver: Value, args: &[Value], _: Option<Value>) -> EvalResult {
    require_args("+", 1, args)?;
    let left = receiver_str("+", &receiver)?;
    let right = arg_str("+", &args[0])?;
    Ok(Value::string(format!("{left}{right}")))
}

fn str_eq(_: &mut Interpreter, receiver: Value, args: &[Value], _: Option<Value>) -> EvalResult {
    require_args("==", 1, args)?;
    Ok(Value::Bool(receiver.host_eq(&args[0])))
}

fn str_ne(_: &mut Interpreter, receiver: Value, args: &[Value], _: Option<Value>) -> EvalResult {
    require_args("!=", 1, args)?;
    Ok(Value::Bool(!receiver.host_eq(&args[0])))
}

fn str_lt(_: &mut Interpreter, receiver: Value, args: &[Value], _: Option<Value>) -> EvalResult {
    require_args("<", 1, args)?;
    let left = receiver_str("<", &receiver)?;
    let right = arg_str("<", &args[0])?;
    Ok(Value::Bool(*left < *right))
}

fn str_le(_: &mut Interpreter, receiver: Value, args: &[Value], _: Option<Value>) -> EvalResult {
    require_args("<=", 1, args)?;
    let left = receiver_str("<=", &receiver)?;
    let right = arg_str("<=", &args[0])?;
    Ok(Value::Bool(*left <= *right))
}

fn str_size(_: &mut Interpreter, receiver: Value, args: &[Value], _: Option<Value>) -> EvalResult {
    require_args("size", 0, args)?;
    let s = receiver_str("size", &receiver)?;
    // Unicode text: size counts scalar values, not bytes.
    Ok(Value::Int(s.chars().count() as i64))
}

fn str_to_s(_: &mut Interpreter, receiver: Value, args: &[Value], _: Option<Value>) -> EvalResult {
    require_args("to_s", 0, args)?;
    receiver_str("to_s", &receiver)?;
    Ok(receiver)
}

fn str_to_sym(
    interp: &mut Interpreter,
    receiver: Value,
    args: &[Value],
    _: Option<Value>,
) -> EvalResult {
    require_args("to_sym", 0, args)?;
    let s = receiver_str("to_sym", &receiver)?;
    Ok(Value::Symbol(interp.interner.intern(&s)))
}
