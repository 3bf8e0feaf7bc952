//! Native methods on Integer and Float.
//!
//! Arithmetic mixing an integer and a float promotes to float. Integer
//! arithmetic is checked: overflow and division by zero raise instead of
//! wrapping.

use crate::errors::{
    division_by_zero, integer_overflow, wrong_arg_type, wrong_receiver, EvalError, EvalResult,
};
use crate::interpreter::Interpreter;
use crate::natives::{native_method, require_args};
use crate::value::Value;

pub(crate) fn install(interp: &mut Interpreter) {
    let interner = interp.interner.clone();
    let kernel = interp.env.kernel().clone();
    for class in [interp.builtins.integer.clone(), interp.builtins.float.clone()] {
        native_method(&interner, &kernel, &class, "+", num_add);
        native_method(&interner, &kernel, &class, "-", num_sub);
        native_method(&interner, &kernel, &class, "*", num_mul);
        native_method(&interner, &kernel, &class, "/", num_div);
        native_method(&interner, &kernel, &class, "%", num_rem);
        native_method(&interner, &kernel, &class, "==", num_eq);
        native_method(&interner, &kernel, &class, "!=", num_ne);
        native_method(&interner, &kernel, &class, "<", num_lt);
        native_method(&interner, &kernel, &class, "<=", num_le);
        native_method(&interner, &kernel, &class, ">", num_gt);
        native_method(&interner, &kernel, &class, ">=", num_ge);
        native_method(&interner, &kernel, &class, "-@", num_neg);
        native_method(&interner, &kernel, &class, "to_s", num_to_s);
    }
}

enum Num {
    Int(i64),
    Float(f64),
}

fn as_num(method: &str, value: &Value) -> Result<Num, EvalError> {
    match value {
        Value::Int(n) => Ok(Num::Int(*n)),
        Value::Float(f) => Ok(Num::Float(*f)),
        other => Err(wrong_arg_type(method, "number", other.type_name())),
    }
}

fn receiver_num(method: &str, value: &Value) -> Result<Num, EvalError> {
    match value {
        Value::Int(n) => Ok(Num::Int(*n)),
        Value::Float(f) => Ok(Num::Float(*f)),
        other => Err(wrong_receiver(method, "number", other.type_name())),
    }
}

#[expect(clippy::cast_precision_loss, reason = "float contagion follows host conversion")]
fn to_f64(n: &Num) -> f64 {
    match n {
        Num::Int(i) => *i as f64,
        Num::Float(f) => *f,
    }
}

fn arith(
    method: &str,
    receiver: &Value,
    args: &[Value],
    int_op: fn(i64, i64) -> Result<i64, EvalError>,
    float_op: fn(f64, f64) -> f64,
) -> EvalResult {
    require_args(method, 1, args)?;
    let left = receiver_num(method, receiver)?;
    let right = as_num(method, &args[0])?;
    match (&left, &right) {
        (Num::Int(a), Num::Int(b)) => int_op(*a, *b).map(Value::Int),
        _ => Ok(Value::Float(float_op(to_f64(&left), to_f64(&right)))),
    }
}

fn num_add(_: &mut Interpreter, receiver: Value, args: &[Value], _: Option<Value>) -> EvalResult {
    arith(
        "+",
        &receiver,
        args,
        |a, b| a.checked_add(b).ok_or_else(|| integer_overflow("+")),
        |a, b| a + b,
    )
}

fn num_sub(_: &mut Interpreter, receiver: Value, args: &[Value], _: Option<Value>) -> EvalResult {
    arith(
        "-",
        &receiver,
        args,
        |a, b| a.checked_sub(b).ok_or_else(|| integer_overflow("-")),
        |a, b| a - b,
    )
}

fn num_mul(_: &mut Interpreter, receiver: Value, args: &[Value], _: Option<Value>) -> EvalResult {
    arith(
        "*",
        &receiver,
        args,
        |a, b| a.checked_mul(b).ok_or_else(|| integer_overflow("*")),
        |a, b| a * b,
    )
}

fn num_div(_: &mut Interpreter, receiver: Value, args: &[Value], _: Option<Value>) -> EvalResult {
    arith(
        "/",
        &receiver,
        args,
        |a, b| {
            if b == 0 {
                return Err(division_by_zero());
            }
            a.checked_div(b).ok_or_else(|| integer_overflow("/"))
        },
        |a, b| a / b,
    )
}

fn num_rem(_: &mut Interpreter, receiver: Value, args: &[Value], _: Option<Value>) -> EvalResult {
    arith(
        "%",
        &receiver,
        args,
        |a, b| {
            if b == 0 {
                return Err(division_by_zero());
            }
            a.checked_rem(b).ok_or_else(|| integer_overflow("%"))
        },
        |a, b| a % b,
    )
}

/// Numeric equality promotes: `1 == 1.0` is true. A non-numeric argument
/// compares unequal rather than raising.
fn nums_equal(left: &Num, right: &Num) -> bool {
    match (left, right) {
        (Num::Int(a), Num::Int(b)) => a == b,
        _ => to_f64(left) == to_f64(right),
    }
}

fn num_eq(_: &mut Interpreter, receiver: Value, args: &[Value], _: Option<Value>) -> EvalResult {
    require_args("==", 1, args)?;
    let left = receiver_num("==", &receiver)?;
    match as_num("==", &args[0]) {
        Ok(right) => Ok(Value::Bool(nums_equal(&left, &right))),
        Err(_) => Ok(Value::Bool(false)),
    }
}

fn num_ne(_: &mut Interpreter, receiver: Value, args: &[Value], _: Option<Value>) -> EvalResult {
    require_args("!=", 1, args)?;
    let left = receiver_num("!=", &receiver)?;
    match as_num("!=", &args[0]) {
        Ok(right) => Ok(Value::Bool(!nums_equal(&left, &right))),
        Err(_) => Ok(Value::Bool(true)),
    }
}

fn compare(method: &str, receiver: &Value, args: &[Value]) -> Result<std::cmp::Ordering, EvalError> {
    require_args(method, 1, args)?;
    let left = receiver_num(method, receiver)?;
    let right = as_num(method, &args[0])?;
    match (&left, &right) {
        (Num::Int(a), Num::Int(b)) => Ok(a.cmp(b)),
        _ => to_f64(&left)
            .partial_cmp(&to_f64(&right))
            .ok_or_else(|| wrong_arg_type(method, "comparable number", "NaN")),
    }
}

fn num_lt(_: &mut Interpreter, receiver: Value, args: &[Value], _: Option<Value>) -> EvalResult {
    compare("<", &receiver, args).map(|o| Value::Bool(o.is_lt()))
}

fn num_le(_: &mut Interpreter, receiver: Value, args: &[Value], _: Option<Value>) -> EvalResult {
    compare("<=", &receiver, args).map(|o| Value::Bool(o.is_le()))
}

fn num_gt(_: &mut Interpreter, receiver: Value, args: &[Value], _: Option<Value>) -> EvalResult {
    compare(">", &receiver, args).map(|o| Value::Bool(o.is_gt()))
}

fn num_ge(_: &mut Interpreter, receiver: Value, args: &[Value], _: Option<Value>) -> EvalResult {
    compare(">=", &receiver, args).map(|o| Value::Bool(o.is_ge()))
}

fn num_neg(_: &mut Interpreter, receiver: Value, args: &[Value], _: Option<Value>) -> EvalResult {
    require_args("-@", 0, args)?;
    match receiver_num("-@", &receiver)? {
        Num::Int(n) => n.checked_neg().map(Value::Int).ok_or_else(|| integer_overflow("-@")),
        Num::Float(f) => Ok(Value::Float(-f)),
    }
}

fn num_to_s(
    interp: &mut Interpreter,
    receiver: Value,
    args: &[Value],
    _: Option<Value>,
) -> EvalResult {
    require_args("to_s", 0, args)?;
    Ok(Value::string(receiver.display(&*interp.interner)))
}
