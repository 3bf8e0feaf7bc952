//! Native methods on Boolean, Nil, Symbol, Functor, Class, and Module, plus
//! the kernel `puts`/`print` functions.

use crate::errors::{wrong_receiver, EvalError, EvalResult};
use crate::interpreter::Interpreter;
use crate::natives::{kernel_function, native_method, require_args};
use crate::value::{class_ancestors, Instance, Value};

pub(crate) fn install(interp: &mut Interpreter) {
    let interner = interp.interner.clone();
    let kernel = interp.env.kernel().clone();

    for class in [
        interp.builtins.boolean.clone(),
        interp.builtins.nil.clone(),
        interp.builtins.symbol.clone(),
    ] {
        native_method(&interner, &kernel, &class, "==", host_eq);
        native_method(&interner, &kernel, &class, "!=", host_ne);
        native_method(&interner, &kernel, &class, "to_s", to_s);
    }
    let symbol = interp.builtins.symbol.clone();
    native_method(&interner, &kernel, &symbol, "id", symbol_id);

    let functor = interp.builtins.functor.clone();
    native_method(&interner, &kernel, &functor, "call", functor_call);

    let class = interp.builtins.class.clone();
    native_method(&interner, &kernel, &class, "new", class_new);
    native_method(&interner, &kernel, &class, "name", container_name);
    native_method(&interner, &kernel, &class, "ancestors", class_ancestor_names);

    let module = interp.builtins.module.clone();
    native_method(&interner, &kernel, &module, "name", container_name);

    kernel_function(&interner, &kernel, "puts", kernel_puts);
    kernel_function(&interner, &kernel, "print", kernel_print);
}

/// `==` for values whose language equality is their host equality: booleans,
/// nil, and symbols (interned, so id comparison).
fn host_eq(_: &mut Interpreter, receiver: Value, args: &[Value], _: Option<Value>) -> EvalResult {
    require_args("==", 1, args)?;
    Ok(Value::Bool(receiver.host_eq(&args[0])))
}

fn host_ne(_: &mut Interpreter, receiver: Value, args: &[Value], _: Option<Value>) -> EvalResult {
    require_args("!=", 1, args)?;
    Ok(Value::Bool(!receiver.host_eq(&args[0])))
}

fn to_s(interp: &mut Interpreter, receiver: Value, args: &[Value], _: Option<Value>) -> EvalResult {
    require_args("to_s", 0, args)?;
    Ok(Value::string(receiver.display(&*interp.interner)))
}

/// The stable interned id assigned at first interning.
fn symbol_id(_: &mut Interpreter, receiver: Value, args: &[Value], _: Option<Value>) -> EvalResult {
    require_args("id", 0, args)?;
    match receiver {
        Value::Symbol(sym) => Ok(Value::Int(i64::from(sym.raw()))),
        other => Err(wrong_receiver("id", "Symbol", other.type_name())),
    }
}

/// `call` on a functor invokes it; the block, when given, passes through.
fn functor_call(
    interp: &mut Interpreter,
    receiver: Value,
    args: &[Value],
    block: Option<Value>,
) -> EvalResult {
    match &receiver {
        Value::Functor(functor) => {
            let functor = functor.clone();
            interp.invoke_functor(&functor, Value::Nil, args.to_vec(), block)
        }
        other => Err(wrong_receiver("call", "Functor", other.type_name())),
    }
}

/// `new` — allocate an instance whose scope parents to the class's instance
/// scope, then dispatch `init` with the call's arguments when the class
/// defines one.
fn class_new(
    interp: &mut Interpreter,
    receiver: Value,
    args: &[Value],
    block: Option<Value>,
) -> EvalResult {
    let Value::Class(class) = &receiver else {
        return Err(wrong_receiver("new", "Class", receiver.type_name()));
    };
    let instance = Value::Instance(Instance::new(class.clone()));
    let init = interp.names.init;
    if interp.lookup_method(&instance, init).is_some() {
        interp.call_method(instance.clone(), init, args.to_vec(), block)?;
    }
    Ok(instance)
}

fn container_name(
    interp: &mut Interpreter,
    receiver: Value,
    args: &[Value],
    _: Option<Value>,
) -> EvalResult {
    require_args("name", 0, args)?;
    let name = match &receiver {
        Value::Class(class) => class.borrow().name,
        Value::Module(module) => module.borrow().name,
        other => return Err(wrong_receiver("name", "Class or Module", other.type_name())),
    };
    Ok(Value::string(interp.interner.lookup(name)))
}

/// `ancestors` — the dispatch chain beyond the class itself, as a list of
/// names in resolution order.
fn class_ancestor_names(
    interp: &mut Interpreter,
    receiver: Value,
    args: &[Value],
    _: Option<Value>,
) -> EvalResult {
    require_args("ancestors", 0, args)?;
    let Value::Class(class) = &receiver else {
        return Err(wrong_receiver("ancestors", "Class", receiver.type_name()));
    };
    let names: Vec<Value> = class_ancestors(class)
        .iter()
        .map(|ancestor| Value::string(interp.interner.lookup(ancestor.name())))
        .collect();
    Ok(Value::list(names))
}

fn display_args(interp: &Interpreter, args: &[Value]) -> Vec<String> {
    args.iter().map(|v| v.display(&*interp.interner)).collect()
}

fn kernel_puts(
    interp: &mut Interpreter,
    _: Value,
    args: &[Value],
    _: Option<Value>,
) -> Result<Value, EvalError> {
    if args.is_empty() {
        interp.print_handler.println("");
    } else {
        for line in display_args(interp, args) {
            interp.print_handler.println(&line);
        }
    }
    Ok(Value::Nil)
}

fn kernel_print(
    interp: &mut Interpreter,
    _: Value,
    args: &[Value],
    _: Option<Value>,
) -> Result<Value, EvalError> {
    for part in display_args(interp, args) {
        interp.print_handler.print(&part);
    }
    Ok(Value::Nil)
}
