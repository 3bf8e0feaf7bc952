//! Runtime values.
//!
//! The value domain is a tagged union: primitive variants are inline, heap
//! variants share one allocation through `Shared<T>`. Heap values are
//! mutated in place; primitives carry no per-object state, which is why
//! instance-variable access on them is a type-misuse error.
//!
//! Host-level equality (`host_eq`, also `PartialEq`) exists for the map
//! internals and for tests; it never substitutes for the language-level `==`
//! operator, which is a dispatched method.

mod functor;
mod map;
mod object;

use std::rc::Rc;

use rustc_hash::FxHashMap;

use rill_ir::{StringLookup, Sym};

pub use functor::{Clause, Functor, NativeFn, UserClause};
pub use map::MapValue;
pub use object::{
    class_ancestors, class_extended_ancestors, Ancestor, ClassDef, Instance, ModuleDef,
};

use crate::shared::Shared;

/// Per-object instance-variable table.
pub type Ivars = FxHashMap<Sym, Value>;

/// Ordered, mutable sequence of values.
#[derive(Default, Debug)]
pub struct ListValue {
    pub items: Vec<Value>,
    pub ivars: Ivars,
}

impl ListValue {
    pub fn new(items: Vec<Value>) -> Self {
        ListValue {
            items,
            ivars: Ivars::default(),
        }
    }
}

/// Runtime value.
#[derive(Clone)]
pub enum Value {
    /// 64-bit signed integer.
    Int(i64),
    /// 64-bit IEEE-754 float.
    Float(f64),
    /// Boolean.
    Bool(bool),
    /// Immutable Unicode text.
    Str(Rc<str>),
    /// The nil singleton: every `Nil` is the same logical object.
    Nil,
    /// Interned symbol; equal names share one id.
    Symbol(Sym),
    /// Mutable list.
    List(Shared<ListValue>),
    /// Insertion-ordered map.
    Map(Shared<MapValue>),
    /// Object of a user-defined class.
    Instance(Shared<Instance>),
    /// Named namespace.
    Module(Shared<ModuleDef>),
    /// Class object.
    Class(Shared<ClassDef>),
    /// Named callable.
    Functor(Shared<Functor>),
}

// Factory methods: the only way heap values are constructed.

impl Value {
    /// Create a string value.
    #[inline]
    pub fn string(s: impl AsRef<str>) -> Self {
        Value::Str(Rc::from(s.as_ref()))
    }

    /// Create a list value.
    #[inline]
    pub fn list(items: Vec<Value>) -> Self {
        Value::List(Shared::new(ListValue::new(items)))
    }

    /// Create an empty map value.
    #[inline]
    pub fn empty_map() -> Self {
        Value::Map(Shared::new(MapValue::new()))
    }

    /// Wrap map storage.
    #[inline]
    pub fn map(map: MapValue) -> Self {
        Value::Map(Shared::new(map))
    }
}

impl Value {
    /// Truthiness: only nil and false are non-truthy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Nil | Value::Bool(false))
    }

    /// The built-in class name for this value's variant.
    ///
    /// Instances report `"Instance"` here; `type_name_with_interner` resolves
    /// their class name.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "Integer",
            Value::Float(_) => "Float",
            Value::Bool(_) => "Boolean",
            Value::Str(_) => "String",
            Value::Nil => "Nil",
            Value::Symbol(_) => "Symbol",
            Value::List(_) => "List",
            Value::Map(_) => "Map",
            Value::Instance(_) => "Instance",
            Value::Module(_) => "Module",
            Value::Class(_) => "Class",
            Value::Functor(_) => "Functor",
        }
    }

    /// The concrete type name, resolving instance class names.
    pub fn type_name_with_interner<I: StringLookup>(&self, interner: &I) -> String {
        match self {
            Value::Instance(instance) => {
                let class_name = instance.borrow().class.borrow().name;
                interner.lookup(class_name).to_string()
            }
            other => other.type_name().to_string(),
        }
    }

    /// Whether this value carries a per-object binding table.
    pub fn supports_ivars(&self) -> bool {
        !matches!(
            self,
            Value::Int(_)
                | Value::Float(_)
                | Value::Bool(_)
                | Value::Str(_)
                | Value::Nil
                | Value::Symbol(_)
        )
    }

    /// Read an instance variable; unset variables read as nil.
    ///
    /// Returns `None` for primitives, which carry no binding table — the
    /// driver reports that as a type-misuse error.
    pub fn ivar_get(&self, name: Sym) -> Option<Value> {
        let read = |ivars: &Ivars| ivars.get(&name).cloned().unwrap_or(Value::Nil);
        match self {
            Value::List(v) => Some(read(&v.borrow().ivars)),
            Value::Map(v) => Some(read(&v.borrow().ivars)),
            Value::Instance(v) => Some(read(&v.borrow().ivars)),
            Value::Module(v) => Some(read(&v.borrow().ivars)),
            Value::Class(v) => Some(read(&v.borrow().ivars)),
            Value::Functor(v) => Some(read(&v.borrow().ivars)),
            _ => None,
        }
    }

    /// Write an instance variable. Returns `None` for primitives.
    pub fn ivar_set(&self, name: Sym, value: Value) -> Option<()> {
        match self {
            Value::List(v) => v.borrow_mut().ivars.insert(name, value),
            Value::Map(v) => v.borrow_mut().ivars.insert(name, value),
            Value::Instance(v) => v.borrow_mut().ivars.insert(name, value),
            Value::Module(v) => v.borrow_mut().ivars.insert(name, value),
            Value::Class(v) => v.borrow_mut().ivars.insert(name, value),
            Value::Functor(v) => v.borrow_mut().ivars.insert(name, value),
            _ => return None,
        };
        Some(())
    }

    /// Host-level structural equality.
    ///
    /// Primitives compare by content (an integer is never host-equal to a
    /// float), lists and maps elementwise, and every other heap value by
    /// identity. The map internals and the subset operators use this; the
    /// language-level `==` is dispatched.
    pub fn host_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Nil, Value::Nil) => true,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::List(a), Value::List(b)) => {
                Shared::ptr_eq(a, b) || {
                    let (a, b) = (a.borrow(), b.borrow());
                    a.items.len() == b.items.len()
                        && a.items.iter().zip(b.items.iter()).all(|(x, y)| x.host_eq(y))
                }
            }
            (Value::Map(a), Value::Map(b)) => {
                Shared::ptr_eq(a, b) || {
                    let (a, b) = (a.borrow(), b.borrow());
                    a.len() == b.len()
                        && a.entries()
                            .iter()
                            .all(|(k, v)| b.get_host(k).is_some_and(|w| v.host_eq(w)))
                }
            }
            (Value::Instance(a), Value::Instance(b)) => Shared::ptr_eq(a, b),
            (Value::Module(a), Value::Module(b)) => Shared::ptr_eq(a, b),
            (Value::Class(a), Value::Class(b)) => Shared::ptr_eq(a, b),
            (Value::Functor(a), Value::Functor(b)) => Shared::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Render for user output.
    pub fn display<I: StringLookup>(&self, interner: &I) -> String {
        match self {
            Value::Int(n) => n.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Str(s) => s.to_string(),
            Value::Nil => String::new(),
            Value::Symbol(sym) => interner.lookup(*sym).to_string(),
            Value::List(items) => {
                let inner: Vec<_> = items
                    .borrow()
                    .items
                    .iter()
                    .map(|v| v.display(interner))
                    .collect();
                format!("[{}]", inner.join(", "))
            }
            Value::Map(map) => {
                let inner: Vec<_> = map
                    .borrow()
                    .entries()
                    .iter()
                    .map(|(k, v)| format!("{} => {}", k.display(interner), v.display(interner)))
                    .collect();
                format!("{{{}}}", inner.join(", "))
            }
            Value::Instance(instance) => {
                let class_name = instance.borrow().class.borrow().name;
                format!("#<{}>", interner.lookup(class_name))
            }
            Value::Module(m) => format!("module {}", interner.lookup(m.borrow().name)),
            Value::Class(c) => interner.lookup(c.borrow().name).to_string(),
            Value::Functor(f) => format!("#<functor {}>", interner.lookup(f.borrow().name)),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.host_eq(other)
    }
}

impl std::fmt::Debug for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Int(n) => write!(f, "Int({n})"),
            Value::Float(x) => write!(f, "Float({x})"),
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::Str(s) => write!(f, "Str({s:?})"),
            Value::Nil => write!(f, "Nil"),
            Value::Symbol(sym) => write!(f, "Symbol({})", sym.raw()),
            Value::List(items) => f.debug_list().entries(items.borrow().items.iter()).finish(),
            Value::Map(map) => write!(f, "{:?}", map.borrow()),
            // Object graphs are cyclic through scopes; stay shallow.
            Value::Instance(i) => write!(f, "Instance({:?})", i.borrow().class.borrow().name),
            Value::Module(m) => write!(f, "Module({:?})", m.borrow().name),
            Value::Class(c) => write!(f, "Class({:?})", c.borrow().name),
            Value::Functor(func) => write!(f, "Functor({:?})", func.borrow().name),
        }
    }
}
