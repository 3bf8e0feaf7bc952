//! Environment for name binding.
//!
//! A `Scope` is a name→value table with an optional lexical parent; the
//! `Environment` is a stack of scopes with the kernel scope always at the
//! bottom. Closure frames parent to the functor's captured lexical scope;
//! plain call frames have no parent, which is what makes a call a proper
//! boundary.

use rustc_hash::FxHashMap;

use rill_ir::Sym;

use crate::shared::Shared;
use crate::value::Value;

/// A single scope containing name bindings.
#[derive(Default)]
pub struct Scope {
    bindings: FxHashMap<Sym, Value>,
    parent: Option<Shared<Scope>>,
}

impl Scope {
    /// Create a new empty scope with no parent.
    pub fn new() -> Self {
        Scope::default()
    }

    /// Create a new scope with a lexical parent.
    pub fn with_parent(parent: Shared<Scope>) -> Self {
        Scope {
            bindings: FxHashMap::default(),
            parent: Some(parent),
        }
    }

    /// Define a name in this scope, shadowing any outer binding.
    #[inline]
    pub fn define(&mut self, name: Sym, value: Value) {
        self.bindings.insert(name, value);
    }

    /// Look up a name in this scope only, ignoring parents.
    ///
    /// Method dispatch walks chains with this so the ancestor order, not the
    /// parent pointers, decides precedence.
    #[inline]
    pub fn get_local(&self, name: Sym) -> Option<Value> {
        self.bindings.get(&name).cloned()
    }

    /// Look up a name, searching outward through parents.
    pub fn lookup(&self, name: Sym) -> Option<Value> {
        if let Some(value) = self.bindings.get(&name) {
            return Some(value.clone());
        }
        if let Some(parent) = &self.parent {
            return parent.borrow().lookup(name);
        }
        None
    }

    /// Assign to an existing binding, searching outward through parents.
    ///
    /// Returns false when no enclosing scope holds the name; the caller then
    /// defines it at the top of the stack.
    pub fn assign(&mut self, name: Sym, value: Value) -> bool {
        if let Some(slot) = self.bindings.get_mut(&name) {
            *slot = value;
            return true;
        }
        if let Some(parent) = &self.parent {
            return parent.borrow_mut().assign(name, value);
        }
        false
    }

    /// True when this scope itself binds the name.
    #[inline]
    pub fn contains_local(&self, name: Sym) -> bool {
        self.bindings.contains_key(&name)
    }

    /// Number of bindings in this scope alone.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl std::fmt::Debug for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Parents are elided: scope graphs are cyclic through closures.
        f.debug_struct("Scope")
            .field("bindings", &self.bindings.len())
            .field("has_parent", &self.parent.is_some())
            .finish()
    }
}

/// Scope stack for the interpreter.
///
/// The kernel scope sits at the bottom and is never popped; it holds the
/// built-in classes and top-level bindings.
pub struct Environment {
    scopes: Vec<Shared<Scope>>,
    kernel: Shared<Scope>,
}

impl Environment {
    /// Create an environment whose only scope is a fresh kernel scope.
    pub fn new() -> Self {
        let kernel = Shared::new(Scope::new());
        Environment {
            scopes: vec![kernel.clone()],
            kernel,
        }
    }

    /// The kernel (root) scope.
    pub fn kernel(&self) -> &Shared<Scope> {
        &self.kernel
    }

    /// The scope at the top of the stack.
    #[inline]
    pub fn current_scope(&self) -> Shared<Scope> {
        self.scopes.last().unwrap_or(&self.kernel).clone()
    }

    /// Current stack depth.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Push a lexical scope whose parent is the current top.
    ///
    /// Used around block bodies and declaration bodies, where inner code
    /// sees the enclosing bindings.
    #[inline]
    pub fn push_scope(&mut self) {
        let parent = self.current_scope();
        self.scopes.push(Shared::new(Scope::with_parent(parent)));
    }

    /// Push a call frame.
    ///
    /// A closure frame parents to the functor's captured lexical scope; a
    /// plain frame has no parent at all, so caller locals are invisible.
    #[inline]
    pub fn push_frame(&mut self, parent: Option<Shared<Scope>>) {
        let scope = match parent {
            Some(p) => Scope::with_parent(p),
            None => Scope::new(),
        };
        self.scopes.push(Shared::new(scope));
    }

    /// Pop the top scope. The kernel scope at the bottom stays.
    #[inline]
    pub fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// Define a name in the current scope.
    #[inline]
    pub fn define(&mut self, name: Sym, value: Value) {
        self.current_scope().borrow_mut().define(name, value);
    }

    /// Look up a name from the current scope outward.
    #[inline]
    pub fn lookup(&self, name: Sym) -> Option<Value> {
        self.scopes
            .last()
            .unwrap_or(&self.kernel)
            .borrow()
            .lookup(name)
    }

    /// Assign a name: mutate the nearest enclosing binding, or define in the
    /// current scope when no enclosing scope holds the name.
    pub fn assign(&mut self, name: Sym, value: Value) {
        let top = self.current_scope();
        let assigned = top.borrow_mut().assign(name, value.clone());
        if !assigned {
            top.borrow_mut().define(name, value);
        }
    }

    /// Define a name in the kernel scope.
    pub fn define_kernel(&mut self, name: Sym, value: Value) {
        self.kernel.borrow_mut().define(name, value);
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(raw: u32) -> Sym {
        Sym::from_raw(raw)
    }

    #[test]
    fn lookup_searches_outward() {
        let mut env = Environment::new();
        env.define(sym(1), Value::Int(10));
        env.push_scope();
        env.define(sym(2), Value::Int(20));

        assert_eq!(env.lookup(sym(1)), Some(Value::Int(10)));
        assert_eq!(env.lookup(sym(2)), Some(Value::Int(20)));
        assert_eq!(env.lookup(sym(3)), None);
    }

    #[test]
    fn inner_binding_shadows_outer() {
        let mut env = Environment::new();
        env.define(sym(1), Value::Int(1));
        env.push_scope();
        env.define(sym(1), Value::Int(2));
        assert_eq!(env.lookup(sym(1)), Some(Value::Int(2)));
        env.pop_scope();
        assert_eq!(env.lookup(sym(1)), Some(Value::Int(1)));
    }

    #[test]
    fn assign_mutates_nearest_enclosing_binding() {
        let mut env = Environment::new();
        env.define(sym(1), Value::Int(1));
        env.push_scope();
        env.assign(sym(1), Value::Int(2));
        env.pop_scope();
        // The outer binding was mutated, not shadowed.
        assert_eq!(env.lookup(sym(1)), Some(Value::Int(2)));
    }

    #[test]
    fn assign_defines_in_innermost_scope_when_missing() {
        let mut env = Environment::new();
        env.push_scope();
        env.assign(sym(1), Value::Int(5));
        assert_eq!(env.lookup(sym(1)), Some(Value::Int(5)));
        env.pop_scope();
        // The binding lived in the popped scope.
        assert_eq!(env.lookup(sym(1)), None);
    }

    #[test]
    fn plain_frame_hides_caller_locals() {
        let mut env = Environment::new();
        env.push_scope();
        env.define(sym(1), Value::Int(1));
        env.push_frame(None);
        assert_eq!(env.lookup(sym(1)), None);
        env.pop_scope();
        assert_eq!(env.lookup(sym(1)), Some(Value::Int(1)));
    }

    #[test]
    fn closure_frame_sees_captured_scope() {
        let mut env = Environment::new();
        env.push_scope();
        env.define(sym(1), Value::Int(7));
        let captured = env.current_scope();
        env.pop_scope();

        env.push_frame(Some(captured));
        assert_eq!(env.lookup(sym(1)), Some(Value::Int(7)));
    }

    #[test]
    fn kernel_scope_survives_pops() {
        let mut env = Environment::new();
        env.pop_scope();
        env.pop_scope();
        env.define(sym(1), Value::Int(1));
        assert_eq!(env.lookup(sym(1)), Some(Value::Int(1)));
        assert_eq!(env.depth(), 1);
    }
}
