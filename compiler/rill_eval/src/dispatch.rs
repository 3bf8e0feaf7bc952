//! Method dispatch.
//!
//! Builds the dispatch chain for a receiver, walks it for the named functor,
//! selects a clause by arity, and invokes it. The chain is defined by the
//! object graph: an instance searches its own scope, its class's instance
//! scope, then the class's ancestors; a class searches its static scope and
//! extended ancestors; primitives search the registered built-in class. The
//! built-in `Class`/`Module` classes terminate the class and module chains
//! so natives like `new` resolve through the same path as everything else.

use rill_ir::Sym;

use crate::environment::Scope;
use crate::errors::{arity_mismatch, no_such_method, recursion_limit, EvalResult};
use crate::interpreter::Interpreter;
use crate::shared::Shared;
use crate::value::{class_ancestors, class_extended_ancestors, Clause, Functor, UserClause, Value};

/// Bind a clause into a scope under a selector.
///
/// This is the single definition path shared by user `def` and native
/// prelude registration: an existing functor gains a clause, a missing one
/// is created.
pub(crate) fn define_method(
    scope: &Shared<Scope>,
    name: Sym,
    clause: Clause,
    lexical_scope: Shared<Scope>,
) {
    let existing = scope.borrow().get_local(name);
    match existing {
        Some(Value::Functor(functor)) => functor.borrow_mut().add_clause(clause),
        _ => {
            let functor = Functor::method(name, clause, lexical_scope);
            scope.borrow_mut().define(name, Value::Functor(functor));
        }
    }
}

impl Interpreter {
    /// Invoke `selector` on `receiver` with positional `args` and an
    /// optional block.
    #[tracing::instrument(level = "debug", skip(self, receiver, args, block))]
    pub fn call_method(
        &mut self,
        receiver: Value,
        selector: Sym,
        args: Vec<Value>,
        block: Option<Value>,
    ) -> EvalResult {
        match self.lookup_method(&receiver, selector) {
            Some(functor) => self.invoke_functor(&functor, receiver, args, block),
            None => {
                let method = self.interner.lookup(selector);
                let type_name = receiver.type_name_with_interner(&*self.interner);
                Err(no_such_method(method, &type_name))
            }
        }
    }

    /// Walk the receiver's dispatch chain for the named functor.
    pub fn lookup_method(&self, receiver: &Value, selector: Sym) -> Option<Shared<Functor>> {
        for scope in self.dispatch_chain(receiver) {
            // Only functor bindings are methods; data bindings in a chain
            // scope are skipped.
            if let Some(Value::Functor(functor)) = scope.borrow().get_local(selector) {
                return Some(functor);
            }
        }
        None
    }

    /// The ordered scopes searched when dispatching on `receiver`.
    fn dispatch_chain(&self, receiver: &Value) -> Vec<Shared<Scope>> {
        match receiver {
            Value::Instance(instance) => {
                let (own_scope, class) = {
                    let i = instance.borrow();
                    (i.scope.clone(), i.class.clone())
                };
                let mut chain = vec![own_scope, class.borrow().instance_scope.clone()];
                chain.extend(
                    class_ancestors(&class)
                        .iter()
                        .map(|a| a.dispatch_scope()),
                );
                chain
            }
            Value::Class(class) => {
                let mut chain = vec![class.borrow().static_scope.clone()];
                chain.extend(
                    class_extended_ancestors(class)
                        .iter()
                        .map(|a| a.dispatch_scope()),
                );
                chain.push(self.builtins.class.borrow().instance_scope.clone());
                chain
            }
            Value::Module(module) => vec![
                module.borrow().scope.clone(),
                self.builtins.module.borrow().instance_scope.clone(),
            ],
            primitive => {
                let class = self.builtins.class_for_primitive(primitive);
                let scope = class.borrow().instance_scope.clone();
                vec![scope]
            }
        }
    }

    /// Invoke a functor: select a clause by arity and run it.
    ///
    /// `self` inside the body resolves to the functor's `closed_self` when
    /// present, else to `receiver`.
    pub fn invoke_functor(
        &mut self,
        functor: &Shared<Functor>,
        receiver: Value,
        args: Vec<Value>,
        block: Option<Value>,
    ) -> EvalResult {
        let (clause, closure, lexical_scope, closed_self, name) = {
            let f = functor.borrow();
            (
                f.select_clause(args.len()),
                f.closure,
                f.lexical_scope.clone(),
                f.closed_self.clone(),
                f.name,
            )
        };
        let Some(clause) = clause else {
            return Err(arity_mismatch(self.interner.lookup(name), args.len()));
        };

        self.enter_call()?;
        let result = match clause {
            Clause::Native(native) => native(self, receiver, &args, block),
            Clause::User(clause) => {
                let frame_parent = if closure { Some(lexical_scope) } else { None };
                self.env.push_frame(frame_parent);
                bind_clause_params(self, &clause, &args, block);
                self.self_stack.push(closed_self.unwrap_or(receiver));

                let arena = clause.arena.clone();
                let result = self.eval(&arena, clause.body);

                self.self_stack.pop();
                self.env.pop_scope();
                result
            }
        };
        self.exit_call();
        result
    }

    fn enter_call(&mut self) -> Result<(), crate::errors::EvalError> {
        self.call_depth += 1;
        if self.call_depth > self.max_call_depth {
            self.call_depth -= 1;
            return Err(recursion_limit(self.max_call_depth));
        }
        Ok(())
    }

    fn exit_call(&mut self) {
        self.call_depth -= 1;
    }
}

/// Bind a user clause's parameters in the freshly pushed frame.
///
/// Positional parameters bind by position; the splat parameter collects the
/// middle of the argument list as a `List`; parameters after the splat bind
/// from the tail. The block parameter binds the block functor, or nil when
/// no block was supplied.
fn bind_clause_params(
    interp: &mut Interpreter,
    clause: &UserClause,
    args: &[Value],
    block: Option<Value>,
) {
    match clause.splat {
        None => {
            for (param, arg) in clause.params.iter().zip(args.iter()) {
                interp.env.define(*param, arg.clone());
            }
        }
        Some(splat_index) => {
            let trailing = clause.params.len() - splat_index - 1;
            let tail_start = args.len() - trailing;

            for (param, arg) in clause.params[..splat_index].iter().zip(args.iter()) {
                interp.env.define(*param, arg.clone());
            }
            let collected = args[splat_index..tail_start].to_vec();
            interp
                .env
                .define(clause.params[splat_index], Value::list(collected));
            for (param, arg) in clause.params[splat_index + 1..]
                .iter()
                .zip(args[tail_start..].iter())
            {
                interp.env.define(*param, arg.clone());
            }
        }
    }
    if let Some(block_param) = clause.block_param {
        interp
            .env
            .define(block_param, block.unwrap_or(Value::Nil));
    }
}
