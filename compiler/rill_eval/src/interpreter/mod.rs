//! Tree-walking interpreter driver.
//!
//! The driver walks arena-allocated expressions, using the environment for
//! name binding, the value module for construction and mutation, and the
//! dispatch module for every method call. Functor clauses carry their own
//! arena, so evaluation always resolves ids against the callee's arena.
//!
//! Evaluation is single-threaded and synchronous: a call returns when its
//! body returns, and all side effects are ordered by evaluation order.

mod builder;
mod names;

pub use builder::{InterpreterBuilder, DEFAULT_MAX_CALL_DEPTH};
pub(crate) use names::SelectorNames;

use tracing::debug;

use rill_ir::{ExprId, ExprKind, ExprRange, MethodDef, ParamRange, Program, SharedArena,
    SharedInterner, Sym, UnaryOp};

use crate::dispatch::define_method;
use crate::environment::Environment;
use crate::errors::{
    interpreter_bug, ivar_on_primitive, mixin_not_a_module, no_such_method, not_callable,
    superclass_not_a_class, unresolved_identifier, EvalError, EvalResult,
};
use crate::natives::Builtins;
use crate::print_handler::SharedPrintHandler;
use crate::shared::Shared;
use crate::value::{ClassDef, Clause, Functor, MapValue, ModuleDef, UserClause, Value};

/// The interpreter: kernel scope, built-in classes, scope stack, and the
/// current-self stack.
pub struct Interpreter {
    pub(crate) interner: SharedInterner,
    pub(crate) env: Environment,
    pub(crate) builtins: Builtins,
    pub(crate) names: SelectorNames,
    pub(crate) self_stack: Vec<Value>,
    pub(crate) call_depth: usize,
    pub(crate) max_call_depth: usize,
    pub(crate) print_handler: SharedPrintHandler,
}

impl Interpreter {
    /// Construct an interpreter with the kernel scope populated and all
    /// built-in classes registered.
    pub fn new() -> Self {
        InterpreterBuilder::new().build()
    }

    /// The interner shared with the parser collaborator.
    pub fn interner(&self) -> &SharedInterner {
        &self.interner
    }

    /// The environment (kernel scope at the bottom).
    pub fn env(&self) -> &Environment {
        &self.env
    }

    pub fn env_mut(&mut self) -> &mut Environment {
        &mut self.env
    }

    /// Evaluate a program, returning the value of its last expression.
    pub fn run(&mut self, program: &Program) -> EvalResult {
        self.eval_seq(&program.arena, program.body)
    }

    /// The receiver of the innermost active method, nil at top level.
    pub fn current_self(&self) -> Value {
        self.self_stack.last().cloned().unwrap_or(Value::Nil)
    }

    fn eval_seq(&mut self, arena: &SharedArena, range: ExprRange) -> EvalResult {
        let mut last = Value::Nil;
        for &id in arena.ids(range) {
            last = self.eval(arena, id)?;
        }
        Ok(last)
    }

    /// Evaluate one expression.
    pub(crate) fn eval(&mut self, arena: &SharedArena, id: ExprId) -> EvalResult {
        let kind = arena.get(id).kind;
        match kind {
            ExprKind::Int(n) => Ok(Value::Int(n)),
            ExprKind::Float(x) => Ok(Value::Float(x)),
            ExprKind::Bool(b) => Ok(Value::Bool(b)),
            ExprKind::Str(text) => Ok(Value::string(self.interner.lookup(text))),
            ExprKind::Symbol(sym) => Ok(Value::Symbol(sym)),
            ExprKind::Nil => Ok(Value::Nil),

            ExprKind::List(elements) => {
                let mut items = Vec::with_capacity(elements.len());
                for &element in arena.ids(elements) {
                    items.push(self.eval(arena, element)?);
                }
                Ok(Value::list(items))
            }
            ExprKind::Map(entries) => {
                let map = Shared::new(MapValue::new());
                for pair in arena.ids(entries).chunks_exact(2) {
                    let key = self.eval(arena, pair[0])?;
                    let value = self.eval(arena, pair[1])?;
                    crate::natives::map::map_store(self, &map, key, value)?;
                }
                Ok(Value::Map(map))
            }

            ExprKind::Ident(name) => self.eval_ident(name),
            ExprKind::Assign { name, value } => {
                let value = self.eval(arena, value)?;
                self.env.assign(name, value.clone());
                Ok(value)
            }

            ExprKind::IvarGet(name) => {
                let receiver = self.current_self();
                receiver
                    .ivar_get(name)
                    .ok_or_else(|| ivar_on_primitive(receiver.type_name()))
            }
            ExprKind::IvarSet { name, value } => {
                let value = self.eval(arena, value)?;
                let receiver = self.current_self();
                receiver
                    .ivar_set(name, value.clone())
                    .ok_or_else(|| ivar_on_primitive(receiver.type_name()))?;
                Ok(value)
            }

            ExprKind::Binary { op, left, right } => match self.names.binary(op) {
                Some(selector) => {
                    let left = self.eval(arena, left)?;
                    let right = self.eval(arena, right)?;
                    self.call_method(left, selector, vec![right], None)
                }
                // && and || short-circuit on truthiness.
                None => {
                    let left = self.eval(arena, left)?;
                    let take_right = match op {
                        rill_ir::BinaryOp::And => left.is_truthy(),
                        rill_ir::BinaryOp::Or => !left.is_truthy(),
                        _ => return Err(interpreter_bug("non-logical operator without selector")),
                    };
                    if take_right {
                        self.eval(arena, right)
                    } else {
                        Ok(left)
                    }
                }
            },
            ExprKind::Unary { op, operand } => {
                let operand = self.eval(arena, operand)?;
                match op {
                    // Logical negation is truthiness-driven, like && and ||.
                    UnaryOp::Not => Ok(Value::Bool(!operand.is_truthy())),
                    UnaryOp::Neg => self.call_method(operand, self.names.neg, vec![], None),
                }
            }

            ExprKind::Index { receiver, index } => {
                let receiver = self.eval(arena, receiver)?;
                let index = self.eval(arena, index)?;
                self.call_method(receiver, self.names.index, vec![index], None)
            }
            ExprKind::IndexSet {
                receiver,
                index,
                value,
            } => {
                let receiver = self.eval(arena, receiver)?;
                let index = self.eval(arena, index)?;
                let value = self.eval(arena, value)?;
                self.call_method(receiver, self.names.index_set, vec![index, value], None)
            }

            ExprKind::MethodCall {
                receiver,
                name,
                args,
                block,
            } => {
                let receiver = match receiver {
                    Some(expr) => Some(self.eval(arena, expr)?),
                    None => None,
                };
                let mut arg_values = Vec::with_capacity(args.len());
                for &arg in arena.ids(args) {
                    arg_values.push(self.eval(arena, arg)?);
                }
                let block = match block {
                    Some(expr) => Some(self.eval(arena, expr)?),
                    None => None,
                };
                match receiver {
                    Some(receiver) => self.call_method(receiver, name, arg_values, block),
                    None => self.eval_bare_call(name, arg_values, block),
                }
            }

            ExprKind::Block { params, body } => Ok(self.make_block(arena, params, body)),

            ExprKind::MethodDef(def) => self.eval_method_def(arena, &def),

            ExprKind::ModuleDecl { name, body } => self.eval_module_decl(arena, name, body),
            ExprKind::ClassDecl {
                name,
                superclass,
                body,
            } => self.eval_class_decl(arena, name, superclass, body),

            ExprKind::Include(name) => self.eval_mixin(name, MixinKind::Include),
            ExprKind::Extend(name) => self.eval_mixin(name, MixinKind::Extend),

            ExprKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.eval(arena, condition)?.is_truthy() {
                    self.eval(arena, then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.eval(arena, else_branch)
                } else {
                    Ok(Value::Nil)
                }
            }
            ExprKind::While { condition, body } => {
                while self.eval(arena, condition)?.is_truthy() {
                    self.eval(arena, body)?;
                }
                Ok(Value::Nil)
            }

            ExprKind::Seq(body) => self.eval_seq(arena, body),
            ExprKind::SelfRef => Ok(self.current_self()),
        }
    }

    /// Resolve a bare identifier: locals outward, then the kernel scope,
    /// then a zero-argument method on the current self.
    fn eval_ident(&mut self, name: Sym) -> EvalResult {
        if let Some(value) = self.lookup_name(name) {
            return Ok(value);
        }
        let receiver = self.current_self();
        if self.lookup_method(&receiver, name).is_some() {
            return self.call_method(receiver, name, vec![], None);
        }
        Err(unresolved_identifier(self.interner.lookup(name)))
    }

    /// A call without an explicit receiver: a functor bound in scope is
    /// invoked with the current self as receiver; otherwise the selector
    /// dispatches on the current self.
    fn eval_bare_call(
        &mut self,
        name: Sym,
        args: Vec<Value>,
        block: Option<Value>,
    ) -> EvalResult {
        let binding = self.lookup_name(name);
        if let Some(Value::Functor(functor)) = &binding {
            let functor = functor.clone();
            let receiver = self.current_self();
            return self.invoke_functor(&functor, receiver, args, block);
        }
        let receiver = self.current_self();
        if self.lookup_method(&receiver, name).is_some() {
            return self.call_method(receiver, name, args, block);
        }
        match binding {
            Some(other) => Err(not_callable(
                self.interner.lookup(name),
                other.type_name(),
            )),
            None => Err(no_such_method(
                self.interner.lookup(name),
                &receiver.type_name_with_interner(&*self.interner),
            )),
        }
    }

    /// Look a name up through the current scope chain, falling back to the
    /// kernel scope (call frames have no parent, but globals and built-in
    /// classes stay reachable).
    pub(crate) fn lookup_name(&self, name: Sym) -> Option<Value> {
        self.env
            .lookup(name)
            .or_else(|| self.env.kernel().borrow().get_local(name))
    }

    /// Build a closure functor for a block literal: captures the current
    /// scope and the current self.
    fn make_block(&mut self, arena: &SharedArena, params: ParamRange, body: ExprId) -> Value {
        let clause = UserClause {
            params: arena.params(params).to_vec(),
            splat: None,
            block_param: None,
            body,
            arena: arena.clone(),
        };
        let functor = Functor::block(
            self.names.block,
            Clause::User(clause),
            self.env.current_scope(),
            self.current_self(),
        );
        Value::Functor(functor)
    }

    /// Bind a method definition into the scope the current self defines
    /// into: a class's instance or static scope, a module's scope, or the
    /// kernel scope at top level.
    fn eval_method_def(&mut self, arena: &SharedArena, def: &MethodDef) -> EvalResult {
        let clause = Clause::User(UserClause {
            params: arena.params(def.params).to_vec(),
            splat: def.splat.map(|i| i as usize),
            block_param: def.block_param,
            body: def.body,
            arena: arena.clone(),
        });
        let target = match self.current_self() {
            Value::Class(class) => {
                let class = class.borrow();
                if def.is_static {
                    class.static_scope.clone()
                } else {
                    class.instance_scope.clone()
                }
            }
            Value::Module(module) => module.borrow().scope.clone(),
            _ => self.env.kernel().clone(),
        };
        define_method(&target, def.name, clause, self.env.current_scope());
        Ok(Value::Symbol(def.name))
    }

    /// Create or reopen a module, then evaluate its body with the module as
    /// self.
    fn eval_module_decl(&mut self, arena: &SharedArena, name: Sym, body: ExprRange) -> EvalResult {
        let module = match self.lookup_name(name) {
            Some(Value::Module(module)) => module,
            _ => {
                debug!(module = self.interner.lookup(name), "declaring module");
                let module = ModuleDef::new(name);
                self.env.define(name, Value::Module(module.clone()));
                module
            }
        };
        let value = Value::Module(module);
        self.eval_decl_body(arena, body, value.clone())?;
        Ok(value)
    }

    /// Create or reopen a class, then evaluate its body with the class as
    /// self. A redeclared class keeps its original superclass.
    fn eval_class_decl(
        &mut self,
        arena: &SharedArena,
        name: Sym,
        superclass: Option<Sym>,
        body: ExprRange,
    ) -> EvalResult {
        let class = match self.lookup_name(name) {
            Some(Value::Class(class)) => class,
            _ => {
                let parent = match superclass {
                    Some(sup) => match self.lookup_name(sup) {
                        Some(Value::Class(parent)) => Some(parent),
                        _ => return Err(superclass_not_a_class(self.interner.lookup(sup))),
                    },
                    None => None,
                };
                debug!(class = self.interner.lookup(name), "declaring class");
                let class = ClassDef::new(name, parent);
                self.env.define(name, Value::Class(class.clone()));
                class
            }
        };
        let value = Value::Class(class);
        self.eval_decl_body(arena, body, value.clone())?;
        Ok(value)
    }

    fn eval_decl_body(
        &mut self,
        arena: &SharedArena,
        body: ExprRange,
        definee: Value,
    ) -> Result<(), EvalError> {
        self.env.push_scope();
        self.self_stack.push(definee);
        let result = self.eval_seq(arena, body);
        self.self_stack.pop();
        self.env.pop_scope();
        result.map(|_| ())
    }

    /// Prepend a module to the current definee's inclusion or extension
    /// list. Most recent mixin is searched first.
    fn eval_mixin(&mut self, name: Sym, kind: MixinKind) -> EvalResult {
        let module = match self.lookup_name(name) {
            Some(Value::Module(module)) => module,
            _ => return Err(mixin_not_a_module(self.interner.lookup(name))),
        };
        let definee = self.current_self();
        match (&definee, kind) {
            (Value::Class(class), MixinKind::Include) => {
                class.borrow_mut().include_module(module);
            }
            (Value::Class(class), MixinKind::Extend) => {
                class.borrow_mut().extend_module(module);
            }
            (Value::Module(target), MixinKind::Include) => {
                target.borrow_mut().include_module(module);
            }
            _ => {
                return Err(mixin_not_a_module(
                    &definee.type_name_with_interner(&*self.interner),
                ))
            }
        }
        Ok(definee)
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Copy, Clone)]
enum MixinKind {
    Include,
    Extend,
}
