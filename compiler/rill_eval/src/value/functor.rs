//! Functors: named multi-clause callables.
//!
//! A functor unifies user-defined methods and native built-ins: its clauses
//! are either AST bodies (with parameter lists, an optional splat, and an
//! optional block parameter) or host function pointers. The `closure` flag
//! selects the frame-creation strategy at invocation: closures parent their
//! frame to `lexical_scope`, plain calls get a bare frame.

use rill_ir::{ExprId, SharedArena, Sym};

use crate::environment::Scope;
use crate::errors::EvalResult;
use crate::interpreter::Interpreter;
use crate::shared::Shared;
use crate::value::{Ivars, Value};

/// A built-in operation registered as a clause.
///
/// Receives the interpreter handle for re-entrant dispatched calls (language
/// `==`, block invocation); errors from those calls must be propagated, not
/// swallowed.
pub type NativeFn = fn(&mut Interpreter, Value, &[Value], Option<Value>) -> EvalResult;

/// A user-defined clause: a parameter list and an AST body.
///
/// The arena travels with the clause so the body ids stay resolvable after
/// the defining walk returns.
#[derive(Clone)]
pub struct UserClause {
    pub params: Vec<Sym>,
    /// Index within `params` of the splat parameter, if any.
    pub splat: Option<usize>,
    pub block_param: Option<Sym>,
    pub body: ExprId,
    pub arena: SharedArena,
}

impl UserClause {
    /// Whether this clause's arity accepts `argc` positional arguments.
    pub fn accepts(&self, argc: usize) -> bool {
        match self.splat {
            // The splat parameter absorbs any tail, including an empty one.
            Some(_) => argc + 1 >= self.params.len(),
            None => argc == self.params.len(),
        }
    }
}

impl std::fmt::Debug for UserClause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserClause")
            .field("params", &self.params)
            .field("splat", &self.splat)
            .field("block_param", &self.block_param)
            .field("body", &self.body)
            .finish()
    }
}

/// One implementation body of a functor.
#[derive(Clone)]
pub enum Clause {
    User(UserClause),
    Native(NativeFn),
}

impl Clause {
    /// Whether this clause accepts `argc` positional arguments. Native
    /// clauses validate their own arity and accept any count here.
    pub fn accepts(&self, argc: usize) -> bool {
        match self {
            Clause::User(clause) => clause.accepts(argc),
            Clause::Native(_) => true,
        }
    }
}

impl std::fmt::Debug for Clause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Clause::User(clause) => write!(f, "{clause:?}"),
            Clause::Native(_) => write!(f, "Native"),
        }
    }
}

/// A named callable holding one or more clauses.
pub struct Functor {
    pub name: Sym,
    pub clauses: Vec<Clause>,
    /// The scope the functor was defined in. Only consulted when `closure`
    /// is set.
    pub lexical_scope: Shared<Scope>,
    /// Closures parent their call frame to `lexical_scope`; plain functors
    /// get a bare frame (a proper call boundary).
    pub closure: bool,
    /// Receiver bound at capture time; takes precedence over the call-site
    /// receiver for `self` inside the body.
    pub closed_self: Option<Value>,
    pub ivars: Ivars,
}

impl Functor {
    /// A method functor: no lexical capture, `self` comes from the call site.
    pub fn method(name: Sym, clause: Clause, lexical_scope: Shared<Scope>) -> Shared<Functor> {
        Shared::new(Functor {
            name,
            clauses: vec![clause],
            lexical_scope,
            closure: false,
            closed_self: None,
            ivars: Ivars::default(),
        })
    }

    /// A block/closure functor: captures the defining scope and receiver.
    pub fn block(
        name: Sym,
        clause: Clause,
        lexical_scope: Shared<Scope>,
        closed_self: Value,
    ) -> Shared<Functor> {
        Shared::new(Functor {
            name,
            clauses: vec![clause],
            lexical_scope,
            closure: true,
            closed_self: Some(closed_self),
            ivars: Ivars::default(),
        })
    }

    /// Append a clause. Definition order is preserved and decides selection
    /// among clauses of equal specificity.
    pub fn add_clause(&mut self, clause: Clause) {
        self.clauses.push(clause);
    }

    /// Select the first clause (in definition order) whose arity accepts the
    /// argument count.
    pub fn select_clause(&self, argc: usize) -> Option<Clause> {
        self.clauses.iter().find(|c| c.accepts(argc)).cloned()
    }
}

impl std::fmt::Debug for Functor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The lexical scope is elided: scope graphs are cyclic through
        // closures and the kernel scope.
        f.debug_struct("Functor")
            .field("name", &self.name)
            .field("clauses", &self.clauses.len())
            .field("closure", &self.closure)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rill_ir::ExprArena;

    fn clause(param_count: usize, splat: Option<usize>) -> UserClause {
        UserClause {
            params: (0..param_count as u32).map(Sym::from_raw).collect(),
            splat,
            block_param: None,
            body: ExprId::new(0),
            arena: SharedArena::new(ExprArena::new()),
        }
    }

    #[test]
    fn fixed_arity_accepts_exact_count() {
        let c = clause(2, None);
        assert!(!c.accepts(1));
        assert!(c.accepts(2));
        assert!(!c.accepts(3));
    }

    #[test]
    fn splat_accepts_tail_of_any_length() {
        // (a, *rest)
        let c = clause(2, Some(1));
        assert!(c.accepts(1));
        assert!(c.accepts(2));
        assert!(c.accepts(5));
        assert!(!c.accepts(0));
    }

    #[test]
    fn selection_prefers_definition_order() {
        let scope = Shared::new(Scope::new());
        let functor = Functor::method(Sym::from_raw(1), Clause::User(clause(1, None)), scope);
        functor
            .borrow_mut()
            .add_clause(Clause::User(clause(2, None)));

        let selected = functor.borrow().select_clause(2);
        match selected {
            Some(Clause::User(c)) => assert_eq!(c.params.len(), 2),
            other => panic!("expected the two-parameter clause, got {other:?}"),
        }
        assert!(functor.borrow().select_clause(3).is_none());
    }
}
