//! Expression arena.
//!
//! All AST children are `ExprId`/`ExprRange` indices into an `ExprArena`,
//! never boxes. Functor clauses capture a `SharedArena` so a method body
//! outlives the program walk that defined it.

use std::fmt;
use std::sync::Arc;

use crate::ast::Expr;
use crate::Sym;

/// Index of an expression in an `ExprArena`.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct ExprId(u32);

impl ExprId {
    #[inline]
    pub const fn new(index: u32) -> Self {
        ExprId(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for ExprId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ExprId({})", self.0)
    }
}

/// A contiguous run of expression ids (argument lists, sequence bodies,
/// flattened map-literal entries).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ExprRange {
    start: u32,
    len: u32,
}

impl ExprRange {
    /// The empty range.
    pub const EMPTY: ExprRange = ExprRange { start: 0, len: 0 };

    #[inline]
    pub const fn len(self) -> usize {
        self.len as usize
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.len == 0
    }
}

/// A contiguous run of parameter names.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ParamRange {
    start: u32,
    len: u32,
}

impl ParamRange {
    /// The empty parameter list.
    pub const EMPTY: ParamRange = ParamRange { start: 0, len: 0 };

    #[inline]
    pub const fn len(self) -> usize {
        self.len as usize
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.len == 0
    }
}

/// Contiguous storage for expressions and their id/parameter lists.
#[derive(Default)]
pub struct ExprArena {
    exprs: Vec<Expr>,
    ids: Vec<ExprId>,
    params: Vec<Sym>,
}

impl ExprArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate an expression, returning its id.
    ///
    /// # Panics
    /// Panics if the arena exceeds `u32` capacity, as do the range
    /// allocators below. A program that large does not parse in practice.
    pub fn alloc(&mut self, expr: Expr) -> ExprId {
        let id = ExprId::new(u32::try_from(self.exprs.len()).expect("arena overflow"));
        self.exprs.push(expr);
        id
    }

    /// Allocate a list of expression ids, returning the range.
    pub fn alloc_ids(&mut self, ids: &[ExprId]) -> ExprRange {
        let start = u32::try_from(self.ids.len()).expect("arena overflow");
        self.ids.extend_from_slice(ids);
        ExprRange {
            start,
            len: u32::try_from(ids.len()).expect("arena overflow"),
        }
    }

    /// Allocate a parameter list, returning the range.
    pub fn alloc_params(&mut self, params: &[Sym]) -> ParamRange {
        let start = u32::try_from(self.params.len()).expect("arena overflow");
        self.params.extend_from_slice(params);
        ParamRange {
            start,
            len: u32::try_from(params.len()).expect("arena overflow"),
        }
    }

    /// Get an expression by id.
    #[inline]
    pub fn get(&self, id: ExprId) -> &Expr {
        &self.exprs[id.index()]
    }

    /// Get the ids in a range.
    #[inline]
    pub fn ids(&self, range: ExprRange) -> &[ExprId] {
        &self.ids[range.start as usize..(range.start + range.len) as usize]
    }

    /// Get the parameter names in a range.
    #[inline]
    pub fn params(&self, range: ParamRange) -> &[Sym] {
        &self.params[range.start as usize..(range.start + range.len) as usize]
    }

    /// Number of allocated expressions.
    pub fn len(&self) -> usize {
        self.exprs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exprs.is_empty()
    }
}

/// Shared, immutable handle to a finished arena.
///
/// Cloning is an O(1) refcount bump; functor clauses hold one so their body
/// ids stay resolvable after the defining walk returns.
#[derive(Clone)]
pub struct SharedArena(Arc<ExprArena>);

impl SharedArena {
    pub fn new(arena: ExprArena) -> Self {
        SharedArena(Arc::new(arena))
    }
}

impl std::ops::Deref for SharedArena {
    type Target = ExprArena;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// A parsed program: the arena plus the top-level expression sequence.
#[derive(Clone)]
pub struct Program {
    pub arena: SharedArena,
    pub body: ExprRange,
}

impl Program {
    pub fn new(arena: ExprArena, body: ExprRange) -> Self {
        Program {
            arena: SharedArena::new(arena),
            body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::ExprKind;

    #[test]
    fn alloc_and_get() {
        let mut arena = ExprArena::new();
        let a = arena.alloc(Expr::new(ExprKind::Int(1)));
        let b = arena.alloc(Expr::new(ExprKind::Int(2)));
        assert_ne!(a, b);
        assert!(matches!(arena.get(a).kind, ExprKind::Int(1)));
        assert!(matches!(arena.get(b).kind, ExprKind::Int(2)));
    }

    #[test]
    fn id_ranges_round_trip() {
        let mut arena = ExprArena::new();
        let a = arena.alloc(Expr::new(ExprKind::Int(1)));
        let b = arena.alloc(Expr::new(ExprKind::Int(2)));
        let range = arena.alloc_ids(&[a, b]);
        assert_eq!(arena.ids(range), &[a, b]);
        assert_eq!(range.len(), 2);
        assert!(ExprRange::EMPTY.is_empty());
    }

    #[test]
    fn param_ranges_round_trip() {
        let mut arena = ExprArena::new();
        let x = Sym::from_raw(1);
        let y = Sym::from_raw(2);
        let range = arena.alloc_params(&[x, y]);
        assert_eq!(arena.params(range), &[x, y]);
    }
}
