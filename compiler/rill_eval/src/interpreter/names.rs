//! Pre-interned selector names.
//!
//! Interned once at interpreter construction so hot-path dispatch compares
//! `u32` ids instead of re-interning strings per evaluation.

use rill_ir::{BinaryOp, Sym, SymbolInterner};

/// Pre-interned method selectors the driver and natives dispatch through.
#[derive(Clone, Copy)]
pub(crate) struct SelectorNames {
    pub(crate) add: Sym,
    pub(crate) sub: Sym,
    pub(crate) mul: Sym,
    pub(crate) div: Sym,
    pub(crate) rem: Sym,
    pub(crate) eq: Sym,
    pub(crate) ne: Sym,
    pub(crate) lt: Sym,
    pub(crate) le: Sym,
    pub(crate) gt: Sym,
    pub(crate) ge: Sym,
    /// Unary minus selector `-@`, distinct from binary `-`.
    pub(crate) neg: Sym,
    pub(crate) index: Sym,
    pub(crate) index_set: Sym,
    pub(crate) init: Sym,
    /// Display name for block functors.
    pub(crate) block: Sym,
}

impl SelectorNames {
    pub(crate) fn new(interner: &SymbolInterner) -> Self {
        Self {
            add: interner.intern("+"),
            sub: interner.intern("-"),
            mul: interner.intern("*"),
            div: interner.intern("/"),
            rem: interner.intern("%"),
            eq: interner.intern("=="),
            ne: interner.intern("!="),
            lt: interner.intern("<"),
            le: interner.intern("<="),
            gt: interner.intern(">"),
            ge: interner.intern(">="),
            neg: interner.intern("-@"),
            index: interner.intern("[]"),
            index_set: interner.intern("[]="),
            init: interner.intern("init"),
            block: interner.intern("block"),
        }
    }

    /// The selector a dispatched binary operator maps to, or `None` for the
    /// short-circuiting operators the driver evaluates directly.
    pub(crate) fn binary(&self, op: BinaryOp) -> Option<Sym> {
        match op {
            BinaryOp::Add => Some(self.add),
            BinaryOp::Sub => Some(self.sub),
            BinaryOp::Mul => Some(self.mul),
            BinaryOp::Div => Some(self.div),
            BinaryOp::Rem => Some(self.rem),
            BinaryOp::Eq => Some(self.eq),
            BinaryOp::NotEq => Some(self.ne),
            BinaryOp::Lt => Some(self.lt),
            BinaryOp::LtEq => Some(self.le),
            BinaryOp::Gt => Some(self.gt),
            BinaryOp::GtEq => Some(self.ge),
            BinaryOp::And | BinaryOp::Or => None,
        }
    }
}
