//! Rill IR - AST, expression arena, and symbol interner.
//!
//! This crate is the interface between the parser collaborator and the
//! tree-walking evaluator:
//!
//! - `SymbolInterner` / `SharedInterner` / `Sym`: interned identifiers and
//!   runtime symbol values
//! - `ExprArena` / `ExprId` / `ExprRange` / `ParamRange`: arena-allocated
//!   expressions (no `Box<Expr>`)
//! - `Expr` / `ExprKind`: the node variants of the surface language
//! - `BinaryOp` / `UnaryOp`: operators and the method selectors they
//!   dispatch to

pub mod arena;
pub mod ast;
mod interner;
pub mod ops;

pub use arena::{ExprArena, ExprId, ExprRange, ParamRange, Program, SharedArena};
pub use ast::{Expr, ExprKind, MethodDef};
pub use interner::{InternError, SharedInterner, StringLookup, Sym, SymbolInterner};
pub use ops::{BinaryOp, UnaryOp};
