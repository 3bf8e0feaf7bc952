//! Test support: a program builder over `ExprArena`.
//!
//! Stands in for the parser collaborator: each method allocates the node the
//! parser would produce. Top-level statements accumulate via `stmt`.

use rill_ir::{
    BinaryOp, Expr, ExprArena, ExprId, ExprKind, MethodDef, Program, SharedInterner, Sym, UnaryOp,
};

use crate::errors::EvalResult;
use crate::interpreter::{Interpreter, InterpreterBuilder};
use crate::print_handler::buffer_handler;

pub(crate) struct ProgramBuilder {
    arena: ExprArena,
    interner: SharedInterner,
    body: Vec<ExprId>,
}

impl ProgramBuilder {
    pub fn new(interner: SharedInterner) -> Self {
        ProgramBuilder {
            arena: ExprArena::new(),
            interner,
            body: Vec::new(),
        }
    }

    pub fn sym(&self, name: &str) -> Sym {
        self.interner.intern(name)
    }

    fn alloc(&mut self, kind: ExprKind) -> ExprId {
        self.arena.alloc(Expr::new(kind))
    }

    /// Append a top-level statement.
    pub fn stmt(&mut self, id: ExprId) {
        self.body.push(id);
    }

    pub fn int(&mut self, n: i64) -> ExprId {
        self.alloc(ExprKind::Int(n))
    }

    pub fn float(&mut self, f: f64) -> ExprId {
        self.alloc(ExprKind::Float(f))
    }

    pub fn boolean(&mut self, b: bool) -> ExprId {
        self.alloc(ExprKind::Bool(b))
    }

    pub fn string(&mut self, text: &str) -> ExprId {
        let sym = self.sym(text);
        self.alloc(ExprKind::Str(sym))
    }

    pub fn symbol(&mut self, name: &str) -> ExprId {
        let sym = self.sym(name);
        self.alloc(ExprKind::Symbol(sym))
    }

    pub fn nil(&mut self) -> ExprId {
        self.alloc(ExprKind::Nil)
    }

    pub fn list(&mut self, items: &[ExprId]) -> ExprId {
        let range = self.arena.alloc_ids(items);
        self.alloc(ExprKind::List(range))
    }

    pub fn map(&mut self, pairs: &[(ExprId, ExprId)]) -> ExprId {
        let flat: Vec<ExprId> = pairs.iter().flat_map(|&(k, v)| [k, v]).collect();
        let range = self.arena.alloc_ids(&flat);
        self.alloc(ExprKind::Map(range))
    }

    pub fn ident(&mut self, name: &str) -> ExprId {
        let sym = self.sym(name);
        self.alloc(ExprKind::Ident(sym))
    }

    pub fn assign(&mut self, name: &str, value: ExprId) -> ExprId {
        let sym = self.sym(name);
        self.alloc(ExprKind::Assign { name: sym, value })
    }

    pub fn ivar_get(&mut self, name: &str) -> ExprId {
        let sym = self.sym(name);
        self.alloc(ExprKind::IvarGet(sym))
    }

    pub fn ivar_set(&mut self, name: &str, value: ExprId) -> ExprId {
        let sym = self.sym(name);
        self.alloc(ExprKind::IvarSet { name: sym, value })
    }

    pub fn binary(&mut self, op: BinaryOp, left: ExprId, right: ExprId) -> ExprId {
        self.alloc(ExprKind::Binary { op, left, right })
    }

    pub fn unary(&mut self, op: UnaryOp, operand: ExprId) -> ExprId {
        self.alloc(ExprKind::Unary { op, operand })
    }

    pub fn index(&mut self, receiver: ExprId, index: ExprId) -> ExprId {
        self.alloc(ExprKind::Index { receiver, index })
    }

    pub fn index_set(&mut self, receiver: ExprId, index: ExprId, value: ExprId) -> ExprId {
        self.alloc(ExprKind::IndexSet {
            receiver,
            index,
            value,
        })
    }

    pub fn call(
        &mut self,
        receiver: Option<ExprId>,
        name: &str,
        args: &[ExprId],
        block: Option<ExprId>,
    ) -> ExprId {
        let sym = self.sym(name);
        let args = self.arena.alloc_ids(args);
        self.alloc(ExprKind::MethodCall {
            receiver,
            name: sym,
            args,
            block,
        })
    }

    pub fn block(&mut self, params: &[&str], body: &[ExprId]) -> ExprId {
        let params: Vec<Sym> = params.iter().map(|p| self.sym(p)).collect();
        let params = self.arena.alloc_params(&params);
        let body = self.seq(body);
        self.alloc(ExprKind::Block { params, body })
    }

    pub fn method_def(&mut self, name: &str, params: &[&str], body: &[ExprId]) -> ExprId {
        self.method_def_full(name, params, None, None, false, body)
    }

    pub fn method_def_full(
        &mut self,
        name: &str,
        params: &[&str],
        splat: Option<u32>,
        block_param: Option<&str>,
        is_static: bool,
        body: &[ExprId],
    ) -> ExprId {
        let name = self.sym(name);
        let params: Vec<Sym> = params.iter().map(|p| self.sym(p)).collect();
        let params = self.arena.alloc_params(&params);
        let block_param = block_param.map(|p| self.sym(p));
        let body = self.seq(body);
        self.alloc(ExprKind::MethodDef(MethodDef {
            name,
            params,
            splat,
            block_param,
            is_static,
            body,
        }))
    }

    pub fn class_decl(&mut self, name: &str, superclass: Option<&str>, body: &[ExprId]) -> ExprId {
        let name = self.sym(name);
        let superclass = superclass.map(|s| self.sym(s));
        let body = self.arena.alloc_ids(body);
        self.alloc(ExprKind::ClassDecl {
            name,
            superclass,
            body,
        })
    }

    pub fn module_decl(&mut self, name: &str, body: &[ExprId]) -> ExprId {
        let name = self.sym(name);
        let body = self.arena.alloc_ids(body);
        self.alloc(ExprKind::ModuleDecl { name, body })
    }

    pub fn include_directive(&mut self, name: &str) -> ExprId {
        let sym = self.sym(name);
        self.alloc(ExprKind::Include(sym))
    }

    pub fn extend_directive(&mut self, name: &str) -> ExprId {
        let sym = self.sym(name);
        self.alloc(ExprKind::Extend(sym))
    }

    pub fn if_(&mut self, condition: ExprId, then_branch: ExprId, else_branch: Option<ExprId>) -> ExprId {
        self.alloc(ExprKind::If {
            condition,
            then_branch,
            else_branch,
        })
    }

    pub fn while_(&mut self, condition: ExprId, body: ExprId) -> ExprId {
        self.alloc(ExprKind::While { condition, body })
    }

    pub fn self_ref(&mut self) -> ExprId {
        self.alloc(ExprKind::SelfRef)
    }

    pub fn seq(&mut self, body: &[ExprId]) -> ExprId {
        let range = self.arena.alloc_ids(body);
        self.alloc(ExprKind::Seq(range))
    }

    pub fn finish(self) -> Program {
        let mut arena = self.arena;
        let body = arena.alloc_ids(&self.body);
        Program::new(arena, body)
    }
}

/// Install a test subscriber once so `RUST_LOG` surfaces dispatch traces
/// when a test fails.
fn init_tracing() {
    use std::sync::Once;
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    });
}

/// Build a program and run it on a fresh interpreter with a capturing print
/// handler. Returns the result and the interpreter for further inspection.
pub(crate) fn run_program(
    build: impl FnOnce(&mut ProgramBuilder),
) -> (EvalResult, Interpreter) {
    init_tracing();
    let interner = SharedInterner::new();
    let mut builder = ProgramBuilder::new(interner.clone());
    build(&mut builder);
    let program = builder.finish();

    let mut interp = InterpreterBuilder::new()
        .interner(interner)
        .print_handler(buffer_handler())
        .build();
    let result = interp.run(&program);
    (result, interp)
}

/// Build and run, returning only the result.
pub(crate) fn eval_program(build: impl FnOnce(&mut ProgramBuilder)) -> EvalResult {
    run_program(build).0
}
